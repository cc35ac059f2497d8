//! Drives the classifiers over whole slot sequences.
//!
//! Tables are built slot by slot in input order. The builder never checks the
//! sequence length; that belongs to whoever loads the records.

use tracing::debug;

use crate::arm;
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::entry::{Classified, DecodeTable};
use crate::error::{BuildError, DecodeError};
use crate::slot::{InstructionSet, SlotRecord};
use crate::thumb;

/// Both decode tables plus everything the classifiers reported.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodeTables {
    pub arm: DecodeTable,
    pub thumb: DecodeTable,
    pub diagnostics: Diagnostics,
}

/// Classifies a single slot with the classifier of `isa`.
///
/// # Errors
///
/// Propagates the fatal [`DecodeError`] of the ARM classifier.
pub fn classify(isa: InstructionSet, record: &SlotRecord) -> Result<Classified, DecodeError> {
    match isa {
        InstructionSet::Arm => arm::classify(record),
        InstructionSet::Thumb => Ok(thumb::classify(record)),
    }
}

/// Builds one table, appending the issues of its placeholder slots to
/// `diagnostics`.
///
/// # Errors
///
/// Stops at the first slot raising a [`DecodeError`]; no partial table is
/// returned.
pub fn build_table(
    isa: InstructionSet,
    records: &[SlotRecord],
    diagnostics: &mut Diagnostics,
) -> Result<DecodeTable, BuildError> {
    let mut entries = Vec::with_capacity(records.len());

    for (slot, record) in records.iter().enumerate() {
        let classified =
            classify(isa, record).map_err(|source| BuildError { isa, slot, source })?;

        if let Some(issue) = classified.issue {
            diagnostics.report(isa, slot, record, issue);
        }
        entries.push(classified.entry);
    }

    let table = DecodeTable::from(entries);
    debug!(
        %isa,
        slots = table.len(),
        unresolved = diagnostics.count(isa, DiagnosticKind::Unresolved),
        inconsistent = diagnostics.count(isa, DiagnosticKind::Inconsistent),
        "decode table built"
    );

    Ok(table)
}

/// Builds the ARM and THUMB tables.
///
/// # Errors
///
/// See [`build_table`].
pub fn build(arm: &[SlotRecord], thumb: &[SlotRecord]) -> Result<DecodeTables, BuildError> {
    let mut diagnostics = Diagnostics::new();

    let arm = build_table(InstructionSet::Arm, arm, &mut diagnostics)?;
    let thumb = build_table(InstructionSet::Thumb, thumb, &mut diagnostics)?;

    Ok(DecodeTables {
        arm,
        thumb,
        diagnostics,
    })
}
