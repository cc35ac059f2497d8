//! Structured diagnostics collected while classifying slots.
//!
//! Classifiers never print. They hand back an [`Issue`] next to the
//! placeholder entry, and the builder attaches the slot it came from.

use crate::slot::{InstructionSet, SlotRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    /// No rule matched the slot.
    Unresolved,
    /// A family matched, but a qualifier was outside its vocabulary.
    Inconsistent,
}

impl std::fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unresolved => f.write_str("unresolved"),
            Self::Inconsistent => f.write_str("inconsistent"),
        }
    }
}

/// What a classifier reports about a single slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub kind: DiagnosticKind,
    pub detail: String,
}

impl Issue {
    pub fn unresolved(detail: impl Into<String>) -> Self {
        Self {
            kind: DiagnosticKind::Unresolved,
            detail: detail.into(),
        }
    }

    pub fn inconsistent(detail: impl Into<String>) -> Self {
        Self {
            kind: DiagnosticKind::Inconsistent,
            detail: detail.into(),
        }
    }
}

/// An [`Issue`] attributed to a slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub isa: InstructionSet,
    pub slot: usize,
    pub kind: DiagnosticKind,
    pub detail: String,
    pub record: SlotRecord,
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} slot {:#05X} {}: {} ({})",
            self.isa, self.slot, self.kind, self.detail, self.record
        )
    }
}

/// Ordered collection of diagnostics for one build.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn report(&mut self, isa: InstructionSet, slot: usize, record: &SlotRecord, issue: Issue) {
        self.items.push(Diagnostic {
            isa,
            slot,
            kind: issue.kind,
            detail: issue.detail,
            record: record.clone(),
        });
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.items.iter()
    }

    #[must_use]
    pub fn count(&self, isa: InstructionSet, kind: DiagnosticKind) -> usize {
        self.items
            .iter()
            .filter(|d| d.isa == isa && d.kind == kind)
            .count()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn report_attaches_slot_and_record() {
        let mut diagnostics = Diagnostics::new();
        let record = SlotRecord::new("ldrd").with_sub_mode("imm");

        diagnostics.report(
            InstructionSet::Arm,
            0x0D,
            &record,
            Issue::unresolved("no rule for mnemonic `ldrd`"),
        );
        diagnostics.report(
            InstructionSet::Thumb,
            0x200,
            &SlotRecord::new("ldr").with_sub_mode("bogus"),
            Issue::inconsistent("unknown sub-mode `bogus`"),
        );

        assert_eq!(diagnostics.len(), 2);
        assert_eq!(
            diagnostics.count(InstructionSet::Arm, DiagnosticKind::Unresolved),
            1
        );
        assert_eq!(
            diagnostics.count(InstructionSet::Arm, DiagnosticKind::Inconsistent),
            0
        );

        let first = diagnostics.iter().next().expect("one diagnostic");
        assert_eq!(first.record, record);
        assert_eq!(
            first.to_string(),
            "ARM slot 0x00D unresolved: no rule for mnemonic `ldrd` \
             (name=`ldrd` subname=`imm` desc=`` subdesc=`` class=``)"
        );
    }
}
