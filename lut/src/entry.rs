//! # Decode Entries
//!
//! A decode table is a dense array of [`DecodeEntry`], one per slot. Position
//! is the only link to the opcode bits; entries carry no index of their own.

use std::fmt::{self, Display};

use crate::diagnostics::Issue;
use crate::params::ParameterValue;
use crate::slot::InstructionSet;

/// Execution routines a slot can be dispatched to.
///
/// Every variant maps to one linkable symbol of the emulator's executor
/// registry. Parameter order for each family is fixed by the generic
/// signature of that symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Executor {
    /// Placeholder for a slot no rule could classify.
    Unresolved(InstructionSet),
    /// Placeholder for a slot whose family matched but whose qualifiers did
    /// not fit that family's vocabulary.
    Inconsistent(InstructionSet),

    ArmBranch,
    ArmBranchLink,
    /// `[AluOp, SetFlags, Op2]`
    ArmDataProcessing,
    /// `[Transfer, Offset, Indexing, Writeback]`
    ArmSingleDataTransfer,
    /// `[Transfer, Offset, Indexing, Writeback]`
    ArmHalfwordTransfer,
    /// `[Transfer, Indexing, SetFlags, Writeback]`
    ArmBlockDataTransfer,
    /// `[Psr]`
    ArmMrs,
    /// `[Psr, Op2]`
    ArmMsr,
    /// `[SetFlags, Accumulate]`
    ArmMultiply,
    /// `[Signed, SetFlags, Accumulate]`
    ArmMultiplyLong,
    /// `[Byte]`
    ArmSwap,
    ArmSwi,
    ArmBx,
    ArmBlx,
    ArmBkpt,
    ArmClz,
    ArmCoprocessor,
    ArmUndefined,
    ArmDspUndefined,

    /// `[AluOp]`
    ThumbMoveShiftedRegister,
    /// `[Register, AluOp]`
    ThumbMovCmpAddSubImm,
    /// `[Operand, AluOp]`
    ThumbAddSubtract,
    ThumbAluOperation,
    /// `[AluOp]`
    ThumbHiRegisterOp,
    ThumbBx,
    /// `[Transfer, Operand, Operand, Offset, Indexing]`
    ThumbSingleDataTransfer,
    /// `[Transfer, Operand, Operand, Indexing]`
    ThumbBlockDataTransfer,
    /// `[Register, Operand]`
    ThumbLoadAddress,
    ThumbAddSp,
    /// `[Condition]`
    ThumbConditionalBranch,
    ThumbUnconditionalBranch,
    ThumbBlSetup,
    ThumbBlComplete,
    ThumbBlx,
    ThumbBkpt,
    ThumbSwi,
    ThumbUndefined,
}

impl Executor {
    /// Instruction set whose executor module holds the symbol.
    #[must_use]
    pub const fn instruction_set(self) -> InstructionSet {
        match self {
            Self::Unresolved(isa) | Self::Inconsistent(isa) => isa,
            Self::ArmBranch
            | Self::ArmBranchLink
            | Self::ArmDataProcessing
            | Self::ArmSingleDataTransfer
            | Self::ArmHalfwordTransfer
            | Self::ArmBlockDataTransfer
            | Self::ArmMrs
            | Self::ArmMsr
            | Self::ArmMultiply
            | Self::ArmMultiplyLong
            | Self::ArmSwap
            | Self::ArmSwi
            | Self::ArmBx
            | Self::ArmBlx
            | Self::ArmBkpt
            | Self::ArmClz
            | Self::ArmCoprocessor
            | Self::ArmUndefined
            | Self::ArmDspUndefined => InstructionSet::Arm,
            _ => InstructionSet::Thumb,
        }
    }

    /// Function name inside the executor module.
    #[must_use]
    pub const fn function(self) -> &'static str {
        match self {
            Self::Unresolved(_) => "todo",
            Self::Inconsistent(_) => "decode_error",
            Self::ArmBranch => "arm_b",
            Self::ArmBranchLink => "arm_bl",
            Self::ArmDataProcessing => "arm_dataproc",
            Self::ArmSingleDataTransfer => "arm_single_data_transfer",
            Self::ArmHalfwordTransfer => "arm_halfword_and_signed_transfer",
            Self::ArmBlockDataTransfer => "arm_block_data_transfer",
            Self::ArmMrs => "arm_mrs",
            Self::ArmMsr => "arm_msr",
            Self::ArmMultiply => "arm_mul",
            Self::ArmMultiplyLong => "arm_mull",
            Self::ArmSwap => "arm_swp",
            Self::ArmSwi => "arm_swi",
            Self::ArmBx => "arm_bx",
            Self::ArmBlx => "arm_blx",
            Self::ArmBkpt => "arm_bkpt",
            Self::ArmClz => "arm_clz",
            Self::ArmCoprocessor => "arm_coprocessor",
            Self::ArmUndefined => "arm_undefined",
            Self::ArmDspUndefined => "arm_m_extension_undefined",
            Self::ThumbMoveShiftedRegister => "thumb_move_shifted_register",
            Self::ThumbMovCmpAddSubImm => "thumb_mov_compare_add_subtract_imm",
            Self::ThumbAddSubtract => "thumb_add_subtract",
            Self::ThumbAluOperation => "thumb_alu_operation",
            Self::ThumbHiRegisterOp => "thumb_hi_register_op",
            Self::ThumbBx => "thumb_bx",
            Self::ThumbSingleDataTransfer => "thumb_single_data_transfer",
            Self::ThumbBlockDataTransfer => "thumb_block_data_transfer",
            Self::ThumbLoadAddress => "thumb_load_address",
            Self::ThumbAddSp => "thumb_add_sp",
            Self::ThumbConditionalBranch => "thumb_conditional_branch",
            Self::ThumbUnconditionalBranch => "thumb_unconditional_branch",
            Self::ThumbBlSetup => "thumb_bl_setup",
            Self::ThumbBlComplete => "thumb_bl_complete",
            Self::ThumbBlx => "thumb_blx",
            Self::ThumbBkpt => "thumb_bkpt",
            Self::ThumbSwi => "thumb_swi",
            Self::ThumbUndefined => "thumb_undefined",
        }
    }

    #[must_use]
    pub const fn is_placeholder(self) -> bool {
        matches!(self, Self::Unresolved(_) | Self::Inconsistent(_))
    }
}

impl Display for Executor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.instruction_set().module(), self.function())
    }
}

/// One resolved table cell: the executor plus the arguments specializing it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DecodeEntry {
    pub executor: Executor,
    pub parameters: Vec<ParameterValue>,
}

impl DecodeEntry {
    #[must_use]
    pub const fn new(executor: Executor, parameters: Vec<ParameterValue>) -> Self {
        Self {
            executor,
            parameters,
        }
    }

    /// An executor taking no generic arguments.
    #[must_use]
    pub const fn bare(executor: Executor) -> Self {
        Self::new(executor, Vec::new())
    }

    #[must_use]
    pub const fn unresolved(isa: InstructionSet) -> Self {
        Self::bare(Executor::Unresolved(isa))
    }

    #[must_use]
    pub const fn inconsistent(isa: InstructionSet) -> Self {
        Self::bare(Executor::Inconsistent(isa))
    }

    /// True for the sentinel executors, and for real executors holding an
    /// argument whose source text was not recognized.
    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        self.executor.is_placeholder()
            || self
                .parameters
                .iter()
                .any(|parameter| matches!(parameter, ParameterValue::Unknown(_)))
    }
}

impl Display for DecodeEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.executor)?;
        if let Some((first, rest)) = self.parameters.split_first() {
            write!(f, "::<{first}")?;
            for parameter in rest {
                write!(f, ", {parameter}")?;
            }
            f.write_str(">")?;
        }
        Ok(())
    }
}

/// Dense, position-indexed table of decode entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodeTable {
    entries: Vec<DecodeEntry>,
}

impl DecodeTable {
    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DecodeEntry> {
        self.entries.iter()
    }

    /// Number of slots holding a placeholder instead of a real executor.
    #[must_use]
    pub fn placeholder_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_placeholder()).count()
    }
}

impl From<Vec<DecodeEntry>> for DecodeTable {
    fn from(entries: Vec<DecodeEntry>) -> Self {
        Self { entries }
    }
}

impl FromIterator<DecodeEntry> for DecodeTable {
    fn from_iter<I: IntoIterator<Item = DecodeEntry>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl std::ops::Index<usize> for DecodeTable {
    type Output = DecodeEntry;

    fn index(&self, slot: usize) -> &Self::Output {
        &self.entries[slot]
    }
}

impl<'a> IntoIterator for &'a DecodeTable {
    type Item = &'a DecodeEntry;
    type IntoIter = std::slice::Iter<'a, DecodeEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Outcome of classifying one slot: the entry to place in the table and,
/// for placeholders, what went wrong.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classified {
    pub entry: DecodeEntry,
    pub issue: Option<Issue>,
}

impl Classified {
    #[must_use]
    pub const fn resolved(entry: DecodeEntry) -> Self {
        Self { entry, issue: None }
    }

    #[must_use]
    pub const fn with_issue(entry: DecodeEntry, issue: Issue) -> Self {
        Self {
            entry,
            issue: Some(issue),
        }
    }

    pub fn unresolved(isa: InstructionSet, detail: impl Into<String>) -> Self {
        Self::with_issue(DecodeEntry::unresolved(isa), Issue::unresolved(detail))
    }

    pub fn inconsistent(isa: InstructionSet, detail: impl Into<String>) -> Self {
        Self::with_issue(DecodeEntry::inconsistent(isa), Issue::inconsistent(detail))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::Condition;
    use crate::params::{AluOp, Op2};
    use pretty_assertions::assert_eq;

    #[test]
    fn render_entry_without_parameters() {
        assert_eq!(DecodeEntry::bare(Executor::ArmSwi).to_string(), "arm::arm_swi");
        assert_eq!(
            DecodeEntry::unresolved(InstructionSet::Thumb).to_string(),
            "thumb::todo"
        );
        assert_eq!(
            DecodeEntry::inconsistent(InstructionSet::Arm).to_string(),
            "arm::decode_error"
        );
    }

    #[test]
    fn render_entry_with_parameters() {
        let entry = DecodeEntry::new(
            Executor::ArmDataProcessing,
            vec![
                ParameterValue::AluOp(AluOp::Add),
                ParameterValue::SetFlags(true),
                ParameterValue::Op2(Op2::Immediate),
            ],
        );
        assert_eq!(
            entry.to_string(),
            "arm::arm_dataproc::<alu::AddOp, S_FLAG_SET, alu::ImmOp2>"
        );

        let entry = DecodeEntry::new(
            Executor::ThumbConditionalBranch,
            vec![ParameterValue::Condition(Condition::GT)],
        );
        assert_eq!(
            entry.to_string(),
            "thumb::thumb_conditional_branch::<{ Condition::GT as u32 }>"
        );
    }

    #[test]
    fn executors_live_in_their_instruction_set_module() {
        assert_eq!(Executor::ArmDspUndefined.instruction_set(), InstructionSet::Arm);
        assert_eq!(Executor::ThumbBx.instruction_set(), InstructionSet::Thumb);
        assert!(Executor::Unresolved(InstructionSet::Arm).is_placeholder());
        assert!(!Executor::ArmUndefined.is_placeholder());
    }

    #[test]
    fn unknown_argument_makes_a_placeholder() {
        let entry = DecodeEntry::new(
            Executor::ArmDataProcessing,
            vec![
                ParameterValue::AluOp(AluOp::Orr),
                ParameterValue::SetFlags(false),
                ParameterValue::Unknown("rrx".to_owned()),
            ],
        );
        assert!(entry.is_placeholder());
        assert!(!DecodeEntry::bare(Executor::ArmSwi).is_placeholder());

        let table = DecodeTable::from(vec![
            entry,
            DecodeEntry::bare(Executor::ArmSwi),
            DecodeEntry::unresolved(InstructionSet::Arm),
        ]);
        assert_eq!(table.placeholder_count(), 2);
    }
}
