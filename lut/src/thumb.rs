//! # THUMB Classifier
//!
//! THUMB encodings have fixed operand positions, so the sub-mode of a slot is
//! a small structured token (`imm5`, `r3`, `sp,r0`, ...) rather than prose.
//! It is parsed once into a [`ThumbSubMode`] and each rule matches on the
//! mnemonic together with that token.
//!
//! A mnemonic this module knows, paired with a sub-mode none of its rules
//! accept, resolves to the inconsistency placeholder. Unknown mnemonics fall
//! back on the class tag, then on the unresolved placeholder.

use crate::condition::Condition;
use crate::entry::{Classified, DecodeEntry, Executor};
use crate::params::{AluOp, Indexing, OffsetStrategy, ParameterValue, ThumbOperand, TransferOp};
use crate::slot::{InstructionSet, SlotRecord, UNDEFINED_CLASS};

const ISA: InstructionSet = InstructionSet::Thumb;

const SP: u8 = 13;

/// Structured form of a THUMB sub-mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThumbSubMode {
    Empty,
    Imm,
    Imm3,
    Imm5,
    Reg,
    Alu,
    Hi,
    Sp,
    Lr,
    Pc,
    /// `rN`: a low register fixed by the slot.
    Low(u8),
    /// `pc,rN`
    PcRelative(u8),
    /// `sp,rN`
    SpRelative(u8),
    /// First half of a long branch with link.
    Setup,
    /// Second half of a long branch with link.
    Complete,
}

impl ThumbSubMode {
    /// Parses a normalized (trimmed, lowercase) sub-mode.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let sub_mode = match text {
            "" => Self::Empty,
            "imm" => Self::Imm,
            "imm3" => Self::Imm3,
            "imm5" => Self::Imm5,
            "reg" => Self::Reg,
            "alu" => Self::Alu,
            "hi" => Self::Hi,
            "sp" => Self::Sp,
            "lr" => Self::Lr,
            "pc" => Self::Pc,
            "setup" => Self::Setup,
            "complete" => Self::Complete,
            _ => {
                if let Some((base, register)) = text.split_once(',') {
                    let register = low_register(register)?;
                    return match base.trim() {
                        "pc" => Some(Self::PcRelative(register)),
                        "sp" => Some(Self::SpRelative(register)),
                        _ => None,
                    };
                }
                Self::Low(low_register(text)?)
            }
        };
        Some(sub_mode)
    }
}

fn low_register(text: &str) -> Option<u8> {
    text.trim()
        .strip_prefix('r')?
        .parse::<u8>()
        .ok()
        .filter(|register| *register < 8)
}

fn transfer_op(mnemonic: &str) -> Option<TransferOp> {
    let op = match mnemonic {
        "ldr" => TransferOp::Ldr { user_mode: false },
        "str" => TransferOp::Str { user_mode: false },
        "ldrb" => TransferOp::Ldrb { user_mode: false },
        "strb" => TransferOp::Strb { user_mode: false },
        "ldrh" => TransferOp::Ldrh,
        "strh" => TransferOp::Strh,
        "ldrsb" | "ldsb" => TransferOp::Ldrsb,
        "ldrsh" | "ldsh" => TransferOp::Ldrsh,
        _ => return None,
    };
    Some(op)
}

/// Immediate offsets are scaled by the access width. Signed loads have no
/// immediate form.
const fn imm5_offset(op: TransferOp) -> Option<OffsetStrategy> {
    match op {
        TransferOp::Ldr { .. } | TransferOp::Str { .. } => {
            Some(OffsetStrategy::ThumbImm5ExtendedTo7)
        }
        TransferOp::Ldrb { .. } | TransferOp::Strb { .. } => Some(OffsetStrategy::ThumbImm5),
        TransferOp::Ldrh | TransferOp::Strh => Some(OffsetStrategy::ThumbImm5ExtendedTo6),
        _ => None,
    }
}

fn branch_condition(mnemonic: &str) -> Option<Condition> {
    let condition = Condition::from_suffix(mnemonic.strip_prefix('b')?)?;
    Condition::BRANCH_CONDITIONS
        .contains(&condition)
        .then_some(condition)
}

fn is_known_mnemonic(mnemonic: &str) -> bool {
    matches!(
        mnemonic,
        "bx" | "push" | "pop" | "ldmia" | "stmia" | "b" | "bl" | "blx" | "bkpt" | "swi"
    ) || AluOp::from_mnemonic(mnemonic).is_some()
        || transfer_op(mnemonic).is_some()
        || branch_condition(mnemonic).is_some()
}

fn single_transfer(
    op: TransferOp,
    base: ThumbOperand,
    address: ThumbOperand,
    offset: OffsetStrategy,
) -> DecodeEntry {
    DecodeEntry::new(
        Executor::ThumbSingleDataTransfer,
        vec![
            ParameterValue::Transfer(op),
            ParameterValue::Operand(base),
            ParameterValue::Operand(address),
            ParameterValue::Offset(offset),
            ParameterValue::Indexing(Indexing::PreIncrement),
        ],
    )
}

fn block_transfer(
    op: TransferOp,
    base: u8,
    list: ThumbOperand,
    indexing: Indexing,
) -> DecodeEntry {
    DecodeEntry::new(
        Executor::ThumbBlockDataTransfer,
        vec![
            ParameterValue::Transfer(op),
            ParameterValue::Operand(ThumbOperand::ConstReg(base)),
            ParameterValue::Operand(list),
            ParameterValue::Indexing(indexing),
        ],
    )
}

/// Applies the THUMB rules in order. `None` when no rule accepts the pair.
fn resolve(mnemonic: &str, sub_mode: ThumbSubMode) -> Option<DecodeEntry> {
    use ThumbSubMode as S;

    let alu = AluOp::from_mnemonic(mnemonic);
    let transfer = transfer_op(mnemonic);

    let entry = match (mnemonic, sub_mode) {
        ("blx", _) => DecodeEntry::bare(Executor::ThumbBlx),
        ("bkpt", _) => DecodeEntry::bare(Executor::ThumbBkpt),
        ("swi", _) => DecodeEntry::bare(Executor::ThumbSwi),
        // Operation is decoded from the opcode at run time.
        (_, S::Alu) if alu.is_some() => DecodeEntry::bare(Executor::ThumbAluOperation),
        ("lsl" | "lsr" | "asr", S::Imm) => DecodeEntry::new(
            Executor::ThumbMoveShiftedRegister,
            vec![ParameterValue::AluOp(alu?)],
        ),
        ("mov" | "cmp" | "add" | "sub", S::Low(rd)) => DecodeEntry::new(
            Executor::ThumbMovCmpAddSubImm,
            vec![ParameterValue::Register(rd), ParameterValue::AluOp(alu?)],
        ),
        ("add" | "sub", S::Reg | S::Imm3) => {
            let operand = if sub_mode == S::Reg {
                ThumbOperand::AddSubtractReg3
            } else {
                ThumbOperand::AddSubtractImm3
            };
            DecodeEntry::new(
                Executor::ThumbAddSubtract,
                vec![ParameterValue::Operand(operand), ParameterValue::AluOp(alu?)],
            )
        }
        ("add" | "cmp" | "mov", S::Hi) => DecodeEntry::new(
            Executor::ThumbHiRegisterOp,
            vec![ParameterValue::AluOp(alu?)],
        ),
        ("bx", S::Empty | S::Hi) => DecodeEntry::bare(Executor::ThumbBx),
        ("ldr", S::PcRelative(rd)) => single_transfer(
            transfer?,
            ThumbOperand::ConstReg(rd),
            ThumbOperand::WordAlignedPc,
            OffsetStrategy::ThumbImm8ExtendedTo10,
        ),
        ("ldr" | "str", S::SpRelative(rd)) => single_transfer(
            transfer?,
            ThumbOperand::ConstReg(rd),
            ThumbOperand::RegValue(SP),
            OffsetStrategy::ThumbImm8ExtendedTo10,
        ),
        (_, S::Reg) => single_transfer(
            transfer?,
            ThumbOperand::RegAt { start: 0, end: 2 },
            ThumbOperand::RegAtValue { start: 3, end: 5 },
            OffsetStrategy::ThumbRegister,
        ),
        (_, S::Imm5) => {
            let op = transfer?;
            single_transfer(
                op,
                ThumbOperand::RegAt { start: 0, end: 2 },
                ThumbOperand::RegAtValue { start: 3, end: 5 },
                imm5_offset(op)?,
            )
        }
        ("add", S::PcRelative(rd)) => DecodeEntry::new(
            Executor::ThumbLoadAddress,
            vec![
                ParameterValue::Register(rd),
                ParameterValue::Operand(ThumbOperand::WordAlignedPc),
            ],
        ),
        ("add", S::SpRelative(rd)) => DecodeEntry::new(
            Executor::ThumbLoadAddress,
            vec![
                ParameterValue::Register(rd),
                ParameterValue::Operand(ThumbOperand::RegValue(SP)),
            ],
        ),
        ("add", S::Sp) => DecodeEntry::bare(Executor::ThumbAddSp),
        ("push", S::Empty) => block_transfer(
            TransferOp::Stm,
            SP,
            ThumbOperand::RegisterList,
            Indexing::PreDecrement,
        ),
        ("push", S::Lr) => block_transfer(
            TransferOp::Stm,
            SP,
            ThumbOperand::RegisterListWithLr,
            Indexing::PreDecrement,
        ),
        ("pop", S::Empty) => block_transfer(
            TransferOp::Ldm,
            SP,
            ThumbOperand::RegisterList,
            Indexing::PostIncrement,
        ),
        ("pop", S::Pc) => block_transfer(
            TransferOp::Ldm,
            SP,
            ThumbOperand::RegisterListWithPc,
            Indexing::PostIncrement,
        ),
        ("ldmia", S::Low(rb)) => block_transfer(
            TransferOp::Ldm,
            rb,
            ThumbOperand::RegisterList,
            Indexing::PostIncrement,
        ),
        ("stmia", S::Low(rb)) => block_transfer(
            TransferOp::Stm,
            rb,
            ThumbOperand::RegisterList,
            Indexing::PostIncrement,
        ),
        ("b", S::Empty) => DecodeEntry::bare(Executor::ThumbUnconditionalBranch),
        ("bl", S::Setup) => DecodeEntry::bare(Executor::ThumbBlSetup),
        ("bl", S::Complete) => DecodeEntry::bare(Executor::ThumbBlComplete),
        (_, S::Empty) => DecodeEntry::new(
            Executor::ThumbConditionalBranch,
            vec![ParameterValue::Condition(branch_condition(mnemonic)?)],
        ),
        _ => return None,
    };

    Some(entry)
}

/// Classifies one THUMB slot. THUMB records carry no invariant that could
/// abort a build, so this never fails.
#[must_use]
pub fn classify(record: &SlotRecord) -> Classified {
    let mnemonic = record.normalized_mnemonic();
    let sub_mode = record.normalized_sub_mode();

    if let Some(entry) = ThumbSubMode::parse(&sub_mode).and_then(|s| resolve(&mnemonic, s)) {
        return Classified::resolved(entry);
    }

    if is_known_mnemonic(&mnemonic) {
        return Classified::inconsistent(
            ISA,
            format!("sub-mode `{sub_mode}` is not valid for `{mnemonic}`"),
        );
    }

    if record.has_class(UNDEFINED_CLASS) {
        return Classified::resolved(DecodeEntry::bare(Executor::ThumbUndefined));
    }

    Classified::unresolved(
        ISA,
        format!(
            "no rule for mnemonic `{}` sub-mode `{}` desc `{}` subdesc `{}`",
            record.mnemonic, record.sub_mode, record.description, record.sub_description
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::DiagnosticKind;
    use pretty_assertions::assert_eq;

    fn rendered(mnemonic: &str, sub_mode: &str) -> String {
        let classified = classify(&SlotRecord::new(mnemonic).with_sub_mode(sub_mode));
        assert_eq!(classified.issue, None, "{mnemonic} {sub_mode}");
        classified.entry.to_string()
    }

    #[test]
    fn sub_mode_grammar() {
        let cases = [
            ("", Some(ThumbSubMode::Empty)),
            ("imm5", Some(ThumbSubMode::Imm5)),
            ("r7", Some(ThumbSubMode::Low(7))),
            ("r8", None),
            ("pc,r3", Some(ThumbSubMode::PcRelative(3))),
            ("sp, r0", Some(ThumbSubMode::SpRelative(0))),
            ("lr,r0", None),
            ("complete", Some(ThumbSubMode::Complete)),
            ("imm8", None),
        ];

        for (text, expected) in cases {
            assert_eq!(ThumbSubMode::parse(text), expected, "{text}");
        }
    }

    #[test]
    fn swi_ignores_everything_else() {
        let record = SlotRecord::new("SWI")
            .with_sub_mode("imm")
            .with_class(UNDEFINED_CLASS);
        assert_eq!(
            classify(&record),
            Classified::resolved(DecodeEntry::bare(Executor::ThumbSwi))
        );
    }

    #[test]
    fn undefined_class_fallback() {
        let classified = classify(&SlotRecord::new("undefined").with_class("und"));
        assert_eq!(
            classified,
            Classified::resolved(DecodeEntry::bare(Executor::ThumbUndefined))
        );
    }

    #[test]
    fn alu_and_shift_forms() {
        assert_eq!(rendered("lsr", "imm"), "thumb::thumb_move_shifted_register::<alu::LsrOp>");
        assert_eq!(
            rendered("cmp", "r5"),
            "thumb::thumb_mov_compare_add_subtract_imm::<5, alu::CmpOp>"
        );
        assert_eq!(
            rendered("sub", "imm3"),
            "thumb::thumb_add_subtract::<alu::AddSubtractImm3, alu::SubOp>"
        );
        assert_eq!(
            rendered("add", "reg"),
            "thumb::thumb_add_subtract::<alu::AddSubtractReg3, alu::AddOp>"
        );
        assert_eq!(rendered("neg", "alu"), "thumb::thumb_alu_operation");
        assert_eq!(rendered("mul", "alu"), "thumb::thumb_alu_operation");
        assert_eq!(rendered("mov", "hi"), "thumb::thumb_hi_register_op::<alu::MovOp>");
        assert_eq!(rendered("bx", "hi"), "thumb::thumb_bx");
    }

    #[test]
    fn relative_loads_and_stores() {
        assert_eq!(
            rendered("ldr", "pc,r2"),
            "thumb::thumb_single_data_transfer::<transfer::Ldr, alu::ConstReg<2>, \
             alu::WordAlignedPc, transfer::ThumbImm8ExtendedTo10, transfer::PreIncrement>"
        );
        assert_eq!(
            rendered("str", "sp,r6"),
            "thumb::thumb_single_data_transfer::<transfer::Str, alu::ConstReg<6>, \
             alu::RegValue<13>, transfer::ThumbImm8ExtendedTo10, transfer::PreIncrement>"
        );
        assert_eq!(
            rendered("add", "sp,r1"),
            "thumb::thumb_load_address::<1, alu::RegValue<13>>"
        );
        assert_eq!(
            rendered("add", "pc,r1"),
            "thumb::thumb_load_address::<1, alu::WordAlignedPc>"
        );
        assert_eq!(rendered("add", "sp"), "thumb::thumb_add_sp");
    }

    #[test]
    fn register_and_immediate_offsets() {
        assert_eq!(
            rendered("ldsh", "reg"),
            "thumb::thumb_single_data_transfer::<transfer::Ldrsh, alu::RegAt<0, 2>, \
             alu::RegAtValue<3, 5>, transfer::ThumbRegisterOffset, transfer::PreIncrement>"
        );

        let cases = [
            ("ldr", OffsetStrategy::ThumbImm5ExtendedTo7),
            ("strb", OffsetStrategy::ThumbImm5),
            ("ldrh", OffsetStrategy::ThumbImm5ExtendedTo6),
        ];
        for (mnemonic, offset) in cases {
            let entry = classify(&SlotRecord::new(mnemonic).with_sub_mode("imm5")).entry;
            assert_eq!(entry.executor, Executor::ThumbSingleDataTransfer);
            assert_eq!(entry.parameters[3], ParameterValue::Offset(offset), "{mnemonic}");
        }

        let classified = classify(&SlotRecord::new("ldrsb").with_sub_mode("imm5"));
        assert_eq!(classified.entry, DecodeEntry::inconsistent(ISA));
    }

    #[test]
    fn stack_and_block_transfers() {
        assert_eq!(
            rendered("push", "lr"),
            "thumb::thumb_block_data_transfer::<transfer::Stm, alu::ConstReg<13>, \
             alu::ThumbRegisterListWithLr, transfer::PreDecrement>"
        );
        assert_eq!(
            rendered("pop", ""),
            "thumb::thumb_block_data_transfer::<transfer::Ldm, alu::ConstReg<13>, \
             alu::ThumbRegisterList, transfer::PostIncrement>"
        );
        assert_eq!(
            rendered("pop", "pc"),
            "thumb::thumb_block_data_transfer::<transfer::Ldm, alu::ConstReg<13>, \
             alu::ThumbRegisterListWithPc, transfer::PostIncrement>"
        );
        assert_eq!(
            rendered("stmia", "r4"),
            "thumb::thumb_block_data_transfer::<transfer::Stm, alu::ConstReg<4>, \
             alu::ThumbRegisterList, transfer::PostIncrement>"
        );
    }

    #[test]
    fn conditional_branches() {
        for condition in Condition::BRANCH_CONDITIONS {
            let mnemonic = format!("b{}", condition.name().to_ascii_lowercase());
            assert_eq!(
                classify(&SlotRecord::new(&mnemonic)).entry,
                DecodeEntry::new(
                    Executor::ThumbConditionalBranch,
                    vec![ParameterValue::Condition(condition)]
                )
            );
        }

        assert_eq!(
            rendered("bne", ""),
            "thumb::thumb_conditional_branch::<{ Condition::NE as u32 }>"
        );
        assert_eq!(rendered("b", ""), "thumb::thumb_unconditional_branch");
        assert_eq!(
            classify(&SlotRecord::new("bal")).entry,
            DecodeEntry::unresolved(ISA)
        );
    }

    #[test]
    fn long_branch_halves() {
        assert_eq!(rendered("bl", "setup"), "thumb::thumb_bl_setup");
        assert_eq!(rendered("bl", "complete"), "thumb::thumb_bl_complete");
        assert_eq!(rendered("blx", ""), "thumb::thumb_blx");
        assert_eq!(rendered("bkpt", ""), "thumb::thumb_bkpt");
    }

    #[test]
    fn known_mnemonic_with_bad_sub_mode_is_inconsistent() {
        let classified = classify(&SlotRecord::new("add").with_sub_mode("lr"));

        assert_eq!(classified.entry.to_string(), "thumb::decode_error");
        let issue = classified.issue.expect("diagnostic");
        assert_eq!(issue.kind, DiagnosticKind::Inconsistent);
        assert_eq!(issue.detail, "sub-mode `lr` is not valid for `add`");

        let classified = classify(&SlotRecord::new("bl"));
        assert_eq!(classified.entry, DecodeEntry::inconsistent(ISA));
    }

    #[test]
    fn unknown_mnemonic_is_unresolved() {
        let classified = classify(&SlotRecord::new("cps").with_sub_mode("imm"));

        assert_eq!(classified.entry.to_string(), "thumb::todo");
        assert_eq!(
            classified.issue.map(|issue| issue.kind),
            Some(DiagnosticKind::Unresolved)
        );
    }
}
