//! # ARM Classifier
//!
//! Maps one ARM slot record to its executor. The mnemonic is first reduced to
//! an [`ArmFamily`], then each family resolves its own parameters:
//!
//! | Family              | Mnemonics                               | Parameters                                 |
//! |---------------------|-----------------------------------------|--------------------------------------------|
//! | Branch              | `b bl`                                  | none, sub-mode must be empty               |
//! | Data processing     | `and eor ... mvn` (+`s`)                | `[AluOp, SetFlags, Op2]`                   |
//! | Single data transfer| `ldr str ldrb strb` (+`t`)              | `[Transfer, Offset, Indexing, Writeback]`  |
//! | Halfword transfer   | `ldrh strh ldrsb ldrsh`                 | `[Transfer, Offset, Indexing, Writeback]`  |
//! | Block data transfer | `ldm stm` + `da ia db ib`               | `[Transfer, Indexing, SetFlags, Writeback]`|
//! | PSR transfer        | `mrs msr`                               | `[Psr]` / `[Psr, Op2]`                     |
//! | Multiply            | `mul mla umull umlal smull smlal` (+`s`)| `[(Signed,) SetFlags, Accumulate]`         |
//! | Fixed               | `swi bx blx bkpt clz swp swpb` + coproc | none or `[Byte]`                           |
//!
//! Slots no family claims fall back on their class tag, then on the generic
//! unresolved placeholder.

use crate::addressing::{self, OffsetVocabulary};
use crate::diagnostics::Issue;
use crate::entry::{Classified, DecodeEntry, Executor};
use crate::error::DecodeError;
use crate::params::{AluOp, Indexing, Op2, ParameterValue, Psr, TransferOp};
use crate::slot::{DSP_UNDEFINED_CLASS, InstructionSet, SlotRecord, UNDEFINED_CLASS};

const ISA: InstructionSet = InstructionSet::Arm;

/// Instruction family, derived from the mnemonic alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArmFamily {
    Branch {
        link: bool,
    },
    DataProcessing {
        op: AluOp,
        set_flags: bool,
    },
    SingleDataTransfer(TransferOp),
    HalfwordTransfer(TransferOp),
    /// `indexing` is `None` when the mnemonic suffix is not one of the four
    /// addressing modes.
    BlockDataTransfer {
        op: TransferOp,
        indexing: Option<Indexing>,
    },
    Mrs,
    Msr,
    Multiply {
        set_flags: bool,
        accumulate: bool,
    },
    MultiplyLong {
        signed: bool,
        set_flags: bool,
        accumulate: bool,
    },
    Swap {
        byte: bool,
    },
    /// Executors taking no parameters.
    Fixed(Executor),
}

impl ArmFamily {
    /// Returns `None` for mnemonics no family claims. Expects a normalized
    /// (trimmed, lowercase) mnemonic.
    #[must_use]
    pub fn from_mnemonic(mnemonic: &str) -> Option<Self> {
        let family = match mnemonic {
            "b" => Self::Branch { link: false },
            "bl" => Self::Branch { link: true },
            "ldrh" => Self::HalfwordTransfer(TransferOp::Ldrh),
            "strh" => Self::HalfwordTransfer(TransferOp::Strh),
            "ldrsb" => Self::HalfwordTransfer(TransferOp::Ldrsb),
            "ldrsh" => Self::HalfwordTransfer(TransferOp::Ldrsh),
            "mrs" => Self::Mrs,
            "msr" => Self::Msr,
            "swp" => Self::Swap { byte: false },
            "swpb" => Self::Swap { byte: true },
            "swi" => Self::Fixed(Executor::ArmSwi),
            "bx" => Self::Fixed(Executor::ArmBx),
            "blx" => Self::Fixed(Executor::ArmBlx),
            "bkpt" => Self::Fixed(Executor::ArmBkpt),
            "clz" => Self::Fixed(Executor::ArmClz),
            "cdp" | "ldc" | "stc" | "mrc" | "mcr" => Self::Fixed(Executor::ArmCoprocessor),
            _ => {
                return data_processing(mnemonic)
                    .or_else(|| single_data_transfer(mnemonic))
                    .or_else(|| block_data_transfer(mnemonic))
                    .or_else(|| multiply(mnemonic));
            }
        };
        Some(family)
    }
}

fn data_processing(mnemonic: &str) -> Option<ArmFamily> {
    if let Some(op) = AluOp::data_processing(mnemonic) {
        return Some(ArmFamily::DataProcessing {
            op,
            set_flags: false,
        });
    }

    let op = AluOp::data_processing(mnemonic.strip_suffix('s')?)?;
    Some(ArmFamily::DataProcessing {
        op,
        set_flags: true,
    })
}

fn single_data_transfer(mnemonic: &str) -> Option<ArmFamily> {
    let (base, user_mode) = match mnemonic.strip_suffix('t') {
        Some(base @ ("ldr" | "str" | "ldrb" | "strb")) => (base, true),
        _ => (mnemonic, false),
    };

    let op = match base {
        "ldr" => TransferOp::Ldr { user_mode },
        "str" => TransferOp::Str { user_mode },
        "ldrb" => TransferOp::Ldrb { user_mode },
        "strb" => TransferOp::Strb { user_mode },
        _ => return None,
    };
    Some(ArmFamily::SingleDataTransfer(op))
}

fn block_data_transfer(mnemonic: &str) -> Option<ArmFamily> {
    let (op, suffix) = match (mnemonic.strip_prefix("ldm"), mnemonic.strip_prefix("stm")) {
        (Some(suffix), _) => (TransferOp::Ldm, suffix),
        (None, Some(suffix)) => (TransferOp::Stm, suffix),
        (None, None) => return None,
    };

    let indexing = match suffix {
        "da" => Some(Indexing::PostDecrement),
        "ia" => Some(Indexing::PostIncrement),
        "db" => Some(Indexing::PreDecrement),
        "ib" => Some(Indexing::PreIncrement),
        _ => None,
    };
    Some(ArmFamily::BlockDataTransfer { op, indexing })
}

fn multiply(mnemonic: &str) -> Option<ArmFamily> {
    const SHORT: [&str; 2] = ["mul", "mla"];
    const LONG: [&str; 4] = ["umull", "umlal", "smull", "smlal"];

    let is_multiply = |m: &str| SHORT.contains(&m) || LONG.contains(&m);
    let (base, set_flags) = match mnemonic.strip_suffix('s') {
        Some(base) if is_multiply(base) => (base, true),
        _ if is_multiply(mnemonic) => (mnemonic, false),
        _ => return None,
    };

    let accumulate = base.contains("la");
    if SHORT.contains(&base) {
        Some(ArmFamily::Multiply {
            set_flags,
            accumulate,
        })
    } else {
        Some(ArmFamily::MultiplyLong {
            signed: base.starts_with('s'),
            set_flags,
            accumulate,
        })
    }
}

/// Classifies one ARM slot.
///
/// # Errors
///
/// Fails only on a record that breaks an invariant of the table data: a
/// branch carrying a sub-mode. Everything else resolves, possibly to a
/// placeholder with an [`Issue`].
pub fn classify(record: &SlotRecord) -> Result<Classified, DecodeError> {
    let mnemonic = record.normalized_mnemonic();
    let sub_mode = record.normalized_sub_mode();

    let Some(family) = ArmFamily::from_mnemonic(&mnemonic) else {
        return Ok(fallback(record));
    };

    let classified = match family {
        ArmFamily::Branch { link } => branch_entry(link, &mnemonic, record)?,
        ArmFamily::DataProcessing { op, set_flags } => {
            data_processing_entry(op, set_flags, &sub_mode)
        }
        ArmFamily::SingleDataTransfer(op) => transfer_entry(
            Executor::ArmSingleDataTransfer,
            op,
            record,
            OffsetVocabulary::WordOrByte,
        ),
        ArmFamily::HalfwordTransfer(op) => transfer_entry(
            Executor::ArmHalfwordTransfer,
            op,
            record,
            OffsetVocabulary::HalfwordOrSigned,
        ),
        ArmFamily::BlockDataTransfer { op, indexing } => {
            block_transfer_entry(&mnemonic, op, indexing, &sub_mode)
        }
        ArmFamily::Mrs => psr_entry(&mnemonic, &sub_mode),
        ArmFamily::Msr => msr_entry(&sub_mode),
        ArmFamily::Multiply {
            set_flags,
            accumulate,
        } => multiply_entry(None, set_flags, accumulate),
        ArmFamily::MultiplyLong {
            signed,
            set_flags,
            accumulate,
        } => multiply_entry(Some(signed), set_flags, accumulate),
        ArmFamily::Swap { byte } => Classified::resolved(DecodeEntry::new(
            Executor::ArmSwap,
            vec![ParameterValue::Byte(byte)],
        )),
        ArmFamily::Fixed(executor) => Classified::resolved(DecodeEntry::bare(executor)),
    };

    Ok(classified)
}

fn branch_entry(
    link: bool,
    mnemonic: &str,
    record: &SlotRecord,
) -> Result<Classified, DecodeError> {
    if !record.normalized_sub_mode().is_empty() {
        return Err(DecodeError::UnexpectedSubMode {
            mnemonic: mnemonic.to_owned(),
            sub_mode: record.sub_mode.clone(),
        });
    }

    let executor = if link {
        Executor::ArmBranchLink
    } else {
        Executor::ArmBranch
    };
    Ok(Classified::resolved(DecodeEntry::bare(executor)))
}

/// `signed` is only present for the long multiplies.
fn multiply_entry(signed: Option<bool>, set_flags: bool, accumulate: bool) -> Classified {
    let executor = if signed.is_some() {
        Executor::ArmMultiplyLong
    } else {
        Executor::ArmMultiply
    };
    let parameters = signed
        .map(ParameterValue::Signed)
        .into_iter()
        .chain([
            ParameterValue::SetFlags(set_flags),
            ParameterValue::Accumulate(accumulate),
        ])
        .collect();

    Classified::resolved(DecodeEntry::new(executor, parameters))
}

fn data_processing_entry(op: AluOp, set_flags: bool, sub_mode: &str) -> Classified {
    let head = [ParameterValue::AluOp(op), ParameterValue::SetFlags(set_flags)];

    match Op2::from_sub_mode(sub_mode) {
        Some(op2) => Classified::resolved(DecodeEntry::new(
            Executor::ArmDataProcessing,
            head.into_iter().chain([ParameterValue::Op2(op2)]).collect(),
        )),
        // The executor is known, only the operand decoding is not: keep it and
        // let the sentinel argument fail the emulator build.
        None => Classified::with_issue(
            DecodeEntry::new(
                Executor::ArmDataProcessing,
                head.into_iter()
                    .chain([ParameterValue::Unknown(sub_mode.to_owned())])
                    .collect(),
            ),
            Issue::inconsistent(format!(
                "unknown operand 2 sub-mode `{sub_mode}` for `{}`",
                op.mnemonic()
            )),
        ),
    }
}

fn transfer_entry(
    executor: Executor,
    op: TransferOp,
    record: &SlotRecord,
    vocabulary: OffsetVocabulary,
) -> Classified {
    match addressing::resolve(record, vocabulary) {
        Ok(addressing) => Classified::resolved(DecodeEntry::new(
            executor,
            vec![
                ParameterValue::Transfer(op),
                ParameterValue::Offset(addressing.offset),
                ParameterValue::Indexing(addressing.indexing),
                ParameterValue::Writeback(addressing.writeback),
            ],
        )),
        Err(scan) => Classified::inconsistent(ISA, scan.to_string()),
    }
}

fn block_transfer_entry(
    mnemonic: &str,
    op: TransferOp,
    indexing: Option<Indexing>,
    sub_mode: &str,
) -> Classified {
    let Some(indexing) = indexing else {
        return Classified::inconsistent(
            ISA,
            format!("unknown block transfer addressing mode in `{mnemonic}`"),
        );
    };

    Classified::resolved(DecodeEntry::new(
        Executor::ArmBlockDataTransfer,
        vec![
            ParameterValue::Transfer(op),
            ParameterValue::Indexing(indexing),
            ParameterValue::SetFlags(sub_mode.contains('^')),
            ParameterValue::Writeback(sub_mode.contains('!')),
        ],
    ))
}

fn parse_psr(text: &str) -> Option<Psr> {
    match text.trim() {
        "cpsr" => Some(Psr::Cpsr),
        "spsr" => Some(Psr::Spsr),
        _ => None,
    }
}

fn psr_entry(mnemonic: &str, sub_mode: &str) -> Classified {
    match parse_psr(sub_mode) {
        Some(psr) => Classified::resolved(DecodeEntry::new(
            Executor::ArmMrs,
            vec![ParameterValue::Psr(psr)],
        )),
        None => Classified::inconsistent(
            ISA,
            format!("unknown status register `{sub_mode}` for `{mnemonic}`"),
        ),
    }
}

fn msr_entry(sub_mode: &str) -> Classified {
    let parsed = sub_mode.split_once(',').and_then(|(psr, source)| {
        let op2 = match source.trim() {
            "reg" => Op2::LslImmediate,
            "imm" => Op2::Immediate,
            _ => return None,
        };
        Some((parse_psr(psr)?, op2))
    });

    match parsed {
        Some((psr, op2)) => Classified::resolved(DecodeEntry::new(
            Executor::ArmMsr,
            vec![ParameterValue::Psr(psr), ParameterValue::Op2(op2)],
        )),
        None => Classified::inconsistent(ISA, format!("unknown sub-mode `{sub_mode}` for `msr`")),
    }
}

fn fallback(record: &SlotRecord) -> Classified {
    if record.has_class(UNDEFINED_CLASS) {
        return Classified::resolved(DecodeEntry::bare(Executor::ArmUndefined));
    }
    if record.has_class(DSP_UNDEFINED_CLASS) {
        return Classified::resolved(DecodeEntry::bare(Executor::ArmDspUndefined));
    }

    Classified::unresolved(
        ISA,
        format!(
            "no rule for mnemonic `{}` sub-mode `{}` desc `{}` subdesc `{}`",
            record.mnemonic, record.sub_mode, record.description, record.sub_description
        ),
    )
}
