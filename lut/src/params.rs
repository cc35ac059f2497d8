//! # Executor Parameters
//!
//! Executors are generic functions; every table slot instantiates one with a
//! fixed list of type and const arguments. Each [`ParameterValue`] renders to
//! exactly the text of one generic argument, e.g.
//!
//! ```text
//! arm::arm_dataproc::<alu::AddOp, S_FLAG_SET, alu::ImmOp2>
//!                     ~~~~~~~~~~  ~~~~~~~~~~  ~~~~~~~~~~~
//!                     AluOp       SetFlags    Op2
//! ```

use std::fmt::{self, Display};


use crate::condition::Condition;

/// ALU operations, both the 16 ARM data processing opcodes and the THUMB only
/// shift/negate/multiply operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AluOp {
    And,
    Eor,
    Sub,
    Rsb,
    Add,
    Adc,
    Sbc,
    Rsc,
    Tst,
    Teq,
    Cmp,
    Cmn,
    Orr,
    Mov,
    Bic,
    Mvn,
    Lsl,
    Lsr,
    Asr,
    Ror,
    Neg,
    Mul,
}

impl AluOp {
    /// The ARM data processing opcodes, in encoding order (bits 21-24).
    pub const DATA_PROCESSING: [Self; 16] = [
        Self::And,
        Self::Eor,
        Self::Sub,
        Self::Rsb,
        Self::Add,
        Self::Adc,
        Self::Sbc,
        Self::Rsc,
        Self::Tst,
        Self::Teq,
        Self::Cmp,
        Self::Cmn,
        Self::Orr,
        Self::Mov,
        Self::Bic,
        Self::Mvn,
    ];

    /// Looks up an ARM data processing opcode by its mnemonic, without the
    /// status flag suffix.
    #[must_use]
    pub fn data_processing(mnemonic: &str) -> Option<Self> {
        Self::DATA_PROCESSING
            .into_iter()
            .find(|op| op.mnemonic() == mnemonic)
    }

    /// Looks up any ALU operation, THUMB only ones included.
    #[must_use]
    pub fn from_mnemonic(mnemonic: &str) -> Option<Self> {
        let op = match mnemonic {
            "lsl" => Self::Lsl,
            "lsr" => Self::Lsr,
            "asr" => Self::Asr,
            "ror" => Self::Ror,
            "neg" => Self::Neg,
            "mul" => Self::Mul,
            _ => return Self::data_processing(mnemonic),
        };
        Some(op)
    }

    #[must_use]
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Self::And => "and",
            Self::Eor => "eor",
            Self::Sub => "sub",
            Self::Rsb => "rsb",
            Self::Add => "add",
            Self::Adc => "adc",
            Self::Sbc => "sbc",
            Self::Rsc => "rsc",
            Self::Tst => "tst",
            Self::Teq => "teq",
            Self::Cmp => "cmp",
            Self::Cmn => "cmn",
            Self::Orr => "orr",
            Self::Mov => "mov",
            Self::Bic => "bic",
            Self::Mvn => "mvn",
            Self::Lsl => "lsl",
            Self::Lsr => "lsr",
            Self::Asr => "asr",
            Self::Ror => "ror",
            Self::Neg => "neg",
            Self::Mul => "mul",
        }
    }

    const fn type_name(self) -> &'static str {
        match self {
            Self::And => "AndOp",
            Self::Eor => "EorOp",
            Self::Sub => "SubOp",
            Self::Rsb => "RsbOp",
            Self::Add => "AddOp",
            Self::Adc => "AdcOp",
            Self::Sbc => "SbcOp",
            Self::Rsc => "RscOp",
            Self::Tst => "TstOp",
            Self::Teq => "TeqOp",
            Self::Cmp => "CmpOp",
            Self::Cmn => "CmnOp",
            Self::Orr => "OrrOp",
            Self::Mov => "MovOp",
            Self::Bic => "BicOp",
            Self::Mvn => "MvnOp",
            Self::Lsl => "LslOp",
            Self::Lsr => "LsrOp",
            Self::Asr => "AsrOp",
            Self::Ror => "RorOp",
            Self::Neg => "NegOp",
            Self::Mul => "MulOp",
        }
    }
}

/// How the second ALU operand is decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op2 {
    /// 8-bit immediate rotated right by twice the 4-bit rotate field.
    Immediate,
    LslImmediate,
    LslRegister,
    LsrImmediate,
    LsrRegister,
    AsrImmediate,
    AsrRegister,
    RorImmediate,
    RorRegister,
}

impl Op2 {
    pub const ALL: [Self; 9] = [
        Self::Immediate,
        Self::LslImmediate,
        Self::LslRegister,
        Self::LsrImmediate,
        Self::LsrRegister,
        Self::AsrImmediate,
        Self::AsrRegister,
        Self::RorImmediate,
        Self::RorRegister,
    ];

    /// Parses the data processing sub-mode (`imm`, `lli`, `llr`, ...).
    #[must_use]
    pub fn from_sub_mode(sub_mode: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op2| op2.sub_mode() == sub_mode)
    }

    #[must_use]
    pub const fn sub_mode(self) -> &'static str {
        match self {
            Self::Immediate => "imm",
            Self::LslImmediate => "lli",
            Self::LslRegister => "llr",
            Self::LsrImmediate => "lri",
            Self::LsrRegister => "lrr",
            Self::AsrImmediate => "ari",
            Self::AsrRegister => "arr",
            Self::RorImmediate => "rri",
            Self::RorRegister => "rrr",
        }
    }

    const fn type_name(self) -> &'static str {
        match self {
            Self::Immediate => "ImmOp2",
            Self::LslImmediate => "LliOp2",
            Self::LslRegister => "LlrOp2",
            Self::LsrImmediate => "LriOp2",
            Self::LsrRegister => "LrrOp2",
            Self::AsrImmediate => "AriOp2",
            Self::AsrRegister => "ArrOp2",
            Self::RorImmediate => "RriOp2",
            Self::RorRegister => "RrrOp2",
        }
    }
}

/// What a load/store executor moves between registers and memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransferOp {
    /// `user_mode` is set by the `T` variants, which force a user mode access
    /// from a privileged mode.
    Ldr { user_mode: bool },
    Ldrb { user_mode: bool },
    Str { user_mode: bool },
    Strb { user_mode: bool },
    Ldrh,
    Strh,
    Ldrsb,
    Ldrsh,
    Ldm,
    Stm,
}

impl TransferOp {
    const fn type_name(self) -> &'static str {
        match self {
            Self::Ldr { .. } => "Ldr",
            Self::Ldrb { .. } => "Ldrb",
            Self::Str { .. } => "Str",
            Self::Strb { .. } => "Strb",
            Self::Ldrh => "Ldrh",
            Self::Strh => "Strh",
            Self::Ldrsb => "Ldrsb",
            Self::Ldrsh => "Ldrsh",
            Self::Ldm => "Ldm",
            Self::Stm => "Stm",
        }
    }

    const fn forces_user_mode(self) -> bool {
        match self {
            Self::Ldr { user_mode }
            | Self::Ldrb { user_mode }
            | Self::Str { user_mode }
            | Self::Strb { user_mode } => user_mode,
            _ => false,
        }
    }
}

/// Offset decoding for single data transfers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OffsetStrategy {
    /// ARM 12-bit immediate.
    Immediate,
    /// ARM register offsets reuse the operand 2 shifters.
    ShiftedRegister(Op2),
    HalfwordImmediate,
    HalfwordRegister,
    ThumbImm8ExtendedTo10,
    ThumbImm5,
    ThumbImm5ExtendedTo6,
    ThumbImm5ExtendedTo7,
    ThumbRegister,
}

/// Whether the base address is adjusted before or after the access, and in
/// which direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Indexing {
    PreIncrement,
    PreDecrement,
    PostIncrement,
    PostDecrement,
}

impl Indexing {
    const fn type_name(self) -> &'static str {
        match self {
            Self::PreIncrement => "PreIncrement",
            Self::PreDecrement => "PreDecrement",
            Self::PostIncrement => "PostIncrement",
            Self::PostDecrement => "PostDecrement",
        }
    }
}

/// Program status register targeted by `MRS`/`MSR`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Psr {
    Cpsr,
    Spsr,
}

/// Operand extraction strategies used by THUMB executors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThumbOperand {
    /// The register number itself.
    ConstReg(u8),
    /// The value held by a fixed register.
    RegValue(u8),
    /// The register number at bits `start..=end`.
    RegAt { start: u8, end: u8 },
    /// The value of the register at bits `start..=end`.
    RegAtValue { start: u8, end: u8 },
    WordAlignedPc,
    AddSubtractImm3,
    AddSubtractReg3,
    RegisterList,
    RegisterListWithLr,
    RegisterListWithPc,
}

/// One generic argument of an executor instantiation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParameterValue {
    AluOp(AluOp),
    SetFlags(bool),
    Op2(Op2),
    Transfer(TransferOp),
    Offset(OffsetStrategy),
    Indexing(Indexing),
    Writeback(bool),
    Psr(Psr),
    Accumulate(bool),
    Signed(bool),
    Byte(bool),
    Register(u8),
    Operand(ThumbOperand),
    Condition(Condition),
    /// Stands in for a parameter whose source text was not recognized.
    Unknown(String),
}

impl Display for ParameterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AluOp(op) => write!(f, "alu::{}", op.type_name()),
            Self::SetFlags(true) => f.write_str("S_FLAG_SET"),
            Self::SetFlags(false) => f.write_str("S_FLAG_CLR"),
            Self::Op2(op2) => write!(f, "alu::{}", op2.type_name()),
            Self::Transfer(op) => {
                if op.forces_user_mode() {
                    write!(f, "transfer::{}<true>", op.type_name())
                } else {
                    write!(f, "transfer::{}", op.type_name())
                }
            }
            Self::Offset(offset) => Display::fmt(offset, f),
            Self::Indexing(indexing) => write!(f, "transfer::{}", indexing.type_name()),
            Self::Psr(Psr::Cpsr) => f.write_str("alu::Cpsr"),
            Self::Psr(Psr::Spsr) => f.write_str("alu::Spsr"),
            Self::Writeback(value)
            | Self::Accumulate(value)
            | Self::Signed(value)
            | Self::Byte(value) => write!(f, "{value}"),
            Self::Register(register) => write!(f, "{register}"),
            Self::Operand(operand) => Display::fmt(operand, f),
            Self::Condition(condition) => write!(f, "{{ Condition::{condition} as u32 }}"),
            Self::Unknown(_) => f.write_str("UnknownParameter"),
        }
    }
}

impl Display for OffsetStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Immediate => f.write_str("transfer::SDTImmOffset"),
            Self::ShiftedRegister(op2) => write!(f, "alu::{}", op2.type_name()),
            Self::HalfwordImmediate => f.write_str("transfer::HalfwordAndSignedImmOffset"),
            Self::HalfwordRegister => f.write_str("transfer::HalfwordAndSignedRegOffset"),
            Self::ThumbImm8ExtendedTo10 => f.write_str("transfer::ThumbImm8ExtendedTo10"),
            Self::ThumbImm5 => f.write_str("transfer::ThumbImm5"),
            Self::ThumbImm5ExtendedTo6 => f.write_str("transfer::ThumbImm5ExtendedTo6"),
            Self::ThumbImm5ExtendedTo7 => f.write_str("transfer::ThumbImm5ExtendedTo7"),
            Self::ThumbRegister => f.write_str("transfer::ThumbRegisterOffset"),
        }
    }
}

impl Display for ThumbOperand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConstReg(register) => write!(f, "alu::ConstReg<{register}>"),
            Self::RegValue(register) => write!(f, "alu::RegValue<{register}>"),
            Self::RegAt { start, end } => write!(f, "alu::RegAt<{start}, {end}>"),
            Self::RegAtValue { start, end } => write!(f, "alu::RegAtValue<{start}, {end}>"),
            Self::WordAlignedPc => f.write_str("alu::WordAlignedPc"),
            Self::AddSubtractImm3 => f.write_str("alu::AddSubtractImm3"),
            Self::AddSubtractReg3 => f.write_str("alu::AddSubtractReg3"),
            Self::RegisterList => f.write_str("alu::ThumbRegisterList"),
            Self::RegisterListWithLr => f.write_str("alu::ThumbRegisterListWithLr"),
            Self::RegisterListWithPc => f.write_str("alu::ThumbRegisterListWithPc"),
        }
    }
}
