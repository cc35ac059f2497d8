//! # Condition Codes
//!
//! THUMB conditional branches carry their condition in the instruction
//! (bits 8-11), and every slot of the decode table that belongs to one of
//! those branches is specialized at build time with the condition it tests.
//! The table description names them by mnemonic (`beq`, `bne`, ...), so the
//! condition is recovered from the two-letter suffix.
//!
//! ```text
//! ┌───────┬────────┬─────────────────────┐
//! │ Code  │ Suffix │     Meaning         │
//! ├───────┼────────┼─────────────────────┤
//! │ 0000  │   EQ   │ Equal               │
//! │ 0001  │   NE   │ Not equal           │
//! │ 0010  │   CS   │ Carry set / ≥ (uns) │
//! │ 0011  │   CC   │ Carry clear / < (u) │
//! │ 0100  │   MI   │ Minus / negative    │
//! │ 0101  │   PL   │ Plus / non-negative │
//! │ 0110  │   VS   │ Overflow set        │
//! │ 0111  │   VC   │ Overflow clear      │
//! │ 1000  │   HI   │ Higher (unsigned)   │
//! │ 1001  │   LS   │ Lower/same (unsig)  │
//! │ 1010  │   GE   │ ≥ (signed)          │
//! │ 1011  │   LT   │ < (signed)          │
//! │ 1100  │   GT   │ > (signed)          │
//! │ 1101  │   LE   │ ≤ (signed)          │
//! │ 1110  │   AL   │ Always              │
//! │ 1111  │   NV   │ Never (reserved)    │
//! └───────┴────────┴─────────────────────┘
//! ```
//!
//! `AL` and `NV` never appear as THUMB branch suffixes: `1110` is undefined
//! and `1111` is the software interrupt.

/// Condition codes tested by conditional instructions.
#[derive(Debug, Eq, PartialEq, Copy, Clone, Hash)]
pub enum Condition {
    /// Equal (Z=1)
    EQ = 0x0,

    /// Not equal (Z=0)
    NE = 0x1,

    /// Carry set / unsigned higher or same (C=1)
    CS = 0x2,

    /// Carry clear / unsigned lower (C=0)
    CC = 0x3,

    /// Minus / negative (N=1)
    MI = 0x4,

    /// Plus / positive or zero (N=0)
    PL = 0x5,

    /// Overflow set (V=1)
    VS = 0x6,

    /// Overflow clear (V=0)
    VC = 0x7,

    /// Unsigned higher (C=1 AND Z=0)
    HI = 0x8,

    /// Unsigned lower or same (C=0 OR Z=1)
    LS = 0x9,

    /// Signed greater or equal (N=V)
    GE = 0xA,

    /// Signed less than (N≠V)
    LT = 0xB,

    /// Signed greater than (Z=0 AND N=V)
    GT = 0xC,

    /// Signed less than or equal (Z=1 OR N≠V)
    LE = 0xD,

    /// Always (unconditional)
    AL = 0xE,

    /// Never (reserved)
    NV = 0xF,
}

impl Condition {
    /// The fourteen conditions a THUMB conditional branch can test.
    pub const BRANCH_CONDITIONS: [Self; 14] = [
        Self::EQ,
        Self::NE,
        Self::CS,
        Self::CC,
        Self::MI,
        Self::PL,
        Self::VS,
        Self::VC,
        Self::HI,
        Self::LS,
        Self::GE,
        Self::LT,
        Self::GT,
        Self::LE,
    ];

    /// Parses a two-letter condition suffix. The suffix is uppercased first,
    /// so `eq`, `Eq` and `EQ` are all accepted.
    #[must_use]
    pub fn from_suffix(suffix: &str) -> Option<Self> {
        let condition = match suffix.to_ascii_uppercase().as_str() {
            "EQ" => Self::EQ,
            "NE" => Self::NE,
            "CS" => Self::CS,
            "CC" => Self::CC,
            "MI" => Self::MI,
            "PL" => Self::PL,
            "VS" => Self::VS,
            "VC" => Self::VC,
            "HI" => Self::HI,
            "LS" => Self::LS,
            "GE" => Self::GE,
            "LT" => Self::LT,
            "GT" => Self::GT,
            "LE" => Self::LE,
            "AL" => Self::AL,
            "NV" => Self::NV,
            _ => return None,
        };

        Some(condition)
    }

    /// Uppercase name as it appears in the generated table.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::EQ => "EQ",
            Self::NE => "NE",
            Self::CS => "CS",
            Self::CC => "CC",
            Self::MI => "MI",
            Self::PL => "PL",
            Self::VS => "VS",
            Self::VC => "VC",
            Self::HI => "HI",
            Self::LS => "LS",
            Self::GE => "GE",
            Self::LT => "LT",
            Self::GT => "GT",
            Self::LE => "LE",
            Self::AL => "AL",
            Self::NV => "NV",
        }
    }
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
