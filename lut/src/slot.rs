use serde::{Deserialize, Serialize};

/// Number of slots in the ARM decode table: bits 20-27 and 4-7 of the opcode.
pub const ARM_TABLE_LEN: usize = 4096;

/// Number of slots in the THUMB decode table: bits 6-15 of the opcode.
pub const THUMB_TABLE_LEN: usize = 1024;

/// Class tag for encodings that raise the undefined instruction exception.
pub const UNDEFINED_CLASS: &str = "und";

/// Class tag for `ARMv5` DSP extension encodings, undefined on the ARM7TDMI.
pub const DSP_UNDEFINED_CLASS: &str = "dsp-und";

/// The two instruction sets the decode tables are built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InstructionSet {
    Arm,
    Thumb,
}

impl InstructionSet {
    /// Module the executors of this instruction set live in.
    #[must_use]
    pub const fn module(self) -> &'static str {
        match self {
            Self::Arm => "arm",
            Self::Thumb => "thumb",
        }
    }

    /// Expected number of slots in this instruction set's table.
    #[must_use]
    pub const fn table_len(self) -> usize {
        match self {
            Self::Arm => ARM_TABLE_LEN,
            Self::Thumb => THUMB_TABLE_LEN,
        }
    }
}

impl std::fmt::Display for InstructionSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Arm => f.write_str("ARM"),
            Self::Thumb => f.write_str("THUMB"),
        }
    }
}

/// One position of an instruction set's encoding space, as described by the
/// instruction table data.
///
/// Only `mnemonic` is required. The free-text fields are used for
/// classification and never end up in the generated table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotRecord {
    /// Canonical instruction name, compared case-insensitively.
    #[serde(rename = "name")]
    pub mnemonic: String,

    /// Disambiguates encodings sharing a mnemonic (operand form, register
    /// embedded in the slot, immediate vs register...).
    #[serde(rename = "subname", default)]
    pub sub_mode: String,

    #[serde(rename = "desc", default)]
    pub description: String,

    #[serde(rename = "subdesc", default)]
    pub sub_description: String,

    /// Coarse category tag, e.g. [`UNDEFINED_CLASS`].
    #[serde(rename = "class", default)]
    pub instruction_class: String,
}

impl SlotRecord {
    #[must_use]
    pub fn new(mnemonic: &str) -> Self {
        Self {
            mnemonic: mnemonic.to_owned(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_sub_mode(mut self, sub_mode: &str) -> Self {
        sub_mode.clone_into(&mut self.sub_mode);
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: &str) -> Self {
        description.clone_into(&mut self.description);
        self
    }

    #[must_use]
    pub fn with_sub_description(mut self, sub_description: &str) -> Self {
        sub_description.clone_into(&mut self.sub_description);
        self
    }

    #[must_use]
    pub fn with_class(mut self, instruction_class: &str) -> Self {
        instruction_class.clone_into(&mut self.instruction_class);
        self
    }

    /// Lowercased mnemonic.
    #[must_use]
    pub fn normalized_mnemonic(&self) -> String {
        self.mnemonic.trim().to_ascii_lowercase()
    }

    /// Lowercased sub-mode with surrounding whitespace removed.
    #[must_use]
    pub fn normalized_sub_mode(&self) -> String {
        self.sub_mode.trim().to_ascii_lowercase()
    }

    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.instruction_class.trim().eq_ignore_ascii_case(class)
    }
}

impl std::fmt::Display for SlotRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "name=`{}` subname=`{}` desc=`{}` subdesc=`{}` class=`{}`",
            self.mnemonic,
            self.sub_mode,
            self.description,
            self.sub_description,
            self.instruction_class
        )
    }
}
