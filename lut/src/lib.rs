//! Decode table compiler for the ARM7TDMI.
//!
//! Every distinct ARM (4096) and THUMB (1024) opcode slot is described by a
//! [`SlotRecord`]. The classifiers turn each record into a [`DecodeEntry`]
//! naming the executor that runs the slot and the generic arguments that
//! specialize it, and the builder lays those entries out in slot order.
//!
//! ```
//! use lut::{SlotRecord, builder};
//!
//! let arm = [SlotRecord::new("adds").with_sub_mode("imm")];
//! let tables = builder::build(&arm, &[]).unwrap();
//!
//! assert_eq!(
//!     tables.arm[0].to_string(),
//!     "arm::arm_dataproc::<alu::AddOp, S_FLAG_SET, alu::ImmOp2>"
//! );
//! ```

pub mod addressing;
pub mod arm;
pub mod builder;
pub mod condition;
pub mod diagnostics;
pub mod entry;
pub mod error;
pub mod params;
pub mod render;
pub mod slot;
pub mod source;
pub mod thumb;

pub use builder::{DecodeTables, build};
pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
pub use entry::{Classified, DecodeEntry, DecodeTable, Executor};
pub use error::{BuildError, DecodeError, LoadError};
pub use params::ParameterValue;
pub use slot::{
    ARM_TABLE_LEN, DSP_UNDEFINED_CLASS, InstructionSet, SlotRecord, THUMB_TABLE_LEN,
    UNDEFINED_CLASS,
};
