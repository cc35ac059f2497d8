//! Renders decode tables as the Rust source of the emulator's lookup module.

use std::fmt::Write as _;

use crate::builder::DecodeTables;
use crate::entry::DecodeTable;

/// Imports, decode helpers and constants every generated file starts with.
pub const PREAMBLE: &str = r"// GENERATED BY lutgen, DO NOT EDIT.
use super::cpu::InstrFn;
use super::{alu, arm, thumb};
use crate::condition::Condition;
use crate::transfer;
use util::bits::BitOps as _;

pub fn decode_arm_opcode(opcode: u32) -> InstrFn {
    let opcode_row = opcode.get_bit_range(20..=27);
    let opcode_col = opcode.get_bit_range(4..=7);
    let opcode_idx = (opcode_row * 16) + opcode_col;
    ARM_OPCODE_TABLE[opcode_idx as usize]
}

pub fn decode_thumb_opcode(opcode: u32) -> InstrFn {
    let opcode_idx = opcode.get_bit_range(6..=15);
    THUMB_OPCODE_TABLE[opcode_idx as usize]
}

pub const S_FLAG_SET: bool = true;
pub const S_FLAG_CLR: bool = false;
";

pub const ARM_TABLE_NAME: &str = "ARM_OPCODE_TABLE";
pub const THUMB_TABLE_NAME: &str = "THUMB_OPCODE_TABLE";

/// Renders one table as a `pub const` array, one entry per line.
#[must_use]
pub fn render_table(name: &str, table: &DecodeTable) -> String {
    let mut out = format!("\npub const {name}: [InstrFn; {}] = [\n", table.len());
    for entry in table {
        // Writing to a String cannot fail.
        let _ = writeln!(out, "    {entry},");
    }
    out.push_str("];\n");
    out
}

/// Renders the whole generated module.
#[must_use]
pub fn render(tables: &DecodeTables) -> String {
    let mut out = String::from(PREAMBLE);
    out.push_str(&render_table(ARM_TABLE_NAME, &tables.arm));
    out.push_str(&render_table(THUMB_TABLE_NAME, &tables.thumb));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::{DecodeEntry, Executor};
    use crate::params::ParameterValue;
    use crate::slot::InstructionSet;
    use pretty_assertions::assert_eq;

    #[test]
    fn one_entry_per_line() {
        let table = DecodeTable::from(vec![
            DecodeEntry::bare(Executor::ArmSwi),
            DecodeEntry::new(Executor::ArmSwap, vec![ParameterValue::Byte(true)]),
            DecodeEntry::unresolved(InstructionSet::Arm),
        ]);

        assert_eq!(
            render_table("ARM_OPCODE_TABLE", &table),
            "\npub const ARM_OPCODE_TABLE: [InstrFn; 3] = [\n    \
             arm::arm_swi,\n    \
             arm::arm_swp::<true>,\n    \
             arm::todo,\n\
             ];\n"
        );
    }

    #[test]
    fn empty_table() {
        assert_eq!(
            render_table("THUMB_OPCODE_TABLE", &DecodeTable::default()),
            "\npub const THUMB_OPCODE_TABLE: [InstrFn; 0] = [\n];\n"
        );
    }

    #[test]
    fn module_starts_with_preamble_and_orders_tables() {
        let tables = DecodeTables {
            arm: DecodeTable::from(vec![DecodeEntry::bare(Executor::ArmBx)]),
            thumb: DecodeTable::from(vec![DecodeEntry::bare(Executor::ThumbBx)]),
            ..DecodeTables::default()
        };

        let rendered = render(&tables);

        assert!(rendered.starts_with(PREAMBLE));
        let arm = rendered.find("pub const ARM_OPCODE_TABLE").unwrap();
        let thumb = rendered.find("pub const THUMB_OPCODE_TABLE").unwrap();
        assert!(arm < thumb);
        assert!(rendered.ends_with("    thumb::thumb_bx,\n];\n"));
    }
}
