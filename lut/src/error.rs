use std::path::PathBuf;

use thiserror::Error;

use crate::slot::InstructionSet;

/// A slot that contradicts an invariant the classifiers rely on. Unlike a
/// diagnostic this is never papered over with a placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("`{mnemonic}` takes no addressing mode, but the slot has sub-mode `{sub_mode}`")]
    UnexpectedSubMode { mnemonic: String, sub_mode: String },
}

/// A [`DecodeError`] attributed to the slot that raised it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{isa} slot {slot:#05X}: {source}")]
pub struct BuildError {
    pub isa: InstructionSet,
    pub slot: usize,
    #[source]
    pub source: DecodeError,
}

/// Failure to read an instruction table description.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("reading `{}`", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parsing {isa} instruction table")]
    Json {
        isa: InstructionSet,
        #[source]
        source: serde_json::Error,
    },

    #[error("{isa} instruction table has {found} slots, expected {expected}")]
    Length {
        isa: InstructionSet,
        expected: usize,
        found: usize,
    },
}
