//! Addressing modes recovered from the free-text qualifiers of a slot.
//!
//! The instruction table data only describes indexing and offset encodings of
//! single data transfers in prose ("pre-increment", "register offset", ...).
//! All text scanning lives here, behind ordered keyword tables: the first
//! keyword found wins, so longer keywords that contain shorter ones must come
//! first (`arithmetic-right-shifted` before `right-shifted`).

use crate::params::{Indexing, OffsetStrategy, Op2};
use crate::slot::SlotRecord;

/// Indexing keywords with the writeback they imply.
///
/// `positive`/`negative` describe pre-indexed forms without writeback, while
/// the explicit `pre-increment`/`pre-decrement` forms write back.
pub const INDEXING_KEYWORDS: [(&str, Indexing, bool); 6] = [
    ("post-increment", Indexing::PostIncrement, true),
    ("pre-increment", Indexing::PreIncrement, true),
    ("positive", Indexing::PreIncrement, false),
    ("post-decrement", Indexing::PostDecrement, true),
    ("pre-decrement", Indexing::PreDecrement, true),
    ("negative", Indexing::PreDecrement, false),
];

/// Offset keywords of word and byte transfers.
pub const WORD_OFFSET_KEYWORDS: [(&str, OffsetStrategy); 5] = [
    ("immediate", OffsetStrategy::Immediate),
    (
        "arithmetic-right-shifted",
        OffsetStrategy::ShiftedRegister(Op2::AsrImmediate),
    ),
    (
        "right-shifted",
        OffsetStrategy::ShiftedRegister(Op2::LsrImmediate),
    ),
    (
        "left-shifted",
        OffsetStrategy::ShiftedRegister(Op2::LslImmediate),
    ),
    (
        "right-rotated",
        OffsetStrategy::ShiftedRegister(Op2::RorImmediate),
    ),
];

/// Offset keywords of halfword and signed transfers, which only know an
/// immediate and a plain register offset.
pub const HALFWORD_OFFSET_KEYWORDS: [(&str, OffsetStrategy); 2] = [
    ("immediate offset", OffsetStrategy::HalfwordImmediate),
    ("register offset", OffsetStrategy::HalfwordRegister),
];

/// Indexing and writeback of a single data transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexingMode {
    pub indexing: Indexing,
    pub writeback: bool,
}

/// Fully resolved addressing of a single data transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferAddressing {
    pub offset: OffsetStrategy,
    pub indexing: Indexing,
    pub writeback: bool,
}

/// Which keyword table the offset must come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OffsetVocabulary {
    WordOrByte,
    HalfwordOrSigned,
}

impl OffsetVocabulary {
    const fn keywords(self) -> &'static [(&'static str, OffsetStrategy)] {
        match self {
            Self::WordOrByte => &WORD_OFFSET_KEYWORDS,
            Self::HalfwordOrSigned => &HALFWORD_OFFSET_KEYWORDS,
        }
    }
}

/// The scan that failed to find any keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressingScanError {
    Indexing,
    Offset(OffsetVocabulary),
}

impl std::fmt::Display for AddressingScanError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Indexing => f.write_str("no indexing keyword in description"),
            Self::Offset(OffsetVocabulary::WordOrByte) => {
                f.write_str("no word/byte offset keyword in description")
            }
            Self::Offset(OffsetVocabulary::HalfwordOrSigned) => {
                f.write_str("no halfword/signed offset keyword in description")
            }
        }
    }
}

fn scan<T: Copy>(text: &str, keywords: &[(&str, T)]) -> Option<T> {
    let text = text.to_ascii_lowercase();
    keywords
        .iter()
        .find(|(keyword, _)| text.contains(keyword))
        .map(|&(_, value)| value)
}

/// Looks for a keyword in the sub-description, then in the description.
fn scan_record<T: Copy>(record: &SlotRecord, keywords: &[(&str, T)]) -> Option<T> {
    scan(&record.sub_description, keywords).or_else(|| scan(&record.description, keywords))
}

fn indexing_keywords() -> [(&'static str, IndexingMode); 6] {
    INDEXING_KEYWORDS.map(|(keyword, indexing, writeback)| {
        (keyword, IndexingMode { indexing, writeback })
    })
}

#[must_use]
pub fn indexing_from_text(text: &str) -> Option<IndexingMode> {
    let keywords = indexing_keywords();
    scan(text, &keywords)
}

#[must_use]
pub fn offset_from_text(text: &str, vocabulary: OffsetVocabulary) -> Option<OffsetStrategy> {
    scan(text, vocabulary.keywords())
}

/// Resolves the addressing of a single data transfer slot.
///
/// # Errors
///
/// Returns the scan that found no keyword. This points at a defect in the
/// table description rather than at an unmodeled instruction.
pub fn resolve(
    record: &SlotRecord,
    vocabulary: OffsetVocabulary,
) -> Result<TransferAddressing, AddressingScanError> {
    let keywords = indexing_keywords();
    let mode = scan_record(record, &keywords).ok_or(AddressingScanError::Indexing)?;
    let offset = scan_record(record, vocabulary.keywords())
        .ok_or(AddressingScanError::Offset(vocabulary))?;

    Ok(TransferAddressing {
        offset,
        indexing: mode.indexing,
        writeback: mode.writeback,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn indexing_keyword_table() {
        let cases = [
            ("post-increment", Indexing::PostIncrement, true),
            ("pre-increment", Indexing::PreIncrement, true),
            ("positive", Indexing::PreIncrement, false),
            ("post-decrement", Indexing::PostDecrement, true),
            ("pre-decrement", Indexing::PreDecrement, true),
            ("negative", Indexing::PreDecrement, false),
        ];

        for (text, indexing, writeback) in cases {
            assert_eq!(
                indexing_from_text(text),
                Some(IndexingMode {
                    indexing,
                    writeback
                }),
                "{text}"
            );
        }

        assert_eq!(indexing_from_text("register offset"), None);
    }

    #[test]
    fn indexing_first_keyword_in_table_order_wins() {
        // Both keywords present: the table order decides, not the text order.
        assert_eq!(
            indexing_from_text("negative offset, post-increment"),
            Some(IndexingMode {
                indexing: Indexing::PostIncrement,
                writeback: true
            })
        );
        assert_eq!(
            indexing_from_text("Pre-Decrement"),
            Some(IndexingMode {
                indexing: Indexing::PreDecrement,
                writeback: true
            })
        );
    }

    #[test]
    fn word_offset_keyword_table() {
        let cases = [
            ("immediate", OffsetStrategy::Immediate),
            (
                "arithmetic-right-shifted",
                OffsetStrategy::ShiftedRegister(Op2::AsrImmediate),
            ),
            (
                "right-shifted",
                OffsetStrategy::ShiftedRegister(Op2::LsrImmediate),
            ),
            (
                "left-shifted",
                OffsetStrategy::ShiftedRegister(Op2::LslImmediate),
            ),
            (
                "right-rotated",
                OffsetStrategy::ShiftedRegister(Op2::RorImmediate),
            ),
        ];

        for (text, offset) in cases {
            assert_eq!(
                offset_from_text(text, OffsetVocabulary::WordOrByte),
                Some(offset),
                "{text}"
            );
        }

        assert_eq!(
            offset_from_text("register offset", OffsetVocabulary::WordOrByte),
            None
        );
    }

    #[test]
    fn halfword_offset_keyword_table() {
        assert_eq!(
            offset_from_text("immediate offset", OffsetVocabulary::HalfwordOrSigned),
            Some(OffsetStrategy::HalfwordImmediate)
        );
        assert_eq!(
            offset_from_text("register offset", OffsetVocabulary::HalfwordOrSigned),
            Some(OffsetStrategy::HalfwordRegister)
        );
        // Word vocabulary does not leak into the halfword one.
        assert_eq!(
            offset_from_text("left-shifted", OffsetVocabulary::HalfwordOrSigned),
            None
        );
    }

    #[test]
    fn resolve_falls_back_to_description() {
        let record = SlotRecord::new("ldrh")
            .with_description("pre-increment")
            .with_sub_description("register offset");

        assert_eq!(
            resolve(&record, OffsetVocabulary::HalfwordOrSigned),
            Ok(TransferAddressing {
                offset: OffsetStrategy::HalfwordRegister,
                indexing: Indexing::PreIncrement,
                writeback: true,
            })
        );
    }

    #[test]
    fn resolve_reports_the_failing_scan() {
        let record = SlotRecord::new("ldr").with_sub_description("immediate");
        assert_eq!(
            resolve(&record, OffsetVocabulary::WordOrByte),
            Err(AddressingScanError::Indexing)
        );

        let record = SlotRecord::new("ldr").with_sub_description("post-decrement");
        assert_eq!(
            resolve(&record, OffsetVocabulary::WordOrByte),
            Err(AddressingScanError::Offset(OffsetVocabulary::WordOrByte))
        );
    }
}
