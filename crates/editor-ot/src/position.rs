//! Offset conversion between UTF-16 code units (editor positions) and Unicode
//! code points (text-unicode positions).
//!
//! Both conversions scan from the start of the text and clamp at its end, so
//! boundary offsets such as "insert at end of document" resolve to the text's
//! length instead of failing.

use crate::CodecError;

/// Convert a UTF-16 offset into a code point offset within `text`.
pub fn utf16_to_code_point(text: &str, utf16_offset: usize) -> usize {
    let mut code_points = 0;
    let mut utf16_index = 0;
    for ch in text.chars() {
        if utf16_index >= utf16_offset {
            break;
        }
        utf16_index += ch.len_utf16();
        code_points += 1;
    }
    code_points
}

/// Convert a code point offset into a UTF-16 offset within `text`.
pub fn code_point_to_utf16(text: &str, code_point_offset: usize) -> usize {
    text.chars().take(code_point_offset).map(char::len_utf16).sum()
}

pub fn utf16_len(text: &str) -> usize {
    text.chars().map(char::len_utf16).sum()
}

pub fn code_point_len(text: &str) -> usize {
    text.chars().count()
}

/// A document viewed as UTF-16 code units, the way editing surfaces index it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Utf16Doc {
    units: Vec<u16>,
}

impl Utf16Doc {
    pub fn new(text: &str) -> Self {
        Self { units: text.encode_utf16().collect() }
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    fn check_range(&self, from: usize, to: usize) -> Result<(), CodecError> {
        if from > to || to > self.units.len() {
            return Err(CodecError::OutOfBounds { from, to, len: self.units.len() });
        }
        Ok(())
    }

    /// The text between UTF-16 offsets `from` and `to`.
    pub fn slice(&self, from: usize, to: usize) -> Result<String, CodecError> {
        self.check_range(from, to)?;
        String::from_utf16(&self.units[from..to]).map_err(|_| CodecError::SplitSurrogate(from))
    }

    /// Replace the UTF-16 range `from..to` with `text`.
    pub fn splice(&mut self, from: usize, to: usize, text: &str) -> Result<(), CodecError> {
        self.check_range(from, to)?;
        self.units.splice(from..to, text.encode_utf16());
        Ok(())
    }

    pub fn to_string_checked(&self) -> Result<String, CodecError> {
        String::from_utf16(&self.units).map_err(|_| {
            let at = self
                .units
                .iter()
                .position(|u| (0xD800..=0xDFFF).contains(u))
                .unwrap_or(0);
            CodecError::SplitSurrogate(at)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROCKET: &str = "a🚀b";

    #[test]
    fn ascii_offsets_are_identical() {
        for i in 0..=5 {
            assert_eq!(utf16_to_code_point("hello", i), i);
            assert_eq!(code_point_to_utf16("hello", i), i);
        }
    }

    #[test]
    fn astral_characters_take_two_units() {
        assert_eq!(utf16_len(ROCKET), 4);
        assert_eq!(code_point_len(ROCKET), 3);
        assert_eq!(utf16_to_code_point(ROCKET, 1), 1);
        assert_eq!(utf16_to_code_point(ROCKET, 3), 2);
        assert_eq!(utf16_to_code_point(ROCKET, 4), 3);
        assert_eq!(code_point_to_utf16(ROCKET, 2), 3);
        assert_eq!(code_point_to_utf16(ROCKET, 3), 4);
    }

    #[test]
    fn offsets_inside_a_surrogate_pair_round_up() {
        assert_eq!(utf16_to_code_point(ROCKET, 2), 2);
    }

    #[test]
    fn out_of_range_offsets_clamp_to_length() {
        assert_eq!(utf16_to_code_point(ROCKET, 100), 3);
        assert_eq!(code_point_to_utf16(ROCKET, 100), 4);
        assert_eq!(utf16_to_code_point("", 3), 0);
    }

    #[test]
    fn doc_slice_and_splice() {
        let mut doc = Utf16Doc::new("Hello 🚀 World");
        assert_eq!(doc.slice(6, 8).unwrap(), "🚀");
        assert_eq!(doc.slice(6, 7), Err(CodecError::SplitSurrogate(6)));
        assert!(matches!(doc.slice(0, 100), Err(CodecError::OutOfBounds { .. })));
        doc.splice(6, 8, "x").unwrap();
        assert_eq!(doc.to_string_checked().unwrap(), "Hello x World");
    }
}
