//! Node label notation.
//!
//! A project names its nodes in exactly one notation: spreadsheet-style
//! letter sequences (`A`, `B`, ..., `Z`, `AA`, ...) or non-negative integers.

use core::fmt;

use crate::error::{TopologyError, TopologyResult};

/// Project-wide node notation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LabelMode {
    /// `[A-Z]+`
    #[default]
    Letters,
    /// `[0-9]+`, leading zeros stripped
    Digits,
}

impl fmt::Display for LabelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LabelMode::Letters => write!(f, "letters"),
            LabelMode::Digits => write!(f, "digits"),
        }
    }
}

/// A normalized node label. Only constructed through [`normalize_label`] or
/// [`next_label`], so it always conforms to its notation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeLabel(String);

impl NodeLabel {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NodeLabel {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Clean and validate a raw label against the notation.
///
/// Letters: trimmed and uppercased, must match `[A-Z]+`.
/// Digits: trimmed, must match `[0-9]+`; leading zeros are stripped and an
/// all-zero string becomes `"0"`.
pub fn normalize_label(raw: &str, mode: LabelMode) -> TopologyResult<NodeLabel> {
    let invalid = || TopologyError::InvalidLabel {
        raw: raw.to_string(),
        mode,
    };
    let trimmed = raw.trim();
    match mode {
        LabelMode::Letters => {
            let upper = trimmed.to_uppercase();
            if upper.is_empty() || !upper.bytes().all(|b| b.is_ascii_uppercase()) {
                return Err(invalid());
            }
            Ok(NodeLabel(upper))
        }
        LabelMode::Digits => {
            if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid());
            }
            let stripped = trimmed.trim_start_matches('0');
            if stripped.is_empty() {
                Ok(NodeLabel("0".to_string()))
            } else {
                Ok(NodeLabel(stripped.to_string()))
            }
        }
    }
}

/// Suggest the label that follows `last`.
///
/// Letters advance like spreadsheet columns (`Z` -> `AA`, `AZ` -> `BA`).
/// Digits increment. Empty or malformed input restarts the sequence.
pub fn next_label(last: &str, mode: LabelMode) -> NodeLabel {
    match normalize_label(last, mode) {
        Err(_) => match mode {
            LabelMode::Letters => NodeLabel("A".to_string()),
            LabelMode::Digits => NodeLabel("1".to_string()),
        },
        Ok(label) => match mode {
            LabelMode::Letters => NodeLabel(next_letters(label.as_str())),
            LabelMode::Digits => NodeLabel(next_digits(label.as_str())),
        },
    }
}

fn next_letters(s: &str) -> String {
    let mut chars: Vec<u8> = s.bytes().collect();
    let mut i = chars.len();
    while i > 0 {
        i -= 1;
        if chars[i] == b'Z' {
            chars[i] = b'A';
        } else {
            chars[i] += 1;
            return String::from_utf8_lossy(&chars).into_owned();
        }
    }
    // every position carried
    chars.insert(0, b'A');
    String::from_utf8_lossy(&chars).into_owned()
}

// Decimal string increment, so labels longer than u64 still advance.
fn next_digits(s: &str) -> String {
    let mut digits: Vec<u8> = s.bytes().collect();
    let mut i = digits.len();
    while i > 0 {
        i -= 1;
        if digits[i] == b'9' {
            digits[i] = b'0';
        } else {
            digits[i] += 1;
            return String::from_utf8_lossy(&digits).into_owned();
        }
    }
    digits.insert(0, b'1');
    String::from_utf8_lossy(&digits).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letters_are_trimmed_and_uppercased() {
        let label = normalize_label("  ab ", LabelMode::Letters).unwrap();
        assert_eq!(label.as_str(), "AB");
    }

    #[test]
    fn letters_reject_digits_and_symbols() {
        for raw in ["", "A1", "A-B", "Ç", "   "] {
            assert!(
                normalize_label(raw, LabelMode::Letters).is_err(),
                "{raw:?} should be rejected"
            );
        }
    }

    #[test]
    fn digits_strip_leading_zeros() {
        assert_eq!(normalize_label("007", LabelMode::Digits).unwrap().as_str(), "7");
        assert_eq!(normalize_label("000", LabelMode::Digits).unwrap().as_str(), "0");
        assert_eq!(normalize_label(" 10 ", LabelMode::Digits).unwrap().as_str(), "10");
    }

    #[test]
    fn digits_reject_letters_and_signs() {
        for raw in ["", "A", "-1", "1.5", "+2"] {
            assert!(normalize_label(raw, LabelMode::Digits).is_err());
        }
    }

    #[test]
    fn invalid_label_reports_input_and_mode() {
        let err = normalize_label("b2", LabelMode::Letters).unwrap_err();
        assert_eq!(
            err,
            TopologyError::InvalidLabel {
                raw: "b2".into(),
                mode: LabelMode::Letters
            }
        );
    }

    #[test]
    fn next_letter_label_carries_like_spreadsheet_columns() {
        let cases = [
            ("", "A"),
            ("A", "B"),
            ("Z", "AA"),
            ("AZ", "BA"),
            ("ZZ", "AAA"),
            ("9", "A"),
        ];
        for (last, expected) in cases {
            assert_eq!(next_label(last, LabelMode::Letters).as_str(), expected);
        }
    }

    #[test]
    fn next_digit_label_increments() {
        assert_eq!(next_label("", LabelMode::Digits).as_str(), "1");
        assert_eq!(next_label("9", LabelMode::Digits).as_str(), "10");
        assert_eq!(next_label("0099", LabelMode::Digits).as_str(), "100");
        assert_eq!(next_label("X", LabelMode::Digits).as_str(), "1");
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn normalized_letters_are_idempotent(raw in "[a-zA-Z]{1,4}") {
            let once = normalize_label(&raw, LabelMode::Letters).unwrap();
            let twice = normalize_label(once.as_str(), LabelMode::Letters).unwrap();
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn digit_labels_match_integer_value(n in 0_u32..1_000_000, zeros in 0_usize..3) {
            let raw = format!("{}{}", "0".repeat(zeros), n);
            let label = normalize_label(&raw, LabelMode::Digits).unwrap();
            prop_assert_eq!(label.as_str(), n.to_string());
        }
    }
}
