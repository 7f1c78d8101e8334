//! Numeric collation over strings.
//!
//! A [`ComparableString`] orders strings by the big-integer value of
//! their uppercased characters in base 36 (digits then letters), so
//! comparisons, equality, and distances behave numerically rather than
//! lexicographically. Useful as a tree value for string keys that need a
//! magnitude, e.g. hash-derived identifiers.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use num_bigint::BigUint;

use super::node::TreeValue;

/// The collation alphabet; a character's index is its digit value.
const COLLATION_DIGITS: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// A string with a numeric total order.
#[derive(Debug, Clone, Default)]
pub struct ComparableString {
    text: String,
}

impl ComparableString {
    /// Wrap a string; stored uppercased.
    pub fn new(message: &str) -> Self {
        Self {
            text: message.to_uppercase(),
        }
    }

    /// The stored (uppercased) string.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The big-integer collation value. Characters outside the collation
    /// alphabet contribute zero.
    pub fn comparable_value(&self) -> BigUint {
        let base = BigUint::from(COLLATION_DIGITS.len());
        let mut value = BigUint::from(0u8);
        for byte in self.text.bytes() {
            let digit = COLLATION_DIGITS
                .iter()
                .position(|candidate| *candidate == byte)
                .unwrap_or(0);
            value = value * &base + BigUint::from(digit);
        }
        value
    }
}

impl PartialEq for ComparableString {
    fn eq(&self, other: &Self) -> bool {
        self.comparable_value() == other.comparable_value()
    }
}

impl Eq for ComparableString {}

impl PartialOrd for ComparableString {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ComparableString {
    fn cmp(&self, other: &Self) -> Ordering {
        self.comparable_value().cmp(&other.comparable_value())
    }
}

impl fmt::Display for ComparableString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl FromStr for ComparableString {
    type Err = std::convert::Infallible;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(text))
    }
}

impl TreeValue for ComparableString {
    type Distance = BigUint;

    fn distance(&self, other: &Self) -> BigUint {
        let own = self.comparable_value();
        let theirs = other.comparable_value();
        if own > theirs {
            own - theirs
        } else {
            theirs - own
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_ordering() {
        let two = ComparableString::new("2");
        let ten = ComparableString::new("10");
        // Lexicographically "10" < "2", numerically the reverse.
        assert!(two < ten);
        assert!(ten > two);
        assert!(ComparableString::new("Z") < ComparableString::new("10"));
    }

    #[test]
    fn test_case_insensitive_equality() {
        assert_eq!(ComparableString::new("abc"), ComparableString::new("ABC"));
        assert_ne!(ComparableString::new("abd"), ComparableString::new("ABC"));
    }

    #[test]
    fn test_distance() {
        let a = ComparableString::new("A"); // 10
        let f = ComparableString::new("F"); // 15
        assert_eq!(a.distance(&f), BigUint::from(5u8));
        assert_eq!(f.distance(&a), BigUint::from(5u8));
        assert_eq!(a.distance(&a), BigUint::from(0u8));
    }

    #[test]
    fn test_display_and_parse_round_trip() {
        let original = ComparableString::new("Hash42");
        let rendered = original.to_string();
        assert_eq!(rendered, "HASH42");
        let parsed: ComparableString = rendered.parse().unwrap();
        assert_eq!(parsed, original);
    }

    #[test]
    fn test_usable_as_avl_value() {
        let mut tree = crate::collections::AvlTree::new();
        for word in ["banana", "apple", "cherry", "10", "9"] {
            assert!(tree.insert(ComparableString::new(word)));
        }
        let ordered: Vec<String> = tree
            .traverse()
            .map(|value| value.text().to_string())
            .collect();
        assert_eq!(ordered, vec!["9", "10", "APPLE", "BANANA", "CHERRY"]);
    }
}
