use std::{borrow::Borrow, fmt, ops::Deref, str::FromStr};

use non_empty_string::NonEmptyString;

/// The minimum number of characters in a valid code.
///
/// Three characters is the root granularity of the coding scheme: the first
/// three characters of a diagnosis code identify its base classification, and
/// ancestor searches never truncate below this length.
pub const MIN_CODE_LEN: usize = 3;

/// A validated hierarchical diagnosis code.
///
/// A code is a string of ASCII letters and digits, at least
/// [`MIN_CODE_LEN`] characters long. The coding scheme is hierarchical by
/// string prefix: `A4181` is a descendant of `A418`, and codes sharing a
/// prefix are structurally related.
///
/// Codes are compared case-sensitively. Input boundaries (CLI, file readers)
/// are expected to normalize codes to uppercase before constructing a `Code`;
/// the type itself treats the string as opaque.
///
/// Ordering is lexicographic byte order, which makes an ordered map of codes
/// amenable to prefix range scans.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Code(NonEmptyString);

impl Code {
    /// Creates a new `Code` from a string.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidCodeError`] if the string is shorter than
    /// [`MIN_CODE_LEN`] characters or contains characters other than ASCII
    /// letters and digits.
    pub fn new(s: String) -> Result<Self, InvalidCodeError> {
        if s.len() < MIN_CODE_LEN || !s.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(InvalidCodeError(s));
        }

        let non_empty = NonEmptyString::new(s.clone()).map_err(|_| InvalidCodeError(s))?;
        Ok(Self(non_empty))
    }

    /// Returns the string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Returns the first `len` characters of the code.
    ///
    /// # Panics
    ///
    /// Panics if `len` exceeds the code's length.
    #[must_use]
    pub fn prefix(&self, len: usize) -> &str {
        &self.as_str()[..len]
    }

    /// Returns the code without its final character.
    ///
    /// Two codes with equal stems and equal lengths are siblings.
    #[must_use]
    pub fn stem(&self) -> &str {
        &self.as_str()[..self.len() - 1]
    }
}

impl TryFrom<String> for Code {
    type Error = InvalidCodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for Code {
    type Error = InvalidCodeError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value.to_string())
    }
}

impl FromStr for Code {
    type Err = InvalidCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_string())
    }
}

impl AsRef<str> for Code {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl Borrow<str> for Code {
    fn borrow(&self) -> &str {
        self.0.as_str()
    }
}

impl Deref for Code {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.0.as_str()
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error returned when a string is not a valid code.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("Invalid code '{0}': expected at least 3 ASCII alphanumeric characters")]
pub struct InvalidCodeError(String);

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test_case("A000")]
    #[test_case("E1165")]
    #[test_case("C4A")]
    #[test_case("Z99")]
    #[test_case("a01"; "lowercase is accepted, normalization is a boundary concern")]
    fn valid_codes(s: &str) {
        assert_eq!(Code::try_from(s).unwrap().as_str(), s);
    }

    #[test_case(""; "empty")]
    #[test_case("A0"; "too short")]
    #[test_case("A0.1"; "punctuation")]
    #[test_case("A 01"; "whitespace")]
    #[test_case("Å011"; "non ascii")]
    fn invalid_codes(s: &str) {
        assert!(Code::try_from(s).is_err());
    }

    #[test]
    fn prefix_and_stem() {
        let code = Code::try_from("A4181").unwrap();
        assert_eq!(code.prefix(3), "A41");
        assert_eq!(code.stem(), "A418");
        assert_eq!(code.len(), 5);
    }

    #[test]
    fn ordering_is_lexicographic() {
        let a = Code::try_from("A418").unwrap();
        let b = Code::try_from("A4181").unwrap();
        let c = Code::try_from("B20".to_string()).unwrap();
        assert!(a < b);
        assert!(b < c);
    }

    #[test]
    fn error_display() {
        let err = Code::try_from("A0").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid code 'A0': expected at least 3 ASCII alphanumeric characters"
        );
    }
}
