use std::{fmt, ops::Deref, str::FromStr};

use non_empty_string::NonEmptyString;

/// A category label a code can be classified into.
///
/// Labels are opaque non-empty strings without surrounding whitespace (e.g.
/// `INF003` or `END011`). Ordering is lexicographic, which gives candidate
/// lists and category sets a stable, reproducible order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Category(NonEmptyString);

impl Category {
    /// Creates a new `Category` from a string.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidCategoryError`] if the string is empty, is only
    /// whitespace, or has leading or trailing whitespace.
    pub fn new(s: String) -> Result<Self, InvalidCategoryError> {
        if s.trim() != s {
            return Err(InvalidCategoryError(s));
        }

        let non_empty = NonEmptyString::new(s.clone()).map_err(|_| InvalidCategoryError(s))?;
        Ok(Self(non_empty))
    }

    /// Returns the string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<String> for Category {
    type Error = InvalidCategoryError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for Category {
    type Error = InvalidCategoryError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value.to_string())
    }
}

impl FromStr for Category {
    type Err = InvalidCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_string())
    }
}

impl AsRef<str> for Category {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl Deref for Category {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.0.as_str()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error returned when a string is not a valid category label.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("Invalid category label '{0}': must be non-empty with no surrounding whitespace")]
pub struct InvalidCategoryError(String);

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test_case("INF003")]
    #[test_case("END011")]
    #[test_case("X"; "single character")]
    fn valid_labels(s: &str) {
        assert_eq!(Category::try_from(s).unwrap().as_str(), s);
    }

    #[test_case(""; "empty")]
    #[test_case("  "; "whitespace only")]
    #[test_case(" INF003"; "leading whitespace")]
    #[test_case("INF003 "; "trailing whitespace")]
    fn invalid_labels(s: &str) {
        assert!(Category::try_from(s).is_err());
    }

    #[test]
    fn ordering_is_lexicographic() {
        let a = Category::try_from("END011").unwrap();
        let b = Category::try_from("INF003").unwrap();
        assert!(a < b);
    }
}
