//! Repeated-measures column selection.

use std::fmt;

use regex::Regex;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};

use crate::error::{ModelError, Result};

/// Prefix marking a selector string as a regular expression.
pub const REGEX_PREFIX: &str = "regex:";

/// Selects the repeated-measures columns of a wide table.
///
/// A selector is resolved once against the table's column list into an
/// ordered list of names; nothing downstream branches on its shape.
#[derive(Debug, Clone)]
pub enum ColumnSelector {
    /// Columns named explicitly, in the given order.
    Explicit(Vec<String>),
    /// Every column whose name contains a match for the pattern, in table order.
    Pattern(Regex),
}

impl ColumnSelector {
    /// Selects the given columns in order.
    pub fn explicit<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Explicit(columns.into_iter().map(Into::into).collect())
    }

    /// Compiles a pattern selector (without the `regex:` prefix).
    pub fn pattern(pattern: &str) -> Result<Self> {
        Regex::new(pattern)
            .map(Self::Pattern)
            .map_err(|source| ModelError::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            })
    }

    /// Parses a single selector string.
    ///
    /// Strings starting with [`REGEX_PREFIX`] become pattern selectors; any
    /// other string names exactly one column.
    ///
    /// ```
    /// use rma_model::ColumnSelector;
    ///
    /// let selector = ColumnSelector::parse(r"regex:^T\d").unwrap();
    /// assert!(selector.is_pattern());
    /// assert_eq!(selector.to_string(), r"regex:^T\d");
    ///
    /// let single = ColumnSelector::parse("SCORE").unwrap();
    /// assert!(!single.is_pattern());
    /// ```
    pub fn parse(value: &str) -> Result<Self> {
        match value.strip_prefix(REGEX_PREFIX) {
            Some(pattern) => Self::pattern(pattern),
            None => Ok(Self::explicit([value])),
        }
    }

    pub fn is_pattern(&self) -> bool {
        matches!(self, Self::Pattern(_))
    }
}

impl PartialEq for ColumnSelector {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Explicit(a), Self::Explicit(b)) => a == b,
            (Self::Pattern(a), Self::Pattern(b)) => a.as_str() == b.as_str(),
            _ => false,
        }
    }
}

impl fmt::Display for ColumnSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Explicit(columns) => write!(f, "[{}]", columns.join(", ")),
            Self::Pattern(regex) => write!(f, "{REGEX_PREFIX}{}", regex.as_str()),
        }
    }
}

impl From<Vec<String>> for ColumnSelector {
    fn from(columns: Vec<String>) -> Self {
        Self::Explicit(columns)
    }
}

impl From<&[&str]> for ColumnSelector {
    fn from(columns: &[&str]) -> Self {
        Self::explicit(columns.iter().copied())
    }
}

/// Wire form: a list of names or a single (possibly `regex:`) string.
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum SelectorRepr {
    List(Vec<String>),
    Single(String),
}

impl Serialize for ColumnSelector {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let repr = match self {
            Self::Explicit(columns) => SelectorRepr::List(columns.clone()),
            Self::Pattern(regex) => {
                SelectorRepr::Single(format!("{REGEX_PREFIX}{}", regex.as_str()))
            }
        };
        repr.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ColumnSelector {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        match SelectorRepr::deserialize(deserializer)? {
            SelectorRepr::List(columns) => Ok(Self::Explicit(columns)),
            SelectorRepr::Single(value) => Self::parse(&value).map_err(de::Error::custom),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_regex_prefix() {
        let selector = ColumnSelector::parse("regex:T").unwrap();
        match selector {
            ColumnSelector::Pattern(regex) => assert_eq!(regex.as_str(), "T"),
            ColumnSelector::Explicit(_) => panic!("expected pattern selector"),
        }
    }

    #[test]
    fn parse_plain_name_is_single_column() {
        assert_eq!(
            ColumnSelector::parse("T1").unwrap(),
            ColumnSelector::explicit(["T1"])
        );
    }

    #[test]
    fn invalid_pattern_is_rejected() {
        let err = ColumnSelector::parse("regex:(unclosed").unwrap_err();
        assert!(matches!(
            err,
            ModelError::InvalidPattern { ref pattern, .. } if pattern == "(unclosed"
        ));
    }

    #[test]
    fn from_str_slice_preserves_order() {
        let selector = ColumnSelector::from(&["T3", "T1"][..]);
        assert_eq!(selector, ColumnSelector::explicit(["T3", "T1"]));
    }

    #[test]
    fn deserializes_list_and_pattern() {
        let list: ColumnSelector = serde_json::from_str(r#"["T1", "T2"]"#).unwrap();
        assert_eq!(list, ColumnSelector::explicit(["T1", "T2"]));

        let pattern: ColumnSelector = serde_json::from_str(r#""regex:^T\\d""#).unwrap();
        assert_eq!(pattern, ColumnSelector::pattern(r"^T\d").unwrap());
    }

    #[test]
    fn deserialize_reports_bad_pattern() {
        let result: std::result::Result<ColumnSelector, _> = serde_json::from_str(r#""regex:[""#);
        assert!(result.is_err());
    }

    #[test]
    fn serializes_pattern_with_prefix() {
        let selector = ColumnSelector::pattern("^T").unwrap();
        assert_eq!(serde_json::to_string(&selector).unwrap(), r#""regex:^T""#);
    }
}
