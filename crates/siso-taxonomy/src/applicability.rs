//! # Applicability Expressions
//!
//! Domain lists declare which kinds they apply to with a compact expression
//! such as `"1,3-5"`. Expansion keeps first-seen token order and expands each
//! range low to high:
//!
//! - `"1,3-5"` → `[1, 3, 4, 5]`
//! - a token that is not a number counts as `0`
//! - a range uses its first two bounds; if the upper bound is below the lower
//!   one, only the upper bound is produced
//! - an absent or empty expression yields `[]`
//! - an ascending range whose upper bound does not fit the 8-bit kind field
//!   is an [`ApplicabilityError`]
//!
//! The same handful of expressions recur on many rows, so expansions are
//! cached by their exact source text for as long as the expander lives.

use std::collections::HashMap;

use siso_core::Field;
use thiserror::Error;

/// An applicability expression that cannot be expanded.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApplicabilityError {
    #[error("applicability range {token:?} exceeds kind maximum {max}")]
    RangeTooWide { token: String, max: u64 },
}

/// Expand an applicability expression without caching.
pub fn parse_applicability(expression: &str) -> Result<Vec<u32>, ApplicabilityError> {
    let mut values = Vec::new();
    if expression.is_empty() {
        return Ok(values);
    }

    for token in expression.split(',') {
        let bounds: Vec<u32> = token.split('-').map(parse_bound).collect();
        match bounds.as_slice() {
            [single] => values.push(*single),
            [min, max, ..] => {
                if min <= max && u64::from(*max) > Field::Kind.max() {
                    return Err(ApplicabilityError::RangeTooWide {
                        token: token.trim().to_string(),
                        max: Field::Kind.max(),
                    });
                }
                values.extend(*min..*max);
                values.push(*max);
            }
            [] => {}
        }
    }
    Ok(values)
}

fn parse_bound(text: &str) -> u32 {
    text.trim().parse().unwrap_or(0)
}

/// Caching expander for applicability expressions.
#[derive(Debug, Default)]
pub struct ApplicabilityExpander {
    cache: HashMap<String, Vec<u32>>,
}

impl ApplicabilityExpander {
    /// Create an expander with an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Expand `expression`, reusing a previous expansion of the same text.
    ///
    /// Rejected expressions are not cached.
    pub fn expand(&mut self, expression: Option<&str>) -> Result<&[u32], ApplicabilityError> {
        let Some(expression) = expression.filter(|e| !e.is_empty()) else {
            return Ok(&[]);
        };
        if !self.cache.contains_key(expression) {
            let values = parse_applicability(expression)?;
            self.cache.insert(expression.to_string(), values);
        }
        Ok(self.cache.get(expression).map(Vec::as_slice).unwrap_or(&[]))
    }

    /// Number of distinct expressions cached so far.
    pub fn cached_expressions(&self) -> usize {
        self.cache.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_and_range() {
        assert_eq!(parse_applicability("1,3-5").unwrap(), vec![1, 3, 4, 5]);
    }

    #[test]
    fn test_single_values_keep_order() {
        assert_eq!(parse_applicability("9,2,7").unwrap(), vec![9, 2, 7]);
    }

    #[test]
    fn test_empty_expression() {
        assert!(parse_applicability("").unwrap().is_empty());
        let mut expander = ApplicabilityExpander::new();
        assert!(expander.expand(None).unwrap().is_empty());
        assert!(expander.expand(Some("")).unwrap().is_empty());
        assert_eq!(expander.cached_expressions(), 0);
    }

    #[test]
    fn test_non_numeric_tokens_are_zero() {
        assert_eq!(parse_applicability("a,2").unwrap(), vec![0, 2]);
        assert_eq!(parse_applicability("1,,2").unwrap(), vec![1, 0, 2]);
        assert_eq!(parse_applicability("x-2").unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn test_descending_range_yields_upper_bound() {
        assert_eq!(parse_applicability("5-3").unwrap(), vec![3]);
    }

    #[test]
    fn test_degenerate_range() {
        assert_eq!(parse_applicability("4-4").unwrap(), vec![4]);
        assert_eq!(parse_applicability("1-3-9").unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_range_beyond_kind_field_rejected() {
        let err = parse_applicability("1,0-4294967295").unwrap_err();
        assert_eq!(
            err,
            ApplicabilityError::RangeTooWide { token: "0-4294967295".to_string(), max: 255 }
        );
        assert!(parse_applicability("3-256").is_err());
        assert_eq!(parse_applicability("0-255").unwrap().len(), 256);
        // Descending ranges yield a single value, however large.
        assert_eq!(parse_applicability("9-300").unwrap(), vec![300]);
    }

    #[test]
    fn test_rejected_expression_not_cached() {
        let mut expander = ApplicabilityExpander::new();
        assert!(expander.expand(Some("1-70000")).is_err());
        assert!(expander.expand(Some("1-70000")).is_err());
        assert_eq!(expander.cached_expressions(), 0);
    }

    #[test]
    fn test_whitespace_tolerated() {
        assert_eq!(parse_applicability(" 1 , 3 - 4 ").unwrap(), vec![1, 3, 4]);
    }

    #[test]
    fn test_cache_by_exact_text() {
        let mut expander = ApplicabilityExpander::new();
        assert_eq!(expander.expand(Some("1-2")).unwrap(), &[1, 2]);
        assert_eq!(expander.expand(Some("1-2")).unwrap(), &[1, 2]);
        assert_eq!(expander.cached_expressions(), 1);
        assert_eq!(expander.expand(Some("1 - 2")).unwrap(), &[1, 2]);
        assert_eq!(expander.cached_expressions(), 2);
    }
}
