//! Typed search parameters produced by the free-text query parser.

use chrono::{NaiveDate, NaiveDateTime};

/// Bound type for range parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound<T> {
    /// Inclusive bound.
    Included(T),
    /// Exclusive bound.
    Excluded(T),
    /// Unbounded (no limit).
    Unbounded,
}

impl<T: PartialOrd> Bound<T> {
    /// Check if a value satisfies this bound as a lower bound.
    pub fn contains_lower(&self, value: &T) -> bool {
        match self {
            Bound::Included(bound) => value >= bound,
            Bound::Excluded(bound) => value > bound,
            Bound::Unbounded => true,
        }
    }

    /// Check if a value satisfies this bound as an upper bound.
    pub fn contains_upper(&self, value: &T) -> bool {
        match self {
            Bound::Included(bound) => value <= bound,
            Bound::Excluded(bound) => value < bound,
            Bound::Unbounded => true,
        }
    }
}

/// One classified word of a free-text query.
///
/// A word yields exactly one parameter kind; classification happens in the
/// parser's fixed priority order. The `rank` is the zero-based position of
/// the word in the query and is retained as data for potential scoring use.
/// It does not drive result ordering.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchQueryParam {
    /// An exact integer value (`124`).
    NumericExact {
        /// The parsed value.
        value: i64,
        /// Word position in the query.
        rank: usize,
    },
    /// An integer range (`124-126`, `<124`, `>124`).
    NumericRange {
        /// Lower bound of the range.
        lower: Bound<i64>,
        /// Upper bound of the range.
        upper: Bound<i64>,
        /// Word position in the query.
        rank: usize,
    },
    /// An exact calendar date (`02.03.2001`).
    DateExact {
        /// The parsed date.
        value: NaiveDate,
        /// Word position in the query.
        rank: usize,
    },
    /// A date range (`02.03.2001-04.03.2001`, `<02.03.2001`, `>02.03.2001`).
    DateRange {
        /// Lower bound of the range.
        lower: Bound<NaiveDateTime>,
        /// Upper bound of the range.
        upper: Bound<NaiveDateTime>,
        /// Word position in the query.
        rank: usize,
    },
    /// A literal text keyword, kept verbatim (fallback kind).
    Text {
        /// The original word.
        value: String,
        /// Word position in the query.
        rank: usize,
    },
}

impl SearchQueryParam {
    /// Get the word position this parameter was parsed from.
    pub fn rank(&self) -> usize {
        match self {
            SearchQueryParam::NumericExact { rank, .. }
            | SearchQueryParam::NumericRange { rank, .. }
            | SearchQueryParam::DateExact { rank, .. }
            | SearchQueryParam::DateRange { rank, .. }
            | SearchQueryParam::Text { rank, .. } => *rank,
        }
    }

    /// Check if this is a numeric parameter (exact or range).
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            SearchQueryParam::NumericExact { .. } | SearchQueryParam::NumericRange { .. }
        )
    }

    /// Check if this is a date parameter (exact or range).
    pub fn is_date(&self) -> bool {
        matches!(
            self,
            SearchQueryParam::DateExact { .. } | SearchQueryParam::DateRange { .. }
        )
    }

    /// Check if this is a literal text parameter.
    pub fn is_text(&self) -> bool {
        matches!(self, SearchQueryParam::Text { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bound_lower() {
        assert!(Bound::Included(10).contains_lower(&10));
        assert!(!Bound::Excluded(10).contains_lower(&10));
        assert!(Bound::Excluded(10).contains_lower(&11));
        assert!(Bound::<i64>::Unbounded.contains_lower(&i64::MIN));
    }

    #[test]
    fn test_bound_upper() {
        assert!(Bound::Included(10).contains_upper(&10));
        assert!(!Bound::Excluded(10).contains_upper(&10));
        assert!(Bound::Excluded(10).contains_upper(&9));
        assert!(Bound::<i64>::Unbounded.contains_upper(&i64::MAX));
    }

    #[test]
    fn test_param_kind_predicates() {
        let param = SearchQueryParam::NumericExact { value: 124, rank: 0 };
        assert!(param.is_numeric());
        assert!(!param.is_date());
        assert!(!param.is_text());
        assert_eq!(param.rank(), 0);

        let param = SearchQueryParam::Text {
            value: "foo-bar".to_string(),
            rank: 3,
        };
        assert!(param.is_text());
        assert_eq!(param.rank(), 3);
    }
}
