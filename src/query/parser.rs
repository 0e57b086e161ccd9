//! Free-text query parser.
//!
//! Splits a query into whitespace-separated words and classifies each word
//! into exactly one [`SearchQueryParam`] kind. Classification runs through a
//! fixed, ordered chain of parse functions; the first one that accepts the
//! word wins. Parsing never fails: a word no chain entry accepts degrades to
//! a literal text parameter kept verbatim, including any hyphens.
//!
//! Chain order (most specific first):
//!
//! 1. date range (`D1-D2`)
//! 2. numeric range (`N1-N2`)
//! 3. less-than date (`<D`)
//! 4. greater-than date (`>D`)
//! 5. exact date (`D`)
//! 6. less-than numeric (`<N`)
//! 7. greater-than numeric (`>N`)
//! 8. exact numeric (`N`)
//! 9. literal text (fallback)

use crate::query::datetime;
use crate::query::param::{Bound, SearchQueryParam};

/// A word classifier: returns the parameter when it accepts the word.
type ParamParser = fn(word: &str, rank: usize) -> Option<SearchQueryParam>;

/// The classification chain, evaluated in priority order.
const PARSER_CHAIN: &[ParamParser] = &[
    parse_date_range,
    parse_numeric_range,
    parse_date_less,
    parse_date_greater,
    parse_date_exact,
    parse_numeric_less,
    parse_numeric_greater,
    parse_numeric_exact,
];

/// A parsed free-text query: the ordered list of classified parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    params: Vec<SearchQueryParam>,
}

impl SearchQuery {
    /// Parse a free-text query into typed parameters.
    ///
    /// Words are split on whitespace; the rank of each parameter is the
    /// zero-based position of its word. This never fails.
    pub fn parse(text: &str) -> Self {
        let params = text
            .split_whitespace()
            .enumerate()
            .map(|(rank, word)| classify(word, rank))
            .collect();

        SearchQuery { params }
    }

    /// Check if the query contained no words at all.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Get all parsed parameters in word order.
    pub fn params(&self) -> &[SearchQueryParam] {
        &self.params
    }

    /// Get the numeric parameters (exact and range), in word order.
    pub fn numeric_params(&self) -> impl Iterator<Item = &SearchQueryParam> {
        self.params.iter().filter(|p| p.is_numeric())
    }

    /// Get the date parameters (exact and range), in word order.
    pub fn date_params(&self) -> impl Iterator<Item = &SearchQueryParam> {
        self.params.iter().filter(|p| p.is_date())
    }

    /// Get the literal text parameters, in word order.
    pub fn text_params(&self) -> impl Iterator<Item = &SearchQueryParam> {
        self.params.iter().filter(|p| p.is_text())
    }
}

/// Offer a word to the chain; fall back to a literal text parameter.
fn classify(word: &str, rank: usize) -> SearchQueryParam {
    for parser in PARSER_CHAIN {
        if let Some(param) = parser(word, rank) {
            return param;
        }
    }

    SearchQueryParam::Text {
        value: word.to_string(),
        rank,
    }
}

/// Split a word at its single interior hyphen, if it has exactly one.
///
/// A word qualifies as a range candidate only when it contains exactly one
/// hyphen and that hyphen is neither the first nor the last character. Both
/// sides must then independently parse as the same type; otherwise the word
/// stays literal text (`foo-bar`).
fn split_range_candidate(word: &str) -> Option<(&str, &str)> {
    let mut hyphens = word.match_indices('-');
    let (pos, _) = hyphens.next()?;
    if hyphens.next().is_some() {
        return None;
    }
    if pos == 0 || pos == word.len() - 1 {
        return None;
    }

    Some((&word[..pos], &word[pos + 1..]))
}

fn parse_date_range(word: &str, rank: usize) -> Option<SearchQueryParam> {
    let (from, to) = split_range_candidate(word)?;
    let lower = datetime::parse_date_time(from)?;
    let upper = datetime::parse_date_time(to)?;

    Some(SearchQueryParam::DateRange {
        lower: Bound::Included(lower),
        upper: Bound::Included(upper),
        rank,
    })
}

fn parse_numeric_range(word: &str, rank: usize) -> Option<SearchQueryParam> {
    let (from, to) = split_range_candidate(word)?;
    let lower = from.parse::<i64>().ok()?;
    let upper = to.parse::<i64>().ok()?;

    Some(SearchQueryParam::NumericRange {
        lower: Bound::Included(lower),
        upper: Bound::Included(upper),
        rank,
    })
}

fn parse_date_less(word: &str, rank: usize) -> Option<SearchQueryParam> {
    let value = datetime::parse_date_time(word.strip_prefix('<')?)?;

    Some(SearchQueryParam::DateRange {
        lower: Bound::Unbounded,
        upper: Bound::Excluded(value),
        rank,
    })
}

fn parse_date_greater(word: &str, rank: usize) -> Option<SearchQueryParam> {
    let value = datetime::parse_date_time(word.strip_prefix('>')?)?;

    Some(SearchQueryParam::DateRange {
        lower: Bound::Excluded(value),
        upper: Bound::Unbounded,
        rank,
    })
}

fn parse_date_exact(word: &str, rank: usize) -> Option<SearchQueryParam> {
    let value = datetime::parse_date(word)?;

    Some(SearchQueryParam::DateExact { value, rank })
}

fn parse_numeric_less(word: &str, rank: usize) -> Option<SearchQueryParam> {
    let value = word.strip_prefix('<')?.parse::<i64>().ok()?;

    Some(SearchQueryParam::NumericRange {
        lower: Bound::Unbounded,
        upper: Bound::Excluded(value),
        rank,
    })
}

fn parse_numeric_greater(word: &str, rank: usize) -> Option<SearchQueryParam> {
    let value = word.strip_prefix('>')?.parse::<i64>().ok()?;

    Some(SearchQueryParam::NumericRange {
        lower: Bound::Excluded(value),
        upper: Bound::Unbounded,
        rank,
    })
}

fn parse_numeric_exact(word: &str, rank: usize) -> Option<SearchQueryParam> {
    let value = word.parse::<i64>().ok()?;

    Some(SearchQueryParam::NumericExact { value, rank })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::datetime::parse_date_time;

    fn single(text: &str) -> SearchQueryParam {
        let query = SearchQuery::parse(text);
        assert_eq!(query.params().len(), 1, "expected one param for {text:?}");
        query.params()[0].clone()
    }

    #[test]
    fn test_numeric_exact() {
        assert_eq!(
            single("124"),
            SearchQueryParam::NumericExact { value: 124, rank: 0 }
        );
    }

    #[test]
    fn test_numeric_less_is_exclusive() {
        let param = single("<124");
        match param {
            SearchQueryParam::NumericRange { lower, upper, .. } => {
                assert_eq!(lower, Bound::Unbounded);
                assert_eq!(upper, Bound::Excluded(124));
                assert!(upper.contains_upper(&123));
                assert!(!upper.contains_upper(&124));
            }
            other => panic!("unexpected param: {other:?}"),
        }
    }

    #[test]
    fn test_numeric_greater_is_exclusive() {
        let param = single(">124");
        match param {
            SearchQueryParam::NumericRange { lower, upper, .. } => {
                assert_eq!(upper, Bound::Unbounded);
                assert_eq!(lower, Bound::Excluded(124));
                assert!(lower.contains_lower(&125));
                assert!(!lower.contains_lower(&124));
            }
            other => panic!("unexpected param: {other:?}"),
        }
    }

    #[test]
    fn test_numeric_range_is_inclusive() {
        let param = single("124-126");
        match param {
            SearchQueryParam::NumericRange { lower, upper, .. } => {
                assert_eq!(lower, Bound::Included(124));
                assert_eq!(upper, Bound::Included(126));
                assert!(lower.contains_lower(&124));
                assert!(upper.contains_upper(&126));
                assert!(!upper.contains_upper(&127));
            }
            other => panic!("unexpected param: {other:?}"),
        }
    }

    #[test]
    fn test_date_exact() {
        let param = single("02.03.2001");
        match param {
            SearchQueryParam::DateExact { value, rank } => {
                assert_eq!(value.to_string(), "2001-03-02");
                assert_eq!(rank, 0);
            }
            other => panic!("unexpected param: {other:?}"),
        }
    }

    #[test]
    fn test_date_range() {
        let param = single("02.03.2001-04.03.2001");
        match param {
            SearchQueryParam::DateRange { lower, upper, .. } => {
                assert_eq!(lower, Bound::Included(parse_date_time("02.03.2001").unwrap()));
                assert_eq!(upper, Bound::Included(parse_date_time("04.03.2001").unwrap()));
            }
            other => panic!("unexpected param: {other:?}"),
        }
    }

    #[test]
    fn test_date_less_and_greater() {
        match single("<02.03.2001") {
            SearchQueryParam::DateRange { lower, upper, .. } => {
                assert_eq!(lower, Bound::Unbounded);
                assert_eq!(upper, Bound::Excluded(parse_date_time("02.03.2001").unwrap()));
            }
            other => panic!("unexpected param: {other:?}"),
        }

        match single(">02.03.2001") {
            SearchQueryParam::DateRange { lower, upper, .. } => {
                assert_eq!(lower, Bound::Excluded(parse_date_time("02.03.2001").unwrap()));
                assert_eq!(upper, Bound::Unbounded);
            }
            other => panic!("unexpected param: {other:?}"),
        }
    }

    #[test]
    fn test_hyphenated_word_stays_text() {
        assert_eq!(
            single("foo-bar"),
            SearchQueryParam::Text {
                value: "foo-bar".to_string(),
                rank: 0
            }
        );
    }

    #[test]
    fn test_mixed_sides_stay_text() {
        // One side date, other side number: not a range of either type.
        assert_eq!(
            single("02.03.2001-124"),
            SearchQueryParam::Text {
                value: "02.03.2001-124".to_string(),
                rank: 0
            }
        );

        assert_eq!(
            single("124-bar"),
            SearchQueryParam::Text {
                value: "124-bar".to_string(),
                rank: 0
            }
        );
    }

    #[test]
    fn test_multiple_hyphens_stay_text() {
        assert_eq!(
            single("1-2-3"),
            SearchQueryParam::Text {
                value: "1-2-3".to_string(),
                rank: 0
            }
        );
    }

    #[test]
    fn test_edge_hyphens_stay_text() {
        assert!(single("-124").is_numeric(), "leading minus parses as i64");
        assert_eq!(
            single("124-"),
            SearchQueryParam::Text {
                value: "124-".to_string(),
                rank: 0
            }
        );
    }

    #[test]
    fn test_unparsable_operator_stays_text() {
        assert_eq!(
            single("<foo"),
            SearchQueryParam::Text {
                value: "<foo".to_string(),
                rank: 0
            }
        );
    }

    #[test]
    fn test_ranks_are_monotonic() {
        let query = SearchQuery::parse("firstname middlename lastname 123");
        let ranks: Vec<usize> = query.params().iter().map(|p| p.rank()).collect();
        assert_eq!(ranks, vec![0, 1, 2, 3]);

        assert_eq!(query.text_params().count(), 3);
        assert_eq!(query.numeric_params().count(), 1);
    }

    #[test]
    fn test_empty_query() {
        assert!(SearchQuery::parse("").is_empty());
        assert!(SearchQuery::parse("   ").is_empty());
        assert!(!SearchQuery::parse("x").is_empty());
    }

    #[test]
    fn test_non_latin_words() {
        let query = SearchQuery::parse("Проверяющий Тест Тестович");
        assert_eq!(query.text_params().count(), 3);
    }
}
