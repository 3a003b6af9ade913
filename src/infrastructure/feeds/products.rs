//! # Product Feed Parser
//!
//! Decodes the product feed's apostrophe-delimited line format.
//!
//! Each line is `id'name'price`. Names containing apostrophes would shift
//! the segment positions, so the feed wraps such names in double quotes:
//!
//! ```text
//! c89db54f'"Campbell's minestrone italian style slow simmered soup"'8841
//! ```
//!
//! When a line contains a double quote, the name is the text strictly
//! between the first and last `"` of the line and the price is the last
//! apostrophe segment. Either way, the literal `&quot;` entity inside a
//! name decodes to an apostrophe.
//!
//! Failure granularity is uneven on purpose: malformed lines and unusable
//! names are skipped one by one, but a price that fails to decode rejects
//! the whole batch.
//!
//! # Examples
//!
//! ```
//! use restaurant_sync::domain::value_objects::LoadDate;
//! use restaurant_sync::infrastructure::feeds::products::parse_products;
//!
//! let date = LoadDate::parse("2020-08-17").unwrap();
//! let parsed = parse_products("abc1'\"O'Brien's Sauce\"'499", date).unwrap();
//!
//! assert_eq!(parsed.len(), 1);
//! assert_eq!(parsed[0].name(), "O'Brien's Sauce");
//! assert_eq!(parsed[0].price().to_string(), "499");
//! ```

use crate::domain::entities::Product;
use crate::domain::value_objects::{LoadDate, ProductId};
use crate::infrastructure::feeds::error::{ParseError, ParseResult};
use rust_decimal::Decimal;
use std::collections::HashSet;

/// Field delimiter of the product feed.
const DELIMITER: char = '\'';

/// Name value the upstream feed uses for absent names.
const NULL_NAME: &str = "null";

/// Parses a raw product feed body into products for `date`.
///
/// Lines with fewer than three segments, empty or `"null"` names, or ids
/// already accepted earlier in the batch are dropped silently (first
/// occurrence wins).
///
/// # Errors
///
/// Returns [`ParseError::Price`] as soon as any line's price fails to
/// decode; no products are produced from a batch with a bad price.
pub fn parse_products(raw: &str, date: LoadDate) -> ParseResult<Vec<Product>> {
    let mut products = Vec::new();
    let mut accepted_ids: HashSet<&str> = HashSet::new();

    for line in raw.lines() {
        if line.is_empty() {
            continue;
        }

        let segments: Vec<&str> = line.split(DELIMITER).collect();
        if segments.len() < 3 {
            continue;
        }
        let (Some(id), Some(plain_name), Some(last_segment)) =
            (segments.first(), segments.get(1), segments.last())
        else {
            continue;
        };

        let (raw_name, price_text) = if line.contains('"') {
            (quoted_name(line).unwrap_or_default(), *last_segment)
        } else {
            (*plain_name, segments.get(2).copied().unwrap_or_default())
        };

        let price: Decimal = price_text
            .parse()
            .map_err(|e: rust_decimal::Error| ParseError::price(price_text, e.to_string()))?;

        let name = raw_name.replace("&quot;", "'");
        if name.is_empty() || name == NULL_NAME {
            continue;
        }
        if !accepted_ids.insert(id) {
            continue;
        }

        products.push(Product::new(ProductId::new(*id), name, price, date));
    }

    Ok(products)
}

/// Returns the text strictly between the first and last `"` of the line.
///
/// `None` when the quotes are unpaired; the caller treats that as an empty
/// name, which drops the line.
fn quoted_name(line: &str) -> Option<&str> {
    let first = line.find('"')?;
    let last = line.rfind('"')?;
    line.get(first + 1..last)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn date() -> LoadDate {
        LoadDate::parse("2020-08-17").unwrap()
    }

    mod plain_lines {
        use super::*;

        #[test]
        fn parses_id_name_price() {
            let parsed = parse_products("a1b2'Ham sandwich'8841", date()).unwrap();
            assert_eq!(parsed.len(), 1);
            assert_eq!(parsed[0].product_id().as_str(), "a1b2");
            assert_eq!(parsed[0].name(), "Ham sandwich");
            assert_eq!(parsed[0].price(), Decimal::from(8841));
            assert_eq!(parsed[0].date(), date());
        }

        #[test]
        fn parses_multiple_lines_in_order() {
            let raw = "p1'First'100\np2'Second'200\np3'Third'300";
            let parsed = parse_products(raw, date()).unwrap();
            let ids: Vec<&str> = parsed.iter().map(|p| p.product_id().as_str()).collect();
            assert_eq!(ids, vec!["p1", "p2", "p3"]);
        }

        #[test]
        fn decimal_prices_keep_exact_scale() {
            let parsed = parse_products("p1'Espresso'12.50", date()).unwrap();
            assert_eq!(parsed[0].price().to_string(), "12.50");
        }

        #[test]
        fn blank_lines_are_ignored() {
            let parsed = parse_products("\np1'One'1\n\n", date()).unwrap();
            assert_eq!(parsed.len(), 1);
        }
    }

    mod quoted_names {
        use super::*;

        #[test]
        fn quote_rule_preserves_internal_apostrophes() {
            let parsed = parse_products("abc1'\"O'Brien's Sauce\"'499", date()).unwrap();
            assert_eq!(parsed.len(), 1);
            assert_eq!(parsed[0].product_id().as_str(), "abc1");
            assert_eq!(parsed[0].name(), "O'Brien's Sauce");
            assert_eq!(parsed[0].price(), Decimal::from(499));
        }

        #[test]
        fn upstream_sample_line() {
            let raw = "c89db54f'\"Campbell's minestrone italian style slow simmered soup\"'8841";
            let parsed = parse_products(raw, date()).unwrap();
            assert_eq!(
                parsed[0].name(),
                "Campbell's minestrone italian style slow simmered soup"
            );
            assert_eq!(parsed[0].price(), Decimal::from(8841));
        }

        #[test]
        fn price_is_last_segment_in_quoted_branch() {
            // The name's apostrophes create extra segments; the price is
            // still the final one.
            let parsed = parse_products("p1'\"day's 'special' deal\"'750", date()).unwrap();
            assert_eq!(parsed[0].name(), "day's 'special' deal");
            assert_eq!(parsed[0].price(), Decimal::from(750));
        }

        #[test]
        fn quot_entity_decodes_to_apostrophe() {
            let parsed = parse_products("p1'Grandma&quot;s pie'42", date()).unwrap();
            assert_eq!(parsed[0].name(), "Grandma's pie");
        }

        #[test]
        fn unpaired_quote_drops_the_line() {
            let parsed = parse_products("p1'broken\"name'10\np2'Fine'20", date()).unwrap();
            assert_eq!(parsed.len(), 1);
            assert_eq!(parsed[0].product_id().as_str(), "p2");
        }
    }

    mod dropped_lines {
        use super::*;

        #[test]
        fn short_lines_are_skipped_without_error() {
            let raw = "not-enough-segments\np1'Kept'10";
            let parsed = parse_products(raw, date()).unwrap();
            assert_eq!(parsed.len(), 1);
            assert_eq!(parsed[0].product_id().as_str(), "p1");
        }

        #[test]
        fn empty_names_are_dropped() {
            let parsed = parse_products("p1''10", date()).unwrap();
            assert!(parsed.is_empty());
        }

        #[test]
        fn null_names_are_dropped() {
            let parsed = parse_products("p1'null'10", date()).unwrap();
            assert!(parsed.is_empty());
        }

        #[test]
        fn repeated_ids_keep_first_occurrence() {
            let raw = "p1'First'10\np1'Second'20\np2'Other'30";
            let parsed = parse_products(raw, date()).unwrap();
            assert_eq!(parsed.len(), 2);
            assert_eq!(parsed[0].name(), "First");
            assert_eq!(parsed[1].product_id().as_str(), "p2");
        }
    }

    mod price_failures {
        use super::*;

        #[test]
        fn bad_price_aborts_the_whole_batch() {
            let raw = "p1'Fine'10\np2'Broken'abc\np3'Never reached'30";
            let err = parse_products(raw, date()).unwrap_err();
            assert!(matches!(err, ParseError::Price { .. }));
        }

        #[test]
        fn price_error_names_the_offending_text() {
            let err = parse_products("p1'X'4O4", date()).unwrap_err();
            assert!(err.to_string().contains("4O4"));
        }

        #[test]
        fn price_is_checked_even_for_lines_that_would_be_dropped() {
            // Acceptance checks come after price decoding.
            let err = parse_products("p1'null'not-a-price", date()).unwrap_err();
            assert!(matches!(err, ParseError::Price { .. }));
        }
    }

    mod properties {
        use super::*;

        proptest! {
            #[test]
            fn never_panics_on_arbitrary_input(raw in ".*") {
                let _ = parse_products(&raw, date());
            }

            #[test]
            fn plain_lines_always_parse(
                id in "[a-z0-9]{1,10}",
                name in "[A-Z][A-Za-z ]{0,20}",
                price in 0u64..1_000_000,
            ) {
                let raw = format!("{id}'{name}'{price}");
                let parsed = parse_products(&raw, date()).unwrap();
                prop_assert_eq!(parsed.len(), 1);
                prop_assert_eq!(parsed[0].price(), Decimal::from(price));
            }
        }
    }
}
