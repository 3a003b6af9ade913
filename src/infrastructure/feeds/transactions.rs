//! # Transaction Feed Parser
//!
//! Decodes the transaction feed's NUL-delimited wire format.
//!
//! The feed separates fields with single NUL bytes and records with double
//! NULs. Normalizing every NUL to a pipe turns the body into records
//! separated by the `||` sentinel, each holding exactly five `|`-separated
//! fields:
//!
//! ```text
//! #<transaction-id>|<buyer-id>|<ip>|<device>|[<product-id>,...]
//! ```
//!
//! The leading `#` on the id and the brackets around the product list are
//! framing artifacts and are dropped. Records that are empty or do not have
//! exactly five fields are skipped silently — one mangled record never
//! poisons the batch.
//!
//! # Examples
//!
//! ```
//! use restaurant_sync::domain::value_objects::LoadDate;
//! use restaurant_sync::infrastructure::feeds::transactions::parse_transactions;
//!
//! let date = LoadDate::parse("2020-08-17").unwrap();
//! let parsed = parse_transactions("#TX1|B1|10.0.0.1|ios|[P1,P2]", date);
//!
//! assert_eq!(parsed.len(), 1);
//! assert_eq!(parsed[0].transaction_id().as_str(), "TX1");
//! assert_eq!(parsed[0].products().len(), 2);
//! ```

use crate::domain::entities::Transaction;
use crate::domain::value_objects::{BuyerId, LoadDate, ProductId, TransactionId};

/// Record separator after NUL normalization.
const RECORD_SENTINEL: &str = "||";

/// Field separator after NUL normalization.
const FIELD_SEPARATOR: char = '|';

/// Parses a raw transaction feed body into transactions for `date`.
///
/// Malformed records are dropped; this function cannot fail and never
/// panics, whatever bytes the feed serves.
#[must_use]
pub fn parse_transactions(raw: &str, date: LoadDate) -> Vec<Transaction> {
    let normalized = raw.replace('\0', "|");
    normalized
        .split(RECORD_SENTINEL)
        .filter_map(|record| parse_record(record, date))
        .collect()
}

fn parse_record(record: &str, date: LoadDate) -> Option<Transaction> {
    if record.is_empty() {
        return None;
    }

    let fields: Vec<&str> = record.split(FIELD_SEPARATOR).collect();
    let &[raw_id, buyer_id, ip, device, raw_products] = fields.as_slice() else {
        return None;
    };

    Some(Transaction::new(
        TransactionId::new(strip_first(raw_id)),
        BuyerId::new(buyer_id),
        ip,
        device,
        parse_product_list(raw_products),
        date,
    ))
}

/// Drops the `#` framing prefix (whatever the first character is).
fn strip_first(s: &str) -> &str {
    let mut chars = s.chars();
    chars.next();
    chars.as_str()
}

/// Strips the bracket framing and splits the interior on commas.
fn parse_product_list(raw: &str) -> Vec<ProductId> {
    let mut chars = raw.chars();
    chars.next();
    chars.next_back();
    let interior = chars.as_str();

    if interior.is_empty() {
        return Vec::new();
    }
    interior.split(',').map(ProductId::new).collect()
}
