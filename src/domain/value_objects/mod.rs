//! # Value Objects
//!
//! Immutable types with validation and domain semantics.
//!
//! ## Identity Types
//!
//! - [`BuyerId`], [`ProductId`], [`TransactionId`]: opaque string identifiers
//!
//! ## Run Types
//!
//! - [`LoadDate`]: validated `YYYY-MM-DD` date targeting one sync run
//! - [`LoadState`]: lifecycle state machine of a run
//! - [`EntityKind`]: the three synchronized record kinds

pub mod entity_kind;
pub mod ids;
pub mod load_date;
pub mod load_state;

pub use entity_kind::EntityKind;
pub use ids::{BuyerId, ProductId, TransactionId};
pub use load_date::LoadDate;
pub use load_state::LoadState;
