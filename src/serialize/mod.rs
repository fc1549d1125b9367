//! Serde helpers for persisted values.

/// Decimal-string encoding for `BigUint` fields.
pub mod big_uint;
