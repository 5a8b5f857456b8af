//! Error types for the [`Introspector`](crate::Introspector).

use rosintro_flat::FlatError;

/// Errors produced by [`Introspector`](crate::Introspector).
#[derive(Debug, thiserror::Error)]
pub enum IntrospectError {
    /// The root type name is not of the form `pkg/Name` or `pkg/msg/Name`.
    #[error("invalid root type name '{type_name}': {reason}")]
    InvalidTypeName {
        type_name: String,
        reason: &'static str,
    },

    /// The root type parsed but is not registered in the catalog.
    #[error("root type '{type_name}' not found in catalog")]
    UnknownRootType { type_name: String },

    /// The record decoded successfully but did not use the whole buffer.
    #[error("{remaining} trailing bytes after decoding '{type_name}'")]
    TrailingBytes { type_name: String, remaining: usize },

    #[error(transparent)]
    Flat(#[from] FlatError),
}
