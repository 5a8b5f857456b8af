//! Catalog model and value types for `rosintro`.
//!
//! This crate holds the inputs the flattener consumes ([`TypeCatalog`],
//! [`MessageDef`], [`TypeRef`]) and the closed [`DecodedValue`] union it
//! produces. Parsing of message definition text is not part of it.

mod catalog;
mod error;
mod time;
mod types;
mod value;

pub use catalog::TypeCatalog;
pub use error::ValueTypeError;
pub use time::{RosDuration, RosTime};
pub use types::{ArraySize, BuiltinKind, FieldDef, MessageDef, TypeRef};
pub use value::DecodedValue;
