mod error;
mod introspector;

pub use error::IntrospectError;
pub use introspector::{Introspector, IntrospectorBuilder};
pub use rosintro_core as core;
pub use rosintro_flat as flat;
