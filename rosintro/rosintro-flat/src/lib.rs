//! Flatten ROS message buffers into `(path, value)` pairs and back.
//!
//! Given only a [`TypeCatalog`](rosintro_core::TypeCatalog), [`decode`]
//! walks a raw buffer and produces a [`FlatMessage`]; [`encode`] rebuilds the
//! buffer from its [`RenderedView`].
//!
//! # Pipeline
//!
//! ```text
//! bytes ── decode ──▶ FlatMessage ── render_view ──▶ RenderedView ── encode ──▶ bytes
//!           │              │
//!           │              └─ PathTree: one node per distinct shape
//!           └─ TypeCatalog lookups for nested messages
//! ```
//!
//! # Example
//!
//! ```rust
//! use rosintro_core::{BuiltinKind, FieldDef, MessageDef, TypeCatalog, TypeRef};
//! use rosintro_flat::{DecodeOptions, decode, encode_to_vec};
//!
//! let catalog = TypeCatalog::new().with(MessageDef::new(
//!     "ex",
//!     "List",
//!     vec![FieldDef::new("items", TypeRef::builtin(BuiltinKind::I32).variable_array())],
//! ));
//! let bytes = [2, 0, 0, 0, 5, 0, 0, 0, 7, 0, 0, 0];
//!
//! let mut buf = &bytes[..];
//! let flat = decode(&catalog, &TypeRef::message("ex", "List"), &mut buf, &DecodeOptions::default())?;
//! let view = flat.render_view();
//! assert_eq!(view.order, ["items.0", "items.1", "items.2"]);
//! assert_eq!(encode_to_vec(&view)?, bytes);
//! # Ok::<(), rosintro_flat::FlatError>(())
//! ```

mod decoder;
mod encoder;
mod error;
mod flat;
mod options;
mod path_tree;
mod skeleton;
mod wire;

pub use decoder::{decode, decode_into};
pub use encoder::{
    NoObserver, ReferenceCheck, WriteObserver, encode, encode_to_vec, encode_verified, encode_with,
};
pub use error::{ByteComparison, DecodeWarning, FlatError};
pub use flat::{ArrayLength, FlatEntry, FlatMessage, RenderedView};
pub use options::{DEFAULT_MAX_ARRAY_SIZE, DecodeOptions, MAX_STORABLE_ARRAY_SIZE};
pub use path_tree::{MAX_ARRAY_DEPTH, NodeId, PathLeaf, PathNode, PathTree, Segment};
pub use skeleton::{skeleton, skeleton_message};
pub use wire::{LENGTH_PREFIX_WIDTH, MAX_NESTING_DEPTH, min_wire_size};
