//! Attribute discovery for a type without a live instance.

use rosintro_core::{TypeCatalog, TypeRef};

use crate::{
    decoder::decode,
    error::FlatError,
    flat::{FlatMessage, RenderedView},
    options::{DecodeOptions, MAX_STORABLE_ARRAY_SIZE},
    wire::min_wire_size,
};

/// Decode `ty` from the smallest zero-filled buffer it accepts.
///
/// The result lists every attribute path of the type with its declared kind
/// and zero value. Variable arrays come out empty, so only their structural
/// index-0 paths appear.
pub fn skeleton(catalog: &TypeCatalog, ty: &TypeRef, prefix: &str) -> Result<RenderedView, FlatError> {
    Ok(skeleton_message(catalog, ty, prefix)?.render_view())
}

/// [`skeleton`] without the final rendering step.
pub fn skeleton_message(
    catalog: &TypeCatalog,
    ty: &TypeRef,
    prefix: &str,
) -> Result<FlatMessage, FlatError> {
    let zeros = vec![0u8; min_wire_size(catalog, ty)?];
    let options = DecodeOptions::new()
        .with_prefix(prefix)
        .with_max_array_size(MAX_STORABLE_ARRAY_SIZE);
    let mut buf = zeros.as_slice();
    let flat = decode(catalog, ty, &mut buf, &options)?;
    debug_assert!(buf.is_empty(), "skeleton buffer not fully consumed");
    Ok(flat)
}
