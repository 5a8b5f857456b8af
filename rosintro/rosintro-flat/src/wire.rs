//! Wire-size helpers shared by the decoder, encoder and skeleton builder.

use rosintro_core::{ArraySize, TypeCatalog, TypeRef};

use crate::error::FlatError;

/// Maximum depth of nested message types followed during a walk.
pub const MAX_NESTING_DEPTH: usize = 64;

/// Size of the `i32` array length prefix and the `u32` string length prefix.
pub const LENGTH_PREFIX_WIDTH: usize = 4;

pub(crate) fn unknown_type(catalog: &TypeCatalog, ty: &TypeRef) -> FlatError {
    FlatError::UnknownType {
        requested: ty.base_name(),
        known: catalog.type_names(),
    }
}

/// Smallest encoding of `ty`: every variable array and string empty.
///
/// A zero-filled buffer of this size decodes successfully.
pub fn min_wire_size(catalog: &TypeCatalog, ty: &TypeRef) -> Result<usize, FlatError> {
    min_wire_size_at(catalog, ty, 0)
}

fn min_wire_size_at(catalog: &TypeCatalog, ty: &TypeRef, depth: usize) -> Result<usize, FlatError> {
    if depth > MAX_NESTING_DEPTH {
        return Err(FlatError::NestingTooDeep {
            type_name: ty.base_name(),
            max: MAX_NESTING_DEPTH,
        });
    }
    let count = match ty.array_size() {
        ArraySize::Scalar => 1,
        ArraySize::Fixed(n) => n,
        ArraySize::Variable => return Ok(LENGTH_PREFIX_WIDTH),
    };
    let element = match ty.builtin_kind() {
        Some(kind) => kind.wire_width().unwrap_or(LENGTH_PREFIX_WIDTH),
        None => {
            let def = catalog
                .resolve(ty)
                .ok_or_else(|| unknown_type(catalog, ty))?;
            let mut size = 0;
            for field in def.wire_fields() {
                size += min_wire_size_at(catalog, &field.ty, depth + 1)?;
            }
            size
        }
    };
    Ok(count * element)
}

#[cfg(test)]
mod tests {
    use rosintro_core::{BuiltinKind, FieldDef, MessageDef};

    use super::*;

    #[test]
    fn min_size_counts_prefixes_and_fixed_arrays() {
        let catalog = TypeCatalog::new().with(MessageDef::new(
            "ex",
            "Mixed",
            vec![
                FieldDef::new("id", TypeRef::builtin(BuiltinKind::U16)),
                FieldDef::new("name", TypeRef::builtin(BuiltinKind::String)),
                FieldDef::new("cov", TypeRef::builtin(BuiltinKind::F64).fixed_array(3)),
                FieldDef::new("tags", TypeRef::builtin(BuiltinKind::I8).variable_array()),
                FieldDef::constant("MAX", TypeRef::builtin(BuiltinKind::I32), "5"),
            ],
        ));
        let size = min_wire_size(&catalog, &TypeRef::message("ex", "Mixed")).unwrap();
        assert_eq!(size, 2 + 4 + 24 + 4);
    }
}
