//! Schema-driven decoding of a raw message buffer into a [`FlatMessage`].
//!
//! The walk is a recursive descent over the type catalog. Three things
//! are tracked along the way:
//!
//! - the read position, which always advances by the exact encoded size of
//!   the record, whether or not values are stored;
//! - the [`PathLeaf`] of the current field, growing the shared
//!   [`PathTree`](crate::PathTree) the first time a shape is stored;
//! - the store decision, switched off below arrays longer than
//!   `max_array_size`.
//!
//! Every array visits one extra structural element at index 0 before its
//! real elements `1..=len`. That element reads nothing from the buffer and
//! records the shape of the element type, so empty arrays remain visible in
//! the output. When that element stores nothing, because the element type
//! has no builtin leaves, the array's length is kept as an
//! [`ArrayLength`](crate::ArrayLength) instead.

use bytes::Buf;
use rosintro_core::{
    ArraySize, BuiltinKind, DecodedValue, MessageDef, RosDuration, RosTime, TypeCatalog, TypeRef,
};

use crate::{
    error::{DecodeWarning, FlatError},
    flat::FlatMessage,
    options::DecodeOptions,
    path_tree::{MAX_ARRAY_DEPTH, PathLeaf, Segment},
    wire::{LENGTH_PREFIX_WIDTH, MAX_NESTING_DEPTH, unknown_type},
};

/// Decode one record of type `ty` from the front of `buf`.
///
/// On success `buf` is advanced past the record.
pub fn decode(
    catalog: &TypeCatalog,
    ty: &TypeRef,
    buf: &mut &[u8],
    options: &DecodeOptions,
) -> Result<FlatMessage, FlatError> {
    let mut flat = FlatMessage::new();
    decode_into(catalog, ty, buf, options, &mut flat)?;
    Ok(flat)
}

/// Like [`decode`], but reuses the allocations of an existing [`FlatMessage`].
///
/// `flat` is cleared first. After an error its contents are unspecified.
pub fn decode_into(
    catalog: &TypeCatalog,
    ty: &TypeRef,
    buf: &mut &[u8],
    options: &DecodeOptions,
    flat: &mut FlatMessage,
) -> Result<(), FlatError> {
    flat.reset(options.prefix());
    let root = PathLeaf::new(flat.tree().root());
    let mut decoder = Decoder {
        catalog,
        options,
        initial_len: buf.len(),
        buf,
        flat,
        nesting: 0,
    };
    decoder
        .decode_type(ty, root, Mode::STORE)
        .inspect_err(|e| tracing::debug!(type_name = %ty, error = %e, "decode aborted"))
}

#[derive(Debug, Clone, Copy)]
struct Mode {
    store: bool,
    /// Inside an index-0 element: nothing is read from the buffer.
    placeholder: bool,
}

impl Mode {
    const STORE: Mode = Mode {
        store: true,
        placeholder: false,
    };
}

/// What a single (non-array) instance of a type decodes as.
enum Element<'a> {
    Builtin(BuiltinKind),
    Message(&'a MessageDef),
}

struct Decoder<'a, 'b> {
    catalog: &'a TypeCatalog,
    options: &'a DecodeOptions,
    initial_len: usize,
    buf: &'a mut &'b [u8],
    flat: &'a mut FlatMessage,
    nesting: usize,
}

impl<'a> Decoder<'a, '_> {
    fn offset(&self) -> usize {
        self.initial_len - self.buf.remaining()
    }

    fn require(&self, needed: usize) -> Result<(), FlatError> {
        let remaining = self.buf.remaining();
        if remaining < needed {
            return Err(FlatError::TruncatedBuffer {
                offset: self.offset(),
                needed,
                remaining,
            });
        }
        Ok(())
    }

    fn resolve(&self, ty: &TypeRef) -> Result<Element<'a>, FlatError> {
        if let Some(kind) = ty.builtin_kind() {
            return Ok(Element::Builtin(kind));
        }
        let catalog = self.catalog;
        catalog
            .resolve(ty)
            .map(Element::Message)
            .ok_or_else(|| unknown_type(catalog, ty))
    }

    fn decode_type(&mut self, ty: &TypeRef, leaf: PathLeaf, mode: Mode) -> Result<(), FlatError> {
        let count = match ty.array_size() {
            ArraySize::Scalar => None,
            ArraySize::Fixed(n) => Some(n),
            ArraySize::Variable if mode.placeholder => Some(0),
            ArraySize::Variable => Some(self.read_length(ty)?),
        };

        let store = match count {
            Some(n) if mode.store && n > self.options.max_array_size() => {
                self.report_oversized(ty, &leaf, n);
                false
            }
            _ => mode.store,
        };

        let element = self.resolve(ty)?;

        let Some(count) = count else {
            return self.decode_element(&element, leaf, Mode { store, ..mode });
        };

        if !store && matches!(element, Element::Message(def) if def.wire_fields().next().is_none())
        {
            return Ok(());
        }

        let mut element_leaf = leaf
            .push_index()
            .ok_or_else(|| FlatError::ArrayDepthExceeded {
                type_name: ty.to_string(),
                max: MAX_ARRAY_DEPTH,
            })?;
        if store {
            let marker = match ty.array_size() {
                ArraySize::Fixed(_) => Segment::FixedArray,
                _ => Segment::Sequence,
            };
            let slot = self.flat.tree_mut().array_slot(leaf.node(), marker);
            element_leaf = element_leaf.at(slot);
        }

        let stored_before = self.flat.len();
        let length_slot = (store
            && !mode.placeholder
            && ty.array_size() == ArraySize::Variable)
            .then(|| self.flat.push_length(leaf, count));
        for index in 0..=count {
            if store {
                // count <= max_array_size < u16::MAX
                element_leaf.set_last_index(index as u16);
            }
            let element_mode = Mode {
                store,
                placeholder: mode.placeholder || index == 0,
            };
            self.decode_element(&element, element_leaf, element_mode)?;
        }
        debug_assert!(
            store || self.flat.len() == stored_before,
            "values stored while walking a skipped array of {ty}"
        );
        // The structural element's entries already mark the length prefix.
        if let Some(slot) = length_slot
            && self.flat.len() > stored_before
        {
            self.flat.drop_length(slot);
        }
        Ok(())
    }

    fn decode_element(
        &mut self,
        element: &Element<'a>,
        leaf: PathLeaf,
        mode: Mode,
    ) -> Result<(), FlatError> {
        let def = match element {
            Element::Builtin(kind) => return self.decode_builtin(*kind, leaf, mode),
            Element::Message(def) => *def,
        };

        if self.nesting >= MAX_NESTING_DEPTH {
            return Err(FlatError::NestingTooDeep {
                type_name: def.ty.base_name(),
                max: MAX_NESTING_DEPTH,
            });
        }
        self.nesting += 1;

        if mode.store {
            self.flat
                .tree_mut()
                .populate(leaf.node(), def.wire_fields().map(|f| f.name.as_str()));
        }
        for (i, field) in def.wire_fields().enumerate() {
            let child = if mode.store {
                leaf.at(self.flat.tree().child(leaf.node(), i))
            } else {
                leaf
            };
            self.decode_type(&field.ty, child, mode)?;
        }

        self.nesting -= 1;
        Ok(())
    }

    fn decode_builtin(
        &mut self,
        kind: BuiltinKind,
        leaf: PathLeaf,
        mode: Mode,
    ) -> Result<(), FlatError> {
        if mode.placeholder {
            if mode.store {
                self.flat.push(leaf, DecodedValue::zero(kind));
            }
            return Ok(());
        }
        if !mode.store {
            return self.skip_builtin(kind);
        }
        let value = self.read_builtin(kind)?;
        self.flat.push(leaf, value);
        Ok(())
    }

    fn read_builtin(&mut self, kind: BuiltinKind) -> Result<DecodedValue, FlatError> {
        if let Some(width) = kind.wire_width() {
            self.require(width)?;
        }

        Ok(match kind {
            BuiltinKind::Bool => DecodedValue::Bool(self.buf.get_u8() != 0),
            BuiltinKind::Byte => DecodedValue::Byte(self.buf.get_u8()),
            BuiltinKind::Char => DecodedValue::Char(self.buf.get_i8()),
            BuiltinKind::I8 => DecodedValue::I8(self.buf.get_i8()),
            BuiltinKind::I16 => DecodedValue::I16(self.buf.get_i16_le()),
            BuiltinKind::I32 => DecodedValue::I32(self.buf.get_i32_le()),
            BuiltinKind::I64 => DecodedValue::I64(self.buf.get_i64_le()),
            BuiltinKind::U8 => DecodedValue::U8(self.buf.get_u8()),
            BuiltinKind::U16 => DecodedValue::U16(self.buf.get_u16_le()),
            BuiltinKind::U32 => DecodedValue::U32(self.buf.get_u32_le()),
            BuiltinKind::U64 => DecodedValue::U64(self.buf.get_u64_le()),
            BuiltinKind::F32 => DecodedValue::F32(self.buf.get_f32_le()),
            BuiltinKind::F64 => DecodedValue::F64(self.buf.get_f64_le()),
            BuiltinKind::Time => {
                let sec = self.buf.get_u32_le();
                let nsec = self.buf.get_u32_le();
                DecodedValue::Time(RosTime::new(sec, nsec))
            }
            BuiltinKind::Duration => {
                let sec = self.buf.get_i32_le();
                let nsec = self.buf.get_i32_le();
                DecodedValue::Duration(RosDuration::new(sec, nsec))
            }
            BuiltinKind::String => return self.read_string(),
        })
    }

    fn read_string(&mut self) -> Result<DecodedValue, FlatError> {
        let len = self.read_string_len()?;
        let offset = self.offset();
        let text = std::str::from_utf8(&self.buf.chunk()[..len])
            .map_err(|source| FlatError::InvalidString { offset, source })?;
        let value = DecodedValue::string(text);
        self.buf.advance(len);
        Ok(value)
    }

    /// Read a string length prefix and check that its bytes are present.
    fn read_string_len(&mut self) -> Result<usize, FlatError> {
        self.require(LENGTH_PREFIX_WIDTH)?;
        let len = self.buf.get_u32_le() as usize;
        self.require(len)?;
        Ok(len)
    }

    fn skip_builtin(&mut self, kind: BuiltinKind) -> Result<(), FlatError> {
        let width = match kind.wire_width() {
            Some(width) => width,
            None => self.read_string_len()?,
        };
        self.require(width)?;
        self.buf.advance(width);
        Ok(())
    }

    fn read_length(&mut self, ty: &TypeRef) -> Result<usize, FlatError> {
        let offset = self.offset();
        self.require(LENGTH_PREFIX_WIDTH)?;
        let length = self.buf.get_i32_le();
        usize::try_from(length).map_err(|_| FlatError::NegativeArrayLength {
            type_name: ty.base_name(),
            offset,
            length,
        })
    }

    fn report_oversized(&mut self, ty: &TypeRef, leaf: &PathLeaf, count: usize) {
        let path = self.flat.tree().render(leaf);
        let max_array_size = self.options.max_array_size();
        tracing::warn!(
            path = %path,
            type_name = %ty,
            count,
            max_array_size,
            "skipping oversized array"
        );
        self.flat.warn(DecodeWarning::OversizedArraySkipped {
            path,
            type_name: ty.to_string(),
            count,
            max_array_size,
        });
    }
}
