//! Rebuild a message buffer from a [`RenderedView`].
//!
//! Paths are consumed exactly once, in the order captured by the decoder.
//! That order places every array's structural index-0 entries before its
//! elements, which is where the variable-array length prefix goes:
//!
//! ```text
//! order            bytes written
//! items.0          length of `items` (largest index seen after `items.`)
//! items.1          value
//! items.2          value
//! ```
//!
//! Paths under an index 0 never produce value bytes. Fixed arrays (`:N`)
//! carry no length prefix. Arrays whose elements have no leaves appear once
//! in the order under their own path, with the length taken from
//! [`RenderedView::lengths`].

use std::collections::{HashMap, HashSet};

use bytes::BufMut;
use rosintro_core::DecodedValue;

use crate::{
    error::{ByteComparison, FlatError},
    flat::RenderedView,
};

/// Called after every write to the output buffer.
///
/// `start` is the offset of the first byte written for `field`; the bytes
/// are `out[start..]`. Returning an error aborts the encode.
pub trait WriteObserver {
    fn written(&mut self, field: &str, out: &[u8], start: usize) -> Result<(), FlatError>;
}

/// Observer that accepts every write.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoObserver;

impl WriteObserver for NoObserver {
    fn written(&mut self, _field: &str, _out: &[u8], _start: usize) -> Result<(), FlatError> {
        Ok(())
    }
}

/// Observer comparing every write against the same offsets of a reference
/// buffer, typically the one the view was decoded from.
#[derive(Debug, Clone, Copy)]
pub struct ReferenceCheck<'r> {
    reference: &'r [u8],
}

impl<'r> ReferenceCheck<'r> {
    pub fn new(reference: &'r [u8]) -> Self {
        Self { reference }
    }
}

impl WriteObserver for ReferenceCheck<'_> {
    fn written(&mut self, field: &str, out: &[u8], start: usize) -> Result<(), FlatError> {
        let actual = &out[start..];
        let end = out.len().min(self.reference.len());
        let expected = self.reference.get(start..end).unwrap_or_default();
        if expected == actual {
            return Ok(());
        }

        let comparison = ByteComparison {
            start,
            expected: expected.to_vec(),
            actual: actual.to_vec(),
        };
        let offset = comparison.first_difference().unwrap_or(start);
        tracing::warn!(field, offset, "encoded bytes differ from reference");
        Err(FlatError::ReferenceMismatch {
            field: field.to_string(),
            offset,
            comparison,
        })
    }
}

/// Append the encoding of `view` to `out`.
pub fn encode(view: &RenderedView, out: &mut Vec<u8>) -> Result<(), FlatError> {
    encode_with(view, out, &mut NoObserver)
}

/// Encode into a fresh buffer.
pub fn encode_to_vec(view: &RenderedView) -> Result<Vec<u8>, FlatError> {
    let mut out = Vec::new();
    encode(view, &mut out)?;
    Ok(out)
}

/// Encode while checking every write against `reference`; fails with
/// [`FlatError::ReferenceMismatch`] on the first differing field.
pub fn encode_verified(
    view: &RenderedView,
    out: &mut Vec<u8>,
    reference: &[u8],
) -> Result<(), FlatError> {
    encode_with(view, out, &mut ReferenceCheck::new(reference))
}

pub fn encode_with<O: WriteObserver + ?Sized>(
    view: &RenderedView,
    out: &mut Vec<u8>,
    observer: &mut O,
) -> Result<(), FlatError> {
    encode_paths(view, out, observer)
        .inspect_err(|e| tracing::debug!(error = %e, "encode aborted"))
}

fn encode_paths<O: WriteObserver + ?Sized>(
    view: &RenderedView,
    out: &mut Vec<u8>,
    observer: &mut O,
) -> Result<(), FlatError> {
    // the root label may itself contain `.N`
    let skip = view.prefix.len();
    let lengths = array_lengths(&view.order, skip);
    let mut emitted: HashSet<&str> = HashSet::new();

    for path in &view.order {
        if let Some(&len) = view.lengths.get(path) {
            write_length(path, len, out, observer)?;
            continue;
        }
        if let Some(marker) = index_markers(path, skip).find(|m| m.index == 0) {
            let array = &path[..marker.pos];
            if marker.sequence && emitted.insert(array) {
                let len = lengths.get(array).copied().unwrap_or_default();
                write_length(array, len, out, observer)?;
            }
            continue;
        }

        let declared = *view
            .kinds
            .get(path)
            .ok_or_else(|| FlatError::MissingKind { path: path.clone() })?;
        let value = view
            .values
            .get(path)
            .ok_or_else(|| FlatError::MissingValue { path: path.clone() })?;
        if value.kind() != declared {
            return Err(FlatError::TypeMismatch {
                path: path.clone(),
                declared,
                actual: value.kind(),
            });
        }

        let start = out.len();
        write_value(value, out);
        observer.written(path, out, start)?;
    }
    Ok(())
}

fn write_length<O: WriteObserver + ?Sized>(
    array: &str,
    len: usize,
    out: &mut Vec<u8>,
    observer: &mut O,
) -> Result<(), FlatError> {
    let prefix = i32::try_from(len).map_err(|_| FlatError::ArrayTooLong {
        path: array.to_string(),
        len,
    })?;
    let start = out.len();
    out.put_i32_le(prefix);
    observer.written(array, out, start)
}

fn write_value(value: &DecodedValue, out: &mut Vec<u8>) {
    match value {
        DecodedValue::Bool(v) => out.put_u8(u8::from(*v)),
        DecodedValue::Byte(v) | DecodedValue::U8(v) => out.put_u8(*v),
        DecodedValue::Char(v) | DecodedValue::I8(v) => out.put_i8(*v),
        DecodedValue::I16(v) => out.put_i16_le(*v),
        DecodedValue::I32(v) => out.put_i32_le(*v),
        DecodedValue::I64(v) => out.put_i64_le(*v),
        DecodedValue::U16(v) => out.put_u16_le(*v),
        DecodedValue::U32(v) => out.put_u32_le(*v),
        DecodedValue::U64(v) => out.put_u64_le(*v),
        DecodedValue::F32(v) => out.put_f32_le(*v),
        DecodedValue::F64(v) => out.put_f64_le(*v),
        DecodedValue::String(s) => {
            out.put_u32_le(s.len() as u32);
            out.put_slice(s.as_bytes());
        }
        DecodedValue::Time(t) => {
            out.put_u32_le(t.sec);
            out.put_u32_le(t.nsec);
        }
        DecodedValue::Duration(d) => {
            out.put_i32_le(d.sec);
            out.put_i32_le(d.nsec);
        }
    }
}

/// An array index inside a rendered path, e.g. `.3` or `:0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct IndexMarker {
    /// Byte offset of the `.` / `:` separator.
    pos: usize,
    sequence: bool,
    index: usize,
}

/// Markers of `path`, ignoring its first `skip` bytes (the root label).
fn index_markers(path: &str, skip: usize) -> impl Iterator<Item = IndexMarker> + '_ {
    path.match_indices(|c: char| c == '.' || c == ':')
        .filter(move |(pos, _)| *pos >= skip)
        .filter_map(move |(pos, sep)| {
            let digits = path[pos + 1..].split('/').next()?;
            if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            Some(IndexMarker {
                pos,
                sequence: sep == ".",
                index: digits.parse().ok()?,
            })
        })
}

/// Length of every variable array instance, keyed by the path prefix before
/// its `.N` marker.
fn array_lengths(order: &[String], skip: usize) -> HashMap<&str, usize> {
    let mut lengths = HashMap::new();
    for path in order {
        for marker in index_markers(path, skip).filter(|m| m.sequence) {
            lengths
                .entry(&path[..marker.pos])
                .and_modify(|len: &mut usize| *len = (*len).max(marker.index))
                .or_insert(marker.index);
        }
    }
    lengths
}
