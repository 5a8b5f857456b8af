//! Error and warning types for flattening and re-encoding.

use std::fmt::{self, Display, Formatter};

use rosintro_core::BuiltinKind;

/// Fatal failure of a decode or encode call.
///
/// Any of these aborts the whole operation; the partially filled
/// [`FlatMessage`](crate::FlatMessage) or output buffer must not be used.
#[derive(Debug, thiserror::Error)]
pub enum FlatError {
    /// A nested message type is missing from the catalog.
    #[error("unknown message type '{requested}'; available types are:\n{}", known_list(.known))]
    UnknownType {
        requested: String,
        known: Vec<String>,
    },

    /// A read would go past the end of the provided bytes.
    #[error("buffer truncated at offset {offset}: need {needed} bytes, {remaining} remaining")]
    TruncatedBuffer {
        offset: usize,
        needed: usize,
        remaining: usize,
    },

    /// More nested array dimensions than the index stack can hold.
    #[error("array nesting deeper than {max} levels at type '{type_name}'")]
    ArrayDepthExceeded { type_name: String, max: usize },

    /// Message types nest deeper than allowed; usually a cyclic catalog.
    #[error("message nesting deeper than {max} levels at type '{type_name}'")]
    NestingTooDeep { type_name: String, max: usize },

    #[error("negative length {length} for array of '{type_name}' at offset {offset}")]
    NegativeArrayLength {
        type_name: String,
        offset: usize,
        length: i32,
    },

    #[error("string at offset {offset} is not valid UTF-8: {source}")]
    InvalidString {
        offset: usize,
        #[source]
        source: std::str::Utf8Error,
    },

    /// A value's kind differs from the kind declared for its path.
    #[error("type mismatch at '{path}': declared {declared}, got {actual}")]
    TypeMismatch {
        path: String,
        declared: BuiltinKind,
        actual: BuiltinKind,
    },

    #[error("no value for '{path}'")]
    MissingValue { path: String },

    #[error("no declared type for '{path}'")]
    MissingKind { path: String },

    /// A variable array length does not fit the `i32` length prefix.
    #[error("array '{path}' has {len} elements, more than a length prefix can hold")]
    ArrayTooLong { path: String, len: usize },

    /// Encoded bytes differ from the reference buffer.
    #[error("encoded bytes of '{field}' differ from reference at offset {offset}:\n{comparison}")]
    ReferenceMismatch {
        field: String,
        offset: usize,
        comparison: ByteComparison,
    },
}

fn known_list(known: &[String]) -> String {
    known
        .iter()
        .map(|name| format!("   {name}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Side-by-side hex dump of an encoded range against the reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ByteComparison {
    pub start: usize,
    pub expected: Vec<u8>,
    pub actual: Vec<u8>,
}

impl ByteComparison {
    /// Offset of the first differing byte, if any.
    pub fn first_difference(&self) -> Option<usize> {
        let len = self.expected.len().max(self.actual.len());
        (0..len)
            .find(|&i| self.expected.get(i) != self.actual.get(i))
            .map(|i| self.start + i)
    }
}

impl Display for ByteComparison {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let len = self.expected.len().max(self.actual.len());
        for i in 0..len {
            let expected = self.expected.get(i);
            let actual = self.actual.get(i);
            let hex = |b: Option<&u8>| b.map_or_else(|| "--".to_string(), |b| format!("{b:02x}"));
            let mark = if expected == actual { "" } else { "  <<" };
            writeln!(
                f,
                "  [{:>6}] expected {} actual {}{mark}",
                self.start + i,
                hex(expected),
                hex(actual)
            )?;
        }
        Ok(())
    }
}

/// Non-fatal condition reported alongside a successful decode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeWarning {
    /// An array longer than `max_array_size` was walked but not stored.
    OversizedArraySkipped {
        path: String,
        type_name: String,
        count: usize,
        max_array_size: usize,
    },
}

impl Display for DecodeWarning {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            DecodeWarning::OversizedArraySkipped {
                path,
                type_name,
                count,
                max_array_size,
            } => write!(
                f,
                "skipped array '{path}' of type {type_name} and size {count} because max_array_size = {max_array_size}"
            ),
        }
    }
}
