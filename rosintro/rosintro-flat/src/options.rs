/// Array length above which array contents are walked but not stored.
pub const DEFAULT_MAX_ARRAY_SIZE: usize = 100;

/// Largest storable array: indices `0..=len` must fit the 16-bit index slot.
pub const MAX_STORABLE_ARRAY_SIZE: usize = u16::MAX as usize - 1;

/// Settings for a decode call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeOptions {
    max_array_size: usize,
    prefix: String,
}

impl DecodeOptions {
    pub fn new() -> Self {
        Self {
            max_array_size: DEFAULT_MAX_ARRAY_SIZE,
            prefix: String::new(),
        }
    }

    /// Arrays longer than this are skipped (not stored) and reported as a
    /// [`DecodeWarning`](crate::DecodeWarning).
    /// Clamped to [`MAX_STORABLE_ARRAY_SIZE`].
    pub fn with_max_array_size(mut self, max: usize) -> Self {
        self.max_array_size = max.min(MAX_STORABLE_ARRAY_SIZE);
        self
    }

    /// Label of the root node, rendered as the first path segment when
    /// non-empty.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn max_array_size(&self) -> usize {
        self.max_array_size
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self::new()
    }
}
