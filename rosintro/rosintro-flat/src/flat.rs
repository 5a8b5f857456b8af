//! Decode output: a [`PathTree`] plus the ordered leaf values, and the
//! string-keyed [`RenderedView`] derived from it.

use std::collections::HashMap;

use rosintro_core::{BuiltinKind, DecodedValue};

use crate::{
    error::DecodeWarning,
    path_tree::{PathLeaf, PathTree},
};

/// One decoded builtin leaf.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatEntry {
    pub leaf: PathLeaf,
    pub value: DecodedValue,
}

impl FlatEntry {
    /// Entries under an array index 0 describe shape only; their value is the
    /// zero value of the kind and they have no bytes on the wire.
    pub fn is_placeholder(&self) -> bool {
        self.leaf.is_placeholder()
    }
}

/// Length of a variable array instance whose elements hold no builtin
/// leaves, so no entry marks where its length prefix goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrayLength {
    /// Number of entries stored before the length prefix was read.
    pub position: usize,
    /// Cursor of the array field itself.
    pub leaf: PathLeaf,
    pub len: usize,
}

/// Flattened form of one message record.
///
/// `entries` are in depth-first, wire order; the encoder depends on it.
#[derive(Debug, Clone)]
pub struct FlatMessage {
    tree: PathTree,
    entries: Vec<FlatEntry>,
    lengths: Vec<ArrayLength>,
    warnings: Vec<DecodeWarning>,
}

impl FlatMessage {
    pub fn new() -> Self {
        Self {
            tree: PathTree::new(""),
            entries: Vec::new(),
            lengths: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn tree(&self) -> &PathTree {
        &self.tree
    }

    pub fn entries(&self) -> &[FlatEntry] {
        &self.entries
    }

    /// Lengths of leafless variable arrays, ordered by position.
    pub fn lengths(&self) -> &[ArrayLength] {
        &self.lengths
    }

    /// Arrays skipped because of `max_array_size` during the last decode.
    pub fn warnings(&self) -> &[DecodeWarning] {
        &self.warnings
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn render(&self, entry: &FlatEntry) -> String {
        self.tree.render(&entry.leaf)
    }

    /// Rendered path of every entry, in order.
    pub fn iter_rendered(&self) -> impl Iterator<Item = (String, &FlatEntry)> + '_ {
        self.entries.iter().map(|e| (self.tree.render(&e.leaf), e))
    }

    /// Build the string-keyed snapshot used by the encoder.
    pub fn render_view(&self) -> RenderedView {
        let mut view = RenderedView {
            values: HashMap::with_capacity(self.entries.len()),
            kinds: HashMap::with_capacity(self.entries.len()),
            lengths: HashMap::with_capacity(self.lengths.len()),
            order: Vec::with_capacity(self.entries.len() + self.lengths.len()),
            prefix: self.tree.prefix().to_string(),
        };
        let mut path = String::new();
        let mut lengths = self.lengths.iter().peekable();
        for (i, entry) in self.entries.iter().enumerate() {
            while let Some(length) = lengths.next_if(|l| l.position <= i) {
                self.render_length(&mut view, length, &mut path);
            }
            self.tree.render_into(&entry.leaf, &mut path);
            view.kinds.insert(path.clone(), entry.value.kind());
            if !entry.is_placeholder() {
                view.values.insert(path.clone(), entry.value.clone());
            }
            view.order.push(path.clone());
        }
        for length in lengths {
            self.render_length(&mut view, length, &mut path);
        }
        view
    }

    fn render_length(&self, view: &mut RenderedView, length: &ArrayLength, path: &mut String) {
        self.tree.render_into(&length.leaf, path);
        view.lengths.insert(path.clone(), length.len);
        view.order.push(path.clone());
    }

    pub(crate) fn reset(&mut self, prefix: &str) {
        self.tree.reset(prefix);
        self.entries.clear();
        self.lengths.clear();
        self.warnings.clear();
    }

    pub(crate) fn tree_mut(&mut self) -> &mut PathTree {
        &mut self.tree
    }

    pub(crate) fn push(&mut self, leaf: PathLeaf, value: DecodedValue) {
        self.entries.push(FlatEntry { leaf, value });
    }

    /// Reserve a length attribute at the current position; returns its slot
    /// for [`Self::drop_length`].
    pub(crate) fn push_length(&mut self, leaf: PathLeaf, len: usize) -> usize {
        self.lengths.push(ArrayLength {
            position: self.entries.len(),
            leaf,
            len,
        });
        self.lengths.len() - 1
    }

    pub(crate) fn drop_length(&mut self, slot: usize) {
        self.lengths.remove(slot);
    }

    pub(crate) fn warn(&mut self, warning: DecodeWarning) {
        self.warnings.push(warning);
    }
}

impl Default for FlatMessage {
    fn default() -> Self {
        Self::new()
    }
}

/// Path-string keyed view of a [`FlatMessage`].
///
/// `order` holds every rendered path, placeholders included, in decode order
/// and doubles as the attribute-name list. `values` only holds paths that have
/// bytes on the wire; `kinds` holds the declared kind of every value path.
/// `lengths` holds the array-length attributes of variable arrays whose
/// elements have no leaves; those paths appear in `order` but in neither of
/// the other maps.
///
/// `prefix` is the root label every path starts with; array markers are only
/// looked for after it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderedView {
    pub values: HashMap<String, DecodedValue>,
    pub kinds: HashMap<String, BuiltinKind>,
    pub lengths: HashMap<String, usize>,
    pub order: Vec<String>,
    pub prefix: String,
}

impl RenderedView {
    pub fn attribute_names(&self) -> &[String] {
        &self.order
    }

    pub fn get(&self, path: &str) -> Option<&DecodedValue> {
        self.values.get(path)
    }

    /// Replace the value at an existing path, keeping its declared kind.
    ///
    /// Returns the previous value, or `None` when the path has no value slot.
    /// The kind is checked at encode time, not here.
    pub fn set(&mut self, path: &str, value: impl Into<DecodedValue>) -> Option<DecodedValue> {
        let slot = self.values.get_mut(path)?;
        Some(std::mem::replace(slot, value.into()))
    }
}
