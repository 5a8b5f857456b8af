//! Path tree shared by every repetition of a shape, and the leaf cursor
//! that addresses one concrete field inside it.
//!
//! Nodes live in an arena and are addressed by [`NodeId`]. A node is created
//! the first time its shape is decoded while storing; later array elements
//! reuse the same nodes and only differ in the index stack of their
//! [`PathLeaf`].
//!
//! # Rendering
//!
//! Labels are joined with `/` from the root down. An array marker replaces
//! the preceding `/` with `.` (variable array) or `:` (fixed array) followed
//! by the next index of the leaf:
//!
//! ```text
//! pose/position            plain fields
//! points.3/x               3rd element of a variable array
//! covariance:5             5th element of a fixed array
//! ```

use std::fmt::Write as _;

/// Maximum number of nested arrays along one path.
pub const MAX_ARRAY_DEPTH: usize = 7;

/// Index of a node inside a [`PathTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Label of a path node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Field(String),
    /// Element slot of a variable-size array (`#`).
    Sequence,
    /// Element slot of a fixed-size array (`@`).
    FixedArray,
}

impl Segment {
    pub fn as_str(&self) -> &str {
        match self {
            Segment::Field(name) => name,
            Segment::Sequence => "#",
            Segment::FixedArray => "@",
        }
    }

    pub fn is_array(&self) -> bool {
        !matches!(self, Segment::Field(_))
    }
}

#[derive(Debug, Clone)]
pub struct PathNode {
    segment: Segment,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    /// Set once the children for this node's shape have been created.
    populated: bool,
}

impl PathNode {
    pub fn segment(&self) -> &Segment {
        &self.segment
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn is_populated(&self) -> bool {
        self.populated
    }
}

/// Arena of [`PathNode`]s rooted at a single prefix node.
#[derive(Debug, Clone)]
pub struct PathTree {
    nodes: Vec<PathNode>,
}

impl PathTree {
    pub fn new(prefix: &str) -> Self {
        Self {
            nodes: vec![PathNode {
                segment: Segment::Field(prefix.to_string()),
                parent: None,
                children: Vec::new(),
                populated: false,
            }],
        }
    }

    /// Drop every node except the root and relabel the root.
    pub fn reset(&mut self, prefix: &str) {
        self.nodes.truncate(1);
        let root = &mut self.nodes[0];
        root.segment = Segment::Field(prefix.to_string());
        root.children.clear();
        root.populated = false;
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Label of the root node.
    pub fn prefix(&self) -> &str {
        self.nodes[0].segment.as_str()
    }

    pub fn node(&self, id: NodeId) -> &PathNode {
        &self.nodes[id.index()]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        // The root always exists.
        false
    }

    /// Child `index` of `parent`, as established by a previous populate call.
    pub fn child(&self, parent: NodeId, index: usize) -> NodeId {
        self.nodes[parent.index()].children[index]
    }

    /// Find a direct child by label.
    pub fn find_child(&self, parent: NodeId, label: &str) -> Option<NodeId> {
        self.node(parent)
            .children
            .iter()
            .copied()
            .find(|c| self.node(*c).segment.as_str() == label)
    }

    /// Create one child per label under `parent` unless that was already done.
    pub(crate) fn populate<'a>(&mut self, parent: NodeId, labels: impl Iterator<Item = &'a str>) {
        if self.nodes[parent.index()].populated {
            return;
        }
        for label in labels {
            self.push_child(parent, Segment::Field(label.to_string()));
        }
        self.nodes[parent.index()].populated = true;
    }

    /// The single array-marker child of `parent`, created on first use.
    pub(crate) fn array_slot(&mut self, parent: NodeId, marker: Segment) -> NodeId {
        let node = &self.nodes[parent.index()];
        if node.populated {
            return node.children[0];
        }
        let slot = self.push_child(parent, marker);
        self.nodes[parent.index()].populated = true;
        slot
    }

    fn push_child(&mut self, parent: NodeId, segment: Segment) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(PathNode {
            segment,
            parent: Some(parent),
            children: Vec::new(),
            populated: false,
        });
        self.nodes[parent.index()].children.push(id);
        id
    }

    /// Render `leaf` as a path string.
    pub fn render(&self, leaf: &PathLeaf) -> String {
        let mut out = String::new();
        self.render_into(leaf, &mut out);
        out
    }

    /// Render `leaf` into `out`, replacing its previous contents.
    pub fn render_into(&self, leaf: &PathLeaf, out: &mut String) {
        out.clear();

        let mut chain = Vec::with_capacity(16);
        let mut cursor = Some(leaf.node);
        while let Some(id) = cursor {
            let node = self.node(id);
            chain.push(&node.segment);
            cursor = node.parent;
        }

        let mut indices = leaf.indices().iter();
        for segment in chain.iter().rev() {
            match segment {
                Segment::Field(name) => {
                    if !out.is_empty() {
                        out.push('/');
                    }
                    out.push_str(name);
                }
                Segment::Sequence | Segment::FixedArray => {
                    out.push(if matches!(segment, Segment::Sequence) { '.' } else { ':' });
                    let index = indices.next().copied().unwrap_or_default();
                    let _ = write!(out, "{index}");
                }
            }
        }
    }
}

/// A node of the [`PathTree`] plus one index per array crossed on the way
/// from the root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathLeaf {
    node: NodeId,
    indices: [u16; MAX_ARRAY_DEPTH],
    depth: u8,
}

impl PathLeaf {
    pub fn new(node: NodeId) -> Self {
        Self {
            node,
            indices: [0; MAX_ARRAY_DEPTH],
            depth: 0,
        }
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Array indices from the outermost array inwards.
    pub fn indices(&self) -> &[u16] {
        &self.indices[..self.depth as usize]
    }

    /// True when any enclosing array index is the structural element 0.
    pub fn is_placeholder(&self) -> bool {
        self.indices().contains(&0)
    }

    pub(crate) fn at(mut self, node: NodeId) -> Self {
        self.node = node;
        self
    }

    /// Open a new array level with index 0, or `None` when all
    /// [`MAX_ARRAY_DEPTH`] levels are in use.
    pub(crate) fn push_index(mut self) -> Option<Self> {
        if self.depth as usize >= MAX_ARRAY_DEPTH {
            return None;
        }
        self.depth += 1;
        Some(self)
    }

    pub(crate) fn set_last_index(&mut self, index: u16) {
        if let Some(slot) = self.depth.checked_sub(1) {
            self.indices[slot as usize] = index;
        }
    }
}
