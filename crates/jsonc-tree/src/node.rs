//! Arena-backed syntax tree.

use std::fmt;

use jsonc_tokenizer::Span;
use tracing::trace;

/// Index of a node inside its [`SyntaxTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index as u32)
    }

    /// Position of the node in the arena. The root is always `0`.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// The kind of a node. Scalars carry their decoded value.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Object,
    Array,
    /// A `"key": value` pair. Children are the key string and, when
    /// present, the value.
    Property {
        /// Byte offset of the `:` separator, if one was seen.
        colon: Option<u32>,
    },
    String(String),
    Number(f64),
    Boolean(bool),
    Null,
}

impl NodeKind {
    /// Lowercase name of the node type, as used in dumps and logs.
    pub fn type_name(&self) -> &'static str {
        match self {
            NodeKind::Object => "object",
            NodeKind::Array => "array",
            NodeKind::Property { .. } => "property",
            NodeKind::String(_) => "string",
            NodeKind::Number(_) => "number",
            NodeKind::Boolean(_) => "boolean",
            NodeKind::Null => "null",
        }
    }

    /// Whether this node is a leaf value.
    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            NodeKind::String(_) | NodeKind::Number(_) | NodeKind::Boolean(_) | NodeKind::Null
        )
    }
}

/// Storage for a single node.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeData {
    pub kind: NodeKind,
    pub span: Span,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

/// A parsed JSONC document. Owns every node; the root is at index `0`.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntaxTree {
    nodes: Vec<NodeData>,
}

impl SyntaxTree {
    pub(crate) fn new(nodes: Vec<NodeData>) -> Self {
        debug_assert!(!nodes.is_empty());
        Self { nodes }
    }

    /// The root node.
    pub fn root(&self) -> Node<'_> {
        Node {
            tree: self,
            id: NodeId(0),
        }
    }

    /// Look up a node by id.
    pub fn get(&self, id: NodeId) -> Option<Node<'_>> {
        (id.index() < self.nodes.len()).then_some(Node { tree: self, id })
    }

    /// Number of nodes in the tree.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false; a tree has at least its root.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All nodes in pre-order (source order).
    pub fn nodes(&self) -> impl Iterator<Item = Node<'_>> + '_ {
        (0..self.nodes.len()).map(|i| Node {
            tree: self,
            id: NodeId::new(i),
        })
    }

    /// Find the most specific node whose span contains `offset`.
    ///
    /// Spans are half open: an offset sitting exactly on a node's end is
    /// outside it unless `include_right_bound` is set. With the bound
    /// excluded, a cursor right after the last element of an array (before
    /// the `]`) resolves to the array itself rather than to that element.
    pub fn find_node_at_offset(&self, offset: usize, include_right_bound: bool) -> Option<Node<'_>> {
        let offset = u32::try_from(offset).ok()?;
        let mut node = self.root();
        if !node.span().contains(offset, include_right_bound) {
            return None;
        }

        'descend: loop {
            for child in node.children() {
                if child.span().start > offset {
                    break;
                }
                if child.span().contains(offset, include_right_bound) {
                    node = child;
                    continue 'descend;
                }
            }
            trace!(offset, kind = node.kind().type_name(), span = ?node.span(), "node at offset");
            return Some(node);
        }
    }

    /// Follow a path of keys and indices from the root.
    ///
    /// Keys only descend into objects and indices only into arrays. A
    /// property that has no value yet does not resolve.
    pub fn find_node_at_path(&self, path: &[Segment<'_>]) -> Option<Node<'_>> {
        let mut node = self.root();
        for segment in path {
            node = match (segment, node.kind()) {
                (Segment::Key(key), NodeKind::Object) => node
                    .children()
                    .find(|property| property.key() == Some(*key))?
                    .property_value()?,
                (Segment::Index(index), NodeKind::Array) => node.children().nth(*index)?,
                _ => return None,
            };
        }
        Some(node)
    }
}

impl fmt::Display for SyntaxTree {
    /// Indented dump, one node per line.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn write_node(f: &mut fmt::Formatter<'_>, node: Node<'_>, depth: usize) -> fmt::Result {
            let span = node.span();
            write!(f, "{:indent$}{}", "", node.kind().type_name(), indent = depth * 2)?;
            match node.kind() {
                NodeKind::String(s) => write!(f, " {s:?}")?,
                NodeKind::Number(n) => write!(f, " {n}")?,
                NodeKind::Boolean(b) => write!(f, " {b}")?,
                _ => {}
            }
            writeln!(f, " @{}..{}", span.start, span.end)?;
            for child in node.children() {
                write_node(f, child, depth + 1)?;
            }
            Ok(())
        }

        write_node(f, self.root(), 0)
    }
}

/// One step in a path from the root to a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Segment<'a> {
    Key(&'a str),
    Index(usize),
}

/// A borrowed handle to a node in a [`SyntaxTree`].
#[derive(Clone, Copy)]
pub struct Node<'tree> {
    tree: &'tree SyntaxTree,
    id: NodeId,
}

impl<'tree> Node<'tree> {
    fn data(&self) -> &'tree NodeData {
        &self.tree.nodes[self.id.index()]
    }

    fn at(&self, id: NodeId) -> Node<'tree> {
        Node {
            tree: self.tree,
            id,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn tree(&self) -> &'tree SyntaxTree {
        self.tree
    }

    pub fn kind(&self) -> &'tree NodeKind {
        &self.data().kind
    }

    pub fn span(&self) -> Span {
        self.data().span
    }

    /// The enclosing node, or `None` for the root.
    pub fn parent(&self) -> Option<Node<'tree>> {
        self.data().parent.map(|id| self.at(id))
    }

    /// Children in source order.
    pub fn children(&self) -> Children<'tree> {
        Children {
            tree: self.tree,
            ids: self.data().children.iter(),
        }
    }

    pub fn child_count(&self) -> usize {
        self.data().children.len()
    }

    /// The string value, for string nodes.
    pub fn as_str(&self) -> Option<&'tree str> {
        match self.kind() {
            NodeKind::String(s) => Some(s),
            _ => None,
        }
    }

    /// For a property node, the text of its key.
    pub fn key(&self) -> Option<&'tree str> {
        if !matches!(self.kind(), NodeKind::Property { .. }) {
            return None;
        }
        self.children().next()?.as_str()
    }

    /// For a property node, its value node (absent while the user is still
    /// typing `"key":`).
    pub fn property_value(&self) -> Option<Node<'tree>> {
        if !matches!(self.kind(), NodeKind::Property { .. }) {
            return None;
        }
        self.children().nth(1)
    }

    /// Ancestors from the parent up to the root.
    pub fn ancestors(&self) -> impl Iterator<Item = Node<'tree>> + use<'tree> {
        std::iter::successors(self.parent(), |node| node.parent())
    }

    /// Keys and indices leading from the root to this node.
    ///
    /// Object members contribute the key of their property, array elements
    /// their index. A property node itself shares the path of its object.
    pub fn path(&self) -> Vec<Segment<'tree>> {
        let mut path = Vec::new();
        let mut current = *self;
        while let Some(parent) = current.parent() {
            match parent.kind() {
                NodeKind::Property { .. } => {
                    if let Some(key) = parent.key() {
                        path.push(Segment::Key(key));
                    }
                }
                NodeKind::Array => {
                    if let Some(index) = parent.children().position(|c| c.id == current.id) {
                        path.push(Segment::Index(index));
                    }
                }
                _ => {}
            }
            current = parent;
        }
        path.reverse();
        path
    }
}

impl PartialEq for Node<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.id == other.id
    }
}

impl Eq for Node<'_> {}

impl fmt::Debug for Node<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("id", &self.id)
            .field("kind", self.kind())
            .field("span", &self.span())
            .finish()
    }
}

/// Iterator over the children of a node.
#[derive(Clone)]
pub struct Children<'tree> {
    tree: &'tree SyntaxTree,
    ids: std::slice::Iter<'tree, NodeId>,
}

impl<'tree> Iterator for Children<'tree> {
    type Item = Node<'tree>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = *self.ids.next()?;
        Some(Node {
            tree: self.tree,
            id,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.ids.size_hint()
    }
}

impl ExactSizeIterator for Children<'_> {}
