//! Random-access syntax tree: parent/child/sibling queries derived from a flat,
//! depth-annotated node list.
//!
//! The parser only has to enumerate a node's immediate children (see
//! [`RawNode`]). Everything else is recovered from byte ranges and depth, so
//! the analysis passes can walk up, down and sideways without holding on to
//! the parser's tree.

use std::ops::Range;

use crate::GenError;

/// Position of a node in the depth-first, source-ordered node list.
///
/// Equivalent to the `(start, end, depth)` triple, which is unique even when
/// a parent and its only child share a byte range.
pub type NodeId = usize;

/// One syntax node. Immutable once the index is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyntaxNode {
    pub kind: &'static str,
    pub start: usize,
    pub end: usize,
    /// Nesting level from the root (root = 0).
    pub depth: usize,
    /// Grammar field under which this node hangs off its parent.
    pub field: Option<&'static str>,
}

impl SyntaxNode {
    /// True when `other`'s range lies inside this node's range.
    pub fn contains(&self, other: &SyntaxNode) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

/// Minimal capability required from an external parser.
pub trait RawNode: Sized {
    fn kind(&self) -> &'static str;
    fn byte_range(&self) -> Range<usize>;
    /// Visit immediate children in source order, with their field names.
    fn for_each_child<F: FnMut(Self, Option<&'static str>)>(&self, f: F);
}

impl<'tree> RawNode for tree_sitter::Node<'tree> {
    fn kind(&self) -> &'static str {
        tree_sitter::Node::kind(self)
    }

    fn byte_range(&self) -> Range<usize> {
        tree_sitter::Node::byte_range(self)
    }

    /// Only named, non-extra nodes are indexed: punctuation and comments never
    /// take part in the analysis and would shift sibling positions.
    fn for_each_child<F: FnMut(Self, Option<&'static str>)>(&self, mut f: F) {
        let mut cursor = self.walk();
        if !cursor.goto_first_child() {
            return;
        }
        loop {
            let child = cursor.node();
            if child.is_named() && !child.is_extra() {
                f(child, cursor.field_name());
            }
            if !cursor.goto_next_sibling() {
                break;
            }
        }
    }
}

/// Nodes at the same depth as a given node, split around it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Siblings {
    /// Nodes ending before the node starts, in source order.
    pub previous: Vec<NodeId>,
    /// Nodes starting after the node ends, in source order.
    pub next: Vec<NodeId>,
}

// ─── Index ──────────────────────────────────────────────────────────

/// Flat node list plus the relations precomputed over it.
#[derive(Debug, Clone)]
pub struct SyntaxTreeIndex<'src> {
    source: &'src str,
    nodes: Vec<SyntaxNode>,
    parents: Vec<Option<NodeId>>,
    /// Exclusive end of each node's descendant run in `nodes`.
    subtree_end: Vec<NodeId>,
    /// Node ids per depth, in source order.
    by_depth: Vec<Vec<NodeId>>,
}

impl<'src> SyntaxTreeIndex<'src> {
    /// Traverse `root` depth-first in source order, assigning depths, and index
    /// the resulting list.
    pub fn build<N: RawNode>(root: N, source: &'src str) -> Result<Self, GenError> {
        let mut nodes = Vec::new();
        let mut stack = vec![(root, 0usize, None)];

        while let Some((node, depth, field)) = stack.pop() {
            let range = node.byte_range();
            nodes.push(SyntaxNode {
                kind: node.kind(),
                start: range.start,
                end: range.end,
                depth,
                field,
            });
            let mut children = Vec::new();
            node.for_each_child(|child, field| children.push((child, depth + 1, field)));
            stack.extend(children.into_iter().rev());
        }

        Self::from_nodes(nodes, source)
    }

    /// Index an existing depth-first node list.
    ///
    /// Fails when a non-root node has no node at `depth - 1` before it that
    /// contains its range.
    pub fn from_nodes(nodes: Vec<SyntaxNode>, source: &'src str) -> Result<Self, GenError> {
        let mut parents = Vec::with_capacity(nodes.len());
        let mut subtree_end = vec![nodes.len(); nodes.len()];
        let mut by_depth: Vec<Vec<NodeId>> = Vec::new();
        // last node seen at each depth, i.e. the open ancestor chain
        let mut open: Vec<NodeId> = Vec::new();

        for (id, node) in nodes.iter().enumerate() {
            let parent = if node.depth == 0 && id == 0 {
                None
            } else {
                let candidate = node
                    .depth
                    .checked_sub(1)
                    .and_then(|d| open.get(d).copied())
                    .filter(|&p| nodes[p].contains(node));
                match candidate {
                    Some(p) => Some(p),
                    None => {
                        return Err(GenError::OrphanNode {
                            kind: node.kind.to_string(),
                            start: node.start,
                            end: node.end,
                        });
                    }
                }
            };
            parents.push(parent);

            for closed in open.drain(node.depth..) {
                subtree_end[closed] = id;
            }
            open.push(id);

            if by_depth.len() <= node.depth {
                by_depth.resize_with(node.depth + 1, Vec::new);
            }
            by_depth[node.depth].push(id);
        }

        Ok(Self {
            source,
            nodes,
            parents,
            subtree_end,
            by_depth,
        })
    }

    // ─── Basic accessors ────────────────────────────────────────────

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn root(&self) -> NodeId {
        0
    }

    pub fn node(&self, id: NodeId) -> &SyntaxNode {
        &self.nodes[id]
    }

    pub fn nodes(&self) -> &[SyntaxNode] {
        &self.nodes
    }

    pub fn kind(&self, id: NodeId) -> &'static str {
        self.nodes[id].kind
    }

    pub fn source(&self) -> &'src str {
        self.source
    }

    /// Exact source text of a node.
    pub fn text(&self, id: NodeId) -> &'src str {
        let node = &self.nodes[id];
        self.source.get(node.start..node.end).unwrap_or("")
    }

    // ─── Relations ──────────────────────────────────────────────────

    /// All descendants of `id` (any depth), in source order.
    pub fn children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let node = self.nodes[id];
        (id + 1..self.subtree_end[id])
            .filter(move |&m| node.contains(&self.nodes[m]) && self.nodes[m].depth > node.depth)
    }

    /// Descendants exactly one level below `id`.
    pub fn immediate_children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let end = self.subtree_end[id];
        let mut next = id + 1;
        std::iter::from_fn(move || {
            if next >= end {
                return None;
            }
            let current = next;
            next = self.subtree_end[current];
            Some(current)
        })
    }

    /// Enclosing node one level up. `None` only for the root.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.parents[id]
    }

    /// Like [`parent`](Self::parent), for callers that require one to exist.
    pub fn expect_parent(&self, id: NodeId) -> Result<NodeId, GenError> {
        self.parent(id).ok_or_else(|| {
            let node = &self.nodes[id];
            GenError::OrphanNode {
                kind: node.kind.to_string(),
                start: node.start,
                end: node.end,
            }
        })
    }

    /// Parent, grandparent, ... up to the root.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), move |&p| self.parent(p))
    }

    /// Same-depth nodes across the whole tree, split around `id`.
    pub fn siblings(&self, id: NodeId) -> Siblings {
        let node = &self.nodes[id];
        let mut siblings = Siblings::default();
        for &other in &self.by_depth[node.depth] {
            if other == id {
                continue;
            }
            let o = &self.nodes[other];
            if o.end <= node.start {
                siblings.previous.push(other);
            } else if o.start >= node.end {
                siblings.next.push(other);
            }
        }
        siblings
    }

    // ─── Kind/field lookups ─────────────────────────────────────────

    pub fn child_by_field(&self, id: NodeId, field: &str) -> Option<NodeId> {
        self.immediate_children(id)
            .find(|&c| self.nodes[c].field == Some(field))
    }

    pub fn child_of_kind(&self, id: NodeId, kind: &str) -> Option<NodeId> {
        self.immediate_children(id).find(|&c| self.nodes[c].kind == kind)
    }

    pub fn first_descendant_of_kind(&self, id: NodeId, kind: &str) -> Option<NodeId> {
        self.children(id).find(|&c| self.nodes[c].kind == kind)
    }

    pub fn descendants_of_kind<'k>(
        &'k self,
        id: NodeId,
        kinds: &'k [&str],
    ) -> impl Iterator<Item = NodeId> + 'k {
        self.children(id).filter(move |&c| kinds.contains(&self.nodes[c].kind))
    }

    /// Debug dump: one line per node, `depth`, dashes, kind and first text line.
    pub fn render_tree(&self) -> String {
        let mut out = String::new();
        for (id, node) in self.nodes.iter().enumerate() {
            let text = self.text(id).lines().next().unwrap_or("");
            out.push_str(&format!(
                "{}{}({}): {}\n",
                node.depth,
                "-".repeat(node.depth),
                node.kind,
                text.trim()
            ));
        }
        out
    }
}

// ─── TypeScript entry point ─────────────────────────────────────────

/// Parse TypeScript source with tree-sitter and index the resulting tree.
pub fn index_typescript(source: &str) -> Result<SyntaxTreeIndex<'_>, GenError> {
    let mut parser = tree_sitter::Parser::new();
    parser.set_language(&tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into())?;
    let tree = parser.parse(source, None).ok_or(GenError::Parse)?;
    SyntaxTreeIndex::build(tree.root_node(), source)
}

#[cfg(test)]
#[path = "tree_tests.rs"]
mod tests;
