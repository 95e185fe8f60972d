//! NodeArena: storage and structural edits.
//!
//! Nodes are never freed. Removing or replacing a node unlinks it from its
//! parent and leaves it in the arena, unreachable from the root. Every edit
//! goes through this module so that parent links stay consistent: a node
//! has at most one parent, and a node's parent always lists it as a child.

use crate::base::{NodeIndex, NodeList};
use crate::node::{
    BlockData, ExpressionStatementData, IdentifierData, Node, NodeData, NumericLiteralData,
    StringLiteralData, UnaryData,
};
use rejs_scanner::SyntaxKind;
use tracing::trace;

#[derive(Clone, Debug, Default)]
pub struct NodeArena {
    nodes: Vec<Node>,
}

impl NodeArena {
    /// Maximum pre-allocation to avoid capacity overflow in huge files.
    const MAX_NODE_PREALLOC: usize = 5_000_000;

    pub fn new() -> NodeArena {
        NodeArena::default()
    }

    /// Create an arena with pre-allocated capacity.
    pub fn with_capacity(capacity: usize) -> NodeArena {
        NodeArena {
            nodes: Vec::with_capacity(capacity.min(Self::MAX_NODE_PREALLOC)),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    // =========================================================================
    // Creation
    // =========================================================================

    /// Add a node and adopt its children.
    pub fn add(&mut self, data: NodeData, pos: u32, end: u32) -> NodeIndex {
        let index = NodeIndex(self.nodes.len() as u32);
        let mut children = Vec::new();
        data.for_each_child(|child| children.push(child));
        self.nodes.push(Node {
            data,
            pos,
            end,
            parent: NodeIndex::NONE,
        });
        for child in children {
            if let Some(node) = self.nodes.get_mut(child.0 as usize) {
                node.parent = index;
            }
        }
        index
    }

    /// Add a node with no source position.
    pub fn add_synthesized(&mut self, data: NodeData) -> NodeIndex {
        self.add(data, 0, 0)
    }

    pub fn add_identifier(&mut self, name: &str) -> NodeIndex {
        self.add_synthesized(NodeData::Identifier(IdentifierData {
            escaped_text: name.to_string(),
        }))
    }

    /// A string literal with no raw text (printed in canonical form).
    pub fn add_string_literal(&mut self, value: &str) -> NodeIndex {
        self.add_synthesized(NodeData::StringLiteral(StringLiteralData {
            value: value.to_string(),
            raw: None,
            has_lone_surrogate: false,
        }))
    }

    /// A numeric literal. Negative values become `-literal`.
    pub fn add_numeric_literal(&mut self, value: f64) -> NodeIndex {
        if value < 0.0 {
            let operand = self.add_synthesized(NodeData::NumericLiteral(NumericLiteralData {
                value: -value,
                raw: None,
            }));
            return self.add_synthesized(NodeData::PrefixUnary(UnaryData {
                operator: SyntaxKind::MinusToken,
                operand,
            }));
        }
        self.add_synthesized(NodeData::NumericLiteral(NumericLiteralData { value, raw: None }))
    }

    pub fn add_expression_statement(&mut self, expression: NodeIndex) -> NodeIndex {
        self.add_synthesized(NodeData::ExpressionStatement(ExpressionStatementData {
            expression,
        }))
    }

    // =========================================================================
    // Access
    // =========================================================================

    #[inline]
    pub fn get(&self, index: NodeIndex) -> Option<&Node> {
        if index.is_none() {
            return None;
        }
        self.nodes.get(index.0 as usize)
    }

    #[inline]
    pub fn data(&self, index: NodeIndex) -> Option<&NodeData> {
        self.get(index).map(|node| &node.data)
    }

    /// Mutable access to a node's payload.
    ///
    /// Only for edits that leave child slots untouched (clearing raw
    /// literal text, for example). Structural edits go through `replace`,
    /// `detach` and `splice_statement`.
    #[inline]
    pub fn data_mut(&mut self, index: NodeIndex) -> Option<&mut NodeData> {
        if index.is_none() {
            return None;
        }
        self.nodes.get_mut(index.0 as usize).map(|node| &mut node.data)
    }

    #[inline]
    pub fn parent(&self, index: NodeIndex) -> NodeIndex {
        self.get(index).map_or(NodeIndex::NONE, |node| node.parent)
    }

    /// Direct children in source order.
    pub fn children(&self, index: NodeIndex) -> Vec<NodeIndex> {
        let mut children = Vec::new();
        if let Some(data) = self.data(index) {
            data.for_each_child(|child| children.push(child));
        }
        children
    }

    pub fn identifier_text(&self, index: NodeIndex) -> Option<&str> {
        match self.data(index)? {
            NodeData::Identifier(data) => Some(&data.escaped_text),
            _ => None,
        }
    }

    pub fn is_identifier_named(&self, index: NodeIndex, name: &str) -> bool {
        self.identifier_text(index) == Some(name)
    }

    /// True when `index` is reachable from `root` through parent links.
    pub fn is_attached(&self, index: NodeIndex, root: NodeIndex) -> bool {
        let mut current = index;
        let mut steps = 0usize;
        while current.is_some() && steps <= self.nodes.len() {
            if current == root {
                return true;
            }
            current = self.parent(current);
            steps += 1;
        }
        false
    }

    /// Nearest ancestor (excluding `index`) whose data satisfies `predicate`.
    pub fn find_ancestor(
        &self,
        index: NodeIndex,
        mut predicate: impl FnMut(&NodeData) -> bool,
    ) -> Option<NodeIndex> {
        let mut current = self.parent(index);
        let mut steps = 0usize;
        while current.is_some() && steps <= self.nodes.len() {
            if self.data(current).is_some_and(&mut predicate) {
                return Some(current);
            }
            current = self.parent(current);
            steps += 1;
        }
        None
    }

    /// All nodes reachable from `root`, parents before children, children
    /// in source order.
    pub fn preorder(&self, root: NodeIndex) -> Vec<NodeIndex> {
        let mut order = Vec::new();
        let mut stack = vec![root];
        while let Some(index) = stack.pop() {
            let Some(data) = self.data(index) else {
                continue;
            };
            order.push(index);
            let start = stack.len();
            data.for_each_child(|child| stack.push(child));
            stack[start..].reverse();
        }
        order
    }

    // =========================================================================
    // Structural edits
    // =========================================================================

    /// Put `new` in the slot `old` occupies and detach `old`.
    ///
    /// `new` must not be attached elsewhere. Returns false (and changes
    /// nothing) when `old` has no parent or `new` already has one.
    pub fn replace(&mut self, old: NodeIndex, new: NodeIndex) -> bool {
        let parent = self.parent(old);
        if parent.is_none() || self.get(new).is_none_or(|node| node.parent.is_some()) {
            return false;
        }
        let Some(parent_data) = self.data_mut(parent) else {
            return false;
        };
        let mut replaced = false;
        parent_data.for_each_child_mut(|slot| {
            if !replaced && *slot == old {
                *slot = new;
                replaced = true;
            }
        });
        if replaced {
            self.set_parent(old, NodeIndex::NONE);
            self.set_parent(new, parent);
        }
        replaced
    }

    /// Unlink `index` from its parent. List entries are removed from the
    /// list; single slots become `NONE`.
    pub fn detach(&mut self, index: NodeIndex) -> bool {
        let parent = self.parent(index);
        let Some(parent_data) = self.data_mut(parent) else {
            return false;
        };
        let mut detached = false;
        if let Some(list) = parent_data.list_mut() {
            if let Some(position) = list.position(index) {
                list.nodes.remove(position);
                detached = true;
            }
        }
        if !detached {
            parent_data.for_each_child_mut(|slot| {
                if !detached && *slot == index {
                    *slot = NodeIndex::NONE;
                    detached = true;
                }
            });
        }
        if detached {
            self.set_parent(index, NodeIndex::NONE);
        }
        detached
    }

    /// Remove a statement. In a statement list it is dropped; in a single
    /// statement slot (an `if` branch, a loop body) it becomes `;`.
    pub fn remove_statement(&mut self, index: NodeIndex) -> bool {
        self.splice_statement(index, Vec::new())
    }

    /// Replace a statement with zero or more statements.
    ///
    /// Inside a statement list the replacements are spliced in place. In a
    /// single statement slot, one replacement is used directly, none
    /// becomes an empty statement and several are wrapped in a block.
    /// Replacements must be unattached.
    pub fn splice_statement(&mut self, index: NodeIndex, replacements: Vec<NodeIndex>) -> bool {
        let parent = self.parent(index);
        if parent.is_none() {
            return false;
        }

        let in_list = self
            .data(parent)
            .and_then(|data| match data {
                NodeData::Program(block) | NodeData::Block(block) | NodeData::StaticBlock(block) => {
                    Some(&block.statements)
                }
                NodeData::CaseClause(clause) => Some(&clause.statements),
                _ => None,
            })
            .and_then(|list| list.position(index));

        if let Some(position) = in_list {
            let Some(list) = self.data_mut(parent).and_then(NodeData::statement_list_mut) else {
                return false;
            };
            let _ = list
                .nodes
                .splice(position..=position, replacements.iter().copied());
            for replacement in replacements {
                self.set_parent(replacement, parent);
            }
            self.set_parent(index, NodeIndex::NONE);
            trace!(?index, ?parent, "spliced statement list");
            return true;
        }

        let replacement = match replacements.len() {
            0 => self.add_synthesized(NodeData::EmptyStatement),
            1 => replacements[0],
            _ => self.add_synthesized(NodeData::Block(BlockData {
                statements: NodeList::from_vec(replacements),
            })),
        };
        self.replace(index, replacement)
    }

    /// Structural copy of a subtree. The copy is unattached.
    pub fn deep_clone(&mut self, index: NodeIndex) -> NodeIndex {
        let Some(node) = self.get(index) else {
            return NodeIndex::NONE;
        };
        let (mut data, pos, end) = (node.data.clone(), node.pos, node.end);
        data.for_each_child_mut(|slot| {
            if slot.is_some() {
                *slot = self.deep_clone(*slot);
            }
        });
        self.add(data, pos, end)
    }

    fn set_parent(&mut self, index: NodeIndex, parent: NodeIndex) {
        if index.is_none() {
            return;
        }
        if let Some(node) = self.nodes.get_mut(index.0 as usize) {
            node.parent = parent;
        }
    }
}
