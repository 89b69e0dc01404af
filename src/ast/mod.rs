//! AST node model.
//!
//! Children are owned by their parent and the parent link is modeled as a
//! non-owning reference: an index into a parse-local arena rather than a
//! second owner. The whole tree for one parse lives in one arena (`Ast`),
//! nodes are addressed by [`NodeId`], and `parent` is just another `NodeId`.
//! This gives upward reachability (needed for `find_parent`) for free,
//! alongside the usual downward traversal helpers.

mod json;
mod ops;

pub use json::{deserialize_ast, serialize_ast, AstFile};

use crate::position::SourceLocation;
use ptree::TreeItem;
use std::borrow::Cow;
use std::fmt;

/// A non-owning reference to a node inside one [`Ast`]'s arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

#[derive(Debug, Clone)]
pub(crate) struct AstNodeData {
    pub text: String,
    pub location: SourceLocation,
    pub children: Vec<NodeId>,
    pub parent: Option<NodeId>,
}

/// An abstract syntax tree: the rule name for interior nodes, the token
/// lexeme for leaves, with an ordered child list and a real parent
/// back-reference.
#[derive(Debug, Clone)]
pub struct Ast {
    pub(crate) nodes: Vec<AstNodeData>,
    pub(crate) root: NodeId,
}

impl Ast {
    /// Start a new tree with a single root node.
    pub fn new(text: impl Into<String>, location: SourceLocation) -> Self {
        Self {
            nodes: vec![AstNodeData {
                text: text.into(),
                location,
                children: Vec::new(),
                parent: None,
            }],
            root: NodeId(0),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn text(&self, id: NodeId) -> &str {
        &self.nodes[id.0].text
    }

    pub fn location(&self, id: NodeId) -> SourceLocation {
        self.nodes[id.0].location
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    /// Add a leaf or interior child under `parent`.
    pub fn add_child(&mut self, parent: NodeId, text: impl Into<String>, location: SourceLocation) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(AstNodeData {
            text: text.into(),
            location,
            children: Vec::new(),
            parent: Some(parent),
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Graft another tree's nodes wholesale under `parent`, returning the
    /// (renumbered) id of `other`'s former root. Used when a parse algorithm
    /// builds a non-terminal's subtree as its own standalone `Ast` (e.g. out
    /// of the packrat cache) and needs to attach it to a growing parent.
    pub fn graft(&mut self, parent: NodeId, other: Ast) -> NodeId {
        let offset = self.nodes.len();
        for mut data in other.nodes {
            data.parent = Some(data.parent.map_or(parent, |p| NodeId(p.0 + offset)));
            for child in &mut data.children {
                child.0 += offset;
            }
            self.nodes.push(data);
        }
        let new_root = NodeId(other.root.0 + offset);
        self.nodes[parent.0].children.push(new_root);
        new_root
    }

    /// Detach `id` (and its subtree) into its own standalone `Ast`, removing
    /// it from its current parent's child list. Used by the Quick/Slow
    /// algorithms to move a successfully-parsed subtree into the packrat
    /// cache.
    pub fn detach(&mut self, id: NodeId) -> Ast {
        if let Some(parent) = self.nodes[id.0].parent {
            self.nodes[parent.0].children.retain(|c| *c != id);
        }
        self.extract_subtree(id)
    }

    fn extract_subtree(&self, id: NodeId) -> Ast {
        let mut out_nodes = Vec::new();
        let mut mapping = std::collections::HashMap::new();
        self.copy_into(id, None, &mut out_nodes, &mut mapping);
        Ast {
            nodes: out_nodes,
            root: mapping[&id],
        }
    }

    fn copy_into(
        &self,
        id: NodeId,
        new_parent: Option<NodeId>,
        out: &mut Vec<AstNodeData>,
        mapping: &mut std::collections::HashMap<NodeId, NodeId>,
    ) -> NodeId {
        let new_id = NodeId(out.len());
        out.push(AstNodeData {
            text: self.nodes[id.0].text.clone(),
            location: self.nodes[id.0].location,
            children: Vec::new(),
            parent: new_parent,
        });
        mapping.insert(id, new_id);
        let mut new_children = Vec::with_capacity(self.nodes[id.0].children.len());
        for &child in &self.nodes[id.0].children {
            new_children.push(self.copy_into(child, Some(new_id), out, mapping));
        }
        out[new_id.0].children = new_children;
        new_id
    }

    /// A full structural deep copy of the subtree rooted at `id`.
    pub fn clone_subtree(&self, id: NodeId) -> Ast {
        self.extract_subtree(id)
    }

    /// The node count of the subtree rooted at `id`, `id` included.
    pub fn calc_size(&self, id: NodeId) -> usize {
        1 + self.children(id).iter().map(|c| self.calc_size(*c)).sum::<usize>()
    }

    pub fn print(&self) -> std::io::Result<()> {
        ptree::print_tree(&AstView { ast: self, id: self.root })
    }
}

impl fmt::Display for Ast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_node(self.root, f)
    }
}

impl Ast {
    fn fmt_node(&self, id: NodeId, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text(id))?;
        let children = self.children(id);
        if !children.is_empty() {
            write!(f, "(")?;
            for (i, child) in children.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                self.fmt_node(*child, f)?;
            }
            write!(f, ")")?;
        }
        Ok(())
    }
}

struct AstView<'a> {
    ast: &'a Ast,
    id: NodeId,
}

impl<'a> TreeItem for AstView<'a> {
    type Child = AstView<'a>;

    fn write_self<W: std::io::Write>(&self, f: &mut W, _: &ptree::Style) -> std::io::Result<()> {
        let loc = self.ast.location(self.id);
        write!(f, "{} # {}:{}", self.ast.text(self.id), loc.line, loc.column)
    }

    fn children(&self) -> Cow<[Self::Child]> {
        Cow::from(
            self.ast
                .children(self.id)
                .iter()
                .map(|&id| AstView { ast: self.ast, id })
                .collect::<Vec<_>>(),
        )
    }
}
