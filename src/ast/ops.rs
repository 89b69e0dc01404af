use super::{Ast, NodeId};
use std::collections::HashSet;

impl Ast {
    /// Post-order: collapse any child whose `text` equals its parent's `text`
    /// by splicing the child's children in its place. Loops to a fixed point
    /// at each level so a chain of three or more same-named generations
    /// collapses in one call (applying twice is the same as applying once).
    pub fn flatten(&mut self, id: NodeId) {
        for child in self.children(id).to_vec() {
            self.flatten(child);
        }

        let text = self.text(id).to_string();
        loop {
            let mut changed = false;
            let mut new_children = Vec::with_capacity(self.children(id).len());
            for child in self.children(id).to_vec() {
                if self.text(child) == text {
                    changed = true;
                    for grandchild in self.children(child).to_vec() {
                        self.nodes[grandchild.0].parent = Some(id);
                        new_children.push(grandchild);
                    }
                } else {
                    new_children.push(child);
                }
            }
            self.nodes[id.0].children = new_children;
            if !changed {
                break;
            }
        }
    }

    /// Removes every descendant whose text is in `set`, along with its
    /// subtree.
    pub fn remove_nodes_with_text(&mut self, id: NodeId, set: &HashSet<String>) {
        let kept: Vec<NodeId> = self
            .children(id)
            .iter()
            .copied()
            .filter(|c| !set.contains(self.text(*c)))
            .collect();
        self.nodes[id.0].children = kept.clone();
        for child in kept {
            self.remove_nodes_with_text(child, set);
        }
    }

    /// Pre-order, depth-limited search starting at (and including) `id`.
    pub fn find_child(&self, id: NodeId, text: &str, max_depth: usize) -> Option<NodeId> {
        if self.text(id) == text {
            return Some(id);
        }
        if max_depth == 0 {
            return None;
        }
        for child in self.children(id) {
            if let Some(found) = self.find_child(*child, text, max_depth - 1) {
                return Some(found);
            }
        }
        None
    }

    /// Walks the parent chain up to `max_depth` ancestors.
    pub fn find_parent(&self, id: NodeId, text: &str, max_depth: usize) -> Option<NodeId> {
        let mut current = self.parent(id);
        let mut depth = 0;
        while let Some(cur) = current {
            if self.text(cur) == text {
                return Some(cur);
            }
            depth += 1;
            if depth >= max_depth {
                return None;
            }
            current = self.parent(cur);
        }
        None
    }
}
