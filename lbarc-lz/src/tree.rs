//! Arena binary search tree used by both compressors for string matching.
//!
//! Nodes are window (or ring) positions. The string a node stands for is
//! owned by the compressor; the tree only keeps the links. One extra slot
//! past the last window position acts as the sentinel root whose single
//! child is the real tree.

/// Which child link to follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// Strings comparing lower than the node.
    Smaller = 0,
    /// Strings comparing equal or higher than the node.
    Larger = 1,
}

impl Side {
    /// Pick the side from the first differing byte (`new - existing`).
    pub fn toward(delta: i32) -> Self {
        if delta >= 0 { Self::Larger } else { Self::Smaller }
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Node {
    parent: Option<usize>,
    children: [Option<usize>; 2],
}

/// Binary search tree over a fixed number of position slots.
#[derive(Debug, Clone)]
pub struct MatchTree {
    nodes: Vec<Node>,
    root: usize,
}

impl MatchTree {
    /// Create an empty tree over `slots` positions.
    pub fn new(slots: usize) -> Self {
        Self {
            nodes: vec![Node::default(); slots + 1],
            root: slots,
        }
    }

    /// Unlink every node.
    pub fn clear(&mut self) {
        self.nodes.fill(Node::default());
    }

    /// Top node of the tree, if any.
    pub fn first(&self) -> Option<usize> {
        self.nodes[self.root].children[Side::Larger as usize]
    }

    /// Make `node` the only node of an empty tree.
    pub fn set_first(&mut self, node: usize) {
        self.attach(self.root, Side::Larger, node);
    }

    /// Check if `node` is currently linked into the tree.
    pub fn contains(&self, node: usize) -> bool {
        self.nodes[node].parent.is_some()
    }

    /// Child of `node` on `side`.
    pub fn child(&self, node: usize, side: Side) -> Option<usize> {
        self.nodes[node].children[side as usize]
    }

    /// Hang the detached `node` below `parent` as a leaf.
    pub fn attach(&mut self, parent: usize, side: Side, node: usize) {
        self.nodes[parent].children[side as usize] = Some(node);
        self.nodes[node] = Node {
            parent: Some(parent),
            children: [None, None],
        };
    }

    /// Put the detached `new` where `old` is and unlink `old`.
    pub fn replace(&mut self, old: usize, new: usize) {
        let node = self.nodes[old];
        if let Some(parent) = node.parent {
            self.relink(parent, old, Some(new));
        }
        self.nodes[new] = node;
        for child in node.children.into_iter().flatten() {
            self.nodes[child].parent = Some(new);
        }
        self.nodes[old] = Node::default();
    }

    /// Remove `node` from the tree. Does nothing if it is not linked.
    ///
    /// A node with at most one child is spliced out. Otherwise its in-order
    /// predecessor (smaller child, then larger links to the end) is removed
    /// first and then takes the node's place.
    pub fn remove(&mut self, node: usize) {
        if !self.contains(node) {
            return;
        }

        match self.nodes[node].children {
            [Some(smaller), Some(_)] => {
                let predecessor = self.rightmost(smaller);
                self.remove(predecessor);
                self.replace(node, predecessor);
            }
            [only, None] | [None, only] => self.contract(node, only),
        }
    }

    fn rightmost(&self, mut node: usize) -> usize {
        while let Some(next) = self.child(node, Side::Larger) {
            node = next;
        }
        node
    }

    /// Pull `child` up into the place of `node`.
    fn contract(&mut self, node: usize, child: Option<usize>) {
        let parent = self.nodes[node].parent;
        if let Some(child) = child {
            self.nodes[child].parent = parent;
        }
        if let Some(parent) = parent {
            self.relink(parent, node, child);
        }
        self.nodes[node] = Node::default();
    }

    fn relink(&mut self, parent: usize, old: usize, new: Option<usize>) {
        let links = &mut self.nodes[parent].children;
        if links[Side::Larger as usize] == Some(old) {
            links[Side::Larger as usize] = new;
        } else {
            links[Side::Smaller as usize] = new;
        }
    }
}
