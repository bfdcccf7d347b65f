use crate::error::Result;

/// Disjoint-set forest over provisional labels `1..=N`.
///
/// Slot 0 is reserved for background and never joins a class. Every set root
/// also records the smallest label in its set, so the canonical root can be
/// read off regardless of which element ended up as the tree root.
#[derive(Debug, Clone)]
pub struct EquivalenceTable {
    parent: Vec<u32>,
    rank: Vec<u8>,
    min_label: Vec<u32>,
}

impl EquivalenceTable {
    pub fn new() -> Self {
        Self {
            parent: vec![0],
            rank: vec![0],
            min_label: vec![0],
        }
    }

    /// Allocate the next provisional label as a singleton class.
    pub fn make_label(&mut self) -> Result<u32> {
        let label = self.parent.len() as u32;
        self.parent.try_reserve(1)?;
        self.rank.try_reserve(1)?;
        self.min_label.try_reserve(1)?;
        self.parent.push(label);
        self.rank.push(0);
        self.min_label.push(label);
        Ok(label)
    }

    /// Number of provisional labels created so far.
    pub fn len(&self) -> usize {
        self.parent.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Tree root of the set containing `label`, halving the path on the way up.
    #[inline]
    pub fn find(&mut self, label: u32) -> u32 {
        let mut node = label as usize;
        while self.parent[node] as usize != node {
            let grandparent = self.parent[self.parent[node] as usize];
            self.parent[node] = grandparent;
            node = grandparent as usize;
        }
        node as u32
    }

    /// Merge the classes of `a` and `b`, by rank. Returns the surviving tree root.
    #[inline]
    pub fn union(&mut self, a: u32, b: u32) -> u32 {
        let root_a = self.find(a) as usize;
        let root_b = self.find(b) as usize;
        if root_a == root_b {
            return root_a as u32;
        }

        let (child, root) = match self.rank[root_a].cmp(&self.rank[root_b]) {
            std::cmp::Ordering::Less => (root_a, root_b),
            std::cmp::Ordering::Greater => (root_b, root_a),
            std::cmp::Ordering::Equal => {
                self.rank[root_a] = self.rank[root_a].saturating_add(1);
                (root_b, root_a)
            }
        };
        self.parent[child] = root as u32;
        self.min_label[root] = self.min_label[root].min(self.min_label[child]);
        root as u32
    }

    /// Whether `a` and `b` currently belong to the same class.
    pub fn equivalent(&mut self, a: u32, b: u32) -> bool {
        self.find(a) == self.find(b)
    }

    /// Collapse the forest into a flat table mapping each label to the
    /// minimum label of its class.
    pub fn resolve(mut self) -> Result<RootTable> {
        let mut roots = Vec::new();
        roots.try_reserve_exact(self.parent.len())?;
        roots.push(0);
        for label in 1..self.parent.len() as u32 {
            let tree_root = self.find(label) as usize;
            roots.push(self.min_label[tree_root]);
        }
        Ok(RootTable { roots })
    }
}

impl Default for EquivalenceTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Canonical root of every provisional label: the minimum label in its class.
///
/// `root(root(x)) == root(x)` and `root(x) <= x` hold for every label, and two
/// labels share a root exactly when they are equivalent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootTable {
    roots: Vec<u32>,
}

impl RootTable {
    #[inline]
    pub fn root(&self, label: u32) -> u32 {
        self.roots[label as usize]
    }

    /// Number of provisional labels covered by the table.
    pub fn len(&self) -> usize {
        self.roots.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of distinct classes.
    pub fn class_count(&self) -> usize {
        self.roots
            .iter()
            .enumerate()
            .skip(1)
            .filter(|&(label, &root)| label as u32 == root)
            .count()
    }
}
