//! Reference payloads for [`TopTree`](crate::TopTree).
//!
//! Each payload describes a cluster: the vertices and edges of a splay subtree plus everything
//! hanging below it through light edges. After an `access_*` call the exposed node's payload
//! describes the requested region.

use std::mem;

use crate::traits::{Aggregate, Kids, KidsMut};

/// Pure connectivity payload.
impl Aggregate for () {
    #[inline(always)]
    fn pushup(&mut self, _kids: Kids<'_, Self>) {}
}

/// Sums of `i64` vertex values over paths, subtrees and components, with lazy range adds.
///
/// After `access_path(u, v)`: `path` / `path_size` cover the path `u..=v`.
/// After `access_subtree(u, r)`: `subtree` / `subtree_size` cover the subtree of `u` rooted at
/// `r`. After `access_tree(u)`: `subtree` / `subtree_size` cover the component.
///
/// Edge payloads should be `SumNode::default()`; edges carry no value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SumNode {
    pub value: i64,
    pub path: i64,
    pub path_size: usize,
    pub subtree: i64,
    pub subtree_size: usize,
    cluster: i64,
    cluster_size: usize,
    lazy_path: i64,
    lazy_subtree: i64,
    lazy_cluster: i64,
}

impl SumNode {
    pub fn new(value: i64) -> Self {
        Self {
            value,
            path: value,
            path_size: 1,
            subtree: value,
            subtree_size: 1,
            cluster: value,
            cluster_size: 1,
            ..Self::default()
        }
    }

    /// Overwrite the vertex value, keeping this node's aggregates consistent.
    pub fn set_value(&mut self, value: i64) {
        let delta = value.wrapping_sub(self.value);
        self.value = value;
        self.path = self.path.wrapping_add(delta);
        self.subtree = self.subtree.wrapping_add(delta);
        self.cluster = self.cluster.wrapping_add(delta);
    }

    /// Add `x` to every vertex on the exposed path.
    pub fn add_path(&mut self, x: i64) {
        if self.cluster_size == 0 {
            return;
        }
        let len = self.path_size as i64;
        self.value = self.value.wrapping_add(x);
        self.path = self.path.wrapping_add(x.wrapping_mul(len));
        self.cluster = self.cluster.wrapping_add(x.wrapping_mul(len));
        self.subtree = self.subtree.wrapping_add(x);
        self.lazy_path = self.lazy_path.wrapping_add(x);
    }

    /// Add `x` to this vertex and everything hanging below it through light edges.
    pub fn add_subtree(&mut self, x: i64) {
        if self.cluster_size == 0 {
            return;
        }
        let len = self.subtree_size as i64;
        self.value = self.value.wrapping_add(x);
        self.path = self.path.wrapping_add(x);
        self.cluster = self.cluster.wrapping_add(x.wrapping_mul(len));
        self.subtree = self.subtree.wrapping_add(x.wrapping_mul(len));
        self.lazy_subtree = self.lazy_subtree.wrapping_add(x);
    }

    // Add `x` to every vertex of the cluster.
    fn add_cluster(&mut self, is_vertex: bool, x: i64) {
        if self.cluster_size == 0 {
            return;
        }
        if is_vertex {
            self.value = self.value.wrapping_add(x);
        }
        self.path = self
            .path
            .wrapping_add(x.wrapping_mul(self.path_size as i64));
        self.cluster = self
            .cluster
            .wrapping_add(x.wrapping_mul(self.cluster_size as i64));
        self.subtree = self
            .subtree
            .wrapping_add(x.wrapping_mul(self.subtree_size as i64));
        self.lazy_cluster = self.lazy_cluster.wrapping_add(x);
    }
}

impl From<i64> for SumNode {
    fn from(value: i64) -> Self {
        Self::new(value)
    }
}

impl Aggregate for SumNode {
    fn pushup(&mut self, kids: Kids<'_, Self>) {
        debug_assert_eq!(self.lazy_path, 0);
        debug_assert_eq!(self.lazy_subtree, 0);
        debug_assert_eq!(self.lazy_cluster, 0);
        let Kids {
            is_vertex,
            left,
            right,
            light,
            ..
        } = kids;
        let me = usize::from(is_vertex);
        let value = if is_vertex { self.value } else { 0 };

        self.path_size = me + left.path_size + right.path_size;
        self.cluster_size = me + left.cluster_size + right.cluster_size + light.cluster_size;
        self.subtree_size = me + light.cluster_size;

        self.path = value.wrapping_add(left.path).wrapping_add(right.path);
        self.cluster = value
            .wrapping_add(left.cluster)
            .wrapping_add(right.cluster)
            .wrapping_add(light.cluster);
        self.subtree = value.wrapping_add(light.cluster);
    }

    fn pushdown(&mut self, kids: KidsMut<'_, Self>) {
        let KidsMut {
            is_vertex,
            mut left,
            mut right,
            mut light,
            ..
        } = kids;

        let x = mem::take(&mut self.lazy_subtree);
        if x != 0 {
            if let Some(t) = light.as_deref_mut() {
                t.add_cluster(!is_vertex, x);
            }
        }

        let x = mem::take(&mut self.lazy_path);
        if x != 0 {
            for c in [left.as_deref_mut(), right.as_deref_mut()].into_iter().flatten() {
                c.add_path(x);
            }
        }

        let x = mem::take(&mut self.lazy_cluster);
        if x != 0 {
            for c in [left.as_deref_mut(), right.as_deref_mut()].into_iter().flatten() {
                c.add_cluster(is_vertex, x);
            }
            if let Some(t) = light.as_deref_mut() {
                t.add_cluster(!is_vertex, x);
            }
        }
    }
}

/// Sums over vertex values *and* edge weights.
///
/// Heavy edges are not part of any splay tree, so a vertex reads the weights of the edges to
/// its path neighbours through the `upper`/`lower` slots.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EdgePathSum {
    /// Vertex value, or edge weight.
    pub weight: i64,
    /// After `access_path(u, v)`: vertices and edges of the path `u..=v`.
    pub path: i64,
    /// After `access_subtree` / `access_tree`: vertices and edges of the subtree / component.
    pub subtree: i64,
    cluster: i64,
}

impl EdgePathSum {
    pub fn vertex(value: i64) -> Self {
        Self {
            weight: value,
            path: value,
            subtree: value,
            cluster: value,
        }
    }

    pub fn edge(weight: i64) -> Self {
        Self {
            weight,
            ..Self::default()
        }
    }
}

impl From<i64> for EdgePathSum {
    fn from(value: i64) -> Self {
        Self::vertex(value)
    }
}

impl Aggregate for EdgePathSum {
    const FULL_PUSHUP: bool = true;

    fn pushup(&mut self, kids: Kids<'_, Self>) {
        let Kids {
            is_vertex,
            left,
            right,
            light,
            upper,
            lower,
        } = kids;
        let below = left
            .cluster
            .wrapping_add(right.cluster)
            .wrapping_add(light.cluster);
        if is_vertex {
            let joints = upper.weight.wrapping_add(lower.weight);
            self.path = self
                .weight
                .wrapping_add(left.path)
                .wrapping_add(right.path)
                .wrapping_add(joints);
            self.cluster = self.weight.wrapping_add(below).wrapping_add(joints);
            self.subtree = self.weight.wrapping_add(light.cluster);
        } else {
            self.path = 0;
            self.cluster = self.weight.wrapping_add(below);
            self.subtree = self.cluster;
        }
    }
}

/// Edge weights with a lazy "add `x` to every edge on the path".
///
/// Vertices carry no weight. A pending add on a vertex covers every edge of its splay subtree,
/// the `upper`/`lower` joints included, so it is pushed into those edges as well as into the
/// left and right children. Rake trees never see it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EdgePathAdd {
    /// Edge weight. Always 0 on vertices.
    pub weight: i64,
    /// After `access_path(u, v)`: sum of the edge weights on the path `u..=v`.
    pub path: i64,
    /// After `access_path(u, v)`: number of edges on the path.
    pub path_edges: usize,
    // 1 on aggregated edge nodes, so a missing joint counts for nothing.
    unit: usize,
    lazy: i64,
}

impl EdgePathAdd {
    pub fn edge(weight: i64) -> Self {
        Self {
            weight,
            unit: 1,
            ..Self::default()
        }
    }

    /// Add `x` to every edge of the exposed path.
    pub fn add_path(&mut self, x: i64) {
        self.path = self
            .path
            .wrapping_add(x.wrapping_mul(self.path_edges as i64));
        self.lazy = self.lazy.wrapping_add(x);
    }
}

impl Aggregate for EdgePathAdd {
    const FULL_PUSHUP: bool = true;
    const FULL_PUSHDOWN: bool = true;

    fn pushup(&mut self, kids: Kids<'_, Self>) {
        let Kids {
            is_vertex,
            left,
            right,
            upper,
            lower,
            ..
        } = kids;
        if is_vertex {
            self.path = left
                .path
                .wrapping_add(right.path)
                .wrapping_add(upper.weight)
                .wrapping_add(lower.weight);
            self.path_edges = left.path_edges + right.path_edges + upper.unit + lower.unit;
        } else {
            self.unit = 1;
            self.path = 0;
            self.path_edges = 0;
        }
    }

    fn pushdown(&mut self, kids: KidsMut<'_, Self>) {
        if !kids.is_vertex || self.lazy == 0 {
            return;
        }
        let x = mem::take(&mut self.lazy);
        for child in [kids.left, kids.right].into_iter().flatten() {
            child.add_path(x);
        }
        for edge in [kids.upper, kids.lower].into_iter().flatten() {
            edge.weight = edge.weight.wrapping_add(x);
        }
    }
}

/// Maximal runs of marked vertices along a path segment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Runs {
    full: bool,
    // Marked vertices connected to the top / bottom end, including what hangs off them.
    head: i64,
    tail: i64,
    // Sum of squared sizes of groups that can no longer grow.
    closed: i64,
    // For rake edges: squared size of the group touching the owner, closed if the owner is not
    // marked.
    hanging: i64,
}

impl Default for Runs {
    fn default() -> Self {
        Self {
            full: true,
            head: 0,
            tail: 0,
            closed: 0,
            hanging: 0,
        }
    }
}

#[inline(always)]
fn sq(x: i64) -> i64 {
    x.wrapping_mul(x)
}

impl Runs {
    // `closed` when nothing will ever attach below the bottom end.
    fn closed_below(&self) -> i64 {
        if self.full {
            self.closed
        } else {
            self.closed.wrapping_add(sq(self.tail))
        }
    }

    fn score(&self) -> i64 {
        self.closed_below().wrapping_add(sq(self.head))
    }

    fn flip(&mut self) {
        mem::swap(&mut self.head, &mut self.tail);
    }

    fn add(&mut self, o: &Self) {
        self.closed = self.closed.wrapping_add(o.closed);
        self.head = self.head.wrapping_add(o.head);
        self.tail = self.tail.wrapping_add(o.tail);
        self.hanging = self.hanging.wrapping_add(o.hanging);
    }

    fn edge(below: &Self) -> Self {
        Self {
            full: true,
            head: below.head,
            tail: below.head,
            closed: below.closed_below(),
            hanging: sq(below.head),
        }
    }

    fn vertex(marked: bool, rake: &Self) -> Self {
        Self {
            full: marked,
            head: if marked { 1 + rake.head } else { 0 },
            tail: if marked { 1 + rake.tail } else { 0 },
            closed: if marked {
                rake.closed
            } else {
                rake.closed.wrapping_add(rake.hanging)
            },
            hanging: 0,
        }
    }

    // `a` on top of `b`.
    fn merge(a: &Self, b: &Self) -> Self {
        let bridge = if a.full || b.full {
            0
        } else {
            sq(a.tail + b.head)
        };
        Self {
            full: a.full && b.full,
            head: if a.full { a.head + b.head } else { a.head },
            tail: if b.full { a.tail + b.tail } else { b.tail },
            closed: a.closed.wrapping_add(b.closed).wrapping_add(bridge),
            hanging: 0,
        }
    }
}

/// Vertices are marked or not; scores the sum, over maximal connected groups of marked
/// vertices, of the squared group size.
///
/// Read [`score`](Self::score) after `access_tree(u)` for the component of `u`. Toggle marks
/// through [`TopTree::modify_node`](crate::TopTree::modify_node).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MarkedClusters {
    pub marked: bool,
    runs: Runs,
}

impl MarkedClusters {
    pub fn new(marked: bool) -> Self {
        Self {
            marked,
            runs: Runs::vertex(marked, &Runs::default()),
        }
    }

    pub fn score(&self) -> i64 {
        self.runs.score()
    }
}

impl From<bool> for MarkedClusters {
    fn from(marked: bool) -> Self {
        Self::new(marked)
    }
}

impl Aggregate for MarkedClusters {
    fn flip_path(&mut self) {
        self.runs.flip();
    }

    fn pushup(&mut self, kids: Kids<'_, Self>) {
        if kids.is_vertex {
            let me = Runs::vertex(self.marked, &kids.light.runs);
            let runs = Runs::merge(&kids.left.runs, &me);
            self.runs = Runs::merge(&runs, &kids.right.runs);
        } else {
            let mut runs = Runs::edge(&kids.light.runs);
            runs.add(&kids.left.runs);
            runs.add(&kids.right.runs);
            self.runs = runs;
        }
    }
}
