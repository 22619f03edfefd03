use std::mem;

use crate::policy::SumNode;
use crate::traits::{Aggregate, DynamicForest, Kids, KidsMut};

mod expose;
mod splay;

#[repr(transparent)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct NodeId(u32);

impl NodeId {
    const NIL: Self = Self(u32::MAX);

    #[inline(always)]
    fn is_nil(self) -> bool {
        self.0 == u32::MAX
    }

    #[inline(always)]
    fn idx(self) -> usize {
        self.0 as usize
    }
}

#[inline(always)]
fn n_id(x: usize) -> NodeId {
    debug_assert!(x < u32::MAX as usize);
    NodeId(x as u32)
}

// Child slots.
const LEFT: usize = 0;
const RIGHT: usize = 1;
const LIGHT: usize = 2;
const UPPER: usize = 3;
const LOWER: usize = 4;

struct Slot<N> {
    parent: NodeId,
    // [LEFT, RIGHT] position inside the splay tree holding this node,
    // LIGHT entry into the tree hanging below,
    // [UPPER, LOWER] adjacent edges of a vertex / endpoints of an edge.
    ch: [NodeId; 5],
    flip: bool,
    data: N,
}

impl<N: Default> Slot<N> {
    fn empty() -> Self {
        Self {
            parent: NodeId::NIL,
            ch: [NodeId::NIL; 5],
            flip: false,
            data: N::default(),
        }
    }
}

/// Self-adjusting top tree over a forest of `n` vertices.
///
/// Vertices are the nodes `[0, n)` and never go away. Every forest edge is a node of its own,
/// drawn from `[n, 2n - 1)` on `link` and recycled on `cut`. Heavy paths are splay trees of
/// vertex nodes; the light edges hanging off a vertex form a second splay tree (the rake tree)
/// of edge nodes, each of which owns the heavy path below it.
///
/// The payload `N` is aggregated bottom-up through [`Aggregate::pushup`] and receives lazy
/// updates through [`Aggregate::pushdown`]. The `access_*` methods expose a region and hand out
/// the payload holding its aggregate; the caller may mutate it in place.
///
/// # Panics
///
/// Every method taking a vertex panics if it is not in `[0, n)`.
pub struct TopTree<N: Aggregate = SumNode> {
    n: usize,
    nodes: Vec<Slot<N>>,
    free: Vec<NodeId>,
    // Stand-in for absent children during `pushup`. Never mutated.
    empty: N,
    stack: Vec<NodeId>,
}

impl<N: Aggregate> TopTree<N> {
    pub fn new(n: usize) -> Self {
        debug_assert!(n < (u32::MAX / 2) as usize);
        let cap = (2 * n).saturating_sub(1);
        let nodes = (0..cap).map(|_| Slot::empty()).collect();
        let free = (n..cap).rev().map(n_id).collect();
        Self {
            n,
            nodes,
            free,
            empty: N::default(),
            stack: Vec::new(),
        }
    }

    /// Build a forest of isolated vertices carrying `values`.
    pub fn from_values<T: Clone + Into<N>>(values: &[T]) -> Self {
        let mut this = Self::new(values.len());
        for (slot, value) in this.nodes.iter_mut().zip(values) {
            slot.data = value.clone().into();
        }
        this
    }

    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Number of edges currently in the forest.
    pub fn edge_count(&self) -> usize {
        self.n.saturating_sub(1) - self.free.len()
    }

    #[inline(always)]
    fn is_vertex(&self, x: NodeId) -> bool {
        x.idx() < self.n
    }

    // Node lookups are unchecked in release, so vertex indices are checked on the way in.
    #[inline(always)]
    fn vertex(&self, u: usize) -> NodeId {
        assert!(
            u < self.n,
            "vertex {u} is out of range for a forest of {} vertices",
            self.n
        );
        n_id(u)
    }

    #[inline(always)]
    fn node(&self, x: NodeId) -> &Slot<N> {
        debug_assert!(!x.is_nil());
        if cfg!(debug_assertions) {
            &self.nodes[x.idx()]
        } else {
            // SAFETY: `NodeId` values are only created from valid indices and `NIL` is checked.
            unsafe { self.nodes.get_unchecked(x.idx()) }
        }
    }

    #[inline(always)]
    fn node_mut(&mut self, x: NodeId) -> &mut Slot<N> {
        debug_assert!(!x.is_nil());
        if cfg!(debug_assertions) {
            &mut self.nodes[x.idx()]
        } else {
            // SAFETY: `NodeId` values are only created from valid indices and `NIL` is checked.
            unsafe { self.nodes.get_unchecked_mut(x.idx()) }
        }
    }

    #[inline(always)]
    fn data(&self, x: NodeId) -> &N {
        if x.is_nil() {
            &self.empty
        } else {
            &self.node(x).data
        }
    }

    fn flip(&mut self, x: NodeId) {
        if x.is_nil() {
            return;
        }
        let node = self.node_mut(x);
        node.ch.swap(LEFT, RIGHT);
        node.ch.swap(UPPER, LOWER);
        node.flip ^= true;
        node.data.flip_path();
    }

    /// The `upper`/`lower` neighbours handed to extended payloads.
    fn boundary(&self, x: NodeId) -> (NodeId, NodeId) {
        let [l, r, _, a, b] = self.node(x).ch;
        if !self.is_vertex(x) {
            return (a, b);
        }
        let hi = if l.is_nil() || a.is_nil() || !self.node(a).ch[LIGHT].is_nil() {
            NodeId::NIL
        } else {
            a
        };
        let lo = if r.is_nil() { NodeId::NIL } else { b };
        (hi, lo)
    }

    fn pushdown(&mut self, x: NodeId) {
        if x.is_nil() {
            return;
        }
        if self.node(x).flip {
            let [l, r, ..] = self.node(x).ch;
            self.flip(l);
            self.flip(r);
            self.node_mut(x).flip = false;
        }

        let [l, r, light, ..] = self.node(x).ch;
        let (hi, lo) = if N::FULL_PUSHDOWN {
            self.boundary(x)
        } else {
            (NodeId::NIL, NodeId::NIL)
        };
        let ids = [l, r, light, hi, lo];
        let mut kids: [Option<N>; 5] = Default::default();
        for (i, &k) in ids.iter().enumerate() {
            if !k.is_nil() && !ids[..i].contains(&k) {
                kids[i] = Some(mem::take(&mut self.node_mut(k).data));
            }
        }

        let is_vertex = self.is_vertex(x);
        let mut data = mem::take(&mut self.node_mut(x).data);
        {
            let [left, right, light, upper, lower] = &mut kids;
            data.pushdown(KidsMut {
                is_vertex,
                left: left.as_mut(),
                right: right.as_mut(),
                light: light.as_mut(),
                upper: upper.as_mut(),
                lower: lower.as_mut(),
            });
        }
        self.node_mut(x).data = data;

        for (k, d) in ids.into_iter().zip(kids) {
            if let Some(d) = d {
                self.node_mut(k).data = d;
            }
        }
    }

    fn pushup(&mut self, x: NodeId) {
        let [l, r, light, ..] = self.node(x).ch;
        let (hi, lo) = if N::FULL_PUSHUP {
            self.boundary(x)
        } else {
            (NodeId::NIL, NodeId::NIL)
        };
        let is_vertex = self.is_vertex(x);
        let mut data = mem::take(&mut self.node_mut(x).data);
        data.pushup(Kids {
            is_vertex,
            left: self.data(l),
            right: self.data(r),
            light: self.data(light),
            upper: self.data(hi),
            lower: self.data(lo),
        });
        self.node_mut(x).data = data;
    }

    fn new_edge(&mut self, upper: NodeId, lower: NodeId, data: N) -> NodeId {
        let e = self
            .free
            .pop()
            .expect("a forest on n vertices has at most n - 1 edges");
        let node = self.node_mut(e);
        node.data = data;
        node.ch[UPPER] = upper;
        node.ch[LOWER] = lower;
        e
    }

    fn release_edge(&mut self, e: NodeId) -> N {
        debug_assert!(!self.is_vertex(e));
        let slot = mem::replace(self.node_mut(e), Slot::empty());
        self.free.push(e);
        slot.data
    }

    // Rotate `v` once towards `u` when it hangs deeper than a direct child.
    fn fixup(&mut self, u: NodeId, v: NodeId) {
        let p = self.node(v).parent;
        if !p.is_nil() && p != u {
            self.pushdown(p);
            self.pushdown(v);
            self.rotate(v);
            self.pushup(v);
        }
    }

    fn reroot_node(&mut self, u: NodeId) {
        self.access(u);
        self.flip(u);
        self.pushdown(u);
    }

    // With `v` as root and `u` exposed, the edge node joining them if they are adjacent.
    fn exposed_edge(&self, u: NodeId, v: NodeId) -> NodeId {
        let nu = self.node(u);
        if nu.parent.is_nil()
            && nu.ch[LEFT] == v
            && self.node(v).parent == u
            && self.node(v).ch[RIGHT].is_nil()
        {
            nu.ch[UPPER]
        } else {
            NodeId::NIL
        }
    }

    fn edge_node(&mut self, u: usize, v: usize) -> NodeId {
        let (u, v) = (self.vertex(u), self.vertex(v));
        if u == v {
            return NodeId::NIL;
        }
        self.reroot_node(v);
        self.access(u);
        self.exposed_edge(u, v)
    }

    pub fn link(&mut self, u: usize, v: usize) -> bool {
        self.link_with_edge(u, v, N::default())
    }

    /// Link `u` and `v` with an edge carrying `edge`.
    ///
    /// Returns `false` (and drops `edge`) if they are already connected.
    pub fn link_with_edge(&mut self, u: usize, v: usize, edge: N) -> bool {
        let (u, v) = (self.vertex(u), self.vertex(v));
        if u == v {
            return false;
        }
        self.reroot_node(v);
        self.access(u);
        if !self.node(v).parent.is_nil() {
            return false;
        }

        let e = self.new_edge(u, v, edge);
        self.node_mut(v).ch[UPPER] = e;
        self.adopt(e, v, Some(LIGHT));
        self.light_insert(u, e);
        self.pushup(u);
        true
    }

    pub fn cut(&mut self, u: usize, v: usize) -> bool {
        self.cut_with_edge(u, v).is_some()
    }

    /// Cut edge `(u, v)` and return its payload, or `None` if there is no such edge.
    pub fn cut_with_edge(&mut self, u: usize, v: usize) -> Option<N> {
        let (u, v) = (self.vertex(u), self.vertex(v));
        if u == v {
            return None;
        }
        self.reroot_node(v);
        self.access(u);
        self.fixup(u, v);
        if self.node(v).parent.is_nil()
            || self.node(u).ch[LEFT] != v
            || !self.node(v).ch[RIGHT].is_nil()
        {
            return None;
        }

        self.pushdown(v);
        let e = self.node(u).ch[UPPER];
        debug_assert!(!e.is_nil() && !self.is_vertex(e));
        let nu = self.node_mut(u);
        nu.ch[LEFT] = NodeId::NIL;
        nu.ch[UPPER] = NodeId::NIL;
        let nv = self.node_mut(v);
        nv.parent = NodeId::NIL;
        nv.ch[LOWER] = NodeId::NIL;
        let data = self.release_edge(e);
        self.pushup(u);
        self.pushup(v);
        Some(data)
    }

    pub fn reroot(&mut self, u: usize) {
        let u = self.vertex(u);
        self.reroot_node(u);
    }

    pub fn find_root(&mut self, u: usize) -> usize {
        let u = self.vertex(u);
        self.access(u);
        let r = self.min_node(u);
        self.splay(r);
        r.idx()
    }

    /// Lowest common ancestor of `u` and `v` under the current root.
    ///
    /// Returns `None` if they are in different components.
    pub fn lca(&mut self, u: usize, v: usize) -> Option<usize> {
        let (u, v) = (self.vertex(u), self.vertex(v));
        if u == v {
            return Some(u.idx());
        }
        self.access(u);
        let w = self.access(v);
        if self.node(u).parent.is_nil() {
            None
        } else {
            Some(w.idx())
        }
    }

    pub fn connected(&mut self, u: usize, v: usize) -> bool {
        self.lca(u, v).is_some()
    }

    /// The payload of `u` itself.
    pub fn access_node(&mut self, u: usize) -> &mut N {
        let u = self.vertex(u);
        self.access(u);
        &mut self.node_mut(u).data
    }

    /// Apply `f` to the payload of `u` and recompute its aggregate.
    ///
    /// For edits of fields that only `pushup` folds in. `f` must not leave pending lazy tags.
    pub fn modify_node(&mut self, u: usize, f: impl FnOnce(&mut N)) {
        let u = self.vertex(u);
        self.access(u);
        f(&mut self.node_mut(u).data);
        self.pushup(u);
    }

    /// The aggregate over the path `u..=v`, or `None` if they are disconnected.
    pub fn access_path(&mut self, u: usize, v: usize) -> Option<&mut N> {
        let (u, v) = (self.vertex(u), self.vertex(v));
        self.reroot_node(v);
        self.access(u);
        if u != v && self.node(v).parent.is_nil() {
            return None;
        }
        Some(&mut self.node_mut(u).data)
    }

    /// The aggregate over the subtree of `u` when the tree is rooted at `v`.
    ///
    /// `u == v` selects the whole component. Returns `None` if they are disconnected.
    pub fn access_subtree(&mut self, u: usize, v: usize) -> Option<&mut N> {
        let (u, v) = (self.vertex(u), self.vertex(v));
        self.reroot_node(v);
        self.access(u);
        if u != v && self.node(v).parent.is_nil() {
            return None;
        }
        Some(&mut self.node_mut(u).data)
    }

    /// The aggregate over the whole component of `u`.
    pub fn access_tree(&mut self, u: usize) -> &mut N {
        let u = self.vertex(u);
        self.reroot_node(u);
        self.access(u);
        &mut self.node_mut(u).data
    }

    /// The payload of the edge `(u, v)`.
    ///
    /// # Panics
    ///
    /// Panics if `u` and `v` are not adjacent.
    pub fn access_edge(&mut self, u: usize, v: usize) -> &mut N {
        let e = self.edge_node(u, v);
        assert!(!e.is_nil(), "access_edge({u}, {v}): vertices are not adjacent");
        &mut self.node_mut(e).data
    }

    /// The payload of the edge `(u, v)`, or `None` if they are not adjacent.
    pub fn edge(&mut self, u: usize, v: usize) -> Option<&mut N> {
        let e = self.edge_node(u, v);
        if e.is_nil() {
            None
        } else {
            Some(&mut self.node_mut(e).data)
        }
    }
}

impl TopTree<SumNode> {
    pub fn vertex_get(&mut self, v: usize) -> i64 {
        self.access_node(v).value
    }

    pub fn vertex_set(&mut self, v: usize, value: i64) {
        self.access_node(v).set_value(value);
    }

    pub fn vertex_add(&mut self, v: usize, delta: i64) {
        let node = self.access_node(v);
        node.set_value(node.value.wrapping_add(delta));
    }

    pub fn path_sum(&mut self, u: usize, v: usize) -> Option<i64> {
        self.access_path(u, v).map(|p| p.path)
    }

    /// Number of vertices on the path `u..=v`.
    pub fn path_len(&mut self, u: usize, v: usize) -> Option<usize> {
        self.access_path(u, v).map(|p| p.path_size)
    }

    pub fn path_add(&mut self, u: usize, v: usize, delta: i64) -> bool {
        match self.access_path(u, v) {
            Some(p) => {
                p.add_path(delta);
                true
            }
            None => false,
        }
    }

    pub fn subtree_sum(&mut self, u: usize, root: usize) -> Option<i64> {
        self.access_subtree(u, root).map(|s| s.subtree)
    }

    pub fn subtree_size(&mut self, u: usize, root: usize) -> Option<usize> {
        self.access_subtree(u, root).map(|s| s.subtree_size)
    }

    pub fn subtree_add(&mut self, u: usize, root: usize, delta: i64) -> bool {
        match self.access_subtree(u, root) {
            Some(s) => {
                s.add_subtree(delta);
                true
            }
            None => false,
        }
    }

    pub fn component_sum(&mut self, v: usize) -> i64 {
        self.access_tree(v).subtree
    }

    pub fn component_size(&mut self, v: usize) -> usize {
        self.access_tree(v).subtree_size
    }

    pub fn component_add(&mut self, v: usize, delta: i64) {
        self.access_tree(v).add_subtree(delta);
    }
}

impl<N: Aggregate> DynamicForest for TopTree<N> {
    fn len(&self) -> usize {
        self.len()
    }

    fn link(&mut self, u: usize, v: usize) -> bool {
        self.link(u, v)
    }

    fn cut(&mut self, u: usize, v: usize) -> bool {
        self.cut(u, v)
    }

    fn connected(&mut self, u: usize, v: usize) -> bool {
        self.connected(u, v)
    }

    fn reroot(&mut self, v: usize) {
        self.reroot(v)
    }

    fn find_root(&mut self, v: usize) -> usize {
        self.find_root(v)
    }

    fn lca(&mut self, u: usize, v: usize) -> Option<usize> {
        self.lca(u, v)
    }
}
