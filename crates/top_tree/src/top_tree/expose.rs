//! `access`: turn the path from a vertex to the root of its component into one splay tree.

use super::{LEFT, LIGHT, LOWER, NodeId, RIGHT, TopTree, UPPER};
use crate::traits::Aggregate;

impl<N: Aggregate> TopTree<N> {
    /// Expose the root path of `u`; afterwards `u` is the root of the whole representation and
    /// the bottom of its heavy path.
    ///
    /// Returns the last vertex at which the walk entered a heavy path from a light edge, i.e. the
    /// point where the previously exposed path was joined (or `u` itself).
    pub(super) fn access(&mut self, u: NodeId) -> NodeId {
        self.splay(u);
        self.make_right_light(u);

        let mut w = u;
        let mut e = self.node(u).parent;
        while !e.is_nil() {
            self.splay(e);
            let v = self.node(e).parent;
            self.splay(v);
            self.light_splice(v, e);
            self.make_right_light(v);
            self.heavy_attach(v, w, e, RIGHT);
            w = v;
            e = self.node(v).parent;
        }

        self.splay(u);
        w
    }

    // Demote the heavy path below `u` to a light edge of `u`.
    fn make_right_light(&mut self, u: NodeId) {
        let [_, r, _, _, b] = self.node(u).ch;
        if r.is_nil() {
            return;
        }
        debug_assert!(!b.is_nil());
        self.light_attach(u, r, b);
        let nu = self.node_mut(u);
        nu.ch[RIGHT] = NodeId::NIL;
        nu.ch[LOWER] = NodeId::NIL;
        self.pushup(u);
    }

    fn heavy_attach(&mut self, u: NodeId, v: NodeId, e: NodeId, side: usize) {
        self.adopt(u, e, Some(LOWER));
        self.adopt(u, v, Some(side));
        self.node_mut(e).ch[LIGHT] = NodeId::NIL;
        self.pushup(u);
    }

    // Hang the heavy path rooted at `v` under edge `e` and put `e` into the rake tree of `u`.
    fn light_attach(&mut self, u: NodeId, v: NodeId, e: NodeId) {
        self.orient(e, u);
        self.adopt(e, v, Some(LIGHT));
        self.light_insert(u, e);
    }

    fn orient(&mut self, e: NodeId, upper: NodeId) {
        let node = self.node_mut(e);
        if node.ch[UPPER] != upper {
            node.ch.swap(UPPER, LOWER);
        }
    }

    /// Make `e` the new root of the rake tree of `u`, with the old root as its left child.
    pub(super) fn light_insert(&mut self, u: NodeId, e: NodeId) {
        let rake = self.node(u).ch[LIGHT];
        self.adopt(e, rake, Some(LEFT));
        self.adopt(e, NodeId::NIL, Some(RIGHT));
        self.adopt(u, e, Some(LIGHT));
        self.pushup(e);
    }

    // Remove `e`, the current root of the rake tree of `v`, joining its two sides.
    fn light_splice(&mut self, v: NodeId, e: NodeId) {
        self.pushdown(e);
        let [l, r, ..] = self.node(e).ch;
        let root = if l.is_nil() {
            r
        } else if r.is_nil() {
            l
        } else {
            let m = self.min_node(r);
            self.node_mut(r).parent = NodeId::NIL;
            self.splay(m);
            self.adopt(m, l, Some(LEFT));
            self.pushup(m);
            m
        };
        self.adopt(v, root, Some(LIGHT));

        let ne = self.node_mut(e);
        ne.parent = NodeId::NIL;
        ne.ch[LEFT] = NodeId::NIL;
        ne.ch[RIGHT] = NodeId::NIL;
        ne.ch[LIGHT] = NodeId::NIL;
        self.pushup(e);
    }
}
