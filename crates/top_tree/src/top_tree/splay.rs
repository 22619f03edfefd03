use super::{LEFT, LIGHT, NodeId, RIGHT, TopTree};
use crate::traits::Aggregate;

impl<N: Aggregate> TopTree<N> {
    /// Whether `x` is the root of the splay tree holding it.
    ///
    /// Hanging below a light slot of the parent does not count as a splay edge.
    #[inline(always)]
    pub(super) fn is_root(&self, x: NodeId) -> bool {
        let p = self.node(x).parent;
        if p.is_nil() {
            return true;
        }
        let [l, r, ..] = self.node(p).ch;
        x != l && x != r
    }

    #[inline(always)]
    pub(super) fn adopt(&mut self, parent: NodeId, child: NodeId, side: Option<usize>) {
        if let Some(side) = side {
            self.node_mut(parent).ch[side] = child;
        }
        if !child.is_nil() {
            self.node_mut(child).parent = parent;
        }
    }

    pub(super) fn rotate(&mut self, x: NodeId) {
        let p = self.node(x).parent;
        let g = self.node(p).parent;
        let dir = usize::from(self.node(p).ch[RIGHT] == x);

        let inner = self.node(x).ch[dir ^ 1];
        self.adopt(p, inner, Some(dir));
        let g_side = if self.is_root(p) {
            None
        } else {
            Some(usize::from(self.node(g).ch[RIGHT] == p))
        };
        self.adopt(g, x, g_side);
        self.adopt(x, p, Some(dir ^ 1));

        self.pushup(p);
    }

    fn push_path(&mut self, x: NodeId) {
        self.stack.clear();
        let mut y = x;
        self.stack.push(y);
        while !self.is_root(y) {
            y = self.node(y).parent;
            self.stack.push(y);
        }
        for i in (0..self.stack.len()).rev() {
            let v = self.stack[i];
            self.pushdown(v);
        }
    }

    pub(super) fn splay(&mut self, x: NodeId) {
        self.push_path(x);

        while !self.is_root(x) {
            let p = self.node(x).parent;
            if !self.is_root(p) {
                let g = self.node(p).parent;
                let zigzig = (self.node(p).ch[RIGHT] == x) == (self.node(g).ch[RIGHT] == p);
                if zigzig {
                    self.rotate(p);
                } else {
                    self.rotate(x);
                }
            }
            self.rotate(x);
        }

        // A splay root is the light child of whatever it hangs from.
        let p = self.node(x).parent;
        if p.is_nil() {
            self.pushup(x);
        } else {
            self.node_mut(p).ch[LIGHT] = x;
            self.pushdown(p);
            self.pushdown(x);
            self.pushup(x);
            self.pushup(p);
        }
    }

    /// Leftmost node of the splay subtree of `x`, pushing lazies on the way down.
    pub(super) fn min_node(&mut self, mut x: NodeId) -> NodeId {
        self.pushdown(x);
        loop {
            let l = self.node(x).ch[LEFT];
            if l.is_nil() {
                return x;
            }
            x = l;
            self.pushdown(x);
        }
    }
}
