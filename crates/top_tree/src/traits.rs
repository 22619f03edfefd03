//! Trait-based API for the top tree: the payload contract and the forest capabilities.

/// Children of a node as seen by [`Aggregate::pushup`].
///
/// Absent children are represented by a pristine `Default` payload, so an implementation can
/// fold all five slots unconditionally.
pub struct Kids<'a, N> {
    /// `true` for vertex nodes, `false` for edge nodes.
    pub is_vertex: bool,
    /// Left splay child: vertices above on the heavy path, or rake siblings for edges.
    pub left: &'a N,
    /// Right splay child: vertices below on the heavy path, or rake siblings for edges.
    pub right: &'a N,
    /// For vertices, the root of the rake tree of light edges hanging below.
    /// For edges, the splay root of the heavy path hanging below the edge.
    pub light: &'a N,
    /// Only populated when [`Aggregate::FULL_PUSHUP`] is set.
    ///
    /// For a vertex, the heavy edge to its predecessor on the path, present only when the
    /// vertex has a left splay child. For an edge, its upper endpoint.
    pub upper: &'a N,
    /// Only populated when [`Aggregate::FULL_PUSHUP`] is set.
    ///
    /// For a vertex, the heavy edge to its successor on the path, present only when the
    /// vertex has a right splay child. For an edge, its lower endpoint.
    pub lower: &'a N,
}

/// Children of a node as seen by [`Aggregate::pushdown`].
///
/// Same slots as [`Kids`], but absent children are `None`. `upper`/`lower` are only populated
/// when [`Aggregate::FULL_PUSHDOWN`] is set, and a slot that would alias one already handed out
/// (an edge whose lower endpoint is also the root of its light child) is `None`.
pub struct KidsMut<'a, N> {
    pub is_vertex: bool,
    pub left: Option<&'a mut N>,
    pub right: Option<&'a mut N>,
    pub light: Option<&'a mut N>,
    pub upper: Option<&'a mut N>,
    pub lower: Option<&'a mut N>,
}

/// Payload stored in every node of a [`TopTree`](crate::TopTree).
///
/// `Default` is the empty cluster and must be neutral for `pushup`.
pub trait Aggregate: Default {
    /// Whether `pushup` needs the `upper`/`lower` slots.
    const FULL_PUSHUP: bool = false;
    /// Whether `pushdown` needs the `upper`/`lower` slots.
    const FULL_PUSHDOWN: bool = false;

    /// The heavy path represented by this node is being reversed.
    #[inline(always)]
    fn flip_path(&mut self) {}

    /// Recompute the aggregate from the children. Must not depend on the previous aggregate.
    fn pushup(&mut self, kids: Kids<'_, Self>);

    /// Propagate pending lazy tags into the children and clear them.
    #[inline(always)]
    fn pushdown(&mut self, _kids: KidsMut<'_, Self>) {}
}

pub trait DynamicForest: Sized {
    fn len(&self) -> usize;
    #[inline(always)]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Link `u` and `v` if they are in different components.
    ///
    /// Returns `false` if they are already connected.
    fn link(&mut self, u: usize, v: usize) -> bool;

    /// Cut edge `(u, v)` if it exists.
    ///
    /// Returns `false` if there is no such edge.
    fn cut(&mut self, u: usize, v: usize) -> bool;

    fn connected(&mut self, u: usize, v: usize) -> bool;

    /// Make `v` the root of its component.
    fn reroot(&mut self, v: usize);
    fn find_root(&mut self, v: usize) -> usize;

    /// Lowest common ancestor with respect to the current root, `None` if disconnected.
    fn lca(&mut self, u: usize, v: usize) -> Option<usize>;
}
