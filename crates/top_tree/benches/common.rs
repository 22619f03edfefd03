use std::collections::VecDeque;

use bench::rng_for;
use rand::Rng;

pub const SIZES: [usize; 4] = [1_024, 4_096, 16_384, 65_536];
pub const OPS_PER_SIZE: usize = 5_000;
pub const VALUE_RANGE: std::ops::RangeInclusive<i64> = -1_000_000_000..=1_000_000_000;
pub const DELTA_RANGE: std::ops::RangeInclusive<i64> = -1_000..=1_000;

fn generate_values(rng: &mut impl Rng, n: usize) -> Vec<i64> {
    (0..n).map(|_| rng.random_range(VALUE_RANGE)).collect()
}

fn generate_random_tree_edges(rng: &mut impl Rng, n: usize) -> Vec<(usize, usize)> {
    (1..n).map(|i| (i, rng.random_range(0..i))).collect()
}

#[derive(Clone, Copy, Debug)]
pub enum ConnOp {
    Link { u: usize, v: usize },
    Cut { u: usize, v: usize },
    Connected { u: usize, v: usize },
    Lca { u: usize, v: usize },
}

#[derive(Clone, Copy, Debug)]
pub enum PathOp {
    VertexAdd {
        v: usize,
        delta: i64,
    },
    PathAdd {
        u: usize,
        v: usize,
        delta: i64,
    },
    PathSum {
        u: usize,
        v: usize,
    },
    EdgeSwap {
        cut_u: usize,
        cut_v: usize,
        link_u: usize,
        link_v: usize,
    },
}

#[derive(Clone, Copy, Debug)]
pub enum SubtreeOp {
    SubtreeAdd { u: usize, root: usize, delta: i64 },
    SubtreeSum { u: usize, root: usize },
    ComponentSum { v: usize },
    Link { u: usize, v: usize },
    Cut { u: usize, v: usize },
}

#[derive(Clone, Debug)]
pub struct Case<Op> {
    pub values: Vec<i64>,
    pub edges: Vec<(usize, usize)>,
    pub ops: Vec<Op>,
}

// Mirror of the forest being benchmarked, so generated operations are always valid.
struct ForestState {
    n: usize,
    adj: Vec<Vec<usize>>,
    comp_id: Vec<usize>,
    comps: Vec<Vec<usize>>,
    edges: Vec<(usize, usize)>,
    mark: Vec<u32>,
    mark_gen: u32,
    comp_cnt: usize,
}

impl ForestState {
    fn new(n: usize) -> Self {
        Self {
            n,
            adj: vec![Vec::new(); n],
            comp_id: (0..n).collect(),
            comps: (0..n).map(|i| vec![i]).collect(),
            edges: Vec::new(),
            mark: vec![0; n],
            mark_gen: 1,
            comp_cnt: n,
        }
    }

    fn remove_adj_one(vec: &mut Vec<usize>, x: usize) {
        if let Some(pos) = vec.iter().position(|&y| y == x) {
            vec.swap_remove(pos);
        } else {
            debug_assert!(false, "edge not found in adjacency");
        }
    }

    fn link(&mut self, u: usize, v: usize) {
        debug_assert!(self.comp_id[u] != self.comp_id[v]);
        self.adj[u].push(v);
        self.adj[v].push(u);
        self.edges.push((u, v));
        let mut a = self.comp_id[u];
        let mut b = self.comp_id[v];
        if self.comps[a].len() < self.comps[b].len() {
            std::mem::swap(&mut a, &mut b);
        }
        let moved = std::mem::take(&mut self.comps[b]);
        for x in moved {
            self.comp_id[x] = a;
            self.comps[a].push(x);
        }
        self.comp_cnt -= 1;
    }

    // Tags every vertex reachable from `start` with the current generation.
    fn mark_component(&mut self, start: usize) -> u32 {
        let tag = self.mark_gen;
        self.mark_gen = self.mark_gen.wrapping_add(1);
        let mut q = VecDeque::new();
        q.push_back(start);
        self.mark[start] = tag;
        while let Some(v) = q.pop_front() {
            for &to in &self.adj[v] {
                if self.mark[to] == tag {
                    continue;
                }
                self.mark[to] = tag;
                q.push_back(to);
            }
        }
        tag
    }

    fn cut_by_index(&mut self, idx: usize) -> (usize, usize) {
        let (u, v) = self.edges.swap_remove(idx);
        let old = self.comp_id[u];
        debug_assert_eq!(old, self.comp_id[v]);
        Self::remove_adj_one(&mut self.adj[u], v);
        Self::remove_adj_one(&mut self.adj[v], u);

        let tag = self.mark_component(u);
        let (a, b): (Vec<_>, Vec<_>) = std::mem::take(&mut self.comps[old])
            .into_iter()
            .partition(|&x| self.mark[x] == tag);
        debug_assert!(!a.is_empty() && !b.is_empty());

        self.comps[old] = a;
        let new_id = self.comps.len();
        for &x in &b {
            self.comp_id[x] = new_id;
        }
        self.comps.push(b);
        self.comp_cnt += 1;

        (u, v)
    }

    fn random_vertex_in_comp(&self, rng: &mut impl Rng, comp: usize) -> usize {
        let list = &self.comps[comp];
        list[rng.random_range(0..list.len())]
    }

    fn pick_two_components(&self, rng: &mut impl Rng) -> Option<(usize, usize)> {
        if self.comp_cnt <= 1 {
            return None;
        }
        let ca = self.comp_id[rng.random_range(0..self.n)];
        for _ in 0..100 {
            let cb = self.comp_id[rng.random_range(0..self.n)];
            if ca != cb {
                return Some((ca, cb));
            }
        }
        // Fallback: linear scan.
        (0..self.n)
            .map(|b| self.comp_id[b])
            .find(|&cb| cb != ca)
            .map(|cb| (ca, cb))
    }

    fn random_link(&mut self, rng: &mut impl Rng) -> Option<(usize, usize)> {
        let (ca, cb) = self.pick_two_components(rng)?;
        let u = self.random_vertex_in_comp(rng, ca);
        let v = self.random_vertex_in_comp(rng, cb);
        self.link(u, v);
        Some((u, v))
    }

    fn random_cut(&mut self, rng: &mut impl Rng) -> Option<(usize, usize)> {
        if self.edges.is_empty() {
            return None;
        }
        let idx = rng.random_range(0..self.edges.len());
        Some(self.cut_by_index(idx))
    }
}

fn forest_with_cuts(rng: &mut impl Rng, n: usize, cuts: usize) -> ForestState {
    let mut state = ForestState::new(n);
    for (u, v) in generate_random_tree_edges(rng, n) {
        state.link(u, v);
    }
    for _ in 0..cuts {
        if state.random_cut(rng).is_none() {
            break;
        }
    }
    state
}

pub fn generate_connectivity_case(n: usize) -> Case<ConnOp> {
    let mut rng = rng_for(1, n);
    let mut state = forest_with_cuts(&mut rng, n, n / 4);
    let edges = state.edges.clone();

    let mut ops = Vec::with_capacity(OPS_PER_SIZE);
    for _ in 0..OPS_PER_SIZE {
        let roll = rng.random_range(0..100_u32);
        let u = rng.random_range(0..n);
        let v = rng.random_range(0..n);
        let op = if roll < 40 {
            ConnOp::Connected { u, v }
        } else if roll < 50 {
            ConnOp::Lca { u, v }
        } else if roll < 75 {
            match state.random_link(&mut rng) {
                Some((u, v)) => ConnOp::Link { u, v },
                None => ConnOp::Connected { u, v },
            }
        } else {
            match state.random_cut(&mut rng) {
                Some((u, v)) => ConnOp::Cut { u, v },
                None => ConnOp::Connected { u, v },
            }
        };
        ops.push(op);
    }

    Case {
        values: vec![0_i64; n],
        edges,
        ops,
    }
}

pub fn generate_path_case(n: usize) -> Case<PathOp> {
    let mut rng = rng_for(2, n);
    let values = generate_values(&mut rng, n);
    let mut state = forest_with_cuts(&mut rng, n, 0);
    let edges = state.edges.clone();

    let mut ops = Vec::with_capacity(OPS_PER_SIZE);
    for _ in 0..OPS_PER_SIZE {
        let roll = rng.random_range(0..100_u32);
        let u = rng.random_range(0..n);
        let v = rng.random_range(0..n);
        let delta = rng.random_range(DELTA_RANGE);
        let op = if roll < 40 {
            PathOp::PathSum { u, v }
        } else if roll < 65 {
            PathOp::PathAdd { u, v, delta }
        } else if roll < 80 {
            PathOp::VertexAdd { v, delta }
        } else {
            // Keep the forest a single tree so every path query is answerable.
            match state.random_cut(&mut rng) {
                Some((cut_u, cut_v)) => {
                    let (link_u, link_v) = state
                        .random_link(&mut rng)
                        .expect("a cut leaves two components");
                    PathOp::EdgeSwap {
                        cut_u,
                        cut_v,
                        link_u,
                        link_v,
                    }
                }
                None => PathOp::PathSum { u, v },
            }
        };
        ops.push(op);
    }

    Case { values, edges, ops }
}

pub fn generate_subtree_case(n: usize) -> Case<SubtreeOp> {
    let mut rng = rng_for(3, n);
    let values = generate_values(&mut rng, n);
    let mut state = forest_with_cuts(&mut rng, n, n / 16);
    let edges = state.edges.clone();

    let mut ops = Vec::with_capacity(OPS_PER_SIZE);
    for _ in 0..OPS_PER_SIZE {
        let roll = rng.random_range(0..100_u32);
        let u = rng.random_range(0..n);
        let root = state.random_vertex_in_comp(&mut rng, state.comp_id[u]);
        let op = if roll < 35 {
            SubtreeOp::SubtreeSum { u, root }
        } else if roll < 60 {
            let delta = rng.random_range(DELTA_RANGE);
            SubtreeOp::SubtreeAdd { u, root, delta }
        } else if roll < 80 {
            SubtreeOp::ComponentSum { v: u }
        } else if roll < 90 {
            match state.random_link(&mut rng) {
                Some((u, v)) => SubtreeOp::Link { u, v },
                None => SubtreeOp::ComponentSum { v: u },
            }
        } else {
            match state.random_cut(&mut rng) {
                Some((u, v)) => SubtreeOp::Cut { u, v },
                None => SubtreeOp::ComponentSum { v: u },
            }
        };
        ops.push(op);
    }

    Case { values, edges, ops }
}
