//! Arc indexing (C1) and the immutable bipartite topology (C2) it indexes into.
use log::trace;

/// Minimum block size used for both the arc-mixing subsequence and the
/// pricing block search (`k = max(floor(sqrt(n_arcs)), 10)`).
const MIN_K: usize = 10;

/// The fixed complete-bipartite topology a solve runs over. Built once by
/// [`DiGraph::new`] and never mutated afterward.
#[derive(Debug, Clone)]
pub struct DiGraph {
  pub n: usize,
  pub m: usize,
  pub n_nodes: usize,
  pub n_arcs: usize,
  pub use_arc_mixing: bool,
  mixing_coeff: usize,
  subsequence_length: usize,
  num_big_subsequences: usize,
  num_total_big_subsequence_numbers: usize,
}

impl DiGraph {
  pub fn new(n: usize, m: usize, use_arc_mixing: bool) -> Self {
    let n_nodes = n + m;
    let n_arcs = n * m;
    let k = (n_arcs as f64).sqrt().floor() as usize;
    let k = k.max(MIN_K);
    let q = if k == 0 { 0 } else { n_arcs / k };
    let r = if k == 0 { 0 } else { n_arcs % k };
    DiGraph {
      n, m, n_nodes, n_arcs, use_arc_mixing,
      mixing_coeff: k,
      subsequence_length: q + 1,
      num_big_subsequences: r,
      num_total_big_subsequence_numbers: r * (q + 1),
    }
  }

  /// Number of real (non-artificial) arcs eligible for pricing.
  pub fn search_arc_num(&self) -> usize { self.n_arcs }

  /// Real arcs plus one artificial arc per node.
  pub fn all_arc_num(&self) -> usize { self.n_arcs + self.n_nodes }

  /// Maps a logical arc ordinal (row-major `i*m+j`) to its storage slot.
  /// A bijection onto `[0, n_arcs)` whether or not mixing is enabled.
  pub fn arc_id(&self, logical_arc: usize) -> usize {
    if !self.use_arc_mixing { return self.n_arcs - logical_arc - 1 }
    let k = self.n_arcs - logical_arc - 1;
    let smallv: usize = if k > self.num_total_big_subsequence_numbers { 1 } else { 0 };
    let k2 = k - self.num_total_big_subsequence_numbers * smallv;
    let l = self.subsequence_length - smallv;
    let subsequence_num = k2 / l + self.num_big_subsequences * smallv;
    let subsequence_offset = (k2 % l) * self.mixing_coeff;
    let slot = subsequence_offset + subsequence_num;
    trace!("arc_id({}) -> {}", logical_arc, slot);
    slot
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::collections::HashSet;

  fn assert_bijection(n: usize, m: usize, use_arc_mixing: bool) {
    let g = DiGraph::new(n, m, use_arc_mixing);
    let mut seen: HashSet<usize> = HashSet::new();
    for logical in 0..g.n_arcs {
      let slot = g.arc_id(logical);
      assert!(slot < g.n_arcs, "slot {} out of range for n_arcs={}", slot, g.n_arcs);
      assert!(seen.insert(slot), "arc_id({}) collided with a prior slot ({}, {})", logical, n, m);
    }
    assert_eq!(seen.len(), g.n_arcs);
  }

  #[test]
  fn arc_id_is_a_bijection_mixed() {
    for &(n, m) in &[(1,1), (2,2), (3,4), (5,5), (7,11), (13,13), (20,3), (1,50)] {
      assert_bijection(n, m, true);
    }
  }

  #[test]
  fn arc_id_is_a_bijection_unmixed() {
    for &(n, m) in &[(1,1), (2,2), (3,4), (5,5), (7,11)] {
      assert_bijection(n, m, false);
    }
  }

  #[test]
  fn small_graph_dimensions() {
    let g = DiGraph::new(2, 3, true);
    assert_eq!(g.n_nodes, 5);
    assert_eq!(g.n_arcs, 6);
  }
}
