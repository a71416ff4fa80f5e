//! Block-search Dantzig pricing (C5): selects the next entering arc.
use log::trace;

use crate::consts::EPSILON;
use crate::data::NodeArcData;
use crate::tree::SpanningTree;

/// Resumable cursor over a block-search Dantzig pricing rule: scans
/// `block_size` arcs at a time starting where the last search left off,
/// wrapping around the real-arc range.
#[derive(Debug, Clone)]
pub struct PivotBlock {
  block_size: usize,
  next_arc: usize,
  search_arc_num: usize,
}

impl PivotBlock {
  pub fn new(search_arc_num: usize) -> Self {
    let block_size = ((search_arc_num as f64).sqrt().floor() as usize).max(10);
    PivotBlock { block_size, next_arc: 0, search_arc_num }
  }

  /// Scans for the arc with the most negative `state[e] * reduced_cost(e)`,
  /// testing the tolerance gate every `block_size` arcs so degenerate
  /// sweeps don't have to scan the whole arc range before committing.
  /// Returns `None` once a full sweep finds nothing passing the gate (the
  /// basis is optimal); otherwise commits the cursor and returns the new
  /// entering arc.
  pub fn find_entering_arc(&mut self, tree: &SpanningTree, data: &NodeArcData, in_arc: usize) -> Option<usize> {
    let mut min = 0.0f64;
    let mut cnt = self.block_size;
    let mut in_arc = in_arc;

    let mut e = self.next_arc;
    while e != self.search_arc_num {
      let c = self.price(tree, data, e);
      trace!("find_entering_arc: e={} reduced={}", e, c);
      if c < min { min = c; in_arc = e; }
      cnt -= 1;
      if cnt == 0 {
        if self.passes_gate(data, in_arc, min) {
          self.next_arc = e + 1;
          return Some(in_arc);
        }
        cnt = self.block_size;
      }
      e += 1;
    }

    let mut e = 0;
    while e != self.next_arc {
      let c = self.price(tree, data, e);
      trace!("find_entering_arc: e={} reduced={}", e, c);
      if c < min { min = c; in_arc = e; }
      cnt -= 1;
      if cnt == 0 {
        if self.passes_gate(data, in_arc, min) {
          self.next_arc = e + 1;
          return Some(in_arc);
        }
        cnt = self.block_size;
      }
      e += 1;
    }

    if self.passes_gate(data, in_arc, min) { Some(in_arc) } else { None }
  }

  fn price(&self, tree: &SpanningTree, data: &NodeArcData, e: usize) -> f64 {
    tree.state[e] as f64 * tree.reduced_cost(e, &data.cost, &data.pi, &data.source, &data.target)
  }

  fn passes_gate(&self, data: &NodeArcData, in_arc: usize, min: f64) -> bool {
    let mut a = data.pi[data.source[in_arc]].abs().max(data.pi[data.target[in_arc]].abs());
    a = a.max(data.cost[in_arc].abs());
    min < -(EPSILON * a)
  }
}
