//! Mutable arc- and node-indexed arrays (C2), allocated once per solve.
use crate::graph::DiGraph;

/// Arc- and node-indexed state. Arrays are sized for the worst case of
/// `n_arcs` real arcs plus `2*n_nodes` artificial arcs, and are never
/// resized after [`allocate_graph_structures`] returns.
#[derive(Debug, Clone)]
pub struct NodeArcData {
  pub cost: Vec<f64>,
  pub flow: Vec<f64>,
  pub source: Vec<usize>,
  pub target: Vec<usize>,
  pub supply: Vec<f64>,
  pub pi: Vec<f64>,
}

impl NodeArcData {
  pub fn max_arc_num(graph: &DiGraph) -> usize { graph.n_arcs + 2 * graph.n_nodes }
  pub fn all_node_num(graph: &DiGraph) -> usize { graph.n_nodes + 1 }
}

/// Allocates `NodeArcData` sized for `graph` and fills in the real-arc
/// topology (`source`/`target`) under the arc-mixing permutation. Node ids
/// are assigned in the allocator's reverse order — supply row `i` and
/// demand column `j` land at `n_nodes - i - 1` and `n_nodes - (j+n) - 1`,
/// not `i`/`n+j` — matching how `crate::initialize_supply` fills
/// `supply[]` and how [`crate::basis`]/[`crate::pivots`] read it. Artificial
/// arc slots (`[n_arcs, max_arc_num)`) are left zeroed; [`crate::basis`]
/// fills them in during basis initialization.
pub fn allocate_graph_structures(graph: &DiGraph) -> NodeArcData {
  let max_arc_num = NodeArcData::max_arc_num(graph);
  let all_node_num = NodeArcData::all_node_num(graph);
  let mut data = NodeArcData {
    cost: vec![1.0; max_arc_num],
    flow: vec![0.0; max_arc_num],
    source: vec![0; max_arc_num],
    target: vec![0; max_arc_num],
    supply: vec![0.0; all_node_num],
    pi: vec![0.0; all_node_num],
  };
  for i in 0..graph.n {
    for j in 0..graph.m {
      let logical_arc = i * graph.m + j;
      let slot = graph.arc_id(logical_arc);
      data.source[slot] = graph.n_nodes - i - 1;
      data.target[slot] = graph.n_nodes - (j + graph.n) - 1;
    }
  }
  data
}
