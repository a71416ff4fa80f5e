//! Artificial-root basis initialization (C3).
use crate::data::NodeArcData;
use crate::graph::DiGraph;
use crate::status::SolveError;
use crate::tree::{SpanningTree, TREE};

/// Tolerance for supply/demand balance (`|sum(x) - sum(y)|`).
pub const NET_SUPPLY_ERROR_TOLERANCE: f64 = 1e-8;

/// Which bound is relaxed when supply and demand aren't exactly balanced.
/// Only `Eq` is reachable from the public API; see the note on
/// [`initialize_graph_structures`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SupplyType { Leq, Geq, Eq }

/// Validates balance, then builds the artificial-root spanning tree that
/// gives the simplex driver a feasible starting basis: one artificial arc
/// per real node, connecting it to a root node at index `n_nodes`.
///
/// The source forces `net_supply := 0` right after the balance check, so
/// only the `Eq` branch below ever runs for a caller that got past
/// validation; `leq`/`geq` are kept for interface completeness (see
/// `DESIGN.md`) but are unreachable from here, matching that behavior
/// rather than diverging from it.
pub fn initialize_graph_structures(graph: &DiGraph, data: &mut NodeArcData) -> Result<SpanningTree, SolveError> {
  if graph.n_nodes == 0 { return Err(SolveError::EmptyGraph) }
  let net_supply: f64 = data.supply[..graph.n_nodes].iter().sum();
  if net_supply.abs() > NET_SUPPLY_ERROR_TOLERANCE {
    return Err(SolveError::Unbalanced { net_supply })
  }
  let net_supply = 0.0;
  let supply_type = if net_supply < 0.0 { SupplyType::Leq }
                     else if net_supply > 0.0 { SupplyType::Geq }
                     else { SupplyType::Eq };
  let mut tree = SpanningTree::new(NodeArcData::all_node_num(graph), graph.all_arc_num());
  match supply_type {
    SupplyType::Eq => init_eq(graph, data, &mut tree),
    SupplyType::Leq => init_leq(graph, data, &mut tree),
    SupplyType::Geq => init_geq(graph, data, &mut tree),
  }
  Ok(tree)
}

fn art_cost(graph: &DiGraph, data: &NodeArcData) -> f64 {
  let max_cost = data.cost[..graph.n_arcs].iter().cloned().fold(f64::MIN, f64::max);
  (max_cost + 1.0) * graph.n_nodes as f64
}

fn init_eq(graph: &DiGraph, data: &mut NodeArcData, tree: &mut SpanningTree) {
  let art_cost = art_cost(graph, data);
  let root = tree.root;
  for u in 0..graph.n_nodes {
    let a = graph.n_arcs + u;
    tree.parent[u] = root as i64;
    tree.pred[u] = a as i64;
    tree.thread[u] = u + 1;
    tree.rev_thread[u + 1] = u;
    tree.succ_num[u] = 1;
    tree.last_succ[u] = u;
    tree.state[a] = TREE;
    if data.supply[u] >= 0.0 {
      tree.forward[u] = true;
      data.source[a] = u;
      data.target[a] = root;
      data.flow[a] = data.supply[u];
      data.cost[a] = 0.0;
      data.pi[u] = 0.0;
    } else {
      tree.forward[u] = false;
      data.source[a] = root;
      data.target[a] = u;
      data.flow[a] = -data.supply[u];
      data.cost[a] = art_cost;
      data.pi[u] = art_cost;
    }
  }
  tree.thread[root] = 0;
  tree.rev_thread[0] = root;
  tree.succ_num[root] = graph.n_nodes + 1;
  tree.last_succ[root] = graph.n_nodes - 1;
  tree.parent[root] = crate::tree::INVALID;
  tree.pred[root] = crate::tree::INVALID;
  data.pi[root] = 0.0;
}

/// Unreachable from the public API: `net_supply` is forced to `0` before
/// branching, so this never runs for a caller that passed the balance
/// check. Kept, not deleted, matching the source.
#[allow(dead_code)]
fn init_leq(graph: &DiGraph, data: &mut NodeArcData, tree: &mut SpanningTree) {
  init_eq(graph, data, tree)
}

/// See [`init_leq`].
#[allow(dead_code)]
fn init_geq(graph: &DiGraph, data: &mut NodeArcData, tree: &mut SpanningTree) {
  init_eq(graph, data, tree)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::data::allocate_graph_structures;

  #[test]
  fn rejects_unbalanced_supply() {
    let g = DiGraph::new(1, 1, true);
    let mut data = allocate_graph_structures(&g);
    data.supply[0] = 1.0;
    data.supply[1] = 0.0;
    match initialize_graph_structures(&g, &mut data) {
      Err(SolveError::Unbalanced { net_supply }) => assert!((net_supply - 1.0).abs() < 1e-12),
      other => panic!("expected Unbalanced, got {:?}", other),
    }
  }

  #[test]
  fn builds_feasible_tree_for_balanced_supply() {
    let g = DiGraph::new(2, 2, true);
    let mut data = allocate_graph_structures(&g);
    data.supply[0] = 0.5;
    data.supply[1] = 0.5;
    data.supply[2] = -0.5;
    data.supply[3] = -0.5;
    let tree = initialize_graph_structures(&g, &mut data).unwrap();
    for u in 0..g.n_nodes {
      assert_eq!(tree.state[g.n_arcs + u], TREE);
      assert_eq!(tree.parent[u], tree.root as i64);
    }
    assert_eq!(tree.succ_num[tree.root], g.n_nodes + 1);
  }
}
