//! Heuristic initial pivots (C6): warm-starts the basis so the main pivot
//! loop doesn't have to work its way out of the all-artificial start from
//! scratch.
use crate::consts::INFINITY;
use crate::data::NodeArcData;
use crate::graph::DiGraph;
use crate::status::Status;
use crate::tree::SpanningTree;
use crate::tree_ops::{find_join, find_leaving_arc, update_flow, update_potential, update_spanning_tree};

/// Builds a candidate arc set from min-cost inbound/outbound arcs at
/// demand/supply nodes (or a reverse-reachability search in the
/// one-supply/one-demand special case), then performs one pivot per
/// improving candidate. Returns the arc to resume pricing from. Fails with
/// [`Status::Unbounded`] if any candidate pivot finds an unbounded cycle.
pub fn construct_initial_pivots(
  graph: &DiGraph,
  data: &mut NodeArcData,
  tree: &mut SpanningTree,
  sum_supply: f64,
) -> Result<usize, Status> {
  let node_num = graph.n_nodes;
  let n1 = graph.n;
  let n2 = graph.m;
  let n_arcs = graph.n_arcs;

  let mut total = 0.0f64;
  let mut supply_nodes = Vec::new();
  let mut demand_nodes = Vec::new();
  for u in (0..node_num).rev() {
    let curr = data.supply[node_num - u - 1];
    if curr > 0.0 {
      total += curr;
      supply_nodes.push(u);
    } else if curr < 0.0 {
      demand_nodes.push(u);
    }
  }
  if sum_supply > 0.0 { total -= sum_supply; }

  // Nothing to warm-start from (e.g. a trivial all-zero-supply problem);
  // let the main pricing loop find its own starting arc instead of
  // reusing the source's `-1` sentinel, which isn't a valid Rust index.
  if total <= 0.0 { return Ok(0); }

  let mut arc_vector: Vec<usize> = Vec::new();

  if sum_supply >= 0.0 {
    if supply_nodes.len() == 1 && demand_nodes.len() == 1 {
      // Reverse graph search from the (sole) demand node to the (sole)
      // supply node, collecting every arc into a not-yet-reached node.
      let s = supply_nodes[0];
      let t = demand_nodes[0];
      let mut reached = vec![false; node_num];
      reached[t] = true;
      let mut stack = vec![t];
      while let Some(v) = stack.pop() {
        // `u` and `v` name the same popped node in the source; the
        // termination check is on whether the source node was reached.
        if v == s { break }
        if v >= n1 {
          let first_arc = (n_arcs + v - node_num) as isize;
          let mut a = first_arc;
          while a >= 0 {
            let u = a as usize / n2;
            if !reached[u] {
              let j = graph.arc_id(a as usize);
              arc_vector.push(j);
              reached[u] = true;
              stack.push(u);
            }
            a -= n2 as isize;
          }
        }
      }
    } else {
      // Min-cost incoming arc for each demand node.
      for &v in &demand_nodes {
        let mut min_cost = f64::MAX;
        let mut min_arc: Option<usize> = None;
        if v >= n1 {
          let first_arc = (n_arcs + v - node_num) as isize;
          let mut a = first_arc;
          while a >= 0 {
            let c = data.cost[graph.arc_id(a as usize)];
            if c < min_cost { min_cost = c; min_arc = Some(a as usize); }
            a -= n2 as isize;
          }
        }
        if let Some(a) = min_arc { arc_vector.push(graph.arc_id(a)); }
      }
    }
  } else {
    // Min-cost outgoing arc for each supply node.
    for &u in &supply_nodes {
      let mut min_cost = f64::MAX;
      let mut min_arc: Option<usize> = None;
      let mut a: isize = if u <= n1 { ((u + 1) * n2 - 1) as isize } else { -1 };
      while a >= 0 && (a as usize) % n2 != 0 {
        let c = data.cost[graph.arc_id(a as usize)];
        if c < min_cost { min_cost = c; min_arc = Some(a as usize); }
        a -= 1;
      }
      if let Some(a) = min_arc { arc_vector.push(graph.arc_id(a)); }
    }
  }

  let mut in_arc = 0usize;
  for &candidate in &arc_vector {
    in_arc = candidate;
    let reduced = tree.state[in_arc] as f64
      * tree.reduced_cost(in_arc, &data.cost, &data.pi, &data.source, &data.target);
    if reduced >= 0.0 { continue }

    let join = find_join(tree, data, in_arc);
    let leaving = find_leaving_arc(tree, data, join, in_arc);
    if leaving.delta >= INFINITY { return Err(Status::Unbounded) }

    update_flow(tree, data, &leaving, join, in_arc);
    if leaving.change {
      update_spanning_tree(tree, data, leaving.v_in, leaving.u_in, leaving.u_out, join, in_arc);
      update_potential(tree, data, leaving.u_in, leaving.v_in);
    }
  }
  Ok(in_arc)
}
