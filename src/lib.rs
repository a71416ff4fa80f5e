//! Network Simplex solver for the discrete Kantorovich (optimal transport)
//! problem on a complete bipartite graph.
//!
//! Given two discrete mass distributions `x` (length `n`) and `y` (length
//! `m`) and an `n*m` ground-cost matrix, [`kantorovich_distance`] computes
//! the minimum total cost to move all of `x` onto `y`. The solver
//! maintains a spanning-tree basis over the residual graph and repairs it
//! pivot by pivot; see the per-module docs for the pricing rule and tree
//! surgery that make that cheap.
#![allow(clippy::many_single_char_names)]

#[macro_use]
extern crate log;
extern crate simplelog;

pub mod basis;
pub mod consts;
pub mod data;
pub mod driver;
pub mod graph;
pub mod pivots;
pub mod pricing;
pub mod status;
pub mod tree;
pub mod tree_ops;

pub use status::{SolveError, Status};

use data::{allocate_graph_structures, NodeArcData};
use driver::{network_simplex_core, SupplyTypeLabel};
use graph::DiGraph;

/// Default cap on pivot-loop iterations, matching the source's default.
pub const DEFAULT_MAX_ITER: usize = 1_000_000;

/// Copies `x` into the first `n` supply slots and `-y` into the next `m`,
/// in the node allocator's reverse order (`supply[n_nodes - k - 1]`). This
/// reversal must match the one [`data::allocate_graph_structures`] applies
/// to `source`/`target` when it assigns node ids to real arcs — the two are
/// the same convention, not an independent choice either side can change.
pub(crate) fn initialize_supply(x: &[f64], y: &[f64], graph: &DiGraph, supply: &mut [f64]) {
  for n in (0..graph.n_nodes).rev() {
    let idx = graph.n_nodes - n - 1;
    supply[idx] = if n < graph.n { x[n] } else { -y[n - graph.n] };
  }
}

/// Lower-level entry point that reports the terminal [`Status`] alongside
/// the total transport cost, for callers (and tests) that need to
/// distinguish optimal/max-iter/unbounded/infeasible outcomes rather than
/// a bare number.
///
/// `x`/`y` are non-negative supply/demand masses; `cost` holds
/// `x.len() * y.len()` finite entries in row-major order
/// (`cost[i * y.len() + j]` is the cost of moving mass from `x[i]` to
/// `y[j]`). `x.sum()` and `y.sum()` must balance within
/// [`basis::NET_SUPPLY_ERROR_TOLERANCE`], or this returns
/// `Err(SolveError::Unbalanced)` before any pivoting starts.
pub fn solve_transport(x: &[f64], y: &[f64], cost: &[f64], max_iter: usize) -> Result<(f64, Status), SolveError> {
  let n = x.len();
  let m = y.len();
  assert_eq!(cost.len(), n * m, "cost must have x.len() * y.len() entries");

  let graph = DiGraph::new(n, m, true);
  let mut data = allocate_graph_structures(&graph);
  initialize_supply(x, y, &graph, &mut data.supply);
  for i in 0..n {
    for j in 0..m {
      let slot = graph.arc_id(i * m + j);
      data.cost[slot] = cost[i * m + j];
    }
  }

  let mut tree = basis::initialize_graph_structures(&graph, &mut data)?;

  // The balance check above forces net supply to exactly zero before the
  // solve proper (see `basis::initialize_graph_structures`), so the
  // driver and initial-pivots heuristic always see `sum_supply == 0.0`
  // for any input that got this far.
  let status = network_simplex_core(
    &graph,
    &mut data,
    &mut tree,
    0.0,
    graph.search_arc_num(),
    graph.all_arc_num(),
    SupplyTypeLabel::default(),
    max_iter,
  );

  let total_cost: f64 = (0..data.flow.len()).map(|a| data.flow[a] * data.cost[a]).sum();
  Ok((total_cost, status))
}

/// Computes the Kantorovich (Wasserstein-1-style) distance between two
/// discrete distributions under a given ground cost, using
/// [`DEFAULT_MAX_ITER`] as the iteration cap.
///
/// Always returns a plain `f64`: a non-optimal [`Status`] or a
/// [`SolveError`] is logged as a warning rather than propagated, matching
/// the source's "the public entry point always returns a cost" contract.
/// Callers that need to observe the terminal status should call
/// [`solve_transport`] directly.
pub fn kantorovich_distance(x: &[f64], y: &[f64], cost: &[f64]) -> f64 {
  kantorovich_distance_with_max_iter(x, y, cost, DEFAULT_MAX_ITER)
}

/// As [`kantorovich_distance`], with an explicit iteration cap.
pub fn kantorovich_distance_with_max_iter(x: &[f64], y: &[f64], cost: &[f64], max_iter: usize) -> f64 {
  match solve_transport(x, y, cost, max_iter) {
    Ok((total_cost, Status::Optimal)) => total_cost,
    Ok((total_cost, status)) => {
      warn!("kantorovich_distance: solve finished as {} rather than optimal; returning best-effort cost", status);
      total_cost
    }
    Err(err) => {
      warn!("kantorovich_distance: {}; returning 0.0", err);
      0.0
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn assert_close(a: f64, b: f64) {
    assert!((a - b).abs() < 1e-6, "{} != {}", a, b);
  }

  #[test]
  fn scenario_single_pair() {
    assert_close(kantorovich_distance(&[1.0], &[1.0], &[3.5]), 3.5);
  }

  #[test]
  fn scenario_identical_distributions() {
    assert_close(kantorovich_distance(&[0.5, 0.5], &[0.5, 0.5], &[0.0, 1.0, 1.0, 0.0]), 0.0);
  }

  #[test]
  fn scenario_all_mass_crosses() {
    assert_close(kantorovich_distance(&[1.0, 0.0], &[0.0, 1.0], &[0.0, 2.0, 2.0, 0.0]), 2.0);
  }

  #[test]
  fn scenario_partial_crossing() {
    assert_close(kantorovich_distance(&[0.4, 0.6], &[0.5, 0.5], &[0.0, 1.0, 1.0, 0.0]), 0.1);
  }

  #[test]
  fn scenario_three_point_quadratic_cost_is_zero() {
    let x = [1.0 / 3.0, 1.0 / 3.0, 1.0 / 3.0];
    let cost: Vec<f64> = (0..3)
      .flat_map(|i| (0..3).map(move |j| ((i as f64) - (j as f64)).powi(2)))
      .collect();
    assert_close(kantorovich_distance(&x, &x, &cost), 0.0);
  }

  #[test]
  fn scenario_three_point_shift() {
    let x = [1.0, 0.0, 0.0];
    let y = [0.0, 0.0, 1.0];
    let cost: Vec<f64> = (0..3)
      .flat_map(|i| (0..3).map(move |j| ((i as i64) - (j as i64)).unsigned_abs() as f64))
      .collect();
    assert_close(kantorovich_distance(&x, &y, &cost), 2.0);
  }

  #[test]
  fn unbalanced_supply_reports_solve_error() {
    let err = solve_transport(&[1.0], &[2.0], &[1.0], DEFAULT_MAX_ITER).unwrap_err();
    assert!(matches!(err, SolveError::Unbalanced { .. }));
  }

  #[test]
  fn scenario_asymmetric_cost_ships_cheaper_diagonal() {
    // c[0][0]=5, c[0][1]=9, c[1][0]=9, c[1][1]=2 — c[i][j] != c[j][i], so a
    // solver that mislabels which physical node an arc connects (rather
    // than just which arc it is) cannot get this one right by symmetry.
    let x = [1.0, 0.0];
    let y = [1.0, 0.0];
    let cost = [5.0, 9.0, 9.0, 2.0];
    let (total_cost, status) = solve_transport(&x, &y, &cost, DEFAULT_MAX_ITER).unwrap();
    assert_eq!(status, Status::Optimal);
    assert_close(total_cost, 5.0);
  }

  #[test]
  fn law_swap_and_transpose_preserves_cost() {
    let x = [0.4, 0.6];
    let y = [0.5, 0.5];
    let cost = [5.0, 9.0, 9.0, 2.0];
    let transposed = [cost[0], cost[2], cost[1], cost[3]];
    let forward = kantorovich_distance(&x, &y, &cost);
    let swapped = kantorovich_distance(&y, &x, &transposed);
    assert_close(forward, swapped);
  }

  #[test]
  fn law_scaling_cost_scales_distance() {
    let x = [0.4, 0.6];
    let y = [0.5, 0.5];
    let cost = [0.0, 1.0, 1.0, 0.0];
    let scaled: Vec<f64> = cost.iter().map(|c| c * 2.5).collect();
    let base = kantorovich_distance(&x, &y, &cost);
    let doubled = kantorovich_distance(&x, &y, &scaled);
    assert_close(doubled, base * 2.5);
  }

  #[test]
  fn law_shifting_costs_from_one_node_by_constant() {
    let x = [0.4, 0.6];
    let y = [0.5, 0.5];
    let cost = [5.0, 9.0, 9.0, 2.0];
    // add a constant to every arc leaving node 0 (row 0 of the cost matrix)
    let shifted = [cost[0] + 2.0, cost[1] + 2.0, cost[2], cost[3]];
    let base = kantorovich_distance(&x, &y, &cost);
    let bumped = kantorovich_distance(&x, &y, &shifted);
    assert_close(bumped, base + x[0] * 2.0);
  }
}
