//! Terminal states for the network simplex driver.
use std::error::Error;
use std::fmt;

/// Classification of how the pivot loop terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
  /// No entering arc passes the pricing gate; the basis is optimal.
  Optimal,
  /// `iter` reached `max_iter` before optimality was reached.
  MaxIterReached,
  /// A pivot's leaving-arc search found no bounding arc (`delta >= INFINITY`).
  Unbounded,
  /// An artificial arc still carries flow above `EPSILON` after the loop.
  Infeasible,
}

impl Status {
  /// Mirrors the inner driver's numeric status codes.
  pub fn code(self) -> i32 {
    match self {
      Status::Optimal => 0,
      Status::MaxIterReached => -1,
      Status::Unbounded => -2,
      Status::Infeasible => -3,
    }
  }
}

impl fmt::Display for Status {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Status::Optimal => write!(f, "optimal"),
      Status::MaxIterReached => write!(f, "max iterations reached"),
      Status::Unbounded => write!(f, "unbounded"),
      Status::Infeasible => write!(f, "infeasible"),
    }
  }
}

/// Precondition failures that stop `solve_transport` before the pivot loop runs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SolveError {
  /// `|sum(x) - sum(y)| > NET_SUPPLY_ERROR_TOLERANCE`.
  Unbalanced { net_supply: f64 },
  /// `n == 0 || m == 0`.
  EmptyGraph,
}

impl fmt::Display for SolveError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      SolveError::Unbalanced { net_supply } =>
        write!(f, "supply and demand are not balanced (net supply = {})", net_supply),
      SolveError::EmptyGraph =>
        write!(f, "graph has no supply or demand nodes"),
    }
  }
}

impl Error for SolveError {}
