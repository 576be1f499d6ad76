//! # Reverse-mode differentiation (`autograd`)
//!
//! - [`backward`]: [`Graph::backward`](crate::graph::Graph::backward) and
//!   [`Graph::source_gradients`](crate::graph::Graph::source_gradients).
//! - [`restriction`]: the set of nodes a backward pass is allowed to visit.
//! - [`grad_check`]: finite-difference validation of gradient rules.

pub mod backward;
pub mod grad_check;
pub mod restriction;

pub use backward::Gradients;
pub use grad_check::{check_grad, GradCheckError};
pub use restriction::RestrictionSet;
