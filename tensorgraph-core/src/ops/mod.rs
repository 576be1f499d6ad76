//! # Graph Operations Module (`ops`)
//!
//! Operations are the pluggable units of computation wired into a
//! [`Graph`](crate::graph::Graph). Each one implements the [`Operation`] trait:
//! a pure forward function (`apply`) and a local gradient rule (`gradient`).
//!
//! ## Structure:
//!
//! - **`Operation` trait:** the contract the graph consumes. Any type implementing it can be
//!   added with [`Graph::add_operation_node`](crate::graph::Graph::add_operation_node).
//! - **`OpConfig`:** per-node parameters bound at construction time (e.g. a reduction axis).
//!   The same config is handed to both `apply` and `gradient`.
//! - **`LocalGradient`:** what a gradient rule returns: an optional gradient attributed to the
//!   operation itself plus exactly one gradient per input, in input order.
//!
//! ## Key Submodules:
//!
//! - [`arithmetic`]: elementwise `SumOp`, `SubtractOp`, `MultiplyOp`, `SquareOp`, `MultiplyByConstantOp`.
//! - [`reduction`]: `ReduceSumOp`.
//! - [`flow`]: `IdentityOp` and `StopGradientOp`.

use crate::error::GraphError;
use crate::value::{Element, Value};
use std::fmt::Debug;

pub mod arithmetic;
pub mod flow;
pub mod reduction;

pub use arithmetic::{MultiplyByConstantOp, MultiplyOp, SquareOp, SubtractOp, SumOp};
pub use flow::{IdentityOp, StopGradientOp};
pub use reduction::ReduceSumOp;

/// Defines the interface of a differentiable graph operation.
///
/// The trait requires `Debug + Send + Sync` so that a [`Graph`](crate::graph::Graph)
/// holding boxed operations can be moved to another thread.
pub trait Operation<T: Element>: Debug + Send + Sync {
    /// Name reported in logs and used as the default node name.
    fn name(&self) -> &str;

    /// Computes the forward value from the already-evaluated inputs.
    ///
    /// Must be pure: the graph calls it at most once per evaluation window and caches the result.
    fn apply(&self, inputs: &[Value<T>], config: &OpConfig) -> Result<Value<T>, GraphError>;

    /// Computes the local gradient given the forward inputs and the summed upstream gradient.
    ///
    /// # Returns
    /// A [`LocalGradient`] whose `input_grads` has exactly one entry per input, in the same
    /// order as `inputs`.
    fn gradient(
        &self,
        inputs: &[Value<T>],
        upstream: &Value<T>,
        config: &OpConfig,
    ) -> Result<LocalGradient<T>, GraphError>;
}

/// Result of a local gradient rule.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalGradient<T> {
    /// Gradient attributed to the operation itself, if the rule defines one.
    pub self_grad: Option<Value<T>>,
    /// One gradient per input, in input order.
    pub input_grads: Vec<Value<T>>,
}

impl<T: Element> LocalGradient<T> {
    pub fn new(input_grads: Vec<Value<T>>) -> Self {
        LocalGradient {
            self_grad: None,
            input_grads,
        }
    }

    pub fn with_self_grad(mut self, self_grad: Value<T>) -> Self {
        self.self_grad = Some(self_grad);
        self
    }
}

/// Parameters bound into an operation node at construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OpConfig {
    axis: Option<usize>,
}

impl OpConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the axis used by reductions. `None` (the default) reduces over all elements.
    pub fn with_axis(mut self, axis: usize) -> Self {
        self.axis = Some(axis);
        self
    }

    pub fn axis(&self) -> Option<usize> {
        self.axis
    }
}

/// Checks that an operation received exactly `expected` inputs.
pub(crate) fn check_arity<T>(operation: &str, inputs: &[Value<T>], expected: usize) -> Result<(), GraphError> {
    if inputs.len() != expected {
        return Err(GraphError::ArityMismatch {
            operation: operation.to_string(),
            expected,
            actual: inputs.len(),
        });
    }
    Ok(())
}
