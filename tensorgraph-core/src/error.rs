use thiserror::Error;

/// Custom error type for the tensorgraph engine.
#[derive(Error, Debug, PartialEq, Clone)] // PartialEq for easier testing
pub enum GraphError {
    #[error("No value provided for source node: {name}")]
    MissingSourceBinding { name: String },

    #[error("Node #{index} does not belong to graph {expected_graph} (created by graph {actual_graph})")]
    UnregisteredNode {
        index: usize,
        expected_graph: u64,
        actual_graph: u64,
    },

    #[error("Target node #{target} ('{name}') is not reachable from seed node #{seed}")]
    UnreachableTarget {
        seed: usize,
        target: usize,
        name: String,
    },

    #[error("Backward must be seeded at a terminal node, but node #{index} ('{name}') is not a terminal")]
    NotATerminal { index: usize, name: String },

    #[error("Shape mismatch during operation {operation}: {lhs:?} and {rhs:?}")]
    ShapeMismatch {
        lhs: Vec<usize>,
        rhs: Vec<usize>,
        operation: String,
    },

    #[error("Value creation error: data length {data_len} does not match shape {shape:?}")]
    ValueCreation { data_len: usize, shape: Vec<usize> },

    #[error("Axis {axis} is out of bounds for value of rank {rank}")]
    AxisOutOfBounds { axis: usize, rank: usize },

    #[error("Operation {operation} expects {expected} input(s), got {actual}")]
    ArityMismatch {
        operation: String,
        expected: usize,
        actual: usize,
    },

    #[error("Node '{node}' produced {actual} input gradient(s), expected {expected}")]
    GradientArityMismatch {
        node: String,
        expected: usize,
        actual: usize,
    },

    #[error("Invalid distribution parameters: {0}")]
    InvalidDistribution(String),
}
