// Reduction operations

pub mod reduce_sum;

pub use reduce_sum::ReduceSumOp;
