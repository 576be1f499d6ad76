// Export elementwise arithmetic operations directly
pub mod multiply;
pub mod multiply_by_constant;
pub mod square;
pub mod subtract;
pub mod sum;

pub use multiply::MultiplyOp;
pub use multiply_by_constant::MultiplyByConstantOp;
pub use square::SquareOp;
pub use subtract::SubtractOp;
pub use sum::SumOp;
