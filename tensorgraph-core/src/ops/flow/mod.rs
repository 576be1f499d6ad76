// Operations that pass values through and only differ in how gradient flows.

pub mod identity;
pub mod stop_gradient;

pub use identity::IdentityOp;
pub use stop_gradient::StopGradientOp;
