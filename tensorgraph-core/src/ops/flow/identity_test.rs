use super::*;
use crate::ops::{OpConfig, Operation};
use crate::value::Value;

#[test]
fn test_identity_both_directions() {
    let x = Value::from_vec(vec![1.0, -2.0]);
    let op = IdentityOp::new();
    assert_eq!(op.apply(&[x.clone()], &OpConfig::default()).unwrap(), x);

    let upstream = Value::from_vec(vec![0.25, 4.0]);
    let local = op.gradient(&[x], &upstream, &OpConfig::default()).unwrap();
    assert_eq!(local.input_grads, vec![upstream]);
}
