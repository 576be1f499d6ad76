use super::*;
use crate::ops::{OpConfig, Operation};
use crate::value::Value;

#[test]
fn test_multiply_by_constant_forward() {
    let op = MultiplyByConstantOp::new(-3.0);
    assert_eq!(op.constant(), -3.0);
    let out = op.apply(&[Value::from_vec(vec![1.0, 2.0])], &OpConfig::default()).unwrap();
    assert_eq!(out.data(), &[-3.0, -6.0]);
}

#[test]
fn test_multiply_by_constant_gradient() {
    let op = MultiplyByConstantOp::new(4.0);
    let inputs = vec![Value::scalar(2.5)];
    let local = op.gradient(&inputs, &Value::scalar(2.0), &OpConfig::default()).unwrap();
    assert_eq!(local.input_grads[0].item(), Some(8.0));
    assert_eq!(local.self_grad.and_then(|g| g.item()), Some(5.0));
}

#[test]
fn test_multiply_by_constant_name() {
    assert_eq!(MultiplyByConstantOp::new(1.0_f64).name(), "multiply_by_constant_op");
}
