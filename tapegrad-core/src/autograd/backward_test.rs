use super::*;
use crate::autograd::grad_check::numerical_diff;
use crate::autograd::{ForwardOutput, Operation};
use crate::error::Rule;
use crate::ops::{add_op, exp_op, square_op};
use crate::payload::Payload;
use approx::assert_relative_eq;
use ndarray::{arr0, arr1};

/// Copies its input to two outputs; gradients of both copies add up.
#[derive(Debug)]
struct Duplicate;

impl Operation for Duplicate {
    fn name(&self) -> &'static str {
        "duplicate"
    }

    fn forward(&self, xs: &[&ArrayD<f64>]) -> Result<ForwardOutput, AutogradError> {
        let x = xs[0];
        Ok(vec![Payload::from(x.clone()), Payload::from(x.clone())].into())
    }

    fn backward(
        &self,
        _ctx: &BackwardContext<'_>,
        gys: &[ArrayD<f64>],
    ) -> Result<Vec<ArrayD<f64>>, AutogradError> {
        Ok(vec![&gys[0] + &gys[1]])
    }
}

/// Forward only.
#[derive(Debug)]
struct Negate;

impl Operation for Negate {
    fn name(&self) -> &'static str {
        "negate"
    }

    fn forward(&self, xs: &[&ArrayD<f64>]) -> Result<ForwardOutput, AutogradError> {
        Ok(xs[0].mapv(|v| -v).into())
    }
}

fn square_exp_square(graph: &mut Graph, x: VariableId) -> Result<VariableId, AutogradError> {
    let a = square_op(graph, x)?;
    let b = exp_op(graph, a)?;
    square_op(graph, b)
}

#[test]
fn test_backward_seeds_root_with_ones() -> Result<(), AutogradError> {
    let mut graph = Graph::new();
    let x = graph.leaf(arr1(&[1.0, 2.0]));
    let y = square_op(&mut graph, x)?;
    graph.backward(y)?;

    assert_eq!(graph.grad(y)?, Some(&arr1(&[1.0, 1.0]).into_dyn()));
    assert_eq!(graph.grad(x)?, Some(&arr1(&[2.0, 4.0]).into_dyn()));
    Ok(())
}

#[test]
fn test_backward_chain_matches_analytic_and_numerical() -> Result<(), AutogradError> {
    let mut graph = Graph::new();
    let x = graph.leaf(arr0(0.5));
    let y = square_exp_square(&mut graph, x)?;
    graph.set_grad(y, arr0(1.0))?;
    graph.backward(y)?;

    let grad = graph.grad(x)?.unwrap().sum();
    // d/dx exp(x^2)^2 = 4x exp(2x^2)
    assert_relative_eq!(grad, 2.0 * 0.5f64.exp(), epsilon = 1e-12);

    let numerical = numerical_diff(square_exp_square, &arr0(0.5).into_dyn(), 1e-4)?;
    assert_relative_eq!(grad, numerical.sum(), epsilon = 1e-4, max_relative = 1e-4);
    Ok(())
}

#[test]
fn test_backward_fills_every_intermediate() -> Result<(), AutogradError> {
    let mut graph = Graph::new();
    let x = graph.leaf(arr0(0.5));
    let a = square_op(&mut graph, x)?;
    let b = exp_op(&mut graph, a)?;
    let y = square_op(&mut graph, b)?;
    graph.backward(y)?;

    let b_value = 0.25f64.exp();
    assert_relative_eq!(graph.grad(b)?.unwrap().sum(), 2.0 * b_value, epsilon = 1e-12);
    assert_relative_eq!(graph.grad(a)?.unwrap().sum(), 2.0 * b_value * b_value, epsilon = 1e-12);
    Ok(())
}

#[test]
fn test_backward_tree_branches() -> Result<(), AutogradError> {
    // y = add(square(x0), exp(x1)): both inputs of add have their own producer,
    // so each branch is pushed and popped separately.
    let mut graph = Graph::new();
    let x0 = graph.leaf(arr0(3.0));
    let x1 = graph.leaf(arr0(0.5));
    let a = square_op(&mut graph, x0)?;
    let b = exp_op(&mut graph, x1)?;
    let y = add_op(&mut graph, a, b)?;
    graph.backward(y)?;

    assert_eq!(graph.grad(a)?, Some(&arr0(1.0).into_dyn()));
    assert_eq!(graph.grad(b)?, Some(&arr0(1.0).into_dyn()));
    assert_relative_eq!(graph.grad(x0)?.unwrap().sum(), 6.0, epsilon = 1e-12);
    assert_relative_eq!(graph.grad(x1)?.unwrap().sum(), 0.5f64.exp(), epsilon = 1e-12);
    Ok(())
}

#[test]
fn test_backward_on_leaf_only_seeds() -> Result<(), AutogradError> {
    let mut graph = Graph::new();
    let x = graph.leaf(arr1(&[3.0, 4.0]));
    graph.backward(x)?;
    assert_eq!(graph.grad(x)?, Some(&arr1(&[1.0, 1.0]).into_dyn()));
    Ok(())
}

#[test]
fn test_backward_without_payload_fails() {
    let mut graph = Graph::new();
    let empty = graph.variable(None).unwrap();
    assert_eq!(
        graph.backward(empty),
        Err(AutogradError::EmptyPayload { variable: empty })
    );
}

#[test]
fn test_backward_keeps_supplied_seed() -> Result<(), AutogradError> {
    let mut graph = Graph::new();
    let x = graph.leaf(arr0(3.0));
    let y = square_op(&mut graph, x)?;
    graph.set_grad(y, arr0(0.5))?;
    graph.backward(y)?;
    assert_eq!(graph.grad(x)?, Some(&arr0(3.0).into_dyn()));
    Ok(())
}

#[test]
fn test_fan_in_assigns_instead_of_summing() -> Result<(), AutogradError> {
    // y = x + x. Both input slots receive dy, but the second assignment replaces
    // the first one, so x.grad is 1 where the true derivative is 2.
    let mut graph = Graph::new();
    let x = graph.leaf(arr0(3.0));
    let y = add_op(&mut graph, x, x)?;
    graph.backward(y)?;

    assert_eq!(graph.grad(x)?, Some(&arr0(1.0).into_dyn()));
    Ok(())
}

#[test]
fn test_second_backward_overwrites_stale_gradients() -> Result<(), AutogradError> {
    let mut graph = Graph::new();
    let x = graph.leaf(arr0(3.0));
    let y = square_op(&mut graph, x)?;
    graph.backward(y)?;
    assert_eq!(graph.grad(x)?, Some(&arr0(6.0).into_dyn()));

    graph.set_grad(y, arr0(2.0))?;
    graph.backward(y)?;
    assert_eq!(graph.grad(x)?, Some(&arr0(12.0).into_dyn()));

    graph.clear_grads();
    assert!(graph.grad(x)?.is_none());
    assert!(graph.grad(y)?.is_none());
    Ok(())
}

#[test]
fn test_unused_output_contributes_zeros() -> Result<(), AutogradError> {
    let mut graph = Graph::new();
    let x = graph.leaf(arr1(&[1.0, -2.0]));
    let copies = graph.apply(Duplicate, &[x])?.into_vec();
    let z = square_op(&mut graph, copies[0])?;
    graph.backward(z)?;

    assert!(graph.grad(copies[1])?.is_none());
    assert_eq!(graph.grad(x)?, Some(&arr1(&[2.0, -4.0]).into_dyn()));
    Ok(())
}

#[test]
fn test_missing_backward_rule_fails_loudly() -> Result<(), AutogradError> {
    let mut graph = Graph::new();
    let x = graph.leaf(arr0(2.0));
    let n = graph.apply(Negate, &[x])?.single()?;
    let y = square_op(&mut graph, n)?;

    let err = graph.backward(y).unwrap_err();
    assert_eq!(
        err,
        AutogradError::Unimplemented {
            operation: "negate",
            rule: Rule::Backward
        }
    );
    // Steps completed before the failure keep their results
    assert_eq!(graph.grad(n)?, Some(&arr0(-4.0).into_dyn()));
    assert!(graph.grad(x)?.is_none());
    Ok(())
}
