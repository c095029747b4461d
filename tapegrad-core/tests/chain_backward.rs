use approx::assert_relative_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tapegrad_core::autograd::grad_check::{check_grad, numerical_diff, GradCheckConfig};
use tapegrad_core::creation::{rand_uniform, randn};
use tapegrad_core::ndarray::arr0;
use tapegrad_core::ops::{exp_op, square_op, sum_op};
use tapegrad_core::{AutogradError, Graph, VariableId};

mod common;
use common::{scalar, scalar_leaf};

fn square_exp_square(graph: &mut Graph, x: VariableId) -> Result<VariableId, AutogradError> {
    let a = square_op(graph, x)?;
    let b = exp_op(graph, a)?;
    square_op(graph, b)
}

#[test]
fn test_chain_rule_against_central_difference() -> Result<(), AutogradError> {
    let (mut graph, x) = scalar_leaf(0.5);
    let y = square_exp_square(&mut graph, x)?;
    graph.set_grad(y, arr0(1.0))?;
    graph.backward(y)?;

    let analytical = scalar(graph.grad(x)?.unwrap());
    let numerical = scalar(&numerical_diff(square_exp_square, &arr0(0.5).into_dyn(), 1e-4)?);

    assert_relative_eq!(analytical, 3.297442541400256, epsilon = 1e-9);
    assert_relative_eq!(analytical, numerical, epsilon = 1e-4, max_relative = 1e-4);
    Ok(())
}

#[test]
fn test_gradient_check_random_inputs() {
    let mut rng = StdRng::seed_from_u64(10);
    let config = GradCheckConfig::default();

    check_grad(square_op, &rand_uniform(&[1], &mut rng), &config).unwrap();
    check_grad(exp_op, &randn(&[4], &mut rng), &config).unwrap();
    check_grad(
        square_exp_square,
        &rand_uniform(&[3], &mut rng),
        &GradCheckConfig {
            rtol: 1e-4,
            atol: 1e-4,
            ..config
        },
    )
    .unwrap();
}

#[test]
fn test_reset_between_passes() -> Result<(), AutogradError> {
    let mut graph = Graph::new();
    for value in [1.0, 2.0, 3.0] {
        graph.reset();
        let x = graph.leaf(arr0(value));
        let y = square_op(&mut graph, x)?;
        let loss = sum_op(&mut graph, y)?;
        graph.backward(loss)?;

        assert_eq!(scalar(graph.grad(x)?.unwrap()), 2.0 * value);
        assert_eq!(graph.num_variables(), 3);
        assert_eq!(graph.num_operations(), 2);
    }
    Ok(())
}
