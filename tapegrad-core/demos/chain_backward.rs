use tapegrad_core::autograd::grad_check::numerical_diff;
use tapegrad_core::ndarray::arr0;
use tapegrad_core::ops::{add_op, exp_op, square_op};
use tapegrad_core::{AutogradError, Graph, Payload, VariableId};

fn square_exp_square(graph: &mut Graph, x: VariableId) -> Result<VariableId, AutogradError> {
    let a = square_op(graph, x)?;
    let b = exp_op(graph, a)?;
    square_op(graph, b)
}

fn main() -> Result<(), AutogradError> {
    println!("--- y = square(exp(square(x))) at x = 0.5 ---");
    let mut graph = Graph::new();
    let x = graph.leaf(arr0(0.5));
    let y = square_exp_square(&mut graph, x)?;
    graph.backward(y)?;

    if let (Some(value), Some(grad)) = (graph.data(y)?, graph.grad(x)?) {
        println!("y       = {}", value);
        println!("dy/dx   = {}", grad);
    }
    let numerical = numerical_diff(square_exp_square, &arr0(0.5).into_dyn(), 1e-4)?;
    println!("numeric = {}", numerical);

    println!("\n--- add(2, 3) ---");
    graph.reset();
    let x0 = graph.leaf(arr0(2.0));
    let x1 = graph.leaf(arr0(3.0));
    let sum = add_op(&mut graph, x0, x1)?;
    if let Some(value) = graph.data(sum)? {
        println!("add     = {}", value);
    }

    println!("\n--- raw scalar payloads are rejected ---");
    match graph.variable(Some(Payload::Scalar(1.0))) {
        Ok(id) => println!("unexpectedly accepted as {}", id),
        Err(e) => println!("error   = {}", e),
    }

    Ok(())
}
