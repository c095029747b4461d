//! # Differentiable Operations Module (`ops`)
//!
//! Concrete [`Operation`](crate::autograd::Operation) implementations, grouped by family.
//!
//! ## Structure:
//!
//! - **Operation structs** (`Square`, `Exp`, `Add`, `Sum`): implement the forward rule on
//!   raw payloads and the backward rule mapping output gradients to input gradients.
//! - **`_op` functions**: apply the operation to variables of a [`Graph`] and return the
//!   single output handle.
//!
//! ## Key Submodules:
//!
//! - [`arithmetic`]: element-wise binary arithmetic (add).
//! - [`math_elem`]: element-wise math functions (square, exp).
//! - [`reduction`]: reductions to a scalar (sum).

use crate::autograd::{Graph, Operation};
use crate::error::AutogradError;
use crate::variable::VariableId;
use ndarray::ArrayD;

pub mod arithmetic;
pub mod math_elem;
pub mod reduction;

pub use arithmetic::{add_op, Add};
pub use math_elem::{exp_op, square_op, Exp, Square};
pub use reduction::{sum_op, Sum};

/// Checks that an operation received `expected` payloads or gradients.
pub(crate) fn check_arity(
    operation: &'static str,
    expected: usize,
    actual: usize,
) -> Result<(), AutogradError> {
    if expected != actual {
        return Err(AutogradError::ArityMismatch {
            operation,
            expected,
            actual,
        });
    }
    Ok(())
}

/// Returns the only element of `items`, or an arity error.
pub(crate) fn single<'a, T>(operation: &'static str, items: &'a [T]) -> Result<&'a T, AutogradError> {
    check_arity(operation, 1, items.len())?;
    Ok(&items[0])
}

/// Applies a single-output operation and unwraps its result.
pub(crate) fn apply_single_op<O: Operation + 'static>(
    graph: &mut Graph,
    op: O,
    inputs: &[VariableId],
) -> Result<VariableId, AutogradError> {
    graph.apply(op, inputs)?.single()
}

/// Fails with `ShapeMismatch` unless both arrays have the same shape.
pub(crate) fn check_same_shape(
    operation: &str,
    a: &ArrayD<f64>,
    b: &ArrayD<f64>,
) -> Result<(), AutogradError> {
    if a.shape() != b.shape() {
        return Err(AutogradError::ShapeMismatch {
            expected: a.shape().to_vec(),
            actual: b.shape().to_vec(),
            operation: operation.to_string(),
        });
    }
    Ok(())
}
