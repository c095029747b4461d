// tapegrad-core/src/ops/arithmetic/add.rs

use crate::autograd::{BackwardContext, ForwardOutput, Graph, Operation};
use crate::error::AutogradError;
use crate::ops::{apply_single_op, check_arity, check_same_shape, single};
use crate::variable::VariableId;
use ndarray::ArrayD;

// --- Forward Operation ---

/// Element-wise addition of two arrays of the same shape.
#[derive(Debug, Default, Clone, Copy)]
pub struct Add;

impl Operation for Add {
    fn name(&self) -> &'static str {
        "add"
    }

    fn forward(&self, xs: &[&ArrayD<f64>]) -> Result<ForwardOutput, AutogradError> {
        check_arity(self.name(), 2, xs.len())?;
        let (x0, x1) = (xs[0], xs[1]);
        check_same_shape(self.name(), x0, x1)?;
        Ok((x0 + x1).into())
    }

    // --- Backward Operation ---

    /// The local derivative of addition is 1 for both operands, so the upstream
    /// gradient is passed to each input unchanged.
    fn backward(
        &self,
        _ctx: &BackwardContext<'_>,
        gys: &[ArrayD<f64>],
    ) -> Result<Vec<ArrayD<f64>>, AutogradError> {
        let gy = single(self.name(), gys)?;
        Ok(vec![gy.clone(), gy.clone()])
    }
}

/// Performs element-wise addition `x0 + x1`.
///
/// # Errors
/// `AutogradError::ShapeMismatch` if the payload shapes differ (no broadcasting).
pub fn add_op(
    graph: &mut Graph,
    x0: VariableId,
    x1: VariableId,
) -> Result<VariableId, AutogradError> {
    apply_single_op(graph, Add, &[x0, x1])
}

// --- Tests ---
#[cfg(test)]
#[path = "add_test.rs"]
mod tests;
