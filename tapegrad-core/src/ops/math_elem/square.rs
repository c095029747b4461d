// tapegrad-core/src/ops/math_elem/square.rs

use crate::autograd::{BackwardContext, ForwardOutput, Graph, Operation};
use crate::error::AutogradError;
use crate::ops::{apply_single_op, single};
use crate::variable::VariableId;
use ndarray::ArrayD;

/// Element-wise square, \( y = x^2 \).
#[derive(Debug, Default, Clone, Copy)]
pub struct Square;

impl Operation for Square {
    fn name(&self) -> &'static str {
        "square"
    }

    fn forward(&self, xs: &[&ArrayD<f64>]) -> Result<ForwardOutput, AutogradError> {
        let x = single(self.name(), xs)?;
        Ok(x.mapv(|v| v * v).into())
    }

    /// \( \frac{dL}{dx} = \frac{dL}{dy} \cdot 2x \)
    fn backward(
        &self,
        ctx: &BackwardContext<'_>,
        gys: &[ArrayD<f64>],
    ) -> Result<Vec<ArrayD<f64>>, AutogradError> {
        let gy = single(self.name(), gys)?;
        let x = ctx.input(0)?;
        Ok(vec![x * gy * 2.0])
    }
}

/// Squares `x` element-wise.
///
/// This operation supports automatic differentiation.
pub fn square_op(graph: &mut Graph, x: VariableId) -> Result<VariableId, AutogradError> {
    apply_single_op(graph, Square, &[x])
}

#[cfg(test)]
#[path = "square_test.rs"]
mod tests;
