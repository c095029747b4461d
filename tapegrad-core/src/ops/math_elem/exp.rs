// tapegrad-core/src/ops/math_elem/exp.rs

use crate::autograd::{BackwardContext, ForwardOutput, Graph, Operation};
use crate::error::AutogradError;
use crate::ops::{apply_single_op, single};
use crate::variable::VariableId;
use ndarray::ArrayD;

/// Element-wise natural exponential, \( y = e^x \).
#[derive(Debug, Default, Clone, Copy)]
pub struct Exp;

impl Operation for Exp {
    fn name(&self) -> &'static str {
        "exp"
    }

    fn forward(&self, xs: &[&ArrayD<f64>]) -> Result<ForwardOutput, AutogradError> {
        let x = single(self.name(), xs)?;
        Ok(x.mapv(f64::exp).into())
    }

    /// Computes the gradient for \( y = e^x \).
    ///
    /// Since \( \frac{dy}{dx} = e^x = y \), the recorded output is reused:
    /// \\[ \frac{dL}{dx} = \frac{dL}{dy} \cdot y \\]
    fn backward(
        &self,
        ctx: &BackwardContext<'_>,
        gys: &[ArrayD<f64>],
    ) -> Result<Vec<ArrayD<f64>>, AutogradError> {
        let gy = single(self.name(), gys)?;
        let y = ctx.output(0)?;
        Ok(vec![y * gy])
    }
}

/// Computes \( e^x \) element-wise.
///
/// This operation supports automatic differentiation. Large inputs overflow to
/// `f64::INFINITY`, exactly like `f64::exp`.
pub fn exp_op(graph: &mut Graph, x: VariableId) -> Result<VariableId, AutogradError> {
    apply_single_op(graph, Exp, &[x])
}

#[cfg(test)]
#[path = "exp_test.rs"]
mod tests;
