use crate::autograd::{BackwardContext, ForwardOutput, Graph, Operation};
use crate::error::AutogradError;
use crate::ops::{apply_single_op, single};
use crate::variable::VariableId;
use ndarray::ArrayD;

/// Sum of all elements.
///
/// The forward rule returns a bare `f64`; the graph stores it as a
/// zero-dimensional array.
#[derive(Debug, Default, Clone, Copy)]
pub struct Sum;

impl Operation for Sum {
    fn name(&self) -> &'static str {
        "sum"
    }

    fn forward(&self, xs: &[&ArrayD<f64>]) -> Result<ForwardOutput, AutogradError> {
        let x = single(self.name(), xs)?;
        Ok(x.sum().into())
    }

    /// Every element contributes with weight 1, so the (scalar) upstream gradient is
    /// broadcast back to the input shape.
    fn backward(
        &self,
        ctx: &BackwardContext<'_>,
        gys: &[ArrayD<f64>],
    ) -> Result<Vec<ArrayD<f64>>, AutogradError> {
        let gy = single(self.name(), gys)?;
        let x = ctx.input(0)?;
        Ok(vec![ArrayD::from_elem(x.raw_dim(), gy.sum())])
    }
}

/// Reduces `x` to the sum of its elements (a zero-dimensional payload).
pub fn sum_op(graph: &mut Graph, x: VariableId) -> Result<VariableId, AutogradError> {
    apply_single_op(graph, Sum, &[x])
}

#[cfg(test)]
#[path = "sum_test.rs"]
mod tests;
