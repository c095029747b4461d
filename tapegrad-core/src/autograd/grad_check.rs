use crate::autograd::Graph;
use crate::error::AutogradError;
use crate::payload::{allclose, is_close};
use crate::variable::VariableId;
use ndarray::ArrayD;
use thiserror::Error;

/// Settings for [`check_grad`].
///
/// The defaults mirror the usual central-difference step and `allclose` tolerances.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradCheckConfig {
    /// Half-width of the central difference.
    pub epsilon: f64,
    /// Relative tolerance.
    pub rtol: f64,
    /// Absolute tolerance.
    pub atol: f64,
}

impl Default for GradCheckConfig {
    fn default() -> Self {
        GradCheckConfig {
            epsilon: 1e-4,
            rtol: 1e-5,
            atol: 1e-8,
        }
    }
}

/// Error type specifically for gradient checking failures.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GradCheckError {
    #[error("Gradient check failed at element index {element_index}: Analytical grad {analytical_grad:?} != Numerical grad {numerical_grad:?}. Difference: {difference:?}")]
    GradientMismatch {
        element_index: usize,
        analytical_grad: f64,
        numerical_grad: f64,
        difference: f64,
    },

    #[error("Numerical gradient is NaN or infinite at element {element_index}: {value:?}")]
    NumericalGradNaNOrInfinite { element_index: usize, value: f64 },

    #[error("Analytical gradient is NaN or infinite at element {element_index}: {value:?}")]
    AnalyticalGradNaNOrInfinite { element_index: usize, value: f64 },

    #[error("Input has no gradient after the backward pass")]
    MissingAnalyticalGrad,

    #[error("Analytical gradient shape {analytical:?} does not match numerical gradient shape {numerical:?}")]
    GradShapeMismatch {
        analytical: Vec<usize>,
        numerical: Vec<usize>,
    },

    #[error("Graph error during gradient check: {0}")]
    Graph(#[from] AutogradError),
}

/// Evaluates `f` on a scratch graph holding only `x` and returns the output payload.
fn evaluate<F>(f: &F, x: ArrayD<f64>) -> Result<ArrayD<f64>, AutogradError>
where
    F: Fn(&mut Graph, VariableId) -> Result<VariableId, AutogradError>,
{
    let mut graph = Graph::new();
    let input = graph.leaf(x);
    let output = f(&mut graph, input)?;
    graph
        .data(output)?
        .cloned()
        .ok_or(AutogradError::EmptyPayload { variable: output })
}

/// Central-difference estimate `(f(x + eps) - f(x - eps)) / (2 eps)`.
///
/// Every element of `x` is shifted at once, so the result is the derivative of each
/// output element with respect to the matching input element. This is only meaningful
/// for element-wise `f`.
pub fn numerical_diff<F>(f: F, x: &ArrayD<f64>, eps: f64) -> Result<ArrayD<f64>, AutogradError>
where
    F: Fn(&mut Graph, VariableId) -> Result<VariableId, AutogradError>,
{
    let y0 = evaluate(&f, x.mapv(|v| v - eps))?;
    let y1 = evaluate(&f, x.mapv(|v| v + eps))?;
    if y0.shape() != y1.shape() {
        return Err(AutogradError::ShapeMismatch {
            expected: y0.shape().to_vec(),
            actual: y1.shape().to_vec(),
            operation: "numerical_diff".to_string(),
        });
    }
    Ok((y1 - y0) / (2.0 * eps))
}

/// Checks the analytical gradient of an element-wise `f` at `x` against
/// [`numerical_diff`].
///
/// The analytical gradient comes from a backward pass over a fresh graph seeded with
/// ones. Elements are compared with `|analytical - numerical| <= atol + rtol * |numerical|`.
pub fn check_grad<F>(f: F, x: &ArrayD<f64>, config: &GradCheckConfig) -> Result<(), GradCheckError>
where
    F: Fn(&mut Graph, VariableId) -> Result<VariableId, AutogradError>,
{
    let analytical = {
        let mut graph = Graph::new();
        let input = graph.leaf(x.clone());
        let output = f(&mut graph, input)?;
        graph.backward(output)?;
        graph
            .grad(input)?
            .cloned()
            .ok_or(GradCheckError::MissingAnalyticalGrad)?
    };

    let numerical = numerical_diff(&f, x, config.epsilon)?;

    if analytical.shape() != numerical.shape() {
        return Err(GradCheckError::GradShapeMismatch {
            analytical: analytical.shape().to_vec(),
            numerical: numerical.shape().to_vec(),
        });
    }

    if allclose(&analytical, &numerical, config.rtol, config.atol) {
        log::debug!("Gradient check passed for {} element(s)", analytical.len());
        return Ok(());
    }

    // Report the first offending element
    for (element_index, (&analytical_grad, &numerical_grad)) in
        analytical.iter().zip(numerical.iter()).enumerate()
    {
        if !numerical_grad.is_finite() {
            return Err(GradCheckError::NumericalGradNaNOrInfinite {
                element_index,
                value: numerical_grad,
            });
        }
        if !analytical_grad.is_finite() {
            return Err(GradCheckError::AnalyticalGradNaNOrInfinite {
                element_index,
                value: analytical_grad,
            });
        }
        if !is_close(analytical_grad, numerical_grad, config.rtol, config.atol) {
            return Err(GradCheckError::GradientMismatch {
                element_index,
                analytical_grad,
                numerical_grad,
                difference: (analytical_grad - numerical_grad).abs(),
            });
        }
    }

    Ok(())
}
