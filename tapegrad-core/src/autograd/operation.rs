use crate::error::{AutogradError, Rule};
use crate::payload::Payload;
use ndarray::{Array, ArrayD, Dimension};
use std::fmt::{self, Debug};

/// Stable handle to an operation node stored in a [`Graph`](super::Graph).
///
/// Carries the graph generation like [`VariableId`](crate::variable::VariableId).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OperationId {
    pub(crate) index: usize,
    pub(crate) generation: u32,
}

impl OperationId {
    pub(crate) fn new(index: usize, generation: u32) -> Self {
        OperationId { index, generation }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }
}

impl fmt::Display for OperationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "op{}", self.index)?;
        if self.generation > 0 {
            write!(f, "@{}", self.generation)?;
        }
        Ok(())
    }
}

/// Defines a differentiable computation: a forward rule and its gradient rule.
///
/// Implementations are handed to [`Graph::apply`](super::Graph::apply), which runs
/// `forward` on the unwrapped input payloads, records the call in the graph, and later
/// calls `backward` during the backward traversal.
///
/// Both rules default to returning [`AutogradError::Unimplemented`], so an operation
/// that only overrides `forward` fails loudly the moment a gradient has to flow
/// through it.
pub trait Operation: Debug {
    /// Name used in log records and error messages.
    fn name(&self) -> &'static str;

    /// Computes the result(s) from the input payloads, given in call order.
    ///
    /// A rule may return a single payload or an ordered sequence of payloads. Bare
    /// scalars are allowed; the graph promotes them to zero-dimensional arrays.
    fn forward(&self, xs: &[&ArrayD<f64>]) -> Result<ForwardOutput, AutogradError> {
        let _ = xs;
        Err(AutogradError::Unimplemented {
            operation: self.name(),
            rule: Rule::Forward,
        })
    }

    /// Computes the gradients of the inputs from the gradients of the outputs.
    ///
    /// `gys` holds one gradient per recorded output, in output order. The returned
    /// `Vec` **must** hold one gradient per recorded input, in input order.
    /// `ctx` exposes the payloads recorded during the forward call.
    fn backward(
        &self,
        ctx: &BackwardContext<'_>,
        gys: &[ArrayD<f64>],
    ) -> Result<Vec<ArrayD<f64>>, AutogradError> {
        let _ = (ctx, gys);
        Err(AutogradError::Unimplemented {
            operation: self.name(),
            rule: Rule::Backward,
        })
    }
}

/// What a forward rule produced: one payload, or an ordered sequence of them.
#[derive(Debug, Clone, PartialEq)]
pub enum ForwardOutput {
    Single(Payload),
    Multiple(Vec<Payload>),
}

impl ForwardOutput {
    /// Normalizes both forms to an ordered sequence.
    pub fn into_vec(self) -> Vec<Payload> {
        match self {
            ForwardOutput::Single(payload) => vec![payload],
            ForwardOutput::Multiple(payloads) => payloads,
        }
    }
}

impl From<Payload> for ForwardOutput {
    fn from(payload: Payload) -> Self {
        ForwardOutput::Single(payload)
    }
}

impl<D: Dimension> From<Array<f64, D>> for ForwardOutput {
    fn from(array: Array<f64, D>) -> Self {
        ForwardOutput::Single(Payload::from(array))
    }
}

impl From<f64> for ForwardOutput {
    fn from(value: f64) -> Self {
        ForwardOutput::Single(Payload::Scalar(value))
    }
}

impl From<Vec<Payload>> for ForwardOutput {
    fn from(payloads: Vec<Payload>) -> Self {
        ForwardOutput::Multiple(payloads)
    }
}

/// Payloads recorded by an operation node, made available to its backward rule.
#[derive(Debug)]
pub struct BackwardContext<'a> {
    pub(crate) inputs: Vec<&'a ArrayD<f64>>,
    pub(crate) outputs: Vec<&'a ArrayD<f64>>,
}

impl<'a> BackwardContext<'a> {
    /// Payload of the `index`-th recorded input.
    pub fn input(&self, index: usize) -> Result<&'a ArrayD<f64>, AutogradError> {
        self.inputs
            .get(index)
            .copied()
            .ok_or_else(|| AutogradError::ArityMismatch {
                operation: "BackwardContext::input",
                expected: index + 1,
                actual: self.inputs.len(),
            })
    }

    /// Payload of the `index`-th recorded output.
    pub fn output(&self, index: usize) -> Result<&'a ArrayD<f64>, AutogradError> {
        self.outputs
            .get(index)
            .copied()
            .ok_or_else(|| AutogradError::ArityMismatch {
                operation: "BackwardContext::output",
                expected: index + 1,
                actual: self.outputs.len(),
            })
    }

    pub fn inputs(&self) -> &[&'a ArrayD<f64>] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[&'a ArrayD<f64>] {
        &self.outputs
    }
}
