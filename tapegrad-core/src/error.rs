use crate::autograd::OperationId;
use crate::variable::VariableId;
use std::fmt;
use thiserror::Error;

/// Which rule of an [`Operation`](crate::autograd::Operation) was invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Forward,
    Backward,
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Forward => f.write_str("forward"),
            Rule::Backward => f.write_str("backward"),
        }
    }
}

/// Custom error type for the tapegrad engine.
#[derive(Error, Debug, PartialEq, Clone)]
pub enum AutogradError {
    /// A value node was constructed from something other than the canonical array type.
    #[error("{type_name} is not supported")]
    UnsupportedType { type_name: &'static str },

    /// An operation did not provide a concrete forward or backward rule.
    #[error("{rule} rule is not implemented for operation '{operation}'")]
    Unimplemented { operation: &'static str, rule: Rule },

    #[error("Shape mismatch: expected {expected:?}, got {actual:?} during operation {operation}")]
    ShapeMismatch {
        expected: Vec<usize>,
        actual: Vec<usize>,
        operation: String,
    },

    #[error("Operation '{operation}' expects {expected} input(s), got {actual}")]
    ArityMismatch {
        operation: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Variable {variable} has no payload")]
    EmptyPayload { variable: VariableId },

    #[error("Unknown variable handle {0}")]
    UnknownVariable(VariableId),

    #[error("Unknown operation handle {0}")]
    UnknownOperation(OperationId),

    #[error("Variable {variable} already has producer {producer}")]
    ProducerAlreadySet {
        variable: VariableId,
        producer: OperationId,
    },

    #[error("Backward of '{operation}' returned {actual} gradient(s), but it has {expected} input(s)")]
    GradientCountMismatch {
        operation: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Expected a single output, got {count}")]
    ExpectedSingleOutput { count: usize },
}
