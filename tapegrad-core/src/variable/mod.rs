// src/variable/mod.rs

use crate::autograd::OperationId;
use crate::error::AutogradError;
use crate::payload::Payload;
use ndarray::ArrayD;
use std::fmt;

/// Stable handle to a value node stored in a [`Graph`](crate::autograd::Graph).
///
/// Handles are indices into the graph's arena tagged with the graph generation they
/// were issued in. After [`Graph::reset`](crate::autograd::Graph::reset) every older
/// handle is rejected as unknown instead of aliasing a newer node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VariableId {
    pub(crate) index: usize,
    pub(crate) generation: u32,
}

impl VariableId {
    pub(crate) fn new(index: usize, generation: u32) -> Self {
        VariableId { index, generation }
    }

    /// Position of the node in the arena.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Graph generation the handle belongs to.
    pub fn generation(&self) -> u32 {
        self.generation
    }
}

impl fmt::Display for VariableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.index)?;
        if self.generation > 0 {
            write!(f, "@{}", self.generation)?;
        }
        Ok(())
    }
}

/// A value node of the computation graph.
///
/// Holds the numeric payload, the gradient computed for it during backward,
/// and the link to the operation that produced it.
/// Leaf variables (created directly by the user) have `producer = None`.
#[derive(Debug, Clone, Default)]
pub struct Variable {
    /// The payload, always in canonical array form. `None` for an uninitialized node.
    pub(crate) data: Option<ArrayD<f64>>,
    /// Gradient of the backward root with respect to this node.
    /// Same shape as `data` once assigned.
    pub(crate) grad: Option<ArrayD<f64>>,
    /// The operation that created this node. Set once, at creation.
    pub(crate) producer: Option<OperationId>,
}

impl Variable {
    /// Creates a leaf value node.
    ///
    /// # Errors
    /// Returns [`AutogradError::UnsupportedType`] if `data` holds anything other than
    /// the canonical array type. Scalars are *not* promoted here; only results coming
    /// out of a forward rule are.
    pub fn new(data: Option<Payload>) -> Result<Self, AutogradError> {
        let data = match data {
            None => None,
            Some(Payload::Array(array)) => Some(array),
            Some(other) => {
                return Err(AutogradError::UnsupportedType {
                    type_name: other.type_name(),
                })
            }
        };
        Ok(Variable {
            data,
            grad: None,
            producer: None,
        })
    }

    /// Wraps an array produced by an operation.
    pub(crate) fn from_array(data: ArrayD<f64>) -> Self {
        Variable {
            data: Some(data),
            grad: None,
            producer: None,
        }
    }

    pub fn data(&self) -> Option<&ArrayD<f64>> {
        self.data.as_ref()
    }

    pub fn grad(&self) -> Option<&ArrayD<f64>> {
        self.grad.as_ref()
    }

    pub fn producer(&self) -> Option<OperationId> {
        self.producer
    }

    /// A node without producer is a graph input.
    pub fn is_leaf(&self) -> bool {
        self.producer.is_none()
    }

    /// Shape of the payload, if any.
    pub fn shape(&self) -> Option<Vec<usize>> {
        self.data.as_ref().map(|d| d.shape().to_vec())
    }

    /// Records which operation produced this node.
    ///
    /// The graph builder calls this exactly once per output; a second call means the
    /// graph is being wired incorrectly and is reported instead of silently relinking.
    pub(crate) fn set_producer(
        &mut self,
        id: VariableId,
        op: OperationId,
    ) -> Result<(), AutogradError> {
        if let Some(producer) = self.producer {
            return Err(AutogradError::ProducerAlreadySet {
                variable: id,
                producer,
            });
        }
        self.producer = Some(op);
        Ok(())
    }
}

#[cfg(test)]
#[path = "variable_test.rs"]
mod tests;
