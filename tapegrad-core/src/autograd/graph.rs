use crate::autograd::operation::{Operation, OperationId};
use crate::error::AutogradError;
use crate::payload::{as_array, Payload};
use crate::variable::{Variable, VariableId};
use ndarray::{Array, ArrayD, Dimension};

/// One executed operation: the rules plus the value nodes it consumed and produced.
#[derive(Debug)]
pub struct OperationNode {
    pub(crate) op: Box<dyn Operation>,
    /// Consumed variables, in call order.
    pub(crate) inputs: Vec<VariableId>,
    /// Produced variables, in result order. Each one has `producer` pointing back here.
    pub(crate) outputs: Vec<VariableId>,
}

impl OperationNode {
    pub fn name(&self) -> &'static str {
        self.op.name()
    }

    pub fn inputs(&self) -> &[VariableId] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[VariableId] {
        &self.outputs
    }
}

/// Result of [`Graph::apply`].
///
/// Exactly one output is returned bare; anything else comes back as an ordered
/// sequence matching the forward rule's results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Applied {
    Single(VariableId),
    Multiple(Vec<VariableId>),
}

impl Applied {
    /// Returns the single output.
    ///
    /// # Errors
    /// [`AutogradError::ExpectedSingleOutput`] if the operation produced a sequence.
    pub fn single(self) -> Result<VariableId, AutogradError> {
        match self {
            Applied::Single(id) => Ok(id),
            Applied::Multiple(ids) => Err(AutogradError::ExpectedSingleOutput { count: ids.len() }),
        }
    }

    pub fn into_vec(self) -> Vec<VariableId> {
        match self {
            Applied::Single(id) => vec![id],
            Applied::Multiple(ids) => ids,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Applied::Single(_) => 1,
            Applied::Multiple(ids) => ids.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<Vec<VariableId>> for Applied {
    fn from(mut ids: Vec<VariableId>) -> Self {
        if ids.len() == 1 {
            Applied::Single(ids.remove(0))
        } else {
            Applied::Multiple(ids)
        }
    }
}

/// Owns every node recorded during one forward/backward cycle.
///
/// Value nodes and operation nodes live in two arenas and refer to each other by
/// index handles, so the mutual `producer` / `inputs` / `outputs` links never form
/// ownership cycles. Call [`Graph::reset`] between independent passes.
#[derive(Debug, Default)]
pub struct Graph {
    pub(crate) variables: Vec<Variable>,
    pub(crate) operations: Vec<OperationNode>,
    /// Bumped by `reset`; handles from another generation are unknown.
    generation: u32,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a leaf value node from an optional payload.
    ///
    /// # Errors
    /// [`AutogradError::UnsupportedType`] if the payload is a bare scalar.
    pub fn variable(&mut self, data: Option<Payload>) -> Result<VariableId, AutogradError> {
        let variable = Variable::new(data)?;
        Ok(self.push_variable(variable))
    }

    /// Creates a leaf value node from an array of any dimensionality.
    pub fn leaf<D: Dimension>(&mut self, data: Array<f64, D>) -> VariableId {
        self.push_variable(Variable::from_array(data.into_dyn()))
    }

    fn push_variable(&mut self, variable: Variable) -> VariableId {
        let id = VariableId::new(self.variables.len(), self.generation);
        self.variables.push(variable);
        id
    }

    /// Applies `op` to `inputs`, recording the call in the graph.
    ///
    /// Runs the forward rule on the unwrapped payloads, wraps every result in a new
    /// value node whose producer is the new operation node, and returns the new
    /// node(s). Nothing is allocated if the forward rule fails.
    pub fn apply<O: Operation + 'static>(
        &mut self,
        op: O,
        inputs: &[VariableId],
    ) -> Result<Applied, AutogradError> {
        self.apply_boxed(Box::new(op), inputs)
    }

    /// Same as [`Graph::apply`] for an already boxed operation.
    pub fn apply_boxed(
        &mut self,
        op: Box<dyn Operation>,
        inputs: &[VariableId],
    ) -> Result<Applied, AutogradError> {
        let results = {
            let xs = inputs
                .iter()
                .map(|&id| self.payload(id))
                .collect::<Result<Vec<_>, _>>()?;
            op.forward(&xs)?.into_vec()
        };

        let op_id = OperationId::new(self.operations.len(), self.generation);
        let mut outputs = Vec::with_capacity(results.len());
        for result in results {
            let id = self.push_variable(Variable::from_array(as_array(result)));
            self.variables[id.index].set_producer(id, op_id)?;
            outputs.push(id);
        }

        log::debug!(
            "Recorded {} ({}) with inputs {:?} -> outputs {:?}",
            op_id,
            op.name(),
            inputs,
            outputs
        );
        self.operations.push(OperationNode {
            op,
            inputs: inputs.to_vec(),
            outputs: outputs.clone(),
        });

        Ok(Applied::from(outputs))
    }

    pub fn get(&self, id: VariableId) -> Result<&Variable, AutogradError> {
        if id.generation != self.generation {
            return Err(AutogradError::UnknownVariable(id));
        }
        self.variables
            .get(id.index)
            .ok_or(AutogradError::UnknownVariable(id))
    }

    pub(crate) fn get_mut(&mut self, id: VariableId) -> Result<&mut Variable, AutogradError> {
        if id.generation != self.generation {
            return Err(AutogradError::UnknownVariable(id));
        }
        self.variables
            .get_mut(id.index)
            .ok_or(AutogradError::UnknownVariable(id))
    }

    pub fn operation(&self, id: OperationId) -> Result<&OperationNode, AutogradError> {
        if id.generation != self.generation {
            return Err(AutogradError::UnknownOperation(id));
        }
        self.operations
            .get(id.index)
            .ok_or(AutogradError::UnknownOperation(id))
    }

    /// The payload of `id`, which must be present.
    pub(crate) fn payload(&self, id: VariableId) -> Result<&ArrayD<f64>, AutogradError> {
        self.get(id)?
            .data()
            .ok_or(AutogradError::EmptyPayload { variable: id })
    }

    pub fn data(&self, id: VariableId) -> Result<Option<&ArrayD<f64>>, AutogradError> {
        Ok(self.get(id)?.data())
    }

    pub fn grad(&self, id: VariableId) -> Result<Option<&ArrayD<f64>>, AutogradError> {
        Ok(self.get(id)?.grad())
    }

    pub fn producer(&self, id: VariableId) -> Result<Option<OperationId>, AutogradError> {
        Ok(self.get(id)?.producer())
    }

    pub fn is_leaf(&self, id: VariableId) -> Result<bool, AutogradError> {
        Ok(self.get(id)?.is_leaf())
    }

    /// Sets the gradient of `id`, e.g. to seed backward with something other than ones.
    ///
    /// # Errors
    /// [`AutogradError::ShapeMismatch`] if the node has a payload of another shape.
    pub fn set_grad<D: Dimension>(
        &mut self,
        id: VariableId,
        grad: Array<f64, D>,
    ) -> Result<(), AutogradError> {
        let grad = grad.into_dyn();
        let variable = self.get_mut(id)?;
        if let Some(data) = variable.data.as_ref() {
            if data.shape() != grad.shape() {
                return Err(AutogradError::ShapeMismatch {
                    expected: data.shape().to_vec(),
                    actual: grad.shape().to_vec(),
                    operation: "set_grad".to_string(),
                });
            }
        }
        variable.grad = Some(grad);
        Ok(())
    }

    /// Resets the gradient of `id` to `None`.
    pub fn clear_grad(&mut self, id: VariableId) -> Result<(), AutogradError> {
        self.get_mut(id)?.grad = None;
        Ok(())
    }

    /// Resets every gradient in the graph, keeping the recorded nodes.
    pub fn clear_grads(&mut self) {
        for variable in &mut self.variables {
            variable.grad = None;
        }
    }

    /// Drops every recorded node and starts a new generation. Handles issued before
    /// the reset fail with `UnknownVariable` / `UnknownOperation` afterwards.
    pub fn reset(&mut self) {
        log::debug!(
            "Resetting graph ({} variables, {} operations)",
            self.variables.len(),
            self.operations.len()
        );
        self.variables.clear();
        self.operations.clear();
        self.generation = self.generation.wrapping_add(1);
    }

    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    pub fn num_operations(&self) -> usize {
        self.operations.len()
    }
}

#[cfg(test)]
#[path = "graph_test.rs"]
mod tests;
