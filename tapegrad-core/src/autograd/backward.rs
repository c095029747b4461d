// src/autograd/backward.rs

use crate::autograd::graph::Graph;
use crate::autograd::operation::{BackwardContext, OperationId};
use crate::error::AutogradError;
use crate::payload::{ones_like, zeros_like};
use crate::variable::VariableId;
use ndarray::ArrayD;

impl Graph {
    /// Performs the backward pass starting from `root`.
    ///
    /// Computes the gradient of `root` with respect to every variable reachable
    /// through producer links, using the chain rule.
    ///
    /// If `root` has no gradient yet it is seeded with ones shaped like its payload.
    /// Pending operations are kept on a stack and processed last-in first-out; the
    /// gradients returned by each backward rule are **assigned** to the inputs, not
    /// summed. This is exact for chains and trees. When a variable feeds several
    /// operations that later reconverge, the last assignment wins.
    ///
    /// Gradients left over from a previous call are overwritten, never reset;
    /// use [`Graph::clear_grads`] first if that matters.
    ///
    /// # Errors
    /// Returns `AutogradError` if:
    /// * `root` (or any recorded node) is not part of this graph.
    /// * `root` needs a seed gradient but has no payload.
    /// * A backward rule fails or returns the wrong number of gradients.
    ///
    /// Gradients assigned before the failing step stay in place.
    pub fn backward(&mut self, root: VariableId) -> Result<(), AutogradError> {
        let (needs_seed, producer) = {
            let variable = self.get(root)?;
            (variable.grad.is_none(), variable.producer)
        };

        if needs_seed {
            let seed = ones_like(self.payload(root)?);
            self.get_mut(root)?.grad = Some(seed);
        }

        let Some(producer) = producer else {
            log::debug!("backward() called on leaf {}. No operation to perform.", root);
            return Ok(());
        };

        log::debug!("Starting backward pass from {}", root);
        let mut pending: Vec<OperationId> = vec![producer];
        let mut processed = 0usize;

        while let Some(op_id) = pending.pop() {
            let (inputs, input_grads) = self.run_backward_rule(op_id)?;

            for (input, grad) in inputs.into_iter().zip(input_grads) {
                let variable = self.get_mut(input)?;
                variable.grad = Some(grad);
                if let Some(next) = variable.producer {
                    pending.push(next);
                }
            }
            processed += 1;
        }

        log::debug!(
            "Backward pass from {} done ({} operation(s) processed)",
            root,
            processed
        );
        Ok(())
    }

    /// Runs the backward rule of one operation node.
    ///
    /// Returns the node's inputs together with the gradient computed for each.
    fn run_backward_rule(
        &self,
        op_id: OperationId,
    ) -> Result<(Vec<VariableId>, Vec<ArrayD<f64>>), AutogradError> {
        let node = self.operation(op_id)?;

        let gys = node
            .outputs
            .iter()
            .map(|&y| {
                let variable = self.get(y)?;
                match (variable.grad(), variable.data()) {
                    (Some(grad), _) => Ok(grad.clone()),
                    // An output nobody consumed contributes nothing
                    (None, Some(data)) => Ok(zeros_like(data)),
                    (None, None) => Err(AutogradError::EmptyPayload { variable: y }),
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        let ctx = BackwardContext {
            inputs: node
                .inputs
                .iter()
                .map(|&x| self.payload(x))
                .collect::<Result<Vec<_>, _>>()?,
            outputs: node
                .outputs
                .iter()
                .map(|&y| self.payload(y))
                .collect::<Result<Vec<_>, _>>()?,
        };

        log::trace!("Running backward of {} ({})", op_id, node.name());
        let gxs = node.op.backward(&ctx, &gys)?;

        if gxs.len() != node.inputs.len() {
            return Err(AutogradError::GradientCountMismatch {
                operation: node.name(),
                expected: node.inputs.len(),
                actual: gxs.len(),
            });
        }

        Ok((node.inputs.clone(), gxs))
    }
}

#[cfg(test)]
#[path = "backward_test.rs"]
mod tests;
