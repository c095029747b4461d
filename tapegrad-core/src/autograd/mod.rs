//! Graph recording and reverse-mode differentiation.
//!
//! - [`operation`]: the [`Operation`] trait every differentiable computation implements.
//! - [`graph`]: the [`Graph`] arena and the invocation protocol ([`Graph::apply`]).
//! - `backward`: the backward traversal ([`Graph::backward`]).
//! - [`grad_check`]: numerical differentiation for verifying backward rules.

mod backward;
pub mod grad_check;
pub mod graph;
pub mod operation;

pub use graph::{Applied, Graph, OperationNode};
pub use operation::{BackwardContext, ForwardOutput, Operation, OperationId};
