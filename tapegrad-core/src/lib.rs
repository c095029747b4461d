//! # tapegrad-core
//!
//! A define-by-run reverse-mode automatic differentiation engine.
//!
//! Applying an [`Operation`] to variables of a [`Graph`] runs its forward rule and
//! records the call; [`Graph::backward`] later replays the recorded operations in
//! reverse to compute gradients.
//!
//! ```
//! use ndarray::arr0;
//! use tapegrad_core::ops::{exp_op, square_op};
//! use tapegrad_core::Graph;
//!
//! let mut graph = Graph::new();
//! let x = graph.leaf(arr0(0.5));
//! let a = square_op(&mut graph, x)?;
//! let b = exp_op(&mut graph, a)?;
//! let y = square_op(&mut graph, b)?;
//! graph.backward(y)?;
//!
//! let grad = graph.grad(x)?.unwrap();
//! assert!((grad.sum() - 2.0 * 0.5f64.exp()).abs() < 1e-12);
//! # Ok::<(), tapegrad_core::AutogradError>(())
//! ```

// Déclare les modules principaux de la crate
pub mod autograd;
pub mod creation;
pub mod ops;
pub mod payload;
pub mod variable;

pub mod utils;

pub mod error;

// Ré-exporte les types principaux pour qu'ils soient accessibles depuis la racine
pub use autograd::{Applied, Graph, Operation, OperationId};
pub use error::AutogradError;
pub use payload::Payload;
pub use variable::{Variable, VariableId};
// Re-export the numeric backend so callers build payloads with the same version
pub use ndarray;
