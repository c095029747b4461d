use tapegrad_core::ndarray::{arr0, ArrayD};
use tapegrad_core::{Graph, VariableId};

// Helper to create a graph holding one scalar leaf.
// Added allow(dead_code) because usage across different test crates isn't detected easily.
#[allow(dead_code)]
pub(crate) fn scalar_leaf(value: f64) -> (Graph, VariableId) {
    let mut graph = Graph::new();
    let x = graph.leaf(arr0(value));
    (graph, x)
}

/// Reads the single element of a zero-dimensional (or one-element) array.
#[allow(dead_code)]
pub(crate) fn scalar(array: &ArrayD<f64>) -> f64 {
    assert_eq!(array.len(), 1, "expected a single element, got shape {:?}", array.shape());
    array.sum()
}
