//! Glue between the engine and its numeric backend.
//!
//! Every payload stored in the graph is an `ndarray::ArrayD<f64>`. Forward rules may
//! still produce a bare `f64` (e.g. a full reduction); [`as_array`] promotes those to
//! zero-dimensional arrays so gradient shapes stay consistent downstream.

use ndarray::{arr0, Array, ArrayD, Dimension};

/// A raw numeric value before it is stored in a value node.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// The canonical representation.
    Array(ArrayD<f64>),
    /// A bare scalar, which must be coerced before storage.
    Scalar(f64),
}

impl Payload {
    /// Returns true for a bare scalar.
    pub fn is_scalar(&self) -> bool {
        matches!(self, Payload::Scalar(_))
    }

    /// Name of the concrete type held, used in type-contract errors.
    pub fn type_name(&self) -> &'static str {
        match self {
            Payload::Array(_) => std::any::type_name::<ArrayD<f64>>(),
            Payload::Scalar(_) => std::any::type_name::<f64>(),
        }
    }
}

impl<D: Dimension> From<Array<f64, D>> for Payload {
    fn from(array: Array<f64, D>) -> Self {
        Payload::Array(array.into_dyn())
    }
}

impl From<f64> for Payload {
    fn from(value: f64) -> Self {
        Payload::Scalar(value)
    }
}

/// Coerces a payload to the canonical array representation.
///
/// Scalars become zero-dimensional arrays; arrays are returned untouched.
pub fn as_array(payload: Payload) -> ArrayD<f64> {
    match payload {
        Payload::Array(array) => array,
        Payload::Scalar(value) => arr0(value).into_dyn(),
    }
}

/// An array of ones with the same shape as `array`.
pub fn ones_like(array: &ArrayD<f64>) -> ArrayD<f64> {
    ArrayD::ones(array.raw_dim())
}

/// An array of zeros with the same shape as `array`.
pub fn zeros_like(array: &ArrayD<f64>) -> ArrayD<f64> {
    ArrayD::zeros(array.raw_dim())
}

/// `|a - b| <= atol + rtol * |b|`. Never true when either side is NaN.
pub fn is_close(a: f64, b: f64, rtol: f64, atol: f64) -> bool {
    (a - b).abs() <= atol + rtol * b.abs()
}

/// [`is_close`] for every element pair, false when shapes differ.
pub fn allclose(a: &ArrayD<f64>, b: &ArrayD<f64>, rtol: f64, atol: f64) -> bool {
    if a.shape() != b.shape() {
        return false;
    }
    a.iter()
        .zip(b.iter())
        .all(|(&x, &y)| is_close(x, y, rtol, atol))
}
