// src/ops/reduction/mod.rs
// Reductions to a scalar

pub mod sum;

pub use sum::{sum_op, Sum};
