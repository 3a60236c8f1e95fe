//! Lattice basis reduction methods

pub mod gauss;

pub use gauss::{gauss_reduce, GaussIteration, GaussReduction, GaussTrace};
