#![allow(non_snake_case)]
use nalgebra::Vector3;

/// A real basis function that can be evaluated in space and overlapped with
/// another function of the same kind.
pub trait Basis {
    fn evaluate(&self, r: &Vector3<f64>) -> f64;
    fn Sab(a: &Self, b: &Self) -> f64;
}
