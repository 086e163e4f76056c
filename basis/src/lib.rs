//! Slater and gaussian basis functions and their mutual overlap integrals.

pub mod basis;
pub mod cgto;
pub mod error;
pub mod gto;
pub mod helper;
pub mod overlap;
pub mod sto;

mod sto_test;

pub use error::BasisError;
