//! Valence-space STO–GTO overlaps and NEXMD density matrices.

pub mod app;
pub mod config;
pub mod density;
pub mod error;
pub mod io;
pub mod molden;
pub mod nexmd;
pub mod valence;

mod molden_test;
mod nexmd_test;
