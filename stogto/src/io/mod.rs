//! Input/Output helpers: logging setup and plain-text matrix files.

mod matrix;
mod output;

pub use matrix::{format_matrix, load_matrix, save_matrix, write_labelled_matrix};
pub use output::setup_output;

/// Parse a floating point token, accepting Fortran `D` exponents
/// (`0.1307093214D+03`).
pub fn parse_float(token: &str) -> Option<f64> {
    let is_fortran = |c: char| c == 'D' || c == 'd';
    if token.contains(is_fortran) {
        token.replace(is_fortran, "E").parse().ok()
    } else {
        token.parse().ok()
    }
}
