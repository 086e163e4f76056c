use crate::error::BasisError;
use nalgebra::{DMatrix, SymmetricEigen};

pub fn factorial(n: i32) -> f64 {
    (1..=n).fold(1.0, |acc, x| acc * x as f64)
}

// Simpson's rule integration
pub fn simpson_integration<F>(f: F, a: f64, b: f64, n: usize) -> f64
where
    F: Fn(f64) -> f64,
{
    let n = if n % 2 == 0 { n } else { n + 1 };
    let h = (b - a) / n as f64;

    let mut sum = f(a) + f(b);
    for i in 1..n {
        let x = a + i as f64 * h;
        sum += if i % 2 == 0 { 2.0 * f(x) } else { 4.0 * f(x) };
    }
    sum * h / 3.0
}

/// Physicists' Hermite polynomial H_n(x).
pub fn hermite_phys(n: i32, x: f64) -> f64 {
    if n <= 0 {
        return 1.0;
    }
    let mut hm2 = 1.0;
    let mut hm1 = 2.0 * x;
    for k in 1..n {
        let h = 2.0 * x * hm1 - 2.0 * k as f64 * hm2;
        hm2 = hm1;
        hm1 = h;
    }
    hm1
}

/// Laguerre polynomials (L_{n-1}(t), L_n(t)) from the three-term recurrence
/// (k+1) L_{k+1} = (2k+1-t) L_k - k L_{k-1}.
fn laguerre_pair(n: usize, t: f64) -> (f64, f64) {
    if n == 0 {
        return (0.0, 1.0);
    }
    let mut prev = 1.0;
    let mut curr = 1.0 - t;
    for k in 1..n {
        let next = ((2 * k + 1) as f64 - t) * curr - k as f64 * prev;
        prev = curr;
        curr = next / (k + 1) as f64;
    }
    (prev, curr)
}

// t L_n'(t) = n (L_n(t) - L_{n-1}(t))
fn newton_refine(n: usize, mut t: f64) -> f64 {
    for _ in 0..4 {
        let (prev, curr) = laguerre_pair(n, t);
        let derivative = n as f64 * (curr - prev) / t;
        if derivative == 0.0 || !derivative.is_finite() {
            break;
        }
        let step = curr / derivative;
        if !step.is_finite() {
            break;
        }
        t -= step;
        if step.abs() <= 1e-15 * t.abs() {
            break;
        }
    }
    t
}

/// Gauss-Laguerre rule for ∫_0^∞ e^{-t} f(t) dt.
///
/// Nodes start from the eigenvalues of the symmetric Jacobi matrix of the
/// Laguerre recurrence (diagonal 2k+1, off-diagonal k+1) and are polished by
/// Newton steps on L_n. Weights use the Christoffel formula
/// w_i = t_i / ((n+1) L_{n+1}(t_i))². Nodes ascend.
#[derive(Debug, Clone)]
pub struct LaguerreRule {
    pub nodes: Vec<f64>,
    pub weights: Vec<f64>,
}

impl LaguerreRule {
    pub fn new(n: usize) -> Result<Self, BasisError> {
        if n == 0 {
            return Err(BasisError::InvalidQuadrature(n));
        }

        let jacobi = DMatrix::from_fn(n, n, |i, j| {
            if i == j {
                (2 * i + 1) as f64
            } else if i + 1 == j || j + 1 == i {
                i.max(j) as f64
            } else {
                0.0
            }
        });
        let mut nodes: Vec<f64> = SymmetricEigen::new(jacobi)
            .eigenvalues
            .iter()
            .map(|&t| newton_refine(n, t))
            .collect();
        nodes.sort_by(|a, b| a.total_cmp(b));

        let weights = nodes
            .iter()
            .map(|&t| {
                let (_, next) = laguerre_pair(n + 1, t);
                t / ((n + 1) as f64 * next).powi(2)
            })
            .collect();

        Ok(Self { nodes, weights })
    }

    pub fn order(&self) -> usize {
        self.nodes.len()
    }

    pub fn integrate<F>(&self, f: F) -> f64
    where
        F: Fn(f64) -> f64,
    {
        self.nodes
            .iter()
            .zip(self.weights.iter())
            .map(|(&t, &w)| w * f(t))
            .sum()
    }
}
