//! Derivative-free optimization for model fitting.

use std::cmp::Ordering;

/// Result of Nelder-Mead optimization.
#[derive(Debug, Clone)]
pub struct NelderMeadResult {
    /// The best point found.
    pub optimal_point: Vec<f64>,
    /// The objective function value at the best point.
    pub optimal_value: f64,
    /// Number of iterations performed.
    pub iterations: usize,
    /// Whether a convergence criterion was met before `max_iter`.
    pub converged: bool,
}

/// Configuration for Nelder-Mead optimization.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NelderMeadConfig {
    /// Maximum number of iterations.
    pub max_iter: usize,
    /// Convergence tolerance on both the objective spread and simplex size.
    pub tolerance: f64,
    /// Reflection coefficient (default: 1.0).
    pub alpha: f64,
    /// Expansion coefficient (default: 2.0).
    pub gamma: f64,
    /// Contraction coefficient (default: 0.5).
    pub rho: f64,
    /// Shrinkage coefficient (default: 0.5).
    pub sigma: f64,
    /// Initial simplex step, relative to each coordinate (default: 0.05).
    pub initial_step: f64,
}

impl Default for NelderMeadConfig {
    fn default() -> Self {
        Self {
            max_iter: 5000,
            tolerance: 1e-10,
            alpha: 1.0,
            gamma: 2.0,
            rho: 0.5,
            sigma: 0.5,
            initial_step: 0.05,
        }
    }
}

impl NelderMeadConfig {
    /// Set the iteration cap.
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Set the convergence tolerance.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance.abs();
        self
    }
}

/// Minimize `objective` with the Nelder-Mead simplex method.
///
/// Non-finite objective values are treated as `+inf`, so the simplex moves
/// away from regions where the model is undefined. With `bounds`, every
/// trial point is clamped coordinate-wise into `(min, max)`.
///
/// # Example
/// ```
/// use gprot::utils::optimization::{nelder_mead, NelderMeadConfig};
///
/// // Minimize (x-2)^2 + (y-3)^2
/// let result = nelder_mead(
///     |x| (x[0] - 2.0).powi(2) + (x[1] - 3.0).powi(2),
///     &[0.0, 0.0],
///     None,
///     &NelderMeadConfig::default(),
/// );
///
/// assert!(result.converged);
/// assert!((result.optimal_point[0] - 2.0).abs() < 0.01);
/// assert!((result.optimal_point[1] - 3.0).abs() < 0.01);
/// ```
pub fn nelder_mead<F>(
    objective: F,
    initial: &[f64],
    bounds: Option<&[(f64, f64)]>,
    config: &NelderMeadConfig,
) -> NelderMeadResult
where
    F: Fn(&[f64]) -> f64,
{
    let n = initial.len();
    if n == 0 {
        return NelderMeadResult {
            optimal_point: vec![],
            optimal_value: f64::NAN,
            iterations: 0,
            converged: false,
        };
    }

    let eval = |point: &[f64]| {
        let value = objective(point);
        if value.is_finite() {
            value
        } else {
            f64::INFINITY
        }
    };

    let mut simplex = initial_simplex(initial, bounds, config.initial_step);
    let mut values: Vec<f64> = simplex.iter().map(|v| eval(v)).collect();

    let mut iterations = 0;
    let mut converged = false;

    while iterations < config.max_iter {
        iterations += 1;
        order_simplex(&mut simplex, &mut values);

        let best = values[0];
        let worst = values[n];
        let second_worst = values[n - 1];

        let centroid = centroid_without_last(&simplex);
        let spread = simplex
            .iter()
            .map(|v| euclidean_distance(v, &centroid))
            .fold(0.0, f64::max);
        if (worst - best).abs() < config.tolerance || spread < config.tolerance {
            converged = true;
            break;
        }

        let reflected = clamp(&blend(&centroid, &simplex[n], -config.alpha), bounds);
        let reflected_value = eval(&reflected);

        if reflected_value < best {
            let expanded = clamp(&blend(&centroid, &reflected, config.gamma), bounds);
            let expanded_value = eval(&expanded);
            if expanded_value < reflected_value {
                simplex[n] = expanded;
                values[n] = expanded_value;
            } else {
                simplex[n] = reflected;
                values[n] = reflected_value;
            }
            continue;
        }

        if reflected_value < second_worst {
            simplex[n] = reflected;
            values[n] = reflected_value;
            continue;
        }

        // Outside contraction toward the reflected point, inside otherwise.
        let (target, target_value) = if reflected_value < worst {
            (&reflected, reflected_value)
        } else {
            (&simplex[n], worst)
        };
        let contracted = clamp(&blend(&centroid, target, config.rho), bounds);
        let contracted_value = eval(&contracted);
        if contracted_value < target_value {
            simplex[n] = contracted;
            values[n] = contracted_value;
            continue;
        }

        // Shrink toward the best vertex.
        let anchor = simplex[0].clone();
        for i in 1..=n {
            let shrunk = blend(&anchor, &simplex[i], config.sigma);
            simplex[i] = clamp(&shrunk, bounds);
            values[i] = eval(&simplex[i]);
        }
    }

    order_simplex(&mut simplex, &mut values);

    NelderMeadResult {
        optimal_point: simplex.swap_remove(0),
        optimal_value: values[0],
        iterations,
        converged,
    }
}

/// Initial vertex plus one vertex stepped along each coordinate.
fn initial_simplex(
    initial: &[f64],
    bounds: Option<&[(f64, f64)]>,
    initial_step: f64,
) -> Vec<Vec<f64>> {
    let mut simplex = Vec::with_capacity(initial.len() + 1);
    simplex.push(clamp(initial, bounds));

    for (i, &x) in initial.iter().enumerate() {
        let mut vertex = initial.to_vec();
        vertex[i] += if x.abs() > 1e-10 {
            initial_step * x.abs()
        } else {
            initial_step
        };
        simplex.push(clamp(&vertex, bounds));
    }
    simplex
}

/// Sort vertices by ascending objective value.
fn order_simplex(simplex: &mut Vec<Vec<f64>>, values: &mut Vec<f64>) {
    let mut pairs: Vec<(Vec<f64>, f64)> = simplex.drain(..).zip(values.drain(..)).collect();
    pairs.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal));
    for (vertex, value) in pairs {
        simplex.push(vertex);
        values.push(value);
    }
}

/// Centroid of all vertices except the last (worst) one.
fn centroid_without_last(simplex: &[Vec<f64>]) -> Vec<f64> {
    let kept = &simplex[..simplex.len() - 1];
    let mut centroid = vec![0.0; simplex[0].len()];
    for vertex in kept {
        for (c, v) in centroid.iter_mut().zip(vertex.iter()) {
            *c += v;
        }
    }
    for c in &mut centroid {
        *c /= kept.len() as f64;
    }
    centroid
}

/// `origin + t * (point - origin)`.
///
/// Reflection uses `t = -alpha` through the centroid, expansion `t = gamma`,
/// contraction `t = rho`, shrink `t = sigma`.
fn blend(origin: &[f64], point: &[f64], t: f64) -> Vec<f64> {
    origin
        .iter()
        .zip(point.iter())
        .map(|(o, p)| o + t * (p - o))
        .collect()
}

/// Clamp a point into optional per-coordinate bounds.
fn clamp(point: &[f64], bounds: Option<&[(f64, f64)]>) -> Vec<f64> {
    match bounds {
        None => point.to_vec(),
        Some(b) => point
            .iter()
            .enumerate()
            .map(|(i, &x)| match b.get(i) {
                Some(&(lo, hi)) => x.clamp(lo, hi),
                None => x,
            })
            .collect(),
    }
}

fn euclidean_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f64>()
        .sqrt()
}
