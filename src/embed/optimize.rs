//! Nonlinear conjugate-gradient minimisation.

/// A differentiable scalar function of a flat coordinate vector.
pub trait Objective {
    fn dimension(&self) -> usize;

    /// Returns the value at `x` and overwrites `grad` with the gradient.
    fn evaluate(&self, x: &[f64], grad: &mut [f64]) -> f64;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MinimizerOptions {
    pub max_iterations: usize,
    /// Converged once the gradient RMS falls below this.
    pub gradient_tolerance: f64,
    /// Converged once the relative energy change falls below this.
    pub energy_tolerance: f64,
    /// Longest displacement of a single coordinate in one step.
    pub max_step: f64,
}

impl Default for MinimizerOptions {
    fn default() -> Self {
        Self {
            max_iterations: 200,
            gradient_tolerance: 1e-4,
            energy_tolerance: 1e-8,
            max_step: 0.3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Minimization {
    pub value: f64,
    pub iterations: usize,
    pub converged: bool,
}

const ARMIJO: f64 = 1e-4;
const BACKTRACK: f64 = 0.5;
const MAX_LINE_STEPS: usize = 30;

/// Minimises `objective` in place starting from `x`.
///
/// Uses Polak–Ribière+ directions with a backtracking Armijo line search.
/// The search restarts along steepest descent whenever the conjugate
/// direction stops descending.
pub fn minimize<O: Objective + ?Sized>(
    objective: &O,
    x: &mut [f64],
    options: &MinimizerOptions,
) -> Minimization {
    let n = objective.dimension();
    debug_assert_eq!(x.len(), n);

    let mut grad = vec![0.0; n];
    let mut value = objective.evaluate(x, &mut grad);
    if n == 0 || !value.is_finite() {
        return Minimization {
            value,
            iterations: 0,
            converged: n == 0,
        };
    }

    let mut direction: Vec<f64> = grad.iter().map(|g| -g).collect();
    let mut trial = vec![0.0; n];
    let mut trial_grad = vec![0.0; n];

    for iteration in 0..options.max_iterations {
        if rms(&grad) < options.gradient_tolerance {
            return Minimization {
                value,
                iterations: iteration,
                converged: true,
            };
        }

        let mut slope = dot(&grad, &direction);
        if slope >= 0.0 {
            direction.iter_mut().zip(&grad).for_each(|(d, g)| *d = -g);
            slope = dot(&grad, &direction);
        }

        let largest = direction.iter().fold(0.0f64, |m, d| m.max(d.abs()));
        let mut step = if largest > options.max_step {
            options.max_step / largest
        } else {
            1.0
        };

        let mut accepted = None;
        for _ in 0..MAX_LINE_STEPS {
            for ((t, xi), d) in trial.iter_mut().zip(x.iter()).zip(&direction) {
                *t = xi + step * d;
            }
            let trial_value = objective.evaluate(&trial, &mut trial_grad);
            if trial_value.is_finite() && trial_value <= value + ARMIJO * step * slope {
                accepted = Some(trial_value);
                break;
            }
            step *= BACKTRACK;
        }

        let Some(new_value) = accepted else {
            // No downhill step along this direction; a steepest-descent
            // direction that also fails means we are at a minimum.
            let steepest = direction
                .iter()
                .zip(&grad)
                .all(|(d, g)| (d + g).abs() <= f64::EPSILON * (1.0 + g.abs()));
            if steepest {
                return Minimization {
                    value,
                    iterations: iteration,
                    converged: false,
                };
            }
            direction.iter_mut().zip(&grad).for_each(|(d, g)| *d = -g);
            continue;
        };

        x.copy_from_slice(&trial);
        let change = (value - new_value).abs();
        let scale = value.abs().max(new_value.abs()).max(1.0);
        value = new_value;

        let g_old_sq = dot(&grad, &grad);
        let beta = if g_old_sq > 0.0 {
            let num: f64 = trial_grad
                .iter()
                .zip(&grad)
                .map(|(gn, go)| gn * (gn - go))
                .sum();
            (num / g_old_sq).max(0.0)
        } else {
            0.0
        };
        grad.copy_from_slice(&trial_grad);
        for (d, g) in direction.iter_mut().zip(&grad) {
            *d = -g + beta * *d;
        }

        if change / scale < options.energy_tolerance {
            return Minimization {
                value,
                iterations: iteration + 1,
                converged: true,
            };
        }
    }

    Minimization {
        value,
        iterations: options.max_iterations,
        converged: rms(&grad) < options.gradient_tolerance,
    }
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

fn rms(v: &[f64]) -> f64 {
    if v.is_empty() {
        0.0
    } else {
        (dot(v, v) / v.len() as f64).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Rosenbrock;

    impl Objective for Rosenbrock {
        fn dimension(&self) -> usize {
            2
        }

        fn evaluate(&self, x: &[f64], grad: &mut [f64]) -> f64 {
            let (a, b) = (x[0], x[1]);
            grad[0] = -2.0 * (1.0 - a) - 400.0 * a * (b - a * a);
            grad[1] = 200.0 * (b - a * a);
            (1.0 - a).powi(2) + 100.0 * (b - a * a).powi(2)
        }
    }

    struct Bowl;

    impl Objective for Bowl {
        fn dimension(&self) -> usize {
            3
        }

        fn evaluate(&self, x: &[f64], grad: &mut [f64]) -> f64 {
            let weights = [1.0, 4.0, 9.0];
            let mut value = 0.0;
            for m in 0..3 {
                let d = x[m] - m as f64;
                grad[m] = 2.0 * weights[m] * d;
                value += weights[m] * d * d;
            }
            value
        }
    }

    #[test]
    fn minimizes_quadratic_bowl() {
        let mut x = vec![5.0, -3.0, 0.5];
        let options = MinimizerOptions {
            energy_tolerance: 1e-14,
            ..MinimizerOptions::default()
        };
        let result = minimize(&Bowl, &mut x, &options);
        assert!(result.value < 1e-6, "value {}", result.value);
        for (m, xi) in x.iter().enumerate() {
            assert!((xi - m as f64).abs() < 1e-2);
        }
    }

    #[test]
    fn makes_progress_on_rosenbrock() {
        let mut x = vec![-1.2, 1.0];
        let options = MinimizerOptions {
            max_iterations: 2000,
            energy_tolerance: 1e-14,
            ..MinimizerOptions::default()
        };
        let result = minimize(&Rosenbrock, &mut x, &options);
        assert!(result.value < 5e-2, "value {}", result.value);
    }

    #[test]
    fn never_increases_the_value() {
        let mut x = vec![2.0, 2.0, 2.0];
        let mut grad = vec![0.0; 3];
        let start = Bowl.evaluate(&x, &mut grad);
        let options = MinimizerOptions {
            max_iterations: 1,
            ..MinimizerOptions::default()
        };
        let result = minimize(&Bowl, &mut x, &options);
        assert!(result.value <= start);
    }
}
