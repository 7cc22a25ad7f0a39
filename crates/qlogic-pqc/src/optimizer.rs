//! Adam optimizer over parameter tensors.

use ndarray::{Array, Dimension, Zip};

/// Adam hyperparameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdamConfig {
    /// Step size.
    pub learning_rate: f64,
    /// Exponential decay rate for the first moment.
    pub beta1: f64,
    /// Exponential decay rate for the second moment.
    pub beta2: f64,
    /// Small constant for numerical stability.
    pub epsilon: f64,
}

impl AdamConfig {
    /// Defaults with the given step size.
    pub fn with_learning_rate(learning_rate: f64) -> Self {
        Self {
            learning_rate,
            ..Self::default()
        }
    }
}

impl Default for AdamConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.01,
            beta1: 0.9,
            beta2: 0.99,
            epsilon: 1e-8,
        }
    }
}

/// Adaptive Moment Estimation.
///
/// Moment estimates are allocated on the first step and shaped like the
/// parameters. Each step uses the bias-corrected step size
/// `lr * sqrt(1 - β2^t) / (1 - β1^t)`.
#[derive(Debug, Clone)]
pub struct Adam<D: Dimension> {
    config: AdamConfig,
    // First moment estimate
    m: Option<Array<f64, D>>,
    // Second moment estimate
    v: Option<Array<f64, D>>,
    // Time step
    t: i32,
}

impl<D: Dimension> Adam<D> {
    /// Create an optimizer with fresh moment estimates.
    pub fn new(config: AdamConfig) -> Self {
        Self {
            config,
            m: None,
            v: None,
            t: 0,
        }
    }

    /// Hyperparameters.
    pub fn config(&self) -> &AdamConfig {
        &self.config
    }

    /// Number of steps taken.
    pub fn steps(&self) -> usize {
        self.t as usize
    }

    /// Move `params` one step against `grad`.
    ///
    /// Moment estimates are reset if the gradient shape changes.
    pub fn step(&mut self, params: &mut Array<f64, D>, grad: &Array<f64, D>) {
        let AdamConfig {
            learning_rate,
            beta1,
            beta2,
            epsilon,
        } = self.config;

        let stale = self.m.as_ref().is_some_and(|m| m.shape() != grad.shape());
        if stale {
            self.m = None;
            self.v = None;
            self.t = 0;
        }
        let m = self.m.get_or_insert_with(|| Array::zeros(grad.raw_dim()));
        let v = self.v.get_or_insert_with(|| Array::zeros(grad.raw_dim()));
        self.t += 1;

        Zip::from(&mut *m).and(&mut *v).and(grad).for_each(|m, v, &g| {
            *m = beta1 * *m + (1.0 - beta1) * g;
            *v = beta2 * *v + (1.0 - beta2) * g * g;
        });

        let step_size =
            learning_rate * (1.0 - beta2.powi(self.t)).sqrt() / (1.0 - beta1.powi(self.t));
        Zip::from(params).and(&*m).and(&*v).for_each(|p, &m, &v| {
            *p -= step_size * m / (v.sqrt() + epsilon);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::{Array1, array};

    #[test]
    fn test_first_step_moves_by_learning_rate() {
        // After bias correction the first step is lr * sign(g).
        let mut adam = Adam::new(AdamConfig::with_learning_rate(0.1));
        let mut p = array![1.0, -1.0, 0.0];
        adam.step(&mut p, &array![2.0, -0.5, 0.0]);
        assert_abs_diff_eq!(p[0], 0.9, epsilon = 1e-6);
        assert_abs_diff_eq!(p[1], -0.9, epsilon = 1e-6);
        assert_eq!(p[2], 0.0);
        assert_eq!(adam.steps(), 1);
    }

    #[test]
    fn test_minimizes_quadratic() {
        let mut adam = Adam::new(AdamConfig::with_learning_rate(0.02));
        let mut p: Array1<f64> = array![3.0, -2.0];
        for _ in 0..1000 {
            let grad = p.mapv(|x| 2.0 * x);
            adam.step(&mut p, &grad);
        }
        assert!(p.iter().all(|x| x.abs() < 0.1), "{p}");
    }

    #[test]
    fn test_shape_change_resets_moments() {
        let mut adam = Adam::new(AdamConfig::default());
        let mut a = array![[1.0, 2.0]];
        adam.step(&mut a, &array![[1.0, 1.0]]);
        let mut b = array![[1.0], [2.0], [3.0]];
        adam.step(&mut b, &array![[1.0], [1.0], [1.0]]);
        assert_eq!(adam.steps(), 1);
    }
}
