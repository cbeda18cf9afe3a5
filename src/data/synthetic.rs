//! Seeded synthetic regression datasets.
//!
//! Two tables are produced over `x = linspace(-10, 10, n)`:
//!
//! - multiple inputs: columns `[x, reverse(x), y]` with `y = 5·x + 2·reverse(x) + ε`
//! - single input: columns `[x, y]` with `y = x - 2 + ε`
//!
//! `ε ~ Normal(0, σ)`. Noise for the multiple-input table is drawn first, so the
//! same seed always reproduces both files.

use nalgebra::DMatrix;
use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::domain::GenerateConfig;
use crate::error::AppError;

/// File name of the single-feature dataset.
pub const SINGLE_INPUT_FILE: &str = "single_input.csv";
/// File name of the two-feature dataset.
pub const MULTIPLE_INPUTS_FILE: &str = "multiple_inputs.csv";

const X_MIN: f64 = -10.0;
const X_MAX: f64 = 10.0;

#[derive(Debug, Clone)]
pub struct SyntheticData {
    /// n × 2: `[x, y]`
    pub single: DMatrix<f64>,
    /// n × 3: `[x, reverse(x), y]`
    pub multiple: DMatrix<f64>,
}

pub fn generate_synthetic(config: &GenerateConfig) -> Result<SyntheticData, AppError> {
    if config.n_examples < 2 {
        return Err(AppError::new(2, "Number of examples must be >= 2."));
    }
    let noise_multi = Normal::new(0.0, config.sigma_multi)
        .map_err(|e| AppError::new(2, format!("Invalid --sigma-multi: {e}")))?;
    let noise_single = Normal::new(0.0, config.sigma_single)
        .map_err(|e| AppError::new(2, format!("Invalid --sigma-single: {e}")))?;

    let mut rng = StdRng::seed_from_u64(config.seed);
    let n = config.n_examples;
    let x = linspace(X_MIN, X_MAX, n);

    let mut multiple = DMatrix::zeros(n, 3);
    for i in 0..n {
        let x1 = x[i];
        let x2 = x[n - 1 - i];
        multiple[(i, 0)] = x1;
        multiple[(i, 1)] = x2;
        multiple[(i, 2)] = 5.0 * x1 + 2.0 * x2 + noise_multi.sample(&mut rng);
    }

    let mut single = DMatrix::zeros(n, 2);
    for (i, &xi) in x.iter().enumerate() {
        single[(i, 0)] = xi;
        single[(i, 1)] = xi - 2.0 + noise_single.sample(&mut rng);
    }

    Ok(SyntheticData { single, multiple })
}

/// `n` evenly spaced points from `start` to `end` inclusive (`n >= 2`).
fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    let step = (end - start) / (n as f64 - 1.0);
    (0..n)
        .map(|i| if i == n - 1 { end } else { start + step * i as f64 })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RidgeRegression;

    fn config(seed: u64) -> GenerateConfig {
        GenerateConfig {
            out_dir: ".".into(),
            n_examples: 200,
            seed,
            sigma_single: 1.0,
            sigma_multi: 0.1,
        }
    }

    #[test]
    fn linspace_endpoints() {
        let v = linspace(-10.0, 10.0, 5);
        assert_eq!(v, vec![-10.0, -5.0, 0.0, 5.0, 10.0]);
    }

    #[test]
    fn same_seed_same_data() {
        let a = generate_synthetic(&config(7)).unwrap();
        let b = generate_synthetic(&config(7)).unwrap();
        let c = generate_synthetic(&config(8)).unwrap();
        assert_eq!(a.single, b.single);
        assert_eq!(a.multiple, b.multiple);
        assert_ne!(a.single, c.single);
    }

    #[test]
    fn single_input_recovers_generating_line() {
        let data = generate_synthetic(&config(0)).unwrap();
        let x = data.single.columns(0, 1).into_owned();
        let y = data.single.column(1).into_owned();

        let mut model = RidgeRegression::ols();
        model.fit(&x, &y, true).unwrap();
        let w = model.weights().unwrap();
        assert!((w[0] - 1.0).abs() < 0.05, "slope {}", w[0]);
        assert!((w[1] + 2.0).abs() < 0.3, "offset {}", w[1]);
    }

    #[test]
    fn multiple_inputs_identify_slope_difference() {
        // reverse(x) = -x on a symmetric grid, so the two features are collinear.
        let data = generate_synthetic(&config(0)).unwrap();
        let x = data.multiple.columns(0, 2).into_owned();
        let y = data.multiple.column(2).into_owned();

        let mut ridge = RidgeRegression::new(1e-3);
        ridge.fit(&x, &y, true).unwrap();
        let w = ridge.weights().unwrap();
        // Only the difference of the slopes is identified: 5 - 2 = 3.
        assert!(((w[0] - w[1]) - 3.0).abs() < 0.01, "weights {w}");
    }

    #[test]
    fn rejects_bad_settings() {
        let mut cfg = config(0);
        cfg.n_examples = 1;
        assert!(generate_synthetic(&cfg).is_err());

        let mut cfg = config(0);
        cfg.sigma_single = -1.0;
        assert!(generate_synthetic(&cfg).is_err());
    }
}
