//! Gradient descent over objectives defined outside the crate.

use stratum_gd::{DescentConfig, Objective, ShiftedQuadratic};

/// `f(x) = x⁴ / 4 - x`, minimized at `x = 1`.
struct Quartic;

impl Objective for Quartic {
    fn dim(&self) -> usize {
        1
    }

    fn value(&self, point: &[f64]) -> f64 {
        point[0].powi(4) / 4.0 - point[0]
    }

    fn gradient(&self, point: &[f64]) -> Vec<f64> {
        vec![point[0].powi(3) - 1.0]
    }
}

#[test]
fn user_objective_converges() {
    let result = DescentConfig::new()
        .with_epochs(1000)
        .with_tol(1e-8)
        .minimize(&Quartic, &[0.5])
        .unwrap();
    assert!(result.converged);
    assert!((result.point[0] - 1.0).abs() < 1e-6);
}

#[test]
fn objectives_work_as_trait_objects() {
    let objectives: Vec<Box<dyn Objective>> = vec![
        Box::new(ShiftedQuadratic::default()),
        Box::new(ShiftedQuadratic::new(vec![1.0, 1.0, 1.0], vec![-2.0, 0.0, 2.0]).unwrap()),
    ];
    let config = DescentConfig::new();
    for objective in &objectives {
        let start = vec![0.0; objective.dim()];
        let result = config.minimize(objective.as_ref(), &start).unwrap();
        assert!(result.converged);
        assert!(result.value < 1e-10);
    }
}

#[test]
fn history_serializes_to_json() {
    let result = DescentConfig::new()
        .with_epochs(3)
        .minimize(&ShiftedQuadratic::default(), &[0.0, 0.0])
        .unwrap();
    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["history"].as_array().unwrap().len(), 3);
    assert_eq!(json["converged"], serde_json::Value::Bool(false));
}
