/// Squared-error loss, halved so its gradient is the plain residual.
///
/// Paired with a sigmoid output this is not the textbook likelihood for a
/// probability; cross-entropy would converge differently.
pub struct MseLoss;

impl MseLoss {
    /// Scalar loss for one sample: 0.5 · Σ (predicted - expected)²
    pub fn loss(predicted: &[f64], expected: &[f64]) -> f64 {
        0.5 * predicted.iter().zip(expected.iter())
            .map(|(a, b)| (a - b).powi(2))
            .sum::<f64>()
    }

    /// Per-output gradient: predicted - expected
    pub fn derivative(predicted: &[f64], expected: &[f64]) -> Vec<f64> {
        predicted.iter().zip(expected.iter())
            .map(|(a, b)| a - b)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loss_is_half_the_squared_distance() {
        assert_eq!(MseLoss::loss(&[1.0, 0.0], &[0.0, 2.0]), 2.5);
        assert_eq!(MseLoss::loss(&[0.3], &[0.3]), 0.0);
    }

    #[test]
    fn derivative_is_the_residual() {
        assert_eq!(MseLoss::derivative(&[0.75, 0.0], &[1.0, 0.5]), vec![-0.25, -0.5]);
    }
}
