use thiserror::Error;

/// Every failure a network operation can report.
///
/// All of these are caller errors: nothing is retried, and a failing call
/// leaves parameters exactly as they were before it started.
#[derive(Debug, Error)]
pub enum NetworkError {
    /// Bad topology, learning rate, activation list or init range.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// A vector length disagrees with the layer width it feeds.
    #[error("shape mismatch in {context}: expected length {expected}, got {actual}")]
    ShapeMismatch {
        context: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("training set is empty")]
    EmptyDataset,

    #[error("inputs ({inputs}) and targets ({targets}) have different sample counts")]
    SampleCountMismatch { inputs: usize, targets: usize },

    /// `predict_label` thresholds a single probability only.
    #[error("predict_label needs exactly one output neuron, network has {0}")]
    UnsupportedOutputWidth(usize),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, NetworkError>;

/// Fails with `ShapeMismatch` unless `actual == expected`.
pub(crate) fn check_len(context: &'static str, expected: usize, actual: usize) -> Result<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(NetworkError::ShapeMismatch { context, expected, actual })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_len_reports_both_lengths() {
        assert!(check_len("forward input", 3, 3).is_ok());
        match check_len("forward input", 3, 2) {
            Err(NetworkError::ShapeMismatch { context, expected, actual }) => {
                assert_eq!(context, "forward input");
                assert_eq!(expected, 3);
                assert_eq!(actual, 2);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn messages_are_readable() {
        let err = NetworkError::SampleCountMismatch { inputs: 4, targets: 3 };
        assert_eq!(err.to_string(), "inputs (4) and targets (3) have different sample counts");
    }
}
