use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FacetBenchError {
    #[error("could not identify benchmark {record}: {reason}")]
    UnidentifiableRecord { record: String, reason: String },
    #[error("shape mismatch: expected length {expected}, found {actual:?}")]
    ShapeMismatch { expected: usize, actual: Vec<usize> },
    #[error("incorrect amount of {what} labels: have {actual}, need {expected}")]
    LabelCountMismatch {
        what: String,
        expected: usize,
        actual: usize,
    },
    #[error("require {expected} bars per group to compare performance, found {actual}")]
    ArityError { expected: usize, actual: usize },
    #[error("too little data: have {have} samples, need at least {needed}")]
    InsufficientData { have: usize, needed: usize },
    #[error("trend fit failed: {reason}")]
    FitFailure { reason: String },
    #[error("no benchmark matches {predicates}")]
    NotFound { predicates: String },
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("io error: {0}")]
    Io(String),
}

impl FacetBenchError {
    pub fn unidentifiable<R: Into<String>, T: Into<String>>(record: R, reason: T) -> Self {
        FacetBenchError::UnidentifiableRecord {
            record: record.into(),
            reason: reason.into(),
        }
    }

    pub fn shape_mismatch(expected: usize, actual: Vec<usize>) -> Self {
        FacetBenchError::ShapeMismatch { expected, actual }
    }

    pub fn label_count<T: Into<String>>(what: T, expected: usize, actual: usize) -> Self {
        FacetBenchError::LabelCountMismatch {
            what: what.into(),
            expected,
            actual,
        }
    }

    pub fn arity(expected: usize, actual: usize) -> Self {
        FacetBenchError::ArityError { expected, actual }
    }

    pub fn insufficient_data(have: usize, needed: usize) -> Self {
        FacetBenchError::InsufficientData { have, needed }
    }

    pub fn fit_failure<T: Into<String>>(reason: T) -> Self {
        FacetBenchError::FitFailure {
            reason: reason.into(),
        }
    }

    pub fn not_found<T: Into<String>>(predicates: T) -> Self {
        FacetBenchError::NotFound {
            predicates: predicates.into(),
        }
    }

    pub fn invalid_input<T: Into<String>>(msg: T) -> Self {
        FacetBenchError::InvalidInput(msg.into())
    }

    pub fn io<T: Into<String>>(msg: T) -> Self {
        FacetBenchError::Io(msg.into())
    }

    /// Malformed records or request shapes.
    pub fn is_data_integrity(&self) -> bool {
        matches!(
            self,
            FacetBenchError::UnidentifiableRecord { .. }
                | FacetBenchError::ShapeMismatch { .. }
                | FacetBenchError::LabelCountMismatch { .. }
                | FacetBenchError::ArityError { .. }
                | FacetBenchError::NotFound { .. }
        )
    }

    /// Preconditions of the statistics themselves (sample counts, curve fit).
    pub fn is_statistical(&self) -> bool {
        matches!(
            self,
            FacetBenchError::InsufficientData { .. } | FacetBenchError::FitFailure { .. }
        )
    }
}

impl From<std::io::Error> for FacetBenchError {
    fn from(err: std::io::Error) -> Self {
        FacetBenchError::io(err.to_string())
    }
}

impl From<serde_json::Error> for FacetBenchError {
    fn from(err: serde_json::Error) -> Self {
        FacetBenchError::invalid_input(err.to_string())
    }
}
