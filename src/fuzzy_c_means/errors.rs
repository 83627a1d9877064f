use thiserror::Error;

pub type Result<T> = std::result::Result<T, FcmError>;

/// An error when fitting with an invalid hyperparameter
#[derive(Error, Debug)]
pub enum FcmParamsError {
    #[error("n_clusters cannot be 0")]
    NClusters,
    #[error("fuzziness must be greater than 1")]
    Fuzziness,
    #[error("tolerance must be greater than 0")]
    Tolerance,
    #[error("max_n_iterations cannot be 0")]
    MaxIterations,
}

/// An error when fitting the fuzzy c-means algorithm
#[derive(Error, Debug)]
pub enum FcmError {
    /// When any of the hyperparameters are set the wrong value
    #[error("Invalid hyperparameter: {0}")]
    InvalidParams(#[from] FcmParamsError),
    /// When the dataset contains no observations
    #[error("Fitting failed: the dataset contains no observations")]
    EmptyDataset,
    /// When more clusters are requested than there are observations to seed
    /// them from
    #[error("Fitting failed: {n_clusters} clusters requested from {n_samples} observations")]
    TooManyClusters {
        n_clusters: usize,
        n_samples: usize,
    },
    /// When precomputed initial centers disagree with the dataset shape
    #[error("Fitting failed: initial centers have shape {actual:?}, expected {expected:?}")]
    InvalidCentroids {
        expected: (usize, usize),
        actual: (usize, usize),
    },
    /// When a cluster loses all membership mass and its center update would
    /// divide by zero
    #[error("Fitting failed: cluster {0} has no remaining membership mass")]
    EmptyCluster(usize),
    #[error(transparent)]
    MinMaxError(#[from] ndarray_stats::errors::MinMaxError),
    #[error(transparent)]
    LinfaError(#[from] linfa::error::Error),
}
