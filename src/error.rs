use thiserror::Error;

/// Input rejected before any computation started.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidInput {
    #[error("dataset contains no observations")]
    EmptyDataset,
    #[error("observations must have at least one coordinate")]
    ZeroDimensions,
    #[error("observation {index} has {found} coordinates, expected {expected}")]
    DimensionMismatch { index: usize, expected: usize, found: usize },
    #[error("sample buffer holds {found} values, expected {expected}")]
    BufferLength { expected: usize, found: usize },
    #[error("{sample_cnt} samples x {sample_dims} dimensions exceed the addressable buffer size")]
    BufferOverflow { sample_cnt: usize, sample_dims: usize },
    #[error("nclusters cannot be 0")]
    NClusters,
    #[error("max_iter cannot be 0")]
    MaxIterations,
}

/// An error when running a clustering calculation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClusterError {
    /// When the dataset or one of the parameters is unusable
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] InvalidInput),
    /// When a custom initializer resized the assignment
    #[error("Initialization produced {found} assignments for {expected} observations")]
    InitializationLength { expected: usize, found: usize },
    /// When a custom initializer used a label outside of `0..k`
    #[error("Initialization assigned label {label} to observation {index}, but k is {k}")]
    InitializationLabel { index: usize, label: usize, k: usize },
}

pub type Result<T> = std::result::Result<T, ClusterError>;
