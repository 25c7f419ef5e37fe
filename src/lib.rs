//! # clusterer - API documentation
//!
//! Clusterer is a small rust library, partitioning a set of numeric vectors (observations) into a fixed
//! amount of groups, using Lloyd's k-means relocation algorithm.
//!
//! ## Algorithm
//! 1. Every observation is randomly assigned to one of the `k` clusters. The labels are drawn from
//!    shuffled copies of the label range, so all clusters start roughly balanced (see [`Clusterer::init_random_partition`]).
//! 2. Up to `max_iter` times:
//!    - the centroid (coordinate-wise mean) of each non-empty cluster is calculated
//!    - every observation is reassigned to the cluster with the nearest centroid (squared euclidean distance,
//!      ties go to the lowest cluster id)
//!    - if no observation changed its cluster, the calculation stops early
//! 3. The observations are grouped by their final assignment and returned as [`Clustering`].
//!
//! Clusters that end up without members are not part of the result. Asking for more clusters than there
//! are observations is not an error, the surplus clusters simply stay empty.
//!
//! ## Randomness
//! The initial assignment is the only random part of the calculation. The random number generator is taken
//! from the [`ClustererConfig`], so a seeded generator makes runs reproducible.
//!
//! ## Supported primitive types
//! - [`f32`]
//! - [`f64`]
//!
//! ## Example
//! ```rust
//! use clusterer::*;
//!
//! let data = [[73.0, 72.6], [61.0, 54.4], [67.0, 99.9], [68.0, 97.3], [62.0, 59.0],
//!             [75.0, 81.6], [74.0, 77.1], [66.0, 97.3], [68.0, 93.3], [61.0, 59.0]];
//!
//! let conf = ClustererConfig::build().seed(1337).build();
//! let result = cluster_with_config(&data, 3, 10, &conf).unwrap();
//!
//! for (cluster_id, members) in &result {
//!     println!("Cluster {}: {:?}", cluster_id, members);
//! }
//! println!("Iterations: {} (converged: {})", result.iterations, result.converged);
//! ```
//!
//! ## Example (using the status event callbacks)
//! ```rust
//! use clusterer::*;
//!
//! let data = vec![vec![0.0f64, 0.0], vec![0.5, 0.1], vec![9.0, 9.5], vec![10.0, 10.0]];
//!
//! let conf = ClustererConfig::build()
//!     .init_done(&|s| println!("Initial assignment: {:?}", s.assignments))
//!     .iteration_done(&|s, nr, moved|
//!         println!("Iteration {} - {} clusters in use, {} observations moved", nr, s.used_centroids_cnt(), moved))
//!     .build();
//!
//! let clusterer = Clusterer::from_rows(&data).unwrap();
//! let result = clusterer.cluster(2, 10, &conf).unwrap();
//! println!("Cluster-Assignments: {:?}", result.assignments);
//! ```
//!
//! ## Short API-Overview / Description
//! Entry-point of the library is the [`Clusterer`] struct, or the free functions [`cluster`], [`cluster_with_config`]
//! and [`cluster_default`] wrapping it. The struct takes over the observations into a row-major buffer, validating
//! their dimensionality once. Calling [`Clusterer::cluster`] does not mutate it, so multiple runs can share the same
//! instance. Invalid input is reported as [`ClusterError::InvalidInput`] before any computation starts.

#[macro_use] mod helpers;
mod memory;
mod error;
mod api;
pub mod clustering;
pub mod distance;
mod variants;
mod inits;

pub use api::{ClusteringState, ClustererConfig, ClustererConfigBuilder, Clusterer, InitDoneCallbackFn, IterationDoneCallbackFn};
pub use clustering::Clustering;
pub use error::{ClusterError, InvalidInput, Result};
pub use memory::Primitive;

/// Amount of clusters used by [`cluster_default`].
pub const DEFAULT_NCLUSTERS: usize = 3;
/// Maximum amount of refinement iterations used by [`cluster_default`].
pub const DEFAULT_MAX_ITER: usize = 10;

/// Partition **data** into (at most) **nclusters** clusters, using a thread-local random generator
/// for the initialization.
///
/// ## Arguments
/// - **data**: List of observations, all of the same dimensionality
/// - **nclusters**: Amount of clusters to search for
/// - **maxit**: Limit the maximum amount of refinement iterations
pub fn cluster<T: Primitive, R: AsRef<[T]>>(data: &[R], nclusters: usize, maxit: usize) -> Result<Clustering<T>> {
    cluster_with_config(data, nclusters, maxit, &ClustererConfig::default())
}

/// Like [`cluster`], but taking the random generator and callbacks from **config**.
pub fn cluster_with_config<'a, T: Primitive, R: AsRef<[T]>>(data: &[R], nclusters: usize, maxit: usize, config: &ClustererConfig<'a, T>) -> Result<Clustering<T>> {
    Clusterer::from_rows(data)?.cluster(nclusters, maxit, config)
}

/// [`cluster`] with [`DEFAULT_NCLUSTERS`] clusters and [`DEFAULT_MAX_ITER`] iterations.
pub fn cluster_default<T: Primitive, R: AsRef<[T]>>(data: &[R]) -> Result<Clustering<T>> {
    cluster(data, DEFAULT_NCLUSTERS, DEFAULT_MAX_ITER)
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::helpers::testing::*;

    #[test]
    fn free_functions_cover_dataset() {
        let res = cluster_default(&SAMPLE_DATA).unwrap();
        assert_eq!(res.k, DEFAULT_NCLUSTERS);
        assert!(res.iterations <= DEFAULT_MAX_ITER);
        assert_partition(&SAMPLE_DATA, &res);
        assert_consistent(&SAMPLE_DATA, &res);

        let res = cluster(&SAMPLE_DATA, 2, 5).unwrap();
        assert!(res.len() <= 2);
        assert!(res.iterations <= 5);
        assert_partition(&SAMPLE_DATA, &res);
    }

    #[test]
    fn free_function_matches_clusterer() {
        let rows = random_rows(64, 3, 5);
        let by_fn = cluster_with_config(&rows, 4, 20, &ClustererConfig::build().seed(11).build()).unwrap();
        let by_struct = Clusterer::from_rows(&rows).unwrap()
            .cluster(4, 20, &ClustererConfig::build().seed(11).build()).unwrap();
        assert_eq!(by_fn, by_struct);
    }

    #[test]
    fn degenerate_input_is_rejected() {
        let empty: Vec<Vec<f64>> = vec![];
        assert_eq!(cluster(&empty, 3, 10).unwrap_err(), ClusterError::InvalidInput(InvalidInput::EmptyDataset));
        assert_eq!(cluster(&SAMPLE_DATA, 0, 10).unwrap_err(), ClusterError::InvalidInput(InvalidInput::NClusters));
        assert_eq!(cluster(&SAMPLE_DATA, 3, 0).unwrap_err(), ClusterError::InvalidInput(InvalidInput::MaxIterations));
        assert_eq!(cluster(&[vec![1.0f64, 2.0], vec![1.0]], 1, 10).unwrap_err(),
            ClusterError::InvalidInput(InvalidInput::DimensionMismatch { index: 1, expected: 2, found: 1 }));
    }
}
