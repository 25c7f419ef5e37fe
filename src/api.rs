use crate::{distance, error::*, memory::*, Clustering};
use std::{cell::RefCell, collections::BTreeMap};
use rand::{prelude::*, rngs::StdRng};

pub type InitDoneCallbackFn<'a, T> = &'a dyn Fn(&ClusteringState<T>);
pub type IterationDoneCallbackFn<'a, T> = &'a dyn Fn(&ClusteringState<T>, usize, usize);

/// This is a structure holding the configuration options for a clustering calculation, such as
/// the random number generator to use, or a couple of callbacks, that can be set to get status information from
/// a running calculation.
///
/// For a more detailed information about all possible options, have a look at [`ClustererConfigBuilder`].
pub struct ClustererConfig<'a, T: Primitive> {
    /// Callback that is called, when the initialization phase finished
    /// ## Arguments
    /// - **state**: Current [`ClusteringState`] after the initialization
    pub(crate) init_done: InitDoneCallbackFn<'a, T>,
    /// Callback that is called after each iteration
    /// ## Arguments
    /// - **state**: [`ClusteringState`] holding the iteration's entering assignments, and the centroids calculated from them
    /// - **iteration_id**: Number of the current iteration (starting at 1)
    /// - **moved**: Amount of observations, whose cluster changed in this iteration
    pub(crate) iteration_done: IterationDoneCallbackFn<'a, T>,
    /// Random number generator to use
    pub(crate) rnd: Box<RefCell<dyn RngCore>>,
}
impl<'a, T: Primitive> Default for ClustererConfig<'a, T> {
    fn default() -> Self {
        Self {
            init_done: &|_| {},
            iteration_done: &|_,_,_| {},
            rnd: Box::new(RefCell::new(rand::thread_rng())),
        }
    }
}
impl<'a, T: Primitive> ClustererConfig<'a, T> {
    /// Use the [`ClustererConfigBuilder`] to build a [`ClustererConfig`] instance.
    pub fn build() -> ClustererConfigBuilder<'a, T> {
        ClustererConfigBuilder { config: ClustererConfig::default() }
    }
}
impl<'a, T: Primitive> std::fmt::Debug for ClustererConfig<'a, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClustererConfig").finish_non_exhaustive()
    }
}

pub struct ClustererConfigBuilder<'a, T: Primitive> {
    config: ClustererConfig<'a, T>
}
impl<'a, T: Primitive> ClustererConfigBuilder<'a, T> {
    /// Set the callback that should be called after the initial assignment, before the iteration starts.
    pub fn init_done(mut self, init_done: InitDoneCallbackFn<'a, T>) -> Self {
        self.config.init_done = init_done; self
    }
    /// Set the callback that should be called after each iteration during a running calculation.
    pub fn iteration_done(mut self, iteration_done: IterationDoneCallbackFn<'a, T>) -> Self {
        self.config.iteration_done = iteration_done; self
    }
    /// Set the random number generator that should be used for the initialization.
    /// Use a seeded generator for deterministically repeatable results.
    pub fn random_generator<R: RngCore + 'static>(mut self, rnd: R) -> Self {
        self.config.rnd = Box::new(RefCell::new(rnd)); self
    }
    /// Shorthand for [`ClustererConfigBuilder::random_generator`] with a [`StdRng`] seeded from **seed**.
    pub fn seed(self, seed: u64) -> Self {
        self.random_generator(StdRng::seed_from_u64(seed))
    }
    /// Return the internally built configuration structure.
    pub fn build(self) -> ClustererConfig<'a, T> { self.config }
}


/// This is the internally used data-structure, storing the current state during calculation.
/// All mutations are done in this structure, making [`Clusterer`] immutable.
///
/// ## Fields
/// - **k**: The amount of clusters that were requested
/// - **assignments**: Vector mapping each observation to its cluster (`0..k`)
/// - **centroids**: Cluster center of each non-empty cluster, keyed by cluster id
/// - **centroid_frequency**: Amount of observations in each non-empty cluster, keyed by cluster id
///
/// Only clusters that have members are stored, so the memory used does not depend on **k**.
#[derive(Clone, Debug)]
pub struct ClusteringState<T: Primitive> {
    pub k: usize,
    pub assignments: Vec<usize>,
    pub centroids: BTreeMap<usize, Vec<T>>,
    pub centroid_frequency: BTreeMap<usize, usize>,
}
impl<T: Primitive> ClusteringState<T> {
    pub(crate) fn new(sample_cnt: usize, k: usize) -> Self {
        Self {
            k,
            assignments: vec![0usize;sample_cnt],
            centroids: BTreeMap::new(),
            centroid_frequency: BTreeMap::new(),
        }
    }

    /// Centroid of cluster **cluster_id**, or `None` if the cluster currently has no members.
    pub fn centroid(&self, cluster_id: usize) -> Option<&[T]> {
        self.centroids.get(&cluster_id).map(|c| c.as_slice())
    }

    /// Amount of clusters that currently have at least one member.
    pub fn used_centroids_cnt(&self) -> usize { self.centroids.len() }
}


/// Entrypoint of this crate's API-Surface.
///
/// Create an instance of this struct, giving the observations you want to operate on. The primitive type
/// of the passed samples will be the type used internaly for all calculations, as well as the type of
/// the observations in the returned [`Clustering`].
/// The dimensionality of the observations is validated once, here. All further calculations rely on it.
///
/// ## Supported variants
/// - k-Means clustering (Lloyd) [`Clusterer::cluster`], [`Clusterer::lloyd`]
///
/// ## Supported initialization methods
/// - Random-Partition [`Clusterer::init_random_partition`]
#[derive(Clone, Debug)]
pub struct Clusterer<T: Primitive> {
    pub(crate) sample_cnt: usize,
    pub(crate) sample_dims: usize,
    pub(crate) samples: Vec<T>
}
impl<T: Primitive> Clusterer<T> {
    /// Create a new instance of the [`Clusterer`] structure.
    ///
    /// ## Arguments
    /// - **samples**: Vector of samples [row-major] = [<sample0>,<sample1>,<sample2>,...]
    /// - **sample_cnt**: Amount of samples, contained in the passed **samples** vector
    /// - **sample_dims**: Amount of dimensions each sample from the **sample** vector has
    pub fn new(samples: Vec<T>, sample_cnt: usize, sample_dims: usize) -> Result<Self> {
        if sample_cnt == 0 {
            return Err(InvalidInput::EmptyDataset.into());
        }
        if sample_dims == 0 {
            return Err(InvalidInput::ZeroDimensions.into());
        }
        match sample_cnt.checked_mul(sample_dims) {
            Some(expected) if expected == samples.len() => {},
            Some(expected) => return Err(InvalidInput::BufferLength { expected, found: samples.len() }.into()),
            None => return Err(InvalidInput::BufferOverflow { sample_cnt, sample_dims }.into())
        }
        Ok(Self { sample_cnt, sample_dims, samples })
    }

    /// Create a new instance of the [`Clusterer`] structure from a list of observations.
    /// All observations have to share the dimensionality of the first one.
    pub fn from_rows<R: AsRef<[T]>>(rows: &[R]) -> Result<Self> {
        let sample_dims = match rows.first() {
            Some(r) => r.as_ref().len(),
            None => return Err(InvalidInput::EmptyDataset.into())
        };
        if let Some((index, r)) = rows.iter().map(|r| r.as_ref()).enumerate().find(|(_, r)| r.len() != sample_dims) {
            return Err(InvalidInput::DimensionMismatch { index, expected: sample_dims, found: r.len() }.into());
        }
        let samples = rows.iter().flat_map(|r| r.as_ref().iter().cloned()).collect();
        Self::new(samples, rows.len(), sample_dims)
    }

    pub fn sample_cnt(&self) -> usize { self.sample_cnt }
    pub fn sample_dims(&self) -> usize { self.sample_dims }

    /// Recalculate the centroid of each non-empty cluster from the state's current assignments.
    pub(crate) fn update_centroids(&self, state: &mut ClusteringState<T>) {
        let (centroids, centroid_frequency) = (&mut state.centroids, &mut state.centroid_frequency);
        centroids.clear();
        centroid_frequency.clear();

        // Sum all samples in a cluster together, empty clusters never get an entry
        self.samples.chunks_exact(self.sample_dims)
            .zip(state.assignments.iter().cloned())
            .for_each(|(s, centroid_id)| {
                *centroid_frequency.entry(centroid_id).or_insert(0) += 1;
                centroids.entry(centroid_id).or_insert_with(|| vec![T::zero(); self.sample_dims])
                    .iter_mut()
                    .zip(s.iter())
                    .for_each(|(cv, sv)| *cv += sv);
            });

        // Both maps hold the same keys -> zip in key order
        centroids.values_mut()
            .zip(centroid_frequency.values().cloned())
            .for_each(|(c, cfreq)| {
                let cfreq = T::from(cfreq).unwrap_or_else(T::one);
                c.iter_mut().for_each(|cv| *cv = *cv / cfreq);
            });
    }

    /// Calculate a fresh assignment, mapping every sample to its nearest (non-empty) centroid.
    /// On ties, the centroid with the lowest cluster id wins. NaN distances are never chosen, a sample
    /// without any comparable centroid keeps its current cluster.
    pub(crate) fn update_cluster_assignments(&self, state: &ClusteringState<T>) -> Vec<usize> {
        self.samples.chunks_exact(self.sample_dims)
            .zip(state.assignments.iter().cloned())
            .map(|(s, current)| {
                let mut best: Option<(usize, T)> = None;
                state.centroids.iter()
                    .map(|(&ci, c)| (ci, distance::squared_euclidean(s, c)))
                    .filter(|(_, dist)| !dist.is_nan())
                    .for_each(|(ci, dist)| {
                        match best {
                            Some((_, best_dist)) if !(dist < best_dist) => {},
                            _ => best = Some((ci, dist))
                        }
                    });
                best.map(|(ci, _)| ci).unwrap_or(current)
            })
            .collect()
    }

    /// Normal K-Means algorithm implementation (Lloyd), using [`Clusterer::init_random_partition`]
    /// for the initial assignment.
    ///
    /// ## Arguments
    /// - **k**: Amount of clusters to search for
    /// - **max_iter**: Limit the maximum amount of refinement iterations
    /// - **config**: [`ClustererConfig`] instance, containing the random generator and status callbacks
    ///
    /// ## Returns
    /// The final [`Clustering`], or [`ClusterError::InvalidInput`] if **k** or **max_iter** is 0.
    ///
    /// ## Example
    /// ```rust
    /// use clusterer::*;
    ///
    /// let samples = vec![73.0f64, 72.6, 61.0, 54.4, 67.0, 99.9, 68.0, 97.3];
    /// let clusterer = Clusterer::new(samples, 4, 2).unwrap();
    /// let conf = ClustererConfig::build().seed(42).build();
    /// let result = clusterer.cluster(2, 10, &conf).unwrap();
    ///
    /// assert!(result.iterations <= 10);
    /// assert_eq!(result.iter().map(|(_, m)| m.len()).sum::<usize>(), 4);
    /// ```
    pub fn cluster<'a>(&self, k: usize, max_iter: usize, config: &ClustererConfig<'a, T>) -> Result<Clustering<T>> {
        self.lloyd(k, max_iter, Clusterer::init_random_partition, config)
    }

    /// Normal K-Means algorithm implementation (Lloyd) with a custom initial assignment.
    ///
    /// ## Arguments
    /// - **k**: Amount of clusters to search for
    /// - **max_iter**: Limit the maximum amount of refinement iterations
    /// - **init**: Function filling `state.assignments` with labels from `0..k`
    /// - **config**: [`ClustererConfig`] instance, containing the random generator and status callbacks
    pub fn lloyd<'a, F>(&self, k: usize, max_iter: usize, init: F, config: &ClustererConfig<'a, T>) -> Result<Clustering<T>>
                where for<'c> F: FnOnce(&Clusterer<T>, &mut ClusteringState<T>, &ClustererConfig<'c, T>) {
        crate::variants::Lloyd::calculate(self, k, max_iter, init, config)
    }

    /// Random-Partition initialization method
    ///
    /// ## Description
    /// Builds `ceil(sample_cnt / k)` copies of the label range `0..k`, shuffles them and assigns the first
    /// `sample_cnt` labels to the samples. Every cluster therefore starts with at least one sample, as long
    /// as `k <= sample_cnt`, and the clusters start out roughly balanced.
    /// With `k > sample_cnt`, every sample gets a distinct label drawn from `0..k` instead.
    ///
    /// ## Note
    /// This method is not meant for direct invocation. Pass a reference to it, to [`Clusterer::lloyd`].
    pub fn init_random_partition<'a>(clusterer: &Clusterer<T>, state: &mut ClusteringState<T>, config: &ClustererConfig<'a, T>) {
        crate::inits::randompartition::calculate(clusterer, state, config);
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_invalid_datasets() {
        assert_eq!(Clusterer::<f64>::new(vec![], 0, 2).unwrap_err(), ClusterError::InvalidInput(InvalidInput::EmptyDataset));
        assert_eq!(Clusterer::<f64>::new(vec![], 3, 0).unwrap_err(), ClusterError::InvalidInput(InvalidInput::ZeroDimensions));
        assert_eq!(Clusterer::new(vec![1.0f64, 2.0, 3.0], 2, 2).unwrap_err(),
            ClusterError::InvalidInput(InvalidInput::BufferLength { expected: 4, found: 3 }));
        assert_eq!(Clusterer::<f64>::new(vec![1.0], usize::MAX, 2).unwrap_err(),
            ClusterError::InvalidInput(InvalidInput::BufferOverflow { sample_cnt: usize::MAX, sample_dims: 2 }));

        let empty: Vec<Vec<f32>> = vec![];
        assert_eq!(Clusterer::<f32>::from_rows(&empty).unwrap_err(), ClusterError::InvalidInput(InvalidInput::EmptyDataset));
        assert_eq!(Clusterer::<f32>::from_rows(&[vec![1.0f32, 2.0], vec![3.0], vec![4.0, 5.0]]).unwrap_err(),
            ClusterError::InvalidInput(InvalidInput::DimensionMismatch { index: 1, expected: 2, found: 1 }));
        let no_dims: Vec<Vec<f32>> = vec![vec![], vec![]];
        assert_eq!(Clusterer::<f32>::from_rows(&no_dims).unwrap_err(), ClusterError::InvalidInput(InvalidInput::ZeroDimensions));
    }

    #[test]
    fn from_rows_flattens_row_major() {
        let clusterer = Clusterer::<f64>::from_rows(&[[1.0f64, 2.0], [3.0, 4.0], [5.0, 6.0]]).unwrap();
        assert_eq!(clusterer.sample_cnt(), 3);
        assert_eq!(clusterer.sample_dims(), 2);
        assert_eq!(clusterer.samples, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn centroids_are_member_means() {
        let clusterer = Clusterer::new(vec![1.0f64, 0.0, 2.0, 4.0, 3.0, 0.0, 7.0, 1.0], 4, 2).unwrap();
        let mut state = ClusteringState::new(4, 3);
        state.assignments = vec![0, 0, 0, 2];
        clusterer.update_centroids(&mut state);

        assert_eq!(state.centroid_frequency, BTreeMap::from([(0, 3), (2, 1)]));
        assert_eq!(state.centroid(0), Some(&[2.0, 4.0 / 3.0][..]));
        assert_eq!(state.centroid(1), None);
        assert_eq!(state.centroid(2), Some(&[7.0, 1.0][..]));
        assert_eq!(state.centroid(3), None);
        assert_eq!(state.used_centroids_cnt(), 2);
    }

    #[test]
    fn assignment_skips_empty_clusters() {
        let clusterer = Clusterer::new(vec![0.0f64, 10.0, 20.0], 3, 1).unwrap();
        let mut state = ClusteringState::new(3, 3);
        // cluster 1 is empty, it has no centroid that could attract anything
        state.assignments = vec![0, 0, 2];
        clusterer.update_centroids(&mut state);
        assert_eq!(state.centroid(0), Some(&[5.0][..]));
        assert_eq!(state.centroid(1), None);
        assert_eq!(clusterer.update_cluster_assignments(&state), vec![0, 0, 2]);
    }

    #[test]
    fn ties_go_to_lowest_cluster_id() {
        let clusterer = Clusterer::new(vec![0.0f64, 2.0, 1.0], 3, 1).unwrap();
        let mut state = ClusteringState::new(3, 2);
        state.assignments = vec![0, 1, 1];
        state.centroids = BTreeMap::from([(0, vec![0.0]), (1, vec![2.0])]);
        state.centroid_frequency = BTreeMap::from([(0, 1), (1, 2)]);
        // sample 1.0 is equidistant to both centroids
        assert_eq!(clusterer.update_cluster_assignments(&state), vec![0, 1, 0]);

        state.centroids = BTreeMap::from([(0, vec![2.0]), (1, vec![0.0])]);
        assert_eq!(clusterer.update_cluster_assignments(&state), vec![1, 0, 0]);
    }

    #[test]
    fn nan_distances_never_win() {
        let clusterer = Clusterer::new(vec![0.0f64, 5.0, f64::NAN], 3, 1).unwrap();
        let mut state = ClusteringState::new(3, 3);
        state.assignments = vec![1, 1, 2];
        state.centroids = BTreeMap::from([(0, vec![f64::NAN]), (1, vec![4.0]), (2, vec![9.0])]);
        state.centroid_frequency = BTreeMap::from([(0, 1), (1, 1), (2, 1)]);
        // the NaN centroid comes first, but the finite ones are compared.
        // The NaN sample has no comparable centroid and stays where it is.
        assert_eq!(clusterer.update_cluster_assignments(&state), vec![1, 1, 2]);
    }
}
