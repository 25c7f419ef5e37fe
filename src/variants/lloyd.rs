use crate::{clustering, error::*, memory::*, Clusterer, ClusteringState, ClustererConfig, Clustering};
use log::{debug, trace, warn};

pub(crate) struct Lloyd<T: Primitive> {
	_p: std::marker::PhantomData<T>
}
impl<T: Primitive> Lloyd<T> {
    /// The initializer owns the assignments only. Labels are checked against the requested **k**,
    /// whatever it left in the other fields is reset.
    fn validate_init(data: &Clusterer<T>, state: &mut ClusteringState<T>, k: usize) -> Result<()> {
        if state.assignments.len() != data.sample_cnt {
            return Err(ClusterError::InitializationLength { expected: data.sample_cnt, found: state.assignments.len() });
        }
        if let Some((index, label)) = state.assignments.iter().cloned().enumerate().find(|&(_, label)| label >= k) {
            return Err(ClusterError::InitializationLabel { index, label, k });
        }
        state.k = k;
        state.centroids.clear();
        state.centroid_frequency.clear();
        Ok(())
    }

    #[inline(always)] pub fn calculate<'a, F>(data: &Clusterer<T>, k: usize, max_iter: usize, init: F, config: &ClustererConfig<'a, T>) -> Result<Clustering<T>>
                where for<'c> F: FnOnce(&Clusterer<T>, &mut ClusteringState<T>, &ClustererConfig<'c, T>) {
        if k == 0 {
            return Err(InvalidInput::NClusters.into());
        }
        if max_iter == 0 {
            return Err(InvalidInput::MaxIterations.into());
        }
        if k > data.sample_cnt {
            warn!("Requested {} clusters for only {} observations, some clusters will stay empty", k, data.sample_cnt);
        }
        debug!("Clustering {} observations ({} dimensions) into {} clusters, max_iter={}", data.sample_cnt, data.sample_dims, k, max_iter);

        let mut state = ClusteringState::new(data.sample_cnt, k);

        // Initialize clusters and notify subscriber
        init(data, &mut state, config);
        Self::validate_init(data, &mut state, k)?;
        (config.init_done)(&state);

        let mut iterations = 0;
        let mut converged = false;
        for i in 1..=max_iter {
            iterations = i;
            data.update_centroids(&mut state);
            let new_assignments = data.update_cluster_assignments(&state);
            let moved = new_assignments.iter().zip(state.assignments.iter()).filter(|(n, o)| n != o).count();
            trace!("Iteration {}: {} non-empty clusters, {} observations moved", i, state.used_centroids_cnt(), moved);

            // Notify subscriber about finished iteration
            (config.iteration_done)(&state, i, moved);
            if moved == 0 {
                converged = true;
                break;
            }
            state.assignments = new_assignments;
        }

        debug!("Clustering finished after {} iterations (converged: {})", iterations, converged);
        let clusters = clustering::group(&data.samples, data.sample_dims, &state.assignments);
        Ok(Clustering::new(k, state.assignments, iterations, converged, clusters))
    }
}
