use crate::memory::Primitive;
use std::collections::{btree_map, BTreeMap};

/// Group the row-major **samples** by their entry in **assignments**.
///
/// Members keep the order in which they appear in the dataset. Clusters without members are
/// not part of the returned map.
pub fn group<T: Primitive>(samples: &[T], sample_dims: usize, assignments: &[usize]) -> BTreeMap<usize, Vec<Vec<T>>> {
    let mut clusters: BTreeMap<usize, Vec<Vec<T>>> = BTreeMap::new();
    samples.chunks_exact(sample_dims)
        .zip(assignments.iter().cloned())
        .for_each(|(s, cluster_id)| clusters.entry(cluster_id).or_default().push(s.to_vec()));
    clusters
}

/// Final result of a clustering calculation, as returned by the API.
///
/// ## Fields
/// - **k**: The amount of clusters that were requested
/// - **assignments**: Vector mapping each observation to its cluster (`0..k`)
/// - **iterations**: Amount of refinement iterations that were executed (`<= max_iter`)
/// - **converged**: Whether the calculation stopped because a fixed point was reached
///
/// The members of each non-empty cluster can be accessed using [`Clustering::get`], or by iterating.
#[derive(Clone, Debug, PartialEq)]
pub struct Clustering<T: Primitive> {
    pub k: usize,
    pub assignments: Vec<usize>,
    pub iterations: usize,
    pub converged: bool,
    clusters: BTreeMap<usize, Vec<Vec<T>>>,
}
impl<T: Primitive> Clustering<T> {
    pub(crate) fn new(k: usize, assignments: Vec<usize>, iterations: usize, converged: bool, clusters: BTreeMap<usize, Vec<Vec<T>>>) -> Self {
        Self { k, assignments, iterations, converged, clusters }
    }

    /// Members of cluster **cluster_id**, or `None` if no observation ended up in it.
    pub fn get(&self, cluster_id: usize) -> Option<&[Vec<T>]> {
        self.clusters.get(&cluster_id).map(|m| m.as_slice())
    }

    /// Amount of non-empty clusters.
    pub fn len(&self) -> usize { self.clusters.len() }

    pub fn is_empty(&self) -> bool { self.clusters.is_empty() }

    pub fn iter(&self) -> btree_map::Iter<'_, usize, Vec<Vec<T>>> { self.clusters.iter() }

    pub fn clusters(&self) -> &BTreeMap<usize, Vec<Vec<T>>> { &self.clusters }

    pub fn into_clusters(self) -> BTreeMap<usize, Vec<Vec<T>>> { self.clusters }

    /// Cluster ids from `0..k` that did not receive any observation, in ascending order.
    /// The iterator is lazy, with a huge **k** only take what is needed.
    pub fn empty_clusters(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.k).filter(move |id| !self.clusters.contains_key(id))
    }

    /// Amount of requested clusters that did not receive any observation.
    pub fn empty_cluster_cnt(&self) -> usize { self.k - self.clusters.len() }

    /// `true` if at least one of the requested clusters is empty.
    pub fn is_degenerate(&self) -> bool { self.clusters.len() < self.k }

    /// Coordinate-wise mean of each non-empty cluster.
    pub fn centroids(&self) -> BTreeMap<usize, Vec<T>> {
        self.clusters.iter()
            .filter_map(|(&cluster_id, members)| {
                let first = members.first()?;
                let cnt = T::from(members.len())?;
                let mut centroid = vec![T::zero(); first.len()];
                members.iter().for_each(|m| centroid.iter_mut().zip(m.iter()).for_each(|(c, v)| *c += v));
                centroid.iter_mut().for_each(|c| *c = *c / cnt);
                Some((cluster_id, centroid))
            })
            .collect()
    }
}

impl<'a, T: Primitive> IntoIterator for &'a Clustering<T> {
    type Item = (&'a usize, &'a Vec<Vec<T>>);
    type IntoIter = btree_map::Iter<'a, usize, Vec<Vec<T>>>;
    fn into_iter(self) -> Self::IntoIter { self.clusters.iter() }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_keeps_dataset_order() {
        let samples = vec![1.0f64, 0.0, 2.0, 0.0, 3.0, 0.0, 4.0, 0.0];
        let clusters = group(&samples, 2, &[1, 0, 1, 1]);
        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[&0], vec![vec![2.0, 0.0]]);
        assert_eq!(clusters[&1], vec![vec![1.0, 0.0], vec![3.0, 0.0], vec![4.0, 0.0]]);
    }

    #[test]
    fn group_omits_empty_clusters() {
        let samples = vec![1.0f32, 2.0, 3.0];
        let clusters = group(&samples, 1, &[2, 2, 0]);
        assert_eq!(clusters.keys().cloned().collect::<Vec<_>>(), vec![0, 2]);
        assert!(!clusters.contains_key(&1));
    }

    #[test]
    fn result_accessors() {
        let samples = vec![1.0f64, 1.0, 3.0, 3.0, 10.0, 10.0];
        let assignments = vec![0, 0, 2];
        let res = Clustering::new(3, assignments.clone(), 2, true, group(&samples, 2, &assignments));

        assert_eq!(res.len(), 2);
        assert!(!res.is_empty());
        assert_eq!(res.get(0), Some(&[vec![1.0, 1.0], vec![3.0, 3.0]][..]));
        assert_eq!(res.get(1), None);
        assert_eq!(res.empty_clusters().collect::<Vec<_>>(), vec![1]);
        assert_eq!(res.empty_cluster_cnt(), 1);
        assert!(res.is_degenerate());

        let centroids = res.centroids();
        assert_eq!(centroids[&0], vec![2.0, 2.0]);
        assert_eq!(centroids[&2], vec![10.0, 10.0]);

        let ids: Vec<usize> = (&res).into_iter().map(|(id, _)| *id).collect();
        assert_eq!(ids, vec![0, 2]);
        assert_eq!(res.into_clusters().len(), 2);
    }
}
