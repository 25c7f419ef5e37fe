use crate::{Clusterer, ClusteringState, ClustererConfig, memory::*};
use rand::{prelude::*, seq::index};
use std::ops::DerefMut;

#[inline(always)] pub fn calculate<'a, T: Primitive>(clusterer: &Clusterer<T>, state: &mut ClusteringState<T>, config: &ClustererConfig<'a, T>) {
	let (sample_cnt, k) = (clusterer.sample_cnt, state.k);
	let mut rnd = config.rnd.borrow_mut();

	if k > sample_cnt {
		// Same distribution as shuffling a single copy of 0..k and taking sample_cnt labels,
		// without materializing all k labels
		state.assignments = index::sample(rnd.deref_mut(), k, sample_cnt).into_vec();
		return;
	}

	let copies = (sample_cnt + k - 1) / k;
	let mut labels: Vec<usize> = (0..copies).flat_map(|_| 0..k).collect();
	labels.shuffle(rnd.deref_mut());
	labels.truncate(sample_cnt);
	state.assignments = labels;
}
