use crate::memory::Primitive;

/// Squared euclidean distance between two observations of equal dimensionality.
#[inline(always)]
pub fn squared_euclidean<T: Primitive>(a: &[T], b: &[T]) -> T {
    a.iter().cloned().zip(b.iter().cloned())
        .map(|(av, bv)| av - bv)        // <a> - <b>
        .map(|v| v * v)                 // <vec_components> ^2
        .sum()
}
