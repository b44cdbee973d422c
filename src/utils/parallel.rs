//! Thin shim over the data-parallel backend.
//!
//! With the `parallel` feature the helpers fan out on the rayon thread pool;
//! without it they degrade to plain loops. Either way a helper only returns
//! once every iteration has completed, so consecutive calls are separated by
//! a fence.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

pub(crate) fn for_each_index<F>(len: usize, f: F)
where
    F: Fn(usize) + Send + Sync,
{
    #[cfg(feature = "parallel")]
    (0..len).into_par_iter().for_each(f);

    #[cfg(not(feature = "parallel"))]
    for i in 0..len {
        f(i);
    }
}

pub(crate) fn for_each_indexed<T, F>(items: &mut [T], f: F)
where
    T: Send,
    F: Fn(usize, &mut T) + Send + Sync,
{
    #[cfg(feature = "parallel")]
    items
        .par_iter_mut()
        .enumerate()
        .for_each(|(i, item)| f(i, item));

    #[cfg(not(feature = "parallel"))]
    for (i, item) in items.iter_mut().enumerate() {
        f(i, item);
    }
}

pub(crate) fn map_indexed<T, F>(len: usize, f: F) -> Vec<T>
where
    T: Send,
    F: Fn(usize) -> T + Send + Sync,
{
    #[cfg(feature = "parallel")]
    return (0..len).into_par_iter().map(f).collect();

    #[cfg(not(feature = "parallel"))]
    return (0..len).map(f).collect();
}

pub(crate) fn sort_unstable<T: Ord + Send>(items: &mut [T]) {
    #[cfg(feature = "parallel")]
    items.par_sort_unstable();

    #[cfg(not(feature = "parallel"))]
    items.sort_unstable();
}
