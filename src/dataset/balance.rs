use std::collections::VecDeque;

use rand::Rng;

use super::{class_counts, Float, Instance, NCLASSES};
use crate::error::{Error, Result};

/// Balanced training set of a single chunk cycle
///
/// Holds the same number of instances of both classes, interleaved so that no class run is
/// longer than two. It is derived from the class windows once per cycle and discarded afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct BalancedChunk<F> {
    instances: Vec<Instance<F>>,
}

impl<F: Float> BalancedChunk<F> {
    pub fn iter(&self) -> std::slice::Iter<'_, Instance<F>> {
        self.instances.iter()
    }

    pub fn as_slice(&self) -> &[Instance<F>] {
        &self.instances
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    pub fn class_counts(&self) -> [usize; NCLASSES] {
        class_counts(&self.instances)
    }
}

impl<'a, F: Float> IntoIterator for &'a BalancedChunk<F> {
    type Item = &'a Instance<F>;
    type IntoIter = std::slice::Iter<'a, Instance<F>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Copy a window and grow the copy to `target` instances by drawing from the window with
/// replacement
///
/// The window itself is never modified. An empty window yields an empty list, there is nothing
/// to duplicate. A window which already holds `target` or more instances is copied unchanged.
pub fn oversample<F: Float, R: Rng>(
    window: &VecDeque<Instance<F>>,
    target: usize,
    rng: &mut R,
) -> Vec<Instance<F>> {
    let mut sampled = Vec::with_capacity(target.max(window.len()));
    sampled.extend(window.iter().cloned());
    if window.is_empty() {
        return sampled;
    }

    while sampled.len() < target {
        let idx = rng.gen_range(0..window.len());
        sampled.push(window[idx].clone());
    }

    sampled
}

/// Interleave two lists of the same length in random order
///
/// Every step picks one random position of the remaining lists and moves the element at that
/// position from `first`, then from `second`, to the output.
pub fn merge_interleaved<F: Float, R: Rng>(
    mut first: Vec<Instance<F>>,
    mut second: Vec<Instance<F>>,
    rng: &mut R,
) -> Result<Vec<Instance<F>>> {
    if first.len() != second.len() {
        return Err(Error::ImbalancedWindows {
            first: first.len(),
            second: second.len(),
        });
    }

    let mut merged = Vec::with_capacity(first.len() * 2);
    while !first.is_empty() {
        // both lists shrink in lockstep, so the index is valid for `second` too
        let idx = rng.gen_range(0..first.len());
        merged.push(first.swap_remove(idx));
        merged.push(second.swap_remove(idx));
    }

    Ok(merged)
}

/// Build the balanced training set of a cycle
///
/// Both windows are oversampled to `chunk_size / 2` instances and merged with class `0` first
/// in every pair. Fails with [`Error::ImbalancedWindows`] if the oversampled lists differ in
/// length, which is the case while one of the windows is empty.
pub fn balance<F: Float, R: Rng>(
    windows: &super::ClassWindows<F>,
    chunk_size: usize,
    rng: &mut R,
) -> Result<BalancedChunk<F>> {
    let half = chunk_size / 2;
    let first = oversample(windows.window(0), half, rng);
    let second = oversample(windows.window(1), half, rng);

    merge_interleaved(first, second, rng).map(|instances| BalancedChunk { instances })
}
