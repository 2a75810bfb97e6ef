//! Datasets
//!
//! This module implements the labelled stream instance and the per-class windows, chunk
//! accumulator and balancing procedure which turn a skewed stream into balanced training sets.
use ndarray::{Array1, ArrayView1, ScalarOperand};

use num_traits::{FromPrimitive, NumAssignOps, NumCast, Signed};

use std::fmt;
use std::iter::Sum;

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

mod balance;
mod window;

pub use balance::{balance, merge_interleaved, oversample, BalancedChunk};
pub use window::{ChunkAccumulator, ClassWindows};

/// Number of classes handled by the ensemble
///
/// Labels are class indices, so valid targets are `0` and `1`.
pub const NCLASSES: usize = 2;

/// Floating point numbers
///
/// This trait bound multiplexes to the most common assumption of floating point number and
/// implement them for 32bit and 64bit floating points. They are used for the features and
/// weights of instances and for votes and fitness scores.
pub trait Float:
    FromPrimitive
    + num_traits::Float
    + PartialOrd
    + Sync
    + Send
    + Default
    + fmt::Display
    + fmt::Debug
    + Signed
    + Sum
    + NumAssignOps
    + ScalarOperand
    + approx::AbsDiffEq
{
    fn cast<T: NumCast>(x: T) -> Self {
        NumCast::from(x).unwrap()
    }
}

impl Float for f32 {}

impl Float for f64 {}

/// A labelled record of the stream
///
/// The feature vector and label never change once created. The weight defaults to one and is
/// only rescaled on copies handed to a single training call.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Debug, Clone, PartialEq)]
pub struct Instance<F> {
    records: Array1<F>,
    target: usize,
    weight: F,
}

impl<F: Float> Instance<F> {
    /// Create a new instance with unit weight
    pub fn new(records: Array1<F>, target: usize) -> Self {
        Instance {
            records,
            target,
            weight: F::one(),
        }
    }

    /// Replace the weight of this instance
    pub fn with_weight(mut self, weight: F) -> Self {
        self.weight = weight;
        self
    }

    pub fn records(&self) -> ArrayView1<F> {
        self.records.view()
    }

    pub fn target(&self) -> usize {
        self.target
    }

    pub fn weight(&self) -> F {
        self.weight
    }

    pub fn nfeatures(&self) -> usize {
        self.records.len()
    }
}

/// Count the occurences of every class label
///
/// Labels outside of `0..NCLASSES` are ignored.
pub fn class_counts<'a, F: 'a, I>(instances: I) -> [usize; NCLASSES]
where
    I: IntoIterator<Item = &'a Instance<F>>,
{
    let mut counts = [0; NCLASSES];
    for instance in instances {
        if let Some(count) = counts.get_mut(instance.target) {
            *count += 1;
        }
    }

    counts
}
