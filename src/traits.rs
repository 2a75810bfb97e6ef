//! Provide traits for the component classifiers of an ensemble
//!
//! The ensemble does not define a learner of its own. Anything which can be trained one
//! weighted instance at a time and which reports a vote per class can be plugged in as a base
//! learner by implementing [`TrainableClassifier`].

use ndarray::{Array1, ArrayView1};

use crate::dataset::{Float, Instance};

/// Per-class vote scores for a single record
///
/// The vote vector is indexed by class label. An all-zero (or empty) vector is a valid "no
/// opinion" answer, e.g. for a model which has not seen any data yet.
pub trait PredictVotes<F: Float> {
    fn predict_votes(&self, records: ArrayView1<F>) -> Array1<F>;

    /// Label with the highest vote, the lowest index wins ties
    fn predict_label(&self, records: ArrayView1<F>) -> usize {
        max_index(self.predict_votes(records).view())
    }
}

/// An incrementally trainable classifier
///
/// Implementors must accept repeated calls to `train` without ever requiring a full retraining
/// and must honour the weight of the instance.
pub trait TrainableClassifier<F: Float>: PredictVotes<F> + Clone + Send + Sync {
    /// Incorporate a single weighted instance
    fn train(&mut self, instance: &Instance<F>);

    /// Create a fresh, untrained model with the same configuration
    fn clone_untrained(&self) -> Self;
}

/// Index of the largest value, ties are broken by first occurrence
///
/// Returns `0` for an empty vector. `NaN` entries never win.
pub fn max_index<F: Float>(votes: ArrayView1<F>) -> usize {
    let mut best = 0;
    let mut maximum = F::neg_infinity();
    for (i, vote) in votes.iter().enumerate() {
        if *vote > maximum {
            best = i;
            maximum = *vote;
        }
    }

    best
}
