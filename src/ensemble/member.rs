use ndarray_rand::rand_distr::{Distribution, Poisson};
use rand::Rng;

use super::FeatureMask;
use crate::dataset::{BalancedChunk, Float};
use crate::metrics_classification::ConfusionMatrix;
use crate::traits::TrainableClassifier;

/// A component classifier together with its feature mask and fitness
///
/// The score is the balanced accuracy on the most recent balanced training set. `None` marks
/// an abstaining member: its balanced accuracy was undefined, so it neither votes nor wins a
/// replacement comparison.
#[derive(Debug, Clone)]
pub struct EnsembleMember<C, F> {
    classifier: C,
    mask: FeatureMask,
    score: Option<F>,
}

impl<C, F: Float> EnsembleMember<C, F> {
    /// Create an unscored member
    pub fn new(classifier: C, mask: FeatureMask) -> Self {
        EnsembleMember {
            classifier,
            mask,
            score: None,
        }
    }

    #[cfg(test)]
    pub(crate) fn with_score(mut self, score: Option<F>) -> Self {
        self.score = score;
        self
    }

    pub fn classifier(&self) -> &C {
        &self.classifier
    }

    pub fn mask(&self) -> &FeatureMask {
        &self.mask
    }

    pub fn score(&self) -> Option<F> {
        self.score
    }

    pub fn is_abstaining(&self) -> bool {
        self.score.is_none()
    }

    /// Whether this member should take the place of `incumbent`
    ///
    /// A valid score beats an abstaining incumbent, otherwise the score has to be strictly
    /// greater. An abstaining member never wins.
    pub fn outscores(&self, incumbent: &Self) -> bool {
        match (self.score, incumbent.score) {
            (Some(score), Some(other)) => score > other,
            (Some(_), None) => true,
            (None, _) => false,
        }
    }
}

impl<C: TrainableClassifier<F>, F: Float> EnsembleMember<C, F> {
    /// Train on one pass over the balanced training set
    ///
    /// Each instance is masked, reweighted by a Poisson(1) draw `k` and submitted once if
    /// `k > 0`, which emulates bootstrap resampling in the manner of online bagging.
    pub fn train_on<R: Rng>(
        &mut self,
        chunk: &BalancedChunk<F>,
        poisson: &Poisson<f64>,
        rng: &mut R,
    ) {
        for instance in chunk {
            let k = poisson.sample(rng);
            if k > 0.0 {
                let weight = instance.weight() * F::cast(k);
                let masked = self.mask.apply_instance(instance).with_weight(weight);
                self.classifier.train(&masked);
            }
        }
    }

    /// Recompute the score on the unmasked balanced training set
    pub fn evaluate(&mut self, chunk: &BalancedChunk<F>) -> Option<F> {
        self.score = fitness(&self.classifier, chunk);
        self.score
    }
}

/// Balanced accuracy of a classifier on a balanced training set
///
/// The classifier sees the full records. Returns `None` if the balanced accuracy is undefined.
pub fn fitness<C, F>(classifier: &C, chunk: &BalancedChunk<F>) -> Option<F>
where
    C: TrainableClassifier<F>,
    F: Float,
{
    let mut cm = ConfusionMatrix::new();
    for instance in chunk {
        let predicted = classifier.predict_label(instance.records());
        // votes for unknown class slots fall back to the first class
        let predicted = if predicted < crate::dataset::NCLASSES { predicted } else { 0 };
        cm.add(predicted, instance.target());
    }

    let score = cm.balanced_accuracy::<F>();
    if score.is_nan() {
        None
    } else {
        Some(score)
    }
}
