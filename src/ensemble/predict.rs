use std::sync::{Arc, PoisonError, RwLock};

use ndarray::{Array1, ArrayView1, Zip};

use super::Ensemble;
use crate::dataset::{Float, NCLASSES};
use crate::traits::{PredictVotes, TrainableClassifier};

/// Combine the votes of all scored members
///
/// Every member with a valid score votes on its masked copy of the record. Non-empty votes are
/// normalized to sum to one and scaled by the member's balanced accuracy. Abstaining members
/// are skipped. The combined vote is not renormalized, an empty ensemble votes all zeros.
impl<C, F> PredictVotes<F> for Ensemble<C, F>
where
    C: TrainableClassifier<F>,
    F: Float,
{
    fn predict_votes(&self, records: ArrayView1<F>) -> Array1<F> {
        let mut combined = Array1::zeros(NCLASSES);

        for member in self.members() {
            let score = match member.score() {
                Some(score) => score,
                None => continue,
            };

            let vote = member
                .classifier()
                .predict_votes(member.mask().apply(records).view());
            let total = vote.sum();
            if total > F::zero() {
                let n = vote.len().min(NCLASSES);
                Zip::from(combined.slice_mut(ndarray::s![..n]))
                    .and(vote.slice(ndarray::s![..n]))
                    .for_each(|c, v| *c += *v / total * score);
            }
        }

        combined
    }
}

/// Thread-safe read access to the latest published ensemble
///
/// A reader is obtained from [`Baswe::reader`](crate::ensemble::Baswe::reader) and can be
/// cloned and sent to other threads. Every prediction works on a snapshot taken at call time,
/// so it sees the ensemble either before or after a chunk cycle, never in between.
#[derive(Debug)]
pub struct EnsembleReader<C, F> {
    shared: Arc<RwLock<Arc<Ensemble<C, F>>>>,
}

impl<C, F> Clone for EnsembleReader<C, F> {
    fn clone(&self) -> Self {
        EnsembleReader {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<C, F: Float> EnsembleReader<C, F> {
    pub(crate) fn new(shared: Arc<RwLock<Arc<Ensemble<C, F>>>>) -> Self {
        EnsembleReader { shared }
    }

    /// The currently published ensemble
    pub fn snapshot(&self) -> Arc<Ensemble<C, F>> {
        let guard = self.shared.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&*guard)
    }
}

impl<C, F> PredictVotes<F> for EnsembleReader<C, F>
where
    C: TrainableClassifier<F>,
    F: Float,
{
    fn predict_votes(&self, records: ArrayView1<F>) -> Array1<F> {
        self.snapshot().predict_votes(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Instance;
    use crate::ensemble::{EnsembleMember, FeatureMask};
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    /// Returns the same votes for every record
    #[derive(Clone, Debug)]
    struct FixedVotes(Array1<f64>);

    impl PredictVotes<f64> for FixedVotes {
        fn predict_votes(&self, _records: ArrayView1<f64>) -> Array1<f64> {
            self.0.clone()
        }
    }

    impl TrainableClassifier<f64> for FixedVotes {
        fn train(&mut self, _instance: &Instance<f64>) {}

        fn clone_untrained(&self) -> Self {
            FixedVotes(Array1::zeros(0))
        }
    }

    /// Votes for the class given by the first feature
    #[derive(Clone, Debug)]
    struct FirstFeature;

    impl PredictVotes<f64> for FirstFeature {
        fn predict_votes(&self, records: ArrayView1<f64>) -> Array1<f64> {
            if records[0] > 0.5 {
                array![0.0, 1.0]
            } else {
                array![1.0, 0.0]
            }
        }
    }

    impl TrainableClassifier<f64> for FirstFeature {
        fn train(&mut self, _instance: &Instance<f64>) {}

        fn clone_untrained(&self) -> Self {
            FirstFeature
        }
    }

    fn ensemble<C>(members: Vec<(C, Option<f64>)>) -> Ensemble<C, f64> {
        let mut ensemble = Ensemble::new(members.len());
        ensemble.populate(
            members
                .into_iter()
                .map(|(c, score)| EnsembleMember::new(c, FeatureMask::full(2)).with_score(score))
                .collect(),
        );
        ensemble
    }

    #[test]
    fn votes_are_weighted_by_balanced_accuracy() {
        let ensemble = ensemble(vec![
            (FixedVotes(array![0.3, 0.7]), Some(0.8)),
            (FixedVotes(array![0.9, 0.1]), Some(0.6)),
        ]);
        let votes = ensemble.predict_votes(array![0.0, 0.0].view());

        assert_abs_diff_eq!(votes, array![0.78, 0.62], epsilon = 1e-12);
        assert_eq!(ensemble.predict_label(array![0.0, 0.0].view()), 0);
    }

    #[test]
    fn raw_votes_are_normalized() {
        let ensemble = ensemble(vec![(FixedVotes(array![3.0, 1.0]), Some(0.5))]);
        let votes = ensemble.predict_votes(array![0.0, 0.0].view());
        assert_abs_diff_eq!(votes, array![0.375, 0.125], epsilon = 1e-12);
    }

    #[test]
    fn abstaining_and_silent_members_do_not_vote() {
        let ensemble = ensemble(vec![
            (FixedVotes(array![0.0, 1.0]), None),
            (FixedVotes(array![0.0, 0.0]), Some(0.9)),
            (FixedVotes(array![1.0]), Some(0.5)),
        ]);
        let votes = ensemble.predict_votes(array![0.0, 0.0].view());
        assert_abs_diff_eq!(votes, array![0.5, 0.0], epsilon = 1e-12);
    }

    #[test]
    fn empty_ensemble_votes_zero() {
        let ensemble: Ensemble<FixedVotes, f64> = Ensemble::new(4);
        assert_eq!(ensemble.predict_votes(array![1.0].view()), array![0.0, 0.0]);
    }

    #[test]
    fn members_only_see_their_features() {
        let mut ensemble = Ensemble::new(1);
        ensemble.populate(vec![EnsembleMember::new(
            FirstFeature,
            FeatureMask::from_vec(vec![false, true]),
        )
        .with_score(Some(1.0))]);

        // the first feature is masked out, so the member always sees zero
        let votes = ensemble.predict_votes(array![1.0, 1.0].view());
        assert_eq!(votes, array![1.0, 0.0]);
    }

    #[test]
    fn reader_follows_published_snapshot() {
        let shared = Arc::new(RwLock::new(Arc::new(Ensemble::new(1))));
        let reader = EnsembleReader::new(Arc::clone(&shared));
        assert_eq!(reader.predict_votes(array![0.0].view()), array![0.0, 0.0]);

        let published = ensemble(vec![(FixedVotes(array![0.0, 2.0]), Some(1.0))]);
        *shared.write().unwrap() = Arc::new(published);

        let other = reader.clone();
        assert_eq!(other.predict_votes(array![0.0, 0.0].view()), array![0.0, 1.0]);
        assert_eq!(reader.snapshot().len(), 1);
    }
}
