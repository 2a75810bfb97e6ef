use std::sync::{Arc, PoisonError, RwLock};

use ndarray::{Array1, ArrayView1};
use ndarray_rand::rand_distr::Poisson;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256Plus;
use rayon::prelude::*;

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

use super::{BasweParams, BasweValidParams, Ensemble, EnsembleMember, EnsembleReader, FeatureMask};
use crate::dataset::{
    balance, class_counts, BalancedChunk, ChunkAccumulator, ClassWindows, Float, Instance,
    NCLASSES,
};
use crate::error::{Error, Result};
use crate::traits::{PredictVotes, TrainableClassifier};
use crate::ParamGuard;

/// Summary of a completed chunk cycle
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleReport {
    /// Ordinal of the cycle since construction or the last reset, starting at one
    pub cycle: usize,
    /// Class proportions of the raw chunk which triggered the cycle
    pub chunk_class_counts: [usize; NCLASSES],
    /// Lengths of the class windows when the cycle started
    pub window_lens: [usize; NCLASSES],
    /// Class proportions of the balanced training set
    pub balanced_class_counts: [usize; NCLASSES],
    /// Members replaced by a better candidate, always zero on the populating cycle
    pub replaced: usize,
    /// Members without a valid score after the cycle
    pub abstentions: usize,
}

/// Balanced accuracy-based sliding window ensemble
///
/// An online ensemble for binary classification of imbalanced streams. Instances are fed one
/// at a time with [`on_instance`](Self::on_instance). Every instance is appended to the
/// sliding window of its class and to the current chunk. Once the chunk is complete, both
/// windows are oversampled to the same size and interleaved into a balanced training set, on
/// which
///
/// * the first cycle creates and trains `ensemble_size` members, each restricted to a random
///   subset of the features,
/// * every later cycle continues training all members, rescores them and then trains
///   `new_member_count` fresh candidates, each of which replaces the lowest scoring member if
///   it scores strictly higher.
///
/// Members are scored by their balanced accuracy on the balanced training set and vote with
/// that weight.
///
/// # Example
///
/// ```
/// use baswe::prelude::*;
/// use ndarray::{array, Array1, ArrayView1};
///
/// /// Predicts the class of the closest seen instance
/// #[derive(Clone, Default)]
/// struct Memorize(Vec<Instance<f64>>);
///
/// impl PredictVotes<f64> for Memorize {
///     fn predict_votes(&self, records: ArrayView1<f64>) -> Array1<f64> {
///         let mut votes = Array1::zeros(2);
///         let closest = self.0.iter().min_by(|a, b| {
///             let da = (&a.records() - &records).mapv(f64::abs).sum();
///             let db = (&b.records() - &records).mapv(f64::abs).sum();
///             da.partial_cmp(&db).unwrap()
///         });
///         if let Some(x) = closest {
///             votes[x.target()] = 1.0;
///         }
///         votes
///     }
/// }
///
/// impl TrainableClassifier<f64> for Memorize {
///     fn train(&mut self, instance: &Instance<f64>) {
///         self.0.push(instance.clone());
///     }
///
///     fn clone_untrained(&self) -> Self {
///         Memorize::default()
///     }
/// }
///
/// let mut model = BasweParams::new(Memorize::default())
///     .ensemble_size(3)
///     .chunk_size(20)
///     .build()?;
///
/// for i in 0..20 {
///     let target = i % 2;
///     let x = array![target as f64 + 0.01 * i as f64];
///     if let Some(report) = model.on_instance(Instance::new(x, target))? {
///         assert_eq!(report.cycle, 1);
///     }
/// }
///
/// assert_eq!(model.members().len(), 3);
/// # Result::Ok(())
/// ```
#[derive(Debug)]
pub struct Baswe<C, F, R> {
    ensemble_size: usize,
    new_member_count: usize,
    chunk_size: usize,
    parallel: bool,
    rng: R,
    poisson: Poisson<f64>,
    /// Untrained template every new member is cloned from, renewed after each cycle
    candidate: C,
    windows: ClassWindows<F>,
    chunk: ChunkAccumulator<F>,
    nfeatures: Option<usize>,
    ensemble: Arc<Ensemble<C, F>>,
    published: Arc<RwLock<Arc<Ensemble<C, F>>>>,
    cycles: usize,
    last_report: Option<CycleReport>,
}

impl<C, R> BasweValidParams<C, R>
where
    R: Rng + Clone,
{
    /// Build an empty model from the checked hyperparameters
    pub fn build<F>(&self) -> Result<Baswe<C, F, R>>
    where
        C: TrainableClassifier<F>,
        F: Float,
    {
        let poisson = Poisson::new(1.0).map_err(|err| Error::Parameters(err.to_string()))?;
        let ensemble = Arc::new(Ensemble::new(self.ensemble_size));

        Ok(Baswe {
            ensemble_size: self.ensemble_size,
            new_member_count: self.new_member_count,
            chunk_size: self.chunk_size,
            parallel: self.parallel,
            rng: self.rng.clone(),
            poisson,
            candidate: self.base_learner.clone_untrained(),
            windows: ClassWindows::new(self.chunk_size),
            chunk: ChunkAccumulator::new(self.chunk_size),
            nfeatures: None,
            published: Arc::new(RwLock::new(Arc::clone(&ensemble))),
            ensemble,
            cycles: 0,
            last_report: None,
        })
    }
}

impl<C, R> BasweParams<C, R>
where
    R: Rng + Clone,
{
    /// Check the hyperparameters and build an empty model
    pub fn build<F>(&self) -> Result<Baswe<C, F, R>>
    where
        C: TrainableClassifier<F>,
        F: Float,
    {
        self.check_ref()?.build()
    }
}

impl<C, F, R> Baswe<C, F, R>
where
    C: TrainableClassifier<F>,
    F: Float,
    R: Rng,
{
    /// Feed one labelled instance of the stream
    ///
    /// Returns the report of the chunk cycle this instance completed, if any. A cycle which
    /// cannot build a balanced training set returns [`Error::ImbalancedWindows`]; the chunk is
    /// dropped regardless and the ensemble keeps its previous state.
    pub fn on_instance(&mut self, instance: Instance<F>) -> Result<Option<CycleReport>> {
        if instance.target() >= NCLASSES {
            return Err(Error::InvalidLabel(instance.target()));
        }
        match self.nfeatures {
            Some(expected) if expected != instance.nfeatures() => {
                return Err(Error::FeatureCount {
                    expected,
                    found: instance.nfeatures(),
                })
            }
            Some(_) => {}
            None => self.nfeatures = Some(instance.nfeatures()),
        }

        self.windows.push(instance.clone());
        if self.chunk.push(instance) {
            self.process_chunk().map(Some)
        } else {
            Ok(None)
        }
    }

    /// Drop all members, windows and the current chunk
    pub fn reset(&mut self) {
        self.windows.clear();
        self.chunk.clear();
        self.nfeatures = None;
        self.cycles = 0;
        self.last_report = None;
        self.candidate = self.candidate.clone_untrained();
        self.publish(Ensemble::new(self.ensemble_size));
    }

    fn process_chunk(&mut self) -> Result<CycleReport> {
        self.cycles += 1;
        let span = tracing::debug_span!("chunk_cycle", cycle = self.cycles);
        let _enter = span.enter();

        let chunk = self.chunk.drain();
        let chunk_class_counts = class_counts(&chunk);
        let window_lens = self.windows.lens();

        let result = balance(&self.windows, self.chunk_size, &mut self.rng)
            .map(|balanced| self.learn_chunk(&balanced));
        self.candidate = self.candidate.clone_untrained();

        let (balanced_class_counts, replaced) = match result {
            Ok(summary) => summary,
            Err(err) => {
                tracing::warn!(
                    ?window_lens,
                    "skipping chunk, class windows cannot be balanced: {}",
                    err
                );
                return Err(err);
            }
        };

        let report = CycleReport {
            cycle: self.cycles,
            chunk_class_counts,
            window_lens,
            balanced_class_counts,
            replaced,
            abstentions: self.ensemble.abstentions(),
        };
        tracing::debug!(
            original = ?report.chunk_class_counts,
            windows = ?report.window_lens,
            balanced = ?report.balanced_class_counts,
            replaced = report.replaced,
            abstentions = report.abstentions,
            "chunk processed"
        );

        self.last_report = Some(report.clone());
        Ok(report)
    }

    /// Train, score and replace members on a balanced chunk and publish the result
    fn learn_chunk(&mut self, balanced: &BalancedChunk<F>) -> ([usize; NCLASSES], usize) {
        let mut ensemble = (*self.ensemble).clone();

        let replaced = if ensemble.is_empty() {
            let nfeatures = self.nfeatures.unwrap_or(0);
            let mut members = (0..self.ensemble_size)
                .map(|_| {
                    let mask = FeatureMask::random(nfeatures, &mut self.rng);
                    EnsembleMember::new(self.candidate.clone_untrained(), mask)
                })
                .collect::<Vec<_>>();
            self.train_members(&mut members, balanced);
            ensemble.populate(members);
            0
        } else {
            self.train_members(ensemble.members_mut(), balanced);
            self.replace_poorest(&mut ensemble, balanced)
        };

        self.publish(ensemble);
        (balanced.class_counts(), replaced)
    }

    /// Continue training every member on the chunk and rescore it
    ///
    /// Seeds are drawn sequentially before members are trained, so the outcome does not
    /// depend on whether training runs on the thread pool.
    fn train_members(
        &mut self,
        members: &mut [EnsembleMember<C, F>],
        balanced: &BalancedChunk<F>,
    ) {
        let seeds = members.iter().map(|_| self.rng.gen()).collect::<Vec<u64>>();
        let poisson = self.poisson;
        let train = |(member, seed): (&mut EnsembleMember<C, F>, u64)| {
            let mut rng = Xoshiro256Plus::seed_from_u64(seed);
            member.train_on(balanced, &poisson, &mut rng);
            member.evaluate(balanced);
        };

        if self.parallel {
            members.par_iter_mut().zip(seeds).for_each(train);
        } else {
            members.iter_mut().zip(seeds).for_each(train);
        }
    }

    fn replace_poorest(
        &mut self,
        ensemble: &mut Ensemble<C, F>,
        balanced: &BalancedChunk<F>,
    ) -> usize {
        let nfeatures = self.nfeatures.unwrap_or(0);
        let mut replaced = 0;

        for _ in 0..self.new_member_count {
            let mask = FeatureMask::random(nfeatures, &mut self.rng);
            let mut candidate = EnsembleMember::new(self.candidate.clone_untrained(), mask);
            let mut rng = Xoshiro256Plus::seed_from_u64(self.rng.gen());
            candidate.train_on(balanced, &self.poisson, &mut rng);
            let score = candidate.evaluate(balanced);

            match ensemble.offer(candidate) {
                Some(idx) => {
                    tracing::trace!(?score, idx, "candidate replaced poorest member");
                    replaced += 1;
                }
                None => tracing::trace!(?score, "candidate discarded"),
            }
        }

        replaced
    }

    fn publish(&mut self, ensemble: Ensemble<C, F>) {
        self.ensemble = Arc::new(ensemble);
        let mut shared = self.published.write().unwrap_or_else(PoisonError::into_inner);
        *shared = Arc::clone(&self.ensemble);
    }
}

impl<C, F: Float, R> Baswe<C, F, R> {
    /// A handle for predicting from other threads
    pub fn reader(&self) -> EnsembleReader<C, F> {
        EnsembleReader::new(Arc::clone(&self.published))
    }

    pub fn ensemble(&self) -> &Ensemble<C, F> {
        &self.ensemble
    }

    /// Current members, empty before the first completed cycle
    pub fn members(&self) -> &[EnsembleMember<C, F>] {
        self.ensemble.members()
    }

    pub fn scores(&self) -> Vec<Option<F>> {
        self.ensemble.scores()
    }

    pub fn windows(&self) -> &ClassWindows<F> {
        &self.windows
    }

    /// Number of instances collected towards the next chunk
    pub fn chunk_len(&self) -> usize {
        self.chunk.len()
    }

    /// Feature count fixed by the first instance since construction or reset
    pub fn nfeatures(&self) -> Option<usize> {
        self.nfeatures
    }

    /// Number of chunk cycles since construction or reset, including failed ones
    pub fn cycles(&self) -> usize {
        self.cycles
    }

    pub fn last_report(&self) -> Option<&CycleReport> {
        self.last_report.as_ref()
    }

    pub fn ensemble_size(&self) -> usize {
        self.ensemble_size
    }

    pub fn new_member_count(&self) -> usize {
        self.new_member_count
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }
}

impl<C, F, R> PredictVotes<F> for Baswe<C, F, R>
where
    C: TrainableClassifier<F>,
    F: Float,
{
    fn predict_votes(&self, records: ArrayView1<F>) -> Array1<F> {
        self.ensemble.predict_votes(records)
    }
}
