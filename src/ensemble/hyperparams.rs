use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256Plus;

use crate::{
    error::{Error, Result},
    ParamGuard,
};

/// A verified hyper-parameter set ready for building a [`Baswe`](crate::ensemble::Baswe) model
///
/// See [`BasweParams`] for more information.
#[derive(Clone, Debug, PartialEq)]
pub struct BasweValidParams<C, R> {
    /// The number of component classifiers in the ensemble
    pub(crate) ensemble_size: usize,
    /// The number of candidate classifiers generated per chunk
    pub(crate) new_member_count: usize,
    /// The number of instances collected before a training cycle is triggered
    pub(crate) chunk_size: usize,
    /// Train and evaluate members on the rayon thread pool
    pub(crate) parallel: bool,
    /// Untrained prototype of the component classifiers
    pub(crate) base_learner: C,
    pub(crate) rng: R,
}

impl<C, R> BasweValidParams<C, R> {
    pub fn ensemble_size(&self) -> usize {
        self.ensemble_size
    }

    pub fn new_member_count(&self) -> usize {
        self.new_member_count
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn parallel(&self) -> bool {
        self.parallel
    }

    pub fn base_learner(&self) -> &C {
        &self.base_learner
    }

    pub fn rng(&self) -> &R {
        &self.rng
    }
}

/// A hyper-parameter set during construction
///
/// The parameter set can be verified into a [`BasweValidParams`] by calling
/// [ParamGuard::check](Self::check). It is also possible to directly build a model with
/// [`build`](Self::build), which verifies the parameter set first and forwards any error.
///
/// # Parameters
///
/// | Name | Default | Purpose | Range |
/// | :--- | :--- | :---| :--- |
/// | [ensemble_size](Self::ensemble_size) | `10` | Number of component classifiers | `[1, inf)` |
/// | [new_member_count](Self::new_member_count) | `1` | Candidates generated per chunk | `[1, inf)` |
/// | [chunk_size](Self::chunk_size) | `1000` | Instances per training cycle | `[1, inf)` |
/// | [parallel](Self::parallel) | `true` | Train members on the rayon thread pool | |
///
/// # Errors
///
/// Returns [`Error::Parameters`] if any of the counts is zero.
#[derive(Clone, Debug, PartialEq)]
pub struct BasweParams<C, R>(BasweValidParams<C, R>);

impl<C> BasweParams<C, Xoshiro256Plus> {
    /// Create default hyperparameters around an untrained base learner
    pub fn new(base_learner: C) -> Self {
        Self::new_fixed_rng(base_learner, Xoshiro256Plus::seed_from_u64(42))
    }
}

impl<C, R: Rng + Clone> BasweParams<C, R> {
    /// Create default hyperparameters with a pre-defined random number generator
    pub fn new_fixed_rng(base_learner: C, rng: R) -> Self {
        Self(BasweValidParams {
            ensemble_size: 10,
            new_member_count: 1,
            chunk_size: 1000,
            parallel: true,
            base_learner,
            rng,
        })
    }

    /// Set the number of component classifiers.
    ///
    /// Defaults to `10` if not set
    pub fn ensemble_size(mut self, ensemble_size: usize) -> Self {
        self.0.ensemble_size = ensemble_size;
        self
    }

    /// Set the number of candidate classifiers trained after every chunk.
    ///
    /// Defaults to `1` if not set
    pub fn new_member_count(mut self, new_member_count: usize) -> Self {
        self.0.new_member_count = new_member_count;
        self
    }

    /// Set the chunk size. The class windows hold `chunk_size / 2` instances each.
    ///
    /// Defaults to `1000` if not set
    pub fn chunk_size(mut self, chunk_size: usize) -> Self {
        self.0.chunk_size = chunk_size;
        self
    }

    /// Enable or disable training on the rayon thread pool.
    ///
    /// Defaults to `true` if not set
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.0.parallel = parallel;
        self
    }

    /// Set the random number generator.
    ///
    /// Defaults to `Xoshiro256Plus` seeded with `42`
    pub fn rng(mut self, rng: R) -> Self {
        self.0.rng = rng;
        self
    }
}

impl<C, R> ParamGuard for BasweParams<C, R> {
    type Checked = BasweValidParams<C, R>;
    type Error = Error;

    fn check_ref(&self) -> Result<&Self::Checked> {
        if self.0.ensemble_size < 1 {
            Err(Error::Parameters(format!(
                "Ensemble size should be at least one, but was {}",
                self.0.ensemble_size
            )))
        } else if self.0.new_member_count < 1 {
            Err(Error::Parameters(format!(
                "Number of new members should be at least one, but was {}",
                self.0.new_member_count
            )))
        } else if self.0.chunk_size < 1 {
            Err(Error::Parameters(format!(
                "Chunk size should be at least one, but was {}",
                self.0.chunk_size
            )))
        } else {
            Ok(&self.0)
        }
    }

    fn check(self) -> Result<Self::Checked> {
        self.check_ref()?;
        Ok(self.0)
    }
}
