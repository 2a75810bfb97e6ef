//! Balanced accuracy-based sliding window ensemble
//!
//! The ensemble keeps a fixed number of component classifiers, each restricted to a random
//! subset of the features. After every chunk of the stream the members continue training on a
//! balanced training set, are rescored by their balanced accuracy and the weakest member is
//! challenged by freshly trained candidates.
mod algorithm;
mod hyperparams;
mod mask;
mod member;
mod pool;
mod predict;

pub use algorithm::{Baswe, CycleReport};
pub use hyperparams::{BasweParams, BasweValidParams};
pub use mask::FeatureMask;
pub use member::{fitness, EnsembleMember};
pub use pool::Ensemble;
pub use predict::EnsembleReader;
