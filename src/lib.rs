//! `baswe` is an online ensemble for binary classification of imbalanced data streams
//! subject to concept drift.
//!
//! ## The Big Picture
//!
//! Instances arrive one at a time. Every instance is kept in a bounded sliding window of its
//! class and collected into the current chunk. Once a chunk is complete, the minority window
//! is oversampled and both windows are interleaved into a balanced training set. On this set
//! the component classifiers continue to learn with online bagging, are scored by their
//! balanced accuracy, and the weakest member is replaced whenever a freshly trained candidate
//! beats it. Predictions combine the normalized member votes weighted by the member scores.
//!
//! The component classifiers are pluggable: any model implementing
//! [`TrainableClassifier`](traits::TrainableClassifier) can be used. `baswe-bayes` provides an
//! incremental Gaussian Naive Bayes.
//!
//! ## Example
//!
//! ```no_run
//! use baswe::prelude::*;
//! use baswe_bayes::GaussianNb;
//! use baswe_datasets::generate::ImbalancedStream;
//! use ndarray::array;
//! use rand::SeedableRng;
//! use rand_xoshiro::Xoshiro256Plus;
//!
//! let rng = Xoshiro256Plus::seed_from_u64(42);
//! let stream = ImbalancedStream::new(array![[0., 0.], [3., 3.]], rng).minority_ratio(0.1);
//!
//! let mut model = BasweParams::new(GaussianNb::params().build()?)
//!     .ensemble_size(10)
//!     .chunk_size(500)
//!     .build()?;
//!
//! for instance in stream.take(10_000) {
//!     let _label = model.predict_label(instance.records());
//!     match model.on_instance(instance) {
//!         Ok(Some(report)) => println!("{:?}", report),
//!         Ok(None) | Err(Error::ImbalancedWindows { .. }) => {}
//!         Err(err) => return Err(err.into()),
//!     }
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod dataset;
pub mod ensemble;
pub mod error;
mod metrics_classification;
mod param_guard;
pub mod prelude;
pub mod traits;

pub use dataset::{Float, Instance};
pub use error::{Error, Result};
pub use param_guard::ParamGuard;

/// Common metrics functions for classification
pub mod metrics {
    pub use crate::metrics_classification::{ConfusionMatrix, ToConfusionMatrix};
}
