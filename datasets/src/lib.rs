//! `baswe-datasets` provides synthetic data streams ready to be used in tests, benchmarks and
//! examples of the [`baswe`](https://docs.rs/baswe) ensemble.
//!
//! ## Current State
//!
//! Currently the following generators are provided:
//!
//! * [`generate::ImbalancedStream`]: an endless, skewed binary stream with an optional abrupt
//!   concept drift
//! * [`generate::labelled_blobs`]: a finite, labelled sample around class centroids, e.g. for
//!   held-out evaluation
//!
//! ## Using a generator
//!
//! ```
//! use baswe_datasets::generate::ImbalancedStream;
//! use ndarray::array;
//! use rand::SeedableRng;
//! use rand_xoshiro::Xoshiro256Plus;
//!
//! let rng = Xoshiro256Plus::seed_from_u64(42);
//! let stream = ImbalancedStream::new(array![[0., 0.], [3., 3.]], rng)
//!     .minority_ratio(0.05)
//!     .drift_at(1000, array![[3., 3.], [0., 0.]]);
//!
//! let minority = stream.take(2000).filter(|x| x.target() == 1).count();
//! assert!(minority < 400);
//! ```

pub mod generate;
