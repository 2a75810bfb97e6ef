//! # Naive Bayes
//!
//! `baswe-bayes` provides an incremental Gaussian Naive Bayes classifier which can be used as
//! a component classifier of the [`baswe`](https://docs.rs/baswe) ensemble.
//!
//! ## The Big Picture
//!
//! The ensemble trains its members one weighted instance at a time and never restarts them.
//! [`GaussianNb`] keeps a weighted running mean and variance per class, so each update is
//! constant time and an instance of weight `k` counts exactly like `k` copies of it.
//!
//! ## Current state
//!
//! `baswe-bayes` currently provides an implementation of the following methods:
//!
//! - Gaussian Naive Bayes ([`GaussianNb`])

mod error;
mod gaussian_nb;
mod hyperparams;

pub use error::{NaiveBayesError, Result};
pub use gaussian_nb::GaussianNb;
pub use hyperparams::{GaussianNbParams, GaussianNbValidParams};
