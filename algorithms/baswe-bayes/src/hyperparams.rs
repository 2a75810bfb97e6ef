use baswe::{Float, ParamGuard};

use crate::gaussian_nb::GaussianNb;
use crate::NaiveBayesError;

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

/// A verified hyper-parameter set ready for the construction of a Gaussian Naive Bayes model
///
/// See [`GaussianNbParams`](crate::GaussianNbParams) for more information.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaussianNbValidParams<F> {
    // Required for calculation stability
    var_smoothing: F,
}

impl<F: Float> GaussianNbValidParams<F> {
    /// Get the variance smoothing
    pub fn var_smoothing(&self) -> F {
        self.var_smoothing
    }

    /// Construct an untrained model
    pub fn build(&self) -> GaussianNb<F> {
        GaussianNb::new(*self)
    }
}

/// A hyper-parameter set during construction
///
/// The parameter set can be verified into a
/// [`GaussianNbValidParams`](crate::hyperparams::GaussianNbValidParams) by calling
/// [ParamGuard::check](Self::check). It is also possible to directly construct a model with
/// [`build`](Self::build) which implicitely verifies the parameter set and forwards any error.
///
/// # Parameters
/// | Name | Default | Purpose | Range |
/// | :--- | :--- | :---| :--- |
/// | [var_smoothing](Self::var_smoothing) | `1e-9` | Stabilize variance calculation if ratios are small | `[0, inf)` |
///
/// # Errors
///
/// Returns [`InvalidSmoothing`](NaiveBayesError::InvalidSmoothing) if the smoothing
/// parameter is negative or not finite.
///
/// # Example
///
/// ```rust
/// use baswe::prelude::*;
/// use baswe_bayes::{GaussianNb, Result};
/// use ndarray::array;
///
/// let mut model = GaussianNb::params().var_smoothing(1e-5).build()?;
///
/// model.train(&Instance::new(array![-1., -1.], 0));
/// model.train(&Instance::new(array![-2., -1.], 0));
/// model.train(&Instance::new(array![1., 1.], 1));
/// model.train(&Instance::new(array![2., 1.], 1).with_weight(2.));
///
/// assert_eq!(model.predict_label(array![-1.5, -0.5].view()), 0);
/// # Result::Ok(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaussianNbParams<F>(GaussianNbValidParams<F>);

impl<F: Float> Default for GaussianNbParams<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Float> GaussianNbParams<F> {
    /// Create new [GaussianNbParams] set with default values for its parameters
    pub fn new() -> Self {
        Self(GaussianNbValidParams {
            var_smoothing: F::cast(1e-9),
        })
    }

    /// Specifies the portion of the largest variance of all the features that
    /// is added to the variance for calculation stability
    pub fn var_smoothing(mut self, var_smoothing: F) -> Self {
        self.0.var_smoothing = var_smoothing;
        self
    }

    /// Check the parameters and construct an untrained model
    pub fn build(self) -> Result<GaussianNb<F>, NaiveBayesError> {
        Ok(self.check()?.build())
    }
}

impl<F: Float> ParamGuard for GaussianNbParams<F> {
    type Checked = GaussianNbValidParams<F>;
    type Error = NaiveBayesError;

    fn check_ref(&self) -> Result<&Self::Checked, Self::Error> {
        let var_smoothing = self.0.var_smoothing;
        if var_smoothing < F::zero() || !var_smoothing.is_finite() {
            Err(NaiveBayesError::InvalidSmoothing(
                var_smoothing.to_f64().unwrap_or(f64::NAN),
            ))
        } else {
            Ok(&self.0)
        }
    }

    fn check(self) -> Result<Self::Checked, Self::Error> {
        self.check_ref()?;
        Ok(self.0)
    }
}
