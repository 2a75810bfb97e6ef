//! Common metrics for performance evaluation of binary classifiers
//!
//! The fitness of every ensemble member is its balanced accuracy on the balanced training set
//! of the current cycle, computed from a 2x2 confusion matrix.
use std::fmt;

use ndarray::prelude::*;

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

use crate::dataset::{Float, NCLASSES};
use crate::error::{Error, Result};

/// Confusion matrix for binary evaluation
///
/// Rows correspond to the predicted class and columns to the actual class, so that
/// `matrix[(predicted, actual)]` counts how often `actual` was predicted as `predicted`. The
/// diagonal entries are correct predictions.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, PartialEq, Eq)]
pub struct ConfusionMatrix {
    matrix: Array2<usize>,
}

impl Default for ConfusionMatrix {
    fn default() -> Self {
        ConfusionMatrix {
            matrix: Array2::zeros((NCLASSES, NCLASSES)),
        }
    }
}

impl ConfusionMatrix {
    /// Create an empty confusion matrix
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a single prediction
    ///
    /// # Panics
    ///
    /// If either label is not a valid class index.
    pub fn add(&mut self, predicted: usize, actual: usize) {
        self.matrix[(predicted, actual)] += 1;
    }

    pub fn get(&self, predicted: usize, actual: usize) -> usize {
        self.matrix[(predicted, actual)]
    }

    /// Total number of counted predictions
    pub fn total(&self) -> usize {
        self.matrix.sum()
    }

    /// `TP / (TP + FN)` with `TP = matrix[0][0]` and `FN = matrix[0][1]`
    pub fn true_positive_rate<F: Float>(&self) -> F {
        let tp = self.matrix[(0, 0)];
        let fn_ = self.matrix[(0, 1)];
        F::cast(tp) / F::cast(tp + fn_)
    }

    /// `TN / (TN + FP)` with `TN = matrix[1][1]` and `FP = matrix[1][0]`
    pub fn true_negative_rate<F: Float>(&self) -> F {
        let tn = self.matrix[(1, 1)];
        let fp = self.matrix[(1, 0)];
        F::cast(tn) / F::cast(tn + fp)
    }

    /// Mean of the true positive and true negative rate
    ///
    /// Returns `NaN` if one of the rates has a zero denominator. Callers have to treat such a
    /// result as undefined rather than as a low score.
    pub fn balanced_accuracy<F: Float>(&self) -> F {
        (self.true_positive_rate::<F>() + self.true_negative_rate::<F>()) / F::cast(2.0)
    }

    /// Return mean accuracy
    pub fn accuracy<F: Float>(&self) -> F {
        F::cast(self.matrix.diag().sum()) / F::cast(self.total())
    }
}

/// Print a confusion matrix
impl fmt::Debug for ConfusionMatrix {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let len = self.matrix.len_of(Axis(0));
        writeln!(f, "{}", "-".repeat(len * 4 + 1))?;

        for i in 0..len {
            write!(f, "| ")?;

            for j in 0..len {
                write!(f, "{} | ", self.matrix[(i, j)])?;
            }
            writeln!(f)?;
        }

        write!(f, "{}", "-".repeat(len * 4 + 1))
    }
}

/// Classification functions
///
/// Builds a confusion matrix from predicted labels and the ground truth.
pub trait ToConfusionMatrix {
    fn confusion_matrix(&self, ground_truth: &[usize]) -> Result<ConfusionMatrix>;
}

impl ToConfusionMatrix for [usize] {
    fn confusion_matrix(&self, ground_truth: &[usize]) -> Result<ConfusionMatrix> {
        if self.len() != ground_truth.len() {
            return Err(Error::MismatchedShapes(self.len(), ground_truth.len()));
        }

        let mut cm = ConfusionMatrix::new();
        for (&predicted, &actual) in self.iter().zip(ground_truth.iter()) {
            if predicted >= NCLASSES {
                return Err(Error::InvalidLabel(predicted));
            }
            if actual >= NCLASSES {
                return Err(Error::InvalidLabel(actual));
            }
            cm.add(predicted, actual);
        }

        Ok(cm)
    }
}

impl ToConfusionMatrix for Vec<usize> {
    fn confusion_matrix(&self, ground_truth: &[usize]) -> Result<ConfusionMatrix> {
        self.as_slice().confusion_matrix(ground_truth)
    }
}
