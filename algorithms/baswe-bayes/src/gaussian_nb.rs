use baswe::traits::{PredictVotes, TrainableClassifier};
use baswe::{Float, Instance};
use ndarray::{Array1, ArrayView1, Zip};

use crate::hyperparams::{GaussianNbParams, GaussianNbValidParams};

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

/// Incremental Gaussian Naive Bayes classifier
///
/// See [GaussianNbParams] for more information on the hyper-parameters.
///
/// # Model assumptions
///
/// The family of Naive Bayes classifiers assume independence between variables. They do not model
/// moments between variables and lack therefore in modelling capability. The advantage is a
/// constant time update per instance, which makes them a cheap base learner for an ensemble.
///
/// # Weighted updates
///
/// Each class keeps the total weight it has seen together with a weighted running mean and sum
/// of squared differences per feature. Training on an instance of weight `k` is equivalent to
/// training on `k` copies of it. Instances with a non-positive weight are ignored.
///
/// # Votes
///
/// The votes are the posterior probabilities of all classes seen so far, indexed by label.
/// Classes without data vote zero, an untrained model votes all zeros.
///
/// ```rust
/// use baswe::prelude::*;
/// use baswe_bayes::{GaussianNb, Result};
/// use ndarray::array;
///
/// let mut model = GaussianNb::params().build()?;
/// assert_eq!(model.predict_votes(array![0., 0.].view()).sum(), 0.);
///
/// for (x, y) in [([-2., -1.], 0), ([-1., -1.], 0), ([1., 1.], 1), ([2., 1.], 1)] {
///     model.train(&Instance::new(array![x[0], x[1]], y));
/// }
///
/// let votes = model.predict_votes(array![1.5, 1.].view());
/// assert!(votes[1] > 0.99);
/// # Result::Ok(())
/// ```
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Debug, Clone, PartialEq)]
pub struct GaussianNb<F> {
    params: GaussianNbValidParams<F>,
    class_info: Vec<GaussianClassInfo<F>>,
}

#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Debug, Clone, PartialEq)]
struct GaussianClassInfo<F> {
    weight: F,
    theta: Array1<F>,
    // weighted sum of squared differences from the mean
    ssd: Array1<F>,
}

impl<F: Float> GaussianClassInfo<F> {
    fn empty() -> Self {
        GaussianClassInfo {
            weight: F::zero(),
            theta: Array1::zeros(0),
            ssd: Array1::zeros(0),
        }
    }

    fn is_empty(&self) -> bool {
        self.weight <= F::zero()
    }

    // Weighted online update of mean and sum of squared differences (West, 1979)
    fn update(&mut self, x: ArrayView1<F>, weight: F) {
        if self.is_empty() {
            self.weight = weight;
            self.theta = x.to_owned();
            self.ssd = Array1::zeros(x.len());
            return;
        }

        assert_eq!(
            self.theta.len(),
            x.len(),
            "Number of data features must match the number of features the model was trained with."
        );

        let weight_total = self.weight + weight;
        let ratio = weight / weight_total;
        Zip::from(&mut self.theta)
            .and(&mut self.ssd)
            .and(&x)
            .for_each(|theta, ssd, &x| {
                let delta = x - *theta;
                *theta += delta * ratio;
                *ssd += weight * delta * (x - *theta);
            });
        self.weight = weight_total;
    }

    fn variance(&self) -> Array1<F> {
        self.ssd.mapv(|x| x / self.weight)
    }
}

impl<F: Float> GaussianNb<F> {
    /// Construct a new set of hyperparameters
    pub fn params() -> GaussianNbParams<F> {
        GaussianNbParams::new()
    }

    pub(crate) fn new(params: GaussianNbValidParams<F>) -> Self {
        GaussianNb {
            params,
            class_info: Vec::new(),
        }
    }

    /// Whether the model has seen any data
    pub fn is_trained(&self) -> bool {
        self.class_info.iter().any(|info| !info.is_empty())
    }

    /// Total weight seen per class label
    pub fn class_weights(&self) -> Array1<F> {
        self.class_info.iter().map(|info| info.weight).collect()
    }

    /// Running mean of the features of `class`, if the class has been seen
    pub fn theta(&self, class: usize) -> Option<ArrayView1<F>> {
        self.class_info
            .get(class)
            .filter(|info| !info.is_empty())
            .map(|info| info.theta.view())
    }

    /// Unsmoothed variance of the features of `class`, if the class has been seen
    pub fn variance(&self, class: usize) -> Option<Array1<F>> {
        self.class_info
            .get(class)
            .filter(|info| !info.is_empty())
            .map(GaussianClassInfo::variance)
    }

    // If the ratio of the variance between dimensions is too small, it will cause
    // numerical errors. We address this by artificially boosting the variance
    // by `epsilon` (a small fraction of the variance of the largest feature)
    fn epsilon(&self) -> F {
        let max_var = self
            .class_info
            .iter()
            .filter(|info| !info.is_empty())
            .flat_map(|info| info.variance().to_vec())
            .fold(F::zero(), F::max);

        let epsilon = if max_var > F::zero() {
            self.params.var_smoothing() * max_var
        } else {
            self.params.var_smoothing()
        };

        epsilon.max(F::epsilon())
    }

    /// Compute unnormalized posterior log probability
    ///
    /// Classes which have not been seen get negative infinity.
    pub fn joint_log_likelihood(&self, x: ArrayView1<F>) -> Array1<F> {
        let epsilon = self.epsilon();
        let total = self.class_info.iter().map(|info| info.weight).sum::<F>();

        self.class_info
            .iter()
            .map(|info| {
                if info.is_empty() {
                    return F::neg_infinity();
                }

                let sigma = info.variance().mapv(|x| x + epsilon);
                let prior = info.weight / total;

                let nij = sigma
                    .mapv(|x| (F::cast(2. * std::f64::consts::PI) * x).ln())
                    .sum();
                let dist = Zip::from(&x)
                    .and(&info.theta)
                    .and(&sigma)
                    .fold(F::zero(), |acc, &x, &theta, &sigma| {
                        acc + (x - theta).powi(2) / sigma
                    });

                prior.ln() - F::cast(0.5) * nij - F::cast(0.5) * dist
            })
            .collect()
    }
}

impl<F: Float> PredictVotes<F> for GaussianNb<F> {
    fn predict_votes(&self, records: ArrayView1<F>) -> Array1<F> {
        if !self.is_trained() {
            return Array1::zeros(self.class_info.len());
        }

        let jll = self.joint_log_likelihood(records);
        let max = jll.fold(F::neg_infinity(), |a, &b| a.max(b));
        if !max.is_finite() {
            return Array1::zeros(jll.len());
        }

        // log-sum-exp normalization
        let mut votes = jll.mapv(|x| (x - max).exp());
        let total = votes.sum();
        votes.mapv_inplace(|x| x / total);
        votes
    }
}

impl<F: Float> TrainableClassifier<F> for GaussianNb<F> {
    fn train(&mut self, instance: &Instance<F>) {
        let weight = instance.weight();
        if !(weight > F::zero()) || !weight.is_finite() {
            return;
        }

        let target = instance.target();
        if self.class_info.len() <= target {
            self.class_info
                .resize_with(target + 1, GaussianClassInfo::empty);
        }
        self.class_info[target].update(instance.records(), weight);
    }

    fn clone_untrained(&self) -> Self {
        GaussianNb::new(self.params)
    }
}

#[cfg(test)]
mod tests {
    use super::{GaussianClassInfo, GaussianNb};
    use crate::{GaussianNbParams, GaussianNbValidParams, NaiveBayesError, Result};
    use approx::assert_abs_diff_eq;
    use baswe::prelude::*;
    use ndarray::{array, Array1, Array2};

    fn train_all(model: &mut GaussianNb<f64>, x: &Array2<f64>, y: &[usize]) {
        for (row, &target) in x.rows().into_iter().zip(y) {
            model.train(&Instance::new(row.to_owned(), target));
        }
    }

    #[test]
    fn autotraits() {
        fn has_autotraits<T: Send + Sync + Sized + Unpin>() {}
        has_autotraits::<GaussianNb<f64>>();
        has_autotraits::<GaussianClassInfo<f64>>();
        has_autotraits::<GaussianNbParams<f64>>();
        has_autotraits::<GaussianNbValidParams<f64>>();
        has_autotraits::<NaiveBayesError>();
    }

    #[test]
    fn test_gaussian_nb() -> Result<()> {
        let x = array![
            [-2., -1.],
            [-1., -1.],
            [-1., -2.],
            [1., 1.],
            [1., 2.],
            [2., 1.]
        ];
        let y = [0, 0, 0, 1, 1, 1];

        let mut model = GaussianNb::params().build()?;
        train_all(&mut model, &x, &y);

        let pred: Vec<usize> = x
            .rows()
            .into_iter()
            .map(|row| model.predict_label(row))
            .collect();
        assert_eq!(pred, y.to_vec());

        let expected = array![
            [-2.276946847943017, -38.27694652394301],
            [-1.5269468546930165, -25.52694663869301],
            [-2.276946847943017, -38.27694652394301],
            [-25.52694663869301, -1.5269468546930165],
            [-38.27694652394301, -2.276946847943017],
            [-25.52694663869301, -1.5269468546930165]
        ];
        for (row, expected) in x.rows().into_iter().zip(expected.rows()) {
            assert_abs_diff_eq!(model.joint_log_likelihood(row), expected, epsilon = 1e-6);
        }

        assert_abs_diff_eq!(
            model.theta(0).unwrap(),
            array![-4. / 3., -4. / 3.],
            epsilon = 1e-12
        );
        assert_abs_diff_eq!(
            model.variance(1).unwrap(),
            array![2. / 9., 2. / 9.],
            epsilon = 1e-12
        );

        Ok(())
    }

    #[test]
    fn weight_counts_as_repetition() -> Result<()> {
        let mut weighted = GaussianNb::params().build()?;
        let mut repeated = GaussianNb::params().build()?;

        let samples = [
            (array![0.5, 1.0], 0, 3.0),
            (array![1.5, -1.0], 0, 1.0),
            (array![4.0, 2.0], 1, 2.0),
            (array![3.0, 2.5], 1, 1.0),
        ];
        for (x, y, w) in samples.iter() {
            weighted.train(&Instance::new(x.clone(), *y).with_weight(*w));
            for _ in 0..(*w as usize) {
                repeated.train(&Instance::new(x.clone(), *y));
            }
        }

        assert_abs_diff_eq!(weighted.class_weights(), array![4.0, 3.0]);
        for class in 0..2 {
            assert_abs_diff_eq!(
                weighted.theta(class).unwrap(),
                repeated.theta(class).unwrap(),
                epsilon = 1e-12
            );
            assert_abs_diff_eq!(
                weighted.variance(class).unwrap(),
                repeated.variance(class).unwrap(),
                epsilon = 1e-12
            );
        }
        assert_abs_diff_eq!(
            weighted.predict_votes(array![2.0, 1.0].view()),
            repeated.predict_votes(array![2.0, 1.0].view()),
            epsilon = 1e-12
        );

        Ok(())
    }

    #[test]
    fn untrained_model_has_no_opinion() -> Result<()> {
        let mut model = GaussianNb::<f64>::params().build()?;
        assert!(!model.is_trained());
        assert_eq!(model.predict_votes(array![1.0].view()), Array1::zeros(0));

        // zero weights are ignored
        model.train(&Instance::new(array![1.0], 1).with_weight(0.0));
        assert!(!model.is_trained());
        assert_eq!(model.predict_votes(array![1.0].view()), Array1::zeros(2));

        Ok(())
    }

    #[test]
    fn unseen_classes_vote_zero() -> Result<()> {
        let mut model = GaussianNb::params().build()?;
        model.train(&Instance::new(array![1.0, 1.0], 1));
        model.train(&Instance::new(array![1.0, 1.0], 1));

        // constant features still give finite likelihoods
        let votes = model.predict_votes(array![1.0, 1.0].view());
        assert_abs_diff_eq!(votes, array![0.0, 1.0]);
        assert_eq!(model.predict_label(array![-5.0, 3.0].view()), 1);

        Ok(())
    }

    #[test]
    fn clone_untrained_keeps_params() -> Result<()> {
        let mut model = GaussianNb::params().var_smoothing(1e-3).build()?;
        model.train(&Instance::new(array![1.0], 0));

        let fresh = model.clone_untrained();
        assert!(!fresh.is_trained());
        assert_eq!(fresh, GaussianNb::params().var_smoothing(1e-3).build()?);

        Ok(())
    }

    #[test]
    fn votes_are_probabilities() -> Result<()> {
        let mut model = GaussianNb::params().build()?;
        train_all(
            &mut model,
            &array![[0.0], [0.2], [-0.1], [2.0], [2.3], [1.9]],
            &[0, 0, 0, 1, 1, 1],
        );

        for x in [-3.0, 0.0, 1.0, 2.0, 40.0] {
            let votes = model.predict_votes(array![x].view());
            assert_abs_diff_eq!(votes.sum(), 1.0, epsilon = 1e-12);
            assert!(votes.iter().all(|v| (0.0..=1.0).contains(v)));
        }

        Ok(())
    }
}
