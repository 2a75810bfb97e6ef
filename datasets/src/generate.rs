//! Utility functions for randomly generating data streams

use baswe::Instance;
use ndarray::{s, Array, Array1, Array2, ArrayBase, Data, Ix1, Ix2};
use ndarray_rand::{
    rand::Rng,
    rand_distr::{Distribution, StandardNormal},
    RandomExt,
};

/// Special case of `blobs_with_distribution` with a standard normal distribution.
pub fn blobs(
    blob_size: usize,
    blob_centroids: &ArrayBase<impl Data<Elem = f64>, Ix2>,
    rng: &mut impl Rng,
) -> Array2<f64> {
    blobs_with_distribution(blob_size, blob_centroids, StandardNormal, rng)
}

/// Given an input matrix `blob_centroids`, with shape `(n_blobs, n_features)`,
/// generate `blob_size` data points (a "blob") around each of the blob centroids.
///
/// Each blob is formed by `blob_size` points sampled from a distribution centered in the blob
/// centroid. The blobs are stacked in the order of the centroids.
pub fn blobs_with_distribution(
    blob_size: usize,
    blob_centroids: &ArrayBase<impl Data<Elem = f64>, Ix2>,
    distribution: impl Distribution<f64> + Clone,
    rng: &mut impl Rng,
) -> Array2<f64> {
    let (n_centroids, n_features) = blob_centroids.dim();
    let mut blobs: Array2<f64> = Array2::zeros((n_centroids * blob_size, n_features));

    for (blob_index, blob_centroid) in blob_centroids.rows().into_iter().enumerate() {
        let blob = make_blob(blob_size, &blob_centroid, distribution.clone(), rng);

        let indexes = s![blob_index * blob_size..(blob_index + 1) * blob_size, ..];
        blobs.slice_mut(indexes).assign(&blob);
    }
    blobs
}

/// Generate `blob_size` data points (a "blob") around `blob_centroid` using the given distribution.
fn make_blob(
    blob_size: usize,
    blob_centroid: &ArrayBase<impl Data<Elem = f64>, Ix1>,
    distribution: impl Distribution<f64>,
    rng: &mut impl Rng,
) -> Array2<f64> {
    let shape = (blob_size, blob_centroid.len());
    let origin_blob: Array2<f64> = Array::random_using(shape, distribution, rng);
    origin_blob + blob_centroid
}

/// Generate `class_size` labelled instances around each of the two class centroids
///
/// Row `i` of `class_centroids` is the centroid of class `i`. The instances of class `0` come
/// first, followed by the instances of class `1`.
///
/// # Panics
///
/// If `class_centroids` does not have exactly two rows.
pub fn labelled_blobs(
    class_size: usize,
    class_centroids: &ArrayBase<impl Data<Elem = f64>, Ix2>,
    rng: &mut impl Rng,
) -> Vec<Instance<f64>> {
    assert_eq!(class_centroids.nrows(), 2, "expected one centroid per class");

    blobs(class_size, class_centroids, rng)
        .rows()
        .into_iter()
        .enumerate()
        .map(|(i, row)| Instance::new(row.to_owned(), i / class_size.max(1)))
        .collect()
}

/// Endless stream of labelled instances with a skewed class distribution
///
/// Every instance is of class `1` (the minority) with probability `minority_ratio` and of class
/// `0` otherwise. Its features are drawn from a normal distribution with standard deviation
/// `spread` around the centroid of its class. After `drift_at` instances the centroids are
/// replaced at once, which models an abrupt concept drift.
///
/// # Parameters
///
/// | Name | Default | Purpose | Range |
/// | :--- | :--- | :---| :--- |
/// | [minority_ratio](Self::minority_ratio) | `0.1` | Probability of a minority instance | `[0, 1]` |
/// | [spread](Self::spread) | `1.0` | Standard deviation around the centroids | `[0, inf)` |
/// | [drift_at](Self::drift_at) | none | Position and centroids of a concept drift | |
#[derive(Debug, Clone)]
pub struct ImbalancedStream<R> {
    centroids: Array2<f64>,
    drift: Option<(usize, Array2<f64>)>,
    minority_ratio: f64,
    spread: f64,
    emitted: usize,
    rng: R,
}

impl<R: Rng> ImbalancedStream<R> {
    /// Create a stream around two class centroids of shape `(2, n_features)`
    ///
    /// # Panics
    ///
    /// If `centroids` does not have exactly two rows.
    pub fn new(centroids: Array2<f64>, rng: R) -> Self {
        assert_eq!(centroids.nrows(), 2, "expected one centroid per class");

        ImbalancedStream {
            centroids,
            drift: None,
            minority_ratio: 0.1,
            spread: 1.0,
            emitted: 0,
            rng,
        }
    }

    /// Set the probability of a minority instance, clamped to `[0, 1]`
    pub fn minority_ratio(mut self, minority_ratio: f64) -> Self {
        self.minority_ratio = minority_ratio.clamp(0.0, 1.0);
        self
    }

    /// Set the standard deviation of the features around their centroid
    pub fn spread(mut self, spread: f64) -> Self {
        self.spread = spread.abs();
        self
    }

    /// Switch to `centroids` after `position` instances have been emitted
    ///
    /// # Panics
    ///
    /// If the shape of `centroids` differs from the initial centroids.
    pub fn drift_at(mut self, position: usize, centroids: Array2<f64>) -> Self {
        assert_eq!(
            centroids.dim(),
            self.centroids.dim(),
            "drifted centroids must keep the shape of the initial centroids"
        );
        self.drift = Some((position, centroids));
        self
    }

    /// Number of instances emitted so far
    pub fn emitted(&self) -> usize {
        self.emitted
    }

    /// Whether the concept drift has already happened
    pub fn has_drifted(&self) -> bool {
        matches!(self.drift, Some((position, _)) if self.emitted >= position)
    }

    fn centroid(&self, class: usize) -> Array1<f64> {
        match &self.drift {
            Some((position, drifted)) if self.emitted >= *position => drifted.row(class).to_owned(),
            _ => self.centroids.row(class).to_owned(),
        }
    }
}

impl<R: Rng> Iterator for ImbalancedStream<R> {
    type Item = Instance<f64>;

    fn next(&mut self) -> Option<Self::Item> {
        let target = usize::from(self.rng.gen::<f64>() < self.minority_ratio);
        let centroid = self.centroid(target);

        let noise: Array1<f64> = Array::random_using(centroid.len(), StandardNormal, &mut self.rng);
        let records = centroid + noise * self.spread;

        self.emitted += 1;
        Some(Instance::new(records, target))
    }
}
