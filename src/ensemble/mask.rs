use ndarray::{Array1, ArrayView1, Zip};
use rand::seq::index;
use rand::Rng;

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

use crate::dataset::{Float, Instance};

/// Subset of features an ensemble member is allowed to see
///
/// Features outside of the mask are set to zero before the member trains on or predicts a
/// record. A mask is drawn once when its member is created and never changes afterwards.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureMask {
    used: Array1<bool>,
}

impl FeatureMask {
    /// Draw a random mask
    ///
    /// The number of selected features is uniform in `1..=nfeatures`, the selected indices are
    /// drawn uniformly without replacement.
    pub fn random<R: Rng>(nfeatures: usize, rng: &mut R) -> Self {
        let mut used = Array1::from_elem(nfeatures, false);
        if nfeatures == 0 {
            return FeatureMask { used };
        }

        let nselected = rng.gen_range(1..=nfeatures);
        for idx in index::sample(rng, nfeatures, nselected) {
            used[idx] = true;
        }

        FeatureMask { used }
    }

    /// A mask selecting every feature
    pub fn full(nfeatures: usize) -> Self {
        FeatureMask {
            used: Array1::from_elem(nfeatures, true),
        }
    }

    pub fn from_vec(used: Vec<bool>) -> Self {
        FeatureMask {
            used: Array1::from(used),
        }
    }

    pub fn nfeatures(&self) -> usize {
        self.used.len()
    }

    /// Number of selected features
    pub fn nselected(&self) -> usize {
        self.used.iter().filter(|x| **x).count()
    }

    pub fn is_selected(&self, feature: usize) -> bool {
        self.used.get(feature).copied().unwrap_or(false)
    }

    /// Copy the record with every unselected feature set to zero
    ///
    /// # Panics
    ///
    /// If the record length differs from the mask length.
    pub fn apply<F: Float>(&self, records: ArrayView1<F>) -> Array1<F> {
        Zip::from(&records)
            .and(&self.used)
            .map_collect(|x, used| if *used { *x } else { F::zero() })
    }

    /// Copy the instance with every unselected feature set to zero
    pub fn apply_instance<F: Float>(&self, instance: &Instance<F>) -> Instance<F> {
        Instance::new(self.apply(instance.records()), instance.target())
            .with_weight(instance.weight())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256Plus;

    #[test]
    fn random_masks_select_at_least_one_feature() {
        let mut rng = Xoshiro256Plus::seed_from_u64(42);
        for nfeatures in 1..20 {
            for _ in 0..50 {
                let mask = FeatureMask::random(nfeatures, &mut rng);
                assert_eq!(mask.nfeatures(), nfeatures);
                assert!((1..=nfeatures).contains(&mask.nselected()));
            }
        }
    }

    #[test]
    fn random_masks_cover_all_sizes() {
        let mut rng = Xoshiro256Plus::seed_from_u64(42);
        let mut seen = [false; 4];
        for _ in 0..500 {
            seen[FeatureMask::random(4, &mut rng).nselected() - 1] = true;
        }
        assert!(seen.iter().all(|x| *x));
    }

    #[test]
    fn empty_feature_space() {
        let mut rng = Xoshiro256Plus::seed_from_u64(42);
        let mask = FeatureMask::random(0, &mut rng);
        assert_eq!(mask.nselected(), 0);
    }

    #[test]
    fn apply_zeroes_unselected_features() {
        let mask = FeatureMask::from_vec(vec![true, false, true]);
        let instance = Instance::new(array![1.0, 2.0, 3.0], 1).with_weight(2.0);
        let masked = mask.apply_instance(&instance);

        assert_eq!(masked.records(), array![1.0, 0.0, 3.0]);
        assert_eq!(masked.target(), 1);
        assert_eq!(masked.weight(), 2.0);
        assert!(mask.is_selected(0) && !mask.is_selected(1) && !mask.is_selected(5));
        assert_eq!(FeatureMask::full(3).apply(instance.records()), instance.records());
    }
}
