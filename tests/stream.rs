use std::thread;

use baswe::prelude::*;
use baswe_bayes::GaussianNb;
use baswe_datasets::generate::{labelled_blobs, ImbalancedStream};
use ndarray::{array, Array2};
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256Plus;

type Model = Baswe<GaussianNb<f64>, f64, Xoshiro256Plus>;

fn model(ensemble_size: usize, new_member_count: usize, chunk_size: usize) -> Model {
    BasweParams::new(GaussianNb::params().build().unwrap())
        .ensemble_size(ensemble_size)
        .new_member_count(new_member_count)
        .chunk_size(chunk_size)
        .build()
        .unwrap()
}

/// Feed instances and collect the reports of all completed cycles
fn feed(model: &mut Model, stream: impl Iterator<Item = Instance<f64>>) -> Vec<CycleReport> {
    let mut reports = Vec::new();
    for instance in stream {
        match model.on_instance(instance) {
            Ok(Some(report)) => reports.push(report),
            Ok(None) | Err(Error::ImbalancedWindows { .. }) => {}
            Err(err) => panic!("unexpected error {}", err),
        }
    }
    reports
}

fn balanced_accuracy(model: &impl PredictVotes<f64>, centroids: &Array2<f64>, seed: u64) -> f64 {
    let mut rng = Xoshiro256Plus::seed_from_u64(seed);
    let held_out = labelled_blobs(200, centroids, &mut rng);

    let predicted: Vec<usize> = held_out
        .iter()
        .map(|x| model.predict_label(x.records()))
        .collect();
    let truth: Vec<usize> = held_out.iter().map(Instance::target).collect();

    predicted
        .confusion_matrix(&truth)
        .unwrap()
        .balanced_accuracy()
}

#[test]
fn separable_stream_is_learned() {
    let centroids = array![[0., 0.], [4., 4.]];
    let stream = ImbalancedStream::new(centroids.clone(), Xoshiro256Plus::seed_from_u64(1))
        .minority_ratio(0.1);

    let mut model = model(5, 1, 500);
    let reports = feed(&mut model, stream.take(5000));

    assert_eq!(reports.len(), 10);
    assert_eq!(model.members().len(), 5);
    for report in &reports {
        assert_eq!(report.balanced_class_counts, [250, 250]);
    }
    assert!(model.scores().iter().all(|s| s.map_or(false, |s| s > 0.8)));
    assert!(balanced_accuracy(&model, &centroids, 2) > 0.8);
}

#[test]
fn ensemble_recovers_from_drift() {
    let before = array![[0., 0.], [4., 4.]];
    let after = array![[4., 4.], [0., 0.]];
    let stream = ImbalancedStream::new(before, Xoshiro256Plus::seed_from_u64(5))
        .minority_ratio(0.2)
        .drift_at(3000, after.clone());

    let mut model = model(10, 3, 500);
    let reports = feed(&mut model, stream.take(15_000));

    assert_eq!(reports.len(), 30);
    let replaced: usize = reports[6..].iter().map(|r| r.replaced).sum();
    assert!(replaced > 0);
    assert_eq!(model.members().len(), 10);
    assert!(balanced_accuracy(&model, &after, 6) > 0.8);
}

#[test]
fn single_class_start_is_skipped() {
    let centroids = array![[0., 0.], [4., 4.]];
    let rng = Xoshiro256Plus::seed_from_u64(3);
    let majority_only = ImbalancedStream::new(centroids.clone(), rng).minority_ratio(0.0);

    let mut model = model(4, 1, 100);
    let mut errors = 0;
    for instance in majority_only.take(100) {
        match model.on_instance(instance) {
            Err(Error::ImbalancedWindows { first, second }) => {
                assert_eq!((first, second), (50, 0));
                errors += 1;
            }
            other => assert_eq!(other, Ok(None)),
        }
    }
    assert_eq!(errors, 1);
    assert!(model.members().is_empty());
    assert_eq!(model.chunk_len(), 0);

    let rng = Xoshiro256Plus::seed_from_u64(4);
    let mixed = ImbalancedStream::new(centroids, rng).minority_ratio(0.3);
    let reports = feed(&mut model, mixed.take(100));
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].cycle, 2);
    assert_eq!(model.members().len(), 4);
}

#[test]
fn parallel_and_sequential_training_agree() {
    let centroids = array![[0., 0., 1.], [2., 1., 0.]];
    let train = |parallel: bool| {
        let mut model = BasweParams::new(GaussianNb::params().build().unwrap())
            .ensemble_size(6)
            .new_member_count(2)
            .chunk_size(200)
            .parallel(parallel)
            .build()
            .unwrap();
        let stream = ImbalancedStream::new(centroids.clone(), Xoshiro256Plus::seed_from_u64(9))
            .minority_ratio(0.15);
        let reports = feed(&mut model, stream.take(2000));
        (model.scores(), reports)
    };

    assert_eq!(train(true), train(false));
}

#[test]
fn reader_predicts_from_other_threads() {
    let centroids = array![[0., 0.], [4., 4.]];
    let mut model = model(3, 1, 200);
    let reader = model.reader();

    let untrained = reader.clone();
    let votes = thread::spawn(move || untrained.predict_votes(array![4., 4.].view()))
        .join()
        .unwrap();
    assert_eq!(votes, array![0., 0.]);

    let rng = Xoshiro256Plus::seed_from_u64(11);
    let stream = ImbalancedStream::new(centroids, rng).minority_ratio(0.25);
    feed(&mut model, stream.take(1000));

    let label = thread::spawn(move || reader.predict_label(array![4., 4.].view()))
        .join()
        .unwrap();
    assert_eq!(label, 1);
}

#[test]
fn reset_restarts_the_stream() {
    let centroids = array![[0., 0.], [4., 4.]];
    let mut model = model(3, 1, 100);
    let rng = Xoshiro256Plus::seed_from_u64(2);
    let stream = ImbalancedStream::new(centroids, rng).minority_ratio(0.3);
    feed(&mut model, stream.take(250));
    assert_eq!(model.cycles(), 2);

    model.reset();
    assert_eq!(model.cycles(), 0);
    assert!(model.members().is_empty());
    assert_eq!(model.windows().lens(), [0, 0]);
    assert_eq!(model.chunk_len(), 0);
    assert_eq!(model.nfeatures(), None);

    // a different arity is accepted after a reset
    let rng = Xoshiro256Plus::seed_from_u64(2);
    let wide = ImbalancedStream::new(array![[0., 0., 0.], [4., 4., 4.]], rng).minority_ratio(0.3);
    let reports = feed(&mut model, wide.take(100));
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].cycle, 1);
    assert_eq!(model.nfeatures(), Some(3));
}
