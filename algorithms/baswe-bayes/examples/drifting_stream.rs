use baswe::prelude::*;
use baswe_bayes::{GaussianNb, Result};
use baswe_datasets::generate::ImbalancedStream;
use ndarray::array;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256Plus;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Set `RUST_LOG=baswe=debug` to follow every chunk cycle
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // A stream with 5% minority instances whose classes swap places halfway through
    let rng = Xoshiro256Plus::seed_from_u64(42);
    let stream = ImbalancedStream::new(array![[0., 0., 0.], [2., 2., 0.]], rng)
        .minority_ratio(0.05)
        .drift_at(20_000, array![[2., 2., 0.], [0., 0., 0.]]);

    let mut model = BasweParams::new(GaussianNb::params().build()?)
        .ensemble_size(10)
        .new_member_count(2)
        .chunk_size(1000)
        .build()?;

    // Prequential evaluation: every instance is predicted before it is learned
    let mut cm = ConfusionMatrix::new();
    for instance in stream.take(40_000) {
        cm.add(model.predict_label(instance.records()), instance.target());

        match model.on_instance(instance) {
            Ok(Some(report)) if report.cycle % 5 == 0 => println!(
                "cycle {:>3}: chunk {:?}, replaced {}, running balanced accuracy {:.4}",
                report.cycle,
                report.chunk_class_counts,
                report.replaced,
                cm.balanced_accuracy::<f64>()
            ),
            Ok(_) => {}
            // too few instances of a class seen yet, the chunk is dropped
            Err(Error::ImbalancedWindows { .. }) => {}
            Err(err) => return Err(err.into()),
        }
    }

    // classes    | 0          | 1
    // 0          | ...        | ...
    // 1          | ...        | ...
    println!("{:?}", cm);
    println!(
        "accuracy {:.4}, balanced accuracy {:.4}",
        cm.accuracy::<f64>(),
        cm.balanced_accuracy::<f64>()
    );

    Ok(())
}
