use std::sync::mpsc::Sender;
use std::time::Instant;

use tracing::{debug, info};

use crate::backprop::Backprop;
use crate::data::bucket::random_buckets;
use crate::data::dataset::SampleSource;
use crate::error::{NetworkError, Result};
use crate::math::GaussianRng;
use crate::train::epoch_stats::EpochStats;
use crate::train::train_config::TrainConfig;

/// Trains `backprop` for `config.epochs` epochs and returns the mean batch
/// cost of the last completed epoch.
///
/// Each epoch splits the samples into random buckets of `config.batch_size`
/// and takes one gradient step per bucket. Weight decay is scaled by the
/// size of the whole source, not the bucket.
///
/// If `progress` is given, one `EpochStats` is sent per epoch. Training stops
/// early once the receiving end has been dropped.
pub fn train_loop<S: SampleSource + ?Sized>(
    backprop: &mut Backprop,
    source: &S,
    config: &TrainConfig,
    rng: &mut GaussianRng,
    progress: Option<&Sender<EpochStats>>,
) -> Result<f64> {
    config.validate()?;
    if source.is_empty() {
        return Err(NetworkError::EmptyDataset);
    }

    let total = source.len();
    let mut last_cost = 0.0;

    for epoch in 1..=config.epochs {
        let started = Instant::now();
        let buckets = random_buckets(total, config.batch_size, rng);

        let mut cost_sum = 0.0;
        for (i, bucket) in buckets.iter().enumerate() {
            let batch = source.load(bucket)?;
            backprop.learn_once(&batch, config.learning_rate, total)?;
            let cost = backprop.cost(&batch)?;
            debug!(epoch, batch = i + 1, cost, "batch done");
            cost_sum += cost;
        }

        last_cost = cost_sum / buckets.len() as f64;
        let elapsed_ms = started.elapsed().as_millis() as u64;
        info!(
            epoch,
            total_epochs = config.epochs,
            cost = last_cost,
            elapsed_ms,
            "epoch complete"
        );

        if let Some(tx) = progress {
            let stats = EpochStats {
                epoch,
                total_epochs: config.epochs,
                batches: buckets.len(),
                mean_cost: last_cost,
                elapsed_ms,
            };
            if tx.send(stats).is_err() {
                info!(epoch, "progress receiver dropped, stopping");
                break;
            }
        }
    }

    Ok(last_cost)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cost::CostKind;
    use crate::data::dataset::LabeledDataset;
    use std::sync::mpsc;

    fn xor_like() -> LabeledDataset {
        LabeledDataset::from_pairs(
            vec![
                vec![0.0, 0.0],
                vec![0.0, 1.0],
                vec![1.0, 0.0],
                vec![1.0, 1.0],
            ],
            vec![vec![0.0], vec![1.0], vec![1.0], vec![1.0]],
        )
        .unwrap()
    }

    fn config(epochs: usize) -> TrainConfig {
        TrainConfig {
            image_width: 2,
            image_height: 1,
            hidden_layers: vec![4],
            output_labels: vec!["on".into()],
            cost: CostKind::CrossEntropy,
            regularization: 0.0,
            epochs,
            batch_size: 2,
            learning_rate: 1.0,
            ..TrainConfig::default()
        }
    }

    #[test]
    fn test_loop_reduces_cost() {
        let config = config(200);
        let data = xor_like();
        let mut rng = GaussianRng::seeded(5);
        let mut backprop = Backprop::new(
            &config.layer_sizes(),
            None,
            config.cost,
            config.regularization,
            &mut rng,
        )
        .unwrap();

        let before = backprop.cost(&data).unwrap();
        train_loop(&mut backprop, &data, &config, &mut rng, None).unwrap();
        let after = backprop.cost(&data).unwrap();
        assert!(after < before, "cost went from {before} to {after}");
    }

    #[test]
    fn test_progress_is_reported_per_epoch() {
        let config = config(3);
        let data = xor_like();
        let mut rng = GaussianRng::seeded(6);
        let mut backprop =
            Backprop::new(&config.layer_sizes(), None, config.cost, 0.0, &mut rng).unwrap();

        let (tx, rx) = mpsc::channel();
        train_loop(&mut backprop, &data, &config, &mut rng, Some(&tx)).unwrap();
        drop(tx);

        let stats: Vec<EpochStats> = rx.iter().collect();
        assert_eq!(stats.len(), 3);
        assert_eq!(stats[2].epoch, 3);
        assert!(stats.iter().all(|s| s.batches == 2 && s.total_epochs == 3));
    }

    #[test]
    fn test_dropped_receiver_stops_training() {
        let config = config(50);
        let data = xor_like();
        let mut rng = GaussianRng::seeded(7);
        let mut backprop =
            Backprop::new(&config.layer_sizes(), None, config.cost, 0.0, &mut rng).unwrap();

        let (tx, rx) = mpsc::channel();
        drop(rx);
        assert!(train_loop(&mut backprop, &data, &config, &mut rng, Some(&tx)).is_ok());
    }

    #[test]
    fn test_empty_source_is_rejected() {
        let config = config(1);
        let mut rng = GaussianRng::seeded(1);
        let mut backprop =
            Backprop::new(&config.layer_sizes(), None, config.cost, 0.0, &mut rng).unwrap();
        let result = train_loop(&mut backprop, &LabeledDataset::new(), &config, &mut rng, None);
        assert!(matches!(result, Err(NetworkError::EmptyDataset)));
    }
}
