use log::{debug, info, trace};
use machine_learning::{
    MlErr, Params,
    dataset::DatasetProvider,
    distance::wasserstein_1d,
    init::{init_params, rng_from_seed},
    loss::WassersteinLoss,
    optimization::{Optimizer, SignDescent},
    oracle::{Critic, Generator},
};
use rand::{Rng, seq::SliceRandom};

use crate::{
    configs::TrainingConfig,
    error::OrchestratorError,
    history::{EpochMetrics, MetricsHistory},
};

/// The outcome of a finished run.
#[derive(Debug, Clone)]
pub struct TrainedModel {
    pub critic_params: Params,
    pub generator_params: Params,
    pub history: MetricsHistory,
}

/// Drives the adversarial training of a critic and a generator.
///
/// Each epoch shuffles the training set, then for every batch runs `critic_steps` critic updates
/// followed by one generator update, and finally logs the classical and learned distances.
pub struct Orchestrator<C, G, D>
where
    C: Critic,
    G: Generator,
    D: DatasetProvider,
{
    config: TrainingConfig,
    loss: WassersteinLoss<C, G>,
    dataset: D,
    critic_optimizer: SignDescent,
    generator_optimizer: SignDescent,
}

impl<C, G, D> Orchestrator<C, G, D>
where
    C: Critic,
    G: Generator,
    D: DatasetProvider,
{
    /// Creates a new `Orchestrator`.
    ///
    /// # Arguments
    /// * `config` - The training configuration.
    /// * `critic` - The critic oracle.
    /// * `generator` - The generator oracle.
    /// * `dataset` - The provider of the training samples.
    ///
    /// # Errors
    /// Returns `InvalidConfig` if `config` doesn't pass validation.
    pub fn new(
        config: TrainingConfig,
        critic: C,
        generator: G,
        dataset: D,
    ) -> Result<Self, OrchestratorError> {
        config.validate()?;

        let lr = config.learning_rate;
        Ok(Self {
            config,
            loss: WassersteinLoss::new(critic, generator),
            dataset,
            critic_optimizer: SignDescent::new(lr),
            generator_optimizer: SignDescent::new(lr),
        })
    }

    /// The validated configuration driving the run.
    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Runs every configured epoch.
    ///
    /// # Returns
    /// The final parameters and the metrics history.
    ///
    /// # Errors
    /// Fails if the parameters can't be drawn, an oracle returns malformed output or a loss or
    /// metric stops being finite. Nothing is retried, the run stops on the first failure.
    pub fn run(&mut self) -> Result<TrainedModel, OrchestratorError> {
        let config = self.config.clone();

        let mut critic_params = init_params(
            config.critic_layers,
            self.loss.critic().layer_width(),
            config.critic_seed(),
        )?;
        let mut generator_params = init_params(
            config.generator_layers,
            self.loss.generator().layer_width(),
            config.generator_seed(),
        )?;
        let mut train = self.dataset.sample(config.train_size, config.seed);
        let mut history = MetricsHistory::new();

        info!(
            "training for {} epochs over {} samples, batch size {}, {} critic step(s)",
            config.epochs,
            train.len(),
            config.batch_size,
            config.critic_steps
        );

        for epoch in 0..config.epochs {
            let mut rng = rng_from_seed(config.epoch_seed(epoch));
            train.shuffle(&mut rng);

            let mut last_losses = (f32::NAN, f32::NAN);

            for (batch, real) in train.chunks(config.batch_size).enumerate() {
                let mut critic_loss = f32::NAN;

                for step in 0..config.critic_steps {
                    let latent = draw_latent(&mut rng, real.len());
                    critic_loss = self
                        .loss
                        .critic_loss(
                            critic_params.view(),
                            generator_params.view(),
                            real,
                            &latent,
                            &mut rng,
                        )
                        .map_err(oracle_failure(epoch))?;
                    ensure_finite(epoch, Some(batch), "critic loss", critic_loss)?;

                    critic_params = self.critic_optimizer.step(&critic_params, critic_loss);
                    trace!("epoch {epoch} batch {batch} critic step {step}: loss {critic_loss}");
                }

                let latent = draw_latent(&mut rng, real.len());
                let gen_loss = self
                    .loss
                    .generator_loss(
                        critic_params.view(),
                        generator_params.view(),
                        &latent,
                        &mut rng,
                    )
                    .map_err(oracle_failure(epoch))?;
                ensure_finite(epoch, Some(batch), "generator loss", gen_loss)?;

                generator_params = self.generator_optimizer.step(&generator_params, gen_loss);
                debug!(
                    "epoch {epoch} batch {batch}: critic loss {critic_loss}, generator loss {gen_loss}"
                );

                last_losses = (critic_loss, gen_loss);
            }

            let (classical_w1, quantum_estimate) =
                self.measure(epoch, &critic_params, &generator_params, &train)?;
            let (critic_loss, gen_loss) = last_losses;

            history.push(EpochMetrics {
                classical_w1,
                quantum_estimate,
                gen_loss,
                critic_loss,
            });

            info!(
                "epoch {}/{}: classical W1 {classical_w1:.4}, learned estimate {quantum_estimate:.4}, \
                 generator loss {gen_loss:.4}, critic loss {critic_loss:.4}",
                epoch + 1,
                config.epochs
            );
        }

        info!("training finished after {} epochs", history.len());

        Ok(TrainedModel {
            critic_params,
            generator_params,
            history,
        })
    }

    /// Computes the classical distance over the whole training set and the learned estimate over
    /// its first batch.
    fn measure(
        &self,
        epoch: usize,
        critic_params: &Params,
        generator_params: &Params,
        train: &[f32],
    ) -> Result<(f32, f32), OrchestratorError> {
        let mut rng = rng_from_seed(self.config.seed);
        let fake = self
            .loss
            .generate(generator_params.view(), train.len(), &mut rng)
            .map_err(oracle_failure(epoch))?;

        let classical_w1 = wasserstein_1d(train, &fake);
        ensure_finite(epoch, None, "classical distance", classical_w1)?;

        let n = self.config.batch_size.min(train.len());
        let quantum_estimate = self
            .loss
            .estimate_distance(critic_params.view(), &train[..n], &fake[..n])
            .map_err(oracle_failure(epoch))?;
        ensure_finite(epoch, None, "learned estimate", quantum_estimate)?;

        Ok((classical_w1, quantum_estimate))
    }
}

/// Draws a latent batch, only its length reaches the generator.
fn draw_latent<R: Rng>(rng: &mut R, n: usize) -> Vec<f32> {
    (0..n).map(|_| rng.random()).collect()
}

fn oracle_failure(epoch: usize) -> impl Fn(MlErr) -> OrchestratorError {
    move |source| OrchestratorError::Oracle { epoch, source }
}

fn ensure_finite(
    epoch: usize,
    batch: Option<usize>,
    what: &'static str,
    value: f32,
) -> Result<(), OrchestratorError> {
    if value.is_finite() {
        return Ok(());
    }

    Err(OrchestratorError::NonFinite {
        epoch,
        batch,
        what,
        value,
    })
}

#[cfg(test)]
mod tests {
    use machine_learning::{
        Result,
        circuit::{CircuitCritic, CircuitGenerator},
        dataset::BimodalDataset,
    };
    use ndarray::ArrayView2;

    use super::*;

    /// A dataset made of a fixed list of values, ignoring the seed.
    struct FixedDataset(Vec<f32>);

    impl DatasetProvider for FixedDataset {
        fn sample(&self, n: usize, _seed: Option<u64>) -> Vec<f32> {
            self.0.iter().copied().cycle().take(n).collect()
        }
    }

    /// Scores every sample scaled by the sum of the parameters.
    struct SumCritic;

    impl Critic for SumCritic {
        fn layer_width(&self) -> usize {
            2
        }

        fn score(&self, params: ArrayView2<f32>, xs: &[f32]) -> Result<Vec<f32>> {
            let s = params.sum();
            Ok(xs.iter().map(|x| s * x).collect())
        }
    }

    /// Emits the latent value itself, mapped into `[-1, 1]`.
    struct LatentGenerator;

    impl Generator for LatentGenerator {
        fn layer_width(&self) -> usize {
            1
        }

        fn sample<R: Rng>(&self, _params: ArrayView2<f32>, n: usize, rng: &mut R) -> Result<Vec<f32>> {
            Ok((0..n).map(|_| 2. * rng.random::<f32>() - 1.).collect())
        }
    }

    /// Scores every sample as itself, whatever the parameters.
    struct IdentityCritic;

    impl Critic for IdentityCritic {
        fn layer_width(&self) -> usize {
            2
        }

        fn score(&self, _params: ArrayView2<f32>, xs: &[f32]) -> Result<Vec<f32>> {
            Ok(xs.to_vec())
        }
    }

    /// Emits the same value every time.
    struct ConstGenerator(f32);

    impl Generator for ConstGenerator {
        fn layer_width(&self) -> usize {
            1
        }

        fn sample<R: Rng>(
            &self,
            _params: ArrayView2<f32>,
            n: usize,
            _rng: &mut R,
        ) -> Result<Vec<f32>> {
            Ok(vec![self.0; n])
        }
    }

    /// Scores every sample as `NaN`.
    struct NanCritic;

    impl Critic for NanCritic {
        fn layer_width(&self) -> usize {
            1
        }

        fn score(&self, _params: ArrayView2<f32>, xs: &[f32]) -> Result<Vec<f32>> {
            Ok(vec![f32::NAN; xs.len()])
        }
    }

    /// Always drops the last sample.
    struct LossyGenerator;

    impl Generator for LossyGenerator {
        fn layer_width(&self) -> usize {
            1
        }

        fn sample<R: Rng>(&self, _params: ArrayView2<f32>, n: usize, _rng: &mut R) -> Result<Vec<f32>> {
            Ok(vec![0.; n.saturating_sub(1)])
        }
    }

    fn config(epochs: usize, batch_size: usize, critic_steps: usize) -> TrainingConfig {
        TrainingConfig {
            epochs,
            batch_size,
            critic_steps,
            train_size: 40,
            ..Default::default()
        }
    }

    #[test]
    fn history_has_one_entry_per_epoch() {
        let mut orchestrator = Orchestrator::new(
            config(3, 16, 2),
            SumCritic,
            LatentGenerator,
            BimodalDataset::default(),
        )
        .unwrap();

        let trained = orchestrator.run().unwrap();
        assert_eq!(trained.history.len(), 3);
        assert_eq!(trained.critic_params.dim(), (1, 2));
        assert_eq!(trained.generator_params.dim(), (1, 1));
    }

    #[test]
    fn every_step_moves_all_components_equally() {
        // 40 samples in batches of 16 => 3 batches
        for critic_steps in [1, 3] {
            let mut orchestrator = Orchestrator::new(
                TrainingConfig {
                    learning_rate: 0.25,
                    ..config(2, 16, critic_steps)
                },
                IdentityCritic,
                ConstGenerator(-0.5),
                FixedDataset(vec![0.9, 0.8, 0.7]),
            )
            .unwrap();
            let critic_init = init_params(1, 2, Some(0)).unwrap();
            let generator_init = init_params(1, 1, Some(1)).unwrap();

            let trained = orchestrator.run().unwrap();

            // critic loss is -(mean(real) + 0.5) < 0, every critic step adds lr
            let critic_steps_taken = (2 * 3 * critic_steps) as f32;
            let critic_delta = &trained.critic_params - &critic_init;
            for d in critic_delta.iter() {
                assert!((d - 0.25 * critic_steps_taken).abs() < 1e-4, "critic moved {d}");
            }

            // generator loss is 0.5 > 0, one step subtracting lr per batch
            let generator_delta = &trained.generator_params - &generator_init;
            assert!((generator_delta[[0, 0]] + 0.25 * 6.).abs() < 1e-4);

            let last = trained.history.last().unwrap();
            assert_eq!(last.gen_loss, 0.5);
            assert!(last.critic_loss < 0.);
        }
    }

    #[test]
    fn zero_loss_leaves_params_untouched() {
        let mut orchestrator = Orchestrator::new(
            config(1, 16, 2),
            IdentityCritic,
            ConstGenerator(0.),
            FixedDataset(vec![0.]),
        )
        .unwrap();

        let trained = orchestrator.run().unwrap();
        assert_eq!(trained.critic_params, init_params(1, 2, Some(0)).unwrap());
        assert_eq!(trained.generator_params, init_params(1, 1, Some(1)).unwrap());
    }

    #[test]
    fn same_seed_same_run() {
        let run = || {
            Orchestrator::new(
                config(2, 8, 1),
                CircuitCritic,
                CircuitGenerator,
                BimodalDataset::default(),
            )
            .unwrap()
            .run()
            .unwrap()
        };

        let (a, b) = (run(), run());
        assert_eq!(a.critic_params, b.critic_params);
        assert_eq!(a.generator_params, b.generator_params);
        assert_eq!(a.history, b.history);
    }

    #[test]
    fn invalid_config_fails_fast() {
        let result = Orchestrator::new(
            config(1, 0, 1),
            SumCritic,
            LatentGenerator,
            BimodalDataset::default(),
        );
        assert!(matches!(result, Err(OrchestratorError::InvalidConfig(_))));
    }

    #[test]
    fn non_finite_loss_stops_the_run() {
        let mut orchestrator = Orchestrator::new(
            config(3, 8, 1),
            NanCritic,
            LatentGenerator,
            BimodalDataset::default(),
        )
        .unwrap();

        let err = orchestrator.run().unwrap_err();
        assert!(matches!(
            err,
            OrchestratorError::NonFinite {
                epoch: 0,
                batch: Some(0),
                what: "critic loss",
                value,
            } if value.is_nan()
        ));
    }

    #[test]
    fn malformed_oracle_output_stops_the_run() {
        let mut orchestrator = Orchestrator::new(
            config(2, 8, 1),
            SumCritic,
            LossyGenerator,
            BimodalDataset::default(),
        )
        .unwrap();

        let err = orchestrator.run().unwrap_err();
        assert!(matches!(err, OrchestratorError::Oracle { epoch: 0, .. }));
    }

    #[test]
    fn latent_draws_follow_the_batch() {
        let mut rng = rng_from_seed(Some(1));
        assert_eq!(draw_latent(&mut rng, 5).len(), 5);
        assert!(draw_latent(&mut rng, 0).is_empty());
    }
}
