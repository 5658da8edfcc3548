use ndarray::ArrayView2;
use rand::Rng;

use crate::{
    Result,
    oracle::{Critic, Generator, check_len},
};

/// Wasserstein-style adversarial losses built on a critic and a generator.
///
/// The critic's expectation gap between real and generated samples is the dual estimate of the
/// transport distance. None of these functions inspect finiteness, a non-finite score flows
/// straight into the returned value.
#[derive(Debug, Clone)]
pub struct WassersteinLoss<C, G>
where
    C: Critic,
    G: Generator,
{
    critic: C,
    generator: G,
}

impl<C, G> WassersteinLoss<C, G>
where
    C: Critic,
    G: Generator,
{
    /// Creates a new `WassersteinLoss`.
    ///
    /// # Arguments
    /// * `critic` - The oracle scoring samples.
    /// * `generator` - The oracle producing samples.
    pub fn new(critic: C, generator: G) -> Self {
        Self { critic, generator }
    }

    /// The critic oracle.
    pub fn critic(&self) -> &C {
        &self.critic
    }

    /// The generator oracle.
    pub fn generator(&self) -> &G {
        &self.generator
    }

    /// Negated critic objective, `-(E_real[f] - E_fake[f])`.
    ///
    /// Only the length of `latent` matters, the generator draws its own noise from `rng`.
    ///
    /// # Arguments
    /// * `critic_params` - The critic's parameters.
    /// * `generator_params` - The generator's parameters.
    /// * `real` - A batch of training samples.
    /// * `latent` - The latent batch, sizing the generated batch.
    /// * `rng` - The source of the generator's noise.
    ///
    /// # Returns
    /// The loss or an error if an oracle misbehaved.
    pub fn critic_loss<R: Rng>(
        &self,
        critic_params: ArrayView2<f32>,
        generator_params: ArrayView2<f32>,
        real: &[f32],
        latent: &[f32],
        rng: &mut R,
    ) -> Result<f32> {
        let real_scores = self.score(critic_params, real)?;
        let fake = self.generate(generator_params, latent.len(), rng)?;
        let fake_scores = self.score(critic_params, &fake)?;

        Ok(-(mean(&real_scores) - mean(&fake_scores)))
    }

    /// Generator objective, `-E_fake[f]` under a fixed critic.
    ///
    /// # Arguments
    /// * `critic_params` - The critic's parameters.
    /// * `generator_params` - The generator's parameters.
    /// * `latent` - The latent batch, sizing the generated batch.
    /// * `rng` - The source of the generator's noise.
    ///
    /// # Returns
    /// The loss or an error if an oracle misbehaved.
    pub fn generator_loss<R: Rng>(
        &self,
        critic_params: ArrayView2<f32>,
        generator_params: ArrayView2<f32>,
        latent: &[f32],
        rng: &mut R,
    ) -> Result<f32> {
        let fake = self.generate(generator_params, latent.len(), rng)?;
        let fake_scores = self.score(critic_params, &fake)?;

        Ok(-mean(&fake_scores))
    }

    /// The learned Wasserstein estimate, `E_data[f] - E_fake[f]`.
    ///
    /// # Arguments
    /// * `critic_params` - The critic's parameters.
    /// * `data` - Samples from the target distribution.
    /// * `fake` - Samples from the generator.
    ///
    /// # Returns
    /// The estimate or an error if the critic misbehaved.
    pub fn estimate_distance(
        &self,
        critic_params: ArrayView2<f32>,
        data: &[f32],
        fake: &[f32],
    ) -> Result<f32> {
        let data_scores = self.score(critic_params, data)?;
        let fake_scores = self.score(critic_params, fake)?;

        Ok(mean(&data_scores) - mean(&fake_scores))
    }

    /// Scores `xs` with the critic, checking it returned one score per sample.
    pub fn score(&self, params: ArrayView2<f32>, xs: &[f32]) -> Result<Vec<f32>> {
        let scores = self.critic.score(params, xs)?;
        check_len("critic scores", scores.len(), xs.len())?;
        Ok(scores)
    }

    /// Draws `n` samples from the generator, checking it returned exactly `n`.
    pub fn generate<R: Rng>(
        &self,
        params: ArrayView2<f32>,
        n: usize,
        rng: &mut R,
    ) -> Result<Vec<f32>> {
        let samples = self.generator.sample(params, n, rng)?;
        check_len("generator samples", samples.len(), n)?;
        Ok(samples)
    }
}

/// Arithmetic mean, `NaN` when empty.
fn mean(xs: &[f32]) -> f32 {
    xs.iter().sum::<f32>() / xs.len() as f32
}

#[cfg(test)]
mod tests {
    use ndarray::Array2;
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;
    use crate::{
        MlErr,
        circuit::{CircuitCritic, CircuitGenerator},
        init::init_params,
    };

    /// Scores `x` as `x` times the first parameter.
    struct LinearCritic;

    impl Critic for LinearCritic {
        fn layer_width(&self) -> usize {
            1
        }

        fn score(&self, params: ArrayView2<f32>, xs: &[f32]) -> Result<Vec<f32>> {
            let w = params[[0, 0]];
            Ok(xs.iter().map(|x| w * x).collect())
        }
    }

    /// Always emits the first parameter, still consuming one latent value per sample.
    struct ConstGenerator;

    impl Generator for ConstGenerator {
        fn layer_width(&self) -> usize {
            1
        }

        fn sample<R: Rng>(&self, params: ArrayView2<f32>, n: usize, rng: &mut R) -> Result<Vec<f32>> {
            Ok((0..n)
                .map(|_| {
                    let _: f32 = rng.random();
                    params[[0, 0]]
                })
                .collect())
        }
    }

    /// Returns one score too few.
    struct ShortCritic;

    impl Critic for ShortCritic {
        fn layer_width(&self) -> usize {
            1
        }

        fn score(&self, _params: ArrayView2<f32>, xs: &[f32]) -> Result<Vec<f32>> {
            Ok(vec![0.; xs.len().saturating_sub(1)])
        }
    }

    fn scalar(value: f32) -> Array2<f32> {
        Array2::from_elem((1, 1), value)
    }

    #[test]
    fn critic_loss_is_negated_gap() {
        let loss = WassersteinLoss::new(LinearCritic, ConstGenerator);
        let mut rng = StdRng::seed_from_u64(0);

        // real mean 0.5, fake 0.25, critic weight 2 => -(1.0 - 0.5)
        let value = loss
            .critic_loss(
                scalar(2.).view(),
                scalar(0.25).view(),
                &[0., 1.],
                &[0.; 4],
                &mut rng,
            )
            .unwrap();

        assert!((value + 0.5).abs() < 1e-6);
    }

    #[test]
    fn generator_loss_is_negated_fake_score() {
        let loss = WassersteinLoss::new(LinearCritic, ConstGenerator);
        let mut rng = StdRng::seed_from_u64(0);

        let value = loss
            .generator_loss(scalar(-3.).view(), scalar(0.5).view(), &[0.; 3], &mut rng)
            .unwrap();

        assert!((value - 1.5).abs() < 1e-6);
    }

    #[test]
    fn estimate_is_unnegated_gap() {
        let loss = WassersteinLoss::new(LinearCritic, ConstGenerator);
        let value = loss
            .estimate_distance(scalar(1.).view(), &[0.5, 0.7], &[-0.1, 0.1])
            .unwrap();

        assert!((value - 0.6).abs() < 1e-6);
    }

    #[test]
    fn latent_length_sizes_the_fake_batch() {
        let loss = WassersteinLoss::new(LinearCritic, ConstGenerator);
        let mut rng = StdRng::seed_from_u64(5);
        let mut twin = StdRng::seed_from_u64(5);

        loss.generator_loss(scalar(1.).view(), scalar(0.).view(), &[9.; 7], &mut rng)
            .unwrap();
        for _ in 0..7 {
            let _: f32 = twin.random();
        }

        let a: u64 = rng.random();
        let b: u64 = twin.random();
        assert_eq!(a, b);
    }

    #[test]
    fn circuit_losses_are_finite() {
        let loss = WassersteinLoss::new(CircuitCritic, CircuitGenerator);
        let mut rng = StdRng::seed_from_u64(1);

        for seed in 0..4 {
            let critic = init_params(2, 6, Some(seed)).unwrap();
            let generator = init_params(2, 3, Some(seed + 100)).unwrap();
            let real = [-0.6, -0.4, 0.45, 0.5, 0.55];
            let latent = [0.1, 0.2, 0.3, 0.4, 0.5];

            let c = loss
                .critic_loss(critic.view(), generator.view(), &real, &latent, &mut rng)
                .unwrap();
            let g = loss
                .generator_loss(critic.view(), generator.view(), &latent, &mut rng)
                .unwrap();

            assert!(c.is_finite() && g.is_finite());
            assert!((-2.0..=2.0).contains(&c));
            assert!((-1.0..=1.0).contains(&g));
        }
    }

    #[test]
    fn nan_scores_flow_into_the_loss() {
        let loss = WassersteinLoss::new(LinearCritic, ConstGenerator);
        let mut rng = StdRng::seed_from_u64(0);

        let value = loss
            .critic_loss(
                scalar(f32::NAN).view(),
                scalar(0.).view(),
                &[0.5],
                &[0.],
                &mut rng,
            )
            .unwrap();

        assert!(value.is_nan());
    }

    #[test]
    fn short_score_batch_is_an_error() {
        let loss = WassersteinLoss::new(ShortCritic, ConstGenerator);
        let err = loss
            .estimate_distance(scalar(1.).view(), &[0., 1.], &[0., 1.])
            .unwrap_err();

        assert_eq!(
            err,
            MlErr::SizeMismatch {
                a: "critic scores",
                b: "requested batch",
                got: 1,
                expected: 2
            }
        );
    }
}
