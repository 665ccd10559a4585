use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Random source threaded through network construction and mini-batch
/// sampling.
///
/// One context is created at program start and passed by `&mut` wherever
/// randomness is needed, so a seeded context reproduces a whole run.
#[derive(Debug, Clone)]
pub struct GaussianRng {
    rng: StdRng,
}

impl GaussianRng {
    /// Deterministic generator for reproducible runs and tests.
    pub fn seeded(seed: u64) -> GaussianRng {
        GaussianRng {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Generator seeded from the operating system.
    pub fn from_entropy() -> GaussianRng {
        GaussianRng {
            rng: StdRng::from_entropy(),
        }
    }

    /// Uses `seed` when given, otherwise entropy.
    pub fn from_seed_option(seed: Option<u64>) -> GaussianRng {
        match seed {
            Some(seed) => GaussianRng::seeded(seed),
            None => GaussianRng::from_entropy(),
        }
    }

    /// Two independent N(0, 1) samples via the Marsaglia polar method.
    ///
    /// Points are drawn uniformly in the square (-1, 1)² until one lands
    /// strictly inside the unit circle and off the origin.
    pub fn normal_pair(&mut self) -> (f64, f64) {
        loop {
            let x: f64 = self.rng.gen_range(-1.0..1.0);
            let y: f64 = self.rng.gen_range(-1.0..1.0);
            let rsq = x * x + y * y;
            if rsq >= 1.0 || rsq == 0.0 {
                continue;
            }
            let f = (-2.0 * rsq.ln() / rsq).sqrt();
            return (x * f, y * f);
        }
    }

    /// `n` standard normal samples.
    ///
    /// Samples come in pairs, so an odd request fills an even-length buffer
    /// and drops the last value.
    pub fn randn(&mut self, n: usize) -> Vec<f64> {
        let padded = n + n % 2;
        let mut values = Vec::with_capacity(padded);
        while values.len() < padded {
            let (a, b) = self.normal_pair();
            values.push(a);
            values.push(b);
        }
        values.truncate(n);
        values
    }

    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.rng);
    }
}
