//! Injectable sources of uniform draws in `[0, 1)`.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub trait RandomSource {
    /// Next uniform draw in `[0, 1)`.
    fn next_f64(&mut self) -> f64;
}

/// Seedable source backed by `StdRng`.
#[derive(Debug, Clone)]
pub struct SeededRandom {
    rng: StdRng,
}

impl SeededRandom {
    pub fn from_seed(seed: u64) -> Self {
        Self { rng: StdRng::seed_from_u64(seed) }
    }

    pub fn from_entropy() -> Self {
        Self { rng: StdRng::from_entropy() }
    }

    pub fn from_config(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::from_seed(seed),
            None => Self::from_entropy(),
        }
    }
}

impl RandomSource for SeededRandom {
    fn next_f64(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }
}

/// Adapts any `FnMut() -> f64` closure.
pub struct FnRandom<F>(pub F);

impl<F: FnMut() -> f64> RandomSource for FnRandom<F> {
    fn next_f64(&mut self) -> f64 {
        (self.0)()
    }
}

/// Replays a fixed list of draws, cycling when exhausted.
#[derive(Debug, Clone)]
pub struct ScriptedRandom {
    draws: Vec<f64>,
    next: usize,
    taken: usize,
}

impl ScriptedRandom {
    /// An empty script falls back to a constant midpoint draw.
    pub fn new(draws: Vec<f64>) -> Self {
        let draws = if draws.is_empty() { vec![0.5] } else { draws };
        Self { draws, next: 0, taken: 0 }
    }

    /// Always returns `value`.
    pub fn constant(value: f64) -> Self {
        Self::new(vec![value])
    }

    pub fn taken(&self) -> usize {
        self.taken
    }
}

impl RandomSource for ScriptedRandom {
    fn next_f64(&mut self) -> f64 {
        let v = self.draws[self.next];
        self.next = (self.next + 1) % self.draws.len();
        self.taken += 1;
        v
    }
}
