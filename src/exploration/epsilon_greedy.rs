use rand::Rng;

use crate::decay::Decay;

use super::Choice;

/// Epsilon greedy exploration policy with time-decaying epsilon threshold
///
/// The RNG is supplied by the caller so that a seeded run draws a
/// reproducible sequence of choices.
pub struct EpsilonGreedy<D: Decay> {
    epsilon: D,
}

impl<D: Decay> EpsilonGreedy<D> {
    /// Initialize epsilon greedy policy with a decay strategy
    pub fn new(decay: D) -> Self {
        Self { epsilon: decay }
    }

    /// The exploration rate in effect for the given episode
    pub fn epsilon(&self, episode: u32) -> f32 {
        self.epsilon.evaluate(episode as f32)
    }

    /// Invoke epsilon greedy policy for the current episode
    pub fn choose<R: Rng>(&self, episode: u32, rng: &mut R) -> Choice {
        if rng.gen::<f32>() < self.epsilon(episode) {
            Choice::Explore
        } else {
            Choice::Exploit
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use crate::decay;

    use super::*;

    #[test]
    fn epsilon_bounds_are_exact() {
        let mut rng = StdRng::seed_from_u64(0);

        let greedy = EpsilonGreedy::new(decay::Constant::new(0.0));
        let random = EpsilonGreedy::new(decay::Constant::new(1.0));
        for episode in 0..100 {
            assert!(
                matches!(greedy.choose(episode, &mut rng), Choice::Exploit),
                "Epsilon 0 never explores"
            );
            assert!(
                matches!(random.choose(episode, &mut rng), Choice::Explore),
                "Epsilon 1 never exploits"
            );
        }
    }
}
