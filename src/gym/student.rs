use rand::Rng;
use rand_distr::{Bernoulli, Distribution};
use strum::VariantArray;

use crate::env::{Environment, Transition};

/// Hidden skill level of the simulated student, `0` = beginner
pub type Skill = usize;

/// Question difficulty the tutoring agent can pick
#[derive(VariantArray, strum::Display, Clone, Copy, Debug, Hash, PartialEq, Eq)]
#[strum(serialize_all = "UPPERCASE")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Numeric level for the response-model rules
    fn level(self) -> usize {
        self as usize
    }
}

/// An adaptive-tutoring task: pick question difficulty for a simulated student
///
/// The student answers correctly with a probability set by how the question's
/// difficulty compares to their current skill. Correct answers on harder
/// questions earn more and are more likely to raise the skill level; wrong
/// answers cost a flat penalty. Actual skill growth earns a bonus on top,
/// since that is the outcome the tutor is really after. The episode ends when
/// the skill reaches its cap, so the cap state is terminal no matter which
/// difficulty is picked there.
pub struct Student {
    max_skill: Skill,
}

impl Student {
    const WRONG_REWARD: f32 = -0.6;
    const GROWTH_BONUS: f32 = 1.0;

    /// **Panics** if `max_skill` is zero
    pub fn new(max_skill: Skill) -> Self {
        assert!(max_skill > 0, "`max_skill` must be nonzero");
        Self { max_skill }
    }

    pub fn max_skill(&self) -> Skill {
        self.max_skill
    }

    /// All skill levels a student can occupy, lowest first
    pub fn skill_levels(&self) -> impl Iterator<Item = Skill> {
        0..=self.max_skill
    }

    /// Probability of a correct answer given the difficulty-vs-skill gap
    ///
    /// Skill is capped at the difficulty scale before comparing, so an
    /// advanced student finds every difficulty easy.
    fn p_correct(&self, skill: Skill, difficulty: Difficulty) -> f64 {
        let gap = difficulty.level() as isize - skill.min(2) as isize;
        match gap {
            ..=0 => 0.85,
            1 => 0.55,
            _ => 0.25,
        }
    }
}

impl Default for Student {
    fn default() -> Self {
        Self::new(4)
    }
}

impl Environment for Student {
    type State = Skill;
    type Action = Difficulty;

    fn start(&self) -> Self::State {
        0
    }

    fn actions(&self) -> Vec<Self::Action> {
        Difficulty::VARIANTS.to_vec()
    }

    fn step<R: Rng>(&self, skill: Skill, difficulty: Difficulty, rng: &mut R) -> Transition<Skill> {
        let correct = Bernoulli::new(self.p_correct(skill, difficulty))
            .expect("probability is in [0, 1]")
            .sample(rng);

        let base_reward = if correct {
            // Learning gain grows with difficulty
            match difficulty {
                Difficulty::Easy => 0.4,
                Difficulty::Medium => 0.7,
                Difficulty::Hard => 1.0,
            }
        } else {
            Self::WRONG_REWARD
        };

        let mut next_skill = skill;
        if correct {
            // Harder questions promote growth more often
            let grow_chance = match difficulty {
                Difficulty::Easy => 0.25,
                Difficulty::Medium => 0.40,
                Difficulty::Hard => 0.55,
            };
            let grows = Bernoulli::new(grow_chance)
                .expect("probability is in [0, 1]")
                .sample(rng);
            if grows && skill < self.max_skill {
                next_skill += 1;
            }
        }

        let reward = if next_skill > skill {
            base_reward + Self::GROWTH_BONUS
        } else {
            base_reward
        };

        Transition {
            next_state: next_skill,
            reward,
            done: next_skill >= self.max_skill,
        }
    }
}
