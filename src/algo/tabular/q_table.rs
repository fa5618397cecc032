use std::collections::HashMap;

use rand::Rng;

use crate::{
    assert_interval, decay,
    env::{Environment, Exp, Report, Transition},
    exploration::{Choice, EpsilonGreedy},
};

use super::Hashable;

/// A table of action-value estimates
///
/// Cells that have never been written read as zero, which is the initial
/// estimate for every state-action pair. Mutated exclusively by the owning
/// agent during training; evaluation borrows it read-only.
#[derive(Debug, Clone, Default)]
pub struct QTable<S, A>
where
    S: Hashable,
    A: Hashable,
{
    values: HashMap<(S, A), f32>,
}

impl<S, A> QTable<S, A>
where
    S: Hashable,
    A: Hashable,
{
    pub fn new() -> Self {
        Self {
            values: HashMap::new(),
        }
    }

    /// The current estimate for a state-action pair, zero if never updated
    pub fn get(&self, state: S, action: A) -> f32 {
        *self.values.get(&(state, action)).unwrap_or(&0.0)
    }

    pub fn insert(&mut self, state: S, action: A, value: f32) {
        debug_assert!(value.is_finite(), "non-finite Q-value for a state-action pair");
        self.values.insert((state, action), value);
    }

    /// Number of cells that have been written at least once
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The greedy action for `state`
    ///
    /// Ties break toward the earliest entry of `actions`, so a fresh all-zero
    /// table always yields the first declared action.
    pub fn best_action(&self, state: S, actions: &[A]) -> A {
        let mut best = *actions.first().expect("action set is not empty");
        let mut best_value = self.get(state, best);
        for &action in &actions[1..] {
            let value = self.get(state, action);
            if value > best_value {
                best = action;
                best_value = value;
            }
        }
        best
    }

    /// The highest action-value estimate for `state`
    pub fn max_value(&self, state: S, actions: &[A]) -> f32 {
        actions
            .iter()
            .map(|&a| self.get(state, a))
            .fold(f32::NEG_INFINITY, f32::max)
    }
}

/// Configuration for the [`QTableAgent`]
pub struct QTableAgentConfig<D: decay::Decay> {
    pub exploration: EpsilonGreedy<D>,
    /// Learning rate - must be in `[0,1]`
    pub alpha: f32,
    /// Discount factor - must be in `[0,1]`
    pub gamma: f32,
    /// Liveness bound on a single episode; reaching it truncates the episode
    /// rather than failing
    pub max_steps_per_episode: usize,
}

impl Default for QTableAgentConfig<decay::Multiplicative> {
    fn default() -> Self {
        Self {
            exploration: EpsilonGreedy::new(
                decay::Multiplicative::new(0.997, 1.0, 0.05).unwrap(),
            ),
            alpha: 0.2,
            gamma: 0.95,
            max_steps_per_episode: 80,
        }
    }
}

/// A Q-learning agent that learns its environment through a [`QTable`]
///
/// Runs one episode per [`go`](QTableAgent::go) call, applying the one-step
/// off-policy update after every environment step:
///
/// `Q(s,a) <- (1-α)·Q(s,a) + α·(reward + γ·max_a' Q(s',a'))`
///
/// ### Generics
/// - `E` - The [`Environment`] in which the agent will learn
///     - The environment's state and action spaces must both be discrete because a Q value
///       will be recorded for each state-action pair
///     - For the same reason, the state and action types must be [`Hashable`]
/// - `D` - The decay schedule driving the exploration rate across episodes
pub struct QTableAgent<E, D>
where
    E: Environment,
    E::State: Hashable,
    E::Action: Hashable,
    D: decay::Decay,
{
    q_table: QTable<E::State, E::Action>,
    exploration: EpsilonGreedy<D>,
    alpha: f32,
    gamma: f32,
    max_steps_per_episode: usize,
    episode: u32,
    pub report: Report,
}

impl<E, D> QTableAgent<E, D>
where
    E: Environment,
    E::State: Hashable,
    E::Action: Hashable,
    D: decay::Decay,
{
    /// Initialize a new `QTableAgent` with a zeroed table
    ///
    /// **Panics** if `alpha` or `gamma` is not in the interval `[0,1]`,
    /// or if `max_steps_per_episode` is zero
    pub fn new(config: QTableAgentConfig<D>) -> Self {
        assert_interval!(config.alpha, 0.0, 1.0);
        assert_interval!(config.gamma, 0.0, 1.0);
        assert!(
            config.max_steps_per_episode > 0,
            "`max_steps_per_episode` must be nonzero"
        );
        Self {
            q_table: QTable::new(),
            exploration: config.exploration,
            alpha: config.alpha,
            gamma: config.gamma,
            max_steps_per_episode: config.max_steps_per_episode,
            episode: 0,
            report: Report::new(vec!["reward", "steps"]),
        }
    }

    pub fn q_table(&self) -> &QTable<E::State, E::Action> {
        &self.q_table
    }

    /// Episodes completed so far
    pub fn episode(&self) -> u32 {
        self.episode
    }

    /// The exploration rate in effect for the next episode
    pub fn epsilon(&self) -> f32 {
        self.exploration.epsilon(self.episode)
    }

    fn act<R: Rng>(&self, env: &E, state: E::State, actions: &[E::Action], rng: &mut R) -> E::Action {
        match self.exploration.choose(self.episode, rng) {
            Choice::Explore => env.random_action(rng),
            Choice::Exploit => self.q_table.best_action(state, actions),
        }
    }

    fn learn(&mut self, exp: Exp<E>, actions: &[E::Action]) {
        let Exp {
            state,
            action,
            next_state,
            reward,
        } = exp;

        let q_value = self.q_table.get(state, action);
        let max_next_q = self.q_table.max_value(next_state, actions);
        let new_q_value = reward + self.gamma * max_next_q;
        let weighted_q_value = (1.0 - self.alpha) * q_value + self.alpha * new_q_value;

        self.q_table.insert(state, action, weighted_q_value);
    }

    /// Run one training episode from the environment's start state
    ///
    /// Exactly one table cell is updated per step. The episode ends on a
    /// terminal transition or after `max_steps_per_episode` steps.
    pub fn go<R: Rng>(&mut self, env: &E, rng: &mut R) {
        let actions = env.actions();
        let mut state = env.start();

        for _ in 0..self.max_steps_per_episode {
            let action = self.act(env, state, &actions, rng);
            let Transition {
                next_state,
                reward,
                done,
            } = env.step(state, action, rng);

            self.learn(
                Exp {
                    state,
                    action,
                    next_state,
                    reward,
                },
                &actions,
            );

            self.report.entry("reward").and_modify(|x| *x += reward as f64);
            self.report.entry("steps").and_modify(|x| *x += 1.0);

            state = next_state;
            if done {
                break;
            }
        }

        self.episode += 1;
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use crate::env::tests::MockEnv;

    use super::*;

    #[test]
    fn fresh_table_reads_zero() {
        let table = QTable::<u32, u32>::new();
        for state in 0..4 {
            for action in 0..2 {
                assert_eq!(table.get(state, action), 0.0, "Unwritten cells read zero");
            }
        }
        assert!(table.is_empty(), "No cells written yet");
    }

    #[test]
    fn best_action_breaks_ties_first() {
        let mut table = QTable::<u32, u32>::new();
        let actions = [0, 1, 2];

        assert_eq!(
            table.best_action(0, &actions),
            0,
            "All-zero row yields the first declared action"
        );

        table.insert(0, 1, 0.5);
        table.insert(0, 2, 0.5);
        assert_eq!(
            table.best_action(0, &actions),
            1,
            "Equal values resolve to the earlier action"
        );

        table.insert(0, 2, 0.6);
        assert_eq!(table.best_action(0, &actions), 2, "Strictly larger value wins");
    }

    #[test]
    fn single_update_is_weighted_average() {
        let mut agent = QTableAgent::<MockEnv, _>::new(QTableAgentConfig {
            exploration: EpsilonGreedy::new(decay::Constant::new(0.0)),
            alpha: 0.5,
            gamma: 0.5,
            max_steps_per_episode: 10,
        });

        agent.learn(
            Exp {
                state: 0,
                action: 1,
                next_state: 1,
                reward: 1.0,
            },
            &[0, 1],
        );

        // (1 - 0.5)*0 + 0.5*(1.0 + 0.5*0) = 0.5
        assert_eq!(agent.q_table().get(0, 1), 0.5, "First update from a zero cell");
        assert_eq!(agent.q_table().len(), 1, "Exactly one cell written");
    }

    #[test]
    fn update_stays_within_reward_bounds() {
        let env = MockEnv;
        let mut rng = StdRng::seed_from_u64(3);
        let mut agent = QTableAgent::<MockEnv, _>::new(QTableAgentConfig {
            exploration: EpsilonGreedy::new(decay::Constant::new(0.5)),
            alpha: 0.25,
            gamma: 0.9,
            max_steps_per_episode: 25,
        });

        for _ in 0..50 {
            agent.go(&env, &mut rng);
        }

        // Rewards live in [0, 1], so every estimate lies in [0, 1/(1-gamma)].
        let bound = 1.0 / (1.0 - 0.9);
        for state in 0..4 {
            for action in 0..2 {
                let q = agent.q_table().get(state, action);
                assert!(
                    (0.0..=bound).contains(&q),
                    "Estimate {q} outside the reward-implied bound"
                );
            }
        }
    }

    #[test]
    fn greedy_agent_learns_mock_chain() {
        let env = MockEnv;
        let mut rng = StdRng::seed_from_u64(1);
        let mut agent = QTableAgent::<MockEnv, _>::new(QTableAgentConfig {
            exploration: EpsilonGreedy::new(decay::Constant::new(0.2)),
            alpha: 0.5,
            gamma: 0.9,
            max_steps_per_episode: 25,
        });

        for _ in 0..200 {
            agent.go(&env, &mut rng);
        }

        assert_eq!(agent.episode(), 200, "Episode counter advances");
        let actions = env.actions();
        for state in 0..3 {
            assert_eq!(
                agent.q_table().best_action(state, &actions),
                1,
                "Advancing dominates staying in state {state}"
            );
        }
    }

    #[test]
    fn episode_report_tracks_reward_and_steps() {
        let env = MockEnv;
        let mut rng = StdRng::seed_from_u64(9);
        let mut agent = QTableAgent::<MockEnv, _>::new(QTableAgentConfig {
            exploration: EpsilonGreedy::new(decay::Constant::new(0.0)),
            alpha: 0.5,
            gamma: 0.9,
            max_steps_per_episode: 25,
        });

        // Make advancing the known-best action so the greedy episode is deterministic.
        for state in 0..3 {
            agent.learn(
                Exp {
                    state,
                    action: 1,
                    next_state: state + 1,
                    reward: 1.0,
                },
                &[0, 1],
            );
        }

        agent.go(&env, &mut rng);
        let report = agent.report.take();

        assert_eq!(*report.get("steps").unwrap(), 3.0, "Three advances end the chain");
        assert_eq!(*report.get("reward").unwrap(), 3.0, "One unit of reward per advance");
        assert_eq!(agent.report["steps"], 0.0, "Take resets the report");
    }

    #[test]
    #[should_panic(expected = "Invalid value for `config.alpha`")]
    fn rejects_out_of_range_alpha() {
        let _ = QTableAgent::<MockEnv, _>::new(QTableAgentConfig {
            exploration: EpsilonGreedy::new(decay::Constant::new(0.0)),
            alpha: 1.5,
            gamma: 0.95,
            max_steps_per_episode: 10,
        });
    }

    #[test]
    #[should_panic(expected = "`max_steps_per_episode` must be nonzero")]
    fn rejects_zero_step_cap() {
        let _ = QTableAgent::<MockEnv, _>::new(QTableAgentConfig {
            exploration: EpsilonGreedy::new(decay::Constant::new(0.0)),
            alpha: 0.2,
            gamma: 0.95,
            max_steps_per_episode: 0,
        });
    }
}
