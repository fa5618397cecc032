use log::{debug, info};
use rand::Rng;

use crate::{
    algo::tabular::{q_table::QTableAgent, Hashable},
    decay::Decay,
    ds::RingBuffer,
    env::Environment,
};

/// Configuration for the [`Trainer`]
#[derive(Debug, Clone)]
pub struct TrainerConfig {
    /// Number of independent episodes to run
    pub episodes: u32,
    /// How many of the most recent episode rewards feed the summary statistics
    ///
    /// **Default**: `200`
    pub window: usize,
    /// Record a progress point every this many episodes
    ///
    /// **Default**: `250`
    pub progress_every: u32,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            episodes: 2500,
            window: 200,
            progress_every: 250,
        }
    }
}

/// A progress point recorded while training
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Progress {
    /// 1-based index of the episode that just finished
    pub episode: u32,
    /// The exploration rate in effect after that episode
    pub epsilon: f32,
}

/// Summary statistics over the trailing reward window, plus the recorded
/// progress points
///
/// Observability only: nothing in the engine reads these back to make
/// control decisions.
#[derive(Debug, Clone)]
pub struct TrainingSummary {
    pub episodes: u32,
    /// Number of episode rewards in the window (min of `episodes` and `window`)
    pub window_len: usize,
    pub mean_reward: f64,
    pub min_reward: f64,
    pub max_reward: f64,
    pub progress: Vec<Progress>,
}

impl std::fmt::Display for TrainingSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "episodes={} window={} avg_reward={:.3} min_reward={:.3} max_reward={:.3}",
            self.episodes, self.window_len, self.mean_reward, self.min_reward, self.max_reward
        )
    }
}

/// Runs a fixed count of training episodes against one agent and one
/// environment
///
/// Every episode restarts from the environment's start state; the exploration
/// rate decays across episodes through the agent's schedule. The only state
/// carried between episodes is the agent's table and episode counter.
pub struct Trainer {
    config: TrainerConfig,
}

impl Trainer {
    /// **Panics** if `episodes`, `window`, or `progress_every` is zero
    pub fn new(config: TrainerConfig) -> Self {
        assert!(config.episodes > 0, "`episodes` must be nonzero");
        assert!(config.window > 0, "`window` must be nonzero");
        assert!(config.progress_every > 0, "`progress_every` must be nonzero");
        Self { config }
    }

    /// Train `agent` on `env` for the configured number of episodes
    pub fn train<E, D, R>(
        &self,
        agent: &mut QTableAgent<E, D>,
        env: &E,
        rng: &mut R,
    ) -> TrainingSummary
    where
        E: Environment,
        E::State: Hashable,
        E::Action: Hashable,
        D: Decay,
        R: Rng,
    {
        let TrainerConfig {
            episodes,
            window,
            progress_every,
        } = self.config;

        let mut rewards = RingBuffer::new(window);
        let mut progress = Vec::with_capacity((episodes / progress_every) as usize);

        for ep in 0..episodes {
            agent.go(env, rng);
            let report = agent.report.take();
            rewards.push(report["reward"]);
            debug!(
                "episode {} finished: reward={:.2} steps={}",
                ep + 1,
                report["reward"],
                report["steps"]
            );

            if (ep + 1) % progress_every == 0 {
                let point = Progress {
                    episode: ep + 1,
                    epsilon: agent.epsilon(),
                };
                info!("episode={:04} eps={:.3}", point.episode, point.epsilon);
                progress.push(point);
            }
        }

        summarize(episodes, rewards.view(), progress)
    }
}

fn summarize(episodes: u32, window: &[f64], progress: Vec<Progress>) -> TrainingSummary {
    let len = window.len();
    let sum: f64 = window.iter().sum();
    TrainingSummary {
        episodes,
        window_len: len,
        mean_reward: sum / len as f64,
        min_reward: window.iter().copied().fold(f64::INFINITY, f64::min),
        max_reward: window.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        progress,
    }
}
