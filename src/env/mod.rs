use std::{
    collections::{hash_map::Entry, HashMap},
    ops::Index,
};

use rand::{seq::IteratorRandom, Rng};

/// The outcome of one environment step
///
/// `next_state` is always inside the declared state space; environments clamp
/// out-of-range movement rather than erroring. `done == true` is terminal and
/// no further steps may be taken in that episode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition<S> {
    pub next_state: S,
    pub reward: f32,
    pub done: bool,
}

/// Represents a Markov decision process, defining the dynamics of an environment
/// in which an agent can operate.
///
/// This base trait represents the common case of a discrete-time MDP with one agent,
/// a finite state space, and a finite action space that is identical across states.
///
/// The transition function is pure: an environment value holds the rules of its
/// world (geometry, reward constants), never the state of an episode in progress.
/// Callers thread the current state through [`step`](Environment::step) themselves,
/// so one environment instance can serve any number of independent runs.
pub trait Environment {
    /// A representation of the state of the environment to be passed to an agent
    type State: Copy;

    /// A representation of an action that an agent can take to affect the environment
    type Action: Copy;

    /// The designated start state for every episode
    fn start(&self) -> Self::State;

    /// Get the available actions, in a fixed order
    ///
    /// The returned vector must be non-empty and must not depend on the current state.
    fn actions(&self) -> Vec<Self::Action>;

    /// Compute the transition for taking `action` in `state`
    ///
    /// Deterministic given the same RNG draws.
    fn step<R: Rng>(&self, state: Self::State, action: Self::Action, rng: &mut R)
        -> Transition<Self::State>;

    /// Sample an action uniformly at random
    fn random_action<R: Rng>(&self, rng: &mut R) -> Self::Action {
        self.actions()
            .into_iter()
            .choose(rng)
            .expect("action set is not empty")
    }
}

/// Represents a single experience or transition in the environment
///
/// Produced by the learner while training and by
/// [`greedy_rollout`](crate::eval::greedy_rollout) as the element of an
/// evaluation trace.
pub struct Exp<E: Environment> {
    /// The state of the environment before taking the action
    pub state: E::State,
    /// The action taken in the given state
    pub action: E::Action,
    /// The state of the environment after the action was taken
    pub next_state: E::State,
    /// The reward received after taking the action
    pub reward: f32,
}

impl<E: Environment> Clone for Exp<E> {
    fn clone(&self) -> Self {
        Self {
            state: self.state,
            action: self.action,
            next_state: self.next_state,
            reward: self.reward,
        }
    }
}

impl<E: Environment> std::fmt::Debug for Exp<E>
where
    E::State: std::fmt::Debug,
    E::Action: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Exp")
            .field("state", &self.state)
            .field("action", &self.action)
            .field("next_state", &self.next_state)
            .field("reward", &self.reward)
            .finish()
    }
}

impl<E: Environment> PartialEq for Exp<E>
where
    E::State: PartialEq,
    E::Action: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.state == other.state
            && self.action == other.action
            && self.next_state == other.next_state
            && self.reward == other.reward
    }
}

/// A per-episode accumulator for a fixed set of named metrics
///
/// Metrics start at zero, are bumped through [`entry`](Report::entry) while an
/// episode runs, and are harvested with [`take`](Report::take) at the episode
/// boundary, which resets them for the next episode.
#[derive(Debug, Clone)]
pub struct Report {
    keys: Vec<&'static str>,
    data: HashMap<&'static str, f64>,
}

impl Report {
    pub fn new(keys: Vec<&'static str>) -> Self {
        let data = keys.iter().map(|&k| (k, 0.0)).collect();
        Self { keys, data }
    }

    /// The metric names, in declaration order
    pub fn keys(&self) -> &[&'static str] {
        &self.keys
    }

    pub fn entry(&mut self, key: &'static str) -> Entry<'_, &'static str, f64> {
        self.data.entry(key)
    }

    /// Harvest the current values and reset all metrics to zero
    pub fn take(&mut self) -> HashMap<&'static str, f64> {
        let fresh = self.keys.iter().map(|&k| (k, 0.0)).collect();
        std::mem::replace(&mut self.data, fresh)
    }
}

impl Index<&str> for Report {
    type Output = f64;

    fn index(&self, key: &str) -> &Self::Output {
        &self.data[key]
    }
}
