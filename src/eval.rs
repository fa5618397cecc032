use rand::Rng;

use crate::{
    algo::tabular::{q_table::QTable, Hashable},
    env::{Environment, Exp, Transition},
};

/// Run the greedy policy implied by a table, with no exploration
///
/// Starts from the environment's start state and records one [`Exp`] per
/// step, ending on a terminal transition or after `max_steps` steps,
/// whichever comes first. Given a fixed table and a seeded RNG the trace is
/// reproducible; any variation across calls comes from the environment's own
/// stochastic outcomes.
///
/// The trace is an artifact for display and logging; nothing in the engine
/// consumes it.
pub fn greedy_rollout<E, R>(
    env: &E,
    q_table: &QTable<E::State, E::Action>,
    max_steps: usize,
    rng: &mut R,
) -> Vec<Exp<E>>
where
    E: Environment,
    E::State: Hashable,
    E::Action: Hashable,
    R: Rng,
{
    let actions = env.actions();
    let mut trace = Vec::new();
    let mut state = env.start();

    for _ in 0..max_steps {
        let action = q_table.best_action(state, &actions);
        let Transition {
            next_state,
            reward,
            done,
        } = env.step(state, action, rng);

        trace.push(Exp {
            state,
            action,
            next_state,
            reward,
        });

        state = next_state;
        if done {
            break;
        }
    }

    trace
}
