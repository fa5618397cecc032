use rand::Rng;
use strum::VariantArray;

use crate::env::{Environment, Transition};

/// Position coordinates as `(row, col)`
pub type Pos = (usize, usize);

#[derive(VariantArray, strum::Display, Clone, Copy, Debug, Hash, PartialEq, Eq)]
#[strum(serialize_all = "UPPERCASE")]
pub enum Action {
    Up,
    Down,
    Left,
    Right,
}

impl Action {
    /// Row/col movement as `(dr, dc)`
    fn delta(self) -> (isize, isize) {
        match self {
            Action::Up => (-1, 0),
            Action::Down => (1, 0),
            Action::Left => (0, -1),
            Action::Right => (0, 1),
        }
    }
}

/// A square grid navigation task
///
/// The agent starts in one corner and must reach the goal cell while
/// avoiding a trap cell. Movement off the edge is clamped to the boundary.
/// Every non-terminal step costs a little, so shorter paths score higher;
/// arriving at the trap or the goal ends the episode regardless of the
/// direction of approach.
pub struct GridWorld {
    size: usize,
    start: Pos,
    goal: Pos,
    trap: Pos,
}

impl GridWorld {
    const STEP_REWARD: f32 = -0.1;
    const TRAP_REWARD: f32 = -10.0;
    const GOAL_REWARD: f32 = 10.0;

    /// Initialize a grid of `size` x `size` cells
    ///
    /// **Panics** if any of the given positions lies outside the grid
    pub fn new(size: usize, start: Pos, goal: Pos, trap: Pos) -> Self {
        for pos in [start, goal, trap] {
            assert!(
                pos.0 < size && pos.1 < size,
                "Position {:?} outside a {}x{} grid",
                pos,
                size,
                size
            );
        }
        Self {
            size,
            start,
            goal,
            trap,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn goal(&self) -> Pos {
        self.goal
    }

    pub fn trap(&self) -> Pos {
        self.trap
    }
}

impl Default for GridWorld {
    fn default() -> Self {
        Self::new(5, (0, 0), (4, 4), (3, 2))
    }
}

impl Environment for GridWorld {
    type State = Pos;
    type Action = Action;

    fn start(&self) -> Self::State {
        self.start
    }

    fn actions(&self) -> Vec<Self::Action> {
        Action::VARIANTS.to_vec()
    }

    fn step<R: Rng>(&self, state: Pos, action: Action, _rng: &mut R) -> Transition<Pos> {
        let (dr, dc) = action.delta();
        let bound = self.size as isize - 1;
        let next_state = (
            (state.0 as isize + dr).clamp(0, bound) as usize,
            (state.1 as isize + dc).clamp(0, bound) as usize,
        );

        if next_state == self.trap {
            Transition {
                next_state,
                reward: Self::TRAP_REWARD,
                done: true,
            }
        } else if next_state == self.goal {
            Transition {
                next_state,
                reward: Self::GOAL_REWARD,
                done: true,
            }
        } else {
            Transition {
                next_state,
                reward: Self::STEP_REWARD,
                done: false,
            }
        }
    }
}
