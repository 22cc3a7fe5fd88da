extern crate itertools;
extern crate serde;
extern crate serde_json;

pub mod common;
pub mod mdps;
pub mod ui;

pub use common::defs::*;
pub use common::error::{Error, Result};

use itertools::{iproduct, Itertools};
use std::collections::HashMap;

/// Square gridworld with deterministic moves and absorbing reward cells.
///
/// Every state listed in the reward table is terminal: acting from it leaves the
/// agent in place and yields that state's reward again. All other cells give zero.
#[derive(Debug, Clone)]
pub struct GridWorld {
    size: Discrete,
    rewards: HashMap<State, Continous>,
}

impl GridWorld {
    pub fn new<I>(size: Discrete, rewards: I) -> Result<Self>
    where
        I: IntoIterator<Item = (State, Continous)>,
    {
        if size == 0 {
            return Err(Error::config("grid must contain at least one cell"));
        }

        let mut table = HashMap::new();
        for (s, r) in rewards {
            if s.row >= size || s.col >= size {
                return Err(Error::config(format!(
                    "reward state {s} lies outside the {size}x{size} grid"
                )));
            }
            if table.insert(s, r).is_some() {
                return Err(Error::config(format!("duplicate reward for state {s}")));
            }
        }

        Ok(Self {
            size,
            rewards: table,
        })
    }

    pub fn size(&self) -> Discrete {
        self.size
    }

    pub fn n_s(&self) -> usize {
        self.size * self.size
    }

    pub fn contains(&self, s: &State) -> bool {
        s.row < self.size && s.col < self.size
    }

    /// All cells, row-major.
    pub fn states(&self) -> impl Iterator<Item = State> {
        let n = self.size;
        iproduct!(0..n, 0..n).map(State::from)
    }

    pub fn non_terminal_states(&self) -> Vec<State> {
        self.states().filter(|s| !self.is_terminal(s)).collect()
    }

    pub fn is_terminal(&self, s: &State) -> bool {
        self.rewards.contains_key(s)
    }

    pub fn reward_of(&self, s: &State) -> Continous {
        self.rewards.get(s).copied().unwrap_or_default()
    }

    pub fn rewards(&self) -> &HashMap<State, Continous> {
        &self.rewards
    }

    /// Reward is credited on entering a terminal cell. Moves into a wall leave that
    /// axis unchanged.
    pub fn step(&self, s: &State, a: Action) -> (State, Continous) {
        if let Some(&r) = self.rewards.get(s) {
            return (*s, r);
        }

        let (dr, dc) = a.delta();
        let next = State::new(self.shift(s.row, dr), self.shift(s.col, dc));

        (next, self.reward_of(&next))
    }

    fn shift(&self, x: Discrete, d: isize) -> Discrete {
        x.saturating_add_signed(d).min(self.size - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assertor::*;
    use rstest::*;

    fn sample_grid() -> GridWorld {
        GridWorld::new(3, [(State::new(0, 2), 1.), (State::new(2, 2), -1.)]).unwrap()
    }

    #[rstest]
    fn terminal_states_absorb_every_action(
        #[values(Action::Up, Action::Down, Action::Left, Action::Right)] a: Action,
        #[values((0, 2, 1.), (2, 2, -1.))] terminal: (Discrete, Discrete, Continous),
    ) {
        let env = sample_grid();
        let s = State::new(terminal.0, terminal.1);

        assert_eq!(env.step(&s, a), (s, terminal.2));
    }

    #[rstest]
    #[case(Action::Up)]
    #[case(Action::Left)]
    fn corner_moves_into_walls_are_noops(#[case] a: Action) {
        let env = sample_grid();
        let origin = State::new(0, 0);

        assert_eq!(env.step(&origin, a), (origin, 0.));
    }

    #[rstest]
    #[case(State::new(1, 1), Action::Up, State::new(0, 1))]
    #[case(State::new(1, 1), Action::Down, State::new(2, 1))]
    #[case(State::new(1, 1), Action::Left, State::new(1, 0))]
    #[case(State::new(1, 1), Action::Right, State::new(1, 2))]
    #[case(State::new(2, 0), Action::Down, State::new(2, 0))]
    #[case(State::new(1, 2), Action::Right, State::new(1, 2))]
    fn moves_are_clamped_per_axis(#[case] s: State, #[case] a: Action, #[case] next: State) {
        let env = sample_grid();

        assert_eq!(env.step(&s, a), (next, 0.));
    }

    #[test]
    fn reward_is_credited_on_entering_terminal() {
        let env = sample_grid();

        assert_eq!(env.step(&State::new(0, 1), Action::Right), (State::new(0, 2), 1.));
        assert_eq!(env.step(&State::new(1, 2), Action::Down), (State::new(2, 2), -1.));
    }

    #[test]
    fn state_enumeration_is_row_major() {
        let env = sample_grid();
        let states = env.states().collect::<Vec<_>>();

        assert_that!(states.len()).is_equal_to(9);
        assert_that!(states[0]).is_equal_to(State::new(0, 0));
        assert_that!(states[5]).is_equal_to(State::new(1, 2));
        assert!(!env.non_terminal_states().contains(&State::new(0, 2)));
        assert_that!(env.non_terminal_states().len()).is_equal_to(7);
    }

    #[test]
    fn rejects_empty_grid_and_outside_rewards() {
        assert!(matches!(
            GridWorld::new(0, Vec::<(State, Continous)>::new()),
            Err(Error::Configuration(_))
        ));
        assert!(matches!(
            GridWorld::new(3, [(State::new(3, 0), 1.)]),
            Err(Error::Configuration(_))
        ));
        assert!(matches!(
            GridWorld::new(3, [(State::new(0, 0), 1.), (State::new(0, 0), 2.)]),
            Err(Error::Configuration(_))
        ));
    }
}
