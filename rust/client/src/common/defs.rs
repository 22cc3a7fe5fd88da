use super::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub type Discrete = usize;
pub type Continous = f64;

/// A grid cell. Serialized as a `[row, col]` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "(Discrete, Discrete)", into = "(Discrete, Discrete)")]
pub struct State {
    pub row: Discrete,
    pub col: Discrete,
}

impl State {
    pub const fn new(row: Discrete, col: Discrete) -> Self {
        Self { row, col }
    }
}

impl From<(Discrete, Discrete)> for State {
    fn from((row, col): (Discrete, Discrete)) -> Self {
        Self { row, col }
    }
}

impl From<State> for (Discrete, Discrete) {
    fn from(s: State) -> Self {
        (s.row, s.col)
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum Action {
    Up,
    Down,
    Left,
    Right,
}

impl Action {
    pub const ALL: [Action; 4] = [Action::Up, Action::Down, Action::Left, Action::Right];

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Up => "up",
            Action::Down => "down",
            Action::Left => "left",
            Action::Right => "right",
        }
    }

    /// Displacement as (row, col).
    pub fn delta(&self) -> (isize, isize) {
        match self {
            Action::Up => (-1, 0),
            Action::Down => (1, 0),
            Action::Left => (0, -1),
            Action::Right => (0, 1),
        }
    }
}

impl FromStr for Action {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "up" => Ok(Action::Up),
            "down" => Ok(Action::Down),
            "left" => Ok(Action::Left),
            "right" => Ok(Action::Right),
            other => Err(Error::InvalidAction(other.to_string())),
        }
    }
}

impl TryFrom<String> for Action {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<Action> for &'static str {
    fn from(a: Action) -> Self {
        a.as_str()
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One step of a rollout: the state acted from, the action taken and the reward received.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EpisodeEvent {
    pub s: State,
    pub a: Action,
    pub r: Continous,
}

#[cfg(test)]
mod tests {
    use super::*;
    use assertor::*;
    use rstest::*;

    #[rstest]
    #[case("up", Action::Up)]
    #[case("down", Action::Down)]
    #[case("left", Action::Left)]
    #[case("right", Action::Right)]
    fn action_parses_lowercase_tags(#[case] tag: &str, #[case] expected: Action) {
        assert_that!(tag.parse::<Action>().unwrap()).is_equal_to(expected);
        assert_that!(expected.to_string()).is_equal_to(tag.to_string());
    }

    #[rstest]
    #[case("Up")]
    #[case("north")]
    #[case("")]
    fn unknown_action_tag_is_rejected(#[case] tag: &str) {
        let err = tag.parse::<Action>().unwrap_err();
        assert!(matches!(err, Error::InvalidAction(ref t) if t == tag));
    }

    #[test]
    fn state_serializes_as_pair() {
        let s = State::new(2, 0);
        assert_eq!(serde_json::to_string(&s).unwrap(), "[2,0]");
        assert_eq!(serde_json::from_str::<State>("[0,2]").unwrap(), State::new(0, 2));
    }

    #[test]
    fn action_deserialization_fails_fast_on_unknown_tag() {
        assert_eq!(
            serde_json::from_str::<Action>("\"left\"").unwrap(),
            Action::Left
        );
        let err = serde_json::from_str::<Action>("\"jump\"").unwrap_err();
        assert!(err.to_string().contains("Unrecognized action: 'jump'"));
    }
}
