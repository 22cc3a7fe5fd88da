use gridworld::*;
use std::collections::BTreeMap;

/// State-value estimates, total over the grid. Iterates row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueTable {
    values: BTreeMap<State, Continous>,
}

impl ValueTable {
    /// Terminal states start at (and keep) their reward, the rest at zero.
    pub fn new(env: &GridWorld) -> Self {
        Self {
            values: env.states().map(|s| (s, env.reward_of(&s))).collect(),
        }
    }

    pub fn get(&self, s: &State) -> Result<Continous> {
        self.values.get(s).copied().ok_or(Error::LookupFailure {
            table: "value",
            state: *s,
        })
    }

    pub fn get_mut(&mut self, s: &State) -> Result<&mut Continous> {
        self.values.get_mut(s).ok_or(Error::LookupFailure {
            table: "value",
            state: *s,
        })
    }

    pub fn as_map(&self) -> &BTreeMap<State, Continous> {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Mean over every state of the squared change relative to `prev`.
    pub fn mean_squared_difference(&self, prev: &ValueTable) -> Result<Continous> {
        if self.values.is_empty() {
            return Ok(0.);
        }

        let mut total = 0.;
        for (s, v) in &self.values {
            total += (v - prev.get(s)?).powi(2);
        }

        Ok(total / self.values.len() as Continous)
    }
}

/// Number of value updates each state has received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisitCounter {
    counts: BTreeMap<State, u64>,
}

impl VisitCounter {
    pub fn new(env: &GridWorld) -> Self {
        Self {
            counts: env.states().map(|s| (s, 0)).collect(),
        }
    }

    pub fn get(&self, s: &State) -> Result<u64> {
        self.counts.get(s).copied().ok_or(Error::LookupFailure {
            table: "visit",
            state: *s,
        })
    }

    /// Bumps the count for `s`, returning the new count.
    pub fn increment(&mut self, s: &State) -> Result<u64> {
        let c = self.counts.get_mut(s).ok_or(Error::LookupFailure {
            table: "visit",
            state: *s,
        })?;
        *c += 1;

        Ok(*c)
    }

    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_eq::*;

    fn grid() -> GridWorld {
        GridWorld::new(3, [(State::new(0, 2), 1.), (State::new(2, 2), -1.)]).unwrap()
    }

    #[test]
    fn value_table_starts_from_terminal_rewards() {
        let v = ValueTable::new(&grid());

        assert_eq!(v.len(), 9);
        assert_eq!(v.get(&State::new(0, 2)).unwrap(), 1.);
        assert_eq!(v.get(&State::new(2, 2)).unwrap(), -1.);
        assert_eq!(v.get(&State::new(1, 1)).unwrap(), 0.);
        assert!(matches!(
            v.get(&State::new(3, 3)),
            Err(Error::LookupFailure { table: "value", .. })
        ));
    }

    #[test]
    fn mean_squared_difference_covers_all_states() {
        let prev = ValueTable::new(&grid());
        let mut next = prev.clone();
        *next.get_mut(&State::new(0, 0)).unwrap() = 0.9;
        *next.get_mut(&State::new(1, 0)).unwrap() = -0.3;

        assert_float_eq!(
            next.mean_squared_difference(&prev).unwrap(),
            (0.81 + 0.09) / 9.,
            abs <= 1e-12
        );
        assert_eq!(prev.mean_squared_difference(&prev).unwrap(), 0.);
    }

    #[test]
    fn visit_counter_is_monotonic() {
        let mut visits = VisitCounter::new(&grid());
        let s = State::new(1, 1);

        assert_eq!(visits.get(&s).unwrap(), 0);
        assert_eq!(visits.increment(&s).unwrap(), 1);
        assert_eq!(visits.increment(&s).unwrap(), 2);
        assert_eq!(visits.total(), 2);
        assert!(visits.increment(&State::new(9, 9)).is_err());
    }
}
