use super::*;

pub trait Policy {
    fn action(&self, s: &State) -> Result<Action>;
}

/// Fixed deterministic policy: one action per state.
#[derive(Debug, Clone, Default)]
pub struct TabularPolicy {
    actions: HashMap<State, Action>,
}

impl TabularPolicy {
    pub fn new<I>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (State, Action)>,
    {
        let mut actions = HashMap::new();
        for (s, a) in entries {
            if actions.insert(s, a).is_some() {
                return Err(Error::config(format!("duplicate policy entry for state {s}")));
            }
        }

        Ok(Self { actions })
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Checks that the policy stays on the grid and acts in every non-terminal state.
    pub fn check_covers(&self, env: &GridWorld) -> Result<()> {
        if let Some(s) = self.actions.keys().find(|s| !env.contains(s)) {
            return Err(Error::config(format!(
                "policy state {s} lies outside the {0}x{0} grid",
                env.size()
            )));
        }

        let missing = env
            .non_terminal_states()
            .into_iter()
            .filter(|s| !self.actions.contains_key(s))
            .collect::<Vec<_>>();
        if !missing.is_empty() {
            return Err(Error::config(format!(
                "policy has no action for non-terminal states {}",
                missing.iter().join(", ")
            )));
        }

        Ok(())
    }
}

impl Policy for TabularPolicy {
    fn action(&self, s: &State) -> Result<Action> {
        self.actions
            .get(s)
            .copied()
            .ok_or(Error::LookupFailure {
                table: "policy",
                state: *s,
            })
    }
}
