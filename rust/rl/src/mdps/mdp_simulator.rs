use gridworld::{mdps::Policy, *};
use std::rc::Rc;
use tracing::trace;

pub trait EpisodeGenerator {
    /// Rolls out at most `max_steps` steps from `start`.
    fn generate(&self, start: State, max_steps: usize) -> Result<Vec<EpisodeEvent>>;
}

/// Follows a fixed policy through the grid until a terminal state is entered.
pub struct PolicyRollout {
    env: Rc<GridWorld>,
    policy: Rc<dyn Policy>,
}

impl PolicyRollout {
    pub fn new(env: Rc<GridWorld>, policy: Rc<dyn Policy>) -> Self {
        Self { env, policy }
    }
}

impl EpisodeGenerator for PolicyRollout {
    fn generate(&self, start: State, max_steps: usize) -> Result<Vec<EpisodeEvent>> {
        let mut ep = Vec::new();
        let mut s = start;
        for _ in 0..max_steps {
            let a = self.policy.action(&s)?;
            let (next, r) = self.env.step(&s, a);
            trace!(state = %s, action = %a, next = %next, reward = r, "rollout step");
            ep.push(EpisodeEvent { s, a, r });

            if self.env.is_terminal(&next) {
                break;
            }
            s = next;
        }

        Ok(ep)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PredictorConfig;
    use assertor::*;
    use gridworld::mdps::TabularPolicy;
    use rstest::*;

    fn sample_rollout() -> (Rc<GridWorld>, PolicyRollout) {
        let cfg = PredictorConfig::default();
        let env = Rc::new(cfg.environment().unwrap());
        let policy = Rc::new(cfg.tabular_policy().unwrap());

        (Rc::clone(&env), PolicyRollout::new(env, policy))
    }

    #[test]
    fn sample_policy_reaches_goal_from_bottom_left() {
        let (_, gen) = sample_rollout();
        let ep = gen.generate(State::new(2, 0), 100).unwrap();

        assert_eq!(
            ep,
            vec![
                EpisodeEvent { s: State::new(2, 0), a: Action::Up, r: 0. },
                EpisodeEvent { s: State::new(1, 0), a: Action::Up, r: 0. },
                EpisodeEvent { s: State::new(0, 0), a: Action::Right, r: 0. },
                EpisodeEvent { s: State::new(0, 1), a: Action::Right, r: 1. },
            ]
        );
    }

    #[rstest]
    #[case(100)]
    #[case(5)]
    #[case(2)]
    #[case(1)]
    fn episodes_end_at_terminal_or_cap(#[case] max_steps: usize) {
        let (env, gen) = sample_rollout();

        for start in env.non_terminal_states() {
            let ep = gen.generate(start, max_steps).unwrap();
            assert_that!(ep.len()).is_at_most(max_steps);
            assert_that!(ep.len()).is_at_least(1);

            let last = ep.last().unwrap();
            let (next, r) = env.step(&last.s, last.a);
            assert_eq!(r, last.r);
            if ep.len() < max_steps {
                assert!(env.is_terminal(&next), "episode from {start} stopped early");
            }
        }
    }

    #[test]
    fn wall_loop_runs_until_cap() {
        let (_, gen) = sample_rollout();
        let ep = gen.generate(State::new(1, 2), 100).unwrap();

        assert_eq!(ep.len(), 100);
        assert!(ep.iter().all(|e| e.s == State::new(1, 2) && e.r == 0.));
    }

    #[test]
    fn missing_policy_entry_surfaces_as_lookup_failure() {
        let env = Rc::new(GridWorld::new(2, [(State::new(0, 1), 1.)]).unwrap());
        let policy = Rc::new(TabularPolicy::new([(State::new(1, 0), Action::Up)]).unwrap());
        let gen = PolicyRollout::new(env, policy);

        let err = gen.generate(State::new(1, 0), 10).unwrap_err();
        assert!(matches!(
            err,
            Error::LookupFailure { table: "policy", state } if state == State::new(0, 0)
        ));
    }
}
