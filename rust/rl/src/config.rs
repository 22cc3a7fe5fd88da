use crate::algos::model_free::gradient_free::on_policy::n_step_mc::*;
use crate::mdps::mdp_simulator::PolicyRollout;
use gridworld::{mdps::TabularPolicy, *};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewardEntry {
    pub state: State,
    pub reward: Continous,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyEntry {
    pub state: State,
    pub action: Action,
}

/// Everything needed to set up a prediction run. Missing JSON fields fall back
/// to the 3x3 sample grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PredictorConfig {
    pub grid_size: Discrete,
    pub rewards: Vec<RewardEntry>,
    pub policy: Vec<PolicyEntry>,
    pub gamma: Continous,
    pub step_size: StepSize,
    pub n: usize,
    pub max_steps: usize,
    pub num_episodes: usize,
    pub seed: Option<u64>,
    pub report_every: usize,
}

impl Default for PredictorConfig {
    fn default() -> Self {
        let reward = |row, col, reward| RewardEntry {
            state: State::new(row, col),
            reward,
        };
        let act = |row, col, action| PolicyEntry {
            state: State::new(row, col),
            action,
        };

        Self {
            grid_size: 3,
            rewards: vec![reward(0, 2, 1.), reward(2, 2, -1.)],
            policy: vec![
                act(0, 0, Action::Right),
                act(0, 1, Action::Right),
                act(0, 2, Action::Right),
                act(1, 0, Action::Up),
                act(1, 1, Action::Up),
                act(1, 2, Action::Right),
                act(2, 0, Action::Up),
                act(2, 1, Action::Right),
                act(2, 2, Action::Up),
            ],
            gamma: 0.9,
            step_size: StepSize::SampleAverage,
            n: 7,
            max_steps: 100,
            num_episodes: 100,
            seed: None,
            report_every: 10,
        }
    }
}

impl PredictorConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_json(&fs::read_to_string(path)?)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let cfg = serde_json::from_str::<Self>(text)?;
        cfg.validate()?;

        Ok(cfg)
    }

    pub fn params(&self) -> NStepParams {
        NStepParams {
            n: self.n,
            gamma: self.gamma,
            step_size: self.step_size,
        }
    }

    pub fn environment(&self) -> Result<GridWorld> {
        GridWorld::new(
            self.grid_size,
            self.rewards.iter().map(|e| (e.state, e.reward)),
        )
    }

    pub fn tabular_policy(&self) -> Result<TabularPolicy> {
        TabularPolicy::new(self.policy.iter().map(|e| (e.state, e.action)))
    }

    pub fn validate(&self) -> Result<()> {
        self.params().validate()?;
        if self.max_steps == 0 {
            return Err(Error::config("max_steps must be at least 1"));
        }
        if self.num_episodes == 0 {
            return Err(Error::config("num_episodes must be at least 1"));
        }

        let env = self.environment()?;
        if env.non_terminal_states().is_empty() {
            return Err(Error::config("every state is terminal, no episode can start"));
        }
        self.tabular_policy()?.check_covers(&env)
    }

    /// Validates and wires up a predictor. Training is left to the caller.
    pub fn build(&self) -> Result<NStepMcPrediction> {
        self.validate()?;

        let env = Rc::new(self.environment()?);
        let policy = Rc::new(self.tabular_policy()?);
        let ep_gen = Rc::new(PolicyRollout::new(Rc::clone(&env), policy));

        Ok(
            NStepMcPrediction::new(env, ep_gen, self.params(), self.max_steps, self.seed)?
                .with_report_every(self.report_every),
        )
    }
}
