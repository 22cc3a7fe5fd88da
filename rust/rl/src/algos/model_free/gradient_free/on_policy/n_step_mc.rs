//! n-step Monte Carlo prediction of a fixed policy's state values.
//!
//! Each return sums up to `n` observed rewards and, when the episode runs past the
//! horizon, bootstraps the rest from the current value estimate. `n = 1` gives the
//! TD(0) target; `n` at least as long as the episode gives the plain Monte Carlo
//! return.

use crate::mdps::{mdp_simulator::*, tables::*};
use gridworld::{ui::*, *};
use rand::prelude::*;
use serde::{Deserialize, Serialize};
use std::rc::Rc;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepSize {
    /// `1 / N(s)`: every estimate is the plain mean of the returns seen for its state.
    #[default]
    SampleAverage,
    Constant(Continous),
}

impl StepSize {
    pub fn alpha(&self, visits: u64) -> Continous {
        match self {
            StepSize::SampleAverage => 1. / visits as Continous,
            StepSize::Constant(alpha) => *alpha,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NStepParams {
    pub n: usize,
    pub gamma: Continous,
    pub step_size: StepSize,
}

impl NStepParams {
    pub fn validate(&self) -> Result<()> {
        if self.n == 0 {
            return Err(Error::config("n must be at least 1"));
        }
        if !(self.gamma > 0. && self.gamma < 1.) {
            return Err(Error::config(format!(
                "gamma must lie in (0, 1), got {}",
                self.gamma
            )));
        }
        if let StepSize::Constant(alpha) = self.step_size {
            if !(alpha > 0. && alpha <= 1.) {
                return Err(Error::config(format!(
                    "constant step size must lie in (0, 1], got {alpha}"
                )));
            }
        }

        Ok(())
    }
}

/// Truncated discounted return from index `t`, bootstrapped from `values` when the
/// episode continues past `t + n`.
pub fn n_step_return(
    ep: &[EpisodeEvent],
    t: usize,
    params: &NStepParams,
    values: &ValueTable,
) -> Result<Continous> {
    let remaining = match ep.len().checked_sub(t) {
        Some(r) if r > 0 => r,
        _ => {
            return Err(Error::config(format!(
                "return index {t} is outside an episode of length {}",
                ep.len()
            )))
        }
    };
    let n_eff = params.n.min(remaining);

    let mut g = 0.;
    let mut disc = 1.;
    for e in &ep[t..t + n_eff] {
        g += disc * e.r;
        disc *= params.gamma;
    }

    // n_eff == n here, so disc is gamma^n.
    if params.n < remaining {
        g += disc * values.get(&ep[t + params.n].s)?;
    }

    Ok(g)
}

/// Updates `values` in place for every non-terminal state of `ep`, in episode order.
/// Later indices bootstrap from estimates already updated earlier in the same pass.
pub fn n_step_update(
    ep: &[EpisodeEvent],
    params: &NStepParams,
    env: &GridWorld,
    values: &mut ValueTable,
    visits: &mut VisitCounter,
) -> Result<()> {
    for t in 0..ep.len() {
        let s = ep[t].s;
        if env.is_terminal(&s) {
            continue;
        }

        let g = n_step_return(ep, t, params, values)?;
        let k = visits.increment(&s)?;
        let v = values.get_mut(&s)?;
        *v += params.step_size.alpha(k) * (g - *v);
    }

    Ok(())
}

/// Training driver: samples a start state, rolls out an episode and folds its
/// returns into the value table, once per episode.
pub struct NStepMcPrediction {
    env: Rc<GridWorld>,
    ep_gen: Rc<dyn EpisodeGenerator>,
    params: NStepParams,
    max_steps: usize,
    report_every: usize,
    start_states: Vec<State>,
    values: ValueTable,
    visits: VisitCounter,
    episode: Vec<EpisodeEvent>,
    mse: Vec<Continous>,
    rng: StdRng,
}

impl NStepMcPrediction {
    pub fn new(
        env: Rc<GridWorld>,
        ep_gen: Rc<dyn EpisodeGenerator>,
        params: NStepParams,
        max_steps: usize,
        seed: Option<u64>,
    ) -> Result<Self> {
        params.validate()?;
        if max_steps == 0 {
            return Err(Error::config("max_steps must be at least 1"));
        }

        let start_states = env.non_terminal_states();
        if start_states.is_empty() {
            return Err(Error::config("every state is terminal, no episode can start"));
        }

        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Self {
            values: ValueTable::new(&env),
            visits: VisitCounter::new(&env),
            env,
            ep_gen,
            params,
            max_steps,
            report_every: 0,
            start_states,
            episode: Vec::new(),
            mse: Vec::new(),
            rng,
        })
    }

    /// Logs the value grid every `every` episodes; 0 turns it off.
    pub fn with_report_every(mut self, every: usize) -> Self {
        self.report_every = every;
        self
    }

    pub fn train(&mut self, num_episodes: usize) -> Result<()> {
        if num_episodes == 0 {
            return Err(Error::config("num_episodes must be at least 1"));
        }

        for i in 0..num_episodes {
            let mse = self.train_episode()?;
            debug!(episode = i, len = self.episode.len(), mse, "episode done");

            if self.report_every > 0 && i % self.report_every == 0 {
                info!("Iteration {i}, values:\n{}", self.render_values()?);
            }
        }

        Ok(())
    }

    /// Runs one generate/update round and returns its mean squared value change.
    pub fn train_episode(&mut self) -> Result<Continous> {
        let prev = self.values.clone();
        let start = *self
            .start_states
            .choose(&mut self.rng)
            .ok_or_else(|| Error::config("no non-terminal start state"))?;

        self.episode = self.ep_gen.generate(start, self.max_steps)?;
        n_step_update(
            &self.episode,
            &self.params,
            &self.env,
            &mut self.values,
            &mut self.visits,
        )?;

        let mse = self.values.mean_squared_difference(&prev)?;
        self.mse.push(mse);

        Ok(mse)
    }

    pub fn env(&self) -> &GridWorld {
        &self.env
    }

    pub fn params(&self) -> &NStepParams {
        &self.params
    }

    pub fn values(&self) -> &ValueTable {
        &self.values
    }

    pub fn visits(&self) -> &VisitCounter {
        &self.visits
    }

    /// Most recently generated episode.
    pub fn episode(&self) -> &[EpisodeEvent] {
        &self.episode
    }

    pub fn mse_history(&self) -> &[Continous] {
        &self.mse
    }

    pub fn render_values(&self) -> Result<String> {
        Ok(render_value_grid(&value_matrix(
            &self.env,
            self.values.as_map(),
        )?))
    }
}
