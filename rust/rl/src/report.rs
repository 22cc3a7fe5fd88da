//! Read-only summary of a finished run, for whoever wants to plot or store it.

use crate::algos::model_free::gradient_free::on_policy::n_step_mc::NStepMcPrediction;
use chrono::{DateTime, Utc};
use gridworld::*;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

pub const REPORT_FILE: &str = "report.json";
pub const GRID_FILE: &str = "value_grid.txt";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateValue {
    pub state: State,
    pub value: Continous,
    pub visits: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MseSummary {
    pub first: Continous,
    pub last: Continous,
    pub min: Continous,
}

#[derive(Debug, Clone, Serialize)]
pub struct TrainingReport {
    pub generated_at: DateTime<Utc>,
    pub grid_size: Discrete,
    pub n: usize,
    pub gamma: Continous,
    pub episodes: usize,
    /// Row-major.
    pub values: Vec<StateValue>,
    pub mse: Vec<Continous>,
    #[serde(skip)]
    grid: String,
}

impl TrainingReport {
    pub fn from_prediction(p: &NStepMcPrediction) -> Result<Self> {
        let values = p
            .env()
            .states()
            .map(|s| {
                Ok(StateValue {
                    state: s,
                    value: p.values().get(&s)?,
                    visits: p.visits().get(&s)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            generated_at: Utc::now(),
            grid_size: p.env().size(),
            n: p.params().n,
            gamma: p.params().gamma,
            episodes: p.mse_history().len(),
            values,
            mse: p.mse_history().to_vec(),
            grid: p.render_values()?,
        })
    }

    pub fn value_grid(&self) -> &str {
        &self.grid
    }

    pub fn mse_summary(&self) -> Option<MseSummary> {
        let first = *self.mse.first()?;
        let last = *self.mse.last()?;
        let min = self.mse.iter().copied().fold(Continous::INFINITY, Continous::min);

        Some(MseSummary { first, last, min })
    }

    /// Writes the JSON report and the value grid into `dir`, creating it if needed.
    pub fn write_to(&self, dir: impl AsRef<Path>) -> Result<PathBuf> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;

        let path = dir.join(REPORT_FILE);
        fs::write(&path, serde_json::to_string_pretty(self)?)?;
        fs::write(dir.join(GRID_FILE), format!("{}\n", self.grid))?;
        info!(path = %path.display(), "report written");

        Ok(path)
    }
}
