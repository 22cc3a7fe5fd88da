extern crate rand;
extern crate serde;
extern crate serde_json;

pub mod algos;
pub mod config;
pub mod mdps;
pub mod report;

pub use algos::model_free::gradient_free::on_policy::n_step_mc::{
    n_step_return, n_step_update, NStepMcPrediction, NStepParams, StepSize,
};
pub use config::PredictorConfig;
pub use gridworld::{Error, Result};
pub use report::TrainingReport;
