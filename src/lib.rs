mod activation;
mod error;
mod hyperparameters;
mod mnist;
mod network;
mod persist;
pub mod report;
mod search;
mod trainer;

pub use activation::ActivationType;
pub use error::{Error, Result};
pub use hyperparameters::{Config, SweepGrid, TrainingParams};
pub use mnist::{one_hot, Dataset};
pub use network::{Gradients, Network};
pub use persist::{save_parameters, BEST_MODEL_PATH};
pub use search::{run_sweep, sweep_failure, BestModel, SweepOutcome};
pub use trainer::{batch_ranges, train, MetricTrace};
