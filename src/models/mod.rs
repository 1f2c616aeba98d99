pub mod metrics;
pub mod run;

pub use metrics::DeliveryMetrics;
pub use run::{Run, RunStatus};
