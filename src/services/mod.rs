pub mod engine;
pub mod run_service;
pub mod snapshot;
pub mod stats_service;

pub use run_service::RunService;
pub use snapshot::SnapshotStore;
pub use stats_service::StatsService;
