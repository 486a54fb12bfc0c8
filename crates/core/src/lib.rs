pub mod config;
pub mod downloader;
pub mod events;
pub mod indexer;
pub mod library;
pub mod metrics;
pub mod orchestrator;
pub mod scheduler;
pub mod selection;
pub mod testing;

pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, SanitizedConfig,
};
pub use orchestrator::{OrchestratorError, SearchOrchestrator};
pub use scheduler::JobScheduler;
