pub(crate) mod scheduler_model;
pub(crate) mod scheduler_service;

pub use scheduler_model::{BatchOutcome, TriggerDefinition};
pub use scheduler_service::SchedulerService;
