pub mod orchestrator;
pub mod pending;
pub mod registrar;
pub mod registry;
pub mod sorter;

pub use orchestrator::Orchestrator;
pub use pending::{ComponentState, PendingSetup};
pub use registrar::Registrar;
pub use registry::ServiceRegistry;
pub use sorter::{order_records, sort_components};
