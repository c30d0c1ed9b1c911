pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use models::*;
pub use services::conflict::ConflictService;
pub use services::scheduler::SchedulingService;
pub use services::slots::SlotGrid;
