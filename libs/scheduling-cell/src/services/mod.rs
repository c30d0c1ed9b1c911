pub mod conflict;
pub mod lifecycle;
pub mod query;
pub mod scheduler;
pub mod slots;
pub mod store;
