//! Offline sync domain models and capability contracts.

mod connectivity;
mod delivery;
mod offline_queue_model;
mod store;

pub use connectivity::*;
pub use delivery::*;
pub use offline_queue_model::*;
pub use store::*;
