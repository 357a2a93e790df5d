pub mod context;
pub mod error;
pub mod orrery;
pub mod types;
