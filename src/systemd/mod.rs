// Systemd integration module

pub mod client;
pub mod control;
pub mod models;
pub mod status;


pub use client::SystemdClient;
pub use control::ServiceController;
pub use models::{CiStatus, ServiceStatus};
