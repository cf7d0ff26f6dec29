//! Domain layer

pub mod communication;
pub mod notifications;
