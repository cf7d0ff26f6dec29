//! Infrastructure adapters

pub mod email;
pub mod files;
pub mod http;
