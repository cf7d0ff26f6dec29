//! Mail delivery backends

pub mod smtp;
