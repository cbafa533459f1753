//! Access token value objects built from token endpoint responses.

pub mod access;
pub mod secret;
