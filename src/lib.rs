//! Bloby library exports for the binary and integration tests

pub mod chat;
pub mod core;
pub mod relay;
pub mod tui;

#[cfg(test)]
pub mod test_support;
