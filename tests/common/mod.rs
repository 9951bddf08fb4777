//! Common test utilities for integration tests.

#![allow(dead_code)]

pub mod bot;
pub mod server;

#[allow(unused_imports)]
pub use bot::TestBot;
pub use server::FakeServer;
