//! Shared fixtures and assertions for integration tests.

pub mod model_fixtures;
