//! Integration tests for page analysis and job orchestration
//!
//! These tests use wiremock to serve pages and probe targets so the whole
//! fetch, parse, probe and record cycle runs end-to-end.

mod analyzer_tests;
mod common;
mod orchestrator_tests;
