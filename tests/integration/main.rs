//! Integration tests for the harvester
//!
//! These tests use wiremock to create mock HTTP servers and run full crawl
//! sessions end-to-end.

mod common;
mod crawl_tests;
mod filter_tests;
mod render_tests;
