//! Integration tests
//!
//! These tests use wiremock to serve documents over real HTTP and exercise the
//! fetcher, resolver and full run end-to-end.

mod resolve_tests;
mod run_tests;
