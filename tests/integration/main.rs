//! Integration tests for SERP Harvest
//!
//! These tests use wiremock to stand in for the SERP provider and exercise
//! the fetcher and the full batch end-to-end.

mod batch_tests;
mod common;
mod fetch_tests;
