//! # Project Tests
//!
//! Integration tests for the countries workspace. The scenarios live under
//! `tests/` and exercise `lib_countries` through its public API.

#![forbid(unsafe_code)]
