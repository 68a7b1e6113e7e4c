//! Unit tests module
//!
//! Contains unit tests for individual components through the public API.

mod extraction; // off-DOM fragment extraction and splicing
mod tab_families; // feature rebinding
