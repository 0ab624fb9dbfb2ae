#![cfg(test)]

pub mod common;
pub mod lifecycle_tests;
pub mod scope_tests;
pub mod shutdown_tests;
