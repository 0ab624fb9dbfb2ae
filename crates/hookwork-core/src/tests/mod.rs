// Cross-module test suites
#[cfg(test)]
pub(crate) mod integration;
