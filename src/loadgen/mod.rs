/// Synthetic load generation against the demo service.
pub mod config;
pub mod report;
pub mod runner;
pub mod tasks;
