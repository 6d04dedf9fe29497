/// Obsbench library - exposes modules for testing and external use.
pub mod diagram;
pub mod error;
pub mod http;
pub mod loadgen;
