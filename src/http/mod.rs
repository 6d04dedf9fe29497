/// HTTP client layer for the target demo service.
pub mod client;
