pub mod app_config;
pub mod error;
pub mod manifest;

// Parsed tables and sort state
pub mod csv;
