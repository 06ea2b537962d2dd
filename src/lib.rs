// Export modules for testing and usage
pub mod cli;
pub mod command;
pub mod config;
pub mod container;
pub mod error;
pub mod heroku;
pub mod orchestrator;
pub mod restore;
pub mod version;
