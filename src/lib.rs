pub mod command;
pub mod config;
pub mod debugger;
pub mod executor;
pub mod parser;
