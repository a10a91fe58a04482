pub mod actuator;
pub mod config;
pub mod error;
pub mod input;
pub mod messages;
pub mod motion;
pub mod pose;
pub mod runtime;
