//! Utility modules

pub mod case;
pub mod config;
pub mod logger;
