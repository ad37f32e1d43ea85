pub mod config;
pub mod error;
pub mod generator;
pub mod history;
pub mod models;
pub mod parse;
pub mod planner;
pub mod sampler;
pub mod schedule;

pub use error::{MilotoError, Result};
