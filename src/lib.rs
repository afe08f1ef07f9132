pub mod batch;
pub mod config;
pub mod db;
pub mod error;
pub mod render;
pub mod token;

pub use config::Config;
pub use error::{ AppError, Result };
