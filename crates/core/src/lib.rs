pub mod config;
pub mod data_share;
pub mod error;

pub use config::Config;
pub use data_share::*;
pub use error::*;
