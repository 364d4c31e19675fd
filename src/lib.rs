pub mod config;
pub mod models;
pub mod image;
pub mod screening;
pub mod web;
pub mod utils;

pub use config::Config;
pub use screening::Screening;
pub use utils::error::ScreenError;

pub type Result<T> = std::result::Result<T, ScreenError>;
