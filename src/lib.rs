pub mod config;
pub mod db;
pub mod error;
pub mod imaging;
pub mod logging;
pub mod rolemap;

pub use db::Database;
pub use error::Error;
