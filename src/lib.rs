pub mod app;
pub mod config;
pub mod error;
pub mod progress;
pub mod upload;

pub use app::AddressUploader;
pub use config::ClientConfig;
