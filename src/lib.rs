pub mod capabilities;
pub mod config;
pub mod error;
pub mod generator;
pub mod ids;
pub mod logger;
pub mod media;
pub mod models;

pub use capabilities::{recommended_params, validate_image_file, Scenario};
pub use config::{GeneratorConfig, RetryPolicy, UploadConfig};
pub use error::{ImageGenError, Result};
pub use generator::{DoubaoBackend, ImageBackend, ImageGenerator, MockBackend};
pub use media::SourceImage;
pub use models::*;
