pub mod encoder;
pub mod source;

pub use encoder::{decode_data_uri, encode};
pub use source::{ImageData, SourceImage};
