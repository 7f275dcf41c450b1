pub mod common;
pub mod image;
pub mod options;
pub mod result;

pub use common::*;
pub use image::*;
pub use options::*;
pub use result::*;
