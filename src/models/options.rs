use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImageSize {
    #[serde(rename = "1K")]
    OneK,
    #[serde(rename = "2K")]
    TwoK,
    #[serde(rename = "4K")]
    FourK,
}

impl ImageSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageSize::OneK => "1K",
            ImageSize::TwoK => "2K",
            ImageSize::FourK => "4K",
        }
    }

    /// Edge length in pixels of the square output.
    pub fn pixels(&self) -> u32 {
        match self {
            ImageSize::OneK => 1024,
            ImageSize::TwoK => 2048,
            ImageSize::FourK => 4096,
        }
    }
}

impl fmt::Display for ImageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImageSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "1K" => Ok(ImageSize::OneK),
            "2K" => Ok(ImageSize::TwoK),
            "4K" => Ok(ImageSize::FourK),
            other => Err(format!("unsupported size '{}', expected 1K, 2K or 4K", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SequentialGeneration {
    Disabled,
    Auto,
}

impl From<bool> for SequentialGeneration {
    fn from(enabled: bool) -> Self {
        if enabled {
            SequentialGeneration::Auto
        } else {
            SequentialGeneration::Disabled
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationOptions {
    pub size: ImageSize,
    pub watermark: bool,
    pub sequential_generation: SequentialGeneration,
}

impl GenerationOptions {
    pub fn new(size: ImageSize, watermark: bool) -> Self {
        Self {
            size,
            watermark,
            sequential_generation: SequentialGeneration::Disabled,
        }
    }

    pub fn with_size(mut self, size: ImageSize) -> Self {
        self.size = size;
        self
    }

    pub fn with_watermark(mut self, watermark: bool) -> Self {
        self.watermark = watermark;
        self
    }

    pub fn with_sequential_generation(mut self, mode: SequentialGeneration) -> Self {
        self.sequential_generation = mode;
        self
    }
}
