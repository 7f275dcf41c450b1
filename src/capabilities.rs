use crate::{
    config::DEFAULT_MODEL,
    media::SourceImage,
    models::{GenerationOptions, ImageSize, ModelInfo, SizeInfo, ValidationResult},
};
use std::fmt;
use std::str::FromStr;

pub const ALLOWED_MIME_TYPES: [&str; 3] = ["image/jpeg", "image/png", "image/webp"];
pub const MAX_FILE_SIZE: u64 = 5 * 1024 * 1024;
pub const MAX_FILE_NAME_LEN: usize = 100;

pub const UNSUPPORTED_FORMAT: &str = "unsupported file format, use JPG, PNG or WebP";
pub const FILE_TOO_LARGE: &str = "file too large, choose an image under 5MB";
pub const INVALID_FILE_NAME: &str = "file name is missing or too long";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scenario {
    Default,
    Portrait,
    Landscape,
    Artistic,
    HighQuality,
}

impl Scenario {
    pub const ALL: [Scenario; 5] = [
        Scenario::Default,
        Scenario::Portrait,
        Scenario::Landscape,
        Scenario::Artistic,
        Scenario::HighQuality,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Scenario::Default => "default",
            Scenario::Portrait => "portrait",
            Scenario::Landscape => "landscape",
            Scenario::Artistic => "artistic",
            Scenario::HighQuality => "high_quality",
        }
    }

    pub fn options(&self) -> GenerationOptions {
        match self {
            Scenario::Default => GenerationOptions::new(ImageSize::TwoK, true),
            Scenario::Portrait => GenerationOptions::new(ImageSize::OneK, false),
            Scenario::Landscape => GenerationOptions::new(ImageSize::FourK, true),
            Scenario::Artistic => GenerationOptions::new(ImageSize::TwoK, false),
            Scenario::HighQuality => GenerationOptions::new(ImageSize::FourK, false),
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scenario {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Scenario::ALL
            .iter()
            .copied()
            .find(|scenario| scenario.as_str() == s)
            .ok_or_else(|| format!("unknown scenario '{}'", s))
    }
}

/// Preset options for a named scenario; unknown names get the default preset.
pub fn recommended_params(scenario: &str) -> GenerationOptions {
    scenario
        .parse::<Scenario>()
        .unwrap_or(Scenario::Default)
        .options()
}

pub fn supported_models() -> Vec<ModelInfo> {
    vec![ModelInfo {
        id: DEFAULT_MODEL.to_string(),
        name: "Doubao SeedDream 4.5".to_string(),
        description: "Volcengine image generation model with image-to-image support".to_string(),
        features: vec![
            "high quality output".to_string(),
            "image-to-image".to_string(),
            "strong Chinese prompt understanding".to_string(),
            "fast generation".to_string(),
        ],
    }]
}

pub fn supported_sizes() -> Vec<SizeInfo> {
    [
        (ImageSize::OneK, "standard size, fastest generation"),
        (ImageSize::TwoK, "high definition, recommended"),
        (ImageSize::FourK, "ultra high definition, richest detail"),
    ]
    .into_iter()
    .map(|(size, description)| SizeInfo {
        id: size,
        name: format!("{} ({}x{})", size, size.pixels(), size.pixels()),
        description: description.to_string(),
    })
    .collect()
}

/// Checks format, size and name, reporting every violation in that order.
pub fn validate_image_file(file: &SourceImage) -> ValidationResult {
    let mut errors = Vec::new();

    if !ALLOWED_MIME_TYPES.contains(&file.mime_type.as_str()) {
        errors.push(UNSUPPORTED_FORMAT.to_string());
    }

    if file.size > MAX_FILE_SIZE {
        errors.push(FILE_TOO_LARGE.to_string());
    }

    if file.name.is_empty() || file.name.chars().count() > MAX_FILE_NAME_LEN {
        errors.push(INVALID_FILE_NAME.to_string());
    }

    ValidationResult::from_errors(errors)
}
