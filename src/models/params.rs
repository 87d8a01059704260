use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const MIN_DIMENSION: u32 = 256;
pub const MAX_DIMENSION: u32 = 2048;
pub const DIMENSION_STEP: u32 = 64;
pub const DEFAULT_DIMENSION: u32 = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ImageModel {
    #[default]
    Flux,
    Turbo,
    #[value(name = "gptimage")]
    GptImage,
}

impl ImageModel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageModel::Flux => "flux",
            ImageModel::Turbo => "turbo",
            ImageModel::GptImage => "gptimage",
        }
    }

    /// Only `gptimage` honours the transparent background flag.
    pub fn supports_transparency(&self) -> bool {
        matches!(self, ImageModel::GptImage)
    }

    pub fn supported_models() -> Vec<(&'static str, &'static str)> {
        vec![
            ("flux", "Flux, high quality general purpose model"),
            ("turbo", "Turbo, fast low-latency model"),
            ("gptimage", "GPT Image, supports transparent backgrounds"),
        ]
    }
}

impl fmt::Display for ImageModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImageModel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "flux" => Ok(ImageModel::Flux),
            "turbo" => Ok(ImageModel::Turbo),
            "gptimage" => Ok(ImageModel::GptImage),
            other => Err(format!("unknown model '{}'", other)),
        }
    }
}

/// Parses a width/height field. Unparseable input yields the default,
/// anything else is clamped to the allowed range and snapped to the step.
pub fn parse_dimension(raw: &str) -> u32 {
    match raw.trim().parse::<i64>() {
        Ok(value) => snap_dimension(value),
        Err(_) => DEFAULT_DIMENSION,
    }
}

pub fn snap_dimension(value: i64) -> u32 {
    let clamped = value.clamp(MIN_DIMENSION as i64, MAX_DIMENSION as i64) as u32;
    let step = DIMENSION_STEP;
    let snapped = ((clamped + step / 2) / step) * step;
    snapped.clamp(MIN_DIMENSION, MAX_DIMENSION)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationParameters {
    pub prompt: String,
    pub model: ImageModel,
    pub width: u32,
    pub height: u32,
    pub enhance: bool,
    pub transparent: bool,
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
}

impl Default for GenerationParameters {
    fn default() -> Self {
        GenerationParameters {
            prompt: String::new(),
            model: ImageModel::default(),
            width: DEFAULT_DIMENSION,
            height: DEFAULT_DIMENSION,
            enhance: false,
            transparent: false,
            api_key: None,
        }
    }
}

impl GenerationParameters {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Self::default()
        }
    }

    pub fn with_model(mut self, model: ImageModel) -> Self {
        self.model = model;
        self
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = snap_dimension(width as i64);
        self.height = snap_dimension(height as i64);
        self
    }

    pub fn with_enhance(mut self, enhance: bool) -> Self {
        self.enhance = enhance;
        self
    }

    pub fn with_transparent(mut self, transparent: bool) -> Self {
        self.transparent = transparent;
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn has_prompt(&self) -> bool {
        !self.prompt.trim().is_empty()
    }

    pub fn wants_transparency(&self) -> bool {
        self.transparent && self.model.supports_transparency()
    }

    /// The API key, if one was given and it is not empty.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|k| !k.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_form_defaults() {
        let params = GenerationParameters::default();
        assert_eq!(params.model, ImageModel::Flux);
        assert_eq!((params.width, params.height), (1024, 1024));
        assert!(!params.enhance);
        assert!(!params.transparent);
        assert!(params.api_key().is_none());
    }

    #[test]
    fn garbage_dimension_falls_back_to_default() {
        assert_eq!(parse_dimension("abc"), 1024);
        assert_eq!(parse_dimension(""), 1024);
        assert_eq!(parse_dimension("12.5"), 1024);
    }

    #[test]
    fn dimensions_are_clamped_and_snapped() {
        assert_eq!(parse_dimension("100"), 256);
        assert_eq!(parse_dimension("9000"), 2048);
        assert_eq!(parse_dimension("-5"), 256);
        assert_eq!(parse_dimension(" 512 "), 512);
        assert_eq!(parse_dimension("1000"), 1024);
        assert_eq!(parse_dimension("800"), 832);
    }

    #[test]
    fn whitespace_prompt_is_not_a_prompt() {
        assert!(!GenerationParameters::new("   \t\n").has_prompt());
        assert!(GenerationParameters::new(" a red cube ").has_prompt());
    }

    #[test]
    fn transparency_only_applies_to_gptimage() {
        let flux = GenerationParameters::new("x").with_transparent(true);
        assert!(!flux.wants_transparency());

        let gpt = flux.with_model(ImageModel::GptImage);
        assert!(gpt.wants_transparency());
    }

    #[test]
    fn model_round_trips_through_str() {
        for (id, _) in ImageModel::supported_models() {
            let model: ImageModel = id.parse().unwrap();
            assert_eq!(model.as_str(), id);
        }
        assert!("dalle".parse::<ImageModel>().is_err());
    }

    #[test]
    fn api_key_is_not_serialized() {
        let params = GenerationParameters::new("x").with_api_key("secret");
        let json = serde_json::to_string(&params).unwrap();
        assert!(!json.contains("secret"));
    }
}
