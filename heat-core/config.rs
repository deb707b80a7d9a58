#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    InvalidImageSize(usize),
    InvalidNeighborhood(usize),
    InvalidMaxCorners(usize),
    InvalidThreadCount(usize),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidImageSize(size) => {
                write!(f, "Invalid image size: {} (must be > 0)", size)
            }
            ConfigError::InvalidNeighborhood(n) => {
                write!(f, "Invalid NMS neighborhood: {} (must be odd and >= 1)", n)
            }
            ConfigError::InvalidMaxCorners(n) => {
                write!(f, "Invalid corner cap: {} (must be >= 2)", n)
            }
            ConfigError::InvalidThreadCount(n) => {
                write!(f, "Invalid thread count: {} (must be > 0)", n)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Settings for the collaborators around the refinement loop.
///
/// The decision thresholds themselves live in [`crate::constants`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HeatConfig {
    /// Side length of the square model input
    pub image_size: usize,
    /// Window side of the max-filter corner NMS
    pub nms_neighborhood: usize,
    /// Corners kept (by confidence) when enumerating edge candidates
    pub max_corners: usize,
    /// Points sampled along each candidate segment
    pub segment_samples: usize,
    /// Channels of the sinusoidal pixel encoding
    pub positional_dim: usize,
    pub n_threads: usize,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none", default))]
    pub name: Option<String>,
}

impl Default for HeatConfig {
    fn default() -> Self {
        Self {
            image_size: 256,
            nms_neighborhood: 5,
            max_corners: 150,
            segment_samples: 8,
            positional_dim: 128,
            n_threads: num_cpus::get().max(1),
            name: None,
        }
    }
}

impl HeatConfig {
    pub fn new(image_size: usize) -> Self {
        Self { image_size, ..Self::default() }
    }

    /// Setting of the outdoor building dataset models (256 px input)
    pub fn outdoor_preset() -> Self {
        Self {
            image_size: 256,
            name: Some("Outdoor".to_string()),
            ..Self::default()
        }
    }

    /// Setting of the floorplan dataset models (256 px input, denser corners)
    pub fn floorplan_preset() -> Self {
        Self {
            image_size: 256,
            max_corners: 200,
            nms_neighborhood: 3,
            name: Some("Floorplan".to_string()),
            ..Self::default()
        }
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn summary(&self) -> String {
        format!(
            "HeatConfig: size={}, nms={}, max_corners={}, samples={}, threads={}",
            self.image_size, self.nms_neighborhood, self.max_corners, self.segment_samples, self.n_threads
        )
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.image_size == 0 {
            return Err(ConfigError::InvalidImageSize(self.image_size));
        }
        if self.nms_neighborhood == 0 || self.nms_neighborhood % 2 == 0 {
            return Err(ConfigError::InvalidNeighborhood(self.nms_neighborhood));
        }
        if self.max_corners < 2 {
            return Err(ConfigError::InvalidMaxCorners(self.max_corners));
        }
        if self.n_threads == 0 {
            return Err(ConfigError::InvalidThreadCount(self.n_threads));
        }
        Ok(())
    }

    /// Save configuration to JSON file
    #[cfg(feature = "serde")]
    pub fn save_json<P: AsRef<std::path::Path>>(&self, path: P) -> Result<(), Box<dyn std::error::Error>> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Load configuration from JSON file
    #[cfg(feature = "serde")]
    pub fn load_json<P: AsRef<std::path::Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Save configuration to TOML file
    #[cfg(feature = "serde")]
    pub fn save_toml<P: AsRef<std::path::Path>>(&self, path: P) -> Result<(), Box<dyn std::error::Error>> {
        std::fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    /// Load configuration from TOML file
    #[cfg(feature = "serde")]
    pub fn load_toml<P: AsRef<std::path::Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    #[cfg(feature = "serde")]
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    #[cfg(feature = "serde")]
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    #[cfg(feature = "serde")]
    pub fn from_toml(toml_str: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let config: Self = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(HeatConfig::default().validate().is_ok());
        assert!(HeatConfig::outdoor_preset().validate().is_ok());
        assert!(HeatConfig::floorplan_preset().validate().is_ok());
    }

    #[test]
    fn test_validation_errors() {
        let mut cfg = HeatConfig::new(0);
        assert_eq!(cfg.validate(), Err(ConfigError::InvalidImageSize(0)));

        cfg.image_size = 64;
        cfg.nms_neighborhood = 4;
        assert_eq!(cfg.validate(), Err(ConfigError::InvalidNeighborhood(4)));

        cfg.nms_neighborhood = 5;
        cfg.max_corners = 1;
        assert_eq!(cfg.validate(), Err(ConfigError::InvalidMaxCorners(1)));

        cfg.max_corners = 10;
        cfg.n_threads = 0;
        assert_eq!(cfg.validate(), Err(ConfigError::InvalidThreadCount(0)));
    }

    #[test]
    fn test_summary_mentions_size() {
        let summary = HeatConfig::new(512).summary();
        assert!(summary.contains("size=512"));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_json_and_toml_load() {
        let cfg = HeatConfig::floorplan_preset();
        let from_json = HeatConfig::from_json(&cfg.to_json().unwrap()).unwrap();
        assert_eq!(from_json, cfg);
        let from_toml = HeatConfig::from_toml(&cfg.to_toml().unwrap()).unwrap();
        assert_eq!(from_toml, cfg);

        let bad = r#"{"image_size":0,"nms_neighborhood":5,"max_corners":150,"segment_samples":8,"positional_dim":128,"n_threads":1}"#;
        assert!(HeatConfig::from_json(bad).is_err());
    }
}
