//! Effect configuration.
//!
//! Both configs deserialize from sparse tables: every missing key takes its
//! default and unknown keys are ignored, so the same structures accept a JS
//! options object (as JSON), a TOML file or a JSON file.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read configuration at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse TOML configuration: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("failed to parse JSON configuration: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported configuration format for {0} (expected .toml or .json)")]
    UnsupportedFormat(PathBuf),
}

/// Where the RayField light source sits.
///
/// Only `top-center` has distinct geometry; every other keyword, known or
/// not, is accepted and rendered as `top-center`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RaysOrigin {
    #[default]
    TopCenter,
    TopLeft,
    TopRight,
    Left,
    Right,
    BottomLeft,
    BottomCenter,
    BottomRight,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RayFieldConfig {
    pub rays_origin: RaysOrigin,
    pub rays_color: String,
    pub rays_speed: f32,
    pub light_spread: f32,
    /// Maximum ray length as a multiple of the viewport width.
    pub ray_length: f32,
    pub pulsating: bool,
    /// Secondary fade distance as a multiple of the viewport width.
    pub fade_distance: f32,
    pub saturation: f32,
    pub mouse_influence: f32,
    pub noise_amount: f32,
    pub distortion: f32,
}

impl Default for RayFieldConfig {
    fn default() -> Self {
        Self {
            rays_origin: RaysOrigin::TopCenter,
            rays_color: "#ffffff".to_string(),
            rays_speed: 0.2,
            light_spread: 0.2,
            ray_length: 5.0,
            pulsating: true,
            fade_distance: 1.0,
            saturation: 1.0,
            mouse_influence: 0.5,
            noise_amount: 0.1,
            distortion: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WarpFieldConfig {
    /// Base rotation in degrees.
    pub rotation: f32,
    pub speed: f32,
    pub colors: Vec<String>,
    pub transparent: bool,
    /// Continuous rotation in degrees per second.
    pub auto_rotate: f32,
    pub scale: f32,
    pub frequency: f32,
    pub warp_strength: f32,
    pub mouse_influence: f32,
    pub parallax: f32,
    pub noise: f32,
}

impl Default for WarpFieldConfig {
    fn default() -> Self {
        Self {
            rotation: 45.0,
            speed: 0.2,
            colors: Vec::new(),
            transparent: true,
            auto_rotate: 0.0,
            scale: 1.0,
            frequency: 1.0,
            warp_strength: 1.0,
            mouse_influence: 1.0,
            parallax: 0.5,
            noise: 0.1,
        }
    }
}

pub fn from_toml_str<T: DeserializeOwned>(input: &str) -> Result<T, ConfigError> {
    Ok(toml::from_str(input)?)
}

pub fn from_json_str<T: DeserializeOwned>(input: &str) -> Result<T, ConfigError> {
    Ok(serde_json::from_str(input)?)
}

/// Loads a config file, choosing the parser from the file extension.
pub fn load_from_path<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    let parse: fn(&str) -> Result<T, ConfigError> = match extension.as_deref() {
        Some("toml") => from_toml_str,
        Some("json") => from_json_str,
        _ => return Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
    };
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&contents)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_overrides_merge_over_defaults() {
        let config: RayFieldConfig =
            from_json_str(r##"{"raysColor":"#ff0000","mouseInfluence":0,"somethingElse":true}"##)
                .unwrap();
        assert_eq!(config.rays_color, "#ff0000");
        assert_eq!(config.mouse_influence, 0.0);
        assert_eq!(config.rays_speed, 0.2);
        assert!(config.pulsating);
    }

    #[test]
    fn unknown_origins_are_accepted() {
        let config: RayFieldConfig = from_json_str(r#"{"raysOrigin":"somewhere"}"#).unwrap();
        assert_eq!(config.rays_origin, RaysOrigin::Other);
        let config: RayFieldConfig = from_json_str(r#"{"raysOrigin":"bottom-left"}"#).unwrap();
        assert_eq!(config.rays_origin, RaysOrigin::BottomLeft);
    }

    #[test]
    fn toml_uses_camel_case_keys() {
        let config: WarpFieldConfig = from_toml_str(
            r##"
colors = ["#ff5c7a", "#8a5cff"]
autoRotate = 3.5
warpStrength = 1.5
"##,
        )
        .unwrap();
        assert_eq!(config.colors.len(), 2);
        assert_eq!(config.auto_rotate, 3.5);
        assert_eq!(config.warp_strength, 1.5);
        assert_eq!(config.rotation, 45.0);
        assert!(config.transparent);
    }

    #[test]
    fn empty_documents_yield_defaults() {
        assert_eq!(from_toml_str::<WarpFieldConfig>("").unwrap(), WarpFieldConfig::default());
        assert_eq!(from_json_str::<RayFieldConfig>("{}").unwrap(), RayFieldConfig::default());
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        let err = load_from_path::<RayFieldConfig>(Path::new("effect.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat(_)));
    }
}
