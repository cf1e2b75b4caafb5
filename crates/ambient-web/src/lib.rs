//! Browser frontend for the ambient backgrounds.
//!
//! Loading the module installs console logging and mounts the site presets
//! into `#light-rays-container` and `#colorbends-container` when those
//! elements exist. Pages can also mount effects themselves:
//!
//! ```text
//! const rays = await mountRayField("hero", { raysColor: "#ffd9a0" });
//! rays?.stop();
//! ```

pub mod logging;
pub mod presets;

#[cfg(target_arch = "wasm32")]
mod web;

#[cfg(target_arch = "wasm32")]
pub use web::{mount_ray_field, mount_warp_field, EffectHandle};

/// Parses a JSON options object into an effect config. `None` (the page
/// passed `undefined` or `null`) yields the defaults.
pub fn config_from_json<T>(json: Option<&str>) -> Result<T, ambient::ConfigError>
where
    T: Default + serde::de::DeserializeOwned,
{
    match json {
        Some(text) => ambient::config::from_json_str(text),
        None => Ok(T::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ambient::{RayFieldConfig, WarpFieldConfig};

    #[test]
    fn missing_options_use_defaults() {
        let config: RayFieldConfig = config_from_json(None).unwrap();
        assert_eq!(config, RayFieldConfig::default());
    }

    #[test]
    fn options_override_defaults() {
        let config: WarpFieldConfig =
            config_from_json(Some(r##"{"speed": 0.7, "colors": ["#fff"], "extra": 1}"##)).unwrap();
        assert_eq!(config.speed, 0.7);
        assert_eq!(config.colors, vec!["#fff".to_string()]);
        assert_eq!(config.rotation, 45.0);
    }

    #[test]
    fn mistyped_options_are_rejected() {
        let result = config_from_json::<RayFieldConfig>(Some(r#"{"pulsating": "yes"}"#));
        assert!(matches!(result, Err(ambient::ConfigError::Json(_))));
    }
}
