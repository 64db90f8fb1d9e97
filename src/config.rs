//! Game configuration
//!
//! Defaults reproduce the classroom setup. A page may embed a JSON object in
//! a `<script id="game-config" type="application/json">` element, and URL
//! query parameters override single fields on top of that.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::pixels_per_degree;
use crate::sim::{Grid, LatLng};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("query parameter [{key}] has unparsable value [{value}]")]
    BadParam { key: String, value: String },
    #[error("{field} out of range: {reason}")]
    OutOfRange { field: &'static str, reason: String },
}

type Result<T> = std::result::Result<T, ConfigError>;

/// URL query keys that override config fields
pub const QUERY_KEYS: [&str; 4] = ["seed", "lat", "lng", "radius"];

fn is_coordinate(p: LatLng) -> bool {
    p.is_finite() && p.lat.abs() <= 90.0 && p.lng.abs() <= 180.0
}

/// Tunable world and rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Where the player starts
    pub start: LatLng,
    /// South-west corner of cell (0, 0)
    pub origin: LatLng,
    /// Cell size in degrees
    pub tile_deg: f64,
    /// Fixed map zoom
    pub zoom: u8,
    /// Interaction radius in cells
    pub nearby_radius: u32,
    /// Chance of a cache per cell
    pub spawn_probability: f64,
    /// World seed fed to every luck roll
    pub seed: String,
    /// Token value that wins
    pub win_threshold: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            start: LatLng::new(START_LAT, START_LNG),
            origin: LatLng::new(NULL_ISLAND_LAT, NULL_ISLAND_LNG),
            tile_deg: TILE_DEG,
            zoom: GAME_ZOOM,
            nearby_radius: NEARBY_RADIUS,
            spawn_probability: CACHE_SPAWN_PROBABILITY,
            seed: LUCK_SEED.to_string(),
            win_threshold: WIN_THRESHOLD,
        }
    }
}

impl GameConfig {
    /// Parse a (possibly partial) JSON object; missing fields take defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply already-decoded `(key, value)` pairs, then validate.
    ///
    /// Known keys: `seed`, `lat`, `lng`, `radius`. Unknown keys are ignored.
    pub fn apply_params<K, V>(&mut self, params: impl IntoIterator<Item = (K, V)>) -> Result<()>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        for (key, value) in params {
            self.set_param(key.as_ref(), value.as_ref())?;
        }
        self.validate()
    }

    /// Apply a raw `key=value&...` query string (leading `?` optional).
    /// Values are taken verbatim, without percent-decoding.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn apply_query(&mut self, query: &str) -> Result<()> {
        let query = query.strip_prefix('?').unwrap_or(query);
        self.apply_params(
            query
                .split('&')
                .filter(|p| !p.is_empty())
                .map(|pair| pair.split_once('=').unwrap_or((pair, ""))),
        )
    }

    fn set_param(&mut self, key: &str, value: &str) -> Result<()> {
        let bad = || ConfigError::BadParam {
            key: key.to_string(),
            value: value.to_string(),
        };
        match key {
            "seed" => self.seed = value.to_string(),
            "lat" => self.start.lat = value.parse().map_err(|_| bad())?,
            "lng" => self.start.lng = value.parse().map_err(|_| bad())?,
            "radius" => self.nearby_radius = value.parse().map_err(|_| bad())?,
            _ => log::debug!("Ignoring unknown query parameter: {}", key),
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.tile_deg.is_finite() && (MIN_TILE_DEG..=MAX_TILE_DEG).contains(&self.tile_deg)) {
            return Err(ConfigError::OutOfRange {
                field: "tile_deg",
                reason: format!(
                    "must be within [{}, {}], got {}",
                    MIN_TILE_DEG, MAX_TILE_DEG, self.tile_deg
                ),
            });
        }
        if !(0.0..=1.0).contains(&self.spawn_probability) {
            return Err(ConfigError::OutOfRange {
                field: "spawn_probability",
                reason: format!("must be within [0, 1], got {}", self.spawn_probability),
            });
        }
        if !is_coordinate(self.start) {
            return Err(ConfigError::OutOfRange {
                field: "start",
                reason: format!("not a coordinate: {:?}", self.start),
            });
        }
        if !is_coordinate(self.origin) {
            return Err(ConfigError::OutOfRange {
                field: "origin",
                reason: format!("not a coordinate: {:?}", self.origin),
            });
        }
        if !(MIN_ZOOM..=MAX_ZOOM).contains(&self.zoom) {
            return Err(ConfigError::OutOfRange {
                field: "zoom",
                reason: format!("must be within [{}, {}], got {}", MIN_ZOOM, MAX_ZOOM, self.zoom),
            });
        }
        let cell_px = self.tile_deg * pixels_per_degree(self.zoom);
        if cell_px < MIN_CELL_PX {
            return Err(ConfigError::OutOfRange {
                field: "tile_deg",
                reason: format!(
                    "cells would be {:.2}px wide at zoom {}, need at least {}px",
                    cell_px, self.zoom, MIN_CELL_PX
                ),
            });
        }
        if self.win_threshold == 0 {
            return Err(ConfigError::OutOfRange {
                field: "win_threshold",
                reason: "must be positive".to_string(),
            });
        }
        Ok(())
    }

    pub fn grid(&self) -> Grid {
        Grid::new(self.origin, self.tile_deg)
    }

    /// Load from the page (WASM only): embedded JSON, then URL query
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let document = web_sys::window().and_then(|w| w.document());

        let mut config = document
            .as_ref()
            .and_then(|d| d.get_element_by_id("game-config"))
            .and_then(|el| el.text_content())
            .map(|json| match Self::from_json(&json) {
                Ok(config) => {
                    log::info!("Loaded embedded game config");
                    config
                }
                Err(e) => {
                    log::warn!("Ignoring embedded game config: {}", e);
                    Self::default()
                }
            })
            .unwrap_or_default();

        let params = web_sys::window()
            .and_then(|w| w.location().search().ok())
            .filter(|search| !search.is_empty())
            .and_then(|search| web_sys::UrlSearchParams::new_with_str(&search).ok());
        if let Some(params) = params {
            let mut overridden = config.clone();
            let pairs = QUERY_KEYS
                .iter()
                .filter_map(|&key| params.get(key).map(|value| (key, value)));
            match overridden.apply_params(pairs) {
                Ok(()) => config = overridden,
                Err(e) => log::warn!("Ignoring URL overrides: {}", e),
            }
        }

        config
    }

    /// Native: defaults
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = GameConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.nearby_radius, 3);
        assert_eq!(config.spawn_probability, 0.35);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = GameConfig::from_json(r#"{ "seed": "demo", "nearby_radius": 5 }"#).unwrap();
        assert_eq!(config.seed, "demo");
        assert_eq!(config.nearby_radius, 5);
        assert_eq!(config.tile_deg, TILE_DEG);
        assert_eq!(config.start, LatLng::new(START_LAT, START_LNG));
    }

    #[test]
    fn test_bad_json_is_rejected() {
        assert!(matches!(GameConfig::from_json("{ nope"), Err(ConfigError::Json(_))));
        assert!(matches!(
            GameConfig::from_json(r#"{ "spawn_probability": 1.5 }"#),
            Err(ConfigError::OutOfRange { field: "spawn_probability", .. })
        ));
        assert!(matches!(
            GameConfig::from_json(r#"{ "tile_deg": 0.0 }"#),
            Err(ConfigError::OutOfRange { field: "tile_deg", .. })
        ));
    }

    #[test]
    fn test_zoom_outside_band_is_rejected() {
        for json in [r#"{ "zoom": 0 }"#, r#"{ "zoom": 9 }"#, r#"{ "zoom": 23 }"#] {
            assert!(
                matches!(GameConfig::from_json(json), Err(ConfigError::OutOfRange { field: "zoom", .. })),
                "{} should be rejected",
                json
            );
        }
        assert!(GameConfig::from_json(r#"{ "zoom": 22 }"#).is_ok());
    }

    #[test]
    fn test_tiny_tiles_are_rejected() {
        // would overflow i32 cell indices
        assert!(matches!(
            GameConfig::from_json(r#"{ "tile_deg": 1e-9 }"#),
            Err(ConfigError::OutOfRange { field: "tile_deg", .. })
        ));
        // in range, but sub-pixel cells at the default zoom
        let err = GameConfig::from_json(r#"{ "tile_deg": 1e-5 }"#).unwrap_err();
        assert!(err.to_string().contains("px wide"), "{}", err);
        assert!(matches!(
            GameConfig::from_json(r#"{ "tile_deg": 2.0 }"#),
            Err(ConfigError::OutOfRange { field: "tile_deg", .. })
        ));
    }

    #[test]
    fn test_far_origin_is_rejected() {
        assert!(matches!(
            GameConfig::from_json(r#"{ "origin": { "lat": 1e12, "lng": 0.0 } }"#),
            Err(ConfigError::OutOfRange { field: "origin", .. })
        ));
        assert!(matches!(
            GameConfig::from_json(r#"{ "origin": { "lat": 0.0, "lng": -181.0 } }"#),
            Err(ConfigError::OutOfRange { field: "origin", .. })
        ));
    }

    #[test]
    fn test_accepted_extremes_stay_playable() {
        use crate::sim::{Direction, GameState};

        let configs = [
            r#"{ "zoom": 10, "tile_deg": 1.0 }"#,
            r#"{ "zoom": 22, "tile_deg": 3e-6, "start": { "lat": 90.0, "lng": 180.0 },
                 "origin": { "lat": -90.0, "lng": -180.0 } }"#,
        ];
        for json in configs {
            let config = GameConfig::from_json(json).unwrap();
            // 4K canvas with cells of at least MIN_CELL_PX
            let mut state = GameState::new(config, 3840.0, 2160.0);
            assert!(state.overlays.len() <= 481 * 271, "{} drew {}", json, state.overlays.len());

            let start = state.player_cell();
            assert!(start.i.unsigned_abs() < 1 << 30 && start.j.unsigned_abs() < 1 << 30);
            for direction in Direction::ALL {
                state.step_player(direction);
            }
            assert_eq!(state.player_cell(), start);
        }
    }

    #[test]
    fn test_apply_params_takes_decoded_values() {
        let mut config = GameConfig::default();
        config
            .apply_params([("seed", "my world"), ("lat", "12.5"), ("zoom", "3")])
            .unwrap();
        assert_eq!(config.seed, "my world");
        assert_eq!(config.start.lat, 12.5);
        assert_eq!(config.zoom, GAME_ZOOM);
        assert!(QUERY_KEYS.contains(&"seed") && !QUERY_KEYS.contains(&"zoom"));
    }

    #[test]
    fn test_apply_query() {
        let mut config = GameConfig::default();
        config.apply_query("?seed=abc&lat=10.5&lng=-20.25&radius=2&zoom=3").unwrap();
        assert_eq!(config.seed, "abc");
        assert_eq!(config.start, LatLng::new(10.5, -20.25));
        assert_eq!(config.nearby_radius, 2);
        // zoom is not overridable from the URL
        assert_eq!(config.zoom, GAME_ZOOM);
    }

    #[test]
    fn test_apply_query_errors() {
        let mut config = GameConfig::default();
        let err = config.apply_query("lat=north").unwrap_err();
        assert!(matches!(err, ConfigError::BadParam { ref key, .. } if key == "lat"));
        assert_eq!(err.to_string(), "query parameter [lat] has unparsable value [north]");

        let mut config = GameConfig::default();
        assert!(config.apply_query("lat=95").is_err());
    }

    #[test]
    fn test_empty_query_is_noop() {
        let mut config = GameConfig::default();
        config.apply_query("").unwrap();
        config.apply_query("?").unwrap();
        assert_eq!(config, GameConfig::default());
    }
}
