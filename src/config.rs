//! # Configuration Module
//!
//! Weights and limits used by the analytics engine. Every field has a default
//! matching the fixed formulas, so an empty JSON object is a valid
//! configuration and callers only override what they need.
//!
//! ```
//! use muse_analytics::config::AnalyticsConfig;
//!
//! let config = AnalyticsConfig::from_json_str(r#"{ "recommendation": { "limit": 5 } }"#)?;
//! assert_eq!(config.recommendation.limit, 5);
//! assert_eq!(config.recommendation.favorite_artist, 20.0);
//! # Ok::<(), anyhow::Error>(())
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::AnalyticsError;

/// Linear recommendation formula:
///
/// ```text
/// score = favorite_genre  * [primary genre is a favorite]
///       + secondary_genre * |secondary genres ∩ favorites|
///       + popularity      * song.popularity
///       + favorite_artist * [an artist appears on a favorite album]
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendationWeights {
    pub favorite_genre: f64,
    pub secondary_genre: f64,
    pub popularity: f64,
    pub favorite_artist: f64,
    /// Maximum number of songs returned.
    pub limit: usize,
}

impl Default for RecommendationWeights {
    fn default() -> Self {
        Self {
            favorite_genre: 10.0,
            secondary_genre: 2.0,
            popularity: 0.5,
            favorite_artist: 20.0,
            limit: 10,
        }
    }
}

/// Contributions to a user's raw genre affinity before normalization.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AffinityWeights {
    /// Per play, credited to the song's primary genre.
    pub primary_play: f64,
    /// Per play, credited to each secondary genre.
    pub secondary_play: f64,
    /// Flat bonus per favorite genre.
    pub favorite_genre: f64,
    /// Per song in an owned playlist, credited to its primary genre.
    pub playlist_song: f64,
}

impl Default for AffinityWeights {
    fn default() -> Self {
        Self {
            primary_play: 1.0,
            secondary_play: 0.5,
            favorite_genre: 20.0,
            playlist_song: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    pub recommendation: RecommendationWeights,
    pub affinity: AffinityWeights,
    /// How many of a user's most-played songs the statistics report lists.
    pub top_songs_per_user: usize,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            recommendation: RecommendationWeights::default(),
            affinity: AffinityWeights::default(),
            top_songs_per_user: 5,
        }
    }
}

impl AnalyticsConfig {
    /// Parses and validates a JSON configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or a weight is negative or not finite.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).context("Failed to parse analytics configuration JSON")?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or its content is invalid.
    pub fn from_path(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path).with_context(|| {
            format!(
                "Failed to read analytics configuration at {}. Please check the path and file permissions.",
                path.display()
            )
        })?;
        let config = Self::from_json_str(&json)
            .with_context(|| format!("Invalid analytics configuration in {}", path.display()))?;
        log::debug!("Loaded analytics configuration from {}", path.display());
        Ok(config)
    }

    /// # Errors
    ///
    /// Returns [`AnalyticsError::InvalidConfig`] naming the first negative or non-finite weight.
    pub fn validate(&self) -> std::result::Result<(), AnalyticsError> {
        let weights = [
            ("recommendation.favorite_genre", self.recommendation.favorite_genre),
            ("recommendation.secondary_genre", self.recommendation.secondary_genre),
            ("recommendation.popularity", self.recommendation.popularity),
            ("recommendation.favorite_artist", self.recommendation.favorite_artist),
            ("affinity.primary_play", self.affinity.primary_play),
            ("affinity.secondary_play", self.affinity.secondary_play),
            ("affinity.favorite_genre", self.affinity.favorite_genre),
            ("affinity.playlist_song", self.affinity.playlist_song),
        ];

        if let Some((name, value)) = weights
            .iter()
            .find(|(_, value)| !value.is_finite() || *value < 0.0)
        {
            return Err(AnalyticsError::InvalidConfig(format!(
                "{name} must be a non-negative finite number, got {value}"
            )));
        }

        if self.recommendation.limit == 0 {
            log::warn!("recommendation.limit is 0; recommendations will always be empty");
        }
        Ok(())
    }
}
