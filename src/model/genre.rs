use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::AnalyticsError;

/// Closed set of genre labels used to tag songs and albums.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Genre {
    Rock,
    Pop,
    HipHop,
    Jazz,
    Classical,
    Electronic,
    Reggae,
    Country,
    Blues,
    Folk,
    Metal,
    Rnb,
    Indie,
    Latin,
    Kpop,
}

impl Genre {
    pub const ALL: [Genre; 15] = [
        Self::Rock,
        Self::Pop,
        Self::HipHop,
        Self::Jazz,
        Self::Classical,
        Self::Electronic,
        Self::Reggae,
        Self::Country,
        Self::Blues,
        Self::Folk,
        Self::Metal,
        Self::Rnb,
        Self::Indie,
        Self::Latin,
        Self::Kpop,
    ];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Rock => "ROCK",
            Self::Pop => "POP",
            Self::HipHop => "HIP_HOP",
            Self::Jazz => "JAZZ",
            Self::Classical => "CLASSICAL",
            Self::Electronic => "ELECTRONIC",
            Self::Reggae => "REGGAE",
            Self::Country => "COUNTRY",
            Self::Blues => "BLUES",
            Self::Folk => "FOLK",
            Self::Metal => "METAL",
            Self::Rnb => "RNB",
            Self::Indie => "INDIE",
            Self::Latin => "LATIN",
            Self::Kpop => "KPOP",
        }
    }
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Genre {
    type Err = AnalyticsError;

    /// Accepts labels case-insensitively, with `-` or spaces in place of `_`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace(['-', ' '], "_");
        Self::ALL
            .into_iter()
            .find(|genre| genre.label() == normalized)
            .ok_or_else(|| AnalyticsError::InvalidArgument(format!("unknown genre: {s}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_genre_display_matches_label() {
        assert_eq!(Genre::HipHop.to_string(), "HIP_HOP");
        assert_eq!(Genre::Kpop.to_string(), "KPOP");
    }

    #[test]
    fn test_genre_from_str_variants() {
        assert_eq!("hip-hop".parse::<Genre>(), Ok(Genre::HipHop));
        assert_eq!("Hip Hop".parse::<Genre>(), Ok(Genre::HipHop));
        assert_eq!("  rnb ".parse::<Genre>(), Ok(Genre::Rnb));
        assert!("polka".parse::<Genre>().is_err());
    }

    #[test]
    fn test_genre_all_round_trips_through_labels() {
        for genre in Genre::ALL {
            assert_eq!(genre.label().parse::<Genre>(), Ok(genre));
        }
    }

    #[test]
    fn test_genre_serde_uses_labels() {
        let json = serde_json::to_string(&Genre::HipHop).unwrap();
        assert_eq!(json, "\"HIP_HOP\"");
        let parsed: Genre = serde_json::from_str("\"CLASSICAL\"").unwrap();
        assert_eq!(parsed, Genre::Classical);
    }
}
