//! Result records produced by the analytics engine, plus the small value
//! types (decades, artist pairs, request parameters) its operations key on.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::time::Duration;

use crate::model::{Genre, SharedSong};

/// Start year of a decade. `Decade::of(1987)` is the 1980s, `Decade::of(-5)` the -10s.
///
/// Held as `i64` because the decade of `i32::MIN` starts below it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Decade(i64);

impl Decade {
    #[must_use]
    pub const fn of(year: i32) -> Self {
        let year = year as i64;
        Self(year - year.rem_euclid(10))
    }

    #[must_use]
    pub const fn start_year(self) -> i64 {
        self.0
    }
}

impl fmt::Display for Decade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0)
    }
}

/// Two co-credited artists, stored with the lexicographically smaller name first.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ArtistPair {
    first: String,
    second: String,
}

impl ArtistPair {
    #[must_use]
    pub fn new(a: impl Into<String>, b: impl Into<String>) -> Self {
        let (a, b) = (a.into(), b.into());
        if a <= b {
            Self { first: a, second: b }
        } else {
            Self { first: b, second: a }
        }
    }

    #[must_use]
    pub fn first(&self) -> &str {
        &self.first
    }

    #[must_use]
    pub fn second(&self) -> &str {
        &self.second
    }

    #[must_use]
    pub fn contains(&self, artist: &str) -> bool {
        self.first == artist || self.second == artist
    }
}

impl fmt::Display for ArtistPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} & {}", self.first, self.second)
    }
}

/// Lightweight view of a song inside the decade/genre breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SongSummary {
    pub title: String,
    /// Artist names joined with `", "`.
    pub artists: String,
    pub popularity: f64,
    pub play_count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlbumSummary {
    pub title: String,
    pub artist: String,
    pub release_year: i32,
    pub song_count: usize,
    pub total_play_count: u64,
    /// Song titles in album order, joined with `", "`.
    pub song_titles: String,
    /// `None` for an album without songs.
    pub most_popular_song: Option<String>,
}

impl fmt::Display for AlbumSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {} ({}): {} songs, {} plays, most popular: {}",
            self.artist,
            self.title,
            self.release_year,
            self.song_count,
            self.total_play_count,
            self.most_popular_song.as_deref().unwrap_or("N/A")
        )
    }
}

#[derive(Debug, Clone)]
pub struct UserStatistics {
    pub username: String,
    pub premium: bool,
    pub total_play_count: u64,
    pub playlist_count: usize,
    /// Most played songs first.
    pub top_songs: Vec<SharedSong>,
    /// Primary genres of `top_songs`.
    pub top_genres: BTreeSet<Genre>,
}

/// Summary of users' total play counts. Empty groups report zero count, sum
/// and average, and no min/max.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PlayStatistics {
    pub count: usize,
    pub sum: u64,
    pub min: Option<u64>,
    pub max: Option<u64>,
    pub average: f64,
}

impl PlayStatistics {
    #[must_use]
    pub fn from_totals(totals: impl IntoIterator<Item = u64>) -> Self {
        let mut stats = Self::default();
        for total in totals {
            stats.count += 1;
            stats.sum = stats.sum.saturating_add(total);
            stats.min = Some(stats.min.map_or(total, |min| min.min(total)));
            stats.max = Some(stats.max.map_or(total, |max| max.max(total)));
        }
        if stats.count > 0 {
            #[allow(clippy::cast_precision_loss)]
            let average = stats.sum as f64 / stats.count as f64;
            stats.average = average;
        }
        stats
    }
}

/// Play statistics partitioned by subscription type.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PremiumSplit {
    pub premium: PlayStatistics,
    pub free: PlayStatistics,
}

/// Parameters for [`crate::MusicAnalytics::generate_dynamic_playlist`].
///
/// Empty preference sets do not filter. Year bounds are inclusive and only
/// enforced when present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaylistRequest {
    pub preferred_genres: BTreeSet<Genre>,
    pub preferred_artists: BTreeSet<String>,
    pub earliest_year: Option<i32>,
    pub latest_year: Option<i32>,
    pub target_duration: Duration,
    /// 1 (strict) to 10 (exploratory).
    pub variety: u8,
}

impl PlaylistRequest {
    #[must_use]
    pub fn new(target_duration: Duration, variety: u8) -> Self {
        Self {
            preferred_genres: BTreeSet::new(),
            preferred_artists: BTreeSet::new(),
            earliest_year: None,
            latest_year: None,
            target_duration,
            variety,
        }
    }

    #[must_use]
    pub fn with_genres(mut self, genres: impl IntoIterator<Item = Genre>) -> Self {
        self.preferred_genres.extend(genres);
        self
    }

    #[must_use]
    pub fn with_artists<S: Into<String>>(mut self, artists: impl IntoIterator<Item = S>) -> Self {
        self.preferred_artists.extend(artists.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn between(mut self, earliest_year: Option<i32>, latest_year: Option<i32>) -> Self {
        self.earliest_year = earliest_year;
        self.latest_year = latest_year;
        self
    }
}

/// Criteria for [`crate::MusicAnalytics::albums_matching`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlbumCriteria {
    /// Albums must be released strictly after this year.
    pub released_after: i32,
    pub min_average_popularity: f64,
    /// Matches the album's primary genre or the primary genre of any of its songs.
    pub genre: Genre,
}
