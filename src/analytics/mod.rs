//! # Analytics Engine
//!
//! [`MusicAnalytics`] answers aggregate questions about a catalog: per-genre
//! averages, rankings, album filters, per-user statistics, recommendations,
//! generated playlists and listening transitions.
//!
//! Every operation is a pure function of its arguments and the engine's
//! immutable [`AnalyticsConfig`]. Inputs are only read: no song, album,
//! playlist or user is mutated, and no state survives between calls. Callers
//! that mutate entities concurrently (for example recording plays on a
//! [`SharedSong`]) must synchronize that themselves.
//!
//! ## Tie-breaking
//!
//! - Song rankings (most popular, top by play count, recommendations) are
//!   stable: equal keys keep the order of the input slice.
//! - Rankings over a user's play counts follow song id order on ties, because
//!   play counts are stored in a `BTreeMap`.
//!
//! ```
//! use muse_analytics::{Genre, MusicAnalytics, Song};
//! use std::time::Duration;
//!
//! let songs = vec![
//!     Song::new("Take Five", ["Dave Brubeck"], Duration::from_secs(324), 1959, Genre::Jazz)?
//!         .with_popularity(88.5)
//!         .shared(),
//!     Song::new("So What", ["Miles Davis"], Duration::from_secs(562), 1959, Genre::Jazz)?
//!         .with_popularity(89.1)
//!         .shared(),
//! ];
//!
//! let analytics = MusicAnalytics::default();
//! let averages = analytics.average_popularity_by_genre(&songs);
//! assert!((averages[&Genre::Jazz] - 88.8).abs() < 1e-9);
//! # Ok::<(), muse_analytics::AnalyticsError>(())
//! ```

mod albums;
mod catalog;
mod playlists;
mod recommendations;
pub mod summary;
mod transitions;
mod users;

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use crate::config::AnalyticsConfig;
use crate::error::{AnalyticsError, Result};
use crate::model::{Playlist, SharedSong, SongId, UserId};

pub use summary::{
    AlbumCriteria, AlbumSummary, ArtistPair, Decade, PlayStatistics, PlaylistRequest,
    PremiumSplit, SongSummary, UserStatistics,
};

/// Stateless analytics over in-memory catalog collections.
#[derive(Debug, Clone, Default)]
pub struct MusicAnalytics {
    config: AnalyticsConfig,
}

impl MusicAnalytics {
    /// # Errors
    ///
    /// Returns [`AnalyticsError::InvalidConfig`] if a weight is negative or not finite.
    pub fn new(config: AnalyticsConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    #[must_use]
    pub const fn config(&self) -> &AnalyticsConfig {
        &self.config
    }
}

/// Id → song lookup built once per call. The first song wins on duplicate ids.
fn index_songs(songs: &[SharedSong]) -> HashMap<SongId, &SharedSong> {
    let mut index = HashMap::with_capacity(songs.len());
    for song in songs {
        index.entry(song.id()).or_insert(song);
    }
    index
}

fn playlists_by_owner(playlists: &[Playlist]) -> HashMap<UserId, Vec<&Playlist>> {
    let mut owned: HashMap<UserId, Vec<&Playlist>> = HashMap::new();
    for playlist in playlists {
        owned.entry(playlist.owner_id()).or_default().push(playlist);
    }
    owned
}

/// The most popular song; the first one in iteration order on a tie.
fn most_popular<'a>(songs: impl IntoIterator<Item = &'a SharedSong>) -> Option<&'a SharedSong> {
    songs.into_iter().fold(None, |best, song| match best {
        Some(current) if current.popularity() >= song.popularity() => Some(current),
        _ => Some(song),
    })
}

/// Highest score first. The sort is stable, so equal scores keep input order.
fn sort_by_score_desc<T>(scored: &mut [(T, f64)]) {
    scored.sort_by(|(_, a), (_, b)| b.partial_cmp(a).unwrap_or(Ordering::Equal));
}

/// Collects keyed entries, failing if two entries share a key.
fn collect_unique<V>(
    kind: &'static str,
    entries: impl IntoIterator<Item = (String, V)>,
) -> Result<BTreeMap<String, V>> {
    let mut map = BTreeMap::new();
    for (key, value) in entries {
        if map.contains_key(&key) {
            return Err(AnalyticsError::DuplicateKey { kind, key });
        }
        map.insert(key, value);
    }
    Ok(map)
}
