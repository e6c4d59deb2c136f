use std::collections::BTreeSet;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::error::{require_non_blank, AnalyticsError, Result};
use crate::model::genre::Genre;
use crate::model::ids::SongId;

/// Songs are shared by reference between albums, playlists and catalogs.
pub type SharedSong = Arc<Song>;

pub const MIN_POPULARITY: f64 = 0.0;
pub const MAX_POPULARITY: f64 = 100.0;

/// A single track in the catalog.
///
/// Play count and popularity are the only mutable attributes. They are stored
/// in atomics so every holder of a [`SharedSong`] observes the same values;
/// identity (the id) never changes.
#[derive(Debug)]
pub struct Song {
    id: SongId,
    title: String,
    artists: BTreeSet<String>,
    duration: Duration,
    release_year: i32,
    primary_genre: Genre,
    secondary_genres: BTreeSet<Genre>,
    play_count: AtomicU64,
    /// `f64` bit pattern, always within `[MIN_POPULARITY, MAX_POPULARITY]`.
    popularity: AtomicU64,
}

/// Clamps into `[0, 100]`. NaN counts as zero.
#[must_use]
pub fn clamp_popularity(popularity: f64) -> f64 {
    if popularity.is_nan() {
        MIN_POPULARITY
    } else {
        popularity.clamp(MIN_POPULARITY, MAX_POPULARITY)
    }
}

impl Song {
    /// Creates a song with zero plays and zero popularity.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyticsError::InvalidArgument`] if the title is blank, no
    /// artist is given, or any artist name is blank.
    pub fn new<I, S>(
        title: impl Into<String>,
        artists: I,
        duration: Duration,
        release_year: i32,
        primary_genre: Genre,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let title = title.into();
        require_non_blank("song title", &title)?;

        let artists: BTreeSet<String> = artists.into_iter().map(Into::into).collect();
        if artists.is_empty() {
            return Err(AnalyticsError::InvalidArgument(format!(
                "song `{title}` needs at least one artist"
            )));
        }
        for artist in &artists {
            require_non_blank("artist name", artist)?;
        }

        Ok(Self {
            id: SongId::new(),
            title,
            artists,
            duration,
            release_year,
            primary_genre,
            secondary_genres: BTreeSet::new(),
            play_count: AtomicU64::new(0),
            popularity: AtomicU64::new(MIN_POPULARITY.to_bits()),
        })
    }

    #[must_use]
    pub fn with_secondary_genres(mut self, genres: impl IntoIterator<Item = Genre>) -> Self {
        self.secondary_genres.extend(genres);
        self
    }

    #[must_use]
    pub fn with_play_count(mut self, play_count: u64) -> Self {
        *self.play_count.get_mut() = play_count;
        self
    }

    #[must_use]
    pub fn with_popularity(mut self, popularity: f64) -> Self {
        *self.popularity.get_mut() = clamp_popularity(popularity).to_bits();
        self
    }

    #[must_use]
    pub fn shared(self) -> SharedSong {
        Arc::new(self)
    }

    #[must_use]
    pub const fn id(&self) -> SongId {
        self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub const fn artists(&self) -> &BTreeSet<String> {
        &self.artists
    }

    #[must_use]
    pub const fn duration(&self) -> Duration {
        self.duration
    }

    #[must_use]
    pub const fn release_year(&self) -> i32 {
        self.release_year
    }

    #[must_use]
    pub const fn primary_genre(&self) -> Genre {
        self.primary_genre
    }

    #[must_use]
    pub const fn secondary_genres(&self) -> &BTreeSet<Genre> {
        &self.secondary_genres
    }

    #[must_use]
    pub fn play_count(&self) -> u64 {
        self.play_count.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn popularity(&self) -> f64 {
        f64::from_bits(self.popularity.load(Ordering::Relaxed))
    }

    pub fn increment_play_count(&self) {
        self.add_plays(1);
    }

    /// Adds `count` plays, saturating at `u64::MAX`.
    pub fn add_plays(&self, count: u64) {
        if count > 0 {
            let _ = self
                .play_count
                .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |plays| {
                    Some(plays.saturating_add(count))
                });
        }
    }

    pub fn set_popularity(&self, popularity: f64) {
        let clamped = clamp_popularity(popularity);
        self.popularity.store(clamped.to_bits(), Ordering::Relaxed);
        log::trace!("Set popularity of `{}' to {clamped}.", self.title);
    }

    #[must_use]
    pub fn has_artist(&self, artist: &str) -> bool {
        self.artists.contains(artist)
    }

    /// Primary plus secondary genres.
    #[must_use]
    pub fn all_genres(&self) -> BTreeSet<Genre> {
        let mut genres = self.secondary_genres.clone();
        genres.insert(self.primary_genre);
        genres
    }

    /// Artist names joined with `", "` in sorted order.
    #[must_use]
    pub fn joined_artists(&self) -> String {
        self.artists
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// A clone keeps the id, so it compares equal to the source, but it takes a
/// detached snapshot of the counters. Later updates on either copy are not
/// visible to the other. Share one song through [`SharedSong`] instead.
impl Clone for Song {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            title: self.title.clone(),
            artists: self.artists.clone(),
            duration: self.duration,
            release_year: self.release_year,
            primary_genre: self.primary_genre,
            secondary_genres: self.secondary_genres.clone(),
            play_count: AtomicU64::new(self.play_count()),
            popularity: AtomicU64::new(self.popularity().to_bits()),
        }
    }
}

impl PartialEq for Song {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Song {}

impl Hash for Song {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
