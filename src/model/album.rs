use std::hash::{Hash, Hasher};

use crate::error::{require_non_blank, Result};
use crate::model::genre::Genre;
use crate::model::ids::AlbumId;
use crate::model::song::SharedSong;

/// An album. Songs are held by shared reference; the album does not own their lifecycle.
#[derive(Debug, Clone)]
pub struct Album {
    id: AlbumId,
    title: String,
    artist: String,
    release_year: i32,
    primary_genre: Genre,
    songs: Vec<SharedSong>,
    compilation: bool,
}

impl Album {
    /// # Errors
    ///
    /// Returns [`crate::AnalyticsError::InvalidArgument`] if the title or artist is blank.
    pub fn new(
        title: impl Into<String>,
        artist: impl Into<String>,
        release_year: i32,
        primary_genre: Genre,
    ) -> Result<Self> {
        let title = title.into();
        let artist = artist.into();
        require_non_blank("album title", &title)?;
        require_non_blank("album artist", &artist)?;

        Ok(Self {
            id: AlbumId::new(),
            title,
            artist,
            release_year,
            primary_genre,
            songs: Vec::new(),
            compilation: false,
        })
    }

    #[must_use]
    pub fn with_songs<'a>(mut self, songs: impl IntoIterator<Item = &'a SharedSong>) -> Self {
        for song in songs {
            self.add_song(song);
        }
        self
    }

    #[must_use]
    pub fn compilation(mut self) -> Self {
        self.compilation = true;
        self
    }

    /// Appends `song` unless a song with the same id is already on the album.
    pub fn add_song(&mut self, song: &SharedSong) {
        if !self.songs.iter().any(|s| s.id() == song.id()) {
            self.songs.push(SharedSong::clone(song));
        }
    }

    #[must_use]
    pub const fn id(&self) -> AlbumId {
        self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn artist(&self) -> &str {
        &self.artist
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
    pub fn songs(&self) -> &[SharedSong] {
        &self.songs
    }

    #[must_use]
    pub const fn is_compilation(&self) -> bool {
        self.compilation
    }

    #[must_use]
    pub fn song_count(&self) -> usize {
        self.songs.len()
    }

    /// Mean popularity of the contained songs, `0.0` for an empty album.
    #[must_use]
    pub fn average_popularity(&self) -> f64 {
        if self.songs.is_empty() {
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss)]
        let count = self.songs.len() as f64;
        self.songs.iter().map(|song| song.popularity()).sum::<f64>() / count
    }

    #[must_use]
    pub fn total_play_count(&self) -> u64 {
        self.songs
            .iter()
            .fold(0, |total: u64, song| total.saturating_add(song.play_count()))
    }
}

impl PartialEq for Album {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Album {}

impl Hash for Album {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
