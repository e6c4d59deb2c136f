use std::collections::{BTreeMap, BTreeSet};
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use chrono::NaiveDate;

use crate::error::{require_non_blank, AnalyticsError, Result};
use crate::model::album::Album;
use crate::model::genre::Genre;
use crate::model::ids::{SongId, UserId};

/// A listener, with their stated preferences and accumulated listening data.
#[derive(Debug, Clone)]
pub struct User {
    id: UserId,
    username: String,
    email: String,
    joined_on: NaiveDate,
    favorite_genres: BTreeSet<Genre>,
    /// Keyed by song id, so iteration (and every tie-break built on it) is in id order.
    play_counts: BTreeMap<SongId, u64>,
    favorite_albums: Vec<Arc<Album>>,
    country: String,
    premium: bool,
    listening_history: Vec<SongId>,
}

impl User {
    /// # Errors
    ///
    /// Returns [`AnalyticsError::InvalidArgument`] if the username is blank or
    /// the email has no `@`.
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        joined_on: NaiveDate,
        country: impl Into<String>,
        premium: bool,
    ) -> Result<Self> {
        let username = username.into();
        let email = email.into();
        require_non_blank("username", &username)?;
        if !email.contains('@') {
            return Err(AnalyticsError::InvalidArgument(format!(
                "email `{email}` of user `{username}` is not an address"
            )));
        }

        Ok(Self {
            id: UserId::new(),
            username,
            email,
            joined_on,
            favorite_genres: BTreeSet::new(),
            play_counts: BTreeMap::new(),
            favorite_albums: Vec::new(),
            country: country.into(),
            premium,
            listening_history: Vec::new(),
        })
    }

    #[must_use]
    pub fn with_favorite_genres(mut self, genres: impl IntoIterator<Item = Genre>) -> Self {
        self.favorite_genres.extend(genres);
        self
    }

    #[must_use]
    pub const fn id(&self) -> UserId {
        self.id
    }

    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    #[must_use]
    pub const fn joined_on(&self) -> NaiveDate {
        self.joined_on
    }

    #[must_use]
    pub const fn favorite_genres(&self) -> &BTreeSet<Genre> {
        &self.favorite_genres
    }

    #[must_use]
    pub const fn play_counts(&self) -> &BTreeMap<SongId, u64> {
        &self.play_counts
    }

    #[must_use]
    pub fn favorite_albums(&self) -> &[Arc<Album>] {
        &self.favorite_albums
    }

    #[must_use]
    pub fn country(&self) -> &str {
        &self.country
    }

    #[must_use]
    pub const fn is_premium(&self) -> bool {
        self.premium
    }

    pub fn set_premium(&mut self, premium: bool) {
        self.premium = premium;
    }

    /// Chronological list of listened song ids.
    #[must_use]
    pub fn listening_history(&self) -> &[SongId] {
        &self.listening_history
    }

    pub fn add_favorite_genre(&mut self, genre: Genre) {
        self.favorite_genres.insert(genre);
    }

    pub fn remove_favorite_genre(&mut self, genre: Genre) {
        self.favorite_genres.remove(&genre);
    }

    pub fn play_song(&mut self, song_id: SongId) {
        self.play_song_times(song_id, 1);
    }

    /// Adds `count` plays of `song_id`. Zero is ignored so the map never holds empty entries.
    pub fn play_song_times(&mut self, song_id: SongId, count: u64) {
        if count > 0 {
            let plays = self.play_counts.entry(song_id).or_insert(0);
            *plays = plays.saturating_add(count);
        }
    }

    pub fn add_favorite_album(&mut self, album: &Arc<Album>) {
        if !self.favorite_albums.iter().any(|a| a.id() == album.id()) {
            self.favorite_albums.push(Arc::clone(album));
        }
    }

    pub fn remove_favorite_album(&mut self, album: &Album) {
        self.favorite_albums.retain(|a| a.id() != album.id());
    }

    pub fn record_listen(&mut self, song_id: SongId) {
        self.listening_history.push(song_id);
    }

    pub fn record_listens(&mut self, song_ids: impl IntoIterator<Item = SongId>) {
        self.listening_history.extend(song_ids);
    }

    #[must_use]
    pub fn total_play_count(&self) -> u64 {
        self.play_counts
            .values()
            .fold(0, |total: u64, &plays| total.saturating_add(plays))
    }

    /// Song with the most plays. Ties go to the smallest song id.
    #[must_use]
    pub fn most_played_song_id(&self) -> Option<SongId> {
        self.play_counts
            .iter()
            .fold(None, |best: Option<(SongId, u64)>, (&id, &count)| match best {
                Some((_, best_count)) if best_count >= count => best,
                _ => Some((id, count)),
            })
            .map(|(id, _)| id)
    }
}

impl PartialEq for User {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for User {}

impl Hash for User {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
