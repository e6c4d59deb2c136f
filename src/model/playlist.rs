use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::hash::{Hash, Hasher};
use std::time::Duration;

use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::{require_non_blank, Result};
use crate::model::genre::Genre;
use crate::model::ids::{PlaylistId, UserId};
use crate::model::song::SharedSong;

/// A user-curated, ordered list of songs.
#[derive(Debug, Clone)]
pub struct Playlist {
    id: PlaylistId,
    name: String,
    owner_id: UserId,
    created_at: DateTime<Utc>,
    songs: Vec<SharedSong>,
    public: bool,
    description: String,
}

impl Playlist {
    /// # Errors
    ///
    /// Returns [`crate::AnalyticsError::InvalidArgument`] if the name is blank.
    pub fn new(
        name: impl Into<String>,
        owner_id: UserId,
        public: bool,
        description: impl Into<String>,
    ) -> Result<Self> {
        let name = name.into();
        require_non_blank("playlist name", &name)?;

        Ok(Self {
            id: PlaylistId::new(),
            name,
            owner_id,
            created_at: Utc::now(),
            songs: Vec::new(),
            public,
            description: description.into(),
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
    pub const fn id(&self) -> PlaylistId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// # Errors
    ///
    /// Returns [`crate::AnalyticsError::InvalidArgument`] if the name is blank.
    pub fn rename(&mut self, name: impl Into<String>) -> Result<()> {
        let name = name.into();
        require_non_blank("playlist name", &name)?;
        self.name = name;
        Ok(())
    }

    #[must_use]
    pub const fn owner_id(&self) -> UserId {
        self.owner_id
    }

    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[must_use]
    pub fn songs(&self) -> &[SharedSong] {
        &self.songs
    }

    #[must_use]
    pub const fn is_public(&self) -> bool {
        self.public
    }

    pub fn set_public(&mut self, public: bool) {
        self.public = public;
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    /// Appends `song` unless it is already in the playlist.
    pub fn add_song(&mut self, song: &SharedSong) {
        if !self.songs.iter().any(|s| s.id() == song.id()) {
            self.songs.push(SharedSong::clone(song));
        }
    }

    /// Returns `true` if the song was present.
    pub fn remove_song(&mut self, song: &SharedSong) -> bool {
        let before = self.songs.len();
        self.songs.retain(|s| s.id() != song.id());
        before != self.songs.len()
    }

    /// Out-of-range indices are ignored.
    pub fn remove_song_at(&mut self, index: usize) -> Option<SharedSong> {
        (index < self.songs.len()).then(|| self.songs.remove(index))
    }

    #[must_use]
    pub fn song_count(&self) -> usize {
        self.songs.len()
    }

    #[must_use]
    pub fn total_duration(&self) -> Duration {
        self.songs
            .iter()
            .fold(Duration::ZERO, |total, song| total.saturating_add(song.duration()))
    }

    #[must_use]
    pub fn all_genres(&self) -> BTreeSet<Genre> {
        self.songs.iter().flat_map(|song| song.all_genres()).collect()
    }

    /// Most frequent primary genre. On a tie the genre that appears first in
    /// playlist order wins.
    #[must_use]
    pub fn most_frequent_genre(&self) -> Option<Genre> {
        let mut counts: Vec<(Genre, usize)> = Vec::new();
        for song in &self.songs {
            let genre = song.primary_genre();
            match counts.iter_mut().find(|(g, _)| *g == genre) {
                Some((_, count)) => *count += 1,
                None => counts.push((genre, 1)),
            }
        }

        counts
            .into_iter()
            .fold(None, |best: Option<(Genre, usize)>, (genre, count)| match best {
                Some((_, best_count)) if best_count >= count => best,
                _ => Some((genre, count)),
            })
            .map(|(genre, _)| genre)
    }

    #[must_use]
    pub fn average_popularity(&self) -> f64 {
        if self.songs.is_empty() {
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss)]
        let count = self.songs.len() as f64;
        self.songs.iter().map(|song| song.popularity()).sum::<f64>() / count
    }

    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.songs.shuffle(rng);
    }

    pub fn sort_by_title(&mut self) {
        self.songs.sort_by(|a, b| a.title().cmp(b.title()));
    }

    /// Most popular first; equal popularity keeps the current order.
    pub fn sort_by_popularity(&mut self) {
        self.songs.sort_by(|a, b| {
            b.popularity()
                .partial_cmp(&a.popularity())
                .unwrap_or(Ordering::Equal)
        });
    }
}

impl PartialEq for Playlist {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Playlist {}

impl Hash for Playlist {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::song::Song;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn song(title: &str, genre: Genre, secs: u64, popularity: f64) -> SharedSong {
        Song::new(title, ["Artist"], Duration::from_secs(secs), 2020, genre)
            .unwrap()
            .with_popularity(popularity)
            .shared()
    }

    fn playlist() -> Playlist {
        Playlist::new("Modern Pop", UserId::new(), true, "Recent pop hits").unwrap()
    }

    #[test]
    fn test_playlist_new_rejects_blank_name() {
        assert!(Playlist::new("", UserId::new(), false, "").is_err());
    }

    #[test]
    fn test_rename_validates() {
        let mut p = playlist();
        assert!(p.rename("   ").is_err());
        assert_eq!(p.name(), "Modern Pop");
        p.rename("Pop 2020").unwrap();
        assert_eq!(p.name(), "Pop 2020");
    }

    #[test]
    fn test_add_and_remove_songs() {
        let a = song("Bad Guy", Genre::Pop, 194, 93.4);
        let b = song("As It Was", Genre::Pop, 167, 94.1);
        let mut p = playlist().with_songs([&a, &b, &a]);
        assert_eq!(p.song_count(), 2);

        assert!(p.remove_song(&a));
        assert!(!p.remove_song(&a));
        assert!(p.remove_song_at(5).is_none());
        assert_eq!(p.remove_song_at(0).map(|s| s.id()), Some(b.id()));
        assert_eq!(p.song_count(), 0);
    }

    #[test]
    fn test_total_duration_and_average() {
        let p = playlist().with_songs([
            &song("A", Genre::Pop, 100, 50.0),
            &song("B", Genre::Rock, 200, 100.0),
        ]);
        assert_eq!(p.total_duration(), Duration::from_secs(300));
        assert_eq!(p.average_popularity(), 75.0);
        assert_eq!(playlist().total_duration(), Duration::ZERO);
        assert_eq!(playlist().average_popularity(), 0.0);
    }

    #[test]
    fn test_most_frequent_genre_tie_prefers_first_seen() {
        let p = playlist().with_songs([
            &song("A", Genre::Jazz, 1, 0.0),
            &song("B", Genre::Rock, 1, 0.0),
            &song("C", Genre::Rock, 1, 0.0),
            &song("D", Genre::Jazz, 1, 0.0),
        ]);
        assert_eq!(p.most_frequent_genre(), Some(Genre::Jazz));

        let q = playlist().with_songs([
            &song("A", Genre::Jazz, 1, 0.0),
            &song("B", Genre::Rock, 1, 0.0),
            &song("C", Genre::Rock, 1, 0.0),
        ]);
        assert_eq!(q.most_frequent_genre(), Some(Genre::Rock));
        assert_eq!(playlist().most_frequent_genre(), None);
    }

    #[test]
    fn test_sorting() {
        let mut p = playlist().with_songs([
            &song("Zebra", Genre::Pop, 1, 10.0),
            &song("Apple", Genre::Pop, 1, 90.0),
            &song("Mango", Genre::Pop, 1, 50.0),
        ]);
        p.sort_by_popularity();
        let titles: Vec<_> = p.songs().iter().map(|s| s.title().to_string()).collect();
        assert_eq!(titles, ["Apple", "Mango", "Zebra"]);

        p.sort_by_title();
        p.remove_song_at(0);
        p.sort_by_popularity();
        let titles: Vec<_> = p.songs().iter().map(|s| s.title().to_string()).collect();
        assert_eq!(titles, ["Mango", "Zebra"]);

        p.sort_by_title();
        let titles: Vec<_> = p.songs().iter().map(|s| s.title().to_string()).collect();
        assert_eq!(titles, ["Mango", "Zebra"]);
    }

    #[test]
    fn test_sort_by_title_orders_alphabetically() {
        let mut p = playlist().with_songs([
            &song("Zebra", Genre::Pop, 1, 10.0),
            &song("Apple", Genre::Pop, 1, 5.0),
        ]);
        p.sort_by_title();
        assert_eq!(p.songs()[0].title(), "Apple");
    }

    #[test]
    fn test_shuffle_keeps_songs() {
        let songs: Vec<_> = (0..20)
            .map(|i| song(&format!("Song {i}"), Genre::Pop, 1, 0.0))
            .collect();
        let mut p = playlist().with_songs(&songs);
        p.shuffle(&mut StdRng::seed_from_u64(7));
        assert_eq!(p.song_count(), 20);
        for s in &songs {
            assert!(p.songs().iter().any(|x| x.id() == s.id()));
        }
    }
}
