use std::cmp::Reverse;
use std::collections::BTreeMap;

use super::{most_popular, ArtistPair, Decade, MusicAnalytics, SongSummary};
use crate::model::{Genre, SharedSong};

impl MusicAnalytics {
    /// Mean popularity of the songs in each primary genre. Genres without songs are absent.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn average_popularity_by_genre(&self, songs: &[SharedSong]) -> BTreeMap<Genre, f64> {
        log::debug!("Averaging popularity of {} songs by genre", songs.len());

        let mut totals: BTreeMap<Genre, (f64, usize)> = BTreeMap::new();
        for song in songs {
            let (sum, count) = totals.entry(song.primary_genre()).or_insert((0.0, 0));
            *sum += song.popularity();
            *count += 1;
        }

        totals
            .into_iter()
            .map(|(genre, (sum, count))| (genre, sum / count as f64))
            .collect()
    }

    /// The most popular song of each primary genre. Ties go to the song that comes first.
    #[must_use]
    pub fn most_popular_song_by_genre(&self, songs: &[SharedSong]) -> BTreeMap<Genre, SharedSong> {
        let mut by_genre: BTreeMap<Genre, Vec<&SharedSong>> = BTreeMap::new();
        for song in songs {
            by_genre.entry(song.primary_genre()).or_default().push(song);
        }

        by_genre
            .into_iter()
            .filter_map(|(genre, candidates)| {
                most_popular(candidates).map(|song| (genre, SharedSong::clone(song)))
            })
            .collect()
    }

    /// The `n` songs with the highest play count, most played first.
    ///
    /// Equal play counts keep their input order. Returns every song when
    /// `n` exceeds the catalog size.
    #[must_use]
    pub fn top_songs_by_play_count(&self, songs: &[SharedSong], n: usize) -> Vec<SharedSong> {
        // Counts are read once so concurrent plays cannot reorder the sort mid-way.
        let mut ranked: Vec<(u64, &SharedSong)> =
            songs.iter().map(|song| (song.play_count(), song)).collect();
        ranked.sort_by_key(|(plays, _)| Reverse(*plays));

        ranked
            .into_iter()
            .take(n)
            .map(|(_, song)| SharedSong::clone(song))
            .collect()
    }

    /// Songs grouped by release decade, then by primary genre, in input order.
    #[must_use]
    pub fn catalog_by_decade_and_genre(
        &self,
        songs: &[SharedSong],
    ) -> BTreeMap<Decade, BTreeMap<Genre, Vec<SongSummary>>> {
        let mut catalog: BTreeMap<Decade, BTreeMap<Genre, Vec<SongSummary>>> = BTreeMap::new();
        for song in songs {
            catalog
                .entry(Decade::of(song.release_year()))
                .or_default()
                .entry(song.primary_genre())
                .or_default()
                .push(SongSummary {
                    title: song.title().to_string(),
                    artists: song.joined_artists(),
                    popularity: song.popularity(),
                    play_count: song.play_count(),
                });
        }
        log::debug!("Catalog spans {} decades", catalog.len());
        catalog
    }

    /// For every pair of artists credited together on at least one song, the
    /// songs they share. Solo songs contribute nothing.
    #[must_use]
    pub fn artist_collaborations(
        &self,
        songs: &[SharedSong],
    ) -> BTreeMap<ArtistPair, Vec<SharedSong>> {
        let mut collaborations: BTreeMap<ArtistPair, Vec<SharedSong>> = BTreeMap::new();
        for song in songs.iter().filter(|song| song.artists().len() > 1) {
            let artists: Vec<&String> = song.artists().iter().collect();
            for (i, first) in artists.iter().enumerate() {
                for second in &artists[i + 1..] {
                    collaborations
                        .entry(ArtistPair::new(first.as_str(), second.as_str()))
                        .or_default()
                        .push(SharedSong::clone(song));
                }
            }
        }
        collaborations
    }
}
