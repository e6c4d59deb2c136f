use std::sync::Arc;

use super::{most_popular, AlbumCriteria, AlbumSummary, MusicAnalytics};
use crate::model::Album;

impl MusicAnalytics {
    /// Albums released after `criteria.released_after` whose average song
    /// popularity reaches the threshold and that carry the requested genre,
    /// either as the album's primary genre or on one of its songs.
    #[must_use]
    pub fn albums_matching(&self, albums: &[Arc<Album>], criteria: &AlbumCriteria) -> Vec<Arc<Album>> {
        let matches: Vec<Arc<Album>> = albums
            .iter()
            .filter(|album| album.release_year() > criteria.released_after)
            .filter(|album| album.average_popularity() >= criteria.min_average_popularity)
            .filter(|album| {
                album.primary_genre() == criteria.genre
                    || album
                        .songs()
                        .iter()
                        .any(|song| song.primary_genre() == criteria.genre)
            })
            .cloned()
            .collect();

        log::debug!(
            "{} of {} albums match {:?}",
            matches.len(),
            albums.len(),
            criteria
        );
        matches
    }

    #[must_use]
    pub fn album_summaries(&self, albums: &[Arc<Album>]) -> Vec<AlbumSummary> {
        albums
            .iter()
            .map(|album| AlbumSummary {
                title: album.title().to_string(),
                artist: album.artist().to_string(),
                release_year: album.release_year(),
                song_count: album.song_count(),
                total_play_count: album.total_play_count(),
                song_titles: album
                    .songs()
                    .iter()
                    .map(|song| song.title())
                    .collect::<Vec<_>>()
                    .join(", "),
                most_popular_song: most_popular(album.songs()).map(|song| song.title().to_string()),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::song;
    use super::*;
    use crate::model::Genre;

    fn album(title: &str, year: i32, genre: Genre, popularities: &[f64]) -> Arc<Album> {
        let songs: Vec<_> = popularities
            .iter()
            .enumerate()
            .map(|(i, &popularity)| song(&format!("{title} #{}", i + 1), genre, popularity, 100))
            .collect();
        Arc::new(
            Album::new(title, "Artist", year, genre)
                .unwrap()
                .with_songs(&songs),
        )
    }

    #[test]
    fn test_empty_album_list_gives_empty_results() {
        let analytics = MusicAnalytics::default();
        let criteria = AlbumCriteria {
            released_after: 1900,
            min_average_popularity: 0.0,
            genre: Genre::Rock,
        };
        assert!(analytics.albums_matching(&[], &criteria).is_empty());
        assert!(analytics.album_summaries(&[]).is_empty());
    }

    #[test]
    fn test_albums_matching_boundaries() {
        let analytics = MusicAnalytics::default();
        let criteria = AlbumCriteria {
            released_after: 2010,
            min_average_popularity: 75.0,
            genre: Genre::Pop,
        };
        let albums = vec![
            album("Fresh", 2019, Genre::Pop, &[93.0]),
            album("Old", 2005, Genre::Pop, &[99.0]),
            album("Borderline Year", 2010, Genre::Pop, &[90.0]),
            album("Exactly Threshold", 2015, Genre::Pop, &[70.0, 80.0]),
            album("Wrong Genre", 2020, Genre::Metal, &[95.0]),
            album("Empty", 2020, Genre::Pop, &[]),
        ];

        let titles: Vec<String> = analytics
            .albums_matching(&albums, &criteria)
            .iter()
            .map(|album| album.title().to_string())
            .collect();
        assert_eq!(titles, ["Fresh", "Exactly Threshold"]);
    }

    #[test]
    fn test_albums_matching_genre_from_songs() {
        let analytics = MusicAnalytics::default();
        let pop_song = song("Crossover", Genre::Pop, 90.0, 1);
        let mixed = Arc::new(
            Album::new("Mixed", "Various Artists", 2021, Genre::Electronic)
                .unwrap()
                .with_songs([&pop_song])
                .compilation(),
        );
        let criteria = AlbumCriteria {
            released_after: 2000,
            min_average_popularity: 0.0,
            genre: Genre::Pop,
        };
        assert_eq!(analytics.albums_matching(&[mixed], &criteria).len(), 1);
    }

    #[test]
    fn test_album_summaries() {
        let analytics = MusicAnalytics::default();
        let albums = vec![
            album("Hits", 2020, Genre::Pop, &[80.0, 95.0, 95.0]),
            album("Silence", 2001, Genre::Classical, &[]),
        ];
        let summaries = analytics.album_summaries(&albums);

        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].song_count, 3);
        assert_eq!(summaries[0].total_play_count, 300);
        assert_eq!(summaries[0].song_titles, "Hits #1, Hits #2, Hits #3");
        assert_eq!(summaries[0].most_popular_song.as_deref(), Some("Hits #2"));

        assert_eq!(summaries[1].song_count, 0);
        assert_eq!(summaries[1].song_titles, "");
        assert_eq!(summaries[1].most_popular_song, None);
    }
}
