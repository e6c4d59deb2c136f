use std::cmp::Reverse;
use std::collections::{BTreeMap, HashMap};

use super::{
    collect_unique, index_songs, playlists_by_owner, MusicAnalytics, PlayStatistics, PremiumSplit,
    UserStatistics,
};
use crate::error::Result;
use crate::model::{Genre, Playlist, SharedSong, User, UserId};

const MAX_AFFINITY: f64 = 100.0;

impl MusicAnalytics {
    /// For each username, the usernames of the other users sharing at least
    /// one favorite genre, in input order.
    ///
    /// # Errors
    ///
    /// Returns [`crate::AnalyticsError::DuplicateKey`] if two users share a username.
    pub fn users_with_overlapping_genres(
        &self,
        users: &[User],
    ) -> Result<BTreeMap<String, Vec<String>>> {
        let entries = users.iter().map(|user| {
            let overlapping = users
                .iter()
                .filter(|other| other.id() != user.id())
                .filter(|other| !user.favorite_genres().is_disjoint(other.favorite_genres()))
                .map(|other| other.username().to_string())
                .collect();
            (user.username().to_string(), overlapping)
        });
        collect_unique("username", entries)
    }

    /// Per-user report keyed by username.
    ///
    /// `top_songs` takes the user's most played song ids (up to
    /// `top_songs_per_user`) and then drops ids missing from `songs`, so a
    /// user may end up with fewer entries than the limit.
    ///
    /// # Errors
    ///
    /// Returns [`crate::AnalyticsError::DuplicateKey`] if two users share a username.
    pub fn user_statistics(
        &self,
        users: &[User],
        songs: &[SharedSong],
        playlists: &[Playlist],
    ) -> Result<BTreeMap<String, UserStatistics>> {
        log::debug!(
            "Building statistics for {} users over {} songs and {} playlists",
            users.len(),
            songs.len(),
            playlists.len()
        );
        let song_index = index_songs(songs);
        let owned = playlists_by_owner(playlists);

        let entries = users.iter().map(|user| {
            let mut plays: Vec<_> = user.play_counts().iter().collect();
            plays.sort_by_key(|(_, count)| Reverse(**count));

            let top_songs: Vec<SharedSong> = plays
                .into_iter()
                .take(self.config.top_songs_per_user)
                .filter_map(|(id, _)| {
                    let song = song_index.get(id).map(|song| SharedSong::clone(song));
                    if song.is_none() {
                        log::trace!("Skipping unknown song {id} played by {}", user.username());
                    }
                    song
                })
                .collect();

            let stats = UserStatistics {
                username: user.username().to_string(),
                premium: user.is_premium(),
                total_play_count: user.total_play_count(),
                playlist_count: owned.get(&user.id()).map_or(0, Vec::len),
                top_genres: top_songs.iter().map(|song| song.primary_genre()).collect(),
                top_songs,
            };
            (stats.username.clone(), stats)
        });
        collect_unique("username", entries)
    }

    /// Total play counts summarized separately for premium and free users.
    #[must_use]
    pub fn play_statistics_by_premium(&self, users: &[User]) -> PremiumSplit {
        let totals = move |premium: bool| {
            users
                .iter()
                .filter(move |user| user.is_premium() == premium)
                .map(User::total_play_count)
        };
        PremiumSplit {
            premium: PlayStatistics::from_totals(totals(true)),
            free: PlayStatistics::from_totals(totals(false)),
        }
    }

    /// Per-user genre affinity on a 0 to 100 scale.
    ///
    /// Raw scores combine play history (primary and secondary genres),
    /// favorite genres and the songs of playlists the user owns, weighted by
    /// [`crate::config::AffinityWeights`]. Each user's scores are then scaled so
    /// the strongest genre is 100. A user with nothing to score gets an empty map.
    #[must_use]
    pub fn genre_affinity_scores(
        &self,
        users: &[User],
        songs: &[SharedSong],
        playlists: &[Playlist],
    ) -> HashMap<UserId, BTreeMap<Genre, f64>> {
        let weights = &self.config.affinity;
        let song_index = index_songs(songs);
        let owned = playlists_by_owner(playlists);

        users
            .iter()
            .map(|user| {
                let mut scores: BTreeMap<Genre, f64> = BTreeMap::new();

                for (id, &plays) in user.play_counts() {
                    let Some(song) = song_index.get(id) else {
                        log::trace!("Skipping unknown song {id} played by {}", user.username());
                        continue;
                    };
                    #[allow(clippy::cast_precision_loss)]
                    let plays = plays as f64;
                    *scores.entry(song.primary_genre()).or_default() += plays * weights.primary_play;
                    for genre in song.secondary_genres() {
                        *scores.entry(*genre).or_default() += plays * weights.secondary_play;
                    }
                }

                for genre in user.favorite_genres() {
                    *scores.entry(*genre).or_default() += weights.favorite_genre;
                }

                for playlist in owned.get(&user.id()).into_iter().flatten() {
                    for song in playlist.songs() {
                        *scores.entry(song.primary_genre()).or_default() += weights.playlist_song;
                    }
                }

                (user.id(), normalize_affinity(scores))
            })
            .collect()
    }
}

/// Scales scores so the maximum becomes 100. A map whose maximum is not
/// positive is divided by 1 instead.
fn normalize_affinity(mut scores: BTreeMap<Genre, f64>) -> BTreeMap<Genre, f64> {
    let max = scores.values().copied().fold(f64::NEG_INFINITY, f64::max);
    let max = if max > 0.0 { max } else { 1.0 };
    for score in scores.values_mut() {
        *score = (*score / max * MAX_AFFINITY).min(MAX_AFFINITY);
    }
    scores
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use chrono::NaiveDate;

    use super::super::test_support::{song, titles};
    use super::*;
    use crate::error::AnalyticsError;
    use crate::model::{Song, SongId};

    fn user(name: &str, premium: bool, genres: &[Genre]) -> User {
        User::new(
            name,
            format!("{name}@example.com"),
            NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            "Nowhere",
            premium,
        )
        .unwrap()
        .with_favorite_genres(genres.iter().copied())
    }

    #[test]
    fn test_users_with_overlapping_genres() {
        let analytics = MusicAnalytics::default();
        let users = vec![
            user("alice", false, &[Genre::Rock, Genre::Jazz]),
            user("bob", false, &[Genre::Jazz]),
            user("carol", false, &[Genre::Pop]),
            user("dave", false, &[Genre::Rock]),
        ];
        let overlaps = analytics.users_with_overlapping_genres(&users).unwrap();

        assert_eq!(overlaps["alice"], ["bob", "dave"]);
        assert_eq!(overlaps["bob"], ["alice"]);
        assert!(overlaps["carol"].is_empty());
        assert_eq!(overlaps["dave"], ["alice"]);
    }

    #[test]
    fn test_empty_user_list_gives_empty_results() {
        let analytics = MusicAnalytics::default();
        let songs = vec![song("Rock", Genre::Rock, 50.0, 10)];

        assert!(analytics.users_with_overlapping_genres(&[]).unwrap().is_empty());
        assert!(analytics.user_statistics(&[], &songs, &[]).unwrap().is_empty());
        assert_eq!(analytics.play_statistics_by_premium(&[]), PremiumSplit::default());
        assert!(analytics.genre_affinity_scores(&[], &songs, &[]).is_empty());
    }

    #[test]
    fn test_user_statistics_for_idle_user() {
        let analytics = MusicAnalytics::default();
        let songs = vec![song("Rock", Genre::Rock, 50.0, 10)];
        let idle = user("idle", false, &[Genre::Rock]);
        let elsewhere = Playlist::new("Theirs", UserId::new(), true, "").unwrap();

        let stats = analytics.user_statistics(&[idle], &songs, &[elsewhere]).unwrap();
        let stats = &stats["idle"];
        assert!(stats.top_songs.is_empty());
        assert!(stats.top_genres.is_empty());
        assert_eq!(stats.total_play_count, 0);
        assert_eq!(stats.playlist_count, 0);
        assert!(!stats.premium);
    }

    #[test]
    fn test_play_totals_saturate() {
        let analytics = MusicAnalytics::default();
        let mut heavy = user("heavy", true, &[]);
        heavy.play_song_times(SongId::new(), u64::MAX);
        heavy.play_song_times(SongId::new(), 5);
        let mut heavier = user("heavier", true, &[]);
        heavier.play_song_times(SongId::new(), u64::MAX);

        assert_eq!(heavy.total_play_count(), u64::MAX);
        let split = analytics.play_statistics_by_premium(&[heavy, heavier]);
        assert_eq!(split.premium.count, 2);
        assert_eq!(split.premium.sum, u64::MAX);
        assert_eq!(split.premium.max, Some(u64::MAX));
    }

    #[test]
    fn test_duplicate_username_is_an_error() {
        let analytics = MusicAnalytics::default();
        let users = vec![user("twin", false, &[]), user("twin", true, &[])];

        let err = analytics.users_with_overlapping_genres(&users).unwrap_err();
        assert!(matches!(err, AnalyticsError::DuplicateKey { kind: "username", .. }));
        assert!(analytics.user_statistics(&users, &[], &[]).is_err());
    }

    #[test]
    fn test_user_statistics_limits_before_skipping_missing() {
        let mut config = crate::config::AnalyticsConfig::default();
        config.top_songs_per_user = 2;
        let analytics = MusicAnalytics::new(config).unwrap();

        let rock = song("Rock", Genre::Rock, 50.0, 0);
        let jazz = song("Jazz", Genre::Jazz, 50.0, 0);
        let pop = song("Pop", Genre::Pop, 50.0, 0);
        let mut listener = user("listener", true, &[]);
        listener.play_song_times(SongId::new(), 100);
        listener.play_song_times(rock.id(), 40);
        listener.play_song_times(jazz.id(), 30);
        listener.play_song_times(pop.id(), 5);

        let owned = Playlist::new("Mine", listener.id(), true, "").unwrap();
        let other = Playlist::new("Theirs", UserId::new(), true, "").unwrap();
        let songs = vec![rock, jazz, pop];

        let stats = analytics
            .user_statistics(&[listener], &songs, &[owned, other])
            .unwrap();
        let stats = &stats["listener"];

        assert_eq!(titles(&stats.top_songs), ["Rock"]);
        assert_eq!(stats.top_genres.iter().copied().collect::<Vec<_>>(), [Genre::Rock]);
        assert_eq!(stats.total_play_count, 175);
        assert_eq!(stats.playlist_count, 1);
        assert!(stats.premium);
    }

    #[test]
    fn test_user_statistics_ties_follow_song_id() {
        let analytics = MusicAnalytics::default();
        let a = song("A", Genre::Blues, 10.0, 0);
        let b = song("B", Genre::Blues, 90.0, 0);
        let expected = if a.id() < b.id() { ["A", "B"] } else { ["B", "A"] };
        let mut listener = user("tied", false, &[]);
        listener.play_song_times(b.id(), 3);
        listener.play_song_times(a.id(), 3);

        let stats = analytics.user_statistics(&[listener], &[a, b], &[]).unwrap();
        assert_eq!(titles(&stats["tied"].top_songs), expected);
    }

    #[test]
    fn test_play_statistics_by_premium() {
        let analytics = MusicAnalytics::default();
        let mut paying = user("paying", true, &[]);
        paying.play_song_times(SongId::new(), 10);
        let mut also_paying = user("also", true, &[]);
        also_paying.play_song_times(SongId::new(), 30);

        let split = analytics.play_statistics_by_premium(&[paying, also_paying]);
        assert_eq!(split.premium.count, 2);
        assert_eq!(split.premium.sum, 40);
        assert_eq!(split.premium.min, Some(10));
        assert_eq!(split.premium.max, Some(30));
        assert!((split.premium.average - 20.0).abs() < 1e-9);
        assert_eq!(split.free, PlayStatistics::default());
    }

    #[test]
    fn test_genre_affinity_scores() {
        let analytics = MusicAnalytics::default();
        let fusion = Song::new("Fusion", ["A"], Duration::from_secs(60), 2000, Genre::Jazz)
            .unwrap()
            .with_secondary_genres([Genre::Rock])
            .shared();
        let mut fan = user("fan", false, &[Genre::Blues]);
        fan.play_song_times(fusion.id(), 40);
        let playlist = Playlist::new("Jazz", fan.id(), false, "")
            .unwrap()
            .with_songs([&fusion]);
        let idle = user("idle", false, &[]);

        let scores =
            analytics.genre_affinity_scores(&[fan.clone(), idle.clone()], &[fusion], &[playlist]);
        let fan_scores = &scores[&fan.id()];

        // jazz 40 + 0.5 = 40.5, rock 20, blues 20
        assert_eq!(fan_scores[&Genre::Jazz], 100.0);
        assert!((fan_scores[&Genre::Rock] - 20.0 / 40.5 * 100.0).abs() < 1e-9);
        assert!((fan_scores[&Genre::Blues] - 20.0 / 40.5 * 100.0).abs() < 1e-9);
        assert!(scores[&idle.id()].is_empty());
    }

    #[test]
    fn test_normalize_without_positive_scores() {
        let scores = BTreeMap::from([(Genre::Pop, 0.0)]);
        assert_eq!(normalize_affinity(scores)[&Genre::Pop], 0.0);
        assert!(normalize_affinity(BTreeMap::new()).is_empty());
    }
}
