use std::collections::HashSet;

use super::{sort_by_score_desc, MusicAnalytics};
use crate::model::{SharedSong, Song, User};

impl MusicAnalytics {
    /// Songs the user has not played yet, best match first, at most
    /// `recommendation.limit` of them. Equal scores keep catalog order.
    #[must_use]
    pub fn personalized_recommendations(&self, user: &User, songs: &[SharedSong]) -> Vec<SharedSong> {
        let favorite_artists = favorite_artists(user);
        let mut scored: Vec<(&SharedSong, f64)> = songs
            .iter()
            .filter(|song| !user.play_counts().contains_key(&song.id()))
            .map(|song| (song, self.score(song, user, &favorite_artists)))
            .collect();
        sort_by_score_desc(&mut scored);

        log::debug!(
            "Scored {} unplayed songs for {}",
            scored.len(),
            user.username()
        );
        scored
            .into_iter()
            .take(self.config.recommendation.limit)
            .map(|(song, _)| SharedSong::clone(song))
            .collect()
    }

    /// The score [`Self::personalized_recommendations`] ranks `song` by for `user`.
    #[must_use]
    pub fn recommendation_score(&self, song: &Song, user: &User) -> f64 {
        self.score(song, user, &favorite_artists(user))
    }

    fn score(&self, song: &Song, user: &User, favorite_artists: &HashSet<&str>) -> f64 {
        let weights = &self.config.recommendation;
        let favorites = user.favorite_genres();
        let mut score = weights.popularity * song.popularity();

        if favorites.contains(&song.primary_genre()) {
            score += weights.favorite_genre;
        }
        #[allow(clippy::cast_precision_loss)]
        let shared_secondary = song.secondary_genres().intersection(favorites).count() as f64;
        score += weights.secondary_genre * shared_secondary;

        if song.artists().iter().any(|artist| favorite_artists.contains(artist.as_str())) {
            score += weights.favorite_artist;
        }
        score
    }
}

/// Artists of the user's favorite albums.
fn favorite_artists(user: &User) -> HashSet<&str> {
    user.favorite_albums().iter().map(|album| album.artist()).collect()
}
