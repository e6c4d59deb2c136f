use std::cmp::Ordering;
use std::time::Duration;

use rand::seq::SliceRandom;
use rand::Rng;

use super::{MusicAnalytics, PlaylistRequest};
use crate::error::{AnalyticsError, Result};
use crate::model::{Playlist, SharedSong, Song};

/// How far generation may stray from the request's preferences.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VarietyBand {
    /// 1 to 3: preferred primary genres only, preferred genre first, most popular first.
    Strict,
    /// 4 to 7: secondary genres also match; least popular first, newest first among equals.
    Balanced,
    /// 8 to 10: artist preference dropped; random order.
    Exploratory,
}

impl VarietyBand {
    fn of(variety: u8) -> Result<Self> {
        match variety {
            1..=3 => Ok(Self::Strict),
            4..=7 => Ok(Self::Balanced),
            8..=10 => Ok(Self::Exploratory),
            _ => Err(AnalyticsError::InvalidArgument(format!(
                "variety must be between 1 and 10, got {variety}"
            ))),
        }
    }
}

impl MusicAnalytics {
    /// Sum of every playlist's duration. A song in several playlists counts once per playlist.
    #[must_use]
    pub fn total_playlists_duration(&self, playlists: &[Playlist]) -> Duration {
        playlists
            .iter()
            .map(Playlist::total_duration)
            .fold(Duration::ZERO, Duration::saturating_add)
    }

    /// Builds a playlist from `songs` that fits `request.target_duration`.
    ///
    /// Candidates are filtered by genre, artist and release year, ordered
    /// according to the variety band, then appended until the next song would
    /// take the total past the target. The first candidate is always kept,
    /// even when it alone is longer than the target.
    ///
    /// `rng` is only used for variety above 7.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyticsError::InvalidArgument`] if the variety is outside
    /// 1 to 10 or the earliest year is after the latest year.
    pub fn generate_dynamic_playlist<R: Rng + ?Sized>(
        &self,
        songs: &[SharedSong],
        request: &PlaylistRequest,
        rng: &mut R,
    ) -> Result<Vec<SharedSong>> {
        let band = VarietyBand::of(request.variety)?;
        if let (Some(earliest), Some(latest)) = (request.earliest_year, request.latest_year) {
            if earliest > latest {
                return Err(AnalyticsError::InvalidArgument(format!(
                    "earliest year {earliest} is after latest year {latest}"
                )));
            }
        }

        let mut candidates: Vec<SharedSong> = songs
            .iter()
            .filter(|song| matches_genre(song, request, band))
            .filter(|song| matches_artist(song, request, band))
            .filter(|song| within_years(song, request))
            .cloned()
            .collect();
        log::debug!(
            "{} of {} songs are candidates for a {:?} playlist",
            candidates.len(),
            songs.len(),
            band
        );

        match band {
            VarietyBand::Strict => candidates.sort_by(|a, b| {
                let preferred =
                    |song: &SharedSong| request.preferred_genres.contains(&song.primary_genre());
                preferred(b)
                    .cmp(&preferred(a))
                    .then_with(|| compare_popularity(b, a))
            }),
            VarietyBand::Balanced => candidates.sort_by(|a, b| {
                compare_popularity(a, b).then_with(|| b.release_year().cmp(&a.release_year()))
            }),
            VarietyBand::Exploratory => candidates.shuffle(rng),
        }

        Ok(fill_to_duration(candidates, request.target_duration))
    }
}

fn compare_popularity(a: &Song, b: &Song) -> Ordering {
    a.popularity()
        .partial_cmp(&b.popularity())
        .unwrap_or(Ordering::Equal)
}

fn matches_genre(song: &Song, request: &PlaylistRequest, band: VarietyBand) -> bool {
    let preferred = &request.preferred_genres;
    preferred.is_empty()
        || preferred.contains(&song.primary_genre())
        || (band != VarietyBand::Strict
            && !song.secondary_genres().is_disjoint(preferred))
}

fn matches_artist(song: &Song, request: &PlaylistRequest, band: VarietyBand) -> bool {
    band == VarietyBand::Exploratory
        || request.preferred_artists.is_empty()
        || !song.artists().is_disjoint(&request.preferred_artists)
}

fn within_years(song: &Song, request: &PlaylistRequest) -> bool {
    let year = song.release_year();
    request.earliest_year.map_or(true, |earliest| year >= earliest)
        && request.latest_year.map_or(true, |latest| year <= latest)
}

fn fill_to_duration(candidates: Vec<SharedSong>, target: Duration) -> Vec<SharedSong> {
    let mut total = Duration::ZERO;
    let mut playlist = Vec::new();
    for song in candidates {
        let next = total.saturating_add(song.duration());
        if next > target && !playlist.is_empty() {
            break;
        }
        total = next;
        playlist.push(song);
    }
    log::trace!("Filled {} songs totalling {:?} of {:?}", playlist.len(), total, target);
    playlist
}
