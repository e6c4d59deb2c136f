use std::collections::{HashMap, HashSet};

use super::MusicAnalytics;
use crate::model::{SharedSong, SongId, User};

impl MusicAnalytics {
    /// Probability that one song is followed by another, estimated from
    /// every user's listening history.
    ///
    /// History entries that are not in `songs` are dropped before
    /// consecutive pairs are formed. Outgoing probabilities of each origin
    /// sum to 1. Songs never followed by anything are absent.
    #[must_use]
    pub fn track_transition_probabilities(
        &self,
        users: &[User],
        songs: &[SharedSong],
    ) -> HashMap<SongId, HashMap<SongId, f64>> {
        let known: HashSet<SongId> = songs.iter().map(|song| song.id()).collect();
        let mut counts: HashMap<SongId, HashMap<SongId, u64>> = HashMap::new();

        for user in users {
            let sequence: Vec<SongId> = user
                .listening_history()
                .iter()
                .copied()
                .filter(|id| known.contains(id))
                .collect();
            if sequence.len() < 2 {
                continue;
            }
            for pair in sequence.windows(2) {
                *counts
                    .entry(pair[0])
                    .or_default()
                    .entry(pair[1])
                    .or_default() += 1;
            }
        }
        log::debug!("Observed transitions out of {} songs", counts.len());

        counts
            .into_iter()
            .map(|(origin, next)| {
                let total: u64 = next.values().sum();
                #[allow(clippy::cast_precision_loss)]
                let probabilities: HashMap<SongId, f64> = next
                    .into_iter()
                    .map(|(song, count)| (song, count as f64 / total as f64))
                    .collect();
                (origin, probabilities)
            })
            .collect()
    }
}
