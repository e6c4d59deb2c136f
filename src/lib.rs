//! In-memory analytics over a music catalog: genre aggregates, rankings,
//! per-user reports, recommendations, generated playlists and listening
//! transitions.
//!
//! Core modules:
//! - [`model`] - Songs, albums, playlists, users and their genres
//! - [`analytics`] - The [`MusicAnalytics`] engine and its result records
//!
//! ### Supporting Modules
//!
//! - [`config`] - Recommendation and affinity weights, loadable from JSON
//! - [`error`] - Error type shared by every fallible operation
//!
//! ## Quick Start Example
//!
//! ```
//! use muse_analytics::{Genre, MusicAnalytics, Song, User};
//! use chrono::NaiveDate;
//! use std::time::Duration;
//!
//! let songs = vec![
//!     Song::new("Smells Like Teen Spirit", ["Nirvana"], Duration::from_secs(301), 1991, Genre::Rock)?
//!         .with_play_count(1_500_000)
//!         .with_popularity(92.5)
//!         .shared(),
//!     Song::new("Bad Guy", ["Billie Eilish"], Duration::from_secs(194), 2019, Genre::Pop)?
//!         .with_play_count(1_850_000)
//!         .with_popularity(93.4)
//!         .shared(),
//! ];
//!
//! let mut user = User::new(
//!     "rockfan123",
//!     "rockfan@example.com",
//!     NaiveDate::from_ymd_opt(2018, 3, 15).unwrap(),
//!     "United States",
//!     true,
//! )?
//! .with_favorite_genres([Genre::Rock]);
//! user.play_song_times(songs[1].id(), 12);
//!
//! let analytics = MusicAnalytics::default();
//!
//! let top = analytics.top_songs_by_play_count(&songs, 1);
//! assert_eq!(top[0].title(), "Bad Guy");
//!
//! // Played songs are never recommended.
//! let picks = analytics.personalized_recommendations(&user, &songs);
//! assert_eq!(picks.len(), 1);
//! assert_eq!(picks[0].title(), "Smells Like Teen Spirit");
//! # Ok::<(), muse_analytics::AnalyticsError>(())
//! ```
//!
//! ## Scoring
//!
//! Recommendations use a linear score over genre overlap, popularity and
//! favorite artists. Genre affinity combines plays, favorites and playlist
//! contents, then scales each user's strongest genre to 100. Both sets of
//! weights live in [`config::AnalyticsConfig`].
//!
//! ## Error Handling
//!
//! Entity constructors and engine operations return [`Result`] with an
//! [`AnalyticsError`]. Configuration loading returns `anyhow::Result` so file
//! and parse failures keep their context. Play counts that reference songs
//! outside the supplied catalog are skipped, not reported.
//!
//! ## Logging
//!
//! The crate logs through the `log` facade: `debug` on operation entry and
//! `trace` for skipped references. Install any logger to see it.

pub mod analytics;
pub mod config;
pub mod error;
pub mod model;

pub use analytics::MusicAnalytics;
pub use config::AnalyticsConfig;
pub use error::{AnalyticsError, Result};
pub use model::{Album, Genre, Playlist, SharedSong, Song, SongId, User, UserId};
