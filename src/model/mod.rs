//! Catalog entities: songs, albums, playlists and users.

pub mod album;
pub mod genre;
pub mod ids;
pub mod playlist;
pub mod song;
pub mod user;

pub use album::Album;
pub use genre::Genre;
pub use ids::{AlbumId, PlaylistId, SongId, UserId};
pub use playlist::Playlist;
pub use song::{SharedSong, Song};
pub use user::User;
