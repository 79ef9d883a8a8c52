//! Data types for music-service entities.
//!
//! This module contains the typed records that item payloads deserialize
//! into: artists, tracks, playlists, users, and the small capability
//! records (images, followers, cursors) composed into them. Each entity has
//! a fixed, known shape; fields that only appear on the "full" rendition of
//! an entity are optional rather than modeled as a separate type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Maps link type (e.g. `"spotify"`) to a web URL for an entity.
pub type ExternalUrls = HashMap<String, String>;

// ================================================================================================
// CAPABILITY RECORDS
// ================================================================================================

/// An image associated with an entity, in one of the server's sizes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    /// Source URL of the image
    pub url: String,
    /// Width in pixels, if the server reports one
    pub width: Option<u32>,
    /// Height in pixels, if the server reports one
    pub height: Option<u32>,
}

/// Follower count for an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Followers {
    /// Total number of followers
    pub total: u64,
}

/// Opaque cursor tokens from a cursor-based feed, in their wire shape.
///
/// The pagination engine exposes the raw cursors mapping unchanged; this
/// record is a typed convenience for the common `{after, before}` layout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cursors {
    /// Token for the item after the current window
    #[serde(default)]
    pub after: Option<String>,
    /// Token for the item before the current window
    #[serde(default)]
    pub before: Option<String>,
}

/// The playback context a play-history entry was scrobbled from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Context {
    /// URI of the context (playlist, album, artist)
    #[serde(default)]
    pub uri: Option<String>,
    /// Context kind as reported by the server
    #[serde(rename = "type", default)]
    pub context_type: Option<String>,
}

// ================================================================================================
// ARTISTS AND TRACKS
// ================================================================================================

/// Represents an artist.
///
/// `genres`, `popularity`, `followers`, and `images` are only present on
/// full artist payloads; simplified payloads (such as the artist list
/// embedded in a track) carry just the identifying fields.
///
/// # Examples
///
/// ```rust
/// use tunewire::Artist;
///
/// let artist: Artist = serde_json::from_str(
///     r#"{"id": "4Z8W4fKeB5YxbusRsdQVPb", "name": "Radiohead"}"#,
/// ).unwrap();
///
/// assert_eq!(artist.name, "Radiohead");
/// assert!(artist.genres.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artist {
    /// Service ID of the artist
    pub id: String,
    /// Name of the artist
    pub name: String,
    /// Service URI of the artist
    #[serde(default)]
    pub uri: Option<String>,
    /// Maps link type to web URL
    #[serde(default)]
    pub external_urls: ExternalUrls,
    /// Genres associated with the artist (full payloads only)
    #[serde(default)]
    pub genres: Option<Vec<String>>,
    /// Popularity indicator, 0 least popular to 100 most (full payloads only)
    #[serde(default)]
    pub popularity: Option<u32>,
    /// Follower count (full payloads only)
    #[serde(default)]
    pub followers: Option<Followers>,
    /// Associated images (full payloads only)
    #[serde(default)]
    pub images: Option<Vec<Image>>,
}

/// Minimal album record as embedded in track payloads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlbumRef {
    /// Service ID of the album; `None` for local files
    #[serde(default)]
    pub id: Option<String>,
    /// Name of the album
    pub name: String,
    /// Service URI of the album
    #[serde(default)]
    pub uri: Option<String>,
}

/// Represents a music track.
///
/// # Examples
///
/// ```rust
/// use tunewire::Track;
///
/// let track: Track = serde_json::from_str(r#"{
///     "id": "6LgJvl0Xdtc73RJ1mmpotq",
///     "name": "Paranoid Android",
///     "artists": [{"id": "4Z8W4fKeB5YxbusRsdQVPb", "name": "Radiohead"}],
///     "duration_ms": 387213,
///     "explicit": false
/// }"#).unwrap();
///
/// println!("{track}");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Service ID of the track; `None` for local files
    #[serde(default)]
    pub id: Option<String>,
    /// The track name/title
    pub name: String,
    /// Artists credited on the track
    #[serde(default)]
    pub artists: Vec<Artist>,
    /// Track length in milliseconds
    #[serde(default)]
    pub duration_ms: Option<u64>,
    /// Whether the track is flagged explicit
    #[serde(default)]
    pub explicit: bool,
    /// Service URI of the track
    #[serde(default)]
    pub uri: Option<String>,
    /// Position within its album (full payloads only)
    #[serde(default)]
    pub track_number: Option<u32>,
    /// Popularity indicator, 0 to 100 (full payloads only)
    #[serde(default)]
    pub popularity: Option<u32>,
    /// The album the track appears on, when the payload carries it
    #[serde(default)]
    pub album: Option<AlbumRef>,
}

/// One entry of a playlist's track listing.
///
/// Playlist track pages wrap each track with listing metadata; the wrapped
/// track is still an ordinary [`Track`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaylistItem {
    /// When the track was added to the playlist, if known
    #[serde(default)]
    pub added_at: Option<DateTime<Utc>>,
    /// The track itself
    pub track: Track,
}

/// One entry of the user's listening history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayHistory {
    /// The track that was played
    pub track: Track,
    /// When playback occurred
    pub played_at: DateTime<Utc>,
    /// The playback context, if the server reports one
    #[serde(default)]
    pub context: Option<Context>,
}

// ================================================================================================
// PLAYLISTS AND USERS
// ================================================================================================

/// Represents a playlist.
///
/// `description` and `followers` are only present on full playlist
/// payloads. The track listing is not embedded; fetch it through
/// [`TuneClient::playlist_tracks`](crate::TuneClient::playlist_tracks).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Playlist {
    /// Service ID of the playlist
    pub id: String,
    /// Name of the playlist
    pub name: String,
    /// Service URI of the playlist
    #[serde(default)]
    pub uri: Option<String>,
    /// Owner of the playlist
    #[serde(default)]
    pub owner: Option<User>,
    /// Whether the playlist is public; the server may decline to say
    #[serde(default)]
    pub public: Option<bool>,
    /// Whether the playlist is collaborative
    #[serde(default)]
    pub collaborative: bool,
    /// ID of the current playlist snapshot, used by mutation calls
    #[serde(default)]
    pub snapshot_id: Option<String>,
    /// Description set by the owner (full payloads only)
    #[serde(default)]
    pub description: Option<String>,
    /// Maps link type to web URL
    #[serde(default)]
    pub external_urls: ExternalUrls,
    /// Associated images
    #[serde(default)]
    pub images: Option<Vec<Image>>,
    /// Follower count (full payloads only)
    #[serde(default)]
    pub followers: Option<Followers>,
}

/// Represents a user.
///
/// `email` and `product` are only present on the authenticated user's own
/// profile, and only when the token grants access to them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Service ID of the user
    pub id: String,
    /// Display name chosen by the user, if set
    #[serde(default)]
    pub display_name: Option<String>,
    /// Service URI of the user
    #[serde(default)]
    pub uri: Option<String>,
    /// Maps link type to web URL
    #[serde(default)]
    pub external_urls: ExternalUrls,
    /// Follower count, when the payload carries it
    #[serde(default)]
    pub followers: Option<Followers>,
    /// Profile images, when the payload carries them
    #[serde(default)]
    pub images: Option<Vec<Image>>,
    /// Email address (own profile only)
    #[serde(default)]
    pub email: Option<String>,
    /// Subscription level (own profile only)
    #[serde(default)]
    pub product: Option<String>,
}

// ================================================================================================
// DISPLAY IMPLEMENTATIONS
// ================================================================================================

impl std::fmt::Display for Artist {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl std::fmt::Display for Track {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.artists.first() {
            Some(artist) => write!(f, "{} - {}", artist.name, self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

impl std::fmt::Display for Playlist {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl std::fmt::Display for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name.as_deref().unwrap_or(&self.id))
    }
}
