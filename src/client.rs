//! High-level client for the music-service Web API.

use crate::pager::{Pager, TypedPager};
use crate::transport::{HttpTransport, Transport};
use crate::types::{Artist, PlayHistory, Playlist, PlaylistItem, Track, User};
use crate::Result;

use async_trait::async_trait;
use http_client::HttpClient;
use http_types::Method;
use serde::Deserialize;
use serde_json::{json, Value};

const DEFAULT_BASE_URL: &str = "https://api.spotify.com/v1";

/// Client for fetching typed entities and traversing paginated collections.
///
/// One-shot lookups (`me`, `artist`, `playlist`, ...) return entity records
/// directly; collection endpoints return pagers that pull items lazily and
/// follow server-side pagination transparently.
///
/// Cloning is cheap; clones share the underlying HTTP client. The client
/// itself implements [`Transport`], which is how the pagers it hands out
/// fetch their follow-up pages.
///
/// # Examples
///
/// ```rust,no_run
/// use tunewire::{AsyncPaginatedIterator, TuneClient};
///
/// # tokio_test::block_on(async {
/// let client = TuneClient::new(
///     Box::new(http_client::native::NativeClient::new()),
///     "access-token".to_string(),
/// );
///
/// let mut results = client.search_tracks("paranoid android", 20).await?;
/// while let Some(track) = results.next().await? {
///     println!("{track}");
/// }
/// # Ok::<(), tunewire::TuneError>(())
/// # });
/// ```
#[derive(Clone)]
pub struct TuneClient {
    transport: HttpTransport,
    base_url: String,
}

#[derive(Deserialize)]
struct TopTracksResponse {
    tracks: Vec<Track>,
}

#[derive(Deserialize)]
struct RecentlyPlayedResponse {
    items: Vec<PlayHistory>,
}

#[derive(Deserialize)]
struct SnapshotResponse {
    snapshot_id: String,
}

impl TuneClient {
    /// Create a new [`TuneClient`] against the default API endpoint.
    ///
    /// # Arguments
    ///
    /// * `client` - Any HTTP client implementation that implements [`HttpClient`]
    /// * `token` - OAuth bearer token for the authenticated user
    pub fn new(client: Box<dyn HttpClient + Send + Sync>, token: String) -> Self {
        Self::with_base_url(client, token, DEFAULT_BASE_URL.to_string())
    }

    /// Create a new [`TuneClient`] with a custom base URL.
    ///
    /// This is useful for testing against a local stand-in for the service.
    pub fn with_base_url(
        client: Box<dyn HttpClient + Send + Sync>,
        token: String,
        base_url: String,
    ) -> Self {
        Self {
            transport: HttpTransport::new(client, token),
            base_url,
        }
    }

    /// Replace the bearer token used for subsequent requests.
    ///
    /// Token refresh itself happens outside this crate; call this after
    /// obtaining a fresh token.
    pub fn set_token(&mut self, token: String) {
        self.transport.set_token(token);
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn get(&self, path: &str) -> Result<Value> {
        self.transport.fetch(&self.url(path)).await
    }

    async fn send_json(&self, method: Method, path: &str, body: Value) -> Result<Value> {
        let mut request = self.transport.request(method, &self.url(path))?;
        request.insert_header("Content-Type", "application/json");
        request.set_body(body.to_string());
        self.transport.execute(request).await
    }

    // ============================================================================================
    // ONE-SHOT LOOKUPS
    // ============================================================================================

    /// Fetch the authenticated user's profile.
    pub async fn me(&self) -> Result<User> {
        Ok(serde_json::from_value(self.get("/me").await?)?)
    }

    /// Fetch a user's public profile.
    pub async fn user(&self, user_id: &str) -> Result<User> {
        let data = self.get(&format!("/users/{user_id}")).await?;
        Ok(serde_json::from_value(data)?)
    }

    /// Fetch an artist.
    pub async fn artist(&self, artist_id: &str) -> Result<Artist> {
        let data = self.get(&format!("/artists/{artist_id}")).await?;
        Ok(serde_json::from_value(data)?)
    }

    /// Fetch a track.
    pub async fn track(&self, track_id: &str) -> Result<Track> {
        let data = self.get(&format!("/tracks/{track_id}")).await?;
        Ok(serde_json::from_value(data)?)
    }

    /// Fetch a playlist.
    ///
    /// The playlist's track listing is paginated separately; use
    /// [`playlist_tracks`](Self::playlist_tracks) to traverse it.
    pub async fn playlist(&self, playlist_id: &str) -> Result<Playlist> {
        let data = self.get(&format!("/playlists/{playlist_id}")).await?;
        Ok(serde_json::from_value(data)?)
    }

    /// Fetch an artist's top tracks for a market.
    ///
    /// The service returns at most 10 tracks; this endpoint is not
    /// paginated.
    pub async fn artist_top_tracks(&self, artist_id: &str, market: &str) -> Result<Vec<Track>> {
        let data = self
            .get(&format!(
                "/artists/{artist_id}/top-tracks?market={}",
                urlencoding::encode(market)
            ))
            .await?;
        let response: TopTracksResponse = serde_json::from_value(data)?;
        Ok(response.tracks)
    }

    /// Fetch the user's most recently played tracks.
    ///
    /// This feed is cursor-based on the wire but bounded to the service's
    /// retention window, so it is exposed as a single bounded fetch rather
    /// than a pager.
    pub async fn recently_played(&self, limit: u64) -> Result<Vec<PlayHistory>> {
        let data = self
            .get(&format!("/me/player/recently-played?limit={limit}"))
            .await?;
        let response: RecentlyPlayedResponse = serde_json::from_value(data)?;
        Ok(response.items)
    }

    // ============================================================================================
    // PLAYLIST MUTATION
    // ============================================================================================

    /// Create a playlist owned by `user_id`.
    pub async fn create_playlist(
        &self,
        user_id: &str,
        name: &str,
        description: Option<&str>,
        public: bool,
        collaborative: bool,
    ) -> Result<Playlist> {
        let mut body = json!({
            "name": name,
            "public": public,
            "collaborative": collaborative,
        });
        if let Some(description) = description {
            body["description"] = json!(description);
        }

        let data = self
            .send_json(Method::Post, &format!("/users/{user_id}/playlists"), body)
            .await?;
        Ok(serde_json::from_value(data)?)
    }

    /// Edit a playlist's details.
    ///
    /// Only the fields given as `Some` are sent; passing all `None` is a
    /// no-op that performs no request.
    pub async fn edit_playlist(
        &self,
        playlist_id: &str,
        name: Option<&str>,
        description: Option<&str>,
        public: Option<bool>,
        collaborative: Option<bool>,
    ) -> Result<()> {
        let mut body = serde_json::Map::new();
        if let Some(name) = name {
            body.insert("name".to_string(), json!(name));
        }
        if let Some(description) = description {
            body.insert("description".to_string(), json!(description));
        }
        if let Some(public) = public {
            body.insert("public".to_string(), json!(public));
        }
        if let Some(collaborative) = collaborative {
            body.insert("collaborative".to_string(), json!(collaborative));
        }
        if body.is_empty() {
            return Ok(());
        }

        self.send_json(
            Method::Put,
            &format!("/playlists/{playlist_id}"),
            Value::Object(body),
        )
        .await?;
        Ok(())
    }

    /// Add tracks to a playlist, returning the new snapshot ID.
    ///
    /// # Arguments
    ///
    /// * `playlist_id` - Playlist to modify
    /// * `uris` - Track URIs to insert
    /// * `position` - Index to insert at; appends when `None`
    pub async fn playlist_add_tracks(
        &self,
        playlist_id: &str,
        uris: &[&str],
        position: Option<u64>,
    ) -> Result<String> {
        let mut body = json!({ "uris": uris });
        if let Some(position) = position {
            body["position"] = json!(position);
        }

        let data = self
            .send_json(Method::Post, &format!("/playlists/{playlist_id}/tracks"), body)
            .await?;
        let response: SnapshotResponse = serde_json::from_value(data)?;
        Ok(response.snapshot_id)
    }

    /// Remove all occurrences of the given tracks from a playlist,
    /// returning the new snapshot ID.
    pub async fn playlist_remove_tracks(
        &self,
        playlist_id: &str,
        uris: &[&str],
    ) -> Result<String> {
        let tracks: Vec<Value> = uris.iter().map(|uri| json!({ "uri": uri })).collect();
        let body = json!({ "tracks": tracks });

        let data = self
            .send_json(Method::Delete, &format!("/playlists/{playlist_id}/tracks"), body)
            .await?;
        let response: SnapshotResponse = serde_json::from_value(data)?;
        Ok(response.snapshot_id)
    }

    // ============================================================================================
    // PAGINATED COLLECTIONS
    // ============================================================================================

    /// Search for tracks, yielding at most `limit` results.
    ///
    /// The search response nests its page under the `"tracks"` key; the
    /// returned pager unwraps that envelope and follows pagination past the
    /// first page when the cap allows.
    pub async fn search_tracks(
        &self,
        query: &str,
        limit: u64,
    ) -> Result<TypedPager<Self, Track>> {
        self.search_pager("track", "tracks", query, limit).await
    }

    /// Search for artists, yielding at most `limit` results.
    pub async fn search_artists(
        &self,
        query: &str,
        limit: u64,
    ) -> Result<TypedPager<Self, Artist>> {
        self.search_pager("artist", "artists", query, limit).await
    }

    /// Search for playlists, yielding at most `limit` results.
    pub async fn search_playlists(
        &self,
        query: &str,
        limit: u64,
    ) -> Result<TypedPager<Self, Playlist>> {
        self.search_pager("playlist", "playlists", query, limit).await
    }

    async fn search_pager<T: serde::de::DeserializeOwned>(
        &self,
        kind: &str,
        result_key: &str,
        query: &str,
        limit: u64,
    ) -> Result<TypedPager<Self, T>> {
        let data = self
            .get(&format!(
                "/search?q={}&type={kind}&limit={limit}",
                urlencoding::encode(query)
            ))
            .await?;
        let pager = Pager::keyed(self.clone(), &data, result_key, Some(limit))?;
        Ok(TypedPager::new(pager))
    }

    /// Iterate over a playlist's track listing.
    ///
    /// # Arguments
    ///
    /// * `playlist_id` - Playlist to read
    /// * `max_items` - Optional cap on items to yield
    pub async fn playlist_tracks(
        &self,
        playlist_id: &str,
        max_items: Option<u64>,
    ) -> Result<TypedPager<Self, PlaylistItem>> {
        let data = self.get(&format!("/playlists/{playlist_id}/tracks")).await?;
        let pager = Pager::new(self.clone(), &data, max_items)?;
        Ok(TypedPager::new(pager))
    }

    /// Iterate over the authenticated user's playlists.
    pub async fn my_playlists(
        &self,
        max_items: Option<u64>,
    ) -> Result<TypedPager<Self, Playlist>> {
        let data = self.get("/me/playlists").await?;
        let pager = Pager::new(self.clone(), &data, max_items)?;
        Ok(TypedPager::new(pager))
    }

    /// Iterate over a user's public playlists.
    pub async fn user_playlists(
        &self,
        user_id: &str,
        max_items: Option<u64>,
    ) -> Result<TypedPager<Self, Playlist>> {
        let data = self.get(&format!("/users/{user_id}/playlists")).await?;
        let pager = Pager::new(self.clone(), &data, max_items)?;
        Ok(TypedPager::new(pager))
    }

    /// Iterate over the authenticated user's top tracks.
    pub async fn my_top_tracks(
        &self,
        max_items: Option<u64>,
    ) -> Result<TypedPager<Self, Track>> {
        let data = self.get("/me/top/tracks").await?;
        let pager = Pager::new(self.clone(), &data, max_items)?;
        Ok(TypedPager::new(pager))
    }

    /// Iterate over the artists the authenticated user follows.
    ///
    /// This feed is cursor-based: the pager reports no offset, exposes the
    /// server's cursor tokens via
    /// [`TypedPager::cursors`](crate::TypedPager::cursors), and still
    /// advances through the generic `next` URL.
    pub async fn followed_artists(
        &self,
        max_items: Option<u64>,
    ) -> Result<TypedPager<Self, Artist>> {
        let data = self.get("/me/following?type=artist").await?;
        let pager = Pager::cursor_based(self.clone(), &data, "artists", max_items)?;
        Ok(TypedPager::new(pager))
    }
}

#[async_trait(?Send)]
impl Transport for TuneClient {
    async fn fetch(&self, url: &str) -> Result<Value> {
        self.transport.fetch(url).await
    }
}
