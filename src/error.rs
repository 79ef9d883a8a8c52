use thiserror::Error;

/// Error types for music-service Web API operations.
///
/// This enum covers all possible errors that can occur when talking to the
/// service, including network issues, authentication failures, malformed page
/// payloads, and service-side error envelopes.
///
/// # Error Handling Examples
///
/// ```rust,no_run
/// use tunewire::{TuneClient, TuneError};
///
/// # tokio_test::block_on(async {
/// let client = TuneClient::new(
///     Box::new(http_client::native::NativeClient::new()),
///     "access-token".to_string(),
/// );
///
/// match client.artist("0OdUWJ0sBjDrqHygGUXeCF").await {
///     Ok(artist) => println!("Found {artist}"),
///     Err(TuneError::Auth(msg)) => eprintln!("Token rejected: {msg}"),
///     Err(TuneError::Api { status, message }) => {
///         eprintln!("Service error {status}: {message}");
///     }
///     Err(TuneError::Http(msg)) => eprintln!("Network error: {msg}"),
///     Err(e) => eprintln!("Other error: {e}"),
/// }
/// # });
/// ```
#[derive(Error, Debug)]
pub enum TuneError {
    /// HTTP/network related errors.
    ///
    /// This includes connection failures, timeouts, DNS errors, and other
    /// low-level transport issues. A pager hit by this error during a
    /// next-page fetch is left untouched, so calling its step operation
    /// again re-issues the same fetch.
    #[error("HTTP error: {0}")]
    Http(String),

    /// Authentication failures.
    ///
    /// Returned when the service rejects the bearer token (401/403).
    /// Token acquisition and refresh are the caller's responsibility.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// A page object is missing a required field or carries an unusable one.
    ///
    /// Raised when page decoding runs, at pager construction or next-page
    /// refresh time. Covers missing keys (`total`, `next`, `items`, `limit`,
    /// `offset`), a zero page limit, a missing envelope key for keyed
    /// responses, and an item index past the served array.
    #[error("Malformed page: {0}")]
    MalformedPage(String),

    /// Failed to decode a JSON body or deserialize an item payload.
    #[error("JSON decode error: {0}")]
    Json(#[from] serde_json::Error),

    /// Service-side error envelope.
    ///
    /// The service reports failures as `{"error": {"status", "message"}}`;
    /// this variant carries both fields through unchanged.
    #[error("API error {status}: {message}")]
    Api {
        /// HTTP status code reported in the error envelope
        status: u16,
        /// Human-readable message from the service
        message: String,
    },
}
