pub mod client;
pub mod error;
pub mod page;
pub mod pager;
pub mod transport;
pub mod types;

pub use client::TuneClient;
pub use error::TuneError;
pub use page::{Envelope, PageState};
pub use pager::{AsyncPaginatedIterator, Pager, TypedPager};
pub use transport::{HttpTransport, Transport};
pub use types::{
    AlbumRef, Artist, Context, Cursors, ExternalUrls, Followers, Image, PlayHistory, Playlist,
    PlaylistItem, Track, User,
};

#[cfg(feature = "mock")]
pub use pager::MockAsyncPaginatedIterator;
#[cfg(feature = "mock")]
pub use transport::MockTransport;

pub type Result<T> = std::result::Result<T, TuneError>;
