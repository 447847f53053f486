//! # api — typed client for the fieldlog backend
//!
//! Everything the views need to talk to the server lives here:
//!
//! | module | responsibility |
//! |---|---|
//! | [`models`] | wire types shared with the backend |
//! | [`error`] | error taxonomy and user-facing messages |
//! | [`session`] | authentication state machine over a [`store::TokenStore`] |
//! | [`client`] | the HTTP wrapper with bearer attach and 401 interception |
//! | [`filter`] | records filter state and the server/client query reconciler |
//! | [`export`] | record export and download filename recovery |
//! | [`upload`] | record image validation and multipart upload |

pub mod client;
pub mod error;
pub mod export;
pub mod filter;
pub mod models;
pub mod session;
pub mod upload;

pub use client::{ApiClient, ListParams, RecordPage, base_url, DEFAULT_API_BASE};
pub use error::{ApiError, ApiResult};
pub use export::{ExportFormat, ExportPayload};
pub use filter::{RecordFilters, RecordListState};
pub use session::{AuthPhase, Session};

/// Client wired to the platform's token store.
pub type AppClient = ApiClient<store::PlatformTokenStore>;

/// Build a client against the configured base URL with a fresh session.
/// The caller is expected to follow up with [`Session::restore`] to pick up
/// any persisted token.
pub fn app_client() -> AppClient {
    let session = Session::new(store::platform_store());
    ApiClient::new(base_url(), session)
}
