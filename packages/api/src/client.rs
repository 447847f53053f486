//! # ApiClient — the one HTTP wrapper every view goes through
//!
//! Wraps `reqwest` with the two cross-cutting session behaviors:
//!
//! - every outgoing request is annotated with the current bearer token,
//!   read from the injected [`Session`] at dispatch time (token rotation is
//!   observed by calls built after the rotation, with no per-call wiring);
//! - every inbound response passes one checkpoint: a 401 forces the session
//!   back to unauthenticated as a side effect, regardless of which view
//!   issued the call.
//!
//! All other error responses are mapped to [`ApiError::Api`] carrying the
//! backend's `detail` message when present. Nothing here retries.

use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use store::TokenStore;

use crate::error::{ApiError, ApiResult, ErrorBody};
use crate::filter::RecordFilters;
use crate::models::{
    Field, FieldPayload, LoginResponse, OverviewStats, Page, Participant, ParticipantPayload,
    PasswordChange, ProfilePayload, RecentActivity, Record, RecordImage, RecordPayload, Tag,
    TagCategory, TagPayload, User, UserPayload,
};
use crate::session::Session;

/// Base path used when `FIELDLOG_API_URL` is not set at build time.
pub const DEFAULT_API_BASE: &str = "http://localhost:8000/api/v1";

/// The configured API base URL.
pub fn base_url() -> &'static str {
    option_env!("FIELDLOG_API_URL").unwrap_or(DEFAULT_API_BASE)
}

/// Plain list query for the simple resource views.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListParams {
    pub skip: u64,
    pub limit: u64,
    pub search: Option<String>,
}

impl ListParams {
    pub fn page(page: u32, page_size: u32) -> Self {
        Self {
            skip: page as u64 * page_size as u64,
            limit: page_size as u64,
            search: None,
        }
    }

    pub fn with_search(mut self, search: &str) -> Self {
        if !search.is_empty() {
            self.search = Some(search.to_string());
        }
        self
    }

    /// Fetch-everything variant used to populate pickers.
    pub fn all() -> Self {
        Self {
            skip: 0,
            limit: 1000,
            search: None,
        }
    }

    fn to_query(&self) -> Vec<(String, String)> {
        let mut params = vec![
            ("skip".to_string(), self.skip.to_string()),
            ("limit".to_string(), self.limit.to_string()),
        ];
        if let Some(search) = &self.search {
            params.push(("search".to_string(), search.clone()));
        }
        params
    }
}

/// A records page after reconciliation: the rows to show and the corrected
/// total.
#[derive(Debug, Clone)]
pub struct RecordPage {
    pub items: Vec<Record>,
    pub total: u64,
}

pub struct ApiClient<S: TokenStore> {
    http: reqwest::Client,
    base: String,
    session: Session<S>,
}

impl<S: TokenStore + Clone> Clone for ApiClient<S> {
    fn clone(&self) -> Self {
        Self {
            http: self.http.clone(),
            base: self.base.clone(),
            session: self.session.clone(),
        }
    }
}

impl<S: TokenStore> ApiClient<S> {
    pub fn new(base: impl Into<String>, session: Session<S>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base: base.into(),
            session,
        }
    }

    pub fn session(&self) -> &Session<S> {
        &self.session
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let mut builder = self.http.request(method, format!("{}{}", self.base, path));
        // Token is read here, at dispatch time, not cached at login time.
        if let Some(token) = self.session.token() {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    /// Send a request and run the response through the 401 checkpoint.
    async fn send(&self, builder: RequestBuilder) -> ApiResult<Response> {
        let response = builder.send().await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            // Forced logout: any 401, from any call site, degrades the whole
            // session rather than leaving it to individual views.
            self.session.invalidate().await;
            return Err(ApiError::Unauthorized);
        }

        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status().as_u16();
        let detail = response
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(|body| body.detail)
            .unwrap_or_else(|| "Request failed".to_string());
        Err(ApiError::Api { status, detail })
    }

    async fn decode<T: DeserializeOwned>(&self, response: Response) -> ApiResult<T> {
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> ApiResult<T> {
        let response = self.send(self.request(Method::GET, path).query(query)).await?;
        self.decode(response).await
    }

    async fn post_json<B: serde::Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        let response = self.send(self.request(Method::POST, path).json(body)).await?;
        self.decode(response).await
    }

    async fn put_json<B: serde::Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        let response = self.send(self.request(Method::PUT, path).json(body)).await?;
        self.decode(response).await
    }

    async fn delete(&self, path: &str) -> ApiResult<()> {
        self.send(self.request(Method::DELETE, path)).await?;
        Ok(())
    }

    pub(crate) async fn send_request(&self, builder: RequestBuilder) -> ApiResult<Response> {
        self.send(builder).await
    }

    pub(crate) fn build_request(&self, method: Method, path: &str) -> RequestBuilder {
        self.request(method, path)
    }

    pub(crate) async fn decode_response<T: DeserializeOwned>(
        &self,
        response: Response,
    ) -> ApiResult<T> {
        self.decode(response).await
    }

    // ----- auth ---------------------------------------------------------

    /// Exchange credentials for a token, then fetch the profile with it.
    ///
    /// The token is persisted only once both steps succeed; a failure at
    /// either step leaves the session exactly as it was.
    pub async fn login(&self, username: &str, password: &str) -> ApiResult<User> {
        self.session.begin_login();

        let result = self.login_inner(username, password).await;
        match result {
            Ok((token, user)) => {
                self.session.complete_login(token, user.clone()).await;
                Ok(user)
            }
            Err(e) => {
                self.session.abort_login();
                Err(e)
            }
        }
    }

    async fn login_inner(&self, username: &str, password: &str) -> ApiResult<(String, User)> {
        let form = [("username", username), ("password", password)];
        let response = self
            .send(self.request(Method::POST, "/auth/login").form(&form))
            .await?;
        let login: LoginResponse = self.decode(response).await?;

        // Fetch the profile with the fresh token explicitly; the session
        // has not adopted it yet.
        let response = self
            .send(
                self.http
                    .get(format!("{}{}", self.base, "/auth/me"))
                    .bearer_auth(&login.access_token),
            )
            .await?;
        let user: User = self.decode(response).await?;
        Ok((login.access_token, user))
    }

    pub async fn me(&self) -> ApiResult<User> {
        let response = self.send(self.request(Method::GET, "/auth/me")).await?;
        self.decode(response).await
    }

    /// Silently validate the current token by fetching the profile.
    ///
    /// Any failure — network or rejection — clears the persisted token and
    /// resets to unauthenticated (fail closed, no retry). The result is
    /// discarded when the token changed while the fetch was in flight.
    pub async fn revalidate(&self) -> bool {
        if self.session.token().is_none() {
            return false;
        }
        let ticket = self.session.validation_ticket();
        match self.me().await {
            Ok(user) => self.session.apply_profile(ticket, user),
            Err(ApiError::Unauthorized) => {
                // The 401 checkpoint already invalidated the session.
                false
            }
            Err(e) => {
                tracing::warn!("token revalidation failed: {e}");
                self.session.fail_validation(ticket).await;
                false
            }
        }
    }

    pub async fn logout(&self) {
        self.session.logout().await;
    }

    // ----- records ------------------------------------------------------

    /// List records for the given filter state, applying the reconciler's
    /// client-side post-filter and total correction.
    pub async fn list_records(
        &self,
        filters: &RecordFilters,
        page: u32,
        page_size: u32,
    ) -> ApiResult<RecordPage> {
        let query = filters.reconcile(page, page_size);
        let result: Page<Record> = self.get_json("/records/", &query.params).await?;
        let (items, total) = query.apply(result);
        Ok(RecordPage { items, total })
    }

    pub async fn get_record(&self, id: i64) -> ApiResult<Record> {
        self.get_json(&format!("/records/{id}"), &[]).await
    }

    pub async fn create_record(&self, payload: &RecordPayload) -> ApiResult<Record> {
        self.post_json("/records/", payload).await
    }

    pub async fn update_record(&self, id: i64, payload: &RecordPayload) -> ApiResult<Record> {
        self.put_json(&format!("/records/{id}"), payload).await
    }

    pub async fn delete_record(&self, id: i64) -> ApiResult<()> {
        self.delete(&format!("/records/{id}")).await
    }

    pub async fn record_images(&self, record_id: i64) -> ApiResult<Vec<RecordImage>> {
        let page: Page<RecordImage> = self
            .get_json(&format!("/records/{record_id}/images"), &[])
            .await?;
        Ok(page.items)
    }

    // ----- participants -------------------------------------------------

    pub async fn list_participants(&self, params: &ListParams) -> ApiResult<Page<Participant>> {
        self.get_json("/participants/", &params.to_query()).await
    }

    pub async fn create_participant(&self, payload: &ParticipantPayload) -> ApiResult<Participant> {
        self.post_json("/participants/", payload).await
    }

    pub async fn update_participant(
        &self,
        id: i64,
        payload: &ParticipantPayload,
    ) -> ApiResult<Participant> {
        self.put_json(&format!("/participants/{id}"), payload).await
    }

    pub async fn delete_participant(&self, id: i64) -> ApiResult<()> {
        self.delete(&format!("/participants/{id}")).await
    }

    // ----- fields ---------------------------------------------------------

    pub async fn list_fields(&self, params: &ListParams) -> ApiResult<Page<Field>> {
        self.get_json("/fields/", &params.to_query()).await
    }

    pub async fn create_field(&self, payload: &FieldPayload) -> ApiResult<Field> {
        self.post_json("/fields/", payload).await
    }

    pub async fn update_field(&self, id: i64, payload: &FieldPayload) -> ApiResult<Field> {
        self.put_json(&format!("/fields/{id}"), payload).await
    }

    pub async fn delete_field(&self, id: i64) -> ApiResult<()> {
        self.delete(&format!("/fields/{id}")).await
    }

    // ----- tags -----------------------------------------------------------

    pub async fn list_tags(&self, params: &ListParams) -> ApiResult<Page<Tag>> {
        self.get_json("/tags/", &params.to_query()).await
    }

    pub async fn list_tag_categories(&self) -> ApiResult<Vec<TagCategory>> {
        let page: Page<TagCategory> = self.get_json("/tags/categories", &[]).await?;
        Ok(page.items)
    }

    pub async fn create_tag(&self, payload: &TagPayload) -> ApiResult<Tag> {
        self.post_json("/tags/", payload).await
    }

    pub async fn update_tag(&self, id: i64, payload: &TagPayload) -> ApiResult<Tag> {
        self.put_json(&format!("/tags/{id}"), payload).await
    }

    pub async fn delete_tag(&self, id: i64) -> ApiResult<()> {
        self.delete(&format!("/tags/{id}")).await
    }

    // ----- users ----------------------------------------------------------

    pub async fn list_users(&self, params: &ListParams) -> ApiResult<Page<User>> {
        self.get_json("/users/", &params.to_query()).await
    }

    pub async fn create_user(&self, payload: &UserPayload) -> ApiResult<User> {
        self.post_json("/users/", payload).await
    }

    pub async fn update_user(&self, id: i64, payload: &UserPayload) -> ApiResult<User> {
        self.put_json(&format!("/users/{id}"), payload).await
    }

    pub async fn delete_user(&self, id: i64) -> ApiResult<()> {
        self.delete(&format!("/users/{id}")).await
    }

    /// Update the signed-in user's own profile. Same endpoint as the admin
    /// user update, restricted by the backend to the caller's own id.
    pub async fn update_profile(&self, id: i64, payload: &ProfilePayload) -> ApiResult<User> {
        self.put_json(&format!("/users/{id}"), payload).await
    }

    /// Change the signed-in user's password; the backend verifies the old
    /// one before accepting the new.
    pub async fn change_password(&self, id: i64, change: &PasswordChange) -> ApiResult<()> {
        self.send(
            self.request(Method::PUT, &format!("/users/{id}/password"))
                .json(change),
        )
        .await?;
        Ok(())
    }

    // ----- stats ----------------------------------------------------------

    pub async fn stats_overview(&self) -> ApiResult<OverviewStats> {
        self.get_json("/stats/overview", &[]).await
    }

    pub async fn recent_activities(&self) -> ApiResult<Vec<RecentActivity>> {
        let page: Page<RecentActivity> = self.get_json("/stats/recent-activities", &[]).await?;
        Ok(page.items)
    }
}
