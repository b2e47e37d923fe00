//! Typed client for the stampbid API: one method per endpoint, an explicit
//! session object instead of ambient auth state, and the browse-view
//! filtering that runs over the full fetched listing set.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;

use crate::models::{Listing, ListingWithBids, PublicUser};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// Server rejected the request; carries the server's message.
    #[error("{0}")]
    Api(String),
    /// Rejected before reaching the server.
    #[error("{0}")]
    InvalidBid(String),
}

#[derive(Debug, Deserialize)]
struct UserEnvelope {
    user: PublicUser,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    error: Option<String>,
}

pub struct ApiClient {
    base: String,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            http: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base.trim_end_matches('/'), path)
    }

    async fn check(resp: reqwest::Response) -> Result<reqwest::Response, ClientError> {
        if resp.status().is_success() {
            return Ok(resp);
        }
        let status = resp.status();
        let body: ErrorBody = resp.json().await.unwrap_or_default();
        let message = body
            .message
            .or(body.error)
            .unwrap_or_else(|| status.to_string());
        Err(ClientError::Api(message))
    }

    pub async fn signup(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<PublicUser, ClientError> {
        let resp = self
            .http
            .post(self.url("/signup"))
            .json(&json!({ "name": name, "email": email, "password": password }))
            .send()
            .await?;
        let envelope: UserEnvelope = Self::check(resp).await?.json().await?;
        Ok(envelope.user)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<PublicUser, ClientError> {
        let resp = self
            .http
            .post(self.url("/login"))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;
        let envelope: UserEnvelope = Self::check(resp).await?.json().await?;
        Ok(envelope.user)
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn post_postal(
        &self,
        user_id: &str,
        title: &str,
        date: &str,
        city: &str,
        state: &str,
        description: &str,
        author: &str,
        image: &str,
        bid_amount: f64,
    ) -> Result<(), ClientError> {
        let resp = self
            .http
            .post(self.url("/post-postal"))
            .json(&json!({
                "title": title,
                "date": date,
                "city": city,
                "state": state,
                "description": description,
                "author": author,
                "userId": user_id,
                "image": image,
                "bidAmount": bid_amount,
            }))
            .send()
            .await?;
        Self::check(resp).await?;
        Ok(())
    }

    /// The caller's own listings.
    pub async fn my_posts(&self, user_id: &str) -> Result<Vec<Listing>, ClientError> {
        let resp = self
            .http
            .get(self.url(&format!("/posts/{user_id}")))
            .send()
            .await?;
        Ok(Self::check(resp).await?.json().await?)
    }

    /// Everyone else's open listings, annotated with the caller's own bid.
    pub async fn open_posts(&self, user_id: &str) -> Result<Vec<ListingWithBids>, ClientError> {
        let resp = self
            .http
            .get(self.url(&format!("/all-posts/{user_id}")))
            .send()
            .await?;
        Ok(Self::check(resp).await?.json().await?)
    }

    pub async fn place_bid(
        &self,
        post_id: &str,
        user_id: &str,
        bid_amount: f64,
    ) -> Result<(), ClientError> {
        let resp = self
            .http
            .post(self.url("/place-bid"))
            .json(&json!({
                "postId": post_id,
                "bidAmount": bid_amount,
                "userId": user_id,
            }))
            .send()
            .await?;
        Self::check(resp).await?;
        Ok(())
    }

    pub async fn complete_bidding(&self, post_id: &str) -> Result<(), ClientError> {
        let resp = self
            .http
            .post(self.url("/complete-bidding"))
            .json(&json!({ "postId": post_id }))
            .send()
            .await?;
        Self::check(resp).await?;
        Ok(())
    }

    /// Listings the caller has bid on, with full bid history.
    pub async fn bid_posts(&self, user_id: &str) -> Result<Vec<ListingWithBids>, ClientError> {
        let resp = self
            .http
            .get(self.url(&format!("/bidPosts/{user_id}")))
            .send()
            .await?;
        Ok(Self::check(resp).await?.json().await?)
    }
}

/// Well-known slot the authenticated user is persisted under.
pub const SESSION_KEY: &str = "user";

/// Persisted key/value slot the session lives in. Durable storage is the
/// host application's concern; [`MemorySessionStore`] covers tests and
/// single-process use.
pub trait SessionStore {
    fn load(&self, key: &str) -> Option<String>;
    fn save(&self, key: &str, value: &str);
    fn clear(&self, key: &str);
}

impl<T: SessionStore + ?Sized> SessionStore for &T {
    fn load(&self, key: &str) -> Option<String> {
        (**self).load(key)
    }

    fn save(&self, key: &str, value: &str) {
        (**self).save(key, value)
    }

    fn clear(&self, key: &str) {
        (**self).clear(key)
    }
}

#[derive(Default)]
pub struct MemorySessionStore {
    slots: Mutex<HashMap<String, String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self, key: &str) -> Option<String> {
        self.slots.lock().unwrap().get(key).cloned()
    }

    fn save(&self, key: &str, value: &str) {
        self.slots
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
    }

    fn clear(&self, key: &str) {
        self.slots.lock().unwrap().remove(key);
    }
}

/// Who is logged in. Initialized from the store, written through on login,
/// cleared on logout.
pub struct Session<S: SessionStore> {
    store: S,
    user: Option<PublicUser>,
}

impl<S: SessionStore> Session<S> {
    pub fn init(store: S) -> Self {
        let user = store
            .load(SESSION_KEY)
            .and_then(|raw| serde_json::from_str(&raw).ok());
        Self { store, user }
    }

    pub fn user(&self) -> Option<&PublicUser> {
        self.user.as_ref()
    }

    pub fn login(&mut self, user: PublicUser) {
        if let Ok(raw) = serde_json::to_string(&user) {
            self.store.save(SESSION_KEY, &raw);
        }
        self.user = Some(user);
    }

    pub fn logout(&mut self) {
        self.store.clear(SESSION_KEY);
        self.user = None;
    }
}

/// Browse-view filter, applied client-side over the full fetched set.
/// Empty fields match everything.
#[derive(Debug, Clone, Default)]
pub struct ListingFilter {
    /// Case-insensitive substring match on title or description.
    pub search: String,
    pub city: String,
    pub state: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// Keep only listings the caller has a bid on.
    pub only_my_bids: bool,
}

fn parse_listing_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

impl ListingFilter {
    pub fn matches(&self, post: &ListingWithBids) -> bool {
        let search = self.search.to_lowercase();
        let matches_search = search.is_empty()
            || post.title.to_lowercase().contains(&search)
            || post.post_data.description.to_lowercase().contains(&search);

        let matches_city = self.city.is_empty()
            || post
                .post_data
                .location_info
                .city
                .eq_ignore_ascii_case(&self.city);
        let matches_state = self.state.is_empty()
            || post
                .post_data
                .location_info
                .state
                .eq_ignore_ascii_case(&self.state);

        // A date bound only matches listings whose free-text date parses.
        let matches_date = if self.start_date.is_none() && self.end_date.is_none() {
            true
        } else {
            match parse_listing_date(&post.post_data.date) {
                Some(date) => {
                    self.start_date.map_or(true, |start| date >= start)
                        && self.end_date.map_or(true, |end| date <= end)
                }
                None => false,
            }
        };

        let matches_my_bid = !self.only_my_bids || post.bid_data.user_bid.is_some();

        matches_search && matches_city && matches_state && matches_date && matches_my_bid
    }

    pub fn apply<'a>(&self, posts: &'a [ListingWithBids]) -> Vec<&'a ListingWithBids> {
        posts.iter().filter(|p| self.matches(p)).collect()
    }
}

/// Pre-flight check before submitting a bid; the server re-validates.
pub fn validate_bid(post: &ListingWithBids, amount: f64) -> Result<(), ClientError> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(ClientError::InvalidBid("Please enter a bid amount.".into()));
    }
    if amount <= post.post_data.bid_amount {
        return Err(ClientError::InvalidBid(
            "Bid amount must be greater than the current bid.".into(),
        ));
    }
    Ok(())
}
