//! The document collections (users, postals, bid transactions) behind a
//! trait so services can run against MongoDB or an in-memory store.

pub mod memory;
pub mod mongo;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Bid, Listing, User};

pub use memory::MemoryStore;
pub use mongo::MongoStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] mongodb::error::Error),
    #[error("malformed document: {0}")]
    Malformed(String),
}

/// Point lookups and field-equality scans over the three collections.
/// No transactions. Implementations MUST return multi-document results in
/// insertion order: "most recent" everywhere in this system is defined as
/// reverse insertion order, not a timestamp.
#[async_trait]
pub trait Store: Send + Sync {
    async fn insert_user(&self, user: &User) -> Result<(), StoreError>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
    async fn find_user_by_id(&self, user_id: &str) -> Result<Option<User>, StoreError>;

    async fn insert_listing(&self, listing: &Listing) -> Result<(), StoreError>;
    async fn find_listing(&self, post_id: &str) -> Result<Option<Listing>, StoreError>;
    async fn listings_by_owner(&self, user_id: &str) -> Result<Vec<Listing>, StoreError>;
    /// Listings not owned by `user_id` whose bidding is still open.
    async fn open_listings_excluding_owner(
        &self,
        user_id: &str,
    ) -> Result<Vec<Listing>, StoreError>;
    async fn listings_by_ids(&self, post_ids: &[String]) -> Result<Vec<Listing>, StoreError>;

    /// Conditionally move the listing's current bid up to `amount` and record
    /// `bidder_name` as the last bidder. Matches only while bidding is open
    /// and the stored amount is strictly below `amount`; returns whether a
    /// document matched. This is the per-listing compare-and-swap that keeps
    /// concurrent bids from regressing the displayed amount.
    async fn apply_bid(
        &self,
        post_id: &str,
        amount: f64,
        bidder_name: &str,
    ) -> Result<bool, StoreError>;

    /// Set `biddingCompleted`. Returns whether a listing matched.
    async fn close_bidding(&self, post_id: &str) -> Result<bool, StoreError>;

    async fn insert_bid(&self, bid: &Bid) -> Result<(), StoreError>;
    async fn bids_by_listing(&self, post_id: &str) -> Result<Vec<Bid>, StoreError>;
    async fn bids_by_listing_and_bidder(
        &self,
        post_id: &str,
        user_id: &str,
    ) -> Result<Vec<Bid>, StoreError>;
    async fn bids_by_bidder(&self, user_id: &str) -> Result<Vec<Bid>, StoreError>;
}
