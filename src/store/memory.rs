use std::sync::Mutex;

use async_trait::async_trait;

use crate::models::{Bid, Listing, User};
use crate::store::{Store, StoreError};

#[derive(Default)]
struct Collections {
    users: Vec<User>,
    postals: Vec<Listing>,
    bids: Vec<Bid>,
}

/// In-memory store with the same ordering semantics as the Mongo backend:
/// every scan returns documents in insertion order. The single mutex makes
/// `apply_bid` atomic with respect to concurrent bids.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Collections>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn insert_user(&self, user: &User) -> Result<(), StoreError> {
        self.inner.lock().unwrap().users.push(user.clone());
        Ok(())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_user_by_id(&self, user_id: &str) -> Result<Option<User>, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.users.iter().find(|u| u.user_id == user_id).cloned())
    }

    async fn insert_listing(&self, listing: &Listing) -> Result<(), StoreError> {
        self.inner.lock().unwrap().postals.push(listing.clone());
        Ok(())
    }

    async fn find_listing(&self, post_id: &str) -> Result<Option<Listing>, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.postals.iter().find(|l| l.post_id == post_id).cloned())
    }

    async fn listings_by_owner(&self, user_id: &str) -> Result<Vec<Listing>, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .postals
            .iter()
            .filter(|l| l.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn open_listings_excluding_owner(
        &self,
        user_id: &str,
    ) -> Result<Vec<Listing>, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .postals
            .iter()
            .filter(|l| l.user_id != user_id && !l.post_data.bidding_completed)
            .cloned()
            .collect())
    }

    async fn listings_by_ids(&self, post_ids: &[String]) -> Result<Vec<Listing>, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .postals
            .iter()
            .filter(|l| post_ids.contains(&l.post_id))
            .cloned()
            .collect())
    }

    async fn apply_bid(
        &self,
        post_id: &str,
        amount: f64,
        bidder_name: &str,
    ) -> Result<bool, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        match inner.postals.iter_mut().find(|l| {
            l.post_id == post_id && !l.post_data.bidding_completed && l.post_data.bid_amount < amount
        }) {
            Some(listing) => {
                listing.post_data.bid_amount = amount;
                listing.post_data.last_bidded_user = bidder_name.to_string();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn close_bidding(&self, post_id: &str) -> Result<bool, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        match inner.postals.iter_mut().find(|l| l.post_id == post_id) {
            Some(listing) => {
                listing.post_data.bidding_completed = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn insert_bid(&self, bid: &Bid) -> Result<(), StoreError> {
        self.inner.lock().unwrap().bids.push(bid.clone());
        Ok(())
    }

    async fn bids_by_listing(&self, post_id: &str) -> Result<Vec<Bid>, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .bids
            .iter()
            .filter(|b| b.post_id == post_id)
            .cloned()
            .collect())
    }

    async fn bids_by_listing_and_bidder(
        &self,
        post_id: &str,
        user_id: &str,
    ) -> Result<Vec<Bid>, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .bids
            .iter()
            .filter(|b| b.post_id == post_id && b.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn bids_by_bidder(&self, user_id: &str) -> Result<Vec<Bid>, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .bids
            .iter()
            .filter(|b| b.user_id == user_id)
            .cloned()
            .collect())
    }
}
