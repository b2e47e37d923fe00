use async_trait::async_trait;
use futures::StreamExt;
use mongodb::bson::doc;
use mongodb::{Collection, Cursor, Database};

use crate::models::{Bid, Listing, User};
use crate::store::{Store, StoreError};

const USERS: &str = "users";
const POSTALS: &str = "postals";
const BIDS: &str = "bidtransactions";

/// MongoDB-backed store. One typed collection per document kind; all scans
/// run in natural (insertion) order, which callers rely on.
#[derive(Clone)]
pub struct MongoStore {
    db: Database,
}

impl MongoStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    fn users(&self) -> Collection<User> {
        self.db.collection(USERS)
    }

    fn postals(&self) -> Collection<Listing> {
        self.db.collection(POSTALS)
    }

    fn bids(&self) -> Collection<Bid> {
        self.db.collection(BIDS)
    }
}

async fn drain<T>(mut cursor: Cursor<T>) -> Result<Vec<T>, StoreError>
where
    T: serde::de::DeserializeOwned + Unpin + Send + Sync,
{
    let mut out = Vec::new();
    while let Some(doc) = cursor.next().await {
        out.push(doc?);
    }
    Ok(out)
}

#[async_trait]
impl Store for MongoStore {
    async fn insert_user(&self, user: &User) -> Result<(), StoreError> {
        self.users().insert_one(user, None).await?;
        Ok(())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self.users().find_one(doc! { "email": email }, None).await?)
    }

    async fn find_user_by_id(&self, user_id: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .users()
            .find_one(doc! { "userId": user_id }, None)
            .await?)
    }

    async fn insert_listing(&self, listing: &Listing) -> Result<(), StoreError> {
        self.postals().insert_one(listing, None).await?;
        Ok(())
    }

    async fn find_listing(&self, post_id: &str) -> Result<Option<Listing>, StoreError> {
        Ok(self
            .postals()
            .find_one(doc! { "postId": post_id }, None)
            .await?)
    }

    async fn listings_by_owner(&self, user_id: &str) -> Result<Vec<Listing>, StoreError> {
        let cursor = self.postals().find(doc! { "userId": user_id }, None).await?;
        drain(cursor).await
    }

    async fn open_listings_excluding_owner(
        &self,
        user_id: &str,
    ) -> Result<Vec<Listing>, StoreError> {
        let filter = doc! {
            "userId": { "$ne": user_id },
            "postData.biddingCompleted": false,
        };
        let cursor = self.postals().find(filter, None).await?;
        drain(cursor).await
    }

    async fn listings_by_ids(&self, post_ids: &[String]) -> Result<Vec<Listing>, StoreError> {
        let filter = doc! { "postId": { "$in": post_ids.to_vec() } };
        let cursor = self.postals().find(filter, None).await?;
        drain(cursor).await
    }

    async fn apply_bid(
        &self,
        post_id: &str,
        amount: f64,
        bidder_name: &str,
    ) -> Result<bool, StoreError> {
        let filter = doc! {
            "postId": post_id,
            "postData.biddingCompleted": false,
            "postData.bidAmount": { "$lt": amount },
        };
        let update = doc! {
            "$set": {
                "postData.bidAmount": amount,
                "postData.lastBiddedUser": bidder_name,
            }
        };
        let result = self.postals().update_one(filter, update, None).await?;
        Ok(result.matched_count > 0)
    }

    async fn close_bidding(&self, post_id: &str) -> Result<bool, StoreError> {
        let update = doc! { "$set": { "postData.biddingCompleted": true } };
        let result = self
            .postals()
            .update_one(doc! { "postId": post_id }, update, None)
            .await?;
        Ok(result.matched_count > 0)
    }

    async fn insert_bid(&self, bid: &Bid) -> Result<(), StoreError> {
        self.bids().insert_one(bid, None).await?;
        Ok(())
    }

    async fn bids_by_listing(&self, post_id: &str) -> Result<Vec<Bid>, StoreError> {
        let cursor = self.bids().find(doc! { "postId": post_id }, None).await?;
        drain(cursor).await
    }

    async fn bids_by_listing_and_bidder(
        &self,
        post_id: &str,
        user_id: &str,
    ) -> Result<Vec<Bid>, StoreError> {
        let filter = doc! { "postId": post_id, "userId": user_id };
        let cursor = self.bids().find(filter, None).await?;
        drain(cursor).await
    }

    async fn bids_by_bidder(&self, user_id: &str) -> Result<Vec<Bid>, StoreError> {
        let cursor = self.bids().find(doc! { "userId": user_id }, None).await?;
        drain(cursor).await
    }
}
