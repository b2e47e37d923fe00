use std::sync::Arc;

use crate::errors::ApiError;
use crate::models::Bid;
use crate::store::Store;

/// Appends to the bid ledger and moves the listing's displayed bid forward.
#[derive(Clone)]
pub struct BidLedger {
    store: Arc<dyn Store>,
}

impl BidLedger {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Validates the bid, appends the ledger entry, then applies the listing
    /// mutation as a conditional update. The ledger append is durable before
    /// the listing is touched; if the conditional update matches nothing
    /// (a concurrent higher bid, or bidding closed mid-flight) the divergence
    /// is logged and surfaced instead of silently losing the bid.
    pub async fn place_bid(
        &self,
        post_id: &str,
        user_id: &str,
        amount: f64,
    ) -> Result<(), ApiError> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(ApiError::Validation("bidAmount must be a positive number".into()));
        }

        let listing = self
            .store
            .find_listing(post_id)
            .await?
            .ok_or(ApiError::ListingNotFound)?;
        let bidder = self
            .store
            .find_user_by_id(user_id)
            .await?
            .ok_or(ApiError::UserNotFound)?;

        if listing.post_data.bidding_completed {
            return Err(ApiError::BiddingClosed);
        }
        if amount <= listing.post_data.bid_amount {
            return Err(ApiError::BidTooLow {
                current: listing.post_data.bid_amount,
            });
        }

        let bid = Bid {
            post_id: post_id.to_string(),
            user_id: user_id.to_string(),
            bid_amount: amount,
        };
        self.store.insert_bid(&bid).await?;

        if !self.store.apply_bid(post_id, amount, &bidder.name).await? {
            log::warn!(
                "bid {amount} by {user_id} on {post_id} is in the ledger but the listing \
                 update matched nothing; ledger and listing diverge"
            );
            return Err(ApiError::BidConflict);
        }
        Ok(())
    }
}
