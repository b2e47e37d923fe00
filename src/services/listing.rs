use std::sync::Arc;

use nanoid::nanoid;

use crate::errors::ApiError;
use crate::models::{Bid, Listing, ListingWithBids, LocationInfo, PostData};
use crate::store::Store;

/// Fields the lister supplies when posting a stamp.
#[derive(Debug, Clone)]
pub struct NewListing {
    pub title: String,
    pub date: String,
    pub city: String,
    pub state: String,
    pub description: String,
    pub author: String,
    pub image: String,
    pub starting_bid: f64,
}

#[derive(Clone)]
pub struct ListingService {
    store: Arc<dyn Store>,
}

impl ListingService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Creates the listing and seeds the bid ledger with the starting amount
    /// attributed to the owner. The two writes are independent: a failed seed
    /// write is logged and the listing stands, with the ledger missing its
    /// first entry.
    pub async fn create_listing(
        &self,
        owner_id: &str,
        new: NewListing,
    ) -> Result<Listing, ApiError> {
        let owner = self
            .store
            .find_user_by_id(owner_id)
            .await?
            .ok_or(ApiError::UserNotFound)?;

        let listing = Listing {
            post_id: nanoid!(),
            title: new.title,
            user_id: owner_id.to_string(),
            post_data: PostData {
                date: new.date,
                location_info: LocationInfo {
                    city: new.city,
                    state: new.state,
                },
                description: new.description,
                author: new.author,
                image: new.image,
                user_name: owner.name.clone(),
                bid_amount: new.starting_bid,
                bidding_completed: false,
                last_bidded_user: owner.name,
            },
        };
        self.store.insert_listing(&listing).await?;

        let seed = Bid {
            post_id: listing.post_id.clone(),
            user_id: owner_id.to_string(),
            bid_amount: new.starting_bid,
        };
        if let Err(e) = self.store.insert_bid(&seed).await {
            log::error!(
                "listing {} saved but starting bid not recorded, ledger and listing diverge: {e}",
                listing.post_id
            );
        }
        Ok(listing)
    }

    /// The caller's own listings, most recently created first.
    pub async fn list_owned_by(&self, user_id: &str) -> Result<Vec<Listing>, ApiError> {
        let mut listings = self.store.listings_by_owner(user_id).await?;
        listings.reverse();
        Ok(listings)
    }

    /// Listings the caller may bid on: everyone else's, bidding still open,
    /// annotated with the caller's own latest bid. Most recent first.
    pub async fn list_open_for_bidding(
        &self,
        user_id: &str,
    ) -> Result<Vec<ListingWithBids>, ApiError> {
        let listings = self.store.open_listings_excluding_owner(user_id).await?;
        let mut out = Vec::with_capacity(listings.len());
        for listing in listings {
            let mine = self
                .store
                .bids_by_listing_and_bidder(&listing.post_id, user_id)
                .await?;
            let user_bid = mine.last().map(|b| b.bid_amount);
            out.push(listing.with_bids(user_bid, None));
        }
        out.reverse();
        Ok(out)
    }

    /// Distinct listings the user has ever bid on, each with the user's
    /// latest bid and the listing's full bid history. Most recent first.
    pub async fn list_bid_by_user(&self, user_id: &str) -> Result<Vec<ListingWithBids>, ApiError> {
        let my_bids = self.store.bids_by_bidder(user_id).await?;
        let mut post_ids: Vec<String> = Vec::new();
        for bid in &my_bids {
            if !post_ids.contains(&bid.post_id) {
                post_ids.push(bid.post_id.clone());
            }
        }

        let listings = self.store.listings_by_ids(&post_ids).await?;
        let mut out = Vec::with_capacity(listings.len());
        for listing in listings {
            let mine = self
                .store
                .bids_by_listing_and_bidder(&listing.post_id, user_id)
                .await?;
            let all = self.store.bids_by_listing(&listing.post_id).await?;
            let user_bid = mine.last().map(|b| b.bid_amount);
            out.push(listing.with_bids(user_bid, Some(all)));
        }
        out.reverse();
        Ok(out)
    }

    pub async fn close_bidding(&self, post_id: &str) -> Result<(), ApiError> {
        if !self.store.close_bidding(post_id).await? {
            return Err(ApiError::ListingNotFound);
        }
        Ok(())
    }
}
