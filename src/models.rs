use serde::{Deserialize, Serialize};

/// Stored user record. `password` holds the bcrypt digest and must never be
/// serialized into a response; handlers go through [`PublicUser`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// User shape that crosses the API: everything but the digest.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub user_id: String,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl User {
    pub fn public(&self) -> PublicUser {
        PublicUser {
            user_id: self.user_id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
            country: self.country.clone(),
            city: self.city.clone(),
            phone: self.phone.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationInfo {
    pub city: String,
    pub state: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostData {
    /// Free-text date as the client formatted it, not a structured date.
    pub date: String,
    pub location_info: LocationInfo,
    pub description: String,
    pub author: String,
    /// Inline-encoded image (data URL), unbounded.
    pub image: String,
    /// Owner's display name, denormalized at creation time.
    pub user_name: String,
    /// Current bid, mutated by every accepted bid.
    pub bid_amount: f64,
    #[serde(default)]
    pub bidding_completed: bool,
    /// Display name of the most recent bidder, denormalized.
    pub last_bidded_user: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub post_id: String,
    pub title: String,
    /// Owner's userId. No foreign-key enforcement in the store.
    pub user_id: String,
    pub post_data: PostData,
}

/// Append-only bid ledger entry. Never mutated or deleted; "latest bid" is
/// defined by insertion order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bid {
    pub post_id: String,
    pub user_id: String,
    pub bid_amount: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BidData {
    /// The caller's own most recent bid on this listing, if any.
    pub user_bid: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub all_bids: Option<Vec<Bid>>,
}

/// Listing joined with bid info for the browse/history views.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingWithBids {
    pub post_id: String,
    pub title: String,
    pub user_id: String,
    pub post_data: PostData,
    pub bid_data: BidData,
}

impl Listing {
    pub fn with_bids(self, user_bid: Option<f64>, all_bids: Option<Vec<Bid>>) -> ListingWithBids {
        ListingWithBids {
            post_id: self.post_id,
            title: self.title,
            user_id: self.user_id,
            post_data: self.post_data,
            bid_data: BidData { user_bid, all_bids },
        }
    }
}
