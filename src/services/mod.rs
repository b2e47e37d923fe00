pub mod account;
pub mod bids;
pub mod listing;

pub use account::AccountService;
pub use bids::BidLedger;
pub use listing::{ListingService, NewListing};
