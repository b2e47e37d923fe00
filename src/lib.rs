pub mod client;
pub mod config;
pub mod controllers;
pub mod errors;
pub mod models;
pub mod services;
pub mod store;

use std::sync::Arc;

use services::{AccountService, BidLedger, ListingService};
use store::Store;

/// Shared handler state: the three services over one store.
pub struct AppState {
    pub accounts: AccountService,
    pub listings: ListingService,
    pub ledger: BidLedger,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            accounts: AccountService::new(store.clone()),
            listings: ListingService::new(store.clone()),
            ledger: BidLedger::new(store),
        }
    }
}
