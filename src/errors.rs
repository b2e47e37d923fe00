use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

use crate::store::StoreError;

/// Service-layer failure taxonomy, mapped onto HTTP by [`ResponseError`].
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("User already exists")]
    DuplicateEmail,
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("Post not found")]
    ListingNotFound,
    #[error("User not found")]
    UserNotFound,
    #[error("{0}")]
    Validation(String),
    #[error("Bid amount must be greater than the current bid")]
    BidTooLow { current: f64 },
    #[error("Bidding is already completed for this post")]
    BiddingClosed,
    #[error("Bid lost to a concurrent update")]
    BidConflict,
    #[error("storage error: {0}")]
    Store(#[from] StoreError),
    #[error("password hashing failed: {0}")]
    Hash(#[from] bcrypt::BcryptError),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::DuplicateEmail
            | ApiError::InvalidCredentials
            | ApiError::Validation(_)
            | ApiError::BidTooLow { .. }
            | ApiError::BiddingClosed => StatusCode::BAD_REQUEST,
            ApiError::ListingNotFound | ApiError::UserNotFound => StatusCode::NOT_FOUND,
            ApiError::BidConflict => StatusCode::CONFLICT,
            ApiError::Store(_) | ApiError::Hash(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            // signup/login report under "message", everything else under
            // "error" (wire-compatible with the original API)
            ApiError::DuplicateEmail | ApiError::InvalidCredentials => {
                json!({ "message": self.to_string() })
            }
            ApiError::BidTooLow { current } => {
                json!({ "error": self.to_string(), "currentBid": current })
            }
            ApiError::Store(e) => {
                log::error!("storage failure: {e}");
                json!({ "error": "Internal server error" })
            }
            ApiError::Hash(e) => {
                log::error!("hashing failure: {e}");
                json!({ "error": "Internal server error" })
            }
            other => json!({ "error": other.to_string() }),
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}
