use actix_web::{get, post, web, HttpResponse};
use serde::Deserialize;
use serde_json::json;

use crate::errors::ApiError;
use crate::services::NewListing;
use crate::AppState;

fn require(field: &str, value: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::Validation(format!("{field} is required")));
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    name: String,
    email: String,
    password: String,
}

#[post("/signup")]
pub async fn signup(
    state: web::Data<AppState>,
    body: web::Json<SignupRequest>,
) -> Result<HttpResponse, ApiError> {
    require("name", &body.name)?;
    require("email", &body.email)?;
    require("password", &body.password)?;
    let user = state
        .accounts
        .register(&body.name, &body.email, &body.password)
        .await?;
    Ok(HttpResponse::Created().json(json!({
        "message": "User signed up successfully",
        "user": user.public(),
    })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    email: String,
    password: String,
}

#[post("/login")]
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> Result<HttpResponse, ApiError> {
    require("email", &body.email)?;
    require("password", &body.password)?;
    let user = state.accounts.authenticate(&body.email, &body.password).await?;
    Ok(HttpResponse::Ok().json(json!({
        "message": "Login successful",
        "user": user.public(),
    })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostPostalRequest {
    title: String,
    date: String,
    city: String,
    state: String,
    description: String,
    author: String,
    user_id: String,
    #[serde(default)]
    image: String,
    bid_amount: f64,
}

#[post("/post-postal")]
pub async fn post_postal(
    state: web::Data<AppState>,
    body: web::Json<PostPostalRequest>,
) -> Result<HttpResponse, ApiError> {
    let body = body.into_inner();
    require("title", &body.title)?;
    require("userId", &body.user_id)?;
    if !body.bid_amount.is_finite() || body.bid_amount <= 0.0 {
        return Err(ApiError::Validation("bidAmount must be a positive number".into()));
    }
    state
        .listings
        .create_listing(
            &body.user_id,
            NewListing {
                title: body.title,
                date: body.date,
                city: body.city,
                state: body.state,
                description: body.description,
                author: body.author,
                image: body.image,
                starting_bid: body.bid_amount,
            },
        )
        .await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "Postal stamp posted successfully" })))
}

#[get("/posts/{userId}")]
pub async fn posts(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let listings = state.listings.list_owned_by(&path).await?;
    Ok(HttpResponse::Ok().json(listings))
}

#[get("/all-posts/{userId}")]
pub async fn all_posts(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let listings = state.listings.list_open_for_bidding(&path).await?;
    Ok(HttpResponse::Ok().json(listings))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceBidRequest {
    post_id: String,
    bid_amount: f64,
    user_id: String,
}

#[post("/place-bid")]
pub async fn place_bid(
    state: web::Data<AppState>,
    body: web::Json<PlaceBidRequest>,
) -> Result<HttpResponse, ApiError> {
    state
        .ledger
        .place_bid(&body.post_id, &body.user_id, body.bid_amount)
        .await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "Bid placed successfully" })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteBiddingRequest {
    post_id: String,
}

#[post("/complete-bidding")]
pub async fn complete_bidding(
    state: web::Data<AppState>,
    body: web::Json<CompleteBiddingRequest>,
) -> Result<HttpResponse, ApiError> {
    state.listings.close_bidding(&body.post_id).await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "Bidding completed successfully" })))
}

#[get("/bidPosts/{userId}")]
pub async fn bid_posts(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let listings = state.listings.list_bid_by_user(&path).await?;
    Ok(HttpResponse::Ok().json(listings))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(signup)
        .service(login)
        .service(post_postal)
        .service(posts)
        .service(all_posts)
        .service(place_bid)
        .service(complete_bidding)
        .service(bid_posts);
}
