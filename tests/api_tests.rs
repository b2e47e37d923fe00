//! End-to-end tests: the real handlers over the in-memory store.

use std::sync::Arc;

use actix_web::{test, web, App};
use serde_json::{json, Value};

use stampbid::controllers;
use stampbid::store::MemoryStore;
use stampbid::AppState;

fn state() -> web::Data<AppState> {
    web::Data::new(AppState::new(Arc::new(MemoryStore::new())))
}

fn post_json(path: &str, body: Value) -> test::TestRequest {
    test::TestRequest::post().uri(path).set_json(body)
}

fn signup_body(name: &str, email: &str) -> Value {
    json!({ "name": name, "email": email, "password": "hunter2" })
}

fn postal_body(user_id: &str, title: &str, bid: f64) -> Value {
    json!({
        "title": title,
        "date": "2024-03-01",
        "city": "Chennai",
        "state": "TN",
        "description": "1948 first issue",
        "author": "India Post",
        "userId": user_id,
        "image": "",
        "bidAmount": bid,
    })
}

#[actix_web::test]
async fn signup_and_login_never_leak_the_digest() {
    let app = test::init_service(
        App::new().app_data(state()).configure(controllers::configure),
    )
    .await;

    let resp = test::call_service(
        &app,
        post_json("/signup", signup_body("Ada", "ada@example.com")).to_request(),
    )
    .await;
    assert_eq!(resp.status(), 201);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "User signed up successfully");
    let user = &body["user"];
    assert_eq!(user["name"], "Ada");
    assert!(user["userId"].as_str().is_some_and(|id| !id.is_empty()));
    assert!(user.get("password").is_none());

    // duplicate email
    let resp = test::call_service(
        &app,
        post_json("/signup", signup_body("Imposter", "ada@example.com")).to_request(),
    )
    .await;
    assert_eq!(resp.status(), 400);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "User already exists");

    let resp = test::call_service(
        &app,
        post_json(
            "/login",
            json!({ "email": "ada@example.com", "password": "hunter2" }),
        )
        .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 200);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Login successful");
    assert!(body["user"].get("password").is_none());

    // wrong password and unknown email read identically
    let wrong = test::call_service(
        &app,
        post_json(
            "/login",
            json!({ "email": "ada@example.com", "password": "nope" }),
        )
        .to_request(),
    )
    .await;
    assert_eq!(wrong.status(), 400);
    let wrong: Value = test::read_body_json(wrong).await;

    let unknown = test::call_service(
        &app,
        post_json(
            "/login",
            json!({ "email": "nobody@example.com", "password": "hunter2" }),
        )
        .to_request(),
    )
    .await;
    assert_eq!(unknown.status(), 400);
    let unknown: Value = test::read_body_json(unknown).await;
    assert_eq!(wrong["message"], unknown["message"]);
}

#[actix_web::test]
async fn posting_seeds_the_current_bid_and_lists_newest_first() {
    let app = test::init_service(
        App::new().app_data(state()).configure(controllers::configure),
    )
    .await;

    let resp = test::call_service(
        &app,
        post_json("/signup", signup_body("Ada", "ada@example.com")).to_request(),
    )
    .await;
    let body: Value = test::read_body_json(resp).await;
    let owner = body["user"]["userId"].as_str().unwrap().to_string();

    for title in ["A", "B", "C"] {
        let resp = test::call_service(
            &app,
            post_json("/post-postal", postal_body(&owner, title, 100.0)).to_request(),
        )
        .await;
        assert_eq!(resp.status(), 200);
    }

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/posts/{owner}"))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 200);
    let posts: Value = test::read_body_json(resp).await;
    let posts = posts.as_array().unwrap();
    assert_eq!(posts.len(), 3);
    let titles: Vec<&str> = posts.iter().map(|p| p["title"].as_str().unwrap()).collect();
    assert_eq!(titles, ["C", "B", "A"]);
    assert_eq!(posts[0]["postData"]["bidAmount"], 100.0);
    assert_eq!(posts[0]["postData"]["userName"], "Ada");
    assert_eq!(posts[0]["postData"]["biddingCompleted"], false);
}

#[actix_web::test]
async fn bidding_flow_updates_every_view() {
    let app = test::init_service(
        App::new().app_data(state()).configure(controllers::configure),
    )
    .await;

    let resp = test::call_service(
        &app,
        post_json("/signup", signup_body("Ada", "ada@example.com")).to_request(),
    )
    .await;
    let body: Value = test::read_body_json(resp).await;
    let owner = body["user"]["userId"].as_str().unwrap().to_string();

    let resp = test::call_service(
        &app,
        post_json("/signup", signup_body("Bob", "bob@example.com")).to_request(),
    )
    .await;
    let body: Value = test::read_body_json(resp).await;
    let bidder = body["user"]["userId"].as_str().unwrap().to_string();

    test::call_service(
        &app,
        post_json("/post-postal", postal_body(&owner, "Penny Black", 100.0)).to_request(),
    )
    .await;

    // the bidder sees the listing with no bid of their own yet
    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/all-posts/{bidder}"))
            .to_request(),
    )
    .await;
    let open: Value = test::read_body_json(resp).await;
    let open = open.as_array().unwrap();
    assert_eq!(open.len(), 1);
    assert_eq!(open[0]["bidData"]["userBid"], Value::Null);
    let post_id = open[0]["postId"].as_str().unwrap().to_string();

    // the owner does not see their own listing in the browse view
    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/all-posts/{owner}"))
            .to_request(),
    )
    .await;
    let own_view: Value = test::read_body_json(resp).await;
    assert_eq!(own_view.as_array().unwrap().len(), 0);

    let resp = test::call_service(
        &app,
        post_json(
            "/place-bid",
            json!({ "postId": post_id, "bidAmount": 150.0, "userId": bidder }),
        )
        .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 200);

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/all-posts/{bidder}"))
            .to_request(),
    )
    .await;
    let open: Value = test::read_body_json(resp).await;
    let open = &open.as_array().unwrap()[0];
    assert_eq!(open["postData"]["bidAmount"], 150.0);
    assert_eq!(open["postData"]["lastBiddedUser"], "Bob");
    assert_eq!(open["bidData"]["userBid"], 150.0);

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/bidPosts/{bidder}"))
            .to_request(),
    )
    .await;
    let mine: Value = test::read_body_json(resp).await;
    let mine = mine.as_array().unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0]["bidData"]["userBid"], 150.0);
    // seed bid by the owner plus Bob's bid
    assert_eq!(mine[0]["bidData"]["allBids"].as_array().unwrap().len(), 2);
}

#[actix_web::test]
async fn rejected_bids_and_unknown_listings() {
    let app = test::init_service(
        App::new().app_data(state()).configure(controllers::configure),
    )
    .await;

    let resp = test::call_service(
        &app,
        post_json("/signup", signup_body("Ada", "ada@example.com")).to_request(),
    )
    .await;
    let body: Value = test::read_body_json(resp).await;
    let owner = body["user"]["userId"].as_str().unwrap().to_string();

    let resp = test::call_service(
        &app,
        post_json("/signup", signup_body("Bob", "bob@example.com")).to_request(),
    )
    .await;
    let body: Value = test::read_body_json(resp).await;
    let bidder = body["user"]["userId"].as_str().unwrap().to_string();

    test::call_service(
        &app,
        post_json("/post-postal", postal_body(&owner, "Penny Black", 100.0)).to_request(),
    )
    .await;
    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/all-posts/{bidder}"))
            .to_request(),
    )
    .await;
    let open: Value = test::read_body_json(resp).await;
    let post_id = open[0]["postId"].as_str().unwrap().to_string();

    // unknown listing
    let resp = test::call_service(
        &app,
        post_json(
            "/place-bid",
            json!({ "postId": "nope", "bidAmount": 150.0, "userId": bidder }),
        )
        .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 404);

    // not above the current bid
    let resp = test::call_service(
        &app,
        post_json(
            "/place-bid",
            json!({ "postId": post_id, "bidAmount": 100.0, "userId": bidder }),
        )
        .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 400);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["currentBid"], 100.0);

    // closed listing
    test::call_service(
        &app,
        post_json("/complete-bidding", json!({ "postId": post_id })).to_request(),
    )
    .await;
    let resp = test::call_service(
        &app,
        post_json(
            "/place-bid",
            json!({ "postId": post_id, "bidAmount": 200.0, "userId": bidder }),
        )
        .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 400);
}

#[actix_web::test]
async fn completing_bidding_hides_the_listing_from_browsers() {
    let app = test::init_service(
        App::new().app_data(state()).configure(controllers::configure),
    )
    .await;

    let resp = test::call_service(
        &app,
        post_json("/signup", signup_body("Ada", "ada@example.com")).to_request(),
    )
    .await;
    let body: Value = test::read_body_json(resp).await;
    let owner = body["user"]["userId"].as_str().unwrap().to_string();

    let resp = test::call_service(
        &app,
        post_json("/signup", signup_body("Bob", "bob@example.com")).to_request(),
    )
    .await;
    let body: Value = test::read_body_json(resp).await;
    let bidder = body["user"]["userId"].as_str().unwrap().to_string();

    test::call_service(
        &app,
        post_json("/post-postal", postal_body(&owner, "Penny Black", 100.0)).to_request(),
    )
    .await;
    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/posts/{owner}"))
            .to_request(),
    )
    .await;
    let posts: Value = test::read_body_json(resp).await;
    let post_id = posts[0]["postId"].as_str().unwrap().to_string();

    let resp = test::call_service(
        &app,
        post_json("/complete-bidding", json!({ "postId": post_id })).to_request(),
    )
    .await;
    assert_eq!(resp.status(), 200);

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/all-posts/{bidder}"))
            .to_request(),
    )
    .await;
    let open: Value = test::read_body_json(resp).await;
    assert_eq!(open.as_array().unwrap().len(), 0);

    // the owner still sees it, flagged closed
    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/posts/{owner}"))
            .to_request(),
    )
    .await;
    let posts: Value = test::read_body_json(resp).await;
    assert_eq!(posts[0]["postData"]["biddingCompleted"], true);

    // closing an unknown listing is an explicit 404, not a silent no-op
    let resp = test::call_service(
        &app,
        post_json("/complete-bidding", json!({ "postId": "nope" })).to_request(),
    )
    .await;
    assert_eq!(resp.status(), 404);
}
