mod common;

use axum::http::StatusCode;
use chrono::Duration;
use common::{artist_form, test_app};

#[tokio::test]
async fn test_list_artists_ordered_by_name() {
    let app = test_app().await;
    app.seed_artist("The Wild Sax Band").await;
    app.seed_artist("Guns N Petals").await;
    app.seed_artist("Matt Quevedo").await;

    let res = app.get("/artists").await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.template(), "pages/artists.html");
    let names: Vec<&str> = res.body["artists"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Guns N Petals", "Matt Quevedo", "The Wild Sax Band"]);
    assert!(res.body["artists"][0].get("city").is_none());
}

#[tokio::test]
async fn test_create_artist() {
    let app = test_app().await;

    let res = app.post_form("/artists/create", &artist_form("Matt Quevedo")).await;
    assert_eq!(res.template(), "pages/home.html");
    assert_eq!(res.flashes(), vec!["Artist Matt Quevedo was successfully listed!"]);

    let res = app.get("/artists/1").await;
    assert_eq!(res.template(), "pages/show_artist.html");
    let artist = &res.body["artist"];
    assert_eq!(artist["name"], "Matt Quevedo");
    assert_eq!(artist["genres"], serde_json::json!(["Jazz"]));
    assert_eq!(artist["seeking_venue"], true);
    assert!(artist["website"].is_null());
    assert_eq!(artist["seeking_description"], "Looking for a place to perform!");
}

#[tokio::test]
async fn test_duplicate_artist_name_is_rolled_back() {
    let app = test_app().await;
    app.seed_artist("Guns N Petals").await;

    let res = app.post_form("/artists/create", &artist_form("Guns N Petals")).await;
    assert_eq!(res.template(), "pages/home.html");
    assert_eq!(
        res.flashes(),
        vec!["An error occurred. Artist Guns N Petals could not be listed."]
    );

    let res = app.get("/artists").await;
    assert_eq!(res.body["artists"].as_array().unwrap().len(), 1);
    assert_eq!(res.body["artists"][0]["name"], "Guns N Petals");
}

#[tokio::test]
async fn test_search_artists() {
    let app = test_app().await;
    let gnp = app.seed_artist("Guns N Petals").await;
    app.seed_artist("Matt Quevedo").await;
    app.seed_artist("The Wild Sax Band").await;
    let venue = app.seed_venue("The Musical Hop", "San Francisco", "CA").await;
    app.seed_show(venue.id, gnp.id, Duration::days(5)).await;
    app.seed_show(venue.id, gnp.id, Duration::days(-5)).await;

    let res = app.post_form("/artists/search", &[("search_term", "A")]).await;
    assert_eq!(res.template(), "pages/search_artists.html");
    assert_eq!(res.body["results"]["count"], 3);

    let res = app.post_form("/artists/search", &[("search_term", "band")]).await;
    assert_eq!(res.body["results"]["count"], 1);
    assert_eq!(res.body["results"]["data"][0]["name"], "The Wild Sax Band");

    let res = app.post_form("/artists/search", &[("search_term", "petals")]).await;
    assert_eq!(res.body["results"]["data"][0]["num_upcoming_shows"], 1);
    assert_eq!(res.body["search_term"], "petals");
}

#[tokio::test]
async fn test_artist_detail_lists_venues() {
    let app = test_app().await;
    let artist = app.seed_artist("Guns N Petals").await;
    let venue = app.seed_venue("The Musical Hop", "San Francisco", "CA").await;
    app.seed_show(venue.id, artist.id, Duration::days(-1)).await;
    app.seed_show(venue.id, artist.id, Duration::days(1)).await;

    let res = app.get(&format!("/artists/{}", artist.id)).await;
    let artist = &res.body["artist"];
    assert_eq!(artist["past_shows_count"], 1);
    assert_eq!(artist["upcoming_shows_count"], 1);
    assert_eq!(artist["upcoming_shows"][0]["venue_name"], "The Musical Hop");
    assert_eq!(artist["upcoming_shows"][0]["venue_id"], venue.id);
    assert_eq!(
        artist["past_shows"][0]["venue_image_link"],
        "https://img.example/venue.jpg"
    );
}

#[tokio::test]
async fn test_unknown_artist_falls_back_to_home() {
    let app = test_app().await;

    let res = app.get("/artists/3").await;
    assert_eq!(res.template(), "pages/home.html");
    assert_eq!(res.flashes(), vec!["Not a valid artist id!"]);

    let res = app.get("/artists/3/edit").await;
    assert_eq!(res.flashes(), vec!["Artist id is not valid!"]);

    let res = app.get("/artists/three").await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_edit_artist_forces_seeking_venue() {
    let app = test_app().await;
    let mut draft = common::artist_draft("Guns N Petals");
    draft.seeking_venue = false;
    let artist = fyyur_db::repo::insert_artist(&app.db, draft).await.unwrap();

    let res = app.get(&format!("/artists/{}/edit", artist.id)).await;
    assert_eq!(res.template(), "forms/edit_artist.html");
    assert_eq!(res.body["form"]["seeking_venue"], false);

    let res = app
        .post_form(&format!("/artists/{}/edit", artist.id), &artist_form("Guns N Roses"))
        .await;
    assert_eq!(res.status, StatusCode::SEE_OTHER);
    assert_eq!(res.location(), Some(format!("/artists/{}", artist.id).as_str()));
    assert_eq!(
        res.carried_flashes(),
        vec!["Artist Guns N Roses was successfully edited!"]
    );

    let res = app.get(&format!("/artists/{}", artist.id)).await;
    assert_eq!(res.body["artist"]["name"], "Guns N Roses");
    assert_eq!(res.body["artist"]["state"], "NY");
    assert_eq!(res.body["artist"]["seeking_venue"], true);
}

#[tokio::test]
async fn test_edit_artist_to_taken_name_fails() {
    let app = test_app().await;
    app.seed_artist("Matt Quevedo").await;
    let other = app.seed_artist("Guns N Petals").await;

    let res = app
        .post_form(&format!("/artists/{}/edit", other.id), &artist_form("Matt Quevedo"))
        .await;
    assert_eq!(res.status, StatusCode::SEE_OTHER);
    assert_eq!(res.carried_flashes(), vec!["Artist Matt Quevedo edit failed!"]);

    let res = app.get(&format!("/artists/{}", other.id)).await;
    assert_eq!(res.body["artist"]["name"], "Guns N Petals");
}

#[tokio::test]
async fn test_create_artist_form() {
    let app = test_app().await;

    let res = app.get("/artists/create").await;
    assert_eq!(res.template(), "forms/new_artist.html");
    assert_eq!(res.body["form"]["seeking_venue"], false);
    assert!(res.body.get("artist").is_none());
}
