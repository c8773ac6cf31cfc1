// ABOUTME: Integration tests for the like, save, and follow ledger
// ABOUTME: Duplicate rejection, owner-only deletion, self-follow, and follow graph listings
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod common;
mod helpers;

use cooks_corner::constants::messages;
use cooks_corner::errors::ErrorCode;
use cooks_corner::models::InteractionKind;
use cooks_corner::permissions::Subject;
use cooks_corner::services::ledger;
use helpers::axum_test::AxumTestRequest;
use serde_json::Value;

use common::{
    create_authenticated_user, create_test_category, create_test_recipe, create_test_resources,
    test_router,
};

#[tokio::test]
async fn test_duplicate_like_is_rejected_and_count_stays_one() {
    let resources = create_test_resources().await.unwrap();
    let (ann, _) = create_authenticated_user(&resources, "ann").await.unwrap();
    let (_, bob_token) = create_authenticated_user(&resources, "bob").await.unwrap();
    let category = create_test_category(&resources.database, "Mains")
        .await
        .unwrap();
    let recipe = create_test_recipe(&resources.database, ann.id, category.id, "Stew")
        .await
        .unwrap();
    let like_uri = format!("/api/recipes/{}/like", recipe.id);

    let first = AxumTestRequest::post(&like_uri)
        .bearer(&bob_token)
        .send(test_router(&resources))
        .await;
    assert_eq!(first.status(), 201);
    let body: Value = first.json();
    assert_eq!(body["recipe"], recipe.id);

    let second = AxumTestRequest::post(&like_uri)
        .bearer(&bob_token)
        .send(test_router(&resources))
        .await;
    assert_eq!(second.status(), 400);
    let body: Value = second.json();
    assert_eq!(body["error"]["message"], messages::ALREADY_LIKED);

    let detail: Value = AxumTestRequest::get(&format!("/api/recipes/{}", recipe.id))
        .send(test_router(&resources))
        .await
        .json();
    assert_eq!(detail["likes_count"], 1);

    let unlike = AxumTestRequest::delete(&like_uri)
        .bearer(&bob_token)
        .send(test_router(&resources))
        .await;
    assert_eq!(unlike.status(), 204);

    let unlike_again = AxumTestRequest::delete(&like_uri)
        .bearer(&bob_token)
        .send(test_router(&resources))
        .await;
    assert_eq!(unlike_again.status(), 404);
}

#[tokio::test]
async fn test_duplicate_save_is_rejected() {
    let resources = create_test_resources().await.unwrap();
    let (ann, ann_token) = create_authenticated_user(&resources, "ann").await.unwrap();
    let category = create_test_category(&resources.database, "Mains")
        .await
        .unwrap();
    let recipe = create_test_recipe(&resources.database, ann.id, category.id, "Stew")
        .await
        .unwrap();
    let save_uri = format!("/api/recipes/{}/save", recipe.id);

    let first = AxumTestRequest::post(&save_uri)
        .bearer(&ann_token)
        .send(test_router(&resources))
        .await;
    assert_eq!(first.status(), 201);

    let second = AxumTestRequest::post(&save_uri)
        .bearer(&ann_token)
        .send(test_router(&resources))
        .await;
    assert_eq!(second.status(), 400);
    let body: Value = second.json();
    assert_eq!(body["error"]["message"], messages::ALREADY_SAVED);
    assert_eq!(
        ledger::count_saves(&resources.database, recipe.id).await.unwrap(),
        1
    );

    let unsave = AxumTestRequest::delete(&save_uri)
        .bearer(&ann_token)
        .send(test_router(&resources))
        .await;
    assert_eq!(unsave.status(), 204);
    assert_eq!(
        ledger::count_saves(&resources.database, recipe.id).await.unwrap(),
        0
    );
}

#[tokio::test]
async fn test_liking_missing_recipe_is_not_found() {
    let resources = create_test_resources().await.unwrap();
    let (_, token) = create_authenticated_user(&resources, "ann").await.unwrap();

    let response = AxumTestRequest::post("/api/recipes/9999/like")
        .bearer(&token)
        .send(test_router(&resources))
        .await;
    assert_eq!(response.status(), 404);

    let response = AxumTestRequest::post("/api/recipes/9999/like")
        .send(test_router(&resources))
        .await;
    assert_eq!(response.status(), 401);
}

#[tokio::test]
async fn test_ledger_rows_are_deletable_only_by_owner() {
    let resources = create_test_resources().await.unwrap();
    let database = &resources.database;
    let (ann, ann_token) = create_authenticated_user(&resources, "ann").await.unwrap();
    let (bob, bob_token) = create_authenticated_user(&resources, "bob").await.unwrap();
    let category = create_test_category(database, "Mains").await.unwrap();
    let recipe = create_test_recipe(database, ann.id, category.id, "Stew")
        .await
        .unwrap();

    let like = database
        .create_ledger_entry(InteractionKind::Like, bob.id, recipe.id)
        .await
        .unwrap();
    let save = database
        .create_ledger_entry(InteractionKind::Save, bob.id, recipe.id)
        .await
        .unwrap();
    let follow = database
        .create_ledger_entry(InteractionKind::Follow, bob.id, ann.id)
        .await
        .unwrap();

    for (prefix, entry_id) in [("likes", like.id), ("saves", save.id), ("follows", follow.id)] {
        let foreign = AxumTestRequest::delete(&format!("/api/{prefix}/{entry_id}"))
            .bearer(&ann_token)
            .send(test_router(&resources))
            .await;
        assert_eq!(foreign.status(), 403, "{prefix} deleted by non-owner");
    }

    assert!(database
        .get_ledger_entry(InteractionKind::Like, like.id)
        .await
        .unwrap()
        .is_some());
    assert!(database
        .get_ledger_entry(InteractionKind::Save, save.id)
        .await
        .unwrap()
        .is_some());
    assert!(database
        .get_ledger_entry(InteractionKind::Follow, follow.id)
        .await
        .unwrap()
        .is_some());

    let own = AxumTestRequest::delete(&format!("/api/likes/{}", like.id))
        .bearer(&bob_token)
        .send(test_router(&resources))
        .await;
    assert_eq!(own.status(), 204);

    let missing = AxumTestRequest::delete(&format!("/api/likes/{}", like.id))
        .bearer(&bob_token)
        .send(test_router(&resources))
        .await;
    assert_eq!(missing.status(), 404);
}

#[tokio::test]
async fn test_follow_lifecycle() {
    let resources = create_test_resources().await.unwrap();
    let (ann, ann_token) = create_authenticated_user(&resources, "ann").await.unwrap();
    let (bob, _) = create_authenticated_user(&resources, "bob").await.unwrap();
    let follow_uri = format!("/api/users/{}/follow", bob.id);

    let follow = AxumTestRequest::post(&follow_uri)
        .bearer(&ann_token)
        .send(test_router(&resources))
        .await;
    assert_eq!(follow.status(), 201);
    let body: Value = follow.json();
    assert_eq!(body["follower"], ann.id);
    assert_eq!(body["followed"], bob.id);

    let duplicate = AxumTestRequest::post(&follow_uri)
        .bearer(&ann_token)
        .send(test_router(&resources))
        .await;
    assert_eq!(duplicate.status(), 400);
    let body: Value = duplicate.json();
    assert_eq!(body["error"]["message"], messages::ALREADY_FOLLOWED);

    let profile: Value = AxumTestRequest::get(&format!("/api/users/{}", bob.id))
        .bearer(&ann_token)
        .send(test_router(&resources))
        .await
        .json();
    assert_eq!(profile["followers_count"], 1);
    let database = &resources.database;
    assert_eq!(ledger::count_followers(database, bob.id).await.unwrap(), 1);
    assert_eq!(ledger::count_following(database, ann.id).await.unwrap(), 1);
    assert_eq!(ledger::count_followers(database, ann.id).await.unwrap(), 0);
    assert_eq!(ledger::count_following(database, bob.id).await.unwrap(), 0);

    let unfollow = AxumTestRequest::delete(&follow_uri)
        .bearer(&ann_token)
        .send(test_router(&resources))
        .await;
    assert_eq!(unfollow.status(), 204);
    assert_eq!(ledger::count_followers(database, bob.id).await.unwrap(), 0);
    assert_eq!(ledger::count_following(database, ann.id).await.unwrap(), 0);

    let unfollow_again = AxumTestRequest::delete(&follow_uri)
        .bearer(&ann_token)
        .send(test_router(&resources))
        .await;
    assert_eq!(unfollow_again.status(), 404);
}

#[tokio::test]
async fn test_self_follow_and_missing_user() {
    let resources = create_test_resources().await.unwrap();
    let (ann, ann_token) = create_authenticated_user(&resources, "ann").await.unwrap();

    let self_follow = AxumTestRequest::post(&format!("/api/users/{}/follow", ann.id))
        .bearer(&ann_token)
        .send(test_router(&resources))
        .await;
    assert_eq!(self_follow.status(), 400);
    assert_eq!(
        resources
            .database
            .count_for_owner(InteractionKind::Follow, ann.id)
            .await
            .unwrap(),
        0
    );

    let missing = AxumTestRequest::post("/api/users/9999/follow")
        .bearer(&ann_token)
        .send(test_router(&resources))
        .await;
    assert_eq!(missing.status(), 404);
}

#[tokio::test]
async fn test_concurrent_likes_insert_exactly_once() {
    let resources = create_test_resources().await.unwrap();
    let database = &resources.database;
    let (ann, _) = create_authenticated_user(&resources, "ann").await.unwrap();
    let (bob, _) = create_authenticated_user(&resources, "bob").await.unwrap();
    let category = create_test_category(database, "Mains").await.unwrap();
    let recipe = create_test_recipe(database, ann.id, category.id, "Stew")
        .await
        .unwrap();
    let subject = Subject::new(bob.id);

    let (first, second) = tokio::join!(
        ledger::add(database, &subject, InteractionKind::Like, recipe.id),
        ledger::add(database, &subject, InteractionKind::Like, recipe.id),
    );

    let outcomes = [first, second];
    let inserted = outcomes.iter().filter(|r| r.is_ok()).count();
    assert_eq!(inserted, 1);
    let rejected = outcomes
        .iter()
        .filter_map(|r| r.as_ref().err())
        .next()
        .unwrap();
    assert_eq!(rejected.code, ErrorCode::ResourceAlreadyExists);
    assert_eq!(ledger::count_likes(database, recipe.id).await.unwrap(), 1);
}

#[tokio::test]
async fn test_own_listings_are_scoped_to_caller() {
    let resources = create_test_resources().await.unwrap();
    let database = &resources.database;
    let (ann, ann_token) = create_authenticated_user(&resources, "ann").await.unwrap();
    let (bob, bob_token) = create_authenticated_user(&resources, "bob").await.unwrap();
    let category = create_test_category(database, "Mains").await.unwrap();
    let stew = create_test_recipe(database, ann.id, category.id, "Stew")
        .await
        .unwrap();
    let curry = create_test_recipe(database, ann.id, category.id, "Curry")
        .await
        .unwrap();

    database
        .create_ledger_entry(InteractionKind::Save, bob.id, stew.id)
        .await
        .unwrap();
    database
        .create_ledger_entry(InteractionKind::Save, bob.id, curry.id)
        .await
        .unwrap();
    database
        .create_ledger_entry(InteractionKind::Save, ann.id, curry.id)
        .await
        .unwrap();

    let bobs: Value = AxumTestRequest::get("/api/saves")
        .bearer(&bob_token)
        .send(test_router(&resources))
        .await
        .json();
    assert_eq!(bobs["count"], 2);
    assert_eq!(bobs["results"][0]["recipe"], stew.id);
    assert_eq!(bobs["results"][1]["recipe"], curry.id);

    let anns: Value = AxumTestRequest::get("/api/saves")
        .bearer(&ann_token)
        .send(test_router(&resources))
        .await
        .json();
    assert_eq!(anns["count"], 1);
    assert_eq!(anns["results"][0]["user"], ann.id);

    let likes: Value = AxumTestRequest::get("/api/likes")
        .bearer(&ann_token)
        .send(test_router(&resources))
        .await
        .json();
    assert_eq!(likes["count"], 0);

    let anonymous = AxumTestRequest::get("/api/follows")
        .send(test_router(&resources))
        .await;
    assert_eq!(anonymous.status(), 401);
}

#[tokio::test]
async fn test_followers_and_following_pages() {
    let resources = create_test_resources().await.unwrap();
    let database = &resources.database;
    let (ann, ann_token) = create_authenticated_user(&resources, "ann").await.unwrap();
    let (bob, _) = create_authenticated_user(&resources, "bob").await.unwrap();
    let (cat, _) = create_authenticated_user(&resources, "cat").await.unwrap();

    database
        .create_ledger_entry(InteractionKind::Follow, bob.id, ann.id)
        .await
        .unwrap();
    database
        .create_ledger_entry(InteractionKind::Follow, cat.id, ann.id)
        .await
        .unwrap();
    database
        .create_ledger_entry(InteractionKind::Follow, ann.id, cat.id)
        .await
        .unwrap();

    let followers: Value = AxumTestRequest::get(&format!("/api/users/{}/followers", ann.id))
        .bearer(&ann_token)
        .send(test_router(&resources))
        .await
        .json();
    assert_eq!(followers["count"], 2);
    assert_eq!(followers["results"][0]["username"], "bob");
    assert_eq!(followers["results"][1]["username"], "cat");

    let first_page: Value =
        AxumTestRequest::get(&format!("/api/users/{}/followers?page_size=1", ann.id))
            .bearer(&ann_token)
            .send(test_router(&resources))
            .await
            .json();
    assert_eq!(first_page["results"].as_array().unwrap().len(), 1);
    assert_eq!(first_page["next"], 2);
    assert!(first_page["previous"].is_null());

    let following: Value = AxumTestRequest::get(&format!("/api/users/{}/following", ann.id))
        .bearer(&ann_token)
        .send(test_router(&resources))
        .await
        .json();
    assert_eq!(following["count"], 1);
    assert_eq!(following["results"][0]["username"], "cat");
    assert_eq!(following["results"][0]["followers_count"], 1);

    let unknown = AxumTestRequest::get("/api/users/9999/followers")
        .bearer(&ann_token)
        .send(test_router(&resources))
        .await;
    assert_eq!(unknown.status(), 404);
}
