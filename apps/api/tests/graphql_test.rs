//! Integration tests for the GraphQL schema
//!
//! Runs documents against the schema over a `MemoryStore` and checks results
//! together with how many grouped fetches the loaders issued.

mod common;

use chrono::{Datelike, Utc};
use common::*;
use memberhub_api::config::MutationFailurePolicy;
use memberhub_api::models::member_type::MemberTypeId;
use memberhub_api::repositories::memory::ops;
use memberhub_api::repositories::Store;
use rstest::rstest;
use serde_json::json;
use tracing_test::traced_test;
use uuid::Uuid;

// ==================== Queries ====================

#[tokio::test]
async fn test_member_types_are_listed() {
    let app = TestApp::new();

    let response = execute(
        &app.state,
        "{ memberTypes { id discount postsLimitPerMonth } }",
    )
    .await;

    assert_no_errors(&response);
    assert_eq!(
        response["data"]["memberTypes"],
        json!([
            { "id": "basic", "discount": 0.1, "postsLimitPerMonth": 20 },
            { "id": "business", "discount": 0.2, "postsLimitPerMonth": 100 },
        ])
    );
}

#[tokio::test]
async fn test_member_type_by_id() {
    let app = TestApp::new();

    let response = execute(&app.state, "{ memberType(id: business) { discount } }").await;

    assert_no_errors(&response);
    assert_eq!(response["data"]["memberType"]["discount"], json!(0.2));
}

#[tokio::test]
async fn test_by_id_lookups_return_null_when_absent() {
    let app = TestApp::new();
    let missing = Uuid::new_v4();

    let response = execute_with(
        &app.state,
        "query($id: UUID!) { user(id: $id) { id } post(id: $id) { id } profile(id: $id) { id } }",
        json!({ "id": missing }),
    )
    .await;

    assert_no_errors(&response);
    assert_eq!(
        response["data"],
        json!({ "user": null, "post": null, "profile": null })
    );
}

#[tokio::test]
async fn test_user_with_posts_and_business_profile() {
    let app = TestApp::new();
    let ada = app.user("Ada").await;
    app.post(&ada, "First").await;
    app.post(&ada, "Second").await;
    app.profile(&ada, MemberTypeId::Business).await;
    app.store.reset_calls();

    let response = execute_with(
        &app.state,
        r#"query($id: UUID!) {
            user(id: $id) {
                name
                posts { title }
                profile { memberType { discount } }
            }
        }"#,
        json!({ "id": ada.id }),
    )
    .await;

    assert_no_errors(&response);
    let user = &response["data"]["user"];
    assert_eq!(user["name"], json!("Ada"));
    assert_eq!(
        user["posts"],
        json!([{ "title": "First" }, { "title": "Second" }])
    );
    assert_eq!(user["profile"]["memberType"]["discount"], json!(0.2));

    assert_eq!(app.store.call_count(ops::POSTS_BY_AUTHOR_IDS), 1);
    assert_eq!(app.store.call_count(ops::PROFILES_BY_USER_IDS), 1);
    assert_eq!(app.store.call_count(ops::MEMBER_TYPES_BY_IDS), 1);
}

#[tokio::test]
async fn test_sibling_users_share_one_fetch_per_relation() {
    let app = TestApp::new();
    let mut users = Vec::new();
    for (i, tier) in [
        MemberTypeId::Basic,
        MemberTypeId::Business,
        MemberTypeId::Basic,
        MemberTypeId::Business,
    ]
    .into_iter()
    .enumerate()
    {
        let user = app.user(&format!("user-{}", i)).await;
        app.profile(&user, tier).await;
        app.post(&user, &format!("post-{}", i)).await;
        users.push(user);
    }
    app.subscribe(&users[0], &users[1]).await;
    app.subscribe(&users[2], &users[1]).await;
    app.store.reset_calls();

    let response = execute(
        &app.state,
        r#"{
            users {
                id
                posts { title }
                profile { memberType { id } }
                userSubscribedTo { name }
                subscribedToUser { name }
            }
        }"#,
    )
    .await;

    assert_no_errors(&response);
    let listed = response["data"]["users"].as_array().unwrap();
    assert_eq!(listed.len(), 4);
    assert_eq!(listed[1]["subscribedToUser"].as_array().unwrap().len(), 2);
    assert_eq!(listed[0]["userSubscribedTo"], json!([{ "name": "user-1" }]));
    assert_eq!(listed[3]["profile"]["memberType"]["id"], json!("business"));

    assert_eq!(app.store.call_count(ops::LIST_USERS), 1);
    assert_eq!(app.store.call_count(ops::POSTS_BY_AUTHOR_IDS), 1);
    assert_eq!(app.store.call_count(ops::PROFILES_BY_USER_IDS), 1);
    assert_eq!(app.store.call_count(ops::MEMBER_TYPES_BY_IDS), 1);
    assert_eq!(app.store.call_count(ops::AUTHORS_FOR_SUBSCRIBERS), 1);
    assert_eq!(app.store.call_count(ops::SUBSCRIBERS_FOR_AUTHORS), 1);
}

#[tokio::test]
async fn test_user_without_relations_resolves_empty() {
    let app = TestApp::new();
    let loner = app.user("Loner").await;

    let response = execute_with(
        &app.state,
        "query($id: UUID!) { user(id: $id) { profile { id } posts { id } userSubscribedTo { id } subscribedToUser { id } } }",
        json!({ "id": loner.id }),
    )
    .await;

    assert_no_errors(&response);
    assert_eq!(
        response["data"]["user"],
        json!({ "profile": null, "posts": [], "userSubscribedTo": [], "subscribedToUser": [] })
    );
}

#[tokio::test]
async fn test_repeated_key_in_one_request_is_fetched_once() {
    let app = TestApp::new();
    let ada = app.user("Ada").await;
    app.post(&ada, "Only").await;
    app.store.reset_calls();

    let response = execute_with(
        &app.state,
        "query($id: UUID!) { a: user(id: $id) { posts { title } } b: user(id: $id) { posts { title } } }",
        json!({ "id": ada.id }),
    )
    .await;

    assert_no_errors(&response);
    assert_eq!(response["data"]["a"], response["data"]["b"]);
    assert_eq!(app.store.call_count(ops::POSTS_BY_AUTHOR_IDS), 1);
}

#[tokio::test]
async fn test_sequential_requests_do_not_share_cache() {
    let app = TestApp::new();
    let ada = app.user("Ada").await;
    app.store.reset_calls();

    for _ in 0..2 {
        let response = execute(&app.state, "{ users { posts { id } } }").await;
        assert_no_errors(&response);
    }

    assert_eq!(app.store.call_count(ops::POSTS_BY_AUTHOR_IDS), 2);

    // A post created between requests is visible to the next one
    app.post(&ada, "Later").await;
    let response = execute(&app.state, "{ users { posts { title } } }").await;
    assert_eq!(
        response["data"]["users"][0]["posts"],
        json!([{ "title": "Later" }])
    );
}

#[tokio::test]
async fn test_batch_failure_reaches_every_waiting_field() {
    let app = TestApp::new();
    for name in ["Ada", "Bob", "Cy"] {
        app.user(name).await;
    }
    app.store.fail_on(ops::PROFILES_BY_USER_IDS);

    let response = execute(&app.state, "{ users { name profile { id } } }").await;

    let errors = errors(&response);
    assert_eq!(errors.len(), 3);
    assert!(errors
        .iter()
        .all(|e| e["extensions"]["code"] == json!("INTERNAL_ERROR")));
    assert_eq!(app.store.call_count(ops::PROFILES_BY_USER_IDS), 1);
}

// ==================== Depth limit ====================

#[tokio::test]
async fn test_five_levels_execute() {
    let app = TestApp::new();
    app.user("Ada").await;

    let response = execute(
        &app.state,
        "{ users { userSubscribedTo { userSubscribedTo { userSubscribedTo { id } } } } }",
    )
    .await;

    assert_no_errors(&response);
    assert!(response["data"]["users"].is_array());
}

#[tokio::test]
async fn test_six_levels_are_rejected() {
    let app = TestApp::new();
    app.user("Ada").await;
    app.store.reset_calls();

    let response = execute(
        &app.state,
        "{ users { userSubscribedTo { userSubscribedTo { userSubscribedTo { profile { id } } } } } }",
    )
    .await;

    assert!(response["data"].is_null());
    assert!(!errors(&response).is_empty());
    assert_eq!(app.store.total_calls(), 0);
}

// ==================== Create mutations ====================

#[tokio::test]
async fn test_create_user_defaults_balance() {
    let app = TestApp::new();

    let response = execute(
        &app.state,
        r#"mutation { createUser(dto: { name: "Grace" }) { id name balance } }"#,
    )
    .await;

    assert_no_errors(&response);
    assert_eq!(response["data"]["createUser"]["name"], json!("Grace"));
    assert_eq!(response["data"]["createUser"]["balance"], json!(0.0));
    assert_eq!(app.store.list_users().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_create_post_for_missing_author_is_an_error() {
    let app = TestApp::new();

    let response = execute_with(
        &app.state,
        r#"mutation($author: UUID!) { createPost(dto: { title: "t", content: "c", authorId: $author }) { id } }"#,
        json!({ "author": Uuid::new_v4() }),
    )
    .await;

    assert_eq!(first_error_code(&response).as_deref(), Some("NOT_FOUND"));
}

#[rstest]
#[case::too_old("1899", false)]
#[case::far_future("2999", false)]
#[case::not_an_int("123.321", false)]
#[case::valid("2000", true)]
#[tokio::test]
async fn test_create_profile_year_of_birth(#[case] year: &str, #[case] accepted: bool) {
    let app = TestApp::new();
    let ada = app.user("Ada").await;

    let document = format!(
        r#"mutation {{
            createProfile(dto: {{ isMale: false, yearOfBirth: {}, userId: "{}", memberTypeId: basic }}) {{
                yearOfBirth
                memberType {{ postsLimitPerMonth }}
            }}
        }}"#,
        year, ada.id
    );
    let response = execute(&app.state, &document).await;

    if accepted {
        assert_no_errors(&response);
        assert_eq!(
            response["data"]["createProfile"]["yearOfBirth"],
            json!(2000)
        );
        assert_eq!(
            response["data"]["createProfile"]["memberType"]["postsLimitPerMonth"],
            json!(20)
        );
    } else {
        assert!(!errors(&response).is_empty());
        assert!(app.store.list_profiles().await.unwrap().is_empty());
    }
}

#[tokio::test]
async fn test_current_year_of_birth_is_accepted() {
    let app = TestApp::new();
    let ada = app.user("Ada").await;

    let response = execute_with(
        &app.state,
        "mutation($dto: CreateProfileInput!) { createProfile(dto: $dto) { id } }",
        json!({ "dto": {
            "isMale": true,
            "yearOfBirth": Utc::now().year(),
            "userId": ada.id,
            "memberTypeId": "business",
        }}),
    )
    .await;

    assert_no_errors(&response);
}

#[tokio::test]
async fn test_second_profile_for_user_conflicts() {
    let app = TestApp::new();
    let ada = app.user("Ada").await;
    app.profile(&ada, MemberTypeId::Basic).await;

    let response = execute_with(
        &app.state,
        "mutation($dto: CreateProfileInput!) { createProfile(dto: $dto) { id } }",
        json!({ "dto": {
            "isMale": true,
            "yearOfBirth": 1980,
            "userId": ada.id,
            "memberTypeId": "business",
        }}),
    )
    .await;

    assert_eq!(first_error_code(&response).as_deref(), Some("CONFLICT"));
}

// ==================== Change / delete mutations ====================

#[tokio::test]
async fn test_change_user_updates_only_given_fields() {
    let app = TestApp::new();
    let ada = app.user("Ada").await;

    let response = execute_with(
        &app.state,
        "mutation($id: UUID!) { changeUser(id: $id, dto: { balance: 42.5 }) { name balance } }",
        json!({ "id": ada.id }),
    )
    .await;

    assert_no_errors(&response);
    assert_eq!(
        response["data"]["changeUser"],
        json!({ "name": "Ada", "balance": 42.5 })
    );
}

#[tokio::test]
async fn test_change_profile_validates_year_even_under_soft_policy() {
    let app = TestApp::new();
    let ada = app.user("Ada").await;
    let profile = app.profile(&ada, MemberTypeId::Basic).await;

    let response = execute_with(
        &app.state,
        "mutation($id: UUID!) { changeProfile(id: $id, dto: { yearOfBirth: 1800 }) { id } }",
        json!({ "id": profile.id }),
    )
    .await;

    assert_eq!(
        first_error_code(&response).as_deref(),
        Some("VALIDATION_ERROR")
    );
    assert_eq!(app.store.call_count(ops::UPDATE_PROFILE), 0);
}

#[tokio::test]
async fn test_change_profile_moves_member_type() {
    let app = TestApp::new();
    let ada = app.user("Ada").await;
    let profile = app.profile(&ada, MemberTypeId::Basic).await;

    let response = execute_with(
        &app.state,
        "mutation($id: UUID!) { changeProfile(id: $id, dto: { memberTypeId: business }) { memberTypeId memberType { discount } } }",
        json!({ "id": profile.id }),
    )
    .await;

    assert_no_errors(&response);
    assert_eq!(
        response["data"]["changeProfile"],
        json!({ "memberTypeId": "business", "memberType": { "discount": 0.2 } })
    );
}

#[tokio::test]
#[traced_test]
async fn test_soft_policy_returns_sentinels() {
    let app = TestApp::new();
    let ada = app.user("Ada").await;
    let missing = Uuid::new_v4();

    let response = execute_with(
        &app.state,
        r#"mutation($missing: UUID!, $ada: UUID!) {
            changeUser(id: $missing, dto: { name: "x" }) { id }
            changePost(id: $missing, dto: { title: "x" }) { id }
            deleteProfile(id: $missing)
            unsubscribeFrom(userId: $ada, authorId: $missing)
        }"#,
        json!({ "missing": missing, "ada": ada.id }),
    )
    .await;

    assert_no_errors(&response);
    assert_eq!(
        response["data"],
        json!({
            "changeUser": null,
            "changePost": null,
            "deleteProfile": false,
            "unsubscribeFrom": false,
        })
    );

    // Each swallowed failure leaves a warning naming the mutation
    assert!(logs_contain("Mutation failed, returning empty result"));
    for operation in ["changeUser", "changePost", "deleteProfile", "unsubscribeFrom"] {
        assert!(logs_contain(operation), "no warning for {}", operation);
    }
}

#[tokio::test]
async fn test_strict_policy_surfaces_errors() {
    let app = TestApp::with_policy(MutationFailurePolicy::Strict);
    let ada = app.user("Ada").await;
    let missing = Uuid::new_v4();

    let change = execute_with(
        &app.state,
        r#"mutation($id: UUID!) { changeUser(id: $id, dto: { name: "x" }) { id } }"#,
        json!({ "id": missing }),
    )
    .await;
    assert_eq!(first_error_code(&change).as_deref(), Some("NOT_FOUND"));

    let unsubscribe = execute_with(
        &app.state,
        "mutation($a: UUID!, $b: UUID!) { unsubscribeFrom(userId: $a, authorId: $b) }",
        json!({ "a": ada.id, "b": missing }),
    )
    .await;
    assert_eq!(first_error_code(&unsubscribe).as_deref(), Some("NOT_FOUND"));
}

#[tokio::test]
async fn test_delete_user_cascades() {
    let app = TestApp::new();
    let ada = app.user("Ada").await;
    let bob = app.user("Bob").await;
    app.profile(&ada, MemberTypeId::Basic).await;
    app.post(&ada, "Gone soon").await;
    app.subscribe(&bob, &ada).await;
    app.subscribe(&ada, &bob).await;

    let response = execute_with(
        &app.state,
        "mutation($id: UUID!) { deleteUser(id: $id) }",
        json!({ "id": ada.id }),
    )
    .await;
    assert_no_errors(&response);
    assert_eq!(response["data"]["deleteUser"], json!(true));

    let response = execute(
        &app.state,
        "{ users { name userSubscribedTo { id } subscribedToUser { id } } profiles { id } posts { id } }",
    )
    .await;
    assert_no_errors(&response);
    assert_eq!(
        response["data"],
        json!({
            "users": [{ "name": "Bob", "userSubscribedTo": [], "subscribedToUser": [] }],
            "profiles": [],
            "posts": [],
        })
    );
}

// ==================== Subscriptions ====================

#[tokio::test]
async fn test_subscribe_and_unsubscribe() {
    let app = TestApp::new();
    let ada = app.user("Ada").await;
    let bob = app.user("Bob").await;
    let vars = json!({ "user": ada.id, "author": bob.id });

    let subscribed = execute_with(
        &app.state,
        "mutation($user: UUID!, $author: UUID!) { subscribeTo(userId: $user, authorId: $author) { name userSubscribedTo { name } } }",
        vars.clone(),
    )
    .await;
    assert_no_errors(&subscribed);
    assert_eq!(
        subscribed["data"]["subscribeTo"],
        json!({ "name": "Ada", "userSubscribedTo": [{ "name": "Bob" }] })
    );

    // Subscribing twice is a conflict, reported as null under the soft policy
    let again = execute_with(
        &app.state,
        "mutation($user: UUID!, $author: UUID!) { subscribeTo(userId: $user, authorId: $author) { id } }",
        vars.clone(),
    )
    .await;
    assert_no_errors(&again);
    assert!(again["data"]["subscribeTo"].is_null());

    let unsubscribed = execute_with(
        &app.state,
        "mutation($user: UUID!, $author: UUID!) { unsubscribeFrom(userId: $user, authorId: $author) }",
        vars,
    )
    .await;
    assert_eq!(unsubscribed["data"]["unsubscribeFrom"], json!(true));
    assert!(app
        .store
        .authors_for_subscribers(&[ada.id])
        .await
        .unwrap()
        .is_empty());
}
