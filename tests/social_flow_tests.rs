// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! End-to-end sharing flows over the HTTP API.

use axum::http::StatusCode;
use serde_json::{json, Value};

mod common;
use common::{create_test_app, seed_project, seed_user, send};

async fn track(app: &axum::Router, project_id: &str, platform: &str, event_type: &str) {
    let (status, body) = send(
        app,
        "POST",
        "/api/social/track",
        None,
        Some(json!({
            "project_id": project_id,
            "platform": platform,
            "event_type": event_type
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{:?}", body);
}

#[tokio::test]
async fn test_register_authorize_track_stats() {
    let (app, _) = create_test_app();

    // Register and log in
    let (status, _) = send(
        &app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({
            "email": "ambassador@visual.app",
            "password": "promote me please",
            "full_name": "Ada Ambassador"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, body) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({"email": "ambassador@visual.app", "password": "promote me please"})),
    )
    .await;
    let token = body["access_token"].as_str().unwrap().to_string();

    // Create project "Demo"
    let (status, project) = send(
        &app,
        "POST",
        "/api/projects",
        Some(&token),
        Some(json!({"title": "Demo", "description": "A short film"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let project_id = project["id"].as_str().unwrap().to_string();

    // Authorize youtube + tiktok
    let (status, body) = send(
        &app,
        "POST",
        "/api/social/authorize",
        Some(&token),
        Some(json!({"project_id": project_id, "platforms": ["youtube", "tiktok"]})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["badge_granted"], true);
    assert_eq!(body["platforms"], json!(["youtube", "tiktok"]));
    assert_eq!(
        body["links"]["youtube"],
        format!(
            "https://visual.app/project/{0}?utm_source=youtube&utm_medium=official_social&utm_campaign=project_{0}",
            project_id
        )
    );
    assert!(body["links"].get("facebook").is_none());

    // Badge and points landed on the profile
    let (_, me) = send(&app, "GET", "/api/auth/me", Some(&token), None).await;
    assert_eq!(me["visupoints"], 100);
    assert_eq!(me["badges"], json!(["Ambassadeur VISUAL"]));

    // 3 views + 1 click on youtube
    for _ in 0..3 {
        track(&app, &project_id, "youtube", "view").await;
    }
    track(&app, &project_id, "youtube", "click").await;

    let (status, stats) = send(
        &app,
        "GET",
        &format!("/api/social/stats/{}", project_id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["total_views"], 3);
    assert_eq!(stats["total_clicks"], 1);

    let by_platform: Vec<(String, u64, u64)> = stats["by_platform"]
        .as_array()
        .unwrap()
        .iter()
        .map(|row| {
            (
                row["platform"].as_str().unwrap().to_string(),
                row["views"].as_u64().unwrap(),
                row["clicks"].as_u64().unwrap(),
            )
        })
        .collect();
    assert_eq!(
        by_platform,
        vec![
            ("youtube".to_string(), 3, 1),
            ("tiktok".to_string(), 0, 0)
        ]
    );
}

#[tokio::test]
async fn test_reauthorize_keeps_single_record_and_reward() {
    let (app, state) = create_test_app();
    let (user, token) = seed_user(&state, "again@visual.app", "Again").await;
    let project = seed_project(&state, &user.id, "Demo").await;

    let authorize = |platforms: Value| {
        let app = app.clone();
        let token = token.clone();
        let project_id = project.id.clone();
        async move {
            send(
                &app,
                "POST",
                "/api/social/authorize",
                Some(&token),
                Some(json!({"project_id": project_id, "platforms": platforms})),
            )
            .await
        }
    };

    let (_, first) = authorize(json!(["youtube"])).await;
    assert_eq!(first["badge_granted"], true);

    track(&app, &project.id, "youtube", "view").await;

    let (status, second) = authorize(json!(["youtube", "facebook"])).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["badge_granted"], false);

    let (_, list) = send(&app, "GET", "/api/social/authorizations", Some(&token), None).await;
    let authorizations = list["authorizations"].as_array().unwrap();
    assert_eq!(authorizations.len(), 1);
    assert_eq!(authorizations[0]["platforms"], json!(["youtube", "facebook"]));

    // Reward granted exactly once
    let user = state.db.get_user(&user.id).await.unwrap().unwrap();
    assert_eq!(user.visupoints, 100);
    assert_eq!(user.badges, vec!["Ambassadeur VISUAL".to_string()]);

    // Existing counters survive re-authorization
    let (_, stats) = send(
        &app,
        "GET",
        &format!("/api/social/stats/{}", project.id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(stats["total_views"], 1);
    assert_eq!(stats["by_platform"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_revoke_then_links_not_found() {
    let (app, state) = create_test_app();
    let (user, token) = seed_user(&state, "revoker@visual.app", "Revoker").await;
    let project = seed_project(&state, &user.id, "Demo").await;

    send(
        &app,
        "POST",
        "/api/social/authorize",
        Some(&token),
        Some(json!({"project_id": project.id, "platforms": ["facebook"]})),
    )
    .await;

    let links_uri = format!("/api/social/links/{}", project.id);
    let (status, links) = send(&app, "GET", &links_uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(links["links"]["facebook"]
        .as_str()
        .unwrap()
        .contains("utm_source=facebook"));

    let (status, _) = send(
        &app,
        "POST",
        &format!("/api/social/revoke?project_id={}", project.id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, "GET", &links_uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, list) = send(&app, "GET", "/api/social/authorizations", Some(&token), None).await;
    assert_eq!(list["authorizations"], json!([]));

    // The record is soft-deleted, not removed
    let stored = state
        .db
        .get_authorization(&user.id, &project.id)
        .await
        .unwrap()
        .unwrap();
    assert!(stored.revoked);
    assert!(stored.revoked_at.is_some());
}

#[tokio::test]
async fn test_revoke_without_authorization() {
    let (app, state) = create_test_app();
    let (_, token) = seed_user(&state, "none@visual.app", "None").await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/social/revoke?project_id=missing",
        Some(&token),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_other_users_project_is_hidden() {
    let (app, state) = create_test_app();
    let (owner, _) = seed_user(&state, "owner@visual.app", "Owner").await;
    let (_, intruder_token) = seed_user(&state, "intruder@visual.app", "Intruder").await;
    let project = seed_project(&state, &owner.id, "Private").await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/social/authorize",
        Some(&intruder_token),
        Some(json!({"project_id": project.id, "platforms": ["youtube"]})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    for uri in [
        format!("/api/social/stats/{}", project.id),
        format!("/api/social/links/{}", project.id),
        format!("/api/projects/{}", project.id),
    ] {
        let (status, _) = send(&app, "GET", &uri, Some(&intruder_token), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{}", uri);
    }
}

#[tokio::test]
async fn test_track_unknown_project_accepted() {
    let (app, state) = create_test_app();

    track(&app, "no-such-project", "tiktok", "click").await;

    let rows = state.db.stats_for_project("no-such-project").await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].clicks, 1);
    assert_eq!(rows[0].views, 0);
}

#[tokio::test]
async fn test_project_crud() {
    let (app, state) = create_test_app();
    let (_, token) = seed_user(&state, "crud@visual.app", "Crud").await;

    let (status, created) = send(
        &app,
        "POST",
        "/api/projects",
        Some(&token),
        Some(json!({
            "title": "First cut",
            "description": "Draft",
            "video_url": "https://cdn.visual.app/first.mp4"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_str().unwrap().to_string();

    let (status, updated) = send(
        &app,
        "PUT",
        &format!("/api/projects/{}", id),
        Some(&token),
        Some(json!({"title": "Final cut"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["title"], "Final cut");
    assert_eq!(updated["description"], "Draft");
    assert_eq!(updated["video_url"], "https://cdn.visual.app/first.mp4");

    let (_, list) = send(&app, "GET", "/api/projects", Some(&token), None).await;
    assert_eq!(list["projects"].as_array().unwrap().len(), 1);
    assert_eq!(list["projects"][0]["title"], "Final cut");
}

#[tokio::test]
async fn test_platform_specs() {
    let (app, _) = create_test_app();

    let (status, body) = send(&app, "GET", "/api/social/platforms", None, None).await;

    assert_eq!(status, StatusCode::OK);
    let platforms = body["platforms"].as_array().unwrap();
    assert_eq!(platforms.len(), 3);
    assert_eq!(platforms[1]["platform"], "tiktok");
    assert_eq!(platforms[1]["aspect_ratio"], "9:16");
    assert_eq!(platforms[1]["duration_secs"], 30);
}
