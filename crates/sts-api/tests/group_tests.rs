use axum::http::StatusCode;
use serde_json::{Value, json};

use crate::common::{TestApp, db};

#[tokio::test]
async fn test_create_group_makes_creator_lead_member() {
    let app = TestApp::spawn().await;
    let lead = app.register("lead").await;

    let group_id = app.create_group(&lead, false).await;

    let group: Value = app
        .get(&format!("/api/groups/{group_id}"), &lead.token)
        .await
        .json();
    assert_eq!(group["lead_id"], lead.id);

    let members: Value = app
        .get(&format!("/api/groups/{group_id}/members"), &lead.token)
        .await
        .json();
    let members = members.as_array().unwrap();
    assert_eq!(members.len(), 1);
    assert_eq!(members[0]["user_id"], lead.id);
    assert_eq!(members[0]["role"], "lead");

    let listed: Value = app.get("/api/groups", &lead.token).await.json();
    assert!(
        listed
            .as_array()
            .unwrap()
            .iter()
            .any(|g| g["id"] == group_id)
    );
}

#[tokio::test]
async fn test_join_public_group_is_immediate() {
    let app = TestApp::spawn().await;
    let lead = app.register("lead").await;
    let student = app.register("student").await;
    let group_id = app.create_group(&lead, true).await;

    let response = app
        .post(&format!("/api/groups/{group_id}/join"), &student.token, json!({}))
        .await;

    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();
    assert_eq!(body["status"], "joined");
    assert_eq!(body["membership"]["role"], "member");
    assert_eq!(
        db::count_join_requests(app.pool(), group_id, student.id)
            .await
            .unwrap(),
        0
    );

    let again = app
        .post(&format!("/api/groups/{group_id}/join"), &student.token, json!({}))
        .await;
    again.assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_private_group_join_request_workflow() {
    let app = TestApp::spawn().await;
    let lead = app.register("lead").await;
    let student = app.register("student").await;
    let group_id = app.create_group(&lead, false).await;

    let response = app
        .post(&format!("/api/groups/{group_id}/join"), &student.token, json!({}))
        .await;
    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();
    assert_eq!(body["status"], "pending");
    let request_id = body["request"]["id"].as_i64().unwrap();

    // A second attempt while pending fails and creates nothing
    let duplicate = app
        .post(&format!("/api/groups/{group_id}/join"), &student.token, json!({}))
        .await;
    duplicate.assert_status(StatusCode::CONFLICT);
    assert_eq!(
        db::count_join_requests(app.pool(), group_id, student.id)
            .await
            .unwrap(),
        1
    );

    // Only the lead sees and resolves requests
    app.get(&format!("/api/groups/{group_id}/join-requests"), &student.token)
        .await
        .assert_status(StatusCode::FORBIDDEN);
    app.patch(
        &format!("/api/join-requests/{request_id}"),
        &student.token,
        json!({ "status": "accepted" }),
    )
    .await
    .assert_status(StatusCode::FORBIDDEN);

    let pending: Value = app
        .get(&format!("/api/groups/{group_id}/join-requests"), &lead.token)
        .await
        .json();
    assert_eq!(pending.as_array().unwrap().len(), 1);

    let accepted = app
        .patch(
            &format!("/api/join-requests/{request_id}"),
            &lead.token,
            json!({ "status": "accepted" }),
        )
        .await;
    accepted.assert_status(StatusCode::OK);
    assert_eq!(accepted.json::<Value>()["status"], "accepted");
    assert_eq!(
        db::count_members(app.pool(), group_id, student.id)
            .await
            .unwrap(),
        1
    );

    // Terminal states stay terminal
    app.patch(
        &format!("/api/join-requests/{request_id}"),
        &lead.token,
        json!({ "status": "rejected" }),
    )
    .await
    .assert_status(StatusCode::CONFLICT);

    let members: Value = app
        .get(&format!("/api/groups/{group_id}/members"), &student.token)
        .await
        .json();
    assert_eq!(members.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_rejected_request_adds_no_member() {
    let app = TestApp::spawn().await;
    let lead = app.register("lead").await;
    let student = app.register("student").await;
    let group_id = app.create_group(&lead, false).await;

    let body: Value = app
        .post(&format!("/api/groups/{group_id}/join"), &student.token, json!({}))
        .await
        .json();
    let request_id = body["request"]["id"].as_i64().unwrap();

    let bad_status = app
        .patch(
            &format!("/api/join-requests/{request_id}"),
            &lead.token,
            json!({ "status": "pending" }),
        )
        .await;
    bad_status.assert_status(StatusCode::BAD_REQUEST);

    let rejected = app
        .patch(
            &format!("/api/join-requests/{request_id}"),
            &lead.token,
            json!({ "status": "rejected" }),
        )
        .await;
    rejected.assert_status(StatusCode::OK);
    assert_eq!(
        db::count_members(app.pool(), group_id, student.id)
            .await
            .unwrap(),
        0
    );

    // Non-members cannot read group content
    app.get(&format!("/api/groups/{group_id}/courses"), &student.token)
        .await
        .assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_group_settings_are_lead_only() {
    let app = TestApp::spawn().await;
    let lead = app.register("lead").await;
    let student = app.register("student").await;
    let group_id = app.create_group(&lead, true).await;
    app.join(&student, group_id).await;

    app.patch(
        &format!("/api/groups/{group_id}"),
        &student.token,
        json!({ "name": "Hijacked" }),
    )
    .await
    .assert_status(StatusCode::FORBIDDEN);

    app.post(
        &format!("/api/groups/{group_id}/courses"),
        &student.token,
        json!({ "name": "Not allowed" }),
    )
    .await
    .assert_status(StatusCode::FORBIDDEN);

    let updated = app
        .patch(
            &format!("/api/groups/{group_id}"),
            &lead.token,
            json!({ "name": "Molecular Biology", "is_public": false }),
        )
        .await;
    updated.assert_status(StatusCode::OK);
    let body: Value = updated.json();
    assert_eq!(body["name"], "Molecular Biology");
    assert_eq!(body["is_public"], false);

    app.delete(&format!("/api/groups/{group_id}"), &student.token)
        .await
        .assert_status(StatusCode::FORBIDDEN);
    app.delete(&format!("/api/groups/{group_id}"), &lead.token)
        .await
        .assert_status(StatusCode::NO_CONTENT);
    app.get(&format!("/api/groups/{group_id}"), &lead.token)
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_missing_group_is_not_found() {
    let app = TestApp::spawn().await;
    let user = app.register("ghost").await;

    let response = app
        .post("/api/groups/999999999/join", &user.token, json!({}))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_concurrent_private_joins_file_one_request() {
    let app = TestApp::spawn().await;
    let lead = app.register("lead").await;
    let student = app.register("student").await;
    let group_id = app.create_group(&lead, false).await;

    let uri = format!("/api/groups/{group_id}/join");
    let (first, second) = tokio::join!(
        app.post(&uri, &student.token, json!({})),
        app.post(&uri, &student.token, json!({})),
    );

    let mut statuses = [first.status.as_u16(), second.status.as_u16()];
    statuses.sort_unstable();
    assert_eq!(statuses, [201, 409]);
    let loser = if first.status == StatusCode::CONFLICT {
        &first
    } else {
        &second
    };
    assert_eq!(loser.error_code(), "conflict");
    assert_eq!(
        db::count_join_requests(app.pool(), group_id, student.id)
            .await
            .unwrap(),
        1
    );
}

#[tokio::test]
async fn test_lead_without_membership_row_still_sees_group() {
    let app = TestApp::spawn().await;
    let lead = app.register("lead").await;
    let group_id = app.create_group(&lead, true).await;
    db::remove_membership(app.pool(), group_id, lead.id)
        .await
        .unwrap();

    let listed: Value = app.get("/api/groups", &lead.token).await.json();
    let matches = listed
        .as_array()
        .unwrap()
        .iter()
        .filter(|g| g["id"] == group_id)
        .count();
    assert_eq!(matches, 1);

    // Still treated as a member for group content
    app.get(&format!("/api/groups/{group_id}/courses"), &lead.token)
        .await
        .assert_status(StatusCode::OK);
}

#[tokio::test]
async fn test_non_numeric_id_is_invalid_data() {
    let app = TestApp::spawn().await;
    let user = app.register("typo").await;

    let response = app.get("/api/groups/abc", &user.token).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), "invalid_data");
}
