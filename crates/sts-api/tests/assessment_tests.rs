use axum::http::StatusCode;
use chrono::{Duration, Utc};
use serde_json::{Value, json};
use sts_db::repositories::stats as stats_repo;

use crate::common::{TestApp, TestUser};

async fn schedule_test(app: &TestApp, lead: &TestUser, course_id: i64, days_ahead: i64) -> Value {
    let response = app
        .post(
            &format!("/api/courses/{course_id}/tests"),
            &lead.token,
            json!({
                "name": "Unit Quiz",
                "test_date": Utc::now() + Duration::days(days_ahead),
                "test_type": "multiple_choice",
                "question_count": 20,
            }),
        )
        .await;
    response.assert_status(StatusCode::CREATED);
    response.json()
}

#[tokio::test]
async fn test_only_lead_schedules_tests() {
    let app = TestApp::spawn().await;
    let lead = app.register("lead").await;
    let student = app.register("student").await;
    let group_id = app.create_group(&lead, true).await;
    app.join(&student, group_id).await;
    let course_id = app.create_course(&lead, group_id).await;

    app.post(
        &format!("/api/courses/{course_id}/tests"),
        &student.token,
        json!({
            "name": "Pop Quiz",
            "test_date": Utc::now() + Duration::days(1),
            "test_type": "essay",
            "question_count": 1,
        }),
    )
    .await
    .assert_status(StatusCode::FORBIDDEN);

    let invalid = app
        .post(
            &format!("/api/courses/{course_id}/tests"),
            &lead.token,
            json!({
                "name": "Broken",
                "test_date": Utc::now() + Duration::days(1),
                "test_type": "oral",
                "question_count": 0,
            }),
        )
        .await;
    invalid.assert_status(StatusCode::BAD_REQUEST);

    let test = schedule_test(&app, &lead, course_id, 3).await;
    assert_eq!(test["test_type"], "multiple_choice");
}

#[tokio::test]
async fn test_upcoming_tests_span_groups_in_date_order() {
    let app = TestApp::spawn().await;
    let lead = app.register("lead").await;
    let other_lead = app.register("otherlead").await;
    let student = app.register("student").await;

    let group_a = app.create_group(&lead, true).await;
    let group_b = app.create_group(&other_lead, true).await;
    let unrelated = app.create_group(&other_lead, true).await;
    app.join(&student, group_a).await;
    app.join(&student, group_b).await;

    let course_a = app.create_course(&lead, group_a).await;
    let course_b = app.create_course(&other_lead, group_b).await;
    let course_x = app.create_course(&other_lead, unrelated).await;

    let later = schedule_test(&app, &lead, course_a, 10).await;
    let sooner = schedule_test(&app, &other_lead, course_b, 2).await;
    let past = schedule_test(&app, &lead, course_a, -1).await;
    let elsewhere = schedule_test(&app, &other_lead, course_x, 1).await;

    let upcoming: Value = app.get("/api/tests/upcoming", &student.token).await.json();
    let ids: Vec<i64> = upcoming
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["id"].as_i64().unwrap())
        .collect();

    assert_eq!(
        ids,
        vec![sooner["id"].as_i64().unwrap(), later["id"].as_i64().unwrap()]
    );
    assert!(!ids.contains(&past["id"].as_i64().unwrap()));
    assert!(!ids.contains(&elsewhere["id"].as_i64().unwrap()));
}

#[tokio::test]
async fn test_results_add_to_score_total() {
    let app = TestApp::spawn().await;
    let lead = app.register("lead").await;
    let student = app.register("student").await;
    let group_id = app.create_group(&lead, true).await;
    app.join(&student, group_id).await;
    let course_id = app.create_course(&lead, group_id).await;
    let test_id = schedule_test(&app, &lead, course_id, 1).await["id"]
        .as_i64()
        .unwrap();

    for score in [70, 85] {
        app.post(
            &format!("/api/tests/{test_id}/results"),
            &student.token,
            json!({ "score": score, "answers": { "q1": "b" } }),
        )
        .await
        .assert_status(StatusCode::CREATED);
    }

    app.post(
        &format!("/api/tests/{test_id}/results"),
        &student.token,
        json!({ "score": -5 }),
    )
    .await
    .assert_status(StatusCode::BAD_REQUEST);

    let stats = stats_repo::find_user_stats(app.pool(), student.id, group_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stats.test_score_total, 155);
    assert_eq!(stats.total_points, 155);

    let own: Value = app
        .get(&format!("/api/tests/{test_id}/results"), &student.token)
        .await
        .json();
    assert_eq!(own.as_array().unwrap().len(), 2);

    let lead_view: Value = app
        .get(&format!("/api/tests/{test_id}/results"), &lead.token)
        .await
        .json();
    assert!(lead_view.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_lead_edits_and_deletes_tests() {
    let app = TestApp::spawn().await;
    let lead = app.register("lead").await;
    let student = app.register("student").await;
    let group_id = app.create_group(&lead, true).await;
    app.join(&student, group_id).await;
    let course_id = app.create_course(&lead, group_id).await;
    let test_id = schedule_test(&app, &lead, course_id, 5).await["id"]
        .as_i64()
        .unwrap();

    app.patch(
        &format!("/api/tests/{test_id}"),
        &student.token,
        json!({ "question_count": 5 }),
    )
    .await
    .assert_status(StatusCode::FORBIDDEN);

    let updated: Value = app
        .patch(
            &format!("/api/tests/{test_id}"),
            &lead.token,
            json!({ "question_count": 25 }),
        )
        .await
        .json();
    assert_eq!(updated["question_count"], 25);
    assert_eq!(updated["name"], "Unit Quiz");

    app.delete(&format!("/api/tests/{test_id}"), &lead.token)
        .await
        .assert_status(StatusCode::NO_CONTENT);
    app.get(&format!("/api/tests/{test_id}"), &student.token)
        .await
        .assert_status(StatusCode::NOT_FOUND);
}
