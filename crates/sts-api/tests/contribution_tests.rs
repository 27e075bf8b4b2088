use axum::http::StatusCode;
use futures::future::join_all;
use serde_json::{Value, json};
use sts_db::repositories::stats as stats_repo;

use crate::common::TestApp;

async fn add_card(app: &TestApp, token: &str, deck_id: i64, question: &str) -> Value {
    let response = app
        .post(
            &format!("/api/flashcard-decks/{deck_id}/flashcards"),
            token,
            json!({
                "question": question,
                "answer": "Adenine pairs with thymine",
                "tags": ["dna", " dna ", "pairs"],
            }),
        )
        .await;
    response.assert_status(StatusCode::CREATED);
    response.json()
}

#[tokio::test]
async fn test_flashcards_credit_contributions() {
    let app = TestApp::spawn().await;
    let lead = app.register("lead").await;
    let student = app.register("student").await;
    let group_id = app.create_group(&lead, true).await;
    app.join(&student, group_id).await;
    let course_id = app.create_course(&lead, group_id).await;
    let deck_id = app.create_deck(&student, course_id).await;

    assert!(
        stats_repo::find_user_stats(app.pool(), student.id, group_id)
            .await
            .unwrap()
            .is_none()
    );

    let card = add_card(&app, &student.token, deck_id, "What pairs with A?").await;
    assert_eq!(card["tags"], json!(["dna", "pairs"]));
    add_card(&app, &student.token, deck_id, "What pairs with G?").await;
    add_card(&app, &student.token, deck_id, "What is a codon?").await;

    let stats = stats_repo::find_user_stats(app.pool(), student.id, group_id)
        .await
        .unwrap()
        .expect("stats row created on first contribution");
    assert_eq!(stats.flashcard_contributions, 3);
    assert_eq!(stats.total_points, 15);

    let cards: Value = app
        .get(&format!("/api/flashcard-decks/{deck_id}/flashcards"), &lead.token)
        .await
        .json();
    assert_eq!(cards.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_concurrent_contributions_are_all_counted() {
    let app = TestApp::spawn().await;
    let lead = app.register("lead").await;
    let student = app.register("student").await;
    let group_id = app.create_group(&lead, true).await;
    app.join(&student, group_id).await;
    let course_id = app.create_course(&lead, group_id).await;
    let deck_id = app.create_deck(&student, course_id).await;

    let uri = format!("/api/flashcard-decks/{deck_id}/flashcards");
    let responses = join_all((0..25).map(|i| {
        app.post(
            &uri,
            &student.token,
            json!({ "question": format!("Card {i}?"), "answer": "A" }),
        )
    }))
    .await;
    for response in &responses {
        response.assert_status(StatusCode::CREATED);
    }

    let stats = stats_repo::find_user_stats(app.pool(), student.id, group_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stats.flashcard_contributions, 25);
    assert_eq!(stats.total_points, 125);
}

#[tokio::test]
async fn test_card_writes_refresh_deck() {
    let app = TestApp::spawn().await;
    let lead = app.register("lead").await;
    let group_id = app.create_group(&lead, true).await;
    let course_id = app.create_course(&lead, group_id).await;
    let deck_id = app.create_deck(&lead, course_id).await;
    let deck_uri = format!("/api/flashcard-decks/{deck_id}");

    let before: Value = app.get(&deck_uri, &lead.token).await.json();
    let card = add_card(&app, &lead.token, deck_id, "Touch?").await;
    let after_create: Value = app.get(&deck_uri, &lead.token).await.json();
    assert_ne!(after_create["updated_at"], before["updated_at"]);

    let stats = stats_repo::find_user_stats(app.pool(), lead.id, group_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stats.flashcard_contributions, 1);

    app.delete(&format!("/api/flashcards/{}", card["id"]), &lead.token)
        .await
        .assert_status(StatusCode::NO_CONTENT);
    let after_delete: Value = app.get(&deck_uri, &lead.token).await.json();
    assert_ne!(after_delete["updated_at"], after_create["updated_at"]);
}

#[tokio::test]
async fn test_non_member_cannot_contribute() {
    let app = TestApp::spawn().await;
    let lead = app.register("lead").await;
    let outsider = app.register("outsider").await;
    let group_id = app.create_group(&lead, true).await;
    let course_id = app.create_course(&lead, group_id).await;
    let deck_id = app.create_deck(&lead, course_id).await;

    app.post(
        &format!("/api/courses/{course_id}/flashcard-decks"),
        &outsider.token,
        json!({ "name": "Sneaky" }),
    )
    .await
    .assert_status(StatusCode::FORBIDDEN);

    app.post(
        &format!("/api/flashcard-decks/{deck_id}/flashcards"),
        &outsider.token,
        json!({ "question": "Q", "answer": "A" }),
    )
    .await
    .assert_status(StatusCode::FORBIDDEN);

    assert!(
        stats_repo::find_user_stats(app.pool(), outsider.id, group_id)
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn test_card_edits_limited_to_author_or_lead() {
    let app = TestApp::spawn().await;
    let lead = app.register("lead").await;
    let author = app.register("author").await;
    let peer = app.register("peer").await;
    let group_id = app.create_group(&lead, true).await;
    app.join(&author, group_id).await;
    app.join(&peer, group_id).await;
    let course_id = app.create_course(&lead, group_id).await;
    let deck_id = app.create_deck(&author, course_id).await;
    let card = add_card(&app, &author.token, deck_id, "Original?").await;
    let card_id = card["id"].as_i64().unwrap();

    app.patch(
        &format!("/api/flashcards/{card_id}"),
        &peer.token,
        json!({ "answer": "Vandalised" }),
    )
    .await
    .assert_status(StatusCode::FORBIDDEN);

    let edited = app
        .patch(
            &format!("/api/flashcards/{card_id}"),
            &author.token,
            json!({ "answer": "Refined" }),
        )
        .await;
    edited.assert_status(StatusCode::OK);
    let edited: Value = edited.json();
    assert_eq!(edited["answer"], "Refined");
    assert_eq!(edited["question"], "Original?");
    assert_ne!(edited["updated_at"], card["updated_at"]);

    app.patch(
        &format!("/api/flashcard-decks/{deck_id}"),
        &lead.token,
        json!({ "description": "Curated by the lead" }),
    )
    .await
    .assert_status(StatusCode::OK);

    app.delete(&format!("/api/flashcards/{card_id}"), &lead.token)
        .await
        .assert_status(StatusCode::NO_CONTENT);
    app.delete(&format!("/api/flashcards/{card_id}"), &lead.token)
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_leaderboard_ranks_by_points() {
    let app = TestApp::spawn().await;
    let lead = app.register("lead").await;
    let first = app.register("first").await;
    let second = app.register("second").await;
    let group_id = app.create_group(&lead, true).await;
    app.join(&first, group_id).await;
    app.join(&second, group_id).await;
    let course_id = app.create_course(&lead, group_id).await;
    let deck_id = app.create_deck(&lead, course_id).await;

    add_card(&app, &second.token, deck_id, "One?").await;
    for q in ["Two?", "Three?"] {
        add_card(&app, &first.token, deck_id, q).await;
    }

    let response = app
        .get(&format!("/api/groups/{group_id}/leaderboard"), &lead.token)
        .await;
    response.assert_status(StatusCode::OK);
    let board: Value = response.json();
    let board = board.as_array().unwrap();
    assert_eq!(board.len(), 2);
    assert_eq!(board[0]["rank"], 1);
    assert_eq!(board[0]["user"]["id"], first.id);
    assert_eq!(board[0]["user"]["username"], first.username.as_str());
    assert_eq!(board[0]["total_points"], 10);
    assert_eq!(board[1]["user"]["id"], second.id);

    let limited: Value = app
        .get(
            &format!("/api/groups/{group_id}/leaderboard?limit=1"),
            &lead.token,
        )
        .await
        .json();
    assert_eq!(limited.as_array().unwrap().len(), 1);

    app.get(
        &format!("/api/groups/{group_id}/leaderboard?limit=lots"),
        &lead.token,
    )
    .await
    .assert_status(StatusCode::BAD_REQUEST);
}
