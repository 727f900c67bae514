//! E2E tests for wedding planning CRUD and dashboard stats

mod common;

use common::TestServer;

#[tokio::test]
async fn test_planning_routes_require_session() {
    let server = TestServer::new().await;

    let response = server
        .client
        .get(server.url("/api/weddings"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 401);

    let response = server
        .client
        .post(server.url("/api/weddings"))
        .json(&serde_json::json!({
            "couple_names": "Priya & Rahul",
            "date": "2026-11-21",
            "city": "Jaipur",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 401);
}

#[tokio::test]
async fn test_create_wedding_seeds_owner_team_member() {
    let server = TestServer::new().await;
    let user_id = server
        .signup("Priya Sharma", "priya@example.com", "hunter2hunter2")
        .await;
    let wedding_id = server.create_wedding("Priya & Rahul").await;

    let response = server
        .client
        .get(server.url(&format!("/api/weddings/{}/team", wedding_id)))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let team: serde_json::Value = response.json().await.unwrap();
    let members = team.as_array().unwrap();
    assert_eq!(members.len(), 1);
    assert_eq!(members[0]["role"], "owner");
    assert_eq!(members[0]["user_id"], user_id.as_str());
    assert_eq!(members[0]["name"], "Priya Sharma");
    assert_eq!(members[0]["email"], "priya@example.com");
}

#[tokio::test]
async fn test_list_weddings_scoped_to_owner() {
    let server = TestServer::new().await;
    server
        .signup("Priya Sharma", "priya@example.com", "hunter2hunter2")
        .await;
    let wedding_id = server.create_wedding("Priya & Rahul").await;

    let response = server
        .client
        .get(server.url("/api/weddings"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let weddings: serde_json::Value = response.json().await.unwrap();
    assert_eq!(weddings.as_array().unwrap().len(), 1);
    assert_eq!(weddings[0]["id"], wedding_id.as_str());

    // A different user sees an empty list.
    server
        .client
        .post(server.url("/api/auth/logout"))
        .send()
        .await
        .unwrap();
    server
        .signup("Anita Desai", "anita@example.com", "hunter2hunter2")
        .await;

    let response = server
        .client
        .get(server.url("/api/weddings"))
        .send()
        .await
        .unwrap();
    let weddings: serde_json::Value = response.json().await.unwrap();
    assert!(weddings.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_update_wedding_rejects_empty_patch() {
    let server = TestServer::new().await;
    server
        .signup("Priya Sharma", "priya@example.com", "hunter2hunter2")
        .await;
    let wedding_id = server.create_wedding("Priya & Rahul").await;

    let response = server
        .client
        .patch(server.url(&format!("/api/weddings/{}", wedding_id)))
        .json(&serde_json::json!({}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "No updates provided");
}

#[tokio::test]
async fn test_update_wedding_partial_fields() {
    let server = TestServer::new().await;
    server
        .signup("Priya Sharma", "priya@example.com", "hunter2hunter2")
        .await;
    let wedding_id = server.create_wedding("Priya & Rahul").await;

    let response = server
        .client
        .patch(server.url(&format!("/api/weddings/{}", wedding_id)))
        .json(&serde_json::json!({ "city": "Udaipur" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let wedding: serde_json::Value = response.json().await.unwrap();
    assert_eq!(wedding["city"], "Udaipur");
    // Untouched fields survive the partial update.
    assert_eq!(wedding["couple_names"], "Priya & Rahul");
    assert_eq!(wedding["total_budget"], 500000);
}

#[tokio::test]
async fn test_guest_crud_and_validation() {
    let server = TestServer::new().await;
    server
        .signup("Priya Sharma", "priya@example.com", "hunter2hunter2")
        .await;
    let wedding_id = server.create_wedding("Priya & Rahul").await;
    let guests_url = server.url(&format!("/api/weddings/{}/guests", wedding_id));

    // Invalid side is rejected.
    let response = server
        .client
        .post(&guests_url)
        .json(&serde_json::json!({ "name": "Uncle Ji", "side": "both" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);

    // Valid guest defaults to rsvp_status "invited".
    let response = server
        .client
        .post(&guests_url)
        .json(&serde_json::json!({ "name": "Uncle Ji", "side": "bride" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let guest: serde_json::Value = response.json().await.unwrap();
    assert_eq!(guest["rsvp_status"], "invited");
    let guest_id = guest["id"].as_str().unwrap().to_string();

    // Invalid RSVP status on update is rejected.
    let response = server
        .client
        .patch(server.url(&format!("/api/guests/{}", guest_id)))
        .json(&serde_json::json!({ "rsvp_status": "definitely" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);

    // Valid update goes through.
    let response = server
        .client
        .patch(server.url(&format!("/api/guests/{}", guest_id)))
        .json(&serde_json::json!({ "rsvp_status": "going", "accompanying_count": 3 }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let guest: serde_json::Value = response.json().await.unwrap();
    assert_eq!(guest["rsvp_status"], "going");
    assert_eq!(guest["accompanying_count"], 3);

    // Delete succeeds, and repeating it still succeeds.
    for _ in 0..2 {
        let response = server
            .client
            .delete(server.url(&format!("/api/guests/{}", guest_id)))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 200);
        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body["success"], true);
    }

    let response = server.client.get(&guests_url).send().await.unwrap();
    let guests: serde_json::Value = response.json().await.unwrap();
    assert!(guests.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_task_status_validation() {
    let server = TestServer::new().await;
    server
        .signup("Priya Sharma", "priya@example.com", "hunter2hunter2")
        .await;
    let wedding_id = server.create_wedding("Priya & Rahul").await;
    let tasks_url = server.url(&format!("/api/weddings/{}/tasks", wedding_id));

    let response = server
        .client
        .post(&tasks_url)
        .json(&serde_json::json!({ "title": "Book venue", "status": "later" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);

    let response = server
        .client
        .post(&tasks_url)
        .json(&serde_json::json!({ "title": "Book venue" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let task: serde_json::Value = response.json().await.unwrap();
    assert_eq!(task["status"], "todo");
}

#[tokio::test]
async fn test_timeline_and_budget_crud() {
    let server = TestServer::new().await;
    server
        .signup("Priya Sharma", "priya@example.com", "hunter2hunter2")
        .await;
    let wedding_id = server.create_wedding("Priya & Rahul").await;

    let response = server
        .client
        .post(server.url(&format!("/api/weddings/{}/events", wedding_id)))
        .json(&serde_json::json!({
            "title": "Sangeet",
            "date_time": "2026-11-19T19:00",
            "venue": "Hotel Rajmahal",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let event: serde_json::Value = response.json().await.unwrap();
    let event_id = event["id"].as_str().unwrap().to_string();

    let response = server
        .client
        .patch(server.url(&format!("/api/events/{}", event_id)))
        .json(&serde_json::json!({ "venue": "Garden Palace" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let event: serde_json::Value = response.json().await.unwrap();
    assert_eq!(event["venue"], "Garden Palace");
    assert_eq!(event["title"], "Sangeet");

    let response = server
        .client
        .post(server.url(&format!("/api/weddings/{}/budget", wedding_id)))
        .json(&serde_json::json!({
            "category": "Catering",
            "planned": 200000,
            "actual": 50000,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let item: serde_json::Value = response.json().await.unwrap();
    let item_id = item["id"].as_str().unwrap().to_string();

    let response = server
        .client
        .patch(server.url(&format!("/api/budget/{}", item_id)))
        .json(&serde_json::json!({ "actual": 180000 }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let item: serde_json::Value = response.json().await.unwrap();
    assert_eq!(item["actual"], 180000);
    assert_eq!(item["planned"], 200000);
}

#[tokio::test]
async fn test_update_missing_resource_is_not_found() {
    let server = TestServer::new().await;
    server
        .signup("Priya Sharma", "priya@example.com", "hunter2hunter2")
        .await;

    let response = server
        .client
        .patch(server.url("/api/tasks/01ARZ3NDEKTSV4RRFFQ69G5FAV"))
        .json(&serde_json::json!({ "status": "done" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn test_dashboard_stats_aggregation() {
    let server = TestServer::new().await;
    server
        .signup("Priya Sharma", "priya@example.com", "hunter2hunter2")
        .await;
    let wedding_id = server.create_wedding("Priya & Rahul").await;

    // Guests: going with +2 accompanying, not_going, and a pending invite.
    for guest in [
        serde_json::json!({ "name": "A", "side": "bride", "rsvp_status": "going", "accompanying_count": 2 }),
        serde_json::json!({ "name": "B", "side": "groom", "rsvp_status": "not_going" }),
        serde_json::json!({ "name": "C", "side": "bride" }),
    ] {
        let response = server
            .client
            .post(server.url(&format!("/api/weddings/{}/guests", wedding_id)))
            .json(&guest)
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 200);
    }

    // Tasks: one done, one todo.
    for task in [
        serde_json::json!({ "title": "Book venue", "status": "done" }),
        serde_json::json!({ "title": "Send invites" }),
    ] {
        let response = server
            .client
            .post(server.url(&format!("/api/weddings/{}/tasks", wedding_id)))
            .json(&task)
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 200);
    }

    // Budget: two line items.
    for item in [
        serde_json::json!({ "category": "Catering", "planned": 200000, "actual": 150000 }),
        serde_json::json!({ "category": "Decor", "planned": 100000, "actual": 30000 }),
    ] {
        let response = server
            .client
            .post(server.url(&format!("/api/weddings/{}/budget", wedding_id)))
            .json(&item)
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 200);
    }

    let response = server
        .client
        .get(server.url(&format!("/api/weddings/{}/stats", wedding_id)))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let stats: serde_json::Value = response.json().await.unwrap();

    // Headcounts include accompanying guests.
    assert_eq!(stats["guests"]["total"], 5);
    assert_eq!(stats["guests"]["going"], 3);
    assert_eq!(stats["guests"]["not_going"], 1);
    assert_eq!(stats["guests"]["maybe"], 0);
    assert_eq!(stats["guests"]["pending"], 1);

    assert_eq!(stats["tasks"]["total"], 2);
    assert_eq!(stats["tasks"]["completed"], 1);

    assert_eq!(stats["budget"]["total_budget"], 500000);
    assert_eq!(stats["budget"]["total_planned"], 300000);
    assert_eq!(stats["budget"]["total_spent"], 180000);
}
