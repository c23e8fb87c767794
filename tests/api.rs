use axum::http::{Method, StatusCode};
use axum_test::TestServer;
use serde_json::{json, Value};
use team_planning_api::{
    api,
    models::{MessageResponse, Month, Status, StatusUpdate, SubTask, Task},
    store::{JsonFileStore, MemoryStore},
};
use tempfile::TempDir;

fn setup() -> (TestServer, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::open_or_init(dir.path().join("tasks.json")).unwrap();
    let app = TestServer::new(api::create_router(store)).unwrap();
    (app, dir)
}

async fn list(app: &TestServer) -> Vec<Task> {
    let response = app.get("/tasks").await;
    response.assert_status(StatusCode::OK);
    response.json::<Vec<Task>>()
}

#[tokio::test]
async fn test_create_then_list_returns_task_unchanged() {
    let (app, _dir) = setup();
    let task = Task::new("Quarterly plan", "Draft the OKRs", Month::This);

    let response = app.post("/tasks").json(&task).await;
    response.assert_status(StatusCode::CREATED);
    assert_eq!(response.json::<Task>(), task);

    assert_eq!(list(&app).await, vec![task]);
}

#[tokio::test]
async fn test_task_and_subtask_scenario() {
    let (app, _dir) = setup();
    let task = Task::new("Task A", "", Month::This);
    app.post("/tasks")
        .json(&task)
        .await
        .assert_status(StatusCode::CREATED);

    let sub = SubTask::new("A1", "first step");
    let response = app
        .post(&format!("/tasks/{}/subtasks", task.id))
        .json(&sub)
        .await;
    response.assert_status(StatusCode::CREATED);
    assert_eq!(response.json::<SubTask>(), sub);

    let response = app
        .put(&format!("/tasks/{}/subtasks/{}/status", task.id, sub.id))
        .json(&StatusUpdate {
            status: Status::Done,
        })
        .await;
    response.assert_status(StatusCode::OK);
    assert_eq!(
        response.json::<MessageResponse>().message,
        "Subtask status updated"
    );
    let stored = list(&app).await.remove(0);
    assert!(stored.subtask(&sub.id).unwrap().completed_at.is_some());

    app.delete(&format!("/tasks/{}/subtasks/{}", task.id, sub.id))
        .await
        .assert_status(StatusCode::NO_CONTENT);
    assert!(list(&app).await[0].sub_tasks.is_empty());

    app.delete(&format!("/tasks/{}", task.id))
        .await
        .assert_status(StatusCode::NO_CONTENT);
    assert!(list(&app).await.iter().all(|t| t.id != task.id));

    app.delete(&format!("/tasks/{}", task.id))
        .await
        .assert_status(StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_task_status_sets_and_clears_completed_at() {
    let (app, _dir) = setup();
    let task = Task::new("Toggle", "", Month::Next);
    app.post("/tasks").json(&task).await;

    let response = app
        .put(&format!("/tasks/{}/status", task.id))
        .json(&json!({ "status": "done" }))
        .await;
    response.assert_status(StatusCode::OK);
    assert_eq!(response.json::<Value>()["message"], "Task status updated");
    assert!(list(&app).await[0].completed_at.is_some());

    app.put(&format!("/tasks/{}/status", task.id))
        .json(&json!({ "status": "stuck" }))
        .await
        .assert_status(StatusCode::OK);
    let stored = list(&app).await.remove(0);
    assert_eq!(stored.status, Status::Stuck);
    assert!(stored.completed_at.is_none());
}

#[tokio::test]
async fn test_unknown_ids_succeed_without_changes() {
    let (app, _dir) = setup();
    let task = Task::new("Stays", "", Month::This);
    app.post("/tasks").json(&task).await;

    app.delete("/tasks/not-there")
        .await
        .assert_status(StatusCode::NO_CONTENT);
    app.delete(&format!("/tasks/{}/subtasks/not-there", task.id))
        .await
        .assert_status(StatusCode::NO_CONTENT);
    app.put("/tasks/not-there/status")
        .json(&json!({ "status": "done" }))
        .await
        .assert_status(StatusCode::OK);

    let sub = SubTask::new("Nowhere", "");
    let response = app.post("/tasks/not-there/subtasks").json(&sub).await;
    response.assert_status(StatusCode::CREATED);
    assert_eq!(response.json::<SubTask>(), sub);

    assert_eq!(list(&app).await, vec![task]);
}

#[tokio::test]
async fn test_subtask_added_last_without_touching_other_tasks() {
    let app = TestServer::new(api::create_router(MemoryStore::new())).unwrap();
    let mut parent = Task::new("Parent", "", Month::This);
    parent.sub_tasks.push(SubTask::new("Existing", ""));
    let other = Task::new("Other", "", Month::Next);
    app.post("/tasks").json(&parent).await;
    app.post("/tasks").json(&other).await;

    let sub = SubTask::new("Newest", "");
    app.post(&format!("/tasks/{}/subtasks", parent.id))
        .json(&sub)
        .await
        .assert_status(StatusCode::CREATED);

    let tasks = list(&app).await;
    let titles: Vec<_> = tasks[0].sub_tasks.iter().map(|s| s.title.as_str()).collect();
    assert_eq!(titles, vec!["Existing", "Newest"]);
    assert_eq!(tasks[1], other);
}

#[tokio::test]
async fn test_missing_file_is_internal_error() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path().join("never-created.json"));
    let app = TestServer::new(api::create_router(store)).unwrap();

    let response = app.get("/tasks").expect_failure().await;
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response.json::<Value>(),
        json!({ "error": "Failed to read tasks data" })
    );

    let response = app.delete("/tasks/abc").expect_failure().await;
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_malformed_bodies_are_rejected() {
    let (app, _dir) = setup();

    let response = app
        .post("/tasks")
        .json(&json!({ "title": "no id or status" }))
        .expect_failure()
        .await;
    assert!(response.status_code().is_client_error());

    let task = Task::new("Target", "", Month::This);
    app.post("/tasks").json(&task).await;
    let response = app
        .put(&format!("/tasks/{}/status", task.id))
        .json(&json!({ "status": "blocked" }))
        .expect_failure()
        .await;
    assert!(response.status_code().is_client_error());

    assert_eq!(list(&app).await[0].status, Status::Working);
}

#[tokio::test]
async fn test_duplicate_id_gets_fresh_identifier() {
    let (app, _dir) = setup();
    let task = Task::new("Twice", "", Month::This);

    app.post("/tasks").json(&task).await;
    let second = app.post("/tasks").json(&task).await.json::<Task>();

    assert_ne!(second.id, task.id);
    let ids: Vec<_> = list(&app).await.into_iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![task.id, second.id]);
}

#[tokio::test]
async fn test_cors_preflight() {
    let (app, _dir) = setup();

    let response = app.method(Method::OPTIONS, "/tasks").await;
    response.assert_status(StatusCode::NO_CONTENT);
    assert_eq!(response.header("access-control-allow-origin"), "*");
    assert_eq!(response.header("access-control-allow-headers"), "content-type");
}

#[tokio::test]
async fn test_write_failures_report_operation_message() {
    let (app, dir) = setup();
    let task = Task::new("Saved before the disk broke", "", Month::This);
    app.post("/tasks").json(&task).await;

    // The store writes through a sibling temp file; a directory there makes
    // every save fail after a successful read.
    std::fs::create_dir(dir.path().join("tasks.json.tmp")).unwrap();

    let response = app
        .post("/tasks")
        .json(&Task::new("Lost", "", Month::This))
        .expect_failure()
        .await;
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response.json::<Value>(),
        json!({ "error": "Failed to save task" })
    );

    let cases = [
        (
            app.put(&format!("/tasks/{}/status", task.id))
                .json(&json!({ "status": "done" }))
                .expect_failure()
                .await,
            "Failed to update task status",
        ),
        (
            app.post(&format!("/tasks/{}/subtasks", task.id))
                .json(&SubTask::new("Lost", ""))
                .expect_failure()
                .await,
            "Failed to save subtask",
        ),
        (
            app.put(&format!("/tasks/{}/subtasks/s1/status", task.id))
                .json(&json!({ "status": "done" }))
                .expect_failure()
                .await,
            "Failed to update subtask status",
        ),
        (
            app.delete(&format!("/tasks/{}/subtasks/s1", task.id))
                .expect_failure()
                .await,
            "Failed to delete subtask",
        ),
        (
            app.delete(&format!("/tasks/{}", task.id))
                .expect_failure()
                .await,
            "Failed to delete task",
        ),
    ];
    for (response, message) in cases {
        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.json::<Value>()["error"], message);
    }

    std::fs::remove_dir(dir.path().join("tasks.json.tmp")).unwrap();
    assert_eq!(list(&app).await, vec![task]);
}
