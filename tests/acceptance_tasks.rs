use axum::body::to_bytes;
use axum::Router;
use serde_json::{json, Value};
use task_api::{
    application::task_usecase::TaskUsecaseImpl,
    http::{routes::tasks, routing},
    infrastructure::sqlite_repo::SqliteTaskRepository,
};

async fn app() -> Router {
    // use in-memory sqlite for tests
    let repo = SqliteTaskRepository::connect("sqlite::memory:").await.unwrap();
    repo.ensure_schema().await.unwrap();
    routing::app(tasks::router(tasks::AppState::new(TaskUsecaseImpl::new(repo))))
}

#[tokio::test]
async fn acceptance_add_list_edit_delete() {
    let app = app().await;

    // empty store lists an empty sequence
    let (status, body) = request(&app, "GET", "/list", None).await;
    assert_eq!(status, 200);
    assert_eq!(serde_json::from_str::<Value>(&body).unwrap(), json!({ "message": "success", "tasks": [] }));

    // add
    let (status, body) = request(&app, "POST", "/add", Some(json!({ "title": "Test", "status": "todo" }))).await;
    assert_eq!(status, 200);
    assert_eq!(body, "success");

    // list contains the task with a store-assigned id
    let tasks = list(&app).await;
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["title"], "Test");
    assert_eq!(tasks[0]["status"], "todo");
    let id = tasks[0]["id"].as_i64().unwrap();

    // edit
    let (status, _) = request(&app, "PUT", &format!("/task/{id}"), Some(json!({ "title": "Tested", "status": "done" }))).await;
    assert_eq!(status, 200);
    assert_eq!(list(&app).await, vec![json!({ "id": id, "title": "Tested", "status": "done" })]);

    // delete
    let (status, body) = request(&app, "DELETE", &format!("/task/{id}"), None).await;
    assert_eq!(status, 200);
    assert_eq!(body, "success");
    assert!(list(&app).await.is_empty());

    // delete again
    let (status, _) = request(&app, "DELETE", &format!("/task/{id}"), None).await;
    assert_eq!(status, 400);
}

#[tokio::test]
async fn invalid_tasks_are_rejected_and_not_persisted() {
    let app = app().await;

    for body in [
        json!({ "title": "", "status": "todo" }),
        json!({ "title": "Test", "status": "completed" }),
        json!({ "title": "Test", "status": 7 }),
        json!({ "title": "Test" }),
    ] {
        let (status, _) = request(&app, "POST", "/add", Some(body.clone())).await;
        assert_eq!(status, 400, "body {body} should be rejected");
    }
    assert!(list(&app).await.is_empty());
}

#[tokio::test]
async fn editing_missing_task_leaves_store_unchanged() {
    let app = app().await;
    request(&app, "POST", "/add", Some(json!({ "title": "Keep", "status": "inprogress" }))).await;
    let before = list(&app).await;
    let missing = before[0]["id"].as_i64().unwrap() + 1;

    let (status, body) = request(&app, "PUT", &format!("/task/{missing}"), Some(json!({ "title": "X", "status": "done" }))).await;
    assert_eq!(status, 400);
    assert_eq!(body, "task not found");
    assert_eq!(list(&app).await, before);
}

#[tokio::test]
async fn legacy_status_codes_are_listed_as_names() {
    let app = app().await;
    for (title, code) in [("a", 0), ("b", 1), ("c", 2)] {
        let (status, _) = request(&app, "POST", "/add", Some(json!({ "title": title, "status": code }))).await;
        assert_eq!(status, 200);
    }

    let statuses: Vec<_> = list(&app).await.iter().map(|t| t["status"].as_str().unwrap().to_owned()).collect();
    assert_eq!(statuses, ["todo", "inprogress", "done"]);
}

async fn list(app: &Router) -> Vec<Value> {
    let (status, body) = request(app, "GET", "/list", None).await;
    assert_eq!(status, 200);
    let body: Value = serde_json::from_str(&body).unwrap();
    body["tasks"].as_array().unwrap().clone()
}

async fn request(app: &Router, method: &str, path: &str, body: Option<Value>) -> (u16, String) {
    use axum::body::Body;
    use axum::http::{Method, Request};
    use tower::ServiceExt;

    let req = Request::builder().method(Method::from_bytes(method.as_bytes()).unwrap()).uri(path);
    let req = match body {
        Some(json) => req.header("content-type", "application/json").body(Body::from(json.to_string())).unwrap(),
        None => req.body(Body::empty()).unwrap(),
    };
    let res: hyper::Response<Body> = app.clone().oneshot(req).await.unwrap();
    let status = res.status().as_u16();
    let bytes = to_bytes(res.into_body(), 1024 * 1024).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}
