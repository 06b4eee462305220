use std::sync::{Arc, Mutex};

use actix_web::{http::StatusCode, test, web, App};
use group_directory::{
    routes, AdminGate, Category, Directory, DirectoryError, Group, GroupId, MemoryStore,
};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

type Store = Arc<MemoryStore>;

fn group(id: &str, name: &str, category: Category, created_at: i64) -> Group {
    Group {
        id: GroupId::from(id),
        name: name.to_string(),
        description: format!("All about {name}"),
        link: format!("https://chat.example/{id}"),
        category,
        members_count: 12,
        is_verified: false,
        created_at,
    }
}

async fn directory() -> (Store, web::Data<Directory<Store>>) {
    let store = Arc::new(MemoryStore::with_rows(vec![
        group("a", "Rust Paris", Category::Tech, 3),
        group("b", "Memes", Category::Fun, 2),
        group("c", "Go Lyon", Category::Tech, 1),
    ]));
    let directory = Directory::new(store.clone());
    directory.refresh().await.unwrap();
    (store, web::Data::new(directory))
}

fn gate() -> web::Data<Mutex<AdminGate>> {
    web::Data::new(Mutex::new(AdminGate::with_cost("admin", 4).unwrap()))
}

macro_rules! app {
    ($directory:expr, $gate:expr) => {
        test::init_service(
            App::new()
                .app_data($directory.clone())
                .app_data($gate.clone())
                .configure(routes::routes::configure::<Store>),
        )
        .await
    };
}

#[actix_web::test]
async fn list_filters_by_category_in_order() {
    let (_, directory) = directory().await;
    let gate = gate();
    let app = app!(directory, gate);

    let req = test::TestRequest::get().uri("/api-groups/list?category=Tech").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["status"]["state"], "ready");
    assert_eq!(body["total"], 2);
    assert_eq!(body["groups"][0]["id"], "a");
    assert_eq!(body["groups"][1]["id"], "c");
    assert_eq!(body["groups"][0]["category"], "Technologie");
}

#[actix_web::test]
async fn list_searches_name_and_description() {
    let (_, directory) = directory().await;
    let gate = gate();
    let app = app!(directory, gate);

    let req = test::TestRequest::get().uri("/api-groups/list?search=memes").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["total"], 1);
    assert_eq!(body["groups"][0]["name"], "Memes");
}

#[actix_web::test]
async fn unknown_category_is_bad_request() {
    let (_, directory) = directory().await;
    let gate = gate();
    let app = app!(directory, gate);

    let req = test::TestRequest::get().uri("/api-groups/list?category=Cooking").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn anyone_can_add_a_group() {
    let (store, directory) = directory().await;
    let gate = gate();
    let app = app!(directory, gate);

    let req = test::TestRequest::post()
        .uri("/api-groups/add")
        .set_json(json!({
            "name": "Board Games",
            "description": "Friday nights",
            "link": "https://chat.example/board",
            "category": "Loisirs",
            "membersCount": 8
        }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["success"], true);
    assert_eq!(body["group"]["isVerified"], false);
    assert_eq!(store.rows().len(), 4);
    assert_eq!(directory.groups().await.len(), 4);
}

#[actix_web::test]
async fn failed_add_reports_error_to_caller() {
    let (store, directory) = directory().await;
    let gate = gate();
    let app = app!(directory, gate);
    store.fail_next(DirectoryError::Connectivity("network down".into()));

    let req = test::TestRequest::post()
        .uri("/api-groups/add")
        .set_json(json!({
            "name": "X",
            "description": "never stored",
            "link": "https://chat.example/x",
            "category": "Autre"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["kind"], "connectivity");
    assert!(directory.groups().await.iter().all(|g| g.name != "X"));
}

#[actix_web::test]
async fn privileged_routes_need_admin_mode() {
    let (store, directory) = directory().await;
    let gate = gate();
    let app = app!(directory, gate);

    let req = test::TestRequest::post()
        .uri("/api-groups/delete")
        .set_json(json!({ "id": "a" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    assert_eq!(store.rows().len(), 3);
}

#[actix_web::test]
async fn admin_can_verify_and_delete() {
    let (store, directory) = directory().await;
    let gate = gate();
    let app = app!(directory, gate);

    let req = test::TestRequest::post()
        .uri("/api-admin/enter")
        .set_json(json!({ "password": "admin" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["state"], "unlocked");

    let req = test::TestRequest::post()
        .uri("/api-groups/verify")
        .set_json(json!({ "id": "b", "isVerified": true }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(directory.get(&GroupId::from("b")).await.unwrap().is_verified);

    let req = test::TestRequest::post()
        .uri("/api-groups/delete")
        .set_json(json!({ "id": "c" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(directory.get(&GroupId::from("c")).await.is_none());
    assert_eq!(store.rows().len(), 2);

    let req = test::TestRequest::post().uri("/api-admin/exit").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["state"], "locked");
}

#[actix_web::test]
async fn admin_can_edit() {
    let (_, directory) = directory().await;
    let gate = gate();
    gate.lock().unwrap().enter(Some("admin")).unwrap();
    let app = app!(directory, gate);

    let req = test::TestRequest::post()
        .uri("/api-groups/edit")
        .set_json(json!({
            "id": "a",
            "name": "Rust Paris Meetup",
            "description": "Monthly talks",
            "link": "https://chat.example/a",
            "category": "Technologie",
            "membersCount": 99
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let edited = directory.get(&GroupId::from("a")).await.unwrap();
    assert_eq!(edited.name, "Rust Paris Meetup");
    assert_eq!(edited.members_count, 99);
}

#[actix_web::test]
async fn wrong_password_is_unauthorized_and_empty_is_silent() {
    let (_, directory) = directory().await;
    let gate = gate();
    let app = app!(directory, gate);

    let req = test::TestRequest::post()
        .uri("/api-admin/enter")
        .set_json(json!({ "password": "wrong" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::post()
        .uri("/api-admin/enter")
        .set_json(json!({ "password": "" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["state"], "locked");

    let req = test::TestRequest::get().uri("/api-admin/status").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["state"], "locked");
}

#[actix_web::test]
async fn refresh_failure_keeps_list_and_reports_status() {
    let (store, directory) = directory().await;
    let gate = gate();
    let app = app!(directory, gate);
    store.set_offline(true);

    let req = test::TestRequest::post().uri("/api-groups/refresh").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["status"]["state"], "failed");
    assert_eq!(body["total"], 3);

    let req = test::TestRequest::get().uri("/api-groups/list").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["total"], 3);
    assert_eq!(body["status"]["kind"], "connectivity");
}

#[actix_web::test]
async fn unconfigured_store_surfaces_configuration_state() {
    let err = DirectoryError::Configuration(vec!["DIRECTORY_STORE_URL", "DIRECTORY_STORE_KEY"]);
    let directory = web::Data::new(Directory::<Store>::unconfigured(err));
    let gate = gate();
    let app = app!(directory, gate);

    let req = test::TestRequest::get().uri("/api-groups/list").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"]["state"], "failed");
    assert_eq!(body["status"]["kind"], "configuration");
    let message = body["status"]["message"].as_str().unwrap();
    assert!(message.contains("DIRECTORY_STORE_URL") && message.contains("DIRECTORY_STORE_KEY"));

    let req = test::TestRequest::post().uri("/api-groups/refresh").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[actix_web::test]
async fn status_answers_while_password_is_checked() {
    let (_, directory) = directory().await;
    let gate = gate();
    let app = app!(directory, gate);

    let enter = test::TestRequest::post()
        .uri("/api-admin/enter")
        .set_json(json!({ "password": "admin" }))
        .to_request();
    let status = test::TestRequest::get().uri("/api-admin/status").to_request();
    let (entered, during): (Value, Value) = tokio::join!(
        test::call_and_read_body_json(&app, enter),
        test::call_and_read_body_json(&app, status),
    );

    assert_eq!(entered["state"], "unlocked");
    assert_eq!(during["state"], "locked");
    assert!(gate.lock().unwrap().is_unlocked());
}
