use super::*;
use crate::test_support::{Canned, TestServer};
use serde_json::json;
use url::Url;

fn admin_at(root: &Url) -> AdminClient {
    let parent = Dispatcher::new(reqwest::Client::new(), Some(root.clone()));
    AdminClient::new(&parent).unwrap()
}

#[test]
fn scopes_beneath_admin_segment() {
    let admin = admin_at(&Url::parse("https://h/api/").unwrap());
    assert_eq!(admin.base_url().unwrap().as_str(), "https://h/api/admin/");
}

#[tokio::test]
async fn root_without_trailing_slash_still_targets_admin_login() {
    let server = TestServer::spawn().await;
    server.reply(Method::POST, "/api/admin/login", Canned::no_content());
    let root = Url::parse(server.api_root().as_str().trim_end_matches('/')).unwrap();
    let admin = admin_at(&root);

    admin.login("root", "password123").await.unwrap();

    assert_eq!(server.last_request().path, "/api/admin/login");
}

#[tokio::test]
async fn login_posts_credentials_to_admin_login() {
    let server = TestServer::spawn().await;
    server.reply(Method::POST, "/api/admin/login", Canned::no_content());
    let admin = admin_at(&server.api_root());

    admin.login("root", "password123").await.unwrap();

    let request = server.last_request();
    assert_eq!(request.method, Method::POST);
    assert_eq!(request.path, "/api/admin/login");
    assert_eq!(request.json(), json!({ "username": "root", "password": "password123" }));
}

#[tokio::test]
async fn login_surfaces_invalid_credentials() {
    let server = TestServer::spawn().await;
    server.reply(
        Method::POST,
        "/api/admin/login",
        Canned::json(400, json!({ "message": "invalid username or password", "code": 400 })),
    );
    let admin = admin_at(&server.api_root());

    let err = admin.login("root", "wrong").await.unwrap_err();
    assert_eq!(err.to_string(), "invalid username or password");
}

#[tokio::test]
async fn info_decodes_user() {
    let server = TestServer::spawn().await;
    server.reply(
        Method::GET,
        "/api/admin/info",
        Canned::data(json!({ "id": "adm1", "name": "A", "username": "a", "createdAt": "2024-01-01T00:00:00Z" })),
    );
    let admin = admin_at(&server.api_root());

    let user = admin.info().await.unwrap();
    assert_eq!(user, UserInfo { id: "adm1".to_owned(), name: "A".to_owned(), username: "a".to_owned() });
}

#[tokio::test]
async fn info_unauthenticated_is_request_failed() {
    let server = TestServer::spawn().await;
    server.reply(Method::GET, "/api/admin/info", Canned::json(401, json!({ "message": "unauthorized" })));
    let admin = admin_at(&server.api_root());

    let err = admin.info().await.unwrap_err();
    assert!(err.is_unauthorized());
}

#[tokio::test]
async fn update_puts_only_present_fields() {
    let server = TestServer::spawn().await;
    server.reply(
        Method::PUT,
        "/api/admin/info",
        Canned::data(json!({ "id": "adm1", "name": "Renamed", "username": "a" })),
    );
    let admin = admin_at(&server.api_root());

    let update = ProfileUpdate { name: Some("Renamed".to_owned()), ..ProfileUpdate::default() };
    let user = admin.update(&update).await.unwrap();
    assert_eq!(user.name, "Renamed");
    assert_eq!(server.last_request().json(), json!({ "name": "Renamed" }));
}

#[tokio::test]
async fn delete_accepts_no_content() {
    let server = TestServer::spawn().await;
    server.reply(Method::DELETE, "/api/admin/info", Canned::no_content());
    let admin = admin_at(&server.api_root());

    admin.delete().await.unwrap();
    assert_eq!(server.last_request().method, Method::DELETE);
}
