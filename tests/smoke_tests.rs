//! Smoke tests for the site running over an on-disk store.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use matchcrm::config::Config;
use serde_json::{Value, json};
use std::path::Path;
use tower::ServiceExt;

fn file_config(data_path: &Path) -> Config {
    let mut config = Config::default();
    config.general.data_path = data_path.display().to_string();
    config.inquiry.ack_delay_ms = 0;
    config
}

async fn spawn_app(config: Config) -> Router {
    let state = matchcrm::api::create_app_state_from_config(config)
        .await
        .expect("failed to create app state");
    matchcrm::api::router(state)
}

async fn request(
    app: &Router,
    method: &str,
    uri: &str,
    cookie: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Option<String>, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(str::to_string);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (
        status,
        cookie,
        serde_json::from_slice(&bytes).unwrap_or(Value::Null),
    )
}

async fn login(app: &Router, password: &str) -> Option<String> {
    let (status, cookie, _) = request(
        app,
        "POST",
        "/api/admin/login",
        None,
        Some(json!({ "email": "admin@gmail.com", "password": password })),
    )
    .await;
    (status == StatusCode::OK).then_some(cookie).flatten()
}

#[tokio::test]
async fn smoke_profiles_and_inquiries_survive_restart() {
    let dir = tempfile::tempdir().unwrap();
    let data_path = dir.path().join("storage.json");

    let app = spawn_app(file_config(&data_path)).await;
    let cookie = login(&app, "123456").await.expect("login failed");

    let (status, _, created) = request(
        &app,
        "POST",
        "/api/admin/profiles",
        Some(&cookie),
        Some(json!({
            "title": "Teacher",
            "age": "26",
            "status": "Single",
            "gender": "Female",
            "city": "Multan"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let profile_id = created["data"]["id"].as_str().unwrap().to_string();

    let (status, _, _) = request(
        &app,
        "POST",
        &format!("/api/catalog/{profile_id}/inquiries"),
        None,
        Some(json!({
            "maritalStatus": "Single",
            "gender": "Male",
            "ageFrom": "26",
            "ageTo": "34",
            "caste": "Rajput"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    drop(app);

    // Values are JSON text under the long-standing key names.
    let raw: Value = serde_json::from_str(&std::fs::read_to_string(&data_path).unwrap()).unwrap();
    let profiles: Value = serde_json::from_str(raw["profiles"].as_str().unwrap()).unwrap();
    assert_eq!(profiles[0]["id"], profile_id.as_str());
    let inquiries: Value = serde_json::from_str(raw["inquiries"].as_str().unwrap()).unwrap();
    assert_eq!(inquiries[0]["profileId"], profile_id.as_str());
    assert!(raw["adminUser"].is_string());
    assert!(raw.get("isAdmin").is_none());

    let app = spawn_app(file_config(&data_path)).await;
    let (_, _, catalog) = request(&app, "GET", "/api/catalog", None, None).await;
    assert_eq!(catalog["data"]["source"], "stored");
    assert_eq!(catalog["data"]["profiles"][0]["title"], "Teacher");

    let cookie = login(&app, "123456").await.expect("login failed");
    let (_, _, listed) = request(&app, "GET", "/api/admin/inquiries", Some(&cookie), None).await;
    assert_eq!(listed["data"]["inquiries"][0]["caste"], "Rajput");
}

#[tokio::test]
async fn smoke_existing_site_data_is_read() {
    let dir = tempfile::tempdir().unwrap();
    let data_path = dir.path().join("storage.json");

    let admin = json!({
        "name": "Ayesha",
        "role": "Owner",
        "email": "admin@gmail.com",
        "password": "s3cret",
        "avatar": "/admin-avatar.png"
    });
    let profiles = json!([{
        "id": "SMB-310",
        "title": "Banker",
        "age": 31,
        "status": "Divorced",
        "gender": "Male",
        "city": "Karachi",
        "image": "/m1.jpg"
    }]);
    let inquiries = json!([{
        "profileId": "SMB-310",
        "maritalStatus": "Single",
        "gender": "Female",
        "caste": "N/A",
        "ageFrom": "24",
        "ageTo": "30",
        "religion": "Islam",
        "sect": "Sunni",
        "country": "Pakistan",
        "city": "N/A",
        "date": "1/2/2025, 3:04:05 PM"
    }]);
    let file = json!({
        "adminUser": admin.to_string(),
        "profiles": profiles.to_string(),
        "inquiries": inquiries.to_string(),
    });
    std::fs::write(&data_path, file.to_string()).unwrap();

    let app = spawn_app(file_config(&data_path)).await;

    assert!(login(&app, "123456").await.is_none());
    let cookie = login(&app, "s3cret").await.expect("stored password should work");

    let (_, _, dashboard) = request(&app, "GET", "/api/admin/dashboard", Some(&cookie), None).await;
    assert_eq!(dashboard["data"]["welcome"], "Welcome, Ayesha");
    assert_eq!(dashboard["data"]["profile_count"], 1);
    assert_eq!(dashboard["data"]["inquiry_count"], 1);

    let (_, _, catalog) = request(&app, "GET", "/api/catalog", None, None).await;
    assert_eq!(catalog["data"]["profiles"][0]["age"], 31);

    // Inquiries stored before ids existed get one on first listing.
    let (_, _, listed) = request(&app, "GET", "/api/admin/inquiries", Some(&cookie), None).await;
    let id = listed["data"]["inquiries"][0]["id"].as_str().unwrap().to_string();
    let (status, _, _) = request(
        &app,
        "DELETE",
        &format!("/api/admin/inquiries/{id}"),
        Some(&cookie),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn smoke_corrupt_store_file_is_set_aside() {
    let dir = tempfile::tempdir().unwrap();
    let data_path = dir.path().join("storage.json");
    std::fs::write(&data_path, "this is not json").unwrap();

    let app = spawn_app(file_config(&data_path)).await;

    let (status, _, catalog) = request(&app, "GET", "/api/catalog", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(catalog["data"]["source"], "samples");
    assert!(login(&app, "123456").await.is_some());

    let backups = std::fs::read_dir(dir.path())
        .unwrap()
        .filter_map(Result::ok)
        .filter(|e| e.file_name().to_string_lossy().contains(".corrupt-"))
        .count();
    assert_eq!(backups, 1);
}
