//! Smoke tests for the catalog flows: admin writes, public reads.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use filmoteka::config::{BootstrapAdminConfig, Config, SessionBackend};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

struct TestApp {
    router: Router,
    admin_cookie: String,
}

impl TestApp {
    async fn spawn() -> Self {
        let db_path = std::env::temp_dir()
            .join(format!("filmoteka-smoke-test-{}.db", uuid::Uuid::new_v4()));

        let mut config = Config::default();
        config.general.database_url = format!("sqlite:{}", db_path.display());
        config.session.backend = SessionBackend::Memory;
        config.server.secure_cookies = false;
        config.observability.metrics_enabled = false;
        config.security.argon2_memory_cost_kib = 1024;
        config.security.argon2_time_cost = 1;
        config.security.bootstrap_admin = Some(BootstrapAdminConfig {
            username: "curator".to_string(),
            password: "curator-password".to_string(),
        });

        let state = filmoteka::api::create_app_state_from_config(config, None)
            .await
            .expect("failed to create app state");
        let router = filmoteka::api::router(state);

        let mut app = Self {
            router,
            admin_cookie: String::new(),
        };

        let response = app
            .router
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/login")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        json!({"username": "curator", "password": "curator-password"})
                            .to_string(),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        app.admin_cookie = response.headers()[header::SET_COOKIE]
            .to_str()
            .unwrap()
            .split(';')
            .next()
            .unwrap()
            .to_string();

        app
    }

    async fn call(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::COOKIE, &self.admin_cookie);

        let body = match body {
            Some(value) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    async fn add_actor(&self, name: &str, surname: &str) -> i64 {
        let (status, body) = self
            .call(
                "POST",
                "/api/v1/admin/actor",
                Some(json!({
                    "name": name,
                    "surname": surname,
                    "gender": "female",
                    "birthday": "1950-01-01"
                })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "add actor failed: {body}");
        body["data"]["id"].as_i64().unwrap()
    }

    async fn add_film(&self, name: &str, rating: f64, actor_ids: &[i64]) -> (StatusCode, Value) {
        self.call(
            "POST",
            "/api/v1/admin/film",
            Some(json!({
                "name": name,
                "description": format!("{name} description"),
                "date_of_release": "1975-03-07",
                "rating": rating,
                "actor_ids": actor_ids
            })),
        )
        .await
    }
}

fn film_names(body: &Value) -> Vec<String> {
    body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|film| film["name"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_add_film_with_missing_actor_is_rejected() {
    let app = TestApp::spawn().await;
    let actor = app.add_actor("Margarita", "Terekhova").await;

    let (status, body) = app.add_film("X", 5.1, &[actor, actor + 100]).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "bad add data");

    let (status, body) = app.call("GET", "/api/v1/films", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_film_lifecycle() {
    let app = TestApp::spawn().await;
    let first = app.add_actor("Margarita", "Terekhova").await;
    let second = app.add_actor("Innokenty", "Smoktunovsky").await;

    let (status, body) = app.add_film("Mirror", 8.1, &[first, second]).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let film_id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = app.call("GET", &format!("/api/v1/film/{film_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Mirror");
    assert_eq!(body["data"]["date_of_release"], "1975-03-07");

    let (_, body) = app.call("GET", &format!("/api/v1/actor/{second}"), None).await;
    assert_eq!(body["data"]["films"].as_array().unwrap().len(), 1);

    // Replace the cast with the first actor only.
    let (status, body) = app
        .call(
            "PUT",
            "/api/v1/admin/film",
            Some(json!({
                "id": film_id,
                "name": "Mirror",
                "description": "Zerkalo",
                "date_of_release": "1975-03-07",
                "rating": 8.2,
                "actor_ids": [first]
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");

    let (_, body) = app.call("GET", &format!("/api/v1/actor/{second}"), None).await;
    assert!(body["data"]["films"].as_array().unwrap().is_empty());
    let (_, body) = app.call("GET", &format!("/api/v1/actor/{first}"), None).await;
    assert_eq!(body["data"]["films"][0]["description"], "Zerkalo");

    let (status, body) = app
        .call("DELETE", &format!("/api/v1/admin/film/{film_id}"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["result"], "success");

    let (status, _) = app.call("GET", &format!("/api/v1/film/{film_id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (_, body) = app.call("GET", &format!("/api/v1/actor/{first}"), None).await;
    assert!(body["data"]["films"].as_array().unwrap().is_empty());

    let (status, _) = app
        .call("DELETE", &format!("/api/v1/admin/film/{film_id}"), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_missing_film_is_bad_request() {
    let app = TestApp::spawn().await;

    let (status, body) = app
        .call(
            "PUT",
            "/api/v1/admin/film",
            Some(json!({
                "id": 4242,
                "name": "Ghost",
                "description": "Never added",
                "date_of_release": "2001-01-01",
                "rating": 3.0
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "bad update data");
}

#[tokio::test]
async fn test_film_sorting() {
    let app = TestApp::spawn().await;
    app.add_film("Beta", 6.0, &[]).await;
    app.add_film("Alpha", 9.0, &[]).await;
    app.add_film("Gamma", 7.5, &[]).await;

    let (_, body) = app.call("GET", "/api/v1/films", None).await;
    assert_eq!(film_names(&body), vec!["Alpha", "Gamma", "Beta"]);

    let (_, body) = app.call("GET", "/api/v1/films?sort_param=name", None).await;
    assert_eq!(film_names(&body), vec!["Gamma", "Beta", "Alpha"]);

    let (status, body) = app.call("GET", "/api/v1/films?sort_param=birthday", None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_search_by_film_and_actor_name() {
    let app = TestApp::spawn().await;
    let actor = app.add_actor("Natalya", "Bondarchuk").await;
    app.add_film("Solaris", 8.0, &[actor]).await;
    app.add_film("Stalker", 8.1, &[]).await;

    let (status, body) = app.call("GET", "/api/v1/film/search/sol", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(film_names(&body), vec!["Solaris"]);

    let (_, body) = app
        .call("GET", "/api/v1/film/search/natalya%20bond", None)
        .await;
    assert_eq!(film_names(&body), vec!["Solaris"]);

    let (_, body) = app.call("GET", "/api/v1/film/search/S", None).await;
    assert_eq!(film_names(&body), vec!["Solaris", "Stalker"]);

    let (status, body) = app.call("GET", "/api/v1/film/search/zzz", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "films not found");
}

#[tokio::test]
async fn test_actor_aggregate_has_no_duplicates() {
    let app = TestApp::spawn().await;
    let actor = app.add_actor("Nikolai", "Grinko").await;
    let loner = app.add_actor("Solo", "Performer").await;
    app.add_film("Ivan's Childhood", 8.0, &[actor]).await;
    app.add_film("Andrei Rublev", 8.1, &[actor]).await;

    let (status, body) = app.call("GET", &format!("/api/v1/actor/{actor}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], actor);
    assert_eq!(body["data"]["surname"], "Grinko");
    assert_eq!(body["data"]["films"].as_array().unwrap().len(), 2);

    let (_, body) = app.call("GET", "/api/v1/actors", None).await;
    let actors = body["data"].as_array().unwrap();
    assert_eq!(actors.len(), 2);
    assert_eq!(actors[0]["id"], actor);
    assert_eq!(actors[0]["films"].as_array().unwrap().len(), 2);
    assert_eq!(actors[1]["id"], loner);
    assert!(actors[1]["films"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_actor_update_and_delete() {
    let app = TestApp::spawn().await;
    let actor = app.add_actor("Oleg", "Yankovsky").await;
    let (_, body) = app.add_film("Nostalghia", 8.0, &[actor]).await;
    let film_id = body["data"]["id"].as_i64().unwrap();

    let (status, _) = app
        .call(
            "PUT",
            "/api/v1/admin/actor",
            Some(json!({
                "id": actor,
                "name": "Oleg",
                "surname": "Yankovskiy",
                "gender": "male",
                "birthday": "1944-02-23"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = app.call("GET", &format!("/api/v1/actor/{actor}"), None).await;
    assert_eq!(body["data"]["surname"], "Yankovskiy");
    assert_eq!(body["data"]["gender"], "male");

    let (status, _) = app
        .call("DELETE", &format!("/api/v1/admin/actor/{actor}"), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.call("GET", &format!("/api/v1/actor/{actor}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // The film survives without its cast.
    let (status, _) = app.call("GET", &format!("/api/v1/film/{film_id}"), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .call(
            "PUT",
            "/api/v1/admin/actor",
            Some(json!({
                "id": actor,
                "name": "Oleg",
                "surname": "Yankovsky",
                "gender": "male",
                "birthday": "1944-02-23"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
