use axum::{
    Router,
    body::Body,
    http::{Request, Response, StatusCode, header},
};
use http_body_util::BodyExt;
use sea_orm::{ConnectionTrait, DbBackend, Statement};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;
use uuid::Uuid;
use zamculture::api::AppState;
use zamculture::config::Config;
use zamculture::domain::StoryId;
use zamculture::services::{LikeOutcome, Submission};

const BOUNDARY: &str = "zamculture-test-boundary";

struct TestApp {
    router: Router,
    state: Arc<AppState>,
    dir: PathBuf,
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.dir);
    }
}

async fn spawn_app() -> TestApp {
    let dir = std::env::temp_dir().join(format!("zamculture-test-{}", Uuid::new_v4()));

    let mut config = Config::default();
    config.general.database_path = format!("sqlite:{}", dir.join("test.db").display());
    config.uploads.path = dir.join("uploads").display().to_string();
    config.server.secure_cookies = false;
    config.server.secret_key = "integration test secret".to_string();
    config.observability.metrics_enabled = false;
    config.security.argon2_memory_cost_kib = 1024;
    config.security.argon2_time_cost = 1;

    let state = zamculture::api::create_app_state_from_config(config, None)
        .await
        .expect("Failed to create app state");
    let router = zamculture::api::router(state.clone())
        .await
        .expect("Failed to build router");

    TestApp { router, state, dir }
}

impl TestApp {
    async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }

    async fn get(&self, uri: &str, cookie: Option<&str>) -> Response<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    async fn post_form(&self, uri: &str, body: &str, cookie: Option<&str>) -> Response<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::from(body.to_string())).unwrap())
            .await
    }

    async fn register(&self, username: &str, password: &str) -> Response<Body> {
        self.post_form(
            "/register",
            &format!("username={username}&password={password}&confirmation={password}"),
            None,
        )
        .await
    }

    /// Logs in and returns the session cookie.
    async fn login(&self, username: &str, password: &str) -> String {
        let response = self
            .post_form(
                "/login",
                &format!("username={username}&password={password}"),
                None,
            )
            .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/");
        session_cookie(&response).expect("login should set a session cookie")
    }

    async fn submit(&self, cookie: &str, title: &str, category: &str, content: &str) -> Response<Body> {
        self.submit_with_image(cookie, title, category, content, None)
            .await
    }

    async fn submit_with_image(
        &self,
        cookie: &str,
        title: &str,
        category: &str,
        content: &str,
        image: Option<(&str, &[u8])>,
    ) -> Response<Body> {
        let body = multipart_body(
            &[("title", title), ("category", category), ("content", content)],
            image,
        );
        let request = Request::builder()
            .method("POST")
            .uri("/submit")
            .header(header::COOKIE, cookie)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap();
        self.send(request).await
    }

    /// Creates the admin account and returns its session cookie with the
    /// welcome notice already consumed.
    async fn admin(&self) -> String {
        self.state
            .account_service()
            .create_admin("admin", "admin-pass")
            .await
            .unwrap();
        let cookie = self.login("admin", "admin-pass").await;
        self.get("/", Some(&cookie)).await;
        cookie
    }

    async fn approve(&self, admin: &str, story_id: StoryId) -> Response<Body> {
        self.post_form(&format!("/admin/stories/{story_id}/approve"), "", Some(admin))
            .await
    }

    async fn notice(&self, uri: &str, cookie: &str) -> Option<String> {
        let json = json_body(self.get(uri, Some(cookie)).await).await;
        json["notice"].as_str().map(ToString::to_string)
    }
}

fn multipart_body(fields: &[(&str, &str)], image: Option<(&str, &[u8])>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((filename, bytes)) = image {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn location(response: &Response<Body>) -> String {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

fn session_cookie(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(ToString::to_string)
}

async fn json_body(response: Response<Body>) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

async fn story_titles(app: &TestApp, uri: &str) -> Vec<String> {
    let json = json_body(app.get(uri, None).await).await;
    json["data"]["stories"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["title"].as_str().unwrap().to_string())
        .collect()
}

async fn first_story_id(app: &TestApp, author: &str) -> StoryId {
    let user = app
        .state
        .store()
        .get_user_by_username(author)
        .await
        .unwrap()
        .unwrap();
    let rows = app.state.store().list_stories_by_author(user.id).await.unwrap();
    StoryId::new(rows[0].id)
}

#[tokio::test]
async fn test_register_then_duplicate_is_rejected() {
    let app = spawn_app().await;

    let response = app.register("amara", "Secr3t!").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login");
    let cookie = session_cookie(&response).unwrap();
    assert_eq!(
        app.notice("/login", &cookie).await.as_deref(),
        Some("Registered! Please log in.")
    );

    let response = app.register("amara", "Other1!").await;
    assert_eq!(location(&response), "/register");
    let cookie = session_cookie(&response).unwrap();
    assert_eq!(
        app.notice("/register", &cookie).await.as_deref(),
        Some("username taken")
    );
}

#[tokio::test]
async fn test_register_validation_messages() {
    let app = spawn_app().await;

    let cases = [
        ("username=&password=x&confirmation=x", "must provide username"),
        ("username=amara&password=&confirmation=", "must provide password"),
        (
            "username=amara&password=one&confirmation=two",
            "passwords do not match",
        ),
    ];

    for (body, expected) in cases {
        let response = app.post_form("/register", body, None).await;
        assert_eq!(location(&response), "/register");
        let cookie = session_cookie(&response).unwrap();
        assert_eq!(app.notice("/register", &cookie).await.as_deref(), Some(expected));
    }
}

#[tokio::test]
async fn test_login_with_bad_password() {
    let app = spawn_app().await;
    app.register("amara", "Secr3t!").await;

    let response = app
        .post_form("/login", "username=amara&password=wrong", None)
        .await;
    assert_eq!(location(&response), "/login");
    let cookie = session_cookie(&response).unwrap();
    assert_eq!(
        app.notice("/login", &cookie).await.as_deref(),
        Some("invalid username and/or password")
    );
}

#[tokio::test]
async fn test_gate_redirects_anonymous_users() {
    let app = spawn_app().await;

    for uri in ["/profile", "/submit", "/admin/pending", "/metrics"] {
        let response = app.get(uri, None).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "{uri}");
        assert_eq!(location(&response), "/login", "{uri}");

        let cookie = session_cookie(&response).unwrap();
        assert_eq!(
            app.notice("/login", &cookie).await.as_deref(),
            Some("Please log in to continue")
        );
    }
}

#[tokio::test]
async fn test_session_of_deleted_account_is_logged_out() {
    let app = spawn_app().await;
    app.register("amara", "Secr3t!").await;
    let cookie = app.login("amara", "Secr3t!").await;
    assert_eq!(app.get("/profile", Some(&cookie)).await.status(), StatusCode::OK);

    app.state
        .store()
        .conn
        .execute_unprepared("DELETE FROM users WHERE username = 'amara'")
        .await
        .unwrap();

    let response = app.get("/profile", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login");
    assert_eq!(
        app.notice("/login", &cookie).await.as_deref(),
        Some("Please log in to continue")
    );
}

#[tokio::test]
async fn test_submission_stays_pending_until_approved() {
    let app = spawn_app().await;
    app.register("amara", "Secr3t!").await;
    let member = app.login("amara", "Secr3t!").await;

    let response = app
        .submit(
            &member,
            "Harvest Festival",
            "Food",
            "Every April the village gathers to share the first maize.",
        )
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/profile");

    let story_id = first_story_id(&app, "amara").await;

    assert!(story_titles(&app, "/stories").await.is_empty());
    let response = app.get(&format!("/stories/{story_id}"), None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let profile = json_body(app.get("/profile", Some(&member)).await).await;
    assert_eq!(profile["data"]["stories"][0]["state"], "pending");

    app.state
        .account_service()
        .create_admin("admin", "admin-pass")
        .await
        .unwrap();
    let admin = app.login("admin", "admin-pass").await;

    let pending = json_body(app.get("/admin/pending", Some(&admin)).await).await;
    assert_eq!(pending["data"]["stories"][0]["title"], "Harvest Festival");

    let approve_uri = format!("/admin/stories/{story_id}/approve");
    let response = app.post_form(&approve_uri, "", Some(&admin)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/admin/pending");

    assert_eq!(
        story_titles(&app, "/stories").await,
        vec!["Harvest Festival".to_string()]
    );
    assert_eq!(
        story_titles(&app, "/stories?category=Food").await,
        vec!["Harvest Festival".to_string()]
    );
    assert!(story_titles(&app, "/stories?category=Music").await.is_empty());

    // Approving again changes nothing.
    let response = app.post_form(&approve_uri, "", Some(&admin)).await;
    assert_eq!(location(&response), "/admin/pending");
    assert_eq!(story_titles(&app, "/stories").await.len(), 1);
    assert_eq!(
        app.notice("/admin/pending", &admin).await.as_deref(),
        Some("\"Harvest Festival\" was already approved")
    );

    let detail = json_body(app.get(&format!("/stories/{story_id}"), None).await).await;
    assert_eq!(detail["data"]["story"]["image"], "static/defaults/food.svg");
    assert_eq!(detail["data"]["story"]["state"], "approved");
}

#[tokio::test]
async fn test_member_cannot_approve() {
    let app = spawn_app().await;
    app.register("amara", "Secr3t!").await;
    let member = app.login("amara", "Secr3t!").await;

    app.submit(&member, "Kuomboka", "Traditions", "The Lozi king moves to higher ground.")
        .await;
    let story_id = first_story_id(&app, "amara").await;

    for uri in [
        format!("/admin/stories/{story_id}/approve"),
        "/admin/stories/9999/approve".to_string(),
    ] {
        let response = app.post_form(&uri, "", Some(&member)).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/");
    }
    assert_eq!(app.notice("/", &member).await.as_deref(), Some("Access denied"));

    let row = app.state.store().get_story(story_id.value()).await.unwrap().unwrap();
    assert!(!row.approved);
}

#[tokio::test]
async fn test_submit_validation_redirects_back() {
    let app = spawn_app().await;
    app.register("amara", "Secr3t!").await;
    let member = app.login("amara", "Secr3t!").await;

    let response = app.submit(&member, "", "Food", "content").await;
    assert_eq!(location(&response), "/submit");
    assert_eq!(
        app.notice("/submit", &member).await.as_deref(),
        Some("must provide a title")
    );

    let response = app.submit(&member, "Title", "Poetry", "content").await;
    assert_eq!(location(&response), "/submit");
    assert_eq!(
        app.notice("/submit", &member).await.as_deref(),
        Some("unknown category: Poetry")
    );
}

#[tokio::test]
async fn test_like_and_comment_flow() {
    let app = spawn_app().await;
    app.register("amara", "Secr3t!").await;
    let member = app.login("amara", "Secr3t!").await;
    app.submit(&member, "Nshima", "Food", "Stiff maize porridge.").await;
    let story_id = first_story_id(&app, "amara").await;

    app.state
        .account_service()
        .create_admin("admin", "admin-pass")
        .await
        .unwrap();
    let admin = app.login("admin", "admin-pass").await;
    app.post_form(&format!("/admin/stories/{story_id}/approve"), "", Some(&admin))
        .await;

    let story_uri = format!("/stories/{story_id}");
    let like_uri = format!("/stories/{story_id}/like");

    let response = app.post_form(&like_uri, "", Some(&member)).await;
    assert_eq!(location(&response), story_uri);
    let response = app.post_form(&like_uri, "", Some(&member)).await;
    assert_eq!(location(&response), story_uri);

    let response = app
        .post_form(
            &format!("/stories/{story_id}/comments"),
            "content=Best+with+ifisashi",
            Some(&member),
        )
        .await;
    assert_eq!(location(&response), story_uri);

    let detail = json_body(app.get(&story_uri, Some(&member)).await).await;
    assert_eq!(detail["data"]["story"]["likes"], 1);
    assert_eq!(detail["data"]["viewer_has_liked"], true);
    assert_eq!(detail["data"]["comments"][0]["content"], "Best with ifisashi");
    assert_eq!(detail["data"]["comments"][0]["author"], "amara");

    let response = app
        .post_form(&format!("/stories/{story_id}/comments"), "content=", Some(&member))
        .await;
    assert_eq!(location(&response), story_uri);
    assert_eq!(
        app.notice(&story_uri, &member).await.as_deref(),
        Some("comment cannot be empty")
    );

    let response = app.post_form("/stories/9999/like", "", Some(&member)).await;
    assert_eq!(location(&response), "/stories");
    assert_eq!(
        app.notice("/stories", &member).await.as_deref(),
        Some("Story not found")
    );
}

#[tokio::test]
async fn test_concurrent_likes_record_once() {
    let app = spawn_app().await;
    let user = app
        .state
        .account_service()
        .register("amara", "Secr3t!", "Secr3t!")
        .await
        .unwrap();
    let story = app
        .state
        .moderation_service()
        .submit(
            user.id,
            Submission {
                title: "Ngoma".to_string(),
                category: "Music".to_string(),
                content: "Drums at the ceremony.".to_string(),
                image: None,
            },
        )
        .await
        .unwrap();

    let engagement = app.state.engagement_service();
    let (a, b) = tokio::join!(
        engagement.like(user.id, story.id),
        engagement.like(user.id, story.id)
    );
    let mut outcomes = [a.unwrap(), b.unwrap()];
    outcomes.sort_by_key(|o| *o == LikeOutcome::AlreadyLiked);
    assert_eq!(outcomes, [LikeOutcome::Recorded, LikeOutcome::AlreadyLiked]);

    assert_eq!(engagement.like_count(story.id).await.unwrap(), 1);
    assert_eq!(
        engagement.like(user.id, story.id).await.unwrap(),
        LikeOutcome::AlreadyLiked
    );
}

#[tokio::test]
async fn test_home_and_static_assets() {
    let app = spawn_app().await;

    let home = json_body(app.get("/", None).await).await;
    assert_eq!(home["success"], true);
    assert!(home["data"]["featured"].as_array().unwrap().is_empty());
    assert!(home["data"]["latest"].as_array().unwrap().is_empty());

    let categories = json_body(app.get("/categories", None).await).await;
    let names: Vec<&str> = categories["data"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|v| v.as_str())
        .collect();
    assert!(names.contains(&"Food"));
    assert!(names.contains(&"Fashion"));

    let response = app.get("/static/defaults/food.svg", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        mime::IMAGE_SVG.as_ref()
    );

    let response = app.get("/static/defaults/missing.svg", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app.get("/stories/0", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

async fn story_titles_as(app: &TestApp, uri: &str, cookie: &str) -> Vec<String> {
    let json = json_body(app.get(uri, Some(cookie)).await).await;
    json["data"]["stories"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["title"].as_str().unwrap().to_string())
        .collect()
}

async fn story_ids(app: &TestApp, author: &str) -> Vec<StoryId> {
    let user = app
        .state
        .store()
        .get_user_by_username(author)
        .await
        .unwrap()
        .unwrap();
    app.state
        .store()
        .list_stories_by_author(user.id)
        .await
        .unwrap()
        .into_iter()
        .map(|row| StoryId::new(row.id))
        .collect()
}

#[tokio::test]
async fn test_missing_story_ids_take_not_found_paths() {
    let app = spawn_app().await;
    app.register("amara", "Secr3t!").await;
    let member = app.login("amara", "Secr3t!").await;
    let admin = app.admin().await;

    for id in ["0", "-3", "9999"] {
        let response = app
            .post_form(&format!("/admin/stories/{id}/approve"), "", Some(&admin))
            .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "approve {id}");
        assert_eq!(location(&response), "/admin/pending", "approve {id}");
        assert_eq!(app.notice("/admin/pending", &admin).await, None, "approve {id}");

        let response = app
            .post_form(&format!("/stories/{id}/like"), "", Some(&member))
            .await;
        assert_eq!(location(&response), "/stories", "like {id}");
        assert_eq!(
            app.notice("/stories", &member).await.as_deref(),
            Some("Story not found")
        );

        let response = app
            .post_form(&format!("/stories/{id}/comments"), "content=hi", Some(&member))
            .await;
        assert_eq!(location(&response), "/stories", "comment {id}");

        let response = app.get(&format!("/stories/{id}"), None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "get {id}");
    }

    let pending = json_body(app.get("/admin/pending", Some(&admin)).await).await;
    assert!(pending["data"]["stories"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_listing_order() {
    let app = spawn_app().await;
    app.register("amara", "Secr3t!").await;
    let member = app.login("amara", "Secr3t!").await;

    for title in ["First", "Second", "Third"] {
        app.submit(&member, title, "History", "Told by the elders.").await;
    }
    let admin = app.admin().await;

    assert_eq!(
        story_titles_as(&app, "/admin/pending", &admin).await,
        vec!["First", "Second", "Third"]
    );

    let ids = story_ids(&app, "amara").await;
    for id in [ids[1], ids[2], ids[0]] {
        app.approve(&admin, id).await;
    }

    assert_eq!(
        story_titles(&app, "/stories").await,
        vec!["Third", "Second", "First"]
    );
    assert!(story_titles_as(&app, "/admin/pending", &admin).await.is_empty());
}

#[tokio::test]
async fn test_category_counts_exclude_pending_stories() {
    let app = spawn_app().await;
    app.register("amara", "Secr3t!").await;
    let member = app.login("amara", "Secr3t!").await;

    app.submit(&member, "Nshima", "Food", "Maize porridge.").await;
    app.submit(&member, "Chikanda", "Food", "African polony.").await;
    app.submit(&member, "Makishi", "Dance", "Masked dancers.").await;
    app.submit(&member, "Kalindula", "Music", "Bass-driven folk.").await;

    let admin = app.admin().await;
    let pending = json_body(app.get("/admin/pending", Some(&admin)).await).await;
    for story in pending["data"]["stories"].as_array().unwrap() {
        if story["category"] != "Music" {
            let id = StoryId::new(i32::try_from(story["id"].as_i64().unwrap()).unwrap());
            app.approve(&admin, id).await;
        }
    }

    let page = json_body(app.get("/stories", None).await).await;
    assert_eq!(
        page["data"]["categories"],
        serde_json::json!([
            { "name": "Dance", "count": 1 },
            { "name": "Food", "count": 2 },
        ])
    );

    let home = json_body(app.get("/", None).await).await;
    assert_eq!(home["data"]["categories"], page["data"]["categories"]);
}

#[tokio::test]
async fn test_uploaded_image_is_content_addressed_and_served() {
    let app = spawn_app().await;
    app.register("amara", "Secr3t!").await;
    let member = app.login("amara", "Secr3t!").await;

    let bytes: &[u8] = b"\xff\xd8\xff\xe0 not really a jpeg";
    let response = app
        .submit_with_image(
            &member,
            "Harvest Festival",
            "Food",
            "Every April the village gathers.",
            Some(("festival.JPG", bytes)),
        )
        .await;
    assert_eq!(location(&response), "/profile");

    let expected = format!("uploads/{}.jpg", blake3::hash(bytes).to_hex());
    let profile = json_body(app.get("/profile", Some(&member)).await).await;
    assert_eq!(profile["data"]["stories"][0]["image"], expected.as_str());

    let response = app.get(&format!("/{expected}"), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let served = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(served.as_ref(), bytes);

    app.submit_with_image(
        &member,
        "Script",
        "Food",
        "Not an image.",
        Some(("page.html", &b"<script>alert(1)</script>"[..])),
    )
    .await;
    let profile = json_body(app.get("/profile", Some(&member)).await).await;
    let image = profile["data"]["stories"][0]["image"].as_str().unwrap();
    assert!(image.starts_with("uploads/"));
    assert!(image.ends_with(".bin"), "{image}");
}

const SEED_SESSIONS: &str = "INSERT INTO tower_sessions (id, data, expiry_date) VALUES \
     ('stale', x'00', '2000-01-01 00:00:00'), \
     ('live', x'00', '2999-01-01 00:00:00')";

async fn session_ids(app: &TestApp) -> Vec<String> {
    app.state
        .store()
        .conn
        .query_all(Statement::from_string(
            DbBackend::Sqlite,
            "SELECT id FROM tower_sessions ORDER BY id",
        ))
        .await
        .unwrap()
        .iter()
        .map(|row| row.try_get::<String>("", "id").unwrap())
        .collect()
}

#[tokio::test]
async fn test_expired_sessions_are_pruned_at_startup() {
    let app = spawn_app().await;
    app.state
        .store()
        .conn
        .execute_unprepared(SEED_SESSIONS)
        .await
        .unwrap();
    assert_eq!(session_ids(&app).await, vec!["live", "stale"]);

    zamculture::api::session_store(&app.state).await.unwrap();

    assert_eq!(session_ids(&app).await, vec!["live"]);
}

#[tokio::test]
async fn test_expired_sessions_are_pruned_while_running() {
    let app = spawn_app().await;
    let sessions = zamculture::api::session_store(&app.state).await.unwrap();
    app.state
        .store()
        .conn
        .execute_unprepared(SEED_SESSIONS)
        .await
        .unwrap();

    let pruner = zamculture::api::spawn_session_pruning(sessions, Duration::from_millis(20));
    let mut remaining = session_ids(&app).await;
    for _ in 0..50 {
        if remaining == ["live"] {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
        remaining = session_ids(&app).await;
    }
    pruner.abort();

    assert_eq!(remaining, vec!["live"]);
}
