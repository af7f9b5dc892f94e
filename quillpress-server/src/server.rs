use axum::Router;
use tokio::net::TcpListener;
use tracing::info;

use crate::infrastructure::settings::Settings;
use crate::presentation::middleware::layers::{apply_limits, apply_session, apply_trace};
use crate::presentation::{AppState, http_handlers};

pub(crate) async fn run_http(settings: &Settings, state: AppState) -> anyhow::Result<()> {
    let app = build_app(settings, state);

    let listener = TcpListener::bind(&settings.http_addr).await?;

    info!("HTTP server listening on {}", settings.http_addr);
    axum::serve(listener, app).await?;
    Ok(())
}

pub(crate) fn build_app(settings: &Settings, state: AppState) -> Router {
    let app = http_handlers::routes(state);
    let app = apply_session(app, settings);
    let app = apply_limits(app, settings);
    apply_trace(app)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use axum::Router;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use lettre::{AsyncSmtpTransport, Tokio1Executor};
    use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
    use tower::ServiceExt;

    use super::build_app;
    use crate::application::auth_service::AuthService;
    use crate::application::blog_service::BlogService;
    use crate::application::contact_service::ContactService;
    use crate::data::repositories::sqlite::comment_repository::SqliteCommentRepository;
    use crate::data::repositories::sqlite::post_repository::SqlitePostRepository;
    use crate::data::repositories::sqlite::user_repository::SqliteUserRepository;
    use crate::infrastructure::settings::Settings;
    use crate::presentation::AppState;

    async fn test_app() -> Router {
        let options = SqliteConnectOptions::new()
            .in_memory(true)
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .expect("pool");
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .expect("migrations");

        // nothing listens on port 1, so contact sends always fail fast
        let mailer = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous("127.0.0.1")
            .port(1)
            .timeout(Some(Duration::from_millis(200)))
            .build();
        let sender = "blog@example.com".parse().expect("mailbox");

        let state = AppState::new(
            Arc::new(AuthService::new(SqliteUserRepository::new(pool.clone()))),
            Arc::new(BlogService::new(
                SqlitePostRepository::new(pool.clone()),
                SqliteCommentRepository::new(pool),
            )),
            Arc::new(ContactService::new(mailer, sender)),
        );

        build_app(&test_settings(), state)
    }

    fn test_settings() -> Settings {
        Settings {
            database_url: "sqlite::memory:".to_string(),
            session_secret: "0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef"
                .to_string(),
            smtp_sender: "blog@example.com".to_string(),
            smtp_password: "unused".to_string(),
            smtp_host: "127.0.0.1".to_string(),
            smtp_port: 1,
            smtp_timeout_secs: 1,
            http_addr: "127.0.0.1:0".to_string(),
            log_level: "info".to_string(),
            http_request_body_limit_bytes: 1024 * 1024,
            http_request_timeout_secs: 10,
            secure_cookies: false,
        }
    }

    fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().method("GET").uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder.body(Body::empty()).expect("request")
    }

    fn post_form(uri: &str, cookie: Option<&str>, body: &str) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder.body(Body::from(body.to_string())).expect("request")
    }

    fn session_cookie(response: &axum::response::Response) -> Option<String> {
        response
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .find(|value| value.starts_with("quillpress-session="))
            .and_then(|value| value.split(';').next())
            .map(str::to_string)
    }

    fn location(response: &axum::response::Response) -> &str {
        response
            .headers()
            .get(header::LOCATION)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        serde_json::from_slice(&bytes).expect("json")
    }

    async fn register_user(app: &Router, name: &str, email: &str, password: &str) {
        let body = format!("name={name}&email={email}&password={password}");
        let res = app
            .clone()
            .oneshot(post_form("/register", None, &body))
            .await
            .expect("response");
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&res), "/login");
    }

    async fn login_user(app: &Router, email: &str, password: &str) -> String {
        let body = format!("email={email}&password={password}");
        let res = app
            .clone()
            .oneshot(post_form("/login", None, &body))
            .await
            .expect("response");
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&res), "/");
        session_cookie(&res).expect("session cookie")
    }

    #[tokio::test]
    async fn healthz_reports_ok() {
        let app = test_app().await;

        let res = app.oneshot(get("/healthz", None)).await.expect("response");
        assert_eq!(res.status(), StatusCode::OK);
        let body = body_json(res).await;
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn publishing_flow_from_registration_to_deletion() {
        let app = test_app().await;

        register_user(&app, "Ada", "ada@example.com", "correct-horse-battery").await;
        register_user(&app, "Grace", "grace@example.com", "another-long-password").await;

        let admin = login_user(&app, "ada@example.com", "correct-horse-battery").await;
        let reader = login_user(&app, "grace@example.com", "another-long-password").await;

        let res = app
            .clone()
            .oneshot(post_form(
                "/new-post",
                Some(&admin),
                "title=First%20Light&subtitle=Beginnings&img_url=https%3A%2F%2Fexample.com%2Fa.png&body=%3Cp%3EHello%3C%2Fp%3E",
            ))
            .await
            .expect("response");
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&res), "/");

        let res = app.clone().oneshot(get("/", None)).await.expect("response");
        assert_eq!(res.status(), StatusCode::OK);
        let home = body_json(res).await;
        assert_eq!(home["posts"].as_array().expect("posts").len(), 1);
        assert_eq!(home["posts"][0]["title"], "First Light");
        let post_id = home["posts"][0]["id"].as_i64().expect("post id");

        let res = app
            .clone()
            .oneshot(post_form(
                &format!("/post/{post_id}"),
                Some(&reader),
                "comment=Lovely%20read",
            ))
            .await
            .expect("response");
        assert_eq!(res.status(), StatusCode::SEE_OTHER);

        let res = app
            .clone()
            .oneshot(get(&format!("/post/{post_id}"), None))
            .await
            .expect("response");
        let page = body_json(res).await;
        assert_eq!(page["comments"].as_array().expect("comments").len(), 1);
        assert_eq!(page["comments"][0]["text"], "Lovely read");

        let res = app
            .clone()
            .oneshot(post_form(
                &format!("/edit-post/{post_id}"),
                Some(&admin),
                "title=Second%20Light&subtitle=Beginnings&img_url=https%3A%2F%2Fexample.com%2Fa.png&body=%3Cp%3EHello%3C%2Fp%3E",
            ))
            .await
            .expect("response");
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&res), format!("/post/{post_id}"));

        let res = app
            .clone()
            .oneshot(post_form(&format!("/delete/{post_id}"), Some(&admin), ""))
            .await
            .expect("response");
        assert_eq!(res.status(), StatusCode::SEE_OTHER);

        let res = app.clone().oneshot(get("/", None)).await.expect("response");
        let home = body_json(res).await;
        assert!(home["posts"].as_array().expect("posts").is_empty());
    }

    #[tokio::test]
    async fn post_management_is_admin_only() {
        let app = test_app().await;

        register_user(&app, "Ada", "ada@example.com", "correct-horse-battery").await;
        register_user(&app, "Grace", "grace@example.com", "another-long-password").await;
        let reader = login_user(&app, "grace@example.com", "another-long-password").await;

        let form = "title=T&subtitle=S&img_url=https%3A%2F%2Fexample.com%2Fa.png&body=B";

        let res = app
            .clone()
            .oneshot(post_form("/new-post", None, form))
            .await
            .expect("response");
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

        let res = app
            .clone()
            .oneshot(get("/new-post", None))
            .await
            .expect("response");
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

        let res = app
            .clone()
            .oneshot(post_form("/new-post", Some(&reader), form))
            .await
            .expect("response");
        assert_eq!(res.status(), StatusCode::FORBIDDEN);

        let res = app
            .clone()
            .oneshot(post_form("/edit-post/1", Some(&reader), form))
            .await
            .expect("response");
        assert_eq!(res.status(), StatusCode::FORBIDDEN);

        let res = app
            .clone()
            .oneshot(post_form("/delete/1", Some(&reader), ""))
            .await
            .expect("response");
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn failed_login_flashes_once() {
        let app = test_app().await;
        register_user(&app, "Ada", "ada@example.com", "correct-horse-battery").await;

        let res = app
            .clone()
            .oneshot(post_form(
                "/login",
                None,
                "email=ada%40example.com&password=wrong-password",
            ))
            .await
            .expect("response");
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&res), "/login");
        let cookie = session_cookie(&res).expect("flash session");

        let res = app
            .clone()
            .oneshot(get("/login", Some(&cookie)))
            .await
            .expect("response");
        let page = body_json(res).await;
        assert_eq!(page["flashes"][0]["message"], "Invalid email or password.");

        let res = app
            .clone()
            .oneshot(get("/login", Some(&cookie)))
            .await
            .expect("response");
        let page = body_json(res).await;
        assert!(page["flashes"].as_array().expect("flashes").is_empty());
    }

    #[tokio::test]
    async fn malformed_login_gets_the_same_flash() {
        let app = test_app().await;

        let res = app
            .clone()
            .oneshot(post_form(
                "/login",
                None,
                "email=not-an-email&password=whatever",
            ))
            .await
            .expect("response");
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&res), "/login");
        let cookie = session_cookie(&res).expect("flash session");

        let res = app
            .clone()
            .oneshot(get("/login", Some(&cookie)))
            .await
            .expect("response");
        let page = body_json(res).await;
        assert_eq!(page["flashes"][0]["message"], "Invalid email or password.");
    }

    #[tokio::test]
    async fn duplicate_registration_is_flashed() {
        let app = test_app().await;
        register_user(&app, "Ada", "ada@example.com", "correct-horse-battery").await;

        let res = app
            .clone()
            .oneshot(post_form(
                "/register",
                None,
                "name=Other&email=ada%40example.com&password=some-long-password",
            ))
            .await
            .expect("response");
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&res), "/register");
        let cookie = session_cookie(&res).expect("flash session");

        let res = app
            .clone()
            .oneshot(get("/register", Some(&cookie)))
            .await
            .expect("response");
        let page = body_json(res).await;
        assert_eq!(
            page["flashes"][0]["message"],
            "Provided email is already registered."
        );
    }

    #[tokio::test]
    async fn duplicate_title_is_flashed() {
        let app = test_app().await;
        register_user(&app, "Ada", "ada@example.com", "correct-horse-battery").await;
        let admin = login_user(&app, "ada@example.com", "correct-horse-battery").await;

        let form = "title=First%20Light&subtitle=S&img_url=https%3A%2F%2Fexample.com%2Fa.png&body=B";
        let res = app
            .clone()
            .oneshot(post_form("/new-post", Some(&admin), form))
            .await
            .expect("response");
        assert_eq!(res.status(), StatusCode::SEE_OTHER);

        let res = app
            .clone()
            .oneshot(post_form("/new-post", Some(&admin), form))
            .await
            .expect("response");
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&res), "/new-post");

        let res = app
            .clone()
            .oneshot(get("/new-post", Some(&admin)))
            .await
            .expect("response");
        let page = body_json(res).await;
        assert_eq!(
            page["flashes"][0]["message"],
            "A post with that title already exists."
        );
    }

    #[tokio::test]
    async fn renaming_onto_taken_title_is_flashed() {
        let app = test_app().await;
        register_user(&app, "Ada", "ada@example.com", "correct-horse-battery").await;
        let admin = login_user(&app, "ada@example.com", "correct-horse-battery").await;

        for form in [
            "title=First%20Light&subtitle=S&img_url=https%3A%2F%2Fexample.com%2Fa.png&body=B",
            "title=Second%20Light&subtitle=S&img_url=https%3A%2F%2Fexample.com%2Fa.png&body=B",
        ] {
            let res = app
                .clone()
                .oneshot(post_form("/new-post", Some(&admin), form))
                .await
                .expect("response");
            assert_eq!(res.status(), StatusCode::SEE_OTHER);
            assert_eq!(location(&res), "/");
        }

        let res = app
            .clone()
            .oneshot(post_form(
                "/edit-post/2",
                Some(&admin),
                "title=First%20Light&subtitle=S&img_url=https%3A%2F%2Fexample.com%2Fa.png&body=B",
            ))
            .await
            .expect("response");
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&res), "/edit-post/2");

        let res = app
            .clone()
            .oneshot(get("/edit-post/2", Some(&admin)))
            .await
            .expect("response");
        let page = body_json(res).await;
        assert_eq!(
            page["flashes"][0]["message"],
            "A post with that title already exists."
        );
        assert_eq!(page["post"]["title"], "Second Light");
    }

    #[tokio::test]
    async fn anonymous_comment_is_dropped_with_notice() {
        let app = test_app().await;
        register_user(&app, "Ada", "ada@example.com", "correct-horse-battery").await;
        let admin = login_user(&app, "ada@example.com", "correct-horse-battery").await;

        let res = app
            .clone()
            .oneshot(post_form(
                "/new-post",
                Some(&admin),
                "title=First&subtitle=S&img_url=https%3A%2F%2Fexample.com%2Fa.png&body=B",
            ))
            .await
            .expect("response");
        assert_eq!(res.status(), StatusCode::SEE_OTHER);

        let res = app
            .clone()
            .oneshot(post_form("/post/1", None, "comment=hello"))
            .await
            .expect("response");
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&res), "/post/1");
        let cookie = session_cookie(&res).expect("flash session");

        let res = app
            .clone()
            .oneshot(get("/post/1", Some(&cookie)))
            .await
            .expect("response");
        let page = body_json(res).await;
        assert_eq!(page["flashes"][0]["message"], "Please login to post comment.");
        assert!(page["comments"].as_array().expect("comments").is_empty());
    }

    #[tokio::test]
    async fn delete_only_answers_post() {
        let app = test_app().await;

        let res = app.oneshot(get("/delete/1", None)).await.expect("response");
        assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn contact_failure_is_flashed_not_fatal() {
        let app = test_app().await;

        let res = app
            .clone()
            .oneshot(post_form(
                "/contact",
                None,
                "username=Ada&email=ada%40example.com&phone=555&message=Hi",
            ))
            .await
            .expect("response");
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&res), "/contact");
        let cookie = session_cookie(&res).expect("flash session");

        let res = app
            .clone()
            .oneshot(get("/contact", Some(&cookie)))
            .await
            .expect("response");
        let page = body_json(res).await;
        assert_eq!(page["flashes"][0]["message"], "Failed to send email.");
        assert_eq!(page["flashes"][0]["level"], "error");
    }

    #[tokio::test]
    async fn missing_post_is_not_found() {
        let app = test_app().await;

        let res = app.oneshot(get("/post/999", None)).await.expect("response");
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn logout_clears_the_session() {
        let app = test_app().await;
        register_user(&app, "Ada", "ada@example.com", "correct-horse-battery").await;
        let cookie = login_user(&app, "ada@example.com", "correct-horse-battery").await;

        let res = app
            .clone()
            .oneshot(get("/", Some(&cookie)))
            .await
            .expect("response");
        let home = body_json(res).await;
        assert_eq!(home["logged_in"], true);
        assert_eq!(home["user_id"], 1);

        let res = app
            .clone()
            .oneshot(get("/logout", Some(&cookie)))
            .await
            .expect("response");
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&res), "/");

        let res = app
            .clone()
            .oneshot(get("/", Some(&cookie)))
            .await
            .expect("response");
        let home = body_json(res).await;
        assert_eq!(home["logged_in"], false);

        let res = app
            .clone()
            .oneshot(get("/logout", None))
            .await
            .expect("response");
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }
}
