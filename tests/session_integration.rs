mod common;

use assignmentpro::pages::login::{LOGIN_FAILED, LOGIN_SUCCEEDED};
use assignmentpro::pages::{LoginForm, PageError};
use assignmentpro::routes::{MenuAction, Route};
use assignmentpro::session::{Session, TOKEN_KEY};
use assignmentpro::startup::start;
use std::sync::Arc;

use assignmentpro::startup::build_state_with_storage;
use assignmentpro::storage::{FileStorage, LocalStorage, MemoryStorage};
use assignmentpro::utils::notifier::{MemoryNotifier, Severity, Toast};
use common::{build_app, build_app_with_policy, mock_verify, sign_in_as, test_config};
use mockito::{Matcher, Server};
use serde_json::json;

#[tokio::test]
async fn integration_start_without_token_makes_no_request() {
    let mut server = Server::new_async().await;
    let verify = server
        .mock("GET", "/api/auth/verify")
        .expect(0)
        .create_async()
        .await;
    let app = build_app(&server);

    let session = start(&app.state).await;

    assert_eq!(session, Session::empty());
    verify.assert_async().await;
    let nav = app.state.router.navigate("/dashboard", &session).unwrap();
    assert_eq!(nav.rendered, Route::Login);
}

#[tokio::test]
async fn integration_admin_token_is_restored() {
    let mut server = Server::new_async().await;
    let app = build_app(&server);

    let session = sign_in_as(&app, &mut server, "admin").await;

    assert!(session.is_authenticated());
    assert!(session.is_admin());
    assert_eq!(
        session.identity().map(|i| i.email.as_str()),
        Some("admin@example.com")
    );
    let nav = app.state.router.navigate("/login", &session).unwrap();
    assert_eq!(nav.rendered, Route::AdminDashboard);
    let nav = app.state.router.navigate("/", &session).unwrap();
    assert_eq!(nav.rendered, Route::AdminDashboard);
}

#[tokio::test]
async fn integration_user_is_sent_to_dashboard_from_anonymous_routes() {
    let mut server = Server::new_async().await;
    let app = build_app(&server);

    let session = sign_in_as(&app, &mut server, "user").await;

    assert!(!session.is_admin());
    for path in ["/", "/login", "/signup/"] {
        let nav = app.state.router.navigate(path, &session).unwrap();
        assert_eq!(nav.rendered, Route::Dashboard, "{}", path);
    }
}

#[tokio::test]
async fn integration_rejected_token_is_discarded() {
    let mut server = Server::new_async().await;
    let _verify = server
        .mock("GET", "/api/auth/verify")
        .with_status(401)
        .with_body(r#"{"message":"Token expired"}"#)
        .create_async()
        .await;
    let app = build_app(&server);
    app.storage.set_item(TOKEN_KEY, "stale").unwrap();

    let session = start(&app.state).await;

    assert_eq!(session, Session::empty());
    assert_eq!(app.storage.get_item(TOKEN_KEY).unwrap(), None);
    assert!(app.notifier.toasts().is_empty());
}

#[tokio::test]
async fn integration_malformed_verify_body_is_discarded() {
    let mut server = Server::new_async().await;
    let _verify = server
        .mock("GET", "/api/auth/verify")
        .with_status(200)
        .with_body("<html>maintenance</html>")
        .create_async()
        .await;
    let app = build_app(&server);
    app.storage.set_item(TOKEN_KEY, "tok").unwrap();

    let session = start(&app.state).await;

    assert!(!session.is_authenticated());
    assert_eq!(app.storage.get_item(TOKEN_KEY).unwrap(), None);
}

#[tokio::test]
async fn integration_unreachable_backend_discards_token() {
    let config = Arc::new(test_config("http://127.0.0.1:1", "render-all"));
    let storage = Arc::new(MemoryStorage::new());
    let notifier = Arc::new(MemoryNotifier::new());
    let state = build_state_with_storage(config, storage.clone(), notifier.clone()).unwrap();
    storage.set_item(TOKEN_KEY, "tok").unwrap();

    let session = start(&state).await;

    assert_eq!(session, Session::empty());
    assert_eq!(state.session(), Session::empty());
    assert_eq!(storage.get_item(TOKEN_KEY).unwrap(), None);
    assert!(notifier.toasts().is_empty());
}

#[tokio::test]
async fn integration_login_recovers_from_corrupt_state_file() {
    let mut server = Server::new_async().await;
    let _login = server
        .mock("POST", "/api/auth/login")
        .with_status(200)
        .with_body(r#"{"token":"abc","role":"user"}"#)
        .create_async()
        .await;
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");
    std::fs::write(&path, r#"{"token": "abc""#).unwrap();
    let storage = Arc::new(FileStorage::new(&path));
    let config = Arc::new(test_config(&server.url(), "render-all"));
    let state =
        build_state_with_storage(config, storage.clone(), Arc::new(MemoryNotifier::new()))
            .unwrap();

    assert_eq!(state.session.verify().await, Session::empty());
    state.session.logout();
    let identity = state.session.login("user@example.com", "secret").await.unwrap();

    assert_eq!(identity.role.to_string(), "user");
    assert!(state.session().is_authenticated());
    assert_eq!(storage.get_item(TOKEN_KEY).unwrap().as_deref(), Some("abc"));
    let raw = std::fs::read_to_string(&path).unwrap();
    let document: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(document["token"], "abc");
}

#[tokio::test]
async fn integration_login_as_user() {
    let mut server = Server::new_async().await;
    let login = server
        .mock("POST", "/api/auth/login")
        .match_body(Matcher::Json(json!({
            "email": "user@example.com",
            "password": "secret"
        })))
        .with_status(200)
        .with_body(r#"{"token":"abc","role":"user"}"#)
        .create_async()
        .await;
    let app = build_app(&server);
    start(&app.state).await;

    let landing = LoginForm::new("user@example.com", "secret")
        .submit(&app.state)
        .await
        .unwrap();

    login.assert_async().await;
    assert_eq!(landing, Route::Dashboard);
    assert_eq!(
        app.storage.get_item(TOKEN_KEY).unwrap().as_deref(),
        Some("abc")
    );
    let session = app.state.session();
    assert!(session.is_authenticated());
    assert!(!session.is_admin());
    assert_eq!(app.notifier.last(), Some(Toast::success(LOGIN_SUCCEEDED)));
}

#[tokio::test]
async fn integration_login_as_admin_lands_on_admin_dashboard() {
    let mut server = Server::new_async().await;
    let _login = server
        .mock("POST", "/api/auth/login")
        .with_status(200)
        .with_body(r#"{"_id":"9","name":"Root","email":"root@example.com","role":"admin","token":"xyz"}"#)
        .create_async()
        .await;
    let app = build_app(&server);
    let mut updates = app.state.session.subscribe();

    let landing = LoginForm::new("root@example.com", "pw")
        .submit(&app.state)
        .await
        .unwrap();

    assert_eq!(landing, Route::AdminDashboard);
    assert!(updates.has_changed().unwrap());
    assert!(updates.borrow_and_update().is_admin());
}

#[tokio::test]
async fn integration_failed_login_keeps_session() {
    let mut server = Server::new_async().await;
    let _login = server
        .mock("POST", "/api/auth/login")
        .with_status(400)
        .with_body(r#"{"message":"Invalid credentials"}"#)
        .create_async()
        .await;
    let app = build_app(&server);
    start(&app.state).await;

    let err = LoginForm::new("user@example.com", "wrong")
        .submit(&app.state)
        .await
        .unwrap_err();

    assert!(matches!(err, PageError::Login(_)));
    assert_eq!(app.state.session(), Session::empty());
    assert_eq!(app.storage.get_item(TOKEN_KEY).unwrap(), None);
    let toast = app.notifier.last().unwrap();
    assert_eq!(toast.severity, Severity::Error);
    assert_eq!(toast.message, LOGIN_FAILED);
}

#[tokio::test]
async fn integration_login_with_empty_token_is_rejected() {
    let mut server = Server::new_async().await;
    let _login = server
        .mock("POST", "/api/auth/login")
        .with_status(200)
        .with_body(r#"{"token":"","role":"user"}"#)
        .create_async()
        .await;
    let app = build_app(&server);

    let result = LoginForm::new("user@example.com", "secret")
        .submit(&app.state)
        .await;

    assert!(result.is_err());
    assert!(!app.state.session().is_authenticated());
}

#[tokio::test]
async fn integration_empty_login_form_sends_nothing() {
    let mut server = Server::new_async().await;
    let login = server
        .mock("POST", "/api/auth/login")
        .expect(0)
        .create_async()
        .await;
    let app = build_app(&server);

    let err = LoginForm::new("  ", "").submit(&app.state).await.unwrap_err();

    assert!(matches!(err, PageError::Validation(_)));
    login.assert_async().await;
}

#[tokio::test]
async fn integration_logout_then_restart_is_anonymous() {
    let mut server = Server::new_async().await;
    let app = build_app(&server);
    sign_in_as(&app, &mut server, "user").await;

    app.state.session.logout();
    let verify = server
        .mock("GET", "/api/auth/verify")
        .expect(0)
        .create_async()
        .await;
    let session = start(&app.state).await;

    assert_eq!(session, Session::empty());
    assert_eq!(app.storage.get_item(TOKEN_KEY).unwrap(), None);
    verify.assert_async().await;
}

#[tokio::test]
async fn integration_relocate_admins_policy() {
    let mut server = Server::new_async().await;
    let app = build_app_with_policy(&server, "relocate-admins");
    let session = sign_in_as(&app, &mut server, "admin").await;

    for path in ["/dashboard", "/submit-assignment", "/edit-pricing"] {
        let nav = app.state.router.navigate(path, &session).unwrap();
        assert_eq!(nav.rendered, Route::AdminDashboard, "{}", path);
    }
    let nav = app.state.router.navigate("/pricing", &session).unwrap();
    assert_eq!(nav.rendered, Route::Pricing);
}

#[tokio::test]
async fn integration_menu_follows_session() {
    let mut server = Server::new_async().await;
    let app = build_app(&server);

    let anonymous: Vec<_> = assignmentpro::routes::menu(&app.state.session())
        .into_iter()
        .map(|item| item.label)
        .collect();
    assert!(anonymous.contains(&"Login"));
    assert!(!anonymous.contains(&"Logout"));

    let _verify = mock_verify(&mut server, "tok", "user").await;
    app.storage.set_item(TOKEN_KEY, "tok").unwrap();
    let session = start(&app.state).await;
    let items = assignmentpro::routes::menu(&session);
    assert!(items
        .iter()
        .any(|item| item.action == MenuAction::Navigate(Route::SubmitAssignment)));
    assert!(items.iter().any(|item| item.action == MenuAction::Logout));
}
