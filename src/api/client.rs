use std::time::Duration;

use async_trait::async_trait;
use http::header::AUTHORIZATION;
use reqwest::multipart::{Form, Part};
use serde_json::json;
use tracing::{debug, info};

use super::{ApiError, AuthBackend};
use crate::config::ConfigV1;
use crate::models::{
    Assignment, AssignmentStatus, Attachment, Identity, LoginRequest, LoginResponse,
    NewAssignment, Pricing, PricingDocument, SignupRequest, VerifyResponse,
};
use crate::utils::http_helpers::{bearer, check_status, read_json};

/// HTTP client for the marketplace backend. Cheap to clone; all clones share one connection pool.
#[derive(Clone, Debug)]
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl ApiClient {
    /// Creates a client for the configured backend with the configured request timeout.
    pub fn new(config: &ConfigV1) -> Result<Self, ApiError> {
        Self::with_base_url(
            &config.normalized_base_url(),
            Duration::from_millis(config.request_timeout_in_ms),
        )
    }

    pub fn with_base_url(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        let base_url = format!("{}/", base_url.trim_end_matches('/'));
        info!("Creating ApiClient for backend '{}'", base_url);
        Ok(ApiClient { base_url, http })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Backend paths are relative (`api/pricing`), matching how stored file paths come back.
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path.trim_start_matches('/'))
    }

    /// `POST api/auth/register`, the public sign-up form.
    pub async fn register(&self, request: &SignupRequest) -> Result<(), ApiError> {
        debug!("Registering account for '{}'", request.email);
        let response = self
            .http
            .post(self.url("api/auth/register"))
            .json(request)
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }

    /// `POST api/auth/signup`, the admin sign-up form.
    pub async fn signup(&self, request: &SignupRequest) -> Result<(), ApiError> {
        debug!("Signing up account for '{}'", request.email);
        let response = self
            .http
            .post(self.url("api/auth/signup"))
            .json(request)
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }

    /// `GET api/assignments/all`: every submission, admin only.
    pub async fn all_assignments(&self, token: &str) -> Result<Vec<Assignment>, ApiError> {
        let response = self
            .http
            .get(self.url("api/assignments/all"))
            .header(AUTHORIZATION, bearer(token)?)
            .send()
            .await?;
        read_json(response).await
    }

    /// `GET api/assignments/my`: the caller's own submissions.
    pub async fn my_assignments(&self, token: &str) -> Result<Vec<Assignment>, ApiError> {
        let response = self
            .http
            .get(self.url("api/assignments/my"))
            .header(AUTHORIZATION, bearer(token)?)
            .send()
            .await?;
        read_json(response).await
    }

    /// `POST api/assignments` as a multipart form.
    pub async fn submit_assignment(
        &self,
        token: &str,
        assignment: &NewAssignment,
    ) -> Result<(), ApiError> {
        let form = Form::new()
            .text("title", assignment.title.clone())
            .text("description", assignment.description.clone())
            .text("price", assignment.price.clone())
            .part("assignmentFile", file_part(&assignment.assignment_file)?)
            .part("answerKeyFile", file_part(&assignment.answer_key_file)?);

        debug!(
            "Submitting assignment '{}' ({} + {} bytes)",
            assignment.title,
            assignment.assignment_file.bytes.len(),
            assignment.answer_key_file.bytes.len()
        );
        let response = self
            .http
            .post(self.url("api/assignments"))
            .header(AUTHORIZATION, bearer(token)?)
            .multipart(form)
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }

    /// `PATCH api/assignments/:id/status`.
    pub async fn update_assignment_status(
        &self,
        token: &str,
        id: &str,
        status: AssignmentStatus,
    ) -> Result<(), ApiError> {
        let response = self
            .http
            .patch(self.url(&format!("api/assignments/{}/status", id)))
            .header(AUTHORIZATION, bearer(token)?)
            .json(&json!({ "status": status }))
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }

    /// `DELETE api/assignments/:id`.
    pub async fn delete_assignment(&self, token: &str, id: &str) -> Result<(), ApiError> {
        let response = self
            .http
            .delete(self.url(&format!("api/assignments/{}", id)))
            .header(AUTHORIZATION, bearer(token)?)
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }

    /// `GET api/pricing` is public, no token required.
    pub async fn pricing(&self) -> Result<PricingDocument, ApiError> {
        let response = self.http.get(self.url("api/pricing")).send().await?;
        read_json(response).await
    }

    /// `PUT api/pricing`. The token is attached when one is available.
    pub async fn update_pricing(
        &self,
        token: Option<&str>,
        pricing: &Pricing,
    ) -> Result<(), ApiError> {
        let mut request = self.http.put(self.url("api/pricing")).json(pricing);
        if let Some(token) = token {
            request = request.header(AUTHORIZATION, bearer(token)?);
        }
        check_status(request.send().await?).await?;
        Ok(())
    }

    /// Downloads a stored file by the backend-relative path found on an `Assignment`.
    pub async fn fetch_file(&self, path: &str) -> Result<Vec<u8>, ApiError> {
        let response = self.http.get(self.url(path)).send().await?;
        let response = check_status(response).await?;
        Ok(response.bytes().await?.to_vec())
    }
}

fn file_part(attachment: &Attachment) -> Result<Part, ApiError> {
    let part = Part::bytes(attachment.bytes.clone())
        .file_name(attachment.file_name.clone())
        .mime_str(mime_for(&attachment.file_name))?;
    Ok(part)
}

fn mime_for(file_name: &str) -> &'static str {
    let lower = file_name.to_ascii_lowercase();
    if lower.ends_with(".pdf") {
        "application/pdf"
    } else if lower.ends_with(".docx") {
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
    } else if lower.ends_with(".doc") {
        "application/msword"
    } else {
        "application/octet-stream"
    }
}

#[async_trait]
impl AuthBackend for ApiClient {
    fn get_name(&self) -> &str {
        &self.base_url
    }

    /// `GET api/auth/verify` with the token as bearer credential.
    async fn verify(&self, token: &str) -> Result<Identity, ApiError> {
        debug!("Verifying stored token against '{}'", self.base_url);
        let response = self
            .http
            .get(self.url("api/auth/verify"))
            .header(AUTHORIZATION, bearer(token)?)
            .send()
            .await?;
        let body: VerifyResponse = read_json(response).await?;
        Ok(body.user)
    }

    /// `POST api/auth/login`.
    async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ApiError> {
        debug!("Logging in '{}'", email);
        let response = self
            .http
            .post(self.url("api/auth/login"))
            .json(&LoginRequest { email, password })
            .send()
            .await?;
        let body: LoginResponse = read_json(response).await?;
        if body.token.trim().is_empty() {
            return Err(ApiError::Incomplete("a token"));
        }
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PricingTier, Role};
    use mockito::{Matcher, Server};

    fn client(url: &str) -> ApiClient {
        ApiClient::with_base_url(url, Duration::from_secs(5)).expect("client should build")
    }

    #[tokio::test]
    async fn test_verify_sends_bearer_and_reads_user() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("GET", "/api/auth/verify")
            .match_header("authorization", "Bearer tok-1")
            .with_status(200)
            .with_body(r#"{"user":{"_id":"u1","name":"Asha","email":"a@x.io","role":"admin"}}"#)
            .create_async()
            .await;

        let identity = client(&server.url()).verify("tok-1").await.unwrap();

        m.assert_async().await;
        assert_eq!(identity.id, "u1");
        assert_eq!(identity.role, Role::Admin);
    }

    #[tokio::test]
    async fn test_verify_unauthorized() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/api/auth/verify")
            .with_status(401)
            .with_body(r#"{"message":"Token expired"}"#)
            .create_async()
            .await;

        let err = client(&server.url()).verify("stale").await.unwrap_err();
        assert_eq!(err.status(), Some(401));
        assert_eq!(err.server_message(), Some("Token expired"));
    }

    #[tokio::test]
    async fn test_verify_malformed_body_is_decode_error() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/api/auth/verify")
            .with_status(200)
            .with_body(r#"{"user":{"name":"no role"}}"#)
            .create_async()
            .await;

        let err = client(&server.url()).verify("tok").await.unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)), "got {:?}", err);
    }

    #[tokio::test]
    async fn test_login_posts_credentials() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("POST", "/api/auth/login")
            .match_body(Matcher::Json(json!({"email": "a@x.io", "password": "pw"})))
            .with_status(200)
            .with_body(r#"{"token":"abc","role":"user","name":"Asha"}"#)
            .create_async()
            .await;

        let response = client(&server.url()).login("a@x.io", "pw").await.unwrap();

        m.assert_async().await;
        assert_eq!(response.token, "abc");
        assert_eq!(response.identity.name, "Asha");
    }

    #[tokio::test]
    async fn test_login_with_empty_token_is_rejected() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/api/auth/login")
            .with_status(200)
            .with_body(r#"{"token":"","role":"user"}"#)
            .create_async()
            .await;

        let err = client(&server.url()).login("a@x.io", "pw").await.unwrap_err();
        assert!(matches!(err, ApiError::Incomplete(_)));
    }

    #[tokio::test]
    async fn test_base_url_trailing_slash_is_normalized() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("GET", "/api/pricing")
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        let api = client(&format!("{}/", server.url()));
        assert!(api.base_url().ends_with('/') && !api.base_url().ends_with("//"));
        let doc = api.pricing().await.unwrap();

        m.assert_async().await;
        assert!(doc.complete().is_none());
    }

    #[tokio::test]
    async fn test_update_status_patches_json() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("PATCH", "/api/assignments/a7/status")
            .match_header("authorization", "Bearer tok")
            .match_body(Matcher::Json(json!({"status": "in-progress"})))
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        client(&server.url())
            .update_assignment_status("tok", "a7", AssignmentStatus::InProgress)
            .await
            .unwrap();
        m.assert_async().await;
    }

    #[tokio::test]
    async fn test_submit_assignment_is_multipart() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("POST", "/api/assignments")
            .match_header("authorization", "Bearer tok")
            .match_header(
                "content-type",
                Matcher::Regex("^multipart/form-data; boundary=".to_string()),
            )
            .match_body(Matcher::AllOf(vec![
                Matcher::Regex(r#"name="title""#.to_string()),
                Matcher::Regex(r#"name="assignmentFile"; filename="essay.pdf""#.to_string()),
                Matcher::Regex(r#"name="answerKeyFile"; filename="key.docx""#.to_string()),
            ]))
            .with_status(201)
            .with_body("{}")
            .create_async()
            .await;

        let payload = NewAssignment {
            title: "Essay".into(),
            description: "Five pages".into(),
            price: "250".into(),
            assignment_file: Attachment::new("essay.pdf", b"%PDF".to_vec()),
            answer_key_file: Attachment::new("key.docx", b"PK".to_vec()),
        };
        client(&server.url())
            .submit_assignment("tok", &payload)
            .await
            .unwrap();
        m.assert_async().await;
    }

    #[tokio::test]
    async fn test_update_pricing_without_token() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("PUT", "/api/pricing")
            .match_header("authorization", Matcher::Missing)
            .match_body(Matcher::PartialJson(json!({"basic": {"price": 40.0}})))
            .with_status(200)
            .create_async()
            .await;

        let pricing = Pricing {
            basic: PricingTier {
                price: 40.0,
                ..Default::default()
            },
            standard: PricingTier::default(),
        };
        client(&server.url())
            .update_pricing(None, &pricing)
            .await
            .unwrap();
        m.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_file_uses_relative_path() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/uploads/a1.pdf")
            .with_status(200)
            .with_body("pdf-bytes")
            .create_async()
            .await;

        let bytes = client(&server.url())
            .fetch_file("uploads/a1.pdf")
            .await
            .unwrap();
        assert_eq!(bytes, b"pdf-bytes");
    }

    #[test]
    fn test_mime_for() {
        assert_eq!(mime_for("A.PDF"), "application/pdf");
        assert_eq!(mime_for("a.doc"), "application/msword");
        assert_eq!(mime_for("a.bin"), "application/octet-stream");
    }
}
