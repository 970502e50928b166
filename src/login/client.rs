//! Client for the Donar authentication endpoint. The endpoint sets the session
//! cookie on the same response that reports success, so the HTTP client keeps a
//! cookie jar and reuses it when probing protected routes.

use super::{credentials::LoginRequest, errors::LoginError, types::AuthResult};
use crate::APP_USER_AGENT;
use async_trait::async_trait;
use reqwest::{Client, redirect::Policy};
use serde_json::Value;
use std::time::Duration;
use tracing::{Instrument, debug, info_span};
use url::Url;

pub const LOGIN_PATH: &str = "/api/login";
pub const REGISTER_PATH: &str = "/register";

/// Default request timeout applied to every call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Authentication endpoint abstraction used by `LoginFlow`.
#[async_trait]
pub trait AuthClient: Send + Sync {
    /// Submits credentials once. A rejected login is `Ok` with
    /// `success == false`; only transport and decoding problems are `Err`.
    async fn login(&self, request: &LoginRequest) -> Result<AuthResult, LoginError>;

    /// Reports whether `path` is reachable with the session established by
    /// the last successful login.
    async fn session_established(&self, path: &str) -> Result<bool, LoginError> {
        let _ = path;
        Ok(true)
    }
}

#[derive(Clone, Debug)]
pub struct HttpAuthClient {
    client: Client,
    base_url: Url,
}

impl HttpAuthClient {
    /// # Errors
    /// Returns an error if `base_url` is not an absolute http(s) URL or the
    /// HTTP client cannot be built.
    pub fn new(base_url: &str) -> Result<Self, LoginError> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    /// # Errors
    /// Returns an error if `base_url` is not an absolute http(s) URL or the
    /// HTTP client cannot be built.
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, LoginError> {
        let base_url = parse_base_url(base_url)?;

        // Redirects stay visible so a routing guard bounce reads as "no session".
        let client = Client::builder()
            .user_agent(APP_USER_AGENT)
            .cookie_store(true)
            .redirect(Policy::none())
            .timeout(timeout)
            .build()
            .map_err(|err| LoginError::Config(format!("Failed to build HTTP client: {err}")))?;

        Ok(Self { client, base_url })
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// # Errors
    /// Returns an error if `path` cannot be joined onto the base URL.
    pub fn endpoint(&self, path: &str) -> Result<Url, LoginError> {
        Ok(self.base_url.join(path)?)
    }

    /// # Errors
    /// Returns an error if the registration path cannot be joined onto the base URL.
    pub fn register_url(&self) -> Result<Url, LoginError> {
        self.endpoint(REGISTER_PATH)
    }
}

#[async_trait]
impl AuthClient for HttpAuthClient {
    async fn login(&self, request: &LoginRequest) -> Result<AuthResult, LoginError> {
        let url = self.endpoint(LOGIN_PATH)?;

        let span = info_span!(
            "login.submit",
            http.method = "POST",
            url = %url
        );
        let response = self
            .client
            .post(url)
            .json(request)
            .send()
            .instrument(span)
            .await?;

        let status = response.status();
        let body = response.text().await?;
        debug!(status = status.as_u16(), "login response received");

        let json: Value = serde_json::from_str(&body).map_err(|err| {
            LoginError::Parse(format!("Failed to decode response ({status}): {err}"))
        })?;

        Ok(AuthResult::from_body(status.is_success(), &json))
    }

    async fn session_established(&self, path: &str) -> Result<bool, LoginError> {
        let url = self.endpoint(path)?;

        let span = info_span!(
            "login.session_probe",
            http.method = "GET",
            url = %url
        );
        let response = self.client.get(url).send().instrument(span).await?;

        let status = response.status();
        debug!(status = status.as_u16(), path, "session probe");

        Ok(status.is_success())
    }
}

fn parse_base_url(base_url: &str) -> Result<Url, LoginError> {
    let url = Url::parse(base_url.trim())?;

    match url.scheme() {
        "http" | "https" => {}
        scheme => {
            return Err(LoginError::Config(format!(
                "unsupported scheme {scheme}, expected http or https"
            )));
        }
    }

    if url.host().is_none() {
        return Err(LoginError::Config("no host specified".to_string()));
    }

    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::login::credentials::Credentials;
    use anyhow::Result;
    use secrecy::SecretString;
    use serde_json::json;
    use std::net::TcpListener;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn can_bind_localhost() -> bool {
        TcpListener::bind("127.0.0.1:0").is_ok()
    }

    fn request(email: &str, password: &str) -> LoginRequest {
        Credentials::new(email, SecretString::from(password.to_string()))
            .validate()
            .expect("valid credentials")
    }

    #[test]
    fn rejects_non_http_base_url() {
        assert!(matches!(
            HttpAuthClient::new("ftp://donar.app"),
            Err(LoginError::Config(_))
        ));
        assert!(matches!(
            HttpAuthClient::new("/relative"),
            Err(LoginError::Config(_))
        ));
    }

    #[test]
    fn endpoints_join_onto_base() -> Result<()> {
        let client = HttpAuthClient::new("https://donar.app/")?;
        assert_eq!(
            client.endpoint(LOGIN_PATH)?.as_str(),
            "https://donar.app/api/login"
        );
        assert_eq!(client.register_url()?.as_str(), "https://donar.app/register");
        Ok(())
    }

    #[tokio::test]
    async fn login_posts_json_and_reads_role() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/login"))
            .and(header("content-type", "application/json"))
            .and(body_json(json!({"email": "ana@donar.app", "password": "pw"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "user": {"role": "organization"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = HttpAuthClient::new(&server.uri())?;
        let result = client.login(&request("ana@donar.app", "pw")).await?;

        assert!(result.success);
        assert_eq!(result.role.as_deref(), Some("organization"));
        Ok(())
    }

    #[tokio::test]
    async fn rejection_is_a_result_not_an_error() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/login"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(json!({"message": "Invalid credentials"})),
            )
            .mount(&server)
            .await;

        let client = HttpAuthClient::new(&server.uri())?;
        let result = client.login(&request("ana@donar.app", "wrong")).await?;

        assert!(!result.success);
        assert_eq!(result.failure_message(), "Invalid credentials");
        Ok(())
    }

    #[tokio::test]
    async fn non_json_body_is_a_parse_error() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/login"))
            .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
            .mount(&server)
            .await;

        let client = HttpAuthClient::new(&server.uri())?;
        let err = client
            .login(&request("ana@donar.app", "pw"))
            .await
            .expect_err("html body must not parse");

        assert!(matches!(err, LoginError::Parse(_)), "got {err:?}");
        Ok(())
    }

    #[tokio::test]
    async fn slow_server_times_out() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/login"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({}))
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let client = HttpAuthClient::with_timeout(&server.uri(), Duration::from_millis(100))?;
        let err = client
            .login(&request("ana@donar.app", "pw"))
            .await
            .expect_err("request must time out");

        assert!(matches!(err, LoginError::Timeout(_)), "got {err:?}");
        Ok(())
    }

    #[tokio::test]
    async fn unreachable_server_is_a_network_error() -> Result<()> {
        let Ok(listener) = TcpListener::bind("127.0.0.1:0") else {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        };
        let addr = listener.local_addr()?;
        drop(listener);

        let client = HttpAuthClient::new(&format!("http://{addr}"))?;
        let err = client
            .login(&request("ana@donar.app", "pw"))
            .await
            .expect_err("nothing is listening");

        assert!(matches!(err, LoginError::Network(_)), "got {err:?}");
        Ok(())
    }

    #[tokio::test]
    async fn session_probe_follows_cookie_jar() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/login"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("set-cookie", "token=abc; Path=/; HttpOnly")
                    .set_body_json(json!({"user": {"role": "donor"}})),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/dashboard/donor"))
            .and(header("cookie", "token=abc"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;
        // Routing guard bounce for requests without the cookie.
        Mock::given(method("GET"))
            .and(path("/dashboard/donor"))
            .respond_with(ResponseTemplate::new(307).insert_header("location", "/login"))
            .mount(&server)
            .await;

        let client = HttpAuthClient::new(&server.uri())?;
        assert!(!client.session_established("/dashboard/donor").await?);

        client.login(&request("ana@donar.app", "pw")).await?;
        assert!(client.session_established("/dashboard/donor").await?);
        Ok(())
    }
}
