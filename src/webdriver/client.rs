// src/webdriver/client.rs

use std::time::Duration;

use reqwest::Method;
use serde_json::{json, Value};
use tracing::{debug, trace};

use super::error::WebDriverError;
use super::locator::Locator;

/// W3C key under which a found element's id is returned.
const W3C_ELEMENT_KEY: &str = "element-6066-11e4-a52f-4a7ba9ae6ab2";
/// JSON wire protocol equivalent.
const LEGACY_ELEMENT_KEY: &str = "ELEMENT";

/// HTTP client bound to one driver endpoint (e.g. `http://localhost:9515/wd/hub`).
///
/// Cheap to clone: the underlying `reqwest::Client` is reference counted.
#[derive(Debug, Clone)]
pub struct WebDriverClient {
    http: reqwest::Client,
    base_url: String,
}

/// Opaque handle to an element inside a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementRef(pub String);

/// One remote browser session.
///
/// Dropping a `RemoteSession` does not end it on the driver side; call
/// [`RemoteSession::quit`].
#[derive(Debug)]
pub struct RemoteSession {
    client: WebDriverClient,
    id: String,
}

impl WebDriverClient {
    pub fn new(
        base_url: impl Into<String>,
        request_timeout: Duration,
    ) -> Result<Self, WebDriverError> {
        let http = reqwest::Client::builder().timeout(request_timeout).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { http, base_url })
    }

    /// Request a new session with the given capabilities.
    ///
    /// Capabilities are sent both as W3C `alwaysMatch` and as legacy
    /// `desiredCapabilities`.
    pub async fn new_session(&self, capabilities: &Value) -> Result<RemoteSession, WebDriverError> {
        let body = json!({
            "capabilities": { "alwaysMatch": capabilities },
            "desiredCapabilities": capabilities,
        });

        let payload = self.command(Method::POST, "session", Some(body)).await?;
        let id = extract_session_id(&payload).ok_or_else(|| {
            WebDriverError::Malformed("new session response carries no sessionId".to_string())
        })?;

        debug!(session = %id, endpoint = %self.base_url, "webdriver session opened");
        Ok(RemoteSession {
            client: self.clone(),
            id,
        })
    }

    async fn command(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Value, WebDriverError> {
        let url = format!("{}/{}", self.base_url, path);
        // Bodies are not logged: send-keys requests carry credentials.
        trace!(%method, %url, "webdriver command");

        let mut request = self.http.request(method.clone(), &url);
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;
        let payload: Option<Value> = if text.trim().is_empty() {
            Some(Value::Null)
        } else {
            serde_json::from_str(&text).ok()
        };

        if !status.is_success() {
            return Err(command_error(status.as_u16(), payload.as_ref(), &text));
        }

        let payload = payload.ok_or_else(|| {
            WebDriverError::Malformed(format!("{method} {path} returned a non-JSON body"))
        })?;

        // JSON wire protocol reports failures with HTTP 200 and a non-zero status.
        if let Some(code) = payload.get("status").and_then(Value::as_i64) {
            if code != 0 {
                return Err(command_error(status.as_u16(), Some(&payload), &text));
            }
        }

        Ok(payload)
    }
}

impl RemoteSession {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub async fn goto(&self, url: &str) -> Result<(), WebDriverError> {
        self.session_command(Method::POST, "url", Some(json!({ "url": url })))
            .await
            .map(drop)
    }

    pub async fn find_element(&self, locator: &Locator) -> Result<ElementRef, WebDriverError> {
        let (using, value) = locator.to_w3c();
        let payload = self
            .session_command(
                Method::POST,
                "element",
                Some(json!({ "using": using, "value": value })),
            )
            .await?;

        let element = payload.get("value").unwrap_or(&Value::Null);
        element
            .get(W3C_ELEMENT_KEY)
            .or_else(|| element.get(LEGACY_ELEMENT_KEY))
            .and_then(Value::as_str)
            .map(|id| ElementRef(id.to_string()))
            .ok_or_else(|| {
                WebDriverError::Malformed(format!("find element '{locator}' returned no element id"))
            })
    }

    pub async fn send_keys(&self, element: &ElementRef, text: &str) -> Result<(), WebDriverError> {
        let chars: Vec<String> = text.chars().map(String::from).collect();
        let path = format!("element/{}/value", element.0);
        self.session_command(Method::POST, &path, Some(json!({ "text": text, "value": chars })))
            .await
            .map(drop)
    }

    pub async fn click(&self, element: &ElementRef) -> Result<(), WebDriverError> {
        let path = format!("element/{}/click", element.0);
        self.session_command(Method::POST, &path, Some(json!({})))
            .await
            .map(drop)
    }

    /// End the session on the driver side.
    pub async fn quit(self) -> Result<(), WebDriverError> {
        let path = format!("session/{}", self.id);
        self.client.command(Method::DELETE, &path, None).await?;
        debug!(session = %self.id, "webdriver session closed");
        Ok(())
    }

    async fn session_command(
        &self,
        method: Method,
        suffix: &str,
        body: Option<Value>,
    ) -> Result<Value, WebDriverError> {
        let path = format!("session/{}/{}", self.id, suffix);
        self.client.command(method, &path, body).await
    }
}

fn extract_session_id(payload: &Value) -> Option<String> {
    payload
        .get("value")
        .and_then(|v| v.get("sessionId"))
        .or_else(|| payload.get("sessionId"))
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn command_error(status: u16, payload: Option<&Value>, raw: &str) -> WebDriverError {
    let value = payload.and_then(|p| p.get("value"));
    let error = value
        .and_then(|v| v.get("error"))
        .and_then(Value::as_str)
        .unwrap_or("unknown error")
        .to_string();
    let message = value
        .and_then(|v| v.get("message"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| raw.trim().chars().take(200).collect());

    WebDriverError::Command {
        status,
        error,
        message,
    }
}
