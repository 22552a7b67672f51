use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const HUB: &str = "/wd/hub";
pub const SESSION_ID: &str = "mock-session";
pub const ELEMENT_ID: &str = "el-1";

/// A wiremock server standing in for the driver's HTTP surface
/// (`/status` plus the WebDriver hub).
pub struct MockDriver {
    pub server: MockServer,
}

impl MockDriver {
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    pub fn host(&self) -> String {
        self.server.address().ip().to_string()
    }

    pub fn port(&self) -> u16 {
        self.server.address().port()
    }

    pub fn hub_url(&self) -> String {
        format!("{}{}", self.server.uri(), HUB)
    }

    /// `/status` answers 200.
    pub async fn ready(&self) {
        Mock::given(method("GET"))
            .and(path("/status"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "value": { "ready": true, "message": "ChromeDriver ready for new sessions." }
            })))
            .mount(&self.server)
            .await;
    }

    /// `/status` answers 503 and is expected exactly `checks` times.
    pub async fn never_ready(&self, checks: u64) {
        Mock::given(method("GET"))
            .and(path("/status"))
            .respond_with(ResponseTemplate::new(503))
            .expect(checks)
            .mount(&self.server)
            .await;
    }

    /// Mount every command of a successful run.
    ///
    /// Opening and deleting the session are each expected `sessions` times;
    /// the expectation is checked when the server is dropped.
    pub async fn webdriver(&self, sessions: u64) {
        let session = format!("{HUB}/session/{SESSION_ID}");
        let element = format!("{session}/element/{ELEMENT_ID}");

        Mock::given(method("POST"))
            .and(path(format!("{HUB}/session")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "value": { "sessionId": SESSION_ID, "capabilities": { "browserName": "chrome" } }
            })))
            .expect(sessions)
            .mount(&self.server)
            .await;

        Mock::given(method("POST"))
            .and(path(format!("{session}/url")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "value": null })))
            .mount(&self.server)
            .await;

        Mock::given(method("POST"))
            .and(path(format!("{session}/element")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "value": { "element-6066-11e4-a52f-4a7ba9ae6ab2": ELEMENT_ID }
            })))
            .mount(&self.server)
            .await;

        for action in ["value", "click"] {
            Mock::given(method("POST"))
                .and(path(format!("{element}/{action}")))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "value": null })))
                .mount(&self.server)
                .await;
        }

        Mock::given(method("DELETE"))
            .and(path(session))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "value": null })))
            .expect(sessions)
            .mount(&self.server)
            .await;
    }

    /// Make find-element with this W3C selector value answer "no such element".
    ///
    /// Mounted with a higher priority than [`webdriver`](Self::webdriver)'s
    /// catch-all element route.
    pub async fn missing_element(&self, selector_value: &str) {
        Mock::given(method("POST"))
            .and(path(format!("{HUB}/session/{SESSION_ID}/element")))
            .and(body_partial_json(json!({ "value": selector_value })))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "value": {
                    "error": "no such element",
                    "message": format!("no such element: Unable to locate element: {selector_value}"),
                    "stacktrace": ""
                }
            })))
            .with_priority(1)
            .mount(&self.server)
            .await;
    }
}
