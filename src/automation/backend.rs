// src/automation/backend.rs

//! Pluggable browser-session backend.
//!
//! The runner talks to a [`SessionFactory`] instead of a concrete WebDriver
//! client. Production uses [`WebDriverSessionFactory`]; tests provide fakes
//! that record which calls were made and fail at chosen steps.

use serde_json::Value;

use crate::schedule::BoxFuture;
use crate::webdriver::{ElementRef, Locator, RemoteSession, WebDriverClient, WebDriverError};

/// One open remote browser session.
///
/// [`close`](Self::close) consumes the session, so it can be called at most
/// once per session.
pub trait BrowserSession: Send + Sync {
    fn id(&self) -> &str;

    fn goto<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<(), WebDriverError>>;

    fn find_element<'a>(
        &'a self,
        locator: &'a Locator,
    ) -> BoxFuture<'a, Result<ElementRef, WebDriverError>>;

    fn send_keys<'a>(
        &'a self,
        element: &'a ElementRef,
        text: &'a str,
    ) -> BoxFuture<'a, Result<(), WebDriverError>>;

    fn click<'a>(&'a self, element: &'a ElementRef) -> BoxFuture<'a, Result<(), WebDriverError>>;

    fn close(self: Box<Self>) -> BoxFuture<'static, Result<(), WebDriverError>>;
}

/// Opens a fresh, exclusively owned session per call.
pub trait SessionFactory: Send + Sync {
    fn open_session(&self) -> BoxFuture<'_, Result<Box<dyn BrowserSession>, WebDriverError>>;
}

/// Real factory: requests sessions from the driver's WebDriver endpoint.
#[derive(Debug, Clone)]
pub struct WebDriverSessionFactory {
    client: WebDriverClient,
    capabilities: Value,
}

impl WebDriverSessionFactory {
    pub fn new(client: WebDriverClient, capabilities: Value) -> Self {
        Self {
            client,
            capabilities,
        }
    }
}

impl SessionFactory for WebDriverSessionFactory {
    fn open_session(&self) -> BoxFuture<'_, Result<Box<dyn BrowserSession>, WebDriverError>> {
        Box::pin(async move {
            let session = self.client.new_session(&self.capabilities).await?;
            Ok(Box::new(session) as Box<dyn BrowserSession>)
        })
    }
}

impl BrowserSession for RemoteSession {
    fn id(&self) -> &str {
        RemoteSession::id(self)
    }

    fn goto<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<(), WebDriverError>> {
        Box::pin(RemoteSession::goto(self, url))
    }

    fn find_element<'a>(
        &'a self,
        locator: &'a Locator,
    ) -> BoxFuture<'a, Result<ElementRef, WebDriverError>> {
        Box::pin(RemoteSession::find_element(self, locator))
    }

    fn send_keys<'a>(
        &'a self,
        element: &'a ElementRef,
        text: &'a str,
    ) -> BoxFuture<'a, Result<(), WebDriverError>> {
        Box::pin(RemoteSession::send_keys(self, element, text))
    }

    fn click<'a>(&'a self, element: &'a ElementRef) -> BoxFuture<'a, Result<(), WebDriverError>> {
        Box::pin(RemoteSession::click(self, element))
    }

    fn close(self: Box<Self>) -> BoxFuture<'static, Result<(), WebDriverError>> {
        Box::pin(async move { (*self).quit().await })
    }
}
