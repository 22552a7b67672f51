use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use profile_refresher::automation::{BrowserSession, SessionFactory};
use profile_refresher::schedule::BoxFuture;
use profile_refresher::webdriver::{ElementRef, Locator, WebDriverError};

/// A call made against a fake session, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Goto(String),
    Find(String),
    SendKeys { element: String, text: String },
    Click(String),
}

#[derive(Default)]
struct FakeState {
    opened: AtomicUsize,
    closes: Mutex<HashMap<String, usize>>,
    calls: Mutex<HashMap<String, Vec<Call>>>,
    fail_open: bool,
    missing: HashSet<String>,
    navigate_delay: Duration,
}

/// A session factory that:
/// - hands out numbered in-memory sessions (`fake-1`, `fake-2`, ...)
/// - records every call and every close per session
/// - fails lookups for locators registered with [`missing_element`](Self::missing_element)
#[derive(Clone)]
pub struct FakeSessionFactory {
    state: Arc<FakeState>,
}

impl FakeSessionFactory {
    pub fn new() -> Self {
        Self {
            state: Arc::new(FakeState::default()),
        }
    }

    pub fn failing_open() -> Self {
        Self {
            state: Arc::new(FakeState {
                fail_open: true,
                ..FakeState::default()
            }),
        }
    }

    /// Make every lookup of `locator` fail with "no such element".
    pub fn missing_element(self, locator: &Locator) -> Self {
        self.reconfigure(|s| {
            s.missing.insert(locator.to_string());
        })
    }

    /// Make navigation take `delay`, to keep runs in flight concurrently.
    pub fn with_navigate_delay(self, delay: Duration) -> Self {
        self.reconfigure(|s| s.navigate_delay = delay)
    }

    fn reconfigure(self, f: impl FnOnce(&mut FakeState)) -> Self {
        let mut state = Arc::try_unwrap(self.state)
            .unwrap_or_else(|_| panic!("configure FakeSessionFactory before sharing it"));
        f(&mut state);
        Self {
            state: Arc::new(state),
        }
    }

    pub fn opened(&self) -> usize {
        self.state.opened.load(Ordering::SeqCst)
    }

    /// How many times each session was closed.
    pub fn closes(&self) -> HashMap<String, usize> {
        self.state.closes.lock().unwrap().clone()
    }

    pub fn calls(&self, session: &str) -> Vec<Call> {
        self.state
            .calls
            .lock()
            .unwrap()
            .get(session)
            .cloned()
            .unwrap_or_default()
    }

    pub fn session_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.state.calls.lock().unwrap().keys().cloned().collect();
        ids.sort();
        ids
    }
}

impl Default for FakeSessionFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionFactory for FakeSessionFactory {
    fn open_session(&self) -> BoxFuture<'_, Result<Box<dyn BrowserSession>, WebDriverError>> {
        Box::pin(async move {
            if self.state.fail_open {
                return Err(WebDriverError::Command {
                    status: 500,
                    error: "session not created".to_string(),
                    message: "fake factory refuses to open sessions".to_string(),
                });
            }

            let n = self.state.opened.fetch_add(1, Ordering::SeqCst) + 1;
            let id = format!("fake-{n}");
            self.state
                .calls
                .lock()
                .unwrap()
                .insert(id.clone(), Vec::new());

            Ok(Box::new(FakeSession {
                id,
                state: Arc::clone(&self.state),
            }) as Box<dyn BrowserSession>)
        })
    }
}

struct FakeSession {
    id: String,
    state: Arc<FakeState>,
}

impl FakeSession {
    fn record(&self, call: Call) {
        self.state
            .calls
            .lock()
            .unwrap()
            .entry(self.id.clone())
            .or_default()
            .push(call);
    }
}

impl BrowserSession for FakeSession {
    fn id(&self) -> &str {
        &self.id
    }

    fn goto<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<(), WebDriverError>> {
        Box::pin(async move {
            self.record(Call::Goto(url.to_string()));
            if !self.state.navigate_delay.is_zero() {
                tokio::time::sleep(self.state.navigate_delay).await;
            }
            Ok(())
        })
    }

    fn find_element<'a>(
        &'a self,
        locator: &'a Locator,
    ) -> BoxFuture<'a, Result<ElementRef, WebDriverError>> {
        Box::pin(async move {
            let selector = locator.to_string();
            self.record(Call::Find(selector.clone()));
            if self.state.missing.contains(&selector) {
                return Err(WebDriverError::no_such_element(selector));
            }
            Ok(ElementRef(format!("{}/{}", self.id, selector)))
        })
    }

    fn send_keys<'a>(
        &'a self,
        element: &'a ElementRef,
        text: &'a str,
    ) -> BoxFuture<'a, Result<(), WebDriverError>> {
        Box::pin(async move {
            self.record(Call::SendKeys {
                element: element.0.clone(),
                text: text.to_string(),
            });
            Ok(())
        })
    }

    fn click<'a>(&'a self, element: &'a ElementRef) -> BoxFuture<'a, Result<(), WebDriverError>> {
        Box::pin(async move {
            self.record(Call::Click(element.0.clone()));
            Ok(())
        })
    }

    fn close(self: Box<Self>) -> BoxFuture<'static, Result<(), WebDriverError>> {
        Box::pin(async move {
            *self
                .state
                .closes
                .lock()
                .unwrap()
                .entry(self.id.clone())
                .or_insert(0) += 1;
            Ok(())
        })
    }
}
