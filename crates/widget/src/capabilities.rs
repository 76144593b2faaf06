//! Capability seams between the widget session and its host environment.
//!
//! The original storefront reached for the router, `window.open` and browser
//! storage directly; here each is an injected trait so tests control
//! navigation, time and persistence without touching a browser.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Utc};

/// Flag set after a successful subscription so the storefront can suppress
/// its newsletter popup for the rest of the session.
pub const RECENTLY_SUBSCRIBED_FLAG: &str = "recently_subscribed";

/// Client-side navigation.
pub trait Navigator: Send + Sync {
    fn navigate_to(&self, path: &str);
}

/// Opens external deep links (WhatsApp) in a new context.
pub trait ExternalLinks: Send + Sync {
    fn open(&self, url: &str);
}

/// Session-scoped flag storage.
pub trait SessionStore: Send + Sync {
    fn flag(&self, key: &str) -> bool;
    fn set_flag(&self, key: &str, value: bool);
}

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Always returns the same instant; for deterministic transcripts in tests.
#[derive(Clone, Copy, Debug)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

#[derive(Debug, Default)]
pub struct NoopNavigator;

impl Navigator for NoopNavigator {
    fn navigate_to(&self, _path: &str) {}
}

#[derive(Debug, Default)]
pub struct NoopLinks;

impl ExternalLinks for NoopLinks {
    fn open(&self, _url: &str) {}
}

#[derive(Debug, Default)]
pub struct RecordingNavigator {
    paths: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn visited(&self) -> Vec<String> {
        self.paths.lock().map(|paths| paths.clone()).unwrap_or_default()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate_to(&self, path: &str) {
        if let Ok(mut paths) = self.paths.lock() {
            paths.push(path.to_string());
        }
    }
}

#[derive(Debug, Default)]
pub struct RecordingLinks {
    urls: Mutex<Vec<String>>,
}

impl RecordingLinks {
    pub fn opened(&self) -> Vec<String> {
        self.urls.lock().map(|urls| urls.clone()).unwrap_or_default()
    }
}

impl ExternalLinks for RecordingLinks {
    fn open(&self, url: &str) {
        if let Ok(mut urls) = self.urls.lock() {
            urls.push(url.to_string());
        }
    }
}

#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    flags: Mutex<HashMap<String, bool>>,
}

impl SessionStore for InMemorySessionStore {
    fn flag(&self, key: &str) -> bool {
        self.flags.lock().map(|flags| flags.get(key).copied().unwrap_or(false)).unwrap_or(false)
    }

    fn set_flag(&self, key: &str, value: bool) {
        if let Ok(mut flags) = self.flags.lock() {
            flags.insert(key.to_string(), value);
        }
    }
}
