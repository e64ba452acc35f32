/**
 * Cookie Jar Backend
 *
 * Mirrors credentials into cookies so page navigations carry the access token to
 * the edge guard. Every cookie is scoped to `/` and expires a fixed time after it
 * was last written. Expired cookies read as absent and are left out of the
 * `Cookie` header.
 */

use std::sync::Mutex;

use cookie::{Cookie, CookieJar};
use time::{Duration, OffsetDateTime};

use super::{StorageError, TokenStorage};

/// Cookie jar credential backend
#[derive(Debug)]
pub struct CookieStorage {
    jar: Mutex<CookieJar>,
    ttl: Duration,
}

impl CookieStorage {
    /// Create an empty jar whose cookies live for `ttl`
    pub fn new(ttl: Duration) -> Self {
        Self {
            jar: Mutex::new(CookieJar::new()),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Live cookie by name
    pub fn get(&self, name: &str) -> Option<Cookie<'static>> {
        let jar = self.jar.lock().unwrap_or_else(|e| e.into_inner());
        jar.get(name)
            .filter(|c| is_live(c, OffsetDateTime::now_utc()))
            .cloned()
    }

    /// Render live cookies as a `Cookie` request header value
    pub fn cookie_header(&self) -> Option<String> {
        let jar = self.jar.lock().unwrap_or_else(|e| e.into_inner());
        let now = OffsetDateTime::now_utc();
        let mut pairs: Vec<String> = jar
            .iter()
            .filter(|c| is_live(c, now))
            .map(|c| c.stripped().to_string())
            .collect();
        if pairs.is_empty() {
            return None;
        }
        pairs.sort();
        Some(pairs.join("; "))
    }
}

fn is_live(cookie: &Cookie<'_>, now: OffsetDateTime) -> bool {
    cookie.expires_datetime().map_or(true, |expires| expires > now)
}

impl TokenStorage for CookieStorage {
    fn name(&self) -> &'static str {
        "cookie"
    }

    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.get(key).map(|c| c.value().to_string()))
    }

    fn store(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let expires = OffsetDateTime::now_utc()
            .checked_add(self.ttl)
            .ok_or(StorageError::ExpiryOutOfRange(self.ttl))?;
        let cookie = Cookie::build((key.to_string(), value.to_string()))
            .path("/")
            .expires(expires)
            .build();
        let mut jar = self.jar.lock().unwrap_or_else(|e| e.into_inner());
        jar.add(cookie);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut jar = self.jar.lock().unwrap_or_else(|e| e.into_inner());
        jar.remove(Cookie::build(key.to_string()).path("/"));
        Ok(())
    }
}
