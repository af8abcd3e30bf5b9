use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use crate::auth::{StoreError, TokenStore};
use crate::models::{Credential, Session};

pub const SESSION_COOKIE: &str = "td_session";

/// Keeps the browser credential in an HTTP-only cookie.
///
/// Changes are staged on the jar; hand it back with the response via
/// [`CookieTokenStore::into_jar`].
#[derive(Debug, Default)]
pub struct CookieTokenStore {
    jar: CookieJar,
}

impl CookieTokenStore {
    pub fn new(jar: CookieJar) -> Self {
        CookieTokenStore { jar }
    }

    pub fn into_jar(self) -> CookieJar {
        self.jar
    }
}

impl TokenStore for CookieTokenStore {
    fn load(&self) -> Result<Option<Credential>, StoreError> {
        Ok(self
            .jar
            .get(SESSION_COOKIE)
            .map(|c| c.value())
            .filter(|v| !v.is_empty())
            .map(Credential::new))
    }

    fn save(&mut self, session: &Session) -> Result<(), StoreError> {
        let cookie = Cookie::build((SESSION_COOKIE, session.credential.as_str().to_string()))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax);
        self.jar = std::mem::take(&mut self.jar).add(cookie);
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        self.jar = std::mem::take(&mut self.jar).remove(Cookie::build(SESSION_COOKIE).path("/"));
        Ok(())
    }
}
