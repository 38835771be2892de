use actix_web::cookie::time::Duration;
use actix_web::cookie::Cookie;
use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest};
use std::future::{ready, Ready};
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "session_id";
const SESSION_TTL: Duration = Duration::days(7);

/// Opaque per-client correlation token. Holding the token is what ties a
/// request to its transactions; it is not an authentication credential.
#[derive(Clone, Debug)]
pub struct Session {
    id: String,
    minted: bool,
}

impl Session {
    pub fn id(&self) -> &str {
        &self.id
    }

    /// True if the identifier was minted for this request and still has to
    /// be handed back to the client.
    pub fn is_new(&self) -> bool {
        self.minted
    }

    /// The cookie carrying the identifier back to the client.
    pub fn cookie(&self) -> Cookie<'static> {
        Cookie::build(SESSION_COOKIE, self.id.clone())
            .path("/")
            .http_only(true)
            .max_age(SESSION_TTL)
            .finish()
    }

    fn existing(id: Uuid) -> Session {
        Session {
            id: id.to_string(),
            minted: false,
        }
    }

    fn mint() -> Session {
        Session {
            id: Uuid::new_v4().to_string(),
            minted: true,
        }
    }
}

impl FromRequest for Session {
    type Error = actix_web::Error;
    type Future = Ready<Result<Session, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let session = req
            .cookie(SESSION_COOKIE)
            .and_then(|cookie| Uuid::parse_str(cookie.value()).ok())
            .map(Session::existing)
            .unwrap_or_else(Session::mint);
        tracing::Span::current().record("session_id", tracing::field::display(session.id()));
        ready(Ok(session))
    }
}

#[cfg(test)]
mod tests {
    use super::{Session, SESSION_COOKIE};
    use actix_web::cookie::time::Duration;

    #[test]
    fn cookie_attributes() {
        let session = Session::mint();
        let cookie = session.cookie();

        assert_eq!(cookie.name(), SESSION_COOKIE);
        assert_eq!(cookie.value(), session.id());
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.max_age(), Some(Duration::days(7)));
    }

    #[test]
    fn minted_sessions_are_unique() {
        assert_ne!(Session::mint().id, Session::mint().id);
    }
}
