use crate::user::User;
use std::sync::mpsc::{channel, Receiver};
use std::time::Duration;
use url::Url;

pub const DEFAULT_REALM_PATH: &str = "/dcm4chee-arc/ui/rs/realm";

#[derive(Debug, thiserror::Error)]
pub enum RealmError {
    #[error("invalid realm url '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("realm request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("realm endpoint returned HTTP {0}")]
    Status(u16),
    #[error("realm endpoint returned an empty body")]
    EmptyPayload,
    #[error("malformed user document: {0}")]
    Malformed(String),
}

/// Client for the read-only user-info endpoint.
#[derive(Debug, Clone)]
pub struct RealmClient {
    url: Url,
    client: reqwest::blocking::Client,
}

impl RealmClient {
    pub fn new(url: &str) -> Result<Self, RealmError> {
        let url = Url::parse(url).map_err(|source| RealmError::InvalidUrl {
            url: url.to_string(),
            source,
        })?;
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self { url, client })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn fetch_user(&self) -> Result<User, RealmError> {
        tracing::debug!(url = %self.url, "fetching user info");
        let resp = self.client.get(self.url.clone()).send()?;
        let status = resp.status();
        if !status.is_success() {
            return Err(RealmError::Status(status.as_u16()));
        }
        let body = resp.text()?;
        parse_user_payload(&body)
    }
}

/// Interpret a realm response body.
///
/// A JSON object is decoded as a [`User`]. A body that is not JSON at all is
/// kept as the raw principal name with no roles. Anything else is an error.
pub fn parse_user_payload(body: &str) -> Result<User, RealmError> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return Err(RealmError::EmptyPayload);
    }
    match serde_json::from_str::<serde_json::Value>(trimmed) {
        Ok(value @ serde_json::Value::Object(_)) => {
            serde_json::from_value(value).map_err(|e| RealmError::Malformed(e.to_string()))
        }
        Ok(other) => Err(RealmError::Malformed(format!(
            "expected an object, got {other}"
        ))),
        Err(_) => {
            tracing::debug!("realm response is not JSON; using raw payload");
            Ok(User::new(trimmed, &[]))
        }
    }
}

/// Run [`RealmClient::fetch_user`] on a worker thread. The UI polls the
/// returned receiver once per frame.
pub fn spawn_user_fetch(client: RealmClient) -> Receiver<Result<User, RealmError>> {
    let (tx, rx) = channel();
    std::thread::spawn(move || {
        let res = client.fetch_user();
        if let Err(e) = &res {
            tracing::error!("user info fetch failed: {e}");
        }
        let _ = tx.send(res);
    });
    rx
}
