//! `RemoteStore` over HTTP.
//!
//! `GET /store` answers `{ "store": <collection> }` or `{ "error": "..." }`;
//! `PUT /store` takes `{ "store": <collection> }`. Both need a bearer
//! credential.

use crate::{RemoteStore, StoreConfig, StoreDocument, StoreError};
use deck_core::Collection;
use reqwest::StatusCode;
use serde::Serialize;
use serde_json::Value;

/// Borrowing twin of `StoreDocument`, so saving does not clone the collection.
#[derive(Serialize)]
struct SaveBody<'a> {
    store: &'a Collection,
}

/// HTTP client for the backend store endpoint.
#[derive(Debug, Clone)]
pub struct HttpStore {
    client: reqwest::Client,
    config: StoreConfig,
}

impl HttpStore {
    pub fn new(config: StoreConfig) -> Result<Self, StoreError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    fn token(&self) -> Result<&str, StoreError> {
        self.config
            .token
            .as_deref()
            .ok_or_else(|| StoreError::Auth("no credential; log in first".into()))
    }
}

impl RemoteStore for HttpStore {
    async fn load(&self) -> Result<Collection, StoreError> {
        let url = self.config.store_url();
        let resp = self
            .client
            .get(&url)
            .bearer_auth(self.token()?)
            .send()
            .await?;
        let status = resp.status();
        let body = resp.text().await?;
        let value = read_reply(status, &body)?;
        let doc: StoreDocument = serde_json::from_value(value)?;
        log::info!("loaded {} presentations from {url}", doc.store.len());
        Ok(doc.store)
    }

    async fn save(&self, collection: &Collection) -> Result<(), StoreError> {
        let url = self.config.store_url();
        let body = SaveBody { store: collection };
        let resp = self
            .client
            .put(&url)
            .bearer_auth(self.token()?)
            .json(&body)
            .send()
            .await?;
        let status = resp.status();
        let text = resp.text().await?;
        if let Err(e) = read_reply(status, &text) {
            log::warn!("save to {url} rejected: {e}");
            return Err(e);
        }
        log::info!("saved {} presentations to {url}", collection.len());
        Ok(())
    }
}

/// Classify a backend reply.
///
/// An `{ "error": ... }` body wins over the status code; 401/403 are
/// credential failures; any other non-success status is a network error.
pub fn read_reply(status: StatusCode, body: &str) -> Result<Value, StoreError> {
    let parsed = if body.trim().is_empty() {
        Ok(Value::Null)
    } else {
        serde_json::from_str::<Value>(body)
    };

    let auth_status = matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN);

    let value = match parsed {
        Ok(value) => value,
        Err(_) if auth_status => return Err(StoreError::Auth(format!("HTTP {status}"))),
        Err(_) if !status.is_success() => return Err(StoreError::Network(format!("HTTP {status}"))),
        Err(e) => return Err(e.into()),
    };

    if let Some(message) = value.get("error").and_then(Value::as_str) {
        return Err(if auth_status || mentions_credential(message) {
            StoreError::Auth(message.to_string())
        } else {
            StoreError::Network(message.to_string())
        });
    }
    if auth_status {
        return Err(StoreError::Auth(format!("HTTP {status}")));
    }
    if !status.is_success() {
        return Err(StoreError::Network(format!("HTTP {status}")));
    }
    Ok(value)
}

fn mentions_credential(message: &str) -> bool {
    let lower = message.to_ascii_lowercase();
    lower.contains("token") || lower.contains("auth")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_body_wins_over_status() {
        let err = read_reply(StatusCode::OK, r#"{ "error": "Invalid token" }"#).unwrap_err();
        assert_eq!(err, StoreError::Auth("Invalid token".into()));

        let err = read_reply(StatusCode::BAD_REQUEST, r#"{ "error": "Bad input" }"#).unwrap_err();
        assert_eq!(err, StoreError::Network("Bad input".into()));
    }

    #[test]
    fn status_without_body() {
        assert_eq!(
            read_reply(StatusCode::FORBIDDEN, "").unwrap_err(),
            StoreError::Auth("HTTP 403 Forbidden".into())
        );
        assert_eq!(
            read_reply(StatusCode::BAD_GATEWAY, "<html>").unwrap_err(),
            StoreError::Network("HTTP 502 Bad Gateway".into())
        );
    }

    #[test]
    fn garbage_success_body_is_decode_error() {
        assert!(matches!(
            read_reply(StatusCode::OK, "not json"),
            Err(StoreError::Decode(_))
        ));
    }

    #[test]
    fn ok_body_passes_through() {
        let value = read_reply(StatusCode::OK, r#"{ "store": {} }"#).unwrap();
        assert!(value["store"].is_object());
    }

    #[tokio::test]
    async fn missing_token_fails_before_request() {
        let store = HttpStore::new(StoreConfig::default().with_base_url("http://127.0.0.1:9")).unwrap();
        assert!(matches!(store.load().await, Err(StoreError::Auth(_))));
        assert!(matches!(
            store.save(&Collection::new()).await,
            Err(StoreError::Auth(_))
        ));
    }
}
