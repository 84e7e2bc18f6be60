//! Remote row loading
//!
//! Fetches a JSON array of row objects over HTTP and converts it into
//! [`Record`]s for [`TabularStore::init`](crate::store::TabularStore::init).

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use reqwest::Method;
use reqwest::header::HeaderMap;
use reqwest::header::HeaderName;
use reqwest::header::HeaderValue;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::error::LoadError;
use crate::model::Record;
use crate::model::records_from_json;

/// Where to load rows from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteSource {
    pub url: String,
    #[serde(default)]
    pub options: RequestOptions,
}

impl RemoteSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            options: RequestOptions::default(),
        }
    }

    pub fn with_options(mut self, options: RequestOptions) -> Self {
        self.options = options;
        self
    }
}

/// Per-request settings for a [`RemoteSource`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestOptions {
    /// HTTP method; `GET` when unset.
    pub method: Option<String>,
    pub headers: HashMap<String, String>,
    /// Raw request body.
    pub body: Option<String>,
    /// Overrides the loader's request timeout.
    #[serde(with = "millis", skip_serializing_if = "Option::is_none")]
    pub timeout: Option<Duration>,
}

mod millis {
    use std::time::Duration;

    use serde::Deserialize;
    use serde::Deserializer;
    use serde::Serializer;

    pub fn serialize<S: Serializer>(value: &Option<Duration>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(d) => s.serialize_u64(d.as_millis() as u64),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Duration>, D::Error> {
        Ok(Option::<u64>::deserialize(d)?.map(Duration::from_millis))
    }
}

/// Reshapes a decoded response before row conversion, e.g. to pull the row
/// array out of an envelope object.
pub type ResponseTransform = dyn Fn(Value) -> Value + Send + Sync;

/// HTTP client for remote row sources.
///
/// Cheap to clone and safe to share across tasks.
///
/// # Example
///
/// ```ignore
/// use std::time::Duration;
/// use tabula_lib::remote::{RemoteLoader, RemoteSource};
///
/// let loader = RemoteLoader::builder()
///     .timeout(Duration::from_secs(10))
///     .build()?;
/// let rows = loader
///     .fetch_rows(&RemoteSource::new("https://example.com/people.json"), None)
///     .await?;
/// ```
#[derive(Clone)]
pub struct RemoteLoader {
    inner: Arc<RemoteLoaderInner>,
}

struct RemoteLoaderInner {
    http_client: Client,
    timeout: Option<Duration>,
}

impl RemoteLoader {
    pub fn builder() -> RemoteLoaderBuilder {
        RemoteLoaderBuilder::default()
    }

    /// Fetches `source` and converts the response into rows.
    ///
    /// The body must decode as JSON; `transform`, when given, runs on the
    /// decoded value and must produce an array of objects.
    pub async fn fetch_rows(
        &self,
        source: &RemoteSource,
        transform: Option<&ResponseTransform>,
    ) -> Result<Vec<Record>, LoadError> {
        let url = Url::parse(&source.url).map_err(|e| LoadError::InvalidUrl(format!("{}: {}", source.url, e)))?;
        let method = match source.options.method.as_deref() {
            Some(name) => Method::from_bytes(name.to_ascii_uppercase().as_bytes())
                .map_err(|_| LoadError::InvalidRequest(format!("unknown method '{}'", name)))?,
            None => Method::GET,
        };
        let headers = header_map(&source.options.headers)?;

        log::info!("loading rows: {} {}", method, url);

        let mut request = self.inner.http_client.request(method, url).headers(headers);
        if let Some(body) = &source.options.body {
            request = request.body(body.clone());
        }
        if let Some(timeout) = source.options.timeout.or(self.inner.timeout) {
            request = request.timeout(timeout);
        }

        let response = request.send().await.inspect_err(|e| {
            log::warn!("row load failed: {}", e);
        })?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            log::warn!("row load failed: HTTP {}", status.as_u16());
            let message = if body.is_empty() {
                status.canonical_reason().unwrap_or_default().to_string()
            } else {
                body
            };
            return Err(LoadError::http(status.as_u16(), message));
        }

        let mut value: Value = serde_json::from_str(&body)
            .map_err(|e| LoadError::parse_with_body(e.to_string(), body.as_str()))?;
        if let Some(transform) = transform {
            value = transform(value);
        }

        let rows = records_from_json(&value).ok_or_else(|| {
            LoadError::shape(format!("expected an array of objects, got {}", json_kind(&value)))
        })?;
        log::info!("loaded {} rows", rows.len());
        Ok(rows)
    }
}

fn header_map(headers: &HashMap<String, String>) -> Result<HeaderMap, LoadError> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| LoadError::InvalidRequest(format!("invalid header name '{}'", name)))?;
        let value = HeaderValue::from_str(value)
            .map_err(|_| LoadError::InvalidRequest(format!("invalid value for header '{}'", name)))?;
        map.insert(name, value);
    }
    Ok(map)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array with non-object items",
        Value::Object(_) => "an object",
    }
}

/// Builder for [`RemoteLoader`].
#[derive(Default)]
pub struct RemoteLoaderBuilder {
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    http_client: Option<Client>,
}

impl RemoteLoaderBuilder {
    /// Sets the default request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the connection timeout.
    ///
    /// Ignored when a custom HTTP client is supplied.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Sets a custom HTTP client.
    pub fn http_client(mut self, client: Client) -> Self {
        self.http_client = Some(client);
        self
    }

    pub fn build(self) -> Result<RemoteLoader, LoadError> {
        let http_client = match self.http_client {
            Some(client) => client,
            None => {
                let mut builder = Client::builder();
                if let Some(timeout) = self.connect_timeout {
                    builder = builder.connect_timeout(timeout);
                }
                builder.build()?
            }
        };

        Ok(RemoteLoader {
            inner: Arc::new(RemoteLoaderInner {
                http_client,
                timeout: self.timeout,
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_from_json() {
        let source: RemoteSource = serde_json::from_str(
            r#"{"url": "http://localhost/rows", "options": {"method": "post", "headers": {"X-Key": "1"}, "timeout": 2500}}"#,
        )
        .unwrap();
        assert_eq!(source.options.method.as_deref(), Some("post"));
        assert_eq!(source.options.headers.get("X-Key").map(String::as_str), Some("1"));
        assert_eq!(source.options.timeout, Some(Duration::from_millis(2500)));

        let bare: RemoteSource = serde_json::from_str(r#"{"url": "http://localhost/rows"}"#).unwrap();
        assert_eq!(bare.options, RequestOptions::default());
    }

    #[test]
    fn test_header_map_rejects_bad_names() {
        let headers = HashMap::from([("bad header".to_string(), "x".to_string())]);
        assert!(matches!(header_map(&headers), Err(LoadError::InvalidRequest(_))));

        let headers = HashMap::from([("Accept".to_string(), "application/json".to_string())]);
        assert_eq!(header_map(&headers).unwrap().len(), 1);
    }
}
