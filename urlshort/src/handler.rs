use std::{
    borrow::Cow,
    convert::Infallible,
    future::Future,
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
};

use axum::{
    extract::Request,
    http::{header::LOCATION, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use tower::Service;

use crate::{parse_json, parse_toml, parse_yaml, DecodeError, RedirectTable};

/// Whether the fallback still runs after a path matched.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FallbackPolicy {
    /// The fallback runs for every request. On a match the redirect status and
    /// `Location` header are already written, so only the fallback's body
    /// makes it into the response.
    #[default]
    Always,
    /// The fallback runs only when no path matched.
    OnMiss,
}

/// Redirects configured paths with `301 Moved Permanently` and hands
/// requests to a fallback service.
///
/// The table is shared, so cloning a `Redirect` is as cheap as cloning the
/// fallback.
#[derive(Clone, Debug)]
pub struct Redirect<F> {
    table: Arc<RedirectTable>,
    fallback: F,
    policy: FallbackPolicy,
}

impl<F> Redirect<F> {
    pub fn new(table: impl Into<Arc<RedirectTable>>, fallback: F) -> Self {
        let table = table.into();
        tracing::debug!(paths = table.len(), "built redirect handler");
        Self {
            table,
            fallback,
            policy: FallbackPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: FallbackPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn table(&self) -> &RedirectTable {
        &self.table
    }

    pub fn policy(&self) -> FallbackPolicy {
        self.policy
    }
}

/// Wraps `fallback` so that every path in `table` redirects to its URL.
pub fn map_handler<F>(table: impl Into<Arc<RedirectTable>>, fallback: F) -> Redirect<F> {
    Redirect::new(table, fallback)
}

/// Like [`map_handler`], with the table read from YAML records.
pub fn yaml_handler<F>(yml: &[u8], fallback: F) -> Result<Redirect<F>, DecodeError> {
    let table = RedirectTable::from_records(parse_yaml(yml)?);
    Ok(map_handler(table, fallback))
}

/// Like [`map_handler`], with the table read from JSON records.
pub fn json_handler<F>(jsn: &[u8], fallback: F) -> Result<Redirect<F>, DecodeError> {
    let table = RedirectTable::from_records(parse_json(jsn)?);
    Ok(map_handler(table, fallback))
}

/// Like [`map_handler`], with the table read from `[[redirect]]` TOML tables.
pub fn toml_handler<F>(tml: &[u8], fallback: F) -> Result<Redirect<F>, DecodeError> {
    let table = RedirectTable::from_records(parse_toml(tml)?);
    Ok(map_handler(table, fallback))
}

// Control bytes can't go in a header; they become spaces.
fn location(url: &str) -> HeaderValue {
    HeaderValue::from_bytes(url.as_bytes()).unwrap_or_else(|_| {
        let cleaned: Vec<u8> = url
            .bytes()
            .map(|b| if (b < 0x20 && b != b'\t') || b == 0x7f { b' ' } else { b })
            .collect();
        HeaderValue::from_bytes(&cleaned).unwrap_or(HeaderValue::from_static(""))
    })
}

// Table keys are unescaped paths. Escapes that don't decode to UTF-8 leave the
// path as sent.
fn request_path(raw: &str) -> Cow<'_, str> {
    urlencoding::decode(raw).unwrap_or(Cow::Borrowed(raw))
}

fn moved_permanently(url: &str, fallback: Option<Response>) -> Response {
    let mut response = match fallback {
        Some(response) => Response::new(response.into_body()),
        None => Response::default(),
    };
    *response.status_mut() = StatusCode::MOVED_PERMANENTLY;
    response.headers_mut().insert(LOCATION, location(url));
    response
}

impl<F> Service<Request> for Redirect<F>
where
    F: Service<Request, Error = Infallible> + Clone + Send + 'static,
    F::Response: IntoResponse,
    F::Future: Send + 'static,
{
    type Response = Response;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Response, Infallible>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.fallback.poll_ready(cx)
    }

    fn call(&mut self, req: Request) -> Self::Future {
        let path = request_path(req.uri().path());
        let target = self.table.resolve(&path).map(str::to_owned);
        if let Some(url) = &target {
            tracing::trace!(%path, %url, "redirecting");
        }

        // Take the service that was polled ready, leave a fresh clone behind.
        let clone = self.fallback.clone();
        let mut fallback = std::mem::replace(&mut self.fallback, clone);
        let policy = self.policy;

        Box::pin(async move {
            let response = match (target, policy) {
                (Some(url), FallbackPolicy::OnMiss) => moved_permanently(&url, None),
                (Some(url), FallbackPolicy::Always) => {
                    let late = fallback.call(req).await?.into_response();
                    moved_permanently(&url, Some(late))
                }
                (None, _) => fallback.call(req).await?.into_response(),
            };
            Ok(response)
        })
    }
}
