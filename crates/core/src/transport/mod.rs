//! HTTP transport seam.
//!
//! The client never talks to `reqwest` directly: every request goes through a
//! [`Transport`], which turns a [`VendorRequest`] into a [`VendorResponse`] or a
//! [`TransportError`] when no response could be obtained. [`HttpTransport`] is the
//! production implementation; tests substitute scripted transports.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderName, HeaderValue, USER_AGENT};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::error::{Error, Result};

pub type BoxFut<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
	Get,
	Post,
}

impl Method {
	pub fn as_str(&self) -> &'static str {
		match self {
			Method::Get => "GET",
			Method::Post => "POST",
		}
	}
}

/// A single vendor call, before authentication is attached.
#[derive(Debug, Clone, PartialEq)]
pub struct VendorRequest {
	pub method: Method,
	/// Absolute URL.
	pub url: String,
	pub query: Vec<(String, String)>,
	pub body: Option<serde_json::Value>,
	/// Bearer token; filled in by the client on every attempt.
	pub bearer: Option<String>,
}

impl VendorRequest {
	pub fn new(method: Method, url: impl Into<String>) -> Self {
		Self {
			method,
			url: url.into(),
			query: Vec::new(),
			body: None,
			bearer: None,
		}
	}

	pub fn get(url: impl Into<String>) -> Self {
		Self::new(Method::Get, url)
	}

	pub fn post(url: impl Into<String>) -> Self {
		Self::new(Method::Post, url)
	}

	/// Attaches a JSON body.
	pub fn json(mut self, body: &impl Serialize) -> Result<Self> {
		self.body = Some(serde_json::to_value(body)?);
		Ok(self)
	}

	pub fn query(mut self, pairs: impl IntoIterator<Item = (String, String)>) -> Self {
		self.query.extend(pairs);
		self
	}
}

/// Raw vendor response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VendorResponse {
	pub status: u16,
	pub body: String,
	/// Cookies set by this response, in header order.
	pub cookies: Vec<(String, String)>,
}

impl VendorResponse {
	pub fn new(status: u16, body: impl Into<String>) -> Self {
		Self {
			status,
			body: body.into(),
			cookies: Vec::new(),
		}
	}

	pub fn with_cookie(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.cookies.push((name.into(), value.into()));
		self
	}

	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}

	/// 401 and 403 both mean the session is no longer accepted.
	pub fn is_auth_failure(&self) -> bool {
		matches!(self.status, 401 | 403)
	}

	pub fn json<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
		serde_json::from_str(&self.body)
	}

	/// Last value set for `name`.
	pub fn cookie(&self, name: &str) -> Option<&str> {
		self.cookies.iter().rev().find(|(n, _)| n == name).map(|(_, v)| v.as_str())
	}
}

/// No response could be obtained.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
	#[error("request timed out")]
	Timeout,

	#[error("connection failed: {0}")]
	Connect(String),

	#[error("transport error: {0}")]
	Other(String),
}

impl From<reqwest::Error> for TransportError {
	fn from(err: reqwest::Error) -> Self {
		if err.is_timeout() {
			TransportError::Timeout
		} else if err.is_connect() {
			TransportError::Connect(err.to_string())
		} else {
			TransportError::Other(err.to_string())
		}
	}
}

/// Sends vendor requests.
pub trait Transport: Send + Sync {
	fn send<'a>(&'a self, request: &'a VendorRequest) -> BoxFut<'a, std::result::Result<VendorResponse, TransportError>>;
}

/// `reqwest`-backed transport with a persistent cookie jar.
///
/// The jar carries the booking wizard's server-side state between steps, so one
/// transport must be used for the whole lifetime of a client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
	client: reqwest::Client,
}

impl HttpTransport {
	pub fn new(timeout: Duration) -> Result<Self> {
		let client = reqwest::Client::builder()
			.cookie_store(true)
			.timeout(timeout)
			.default_headers(default_headers())
			.build()
			.map_err(|e| Error::ClientSetup(e.to_string()))?;
		Ok(Self { client })
	}
}

impl Transport for HttpTransport {
	fn send<'a>(&'a self, request: &'a VendorRequest) -> BoxFut<'a, std::result::Result<VendorResponse, TransportError>> {
		Box::pin(async move {
			let mut builder = match request.method {
				Method::Get => self.client.get(&request.url),
				Method::Post => self.client.post(&request.url),
			};
			if !request.query.is_empty() {
				builder = builder.query(&request.query);
			}
			if let Some(body) = &request.body {
				builder = builder.json(body);
			}
			if let Some(token) = &request.bearer {
				builder = builder.bearer_auth(token);
			}

			let response = builder.send().await?;
			let status = response.status().as_u16();
			let cookies = response.cookies().map(|c| (c.name().to_string(), c.value().to_string())).collect();
			let body = response.text().await?;

			Ok(VendorResponse { status, body, cookies })
		})
	}
}

fn default_headers() -> HeaderMap {
	let mut headers = HeaderMap::new();
	headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
	headers.insert(ACCEPT, HeaderValue::from_static("application/json, text/plain, */*"));
	headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
	headers.insert(HeaderName::from_static("x-requested-with"), HeaderValue::from_static("XMLHttpRequest"));
	headers.insert(HeaderName::from_static("cp-lang"), HeaderValue::from_static("en"));
	headers.insert(HeaderName::from_static("cp-mode"), HeaderValue::from_static("desktop"));
	headers
}
