//! Client for the hosted content store: PostgREST tables, password auth and
//! object storage, all behind one base URL and API key.

mod objects;
mod query;
mod tables;

use log::debug;
use reqwest::StatusCode;
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::{CONTENT_RANGE, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

pub use objects::{AD_BUCKET, POST_BUCKET, object_name};
pub use query::{Query, parse_content_range};
pub use tables::PostPage;

pub const POSTS: &str = "posts";
pub const CATEGORIES: &str = "categories";
pub const COMMENTS: &str = "comments";
pub const ADS: &str = "advertisements";
pub const USERS: &str = "users";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("invalid store address: {0}")]
    Url(#[from] url::ParseError),
    #[error("{what}: {source}")]
    Http {
        what: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{what}: {status}: {message}")]
    Rejected {
        what: String,
        status: StatusCode,
        message: String,
    },
    #[error("{table}: no row with id {id}")]
    NotFound { table: &'static str, id: i64 },
    #[error("{0}: response carried no row count")]
    MissingCount(&'static str),
    #[error("{0}: store returned no row")]
    Empty(&'static str),
}

impl StoreError {
    fn http(what: &str) -> impl FnOnce(reqwest::Error) -> Self + '_ {
        move |source| StoreError::Http {
            what: what.to_string(),
            source,
        }
    }
}

/// Handle on the content store, optionally acting as a signed-in user.
#[derive(Debug, Clone)]
pub struct Store {
    client: Client,
    base: Url,
    api_key: String,
    token: Option<String>,
}

impl Store {
    pub fn new(client: Client, base: &str, api_key: &str) -> Result<Self, StoreError> {
        let mut base = Url::parse(base.trim())?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(Self {
            client,
            base,
            api_key: api_key.to_string(),
            token: None,
        })
    }

    /// Send requests with the user's access token instead of the anon key.
    pub fn with_token(mut self, token: &str) -> Self {
        self.token = Some(token.to_string());
        self
    }

    pub(crate) fn endpoint(&self, path: &str) -> Result<Url, StoreError> {
        Ok(self.base.join(path)?)
    }

    fn table_url(&self, query: &Query) -> Result<Url, StoreError> {
        let mut url = self.endpoint(&format!("rest/v1/{}", query.table_name()))?;
        query.apply(&mut url);
        Ok(url)
    }

    pub(crate) fn request(&self, method: reqwest::Method, url: Url) -> RequestBuilder {
        let bearer = self.token.as_deref().unwrap_or(&self.api_key);
        debug!("{method} {url}");
        self.client
            .request(method, url)
            .header("apikey", &self.api_key)
            .bearer_auth(bearer)
    }

    pub(crate) fn send(&self, what: &str, request: RequestBuilder) -> Result<Response, StoreError> {
        let response = request.send().map_err(StoreError::http(what))?;
        Self::check(what, response)
    }

    fn check(what: &str, response: Response) -> Result<Response, StoreError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().unwrap_or_default();
        Err(StoreError::Rejected {
            what: what.to_string(),
            status,
            message: error_message(&body),
        })
    }

    fn fetch<T: DeserializeOwned>(&self, query: &Query) -> Result<Vec<T>, StoreError> {
        let table = query.table_name();
        let request = self.request(reqwest::Method::GET, self.table_url(query)?);
        self.send(table, request)?
            .json()
            .map_err(StoreError::http(table))
    }

    /// Rows of the requested window plus the exact number of matching rows.
    ///
    /// A window starting past the last row is answered with 416 and a
    /// `*/total` range; that is an empty window, not a failure.
    fn fetch_counted<T: DeserializeOwned>(
        &self,
        query: &Query,
    ) -> Result<(Vec<T>, usize), StoreError> {
        let table = query.table_name();
        let response = self
            .request(reqwest::Method::GET, self.table_url(query)?)
            .header("Prefer", "count=exact")
            .send()
            .map_err(StoreError::http(table))?;
        if response.status() == StatusCode::RANGE_NOT_SATISFIABLE
            && let Some(total) = total_count(response.headers().get(CONTENT_RANGE))
        {
            debug!("{table}: window starts past row {total}");
            return Ok((Vec::new(), total));
        }
        let response = Self::check(table, response)?;
        let total = total_count(response.headers().get(CONTENT_RANGE))
            .ok_or(StoreError::MissingCount(table))?;
        let rows = response.json().map_err(StoreError::http(table))?;
        Ok((rows, total))
    }

    fn fetch_one<T: DeserializeOwned>(&self, query: Query, id: i64) -> Result<T, StoreError> {
        let table = query.table_name();
        self.fetch(&query.eq("id", id).limit(1))?
            .into_iter()
            .next()
            .ok_or(StoreError::NotFound { table, id })
    }

    pub fn count(&self, table: &'static str) -> Result<usize, StoreError> {
        let query = Query::table(table).select("*");
        let request = self
            .request(reqwest::Method::HEAD, self.table_url(&query)?)
            .header("Prefer", "count=exact");
        let response = self.send(table, request)?;
        total_count(response.headers().get(CONTENT_RANGE)).ok_or(StoreError::MissingCount(table))
    }

    fn insert<B: Serialize, T: DeserializeOwned>(
        &self,
        table: &'static str,
        body: &B,
    ) -> Result<T, StoreError> {
        let request = self
            .request(reqwest::Method::POST, self.table_url(&Query::table(table))?)
            .header("Prefer", "return=representation")
            .json(body);
        let rows: Vec<T> = self
            .send(table, request)?
            .json()
            .map_err(StoreError::http(table))?;
        rows.into_iter().next().ok_or(StoreError::Empty(table))
    }

    fn update<B: Serialize>(&self, filter: &Query, body: &B) -> Result<(), StoreError> {
        let request = self
            .request(reqwest::Method::PATCH, self.table_url(filter)?)
            .json(body);
        self.send(filter.table_name(), request)?;
        Ok(())
    }

    fn delete(&self, filter: &Query) -> Result<(), StoreError> {
        let request = self.request(reqwest::Method::DELETE, self.table_url(filter)?);
        self.send(filter.table_name(), request)?;
        Ok(())
    }
}

fn total_count(header: Option<&HeaderValue>) -> Option<usize> {
    header
        .and_then(|h| h.to_str().ok())
        .and_then(parse_content_range)
}

/// Pull a readable message out of a PostgREST, auth or storage error body.
fn error_message(body: &str) -> String {
    let parsed: Option<serde_json::Value> = serde_json::from_str(body).ok();
    parsed
        .as_ref()
        .and_then(|v| {
            ["message", "msg", "error_description", "error"]
                .iter()
                .find_map(|key| v.get(key).and_then(|m| m.as_str()))
        })
        .map(str::to_string)
        .unwrap_or_else(|| body.trim().to_string())
}
