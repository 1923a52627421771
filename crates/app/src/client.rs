//! REST data-access client for a PostgREST-compatible backend.

use std::fmt;

use reqwest::{
    Client, Method, RequestBuilder, Response, StatusCode,
    header::{ACCEPT, CONTENT_TYPE},
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use thiserror::Error;
use tracing::debug;

/// Media type asking the backend for exactly one row as a bare object.
const OBJECT_MEDIA_TYPE: &str = "application/vnd.pgrst.object+json";

/// Connection settings for the hosted backend.
#[derive(Clone)]
pub struct ClientConfig {
    /// Backend base URL, e.g. `"https://project.example.co"`.
    pub url: String,

    /// Public API key, sent as `apikey` and as the bearer token when no session
    /// token is set.
    pub key: String,

    /// Access token of a signed-in session.
    pub access_token: Option<String>,
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("url", &self.url)
            .field("key", &"<redacted>")
            .field(
                "access_token",
                &self.access_token.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

/// Row selection against a named table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Select {
    table: String,
    filters: Vec<(String, String)>,
    order: Vec<String>,
}

impl Select {
    /// Select every column of every row of `table`.
    pub fn table(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            filters: Vec::new(),
            order: Vec::new(),
        }
    }

    /// Keep rows where `column` equals `value`.
    #[must_use]
    pub fn eq(self, column: &str, value: impl fmt::Display) -> Self {
        self.filter(column, "eq", value)
    }

    /// Keep rows where `column` is at least `value`.
    #[must_use]
    pub fn gte(self, column: &str, value: impl fmt::Display) -> Self {
        self.filter(column, "gte", value)
    }

    /// Keep rows where `column` is at most `value`.
    #[must_use]
    pub fn lte(self, column: &str, value: impl fmt::Display) -> Self {
        self.filter(column, "lte", value)
    }

    /// Append an ordering term; earlier terms take precedence.
    #[must_use]
    pub fn order(mut self, column: &str, ascending: bool) -> Self {
        let direction = if ascending { "asc" } else { "desc" };

        self.order.push(format!("{column}.{direction}"));
        self
    }

    /// Table name.
    pub fn table_name(&self) -> &str {
        &self.table
    }

    /// Query string pairs for the request.
    pub fn query(&self) -> Vec<(String, String)> {
        let mut query = Vec::with_capacity(self.filters.len() + 2);

        query.push(("select".to_string(), "*".to_string()));
        query.extend(self.filters.iter().cloned());

        if !self.order.is_empty() {
            query.push(("order".to_string(), self.order.join(",")));
        }

        query
    }

    fn filter(mut self, column: &str, operator: &str, value: impl fmt::Display) -> Self {
        self.filters
            .push((column.to_string(), format!("{operator}.{value}")));
        self
    }
}

/// Account behind the session's access token.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AuthUser {
    /// Account id
    pub id: String,

    /// Sign-in email, when the account has one
    #[serde(default)]
    pub email: Option<String>,
}

/// HTTP client for tables and remote procedures of the hosted backend.
#[derive(Debug, Clone)]
pub struct DataClient {
    config: ClientConfig,
    http: Client,
}

impl DataClient {
    /// Create a new client from the given configuration.
    #[must_use]
    pub fn new(config: ClientConfig) -> Self {
        Self {
            config,
            http: Client::new(),
        }
    }

    /// Fetch every row matching `select`.
    ///
    /// # Errors
    ///
    /// Returns an error on HTTP failure, a non-2xx reply or an undecodable body.
    pub async fn select<T: DeserializeOwned>(&self, select: &Select) -> Result<Vec<T>, ClientError> {
        debug!(table = select.table_name(), "selecting rows");

        let response = self
            .request(Method::GET, select.table_name())
            .query(&select.query())
            .send()
            .await?;

        decode(checked(response).await?).await
    }

    /// Fetch the single row matching `select`, or `None` when no row matches.
    ///
    /// # Errors
    ///
    /// Returns an error on HTTP failure, a non-2xx reply other than "no row" or an
    /// undecodable body.
    pub async fn select_single<T: DeserializeOwned>(
        &self,
        select: &Select,
    ) -> Result<Option<T>, ClientError> {
        debug!(table = select.table_name(), "selecting single row");

        let response = self
            .request(Method::GET, select.table_name())
            .query(&select.query())
            .header(ACCEPT, OBJECT_MEDIA_TYPE)
            .send()
            .await?;

        if response.status() == StatusCode::NOT_ACCEPTABLE {
            return Ok(None);
        }

        decode(checked(response).await?).await.map(Some)
    }

    /// Insert a row and return it as stored.
    ///
    /// # Errors
    ///
    /// Returns an error on HTTP failure, a non-2xx reply or an undecodable body.
    pub async fn insert<B, T>(&self, table: &str, row: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        debug!(table, "inserting row");

        let response = self
            .request(Method::POST, table)
            .header(ACCEPT, OBJECT_MEDIA_TYPE)
            .header("Prefer", "return=representation")
            .json(row)
            .send()
            .await?;

        decode(checked(response).await?).await
    }

    /// Apply `changes` to the row with the given id and return it as stored, or
    /// `None` when no row has that id.
    ///
    /// # Errors
    ///
    /// Returns an error on HTTP failure, a non-2xx reply other than "no row" or an
    /// undecodable body.
    pub async fn update<B, T>(&self, table: &str, id: &str, changes: &B) -> Result<Option<T>, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        debug!(table, id, "updating row");

        let response = self
            .request(Method::PATCH, table)
            .query(&[("id", format!("eq.{id}"))])
            .header(ACCEPT, OBJECT_MEDIA_TYPE)
            .header("Prefer", "return=representation")
            .json(changes)
            .send()
            .await?;

        if response.status() == StatusCode::NOT_ACCEPTABLE {
            return Ok(None);
        }

        decode(checked(response).await?).await.map(Some)
    }

    /// Insert a row, or merge it into the row it conflicts with.
    ///
    /// # Errors
    ///
    /// Returns an error on HTTP failure or a non-2xx reply.
    pub async fn upsert<B>(&self, table: &str, row: &B) -> Result<(), ClientError>
    where
        B: Serialize + ?Sized,
    {
        debug!(table, "upserting row");

        let response = self
            .request(Method::POST, table)
            .header("Prefer", "resolution=merge-duplicates,return=minimal")
            .json(row)
            .send()
            .await?;

        checked(response).await?;

        Ok(())
    }

    /// Account of the signed-in session. `None` without an access token or when the
    /// backend no longer accepts it.
    ///
    /// # Errors
    ///
    /// Returns an error on HTTP failure, any other non-2xx reply or an undecodable
    /// body.
    pub async fn auth_user(&self) -> Result<Option<AuthUser>, ClientError> {
        if self.config.access_token.is_none() {
            return Ok(None);
        }

        debug!("fetching session user");

        let response = self.auth_request(Method::GET, "user").send().await?;

        let status = response.status();

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Ok(None);
        }

        decode(checked(response).await?).await.map(Some)
    }

    /// Call a remote procedure. Returns `None` when the procedure replies with an
    /// empty body.
    ///
    /// # Errors
    ///
    /// Returns an error on HTTP failure, a non-2xx reply or an undecodable body.
    pub async fn rpc<B>(&self, function: &str, args: &B) -> Result<Option<serde_json::Value>, ClientError>
    where
        B: Serialize + ?Sized,
    {
        debug!(function, "calling remote procedure");

        let response = self
            .request(Method::POST, &format!("rpc/{function}"))
            .json(args)
            .send()
            .await?;

        let body = checked(response).await?.text().await?;

        if body.trim().is_empty() {
            return Ok(None);
        }

        Ok(Some(serde_json::from_str(&body)?))
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.endpoint(method, &format!("rest/v1/{path}"))
            .header(CONTENT_TYPE, "application/json")
    }

    fn auth_request(&self, method: Method, path: &str) -> RequestBuilder {
        self.endpoint(method, &format!("auth/v1/{path}"))
    }

    fn endpoint(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}/{path}", self.config.url.trim_end_matches('/'));
        let token = self.config.access_token.as_ref().unwrap_or(&self.config.key);

        self.http
            .request(method, url)
            .header("apikey", &self.config.key)
            .bearer_auth(token)
    }
}

async fn checked(response: Response) -> Result<Response, ClientError> {
    let status = response.status();

    if status.is_success() {
        return Ok(response);
    }

    let message = response.text().await.unwrap_or_default();

    Err(ClientError::Status { status, message })
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let body = response.text().await?;

    Ok(serde_json::from_str(&body)?)
}

/// Errors that can occur when talking to the backend.
#[derive(Debug, Error)]
pub enum ClientError {
    /// An HTTP transport error occurred.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend replied with a non-2xx status.
    #[error("backend replied {status}: {message}")]
    Status {
        /// Reply status
        status: StatusCode,

        /// Reply body
        message: String,
    },

    /// The reply body did not match the expected shape.
    #[error("undecodable response: {0}")]
    Decode(#[from] serde_json::Error),
}
