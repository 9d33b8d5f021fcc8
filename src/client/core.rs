// File: src/client/core.rs
use crate::client::middleware::{ApiHeaders, ApiHeadersLayer};
use crate::model::{RemoteTask, TaskBody, TaskListBody, TaskListEntry};
use crate::model::payload::TaskListPage;

use http::header::{CONTENT_TYPE, HeaderValue};
use http::{Method, Request, StatusCode, Uri};
use http_body_util::BodyExt;
use hyper_rustls::HttpsConnectorBuilder;
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::TokioExecutor;
use serde::de::DeserializeOwned;
use std::fmt;
use tower::{ServiceBuilder, ServiceExt};
use tower_http::auth::{AddAuthorization, AddAuthorizationLayer};

pub const DEFAULT_API_URL: &str = "https://tasks.googleapis.com/tasks/v1";

const PAGE_SIZE: u32 = 100;

pub type HttpsClient = Client<hyper_rustls::HttpsConnector<HttpConnector>, String>;

type ApiClient = ApiHeaders<AddAuthorization<HttpsClient>>;

#[derive(Debug)]
pub enum ClientError {
    InvalidUrl(String),
    Tls(String),
    Http(String),
    Status { status: StatusCode, body: String },
    Decode(String),
    NoSuchTaskList(String),
    Auth(String),
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::InvalidUrl(e) => write!(f, "Invalid URL: {}", e),
            ClientError::Tls(e) => write!(f, "TLS setup failed: {}", e),
            ClientError::Http(e) => write!(f, "Request failed: {}", e),
            ClientError::Status { status, body } => {
                write!(f, "Server answered {}: {}", status, body.trim())
            }
            ClientError::Decode(e) => write!(f, "Unexpected response: {}", e),
            ClientError::NoSuchTaskList(title) => write!(f, "\"{}\" does not exist.", title),
            ClientError::Auth(e) => write!(f, "Authentication failed: {}", e),
        }
    }
}

impl std::error::Error for ClientError {}

/// Builds a hyper client that speaks HTTPS with the system roots, or plain HTTP.
pub(crate) fn build_https_client(uri: &Uri) -> Result<HttpsClient, ClientError> {
    let mut root_store = rustls::RootCertStore::empty();
    let result = rustls_native_certs::load_native_certs();
    root_store.add_parsable_certificates(result.certs);
    if root_store.is_empty() {
        if uri.scheme_str() == Some("https") {
            return Err(ClientError::Tls(
                "No valid system certificates found.".to_string(),
            ));
        }
        log::debug!("No system certificates; only plain HTTP will work");
    }

    let tls_config = rustls::ClientConfig::builder()
        .with_root_certificates(root_store)
        .with_no_client_auth();

    let https_connector = HttpsConnectorBuilder::new()
        .with_tls_config(tls_config)
        .https_or_http()
        .enable_http1()
        .build();

    Ok(Client::builder(TokioExecutor::new()).build(https_connector))
}

pub(crate) fn parse_url(url: &str) -> Result<(String, Uri), ClientError> {
    let base = url.trim_end_matches('/').to_string();
    let uri: Uri = base
        .parse()
        .map_err(|e: http::uri::InvalidUri| ClientError::InvalidUrl(format!("{}: {}", url, e)))?;
    if uri.scheme().is_none() || uri.authority().is_none() {
        return Err(ClientError::InvalidUrl(format!("{}: not absolute", url)));
    }
    Ok((base, uri))
}

pub(crate) fn json_request(
    method: Method,
    uri: &str,
    body: Option<String>,
) -> Result<Request<String>, ClientError> {
    let mut builder = Request::builder().method(method).uri(uri);
    if body.is_some() {
        builder = builder.header(CONTENT_TYPE, "application/json");
    }
    builder
        .body(body.unwrap_or_default())
        .map_err(|e| ClientError::Http(e.to_string()))
}

/// Percent-encodes `pairs` as an `application/x-www-form-urlencoded` string.
pub(crate) fn form_encode(pairs: &[(&str, &str)]) -> String {
    pairs
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Maps a non-2xx status to `ClientError::Status`, otherwise parses the JSON body.
pub(crate) fn decode<T: DeserializeOwned>(status: StatusCode, bytes: &[u8]) -> Result<T, ClientError> {
    if !status.is_success() {
        return Err(ClientError::Status {
            status,
            body: String::from_utf8_lossy(bytes).into_owned(),
        });
    }
    serde_json::from_slice(bytes).map_err(|e| ClientError::Decode(e.to_string()))
}

/// Client for the task lists and tasks of one Google account.
///
/// Task lists are fetched once on first lookup and cached for the lifetime of the
/// client; lists created through it are added to that cache.
#[derive(Clone)]
pub struct TasksClient {
    http: ApiClient,
    base_url: String,
    create_missing_lists: bool,
    lists: Option<Vec<TaskListEntry>>,
}

impl fmt::Debug for TasksClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TasksClient")
            .field("base_url", &self.base_url)
            .field("create_missing_lists", &self.create_missing_lists)
            .field("lists", &self.lists)
            .finish_non_exhaustive()
    }
}

impl TasksClient {
    pub fn new(api_url: &str, access_token: &str) -> Result<Self, ClientError> {
        let (base_url, uri) = parse_url(api_url)?;
        // AddAuthorizationLayer panics on a token that is not a valid header value.
        if access_token.is_empty()
            || HeaderValue::from_str(&format!("Bearer {}", access_token)).is_err()
        {
            return Err(ClientError::Auth("access token is empty or malformed".to_string()));
        }

        let http_client = build_https_client(&uri)?;
        let http = ServiceBuilder::new()
            .layer(ApiHeadersLayer::default())
            .layer(AddAuthorizationLayer::bearer(access_token))
            .service(http_client);

        Ok(Self {
            http,
            base_url,
            create_missing_lists: false,
            lists: None,
        })
    }

    /// Create task lists that do not exist yet instead of failing with `NoSuchTaskList`.
    pub fn with_create_missing(mut self, create: bool) -> Self {
        self.create_missing_lists = create;
        self
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<String>,
    ) -> Result<T, ClientError> {
        let uri = format!("{}{}", self.base_url, path);
        log::debug!("{} {}", method, uri);
        let req = json_request(method, &uri, body)?;

        let response = self
            .http
            .clone()
            .oneshot(req)
            .await
            .map_err(|e| ClientError::Http(e.to_string()))?;
        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .map_err(|e| ClientError::Http(e.to_string()))?
            .to_bytes();
        decode(status, &bytes)
    }

    // --- TASK LISTS ---

    /// All task lists of the account, following pagination.
    pub async fn list_tasklists(&self) -> Result<Vec<TaskListEntry>, ClientError> {
        let mut lists = Vec::new();
        let mut page_token: Option<String> = None;
        let page_size = PAGE_SIZE.to_string();
        loop {
            let mut query = vec![("maxResults", page_size.as_str())];
            if let Some(token) = &page_token {
                query.push(("pageToken", token.as_str()));
            }
            let path = format!("/users/@me/lists?{}", form_encode(&query));
            let page: TaskListPage = self.send(Method::GET, &path, None).await?;
            lists.extend(page.items);
            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }
        Ok(lists)
    }

    pub async fn create_tasklist(&self, title: &str) -> Result<TaskListEntry, ClientError> {
        let body = serde_json::to_string(&TaskListBody::new(title))
            .map_err(|e| ClientError::Decode(e.to_string()))?;
        self.send(Method::POST, "/users/@me/lists", Some(body)).await
    }

    fn cached_id(&self, title: &str) -> Option<String> {
        self.lists
            .as_ref()?
            .iter()
            .find(|l| l.title == title)
            .map(|l| l.id.clone())
    }

    /// Resolves a list title to its id, creating the list when allowed.
    pub async fn tasklist_id(&mut self, title: &str) -> Result<String, ClientError> {
        if self.lists.is_none() {
            let lists = self.list_tasklists().await?;
            log::debug!("Fetched {} task list(s)", lists.len());
            self.lists = Some(lists);
        }
        if let Some(id) = self.cached_id(title) {
            return Ok(id);
        }
        if !self.create_missing_lists {
            return Err(ClientError::NoSuchTaskList(title.to_string()));
        }

        let created = self.create_tasklist(title).await?;
        log::info!("Created task list '{}'", title);
        let id = created.id.clone();
        self.lists.get_or_insert_with(Vec::new).push(created);
        Ok(id)
    }

    // --- TASKS ---

    pub async fn insert_task(
        &self,
        list_id: &str,
        task: &TaskBody,
    ) -> Result<RemoteTask, ClientError> {
        let body = serde_json::to_string(task).map_err(|e| ClientError::Decode(e.to_string()))?;
        let path = format!("/lists/{}/tasks", urlencoding::encode(list_id));
        self.send(Method::POST, &path, Some(body)).await
    }

    /// Adds a new "needs action" task titled `task` to the list titled `list`.
    pub async fn add_task(&mut self, list: &str, task: &str) -> Result<RemoteTask, ClientError> {
        let list_id = self.tasklist_id(list).await?;
        self.insert_task(&list_id, &TaskBody::new(task)).await
    }
}
