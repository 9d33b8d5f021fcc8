pub mod auth;
pub mod core;
pub mod middleware;

pub use crate::client::auth::{Credentials, fetch_access_token};
pub use crate::client::core::{ClientError, DEFAULT_API_URL, TasksClient};
