//! Tower middleware that stamps every API request with our User-Agent and a JSON Accept header.
use http::Request;
use http::header::{ACCEPT, HeaderValue, USER_AGENT};
use std::task::{Context, Poll};
use tower_layer::Layer;
use tower_service::Service;

pub fn default_user_agent() -> String {
    format!("weektodo/{}", env!("CARGO_PKG_VERSION"))
}

#[derive(Clone, Debug)]
pub struct ApiHeadersLayer {
    user_agent: HeaderValue,
}

impl ApiHeadersLayer {
    /// Falls back to the crate's default agent when `user_agent` is not a valid header value.
    pub fn new(user_agent: &str) -> Self {
        let user_agent = HeaderValue::from_str(user_agent).unwrap_or_else(|_| {
            HeaderValue::from_static(concat!("weektodo/", env!("CARGO_PKG_VERSION")))
        });
        Self { user_agent }
    }
}

impl Default for ApiHeadersLayer {
    fn default() -> Self {
        Self::new(&default_user_agent())
    }
}

impl<S> Layer<S> for ApiHeadersLayer {
    type Service = ApiHeaders<S>;

    fn layer(&self, inner: S) -> Self::Service {
        ApiHeaders {
            inner,
            user_agent: self.user_agent.clone(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct ApiHeaders<S> {
    inner: S,
    user_agent: HeaderValue,
}

impl<S, ReqBody> Service<Request<ReqBody>> for ApiHeaders<S>
where
    S: Service<Request<ReqBody>>,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<ReqBody>) -> Self::Future {
        let headers = req.headers_mut();
        headers.insert(USER_AGENT, self.user_agent.clone());
        headers
            .entry(ACCEPT)
            .or_insert(HeaderValue::from_static("application/json"));
        self.inner.call(req)
    }
}
