use std::{
    future::Future,
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
};

use http::{HeaderValue, Request, Response, StatusCode, header};
use tower_layer::Layer;
use tower_service::Service;

use crate::{CookieStore, config::CookieStoreConfig, request::RequestDocument};

/// The per-request [`CookieStore`] inserted into request extensions by
/// [`CookieDocumentLayer`].
pub type RequestCookies = CookieStore<Arc<RequestDocument>>;

/// Gives every request a [`RequestCookies`] handle and turns the cookie
/// writes made while handling it into `Set-Cookie` response headers.
#[derive(Debug, Clone, Default)]
pub struct CookieDocumentLayer {
    config: CookieStoreConfig,
}

impl CookieDocumentLayer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_config(mut self, config: CookieStoreConfig) -> Self {
        self.config = config;
        self
    }
}

#[derive(Debug, Clone)]
pub struct CookieDocumentService<S> {
    inner: S,
    config: CookieStoreConfig,
}

impl<S> Layer<S> for CookieDocumentLayer {
    type Service = CookieDocumentService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        CookieDocumentService {
            inner,
            config: self.config.clone(),
        }
    }
}

impl<ReqBody, ResBody, S> Service<Request<ReqBody>> for CookieDocumentService<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>> + Clone + Send + 'static,
    S::Future: Send,
    ReqBody: Send + 'static,
    ResBody: Default + Send,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<ReqBody>) -> Self::Future {
        let config = self.config.clone();

        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        Box::pin(async move {
            let Some(document) = RequestDocument::from_request(&req) else {
                tracing::warn!(uri = %req.uri(), "request has no host, cannot bind cookies");
                let mut res = Response::default();
                *res.status_mut() = StatusCode::BAD_REQUEST;
                return Ok(res);
            };

            let document = Arc::new(document);
            let cookies: RequestCookies = CookieStore::new(document.clone()).with_config(config);
            req.extensions_mut().insert(cookies);

            let mut res = inner.call(req).await?;

            for set_cookie in document.take_set_cookies() {
                match HeaderValue::from_str(&set_cookie) {
                    Ok(value) => {
                        res.headers_mut().append(header::SET_COOKIE, value);
                    }
                    Err(err) => {
                        tracing::warn!(err = %err, "dropping invalid set-cookie value");
                    }
                }
            }

            Ok(res)
        })
    }
}
