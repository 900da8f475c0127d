//! Authenticated request path shared by the resource clients

use std::future::Future;
use std::sync::Arc;

use log::warn;
use reqwest::{Client, Method};
use serde::{de::DeserializeOwned, Serialize};

use crate::auth::{Auth, AuthGuard};
use crate::config::ClientOptions;
use crate::error::Error;
use crate::fetch::FetchBuilder;
use crate::store::ClientState;

/// Sends requests with the session's bearer token attached.
///
/// An expired token is refreshed before the request when auto refresh is
/// on. A 401 response triggers one forced refresh and one retry.
pub struct ApiClient {
    url: String,
    http_client: Client,
    state: Arc<ClientState>,
    guard: AuthGuard<Arc<Auth>>,
    options: ClientOptions,
}

impl ApiClient {
    pub(crate) fn new(
        url: &str,
        http_client: Client,
        state: Arc<ClientState>,
        auth: Arc<Auth>,
        options: ClientOptions,
    ) -> Self {
        Self {
            url: url.trim_end_matches('/').to_string(),
            http_client,
            guard: AuthGuard::new(state.clone(), auth),
            state,
            options,
        }
    }

    pub fn guard(&self) -> &AuthGuard<Arc<Auth>> {
        &self.guard
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.url, path)
    }

    fn fetch(&self, method: Method, path: &str) -> FetchBuilder<'_> {
        FetchBuilder::new(&self.http_client, &self.endpoint(path), method)
    }

    /// Send a request and parse the JSON response
    pub async fn request<T, B>(
        &self,
        method: Method,
        path: &str,
        query: Vec<(String, String)>,
        body: Option<&B>,
    ) -> Result<T, Error>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let mut fetch = self.fetch(method, path).query(query);
        if let Some(body) = body {
            fetch = fetch.json(body)?;
        }
        self.authorized(fetch, |f| async move { f.execute::<T>().await })
            .await
    }

    /// Send a request whose response body is not needed
    pub async fn request_empty(&self, method: Method, path: &str) -> Result<(), Error> {
        let fetch = self.fetch(method, path);
        self.authorized(fetch, |f| async move { f.execute_empty().await })
            .await
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: Vec<(String, String)>,
    ) -> Result<T, Error> {
        self.request::<T, ()>(Method::GET, path, query, None).await
    }

    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<T, Error>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(Method::POST, path, Vec::new(), Some(body)).await
    }

    pub async fn put<T, B>(&self, path: &str, body: &B) -> Result<T, Error>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(Method::PUT, path, Vec::new(), Some(body)).await
    }

    pub async fn delete(&self, path: &str) -> Result<(), Error> {
        self.request_empty(Method::DELETE, path).await
    }

    async fn authorized<'a, T, F, Fut>(&self, fetch: FetchBuilder<'a>, run: F) -> Result<T, Error>
    where
        F: Fn(FetchBuilder<'a>) -> Fut,
        Fut: Future<Output = Result<T, Error>>,
    {
        if self.options.auto_refresh_token && self.state.access_token().is_some() {
            // A failed refresh leaves no token; the request then goes out
            // unauthenticated and the server decides.
            self.guard.check_and_refresh().await;
        }

        let first = run(fetch.clone().headers(&self.guard.auth_header())).await;

        match first {
            Err(e) if e.is_unauthorized() && self.should_retry() => {
                warn!("Request rejected with 401, refreshing token and retrying");
                if self.guard.force_refresh().await {
                    run(fetch.headers(&self.guard.auth_header())).await
                } else {
                    Err(e)
                }
            }
            other => other,
        }
    }

    fn should_retry(&self) -> bool {
        self.options.retry_on_unauthorized && self.state.is_authenticated()
    }
}
