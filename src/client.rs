//! The request executor
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{Error, Result};
use crate::loading::Loading;
use crate::processor::{Json, Processor, Raw};
use crate::request::{HttpRequest, Method, Request};
use crate::response::ApiResponse;
use crate::token::{EnvToken, TokenProvider, bearer};

/// Environment variable holding the base URL, read by `ApiClient::new` with the `dotenvy` feature
pub const BASE_URL_VAR: &str = "API_BASE_URL";

/// Typed JSON request executor.
///
/// Every call prepends the configured base URL to the endpoint, sends JSON with a
/// bearer token from the [`TokenProvider`], and reports the outcome as an
/// [`ApiResponse`]. None of the request methods fail or panic; errors end up in
/// the envelope's `error` field.
///
/// When the `reqwest` feature is enabled, this uses `reqwest::Client` as the default HTTP client.
/// When the `hyper` feature is enabled, this uses `HyperClient` as the default HTTP client.
/// Otherwise, you must provide your own HTTP client that implements [`Request`].
#[cfg(feature = "reqwest")]
#[derive(Clone)]
pub struct ApiClient<Client: Request = reqwest::Client> {
    client: Client,
    base_url: String,
    tokens: Arc<dyn TokenProvider>,
    loading: Loading,
}

/// Typed JSON request executor.
///
/// Every call prepends the configured base URL to the endpoint, sends JSON with a
/// bearer token from the [`TokenProvider`], and reports the outcome as an
/// [`ApiResponse`]. None of the request methods fail or panic; errors end up in
/// the envelope's `error` field.
///
/// When the `reqwest` feature is enabled, this uses `reqwest::Client` as the default HTTP client.
/// When the `hyper` feature is enabled, this uses `HyperClient` as the default HTTP client.
/// Otherwise, you must provide your own HTTP client that implements [`Request`].
#[cfg(all(feature = "hyper", not(feature = "reqwest")))]
#[derive(Clone)]
pub struct ApiClient<Client: Request = crate::request::HyperClient> {
    client: Client,
    base_url: String,
    tokens: Arc<dyn TokenProvider>,
    loading: Loading,
}

/// Typed JSON request executor.
///
/// Every call prepends the configured base URL to the endpoint, sends JSON with a
/// bearer token from the [`TokenProvider`], and reports the outcome as an
/// [`ApiResponse`]. None of the request methods fail or panic; errors end up in
/// the envelope's `error` field.
///
/// No HTTP client feature is enabled, so you must provide your own HTTP client that
/// implements [`Request`].
#[cfg(not(any(feature = "reqwest", feature = "hyper")))]
#[derive(Clone)]
pub struct ApiClient<Client: Request> {
    client: Client,
    base_url: String,
    tokens: Arc<dyn TokenProvider>,
    loading: Loading,
}

// Implementation for any Client that implements Request
impl<Client: Request> ApiClient<Client> {
    /// Create a new client using the default HTTP client.
    ///
    /// This method is only available when the `dotenvy` feature is enabled.
    /// It loads the base URL from the `API_BASE_URL` environment variable using dotenvy.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is missing.
    #[cfg(feature = "dotenvy")]
    pub fn new() -> Result<Self> {
        dotenvy::dotenv().ok(); // Try to load .env file, ignore errors

        let base_url = std::env::var(BASE_URL_VAR).map_err(|_| Error::MissingBaseUrl)?;

        Ok(Self::from_client(Client::new()).with_base_url(base_url))
    }

    #[cfg(not(feature = "dotenvy"))]
    /// Create a new client with the default HTTP client.
    ///
    /// You must manually set the base URL using [`with_base_url`](Self::with_base_url).
    pub fn new() -> Self {
        Self::from_client(Client::new())
    }

    /// Create a client around an existing HTTP client, with an empty base URL
    /// and tokens read from the `API_TOKEN` environment variable.
    pub fn from_client(client: Client) -> Self {
        Self {
            client,
            base_url: String::new(),
            tokens: Arc::new(EnvToken::default()),
            loading: Loading::new(),
        }
    }

    /// Sets the HTTP client for this instance.
    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    /// Set the base URL every endpoint is appended to.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use jsonfetch::ApiClient;
    ///
    /// let client = ApiClient::default().with_base_url("https://api.example.com");
    /// ```
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set where bearer tokens come from.
    pub fn with_token_provider(mut self, tokens: impl TokenProvider + 'static) -> Self {
        self.tokens = Arc::new(tokens);
        self
    }

    /// Get the base URL for this instance.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get a reference to the underlying HTTP client.
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// The loading flag shared by every call on this instance (and its clones).
    pub fn loading(&self) -> &Loading {
        &self.loading
    }

    /// Perform one request and decode the JSON response into `T`.
    ///
    /// `body`, when given, is sent as JSON text whatever the verb. Pass
    /// `None::<&()>` for no body.
    ///
    /// The loading flag is raised and the request is built as soon as this is
    /// called; the transport only runs once the returned future is awaited.
    pub fn request<T, B>(&self, endpoint: &str, method: Method, body: Option<&B>) -> impl Future<Output = ApiResponse<T>> + use<'_, T, B, Client>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let call = self.execute(endpoint, method, body, Json::<T>::new());
        async move { call.await.into() }
    }

    /// Like [`request`](Self::request), but return the success body as unparsed text.
    pub fn request_text<B>(&self, endpoint: &str, method: Method, body: Option<&B>) -> impl Future<Output = ApiResponse<String>> + use<'_, B, Client>
    where
        B: Serialize + ?Sized,
    {
        let call = self.execute(endpoint, method, body, Raw);
        async move { call.await.into() }
    }

    /// `GET endpoint`
    pub fn get<T: DeserializeOwned>(&self, endpoint: &str) -> impl Future<Output = ApiResponse<T>> + use<'_, T, Client> {
        self.request::<T, ()>(endpoint, Method::Get, None)
    }

    /// `POST endpoint` with a JSON body
    pub fn post<T, B>(&self, endpoint: &str, body: &B) -> impl Future<Output = ApiResponse<T>> + use<'_, T, B, Client>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(endpoint, Method::Post, Some(body))
    }

    /// `PUT endpoint` with a JSON body
    pub fn put<T, B>(&self, endpoint: &str, body: &B) -> impl Future<Output = ApiResponse<T>> + use<'_, T, B, Client>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(endpoint, Method::Put, Some(body))
    }

    /// `PATCH endpoint` with a JSON body
    pub fn patch<T, B>(&self, endpoint: &str, body: &B) -> impl Future<Output = ApiResponse<T>> + use<'_, T, B, Client>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(endpoint, Method::Patch, Some(body))
    }

    /// `DELETE endpoint`
    pub fn delete<T: DeserializeOwned>(&self, endpoint: &str) -> impl Future<Output = ApiResponse<T>> + use<'_, T, Client> {
        self.request::<T, ()>(endpoint, Method::Delete, None)
    }

    fn execute<P, B>(&self, endpoint: &str, method: Method, body: Option<&B>, processor: P) -> impl Future<Output = Result<P::Output>> + use<'_, P, B, Client>
    where
        P: Processor,
        B: Serialize + ?Sized,
    {
        // raised before the first poll; the guard moves into the future so a drop clears it
        let in_flight = self.loading.begin();

        let url = format!("{}{}", self.base_url, endpoint);
        let request = self.build(url.clone(), method, body);

        async move {
            let _in_flight = in_flight;

            let result = match request {
                Ok(request) => {
                    tracing::debug!(%method, %url, has_body = request.body.is_some(), "sending request");
                    let response = self.client.send(request).await;
                    processor.process(response)
                }
                Err(e) => Err(e),
            };

            match &result {
                Ok(_) => tracing::debug!(%method, %url, "request succeeded"),
                Err(e) => tracing::warn!(%method, %url, error = %e, "request failed"),
            }
            result
        }
    }

    fn build<B>(&self, url: String, method: Method, body: Option<&B>) -> Result<HttpRequest>
    where
        B: Serialize + ?Sized,
    {
        let token = self.tokens.token();
        let body = body
            .map(|value| serde_json::to_string(value).map_err(Error::Encode))
            .transpose()?;

        Ok(HttpRequest {
            method,
            url,
            headers: vec![
                ("Content-Type".to_string(), "application/json".to_string()),
                ("Authorization".to_string(), bearer(token.as_deref())),
            ],
            body,
        })
    }
}

impl<Client: Request + fmt::Debug> fmt::Debug for ApiClient<Client> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("client", &self.client)
            .field("base_url", &self.base_url)
            .field("loading", &self.loading.get())
            .finish_non_exhaustive()
    }
}

// Default implementation for reqwest
#[cfg(feature = "reqwest")]
impl Default for ApiClient<reqwest::Client> {
    fn default() -> Self {
        Self::from_client(reqwest::Client::new())
    }
}

// Default implementation for hyper
#[cfg(all(feature = "hyper", not(feature = "reqwest")))]
impl Default for ApiClient<crate::request::HyperClient> {
    fn default() -> Self {
        Self::from_client(<crate::request::HyperClient as Request>::new())
    }
}

// Default implementation when no HTTP client feature is enabled
#[cfg(not(any(feature = "reqwest", feature = "hyper")))]
impl<Client: Request> Default for ApiClient<Client> {
    /// Create a default client with an empty base URL.
    ///
    /// You must call [`with_base_url`](Self::with_base_url) before making requests.
    fn default() -> Self {
        Self::from_client(Client::new())
    }
}
