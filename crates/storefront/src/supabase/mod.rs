//! Client for the hosted store backend (Supabase).
//!
//! # Architecture
//!
//! - GoTrue-style auth endpoints (`/auth/v1/*`) for session checks, the
//!   password grant, and logout
//! - PostgREST (`/rest/v1/*`) for the `products` and `cart_items` tables;
//!   the remote service is the source of truth, no local sync
//! - In-memory caching via `moka` for the catalog (5 minute TTL)
//!
//! Every request carries the project `apikey` header; row access is scoped
//! by the caller's bearer token (the anon key for unauthenticated reads).

pub mod types;

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use reqwest::StatusCode;
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, instrument};

use waste2worth_core::{CartLineId, ProductId, UserId};

use crate::config::SupabaseConfig;
use types::{AuthUser, CartLine, NewCartLine, Product, QuantityPatch, SignInResponse, SparseCartLine};

/// Catalog cache TTL.
const CACHE_TTL: Duration = Duration::from_secs(300);

/// Cache key for the available-products list.
const PRODUCTS_CACHE_KEY: &str = "products:available";

/// Errors that can occur when talking to the hosted backend.
#[derive(Debug, Error)]
pub enum SupabaseError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The bearer token was rejected (absent, expired, or revoked).
    #[error("Unauthorized")]
    Unauthorized,

    /// The password grant was rejected.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// The service returned an unexpected status.
    #[error("Backend returned status {0}")]
    Status(u16),
}

/// Client for the hosted backend.
///
/// Cheaply cloneable via `Arc`. The catalog read is cached for 5 minutes;
/// cart reads and all writes go straight to the service.
#[derive(Clone)]
pub struct SupabaseClient {
    inner: Arc<SupabaseClientInner>,
}

struct SupabaseClientInner {
    client: reqwest::Client,
    base_url: String,
    anon_key: String,
    catalog_cache: Cache<String, Arc<Vec<Product>>>,
}

impl SupabaseClient {
    /// Create a new backend client.
    #[must_use]
    pub fn new(config: &SupabaseConfig) -> Self {
        let catalog_cache = Cache::builder()
            .max_capacity(16)
            .time_to_live(CACHE_TTL)
            .build();

        Self {
            inner: Arc::new(SupabaseClientInner {
                client: reqwest::Client::new(),
                base_url: config.url.clone(),
                anon_key: config.anon_key.expose_secret().to_string(),
                catalog_cache,
            }),
        }
    }

    /// Attach the project headers. The bearer token scopes row access; the
    /// anon key is used when the caller has no user token (catalog reads).
    fn request(
        &self,
        method: reqwest::Method,
        url: String,
        token: Option<&str>,
    ) -> reqwest::RequestBuilder {
        let bearer = token.unwrap_or(&self.inner.anon_key);
        self.inner
            .client
            .request(method, url)
            .header("apikey", &self.inner.anon_key)
            .header("Authorization", format!("Bearer {bearer}"))
    }

    /// Send a request, mapping auth failures and non-success statuses to
    /// typed errors. Error bodies are logged truncated.
    async fn send(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, SupabaseError> {
        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            return Err(SupabaseError::Unauthorized);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                status = %status,
                body = %body.chars().take(500).collect::<String>(),
                "Backend returned non-success status"
            );
            return Err(SupabaseError::Status(status.as_u16()));
        }

        Ok(response)
    }

    /// Send a request and parse the JSON body.
    async fn send_json<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, SupabaseError> {
        let response = self.send(request).await?;
        let body = response.text().await?;

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %body.chars().take(500).collect::<String>(),
                "Failed to parse backend response"
            );
            SupabaseError::Parse(e)
        })
    }

    fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{path}", self.inner.base_url)
    }

    fn rest_url(&self, path_and_query: &str) -> String {
        format!("{}/rest/v1/{path_and_query}", self.inner.base_url)
    }

    // =========================================================================
    // Auth
    // =========================================================================

    /// Validate an access token and fetch the user it belongs to.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` for a rejected token, or a transport/parse
    /// error. Callers gating pages treat every error the same way.
    #[instrument(skip(self, token))]
    pub async fn get_user(&self, token: &str) -> Result<AuthUser, SupabaseError> {
        let request = self.request(reqwest::Method::GET, self.auth_url("user"), Some(token));
        self.send_json(request).await
    }

    /// Sign in with email and password (password grant).
    ///
    /// # Errors
    ///
    /// Returns `InvalidCredentials` when the service rejects the pair.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn sign_in(
        &self,
        email: &str,
        password: &str,
    ) -> Result<SignInResponse, SupabaseError> {
        let url = self.auth_url("token?grant_type=password");
        let request = self
            .request(reqwest::Method::POST, url, None)
            .json(&serde_json::json!({ "email": email, "password": password }));

        let response = request.send().await?;
        let status = response.status();

        // GoTrue answers the password grant with 400 for bad credentials
        if status == StatusCode::BAD_REQUEST || status == StatusCode::UNAUTHORIZED {
            return Err(SupabaseError::InvalidCredentials);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                status = %status,
                body = %body.chars().take(500).collect::<String>(),
                "Sign-in returned non-success status"
            );
            return Err(SupabaseError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(SupabaseError::Parse)
    }

    /// Revoke an access token. Best effort; the session is cleared either way.
    ///
    /// # Errors
    ///
    /// Returns an error if the request could not be delivered.
    #[instrument(skip(self, token))]
    pub async fn sign_out(&self, token: &str) -> Result<(), SupabaseError> {
        let request = self.request(reqwest::Method::POST, self.auth_url("logout"), Some(token));
        self.send(request).await?;
        Ok(())
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    /// Fetch the available catalog, newest first. Cached for 5 minutes.
    ///
    /// # Errors
    ///
    /// Returns an error if the fetch fails and no cached copy exists.
    #[instrument(skip(self))]
    pub async fn available_products(&self) -> Result<Arc<Vec<Product>>, SupabaseError> {
        if let Some(products) = self.inner.catalog_cache.get(PRODUCTS_CACHE_KEY).await {
            debug!("Cache hit for catalog");
            return Ok(products);
        }

        let url = self.rest_url("products?select=*&is_available=eq.true&order=created_at.desc");
        let request = self.request(reqwest::Method::GET, url, None);
        let products: Vec<Product> = self.send_json(request).await?;
        let products = Arc::new(products);

        self.inner
            .catalog_cache
            .insert(PRODUCTS_CACHE_KEY.to_string(), Arc::clone(&products))
            .await;

        Ok(products)
    }

    // =========================================================================
    // Cart
    // =========================================================================

    /// Fetch the user's cart lines with their products embedded, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the fetch or parse fails.
    #[instrument(skip(self, token))]
    pub async fn cart_lines(
        &self,
        token: &str,
        user: &UserId,
    ) -> Result<Vec<CartLine>, SupabaseError> {
        let url = self.rest_url(&format!(
            "cart_items?select=*,products(*)&user_id=eq.{}&order=created_at.desc",
            urlencoding::encode(user.as_str())
        ));
        let request = self.request(reqwest::Method::GET, url, Some(token));
        self.send_json(request).await
    }

    /// Fetch only the quantities of the user's lines, for the badge count.
    ///
    /// # Errors
    ///
    /// Returns an error if the fetch fails.
    #[instrument(skip(self, token))]
    pub async fn cart_quantities(
        &self,
        token: &str,
        user: &UserId,
    ) -> Result<Vec<u32>, SupabaseError> {
        #[derive(serde::Deserialize)]
        struct Row {
            quantity: u32,
        }

        let url = self.rest_url(&format!(
            "cart_items?select=quantity&user_id=eq.{}",
            urlencoding::encode(user.as_str())
        ));
        let request = self.request(reqwest::Method::GET, url, Some(token));
        let rows: Vec<Row> = self.send_json(request).await?;
        Ok(rows.into_iter().map(|r| r.quantity).collect())
    }

    /// Look up an existing line for (user, product).
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup fails.
    #[instrument(skip(self, token))]
    pub async fn find_cart_line(
        &self,
        token: &str,
        user: &UserId,
        product: &ProductId,
    ) -> Result<Option<SparseCartLine>, SupabaseError> {
        let url = self.rest_url(&format!(
            "cart_items?select=id,quantity&user_id=eq.{}&product_id=eq.{}",
            urlencoding::encode(user.as_str()),
            urlencoding::encode(product.as_str())
        ));
        let request = self.request(reqwest::Method::GET, url, Some(token));
        let mut lines: Vec<SparseCartLine> = self.send_json(request).await?;
        Ok(if lines.is_empty() {
            None
        } else {
            Some(lines.swap_remove(0))
        })
    }

    /// Insert a new cart line with quantity 1.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert is rejected.
    #[instrument(skip(self, token))]
    pub async fn insert_cart_line(
        &self,
        token: &str,
        user: &UserId,
        product: &ProductId,
    ) -> Result<(), SupabaseError> {
        let request = self
            .request(reqwest::Method::POST, self.rest_url("cart_items"), Some(token))
            .header("Prefer", "return=minimal")
            .json(&NewCartLine {
                user_id: user,
                product_id: product,
                quantity: 1,
            });
        self.send(request).await?;
        Ok(())
    }

    /// Set a line's quantity. Filtered on both line id and user id, so a
    /// foreign line id matches zero rows rather than erroring.
    ///
    /// # Errors
    ///
    /// Returns an error if the update is rejected.
    #[instrument(skip(self, token))]
    pub async fn set_line_quantity(
        &self,
        token: &str,
        user: &UserId,
        line: &CartLineId,
        quantity: u32,
    ) -> Result<(), SupabaseError> {
        let url = self.rest_url(&format!(
            "cart_items?id=eq.{}&user_id=eq.{}",
            urlencoding::encode(line.as_str()),
            urlencoding::encode(user.as_str())
        ));
        let request = self
            .request(reqwest::Method::PATCH, url, Some(token))
            .header("Prefer", "return=minimal")
            .json(&QuantityPatch { quantity });
        self.send(request).await?;
        Ok(())
    }

    /// Delete one line. Idempotent: deleting a missing line matches zero rows.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete is rejected.
    #[instrument(skip(self, token))]
    pub async fn delete_cart_line(
        &self,
        token: &str,
        user: &UserId,
        line: &CartLineId,
    ) -> Result<(), SupabaseError> {
        let url = self.rest_url(&format!(
            "cart_items?id=eq.{}&user_id=eq.{}",
            urlencoding::encode(line.as_str()),
            urlencoding::encode(user.as_str())
        ));
        let request = self.request(reqwest::Method::DELETE, url, Some(token));
        self.send(request).await?;
        Ok(())
    }

    /// Delete every line belonging to the user.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete is rejected.
    #[instrument(skip(self, token))]
    pub async fn delete_all_cart_lines(
        &self,
        token: &str,
        user: &UserId,
    ) -> Result<(), SupabaseError> {
        let url = self.rest_url(&format!(
            "cart_items?user_id=eq.{}",
            urlencoding::encode(user.as_str())
        ));
        let request = self.request(reqwest::Method::DELETE, url, Some(token));
        self.send(request).await?;
        Ok(())
    }
}
