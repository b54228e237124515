//! Session-aware REST client for the storefront backend.
//!
//! Every call goes through the same pipeline:
//!
//! 1. GET requests are stamped with `_t=<epoch ms>` so no cache answers them
//! 2. 2xx bodies are normalized into the `{success, data, message}` envelope
//! 3. failures are classified into an [`ApiRejection`]; failures that end
//!    the session clear the user cache and redirect to login first
//!
//! # Example
//!
//! ```rust,ignore
//! use shop_api::prelude::*;
//!
//! let client = ApiClient::with_reqwest(ApiConfig::default(), cache, navigator, None)?;
//!
//! let envelope = client.goods().search_by_name("tea").await?;
//! let goods: Vec<Goods> = envelope.data_as()?;
//!
//! match client.cart().get().await {
//!     Ok(envelope) => show(handle_response(&envelope)?),
//!     // The client is already on its way to /login
//!     Err(rejection) if rejection.redirecting => {}
//!     Err(rejection) => toast(&rejection.message),
//! }
//! ```

mod client;
mod config;
mod cookies;
pub mod endpoints;
mod envelope;
mod error;
pub mod interceptor;
mod request;
mod response;
mod transport;

pub use client::{ApiClient, REASON_SESSION_EXPIRED};
pub use config::{load_config, parse_config, ApiConfig, BASE_URL_ENV};
pub use cookies::{StoredCookies, COOKIES_KEY};
pub use endpoints::{
    user_from_login, AuthApi, CartApi, CartItem, EmailCredentials, GoodsApi, MerchantApi,
    NameCredentials, OrdersApi, UploadApi,
};
pub use envelope::{handle_response, Envelope, MSG_REQUEST_SUCCEEDED};
pub use error::{
    ApiRejection, ConfigError, RejectionKind, TransportError, MSG_FORBIDDEN, MSG_NETWORK_ERROR,
    MSG_NOT_FOUND, MSG_REQUEST_FAILED, MSG_SERVER_ERROR, MSG_SESSION_EXPIRED,
};
pub use request::{ApiRequest, FilePart, Method, RequestBody};
pub use response::RawResponse;
pub use transport::{ReqwestTransport, ScriptedTransport, Transport};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{
        handle_response, user_from_login, ApiClient, ApiConfig, ApiRejection, ApiRequest,
        CartItem, Envelope, FilePart, Method, RejectionKind, Transport,
    };
}
