//! Typed endpoint groups mirroring the backend controllers.
//!
//! Each group borrows the client and returns the raw [`Envelope`] of the
//! call; unwrap it with [`handle_response`](crate::handle_response).
//!
//! [`Envelope`]: crate::Envelope

pub mod auth;
pub mod cart;
pub mod goods;
pub mod merchant;
pub mod orders;
pub mod upload;

pub use auth::{user_from_login, AuthApi, EmailCredentials, NameCredentials};
pub use cart::{CartApi, CartItem};
pub use goods::GoodsApi;
pub use merchant::MerchantApi;
pub use orders::OrdersApi;
pub use upload::UploadApi;

use crate::ApiClient;

impl ApiClient {
    /// Login, registration and account endpoints.
    pub fn auth(&self) -> AuthApi<'_> {
        AuthApi::new(self)
    }

    /// Catalog endpoints.
    pub fn goods(&self) -> GoodsApi<'_> {
        GoodsApi::new(self)
    }

    /// Shopping cart endpoints.
    pub fn cart(&self) -> CartApi<'_> {
        CartApi::new(self)
    }

    /// Order endpoints.
    pub fn orders(&self) -> OrdersApi<'_> {
        OrdersApi::new(self)
    }

    /// Merchant back-office endpoints.
    pub fn merchant(&self) -> MerchantApi<'_> {
        MerchantApi::new(self)
    }

    /// File upload endpoints.
    pub fn upload(&self) -> UploadApi<'_> {
        UploadApi::new(self)
    }
}
