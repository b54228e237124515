//! Shopping cart endpoints (`/cart`).

use crate::{ApiClient, ApiRejection, Envelope};
use serde::{Deserialize, Serialize};
use serde_json::json;

/// A product and quantity, as the cart and order endpoints expect it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub gid: i64,
    pub quantity: u32,
}

impl CartItem {
    pub fn new(gid: i64, quantity: u32) -> Self {
        Self { gid, quantity }
    }
}

/// Endpoints under `/cart`.
pub struct CartApi<'a> {
    client: &'a ApiClient,
}

impl<'a> CartApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn get(&self) -> Result<Envelope, ApiRejection> {
        self.client.get("/cart").await
    }

    pub async fn add(&self, item: &CartItem) -> Result<Envelope, ApiRejection> {
        self.client.post_json("/cart/add", item).await
    }

    /// Set the quantity of a product already in the cart.
    pub async fn update(&self, gid: i64, quantity: u32) -> Result<Envelope, ApiRejection> {
        self.client
            .put_json(format!("/cart/update/{}", gid), &json!({ "quantity": quantity }))
            .await
    }

    pub async fn remove(&self, gid: i64) -> Result<Envelope, ApiRejection> {
        self.client.delete(format!("/cart/remove/{}", gid)).await
    }

    pub async fn clear(&self) -> Result<Envelope, ApiRejection> {
        self.client.delete("/cart/clear").await
    }

    /// Number of items in the cart.
    pub async fn count(&self) -> Result<Envelope, ApiRejection> {
        self.client.get("/cart/count").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoints::testing::{client, sent};
    use crate::RequestBody;

    #[tokio::test]
    async fn test_add_and_update_bodies() {
        let (client, transport) = client(2);
        client.cart().add(&CartItem::new(9, 2)).await.unwrap();
        client.cart().update(9, 5).await.unwrap();

        let requests = transport.requests();
        assert_eq!(requests[0].body, RequestBody::Json(json!({"gid": 9, "quantity": 2})));
        assert_eq!(requests[1].path, "/cart/update/9");
        assert_eq!(requests[1].body, RequestBody::Json(json!({"quantity": 5})));
    }

    #[tokio::test]
    async fn test_cart_paths() {
        let (client, transport) = client(3);
        client.cart().remove(9).await.unwrap();
        client.cart().clear().await.unwrap();
        client.cart().count().await.unwrap();
        assert_eq!(
            sent(&transport),
            vec![
                ("DELETE".into(), "/cart/remove/9".into()),
                ("DELETE".into(), "/cart/clear".into()),
                ("GET".into(), "/cart/count".into()),
            ]
        );
    }
}
