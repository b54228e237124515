//! Order endpoints (`/orders`).

use super::CartItem;
use crate::{ApiClient, ApiRejection, ApiRequest, Envelope};

/// Endpoints under `/orders`.
pub struct OrdersApi<'a> {
    client: &'a ApiClient,
}

impl<'a> OrdersApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Place an order for the given items.
    pub async fn create(&self, items: &[CartItem]) -> Result<Envelope, ApiRejection> {
        self.client.post_json("/orders/create", items).await
    }

    pub async fn pay(&self, order_id: i64) -> Result<Envelope, ApiRejection> {
        self.client.post(format!("/orders/{}/pay", order_id)).await
    }

    /// Orders of the signed-in user.
    pub async fn mine(&self) -> Result<Envelope, ApiRejection> {
        self.client.get("/orders/my-orders").await
    }

    pub async fn all(&self) -> Result<Envelope, ApiRejection> {
        self.client.get("/orders/all").await
    }

    pub async fn details(&self, order_id: i64) -> Result<Envelope, ApiRejection> {
        self.client
            .get(format!("/orders/{}/details", order_id))
            .await
    }

    pub async fn cancel(&self, order_id: i64) -> Result<Envelope, ApiRejection> {
        self.client.post(format!("/orders/{}/cancel", order_id)).await
    }

    pub async fn ship(&self, order_id: i64) -> Result<Envelope, ApiRejection> {
        self.client.post(format!("/orders/{}/ship", order_id)).await
    }

    pub async fn complete(&self, order_id: i64) -> Result<Envelope, ApiRejection> {
        self.client
            .post(format!("/orders/{}/complete", order_id))
            .await
    }

    pub async fn by_status(&self, status: &str) -> Result<Envelope, ApiRejection> {
        self.client
            .execute(ApiRequest::get("/orders").query("status", status))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoints::testing::{client, sent};
    use crate::RequestBody;
    use serde_json::json;

    #[tokio::test]
    async fn test_create_sends_item_list() {
        let (client, transport) = client(1);
        client
            .orders()
            .create(&[CartItem::new(1, 2), CartItem::new(3, 1)])
            .await
            .unwrap();
        assert_eq!(
            transport.requests()[0].body,
            RequestBody::Json(json!([{"gid": 1, "quantity": 2}, {"gid": 3, "quantity": 1}]))
        );
    }

    #[tokio::test]
    async fn test_order_paths() {
        let (client, transport) = client(4);
        let orders = client.orders();
        orders.pay(8).await.unwrap();
        orders.details(8).await.unwrap();
        orders.complete(8).await.unwrap();
        orders.by_status("PAID").await.unwrap();

        assert_eq!(
            sent(&transport),
            vec![
                ("POST".into(), "/orders/8/pay".into()),
                ("GET".into(), "/orders/8/details".into()),
                ("POST".into(), "/orders/8/complete".into()),
                ("GET".into(), "/orders".into()),
            ]
        );
        assert_eq!(transport.requests()[3].query_value("status"), Some("PAID"));
    }
}
