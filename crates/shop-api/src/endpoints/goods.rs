//! Catalog endpoints (`/goods`).

use crate::{ApiClient, ApiRejection, ApiRequest, Envelope};
use serde::Serialize;

/// Endpoints under `/goods`.
pub struct GoodsApi<'a> {
    client: &'a ApiClient,
}

impl<'a> GoodsApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Result<Envelope, ApiRejection> {
        self.client.get("/goods").await
    }

    pub async fn by_id(&self, gid: i64) -> Result<Envelope, ApiRejection> {
        self.client.get(format!("/goods/{}", gid)).await
    }

    /// The merchant selling a product.
    pub async fn merchant_of(&self, gid: i64) -> Result<Envelope, ApiRejection> {
        self.client.get(format!("/goods/{}/merchant", gid)).await
    }

    pub async fn search_by_name(&self, name: &str) -> Result<Envelope, ApiRejection> {
        self.client
            .execute(ApiRequest::get("/goods/search/name").query("name", name))
            .await
    }

    pub async fn search_by_price(
        &self,
        min_price: f64,
        max_price: f64,
    ) -> Result<Envelope, ApiRejection> {
        self.client
            .execute(
                ApiRequest::get("/goods/search/price")
                    .query("minPrice", min_price)
                    .query("maxPrice", max_price),
            )
            .await
    }

    /// Products currently on sale.
    pub async fn available(&self) -> Result<Envelope, ApiRejection> {
        self.client.get("/goods/available").await
    }

    pub async fn create<T: Serialize + ?Sized>(&self, goods: &T) -> Result<Envelope, ApiRejection> {
        self.client.post_json("/goods", goods).await
    }

    pub async fn update<T: Serialize + ?Sized>(
        &self,
        gid: i64,
        goods: &T,
    ) -> Result<Envelope, ApiRejection> {
        self.client.put_json(format!("/goods/{}", gid), goods).await
    }

    pub async fn delete(&self, gid: i64) -> Result<Envelope, ApiRejection> {
        self.client.delete(format!("/goods/{}", gid)).await
    }

    /// Products of the signed-in merchant.
    pub async fn my_goods(&self) -> Result<Envelope, ApiRejection> {
        self.client.get("/goods/my-goods").await
    }

    pub async fn search_my_goods(&self, name: &str) -> Result<Envelope, ApiRejection> {
        self.client
            .execute(ApiRequest::get("/goods/my-goods/search").query("name", name))
            .await
    }

    pub async fn my_goods_stats(&self) -> Result<Envelope, ApiRejection> {
        self.client.get("/goods/my-goods/stats").await
    }

    pub async fn by_merchant(&self, merchant_id: i64) -> Result<Envelope, ApiRejection> {
        self.client
            .get(format!("/goods/merchant/{}", merchant_id))
            .await
    }

    pub async fn deactivate(&self, gid: i64) -> Result<Envelope, ApiRejection> {
        self.client.post(format!("/goods/{}/deactivate", gid)).await
    }

    pub async fn activate(&self, gid: i64) -> Result<Envelope, ApiRejection> {
        self.client.post(format!("/goods/{}/activate", gid)).await
    }

    /// Take several products off sale at once.
    pub async fn batch_deactivate(&self, gids: &[i64]) -> Result<Envelope, ApiRejection> {
        self.client.post_json("/goods/batch-deactivate", gids).await
    }

    /// The merchant's products ranked by units sold.
    pub async fn sales_ranking(&self) -> Result<Envelope, ApiRejection> {
        self.client.get("/goods/my-goods/sales-ranking").await
    }

    /// The merchant's products ranked by revenue.
    pub async fn sales_value_ranking(&self) -> Result<Envelope, ApiRejection> {
        self.client.get("/goods/my-goods/sales-value-ranking").await
    }
}
