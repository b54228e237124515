//! Merchant back-office endpoints (`/merchant` plus merchant views of `/goods`).

use crate::{ApiClient, ApiRejection, ApiRequest, Envelope};
use chrono::NaiveDate;
use serde::Serialize;

const REPORT_DATE_FORMAT: &str = "%Y-%m-%d";

/// Endpoints used by the merchant pages.
pub struct MerchantApi<'a> {
    client: &'a ApiClient,
}

impl<'a> MerchantApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Orders containing the merchant's products, optionally by status.
    pub async fn orders(&self, status: Option<&str>) -> Result<Envelope, ApiRejection> {
        self.client
            .execute(ApiRequest::get("/merchant/orders").query_opt("status", status))
            .await
    }

    pub async fn ship_order(&self, order_id: i64) -> Result<Envelope, ApiRejection> {
        self.client
            .post(format!("/merchant/orders/{}/ship", order_id))
            .await
    }

    /// Sales between two dates, inclusive.
    pub async fn sales_report(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Envelope, ApiRejection> {
        let request = ApiRequest::get("/merchant/sales/report")
            .query("startDate", start.format(REPORT_DATE_FORMAT))
            .query("endDate", end.format(REPORT_DATE_FORMAT));
        self.client.execute(request).await
    }

    pub async fn best_sellers(&self) -> Result<Envelope, ApiRejection> {
        self.client.get("/merchant/sales/best-sellers").await
    }

    pub async fn stats(&self) -> Result<Envelope, ApiRejection> {
        self.client.get("/merchant/stats").await
    }

    pub async fn goods(&self) -> Result<Envelope, ApiRejection> {
        self.client.goods().my_goods().await
    }

    pub async fn add_goods<T: Serialize + ?Sized>(&self, goods: &T) -> Result<Envelope, ApiRejection> {
        self.client.goods().create(goods).await
    }

    pub async fn update_goods<T: Serialize + ?Sized>(
        &self,
        gid: i64,
        goods: &T,
    ) -> Result<Envelope, ApiRejection> {
        self.client.goods().update(gid, goods).await
    }

    pub async fn delete_goods(&self, gid: i64) -> Result<Envelope, ApiRejection> {
        self.client.goods().delete(gid).await
    }

    pub async fn merchant_by_id(&self, merchant_id: i64) -> Result<Envelope, ApiRejection> {
        self.client.auth().merchant_by_id(merchant_id).await
    }

    pub async fn sales_ranking(&self) -> Result<Envelope, ApiRejection> {
        self.client.goods().sales_ranking().await
    }

    pub async fn sales_value_ranking(&self) -> Result<Envelope, ApiRejection> {
        self.client.goods().sales_value_ranking().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoints::testing::{client, sent};

    #[tokio::test]
    async fn test_sales_report_dates() {
        let (client, transport) = client(1);
        let start = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 3, 31).unwrap();
        client.merchant().sales_report(start, end).await.unwrap();

        let request = &transport.requests()[0];
        assert_eq!(request.path, "/merchant/sales/report");
        assert_eq!(request.query_value("startDate"), Some("2024-03-01"));
        assert_eq!(request.query_value("endDate"), Some("2024-03-31"));
    }

    #[tokio::test]
    async fn test_orders_status_is_optional() {
        let (client, transport) = client(2);
        client.merchant().orders(None).await.unwrap();
        client.merchant().orders(Some("SHIPPED")).await.unwrap();

        let requests = transport.requests();
        assert_eq!(requests[0].query_value("status"), None);
        assert_eq!(requests[1].query_value("status"), Some("SHIPPED"));
    }

    #[tokio::test]
    async fn test_aliases_hit_goods_and_auth() {
        let (client, transport) = client(4);
        let merchant = client.merchant();
        merchant.goods().await.unwrap();
        merchant.delete_goods(2).await.unwrap();
        merchant.merchant_by_id(5).await.unwrap();
        merchant.ship_order(6).await.unwrap();

        assert_eq!(
            sent(&transport),
            vec![
                ("GET".into(), "/goods/my-goods".into()),
                ("DELETE".into(), "/goods/2".into()),
                ("GET".into(), "/auth/merchant/5".into()),
                ("POST".into(), "/merchant/orders/6/ship".into()),
            ]
        );
    }
}
