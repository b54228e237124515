//! File upload endpoints (`/upload`).

use crate::{ApiClient, ApiRejection, ApiRequest, Envelope, FilePart};

/// Endpoints under `/upload`. Uploads use the longer upload timeout.
pub struct UploadApi<'a> {
    client: &'a ApiClient,
}

impl<'a> UploadApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn avatar(&self, file: FilePart) -> Result<Envelope, ApiRejection> {
        self.send("/upload/avatar", file).await
    }

    pub async fn product_image(&self, file: FilePart) -> Result<Envelope, ApiRejection> {
        self.send("/upload/product", file).await
    }

    async fn send(&self, path: &str, file: FilePart) -> Result<Envelope, ApiRejection> {
        let request = ApiRequest::post(path)
            .multipart(file)
            .timeout(self.client.config().upload_timeout());
        self.client.execute(request).await
    }
}
