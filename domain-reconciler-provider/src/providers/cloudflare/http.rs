//! Cloudflare HTTP 请求方法

use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::Result;
use crate::http_client::HttpUtils;
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};

use super::{CloudflareProvider, CloudflareResponse};

impl CloudflareProvider {
    /// 执行请求并解包 Cloudflare 响应信封
    ///
    /// `context` is attached to mapped API errors (zone id, record name).
    async fn request<T, B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        context: ErrorContext,
    ) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = format!("{}{path}", self.api_base);
        let mut builder = self
            .client
            .request(method.clone(), &url)
            .bearer_auth(&self.api_token);
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let (status, response_text) = HttpUtils::execute_request_with_retry(
            builder,
            self.provider_name(),
            method.as_str(),
            &url,
            self.retry,
        )
        .await?;

        let cf_response: CloudflareResponse<T> =
            HttpUtils::parse_json(&response_text, self.provider_name())?;

        if !cf_response.success {
            let (code, message) = cf_response.first_error();
            log::warn!("[cloudflare] API error (HTTP {status}, code {code}): {message}");
            return Err(self.map_error(RawApiError::with_code(code, message), context));
        }

        cf_response
            .result
            .ok_or_else(|| self.parse_error("response is missing the `result` field"))
    }

    /// 执行 GET 请求
    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        context: ErrorContext,
    ) -> Result<T> {
        self.request::<T, ()>(Method::GET, path, None, context)
            .await
    }

    /// 执行 POST 请求
    pub(crate) async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
        context: ErrorContext,
    ) -> Result<T> {
        self.request(Method::POST, path, Some(body), context).await
    }

    /// 执行 DELETE 请求
    pub(crate) async fn delete<T: DeserializeOwned>(
        &self,
        path: &str,
        context: ErrorContext,
    ) -> Result<T> {
        self.request::<T, ()>(Method::DELETE, path, None, context)
            .await
    }
}
