//! HTTP client shared by the release source, the status lookup and the
//! publisher.

use anyhow::{Context, Result};
use log::debug;
use reqwest::{
    Client, StatusCode,
    header::{ACCEPT, AUTHORIZATION, HeaderValue},
    multipart::Form,
};
use serde::de::DeserializeOwned;
use std::io::Write;

use super::status::status_error;

/// Thin wrapper over `reqwest::Client` mapping error statuses to
/// [`HttpError`](super::HttpError).
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Creates a new HTTP client wrapping the given reqwest Client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Performs a GET request and deserializes the JSON response.
    ///
    /// A 404 or a JSON `null` body yields `Ok(None)`.
    #[tracing::instrument(skip(self))]
    pub async fn get_optional_json<T: DeserializeOwned>(&self, url: &str) -> Result<Option<T>> {
        debug!("GET JSON from {}...", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("Failed to send request")?;

        if response.status() == StatusCode::NOT_FOUND {
            debug!("{} returned 404", url);
            return Ok(None);
        }

        let response = response.error_for_status().map_err(status_error)?;

        let result = response
            .json::<Option<T>>()
            .await
            .context("Failed to parse JSON response")?;

        Ok(result)
    }

    /// Downloads a binary payload, streaming it into the writer returned by
    /// `create_writer`. Returns the number of bytes written.
    ///
    /// The writer is only created once the server answered successfully.
    #[tracing::instrument(skip(self, create_writer))]
    pub async fn download_file<W, F>(&self, url: &str, create_writer: F) -> Result<u64>
    where
        W: Write,
        F: FnOnce() -> Result<W>,
    {
        debug!("Downloading file from {}...", url);

        let response = self
            .client
            .get(url)
            .header(ACCEPT, "application/octet-stream")
            .send()
            .await
            .context("Failed to start download request")?;

        let mut response = response.error_for_status().map_err(status_error)?;

        let mut writer = create_writer()?;
        let mut downloaded_bytes: u64 = 0;

        while let Some(chunk) = response
            .chunk()
            .await
            .context("Failed to read chunk from download stream")?
        {
            writer
                .write_all(&chunk)
                .context("Failed to write chunk to file")?;
            downloaded_bytes += chunk.len() as u64;
        }
        writer.flush().context("Failed to flush downloaded file")?;

        debug!(
            "Downloaded {:.2} MB",
            downloaded_bytes as f64 / (1024.0 * 1024.0)
        );

        Ok(downloaded_bytes)
    }

    /// POSTs a multipart form. `authorization` is sent verbatim as the
    /// `Authorization` header.
    #[tracing::instrument(skip(self, authorization, form))]
    pub async fn post_multipart(
        &self,
        url: &str,
        authorization: Option<&str>,
        form: Form,
    ) -> Result<()> {
        debug!("POST multipart to {}...", url);

        let mut request = self.client.post(url).multipart(form);
        if let Some(secret) = authorization {
            let mut value =
                HeaderValue::from_str(secret).context("Invalid authorization header value")?;
            value.set_sensitive(true);
            request = request.header(AUTHORIZATION, value);
        }

        let response = request
            .send()
            .await
            .context("Failed to send upload request")?;

        response.error_for_status().map_err(status_error)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HttpError;
    use mockito::Matcher;

    #[tokio::test]
    async fn test_get_optional_json_success() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();

        let mock = server
            .mock("GET", "/test")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"name": "test", "value": 42}"#)
            .create_async()
            .await;

        let client = HttpClient::new(Client::new());

        #[derive(serde::Deserialize, Debug, PartialEq)]
        struct TestResponse {
            name: String,
            value: i32,
        }

        let result: Option<TestResponse> = client
            .get_optional_json(&format!("{}/test", url))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(
            result,
            Some(TestResponse {
                name: "test".to_string(),
                value: 42
            })
        );
    }

    #[tokio::test]
    async fn test_get_optional_json_not_found_is_none() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();

        let mock = server
            .mock("GET", "/test")
            .with_status(404)
            .create_async()
            .await;

        let client = HttpClient::new(Client::new());
        let result: Option<serde_json::Value> = client
            .get_optional_json(&format!("{}/test", url))
            .await
            .unwrap();

        mock.assert_async().await;
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_get_optional_json_null_is_none() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();

        let mock = server
            .mock("GET", "/test")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("null")
            .create_async()
            .await;

        let client = HttpClient::new(Client::new());
        let result: Option<serde_json::Value> = client
            .get_optional_json(&format!("{}/test", url))
            .await
            .unwrap();

        mock.assert_async().await;
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_get_optional_json_server_error() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();

        let mock = server
            .mock("GET", "/test")
            .with_status(500)
            .create_async()
            .await;

        let client = HttpClient::new(Client::new());
        let result: Result<Option<serde_json::Value>> =
            client.get_optional_json(&format!("{}/test", url)).await;

        mock.assert_async().await;
        let err = result.unwrap_err();
        assert_eq!(
            err.downcast_ref::<HttpError>(),
            Some(&HttpError::ServerError(500))
        );
    }

    #[tokio::test]
    async fn test_download_file_success() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();

        let mock = server
            .mock("GET", "/file.apk")
            .match_header("accept", "application/octet-stream")
            .with_status(200)
            .with_body("test content")
            .create_async()
            .await;

        let client = HttpClient::new(Client::new());
        let bytes = client
            .download_file(&format!("{}/file.apk", url), || Ok(std::io::sink()))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(bytes, 12); // "test content" is 12 bytes
    }

    #[tokio::test]
    async fn test_download_file_not_found_skips_writer() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();

        let mock = server
            .mock("GET", "/file.apk")
            .with_status(404)
            .create_async()
            .await;

        let client = HttpClient::new(Client::new());
        let result = client
            .download_file(&format!("{}/file.apk", url), || -> Result<std::io::Sink> {
                panic!("writer must not be created for a failed response")
            })
            .await;

        mock.assert_async().await;
        assert!(matches!(
            result.unwrap_err().downcast_ref::<HttpError>(),
            Some(HttpError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_post_multipart_sends_fields_and_secret() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();

        let mock = server
            .mock("POST", "/upload")
            .match_header("authorization", "s3cret")
            .match_body(Matcher::Regex(
                r#"name="versionCode"\r\n\r\n12\r\n"#.to_string(),
            ))
            .with_status(200)
            .create_async()
            .await;

        let client = HttpClient::new(Client::new());
        let form = Form::new().text("versionCode", "12");
        client
            .post_multipart(&format!("{}/upload", url), Some("s3cret"), form)
            .await
            .unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_post_multipart_rejected() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();

        let mock = server
            .mock("POST", "/upload")
            .with_status(401)
            .create_async()
            .await;

        let client = HttpClient::new(Client::new());
        let result = client
            .post_multipart(&format!("{}/upload", url), Some("wrong"), Form::new())
            .await;

        mock.assert_async().await;
        assert!(matches!(
            result.unwrap_err().downcast_ref::<HttpError>(),
            Some(HttpError::AuthenticationFailed(_))
        ));
    }
}
