//! Classification of HTTP error statuses into user-facing errors.

use reqwest::StatusCode;

/// An HTTP request that reached the server but was refused.
#[derive(Debug, Clone, PartialEq)]
pub enum HttpError {
    /// HTTP 401
    AuthenticationFailed(String),
    /// HTTP 403 without a rate limit message
    Forbidden(String),
    /// HTTP 403 mentioning the rate limit, or 429
    RateLimited(String),
    /// HTTP 404
    NotFound(String),
    /// Any other 4xx
    ClientError(u16),
    /// 5xx
    ServerError(u16),
}

impl std::fmt::Display for HttpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HttpError::AuthenticationFailed(url) => {
                write!(
                    f,
                    "Authentication failed for {}. Check your credentials.",
                    url
                )
            }
            HttpError::Forbidden(url) => write!(f, "Access forbidden: {}", url),
            HttpError::RateLimited(url) => {
                write!(f, "Rate limit exceeded for {}. Try again later.", url)
            }
            HttpError::NotFound(url) => write!(f, "Not found: {}", url),
            HttpError::ClientError(code) => write!(f, "Request error: HTTP {}", code),
            HttpError::ServerError(code) => write!(f, "Server error: HTTP {}", code),
        }
    }
}

impl std::error::Error for HttpError {}

/// Maps an error status to an [`HttpError`]. `url` is only used for messages.
pub fn classify_status(status: StatusCode, url: &str) -> HttpError {
    match status {
        StatusCode::UNAUTHORIZED => HttpError::AuthenticationFailed(url.to_string()),
        StatusCode::FORBIDDEN => HttpError::Forbidden(url.to_string()),
        StatusCode::TOO_MANY_REQUESTS => HttpError::RateLimited(url.to_string()),
        StatusCode::NOT_FOUND => HttpError::NotFound(url.to_string()),
        s if s.is_client_error() => HttpError::ClientError(s.as_u16()),
        s => HttpError::ServerError(s.as_u16()),
    }
}

/// Turns a failed `error_for_status()` into an `anyhow::Error`.
///
/// Errors carrying a status become [`HttpError`]; connection and decoding
/// errors are passed through untouched.
pub fn status_error(error: reqwest::Error) -> anyhow::Error {
    let Some(status) = error.status() else {
        return anyhow::Error::from(error);
    };

    let url = error
        .url()
        .map(|u| u.to_string())
        .unwrap_or_else(|| "<unknown>".to_string());

    let classified = match classify_status(status, &url) {
        // GitHub answers 403 with a rate limit message once anonymous quota is spent
        HttpError::Forbidden(url) if error.to_string().contains("rate limit") => {
            HttpError::RateLimited(url)
        }
        other => other,
    };

    anyhow::Error::from(classified)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_status_codes() {
        let url = "https://example.com/x";
        assert_eq!(
            classify_status(StatusCode::UNAUTHORIZED, url),
            HttpError::AuthenticationFailed(url.to_string())
        );
        assert_eq!(
            classify_status(StatusCode::FORBIDDEN, url),
            HttpError::Forbidden(url.to_string())
        );
        assert_eq!(
            classify_status(StatusCode::TOO_MANY_REQUESTS, url),
            HttpError::RateLimited(url.to_string())
        );
        assert_eq!(
            classify_status(StatusCode::NOT_FOUND, url),
            HttpError::NotFound(url.to_string())
        );
        assert_eq!(
            classify_status(StatusCode::BAD_REQUEST, url),
            HttpError::ClientError(400)
        );
        assert_eq!(
            classify_status(StatusCode::BAD_GATEWAY, url),
            HttpError::ServerError(502)
        );
    }

    #[test]
    fn test_http_error_display() {
        let err = HttpError::AuthenticationFailed("u".to_string());
        assert!(err.to_string().contains("Authentication failed"));

        let err = HttpError::ClientError(413);
        assert_eq!(err.to_string(), "Request error: HTTP 413");
    }

    #[tokio::test]
    async fn test_status_error_from_response() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/")
            .with_status(401)
            .create_async()
            .await;

        let client = reqwest::Client::new();
        let response = client.get(server.url()).send().await.unwrap();
        let err = status_error(response.error_for_status().unwrap_err());

        assert!(matches!(
            err.downcast_ref::<HttpError>(),
            Some(HttpError::AuthenticationFailed(_))
        ));
    }

    #[tokio::test]
    async fn test_status_error_server_error() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/")
            .with_status(503)
            .create_async()
            .await;

        let client = reqwest::Client::new();
        let response = client.get(server.url()).send().await.unwrap();
        let err = status_error(response.error_for_status().unwrap_err());

        assert_eq!(
            err.downcast_ref::<HttpError>(),
            Some(&HttpError::ServerError(503))
        );
    }
}
