use std::error::Error;

use chat_core::config::{Config, ProxyAuth};
use chat_core::error::GENERIC_SERVER_ERROR;
use chat_core::ErrorBody;
use log::{debug, error, warn};
use reqwest::{Client, IntoUrl, Method, Proxy, RequestBuilder, Response};
use serde::Serialize;

/// Header carrying the admin API key.
pub const ADMIN_KEY_HEADER: &str = "X-Admin-API-Key";

fn apply_proxy_auth(proxy: Proxy, auth: Option<&ProxyAuth>) -> Proxy {
    let Some(auth) = auth else {
        return proxy;
    };
    if auth.username.is_empty() {
        return proxy;
    }
    proxy.basic_auth(&auth.username, &auth.password)
}

/// Builds the shared HTTP client, honouring the configured proxies.
pub fn build_http_client(config: &Config) -> reqwest::Result<Client> {
    let mut builder = Client::builder();
    if !config.http_proxy.is_empty() {
        let proxy = Proxy::http(&config.http_proxy)?;
        builder = builder.proxy(apply_proxy_auth(proxy, config.http_proxy_auth.as_ref()));
    }
    if !config.https_proxy.is_empty() {
        let proxy = Proxy::https(&config.https_proxy)?;
        builder = builder.proxy(apply_proxy_auth(proxy, config.https_proxy_auth.as_ref()));
    }
    builder.build()
}

/// Executes a JSON request, optionally authenticated with the admin key.
pub async fn execute_request<T: Serialize + ?Sized>(
    client: &Client,
    method: Method,
    url: impl IntoUrl,
    admin_key: Option<&str>,
    json_body: Option<&T>,
) -> Result<Response, String> {
    let mut request_builder = client.request(method, url);

    if let Some(key) = admin_key {
        request_builder = request_builder.header(ADMIN_KEY_HEADER, key);
    }
    if let Some(body) = json_body {
        request_builder = request_builder.json(body);
    }

    send_request(request_builder).await
}

/// Sends a prepared request. Failures to get any response back are turned
/// into a printable message; HTTP error statuses are left to the caller.
pub async fn send_request(request_builder: RequestBuilder) -> Result<Response, String> {
    let (method, url) = match request_builder.try_clone().map(|b| b.build()) {
        Some(Ok(req)) => (req.method().to_string(), req.url().to_string()),
        Some(Err(e)) => {
            warn!("Could not build request for logging: {}", e);
            (String::from("?"), String::from("?"))
        }
        // Streaming bodies (multipart uploads) cannot be cloned.
        None => (String::from("?"), String::from("<streaming request>")),
    };
    debug!("Sending {} request to {}", method, url);

    let start_time = std::time::Instant::now();

    match request_builder.send().await {
        Ok(resp) => {
            debug!(
                "Got response from {} after {:?} with status {}",
                url,
                start_time.elapsed(),
                resp.status()
            );
            debug!("Response headers: {:?}", resp.headers());
            Ok(resp)
        }
        Err(e) => {
            let error_msg = format!("Failed HTTP request to {}: {}", url, e);
            error!("{}", error_msg);
            if let Some(source) = e.source() {
                error!("Error source: {:?}", source);
            }
            if e.is_timeout() {
                error!("Request timed out");
            }
            if e.is_connect() {
                error!("Connection error");
            }
            Err(error_msg)
        }
    }
}

/// Reads the `detail` of an error response, falling back to `fallback`.
pub async fn read_error_detail(response: Response, fallback: &str) -> String {
    match response.text().await {
        Ok(body) => error_detail_from_body(&body).unwrap_or_else(|| fallback.to_string()),
        Err(e) => {
            warn!("Could not read error body: {}", e);
            fallback.to_string()
        }
    }
}

pub fn error_detail_from_body(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|parsed| parsed.detail_text())
}

pub fn generic_server_error() -> String {
    GENERIC_SERVER_ERROR.to_string()
}
