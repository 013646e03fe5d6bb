//! Admin console client.
//!
//! Every call is gated on a key that passed the `connect` probe. A 401 on any
//! call drops the key so the caller has to authenticate again.

use std::path::{Path, PathBuf};

use chat_core::admin::{
    filename_from_disposition, ChangePasswordRequest, ConversationLog, CsvExport,
    MessageResponse, StatsRange, UsageStats,
};
use chat_core::config::normalize_base_url;
use chat_core::Config;
use log::{info, warn};
use reqwest::multipart::{Form, Part};
use reqwest::{header, Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;

use crate::error::{AdminError, Result};
use crate::utils::http_utils::{
    build_http_client, read_error_detail, send_request, ADMIN_KEY_HEADER,
};

const CONNECT_FAILED: &str = "No se pudo conectar al servidor.";
const REQUEST_FAILED: &str = "Error de red";
const CSV_FAILED: &str = "Error al generar el reporte desde el servidor.";

#[derive(Debug, Clone)]
pub struct AdminClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl AdminClient {
    pub fn new(config: &Config) -> Result<Self> {
        let client = build_http_client(config)
            .map_err(|e| AdminError::Transport(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self::with_client(client, &config.admin_base))
    }

    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: normalize_base_url(base_url),
            api_key: None,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn disconnect(&mut self) {
        self.api_key = None;
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    fn key(&self) -> Result<&str> {
        self.api_key.as_deref().ok_or(AdminError::NotConnected)
    }

    fn authed(&self, method: Method, endpoint: &str) -> Result<RequestBuilder> {
        let key = self.key()?;
        Ok(self
            .client
            .request(method, self.url(endpoint))
            .header(ADMIN_KEY_HEADER, key))
    }

    /// Probes `/admin/stats` with `api_key`; on success the key is kept for
    /// the following calls.
    pub async fn connect(&mut self, api_key: &str) -> Result<UsageStats> {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(AdminError::Validation(
                "Por favor, ingresa una clave de API.".to_string(),
            ));
        }

        let request = self
            .client
            .get(self.url("/admin/stats"))
            .header(ADMIN_KEY_HEADER, api_key);
        let response = send_request(request).await.map_err(AdminError::Transport)?;

        match response.status() {
            StatusCode::UNAUTHORIZED => {
                warn!("Admin key rejected");
                Err(AdminError::Auth)
            }
            status if !status.is_success() => Err(AdminError::Server {
                status: status.as_u16(),
                detail: CONNECT_FAILED.to_string(),
            }),
            _ => {
                let stats = parse_json::<UsageStats>(response).await?;
                self.api_key = Some(api_key.to_string());
                info!("Connected to admin API at {}", self.base_url);
                Ok(stats)
            }
        }
    }

    pub async fn stats(&mut self, range: &StatsRange) -> Result<UsageStats> {
        let request = self
            .authed(Method::GET, "/admin/stats")?
            .query(&range.query_pairs());
        self.send_json(request).await
    }

    /// Latest conversation logs, newest first.
    pub async fn conversations(&mut self) -> Result<Vec<ConversationLog>> {
        let request = self.authed(Method::GET, "/admin/conversations")?;
        self.send_json(request).await
    }

    pub async fn clear_logs(&mut self) -> Result<MessageResponse> {
        let request = self.authed(Method::DELETE, "/admin/clear-logs")?;
        self.send_json(request).await
    }

    /// Rotates the admin key. The old key stops working, so the client is
    /// disconnected afterwards.
    pub async fn change_password(&mut self, new_password: &str) -> Result<MessageResponse> {
        if new_password.is_empty() {
            return Err(AdminError::Validation(
                "La nueva contraseña no puede estar vacía.".to_string(),
            ));
        }
        let request = self
            .authed(Method::POST, "/admin/change-password")?
            .json(&ChangePasswordRequest {
                new_password: new_password.to_string(),
            });
        let response: MessageResponse = self.send_json(request).await?;
        self.disconnect();
        Ok(response)
    }

    /// Uploads knowledge documents and asks the server to rebuild its index.
    pub async fn upload_and_regenerate(&mut self, files: &[PathBuf]) -> Result<MessageResponse> {
        if files.is_empty() {
            return Err(AdminError::Validation(
                "Por favor, selecciona al menos un archivo.".to_string(),
            ));
        }
        // Check the key before reading possibly large files.
        self.key()?;

        let mut form = Form::new();
        for path in files {
            form = form.part("files", file_part(path).await?);
        }
        info!(
            "Uploading {} file(s) to {}",
            files.len(),
            self.url("/admin/upload-and-regenerate")
        );

        let request = self
            .authed(Method::POST, "/admin/upload-and-regenerate")?
            .multipart(form);
        self.send_json(request).await
    }

    /// Downloads the CSV report along with its server-suggested filename.
    pub async fn export_csv(&mut self) -> Result<CsvExport> {
        let request = self.authed(Method::GET, "/admin/conversations/csv")?;
        let response = self.send(request).await?;
        if !response.status().is_success() {
            return Err(AdminError::Server {
                status: response.status().as_u16(),
                detail: CSV_FAILED.to_string(),
            });
        }

        let filename = filename_from_disposition(
            response
                .headers()
                .get(header::CONTENT_DISPOSITION)
                .and_then(|value| value.to_str().ok()),
        );
        let content = response
            .bytes()
            .await
            .map_err(|e| AdminError::Transport(format!("Failed to read CSV body: {e}")))?
            .to_vec();
        Ok(CsvExport { filename, content })
    }

    /// Sends and handles 401 by dropping the key.
    async fn send(&mut self, request: RequestBuilder) -> Result<Response> {
        let response = send_request(request).await.map_err(AdminError::Transport)?;
        if response.status() == StatusCode::UNAUTHORIZED {
            warn!("Admin key no longer accepted, disconnecting");
            self.disconnect();
            return Err(AdminError::Auth);
        }
        Ok(response)
    }

    async fn send_json<T: DeserializeOwned>(&mut self, request: RequestBuilder) -> Result<T> {
        let response = self.send(request).await?;
        let status = response.status();
        if !status.is_success() {
            let detail = read_error_detail(response, REQUEST_FAILED).await;
            return Err(AdminError::Server {
                status: status.as_u16(),
                detail,
            });
        }
        parse_json(response).await
    }
}

async fn parse_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let body = response
        .text()
        .await
        .map_err(|e| AdminError::Transport(format!("Failed to read response body: {e}")))?;
    serde_json::from_str(&body)
        .map_err(|e| AdminError::Protocol(format!("unexpected response body: {e}")))
}

async fn file_part(path: &Path) -> Result<Part> {
    let bytes = tokio::fs::read(path).await?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string());
    Ok(Part::bytes(bytes).file_name(file_name))
}
