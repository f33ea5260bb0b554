//! Veracode XML API client implementation

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client as HttpClient, Method, StatusCode, Url};
use serde::de::DeserializeOwned;

use super::auth;
use super::models::{
    AppList, Application, Build, BuildInfo, FileList, PrescanOptions, Sandbox, SandboxInfo,
    SandboxList, UploadedFile,
};
use super::xml::parse_response;
use super::VeracodeApi;
use crate::config::Credentials;
use crate::error::{ApiError, Result};

/// Default Veracode analysis center host
pub const DEFAULT_API_HOST: &str = "https://analysiscenter.veracode.com";

/// Path prefix of the XML API
const API_PATH: &str = "/api/5.0";

/// Timeout for regular calls
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Timeout for archive uploads
const UPLOAD_TIMEOUT: Duration = Duration::from_secs(600);

/// Veracode XML API client
pub struct VeracodeClient {
    http: HttpClient,
    base_url: String,
    credentials: Credentials,
}

impl VeracodeClient {
    /// Create a client against the default analysis center host
    #[cfg(test)]
    pub fn new(credentials: Credentials) -> Result<Self> {
        Self::with_host(credentials, None)
    }

    /// Create a client with an optional custom API host
    pub fn with_host(credentials: Credentials, api_host: Option<String>) -> Result<Self> {
        let http = HttpClient::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let host = api_host.unwrap_or_else(|| DEFAULT_API_HOST.to_string());
        let base_url = format!("{}{}", host.trim_end_matches('/'), API_PATH);

        Ok(Self {
            http,
            base_url,
            credentials,
        })
    }

    /// Full URL of an API call with its query parameters
    fn endpoint(&self, call: &str, params: &[(&str, &str)]) -> Result<Url> {
        let url = format!("{}/{}", self.base_url, call);
        let url = if params.is_empty() {
            Url::parse(&url)
        } else {
            Url::parse_with_params(&url, params)
        };
        url.map_err(|e| ApiError::Network(format!("Invalid API URL: {}", e)).into())
    }

    /// Make a signed API call and decode its XML response
    async fn call<T: DeserializeOwned>(
        &self,
        method: Method,
        call: &str,
        params: &[(&str, &str)],
        form: Option<Form>,
    ) -> Result<T> {
        let url = self.endpoint(call, params)?;
        let authorization = auth::authorization_header(&self.credentials, &url, &method)?;

        log::debug!("{} {}", method, url);

        let mut request = self
            .http
            .request(method, url)
            .header("Authorization", authorization);
        request = match form {
            Some(form) => request.multipart(form).timeout(UPLOAD_TIMEOUT),
            None => request.timeout(REQUEST_TIMEOUT),
        };

        let response = request.send().await.map_err(ApiError::from)?;

        let status = response.status();
        match status {
            StatusCode::OK => {
                let body = response.text().await.map_err(|e| {
                    ApiError::InvalidResponse(format!("Failed to read response: {}", e))
                })?;
                Ok(parse_response(&body)?)
            }
            StatusCode::UNAUTHORIZED => Err(ApiError::Unauthorized.into()),
            StatusCode::FORBIDDEN => Err(ApiError::Forbidden.into()),
            StatusCode::NOT_FOUND => {
                let error_msg = response
                    .text()
                    .await
                    .unwrap_or_else(|_| format!("{} not found", call));
                Err(ApiError::NotFound(error_msg).into())
            }
            status if status.is_client_error() => {
                let error_msg = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Bad request".to_string());
                Err(ApiError::BadRequest(error_msg).into())
            }
            status if status.is_server_error() => {
                let error_msg = response
                    .text()
                    .await
                    .unwrap_or_else(|_| format!("Server error: {}", status));
                Err(ApiError::ServerError(error_msg).into())
            }
            _ => {
                let error_msg = format!("Unexpected status code: {}", status);
                Err(ApiError::InvalidResponse(error_msg).into())
            }
        }
    }
}

#[async_trait]
impl VeracodeApi for VeracodeClient {
    async fn list_apps(&self) -> Result<Vec<Application>> {
        let response: AppList = self.call(Method::GET, "getapplist.do", &[], None).await?;
        Ok(response.apps)
    }

    async fn list_sandboxes(&self, app_id: &str) -> Result<Vec<Sandbox>> {
        let response: SandboxList = self
            .call(
                Method::GET,
                "getsandboxlist.do",
                &[("app_id", app_id)],
                None,
            )
            .await?;
        Ok(response.sandboxes)
    }

    async fn create_sandbox(&self, app_id: &str, sandbox_name: &str) -> Result<Sandbox> {
        let response: SandboxInfo = self
            .call(
                Method::POST,
                "createsandbox.do",
                &[("app_id", app_id), ("sandbox_name", sandbox_name)],
                None,
            )
            .await?;
        Ok(response.sandbox)
    }

    async fn create_build(&self, app_id: &str, sandbox_id: &str, version: &str) -> Result<Build> {
        let response: BuildInfo = self
            .call(
                Method::POST,
                "createbuild.do",
                &[
                    ("app_id", app_id),
                    ("sandbox_id", sandbox_id),
                    ("version", version),
                ],
                None,
            )
            .await?;
        Ok(response.build)
    }

    async fn upload_file(
        &self,
        app_id: &str,
        sandbox_id: &str,
        file: &Path,
    ) -> Result<UploadedFile> {
        let file_name = file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload.zip".to_string());
        let bytes = tokio::fs::read(file).await?;
        log::debug!("Uploading {} ({} bytes)", file.display(), bytes.len());

        let form = Form::new().part("file", Part::bytes(bytes).file_name(file_name.clone()));

        let response: FileList = self
            .call(
                Method::POST,
                "uploadfile.do",
                &[("app_id", app_id), ("sandbox_id", sandbox_id)],
                Some(form),
            )
            .await?;

        response.into_uploaded(&file_name).ok_or_else(|| {
            ApiError::InvalidResponse("Upload response listed no files".to_string()).into()
        })
    }

    async fn begin_prescan(
        &self,
        app_id: &str,
        sandbox_id: &str,
        options: &PrescanOptions,
    ) -> Result<Build> {
        let auto_scan = options.auto_scan.to_string();
        let scan_all = options.scan_all_nonfatal_top_level_modules.to_string();

        let response: BuildInfo = self
            .call(
                Method::POST,
                "beginprescan.do",
                &[
                    ("app_id", app_id),
                    ("sandbox_id", sandbox_id),
                    ("auto_scan", auto_scan.as_str()),
                    ("scan_all_nonfatal_top_level_modules", scan_all.as_str()),
                ],
                None,
            )
            .await?;
        Ok(response.build)
    }
}
