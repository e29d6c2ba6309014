//! HTTP client implementation for the CAMB.AI API.

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use futures::StreamExt;
use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT},
    multipart, Client as ReqwestClient, Method, RequestBuilder, Response,
};
use serde::{de::DeserializeOwned, Serialize};
use tokio::io::AsyncWriteExt;

use super::error::{Error, Result};

/// Header carrying the API key.
pub const API_KEY_HEADER: &str = "x-api-key";

const USER_AGENT_VALUE: &str = "camb-sdk-rust/0.1";

/// HTTP client for the CAMB.AI API.
///
/// Headers are built for each request; nothing in the client is mutated after
/// construction, so one instance can be shared by every service.
pub struct HttpClient {
    client: ReqwestClient,
    base_url: String,
    api_key: HeaderValue,
}

/// A multipart file part.
pub struct FilePart {
    pub field: &'static str,
    pub filename: String,
    pub data: Vec<u8>,
}

impl HttpClient {
    /// Creates a new HTTP client.
    pub fn new(base_url: String, api_key: &str, timeout: Duration) -> Result<Self> {
        let client = ReqwestClient::builder().timeout(timeout).build()?;

        let mut api_key = HeaderValue::from_str(api_key)
            .map_err(|_| Error::Config("api_key contains invalid header characters".to_string()))?;
        api_key.set_sensitive(true);

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    /// Returns the base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Sends a GET request and decodes the JSON response.
    pub async fn get_json<R>(&self, path: &str) -> Result<R>
    where
        R: DeserializeOwned,
    {
        let response = self.builder(Method::GET, path).send().await?;
        decode_json(check_status(response).await?).await
    }

    /// Sends a POST request with a JSON body and decodes the JSON response.
    pub async fn post_json<T, R>(&self, path: &str, body: &T) -> Result<R>
    where
        T: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let response = self.builder(Method::POST, path).json(body).send().await?;
        decode_json(check_status(response).await?).await
    }

    /// Sends a multipart POST with one file part and scalar text fields.
    pub async fn post_multipart<R>(
        &self,
        path: &str,
        file: FilePart,
        fields: Vec<(&'static str, String)>,
    ) -> Result<R>
    where
        R: DeserializeOwned,
    {
        let mut form = multipart::Form::new().part(
            file.field,
            multipart::Part::bytes(file.data).file_name(file.filename),
        );
        for (key, value) in fields {
            form = form.text(key, value);
        }

        let response = self
            .builder(Method::POST, path)
            .multipart(form)
            .send()
            .await?;
        decode_json(check_status(response).await?).await
    }

    /// Streams a binary response body into `dest`, one write per chunk.
    ///
    /// The body is written to `<dest>.part` and renamed into place once the
    /// stream ends, so `dest` only ever holds a complete download. Returns the
    /// number of bytes written.
    pub async fn download(&self, path: &str, dest: &Path) -> Result<u64> {
        let response = self
            .builder(Method::GET, path)
            .header(ACCEPT, HeaderValue::from_static("application/octet-stream"))
            .send()
            .await?;
        let response = check_status(response).await?;

        let partial = partial_path(dest);
        let result = match write_body(response, &partial).await {
            Ok(written) => tokio::fs::rename(&partial, dest)
                .await
                .map(|_| written)
                .map_err(Error::from),
            Err(e) => Err(e),
        };

        if result.is_err() {
            match tokio::fs::remove_file(&partial).await {
                Ok(()) => tracing::debug!(path = %partial.display(), "partial download removed"),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => tracing::warn!(
                    path = %partial.display(),
                    error = %e,
                    "failed to remove partial download"
                ),
            }
        }
        result
    }

    fn builder(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%method, %url, "camb request");
        self.client.request(method, url).headers(self.default_headers())
    }

    /// Returns the headers sent with every request.
    fn default_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(API_KEY_HEADER, self.api_key.clone());
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));
        headers
    }
}

/// Turns a non-success response into [`Error::Api`].
async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = match response.bytes().await {
        Ok(body) => String::from_utf8_lossy(&body).to_string(),
        Err(e) => return Err(Error::Http(e)),
    };
    Err(Error::Api {
        http_status: status.as_u16(),
        body,
    })
}

async fn write_body(response: Response, dest: &Path) -> Result<u64> {
    let mut file = tokio::fs::File::create(dest).await?;
    let mut written: u64 = 0;
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        file.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }
    file.flush().await?;
    Ok(written)
}

fn partial_path(dest: &Path) -> PathBuf {
    let mut name = dest.as_os_str().to_owned();
    name.push(".part");
    PathBuf::from(name)
}

async fn decode_json<R>(response: Response) -> Result<R>
where
    R: DeserializeOwned,
{
    let body = response.bytes().await?;
    serde_json::from_slice(&body).map_err(Error::from)
}
