use crate::error::{Result, SyncError};
use brewlog_common::api::{HealthCheckResponse, RecipeListResponse, SaveRecipeRequest};
use brewlog_common::domain::Recipe;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Response, StatusCode};
use std::time::Duration;
use tracing::debug;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const PROBE_TIMEOUT: Duration = Duration::from_secs(2);

async fn handle_response_error(res: Response) -> Result<Response> {
    let status = res.status();
    if !status.is_success() {
        return Err(SyncError::RemoteStatus(status));
    }

    Ok(res)
}

/// Consumer of the remote recipe repository. Timeouts live here; the engine
/// above sees a timeout as an ordinary remote failure.
pub struct SyncClient {
    address: String,
    client: reqwest::Client,
}

impl SyncClient {
    pub fn new(address: &str, token: Option<&str>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        if let Some(token) = token {
            let value = HeaderValue::from_str(&format!("Token {token}"))
                .map_err(|_| SyncError::Validation("session token is not a valid header value"))?;
            headers.insert(AUTHORIZATION, value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            address: address.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    /// Live round trip against the server. Any failure means unreachable.
    pub async fn check_connection(&self) -> bool {
        let url = format!("{}/", self.address);
        let res = self.client.get(url).timeout(PROBE_TIMEOUT).send().await;

        match res {
            Ok(res) if res.status().is_success() => {
                res.json::<HealthCheckResponse>().await.is_ok()
            }
            _ => false,
        }
    }

    pub async fn list(&self) -> Result<RecipeListResponse> {
        let url = format!("{}/recipes", self.address);
        let res = self.client.get(url).send().await?;
        let res = handle_response_error(res).await?;

        let res = res.json::<RecipeListResponse>().await?;
        Ok(res)
    }

    /// A missing recipe is a normal outcome for reads, not an error.
    pub async fn get(&self, id: &str) -> Result<Option<Recipe>> {
        let url = format!("{}/recipes/{}", self.address, urlencoding::encode(id));
        let res = self.client.get(url).send().await?;

        if res.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let res = handle_response_error(res).await?;
        let res = res.json::<Recipe>().await?;
        Ok(Some(res))
    }

    pub async fn create(&self, payload: &SaveRecipeRequest) -> Result<Recipe> {
        let url = format!("{}/recipes", self.address);
        let res = self.client.post(url).json(payload).send().await?;
        let res = handle_response_error(res).await?;

        let res = res.json::<Recipe>().await?;
        Ok(res)
    }

    pub async fn update(&self, id: &str, payload: &SaveRecipeRequest) -> Result<Recipe> {
        let url = format!("{}/recipes/{}", self.address, urlencoding::encode(id));
        let res = self.client.put(url).json(payload).send().await?;
        let res = handle_response_error(res).await?;

        let res = res.json::<Recipe>().await?;
        Ok(res)
    }

    /// A 404 counts as confirmed: the deletion intent is satisfied either
    /// way.
    pub async fn delete(&self, id: &str) -> Result<()> {
        let url = format!("{}/recipes/{}", self.address, urlencoding::encode(id));
        let res = self.client.delete(url).send().await?;

        if res.status() == StatusCode::NOT_FOUND {
            debug!("remote delete of {id}: already gone");
            return Ok(());
        }

        handle_response_error(res).await?;
        Ok(())
    }
}
