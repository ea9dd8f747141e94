// HTTP implementation of the remote list and pinned-review resources.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use url::Url;

use crate::error::{Result, WatchlistError};
use crate::modules::remote::{ListApi, PinnedReviewApi};
use crate::settings::Settings;
use crate::state::{ListUpdate, RankedList, ReviewEntry};

pub struct HttpApi {
    client: Client,
    base: Url,
    token: Option<String>,
}

impl HttpApi {
    /// `token` is the bearer token issued by the auth provider, if signed in.
    pub fn new(settings: &Settings, token: Option<String>) -> Result<Self> {
        settings.validate()?;
        let mut base_str = settings.api_base_url.clone();
        // Url::join drops the last segment unless the base ends with '/'
        if !base_str.ends_with('/') {
            base_str.push('/');
        }
        let base = Url::parse(&base_str)
            .map_err(|e| WatchlistError::Validation(format!("api_base_url: {}", e)))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .build()?;

        Ok(Self { client, base, token })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let path = segments
            .iter()
            .map(|s| urlencoding::encode(s).into_owned())
            .collect::<Vec<_>>()
            .join("/");
        self.base
            .join(&path)
            .map_err(|e| WatchlistError::Validation(e.to_string()))
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = self.authorize(request).send().await?;
        let status = response.status();
        if !status.is_success() {
            log::error!("[Http] {} returned {}", response.url(), status);
            return Err(WatchlistError::Network(format!("server returned {}", status)));
        }
        Ok(response)
    }
}

#[async_trait]
impl ListApi for HttpApi {
    async fn fetch_list(&self, list_id: &str) -> Result<RankedList> {
        let url = self.endpoint(&["lists", list_id])?;
        let response = self.send(self.client.get(url)).await?;
        Ok(response.json::<RankedList>().await?)
    }

    async fn update_list(&self, list_id: &str, update: &ListUpdate) -> Result<()> {
        let url = self.endpoint(&["lists", list_id])?;
        self.send(self.client.put(url).json(update)).await?;
        Ok(())
    }
}

#[async_trait]
impl PinnedReviewApi for HttpApi {
    async fn get_pinned(&self, user_id: &str) -> Result<Vec<ReviewEntry>> {
        let url = self.endpoint(&["users", user_id, "pinned"])?;
        let response = self.send(self.client.get(url)).await?;
        Ok(response.json::<Vec<ReviewEntry>>().await?)
    }

    async fn add_pinned(&self, review_id: &str) -> Result<()> {
        let url = self.endpoint(&["reviews", review_id, "pin"])?;
        self.send(self.client.post(url)).await?;
        Ok(())
    }

    async fn remove_pinned(&self, review_id: &str) -> Result<()> {
        let url = self.endpoint(&["reviews", review_id, "pin"])?;
        self.send(self.client.delete(url)).await?;
        Ok(())
    }
}
