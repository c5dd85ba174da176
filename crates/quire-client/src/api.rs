//! HTTP client for the post endpoints.

use reqwest::header::LOCATION;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode, redirect};
use serde::de::DeserializeOwned;

use quire_shared::dto::{PostCreateProps, PostEditProps, PostIndexProps};
use quire_shared::{ErrorResponse, FieldErrors, PageView};

/// Client errors.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Response body could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Authentication required")]
    Unauthorized,

    #[error("Post not found")]
    NotFound,

    #[error("Unexpected status {status}")]
    UnexpectedStatus { status: u16, detail: Option<String> },

    #[error("Redirect without a location")]
    MissingLocation,

    #[error("A submission is already in progress")]
    AlreadySubmitting,

    #[error("The form was already submitted")]
    AlreadySubmitted,
}

/// Result of a mutating request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The server accepted the change and points at the next page.
    Redirect(String),
    /// The server rejected the fields.
    Invalid(FieldErrors),
}

/// A picked image file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Field values of a post form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostDraft {
    pub title: String,
    pub contents: String,
    pub status: String,
    pub category: String,
    pub image: Option<ImageFile>,
}

impl PostDraft {
    /// Package the draft as `multipart/form-data`; the image part is only
    /// present when one was picked.
    pub fn to_form(&self) -> Form {
        let form = Form::new()
            .text("title", self.title.clone())
            .text("contents", self.contents.clone())
            .text("status", self.status.clone())
            .text("category", self.category.clone());

        match &self.image {
            Some(image) => form.part(
                "image",
                Part::bytes(image.bytes.clone()).file_name(image.file_name.clone()),
            ),
            None => form,
        }
    }
}

/// Bearer-authenticated client. Redirects are not followed so that the
/// `303` of a successful mutation can be reported as such.
#[derive(Debug, Clone)]
pub struct PostsClient {
    http: Client,
    base_url: String,
    token: String,
}

impl PostsClient {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Result<Self, ClientError> {
        let http = Client::builder()
            .redirect(redirect::Policy::none())
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// GET a listing URL, e.g. one taken from a pagination link.
    pub async fn visit(&self, path: &str) -> Result<PageView<PostIndexProps>, ClientError> {
        self.page(path).await
    }

    pub async fn list(
        &self,
        search: Option<&str>,
        page: u64,
    ) -> Result<PageView<PostIndexProps>, ClientError> {
        self.visit(&listing_url(search, page)).await
    }

    pub async fn create_page(&self) -> Result<PageView<PostCreateProps>, ClientError> {
        self.page("/posts/create").await
    }

    pub async fn edit(&self, id: i64) -> Result<PageView<PostEditProps>, ClientError> {
        self.page(&format!("/posts/{id}/edit")).await
    }

    pub async fn create(&self, draft: &PostDraft) -> Result<SubmitOutcome, ClientError> {
        let response = self
            .http
            .post(self.url("/posts"))
            .bearer_auth(&self.token)
            .multipart(draft.to_form())
            .send()
            .await?;

        submit_outcome(response).await
    }

    /// Update through `POST /posts/{id}` with `_method=put`, since the body is
    /// multipart.
    pub async fn update(&self, id: i64, draft: &PostDraft) -> Result<SubmitOutcome, ClientError> {
        let response = self
            .http
            .post(self.url(&format!("/posts/{id}")))
            .bearer_auth(&self.token)
            .multipart(draft.to_form().text("_method", "put"))
            .send()
            .await?;

        submit_outcome(response).await
    }

    pub async fn delete(&self, id: i64) -> Result<SubmitOutcome, ClientError> {
        let response = self
            .http
            .delete(self.url(&format!("/posts/{id}")))
            .bearer_auth(&self.token)
            .send()
            .await?;

        submit_outcome(response).await
    }

    async fn page<P: DeserializeOwned>(&self, path: &str) -> Result<PageView<P>, ClientError> {
        tracing::debug!(path, "Fetching page");
        let response = self
            .http
            .get(self.url(path))
            .bearer_auth(&self.token)
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;
        if status != StatusCode::OK {
            return Err(status_error(status, &body));
        }
        Ok(serde_json::from_slice(&body)?)
    }
}

/// Listing URL for a search and page; blank searches are left out.
pub fn listing_url(search: Option<&str>, page: u64) -> String {
    let page = page.to_string();
    let mut params = Vec::with_capacity(2);
    if let Some(search) = search.map(str::trim).filter(|s| !s.is_empty()) {
        params.push(("search", search));
    }
    if page != "1" {
        params.push(("page", page.as_str()));
    }

    match serde_urlencoded::to_string(&params) {
        Ok(qs) if !qs.is_empty() => format!("/posts?{qs}"),
        _ => "/posts".to_string(),
    }
}

async fn submit_outcome(response: reqwest::Response) -> Result<SubmitOutcome, ClientError> {
    let status = response.status();
    let location = response
        .headers()
        .get(LOCATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);
    let body = response.bytes().await?;

    classify(status, location, &body)
}

/// Interpret the response to a mutation.
fn classify(
    status: StatusCode,
    location: Option<String>,
    body: &[u8],
) -> Result<SubmitOutcome, ClientError> {
    if status.is_redirection() {
        return location
            .map(SubmitOutcome::Redirect)
            .ok_or(ClientError::MissingLocation);
    }

    if status == StatusCode::UNPROCESSABLE_ENTITY {
        let problem: ErrorResponse = serde_json::from_slice(body)?;
        return Ok(SubmitOutcome::Invalid(problem.errors.unwrap_or_default()));
    }

    Err(status_error(status, body))
}

fn status_error(status: StatusCode, body: &[u8]) -> ClientError {
    match status {
        StatusCode::UNAUTHORIZED => ClientError::Unauthorized,
        StatusCode::NOT_FOUND => ClientError::NotFound,
        other => ClientError::UnexpectedStatus {
            status: other.as_u16(),
            detail: serde_json::from_slice::<ErrorResponse>(body)
                .ok()
                .and_then(|problem| problem.detail),
        },
    }
}
