//! HTTP client for the programs API.

use crate::program_store::{FieldViolation, Program};
use reqwest::{Response, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected status {status}: {body}")]
    UnexpectedStatus { status: StatusCode, body: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    Created(i64),
    Rejected(Vec<FieldViolation>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    Updated,
    NotFound,
    Rejected(Vec<FieldViolation>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    NotFound,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct InsertIdBody {
    insert_id: i64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ValidationErrorsBody {
    validation_errors: Vec<FieldViolation>,
}

pub struct ProgramsClient {
    http: reqwest::Client,
    base_url: String,
}

impl ProgramsClient {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    /// `base_url` is the server root, e.g. `http://localhost:3310`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(ProgramsClient {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn programs_url(&self) -> String {
        format!("{}/api/programs", self.base_url)
    }

    fn program_url(&self, id: i64) -> String {
        format!("{}/api/programs/{}", self.base_url, id)
    }

    async fn unexpected(response: Response) -> ClientError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        ClientError::UnexpectedStatus { status, body }
    }

    /// 400 responses carry either field violations or an id error; only the
    /// former is turned into violations.
    async fn rejection(response: Response) -> Result<Vec<FieldViolation>, ClientError> {
        let status = response.status();
        let body = response.text().await?;
        match serde_json::from_str::<ValidationErrorsBody>(&body) {
            Ok(parsed) => Ok(parsed.validation_errors),
            Err(_) => Err(ClientError::UnexpectedStatus { status, body }),
        }
    }

    pub async fn browse(&self) -> Result<Vec<Program>, ClientError> {
        let response = self.http.get(self.programs_url()).send().await?;
        if response.status() != StatusCode::OK {
            return Err(Self::unexpected(response).await);
        }
        Ok(response.json().await?)
    }

    pub async fn read(&self, id: i64) -> Result<Option<Program>, ClientError> {
        let response = self.http.get(self.program_url(id)).send().await?;
        match response.status() {
            StatusCode::OK => Ok(Some(response.json().await?)),
            StatusCode::NOT_FOUND => Ok(None),
            _ => Err(Self::unexpected(response).await),
        }
    }

    pub async fn add<B: Serialize + ?Sized>(&self, body: &B) -> Result<AddOutcome, ClientError> {
        let response = self.http.post(self.programs_url()).json(body).send().await?;
        match response.status() {
            StatusCode::CREATED => {
                let body: InsertIdBody = response.json().await?;
                Ok(AddOutcome::Created(body.insert_id))
            }
            StatusCode::BAD_REQUEST => Ok(AddOutcome::Rejected(Self::rejection(response).await?)),
            _ => Err(Self::unexpected(response).await),
        }
    }

    pub async fn edit<B: Serialize + ?Sized>(
        &self,
        id: i64,
        body: &B,
    ) -> Result<EditOutcome, ClientError> {
        let response = self.http.put(self.program_url(id)).json(body).send().await?;
        match response.status() {
            StatusCode::NO_CONTENT => Ok(EditOutcome::Updated),
            StatusCode::NOT_FOUND => Ok(EditOutcome::NotFound),
            StatusCode::BAD_REQUEST => Ok(EditOutcome::Rejected(Self::rejection(response).await?)),
            _ => Err(Self::unexpected(response).await),
        }
    }

    pub async fn delete(&self, id: i64) -> Result<DeleteOutcome, ClientError> {
        let response = self.http.delete(self.program_url(id)).send().await?;
        match response.status() {
            StatusCode::NO_CONTENT => Ok(DeleteOutcome::Deleted),
            StatusCode::NOT_FOUND => Ok(DeleteOutcome::NotFound),
            _ => Err(Self::unexpected(response).await),
        }
    }
}
