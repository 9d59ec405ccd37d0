use std::env;
use std::fmt;
use std::path::PathBuf;

use reqwest::Client;
use reqwest::header::CACHE_CONTROL;
use serde_json::Value;
use url::Url;

use quiz_core::bank::QuestionBank;

use crate::error::BankLoadError;

/// Default question source, relative to the working directory.
pub const DEFAULT_BANK_SOURCE: &str = "./quiz.json";

/// Where the external question bank lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BankSource {
    File(PathBuf),
    Url(Url),
}

impl BankSource {
    /// `http://` and `https://` strings become URL sources; anything else is a
    /// file path.
    ///
    /// # Errors
    ///
    /// Returns `BankLoadError::InvalidUrl` for an `http(s)://` string that does
    /// not parse.
    pub fn parse(raw: &str) -> Result<Self, BankLoadError> {
        let raw = raw.trim();
        if raw.starts_with("http://") || raw.starts_with("https://") {
            return Ok(Self::Url(Url::parse(raw)?));
        }
        Ok(Self::File(PathBuf::from(raw)))
    }

    /// Reads `QUIZ_BANK_SOURCE`, falling back to [`DEFAULT_BANK_SOURCE`].
    ///
    /// # Errors
    ///
    /// Same as [`BankSource::parse`].
    pub fn from_env() -> Result<Self, BankLoadError> {
        match env::var("QUIZ_BANK_SOURCE") {
            Ok(value) if !value.trim().is_empty() => Self::parse(&value),
            _ => Self::parse(DEFAULT_BANK_SOURCE),
        }
    }
}

impl fmt::Display for BankSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BankSource::File(path) => write!(f, "{}", path.display()),
            BankSource::Url(url) => write!(f, "{url}"),
        }
    }
}

/// Whether the bank in use came from the configured source or the built-in set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BankOrigin {
    Source,
    Fallback,
}

#[derive(Debug, Clone)]
pub struct LoadedBank {
    pub bank: QuestionBank,
    pub origin: BankOrigin,
}

#[derive(Clone)]
pub struct BankLoader {
    client: Client,
    source: BankSource,
}

impl BankLoader {
    #[must_use]
    pub fn new(source: BankSource) -> Self {
        Self {
            client: Client::new(),
            source,
        }
    }

    #[must_use]
    pub fn source(&self) -> &BankSource {
        &self.source
    }

    /// Fetches and validates the configured source.
    ///
    /// # Errors
    ///
    /// Returns `BankLoadError` if the source cannot be read, the HTTP status is
    /// not a success, the body is not JSON, or no valid question survives.
    pub async fn fetch(&self) -> Result<QuestionBank, BankLoadError> {
        let value: Value = match &self.source {
            BankSource::File(path) => {
                let raw = tokio::fs::read_to_string(path)
                    .await
                    .map_err(|source| BankLoadError::Io {
                        path: path.clone(),
                        source,
                    })?;
                serde_json::from_str(&raw)?
            }
            BankSource::Url(url) => {
                let response = self
                    .client
                    .get(url.clone())
                    .header(CACHE_CONTROL, "no-cache")
                    .send()
                    .await?;
                if !response.status().is_success() {
                    return Err(BankLoadError::HttpStatus(response.status()));
                }
                response.json().await?
            }
        };
        Ok(QuestionBank::from_json_value(&value)?)
    }

    /// Loads the configured source, or the built-in bank if that fails.
    pub async fn load(&self) -> LoadedBank {
        match self.fetch().await {
            Ok(bank) => {
                let topics: Vec<&str> = bank.topics().map(|t| t.as_str()).collect();
                log::info!("loaded questions from {}: {topics:?}", self.source);
                LoadedBank {
                    bank,
                    origin: BankOrigin::Source,
                }
            }
            Err(err) => {
                log::warn!(
                    "using built-in questions, could not load {}: {err}",
                    self.source
                );
                LoadedBank {
                    bank: QuestionBank::builtin(),
                    origin: BankOrigin::Fallback,
                }
            }
        }
    }
}
