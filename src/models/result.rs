use crate::models::options::GenerationOptions;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResult {
    pub image_url: String,
    pub result_id: String,
    pub prompt: String,
    pub options: GenerationOptions,
    /// Epoch milliseconds.
    pub timestamp: i64,
    pub model: String,
    pub size: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRecord {
    pub result_id: String,
    pub image_url: String,
    #[serde(default)]
    pub prompt: String,
    pub timestamp: i64,
    #[serde(default, alias = "options")]
    pub metadata: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusKind {
    Ok,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceStatus {
    pub status: StatusKind,
    pub provider: String,
    pub model: String,
    pub message: String,
}

impl ServiceStatus {
    pub fn ok(provider: impl Into<String>, model: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status: StatusKind::Ok,
            provider: provider.into(),
            model: model.into(),
            message: message.into(),
        }
    }

    pub fn error(
        provider: impl Into<String>,
        model: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            status: StatusKind::Error,
            provider: provider.into(),
            model: model.into(),
            message: message.into(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == StatusKind::Ok
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<String>,
}

impl ValidationResult {
    pub fn from_errors(errors: Vec<String>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }
}
