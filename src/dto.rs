//! Wire types of the speech-to-text REST API.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::poller::{Job, JobStatus};

pub type Properties = BTreeMap<String, String>;

/// Error payload returned by the service for rejected calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorContent {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelIdentity {
    pub id: Uuid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetIdentity {
    pub id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transcription {
    pub id: Uuid,
    #[serde(default)]
    pub name: String,
    pub status: JobStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_message: Option<String>,
    /// Result document URLs keyed by channel.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub results_urls: BTreeMap<String, String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub id: Uuid,
    #[serde(default)]
    pub name: String,
    pub status: JobStatus,
    #[serde(default)]
    pub locale: String,
    #[serde(default)]
    pub data_import_kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_date_time: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Model {
    pub id: Uuid,
    #[serde(default)]
    pub name: String,
    pub status: JobStatus,
    #[serde(default)]
    pub locale: String,
    #[serde(default)]
    pub model_kind: String,
    /// Absent on scenario (base) models.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_model: Option<Value>,
    #[serde(default, skip_serializing_if = "Properties::is_empty")]
    pub properties: Properties,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_date_time: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Test {
    pub id: Uuid,
    #[serde(default)]
    pub name: String,
    pub status: JobStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub word_error_rate: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Endpoint {
    pub id: Uuid,
    #[serde(default)]
    pub name: String,
    pub status: JobStatus,
    #[serde(default)]
    pub endpoint_kind: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

macro_rules! impl_job {
    ($($entity:ty),*) => {
        $(impl Job for $entity {
            fn id(&self) -> Uuid {
                self.id
            }

            fn status(&self) -> JobStatus {
                self.status
            }
        })*
    };
}

impl_job!(Transcription, Dataset, Model, Test, Endpoint);

/// Locales accepted for each dataset or model kind.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SupportedLocales {
    #[serde(alias = "acoustic", default)]
    pub acoustic: Option<Vec<String>>,
    #[serde(alias = "language", default)]
    pub language: Option<Vec<String>>,
    #[serde(alias = "pronunciation", default)]
    pub pronunciation: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptionDefinition {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub locale: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recordings_url: Option<String>,
    pub models: Vec<ModelIdentity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<Properties>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TranscriptionUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelDefinition {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub locale: String,
    pub model_kind: String,
    pub base_model: ModelIdentity,
    pub datasets: Vec<DatasetIdentity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<Properties>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TestDefinition {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub dataset: DatasetIdentity,
    pub models: Vec<ModelIdentity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<Properties>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointDefinition {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub locale: String,
    pub models: Vec<ModelIdentity>,
    pub concurrent_recognitions: u32,
    pub content_logging_enabled: bool,
}

/// Multipart dataset import. Acoustic imports carry `audio` and
/// `transcriptions`, language imports carry `language`.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetUpload {
    pub name: String,
    pub description: Option<String>,
    pub locale: String,
    pub kind: DatasetKind,
    pub properties: Option<Properties>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DatasetKind {
    Acoustic {
        audio: std::path::PathBuf,
        transcriptions: std::path::PathBuf,
    },
    Language {
        language: std::path::PathBuf,
    },
}

impl DatasetKind {
    pub fn import_kind(&self) -> &'static str {
        match self {
            DatasetKind::Acoustic { .. } => "Acoustic",
            DatasetKind::Language { .. } => "Language",
        }
    }
}
