//! The REST operations the commands depend on.

use thiserror::Error;
use uuid::Uuid;

use crate::dto::{
    Dataset, DatasetUpload, Endpoint, EndpointDefinition, Model, ModelDefinition, SupportedLocales,
    Test, TestDefinition, Transcription, TranscriptionDefinition, TranscriptionUpdate,
};
use crate::transcript::TranscriptionResult;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{message}")]
    Service { code: String, message: String },
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("created resource has no usable Location header")]
    MissingLocation,
    #[error("{0}")]
    Io(#[from] std::io::Error),
}

impl ApiError {
    pub fn service(code: impl Into<String>, message: impl Into<String>) -> Self {
        ApiError::Service {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Service { code, .. } if code == "Unauthorized")
    }
}

/// Create calls return the id of the new resource; the resource itself keeps
/// processing on the server.
pub trait SpeechApi {
    fn create_transcription(&self, definition: &TranscriptionDefinition) -> Result<Uuid, ApiError>;
    fn get_transcriptions(&self) -> Result<Vec<Transcription>, ApiError>;
    fn get_transcription(&self, id: Uuid) -> Result<Transcription, ApiError>;
    fn update_transcription(&self, id: Uuid, update: &TranscriptionUpdate) -> Result<Transcription, ApiError>;
    fn delete_transcription(&self, id: Uuid) -> Result<(), ApiError>;
    fn fetch_transcription_result(&self, url: &str) -> Result<TranscriptionResult, ApiError>;

    fn upload_dataset(&self, upload: &DatasetUpload) -> Result<Uuid, ApiError>;
    fn get_datasets(&self) -> Result<Vec<Dataset>, ApiError>;
    fn get_dataset(&self, id: Uuid) -> Result<Dataset, ApiError>;
    fn delete_dataset(&self, id: Uuid) -> Result<(), ApiError>;
    fn get_dataset_locales(&self) -> Result<SupportedLocales, ApiError>;

    fn create_model(&self, definition: &ModelDefinition) -> Result<Uuid, ApiError>;
    fn get_models(&self) -> Result<Vec<Model>, ApiError>;
    fn get_model(&self, id: Uuid) -> Result<Model, ApiError>;
    fn delete_model(&self, id: Uuid) -> Result<(), ApiError>;
    fn get_model_locales(&self) -> Result<SupportedLocales, ApiError>;

    fn create_accuracy_test(&self, definition: &TestDefinition) -> Result<Uuid, ApiError>;
    fn get_accuracy_tests(&self) -> Result<Vec<Test>, ApiError>;
    fn get_accuracy_test(&self, id: Uuid) -> Result<Test, ApiError>;
    fn delete_accuracy_test(&self, id: Uuid) -> Result<(), ApiError>;

    fn create_endpoint(&self, definition: &EndpointDefinition) -> Result<Uuid, ApiError>;
    fn get_endpoints(&self) -> Result<Vec<Endpoint>, ApiError>;
    fn get_endpoint(&self, id: Uuid) -> Result<Endpoint, ApiError>;
    fn delete_endpoint(&self, id: Uuid) -> Result<(), ApiError>;
    fn delete_endpoint_data(&self, id: Uuid) -> Result<(), ApiError>;
}
