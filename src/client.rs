use log::debug;
use reqwest::StatusCode;
use reqwest::blocking::{Client, RequestBuilder, Response, multipart};
use reqwest::header::{HeaderMap, HeaderValue, LOCATION};
use serde::Serialize;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::api::{ApiError, SpeechApi};
use crate::config::ApiConfig;
use crate::dto::{
    Dataset, DatasetKind, DatasetUpload, Endpoint, EndpointDefinition, ErrorContent, Model,
    ModelDefinition, SupportedLocales, Test, TestDefinition, Transcription,
    TranscriptionDefinition, TranscriptionUpdate,
};
use crate::transcript::TranscriptionResult;

const SUBSCRIPTION_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";

/// Blocking client for the speech-to-text v2.0 REST API.
pub struct HttpSpeechApi {
    client: Client,
    /// Result documents live behind pre-signed URLs and are fetched without
    /// the subscription key.
    download_client: Client,
    base_url: String,
}

impl HttpSpeechApi {
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let mut key = HeaderValue::from_str(&config.key)
            .map_err(|_| ApiError::service("InvalidKey", "Speech key contains invalid characters"))?;
        key.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(SUBSCRIPTION_KEY_HEADER, key);

        Ok(Self {
            client: Client::builder().default_headers(headers).build()?,
            download_client: Client::new(),
            base_url: config.base_url(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn send(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let response = request.send()?;
        let status = response.status();
        debug!("{} {}", status, response.url());

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text()?;
        Err(error_from_response(status, &body))
    }

    fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let body = self.send(self.client.get(self.url(path)))?.text()?;
        Ok(serde_json::from_str(&body)?)
    }

    fn create<B: Serialize>(&self, path: &str, body: &B) -> Result<Uuid, ApiError> {
        let response = self.send(self.client.post(self.url(path)).json(body))?;
        created_id(&response)
    }

    fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.send(self.client.delete(self.url(path)))?;
        Ok(())
    }
}

fn error_from_response(status: StatusCode, body: &str) -> ApiError {
    match serde_json::from_str::<ErrorContent>(body) {
        Ok(content) if !content.message.is_empty() => {
            let code = if content.code.is_empty() && status == StatusCode::UNAUTHORIZED {
                "Unauthorized".to_string()
            } else {
                content.code
            };
            ApiError::service(code, content.message)
        }
        _ => {
            let code = match status {
                StatusCode::UNAUTHORIZED => "Unauthorized".to_string(),
                other => other.as_u16().to_string(),
            };
            ApiError::service(code, format!("Server returned error {status}: {body}"))
        }
    }
}

fn created_id(response: &Response) -> Result<Uuid, ApiError> {
    response
        .headers()
        .get(LOCATION)
        .and_then(|value| value.to_str().ok())
        .and_then(id_from_location)
        .ok_or(ApiError::MissingLocation)
}

/// The id of a created resource is the last path segment of its location.
fn id_from_location(location: &str) -> Option<Uuid> {
    let path = location.split(['?', '#']).next()?;
    let segment = path.trim_end_matches('/').rsplit('/').next()?;
    Uuid::parse_str(segment).ok()
}

impl SpeechApi for HttpSpeechApi {
    fn create_transcription(&self, definition: &TranscriptionDefinition) -> Result<Uuid, ApiError> {
        self.create("transcriptions", definition)
    }

    fn get_transcriptions(&self) -> Result<Vec<Transcription>, ApiError> {
        self.get("transcriptions")
    }

    fn get_transcription(&self, id: Uuid) -> Result<Transcription, ApiError> {
        self.get(&format!("transcriptions/{id}"))
    }

    fn update_transcription(&self, id: Uuid, update: &TranscriptionUpdate) -> Result<Transcription, ApiError> {
        let request = self.client.patch(self.url(&format!("transcriptions/{id}"))).json(update);
        let body = self.send(request)?.text()?;
        Ok(serde_json::from_str(&body)?)
    }

    fn delete_transcription(&self, id: Uuid) -> Result<(), ApiError> {
        self.delete(&format!("transcriptions/{id}"))
    }

    fn fetch_transcription_result(&self, url: &str) -> Result<TranscriptionResult, ApiError> {
        let body = self.send(self.download_client.get(url))?.text()?;
        debug!("Fetched transcription result: {} bytes", body.len());
        Ok(serde_json::from_str(&body)?)
    }

    fn upload_dataset(&self, upload: &DatasetUpload) -> Result<Uuid, ApiError> {
        let mut form = multipart::Form::new()
            .text("name", upload.name.clone())
            .text("locale", upload.locale.clone())
            .text("dataImportKind", upload.kind.import_kind());

        if let Some(description) = &upload.description {
            form = form.text("description", description.clone());
        }
        if let Some(properties) = &upload.properties {
            form = form.text("properties", serde_json::to_string(properties)?);
        }

        form = match &upload.kind {
            DatasetKind::Acoustic {
                audio,
                transcriptions,
            } => form.file("audiodata", audio)?.file("transcriptions", transcriptions)?,
            DatasetKind::Language { language } => form.file("languagedata", language)?,
        };

        let response = self.send(self.client.post(self.url("datasets/upload")).multipart(form))?;
        created_id(&response)
    }

    fn get_datasets(&self) -> Result<Vec<Dataset>, ApiError> {
        self.get("datasets")
    }

    fn get_dataset(&self, id: Uuid) -> Result<Dataset, ApiError> {
        self.get(&format!("datasets/{id}"))
    }

    fn delete_dataset(&self, id: Uuid) -> Result<(), ApiError> {
        self.delete(&format!("datasets/{id}"))
    }

    fn get_dataset_locales(&self) -> Result<SupportedLocales, ApiError> {
        self.get("datasets/locales")
    }

    fn create_model(&self, definition: &ModelDefinition) -> Result<Uuid, ApiError> {
        self.create("models", definition)
    }

    fn get_models(&self) -> Result<Vec<Model>, ApiError> {
        self.get("models")
    }

    fn get_model(&self, id: Uuid) -> Result<Model, ApiError> {
        self.get(&format!("models/{id}"))
    }

    fn delete_model(&self, id: Uuid) -> Result<(), ApiError> {
        self.delete(&format!("models/{id}"))
    }

    fn get_model_locales(&self) -> Result<SupportedLocales, ApiError> {
        self.get("models/locales")
    }

    fn create_accuracy_test(&self, definition: &TestDefinition) -> Result<Uuid, ApiError> {
        self.create("tests/accuracy", definition)
    }

    fn get_accuracy_tests(&self) -> Result<Vec<Test>, ApiError> {
        self.get("tests/accuracy")
    }

    fn get_accuracy_test(&self, id: Uuid) -> Result<Test, ApiError> {
        self.get(&format!("tests/accuracy/{id}"))
    }

    fn delete_accuracy_test(&self, id: Uuid) -> Result<(), ApiError> {
        self.delete(&format!("tests/accuracy/{id}"))
    }

    fn create_endpoint(&self, definition: &EndpointDefinition) -> Result<Uuid, ApiError> {
        self.create("endpoints", definition)
    }

    fn get_endpoints(&self) -> Result<Vec<Endpoint>, ApiError> {
        self.get("endpoints")
    }

    fn get_endpoint(&self, id: Uuid) -> Result<Endpoint, ApiError> {
        self.get(&format!("endpoints/{id}"))
    }

    fn delete_endpoint(&self, id: Uuid) -> Result<(), ApiError> {
        self.delete(&format!("endpoints/{id}"))
    }

    fn delete_endpoint_data(&self, id: Uuid) -> Result<(), ApiError> {
        self.delete(&format!("endpoints/{id}/data"))
    }
}
