//! Batch transcription result document, as published by the service at each
//! result URL of a finished transcription.

use serde::{Deserialize, Serialize};

/// Only segments with this recognition status produce output.
pub const SUCCESS_STATUS: &str = "Success";

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TranscriptionResult {
    #[serde(alias = "audioFileResults")]
    pub audio_file_results: Vec<AudioFileResult>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AudioFileResult {
    #[serde(alias = "audioFileName")]
    pub audio_file_name: String,
    #[serde(alias = "segmentResults")]
    pub segment_results: Vec<SegmentResult>,
}

/// One recognized stretch of speech. `offset` and `duration` are in ticks.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SegmentResult {
    #[serde(alias = "recognitionStatus")]
    pub recognition_status: String,
    #[serde(alias = "offset")]
    pub offset: u64,
    #[serde(alias = "duration")]
    pub duration: u64,
    #[serde(rename = "NBest", alias = "nBest")]
    pub n_best: Vec<Alternative>,
}

impl SegmentResult {
    pub fn is_success(&self) -> bool {
        self.recognition_status == SUCCESS_STATUS
    }

    pub fn end(&self) -> u64 {
        self.offset + self.duration
    }

    /// Highest ranked alternative, if the service returned any.
    pub fn best(&self) -> Option<&Alternative> {
        self.n_best.first()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Alternative {
    #[serde(alias = "confidence")]
    pub confidence: f32,
    #[serde(alias = "lexical", default, skip_serializing_if = "Option::is_none")]
    pub lexical: Option<String>,
    #[serde(rename = "ITN", alias = "itn", default, skip_serializing_if = "Option::is_none")]
    pub itn: Option<String>,
    #[serde(
        rename = "MaskedITN",
        alias = "maskedItn",
        alias = "maskedITN",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub masked_itn: Option<String>,
    #[serde(alias = "display")]
    pub display: String,
    #[serde(alias = "words", default, skip_serializing_if = "Option::is_none")]
    pub words: Option<Vec<Word>>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Word {
    #[serde(alias = "word")]
    pub word: String,
    #[serde(alias = "offset")]
    pub offset: u64,
    #[serde(alias = "duration")]
    pub duration: u64,
}
