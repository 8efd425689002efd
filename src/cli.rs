use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use uuid::Uuid;

#[derive(Parser)]
#[command(
    name = "speech",
    version,
    about = "Speech CLI - custom speech datasets, models, endpoints and batch transcription",
    long_about = "Command-line client for the speech-to-text REST API. Uploads adaptation datasets, trains and tests models, deploys endpoints and runs batch transcriptions.",
    after_help = "EXAMPLES:\n    # Upload an acoustic dataset and wait for the import\n    speech dataset create --name train --audio train.zip --transcript train.txt --wait\n\n    # Train an acoustic model on top of a scenario model\n    speech model create --name adapted --audio-dataset <GUID> --scenario <GUID> --wait\n\n    # Transcribe a recording and download subtitles\n    speech transcript create --name meeting --recording https://host/meeting.wav --wait\n    speech transcript download <GUID> --format vtt --out-dir subtitles\n\nCONFIGURATION:\n    SPEECH_KEY, SPEECH_REGION and SPEECH_ENDPOINT are read from the environment or a .env file."
)]
pub struct Cli {
    /// Speech subscription key. Overrides SPEECH_KEY.
    #[arg(long, global = true)]
    pub key: Option<String>,

    /// Speech service region, e.g. westus. Overrides SPEECH_REGION.
    #[arg(long, global = true)]
    pub region: Option<String>,

    /// Full API base URL. Overrides SPEECH_ENDPOINT.
    #[arg(long, global = true, value_name = "URL")]
    pub endpoint: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage adaptation datasets.
    #[command(subcommand)]
    Dataset(DatasetCommand),
    /// Manage acoustic and language models.
    #[command(subcommand)]
    Model(ModelCommand),
    /// Manage accuracy tests.
    #[command(subcommand)]
    Test(TestCommand),
    /// Manage speech endpoints.
    #[command(subcommand)]
    Endpoint(EndpointCommand),
    /// Batch transcription.
    #[command(subcommand)]
    Transcript(TranscriptCommand),
}

/// Options shared by every create command.
#[derive(Args, Debug, Clone, Default, PartialEq)]
pub struct CreateArgs {
    /// Name of the new resource.
    #[arg(long)]
    pub name: String,

    #[arg(long)]
    pub description: Option<String>,

    /// Custom properties, e.g. "prop1=val1;prop2=val2".
    #[arg(long)]
    pub properties: Option<String>,

    /// Block until the resource finishes processing.
    #[arg(long)]
    pub wait: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DatasetLocaleKind {
    Acoustic,
    Language,
    Pronunciation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModelLocaleKind {
    Acoustic,
    Language,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum DatasetCommand {
    /// Upload a new dataset. Provide --audio and --transcript for an acoustic
    /// dataset, --language for a language dataset.
    Create {
        #[command(flatten)]
        create: CreateArgs,

        /// Locale of the data. Default: en-us.
        #[arg(long)]
        locale: Option<String>,

        /// ZIP file with all audio samples. Requires --transcript.
        #[arg(long, value_name = "FILE", requires = "transcript")]
        audio: Option<PathBuf>,

        /// TXT file with transcriptions of the audio samples. Requires --audio.
        #[arg(long, value_name = "FILE", requires = "audio")]
        transcript: Option<PathBuf>,

        /// TXT file with language data.
        #[arg(long, value_name = "FILE")]
        language: Option<PathBuf>,
    },
    /// List datasets in the subscription.
    List,
    /// Show details of a dataset.
    Show { id: Uuid },
    /// Delete a dataset.
    Delete { id: Uuid },
    /// List locales available for dataset imports.
    Locales {
        #[arg(value_enum)]
        kind: DatasetLocaleKind,

        /// Print only the locales.
        #[arg(long)]
        simple: bool,
    },
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum ModelCommand {
    /// Train a new model on top of a scenario (base) model.
    Create {
        #[command(flatten)]
        create: CreateArgs,

        /// Locale of the model. Must match the dataset locale. Default: en-us.
        #[arg(long)]
        locale: Option<String>,

        /// Acoustic dataset to train on.
        #[arg(long, value_name = "GUID")]
        audio_dataset: Option<Uuid>,

        /// Language dataset to train on.
        #[arg(long, value_name = "GUID")]
        language_dataset: Option<Uuid>,

        /// Pronunciation dataset used alongside --language-dataset.
        #[arg(long, value_name = "GUID", requires = "language_dataset")]
        pronunciation_dataset: Option<Uuid>,

        /// Base model id. See 'model list-scenarios'.
        #[arg(long, value_name = "GUID")]
        scenario: Uuid,
    },
    /// List trained models in the subscription.
    List,
    /// List scenario (base) models for a locale, newest first.
    ListScenarios {
        /// Default: en-us.
        #[arg(long)]
        locale: Option<String>,

        /// Purpose filter, or "all".
        #[arg(long, default_value = "AcousticAdaptation")]
        purpose: String,

        /// Print only the ids.
        #[arg(long)]
        simple: bool,
    },
    /// Show the status of a model.
    Status {
        id: Uuid,

        /// Print only the status.
        #[arg(long)]
        simple: bool,
    },
    /// Delete a model.
    Delete { id: Uuid },
    /// List locales available for model training.
    Locales {
        #[arg(value_enum)]
        kind: ModelLocaleKind,

        /// Print only the locales.
        #[arg(long)]
        simple: bool,
    },
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum TestCommand {
    /// Run a new accuracy test.
    Create {
        #[command(flatten)]
        create: CreateArgs,

        /// Dataset used for testing.
        #[arg(long, value_name = "GUID")]
        audio_dataset: Uuid,

        /// Acoustic model under test.
        #[arg(long, value_name = "GUID")]
        model: Uuid,

        /// Language model under test.
        #[arg(long, value_name = "GUID")]
        language_model: Uuid,
    },
    /// List accuracy tests in the subscription.
    List,
    /// Show details of an accuracy test.
    Show { id: Uuid },
    /// Show the status of an accuracy test.
    Status {
        id: Uuid,

        /// Print only the status.
        #[arg(long)]
        simple: bool,
    },
    /// Delete an accuracy test.
    Delete { id: Uuid },
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum EndpointCommand {
    /// Deploy a new endpoint.
    Create {
        #[command(flatten)]
        create: CreateArgs,

        /// Default: en-us.
        #[arg(long)]
        locale: Option<String>,

        /// Acoustic model to deploy.
        #[arg(long, short = 'm', value_name = "GUID")]
        model: Uuid,

        /// Language model to deploy.
        #[arg(long, value_name = "GUID")]
        language_model: Uuid,

        #[arg(long, default_value = "1")]
        concurrent_recognitions: u32,

        /// Log audio and transcriptions sent to the endpoint.
        #[arg(long, default_value = "true", action = clap::ArgAction::Set)]
        content_logging: bool,
    },
    /// List endpoints in the subscription.
    List,
    /// Show details of an endpoint.
    Show { id: Uuid },
    /// Delete an endpoint.
    Delete { id: Uuid },
    /// Delete the data logged by an endpoint.
    DeleteData { id: Uuid },
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum TranscriptCommand {
    /// Start a new batch transcription.
    Create {
        #[command(flatten)]
        create: CreateArgs,

        /// Default: en-us.
        #[arg(long)]
        locale: Option<String>,

        /// URL of the audio to transcribe.
        #[arg(long, value_name = "URL")]
        recording: Option<String>,

        /// Acoustic model. Default: baseline.
        #[arg(long, value_name = "GUID")]
        model: Option<Uuid>,

        /// Language model. Default: baseline.
        #[arg(long, value_name = "GUID")]
        language_model: Option<Uuid>,

        /// Request word level timestamps. Wins over --properties.
        #[arg(long)]
        word_level_timestamps: bool,
    },
    /// List batch transcriptions.
    List,
    /// Show a batch transcription.
    Show { id: Uuid },
    /// Update name or description of a transcription.
    Update {
        id: Uuid,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        description: Option<String>,
    },
    /// Delete a batch transcription.
    Delete { id: Uuid },
    /// Download the results of a finished transcription.
    Download {
        id: Uuid,

        /// Output directory. Default: current directory.
        #[arg(long, value_name = "DIR")]
        out_dir: Option<PathBuf>,

        /// Output format: json, vtt or txt. Default: json.
        #[arg(long, value_name = "JSON|VTT|TXT")]
        format: Option<String>,

        /// Base name of the written file; the extension follows the format.
        #[arg(long)]
        file_name: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parses_download() {
        let id = Uuid::from_u128(7);
        let cli = Cli::try_parse_from([
            "speech",
            "transcript",
            "download",
            &id.to_string(),
            "--format",
            "VTT",
            "--region",
            "westus",
        ])
        .unwrap();

        assert_eq!(cli.region.as_deref(), Some("westus"));
        match cli.command {
            Commands::Transcript(TranscriptCommand::Download {
                id: parsed, format, ..
            }) => {
                assert_eq!(parsed, id);
                assert_eq!(format.as_deref(), Some("VTT"));
            }
            _ => panic!("expected transcript download"),
        }
    }

    #[test]
    fn test_rejects_malformed_ids() {
        assert!(Cli::try_parse_from(["speech", "model", "status", "not-a-guid"]).is_err());
    }

    #[test]
    fn test_acoustic_upload_requires_both_files() {
        let result = Cli::try_parse_from([
            "speech", "dataset", "create", "--name", "train", "--audio", "train.zip",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_endpoint_defaults() {
        let model = Uuid::from_u128(1).to_string();
        let language = Uuid::from_u128(2).to_string();
        let cli = Cli::try_parse_from([
            "speech",
            "endpoint",
            "create",
            "--name",
            "prod",
            "-m",
            &model,
            "--language-model",
            &language,
        ])
        .unwrap();

        match cli.command {
            Commands::Endpoint(EndpointCommand::Create {
                concurrent_recognitions,
                content_logging,
                create,
                ..
            }) => {
                assert_eq!(concurrent_recognitions, 1);
                assert!(content_logging);
                assert!(!create.wait);
            }
            _ => panic!("expected endpoint create"),
        }
    }
}
