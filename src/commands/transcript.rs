use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use log::{info, warn};
use uuid::Uuid;

use super::{Session, locale_or_default, split_properties};
use crate::cli::{CreateArgs, TranscriptCommand};
use crate::dto::{ModelIdentity, Properties, TranscriptionDefinition, TranscriptionUpdate};
use crate::poller::ExitSignal;
use crate::transcript::OutputFormat;

const WORD_LEVEL_TIMESTAMPS: &str = "AddWordLevelTimestamps";

pub fn run(command: TranscriptCommand, session: &mut Session<'_>) -> Result<ExitSignal> {
    match command {
        TranscriptCommand::Create {
            create,
            locale,
            recording,
            model,
            language_model,
            word_level_timestamps,
        } => {
            let definition = definition(
                &create,
                locale,
                recording,
                [model, language_model],
                word_level_timestamps,
            );
            session.println("Creating transcript...");
            let api = session.api;
            Ok(session.poller().create_and_wait(
                || api.create_transcription(&definition),
                create.wait,
                |id| api.get_transcription(id),
            ))
        }
        TranscriptCommand::List => list(session),
        TranscriptCommand::Show { id } => {
            session.println("Getting transcription...");
            let transcription = session.api.get_transcription(id).map_err(|e| session.api_failure(e))?;
            session.print_json(&transcription)?;
            Ok(ExitSignal::Success)
        }
        TranscriptCommand::Update {
            id,
            name,
            description,
        } => {
            session.println(&format!("Updating transcription {id}..."));
            let update = TranscriptionUpdate { name, description };
            session
                .api
                .update_transcription(id, &update)
                .map_err(|e| session.api_failure(e))?;
            Ok(ExitSignal::Success)
        }
        TranscriptCommand::Delete { id } => {
            session.println("Deleting transcription...");
            session.api.delete_transcription(id).map_err(|e| session.api_failure(e))?;
            session.println("Done.");
            Ok(ExitSignal::Success)
        }
        TranscriptCommand::Download {
            id,
            out_dir,
            format,
            file_name,
        } => download(session, id, out_dir, format.as_deref(), file_name.as_deref()),
    }
}

fn definition(
    create: &CreateArgs,
    locale: Option<String>,
    recording: Option<String>,
    models: [Option<Uuid>; 2],
    word_level_timestamps: bool,
) -> TranscriptionDefinition {
    let mut properties = split_properties(create.properties.as_deref());
    if word_level_timestamps {
        properties
            .get_or_insert_with(Properties::new)
            .insert(WORD_LEVEL_TIMESTAMPS.to_string(), "True".to_string());
    }

    TranscriptionDefinition {
        name: create.name.clone(),
        description: create.description.clone(),
        locale: locale_or_default(locale),
        recordings_url: recording,
        models: models.into_iter().flatten().map(|id| ModelIdentity { id }).collect(),
        properties,
    }
}

fn list(session: &mut Session<'_>) -> Result<ExitSignal> {
    session.println("Getting transcriptions...");
    let transcriptions = session.api.get_transcriptions().map_err(|e| session.api_failure(e))?;

    if transcriptions.is_empty() {
        session.println("No transcriptions found.");
    }
    for t in &transcriptions {
        session.println(&format!("{:>30} {} {}", t.id, t.name, t.status));
    }

    Ok(ExitSignal::Success)
}

fn download(
    session: &mut Session<'_>,
    id: Uuid,
    out_dir: Option<PathBuf>,
    format: Option<&str>,
    file_name: Option<&str>,
) -> Result<ExitSignal> {
    let out_dir = match out_dir {
        Some(dir) => dir,
        None => std::env::current_dir().context("Failed to resolve the current directory")?,
    };
    let format = OutputFormat::from_tag(format);

    session.println("Getting transcription...");
    let api = session.api;
    let transcription = api.get_transcription(id).map_err(|e| session.api_failure(e))?;

    if transcription.results_urls.is_empty() {
        session.console.eprintln(&format!(
            "No results available for transcription {id} (status: {}).",
            transcription.status
        ));
        return Ok(ExitSignal::Failure);
    }

    for (channel, url) in &transcription.results_urls {
        let result = match api.fetch_transcription_result(url) {
            Ok(result) => result,
            Err(e) => {
                warn!("Download of {channel} failed: {e}");
                session.console.eprintln(&format!("Unable to download {channel}: {e}"));
                return Ok(ExitSignal::Failure);
            }
        };

        let rendered = format.render(&result)?;
        let base_name = match file_name {
            Some(name) => name.to_string(),
            None => result
                .audio_file_results
                .first()
                .map(|file| file.audio_file_name.clone())
                .context("Transcription result contains no audio files")?,
        };

        fs::create_dir_all(&out_dir)
            .with_context(|| format!("Failed to create directory {}", out_dir.display()))?;
        let path = out_dir.join(format!("{base_name}{}", rendered.extension));
        fs::write(&path, &rendered.text)
            .with_context(|| format!("Failed to write {}", path.display()))?;

        info!("Wrote {channel} of {id} to {}", path.display());
        session.println(&format!("File {} written.", path.display()));
    }

    Ok(ExitSignal::Success)
}
