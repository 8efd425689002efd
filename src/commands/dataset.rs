use std::path::{Path, PathBuf};

use anyhow::{Result, bail};

use super::{Session, format_created, locale_or_default, print_locales, split_properties};
use crate::cli::{CreateArgs, DatasetCommand, DatasetLocaleKind};
use crate::dto::{DatasetKind, DatasetUpload};
use crate::poller::ExitSignal;

pub fn run(command: DatasetCommand, session: &mut Session<'_>) -> Result<ExitSignal> {
    match command {
        DatasetCommand::Create {
            create,
            locale,
            audio,
            transcript,
            language,
        } => create_datasets(session, create, locale, audio, transcript, language),
        DatasetCommand::List => {
            session.println("Getting datasets...");
            let mut datasets = session.api.get_datasets().map_err(|e| session.api_failure(e))?;

            if datasets.is_empty() {
                session.println("No datasets found.");
            }
            datasets.sort_by(|a, b| a.data_import_kind.cmp(&b.data_import_kind));
            for d in &datasets {
                session.println(&format!(
                    "{:<30} {:<25} {:>20} {:>5} {:>10} {}",
                    d.id,
                    d.name,
                    format_created(d.created_date_time),
                    d.locale,
                    d.data_import_kind,
                    d.status
                ));
            }
            Ok(ExitSignal::Success)
        }
        DatasetCommand::Show { id } => {
            session.println("Getting dataset...");
            let dataset = session.api.get_dataset(id).map_err(|e| session.api_failure(e))?;
            session.print_json(&dataset)?;
            Ok(ExitSignal::Success)
        }
        DatasetCommand::Delete { id } => {
            session.println("Deleting dataset...");
            session.api.delete_dataset(id).map_err(|e| session.api_failure(e))?;
            session.println("Done.");
            Ok(ExitSignal::Success)
        }
        DatasetCommand::Locales { kind, simple } => {
            let locales = session.api.get_dataset_locales().map_err(|e| session.api_failure(e))?;
            let (name, locales) = match kind {
                DatasetLocaleKind::Acoustic => ("acoustic", locales.acoustic),
                DatasetLocaleKind::Language => ("language", locales.language),
                DatasetLocaleKind::Pronunciation => ("pronunciation", locales.pronunciation),
            };
            print_locales(session, name, "datasets", locales, simple);
            Ok(ExitSignal::Success)
        }
    }
}

fn ensure_file(path: &Path) -> Result<()> {
    if !path.is_file() {
        bail!("File not found: {}", path.display());
    }
    Ok(())
}

/// Uploads an acoustic dataset, a language dataset, or both. The result is a
/// failure when any of the uploads failed.
fn create_datasets(
    session: &mut Session<'_>,
    create: CreateArgs,
    locale: Option<String>,
    audio: Option<PathBuf>,
    transcript: Option<PathBuf>,
    language: Option<PathBuf>,
) -> Result<ExitSignal> {
    let mut uploads = Vec::new();
    if let (Some(audio), Some(transcriptions)) = (audio, transcript) {
        ensure_file(&audio)?;
        ensure_file(&transcriptions)?;
        uploads.push((
            "Uploading acoustic dataset...",
            DatasetKind::Acoustic {
                audio,
                transcriptions,
            },
        ));
    }
    if let Some(language) = language {
        ensure_file(&language)?;
        uploads.push(("Uploading language dataset...", DatasetKind::Language { language }));
    }

    if uploads.is_empty() {
        session
            .console
            .eprintln("Provide --audio and --transcript for an acoustic dataset, or --language for a language dataset.");
        return Ok(ExitSignal::Failure);
    }

    let properties = split_properties(create.properties.as_deref());
    let locale = locale_or_default(locale);
    let api = session.api;
    let mut outcome = ExitSignal::Success;

    for (message, kind) in uploads {
        let upload = DatasetUpload {
            name: create.name.clone(),
            description: create.description.clone(),
            locale: locale.clone(),
            kind,
            properties: properties.clone(),
        };
        session.println(message);
        let signal = session.poller().create_and_wait(
            || api.upload_dataset(&upload),
            create.wait,
            |id| api.get_dataset(id),
        );
        if signal == ExitSignal::Failure {
            outcome = ExitSignal::Failure;
        }
    }

    Ok(outcome)
}
