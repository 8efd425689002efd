use anyhow::Result;
use uuid::Uuid;

use super::{Session, format_created, locale_or_default, print_locales, split_properties};
use crate::cli::{CreateArgs, ModelCommand, ModelLocaleKind};
use crate::dto::{DatasetIdentity, Model, ModelDefinition, ModelIdentity};
use crate::poller::ExitSignal;

const PURPOSE_PROPERTY: &str = "Purpose";

pub fn run(command: ModelCommand, session: &mut Session<'_>) -> Result<ExitSignal> {
    match command {
        ModelCommand::Create {
            create,
            locale,
            audio_dataset,
            language_dataset,
            pronunciation_dataset,
            scenario,
        } => {
            let Some(definition) = definition(
                &create,
                locale,
                audio_dataset,
                language_dataset,
                pronunciation_dataset,
                scenario,
            ) else {
                session
                    .console
                    .eprintln("Either --audio-dataset or --language-dataset has to be provided.");
                return Ok(ExitSignal::Failure);
            };

            session.println("Creating model...");
            let api = session.api;
            Ok(session.poller().create_and_wait(
                || api.create_model(&definition),
                create.wait,
                |id| api.get_model(id),
            ))
        }
        ModelCommand::List => {
            session.println("Getting models...");
            let models = session.api.get_models().map_err(|e| session.api_failure(e))?;

            // Scenario models come back in the same listing; only trained ones are shown.
            let mut models: Vec<Model> = models.into_iter().filter(|m| m.base_model.is_some()).collect();
            if models.is_empty() {
                session.println("No models found.");
            }
            models.sort_by(|a, b| a.model_kind.cmp(&b.model_kind));
            for m in &models {
                session.println(&format!("{:>30} {:>25} {} {}", m.id, m.name, m.model_kind, m.status));
            }
            Ok(ExitSignal::Success)
        }
        ModelCommand::ListScenarios {
            locale,
            purpose,
            simple,
        } => list_scenarios(session, &locale_or_default(locale), &purpose, simple),
        ModelCommand::Status { id, simple } => {
            if !simple {
                session.println("Getting model...");
            }
            let model = session.api.get_model(id).map_err(|e| session.api_failure(e))?;
            if simple {
                session.println(&model.status.to_string());
            } else {
                session.println(&format!("{:>30} {:<25} {}", model.id, model.name, model.status));
            }
            Ok(ExitSignal::Success)
        }
        ModelCommand::Delete { id } => {
            session.println("Deleting model...");
            session.api.delete_model(id).map_err(|e| session.api_failure(e))?;
            session.println("Done.");
            Ok(ExitSignal::Success)
        }
        ModelCommand::Locales { kind, simple } => {
            let locales = session.api.get_model_locales().map_err(|e| session.api_failure(e))?;
            let (name, locales) = match kind {
                ModelLocaleKind::Acoustic => ("acoustic", locales.acoustic),
                ModelLocaleKind::Language => ("language", locales.language),
            };
            print_locales(session, name, "models", locales, simple);
            Ok(ExitSignal::Success)
        }
    }
}

/// An acoustic dataset trains an acoustic model. Otherwise the language
/// dataset, optionally paired with a pronunciation dataset, trains a
/// language model. `None` when neither dataset was given.
fn definition(
    create: &CreateArgs,
    locale: Option<String>,
    audio_dataset: Option<Uuid>,
    language_dataset: Option<Uuid>,
    pronunciation_dataset: Option<Uuid>,
    scenario: Uuid,
) -> Option<ModelDefinition> {
    let (model_kind, datasets) = match (audio_dataset, language_dataset) {
        (Some(audio), _) => ("Acoustic", vec![audio]),
        (None, Some(language)) => {
            let mut datasets = vec![language];
            datasets.extend(pronunciation_dataset);
            ("Language", datasets)
        }
        (None, None) => return None,
    };

    Some(ModelDefinition {
        name: create.name.clone(),
        description: create.description.clone(),
        locale: locale_or_default(locale),
        model_kind: model_kind.to_string(),
        base_model: ModelIdentity { id: scenario },
        datasets: datasets.into_iter().map(|id| DatasetIdentity { id }).collect(),
        properties: split_properties(create.properties.as_deref()),
    })
}

fn is_scenario_for(model: &Model, locale: &str, purpose: &str) -> bool {
    if model.base_model.is_some() || !model.locale.eq_ignore_ascii_case(locale) {
        return false;
    }
    purpose.eq_ignore_ascii_case("all")
        || model
            .properties
            .get(PURPOSE_PROPERTY)
            .is_some_and(|purposes| purposes.contains(purpose))
}

fn list_scenarios(session: &mut Session<'_>, locale: &str, purpose: &str, simple: bool) -> Result<ExitSignal> {
    if !simple {
        session.println(&format!("Getting scenarios for {locale}..."));
    }
    let models = session.api.get_models().map_err(|e| session.api_failure(e))?;

    let mut scenarios: Vec<Model> = models
        .into_iter()
        .filter(|m| is_scenario_for(m, locale, purpose))
        .collect();
    if scenarios.is_empty() {
        session.println("No scenario models found.");
        return Ok(ExitSignal::Success);
    }

    scenarios.sort_by(|a, b| b.created_date_time.cmp(&a.created_date_time));
    for s in &scenarios {
        if simple {
            session.println(&s.id.to_string());
        } else {
            session.println(&format!(
                "{:>30} {:>30} {}",
                s.id,
                s.name,
                format_created(s.created_date_time)
            ));
        }
    }
    Ok(ExitSignal::Success)
}
