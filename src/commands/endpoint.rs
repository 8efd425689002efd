use anyhow::Result;

use super::{Session, locale_or_default};
use crate::cli::EndpointCommand;
use crate::dto::{EndpointDefinition, ModelIdentity};
use crate::poller::ExitSignal;

pub fn run(command: EndpointCommand, session: &mut Session<'_>) -> Result<ExitSignal> {
    match command {
        EndpointCommand::Create {
            create,
            locale,
            model,
            language_model,
            concurrent_recognitions,
            content_logging,
        } => {
            let definition = EndpointDefinition {
                name: create.name.clone(),
                description: create.description.clone(),
                locale: locale_or_default(locale),
                models: vec![ModelIdentity { id: model }, ModelIdentity { id: language_model }],
                concurrent_recognitions,
                content_logging_enabled: content_logging,
            };

            session.println("Creating endpoint...");
            let api = session.api;
            Ok(session.poller().create_and_wait(
                || api.create_endpoint(&definition),
                create.wait,
                |id| api.get_endpoint(id),
            ))
        }
        EndpointCommand::List => {
            session.println("Getting endpoints...");
            session.println("");
            let endpoints = session.api.get_endpoints().map_err(|e| session.api_failure(e))?;

            if endpoints.is_empty() {
                session.println("No endpoints found.");
            }
            for e in &endpoints {
                session.println(&format!("{:>30} {:<25} {} {}", e.id, e.name, e.status, e.endpoint_kind));
            }
            Ok(ExitSignal::Success)
        }
        EndpointCommand::Show { id } => {
            session.println("Getting endpoint...");
            session.println("");
            let endpoint = session.api.get_endpoint(id).map_err(|e| session.api_failure(e))?;
            session.print_json(&endpoint)?;
            Ok(ExitSignal::Success)
        }
        EndpointCommand::Delete { id } => {
            session.println("Deleting endpoint...");
            session.api.delete_endpoint(id).map_err(|e| session.api_failure(e))?;
            session.println("Done.");
            Ok(ExitSignal::Success)
        }
        EndpointCommand::DeleteData { id } => {
            session.println("Deleting endpoint data...");
            session.api.delete_endpoint_data(id).map_err(|e| session.api_failure(e))?;
            session.println("Done.");
            Ok(ExitSignal::Success)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::CreateArgs;
    use crate::commands::fake::{FakeApi, NEW_ID, entity};
    use crate::commands::testing::run_with;
    use serde_json::json;
    use uuid::Uuid;

    const ID: Uuid = Uuid::from_u128(0xe9);

    #[test]
    fn test_create_and_wait_until_failed() {
        let api = FakeApi {
            endpoints: vec![entity(json!({ "id": NEW_ID, "name": "prod", "status": "Failed" }))],
            ..Default::default()
        };
        let command = EndpointCommand::Create {
            create: CreateArgs {
                name: "prod".to_string(),
                wait: true,
                ..Default::default()
            },
            locale: None,
            model: Uuid::from_u128(1),
            language_model: Uuid::from_u128(2),
            concurrent_recognitions: 4,
            content_logging: false,
        };
        let (result, console) = run_with(&api, |session| run(command, session));

        assert_eq!(result.unwrap(), ExitSignal::Failure);
        assert_eq!(console.out, "Creating endpoint...\nProcessing [...]\n");
        assert_eq!(console.err, "Processing failed.\n");

        let body = &api.created.borrow()[0];
        assert_eq!(body["concurrentRecognitions"], 4);
        assert_eq!(body["contentLoggingEnabled"], false);
        assert_eq!(body["locale"], "en-us");
        assert_eq!(body["models"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_list() {
        let api = FakeApi {
            endpoints: vec![entity(json!({
                "id": ID, "name": "prod", "status": "Succeeded", "endpointKind": "SpeechRecognition"
            }))],
            ..Default::default()
        };
        let (_, console) = run_with(&api, |session| run(EndpointCommand::List, session));

        assert_eq!(
            console.out,
            format!("Getting endpoints...\n\n{ID} {:<25} Succeeded SpeechRecognition\n", "prod")
        );
    }

    #[test]
    fn test_list_without_endpoints() {
        let api = FakeApi::default();
        let (_, console) = run_with(&api, |session| run(EndpointCommand::List, session));
        assert_eq!(console.out, "Getting endpoints...\n\nNo endpoints found.\n");
    }

    #[test]
    fn test_show_unknown_endpoint() {
        let api = FakeApi::default();
        let (result, console) = run_with(&api, |session| run(EndpointCommand::Show { id: ID }, session));

        assert!(result.is_err());
        assert_eq!(console.out, "Getting endpoint...\n\n");
        assert!(console.err.is_empty());
    }

    #[test]
    fn test_delete_data() {
        let api = FakeApi::default();
        let (result, console) = run_with(&api, |session| run(EndpointCommand::DeleteData { id: ID }, session));

        assert_eq!(result.unwrap(), ExitSignal::Success);
        assert_eq!(console.out, "Deleting endpoint data...\nDone.\n");
        assert_eq!(*api.calls.borrow(), vec![format!("delete_endpoint_data {ID}")]);
    }
}
