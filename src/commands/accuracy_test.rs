use anyhow::Result;

use super::{Session, split_properties};
use crate::cli::TestCommand;
use crate::dto::{DatasetIdentity, ModelIdentity, TestDefinition};
use crate::poller::ExitSignal;

pub fn run(command: TestCommand, session: &mut Session<'_>) -> Result<ExitSignal> {
    match command {
        TestCommand::Create {
            create,
            audio_dataset,
            model,
            language_model,
        } => {
            let definition = TestDefinition {
                name: create.name.clone(),
                description: create.description.clone(),
                dataset: DatasetIdentity { id: audio_dataset },
                models: vec![ModelIdentity { id: model }, ModelIdentity { id: language_model }],
                properties: split_properties(create.properties.as_deref()),
            };

            session.println("Creating test...");
            let api = session.api;
            Ok(session.poller().create_and_wait(
                || api.create_accuracy_test(&definition),
                create.wait,
                |id| api.get_accuracy_test(id),
            ))
        }
        TestCommand::List => {
            session.println("Getting accuracy tests...");
            let tests = session.api.get_accuracy_tests().map_err(|e| session.api_failure(e))?;

            if tests.is_empty() {
                session.println("No tests found.");
            }
            for t in &tests {
                let wer = t.word_error_rate.unwrap_or_default() * 100.0;
                session.println(&format!("{:>30} {:<25} {} {wer:.1}%", t.id, t.name, t.status));
            }
            Ok(ExitSignal::Success)
        }
        TestCommand::Show { id } => {
            session.println("Getting test...");
            let test = session.api.get_accuracy_test(id).map_err(|e| session.api_failure(e))?;
            session.print_json(&test)?;
            Ok(ExitSignal::Success)
        }
        TestCommand::Status { id, simple } => {
            let test = session.api.get_accuracy_test(id).map_err(|e| session.api_failure(e))?;
            if simple {
                session.println(&test.status.to_string());
            } else {
                session.println(&format!("{:>30} {:<25} {}", test.id, test.name, test.status));
            }
            Ok(ExitSignal::Success)
        }
        TestCommand::Delete { id } => {
            session.println("Deleting test...");
            session.api.delete_accuracy_test(id).map_err(|e| session.api_failure(e))?;
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
    use crate::poller::UNAUTHORIZED_HINT;
    use serde_json::json;
    use uuid::Uuid;

    const ID: Uuid = Uuid::from_u128(0x7e57);

    fn create(wait: bool) -> TestCommand {
        TestCommand::Create {
            create: CreateArgs {
                name: "baseline".to_string(),
                description: Some("nightly".to_string()),
                properties: None,
                wait,
            },
            audio_dataset: Uuid::from_u128(1),
            model: Uuid::from_u128(2),
            language_model: Uuid::from_u128(3),
        }
    }

    #[test]
    fn test_create_sends_both_models() {
        let api = FakeApi::default();
        let (result, console) = run_with(&api, |session| run(create(false), session));

        assert_eq!(result.unwrap(), ExitSignal::Success);
        assert_eq!(console.out, format!("Creating test...\nCreated.\n{NEW_ID}\n"));

        let body = &api.created.borrow()[0];
        assert_eq!(body["dataset"]["id"], Uuid::from_u128(1).to_string());
        assert_eq!(body["models"][0]["id"], Uuid::from_u128(2).to_string());
        assert_eq!(body["models"][1]["id"], Uuid::from_u128(3).to_string());
        assert_eq!(body["description"], "nightly");
    }

    #[test]
    fn test_create_unauthorized() {
        let api = FakeApi::failing("Unauthorized", "Access denied.");
        let (result, console) = run_with(&api, |session| run(create(true), session));

        assert_eq!(result.unwrap(), ExitSignal::Failure);
        assert_eq!(console.out, "Creating test...\n");
        assert_eq!(
            console.err,
            format!("{UNAUTHORIZED_HINT}\nAPI call ended with error: Access denied.\n")
        );
    }

    #[test]
    fn test_list_prints_word_error_rate() {
        let api = FakeApi {
            tests: vec![entity(json!({
                "id": ID, "name": "nightly", "status": "Succeeded", "wordErrorRate": 0.1234
            }))],
            ..Default::default()
        };
        let (_, console) = run_with(&api, |session| run(TestCommand::List, session));

        assert_eq!(
            console.out,
            format!("Getting accuracy tests...\n{ID} nightly                   Succeeded 12.3%\n")
        );
    }

    #[test]
    fn test_list_without_tests() {
        let api = FakeApi::default();
        let (_, console) = run_with(&api, |session| run(TestCommand::List, session));
        assert_eq!(console.out, "Getting accuracy tests...\nNo tests found.\n");
    }

    #[test]
    fn test_status_simple() {
        let api = FakeApi {
            tests: vec![entity(json!({ "id": ID, "name": "nightly", "status": "NotStarted" }))],
            ..Default::default()
        };
        let (_, console) = run_with(&api, |session| run(TestCommand::Status { id: ID, simple: true }, session));
        assert_eq!(console.out, "NotStarted\n");
    }

    #[test]
    fn test_show_prints_json() {
        let api = FakeApi {
            tests: vec![entity(json!({ "id": ID, "name": "nightly", "status": "Running", "lastActionDateTime": "x" }))],
            ..Default::default()
        };
        let (_, console) = run_with(&api, |session| run(TestCommand::Show { id: ID }, session));

        let json = console.out.strip_prefix("Getting test...\n").unwrap();
        let value: serde_json::Value = serde_json::from_str(json).unwrap();
        assert_eq!(value["status"], "Running");
        assert_eq!(value["lastActionDateTime"], "x");
    }

    #[test]
    fn test_delete() {
        let api = FakeApi::default();
        let (_, console) = run_with(&api, |session| run(TestCommand::Delete { id: ID }, session));

        assert_eq!(console.out, "Deleting test...\nDone.\n");
        assert_eq!(*api.calls.borrow(), vec![format!("delete_accuracy_test {ID}")]);
    }
}
