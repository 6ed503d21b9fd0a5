use super::*;
use crate::format::ColorChoice;
use libdockhand::auth::IdentityKind;
use libdockhand::engine::{EngineOutput, ImageSummary};
use libdockhand::prompt::ScriptedPrompt;
use mockito::Server;
use std::cell::RefCell;
use std::path::PathBuf;

/// Accepts every login and records pulls and scans
#[derive(Default)]
struct RecordingEngine {
    pulls: RefCell<Vec<String>>,
    scans: RefCell<Vec<String>>,
}

fn ok() -> Result<EngineOutput> {
    Ok(EngineOutput {
        success: true,
        ..Default::default()
    })
}

impl Engine for RecordingEngine {
    fn login(&self, _identity: &str, _token: &str) -> Result<EngineOutput> {
        ok()
    }

    fn pull(&self, reference: &str) -> Result<EngineOutput> {
        self.pulls.borrow_mut().push(reference.to_string());
        ok()
    }

    fn scan(&self, reference: &str) -> Result<EngineOutput> {
        self.scans.borrow_mut().push(reference.to_string());
        ok()
    }

    fn list_images(&self) -> Result<Vec<ImageSummary>> {
        Ok(Vec::new())
    }

    fn remove_image(&self, _reference: &str, _force: bool) -> Result<EngineOutput> {
        ok()
    }

    fn health(&self) -> Result<EngineOutput> {
        ok()
    }
}

fn test_ctx(hub_url: &str) -> AppContext {
    AppContext {
        color: ColorChoice::Never,
        verbosity: VerbosityLevel::Normal,
        debug: false,
        hub_url: hub_url.to_string(),
        credentials_path: PathBuf::from("credentials.env"),
    }
}

/// Prompt whose input stream is already closed
struct ClosedPrompt;

impl Prompt for ClosedPrompt {
    fn ask(&mut self, _message: &str) -> Result<Option<String>> {
        Err(closed())
    }

    fn ask_secret(&mut self, _message: &str) -> Result<Option<String>> {
        Err(closed())
    }

    fn confirm(&mut self, _message: &str, _default: bool) -> Result<bool> {
        Err(closed())
    }

    fn present(&mut self, _title: &str, _choices: &SelectionList) -> Result<()> {
        Ok(())
    }
}

fn closed() -> libdockhand::DockhandError {
    libdockhand::DockhandError::prompt_with_source(
        "Failed to read answer",
        std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "stdin closed"),
    )
}

fn acme() -> Credential {
    Credential::new("acme", "tok", IdentityKind::Organization).unwrap()
}

#[test]
fn test_login_policy_from_flags() {
    assert_eq!(LoginPolicy::from_flags(false, false), LoginPolicy::Auto);
    assert_eq!(LoginPolicy::from_flags(false, true), LoginPolicy::Public);
    assert_eq!(LoginPolicy::from_flags(true, false), LoginPolicy::RequireOrganization);
    // --org wins over --public
    assert_eq!(LoginPolicy::from_flags(true, true), LoginPolicy::RequireOrganization);
}

#[test]
fn test_repository_question_per_mode() {
    let auth = Authenticator::new(
        RecordingEngine::default(),
        Client::new("http://127.0.0.1:9").unwrap(),
    );
    let org = auth.login(&acme()).unwrap();
    let public = Session::new();

    assert_eq!(
        repository_question(&ResolveMode::OrganizationScoped, &org),
        "Repository in acme (name or name:tag)"
    );
    assert_eq!(
        repository_question(&ResolveMode::ListSelection(SelectionList::default()), &public),
        "Number from the list, or an image reference"
    );
    assert!(repository_question(&ResolveMode::FreeEntry, &public).starts_with("Image reference"));
}

#[tokio::test]
async fn test_round_with_input_asks_nothing() {
    let client = Client::new("http://127.0.0.1:9").unwrap();
    let auth = Authenticator::new(RecordingEngine::default(), client.clone());
    let session = Session::new();
    let round = Round {
        client: &client,
        session: &session,
        credential: None,
    };

    let mut prompt = ScriptedPrompt::default();
    let reference = round
        .resolve(&test_ctx(client.hub_url()), &auth, &mut prompt, Some("nginx:1.27"))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(reference.to_string(), "nginx:1.27");
    assert!(prompt.questions().is_empty());
}

#[tokio::test]
async fn test_public_round_searches_then_picks_by_number() {
    let mut server = Server::new_async().await;
    let search = server
        .mock("GET", "/v2/search/repositories/?query=redis&page_size=25")
        .with_status(200)
        .with_body(r#"{"results":[{"repo_name":"redis"},{"repo_name":"bitnami/redis"}]}"#)
        .create_async()
        .await;
    let tags = server
        .mock("GET", "/v2/repositories/bitnami/redis/tags?page_size=25")
        .with_status(200)
        .with_body(r#"{"results":[{"name":"7.2"},{"name":"7.0"}]}"#)
        .create_async()
        .await;

    let client = Client::new(&server.url()).unwrap();
    let auth = Authenticator::new(RecordingEngine::default(), client.clone());
    let session = Session::new();
    let round = Round {
        client: &client,
        session: &session,
        credential: None,
    };

    let mut prompt = ScriptedPrompt::new(["redis", "2", ""]);
    let reference = round
        .resolve(&test_ctx(&server.url()), &auth, &mut prompt, None)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(reference.to_string(), "bitnami/redis:latest");
    assert_eq!(prompt.questions()[1], "Number from the list, or an image reference");
    assert_eq!(prompt.presented()[0].0, "Search results for 'redis'");
    assert_eq!(prompt.presented()[1].0, "Tags for bitnami/redis");
    search.assert_async().await;
    tags.assert_async().await;
}

#[tokio::test]
async fn test_organization_round_lists_repositories() {
    let mut server = Server::new_async().await;
    let listing = server
        .mock("GET", "/v2/repositories/acme/?page_size=100")
        .match_header("authorization", "Basic YWNtZTp0b2s=")
        .with_status(200)
        .with_body(r#"{"results":[{"name":"api"},{"name":"web"}]}"#)
        .create_async()
        .await;
    let tags = server
        .mock("GET", "/v2/repositories/acme/web/tags?page_size=25")
        .with_status(200)
        .with_body(r#"{"results":[{"name":"3.0"}]}"#)
        .create_async()
        .await;

    let client = Client::new(&server.url()).unwrap();
    let auth = Authenticator::new(RecordingEngine::default(), client.clone());
    let credential = acme();
    let session = auth.login(&credential).unwrap();
    let round = Round {
        client: &client,
        session: &session,
        credential: Some(&credential),
    };

    let mut prompt = ScriptedPrompt::new(["2", "1"]);
    let reference = round
        .resolve(&test_ctx(&server.url()), &auth, &mut prompt, None)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(reference.to_string(), "acme/web:3.0");
    assert_eq!(prompt.presented()[0].0, "Repositories in acme");
    listing.assert_async().await;
    tags.assert_async().await;
}

#[tokio::test]
async fn test_empty_answers_skip_the_round() {
    let client = Client::new("http://127.0.0.1:9").unwrap();
    let auth = Authenticator::new(RecordingEngine::default(), client.clone());
    let session = Session::new();
    let round = Round {
        client: &client,
        session: &session,
        credential: None,
    };

    let mut prompt = ScriptedPrompt::default();
    let reference = round
        .resolve(&test_ctx(client.hub_url()), &auth, &mut prompt, None)
        .await
        .unwrap();

    assert!(reference.is_none());
    assert_eq!(prompt.questions().len(), 2);
}

#[tokio::test]
async fn test_out_of_range_pick_is_an_error() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/v2/search/repositories/?query=redis&page_size=25")
        .with_status(200)
        .with_body(r#"{"results":[{"repo_name":"redis"},{"repo_name":"bitnami/redis"}]}"#)
        .create_async()
        .await;

    let client = Client::new(&server.url()).unwrap();
    let auth = Authenticator::new(RecordingEngine::default(), client.clone());
    let session = Session::new();
    let round = Round {
        client: &client,
        session: &session,
        credential: None,
    };

    let mut prompt = ScriptedPrompt::new(["redis", "3"]);
    let err = round
        .resolve(&test_ctx(&server.url()), &auth, &mut prompt, None)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        libdockhand::DockhandError::SelectionOutOfRange { index: 3, len: 2 }
    ));
}

#[test]
fn test_pull_without_scan_when_declined() {
    let engine = RecordingEngine::default();
    let mut prompt = ScriptedPrompt::new(["n"]);
    let reference: RegistryReference = "nginx:1.27".parse().unwrap();

    pull_and_scan(&test_ctx("http://127.0.0.1:9"), &engine, &mut prompt, &reference, false);

    assert_eq!(*engine.pulls.borrow(), vec!["nginx:1.27".to_string()]);
    assert!(engine.scans.borrow().is_empty());
    assert_eq!(prompt.questions(), ["Scan nginx:1.27 for vulnerabilities?"]);
}

#[test]
fn test_scan_flag_skips_the_question() {
    let engine = RecordingEngine::default();
    let mut prompt = ScriptedPrompt::default();
    let reference: RegistryReference = "acme/web:3.0".parse().unwrap();

    pull_and_scan(&test_ctx("http://127.0.0.1:9"), &engine, &mut prompt, &reference, true);

    assert_eq!(*engine.scans.borrow(), vec!["acme/web:3.0".to_string()]);
    assert!(prompt.questions().is_empty());
}

#[test]
fn test_closed_input_at_scan_question_skips_scan() {
    let engine = RecordingEngine::default();
    let reference: RegistryReference = "nginx:1.27".parse().unwrap();

    let ctx = test_ctx("http://127.0.0.1:9");
    pull_and_scan(&ctx, &engine, &mut ClosedPrompt, &reference, false);

    assert_eq!(*engine.pulls.borrow(), vec!["nginx:1.27".to_string()]);
    assert!(engine.scans.borrow().is_empty());
}

#[test]
fn test_closed_input_is_ignored_with_scan_flag() {
    let engine = RecordingEngine::default();
    let reference: RegistryReference = "nginx:1.27".parse().unwrap();

    let ctx = test_ctx("http://127.0.0.1:9");
    pull_and_scan(&ctx, &engine, &mut ClosedPrompt, &reference, true);

    assert_eq!(*engine.scans.borrow(), vec!["nginx:1.27".to_string()]);
}
