use super::*;
use libdockhand::engine::EngineOutput;
use libdockhand::prompt::ScriptedPrompt;
use std::cell::RefCell;

/// Lists two images and records removals
#[derive(Default)]
struct InventoryEngine {
    refuse_removal: bool,
    removed: RefCell<Vec<(String, bool)>>,
}

impl Engine for InventoryEngine {
    fn login(&self, _identity: &str, _token: &str) -> Result<EngineOutput> {
        Ok(EngineOutput::default())
    }

    fn pull(&self, _reference: &str) -> Result<EngineOutput> {
        Ok(EngineOutput::default())
    }

    fn scan(&self, _reference: &str) -> Result<EngineOutput> {
        Ok(EngineOutput::default())
    }

    fn list_images(&self) -> Result<Vec<ImageSummary>> {
        Ok(vec![
            ImageSummary {
                repository: "nginx".to_string(),
                tag: "1.27".to_string(),
                id: "a1b2c3".to_string(),
                size: "192MB".to_string(),
                created: "2 weeks ago".to_string(),
            },
            ImageSummary {
                repository: "acme/web".to_string(),
                tag: "3.0".to_string(),
                id: "d4e5f6".to_string(),
                size: "80MB".to_string(),
                created: "3 days ago".to_string(),
            },
        ])
    }

    fn remove_image(&self, reference: &str, force: bool) -> Result<EngineOutput> {
        self.removed
            .borrow_mut()
            .push((reference.to_string(), force));
        Ok(EngineOutput {
            success: !self.refuse_removal,
            stdout: String::new(),
            stderr: if self.refuse_removal {
                "Error response from daemon: conflict: unable to remove repository reference\n"
                    .to_string()
            } else {
                String::new()
            },
        })
    }

    fn health(&self) -> Result<EngineOutput> {
        Ok(EngineOutput::default())
    }
}

#[test]
fn test_image_rows_keep_engine_order() {
    let rows = image_rows(&InventoryEngine::default()).unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].repository, "nginx");
    assert_eq!(rows[1].id, "d4e5f6");
}

#[test]
fn test_image_table_has_docker_headers() {
    let rows = image_rows(&InventoryEngine::default()).unwrap();
    let table = format::format_table(&rows, OutputFormat::Pretty).unwrap();

    assert!(table.contains("REPOSITORY"));
    assert!(table.contains("IMAGE ID"));
    assert!(table.contains("acme/web"));
}

#[test]
fn test_remove_asks_first() {
    let engine = InventoryEngine::default();
    let mut prompt = ScriptedPrompt::new(["y"]);

    assert!(remove_image(&engine, &mut prompt, "nginx:1.27", false).unwrap());
    assert_eq!(prompt.questions(), ["Remove image 'nginx:1.27'?"]);
    assert_eq!(
        *engine.removed.borrow(),
        vec![("nginx:1.27".to_string(), false)]
    );
}

#[test]
fn test_declined_remove_touches_nothing() {
    let engine = InventoryEngine::default();
    let mut prompt = ScriptedPrompt::new(["n"]);

    assert!(!remove_image(&engine, &mut prompt, "nginx:1.27", false).unwrap());
    assert!(engine.removed.borrow().is_empty());
}

#[test]
fn test_forced_remove_does_not_ask() {
    let engine = InventoryEngine::default();
    let mut prompt = ScriptedPrompt::default();

    assert!(remove_image(&engine, &mut prompt, "acme/web:3.0", true).unwrap());
    assert!(prompt.questions().is_empty());
    assert_eq!(
        *engine.removed.borrow(),
        vec![("acme/web:3.0".to_string(), true)]
    );
}

#[test]
fn test_refused_remove_reports_engine_message() {
    let engine = InventoryEngine {
        refuse_removal: true,
        ..Default::default()
    };
    let mut prompt = ScriptedPrompt::default();

    let err = remove_image(&engine, &mut prompt, "nginx:1.27", true).unwrap_err();
    assert!(err.to_string().contains("conflict: unable to remove"));
}
