use super::*;

#[test]
fn test_parse_image_table() {
    let output = "nginx\tlatest\tabc123\t187MB\t2 weeks ago\n\
                  futuresecureai/fsai-os-frontend\tv1.14.1\tdef456\t1.2GB\t3 days ago\n";

    let images = parse_image_table(output);
    assert_eq!(images.len(), 2);
    assert_eq!(images[0].repository, "nginx");
    assert_eq!(images[0].tag, "latest");
    assert_eq!(images[0].id, "abc123");
    assert_eq!(images[0].size, "187MB");
    assert_eq!(images[0].created, "2 weeks ago");
    assert_eq!(
        images[1].reference(),
        "futuresecureai/fsai-os-frontend:v1.14.1"
    );
}

#[test]
fn test_parse_image_table_skips_short_and_empty_lines() {
    let output = "\nbroken\tline\nredis\t7\tfff\t40MB\t1 hour ago\n";
    let images = parse_image_table(output);
    assert_eq!(images.len(), 1);
    assert_eq!(images[0].repository, "redis");
}

#[test]
fn test_parse_image_table_without_created_column() {
    let images = parse_image_table("redis\t7\tfff\t40MB");
    assert_eq!(images.len(), 1);
    assert_eq!(images[0].created, "");
}

#[test]
fn test_dangling_image_reference_is_id() {
    let image = ImageSummary {
        repository: "<none>".to_string(),
        tag: "<none>".to_string(),
        id: "0123abcd".to_string(),
        size: "1MB".to_string(),
        created: String::new(),
    };
    assert_eq!(image.reference(), "0123abcd");
}

#[test]
fn test_missing_program_is_engine_error() {
    let engine = DockerCli::with_program("/nonexistent/dockhand-test-docker");
    let result = engine.health();
    assert!(matches!(result, Err(DockhandError::Engine { .. })));
}
