use super::*;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Serialize, PartialEq, tabled::Tabled)]
struct Row {
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "STARS")]
    stars: u64,
}

impl Formattable for Row {
    fn format_pretty(&self) -> String {
        format!("{} ({})", self.name, self.stars)
    }
}

fn rows() -> Vec<Row> {
    vec![
        Row {
            name: "nginx".to_string(),
            stars: 20000,
        },
        Row {
            name: "bitnami/nginx".to_string(),
            stars: 200,
        },
    ]
}

fn plain_ctx() -> AppContext {
    AppContext {
        color: ColorChoice::Never,
        verbosity: VerbosityLevel::Normal,
        debug: false,
        hub_url: "https://hub.docker.com".to_string(),
        credentials_path: PathBuf::from("credentials.env"),
    }
}

#[test]
fn test_output_format_from_string() {
    assert_eq!(OutputFormat::from("pretty"), OutputFormat::Pretty);
    assert_eq!(OutputFormat::from("JSON"), OutputFormat::Json);
    assert_eq!(OutputFormat::from("yml"), OutputFormat::Yaml);
    assert_eq!(OutputFormat::from("invalid"), OutputFormat::Pretty);
}

#[test]
fn test_color_choice_from_string() {
    assert_eq!(ColorChoice::from("always"), ColorChoice::Always);
    assert_eq!(ColorChoice::from("NEVER"), ColorChoice::Never);
    assert_eq!(ColorChoice::from("whatever"), ColorChoice::Auto);
    assert_eq!(ColorChoice::Never.to_string(), "never");
}

#[test]
fn test_color_choice_explicit_values() {
    assert!(ColorChoice::Always.enabled());
    assert!(!ColorChoice::Never.enabled());
}

#[test]
fn test_format_output_pretty_and_json() {
    let row = &rows()[0];
    assert_eq!(
        format_output(row, OutputFormat::Pretty).unwrap(),
        "nginx (20000)"
    );

    let json: serde_json::Value =
        serde_json::from_str(&format_output(row, OutputFormat::Json).unwrap()).unwrap();
    assert_eq!(json["name"], "nginx");
    assert_eq!(json["stars"], 20000);
}

#[test]
fn test_format_table_pretty_has_headers() {
    let table = format_table(&rows(), OutputFormat::Pretty).unwrap();
    assert!(table.contains("NAME"));
    assert!(table.contains("STARS"));
    assert!(table.contains("bitnami/nginx"));
}

#[test]
fn test_format_table_yaml() {
    let yaml = format_table(&rows(), OutputFormat::Yaml).unwrap();
    assert!(yaml.contains("name: nginx"));
    assert!(yaml.contains("stars: 200"));
}

#[test]
fn test_spinner_hidden_without_color() {
    let spinner = spinner(&plain_ctx(), "Searching");
    assert!(spinner.is_hidden());
    spinner.finish_and_clear();
}
