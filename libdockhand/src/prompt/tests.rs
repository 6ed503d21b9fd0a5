use super::*;

#[test]
fn test_scripted_prompt_answers_in_order() {
    let mut prompt = ScriptedPrompt::new(["acme", "  secret  ", "y"]);

    assert_eq!(prompt.ask("Organization").unwrap().as_deref(), Some("acme"));
    assert_eq!(
        prompt.ask_secret("Token").unwrap().as_deref(),
        Some("secret")
    );
    assert!(prompt.confirm("Save?", false).unwrap());
    assert_eq!(prompt.remaining(), 0);
    assert_eq!(prompt.questions(), ["Organization", "Token", "Save?"]);
}

#[test]
fn test_blank_answer_is_skip() {
    let mut prompt = ScriptedPrompt::new(["   "]);
    assert_eq!(prompt.ask("Tag").unwrap(), None);
}

#[test]
fn test_exhausted_script_is_skip() {
    let mut prompt = ScriptedPrompt::default();
    assert_eq!(prompt.ask("Repository").unwrap(), None);
    assert!(prompt.confirm("Scan?", true).unwrap());
    assert!(!prompt.confirm("Scan?", false).unwrap());
}

#[test]
fn test_confirm_unrecognized_answer_uses_default() {
    let mut prompt = ScriptedPrompt::new(["maybe", "NO"]);
    assert!(prompt.confirm("Save?", true).unwrap());
    assert!(!prompt.confirm("Save?", true).unwrap());
}

#[test]
fn test_present_records_lists() {
    let mut prompt = ScriptedPrompt::default();
    let list = SelectionList::build(["api", "web"]);
    prompt.present("Repositories", &list).unwrap();

    assert_eq!(prompt.presented().len(), 1);
    assert_eq!(prompt.presented()[0].0, "Repositories");
    assert_eq!(prompt.presented()[0].1, list);
}

#[test]
fn test_parse_yes_no() {
    assert_eq!(parse_yes_no("Y"), Some(true));
    assert_eq!(parse_yes_no(" yes "), Some(true));
    assert_eq!(parse_yes_no("n"), Some(false));
    assert_eq!(parse_yes_no("No"), Some(false));
    assert_eq!(parse_yes_no(""), None);
    assert_eq!(parse_yes_no("1"), None);
}
