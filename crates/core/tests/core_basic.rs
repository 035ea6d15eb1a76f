use triage_core::{extract, version};

#[test]
fn version_is_non_empty() {
    let v = version();
    assert!(!v.is_empty());
}

#[test]
fn default_options_recognize_both_keywords() {
    let options = extract::ExtractOptions::default();
    assert_eq!(options.keywords, vec!["test".to_string(), "it".to_string()]);
}
