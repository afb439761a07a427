use super::*;
use crate::document::parse_document;
use crate::resolver::EnvSource;

#[derive(Default)]
struct FakeEnv {
    properties: HashMap<String, String>,
    env: HashMap<String, String>,
}

impl EnvSource for FakeEnv {
    fn property(&self, name: &str) -> Option<String> {
        self.properties.get(name).cloned()
    }

    fn env_var(&self, name: &str) -> Option<String> {
        self.env.get(name).cloned()
    }

    fn set_property(&mut self, name: &str, value: &str) {
        self.properties.insert(name.to_string(), value.to_string());
    }
}

#[test]
fn test_rebuild_collects_declarations_in_document_order() {
    let mut root = parse_document(
        r#"<agent>
            <variable name="a">repo</variable>
            <variable name="b">path</variable>
        </agent>"#,
    )
    .expect("parse");

    let store = VariableStore::rebuild(&mut root, &HashMap::new(), &FakeEnv::default())
        .expect("rebuild");
    assert_eq!(store.len(), 2);
    assert_eq!(store.get("a").map(VariableValue::value), Some("repo"));
    assert_eq!(store.get("b").map(VariableValue::value), Some("path"));
}

#[test]
fn test_rebuild_resolves_earlier_declarations_into_later_values() {
    let mut root = parse_document(
        r#"<agent>
            <variable name="root">/users/me</variable>
            <variable name="repo-path">${root}/.m2/repository</variable>
        </agent>"#,
    )
    .expect("parse");

    let store = VariableStore::rebuild(&mut root, &HashMap::new(), &FakeEnv::default())
        .expect("rebuild");
    assert_eq!(
        store.get("repo-path").map(VariableValue::value),
        Some("/users/me/.m2/repository")
    );
}

#[test]
fn test_rebuild_keeps_unresolvable_values_as_sentinels() {
    let mut root = parse_document(
        r#"<agent><variable name="log-dir">${undefined}/logs</variable></agent>"#,
    )
    .expect("parse");

    let store = VariableStore::rebuild(&mut root, &HashMap::new(), &FakeEnv::default())
        .expect("rebuild");
    assert_eq!(
        store.get("log-dir").map(VariableValue::value),
        Some("${undefined}/logs")
    );
}

#[test]
fn test_rebuild_requires_the_name_attribute() {
    let mut root =
        parse_document(r#"<agent><variable>orphan</variable></agent>"#).expect("parse");

    let result = VariableStore::rebuild(&mut root, &HashMap::new(), &FakeEnv::default());
    assert!(matches!(
        result,
        Err(DescriptorError::MissingRequiredField { .. })
    ));
}

#[test]
fn test_rebuild_resolves_the_default_and_writes_it_back() {
    let mut root = parse_document(
        r#"<agent>
            <variable name="base">/opt</variable>
            <variable name="log-dir" default="${base}/logs">${undefined}</variable>
        </agent>"#,
    )
    .expect("parse");

    let store = VariableStore::rebuild(&mut root, &HashMap::new(), &FakeEnv::default())
        .expect("rebuild");
    assert_eq!(store.get("log-dir").and_then(VariableValue::default), Some("/opt/logs"));

    // The resolved default is visible in the document for later rescans.
    let declaration = root
        .children_named("variable")
        .find(|v| v.attr("name") == Some("log-dir"))
        .expect("declaration");
    assert_eq!(declaration.attr("default"), Some("/opt/logs"));
}

#[test]
fn test_rebuild_reads_parameters_properties_and_environment() {
    let mut params = HashMap::new();
    params.insert("param".to_string(), "from-param".to_string());
    let mut env = FakeEnv::default();
    env.properties.insert("prop".to_string(), "from-prop".to_string());
    env.env.insert("envvar".to_string(), "from-env".to_string());

    let mut root = parse_document(
        r#"<agent><variable name="mixed">${param}:${prop}:${envvar}</variable></agent>"#,
    )
    .expect("parse");

    let store = VariableStore::rebuild(&mut root, &params, &env).expect("rebuild");
    assert_eq!(
        store.get("mixed").map(VariableValue::value),
        Some("from-param:from-prop:from-env")
    );
}

#[test]
fn test_rebuild_replaces_the_store_instead_of_merging() {
    let mut root = parse_document(
        r#"<agent><variable name="a">one</variable></agent>"#,
    )
    .expect("parse");
    let first = VariableStore::rebuild(&mut root, &HashMap::new(), &FakeEnv::default())
        .expect("rebuild");
    assert_eq!(first.len(), 1);

    // Rescanning a document whose declarations changed drops stale names.
    let mut changed = parse_document(
        r#"<agent><variable name="b">two</variable></agent>"#,
    )
    .expect("parse");
    let second = VariableStore::rebuild(&mut changed, &HashMap::new(), &FakeEnv::default())
        .expect("rebuild");
    assert_eq!(second.len(), 1);
    assert!(second.get("a").is_none());
    assert!(second.get("b").is_some());
}
