use super::*;
use std::io::Write;

fn write_descriptor(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    write!(file, "{contents}").expect("write descriptor");
    file
}

#[test]
fn test_resolve_outcome_renders_the_full_picture() {
    let jar_dir = tempfile::tempdir().expect("temp dir");
    let jar = jar_dir.path().join("instrumentor-2.1.0.jar");
    std::fs::write(&jar, b"jar").expect("write jar");

    let descriptor = format!(
        "<agent>\
            <variable name=\"base\">{dir}</variable>\
            <delegate>instrumentor</delegate>\
            <classpath>\
                <entry>${{base}}/instrumentor-2.1.0.jar</entry>\
            </classpath>\
            <filter>\
                <include>^com/hapiware/.+</include>\
                <exclude>.*Test.*</exclude>\
            </filter>\
            <configuration>report</configuration>\
        </agent>",
        dir = jar_dir.path().display()
    );
    let file = write_descriptor(&descriptor);

    let outcome =
        resolve_outcome(&file.path().to_string_lossy()).expect("resolve");

    assert_eq!(outcome["delegate"], "instrumentor");
    assert_eq!(
        outcome["classpath"][0],
        jar.to_string_lossy().to_string()
    );
    assert_eq!(outcome["include"][0], "^com/hapiware/.+");
    assert_eq!(outcome["exclude"][0], ".*Test.*");
    assert_eq!(outcome["configuration"], "report");
}

#[test]
fn test_resolve_outcome_records_finalized_properties() {
    let descriptor = "<agent>\
        <variable name=\"mode\" default=\"tracing\">${BOOT_MODE_UNSET_FOR_TEST}</variable>\
        <delegate>instrumentor</delegate>\
        <configuration>${mode}</configuration>\
    </agent>";
    let file = write_descriptor(descriptor);

    let outcome =
        resolve_outcome(&file.path().to_string_lossy()).expect("resolve");

    assert_eq!(outcome["configuration"], "tracing");
    assert_eq!(outcome["properties"]["BOOT_MODE_UNSET_FOR_TEST"], "tracing");
}

#[test]
fn test_resolve_outcome_reports_a_missing_descriptor() {
    let error = resolve_outcome("/nonexistent/descriptor.xml").unwrap_err();
    assert!(matches!(error, Error::Boot(_)));
}

#[test]
fn test_resolve_outcome_reports_an_unresolvable_placeholder() {
    let descriptor = "<agent>\
        <delegate>instrumentor</delegate>\
        <configuration>\
            <item>${never-defined-anywhere}</item>\
        </configuration>\
    </agent>";
    let file = write_descriptor(descriptor);

    let error = resolve_outcome(&file.path().to_string_lossy()).unwrap_err();
    assert!(error
        .to_string()
        .contains("${never-defined-anywhere}"));
}

#[test]
fn test_custom_configuration_is_rendered_as_json() {
    let descriptor = "<agent>\
        <delegate>instrumentor</delegate>\
        <configuration>\
            <custom>\
                <sampling rate=\"5\">cpu</sampling>\
            </custom>\
        </configuration>\
    </agent>";
    let file = write_descriptor(descriptor);

    let outcome =
        resolve_outcome(&file.path().to_string_lossy()).expect("resolve");

    assert_eq!(outcome["configuration"]["sampling"]["@rate"], "5");
    assert_eq!(outcome["configuration"]["sampling"]["#text"], "cpu");
}
