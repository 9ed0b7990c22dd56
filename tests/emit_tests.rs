/// Emit tests: JSON and YAML rendering of the parsed result.

use apib_parser::{emit, parse, ParseOptions};

const FIXTURE: &str = "\
# My API

# Message [/message]
+ Model (text/plain)

        Hello World!

## Retrieve a message [GET]
+ Response 200

    [Message][]
";

#[test]
fn json_shape_mirrors_the_product_tree() {
    let result = parse(FIXTURE, ParseOptions::default());
    assert!(result.report.error.is_none());

    let value = emit::result_to_json(&result);
    assert_eq!(value["_version"], "1.0");
    assert_eq!(value["ast"]["name"], "My API");
    assert_eq!(value["error"], serde_json::Value::Null);
    assert_eq!(value["warnings"].as_array().unwrap().len(), 0);

    let resource = &value["ast"]["resourceGroups"][0]["resources"][0];
    assert_eq!(resource["name"], "Message");
    assert_eq!(resource["uriTemplate"], "/message");
    assert_eq!(resource["model"]["body"], "Hello World!\n");
    assert_eq!(resource["model"]["contentType"], "text/plain");

    let response = &resource["actions"][0]["examples"][0]["responses"][0];
    assert_eq!(response["name"], "200");
    assert_eq!(response["body"], "Hello World!\n");
    assert_eq!(response["reference"]["id"], "Message");
    assert_eq!(response["reference"]["resolved"], true);

    // No source map unless requested.
    assert!(value.get("sourcemap").is_none());
}

#[test]
fn warnings_serialize_with_code_and_ranges() {
    let result = parse("# /1\n## GET\n+ Request\np1\n", ParseOptions::default());
    let value = emit::result_to_json(&result);

    let warnings = value["warnings"].as_array().unwrap();
    assert_eq!(warnings.len(), 2);
    assert_eq!(warnings[0]["code"], "IndentationWarning");
    assert_eq!(warnings[1]["code"], "EmptyDefinitionWarning");
    assert!(!warnings[0]["sourceMap"].as_array().unwrap().is_empty());
}

#[test]
fn fatal_errors_fill_the_error_slot() {
    let result = parse(
        "# Posts [/posts]\n+ Model\n\n        {}\n## List [GET]\n+ Response 200\n\n    [Post][]\n",
        ParseOptions::default(),
    );
    let value = emit::result_to_json(&result);
    assert_eq!(value["error"]["code"], "SymbolError");
    // The skeleton is still serialized.
    assert_eq!(
        value["ast"]["resourceGroups"][0]["resources"][0]["name"],
        "Posts"
    );
}

#[test]
fn sourcemap_serializes_when_exported() {
    let result = parse(
        FIXTURE,
        ParseOptions {
            export_sourcemap: true,
            ..ParseOptions::default()
        },
    );
    let value = emit::result_to_json(&result);
    let map = &value["sourcemap"];
    assert!(!map["name"].as_array().unwrap().is_empty());
    assert!(
        !map["resourceGroups"][0]["resources"][0]["node"]
            .as_array()
            .unwrap()
            .is_empty()
    );
}

#[test]
fn rendering_is_deterministic() {
    let first = emit::render_json(&emit::result_to_json(&parse(FIXTURE, ParseOptions::default())));
    let second = emit::render_json(&emit::result_to_json(&parse(FIXTURE, ParseOptions::default())));
    assert_eq!(first, second);
    assert!(first.ends_with('\n'));
}

#[test]
fn yaml_renders_the_same_tree() {
    let result = parse(FIXTURE, ParseOptions::default());
    let yaml = emit::render_yaml(&emit::result_to_json(&result));
    assert!(yaml.contains("uriTemplate: /message"));
    assert!(yaml.contains("name: My API"));
}
