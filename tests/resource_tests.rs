/// Resource processor tests: signature forms, models, deprecated headers,
/// description accumulation, and URI template validation.

use apib_parser::ast::{Blueprint, Resource};
use apib_parser::diagnostics::{ErrorCode, WarningCode};
use apib_parser::{parse, ParseOptions, ParseResult};

fn parse_ok(source: &str) -> ParseResult {
    let result = parse(source, ParseOptions::default());
    assert!(
        result.report.error.is_none(),
        "expected a clean parse, got error: {:?}",
        result.report.error
    );
    result
}

fn first_resource(blueprint: &Blueprint) -> &Resource {
    &blueprint.resource_groups[0].resources[0]
}

const RESOURCE_FIXTURE: &str = "\
# My Resource [/resource/{id}{?limit}]

Awesome description

+ Resource Model (text/plain)

        X.O.

+ Parameters
    + id = `1234` (optional, number, `0000`)

        Lorem ipsum
        + Values
            + `1234`
            + `0000`
            + `beef`
    + limit

## My Method [GET]

Method Description

+ Response 200 (text/plain)

        OK.
";

#[test]
fn parse_full_resource() {
    let result = parse_ok(RESOURCE_FIXTURE);
    assert!(result.report.warnings.is_empty(), "{:?}", result.report.warnings);

    let resource = first_resource(&result.blueprint);
    assert_eq!(resource.name, "My Resource");
    assert_eq!(resource.uri_template, "/resource/{id}{?limit}");
    assert_eq!(resource.description, "Awesome description\n\n");
    assert!(resource.headers.is_empty());

    let model = resource.model.as_ref().expect("model");
    assert_eq!(model.name, "Resource");
    assert_eq!(model.body, "X.O.\n");

    assert_eq!(resource.parameters.len(), 2);
    let id = &resource.parameters[0];
    assert_eq!(id.name, "id");
    assert_eq!(id.description, "Lorem ipsum\n");
    assert_eq!(id.default_value.as_deref(), Some("1234"));
    assert_eq!(id.example_value.as_deref(), Some("0000"));
    assert_eq!(id.type_name, "number");
    assert_eq!(id.values, vec!["1234", "0000", "beef"]);
    assert_eq!(resource.parameters[1].name, "limit");

    assert_eq!(resource.actions.len(), 1);
    assert_eq!(resource.actions[0].method, "GET");
    assert_eq!(resource.actions[0].name, "My Method");
    assert_eq!(resource.actions[0].description, "Method Description\n\n");
}

#[test]
fn description_accumulates_lists_verbatim() {
    let result = parse_ok("# /1\n+ A\n+ B\n\np1\n");
    assert!(result.report.warnings.is_empty(), "{:?}", result.report.warnings);

    let resource = first_resource(&result.blueprint);
    assert_eq!(resource.uri_template, "/1");
    assert_eq!(resource.description, "+ A\n\n+ B\n\np1\n");
    assert!(resource.model.is_none());
    assert!(resource.actions.is_empty());
}

#[test]
fn description_keeps_an_adjacent_rule_line() {
    let result = parse_ok("# /1\nA\n---\nB\n");
    assert!(result.report.warnings.is_empty());

    let resource = first_resource(&result.blueprint);
    assert_eq!(resource.description, "A\n---\n\nB\n");
}

#[test]
fn method_abbreviation_creates_a_single_action() {
    let result = parse_ok(
        "# GET /resource\n\
         Description\n\
         + Response 200\n\
         \x20   + Body\n\
         \n\
         \x20           {}\n",
    );
    assert!(result.report.warnings.is_empty(), "{:?}", result.report.warnings);

    let resource = first_resource(&result.blueprint);
    assert_eq!(resource.name, "");
    assert_eq!(resource.uri_template, "/resource");
    assert_eq!(resource.actions.len(), 1);
    assert_eq!(resource.actions[0].method, "GET");
    assert_eq!(resource.actions[0].description, "Description\n");
    assert_eq!(resource.actions[0].examples[0].responses[0].body, "{}\n");
}

#[test]
fn named_endpoint_form_names_the_action() {
    let result = parse_ok("# List messages [GET /messages]\n+ Response 204\n");
    assert!(result.report.warnings.is_empty());

    let resource = first_resource(&result.blueprint);
    assert_eq!(resource.uri_template, "/messages");
    assert_eq!(resource.actions[0].name, "List messages");
    assert_eq!(resource.actions[0].method, "GET");
}

#[test]
fn root_resource_parses() {
    let result = parse_ok("# API Root [/]\n");
    assert!(result.report.warnings.is_empty());

    let resource = first_resource(&result.blueprint);
    assert_eq!(resource.name, "API Root");
    assert_eq!(resource.uri_template, "/");
    assert!(resource.actions.is_empty());
}

#[test]
fn nameless_resource_with_named_model() {
    let result = parse_ok("# /message\n+ Super Model\n\n        AAA\n\n");
    assert!(result.report.warnings.is_empty());

    let resource = first_resource(&result.blueprint);
    let model = resource.model.as_ref().expect("model");
    assert_eq!(model.name, "Super");
    assert_eq!(model.body, "AAA\n");
}

#[test]
fn fully_nameless_model_stays_local() {
    let result = parse_ok("# /message\n+ Model\n\n        AAA\n\n");
    assert!(result.report.warnings.is_empty());

    let resource = first_resource(&result.blueprint);
    let model = resource.model.as_ref().expect("model");
    assert_eq!(model.name, "");
    assert_eq!(model.body, "AAA\n");
}

#[test]
fn multi_word_model_names_parse() {
    let result = parse_ok(
        "# My Resource [/resource]\n\n\
         Awesome description\n\n\
         + a really good name Model (text/plain)\n\n\
         \x20       body of the `model`\n",
    );
    assert!(result.report.warnings.is_empty());

    let model = first_resource(&result.blueprint).model.as_ref().expect("model");
    assert_eq!(model.name, "a really good name");
    assert_eq!(model.body, "body of the `model`\n");
}

#[test]
fn second_model_is_a_fatal_model_error() {
    let result = parse(
        "# Message [/message]\n\
         + Model\n\n\
         \x20       AAA\n\n\
         + Model\n\n\
         \x20       BBB\n",
        ParseOptions::default(),
    );
    let error = result.report.error.expect("fatal error");
    assert_eq!(error.code, ErrorCode::Model);
}

#[test]
fn model_keyword_needs_word_anchoring() {
    let result = parse_ok(
        "## Resource [/resource]\n\
         ### Attributes\n\
         - A\n\
         - Cmodel\n\
         - Single data model for all exchange data\n\
         - `model`\n",
    );
    assert!(result.report.warnings.is_empty(), "{:?}", result.report.warnings);

    let resource = first_resource(&result.blueprint);
    assert_eq!(resource.name, "Resource");
    assert!(resource.model.is_none());
    assert_eq!(
        resource.description,
        "### Attributes\n\n- A\n\n- Cmodel\n\n- Single data model for all exchange data\n\n- `model`\n"
    );
}

#[test]
fn deprecated_headers_move_into_responses() {
    let result = parse_ok(
        "# /\n\
         + Headers\n\n\
         \x20       header1: value1\n\n\
         ## GET\n\
         + Headers\n\n\
         \x20       header2: value2\n\n\
         + Response 200\n\
         \x20   + Headers\n\n\
         \x20           header3: value3\n\n",
    );

    let codes: Vec<WarningCode> = result.report.warnings.iter().map(|w| w.code).collect();
    assert_eq!(codes, vec![WarningCode::Deprecated, WarningCode::Deprecated]);

    let resource = first_resource(&result.blueprint);
    assert!(resource.headers.is_empty());
    assert_eq!(resource.actions.len(), 1);
    assert!(resource.actions[0].headers.is_empty());

    let response = &resource.actions[0].examples[0].responses[0];
    assert_eq!(response.headers.len(), 3);
    assert_eq!(response.headers[0].name, "header1");
    assert_eq!(response.headers[0].value, "value1");
    assert_eq!(response.headers[1].name, "header2");
    assert_eq!(response.headers[1].value, "value2");
    assert_eq!(response.headers[2].name, "header3");
    assert_eq!(response.headers[2].value, "value3");
}

#[test]
fn invalid_uri_template_warns_and_keeps_the_template() {
    let result = parse_ok("# Resource [/id{? limit}]\n");

    let codes: Vec<WarningCode> = result.report.warnings.iter().map(|w| w.code).collect();
    assert_eq!(codes, vec![WarningCode::Uri]);

    let resource = first_resource(&result.blueprint);
    assert_eq!(resource.name, "Resource");
    assert_eq!(resource.uri_template, "/id{? limit}");
}

#[test]
fn duplicate_action_method_warns_and_keeps_both() {
    let result = parse_ok(
        "# /r\n\
         ## GET\n\
         + Response 204\n\
         ## GET\n\
         + Response 200\n\n\
         \x20       ok\n",
    );

    let codes: Vec<WarningCode> = result.report.warnings.iter().map(|w| w.code).collect();
    assert_eq!(codes, vec![WarningCode::Redefinition]);
    assert_eq!(first_resource(&result.blueprint).actions.len(), 2);
}
