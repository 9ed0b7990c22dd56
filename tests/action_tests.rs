/// Action processor tests: signatures, transaction example grouping,
/// dangling assets, and relations.

use apib_parser::ast::{Action, Blueprint};
use apib_parser::diagnostics::WarningCode;
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

fn actions(blueprint: &Blueprint) -> &[Action] {
    &blueprint.resource_groups[0].resources[0].actions
}

#[test]
fn multiple_methods_with_assets() {
    let result = parse_ok(
        "# /1\n\
         A\n\
         ## GET\n\
         B\n\
         + Response 200\n\
         \x20   + Body\n\
         \n\
         \x20           Code 1\n\
         \n\
         ## POST\n\
         C\n\
         + Request D\n\
         + Response 200\n\
         \x20   + Body\n\
         \n\
         \x20           {}\n\
         \n\
         ## PUT\n\
         E\n",
    );

    let codes: Vec<WarningCode> = result.report.warnings.iter().map(|w| w.code).collect();
    assert_eq!(
        codes,
        vec![WarningCode::EmptyDefinition, WarningCode::EmptyDefinition],
        "empty request asset and missing response: {:?}",
        result.report.warnings
    );

    let actions = actions(&result.blueprint);
    assert_eq!(actions.len(), 3);

    assert_eq!(actions[0].method, "GET");
    assert_eq!(actions[0].description, "B\n");
    assert_eq!(actions[0].examples.len(), 1);
    assert!(actions[0].examples[0].requests.is_empty());
    assert_eq!(actions[0].examples[0].responses[0].name, "200");
    assert_eq!(actions[0].examples[0].responses[0].body, "Code 1\n");

    assert_eq!(actions[1].method, "POST");
    assert_eq!(actions[1].description, "C\n");
    assert_eq!(actions[1].examples[0].requests[0].name, "D");
    assert_eq!(actions[1].examples[0].responses[0].body, "{}\n");

    assert_eq!(actions[2].method, "PUT");
    assert_eq!(actions[2].description, "E\n");
    assert!(actions[2].examples.is_empty());
}

#[test]
fn dangling_assets_attach_to_the_preceding_payload() {
    let result = parse_ok(
        "# A [/a]\n\
         ## GET\n\
         + Request A\n\
         \n\
         ```js\n\
         dangling request body\n\
         ```\n\
         \n\
         + Response 200\n\
         \n\
         ```\n\
         dangling response body\n\
         ```\n",
    );

    let codes: Vec<WarningCode> = result.report.warnings.iter().map(|w| w.code).collect();
    assert_eq!(
        codes,
        vec![
            WarningCode::EmptyDefinition,
            WarningCode::Indentation,
            WarningCode::Indentation
        ]
    );

    let actions = actions(&result.blueprint);
    let example = &actions[0].examples[0];
    assert_eq!(example.requests[0].name, "A");
    assert_eq!(example.requests[0].body, "dangling request body\n\n");
    assert_eq!(example.responses[0].name, "200");
    assert_eq!(example.responses[0].body, "dangling response body\n\n");
}

#[test]
fn request_after_response_opens_a_new_example() {
    let result = parse_ok(
        "# /r\n\
         ## POST\n\
         + Request One\n\
         \n\
         \x20       1\n\
         \n\
         + Response 200\n\
         \n\
         \x20       a\n\
         \n\
         + Request Two\n\
         \n\
         \x20       2\n\
         \n\
         + Response 201\n\
         \n\
         \x20       b\n",
    );
    assert!(result.report.warnings.is_empty(), "{:?}", result.report.warnings);

    let action = &actions(&result.blueprint)[0];
    assert_eq!(action.examples.len(), 2);
    assert_eq!(action.examples[0].requests[0].name, "One");
    assert_eq!(action.examples[0].responses[0].name, "200");
    assert_eq!(action.examples[1].requests[0].name, "Two");
    assert_eq!(action.examples[1].responses[0].name, "201");
}

#[test]
fn unknown_bracketed_method_warns_and_is_kept() {
    let result = parse_ok(
        "# /r\n\
         ## Retrieve [FOO]\n\
         + Response 200\n\
         \n\
         \x20       ok\n",
    );

    let codes: Vec<WarningCode> = result.report.warnings.iter().map(|w| w.code).collect();
    assert_eq!(codes, vec![WarningCode::HttpMethod]);

    let action = &actions(&result.blueprint)[0];
    assert_eq!(action.method, "FOO");
    assert_eq!(action.name, "Retrieve");
}

#[test]
fn relation_attaches_to_the_action() {
    let result = parse_ok(
        "# /messages\n\
         ## List [GET]\n\
         + Relation: self\n\
         + Response 204\n",
    );
    assert!(result.report.warnings.is_empty(), "{:?}", result.report.warnings);

    let action = &actions(&result.blueprint)[0];
    assert_eq!(action.relation, "self");
}

#[test]
fn body_list_item_without_payload_is_description() {
    let result = parse_ok(
        "## GET /A\n\
         Lorem Ipsum\n\
         \n\
         + Body\n\
         \n\
         \x20   { ... }\n\
         \n\
         + Response 200\n",
    );
    assert!(result.report.warnings.is_empty(), "{:?}", result.report.warnings);

    let action = &actions(&result.blueprint)[0];
    assert_eq!(action.description, "Lorem Ipsum\n\n+ Body\n\n    { ... }\n\n");
}
