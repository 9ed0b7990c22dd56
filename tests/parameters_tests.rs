/// Parameter grammar tests: both syntaxes, values sections, and the
/// redefinition rule.

use apib_parser::ast::{Parameter, ParameterUse};
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

fn resource_parameters(result: &ParseResult) -> &[Parameter] {
    &result.blueprint.resource_groups[0].resources[0].parameters
}

#[test]
fn legacy_syntax_with_all_parts() {
    let result = parse_ok(
        "# /r/{id}\n\
         + Parameters\n\
         \x20   + id = `1234` (optional, number, `0000`)\n\
         \n\
         \x20       The identifier.\n\
         \x20       + Values\n\
         \x20           + `1234`\n\
         \x20           + `0000`\n",
    );
    assert!(result.report.warnings.is_empty(), "{:?}", result.report.warnings);

    let parameters = resource_parameters(&result);
    assert_eq!(parameters.len(), 1);
    let id = &parameters[0];
    assert_eq!(id.name, "id");
    assert!(!id.new_syntax);
    assert_eq!(id.use_, ParameterUse::Optional);
    assert_eq!(id.type_name, "number");
    assert_eq!(id.default_value.as_deref(), Some("1234"));
    assert_eq!(id.example_value.as_deref(), Some("0000"));
    assert_eq!(id.values, vec!["1234", "0000"]);
    assert_eq!(id.description, "The identifier.\n");
}

#[test]
fn mson_syntax_with_inline_description() {
    let result = parse_ok(
        "# /r/{id}\n\
         + Parameters\n\
         \x20   + id: `42` (number, required) - The identifier\n",
    );
    assert!(result.report.warnings.is_empty(), "{:?}", result.report.warnings);

    let id = &resource_parameters(&result)[0];
    assert!(id.new_syntax);
    assert_eq!(id.use_, ParameterUse::Required);
    assert_eq!(id.type_name, "number");
    assert_eq!(id.example_value.as_deref(), Some("42"));
    assert_eq!(id.description, "The identifier");
}

#[test]
fn mson_syntax_default_and_members_sections() {
    let result = parse_ok(
        "# /r/{id}\n\
         + Parameters\n\
         \x20   + id: `B` (string, optional)\n\
         \x20       + Default: `A`\n\
         \x20       + Members\n\
         \x20           + `A`\n\
         \x20           + `B`\n",
    );
    assert!(result.report.warnings.is_empty(), "{:?}", result.report.warnings);

    let id = &resource_parameters(&result)[0];
    assert_eq!(id.default_value.as_deref(), Some("A"));
    assert_eq!(id.example_value.as_deref(), Some("B"));
    assert_eq!(id.values, vec!["A", "B"]);
}

#[test]
fn redefined_parameter_is_dropped_with_a_warning() {
    let result = parse_ok(
        "# /r/{id}\n\
         + Parameters\n\
         \x20   + id = `1` (optional, number)\n\
         \x20   + id = `2` (optional, number)\n",
    );

    let codes: Vec<WarningCode> = result.report.warnings.iter().map(|w| w.code).collect();
    assert_eq!(codes, vec![WarningCode::Redefinition]);

    let parameters = resource_parameters(&result);
    assert_eq!(parameters.len(), 1);
    assert_eq!(parameters[0].default_value.as_deref(), Some("1"));
}

#[test]
fn empty_parameters_section_warns() {
    let result = parse_ok("# /r/{id}\n+ Parameters\n## GET\n+ Response 204\n");

    let codes: Vec<WarningCode> = result.report.warnings.iter().map(|w| w.code).collect();
    assert_eq!(codes, vec![WarningCode::Formatting]);
    assert!(resource_parameters(&result).is_empty());
}

#[test]
fn required_parameter_with_default_warns() {
    let result = parse_ok(
        "# /r/{id}\n\
         + Parameters\n\
         \x20   + id = `1` (required, number)\n",
    );

    let codes: Vec<WarningCode> = result.report.warnings.iter().map(|w| w.code).collect();
    assert_eq!(codes, vec![WarningCode::LogicalError]);
    assert!(result.report.warnings[0].message.contains("required"));
}

#[test]
fn default_value_outside_listed_values_warns() {
    let result = parse_ok(
        "# /r/{id}\n\
         + Parameters\n\
         \x20   + id = `9` (optional, number)\n\
         \n\
         \x20       + Values\n\
         \x20           + `1`\n\
         \x20           + `2`\n",
    );

    let codes: Vec<WarningCode> = result.report.warnings.iter().map(|w| w.code).collect();
    assert_eq!(codes, vec![WarningCode::LogicalError]);
    assert!(result.report.warnings[0].message.contains("'9'"));
}
