/// `Parameters` sections and the individual parameter grammar.
///
/// Two parameter syntaxes exist side by side:
///
/// ```text
/// + id = `1234` (optional, number, `0000`)     legacy
/// + id: `1234` (number, optional) - the id     MSON-style
/// ```
///
/// The legacy form nests a `Values` section; the MSON form nests `Default`
/// and `Members` sections. `Parameter.new_syntax` records which was used.
/// A redefined parameter name is warned about and the second occurrence is
/// dropped from the semantic list.

use crate::ast::{Parameter, ParameterUse};
use crate::classifier::SectionType;
use crate::diagnostics::{Report, WarningCode};
use crate::markdown::MarkdownNode;
use crate::mson;
use crate::signature::{parse_signature, SignatureTraits};
use crate::sourcemap::RangeSet;
use crate::text;

use super::{append_description, drive_list, flatten, ParseContext, SectionProcessor};

const NO_PARAMETERS_MESSAGE: &str =
    "no parameters specified, expected a nested list of parameters, one parameter per list item";

#[derive(Debug, Default)]
pub(crate) struct ParametersOutput {
    pub parameters: Vec<Parameter>,
    pub maps: Vec<RangeSet>,
}

// ── Parameters collection ──

struct ParametersProcessor;

impl SectionProcessor for ParametersProcessor {
    const TYPE: SectionType = SectionType::Parameters;
    type Output = ParametersOutput;

    fn process_signature(
        &mut self,
        node: &MarkdownNode,
        ctx: &mut ParseContext,
        _out: &mut ParametersOutput,
        report: &mut Report,
    ) {
        let (_, remaining) = text::first_line(&node.text);
        if !remaining.trim().is_empty() {
            report.warn(
                WarningCode::Ignoring,
                "ignoring additional content after 'parameters' keyword, \
                 expected a nested list of parameters, one parameter per list item",
                ctx.charmap(&node.range),
            );
        }
    }

    fn accepts_description(&self) -> bool {
        false
    }

    fn accepts(&self, section: SectionType) -> bool {
        section == SectionType::Parameter
    }

    fn process_nested(
        &mut self,
        _section: SectionType,
        nodes: &[&MarkdownNode],
        index: usize,
        ctx: &mut ParseContext,
        out: &mut ParametersOutput,
        report: &mut Report,
    ) -> (usize, bool) {
        let (parameter, halted) = parse_parameter(nodes[index], ctx, report);

        if out
            .parameters
            .iter()
            .any(|existing| existing.name == parameter.name)
        {
            report.warn(
                WarningCode::Redefinition,
                format!("overshadowing previous parameter '{}' definition", parameter.name),
                ctx.charmap(&nodes[index].range),
            );
        } else {
            out.maps.push(ctx.charmap(&nodes[index].range));
            out.parameters.push(parameter);
        }

        (index + 1, halted)
    }

    fn finalize(
        &mut self,
        node: &MarkdownNode,
        ctx: &mut ParseContext,
        out: &mut ParametersOutput,
        report: &mut Report,
    ) {
        if out.parameters.is_empty() {
            report.warn(
                WarningCode::Formatting,
                NO_PARAMETERS_MESSAGE,
                ctx.charmap(&node.range),
            );
        }
    }
}

/// Parse a `Parameters` section rooted at `item`.
pub(crate) fn parse_parameters(
    item: &MarkdownNode,
    ctx: &mut ParseContext,
    report: &mut Report,
) -> (ParametersOutput, bool) {
    let mut processor = ParametersProcessor;
    let mut out = ParametersOutput::default();
    let halted = drive_list(&mut processor, item, ctx, &mut out, report);
    (out, halted)
}

// ── Individual parameter ──

struct ParameterProcessor;

impl SectionProcessor for ParameterProcessor {
    const TYPE: SectionType = SectionType::Parameter;
    type Output = Parameter;

    fn process_signature(
        &mut self,
        node: &MarkdownNode,
        ctx: &mut ParseContext,
        out: &mut Parameter,
        report: &mut Report,
    ) {
        let (line, _) = text::first_line(&node.text);
        let line = line.trim();

        if uses_mson_syntax(line) {
            parse_mson_parameter(&node.text, out);
        } else {
            parse_legacy_parameter(line, out);
        }

        if out.name.is_empty() {
            report.warn(
                WarningCode::Formatting,
                "no parameter name specified",
                ctx.charmap(&node.range),
            );
        }
        if out.use_ == ParameterUse::Required && out.default_value.is_some() {
            report.warn(
                WarningCode::LogicalError,
                format!(
                    "specifying parameter '{}' as required supersedes its default value, \
                     declare the parameter as 'optional' to specify its default value",
                    out.name
                ),
                ctx.charmap(&node.range),
            );
        }
    }

    fn process_description(
        &mut self,
        node: &MarkdownNode,
        ctx: &mut ParseContext,
        out: &mut Parameter,
        _report: &mut Report,
    ) {
        append_description(&mut out.description, node, ctx);
    }

    fn accepts(&self, section: SectionType) -> bool {
        matches!(
            section,
            SectionType::Values | SectionType::MsonSampleDefault | SectionType::MsonValueMembers
        )
    }

    fn process_nested(
        &mut self,
        section: SectionType,
        nodes: &[&MarkdownNode],
        index: usize,
        ctx: &mut ParseContext,
        out: &mut Parameter,
        report: &mut Report,
    ) -> (usize, bool) {
        let node = nodes[index];
        match section {
            SectionType::Values | SectionType::MsonValueMembers => {
                for value_item in flatten(&node.children) {
                    let (line, _) = text::first_line(&value_item.text);
                    let literal = line.split(" - ").next().unwrap_or(line);
                    out.values.push(mson::parse_value(literal).literal);
                }
                if out.values.is_empty() {
                    report.warn(
                        WarningCode::EmptyDefinition,
                        format!(
                            "no values specified for parameter '{}', \
                             expected a nested list of possible values",
                            out.name
                        ),
                        ctx.charmap(&node.range),
                    );
                }
            }
            SectionType::MsonSampleDefault => {
                let signature = parse_signature(
                    &node.text,
                    SignatureTraits {
                        identifier: true,
                        value: true,
                        ..SignatureTraits::NONE
                    },
                );
                let value = mson::parse_value(&signature.value).literal;
                if text::iequal(&signature.identifier, "Default") {
                    out.default_value = Some(value);
                } else {
                    out.example_value = Some(value);
                }
            }
            _ => {}
        }
        (index + 1, false)
    }

    fn finalize(
        &mut self,
        node: &MarkdownNode,
        ctx: &mut ParseContext,
        out: &mut Parameter,
        report: &mut Report,
    ) {
        if out.values.is_empty() {
            return;
        }
        if let Some(default) = &out.default_value {
            if !out.values.contains(default) {
                report.warn(
                    WarningCode::LogicalError,
                    format!(
                        "the default value '{}' of parameter '{}' is not in its list \
                         of expected values",
                        default, out.name
                    ),
                    ctx.charmap(&node.range),
                );
            }
        }
        if let Some(example) = &out.example_value {
            if !out.values.contains(example) {
                report.warn(
                    WarningCode::LogicalError,
                    format!(
                        "the example value '{}' of parameter '{}' is not in its list \
                         of expected values",
                        example, out.name
                    ),
                    ctx.charmap(&node.range),
                );
            }
        }
    }
}

/// Parse one parameter list item.
pub(crate) fn parse_parameter(
    item: &MarkdownNode,
    ctx: &mut ParseContext,
    report: &mut Report,
) -> (Parameter, bool) {
    let mut processor = ParameterProcessor;
    let mut parameter = Parameter::default();
    let halted = drive_list(&mut processor, item, ctx, &mut parameter, report);
    (parameter, halted)
}

/// Warn about parameters that do not appear among the URI template's
/// expression variables. The parameters are kept; covering every template
/// variable is not required at this layer.
pub(crate) fn warn_parameters_not_in_uri(
    parameters: &[Parameter],
    maps: &[RangeSet],
    uri_template: &str,
    report: &mut Report,
) {
    if uri_template.is_empty() {
        return;
    }
    let variables = crate::uri::template_variables(uri_template);
    for (index, parameter) in parameters.iter().enumerate() {
        if !variables.iter().any(|variable| variable == &parameter.name) {
            report.warn(
                WarningCode::LogicalError,
                format!(
                    "parameter '{}' is not found within the '{}' URI template",
                    parameter.name, uri_template
                ),
                maps.get(index).cloned().unwrap_or_default(),
            );
        }
    }
}

/// The MSON form is recognized by a colon before any parenthesis.
fn uses_mson_syntax(line: &str) -> bool {
    let mut escaped = false;
    for byte in line.bytes() {
        match byte {
            b'`' => escaped = !escaped,
            b':' if !escaped => return true,
            b'(' if !escaped => return false,
            _ => {}
        }
    }
    false
}

fn parse_mson_parameter(node_text: &str, out: &mut Parameter) {
    let signature = parse_signature(
        node_text,
        SignatureTraits {
            identifier: true,
            value: true,
            attributes: true,
            content: true,
            ..SignatureTraits::NONE
        },
    );

    out.new_syntax = true;
    out.name = mson::strip_backticks(&signature.identifier).to_string();
    if !signature.value.is_empty() {
        out.example_value = Some(mson::parse_value(&signature.value).literal);
    }

    let definition = mson::parse_type_definition(&signature.attributes);
    out.use_ = use_from(&definition);
    if let Some(spec) = definition.specification.name.as_ref() {
        out.type_name = format_type(spec, &definition.specification.nested);
    }
    if !signature.content.is_empty() {
        out.description = signature.content.clone();
    }
}

fn parse_legacy_parameter(line: &str, out: &mut Parameter) {
    let mut rest = line;

    let name_end = scan_to(rest, &[b'=', b'(']);
    out.name = mson::strip_backticks(rest[..name_end].trim()).to_string();
    rest = &rest[name_end..];

    if rest.starts_with('=') {
        let default_end = scan_to(&rest[1..], &[b'(']);
        out.default_value = Some(mson::parse_value(rest[1..1 + default_end].trim()).literal);
        rest = &rest[1 + default_end..];
    }

    if let Some(stripped) = rest.strip_prefix('(') {
        let close = scan_to(stripped, &[b')']);
        for token in stripped[..close].split(',') {
            let token = token.trim();
            if token.is_empty() {
                continue;
            }
            if text::iequal(token, "required") {
                out.use_ = ParameterUse::Required;
            } else if text::iequal(token, "optional") {
                out.use_ = ParameterUse::Optional;
            } else if token.starts_with('`') {
                out.example_value = Some(mson::parse_value(token).literal);
            } else if out.type_name.is_empty() {
                out.type_name = token.to_string();
            }
        }
    }
}

/// First position of an unescaped stop byte, or the end of the string.
fn scan_to(input: &str, stops: &[u8]) -> usize {
    let mut escaped = false;
    for (i, byte) in input.bytes().enumerate() {
        match byte {
            b'`' => escaped = !escaped,
            _ if !escaped && stops.contains(&byte) => return i,
            _ => {}
        }
    }
    input.len()
}

fn use_from(definition: &mson::TypeDefinition) -> ParameterUse {
    if definition.has_attribute(mson::TypeAttribute::Required) {
        ParameterUse::Required
    } else if definition.has_attribute(mson::TypeAttribute::Optional) {
        ParameterUse::Optional
    } else {
        ParameterUse::Undefined
    }
}

fn format_type(name: &mson::TypeName, nested: &[mson::TypeName]) -> String {
    if nested.is_empty() {
        name.as_str().to_string()
    } else {
        let inner: Vec<&str> = nested.iter().map(|n| n.as_str()).collect();
        format!("{}[{}]", name.as_str(), inner.join(", "))
    }
}
