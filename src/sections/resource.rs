/// Resource sections.
///
/// Signature forms:
/// - `# Name [/uri]` — explicit name and URI template
/// - `# /uri` — nameless resource
/// - `# METHOD /uri` and `# Name [METHOD /uri]` — abbreviated endpoints,
///   parsed as a resource wrapping a single action
///
/// A resource may define at most one model; the model registers in the
/// symbol table under its own name or, when unnamed, under the resource
/// name. Parameters are cross-checked against the URI template variables.

use crate::ast::Resource;
use crate::classifier::SectionType;
use crate::diagnostics::{ErrorCode, Report, WarningCode};
use crate::markdown::MarkdownNode;
use crate::patterns::patterns;
use crate::sourcemap::ResourceSourceMap;
use crate::symbol_table::ModelSymbol;
use crate::text;
use crate::uri;

use super::action::{parse_action, PreparsedAction};
use super::payload::{parse_payload, PayloadKind};
use super::{
    append_description, drive_headed, headers, mson, parameters, ParseContext, SectionProcessor,
};

#[derive(Debug, Default)]
pub(crate) struct ResourceOutput {
    pub resource: Resource,
    pub map: ResourceSourceMap,
}

struct ResourceProcessor;

impl SectionProcessor for ResourceProcessor {
    const TYPE: SectionType = SectionType::Resource;
    type Output = ResourceOutput;

    fn process_signature(
        &mut self,
        node: &MarkdownNode,
        ctx: &mut ParseContext,
        out: &mut ResourceOutput,
        report: &mut Report,
    ) {
        out.map.node = ctx.charmap(&node.range);

        let (line, _) = text::first_line(&node.text);
        let line = line.trim();
        let p = patterns();

        if let Some(capture) = p.named_resource_header.captures(line) {
            out.resource.name = capture[1].trim().to_string();
            out.resource.uri_template = capture[2].trim().to_string();
        } else if let Some(capture) = p.uri_resource_header.captures(line) {
            out.resource.uri_template = capture[1].to_string();
        }

        uri::check_template(
            &out.resource.uri_template,
            &ctx.charmap(&node.range),
            report,
        );
    }

    fn process_description(
        &mut self,
        node: &MarkdownNode,
        ctx: &mut ParseContext,
        out: &mut ResourceOutput,
        _report: &mut Report,
    ) {
        append_description(&mut out.resource.description, node, ctx);
    }

    fn accepts(&self, section: SectionType) -> bool {
        matches!(
            section,
            SectionType::Model
                | SectionType::Parameters
                | SectionType::Headers
                | SectionType::Attributes
                | SectionType::Action
        )
    }

    fn process_nested(
        &mut self,
        section: SectionType,
        nodes: &[&MarkdownNode],
        index: usize,
        ctx: &mut ParseContext,
        out: &mut ResourceOutput,
        report: &mut Report,
    ) -> (usize, bool) {
        let node = nodes[index];
        let mut next = index + 1;
        let mut halted = false;

        match section {
            SectionType::Model => {
                let (parsed, model_halted) = parse_payload(node, PayloadKind::Model, ctx, report);
                halted = model_halted;

                if out.resource.model.is_some() {
                    report.fail(
                        ErrorCode::Model,
                        format!(
                            "a resource can define at most one model, overshadowing \
                             previous model definition for '{}'",
                            out.resource.uri_template
                        ),
                        ctx.charmap(&node.range),
                    );
                } else if !halted {
                    let mut model = parsed.payload;
                    if model.name.is_empty() {
                        model.name = out.resource.name.clone();
                    }
                    // A fully nameless model stays locally addressable only.
                    if !model.name.is_empty() {
                        let previous = ctx.symbols.register_model(ModelSymbol {
                            name: model.name.clone(),
                            payload: model.clone(),
                            defined_in: node.range.clone(),
                        });
                        if previous.is_some() {
                            report.fail(
                                ErrorCode::Symbol,
                                format!("symbol '{}' is already defined", model.name),
                                ctx.charmap(&node.range),
                            );
                        }
                    }
                    out.resource.model = Some(model);
                    out.map.model = Some(parsed.map);
                }
            }
            SectionType::Parameters => {
                let (parsed, parameters_halted) = parameters::parse_parameters(node, ctx, report);
                parameters::warn_parameters_not_in_uri(
                    &parsed.parameters,
                    &parsed.maps,
                    &out.resource.uri_template,
                    report,
                );
                out.resource.parameters = parsed.parameters;
                out.map.parameters = parsed.maps;
                halted = parameters_halted;
            }
            SectionType::Headers => {
                report.warn(
                    WarningCode::Deprecated,
                    "the 'headers' section at this level is deprecated and will be \
                     removed in a future, use respective payload's headers instead",
                    ctx.charmap(&node.range),
                );
                let (parsed, headers_halted) = headers::parse_headers(node, ctx, report);
                for (header, map) in parsed.headers.into_iter().zip(parsed.maps) {
                    headers::append_header(&mut out.resource.headers, header, &map, report);
                    out.map.headers.push(map);
                }
                halted = headers_halted;
            }
            SectionType::Attributes => {
                let (attributes, attributes_halted) = mson::parse_attributes(node, ctx, report);
                out.resource.attributes = Some(attributes);
                halted = attributes_halted;
            }
            SectionType::Action => {
                let (parsed, action_next, action_halted) =
                    parse_action(nodes, index, &out.resource.uri_template, None, ctx, report);
                next = action_next;
                halted = action_halted;

                if out
                    .resource
                    .actions
                    .iter()
                    .any(|existing| existing.method == parsed.action.method)
                {
                    report.warn(
                        WarningCode::Redefinition,
                        format!(
                            "action with method '{}' is already defined for resource '{}'",
                            parsed.action.method, out.resource.uri_template
                        ),
                        ctx.charmap(&node.range),
                    );
                }
                out.resource.actions.push(parsed.action);
                out.map.actions.push(parsed.map);
            }
            _ => {}
        }

        (next, halted)
    }

    fn finalize(
        &mut self,
        node: &MarkdownNode,
        ctx: &mut ParseContext,
        out: &mut ResourceOutput,
        report: &mut Report,
    ) {
        inject_deprecated_headers(&mut out.resource);

        if let Some(attributes) = &out.resource.attributes {
            if !out.resource.name.is_empty() {
                let previous = ctx.symbols.register_named_type(
                    crate::symbol_table::NamedTypeSymbol {
                        name: out.resource.name.clone(),
                        dependencies: mson::collect_dependencies(attributes),
                        defined_in: node.range.clone(),
                    },
                );
                if previous.is_some() {
                    report.warn(
                        WarningCode::Redefinition,
                        format!("type '{}' is already defined", out.resource.name),
                        ctx.charmap(&node.range),
                    );
                }
            }
        }
    }
}

/// Move deprecated resource- and action-level headers into every payload
/// of the affected actions' examples, ordered resource, action, then the
/// payload's own headers.
fn inject_deprecated_headers(resource: &mut Resource) {
    let resource_headers = std::mem::take(&mut resource.headers);

    for action in &mut resource.actions {
        let action_headers = std::mem::take(&mut action.headers);
        if resource_headers.is_empty() && action_headers.is_empty() {
            continue;
        }

        for example in &mut action.examples {
            for payload in example
                .requests
                .iter_mut()
                .chain(example.responses.iter_mut())
            {
                let own = std::mem::take(&mut payload.headers);
                payload.headers.extend(resource_headers.iter().cloned());
                payload.headers.extend(action_headers.iter().cloned());
                payload.headers.extend(own);
            }
        }
    }
}

/// Parse a resource rooted at `nodes[start]`.
pub(crate) fn parse_resource(
    nodes: &[&MarkdownNode],
    start: usize,
    ctx: &mut ParseContext,
    report: &mut Report,
) -> (ResourceOutput, usize, bool) {
    let node = nodes[start];
    let (line, _) = text::first_line(&node.text);
    let line = line.trim();
    let p = patterns();

    // Abbreviated endpoint forms wrap a single pre-parsed action.
    let preparsed = if let Some(capture) = p.named_endpoint_header.captures(line) {
        Some((
            capture[3].trim().to_string(),
            PreparsedAction {
                method: capture[2].to_string(),
                name: capture[1].trim().to_string(),
            },
        ))
    } else if let Some(capture) = p.method_resource_header.captures(line) {
        Some((
            capture[2].trim().to_string(),
            PreparsedAction {
                method: capture[1].to_string(),
                name: String::new(),
            },
        ))
    } else {
        None
    };

    if let Some((uri_template, preparsed)) = preparsed {
        let mut out = ResourceOutput::default();
        out.resource.uri_template = uri_template;
        out.map.node = ctx.charmap(&node.range);
        uri::check_template(&out.resource.uri_template, &out.map.node, report);

        let (action, next, halted) = parse_action(
            nodes,
            start,
            &out.resource.uri_template,
            Some(preparsed),
            ctx,
            report,
        );
        out.resource.actions.push(action.action);
        out.map.actions.push(action.map);
        return (out, next, halted);
    }

    let mut processor = ResourceProcessor;
    let mut out = ResourceOutput::default();
    let (next, halted) = drive_headed(&mut processor, nodes, start, ctx, &mut out, report);
    (out, next, halted)
}
