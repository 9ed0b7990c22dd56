/// Action sections: one HTTP method on a resource.
///
/// Signature forms: `## METHOD` and `## Name [METHOD]`; the abbreviated
/// resource forms (`# METHOD /uri`, `# Name [METHOD /uri]`) arrive with a
/// pre-parsed signature from the resource processor. Requests and
/// responses group into transaction examples through `ExampleBuilder`.

use crate::ast::{is_http_method, Action};
use crate::classifier::SectionType;
use crate::diagnostics::{Report, WarningCode};
use crate::markdown::{MarkdownNode, MarkdownNodeKind};
use crate::patterns::patterns;
use crate::sourcemap::ActionSourceMap;
use crate::text;

use super::example::ExampleBuilder;
use super::payload::{parse_payload, PayloadKind};
use super::{
    append_description, drive_headed, headers, ignore_node, mson, parameters, ParseContext,
    SectionProcessor,
};

/// Signature parts decided by the resource processor for the abbreviated
/// endpoint forms.
#[derive(Debug, Clone)]
pub(crate) struct PreparsedAction {
    pub method: String,
    pub name: String,
}

#[derive(Debug, Default)]
pub(crate) struct ActionOutput {
    pub action: Action,
    pub map: ActionSourceMap,
}

struct ActionProcessor {
    uri_template: String,
    preparsed: Option<PreparsedAction>,
    builder: ExampleBuilder,
}

impl SectionProcessor for ActionProcessor {
    const TYPE: SectionType = SectionType::Action;
    type Output = ActionOutput;

    fn process_signature(
        &mut self,
        node: &MarkdownNode,
        ctx: &mut ParseContext,
        out: &mut ActionOutput,
        report: &mut Report,
    ) {
        out.map.node = ctx.charmap(&node.range);

        if let Some(preparsed) = self.preparsed.take() {
            out.action.method = preparsed.method;
            out.action.name = preparsed.name;
            return;
        }

        let (line, _) = text::first_line(&node.text);
        let line = line.trim();
        let p = patterns();

        if let Some(capture) = p.method_header.captures(line) {
            out.action.method = capture[1].to_string();
        } else if let Some(capture) = p.named_action_header.captures(line) {
            out.action.name = capture[1].trim().to_string();
            out.action.method = capture[2].to_string();
            if !is_http_method(&out.action.method) {
                report.warn(
                    WarningCode::HttpMethod,
                    format!("invalid HTTP request method '{}'", out.action.method),
                    ctx.charmap(&node.range),
                );
            }
        }
    }

    fn process_description(
        &mut self,
        node: &MarkdownNode,
        ctx: &mut ParseContext,
        out: &mut ActionOutput,
        _report: &mut Report,
    ) {
        append_description(&mut out.action.description, node, ctx);
    }

    fn accepts(&self, section: SectionType) -> bool {
        matches!(
            section,
            SectionType::Parameters
                | SectionType::Headers
                | SectionType::Attributes
                | SectionType::Relation
                | SectionType::Request
                | SectionType::Response
        )
    }

    fn process_nested(
        &mut self,
        section: SectionType,
        nodes: &[&MarkdownNode],
        index: usize,
        ctx: &mut ParseContext,
        out: &mut ActionOutput,
        report: &mut Report,
    ) -> (usize, bool) {
        let node = nodes[index];
        let mut halted = false;

        match section {
            SectionType::Parameters => {
                let (parsed, parameters_halted) = parameters::parse_parameters(node, ctx, report);
                parameters::warn_parameters_not_in_uri(
                    &parsed.parameters,
                    &parsed.maps,
                    &self.uri_template,
                    report,
                );
                out.action.parameters = parsed.parameters;
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
                    headers::append_header(&mut out.action.headers, header, &map, report);
                }
                halted = headers_halted;
            }
            SectionType::Attributes => {
                let (attributes, attributes_halted) = mson::parse_attributes(node, ctx, report);
                out.action.attributes = Some(attributes);
                halted = attributes_halted;
            }
            SectionType::Relation => {
                let (line, _) = text::first_line(&node.text);
                if let Some(capture) = patterns().relation_signature.captures(line.trim()) {
                    out.action.relation = capture[1].to_string();
                }
            }
            SectionType::Request => {
                let (parsed, payload_halted) = parse_payload(node, PayloadKind::Request, ctx, report);
                self.builder.add_request(parsed.payload, parsed.map);
                halted = payload_halted;
            }
            SectionType::Response => {
                let (parsed, payload_halted) =
                    parse_payload(node, PayloadKind::Response, ctx, report);
                self.builder.add_response(parsed.payload, parsed.map);
                halted = payload_halted;
            }
            _ => {}
        }

        (index + 1, halted)
    }

    fn process_unexpected(
        &mut self,
        node: &MarkdownNode,
        ctx: &mut ParseContext,
        _out: &mut ActionOutput,
        report: &mut Report,
    ) {
        if node.kind == MarkdownNodeKind::Code && self.builder.append_dangling(&node.text) {
            report.warn(
                WarningCode::Indentation,
                "dangling message-body asset, expected a pre-formatted code block",
                ctx.charmap(&node.range),
            );
            return;
        }
        ignore_node(node, ctx, report);
    }

    fn finalize(
        &mut self,
        node: &MarkdownNode,
        ctx: &mut ParseContext,
        out: &mut ActionOutput,
        report: &mut Report,
    ) {
        if self.builder.has_no_responses() {
            report.warn(
                WarningCode::EmptyDefinition,
                format!(
                    "action is missing a response, expected at least one response \
                     for '{}'",
                    out.action.method
                ),
                ctx.charmap(&node.range),
            );
        }

        let builder = std::mem::take(&mut self.builder);
        let (examples, maps) = builder.finish();
        out.action.examples = examples;
        out.map.examples = maps;
    }
}

/// Parse an action rooted at `nodes[start]`. `preparsed` carries the
/// signature for the abbreviated endpoint forms.
pub(crate) fn parse_action(
    nodes: &[&MarkdownNode],
    start: usize,
    uri_template: &str,
    preparsed: Option<PreparsedAction>,
    ctx: &mut ParseContext,
    report: &mut Report,
) -> (ActionOutput, usize, bool) {
    let mut processor = ActionProcessor {
        uri_template: uri_template.to_string(),
        preparsed,
        builder: ExampleBuilder::new(),
    };
    let mut out = ActionOutput::default();
    let (next, halted) = drive_headed(&mut processor, nodes, start, ctx, &mut out, report);
    (out, next, halted)
}
