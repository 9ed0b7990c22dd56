/// Payload sections: `Request`, `Response`, and `Model`.
///
/// A payload's signature may carry a name (requests, models), a three-digit
/// status code (responses), and a media type in parentheses; the media type
/// also materializes as a `Content-Type` header. Content arrives either as
/// a pre-formatted code block (the body), as a lone `[Name][]` paragraph (a
/// model reference, resolved in the second pass), or through the nested
/// `Headers`, `Body`, `Schema`, and `Attributes` sections. Mis-indented
/// content is recovered as the body with an `IndentationWarning`.

use crate::ast::{Header, MediaType, Payload, Reference};
use crate::classifier::SectionType;
use crate::diagnostics::{Report, WarningCode};
use crate::markdown::{MarkdownNode, MarkdownNodeKind};
use crate::patterns::patterns;
use crate::sourcemap::PayloadSourceMap;
use crate::text;

use super::{append_description, asset, headers, mson, ParseContext, SectionProcessor};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PayloadKind {
    Request,
    Response,
    Model,
}

impl PayloadKind {
    fn keyword(&self) -> &'static str {
        match self {
            PayloadKind::Request => "request",
            PayloadKind::Response => "response",
            PayloadKind::Model => "model",
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct PayloadOutput {
    pub payload: Payload,
    pub map: PayloadSourceMap,
}

struct PayloadProcessor {
    kind: PayloadKind,
    /// Paragraphs seen before any nested section; description or
    /// mis-indented body, decided at finalize.
    pending: String,
    pending_ranges: Vec<crate::span::CharRange>,
    saw_section: bool,
}

impl SectionProcessor for PayloadProcessor {
    const TYPE: SectionType = SectionType::Request;
    type Output = PayloadOutput;

    fn process_signature(
        &mut self,
        node: &MarkdownNode,
        ctx: &mut ParseContext,
        out: &mut PayloadOutput,
        report: &mut Report,
    ) {
        out.map.node = ctx.charmap(&node.range);

        let (line, remaining) = text::first_line(&node.text);
        let line = line.trim();
        let p = patterns();

        let mut media = None;
        match self.kind {
            PayloadKind::Model => {
                if let Some(capture) = p.model_signature.captures(line) {
                    out.payload.name = capture
                        .get(1)
                        .map(|m| m.as_str().trim().to_string())
                        .unwrap_or_default();
                    media = capture.get(2).map(|m| m.as_str().to_string());
                }
            }
            PayloadKind::Request | PayloadKind::Response => {
                let keyword_end = match self.kind {
                    PayloadKind::Request => p.request_keyword.find(line),
                    _ => p.response_keyword.find(line),
                }
                .map(|m| m.end())
                .unwrap_or(0);
                let mut rest = line[keyword_end..].trim().to_string();

                let snapshot = rest.clone();
                if let Some(capture) = p.trailing_parenthetical.captures(&snapshot) {
                    media = Some(capture[1].to_string());
                    let start = capture.get(0).map(|m| m.start()).unwrap_or(rest.len());
                    rest.truncate(start);
                }
                let rest = rest.trim();

                if self.kind == PayloadKind::Response {
                    if rest.is_empty() {
                        report.warn(
                            WarningCode::Formatting,
                            "missing response HTTP status code, expected a three-digit \
                             status, e.g. 'Response 200'",
                            ctx.charmap(&node.range),
                        );
                    } else if !p.status_code.is_match(rest) {
                        report.warn(
                            WarningCode::Formatting,
                            format!("'{rest}' is not a three-digit HTTP status code"),
                            ctx.charmap(&node.range),
                        );
                    }
                }
                out.payload.name = rest.to_string();
            }
        }

        if let Some(media) = media {
            let parsed = MediaType::parse(&media);
            let serialized = parsed.serialize();
            if !serialized.is_empty() {
                headers::append_header(
                    &mut out.payload.headers,
                    Header {
                        name: "Content-Type".to_string(),
                        value: serialized,
                    },
                    &ctx.charmap(&node.range),
                    report,
                );
                out.map.headers.push(ctx.charmap(&node.range));
                out.payload.media_type = Some(parsed);
            }
        }

        let remaining = remaining.trim_end();
        if !remaining.trim().is_empty() {
            if let Some(capture) = p.model_reference.captures(remaining.trim()) {
                out.payload.reference = Some(Reference {
                    id: capture[1].to_string(),
                    resolved: false,
                    ranges: ctx.charmap(&node.range),
                });
            } else {
                report.warn(
                    WarningCode::Indentation,
                    format!(
                        "the {} content should be a pre-formatted code block, \
                         indent every of its lines by 8 or 12 spaces",
                        self.kind.keyword()
                    ),
                    ctx.charmap(&node.range),
                );
                out.payload.body = text::recovered_asset(remaining);
                out.map.body = ctx.charmap(&node.range);
            }
        }
    }

    fn process_description(
        &mut self,
        node: &MarkdownNode,
        ctx: &mut ParseContext,
        out: &mut PayloadOutput,
        _report: &mut Report,
    ) {
        match node.kind {
            MarkdownNodeKind::Code => {
                out.payload.body.push_str(&node.text);
                out.map.body.extend(ctx.charmap(&node.range));
            }
            _ => {
                if out.payload.reference.is_none()
                    && out.payload.body.is_empty()
                    && self.pending.is_empty()
                {
                    if let Some(capture) = patterns().model_reference.captures(node.text.trim()) {
                        out.payload.reference = Some(Reference {
                            id: capture[1].to_string(),
                            resolved: false,
                            ranges: ctx.charmap(&node.range),
                        });
                        return;
                    }
                }
                append_description(&mut self.pending, node, ctx);
                self.pending_ranges.extend(ctx.charmap(&node.range));
            }
        }
    }

    fn accepts(&self, section: SectionType) -> bool {
        matches!(
            section,
            SectionType::Headers
                | SectionType::Body
                | SectionType::Schema
                | SectionType::Attributes
        )
    }

    fn process_nested(
        &mut self,
        section: SectionType,
        nodes: &[&MarkdownNode],
        index: usize,
        ctx: &mut ParseContext,
        out: &mut PayloadOutput,
        report: &mut Report,
    ) -> (usize, bool) {
        let node = nodes[index];
        self.saw_section = true;
        let mut halted = false;

        match section {
            SectionType::Headers => {
                let (parsed, headers_halted) = headers::parse_headers(node, ctx, report);
                for (header, map) in parsed.headers.into_iter().zip(parsed.maps) {
                    headers::append_header(&mut out.payload.headers, header, &map, report);
                    out.map.headers.push(map);
                }
                halted = headers_halted;
            }
            SectionType::Body => {
                let (parsed, body_halted) = asset::parse_asset(node, "body", true, ctx, report);
                if out.payload.reference.take().is_some() {
                    report.warn(
                        WarningCode::Ignoring,
                        "ignoring the model reference, the local body content \
                         supersedes it",
                        ctx.charmap(&node.range),
                    );
                }
                out.payload.body = parsed.content;
                out.map.body = parsed.map;
                halted = body_halted;
            }
            SectionType::Schema => {
                let (parsed, schema_halted) = asset::parse_asset(node, "schema", false, ctx, report);
                out.payload.schema = parsed.content;
                out.map.schema = parsed.map;
                halted = schema_halted;
            }
            SectionType::Attributes => {
                let (attributes, attributes_halted) = mson::parse_attributes(node, ctx, report);
                out.payload.attributes = Some(attributes);
                halted = attributes_halted;
            }
            _ => {}
        }

        (index + 1, halted)
    }

    fn finalize(
        &mut self,
        node: &MarkdownNode,
        ctx: &mut ParseContext,
        out: &mut PayloadOutput,
        report: &mut Report,
    ) {
        if !self.pending.is_empty() {
            if out.payload.body.is_empty() && out.payload.reference.is_none() && !self.saw_section {
                report.warn(
                    WarningCode::Indentation,
                    format!(
                        "the {} content should be a pre-formatted code block, \
                         indent every of its lines by 8 or 12 spaces",
                        self.kind.keyword()
                    ),
                    self.pending_ranges.clone(),
                );
                out.payload.body = text::recovered_asset(&self.pending);
                out.map.body = self.pending_ranges.clone();
            } else {
                out.payload.description = std::mem::take(&mut self.pending);
            }
        }

        if self.kind == PayloadKind::Request && out.payload.is_empty() {
            report.warn(
                WarningCode::EmptyDefinition,
                "no content specified for the request, expected a message body, \
                 schema, or headers",
                ctx.charmap(&node.range),
            );
        }
    }
}

/// Parse a request, response, or model payload rooted at `item`.
pub(crate) fn parse_payload(
    item: &MarkdownNode,
    kind: PayloadKind,
    ctx: &mut ParseContext,
    report: &mut Report,
) -> (PayloadOutput, bool) {
    let mut processor = PayloadProcessor {
        kind,
        pending: String::new(),
        pending_ranges: Vec::new(),
        saw_section: false,
    };
    let mut out = PayloadOutput::default();
    let halted = super::drive_list(&mut processor, item, ctx, &mut out, report);
    (out, halted)
}
