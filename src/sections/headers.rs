/// The `Headers` section: a list of `Name: Value` lines in a code block.
///
/// Header names keep their source case; duplicate detection compares
/// case-insensitively. Sections at resource or action level are deprecated
/// input — the caller re-injects their headers into every payload of the
/// affected scope.

use crate::ast::{Header, Headers};
use crate::classifier::SectionType;
use crate::diagnostics::{Report, WarningCode};
use crate::markdown::{MarkdownNode, MarkdownNodeKind};
use crate::signature::{parse_signature, SignatureTraits};
use crate::sourcemap::RangeSet;
use crate::span::CharRange;

use super::{drive_list, ParseContext, SectionProcessor};

#[derive(Debug, Default)]
pub(crate) struct HeadersOutput {
    pub headers: Headers,
    pub maps: Vec<RangeSet>,
}

struct HeadersProcessor;

impl HeadersProcessor {
    fn consume_lines(
        &self,
        content: &str,
        ranges: &[CharRange],
        out: &mut HeadersOutput,
        report: &mut Report,
    ) {
        for line in content.lines() {
            if line.trim().is_empty() {
                continue;
            }
            match line.split_once(':') {
                Some((name, value)) if !name.trim().is_empty() => {
                    append_header(
                        &mut out.headers,
                        Header {
                            name: name.trim().to_string(),
                            value: value.trim().to_string(),
                        },
                        ranges,
                        report,
                    );
                    out.maps.push(ranges.to_vec());
                }
                _ => {
                    report.warn(
                        WarningCode::Formatting,
                        format!("unable to parse HTTP header '{}', expected 'Name: Value'", line.trim()),
                        ranges.to_vec(),
                    );
                }
            }
        }
    }
}

impl SectionProcessor for HeadersProcessor {
    const TYPE: SectionType = SectionType::Headers;
    type Output = HeadersOutput;

    fn process_signature(
        &mut self,
        node: &MarkdownNode,
        ctx: &mut ParseContext,
        out: &mut HeadersOutput,
        report: &mut Report,
    ) {
        let signature = parse_signature(
            &node.text,
            SignatureTraits {
                identifier: true,
                ..SignatureTraits::NONE
            },
        );
        if !signature.remaining_content.is_empty() {
            report.warn(
                WarningCode::Indentation,
                "headers should be a pre-formatted code block, \
                 indent every of its lines by an additional 4 spaces",
                ctx.charmap(&node.range),
            );
            let ranges = ctx.charmap(&node.range);
            self.consume_lines(&signature.remaining_content, &ranges, out, report);
        }
    }

    fn accepts_description(&self) -> bool {
        false
    }

    fn accepts(&self, _section: SectionType) -> bool {
        false
    }

    fn process_nested(
        &mut self,
        _section: SectionType,
        _nodes: &[&MarkdownNode],
        index: usize,
        _ctx: &mut ParseContext,
        _out: &mut HeadersOutput,
        _report: &mut Report,
    ) -> (usize, bool) {
        (index + 1, false)
    }

    fn process_unexpected(
        &mut self,
        node: &MarkdownNode,
        ctx: &mut ParseContext,
        out: &mut HeadersOutput,
        report: &mut Report,
    ) {
        if node.kind != MarkdownNodeKind::Code {
            report.warn(
                WarningCode::Indentation,
                "headers should be a pre-formatted code block, \
                 indent every of its lines by an additional 4 spaces",
                ctx.charmap(&node.range),
            );
        }
        let ranges = ctx.charmap(&node.range);
        self.consume_lines(&node.text, &ranges, out, report);
    }

    fn finalize(
        &mut self,
        node: &MarkdownNode,
        ctx: &mut ParseContext,
        out: &mut HeadersOutput,
        report: &mut Report,
    ) {
        if out.headers.is_empty() {
            report.warn(
                WarningCode::EmptyDefinition,
                "no headers specified",
                ctx.charmap(&node.range),
            );
        }
    }
}

/// Parse a `Headers` section rooted at `item`.
pub(crate) fn parse_headers(
    item: &MarkdownNode,
    ctx: &mut ParseContext,
    report: &mut Report,
) -> (HeadersOutput, bool) {
    let mut processor = HeadersProcessor;
    let mut out = HeadersOutput::default();
    let halted = drive_list(&mut processor, item, ctx, &mut out, report);
    (out, halted)
}

/// Append a header, warning about case-insensitive duplicates. The
/// duplicate is kept: repeated headers are legal HTTP, merely suspicious
/// blueprint input.
pub(crate) fn append_header(
    headers: &mut Headers,
    header: Header,
    ranges: &[CharRange],
    report: &mut Report,
) {
    if headers
        .iter()
        .any(|existing| existing.name.eq_ignore_ascii_case(&header.name))
    {
        report.warn(
            WarningCode::Redefinition,
            format!("the '{}' header is already defined", header.name),
            ranges.to_vec(),
        );
    }
    headers.push(header);
}
