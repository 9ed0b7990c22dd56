/// Asset sections: `Body` and `Schema`.
///
/// An asset's content is expected as a pre-formatted code block nested in
/// the section's list item. Mis-indented content arrives as paragraphs
/// instead; it is recovered verbatim with an `IndentationWarning`.

use crate::classifier::SectionType;
use crate::diagnostics::{Report, WarningCode};
use crate::markdown::{MarkdownNode, MarkdownNodeKind};
use crate::patterns::patterns;
use crate::signature::{parse_signature, SignatureTraits};
use crate::sourcemap::RangeSet;
use crate::text;

use super::{drive_list, ParseContext, SectionProcessor};

/// A parsed asset buffer plus its source map.
#[derive(Debug, Default)]
pub(crate) struct Asset {
    pub content: String,
    pub map: RangeSet,
}

struct AssetProcessor {
    /// "body" or "schema", for messages.
    keyword: &'static str,
    /// Whether a lone model reference in the content should be flagged.
    check_reference: bool,
}

impl SectionProcessor for AssetProcessor {
    const TYPE: SectionType = SectionType::Body;
    type Output = Asset;

    fn process_signature(
        &mut self,
        node: &MarkdownNode,
        ctx: &mut ParseContext,
        out: &mut Asset,
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
                format!(
                    "the {} content should be a pre-formatted code block, \
                     indent every of its lines by an additional 4 spaces",
                    self.keyword
                ),
                ctx.charmap(&node.range),
            );
            out.content.push_str(&text::recovered_asset(&signature.remaining_content));
            out.map = ctx.charmap(&node.range);
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
        _out: &mut Asset,
        _report: &mut Report,
    ) -> (usize, bool) {
        (index + 1, false)
    }

    fn process_unexpected(
        &mut self,
        node: &MarkdownNode,
        ctx: &mut ParseContext,
        out: &mut Asset,
        report: &mut Report,
    ) {
        match node.kind {
            MarkdownNodeKind::Code => {
                out.content.push_str(&node.text);
                out.map.extend(ctx.charmap(&node.range));
            }
            _ => {
                report.warn(
                    WarningCode::Indentation,
                    format!(
                        "the {} content should be a pre-formatted code block, \
                         indent every of its lines by an additional 4 spaces",
                        self.keyword
                    ),
                    ctx.charmap(&node.range),
                );
                out.content.push_str(&text::recovered_asset(&node.text));
                out.map.extend(ctx.charmap(&node.range));
            }
        }
    }

    fn finalize(
        &mut self,
        node: &MarkdownNode,
        ctx: &mut ParseContext,
        out: &mut Asset,
        report: &mut Report,
    ) {
        if out.content.is_empty() {
            report.warn(
                WarningCode::EmptyDefinition,
                format!("empty {} asset", self.keyword),
                ctx.charmap(&node.range),
            );
            return;
        }

        if self.check_reference && patterns().model_reference.is_match(out.content.trim()) {
            // A reference inside an explicit asset never resolves; the
            // literal text is kept.
            report.warn(
                WarningCode::Ignoring,
                "ignoring the model reference in an explicit asset, \
                 the content is kept as written",
                ctx.charmap(&node.range),
            );
        }
    }
}

/// Parse a `Body` or `Schema` section rooted at `item`.
pub(crate) fn parse_asset(
    item: &MarkdownNode,
    keyword: &'static str,
    check_reference: bool,
    ctx: &mut ParseContext,
    report: &mut Report,
) -> (Asset, bool) {
    let mut processor = AssetProcessor {
        keyword,
        check_reference,
    };
    let mut asset = Asset::default();
    let halted = drive_list(&mut processor, item, ctx, &mut asset, report);
    (asset, halted)
}
