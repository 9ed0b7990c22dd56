/// The section processor family and its generic driver.
///
/// Each section kind implements `SectionProcessor`; the driver sequences
/// the four phases against the subtree rooted at the section's opening
/// node:
///
/// ```text
/// signature → description → nested dispatch → finalize
/// ```
///
/// Two adapters exist. Header-rooted sections (`drive_headed`) consume
/// siblings after their header until a node classifies as a section they
/// do not accept — that node belongs to an ancestor. List-rooted sections
/// (`drive_list`) own every child of their list item; nodes they do not
/// accept are warned about and skipped.
///
/// Fatal errors stop exactly one driver: a section whose processing raises
/// the error reports `halted` to its parent, the parent stops walking that
/// section's further siblings, and the grandparent carries on.

pub mod action;
pub mod asset;
pub mod blueprint;
pub mod data_structures;
pub mod example;
pub mod headers;
pub mod mson;
pub mod parameters;
pub mod payload;
pub mod resource;
pub mod resource_group;

use crate::classifier::{classify, SectionType};
use crate::diagnostics::{Report, WarningCode};
use crate::markdown::{MarkdownNode, MarkdownNodeKind};
use crate::span::{to_character_ranges, ByteRangeSet, CharRange};
use crate::symbol_table::SymbolTable;
use crate::text;
use crate::ParseOptions;

/// Parse-wide state threaded through every processor.
pub(crate) struct ParseContext<'a> {
    pub source: &'a str,
    pub options: ParseOptions,
    pub symbols: SymbolTable,
}

impl<'a> ParseContext<'a> {
    pub fn new(source: &'a str, options: ParseOptions) -> Self {
        ParseContext {
            source,
            options,
            symbols: SymbolTable::new(),
        }
    }

    /// Translate a node's byte ranges for a diagnostic or source map.
    pub fn charmap(&self, set: &ByteRangeSet) -> Vec<CharRange> {
        to_character_ranges(set, self.source)
    }
}

/// One section kind's behavior, dispatched statically through the driver.
pub(crate) trait SectionProcessor {
    const TYPE: SectionType;
    type Output;

    fn process_signature(
        &mut self,
        node: &MarkdownNode,
        ctx: &mut ParseContext,
        out: &mut Self::Output,
        report: &mut Report,
    );

    /// Whether undefined nodes before the first nested section accumulate
    /// as description.
    fn accepts_description(&self) -> bool {
        true
    }

    fn process_description(
        &mut self,
        _node: &MarkdownNode,
        _ctx: &mut ParseContext,
        _out: &mut Self::Output,
        _report: &mut Report,
    ) {
    }

    /// The nested section types this processor consumes.
    fn accepts(&self, section: SectionType) -> bool;

    /// Parse one nested section starting at `index`. Returns the index past
    /// the consumed subtree and whether that child section halted.
    fn process_nested(
        &mut self,
        section: SectionType,
        nodes: &[&MarkdownNode],
        index: usize,
        ctx: &mut ParseContext,
        out: &mut Self::Output,
        report: &mut Report,
    ) -> (usize, bool);

    fn process_unexpected(
        &mut self,
        node: &MarkdownNode,
        ctx: &mut ParseContext,
        _out: &mut Self::Output,
        report: &mut Report,
    ) {
        ignore_node(node, ctx, report);
    }

    fn finalize(
        &mut self,
        _node: &MarkdownNode,
        _ctx: &mut ParseContext,
        _out: &mut Self::Output,
        _report: &mut Report,
    ) {
    }
}

/// Drive a header-rooted section over its sibling scope. Returns the index
/// of the first sibling left unconsumed, and whether this section halted.
pub(crate) fn drive_headed<P: SectionProcessor>(
    processor: &mut P,
    nodes: &[&MarkdownNode],
    start: usize,
    ctx: &mut ParseContext,
    out: &mut P::Output,
    report: &mut Report,
) -> (usize, bool) {
    let opening = nodes[start];
    let had_error = report.has_error();

    processor.process_signature(opening, ctx, out, report);
    let mut halted = !had_error && report.has_error();

    let (next, loop_halted) = if halted {
        (start + 1, false)
    } else {
        phase_loop(processor, nodes, start + 1, false, ctx, out, report)
    };
    halted = halted || loop_halted;

    let before_finalize = report.has_error();
    processor.finalize(opening, ctx, out, report);
    if !before_finalize && report.has_error() {
        halted = true;
    }

    (next, halted)
}

/// Drive a list-rooted section over its item's children. Returns whether
/// this section halted.
pub(crate) fn drive_list<P: SectionProcessor>(
    processor: &mut P,
    item: &MarkdownNode,
    ctx: &mut ParseContext,
    out: &mut P::Output,
    report: &mut Report,
) -> bool {
    let had_error = report.has_error();

    processor.process_signature(item, ctx, out, report);
    let mut halted = !had_error && report.has_error();

    let children = flatten(&item.children);
    let loop_halted = if halted {
        false
    } else {
        phase_loop(processor, &children, 0, true, ctx, out, report).1
    };
    halted = halted || loop_halted;

    let before_finalize = report.has_error();
    processor.finalize(item, ctx, out, report);
    if !before_finalize && report.has_error() {
        halted = true;
    }

    halted
}

/// Description accumulation and nested dispatch, shared by both adapters.
fn phase_loop<P: SectionProcessor>(
    processor: &mut P,
    nodes: &[&MarkdownNode],
    from: usize,
    contained: bool,
    ctx: &mut ParseContext,
    out: &mut P::Output,
    report: &mut Report,
) -> (usize, bool) {
    let mut i = from;
    let mut description_phase = true;

    while i < nodes.len() {
        let node = nodes[i];
        let section = classify(node, P::TYPE);

        if section == SectionType::Undefined {
            if description_phase && processor.accepts_description() {
                processor.process_description(node, ctx, out, report);
            } else {
                processor.process_unexpected(node, ctx, out, report);
            }
            i += 1;
            continue;
        }

        if processor.accepts(section) {
            description_phase = false;
            let had_error = report.has_error();
            let (next, child_halted) = processor.process_nested(section, nodes, i, ctx, out, report);
            i = next.max(i + 1);
            if child_halted {
                // The child failed; stop walking its further siblings.
                return (i, false);
            }
            if !had_error && report.has_error() {
                // The error came from this processor's own dispatch code.
                return (i, true);
            }
            continue;
        }

        if contained {
            processor.process_unexpected(node, ctx, out, report);
            i += 1;
        } else {
            // The node opens a section an ancestor owns.
            break;
        }
    }

    (i, false)
}

/// Expand list blocks into their items so the driver dispatches on
/// individual sections.
pub(crate) fn flatten(children: &[MarkdownNode]) -> Vec<&MarkdownNode> {
    let mut nodes = Vec::with_capacity(children.len());
    for child in children {
        if child.kind == MarkdownNodeKind::ListBlock {
            nodes.extend(child.children.iter());
        } else {
            nodes.push(child);
        }
    }
    nodes
}

/// Append one description node's source text, keeping blocks separated by
/// a blank line exactly as they were written.
pub(crate) fn append_description(
    description: &mut String,
    node: &MarkdownNode,
    ctx: &ParseContext,
) {
    text::two_newlines(description);
    description.push_str(&node.range.map(ctx.source));
}

/// The shared unexpected-node warning.
pub(crate) fn ignore_node(node: &MarkdownNode, ctx: &ParseContext, report: &mut Report) {
    report.warn(
        WarningCode::Ignoring,
        "ignoring unrecognized block",
        ctx.charmap(&node.range),
    );
}
