/// Block-level Markdown front-end.
///
/// Input:  UTF-8 source text
/// Output: a `MarkdownNode` tree of block nodes with byte-range sets
///
/// The section parser consumes this tree through the node contract only
/// (kind, text, children, range), so another Markdown front-end could be
/// swapped in behind the same shape.
///
/// Key guarantee: the scanner never fails — any input produces a Document.
/// Each node's range set holds one range per source line, starting after
/// the structural list indentation consumed at that nesting level, with
/// adjacent ranges merged and trailing blank lines attached to the
/// preceding block. Mapping a range set over the source therefore
/// reproduces the node's text as written.

mod blocks;

use crate::span::{ByteRange, ByteRangeSet};

/// The block node kinds of the Markdown contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkdownNodeKind {
    Document,
    /// ATX (`#`..`######`) or setext (`===`/`---` underline) header.
    Header(u8),
    Paragraph,
    ListBlock,
    ListItem,
    Code,
    Quote,
    HRule,
}

/// One block node.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkdownNode {
    pub kind: MarkdownNodeKind,
    /// Header/paragraph inline text, code content, or — for a list item —
    /// the item's own paragraph (signature line plus lazy continuations).
    pub text: String,
    pub children: Vec<MarkdownNode>,
    pub range: ByteRangeSet,
}

impl MarkdownNode {
    pub(crate) fn new(kind: MarkdownNodeKind) -> Self {
        MarkdownNode {
            kind,
            text: String::new(),
            children: Vec::new(),
            range: ByteRangeSet::new(),
        }
    }
}

/// Pre-computed information about one source line.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Line<'a> {
    /// The raw line text (without the trailing newline).
    pub text: &'a str,
    /// Byte offset of the line start in the source.
    pub offset: usize,
    /// Structural indentation columns consumed by enclosing list items.
    pub strip: usize,
    /// Whether the line was terminated by a newline in the source.
    pub newline: bool,
}

impl<'a> Line<'a> {
    /// The line with the structural columns removed. The strip count is a
    /// fixed cut: list collection assigns it so it never exceeds the
    /// line's actual prefix (the marker itself included, for the item's
    /// own first line).
    pub fn content(&self) -> &'a str {
        &self.text[self.cut()..]
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// The byte range of this line's content plus its newline.
    pub fn range(&self) -> ByteRange {
        let take = self.cut();
        let extra = if self.newline { 1 } else { 0 };
        ByteRange::new(self.offset + take, self.text.len() - take + extra)
    }

    fn cut(&self) -> usize {
        let mut take = self.strip.min(self.text.len());
        while take > 0 && !self.text.is_char_boundary(take) {
            take -= 1;
        }
        take
    }
}

/// Count leading space characters.
pub(crate) fn leading_spaces(line: &str) -> usize {
    line.bytes().take_while(|&b| b == b' ').count()
}

/// Split source into lines, tracking byte offsets. The trailing `\r` of
/// CRLF endings is kept out of the text but inside the offsets.
fn split_lines(source: &str) -> Vec<Line<'_>> {
    let mut lines = Vec::new();
    let mut offset = 0;

    let mut rest = source;
    loop {
        match rest.find('\n') {
            Some(pos) => {
                let raw = &rest[..pos];
                let text = raw.strip_suffix('\r').unwrap_or(raw);
                lines.push(Line {
                    text,
                    offset,
                    strip: 0,
                    newline: true,
                });
                offset += pos + 1;
                rest = &rest[pos + 1..];
            }
            None => {
                if !rest.is_empty() {
                    let text = rest.strip_suffix('\r').unwrap_or(rest);
                    lines.push(Line {
                        text,
                        offset,
                        strip: 0,
                        newline: false,
                    });
                }
                break;
            }
        }
    }

    lines
}

/// Scan a source buffer into its block tree.
pub fn scan(source: &str) -> MarkdownNode {
    // Strip a UTF-8 BOM before anything else.
    let source = source.strip_prefix('\u{FEFF}').unwrap_or(source);
    let lines = split_lines(source);

    let mut document = MarkdownNode::new(MarkdownNodeKind::Document);
    document.children = blocks::parse_blocks(&lines);
    for child in &document.children {
        document.range.extend(&child.range);
    }
    document
}
