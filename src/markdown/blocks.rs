/// Block scanner.
///
/// Processes lines sequentially, matching each against the ordered block
/// alternatives: indented code, fenced code, quote, horizontal rule, ATX
/// header, list, paragraph (with setext-header closure). List items are
/// collected with their indented content and lazy continuations, then
/// re-scanned recursively at the reduced indentation.

use super::{leading_spaces, Line, MarkdownNode, MarkdownNodeKind};

/// Scan a run of lines into sibling block nodes. Blank lines after a block
/// attach to that block's range.
pub(crate) fn parse_blocks(lines: &[Line]) -> Vec<MarkdownNode> {
    let mut nodes = Vec::new();
    let mut i = 0;

    while i < lines.len() && lines[i].is_blank() {
        i += 1;
    }

    while i < lines.len() {
        let (mut node, next) = parse_block(lines, i);
        i = next;
        while i < lines.len() && lines[i].is_blank() {
            node.range.append(lines[i].range());
            i += 1;
        }
        nodes.push(node);
    }

    nodes
}

/// Block dispatch: try each alternative in order. Always consumes at least
/// one line.
fn parse_block(lines: &[Line], i: usize) -> (MarkdownNode, usize) {
    let content = lines[i].content();
    let indent = leading_spaces(content);

    if indent >= 4 {
        return parse_indented_code(lines, i);
    }

    let trimmed = content.trim();

    if trimmed.starts_with("```") {
        return parse_fenced_code(lines, i);
    }
    if trimmed.starts_with('>') {
        return parse_quote(lines, i);
    }
    if is_hrule(trimmed) {
        let mut node = MarkdownNode::new(MarkdownNodeKind::HRule);
        node.range.append(lines[i].range());
        return (node, i + 1);
    }
    if let Some((level, text)) = atx_header(trimmed) {
        let mut node = MarkdownNode::new(MarkdownNodeKind::Header(level));
        node.text = text;
        node.range.append(lines[i].range());
        return (node, i + 1);
    }
    if list_marker(content).is_some() {
        return parse_list(lines, i);
    }

    parse_paragraph(lines, i)
}

// ── Leaf blocks ──

fn parse_indented_code(lines: &[Line], start: usize) -> (MarkdownNode, usize) {
    let mut node = MarkdownNode::new(MarkdownNodeKind::Code);
    let mut i = start;

    while i < lines.len() {
        let line = &lines[i];
        if line.is_blank() {
            // Interior blank lines stay in the block; trailing ones do not.
            let mut ahead = i;
            while ahead < lines.len() && lines[ahead].is_blank() {
                ahead += 1;
            }
            if ahead < lines.len() && leading_spaces(lines[ahead].content()) >= 4 {
                for blank in &lines[i..ahead] {
                    node.text.push('\n');
                    node.range.append(blank.range());
                }
                i = ahead;
                continue;
            }
            break;
        }
        let content = line.content();
        if leading_spaces(content) < 4 {
            break;
        }
        node.text.push_str(&content[4.min(content.len())..]);
        node.text.push('\n');
        node.range.append(line.range());
        i += 1;
    }

    (node, i)
}

fn parse_fenced_code(lines: &[Line], start: usize) -> (MarkdownNode, usize) {
    let mut node = MarkdownNode::new(MarkdownNodeKind::Code);
    node.range.append(lines[start].range());

    let mut i = start + 1;
    while i < lines.len() {
        let line = &lines[i];
        node.range.append(line.range());
        i += 1;
        if line.content().trim().starts_with("```") {
            return (node, i);
        }
        node.text.push_str(line.content());
        node.text.push('\n');
    }

    (node, i)
}

fn parse_quote(lines: &[Line], start: usize) -> (MarkdownNode, usize) {
    let mut node = MarkdownNode::new(MarkdownNodeKind::Quote);
    let mut i = start;

    while i < lines.len() && !lines[i].is_blank() {
        let content = lines[i].content();
        let trimmed = content.trim_start();
        if !trimmed.starts_with('>') {
            break;
        }
        let inner = trimmed[1..].strip_prefix(' ').unwrap_or(&trimmed[1..]);
        node.text.push_str(inner);
        node.text.push('\n');
        node.range.append(lines[i].range());
        i += 1;
    }

    (node, i)
}

fn parse_paragraph(lines: &[Line], start: usize) -> (MarkdownNode, usize) {
    let mut node = MarkdownNode::new(MarkdownNodeKind::Paragraph);
    node.text.push_str(lines[start].content());
    node.range.append(lines[start].range());

    let mut i = start + 1;
    while i < lines.len() {
        let line = &lines[i];
        if line.is_blank() {
            break;
        }
        let content = line.content();
        if leading_spaces(content) < 4 {
            let trimmed = content.trim();
            if let Some(level) = setext_level(trimmed) {
                // The paragraph so far becomes a setext header covering the
                // underline as well.
                node.kind = MarkdownNodeKind::Header(level);
                node.range.append(line.range());
                return (node, i + 1);
            }
            if interrupts_paragraph(content, trimmed) {
                break;
            }
        }
        node.text.push('\n');
        node.text.push_str(content);
        node.range.append(line.range());
        i += 1;
    }

    (node, i)
}

// ── Lists ──

fn parse_list(lines: &[Line], start: usize) -> (MarkdownNode, usize) {
    let mut list = MarkdownNode::new(MarkdownNodeKind::ListBlock);
    let marker_indent = leading_spaces(lines[start].content());
    let mut i = start;

    loop {
        let (mut item, next) = parse_item(lines, i, marker_indent);
        i = next;
        while i < lines.len() && lines[i].is_blank() {
            item.range.append(lines[i].range());
            i += 1;
        }
        list.range.extend(&item.range);
        list.children.push(item);

        // Another item at the same marker indent continues the list.
        let more = i < lines.len()
            && list_marker(lines[i].content())
                .map(|(indent, _)| indent == marker_indent)
                .unwrap_or(false);
        if !more {
            break;
        }
    }

    (list, i)
}

fn parse_item(lines: &[Line], start: usize, marker_indent: usize) -> (MarkdownNode, usize) {
    let marker_line = &lines[start];
    let content = marker_line.content();
    let (_, text_start) = list_marker(content).expect("caller matched a list marker");

    let mut item = MarkdownNode::new(MarkdownNodeKind::ListItem);
    item.range.append(marker_line.range());

    // The item's lines, re-based for the nested scan. The first entry is
    // the marker line with the marker itself stripped.
    let mut inner: Vec<Line> = vec![Line {
        strip: marker_line.strip + text_start,
        ..*marker_line
    }];
    let mut pending_blanks: Vec<&Line> = Vec::new();

    let mut i = start + 1;
    while i < lines.len() {
        let line = &lines[i];
        if line.is_blank() {
            pending_blanks.push(line);
            i += 1;
            continue;
        }

        let line_content = line.content();
        let indent = leading_spaces(line_content);

        if indent > marker_indent {
            for blank in pending_blanks.drain(..) {
                item.range.append(blank.range());
                inner.push(*blank);
            }
            item.range.append(line.range());
            inner.push(Line {
                strip: line.strip + indent.min(marker_indent + 4),
                ..*line
            });
            i += 1;
        } else if pending_blanks.is_empty() && is_lazy_continuation(line_content) {
            item.range.append(line.range());
            inner.push(Line {
                strip: line.strip + indent,
                ..*line
            });
            i += 1;
        } else {
            // Leave unconsumed blanks for the caller to attach.
            i -= pending_blanks.len();
            break;
        }
    }
    if i == lines.len() {
        i -= pending_blanks.len();
    }

    let mut children = parse_blocks(&inner);

    // The leading paragraph is the item's own text (signature line plus
    // lazy continuations); deeper blocks stay as children.
    if !children.is_empty()
        && children[0].kind == MarkdownNodeKind::Paragraph
        && !inner[0].content().trim().is_empty()
    {
        item.text = children.remove(0).text;
    } else {
        item.text = inner[0].content().trim_end().to_string();
    }
    item.children = children;

    (item, i)
}

/// A line that continues the item's paragraph despite insufficient indent.
fn is_lazy_continuation(content: &str) -> bool {
    let trimmed = content.trim();
    !(trimmed.is_empty()
        || list_marker(content).is_some()
        || atx_header(trimmed).is_some()
        || is_hrule(trimmed)
        || setext_level(trimmed).is_some()
        || trimmed.starts_with("```")
        || trimmed.starts_with('>'))
}

// ── Line shape predicates ──

/// Match an unordered list marker. Returns (marker indent, offset of the
/// item text within the content).
fn list_marker(content: &str) -> Option<(usize, usize)> {
    let indent = leading_spaces(content);
    if indent >= 4 {
        return None;
    }
    let rest = &content[indent..];
    let mut chars = rest.chars();
    match chars.next() {
        Some('+') | Some('-') | Some('*') => {}
        _ => return None,
    }
    match chars.next() {
        Some(' ') => Some((indent, indent + 2)),
        None => Some((indent, indent + 1)),
        _ => None,
    }
}

/// Match an ATX header line. Returns (level, text).
fn atx_header(trimmed: &str) -> Option<(u8, String)> {
    let level = trimmed.bytes().take_while(|&b| b == b'#').count();
    if level == 0 || level > 6 {
        return None;
    }
    let rest = &trimmed[level..];
    if !rest.is_empty() && !rest.starts_with(' ') {
        return None;
    }

    let mut text = rest.trim().to_string();
    // Strip an optional closing hash run (` ###`).
    let closing = text.bytes().rev().take_while(|&b| b == b'#').count();
    if closing > 0 {
        let cut = text.len() - closing;
        if cut == 0 {
            text.clear();
        } else if text.as_bytes()[cut - 1] == b' ' {
            text.truncate(cut);
            text = text.trim_end().to_string();
        }
    }

    Some((level as u8, text))
}

fn is_hrule(trimmed: &str) -> bool {
    let mut rule_char = None;
    let mut count = 0;
    for ch in trimmed.chars() {
        match ch {
            ' ' => continue,
            '-' | '*' | '_' => match rule_char {
                None => {
                    rule_char = Some(ch);
                    count = 1;
                }
                Some(c) if c == ch => count += 1,
                _ => return false,
            },
            _ => return false,
        }
    }
    count >= 3
}

/// Match a setext underline closing the paragraph above: `===` (h1) or
/// `---` (h2).
fn setext_level(trimmed: &str) -> Option<u8> {
    if !trimmed.is_empty() && trimmed.bytes().all(|b| b == b'=') {
        return Some(1);
    }
    if trimmed.len() >= 2 && trimmed.bytes().all(|b| b == b'-') {
        return Some(2);
    }
    None
}

fn interrupts_paragraph(content: &str, trimmed: &str) -> bool {
    list_marker(content).is_some()
        || atx_header(trimmed).is_some()
        || is_hrule(trimmed)
        || trimmed.starts_with("```")
        || trimmed.starts_with('>')
}

#[cfg(test)]
mod tests {
    use crate::markdown::{scan, MarkdownNodeKind};

    #[test]
    fn headers_paragraphs_and_code() {
        let doc = scan("# Title\n\nBody text\n\n    code line\n");
        assert_eq!(doc.children.len(), 3);
        assert_eq!(doc.children[0].kind, MarkdownNodeKind::Header(1));
        assert_eq!(doc.children[0].text, "Title");
        assert_eq!(doc.children[1].kind, MarkdownNodeKind::Paragraph);
        assert_eq!(doc.children[2].kind, MarkdownNodeKind::Code);
        assert_eq!(doc.children[2].text, "code line\n");
    }

    #[test]
    fn list_item_with_code_child() {
        let doc = scan("+ Response 200 (text/plain)\n\n        OK.\n");
        assert_eq!(doc.children.len(), 1);
        let list = &doc.children[0];
        assert_eq!(list.kind, MarkdownNodeKind::ListBlock);
        let item = &list.children[0];
        assert_eq!(item.kind, MarkdownNodeKind::ListItem);
        assert_eq!(item.text, "Response 200 (text/plain)");
        assert_eq!(item.children.len(), 1);
        assert_eq!(item.children[0].kind, MarkdownNodeKind::Code);
        assert_eq!(item.children[0].text, "OK.\n");
    }

    #[test]
    fn lazy_continuation_joins_item_text() {
        let doc = scan("+ Request\np1\n");
        let item = &doc.children[0].children[0];
        assert_eq!(item.text, "Request\np1");
        assert!(item.children.is_empty());
    }

    #[test]
    fn shallow_and_deep_sublists_nest() {
        for indent in ["  ", "    "] {
            let source = format!("+ Parameters\n{indent}+ id\n");
            let doc = scan(&source);
            let parameters = &doc.children[0].children[0];
            assert_eq!(parameters.text, "Parameters");
            assert_eq!(parameters.children.len(), 1);
            assert_eq!(parameters.children[0].kind, MarkdownNodeKind::ListBlock);
            assert_eq!(parameters.children[0].children[0].text, "id");
        }
    }

    #[test]
    fn blank_line_ends_lazy_continuation() {
        let doc = scan("# /1\n+ A\n+ B\n\np1\n");
        assert_eq!(doc.children.len(), 3);
        let list = &doc.children[1];
        assert_eq!(list.children.len(), 2);
        assert_eq!(list.children[0].text, "A");
        assert_eq!(list.children[1].text, "B");
        assert_eq!(doc.children[2].kind, MarkdownNodeKind::Paragraph);
        assert_eq!(doc.children[2].text, "p1");
    }

    #[test]
    fn setext_underline_closes_paragraph_as_header() {
        let doc = scan("A\n---\nB\n");
        assert_eq!(doc.children.len(), 2);
        assert_eq!(doc.children[0].kind, MarkdownNodeKind::Header(2));
        assert_eq!(doc.children[0].text, "A");
        assert_eq!(doc.children[1].text, "B");
    }

    #[test]
    fn standalone_rule_is_hrule() {
        let doc = scan("A\n\n---\n\nB\n");
        assert_eq!(doc.children.len(), 3);
        assert_eq!(doc.children[1].kind, MarkdownNodeKind::HRule);
    }

    #[test]
    fn fenced_code_keeps_content_verbatim() {
        let doc = scan("```js\ndangling request body\n```\n");
        assert_eq!(doc.children.len(), 1);
        assert_eq!(doc.children[0].kind, MarkdownNodeKind::Code);
        assert_eq!(doc.children[0].text, "dangling request body\n");
    }

    #[test]
    fn item_range_maps_back_to_source() {
        let source = "+ Body\n\n    { ... }\n\n+ Response 200\n";
        let doc = scan(source);
        let body = &doc.children[0].children[0];
        assert_eq!(body.range.map(source), "+ Body\n\n    { ... }\n\n");
    }

    #[test]
    fn paragraph_range_includes_trailing_blank() {
        let source = "# H [/]\n\nAwesome description\n\n+ Model\n";
        let doc = scan(source);
        let paragraph = &doc.children[1];
        assert_eq!(paragraph.range.map(source), "Awesome description\n\n");
    }

    #[test]
    fn nested_parameter_description_maps_dedented() {
        let source = "+ Parameters\n    + id\n\n        Lorem ipsum\n    + limit\n";
        let doc = scan(source);
        let parameters = &doc.children[0].children[0];
        let id = &parameters.children[0].children[0];
        assert_eq!(id.text, "id");
        assert_eq!(id.children[0].kind, MarkdownNodeKind::Paragraph);
        assert_eq!(id.children[0].range.map(source), "Lorem ipsum\n");
    }
}
