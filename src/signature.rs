/// Section signature sub-grammar.
///
/// The first line of a section is parsed into its structured parts
/// according to the traits the section processor declares:
///
/// ```text
/// identifier : value-1, value-2 (attribute-1, attribute-2) - content
/// ```
///
/// Backtick-quoted runs escape the delimiters (`:`, `(`, `,`); an
/// unterminated run is reported back to the caller and the remainder is
/// taken verbatim. Lines after the first are handed through untouched as
/// `remaining_content`.

use crate::mson;
use crate::text;

/// Which parts of the grammar a processor expects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SignatureTraits {
    pub identifier: bool,
    pub value: bool,
    pub values: bool,
    pub attributes: bool,
    pub content: bool,
}

impl SignatureTraits {
    pub const NONE: SignatureTraits = SignatureTraits {
        identifier: false,
        value: false,
        values: false,
        attributes: false,
        content: false,
    };
}

/// A parsed signature.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Signature {
    pub identifier: String,
    /// The raw text after the colon (backticks preserved).
    pub value: String,
    /// The comma-separated value tokens, raw.
    pub values: Vec<String>,
    /// The comma-separated attribute tokens, raw. Unknown tokens are
    /// preserved here even when nothing interprets them.
    pub attributes: Vec<String>,
    /// The first attribute token that is not a requirement keyword, parsed
    /// as a type specification.
    pub type_spec: Option<mson::TypeSpecification>,
    /// Inline content after the grammar on the first line.
    pub content: String,
    /// Everything after the first line, verbatim.
    pub remaining_content: String,
    /// Set when a backtick run never closed; the affected part was taken
    /// verbatim. The caller owns turning this into a warning.
    pub unterminated_escape: bool,
}

/// Parse the signature of a section out of its node text.
pub fn parse_signature(node_text: &str, traits: SignatureTraits) -> Signature {
    let (line, rest) = text::first_line(node_text);
    let mut signature = Signature {
        remaining_content: rest.to_string(),
        ..Signature::default()
    };

    let mut cursor = line.trim_start();

    if traits.identifier {
        let (identifier, stop, remainder) =
            scan_until(cursor, &[b':', b'('], traits.content, &mut signature);
        signature.identifier = identifier.trim().to_string();
        cursor = remainder;

        if stop == Some(b':') {
            cursor = &cursor[1..];
            if traits.value || traits.values {
                let (section, _, remainder) =
                    scan_until(cursor, &[b'('], traits.content, &mut signature);
                signature.value = section.trim().to_string();
                if traits.values {
                    signature.values = split_escaped(section, b',')
                        .into_iter()
                        .map(|token| token.trim().to_string())
                        .filter(|token| !token.is_empty())
                        .collect();
                }
                cursor = remainder;
            }
        }
    }

    if traits.attributes && cursor.starts_with('(') {
        let (section, stop, remainder) = scan_until(&cursor[1..], &[b')'], false, &mut signature);
        signature.attributes = split_escaped(section, b',')
            .into_iter()
            .map(|token| token.trim().to_string())
            .filter(|token| !token.is_empty())
            .collect();
        signature.type_spec = signature
            .attributes
            .iter()
            .find(|token| mson::parse_type_attribute(token).is_none())
            .map(|token| mson::parse_type_specification(token));
        cursor = if stop == Some(b')') {
            &remainder[1..]
        } else {
            remainder
        };
    }

    if traits.content {
        let mut content = cursor.trim();
        // An inline description may be introduced by a dash separator.
        if let Some(stripped) = content.strip_prefix("- ") {
            content = stripped.trim_start();
        } else if content == "-" {
            content = "";
        }
        signature.content = content.to_string();
    }

    signature
}

/// Scan up to the first unescaped stop byte — or, when `content_mark` is
/// set, the ` - ` separator introducing inline content. Returns the scanned
/// slice, the stop byte found (if any), and the remainder starting at the
/// stop.
fn scan_until<'a>(
    input: &'a str,
    stops: &[u8],
    content_mark: bool,
    signature: &mut Signature,
) -> (&'a str, Option<u8>, &'a str) {
    let bytes = input.as_bytes();
    let mut escaped = false;
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        if b == b'`' {
            escaped = !escaped;
        } else if !escaped && stops.contains(&b) {
            return (&input[..i], Some(b), &input[i..]);
        } else if !escaped
            && content_mark
            && b == b' '
            && bytes.get(i + 1) == Some(&b'-')
            && bytes.get(i + 2) == Some(&b' ')
        {
            return (&input[..i], Some(b' '), &input[i..]);
        }
        i += 1;
    }

    if escaped {
        signature.unterminated_escape = true;
    }
    (input, None, "")
}

/// Split on a delimiter, honoring backtick escapes and bracket nesting
/// (`array[string, number]` stays one token).
fn split_escaped(input: &str, delimiter: u8) -> Vec<&str> {
    let bytes = input.as_bytes();
    let mut tokens = Vec::new();
    let mut escaped = false;
    let mut depth = 0usize;
    let mut start = 0;

    for (i, &b) in bytes.iter().enumerate() {
        match b {
            b'`' => escaped = !escaped,
            b'[' if !escaped => depth += 1,
            b']' if !escaped => depth = depth.saturating_sub(1),
            _ if b == delimiter && !escaped && depth == 0 => {
                tokens.push(&input[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    tokens.push(&input[start..]);
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mson::{BaseTypeName, TypeName};

    const MEMBER: SignatureTraits = SignatureTraits {
        identifier: true,
        value: false,
        values: true,
        attributes: true,
        content: true,
    };

    #[test]
    fn full_member_signature() {
        let sig = parse_signature("rel: self, parent (required, enum[string]) - link relation", MEMBER);
        assert_eq!(sig.identifier, "rel");
        assert_eq!(sig.values, vec!["self", "parent"]);
        assert_eq!(sig.attributes, vec!["required", "enum[string]"]);
        let spec = sig.type_spec.unwrap();
        assert_eq!(spec.name, Some(TypeName::Base(BaseTypeName::Enum)));
        assert_eq!(sig.content, "link relation");
    }

    #[test]
    fn backticks_escape_delimiters() {
        let sig = parse_signature("`a:b`: `one, two`, three", SignatureTraits {
            identifier: true,
            values: true,
            ..SignatureTraits::NONE
        });
        assert_eq!(sig.identifier, "`a:b`");
        assert_eq!(sig.values, vec!["`one, two`", "three"]);
        assert!(!sig.unterminated_escape);
    }

    #[test]
    fn unterminated_backtick_is_flagged() {
        let sig = parse_signature("name: `broken", SignatureTraits {
            identifier: true,
            value: true,
            ..SignatureTraits::NONE
        });
        assert!(sig.unterminated_escape);
        assert_eq!(sig.value, "`broken");
    }

    #[test]
    fn remaining_lines_pass_through() {
        let sig = parse_signature("Sample\nline two\nline three", SignatureTraits {
            identifier: true,
            ..SignatureTraits::NONE
        });
        assert_eq!(sig.identifier, "Sample");
        assert_eq!(sig.remaining_content, "line two\nline three");
    }

    #[test]
    fn dash_introduces_content_without_attributes() {
        let sig = parse_signature("red - a color", MEMBER);
        assert_eq!(sig.identifier, "red");
        assert_eq!(sig.content, "a color");

        let sig = parse_signature("name: Ted - the name", MEMBER);
        assert_eq!(sig.identifier, "name");
        assert_eq!(sig.values, vec!["Ted"]);
        assert_eq!(sig.content, "the name");
    }

    #[test]
    fn bracketed_types_keep_their_commas() {
        let sig = parse_signature("list (array[string, number])", MEMBER);
        assert_eq!(sig.attributes, vec!["array[string, number]"]);
        let spec = sig.type_spec.unwrap();
        assert_eq!(spec.nested.len(), 2);
    }
}
