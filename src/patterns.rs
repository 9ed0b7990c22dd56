/// The shared regex registry.
///
/// Every signature and classification regex compiles once per process into
/// this read-only registry; the parser only ever borrows it. Keyword
/// patterns accept both capitalizations, mirroring the section grammar.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::ast::HTTP_METHODS;

pub struct Patterns {
    /// `key: value` metadata line.
    pub metadata_line: Regex,
    /// `Group <name>` header.
    pub group_header: Regex,
    /// `Data Structures` header.
    pub data_structures_header: Regex,
    /// `<name> [</uri>]` resource header.
    pub named_resource_header: Regex,
    /// Bare `/uri` resource header.
    pub uri_resource_header: Regex,
    /// `<METHOD> /uri` abbreviated resource header.
    pub method_resource_header: Regex,
    /// `<name> [<METHOD> /uri]` named endpoint header.
    pub named_endpoint_header: Regex,
    /// Bare `<METHOD>` action header.
    pub method_header: Regex,
    /// `<name> [<METHOD>]` action header; the token is validated separately
    /// so unknown methods still classify and can be warned about.
    pub named_action_header: Regex,
    /// `Parameters` list keyword.
    pub parameters_keyword: Regex,
    /// `Headers` list keyword.
    pub headers_keyword: Regex,
    /// `Body` list keyword.
    pub body_keyword: Regex,
    /// `Schema` list keyword.
    pub schema_keyword: Regex,
    /// `Values` list keyword (legacy parameter values).
    pub values_keyword: Regex,
    /// `<name> Model (media type)` list signature.
    pub model_signature: Regex,
    /// `Request ...` list keyword.
    pub request_keyword: Regex,
    /// `Response ...` list keyword.
    pub response_keyword: Regex,
    /// `Attributes (type definition)` list signature.
    pub attributes_signature: Regex,
    /// `Relation: <rel>` list signature.
    pub relation_signature: Regex,
    /// `Default` / `Sample` type-section keywords.
    pub default_keyword: Regex,
    pub sample_keyword: Regex,
    /// `Items` / `Members` and `Properties` type-section keywords.
    pub value_members_keyword: Regex,
    pub property_members_keyword: Regex,
    /// `One Of` member group.
    pub one_of_keyword: Regex,
    /// `Include <type>` mixin.
    pub mixin_signature: Regex,
    /// A paragraph that is exactly a `[Name][]` model reference.
    pub model_reference: Regex,
    /// One `{...}` expression inside a URI template.
    pub uri_expression: Regex,
    /// Trailing `(media type)` on a payload signature line.
    pub trailing_parenthetical: Regex,
    /// A three-digit HTTP status token.
    pub status_code: Regex,
}

impl Patterns {
    fn compile() -> Self {
        let method = HTTP_METHODS.join("|");
        Patterns {
            metadata_line: Regex::new(r"^(\S[^:]*):\s*(.*)$").unwrap(),
            group_header: Regex::new(r"^[Gg]roup\s+(\S.*)$").unwrap(),
            data_structures_header: Regex::new(r"^[Dd]ata\s+[Ss]tructures\s*$").unwrap(),
            named_resource_header: Regex::new(r"^(.+?)\s+\[\s*(/[^\]]*)\]\s*$").unwrap(),
            uri_resource_header: Regex::new(r"^(/\S*)\s*$").unwrap(),
            method_resource_header: Regex::new(&format!(r"^({method})\s+(/\S*)\s*$")).unwrap(),
            named_endpoint_header: Regex::new(&format!(r"^(.+?)\s+\[({method})\s+(/[^\]]*)\]\s*$"))
                .unwrap(),
            method_header: Regex::new(&format!(r"^({method})\s*$")).unwrap(),
            named_action_header: Regex::new(r"^(.+?)\s*\[([A-Z]+)\]\s*$").unwrap(),
            parameters_keyword: Regex::new(r"^\s*[Pp]arameters?\s*$").unwrap(),
            headers_keyword: Regex::new(r"^\s*[Hh]eaders?\s*$").unwrap(),
            body_keyword: Regex::new(r"^\s*[Bb]ody\s*$").unwrap(),
            schema_keyword: Regex::new(r"^\s*[Ss]chema\s*$").unwrap(),
            values_keyword: Regex::new(r"^\s*[Vv]alues\s*$").unwrap(),
            model_signature: Regex::new(r"^(?:([^\[\]()]*?)\s+)?[Mm]odel(?:\s*\(([^)]*)\))?\s*$")
                .unwrap(),
            request_keyword: Regex::new(r"^\s*[Rr]equest\b").unwrap(),
            response_keyword: Regex::new(r"^\s*[Rr]esponse\b").unwrap(),
            attributes_signature: Regex::new(r"^\s*[Aa]ttributes?(?:\s*\(([^)]*)\))?\s*$").unwrap(),
            relation_signature: Regex::new(r"^\s*[Rr]elation\s*:\s*(\S+)\s*$").unwrap(),
            default_keyword: Regex::new(r"^\s*[Dd]efault\s*(:.*)?$").unwrap(),
            sample_keyword: Regex::new(r"^\s*[Ss]ample\s*(:.*)?$").unwrap(),
            value_members_keyword: Regex::new(r"^\s*(?:[Ii]tems|[Mm]embers)\s*$").unwrap(),
            property_members_keyword: Regex::new(r"^\s*[Pp]roperties\s*$").unwrap(),
            one_of_keyword: Regex::new(r"^\s*[Oo]ne\s+[Oo]f\s*$").unwrap(),
            mixin_signature: Regex::new(r"^\s*[Ii]nclude\s+\(?\s*([^)]+?)\s*\)?\s*$").unwrap(),
            model_reference: Regex::new(r"^\s*\[([^\[\]]+)\]\[\]\s*$").unwrap(),
            uri_expression: Regex::new(r"\{([^{}]*)\}").unwrap(),
            trailing_parenthetical: Regex::new(r"\(([^()]*)\)\s*$").unwrap(),
            status_code: Regex::new(r"^\d{3}$").unwrap(),
        }
    }
}

static PATTERNS: Lazy<Patterns> = Lazy::new(Patterns::compile);

/// Borrow the process-wide registry.
pub fn patterns() -> &'static Patterns {
    &PATTERNS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_signature_anchoring() {
        let p = patterns();
        assert!(p.model_signature.is_match("Model"));
        assert!(p.model_signature.is_match("Resource Model (text/plain)"));
        assert!(p.model_signature.is_match("a really good name Model (text/plain)"));
        assert!(!p.model_signature.is_match("Cmodel"));
        assert!(!p.model_signature.is_match("Single data model for all exchange data"));
        assert!(!p.model_signature.is_match("`model`"));
    }

    #[test]
    fn resource_header_forms() {
        let p = patterns();
        assert!(p.named_resource_header.is_match("My Resource [/resource/{id}{?limit}]"));
        assert!(p.uri_resource_header.is_match("/"));
        assert!(p.uri_resource_header.is_match("/resource"));
        assert!(p.method_resource_header.is_match("GET /resource"));
        assert!(!p.method_resource_header.is_match("GETTER /resource"));
        assert!(p.named_endpoint_header.is_match("List messages [GET /messages]"));
    }

    #[test]
    fn keyword_edges() {
        let p = patterns();
        assert!(p.request_keyword.is_match("Request A (text/plain)"));
        assert!(!p.request_keyword.is_match("Requested"));
        assert!(p.parameters_keyword.is_match("Parameters"));
        assert!(!p.parameters_keyword.is_match("Parameters extra"));
    }
}
