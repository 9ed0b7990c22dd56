/// Section classification.
///
/// `classify(node, context)` inspects a Markdown node — its kind and, for
/// headers and list items, the first line of its text — and names the
/// section it opens. Rules are tried in priority order; the parent context
/// is consulted only to suppress classifications that would be illegal in
/// the current scope (keyword sections of sublanguages, fallback members).
/// The classifier never looks at siblings.

use crate::markdown::{MarkdownNode, MarkdownNodeKind};
use crate::patterns::patterns;
use crate::text;

/// Every section the parser distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionType {
    Undefined,
    Blueprint,
    ResourceGroup,
    Resource,
    Action,
    Request,
    Response,
    Model,
    Body,
    Schema,
    Headers,
    Parameters,
    Parameter,
    /// Legacy `Values` subsection of an old-syntax parameter.
    Values,
    /// One listed value inside `Values`.
    Value,
    Attributes,
    DataStructures,
    /// One named type under `Data Structures`.
    DataStructure,
    Relation,
    MsonSampleDefault,
    MsonValueMembers,
    MsonPropertyMembers,
    MsonMember,
    MsonMixin,
    MsonOneOf,
    /// A horizontal rule; ends the current resource group at top level.
    Terminator,
}

impl SectionType {
    /// Contexts where the MSON keyword grammar is live.
    pub fn is_mson(&self) -> bool {
        matches!(
            self,
            SectionType::Attributes
                | SectionType::DataStructure
                | SectionType::MsonMember
                | SectionType::MsonValueMembers
                | SectionType::MsonPropertyMembers
                | SectionType::MsonSampleDefault
                | SectionType::MsonOneOf
        )
    }
}

/// Classify a Markdown node in the given parent context.
pub fn classify(node: &MarkdownNode, context: SectionType) -> SectionType {
    match node.kind {
        MarkdownNodeKind::Header(_) => classify_header(&node.text, context),
        MarkdownNodeKind::ListItem => classify_list_item(&node.text, context),
        MarkdownNodeKind::ListBlock => node
            .children
            .first()
            .map(|item| classify(item, context))
            .unwrap_or(SectionType::Undefined),
        MarkdownNodeKind::HRule => SectionType::Terminator,
        _ => SectionType::Undefined,
    }
}

fn classify_header(raw_text: &str, context: SectionType) -> SectionType {
    let (subject, _) = text::first_line(raw_text);
    let subject = subject.trim();
    if subject.is_empty() {
        return SectionType::Undefined;
    }
    let p = patterns();

    if p.group_header.is_match(subject) {
        return SectionType::ResourceGroup;
    }
    if p.data_structures_header.is_match(subject) {
        return SectionType::DataStructures;
    }
    if p.named_endpoint_header.is_match(subject)
        || p.method_resource_header.is_match(subject)
        || p.named_resource_header.is_match(subject)
        || p.uri_resource_header.is_match(subject)
    {
        return SectionType::Resource;
    }
    if p.method_header.is_match(subject) || p.named_action_header.is_match(subject) {
        return SectionType::Action;
    }
    if context == SectionType::DataStructures || context == SectionType::DataStructure {
        return SectionType::DataStructure;
    }

    SectionType::Undefined
}

fn classify_list_item(raw_text: &str, context: SectionType) -> SectionType {
    let (subject, _) = text::first_line(raw_text);
    let subject = subject.trim();
    let p = patterns();

    // Sublanguage scopes first: inside MSON and parameter sections the
    // payload keywords are ordinary member names.
    if context.is_mson() {
        if p.default_keyword.is_match(subject) || p.sample_keyword.is_match(subject) {
            return SectionType::MsonSampleDefault;
        }
        if p.value_members_keyword.is_match(subject) {
            return SectionType::MsonValueMembers;
        }
        if p.property_members_keyword.is_match(subject) {
            return SectionType::MsonPropertyMembers;
        }
        if p.one_of_keyword.is_match(subject) {
            return SectionType::MsonOneOf;
        }
        if p.mixin_signature.is_match(subject) {
            return SectionType::MsonMixin;
        }
        return SectionType::MsonMember;
    }
    match context {
        SectionType::Parameters => return SectionType::Parameter,
        SectionType::Values => return SectionType::Value,
        SectionType::Parameter => {
            if p.values_keyword.is_match(subject) {
                return SectionType::Values;
            }
            if p.default_keyword.is_match(subject) || p.sample_keyword.is_match(subject) {
                return SectionType::MsonSampleDefault;
            }
            if p.value_members_keyword.is_match(subject) {
                return SectionType::MsonValueMembers;
            }
            return SectionType::Undefined;
        }
        _ => {}
    }

    if p.model_signature.is_match(subject) {
        return SectionType::Model;
    }
    if p.request_keyword.is_match(subject) {
        return SectionType::Request;
    }
    if p.response_keyword.is_match(subject) {
        return SectionType::Response;
    }
    if p.parameters_keyword.is_match(subject) {
        return SectionType::Parameters;
    }
    if p.headers_keyword.is_match(subject) {
        return SectionType::Headers;
    }
    // Asset keywords are only live inside a payload; elsewhere a `Body`
    // list item is ordinary content.
    if matches!(
        context,
        SectionType::Request | SectionType::Response | SectionType::Model
    ) {
        if p.body_keyword.is_match(subject) {
            return SectionType::Body;
        }
        if p.schema_keyword.is_match(subject) {
            return SectionType::Schema;
        }
    }
    if p.attributes_signature.is_match(subject) {
        return SectionType::Attributes;
    }
    if p.relation_signature.is_match(subject) {
        return SectionType::Relation;
    }

    SectionType::Undefined
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markdown::scan;

    fn first_node_type(source: &str, context: SectionType) -> SectionType {
        let doc = scan(source);
        let node = &doc.children[0];
        if node.kind == MarkdownNodeKind::ListBlock {
            classify(&node.children[0], context)
        } else {
            classify(node, context)
        }
    }

    #[test]
    fn resource_header_forms() {
        let ctx = SectionType::Blueprint;
        assert_eq!(first_node_type("# My Resource [/resource/{id}{?limit}]\n", ctx), SectionType::Resource);
        assert_eq!(first_node_type("# /resource\n", ctx), SectionType::Resource);
        assert_eq!(first_node_type("# GET /resource\n", ctx), SectionType::Resource);
        assert_eq!(first_node_type("# Group A\n", ctx), SectionType::ResourceGroup);
        assert_eq!(first_node_type("# GET\n", ctx), SectionType::Action);
        assert_eq!(first_node_type("# Retrieve [GET]\n", ctx), SectionType::Action);
        assert_eq!(first_node_type("# Overview\n", ctx), SectionType::Undefined);
    }

    #[test]
    fn payload_and_collection_items() {
        let ctx = SectionType::Resource;
        assert_eq!(first_node_type("+ Model (text/plain)\n", ctx), SectionType::Model);
        assert_eq!(first_node_type("+ Super Model\n", ctx), SectionType::Model);
        assert_eq!(first_node_type("+ Parameters\n", ctx), SectionType::Parameters);
        assert_eq!(first_node_type("+ Headers\n", ctx), SectionType::Headers);
        assert_eq!(first_node_type("+ Attributes (object)\n", ctx), SectionType::Attributes);
        assert_eq!(first_node_type("+ Cmodel\n", ctx), SectionType::Undefined);
        assert_eq!(
            first_node_type("+ Single data model for all exchange data\n", ctx),
            SectionType::Undefined
        );
    }

    #[test]
    fn request_and_response_items() {
        let ctx = SectionType::Action;
        assert_eq!(first_node_type("+ Request A (text/plain)\n", ctx), SectionType::Request);
        assert_eq!(first_node_type("+ Response 200\n", ctx), SectionType::Response);
        assert_eq!(first_node_type("+ Relation: self\n", ctx), SectionType::Relation);
        assert_eq!(first_node_type("+ Requested\n", ctx), SectionType::Undefined);
    }

    #[test]
    fn mson_keywords_only_live_inside_mson() {
        assert_eq!(
            first_node_type("+ Properties\n", SectionType::MsonMember),
            SectionType::MsonPropertyMembers
        );
        assert_eq!(
            first_node_type("+ Default: 20\n", SectionType::Parameter),
            SectionType::MsonSampleDefault
        );
        assert_eq!(first_node_type("+ Properties\n", SectionType::Action), SectionType::Undefined);
        assert_eq!(
            first_node_type("+ name: Ted\n", SectionType::MsonPropertyMembers),
            SectionType::MsonMember
        );
    }

    #[test]
    fn hrule_is_a_terminator() {
        assert_eq!(first_node_type("---\n", SectionType::Blueprint), SectionType::Terminator);
    }

    #[test]
    fn data_structure_headers_only_inside_group() {
        assert_eq!(first_node_type("# Data Structures\n", SectionType::Blueprint), SectionType::DataStructures);
        assert_eq!(
            first_node_type("## Person (object)\n", SectionType::DataStructures),
            SectionType::DataStructure
        );
        assert_eq!(
            first_node_type("## Person (object)\n", SectionType::Blueprint),
            SectionType::Undefined
        );
    }
}
