/// The top-level blueprint processor.
///
/// Expected child order: an optional metadata paragraph of `key: value`
/// lines, an optional name header, free description, then resource groups
/// (explicit `# Group` sections or implicit ones collecting top-level
/// resources) and an optional `Data Structures` section. A horizontal rule
/// terminates the current implicit group; prose after it opens the next
/// one.
///
/// Model references resolve in a second pass after the walk (see
/// `resolve`).

use crate::ast::{Blueprint, Metadata};
use crate::classifier::{classify, SectionType};
use crate::diagnostics::{ErrorCode, Report};
use crate::markdown::{MarkdownNode, MarkdownNodeKind};
use crate::patterns::patterns;
use crate::sourcemap::BlueprintSourceMap;
use crate::text;

use super::data_structures::parse_data_structures;
use super::resource_group::{add_resource, parse_resource_group, SeenUris};
use super::{append_description, flatten, ignore_node, ParseContext};

/// Parse a whole document into a blueprint and its source map.
pub(crate) fn parse_blueprint(
    document: &MarkdownNode,
    ctx: &mut ParseContext,
    report: &mut Report,
) -> (Blueprint, BlueprintSourceMap) {
    let nodes = flatten(&document.children);
    let mut blueprint = Blueprint::default();
    let mut map = BlueprintSourceMap::default();
    let mut i = 0;

    // Metadata: a leading paragraph where every line is `key: value`.
    if let Some(node) = nodes.first() {
        if node.kind == MarkdownNodeKind::Paragraph {
            if let Some(entries) = parse_metadata(&node.text) {
                for _ in &entries {
                    map.metadata.push(ctx.charmap(&node.range));
                }
                blueprint.metadata = entries;
                i = 1;
            }
        }
    }

    // Name: the first header, as long as it does not open a section.
    if i < nodes.len()
        && matches!(nodes[i].kind, MarkdownNodeKind::Header(_))
        && classify(nodes[i], SectionType::Blueprint) == SectionType::Undefined
    {
        let (line, _) = text::first_line(&nodes[i].text);
        blueprint.name = line.trim().to_string();
        map.name = ctx.charmap(&nodes[i].range);
        i += 1;
    }

    if blueprint.name.is_empty() && ctx.options.require_blueprint_name {
        report.fail(
            ErrorCode::Business,
            "expected blueprint name, e.g. '# <API Name>'",
            nodes
                .first()
                .map(|node| ctx.charmap(&node.range))
                .unwrap_or_default(),
        );
    }

    // Description: everything up to the first classifiable section.
    while i < nodes.len() && classify(nodes[i], SectionType::Blueprint) == SectionType::Undefined {
        append_description(&mut blueprint.description, nodes[i], ctx);
        map.description.extend(ctx.charmap(&nodes[i].range));
        i += 1;
    }

    // Resource groups and data structures.
    let mut seen = SeenUris::default();
    let mut implicit: Option<(crate::ast::ResourceGroup, crate::sourcemap::ResourceGroupSourceMap)> =
        None;
    let mut after_terminator = false;

    while i < nodes.len() {
        let node = nodes[i];
        match classify(node, SectionType::Blueprint) {
            SectionType::ResourceGroup => {
                close_implicit(&mut implicit, &mut blueprint, &mut map);
                after_terminator = false;
                let (out, next, halted) = parse_resource_group(&nodes, i, &mut seen, ctx, report);
                blueprint.resource_groups.push(out.group);
                map.resource_groups.push(out.map);
                i = next;
                if halted {
                    break;
                }
            }
            SectionType::Resource => {
                after_terminator = false;
                let (group, group_map) = implicit.get_or_insert_with(Default::default);
                let (next, halted) = add_resource(group, group_map, &mut seen, &nodes, i, ctx, report);
                i = next;
                if halted {
                    break;
                }
            }
            SectionType::DataStructures => {
                close_implicit(&mut implicit, &mut blueprint, &mut map);
                after_terminator = false;
                let (out, next, halted) = parse_data_structures(&nodes, i, ctx, report);
                blueprint.data_structures.extend(out.structures);
                map.data_structures.extend(out.maps);
                i = next;
                if halted {
                    break;
                }
            }
            SectionType::Terminator => {
                close_implicit(&mut implicit, &mut blueprint, &mut map);
                after_terminator = true;
                i += 1;
            }
            SectionType::Undefined if after_terminator => {
                // Prose after a terminator opens the next implicit group.
                let (group, _) = implicit.get_or_insert_with(Default::default);
                append_description(&mut group.description, node, ctx);
                i += 1;
            }
            _ => {
                ignore_node(node, ctx, report);
                i += 1;
            }
        }
    }

    close_implicit(&mut implicit, &mut blueprint, &mut map);

    (blueprint, map)
}

fn close_implicit(
    implicit: &mut Option<(crate::ast::ResourceGroup, crate::sourcemap::ResourceGroupSourceMap)>,
    blueprint: &mut Blueprint,
    map: &mut BlueprintSourceMap,
) {
    if let Some((group, group_map)) = implicit.take() {
        blueprint.resource_groups.push(group);
        map.resource_groups.push(group_map);
    }
}

/// Parse a metadata paragraph; `None` unless every line matches.
fn parse_metadata(paragraph: &str) -> Option<Vec<Metadata>> {
    let mut entries = Vec::new();
    for line in paragraph.lines() {
        let capture = patterns().metadata_line.captures(line.trim())?;
        entries.push(Metadata {
            name: capture[1].trim().to_string(),
            value: capture[2].trim().to_string(),
        });
    }
    if entries.is_empty() {
        None
    } else {
        Some(entries)
    }
}
