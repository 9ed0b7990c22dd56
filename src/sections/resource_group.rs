/// Resource group sections.
///
/// `# Group <name>` headers open explicit groups; resources at the top
/// level without one collect into implicit, nameless groups (the blueprint
/// processor owns that bookkeeping and reuses `add_resource` here). URI
/// templates must be unique across the whole blueprint — duplicates warn
/// and both definitions are retained.

use crate::ast::ResourceGroup;
use crate::classifier::SectionType;
use crate::diagnostics::{Report, WarningCode};
use crate::markdown::MarkdownNode;
use crate::patterns::patterns;
use crate::sourcemap::ResourceGroupSourceMap;
use crate::text;

use super::resource::parse_resource;
use super::{append_description, drive_headed, ParseContext, SectionProcessor};

#[derive(Debug, Default)]
pub(crate) struct ResourceGroupOutput {
    pub group: ResourceGroup,
    pub map: ResourceGroupSourceMap,
}

/// URI templates already seen in this parse, for the cross-blueprint
/// duplicate check.
#[derive(Debug, Default)]
pub(crate) struct SeenUris(Vec<String>);

struct ResourceGroupProcessor<'a> {
    seen: &'a mut SeenUris,
}

impl<'a> SectionProcessor for ResourceGroupProcessor<'a> {
    const TYPE: SectionType = SectionType::ResourceGroup;
    type Output = ResourceGroupOutput;

    fn process_signature(
        &mut self,
        node: &MarkdownNode,
        ctx: &mut ParseContext,
        out: &mut ResourceGroupOutput,
        _report: &mut Report,
    ) {
        out.map.node = ctx.charmap(&node.range);

        let (line, _) = text::first_line(&node.text);
        if let Some(capture) = patterns().group_header.captures(line.trim()) {
            out.group.name = capture[1].trim().to_string();
        }
    }

    fn process_description(
        &mut self,
        node: &MarkdownNode,
        ctx: &mut ParseContext,
        out: &mut ResourceGroupOutput,
        _report: &mut Report,
    ) {
        append_description(&mut out.group.description, node, ctx);
    }

    fn accepts(&self, section: SectionType) -> bool {
        section == SectionType::Resource
    }

    fn process_nested(
        &mut self,
        _section: SectionType,
        nodes: &[&MarkdownNode],
        index: usize,
        ctx: &mut ParseContext,
        out: &mut ResourceGroupOutput,
        report: &mut Report,
    ) -> (usize, bool) {
        add_resource(&mut out.group, &mut out.map, self.seen, nodes, index, ctx, report)
    }
}

/// Parse one resource into `group`, recording the duplicate-URI warning
/// against the whole blueprint's seen set.
pub(crate) fn add_resource(
    group: &mut ResourceGroup,
    map: &mut ResourceGroupSourceMap,
    seen: &mut SeenUris,
    nodes: &[&MarkdownNode],
    index: usize,
    ctx: &mut ParseContext,
    report: &mut Report,
) -> (usize, bool) {
    let (parsed, next, halted) = parse_resource(nodes, index, ctx, report);

    let uri = parsed.resource.uri_template.clone();
    if seen.0.contains(&uri) {
        report.warn(
            WarningCode::Redefinition,
            format!("the resource '{uri}' is already defined"),
            ctx.charmap(&nodes[index].range),
        );
    } else {
        seen.0.push(uri);
    }

    group.resources.push(parsed.resource);
    map.resources.push(parsed.map);
    (next, halted)
}

/// Parse an explicit `# Group <name>` section rooted at `nodes[start]`.
pub(crate) fn parse_resource_group(
    nodes: &[&MarkdownNode],
    start: usize,
    seen: &mut SeenUris,
    ctx: &mut ParseContext,
    report: &mut Report,
) -> (ResourceGroupOutput, usize, bool) {
    let mut processor = ResourceGroupProcessor { seen };
    let mut out = ResourceGroupOutput::default();
    let (next, halted) = drive_headed(&mut processor, nodes, start, ctx, &mut out, report);
    (out, next, halted)
}
