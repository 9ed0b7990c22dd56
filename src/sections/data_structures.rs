/// The `Data Structures` section: named MSON type definitions.
///
/// Each named type is a header (`## Person (object)`) followed by block
/// description, member lists, and sample/default sections. Names register
/// in the symbol table for reference and cycle checking; the first
/// definition of a name wins.

use crate::classifier::SectionType;
use crate::diagnostics::{Report, WarningCode};
use crate::markdown::MarkdownNode;
use crate::mson::{self, DataStructure};
use crate::signature::{parse_signature, SignatureTraits};
use crate::sourcemap::RangeSet;
use crate::symbol_table::NamedTypeSymbol;

use super::mson::{collect_dependencies, warn_unterminated, TypeSectionsProcessor};
use super::{drive_headed, ParseContext, SectionProcessor};

#[derive(Debug, Default)]
pub(crate) struct DataStructuresOutput {
    pub structures: Vec<DataStructure>,
    pub maps: Vec<RangeSet>,
}

struct DataStructuresProcessor;

impl SectionProcessor for DataStructuresProcessor {
    const TYPE: SectionType = SectionType::DataStructures;
    type Output = DataStructuresOutput;

    fn process_signature(
        &mut self,
        _node: &MarkdownNode,
        _ctx: &mut ParseContext,
        _out: &mut DataStructuresOutput,
        _report: &mut Report,
    ) {
    }

    fn accepts(&self, section: SectionType) -> bool {
        section == SectionType::DataStructure
    }

    fn process_nested(
        &mut self,
        _section: SectionType,
        nodes: &[&MarkdownNode],
        index: usize,
        ctx: &mut ParseContext,
        out: &mut DataStructuresOutput,
        report: &mut Report,
    ) -> (usize, bool) {
        let (structure, next, halted) = parse_named_type(nodes, index, ctx, report);
        out.maps.push(ctx.charmap(&nodes[index].range));
        out.structures.push(structure);
        (next, halted)
    }

    fn finalize(
        &mut self,
        node: &MarkdownNode,
        ctx: &mut ParseContext,
        out: &mut DataStructuresOutput,
        report: &mut Report,
    ) {
        if out.structures.is_empty() {
            report.warn(
                WarningCode::EmptyDefinition,
                "no data structures specified, expected a nested list of named types",
                ctx.charmap(&node.range),
            );
        }
    }
}

/// Parse one named type rooted at its header.
fn parse_named_type(
    nodes: &[&MarkdownNode],
    start: usize,
    ctx: &mut ParseContext,
    report: &mut Report,
) -> (DataStructure, usize, bool) {
    let node = nodes[start];

    let signature = parse_signature(
        &node.text,
        SignatureTraits {
            identifier: true,
            attributes: true,
            ..SignatureTraits::NONE
        },
    );
    warn_unterminated(&signature, node, ctx, report);

    let mut structure = DataStructure {
        name: mson::strip_backticks(&signature.identifier).to_string(),
        type_definition: mson::parse_type_definition(&signature.attributes),
        sections: Vec::new(),
    };

    let base = mson::base_type_of(&structure.type_definition.specification);
    let mut processor = TypeSectionsProcessor { base };
    let mut sections = Vec::new();
    let (next, halted) = drive_headed(&mut processor, nodes, start, ctx, &mut sections, report);
    structure.sections = sections;

    if structure.name.is_empty() {
        report.warn(
            WarningCode::Formatting,
            "expected a name for the data structure, e.g. '## Person (object)'",
            ctx.charmap(&node.range),
        );
    } else {
        let previous = ctx.symbols.register_named_type(NamedTypeSymbol {
            name: structure.name.clone(),
            dependencies: collect_dependencies(&structure),
            defined_in: node.range.clone(),
        });
        if previous.is_some() {
            report.warn(
                WarningCode::Redefinition,
                format!(
                    "the data structure '{}' is already defined, keeping the first \
                     definition",
                    structure.name
                ),
                ctx.charmap(&node.range),
            );
        }
    }

    (structure, next, halted)
}

/// Parse a `Data Structures` section rooted at `nodes[start]`.
pub(crate) fn parse_data_structures(
    nodes: &[&MarkdownNode],
    start: usize,
    ctx: &mut ParseContext,
    report: &mut Report,
) -> (DataStructuresOutput, usize, bool) {
    let mut processor = DataStructuresProcessor;
    let mut out = DataStructuresOutput::default();
    let (next, halted) = drive_headed(&mut processor, nodes, start, ctx, &mut out, report);
    (out, next, halted)
}
