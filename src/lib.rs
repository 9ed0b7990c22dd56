/// API Blueprint parser — two-stage section parsing of Markdown-described
/// HTTP APIs.
///
/// ```text
/// source → SCAN (markdown blocks) → SECTIONS (processor family) → RESOLVE → Blueprint + Report
/// ```
///
/// The scan phase builds a block-level Markdown tree; the section phase
/// walks it with a family of cooperating processors driven by a generic
/// signature → description → nested → finalize sequence; the resolve phase
/// fills `[Name][]` model references from the symbol table and checks
/// named-type cycles. Warnings accumulate and never abort a parse; at most
/// one fatal error is recorded and the product tree is returned either way.

pub mod ast;
pub mod classifier;
pub mod diagnostics;
pub mod markdown;
pub mod mson;
pub mod patterns;
pub mod signature;
pub mod sourcemap;
pub mod span;
pub mod symbol_table;

// Phase modules
pub mod emit;
mod resolve;
mod sections;
mod text;
mod uri;

use diagnostics::Report;
use sourcemap::BlueprintSourceMap;

/// Parser options, mapped from the CLI flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseOptions {
    /// Populate the source-map side-tree of the result.
    pub export_sourcemap: bool,
    /// Treat a missing blueprint name as a fatal error instead of
    /// accepting a nameless document.
    pub require_blueprint_name: bool,
}

/// The outcome of parsing one document.
#[derive(Debug)]
pub struct ParseResult {
    /// The product tree, possibly partially populated. Check
    /// `report.error` before relying on completeness.
    pub blueprint: ast::Blueprint,
    pub report: Report,
    /// The side-tree of character ranges; `Some` when requested.
    pub sourcemap: Option<BlueprintSourceMap>,
}

/// Parse an API Blueprint document.
///
/// The parser carries no global state beyond the shared compiled regex
/// registry, so distinct documents may be parsed concurrently.
pub fn parse(source: &str, options: ParseOptions) -> ParseResult {
    // Ranges are computed against the BOM-stripped buffer.
    let source = source.strip_prefix('\u{FEFF}').unwrap_or(source);

    let document = markdown::scan(source);

    let mut report = Report::new();
    let mut ctx = sections::ParseContext::new(source, options);
    let (mut blueprint, map) =
        sections::blueprint::parse_blueprint(&document, &mut ctx, &mut report);

    let symbols = std::mem::take(&mut ctx.symbols);
    resolve::resolve(&mut blueprint, &symbols, source, &mut report);
    blueprint.symbols = symbols;

    ParseResult {
        blueprint,
        report,
        sourcemap: options.export_sourcemap.then_some(map),
    }
}
