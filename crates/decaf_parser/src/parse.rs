use anyhow::Result;
use decaf_ast::SourceSyntax;
use swc_common::{
    comments::SingleThreadedComments, errors::Handler, sync::Lrc, FileName, SourceMap,
};
use swc_ecma_ast::EsVersion;
use swc_ecma_parser::{Syntax, TsSyntax};

/// Result of parsing one source file.
pub struct ParseResult {
    pub module: swc_ecma_ast::Module,
    pub comments: SingleThreadedComments,
    pub source_map: Lrc<SourceMap>,
}

/// Parse a TypeScript/TSX source string into a module.
///
/// Decorator syntax is controlled by `syntax.decorators`; TSX either by
/// `syntax.tsx` or a `.tsx` file extension.
pub fn parse_program(source: &str, filename: &str, syntax: &SourceSyntax) -> Result<ParseResult> {
    let source_map: Lrc<SourceMap> = Default::default();
    let source_file = source_map.new_source_file(
        Lrc::new(FileName::Custom(filename.to_string())),
        source.to_string(),
    );

    let comments = SingleThreadedComments::default();

    let handler =
        Handler::with_emitter_writer(Box::new(std::io::stderr()), Some(source_map.clone()));

    let is_tsx = syntax.tsx || filename.ends_with(".tsx");
    let ts_syntax = Syntax::Typescript(TsSyntax {
        tsx: is_tsx,
        decorators: syntax.decorators,
        ..Default::default()
    });

    let module = swc_ecma_parser::parse_file_as_module(
        &source_file,
        ts_syntax,
        EsVersion::latest(),
        Some(&comments),
        &mut vec![],
    )
    .map_err(|e| {
        e.into_diagnostic(&handler).emit();
        anyhow::anyhow!("failed to parse {filename}")
    })?;

    Ok(ParseResult {
        module,
        comments,
        source_map,
    })
}
