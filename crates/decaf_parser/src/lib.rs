//! Parser front end for decaf.
//!
//! Wraps the standard SWC TypeScript parser with decorator syntax turned
//! on. The desugaring pass itself never parses; everything it consumes
//! comes through here (or through any other producer of `swc_ecma_ast`
//! modules).

pub mod parse;

pub use parse::{parse_program, ParseResult};
