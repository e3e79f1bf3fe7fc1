//! Shared types for the decaf decorator-desugaring pass.
//!
//! Re-exports the standard SWC AST and adds:
//! - `DecoratedMethodRecord` — one method name with its collected decorators
//! - `IllegalDecoratorPlacement` — the single failure mode of the pass
//! - `SourceSyntax` — parser feature flags

pub use swc_ecma_ast::*;

use serde::{Deserialize, Serialize};
use swc_common::Span;

/// Decorators collected from one (non-computed) method name of a class.
///
/// At most one record exists per method name per class: when both the
/// getter and the setter of an accessor pair are decorated, their
/// decorator expressions are concatenated in encounter order into the
/// record created for whichever member appeared first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecoratedMethodRecord {
    /// Property key as a string, exactly as it will appear in the
    /// synthesized helper call (`_methodDecorator(C, "name", [...])`).
    pub name: String,
    /// Decorator expressions in source order, getter before setter when
    /// an accessor pair was merged.
    pub decorators: Vec<Decorator>,
}

/// A decorator was attached to a class member that cannot carry one.
///
/// Raised by the collector and propagated unchanged to the compilation
/// boundary; the whole unit is abandoned, nothing is partially rewritten.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IllegalDecoratorPlacement {
    #[error("decorators cannot be attached to a constructor")]
    Constructor { span: Span },
    #[error("decorators cannot be attached to a computed-name method")]
    ComputedName { span: Span },
    #[error("decorators cannot be attached to a static method")]
    StaticMethod { span: Span },
}

impl IllegalDecoratorPlacement {
    /// Span of the offending class member.
    pub fn span(&self) -> Span {
        match self {
            Self::Constructor { span }
            | Self::ComputedName { span }
            | Self::StaticMethod { span } => *span,
        }
    }
}

/// Feature flags controlling how source files are parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSyntax {
    /// Parse as TSX.
    pub tsx: bool,
    /// Accept decorator syntax. Disabled when reparsing desugared output
    /// to prove no decorators survived the pass.
    pub decorators: bool,
}

impl Default for SourceSyntax {
    fn default() -> Self {
        Self {
            tsx: false,
            decorators: true,
        }
    }
}
