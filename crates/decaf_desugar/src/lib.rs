//! Desugaring pass that rewrites legacy decorator syntax into plain calls.
//!
//! Transforms, per compilation unit:
//! - `@dec class C {}`          → `let C = _classDecorator(class C {}, [dec]);`
//! - `@dec m() {}` in a class   → `_methodDecorator(C, "m", [dec]);` after it
//! - decorated class expression → an immediately-invoked wrapper returning
//!   the rewritten class, so the construct stays usable as one expression
//!
//! The two `_classDecorator`/`_methodDecorator` helper functions are
//! synthesized once per unit, under collision-free names, and only when a
//! rewrite actually referenced them.

pub mod collect;
pub mod helpers;
pub mod hygiene;
pub mod transform;

pub use transform::desugar_module;
