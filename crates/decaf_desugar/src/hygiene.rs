//! Hygienic identifier allocation.
//!
//! The helper functions and the synthetic names for anonymous decorated
//! classes must never collide with, or capture, any identifier already in
//! the compiled unit. The allocator snapshots every identifier in the
//! module up front and hands out `_name`, `_name2`, `_name3`, … — the
//! first form not present in the snapshot nor previously allocated.

use std::collections::HashSet;

use swc_common::DUMMY_SP;
use swc_ecma_ast as ast;
use swc_ecma_visit::{Visit, VisitWith};

/// Allocates identifiers that are unique within one compilation unit.
#[derive(Debug, Default)]
pub struct NameAllocator {
    used: HashSet<String>,
}

impl NameAllocator {
    /// Snapshot every identifier occurring anywhere in `module`.
    pub fn for_module(module: &ast::Module) -> Self {
        let mut collector = IdentCollector::default();
        module.visit_with(&mut collector);
        Self {
            used: collector.names,
        }
    }

    /// Produce a fresh identifier derived from `base`.
    ///
    /// Deterministic for a given snapshot and allocation sequence, so
    /// repeated compilation of identical input yields identical names.
    pub fn uid(&mut self, base: &str) -> ast::Ident {
        let mut name = format!("_{base}");
        let mut n = 1u32;
        while self.used.contains(&name) {
            n += 1;
            name = format!("_{base}{n}");
        }
        self.used.insert(name.clone());
        ast::Ident::new_no_ctxt(name.into(), DUMMY_SP)
    }
}

#[derive(Default)]
struct IdentCollector {
    names: HashSet<String>,
}

impl Visit for IdentCollector {
    fn visit_ident(&mut self, node: &ast::Ident) {
        self.names.insert(node.sym.to_string());
    }
}
