//! Decorator collection for one class body.
//!
//! Walks the members in source order, strips method-level decorators off
//! the nodes, and returns them as ordered `DecoratedMethodRecord`s. A
//! getter and its paired setter share one record, decorator expressions
//! concatenated in encounter order.
//!
//! Placement rules enforced here: decorators on constructors, on
//! computed-name methods, and on static methods abort the unit with
//! `IllegalDecoratorPlacement`. (SWC's `Constructor` node cannot carry
//! decorators, so the constructor case only arises for trees built
//! programmatically with a method literally keyed `constructor`.)
//!
//! Decorators on private methods, class fields, and auto-accessors are
//! outside the legacy-decorator surface and pass through untouched.
//!
//! Collection is idempotent per node: stripping empties the decorator
//! list, so a second collection over the same class finds nothing.

use decaf_ast::{DecoratedMethodRecord, IllegalDecoratorPlacement};
use swc_ecma_ast as ast;

/// Extract and strip all method-level decorators of `class`.
pub fn collect_decorated_methods(
    class: &mut ast::Class,
) -> Result<Vec<DecoratedMethodRecord>, IllegalDecoratorPlacement> {
    let mut records: Vec<DecoratedMethodRecord> = Vec::new();

    for member in &mut class.body {
        let ast::ClassMember::Method(method) = member else {
            continue;
        };
        if method.function.decorators.is_empty() {
            continue;
        }
        if matches!(method.key, ast::PropName::Computed(_)) {
            return Err(IllegalDecoratorPlacement::ComputedName { span: method.span });
        }
        let Some(name) = prop_name_string(&method.key) else {
            continue;
        };
        if name == "constructor" && !method.is_static {
            return Err(IllegalDecoratorPlacement::Constructor { span: method.span });
        }
        if method.is_static {
            return Err(IllegalDecoratorPlacement::StaticMethod { span: method.span });
        }

        let decorators = std::mem::take(&mut method.function.decorators);
        match records.iter_mut().find(|record| record.name == name) {
            Some(record) => record.decorators.extend(decorators),
            None => records.push(DecoratedMethodRecord { name, decorators }),
        }
    }

    Ok(records)
}

/// Literal property keys rendered as the string the member table uses.
fn prop_name_string(key: &ast::PropName) -> Option<String> {
    match key {
        ast::PropName::Ident(id) => Some(id.sym.to_string()),
        ast::PropName::Str(s) => Some(s.value.to_string_lossy().into_owned()),
        ast::PropName::Num(n) => Some(match &n.raw {
            Some(raw) => raw.to_string(),
            None => n.value.to_string(),
        }),
        ast::PropName::BigInt(b) => Some(b.value.to_string()),
        ast::PropName::Computed(_) => None,
    }
}
