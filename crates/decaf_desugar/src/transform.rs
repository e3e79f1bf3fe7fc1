//! Transform engine: orchestrates the class-level and method-level
//! rewrites over one compilation unit.
//!
//! The pass runs bottom-up inside each class (members first, then the
//! class node itself), so replacement nodes are never revisited and a
//! rerun over already-rewritten output is a structural no-op. Nested
//! classes keep their decorated-method records on an explicit LIFO stack:
//! pushed when a class is entered, popped when it is left, so an inner
//! class never contributes records to an outer class's helper calls.

use std::mem;

use decaf_ast::{DecoratedMethodRecord, IllegalDecoratorPlacement};
use swc_common::util::take::Take;
use swc_ecma_ast as ast;
use swc_ecma_visit::{VisitMut, VisitMutWith};

use crate::collect::collect_decorated_methods;
use crate::helpers;
use crate::hygiene::NameAllocator;

/// Per-compilation-unit state.
///
/// Created when the module is entered, discarded after the helper
/// definitions are injected on exit. Each helper is emitted at most once
/// and only if some rewrite referenced it.
pub struct TransformContext {
    pub class_helper: ast::Ident,
    pub method_helper: ast::Ident,
    pub class_helper_used: bool,
    pub method_helper_used: bool,
    /// In-progress decorated-method accumulators, innermost class on top.
    pub method_stack: Vec<Vec<DecoratedMethodRecord>>,
}

impl TransformContext {
    fn new(class_helper: ast::Ident, method_helper: ast::Ident) -> Self {
        Self {
            class_helper,
            method_helper,
            class_helper_used: false,
            method_helper_used: false,
            method_stack: Vec::new(),
        }
    }
}

/// The decorator-desugaring pass over one module.
#[derive(Default)]
pub struct DecoratorDesugar {
    names: NameAllocator,
    ctx: Option<TransformContext>,
    error: Option<IllegalDecoratorPlacement>,
}

/// Rewrite every decorator in `module` into plain helper calls.
///
/// On success the returned module contains no `Decorator` nodes reachable
/// through classes or class methods, and exported binding names keep
/// their original identity and visibility. The first illegal placement
/// aborts the unit.
pub fn desugar_module(
    mut module: ast::Module,
) -> Result<ast::Module, IllegalDecoratorPlacement> {
    let mut pass = DecoratorDesugar::default();
    module.visit_mut_with(&mut pass);
    match pass.error {
        Some(err) => Err(err),
        None => Ok(module),
    }
}

impl DecoratorDesugar {
    fn failed(&self) -> bool {
        self.error.is_some()
    }

    /// Class enter: push a fresh accumulator and collect this class's
    /// decorated-method records into it, stripping them off the nodes.
    fn class_enter(&mut self, class: &mut ast::Class) {
        let records = match collect_decorated_methods(class) {
            Ok(records) => records,
            Err(err) => {
                self.error.get_or_insert(err);
                Vec::new()
            }
        };
        if let Some(ctx) = self.ctx.as_mut() {
            ctx.method_stack.push(records);
        }
    }

    /// Class exit: pop this class's records back off the stack.
    fn class_exit(&mut self) -> Vec<DecoratedMethodRecord> {
        self.ctx
            .as_mut()
            .and_then(|ctx| ctx.method_stack.pop())
            .unwrap_or_default()
    }

    /// One method-helper invocation statement per record, in
    /// first-encounter order.
    fn method_helper_calls(
        &mut self,
        class_ref: &ast::Ident,
        records: Vec<DecoratedMethodRecord>,
    ) -> Vec<ast::Stmt> {
        if records.is_empty() {
            return Vec::new();
        }
        let Some(ctx) = self.ctx.as_mut() else {
            return Vec::new();
        };
        ctx.method_helper_used = true;
        records
            .into_iter()
            .map(|record| helpers::method_helper_call(&ctx.method_helper, class_ref, record))
            .collect()
    }

    fn class_helper_call(
        &mut self,
        class_value: ast::Expr,
        decorators: Vec<ast::Decorator>,
    ) -> ast::Expr {
        // Traversal always starts at the module, so the context exists
        // whenever a class is being rewritten.
        let Some(ctx) = self.ctx.as_mut() else {
            return class_value;
        };
        ctx.class_helper_used = true;
        helpers::class_helper_call(&ctx.class_helper, class_value, decorators)
    }

    /// The expression standing in for a now-decorator-free class value.
    ///
    /// Without method records this is the bare class expression. With
    /// records the class is wrapped in an immediately-invoked function:
    /// declaration, helper calls, then a reference return. Anonymous
    /// classes get a hygienic name that only that wrapper can see.
    fn decorated_class_value(
        &mut self,
        name: Option<ast::Ident>,
        class: Box<ast::Class>,
        records: Vec<DecoratedMethodRecord>,
    ) -> ast::Expr {
        if records.is_empty() {
            return ast::Expr::Class(ast::ClassExpr { ident: name, class });
        }
        let name = match name {
            Some(name) => name,
            None => self.names.uid("anonymousClass"),
        };
        let mut stmts = vec![ast::Stmt::Decl(ast::Decl::Class(ast::ClassDecl {
            ident: name.clone(),
            declare: false,
            class,
        }))];
        stmts.extend(self.method_helper_calls(&name, records));
        stmts.push(helpers::return_ident(name));
        helpers::iife(stmts)
    }

    /// `let C = _classDecorator(<classValue>, [decorators]);`
    fn class_helper_binding(
        &mut self,
        ident: ast::Ident,
        class: Box<ast::Class>,
        decorators: Vec<ast::Decorator>,
        records: Vec<DecoratedMethodRecord>,
    ) -> ast::Decl {
        let value = self.decorated_class_value(Some(ident.clone()), class, records);
        let init = self.class_helper_call(value, decorators);
        helpers::let_binding(ident, init)
    }

    /// Full rewrite of a class declaration into its replacement
    /// statement list.
    fn lower_class_decl(&mut self, mut decl: ast::ClassDecl) -> Vec<ast::Stmt> {
        self.class_enter(&mut decl.class);
        decl.class.visit_mut_with(self);
        let records = self.class_exit();
        if self.failed() {
            return vec![ast::Stmt::Decl(ast::Decl::Class(decl))];
        }

        let class_decorators = mem::take(&mut decl.class.decorators);
        if class_decorators.is_empty() {
            let ident = decl.ident.clone();
            let mut stmts = vec![ast::Stmt::Decl(ast::Decl::Class(decl))];
            stmts.extend(self.method_helper_calls(&ident, records));
            stmts
        } else {
            vec![ast::Stmt::Decl(self.class_helper_binding(
                decl.ident,
                decl.class,
                class_decorators,
                records,
            ))]
        }
    }

    /// Rewrite of a class expression in place of its original value.
    fn lower_class_expr(
        &mut self,
        mut cls: ast::ClassExpr,
        records: Vec<DecoratedMethodRecord>,
    ) -> ast::Expr {
        let class_decorators = mem::take(&mut cls.class.decorators);
        let value = self.decorated_class_value(cls.ident, cls.class, records);
        if class_decorators.is_empty() {
            value
        } else {
            self.class_helper_call(value, class_decorators)
        }
    }

    /// `export class` keeps its binding name and visibility; helper
    /// invocation statements land after the export, never inside it.
    fn lower_exported_class(&mut self, export: ast::ExportDecl) -> Vec<ast::ModuleItem> {
        let ast::ExportDecl { span, decl } = export;
        let mut decl = match decl {
            ast::Decl::Class(decl) => decl,
            other => {
                return vec![ast::ModuleItem::ModuleDecl(ast::ModuleDecl::ExportDecl(
                    ast::ExportDecl { span, decl: other },
                ))]
            }
        };

        self.class_enter(&mut decl.class);
        decl.class.visit_mut_with(self);
        let records = self.class_exit();
        if self.failed() {
            return vec![ast::ModuleItem::ModuleDecl(ast::ModuleDecl::ExportDecl(
                ast::ExportDecl {
                    span,
                    decl: ast::Decl::Class(decl),
                },
            ))];
        }

        let class_decorators = mem::take(&mut decl.class.decorators);
        if class_decorators.is_empty() {
            let ident = decl.ident.clone();
            let mut items = vec![ast::ModuleItem::ModuleDecl(ast::ModuleDecl::ExportDecl(
                ast::ExportDecl {
                    span,
                    decl: ast::Decl::Class(decl),
                },
            ))];
            items.extend(
                self.method_helper_calls(&ident, records)
                    .into_iter()
                    .map(ast::ModuleItem::Stmt),
            );
            items
        } else {
            let decl =
                self.class_helper_binding(decl.ident, decl.class, class_decorators, records);
            vec![ast::ModuleItem::ModuleDecl(ast::ModuleDecl::ExportDecl(
                ast::ExportDecl { span, decl },
            ))]
        }
    }

    /// `export default class` — named classes are lowered like a
    /// declaration and re-exported by reference so the local binding
    /// survives; anonymous ones become `export default <expression>`.
    fn lower_default_exported_class(
        &mut self,
        export: ast::ExportDefaultDecl,
    ) -> Vec<ast::ModuleItem> {
        let ast::ExportDefaultDecl { span, decl } = export;
        let mut cls = match decl {
            ast::DefaultDecl::Class(cls) => cls,
            other => {
                return vec![ast::ModuleItem::ModuleDecl(
                    ast::ModuleDecl::ExportDefaultDecl(ast::ExportDefaultDecl {
                        span,
                        decl: other,
                    }),
                )]
            }
        };

        self.class_enter(&mut cls.class);
        cls.class.visit_mut_with(self);
        let records = self.class_exit();
        let class_decorators = if self.failed() {
            Vec::new()
        } else {
            mem::take(&mut cls.class.decorators)
        };

        if class_decorators.is_empty() && records.is_empty() {
            return vec![ast::ModuleItem::ModuleDecl(
                ast::ModuleDecl::ExportDefaultDecl(ast::ExportDefaultDecl {
                    span,
                    decl: ast::DefaultDecl::Class(cls),
                }),
            )];
        }

        match cls.ident.take() {
            Some(ident) => {
                let mut items: Vec<ast::ModuleItem> = Vec::new();
                if class_decorators.is_empty() {
                    items.push(ast::ModuleItem::Stmt(ast::Stmt::Decl(ast::Decl::Class(
                        ast::ClassDecl {
                            ident: ident.clone(),
                            declare: false,
                            class: cls.class,
                        },
                    ))));
                    items.extend(
                        self.method_helper_calls(&ident, records)
                            .into_iter()
                            .map(ast::ModuleItem::Stmt),
                    );
                } else {
                    items.push(ast::ModuleItem::Stmt(ast::Stmt::Decl(
                        self.class_helper_binding(
                            ident.clone(),
                            cls.class,
                            class_decorators,
                            records,
                        ),
                    )));
                }
                items.push(ast::ModuleItem::ModuleDecl(
                    ast::ModuleDecl::ExportDefaultExpr(ast::ExportDefaultExpr {
                        span,
                        expr: Box::new(ast::Expr::Ident(ident)),
                    }),
                ));
                items
            }
            None => {
                let value = self.decorated_class_value(None, cls.class, records);
                let expr = if class_decorators.is_empty() {
                    value
                } else {
                    self.class_helper_call(value, class_decorators)
                };
                vec![ast::ModuleItem::ModuleDecl(
                    ast::ModuleDecl::ExportDefaultExpr(ast::ExportDefaultExpr {
                        span,
                        expr: Box::new(expr),
                    }),
                )]
            }
        }
    }
}

impl VisitMut for DecoratorDesugar {
    fn visit_mut_module(&mut self, module: &mut ast::Module) {
        let mut names = NameAllocator::for_module(module);
        self.ctx = Some(TransformContext::new(
            names.uid("classDecorator"),
            names.uid("methodDecorator"),
        ));
        self.names = names;

        module.visit_mut_children_with(self);

        let Some(ctx) = self.ctx.take() else {
            return;
        };
        if self.failed() {
            return;
        }
        if ctx.class_helper_used {
            module.body.push(ast::ModuleItem::Stmt(
                helpers::class_decorator_helper(ctx.class_helper),
            ));
        }
        if ctx.method_helper_used {
            module.body.push(ast::ModuleItem::Stmt(
                helpers::method_decorator_helper(ctx.method_helper),
            ));
        }
    }

    fn visit_mut_module_items(&mut self, items: &mut Vec<ast::ModuleItem>) {
        let mut result = Vec::with_capacity(items.len());
        for item in items.drain(..) {
            if self.failed() {
                result.push(item);
                continue;
            }
            match item {
                ast::ModuleItem::Stmt(ast::Stmt::Decl(ast::Decl::Class(decl))) => {
                    result.extend(
                        self.lower_class_decl(decl)
                            .into_iter()
                            .map(ast::ModuleItem::Stmt),
                    );
                }
                ast::ModuleItem::ModuleDecl(ast::ModuleDecl::ExportDecl(export))
                    if matches!(export.decl, ast::Decl::Class(_)) =>
                {
                    result.extend(self.lower_exported_class(export));
                }
                ast::ModuleItem::ModuleDecl(ast::ModuleDecl::ExportDefaultDecl(export))
                    if matches!(export.decl, ast::DefaultDecl::Class(_)) =>
                {
                    result.extend(self.lower_default_exported_class(export));
                }
                mut other => {
                    other.visit_mut_with(self);
                    result.push(other);
                }
            }
        }
        *items = result;
    }

    fn visit_mut_stmts(&mut self, stmts: &mut Vec<ast::Stmt>) {
        let mut result = Vec::with_capacity(stmts.len());
        for stmt in stmts.drain(..) {
            if self.failed() {
                result.push(stmt);
                continue;
            }
            match stmt {
                ast::Stmt::Decl(ast::Decl::Class(decl)) => {
                    result.extend(self.lower_class_decl(decl));
                }
                mut other => {
                    other.visit_mut_with(self);
                    result.push(other);
                }
            }
        }
        *stmts = result;
    }

    fn visit_mut_expr(&mut self, expr: &mut ast::Expr) {
        if self.failed() {
            return;
        }
        if let ast::Expr::Class(class_expr) = expr {
            self.class_enter(&mut class_expr.class);
            class_expr.visit_mut_children_with(self);
            let records = self.class_exit();
            if self.failed() {
                return;
            }
            if class_expr.class.decorators.is_empty() && records.is_empty() {
                return;
            }
            match expr.take() {
                ast::Expr::Class(cls) => *expr = self.lower_class_expr(cls, records),
                other => *expr = other,
            }
        } else {
            expr.visit_mut_children_with(self);
        }
    }
}
