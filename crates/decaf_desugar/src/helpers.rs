//! Code synthesizer for the two decorator helpers and their call sites.
//!
//! Both helpers fold the decorator array right-to-left: the last-declared
//! decorator touches the raw target first, outer decorators wrap the
//! result. A decorator returning a falsy value keeps the current target.

use decaf_ast::DecoratedMethodRecord;
use swc_common::{SyntaxContext, DUMMY_SP};
use swc_ecma_ast as ast;

/// Definition of the class helper:
///
/// ```js
/// function _classDecorator(classObj, decorators) {
///     return decorators.reduceRight(function(classObj, decorator) {
///         return decorator(classObj) || classObj;
///     }, classObj);
/// }
/// ```
pub fn class_decorator_helper(name: ast::Ident) -> ast::Stmt {
    let fold = fn_expr(
        &["classObj", "decorator"],
        vec![return_stmt(or(
            call(ident_expr("decorator"), vec![ident_expr("classObj")]),
            ident_expr("classObj"),
        ))],
    );
    let body = vec![return_stmt(call(
        member(ident_expr("decorators"), "reduceRight"),
        vec![fold, ident_expr("classObj")],
    ))];
    fn_decl(name, &["classObj", "decorators"], body)
}

/// Definition of the method helper:
///
/// ```js
/// function _methodDecorator(classObj, methodName, decorators) {
///     var proto = classObj.prototype;
///     var descriptor = decorators.reduceRight(function(descriptor, decorator) {
///         return decorator(proto, methodName, descriptor) || descriptor;
///     }, Object.getOwnPropertyDescriptor(proto, methodName));
///     descriptor && Object.defineProperty(proto, methodName, descriptor);
/// }
/// ```
///
/// A final null descriptor leaves the original member untouched.
pub fn method_decorator_helper(name: ast::Ident) -> ast::Stmt {
    let fold = fn_expr(
        &["descriptor", "decorator"],
        vec![return_stmt(or(
            call(
                ident_expr("decorator"),
                vec![
                    ident_expr("proto"),
                    ident_expr("methodName"),
                    ident_expr("descriptor"),
                ],
            ),
            ident_expr("descriptor"),
        ))],
    );
    let initial = call(
        member(ident_expr("Object"), "getOwnPropertyDescriptor"),
        vec![ident_expr("proto"), ident_expr("methodName")],
    );
    let body = vec![
        var_stmt("proto", member(ident_expr("classObj"), "prototype")),
        var_stmt(
            "descriptor",
            call(
                member(ident_expr("decorators"), "reduceRight"),
                vec![fold, initial],
            ),
        ),
        expr_stmt(and(
            ident_expr("descriptor"),
            call(
                member(ident_expr("Object"), "defineProperty"),
                vec![
                    ident_expr("proto"),
                    ident_expr("methodName"),
                    ident_expr("descriptor"),
                ],
            ),
        )),
    ];
    fn_decl(name, &["classObj", "methodName", "decorators"], body)
}

/// `helper(classValue, [d1, d2, …])`
pub fn class_helper_call(
    helper: &ast::Ident,
    class_value: ast::Expr,
    decorators: Vec<ast::Decorator>,
) -> ast::Expr {
    call(
        ast::Expr::Ident(helper.clone()),
        vec![class_value, decorator_array(decorators)],
    )
}

/// `helper(ClassRef, "methodName", [d1, d2, …]);`
pub fn method_helper_call(
    helper: &ast::Ident,
    class_ref: &ast::Ident,
    record: DecoratedMethodRecord,
) -> ast::Stmt {
    expr_stmt(call(
        ast::Expr::Ident(helper.clone()),
        vec![
            ast::Expr::Ident(class_ref.clone()),
            str_lit(&record.name),
            decorator_array(record.decorators),
        ],
    ))
}

/// `let name = init;`
pub fn let_binding(name: ast::Ident, init: ast::Expr) -> ast::Decl {
    ast::Decl::Var(Box::new(ast::VarDecl {
        span: DUMMY_SP,
        ctxt: SyntaxContext::empty(),
        kind: ast::VarDeclKind::Let,
        declare: false,
        decls: vec![ast::VarDeclarator {
            span: DUMMY_SP,
            name: ast::Pat::Ident(ast::BindingIdent {
                id: name,
                type_ann: None,
            }),
            init: Some(Box::new(init)),
            definite: false,
        }],
    }))
}

/// `return name;`
pub fn return_ident(name: ast::Ident) -> ast::Stmt {
    return_stmt(ast::Expr::Ident(name))
}

/// `(function() { …stmts… })()`
pub fn iife(stmts: Vec<ast::Stmt>) -> ast::Expr {
    let function = function(&[], stmts);
    call(
        ast::Expr::Fn(ast::FnExpr {
            ident: None,
            function: Box::new(function),
        }),
        vec![],
    )
}

/// `[d1.expr, d2.expr, …]` in the order given.
fn decorator_array(decorators: Vec<ast::Decorator>) -> ast::Expr {
    ast::Expr::Array(ast::ArrayLit {
        span: DUMMY_SP,
        elems: decorators
            .into_iter()
            .map(|dec| {
                Some(ast::ExprOrSpread {
                    spread: None,
                    expr: dec.expr,
                })
            })
            .collect(),
    })
}

fn ident(name: &str) -> ast::Ident {
    ast::Ident::new_no_ctxt(name.into(), DUMMY_SP)
}

fn ident_expr(name: &str) -> ast::Expr {
    ast::Expr::Ident(ident(name))
}

fn str_lit(value: &str) -> ast::Expr {
    ast::Expr::Lit(ast::Lit::Str(ast::Str {
        span: DUMMY_SP,
        value: value.into(),
        raw: None,
    }))
}

fn member(obj: ast::Expr, prop: &str) -> ast::Expr {
    ast::Expr::Member(ast::MemberExpr {
        span: DUMMY_SP,
        obj: Box::new(obj),
        prop: ast::MemberProp::Ident(ast::IdentName::new(prop.into(), DUMMY_SP)),
    })
}

fn call(callee: ast::Expr, args: Vec<ast::Expr>) -> ast::Expr {
    ast::Expr::Call(ast::CallExpr {
        span: DUMMY_SP,
        ctxt: SyntaxContext::empty(),
        callee: ast::Callee::Expr(Box::new(callee)),
        args: args
            .into_iter()
            .map(|expr| ast::ExprOrSpread {
                spread: None,
                expr: Box::new(expr),
            })
            .collect(),
        type_args: None,
    })
}

fn bin(op: ast::BinaryOp, left: ast::Expr, right: ast::Expr) -> ast::Expr {
    ast::Expr::Bin(ast::BinExpr {
        span: DUMMY_SP,
        op,
        left: Box::new(left),
        right: Box::new(right),
    })
}

fn or(left: ast::Expr, right: ast::Expr) -> ast::Expr {
    bin(ast::BinaryOp::LogicalOr, left, right)
}

fn and(left: ast::Expr, right: ast::Expr) -> ast::Expr {
    bin(ast::BinaryOp::LogicalAnd, left, right)
}

fn return_stmt(arg: ast::Expr) -> ast::Stmt {
    ast::Stmt::Return(ast::ReturnStmt {
        span: DUMMY_SP,
        arg: Some(Box::new(arg)),
    })
}

fn expr_stmt(expr: ast::Expr) -> ast::Stmt {
    ast::Stmt::Expr(ast::ExprStmt {
        span: DUMMY_SP,
        expr: Box::new(expr),
    })
}

fn var_stmt(name: &str, init: ast::Expr) -> ast::Stmt {
    ast::Stmt::Decl(ast::Decl::Var(Box::new(ast::VarDecl {
        span: DUMMY_SP,
        ctxt: SyntaxContext::empty(),
        kind: ast::VarDeclKind::Var,
        declare: false,
        decls: vec![ast::VarDeclarator {
            span: DUMMY_SP,
            name: ast::Pat::Ident(ast::BindingIdent {
                id: ident(name),
                type_ann: None,
            }),
            init: Some(Box::new(init)),
            definite: false,
        }],
    })))
}

fn params(names: &[&str]) -> Vec<ast::Param> {
    names
        .iter()
        .map(|name| ast::Param {
            span: DUMMY_SP,
            decorators: vec![],
            pat: ast::Pat::Ident(ast::BindingIdent {
                id: ident(name),
                type_ann: None,
            }),
        })
        .collect()
}

fn function(param_names: &[&str], stmts: Vec<ast::Stmt>) -> ast::Function {
    ast::Function {
        params: params(param_names),
        decorators: vec![],
        span: DUMMY_SP,
        ctxt: SyntaxContext::empty(),
        body: Some(ast::BlockStmt {
            span: DUMMY_SP,
            ctxt: SyntaxContext::empty(),
            stmts,
        }),
        is_generator: false,
        is_async: false,
        type_params: None,
        return_type: None,
    }
}

fn fn_expr(param_names: &[&str], stmts: Vec<ast::Stmt>) -> ast::Expr {
    ast::Expr::Fn(ast::FnExpr {
        ident: None,
        function: Box::new(function(param_names, stmts)),
    })
}

fn fn_decl(name: ast::Ident, param_names: &[&str], stmts: Vec<ast::Stmt>) -> ast::Stmt {
    ast::Stmt::Decl(ast::Decl::Fn(ast::FnDecl {
        ident: name,
        declare: false,
        function: Box::new(function(param_names, stmts)),
    }))
}
