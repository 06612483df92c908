// Ply pretty-printer
// Serializes AST nodes back to source text that the parser accepts again

use crate::ast::*;
use std::fmt;

/// Accumulates source text with tab indentation.
#[derive(Debug, Default)]
pub struct Printer {
    out: String,
    indent: usize,
}

impl Printer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn finish(self) -> String {
        self.out
    }

    pub fn file(&mut self, file: &File) {
        self.out.push_str("package ");
        self.out.push_str(&file.package.name);
        self.out.push('\n');

        match file.imports.as_slice() {
            [] => {}
            [single] => {
                self.out.push_str("\nimport ");
                self.string(&single.path, StringFormat::Interpreted);
                self.out.push('\n');
            }
            imports => {
                self.out.push_str("\nimport (\n");
                for import in imports {
                    self.out.push('\t');
                    self.string(&import.path, StringFormat::Interpreted);
                    self.out.push('\n');
                }
                self.out.push_str(")\n");
            }
        }

        for decl in &file.decls {
            self.out.push('\n');
            self.decl(decl);
            self.out.push('\n');
        }
    }

    pub fn decl(&mut self, decl: &Decl) {
        match decl {
            Decl::Func(func) => {
                self.out.push_str("func ");
                if let Some(receiver) = &func.receiver {
                    self.out.push('(');
                    self.out.push_str(&receiver.name.name);
                    self.out.push(' ');
                    self.type_expr(&receiver.ty);
                    self.out.push_str(") ");
                }
                self.out.push_str(&func.name.name);
                self.signature(&func.signature);
                self.out.push(' ');
                self.block(&func.body);
            }
            Decl::Type(decl) => {
                self.out.push_str("type ");
                self.out.push_str(&decl.name.name);
                self.out.push(' ');
                self.type_expr(&decl.ty);
            }
            Decl::Const(decl) => self.const_decl(decl),
            Decl::Var(decl) => self.var_decl(decl),
        }
    }

    fn const_decl(&mut self, decl: &ConstDecl) {
        self.out.push_str("const ");
        self.out.push_str(&decl.name.name);
        if let Some(ty) = &decl.ty {
            self.out.push(' ');
            self.type_expr(ty);
        }
        self.out.push_str(" = ");
        self.expr(&decl.value);
    }

    fn var_decl(&mut self, decl: &VarDecl) {
        self.out.push_str("var ");
        self.out.push_str(&decl.name.name);
        if let Some(ty) = &decl.ty {
            self.out.push(' ');
            self.type_expr(ty);
        }
        if let Some(value) = &decl.value {
            self.out.push_str(" = ");
            self.expr(value);
        }
    }

    fn signature(&mut self, signature: &Signature) {
        self.out.push('(');
        for (i, param) in signature.params.iter().enumerate() {
            if i > 0 {
                self.out.push_str(", ");
            }
            self.out.push_str(&param.name.name);
            self.out.push(' ');
            if param.variadic {
                self.out.push_str("...");
            }
            self.type_expr(&param.ty);
        }
        self.out.push(')');
        if let Some(result) = &signature.result {
            self.out.push(' ');
            self.type_expr(result);
        }
    }

    pub fn type_expr(&mut self, ty: &TypeExpr) {
        match &ty.kind {
            TypeExprKind::Name(name) => self.out.push_str(name),
            TypeExprKind::Slice(elem) => {
                self.out.push_str("[]");
                self.type_expr(elem);
            }
            TypeExprKind::Map(key, value) => {
                self.out.push_str("map[");
                self.type_expr(key);
                self.out.push(']');
                self.type_expr(value);
            }
            TypeExprKind::Func(func) => {
                self.out.push_str("func(");
                let last = func.params.len().saturating_sub(1);
                for (i, param) in func.params.iter().enumerate() {
                    if i > 0 {
                        self.out.push_str(", ");
                    }
                    if func.variadic && i == last {
                        self.out.push_str("...");
                    }
                    self.type_expr(param);
                }
                self.out.push(')');
                if let Some(result) = &func.result {
                    self.out.push(' ');
                    self.type_expr(result);
                }
            }
            TypeExprKind::Struct(fields) => {
                if fields.is_empty() {
                    self.out.push_str("struct{}");
                    return;
                }
                self.out.push_str("struct { ");
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        self.out.push_str("; ");
                    }
                    self.out.push_str(&field.name.name);
                    self.out.push(' ');
                    self.type_expr(&field.ty);
                }
                self.out.push_str(" }");
            }
            TypeExprKind::Interface => self.out.push_str("interface{}"),
        }
    }

    pub fn block(&mut self, block: &Block) {
        self.out.push_str("{\n");
        self.indent += 1;
        for stmt in &block.stmts {
            self.write_indent();
            self.stmt(stmt);
            self.out.push('\n');
        }
        self.indent -= 1;
        self.write_indent();
        self.out.push('}');
    }

    pub fn stmt(&mut self, stmt: &Stmt) {
        match &stmt.kind {
            StmtKind::Expr(expr) => self.expr(expr),
            StmtKind::ShortVar { name, value } => {
                self.out.push_str(&name.name);
                self.out.push_str(" := ");
                self.expr(value);
            }
            StmtKind::Var(decl) => self.var_decl(decl),
            StmtKind::Const(decl) => self.const_decl(decl),
            StmtKind::Assign { target, op, value } => {
                self.expr(target);
                self.out.push_str(&format!(" {} ", op));
                self.expr(value);
            }
            StmtKind::IncDec { target, increment } => {
                self.expr(target);
                self.out.push_str(if *increment { "++" } else { "--" });
            }
            StmtKind::Return(value) => {
                self.out.push_str("return");
                if let Some(value) = value {
                    self.out.push(' ');
                    self.expr(value);
                }
            }
            StmtKind::Break => self.out.push_str("break"),
            StmtKind::Continue => self.out.push_str("continue"),
            StmtKind::Block(block) => self.block(block),
            StmtKind::If(if_stmt) => self.if_stmt(if_stmt),
            StmtKind::For(for_stmt) => {
                self.out.push_str("for ");
                match (&for_stmt.init, &for_stmt.cond, &for_stmt.post) {
                    (None, None, None) => {}
                    (None, Some(cond), None) => {
                        self.expr(cond);
                        self.out.push(' ');
                    }
                    (init, cond, post) => {
                        if let Some(init) = init {
                            self.stmt(init);
                        }
                        self.out.push_str("; ");
                        if let Some(cond) = cond {
                            self.expr(cond);
                        }
                        self.out.push_str("; ");
                        if let Some(post) = post {
                            self.stmt(post);
                            self.out.push(' ');
                        }
                    }
                }
                self.block(&for_stmt.body);
            }
            StmtKind::Range(range) => {
                self.out.push_str("for ");
                match (&range.key, &range.value) {
                    (Some(key), Some(value)) => {
                        self.out.push_str(&format!("{}, {} := ", key.name, value.name));
                    }
                    (Some(key), None) => self.out.push_str(&format!("{} := ", key.name)),
                    _ => {}
                }
                self.out.push_str("range ");
                self.expr(&range.iterable);
                self.out.push(' ');
                self.block(&range.body);
            }
        }
    }

    fn if_stmt(&mut self, if_stmt: &IfStmt) {
        self.out.push_str("if ");
        self.expr(&if_stmt.cond);
        self.out.push(' ');
        self.block(&if_stmt.then_block);
        if let Some(else_branch) = &if_stmt.else_branch {
            self.out.push_str(" else ");
            match else_branch.as_ref() {
                ElseBranch::If(nested) => self.if_stmt(nested),
                ElseBranch::Block(block) => self.block(block),
            }
        }
    }

    pub fn expr(&mut self, expr: &Expr) {
        match &expr.kind {
            ExprKind::Ident(name) => self.out.push_str(name),
            ExprKind::Int(value) => self.out.push_str(&value.to_string()),
            ExprKind::Float(float) => self.out.push_str(&float.raw),
            ExprKind::String(lit) => self.string(&lit.value, lit.format),
            ExprKind::Binary(binary) => {
                let prec = binary.op.precedence();
                self.operand(&binary.left, |child| child < prec);
                self.out.push_str(&format!(" {} ", binary.op));
                self.operand(&binary.right, |child| child <= prec);
            }
            ExprKind::Unary(unary) => {
                self.out.push_str(&unary.op.to_string());
                let wrap = match &unary.operand.kind {
                    ExprKind::Binary(_) | ExprKind::Unary(_) => true,
                    ExprKind::Int(value) => *value < 0,
                    _ => false,
                };
                self.wrapped(&unary.operand, wrap);
            }
            ExprKind::Call(call) => {
                self.postfix_operand(&call.func);
                self.out.push('(');
                for (i, arg) in call.args.iter().enumerate() {
                    if i > 0 {
                        self.out.push_str(", ");
                    }
                    self.expr(arg);
                }
                if call.ellipsis {
                    self.out.push_str("...");
                }
                self.out.push(')');
            }
            ExprKind::Selector(sel) => {
                self.postfix_operand(&sel.operand);
                self.out.push('.');
                self.out.push_str(&sel.field.name);
            }
            ExprKind::Index(index) => {
                self.postfix_operand(&index.operand);
                self.out.push('[');
                self.expr(&index.index);
                self.out.push(']');
            }
            ExprKind::Slice(slice) => {
                self.postfix_operand(&slice.operand);
                self.out.push('[');
                if let Some(low) = &slice.low {
                    self.expr(low);
                }
                self.out.push(':');
                if let Some(high) = &slice.high {
                    self.expr(high);
                }
                self.out.push(']');
            }
            ExprKind::Paren(inner) => {
                self.out.push('(');
                self.expr(inner);
                self.out.push(')');
            }
            ExprKind::Composite(lit) => {
                self.type_expr(&lit.ty);
                self.out.push('{');
                for (i, element) in lit.elements.iter().enumerate() {
                    if i > 0 {
                        self.out.push_str(", ");
                    }
                    if let Some(key) = &element.key {
                        self.expr(key);
                        self.out.push_str(": ");
                    }
                    self.expr(&element.value);
                }
                self.out.push('}');
            }
            ExprKind::Type(ty) => self.type_expr(ty),
            ExprKind::FuncLit(func) => {
                self.out.push_str("func");
                self.signature(&func.signature);
                self.out.push(' ');
                self.block(&func.body);
            }
        }
    }

    /// Print a binary/unary operand, parenthesizing lower-precedence binaries.
    fn operand(&mut self, expr: &Expr, needs_parens: impl Fn(u8) -> bool) {
        let wrap = match &expr.kind {
            ExprKind::Binary(binary) => needs_parens(binary.op.precedence()),
            _ => false,
        };
        self.wrapped(expr, wrap);
    }

    fn postfix_operand(&mut self, expr: &Expr) {
        let wrap = matches!(expr.kind, ExprKind::Binary(_) | ExprKind::Unary(_))
            || matches!(expr.kind, ExprKind::Int(value) if value < 0);
        self.wrapped(expr, wrap);
    }

    fn wrapped(&mut self, expr: &Expr, wrap: bool) {
        if wrap {
            self.out.push('(');
        }
        self.expr(expr);
        if wrap {
            self.out.push(')');
        }
    }

    fn string(&mut self, value: &str, format: StringFormat) {
        match format {
            StringFormat::Raw => {
                self.out.push('`');
                self.out.push_str(value);
                self.out.push('`');
            }
            StringFormat::Interpreted => {
                self.out.push('"');
                for ch in value.chars() {
                    match ch {
                        '"' => self.out.push_str("\\\""),
                        '\\' => self.out.push_str("\\\\"),
                        '\n' => self.out.push_str("\\n"),
                        '\t' => self.out.push_str("\\t"),
                        '\r' => self.out.push_str("\\r"),
                        '\0' => self.out.push_str("\\0"),
                        c if (c as u32) < 0x20 => self.out.push_str(&format!("\\x{:02x}", c as u32)),
                        c => self.out.push(c),
                    }
                }
                self.out.push('"');
            }
        }
    }

    fn write_indent(&mut self) {
        for _ in 0..self.indent {
            self.out.push('\t');
        }
    }
}

/// Serialize a whole file
pub fn print_file(file: &File) -> String {
    let mut printer = Printer::new();
    printer.file(file);
    printer.finish()
}

pub fn print_decl(decl: &Decl) -> String {
    let mut printer = Printer::new();
    printer.decl(decl);
    printer.finish()
}

pub fn print_expr(expr: &Expr) -> String {
    let mut printer = Printer::new();
    printer.expr(expr);
    printer.finish()
}

pub fn print_type(ty: &TypeExpr) -> String {
    let mut printer = Printer::new();
    printer.type_expr(ty);
    printer.finish()
}

impl fmt::Display for File {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&print_file(self))
    }
}

impl fmt::Display for Decl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&print_decl(self))
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&print_expr(self))
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&print_type(self))
    }
}

impl fmt::Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut printer = Printer::new();
        printer.stmt(self);
        f.write_str(&printer.finish())
    }
}
