//! Minimal JavaScript module syntax tree
//!
//! Covers exactly the constructs the loader emits. Printing is
//! deterministic: object keys keep insertion order, JSON values are printed
//! with sorted keys.

use serde_json::Value;

const INDENT: &str = "  ";

/// A top-level or block statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// `// text`
    Comment(String),
    /// `import Local from 'source'`
    ImportDefault { local: String, source: String },
    /// `const name = init`
    Const { name: String, init: Expr },
    /// `return value`
    Return(Expr),
    /// `export { a, b }`
    ExportNamed(Vec<String>),
    /// Blank separator line.
    Blank,
}

/// An expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Ident(String),
    Str(String),
    Json(Value),
    Array(Vec<Expr>),
    /// Object literal with bare identifier keys, printed on one line.
    Object(Vec<(String, Expr)>),
    Member(Box<Expr>, String),
    Call(Box<Expr>, Vec<Expr>),
    New(Box<Expr>, Vec<Expr>),
    /// `import('source')`
    DynamicImport(String),
    Arrow {
        is_async: bool,
        params: Vec<String>,
        body: ArrowBody,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum ArrowBody {
    Expr(Box<Expr>),
    Block(Vec<Stmt>),
}

impl Expr {
    pub fn ident(name: impl Into<String>) -> Self {
        Expr::Ident(name.into())
    }

    pub fn str(value: impl Into<String>) -> Self {
        Expr::Str(value.into())
    }

    pub fn member(self, property: impl Into<String>) -> Self {
        Expr::Member(Box::new(self), property.into())
    }

    pub fn call(self, args: Vec<Expr>) -> Self {
        Expr::Call(Box::new(self), args)
    }

    pub fn new_instance(self, args: Vec<Expr>) -> Self {
        Expr::New(Box::new(self), args)
    }
}

/// A whole module.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Module {
    pub body: Vec<Stmt>,
}

impl Module {
    pub fn push(&mut self, stmt: Stmt) {
        self.body.push(stmt);
    }

    /// Print the module as source text, ending with a newline.
    pub fn print(&self) -> String {
        let mut printer = Printer::default();
        printer.stmts(&self.body);
        printer.out
    }
}

#[derive(Default)]
struct Printer {
    out: String,
    depth: usize,
}

impl Printer {
    fn indent(&mut self) {
        for _ in 0..self.depth {
            self.out.push_str(INDENT);
        }
    }

    fn stmts(&mut self, stmts: &[Stmt]) {
        for stmt in stmts {
            self.stmt(stmt);
        }
    }

    fn stmt(&mut self, stmt: &Stmt) {
        if matches!(stmt, Stmt::Blank) {
            self.out.push('\n');
            return;
        }

        self.indent();
        match stmt {
            Stmt::Comment(text) => {
                self.out.push_str("// ");
                self.out.push_str(text);
            }
            Stmt::ImportDefault { local, source } => {
                self.out.push_str(&format!("import {local} from {}", js_string(source)));
            }
            Stmt::Const { name, init } => {
                self.out.push_str(&format!("const {name} = "));
                self.expr(init);
            }
            Stmt::Return(value) => {
                self.out.push_str("return ");
                self.expr(value);
            }
            Stmt::ExportNamed(names) => {
                self.out.push_str(&format!("export {{ {} }}", names.join(", ")));
            }
            Stmt::Blank => {}
        }
        self.out.push('\n');
    }

    fn expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Ident(name) => self.out.push_str(name),
            Expr::Str(value) => self.out.push_str(&js_string(value)),
            Expr::Json(value) => json_literal(&mut self.out, value),
            Expr::Array(items) if items.is_empty() => self.out.push_str("[]"),
            Expr::Array(items) => {
                self.out.push_str("[\n");
                self.depth += 1;
                for (i, item) in items.iter().enumerate() {
                    self.indent();
                    self.expr(item);
                    if i + 1 < items.len() {
                        self.out.push(',');
                    }
                    self.out.push('\n');
                }
                self.depth -= 1;
                self.indent();
                self.out.push(']');
            }
            Expr::Object(fields) => {
                self.out.push('{');
                for (i, (key, value)) in fields.iter().enumerate() {
                    if i > 0 {
                        self.out.push_str(", ");
                    }
                    self.out.push_str(key);
                    self.out.push_str(": ");
                    self.expr(value);
                }
                self.out.push('}');
            }
            Expr::Member(object, property) => {
                self.expr(object);
                self.out.push('.');
                self.out.push_str(property);
            }
            Expr::Call(callee, args) => {
                self.expr(callee);
                self.args(args);
            }
            Expr::New(callee, args) => {
                self.out.push_str("new ");
                self.expr(callee);
                self.args(args);
            }
            Expr::DynamicImport(source) => {
                self.out.push_str(&format!("import({})", js_string(source)));
            }
            Expr::Arrow {
                is_async,
                params,
                body,
            } => {
                if *is_async {
                    self.out.push_str("async ");
                }
                self.out.push_str(&format!("({}) => ", params.join(", ")));
                match body {
                    ArrowBody::Expr(value) => self.expr(value),
                    ArrowBody::Block(stmts) => {
                        self.out.push_str("{\n");
                        self.depth += 1;
                        self.stmts(stmts);
                        self.depth -= 1;
                        self.indent();
                        self.out.push('}');
                    }
                }
            }
        }
    }

    fn args(&mut self, args: &[Expr]) {
        self.out.push('(');
        for (i, arg) in args.iter().enumerate() {
            if i > 0 {
                self.out.push_str(", ");
            }
            self.expr(arg);
        }
        self.out.push(')');
    }
}

/// Print `value` as a JS expression. JSON syntax is valid JS except that a
/// literal `__proto__` key sets the prototype instead of an own property, so
/// that key is emitted as a computed key. Keys are sorted by serde_json's map.
pub fn json_literal(out: &mut String, value: &Value) {
    match value {
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                json_literal(out, item);
            }
            out.push(']');
        }
        Value::Object(fields) => {
            out.push('{');
            for (i, (key, item)) in fields.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                let quoted = Value::String(key.clone()).to_string();
                if key == "__proto__" {
                    out.push_str(&format!("[{quoted}]"));
                } else {
                    out.push_str(&quoted);
                }
                out.push(':');
                json_literal(out, item);
            }
            out.push('}');
        }
        scalar => out.push_str(&scalar.to_string()),
    }
}

/// Single-quoted JavaScript string literal.
pub fn js_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            c => out.push(c),
        }
    }
    out.push('\'');
    out
}
