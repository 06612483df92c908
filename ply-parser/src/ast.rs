// Ply AST Definitions
// Abstract Syntax Tree nodes for host-language and dialect files

/// Source position information for AST nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Span used by nodes that were built by a rewrite rather than parsed.
    pub const fn synthetic() -> Self {
        Self { start: 0, end: 0 }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Identifies one parsed file within a compilation unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FileId(pub u32);

impl FileId {
    /// Owner of expressions created outside the parser.
    pub const DETACHED: FileId = FileId(u32::MAX);
}

/// Unique identity of an expression node across a compilation unit.
///
/// The type checker keys its table by this id, so ids must stay stable while
/// the AST is rewritten. Nodes built by rewrites carry [`ExprId::detached`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExprId {
    pub file: FileId,
    pub index: u32,
}

impl ExprId {
    pub fn new(file: FileId, index: u32) -> Self {
        Self { file, index }
    }

    pub const fn detached() -> Self {
        Self {
            file: FileId::DETACHED,
            index: 0,
        }
    }

    pub fn is_detached(&self) -> bool {
        self.file == FileId::DETACHED
    }
}

/// A parsed source file
#[derive(Debug, Clone, PartialEq)]
pub struct File {
    pub id: FileId,
    pub name: Option<String>,
    /// Text the file was parsed from, kept for diagnostics
    pub source: String,
    pub package: Ident,
    pub imports: Vec<Import>,
    pub decls: Vec<Decl>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Ident {
    pub name: String,
    pub span: Span,
}

impl Ident {
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            span,
        }
    }

    pub fn synthetic(name: impl Into<String>) -> Self {
        Self::new(name, Span::synthetic())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Import {
    pub path: String,
    pub span: Span,
}

/// Top-level declarations
#[derive(Debug, Clone, PartialEq)]
pub enum Decl {
    Func(FuncDecl),
    Type(TypeDecl),
    Const(ConstDecl),
    Var(VarDecl),
}

impl Decl {
    /// Name the declaration introduces (methods report their method name).
    pub fn name(&self) -> &str {
        match self {
            Decl::Func(func) => &func.name.name,
            Decl::Type(decl) => &decl.name.name,
            Decl::Const(decl) => &decl.name.name,
            Decl::Var(decl) => &decl.name.name,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Decl::Func(func) => func.span,
            Decl::Type(decl) => decl.span,
            Decl::Const(decl) => decl.span,
            Decl::Var(decl) => decl.span,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FuncDecl {
    pub receiver: Option<Receiver>,
    pub name: Ident,
    pub signature: Signature,
    pub body: Block,
    pub span: Span,
}

/// Value receiver of a method declaration: `(r T)`
#[derive(Debug, Clone, PartialEq)]
pub struct Receiver {
    pub name: Ident,
    pub ty: TypeExpr,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Signature {
    pub params: Vec<Param>,
    pub result: Option<TypeExpr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: Ident,
    pub ty: TypeExpr,
    pub variadic: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeDecl {
    pub name: Ident,
    pub ty: TypeExpr,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConstDecl {
    pub name: Ident,
    pub ty: Option<TypeExpr>,
    pub value: Expr,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VarDecl {
    pub name: Ident,
    pub ty: Option<TypeExpr>,
    pub value: Option<Expr>,
    pub span: Span,
}

/// Type syntax as written in source
#[derive(Debug, Clone, PartialEq)]
pub struct TypeExpr {
    pub kind: TypeExprKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypeExprKind {
    Name(String),
    Slice(Box<TypeExpr>),
    Map(Box<TypeExpr>, Box<TypeExpr>),
    Func(FuncTypeExpr),
    Struct(Vec<FieldDecl>),
    Interface,
}

impl TypeExpr {
    pub fn new(kind: TypeExprKind, span: Span) -> Self {
        Self { kind, span }
    }

    pub fn name(name: impl Into<String>) -> Self {
        Self::new(TypeExprKind::Name(name.into()), Span::synthetic())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FuncTypeExpr {
    pub params: Vec<TypeExpr>,
    pub variadic: bool,
    pub result: Option<Box<TypeExpr>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldDecl {
    pub name: Ident,
    pub ty: TypeExpr,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub stmts: Vec<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StmtKind {
    Expr(Expr),
    ShortVar { name: Ident, value: Expr },
    Var(VarDecl),
    Const(ConstDecl),
    Assign {
        target: Expr,
        op: AssignOp,
        value: Expr,
    },
    IncDec { target: Expr, increment: bool },
    Return(Option<Expr>),
    Break,
    Continue,
    Block(Block),
    If(IfStmt),
    For(ForStmt),
    Range(RangeStmt),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOp {
    Assign,
    Add,
    Sub,
    Mul,
    Div,
    Rem,
}

impl AssignOp {
    /// Binary operator applied by a compound assignment.
    pub fn binary(self) -> Option<BinaryOp> {
        match self {
            AssignOp::Assign => None,
            AssignOp::Add => Some(BinaryOp::Add),
            AssignOp::Sub => Some(BinaryOp::Sub),
            AssignOp::Mul => Some(BinaryOp::Mul),
            AssignOp::Div => Some(BinaryOp::Div),
            AssignOp::Rem => Some(BinaryOp::Rem),
        }
    }
}

impl std::fmt::Display for AssignOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let op = match self {
            AssignOp::Assign => "=",
            AssignOp::Add => "+=",
            AssignOp::Sub => "-=",
            AssignOp::Mul => "*=",
            AssignOp::Div => "/=",
            AssignOp::Rem => "%=",
        };
        write!(f, "{}", op)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfStmt {
    pub cond: Expr,
    pub then_block: Block,
    pub else_branch: Option<Box<ElseBranch>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ElseBranch {
    If(IfStmt),
    Block(Block),
}

/// `for init; cond; post {}`, `for cond {}` and `for {}`
#[derive(Debug, Clone, PartialEq)]
pub struct ForStmt {
    pub init: Option<Box<Stmt>>,
    pub cond: Option<Expr>,
    pub post: Option<Box<Stmt>>,
    pub body: Block,
}

/// `for k, v := range iterable {}`; both names are optional.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeStmt {
    pub key: Option<Ident>,
    pub value: Option<Ident>,
    pub iterable: Expr,
    pub body: Block,
}

/// Expressions carry an id so the type table can describe them.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub id: ExprId,
    pub kind: ExprKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    Ident(String),
    Int(i64),
    Float(FloatLiteral),
    String(StringLiteral),
    Binary(BinaryExpr),
    Unary(UnaryExpr),
    Call(CallExpr),
    Selector(SelectorExpr),
    Index(IndexExpr),
    Slice(SliceExpr),
    Paren(Box<Expr>),
    Composite(CompositeLit),
    FuncLit(FuncLit),
    /// Unnamed type in operand position (`make([]int, 0)`)
    Type(TypeExpr),
}

impl Expr {
    /// Build an expression that did not come from source.
    pub fn synthetic(kind: ExprKind) -> Self {
        Self {
            id: ExprId::detached(),
            kind,
            span: Span::synthetic(),
        }
    }

    pub fn ident(name: impl Into<String>) -> Self {
        Self::synthetic(ExprKind::Ident(name.into()))
    }

    /// `func(args..)` built from a callee name.
    pub fn call(func: impl Into<String>, args: Vec<Expr>) -> Self {
        Self::synthetic(ExprKind::Call(CallExpr {
            func: Box::new(Expr::ident(func)),
            args,
            ellipsis: false,
        }))
    }

    pub fn as_call(&self) -> Option<&CallExpr> {
        match &self.kind {
            ExprKind::Call(call) => Some(call),
            _ => None,
        }
    }

    pub fn as_ident(&self) -> Option<&str> {
        match &self.kind {
            ExprKind::Ident(name) => Some(name),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FloatLiteral {
    pub value: f64,
    /// Source text, kept so printing reproduces the literal exactly.
    pub raw: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StringLiteral {
    /// Processed content (escapes resolved)
    pub value: String,
    pub format: StringFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringFormat {
    Interpreted, // "..."
    Raw,         // `...`
}

#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpr {
    pub left: Box<Expr>,
    pub op: BinaryOp,
    pub right: Box<Expr>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Or,
    And,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Add,
    Sub,
    Mul,
    Div,
    Rem,
}

impl BinaryOp {
    /// Go operator precedence, 1 (lowest) to 5.
    pub fn precedence(self) -> u8 {
        match self {
            BinaryOp::Or => 1,
            BinaryOp::And => 2,
            BinaryOp::Eq
            | BinaryOp::Ne
            | BinaryOp::Lt
            | BinaryOp::Le
            | BinaryOp::Gt
            | BinaryOp::Ge => 3,
            BinaryOp::Add | BinaryOp::Sub => 4,
            BinaryOp::Mul | BinaryOp::Div | BinaryOp::Rem => 5,
        }
    }

    pub fn is_comparison(self) -> bool {
        self.precedence() == 3
    }

    pub fn is_logical(self) -> bool {
        matches!(self, BinaryOp::Or | BinaryOp::And)
    }

    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Or => "||",
            BinaryOp::And => "&&",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
        }
    }
}

impl std::fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnaryExpr {
    pub op: UnaryOp,
    pub operand: Box<Expr>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Plus,
    Not,
}

impl std::fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let op = match self {
            UnaryOp::Neg => "-",
            UnaryOp::Plus => "+",
            UnaryOp::Not => "!",
        };
        write!(f, "{}", op)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CallExpr {
    pub func: Box<Expr>,
    pub args: Vec<Expr>,
    /// Trailing `...` spreading the last argument into a variadic parameter
    pub ellipsis: bool,
}

impl CallExpr {
    /// `(receiver, method)` when the callee is a selector.
    pub fn method(&self) -> Option<(&Expr, &Ident)> {
        match &self.func.kind {
            ExprKind::Selector(sel) => Some((&sel.operand, &sel.field)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectorExpr {
    pub operand: Box<Expr>,
    pub field: Ident,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndexExpr {
    pub operand: Box<Expr>,
    pub index: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SliceExpr {
    pub operand: Box<Expr>,
    pub low: Option<Box<Expr>>,
    pub high: Option<Box<Expr>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompositeLit {
    pub ty: TypeExpr,
    pub elements: Vec<Element>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub key: Option<Expr>,
    pub value: Expr,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FuncLit {
    pub signature: Signature,
    pub body: Block,
}
