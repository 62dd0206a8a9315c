use std::fmt;

/// Index of a declaration node, assigned by the parser in creation order.
/// Symbols point back at their declaration site through these instead of
/// through references, so the tree stays a tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

/// Index into the analyzer's scope arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(pub u32);

/// Index into the analyzer's symbol arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SymbolId(pub u32);

/// A type as written in source. Array types are spelled with brackets in the
/// name itself (`[int]`), one level deep; array-ness is derived from that
/// form rather than stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Type {
    pub name: String,
    pub is_const: bool,
}

impl Type {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_const: false,
        }
    }

    pub fn constant(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_const: true,
        }
    }

    /// The sentinel type of functions without a return annotation.
    pub fn void() -> Self {
        Self::new("void")
    }

    pub fn is_array(&self) -> bool {
        self.name.len() >= 2 && self.name.starts_with('[') && self.name.ends_with(']')
    }

    /// Element type of an array type, `None` for anything else. The empty
    /// wildcard `[]` yields an element with an empty name.
    pub fn element_type(&self) -> Option<Type> {
        if !self.is_array() {
            return None;
        }
        Some(Type::new(&self.name[1..self.name.len() - 1]))
    }

    pub fn array_of(element: &Type) -> Type {
        Type::new(format!("[{}]", element.name))
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Negate,
    Not,
}

impl UnaryOp {
    pub fn from_lexeme(lexeme: &str) -> Option<Self> {
        match lexeme {
            "-" => Some(UnaryOp::Negate),
            "!" => Some(UnaryOp::Not),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Assign,
    LogicalOr,
    LogicalAnd,
    BitwiseOr,
    BitwiseXor,
    BitwiseAnd,
    Equal,
    NotEqual,
    Less,
    Greater,
    LessEqual,
    GreaterEqual,
    LeftShift,
    RightShift,
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
}

impl BinaryOp {
    pub fn from_lexeme(lexeme: &str) -> Option<Self> {
        let op = match lexeme {
            "=" => BinaryOp::Assign,
            "||" => BinaryOp::LogicalOr,
            "&&" => BinaryOp::LogicalAnd,
            "|" => BinaryOp::BitwiseOr,
            "^" => BinaryOp::BitwiseXor,
            "&" => BinaryOp::BitwiseAnd,
            "==" => BinaryOp::Equal,
            "!=" => BinaryOp::NotEqual,
            "<" => BinaryOp::Less,
            ">" => BinaryOp::Greater,
            "<=" => BinaryOp::LessEqual,
            ">=" => BinaryOp::GreaterEqual,
            "<<" => BinaryOp::LeftShift,
            ">>" => BinaryOp::RightShift,
            "+" => BinaryOp::Add,
            "-" => BinaryOp::Subtract,
            "*" => BinaryOp::Multiply,
            "/" => BinaryOp::Divide,
            "%" => BinaryOp::Modulo,
            _ => return None,
        };
        Some(op)
    }

    /// Returns the (left, right) binding power pair driving the expression
    /// parser. Tiers, loosest to tightest, in standard C order:
    /// `=` (right-associative), `||`, `&&`, `|`, `^`, `&`, equality,
    /// relational (non-associative, enforced by the parser), shifts,
    /// additive, multiplicative.
    pub fn binding_power(self) -> (u8, u8) {
        match self {
            BinaryOp::Assign => (2, 1),
            BinaryOp::LogicalOr => (3, 4),
            BinaryOp::LogicalAnd => (5, 6),
            BinaryOp::BitwiseOr => (7, 8),
            BinaryOp::BitwiseXor => (9, 10),
            BinaryOp::BitwiseAnd => (11, 12),
            BinaryOp::Equal | BinaryOp::NotEqual => (13, 14),
            BinaryOp::Less | BinaryOp::Greater | BinaryOp::LessEqual | BinaryOp::GreaterEqual => {
                (15, 16)
            }
            BinaryOp::LeftShift | BinaryOp::RightShift => (17, 18),
            BinaryOp::Add | BinaryOp::Subtract => (19, 20),
            BinaryOp::Multiply | BinaryOp::Divide | BinaryOp::Modulo => (21, 22),
        }
    }

    pub fn is_relational(self) -> bool {
        matches!(
            self,
            BinaryOp::Less | BinaryOp::Greater | BinaryOp::LessEqual | BinaryOp::GreaterEqual
        )
    }

    /// Operators whose result type is `bool` regardless of operand type.
    pub fn yields_bool(self) -> bool {
        matches!(
            self,
            BinaryOp::LogicalOr
                | BinaryOp::LogicalAnd
                | BinaryOp::Equal
                | BinaryOp::NotEqual
                | BinaryOp::Less
                | BinaryOp::Greater
                | BinaryOp::LessEqual
                | BinaryOp::GreaterEqual
        )
    }
}

/// Root of the owning tree: the ordered top-level declarations.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub declarations: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub statements: Vec<Stmt>,
    /// Filled by the declaration pass.
    pub scope: Option<ScopeId>,
}

/// A class body: declarations only, no statements.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassBlock {
    pub declarations: Vec<Stmt>,
    pub scope: Option<ScopeId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: String,
    pub ty: Type,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SwitchCase {
    pub value: Expr,
    pub body: Block,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// Both `let` (const) and `var` declarations; the distinction lives on
    /// the declared type's `is_const`.
    VarDeclaration {
        id: NodeId,
        name: String,
        declared_type: Type,
        initializer: Option<Expr>,
        resolved_type: Option<Type>,
        symbol: Option<SymbolId>,
    },
    FunDeclaration {
        id: NodeId,
        name: String,
        params: Vec<Param>,
        /// Absent means `void`.
        return_type: Option<Type>,
        body: Block,
        symbol: Option<SymbolId>,
        /// The parameter scope; the body block's scope nests inside it.
        function_scope: Option<ScopeId>,
    },
    ClassDeclaration {
        id: NodeId,
        name: String,
        body: ClassBlock,
        symbol: Option<SymbolId>,
    },
    EnumDeclaration {
        id: NodeId,
        name: String,
        members: Vec<String>,
        symbol: Option<SymbolId>,
    },
    /// A wrapped expression; the parser only admits assignments and calls.
    ExprStmt(Expr),
    Return {
        expr: Option<Expr>,
        enclosing_function: Option<NodeId>,
    },
    If {
        condition: Expr,
        then_branch: Block,
        else_branch: Option<Block>,
    },
    For {
        init: Option<Box<Stmt>>,
        condition: Expr,
        update: Expr,
        body: Block,
    },
    While {
        condition: Expr,
        body: Block,
    },
    Switch {
        scrutinee: Expr,
        cases: Vec<SwitchCase>,
        default: Option<Block>,
    },
    Break {
        is_inside_loop: bool,
    },
    Continue {
        is_inside_loop: bool,
    },
}

/// Callee of a [`Expr::FnCall`]: a bare name, or an arbitrary expression for
/// method calls (`obj.method(...)`).
#[derive(Debug, Clone, PartialEq)]
pub enum Callee {
    Name(String),
    Target(Box<Expr>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Raw lexeme; interpretation is deferred to the analyzer.
    Literal {
        value: String,
    },
    Identifier {
        name: String,
        symbol: Option<SymbolId>,
        ty: Option<Type>,
    },
    Binary {
        lhs: Box<Expr>,
        op: BinaryOp,
        rhs: Box<Expr>,
        ty: Option<Type>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    MemberAccess {
        object: Box<Expr>,
        member: String,
        symbol: Option<SymbolId>,
        object_ty: Option<Type>,
    },
    IndexAccess {
        object: Box<Expr>,
        index: Box<Expr>,
    },
    ArrayLiteral {
        elements: Vec<Expr>,
        ty: Option<Type>,
    },
    FnCall {
        callee: Callee,
        args: Vec<Expr>,
        resolved: Option<SymbolId>,
    },
    /// Produced by the analyzer when a call's bare name resolves to a class.
    ObjectInstantiation {
        class: String,
        args: Vec<Expr>,
        symbol: Option<SymbolId>,
    },
}
