// Goast AST Definitions
// Go declarations with just enough structure for type specialization

use std::fmt;

/// Source position information for declarations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

/// A parsed Go source file
#[derive(Debug, Clone, PartialEq)]
pub struct Module {
    pub package: String,
    pub imports: Vec<ImportSpec>,
    pub decls: Vec<Decl>,
    pub source_name: Option<String>,
}

impl Module {
    pub fn new(package: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            imports: Vec::new(),
            decls: Vec::new(),
            source_name: None,
        }
    }

    /// All type declarations in source order, grouped specs flattened
    pub fn type_decls(&self) -> impl Iterator<Item = &TypeDecl> {
        self.decls.iter().filter_map(|decl| match decl {
            Decl::Type(type_decl) => Some(type_decl),
            _ => None,
        })
    }

    pub fn func_decls(&self) -> impl Iterator<Item = &FuncDecl> {
        self.decls.iter().filter_map(|decl| match decl {
            Decl::Func(func_decl) => Some(func_decl),
            _ => None,
        })
    }

    pub fn has_import_path(&self, path: &str) -> bool {
        self.imports.iter().any(|import| import.path == path)
    }
}

/// `import alias "path"`
#[derive(Debug, Clone, PartialEq)]
pub struct ImportSpec {
    pub name: Option<String>,
    pub path: String,
    pub span: Span,
}

impl ImportSpec {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            name: None,
            path: path.into(),
            span: Span::default(),
        }
    }

    /// The identifier this import is referred to by inside the file
    pub fn local_name(&self) -> &str {
        match &self.name {
            Some(name) => name,
            None => self.path.rsplit('/').next().unwrap_or(&self.path),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Decl {
    Type(TypeDecl),
    Func(FuncDecl),
    Value(ValueDecl),
}

/// `type Name T` or `type Name = T`
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDecl {
    pub name: String,
    pub alias: bool,
    pub ty: TypeExpr,
    pub span: Span,
}

impl TypeDecl {
    pub fn new(name: impl Into<String>, ty: TypeExpr) -> Self {
        Self {
            name: name.into(),
            alias: false,
            ty,
            span: Span::default(),
        }
    }

    /// A declaration of the empty interface is a directly bindable type variable
    pub fn is_placeholder(&self) -> bool {
        self.ty.is_empty_interface()
    }
}

/// Function or method declaration. Bodies are kept as token streams.
#[derive(Debug, Clone, PartialEq)]
pub struct FuncDecl {
    pub name: String,
    pub receiver: Option<FieldList>,
    pub params: FieldList,
    pub results: FieldList,
    pub body: Option<Body>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKeyword {
    Var,
    Const,
}

/// `var` or `const` declaration, kept verbatim after the keyword
#[derive(Debug, Clone, PartialEq)]
pub struct ValueDecl {
    pub keyword: ValueKeyword,
    pub body: Body,
    pub span: Span,
}

/// Exact source text split into identifiers and everything in between
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Body {
    pub segments: Vec<Segment>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    Ident(String),
    Text(String),
}

impl Body {
    /// Append text, merging with a preceding text segment
    pub fn push_text(&mut self, text: &str) {
        if let Some(Segment::Text(last)) = self.segments.last_mut() {
            last.push_str(text);
        } else {
            self.segments.push(Segment::Text(text.to_string()));
        }
    }

    pub fn push_ident(&mut self, ident: &str) {
        self.segments.push(Segment::Ident(ident.to_string()));
    }

    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Ident(name) => Some(name.as_str()),
            Segment::Text(_) => None,
        })
    }
}

impl fmt::Display for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            match segment {
                Segment::Ident(text) | Segment::Text(text) => f.write_str(text)?,
            }
        }
        Ok(())
    }
}

/// Channel direction as written in the source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChanDir {
    Both,
    Send,
    Recv,
}

/// Type expression tree
#[derive(Debug, Clone, PartialEq)]
pub enum TypeExpr {
    Name(String),
    /// `pkg.Name`
    Qualified(String, String),
    Pointer(Box<TypeExpr>),
    /// `[]T` when `len` is `None`, `[N]T` otherwise
    Array {
        len: Option<String>,
        elem: Box<TypeExpr>,
    },
    Variadic(Box<TypeExpr>),
    Paren(Box<TypeExpr>),
    Channel {
        dir: ChanDir,
        value: Box<TypeExpr>,
    },
    Map {
        key: Box<TypeExpr>,
        value: Box<TypeExpr>,
    },
    Function {
        params: FieldList,
        results: FieldList,
    },
    Struct(FieldList),
    Interface(FieldList),
}

impl TypeExpr {
    pub fn name(name: impl Into<String>) -> Self {
        TypeExpr::Name(name.into())
    }

    pub fn pointer(inner: TypeExpr) -> Self {
        TypeExpr::Pointer(Box::new(inner))
    }

    pub fn slice(elem: TypeExpr) -> Self {
        TypeExpr::Array {
            len: None,
            elem: Box::new(elem),
        }
    }

    pub fn channel(dir: ChanDir, value: TypeExpr) -> Self {
        TypeExpr::Channel {
            dir,
            value: Box::new(value),
        }
    }

    pub fn map(key: TypeExpr, value: TypeExpr) -> Self {
        TypeExpr::Map {
            key: Box::new(key),
            value: Box::new(value),
        }
    }

    pub fn empty_interface() -> Self {
        TypeExpr::Interface(FieldList::default())
    }

    pub fn is_empty_interface(&self) -> bool {
        matches!(self, TypeExpr::Interface(methods) if methods.is_empty())
    }

    /// Strip any number of enclosing parentheses
    pub fn unparen(&self) -> &TypeExpr {
        match self {
            TypeExpr::Paren(inner) => inner.unparen(),
            other => other,
        }
    }
}

/// A single field, parameter, result or interface method
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub names: Vec<String>,
    pub ty: TypeExpr,
    pub tag: Option<String>,
}

impl Field {
    pub fn new(names: Vec<String>, ty: TypeExpr) -> Self {
        Self {
            names,
            ty,
            tag: None,
        }
    }

    pub fn anonymous(ty: TypeExpr) -> Self {
        Self::new(Vec::new(), ty)
    }

    pub fn named(name: impl Into<String>, ty: TypeExpr) -> Self {
        Self::new(vec![name.into()], ty)
    }

    /// Declared names, or for an embedded field the base name of its type
    pub fn effective_names(&self) -> Vec<&str> {
        if !self.names.is_empty() {
            return self.names.iter().map(String::as_str).collect();
        }
        match embedded_name(&self.ty) {
            Some(name) => vec![name],
            None => Vec::new(),
        }
    }
}

fn embedded_name(ty: &TypeExpr) -> Option<&str> {
    match ty {
        TypeExpr::Name(name) => Some(name),
        TypeExpr::Qualified(_, name) => Some(name),
        TypeExpr::Pointer(inner) | TypeExpr::Paren(inner) => embedded_name(inner),
        _ => None,
    }
}

/// Ordered field list: struct fields, parameters, results or interface methods
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FieldList {
    pub fields: Vec<Field>,
}

impl FieldList {
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Number of declared entries, counting `a, b int` as two
    pub fn num_fields(&self) -> usize {
        self.fields
            .iter()
            .map(|field| field.names.len().max(1))
            .sum()
    }

    /// One type per declared entry, in order
    pub fn entry_types(&self) -> Vec<&TypeExpr> {
        self.fields
            .iter()
            .flat_map(|field| std::iter::repeat_n(&field.ty, field.names.len().max(1)))
            .collect()
    }

    pub fn field_by_name(&self, name: &str) -> Option<&Field> {
        self.fields
            .iter()
            .find(|field| field.effective_names().contains(&name))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Field> {
        self.fields.iter()
    }
}

impl<'a> IntoIterator for &'a FieldList {
    type Item = &'a Field;
    type IntoIter = std::slice::Iter<'a, Field>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

// Single-line Go syntax, used for diagnostics and inside bodies
impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeExpr::Name(name) => write!(f, "{}", name),
            TypeExpr::Qualified(package, name) => write!(f, "{}.{}", package, name),
            TypeExpr::Pointer(inner) => write!(f, "*{}", inner),
            TypeExpr::Array { len: None, elem } => write!(f, "[]{}", elem),
            TypeExpr::Array {
                len: Some(len),
                elem,
            } => write!(f, "[{}]{}", len, elem),
            TypeExpr::Variadic(elem) => write!(f, "...{}", elem),
            TypeExpr::Paren(inner) => write!(f, "({})", inner),
            TypeExpr::Channel { dir, value } => {
                let keyword = match dir {
                    ChanDir::Both => "chan",
                    ChanDir::Send => "chan<-",
                    ChanDir::Recv => "<-chan",
                };
                if needs_chan_parens(*dir, value) {
                    write!(f, "{} ({})", keyword, value)
                } else {
                    write!(f, "{} {}", keyword, value)
                }
            }
            TypeExpr::Map { key, value } => write!(f, "map[{}]{}", key, value),
            TypeExpr::Function { params, results } => {
                write!(f, "func{}", Signature { params, results })
            }
            TypeExpr::Struct(fields) if fields.is_empty() => write!(f, "struct{{}}"),
            TypeExpr::Struct(fields) => {
                let parts: Vec<String> = fields.iter().map(|field| field.to_string()).collect();
                write!(f, "struct {{ {} }}", parts.join("; "))
            }
            TypeExpr::Interface(methods) if methods.is_empty() => write!(f, "interface{{}}"),
            TypeExpr::Interface(methods) => {
                let parts: Vec<String> = methods.iter().map(method_string).collect();
                write!(f, "interface {{ {} }}", parts.join("; "))
            }
        }
    }
}

/// `chan <-chan T` would read as `chan<- chan T`
pub(crate) fn needs_chan_parens(dir: ChanDir, value: &TypeExpr) -> bool {
    dir == ChanDir::Both
        && matches!(
            value,
            TypeExpr::Channel {
                dir: ChanDir::Recv,
                ..
            }
        )
}

pub(crate) fn method_string(method: &Field) -> String {
    match (&method.ty, method.names.first()) {
        (TypeExpr::Function { params, results }, Some(name)) => {
            format!("{}{}", name, Signature { params, results })
        }
        _ => method.ty.to_string(),
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.names.is_empty() {
            write!(f, "{}", self.ty)?;
        } else {
            write!(f, "{} {}", self.names.join(", "), self.ty)?;
        }
        if let Some(tag) = &self.tag {
            write!(f, " {}", tag)?;
        }
        Ok(())
    }
}

/// Parameter list rendering: `(a, b int, c string)`
impl fmt::Display for FieldList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.fields.iter().map(|field| field.to_string()).collect();
        write!(f, "({})", parts.join(", "))
    }
}

/// `(params) results` as it follows `func` or a method name
pub struct Signature<'a> {
    pub params: &'a FieldList,
    pub results: &'a FieldList,
}

impl fmt::Display for Signature<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.params)?;
        match self.results.fields.as_slice() {
            [] => Ok(()),
            [single] if single.names.is_empty() => write!(f, " {}", single.ty),
            _ => write!(f, " {}", self.results),
        }
    }
}

impl fmt::Display for ChanDir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ChanDir::Both => "bidirectional",
            ChanDir::Send => "send-only",
            ChanDir::Recv => "receive-only",
        };
        write!(f, "{}", text)
    }
}

impl fmt::Display for ValueKeyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueKeyword::Var => write!(f, "var"),
            ValueKeyword::Const => write!(f, "const"),
        }
    }
}
