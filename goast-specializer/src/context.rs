//! Name lookup over a parsed module
//!
//! One flat namespace per module: the first declaration of a name wins and
//! there is no scoping.

use goast_parser::{ImportSpec, Module, TypeDecl};
use indexmap::IndexMap;

/// Read-only view of a module's type declarations and imports
#[derive(Debug, Clone)]
pub struct ModuleContext<'m> {
    module: &'m Module,
    types: IndexMap<&'m str, &'m TypeDecl>,
}

impl<'m> ModuleContext<'m> {
    pub fn new(module: &'m Module) -> Self {
        let mut types = IndexMap::new();
        for decl in module.type_decls() {
            types.entry(decl.name.as_str()).or_insert(decl);
        }
        Self { module, types }
    }

    pub fn package(&self) -> &'m str {
        &self.module.package
    }

    /// Exact-match lookup of a declared type
    pub fn lookup(&self, name: &str) -> Option<&'m TypeDecl> {
        self.types.get(name).copied()
    }

    /// Whether `name` is declared as the empty interface
    pub fn is_placeholder(&self, name: &str) -> bool {
        self.lookup(name).is_some_and(TypeDecl::is_placeholder)
    }

    /// Unique type declarations in declaration order
    pub fn type_decls(&self) -> impl Iterator<Item = &'m TypeDecl> + '_ {
        self.types.values().copied()
    }

    /// The import a short qualifier such as `sync` in `sync.Mutex` refers to
    pub fn qualifier_of(&self, short: &str) -> Option<&'m ImportSpec> {
        self.module
            .imports
            .iter()
            .find(|import| import.local_name() == short)
    }
}
