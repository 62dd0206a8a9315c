//! Symbols, scopes and their arena storage.

use std::collections::HashMap;

use mano_parser::ast::{NodeId, ScopeId, SymbolId, Type};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Variable,
    Function,
    Class,
    Enum,
    Type,
}

/// A named semantic entity. For functions the type is the return type (the
/// `void` sentinel when the declaration has none); for classes and enums it
/// is the type they introduce.
#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
    pub kind: SymbolKind,
    pub name: String,
    pub ty: Type,
    /// The scope that introduced the symbol.
    pub scope: ScopeId,
    /// The declaration node that introduced the symbol; parameters point at
    /// their function, enum members at their enum.
    pub declaration: Option<NodeId>,
    pub is_initialized: bool,
    /// Set once the resolution pass has walked past the declaration.
    /// Resolving a variable whose flag is still unset is a use before
    /// declaration. Non-variable symbols are born reached.
    pub is_reached: bool,
    /// Scope holding the members of a class or enum symbol.
    pub members: Option<ScopeId>,
}

#[derive(Debug, Default)]
pub struct Scope {
    symbols: HashMap<String, SymbolId>,
    parent: Option<ScopeId>,
}

impl Scope {
    pub fn parent(&self) -> Option<ScopeId> {
        self.parent
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

/// Arena storage for scopes and symbols. "Popping" a scope is the
/// analyzer's stack discipline, not a storage operation: everything here
/// lives as long as the table so back-links from the annotated AST stay
/// valid.
#[derive(Debug, Default)]
pub struct SymbolTable {
    scopes: Vec<Scope>,
    symbols: Vec<Symbol>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_scope(&mut self, parent: Option<ScopeId>) -> ScopeId {
        let id = ScopeId(self.scopes.len() as u32);
        self.scopes.push(Scope {
            symbols: HashMap::new(),
            parent,
        });
        id
    }

    pub fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.0 as usize]
    }

    pub fn symbol(&self, id: SymbolId) -> &Symbol {
        &self.symbols[id.0 as usize]
    }

    pub fn symbol_mut(&mut self, id: SymbolId) -> &mut Symbol {
        &mut self.symbols[id.0 as usize]
    }

    /// Binds `symbol` in `scope`. Name-to-symbol is one-to-one within a
    /// scope: an existing binding is left untouched and returned as the
    /// error value.
    pub fn insert(&mut self, scope: ScopeId, symbol: Symbol) -> Result<SymbolId, SymbolId> {
        if let Some(&existing) = self.scopes[scope.0 as usize].symbols.get(&symbol.name) {
            return Err(existing);
        }
        let id = SymbolId(self.symbols.len() as u32);
        self.scopes[scope.0 as usize]
            .symbols
            .insert(symbol.name.clone(), id);
        self.symbols.push(symbol);
        Ok(id)
    }

    /// Walks parent links from `scope`, returning the innermost binding of
    /// `name`.
    pub fn lookup(&self, scope: ScopeId, name: &str) -> Option<SymbolId> {
        let mut current = Some(scope);
        while let Some(id) = current {
            let scope = &self.scopes[id.0 as usize];
            if let Some(&symbol) = scope.symbols.get(name) {
                return Some(symbol);
            }
            current = scope.parent;
        }
        None
    }

    /// Looks `name` up in `scope` alone, without walking parents. Member
    /// resolution uses this so `point.x` cannot accidentally find an
    /// unrelated outer `x`.
    pub fn lookup_local(&self, scope: ScopeId, name: &str) -> Option<SymbolId> {
        self.scopes[scope.0 as usize].symbols.get(name).copied()
    }

    pub fn scope_count(&self) -> usize {
        self.scopes.len()
    }

    pub fn symbol_count(&self) -> usize {
        self.symbols.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn variable(name: &str, scope: ScopeId) -> Symbol {
        Symbol {
            kind: SymbolKind::Variable,
            name: name.to_string(),
            ty: Type::new("int"),
            scope,
            declaration: None,
            is_initialized: true,
            is_reached: true,
            members: None,
        }
    }

    #[test]
    fn lookup_walks_parent_links() {
        let mut table = SymbolTable::new();
        let root = table.create_scope(None);
        let inner = table.create_scope(Some(root));
        let outer_x = table.insert(root, variable("x", root)).unwrap();
        assert_eq!(table.lookup(inner, "x"), Some(outer_x));
        assert_eq!(table.lookup(inner, "y"), None);
        assert_eq!(table.lookup_local(inner, "x"), None);
    }

    #[test]
    fn inner_bindings_shadow_outer_ones() {
        let mut table = SymbolTable::new();
        let root = table.create_scope(None);
        let inner = table.create_scope(Some(root));
        let outer_x = table.insert(root, variable("x", root)).unwrap();
        let inner_x = table.insert(inner, variable("x", inner)).unwrap();
        assert_ne!(outer_x, inner_x);
        assert_eq!(table.lookup(inner, "x"), Some(inner_x));
        assert_eq!(table.lookup(root, "x"), Some(outer_x));
    }

    #[test]
    fn duplicate_insertion_in_one_scope_is_rejected() {
        let mut table = SymbolTable::new();
        let root = table.create_scope(None);
        let first = table.insert(root, variable("x", root)).unwrap();
        assert_eq!(table.insert(root, variable("x", root)), Err(first));
        assert_eq!(table.symbol_count(), 1);
    }
}
