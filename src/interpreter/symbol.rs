use crate::interpreter::value::Value;

/// A named, mutable binding.
///
/// `value` is `None` while the symbol is declared but not yet initialized
/// (`var x;`).
#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
    /// The declared name.
    pub name:  String,
    /// The current value, if any.
    pub value: Option<Value>,
}

/// The symbols declared directly in one scope.
///
/// Insertion order is declaration order. Names are unique within one table;
/// shadowing happens across tables, never inside one. Lookup is linear,
/// which is cheap for the handful of names a block declares.
///
/// # Example
/// ```
/// use retread::interpreter::{symbol::SymbolTable, value::Value};
///
/// let mut table = SymbolTable::new();
/// assert!(table.declare("x", Some(Value::Integer(1))));
/// assert!(!table.declare("x", None));
/// assert_eq!(table.get("x").unwrap().value, Some(Value::Integer(1)));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SymbolTable {
    symbols: Vec<Symbol>,
}

impl SymbolTable {
    #[must_use]
    pub const fn new() -> Self {
        Self { symbols: Vec::new() }
    }

    /// Adds a symbol. Returns `false` without changing anything if the name
    /// is already declared in this table.
    pub fn declare(&mut self, name: &str, value: Option<Value>) -> bool {
        if self.get(name).is_some() {
            return false;
        }
        self.symbols.push(Symbol { name: name.to_string(),
                                   value });
        true
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Symbol> {
        self.symbols.iter().find(|symbol| symbol.name == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Symbol> {
        self.symbols.iter_mut().find(|symbol| symbol.name == name)
    }

    /// Replaces the contents of this table with a snapshot of `source`.
    pub fn copy_from(&mut self, source: &Self) {
        self.symbols.clone_from(&source.symbols);
    }

    /// Overwrites the value of every symbol in this table that `source` also
    /// declares. Symbols only present in `source` are ignored.
    pub fn update_from(&mut self, source: &Self) {
        for symbol in &mut self.symbols {
            if let Some(newer) = source.get(&symbol.name) {
                symbol.value.clone_from(&newer.value);
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn clear(&mut self) {
        self.symbols.clear();
    }
}
