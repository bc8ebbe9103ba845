use crate::{
    error::InternalError,
    interpreter::{
        symbol::{Symbol, SymbolTable},
        value::Value,
    },
};

/// Handle to a scope in a [`ScopeTree`].
///
/// The generation changes every time a slot is reused, so a handle to a
/// destroyed scope never silently resolves to a newer one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId {
    index:      u32,
    generation: u32,
}

/// What kind of construct opened a scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    /// The root scope of a run.
    Global,
    /// A `{ ... }` statement block or an `if` branch.
    Block,
    /// One iteration of a `while` or `for` loop. `resume` is where
    /// `continue` seeks to.
    Loop { resume: usize },
    /// One iteration of a `do ... while` loop. `resume` is the position of
    /// the body's opening brace.
    DoWhile { resume: usize },
    /// Holds the variables declared in a `for` initializer.
    ForInit,
    /// The body of one procedure call.
    Procedure,
}

impl ScopeKind {
    /// The continue target of a loop scope.
    #[must_use]
    pub const fn resume(self) -> Option<usize> {
        match self {
            Self::Loop { resume } | Self::DoWhile { resume } => Some(resume),
            _ => None,
        }
    }
}

/// One lexical region.
///
/// A scope exclusively owns its symbol table and its children.
#[derive(Debug)]
pub struct Scope {
    /// The enclosing scope; `None` only for the global scope.
    pub parent:   Option<ScopeId>,
    /// Sub-scopes, in creation order.
    pub children: Vec<ScopeId>,
    /// Names declared directly in this scope.
    pub symbols:  SymbolTable,
    /// The construct that opened it.
    pub kind:     ScopeKind,
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    scope:      Option<Scope>,
}

/// The tree of live scopes, stored as an arena addressed by [`ScopeId`].
///
/// Every scope but the global one has a parent. Symbol lookup walks parent
/// links upwards only, so siblings never see each other's names.
///
/// # Example
/// ```
/// use retread::interpreter::{
///     scope::{ScopeKind, ScopeTree},
///     value::Value,
/// };
///
/// let mut scopes = ScopeTree::new();
/// let global = scopes.root();
/// scopes.declare(global, "x", Some(Value::Integer(1))).unwrap();
///
/// let block = scopes.create_child(global, ScopeKind::Block).unwrap();
/// scopes.declare(block, "x", Some(Value::Integer(2))).unwrap();
/// assert_eq!(scopes.lookup(block, "x").unwrap().unwrap().value, Some(Value::Integer(2)));
///
/// scopes.destroy(block).unwrap();
/// assert_eq!(scopes.lookup(global, "x").unwrap().unwrap().value, Some(Value::Integer(1)));
/// ```
#[derive(Debug)]
pub struct ScopeTree {
    slots: Vec<Slot>,
    free:  Vec<u32>,
    root:  ScopeId,
    live:  usize,
}

impl Default for ScopeTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeTree {
    /// Creates a tree containing only the global scope.
    #[must_use]
    pub fn new() -> Self {
        let global = Scope { parent:   None,
                             children: Vec::new(),
                             symbols:  SymbolTable::new(),
                             kind:     ScopeKind::Global, };
        Self { slots: vec![Slot { generation: 0,
                                  scope:      Some(global), }],
               free:  Vec::new(),
               root:  ScopeId { index:      0,
                                generation: 0, },
               live:  1, }
    }

    /// The global scope.
    #[must_use]
    pub const fn root(&self) -> ScopeId {
        self.root
    }

    /// Number of scopes currently alive, the global scope included.
    #[must_use]
    pub const fn live(&self) -> usize {
        self.live
    }

    /// Returns `true` if `id` refers to a live scope.
    #[must_use]
    pub fn contains(&self, id: ScopeId) -> bool {
        self.get(id).is_ok()
    }

    /// # Errors
    /// Returns [`InternalError::InvalidHandle`] for a destroyed scope.
    pub fn get(&self, id: ScopeId) -> Result<&Scope, InternalError> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.scope.as_ref())
            .ok_or(InternalError::InvalidHandle { what: "scope" })
    }

    /// # Errors
    /// Returns [`InternalError::InvalidHandle`] for a destroyed scope.
    pub fn get_mut(&mut self, id: ScopeId) -> Result<&mut Scope, InternalError> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.scope.as_mut())
            .ok_or(InternalError::InvalidHandle { what: "scope" })
    }

    /// Opens a new scope under `parent`.
    ///
    /// # Errors
    /// Returns [`InternalError::InvalidHandle`] if `parent` is not alive.
    pub fn create_child(&mut self, parent: ScopeId, kind: ScopeKind) -> Result<ScopeId, InternalError> {
        self.get(parent)?;

        let scope = Scope { parent: Some(parent),
                            children: Vec::new(),
                            symbols: SymbolTable::new(),
                            kind };
        let id = if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.scope = Some(scope);
            ScopeId { index,
                      generation: slot.generation }
        } else {
            let index = u32::try_from(self.slots.len()).map_err(|_| {
                            InternalError::IndexOutOfRange { what:  "scope arena",
                                                             index: self.slots.len(),
                                                             len:   u32::MAX as usize, }
                        })?;
            self.slots.push(Slot { generation: 0,
                                   scope:      Some(scope), });
            ScopeId { index,
                      generation: 0 }
        };

        self.get_mut(parent)?.children.push(id);
        self.live += 1;
        tracing::trace!(?id, ?parent, ?kind, "scope created");
        Ok(id)
    }

    /// Destroys `id` and everything below it.
    ///
    /// Descendants go first, deepest first, then the scope itself, so no
    /// table is freed while a child that could look through it still
    /// exists. The global scope cannot be destroyed; use
    /// [`ScopeTree::teardown`].
    ///
    /// # Errors
    /// Returns [`InternalError::InvalidHandle`] for a dead handle or the
    /// global scope.
    pub fn destroy(&mut self, id: ScopeId) -> Result<(), InternalError> {
        if id == self.root {
            return Err(InternalError::InvalidHandle { what: "global scope" });
        }
        let parent = self.get(id)?.parent;

        let mut order = vec![id];
        let mut next = 0;
        while let Some(&current) = order.get(next) {
            order.extend_from_slice(&self.get(current)?.children);
            next += 1;
        }
        for &scope in order.iter().rev() {
            self.release(scope);
        }

        if let Some(parent) = parent {
            self.get_mut(parent)?.children.retain(|&child| child != id);
        }
        tracing::trace!(?id, released = order.len(), "scope destroyed");
        Ok(())
    }

    /// Destroys every scope below the global one and clears its symbols.
    ///
    /// # Errors
    /// Propagates handle errors from [`ScopeTree::destroy`].
    pub fn teardown(&mut self) -> Result<(), InternalError> {
        while let Some(&child) = self.get(self.root)?.children.last() {
            self.destroy(child)?;
        }
        self.get_mut(self.root)?.symbols.clear();
        Ok(())
    }

    fn release(&mut self, id: ScopeId) {
        if let Some(slot) = self.slots.get_mut(id.index as usize)
           && slot.generation == id.generation
           && slot.scope.take().is_some()
        {
            slot.generation = slot.generation.wrapping_add(1);
            self.free.push(id.index);
            self.live -= 1;
        }
    }

    /// Declares `name` directly in `scope`.
    ///
    /// Returns `Ok(false)` if the name already exists in that scope's own
    /// table. Names in enclosing scopes do not count.
    ///
    /// # Errors
    /// Returns [`InternalError::InvalidHandle`] for a dead scope.
    pub fn declare(&mut self,
                   scope: ScopeId,
                   name: &str,
                   value: Option<Value>)
                   -> Result<bool, InternalError> {
        Ok(self.get_mut(scope)?.symbols.declare(name, value))
    }

    /// Finds the scope that declares `name`, starting at `scope` and walking
    /// up through the parents.
    ///
    /// # Errors
    /// Returns [`InternalError::InvalidHandle`] if the chain reaches a dead
    /// scope.
    pub fn resolve(&self, scope: ScopeId, name: &str) -> Result<Option<ScopeId>, InternalError> {
        let mut next = Some(scope);
        while let Some(id) = next {
            let scope = self.get(id)?;
            if scope.symbols.get(name).is_some() {
                return Ok(Some(id));
            }
            next = scope.parent;
        }
        Ok(None)
    }

    /// Resolves `name` from `scope` and returns the symbol.
    ///
    /// # Errors
    /// Same as [`ScopeTree::resolve`].
    pub fn lookup(&self, scope: ScopeId, name: &str) -> Result<Option<&Symbol>, InternalError> {
        match self.resolve(scope, name)? {
            Some(owner) => Ok(self.get(owner)?.symbols.get(name)),
            None => Ok(None),
        }
    }

    /// Resolves `name` from `scope` and returns the symbol for mutation.
    ///
    /// # Errors
    /// Same as [`ScopeTree::resolve`].
    pub fn lookup_mut(&mut self,
                      scope: ScopeId,
                      name: &str)
                      -> Result<Option<&mut Symbol>, InternalError> {
        match self.resolve(scope, name)? {
            Some(owner) => Ok(self.get_mut(owner)?.symbols.get_mut(name)),
            None => Ok(None),
        }
    }

    /// Replaces the symbols of `into` with a snapshot of those of `from`.
    ///
    /// # Errors
    /// Returns [`InternalError::InvalidHandle`] for a dead scope.
    pub fn copy_symbols(&mut self, from: ScopeId, into: ScopeId) -> Result<(), InternalError> {
        let source = self.get(from)?.symbols.clone();
        self.get_mut(into)?.symbols.copy_from(&source);
        Ok(())
    }

    /// Writes the values `from` holds for names declared in `into` back into
    /// `into`.
    ///
    /// # Errors
    /// Returns [`InternalError::InvalidHandle`] for a dead scope.
    pub fn write_back(&mut self, from: ScopeId, into: ScopeId) -> Result<(), InternalError> {
        let source = self.get(from)?.symbols.clone();
        self.get_mut(into)?.symbols.update_from(&source);
        Ok(())
    }
}
