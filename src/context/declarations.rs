/*!
The name -> declaration symbol table consulted by `declare-sort`/`declare-fun`/
`define-fun` and retracted from by the [AssertionStack](crate::assertion_stack)
(spec §6, §4.4).
*/

use crate::structures::sort::Sort;
use crate::structures::term::TermId;

use std::collections::HashMap;
use std::rc::Rc;

/// What a declared name denotes.
#[derive(Clone, Debug)]
pub enum Declaration {
    /// A sort constructor, introduced by `declare-sort`, of the given arity.
    Sort { arity: u32 },

    /// A sort macro, introduced by `define-sort`.
    SortMacro { arity: u32, body: Sort },

    /// An uninterpreted constant/function, introduced by `declare-fun`.
    Term {
        params: Vec<Sort>,
        result: Sort,
    },

    /// A macro-expanded definition, introduced by `define-fun`: parameter sorts,
    /// result sort, and the (already-internalized) body with parameters bound as
    /// uninterpreted placeholders substituted at each use site by the internalizer.
    Macro {
        params: Vec<(Rc<str>, Sort)>,
        result: Sort,
        body: TermId,
    },
}

impl Declaration {
    pub fn is_term_like(&self) -> bool {
        matches!(self, Declaration::Term { .. } | Declaration::Macro { .. })
    }

    pub fn is_sort_like(&self) -> bool {
        matches!(self, Declaration::Sort { .. } | Declaration::SortMacro { .. })
    }
}

/// The live name -> declaration table. Retraction is driven externally by
/// [AssertionStack::pop](crate::assertion_stack::AssertionStack::pop)'s
/// [PopOutcome](crate::assertion_stack::PopOutcome): this table just removes
/// whatever names it's told to.
#[derive(Default)]
pub struct DeclarationTable {
    terms: HashMap<Rc<str>, Declaration>,
    sorts: HashMap<Rc<str>, Declaration>,
}

impl DeclarationTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn term(&self, name: &str) -> Option<&Declaration> {
        self.terms.get(name)
    }

    pub fn sort(&self, name: &str) -> Option<&Declaration> {
        self.sorts.get(name)
    }

    pub fn term_is_declared(&self, name: &str) -> bool {
        self.terms.contains_key(name)
    }

    pub fn sort_is_declared(&self, name: &str) -> bool {
        self.sorts.contains_key(name)
    }

    pub fn insert_term(&mut self, name: Rc<str>, decl: Declaration) {
        self.terms.insert(name, decl);
    }

    pub fn insert_sort(&mut self, name: Rc<str>, decl: Declaration) {
        self.sorts.insert(name, decl);
    }

    pub fn retract_terms(&mut self, names: &[Rc<str>]) {
        for name in names {
            self.terms.remove(name.as_ref());
        }
    }

    pub fn retract_sorts(&mut self, names: &[Rc<str>]) {
        for name in names {
            self.sorts.remove(name.as_ref());
        }
    }

    /// Declared term names paired with their declarations, for `get-model`'s sweep
    /// over zero-arity constants (spec §6, "full model").
    pub fn term_entries(&self) -> impl Iterator<Item = (&Rc<str>, &Declaration)> {
        self.terms.iter()
    }
}
