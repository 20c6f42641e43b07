//! Symbol table: labels, equates, and externally defined symbols.
//!
//! Labels resolve to their program-counter address as pass 1 reaches them.
//! Equates may reference symbols that are not defined yet; such equates are
//! stored *deferred* and resolved to a fixpoint at the start of pass 2,
//! before fixups are applied.

use alloc::collections::BTreeMap;
use alloc::string::String;
#[allow(unused_imports)]
use alloc::vec;
use alloc::vec::Vec;

use crate::error::{AsmError, Span};
use crate::ir::{EvalOutcome, Expr};

/// What kind of definition produced a symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SymbolKind {
    /// `name:` — address of the next emitted byte.
    Label,
    /// `name .EQ expr` / `name = expr`.
    Equate,
    /// Pre-defined by the caller before assembly.
    External,
}

/// A symbol's value.
#[derive(Debug, Clone, PartialEq)]
pub enum SymbolValue {
    /// Fully resolved.
    Resolved(i32),
    /// An equate whose expression still references undefined symbols.
    Deferred(Expr),
}

/// One symbol-table entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
    /// The definition kind.
    pub kind: SymbolKind,
    /// Resolved value or deferred expression.
    pub value: SymbolValue,
    /// Source location of the definition.
    pub span: Span,
}

/// The symbol table.  Names are case-sensitive.
#[derive(Debug, Default)]
pub struct SymbolTable {
    symbols: BTreeMap<String, Symbol>,
}

impl SymbolTable {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Define a symbol with a resolved value.
    ///
    /// # Errors
    ///
    /// Returns [`AsmError::DuplicateSymbol`] if the name is already defined.
    pub fn define(
        &mut self,
        name: &str,
        kind: SymbolKind,
        value: i32,
        span: Span,
    ) -> Result<(), AsmError> {
        self.insert(
            name,
            Symbol {
                kind,
                value: SymbolValue::Resolved(value),
                span,
            },
        )
    }

    /// Define an equate whose expression could not be evaluated yet.
    ///
    /// # Errors
    ///
    /// Returns [`AsmError::DuplicateSymbol`] if the name is already defined.
    pub fn define_deferred(&mut self, name: &str, expr: Expr, span: Span) -> Result<(), AsmError> {
        self.insert(
            name,
            Symbol {
                kind: SymbolKind::Equate,
                value: SymbolValue::Deferred(expr),
                span,
            },
        )
    }

    fn insert(&mut self, name: &str, symbol: Symbol) -> Result<(), AsmError> {
        if let Some(existing) = self.symbols.get(name) {
            return Err(AsmError::DuplicateSymbol {
                name: String::from(name),
                span: symbol.span,
                first_span: existing.span,
            });
        }
        self.symbols.insert(String::from(name), symbol);
        Ok(())
    }

    /// Look up a symbol's resolved value.  Deferred equates and undefined
    /// names both return `None`.
    #[must_use]
    pub fn resolved(&self, name: &str) -> Option<i32> {
        match self.symbols.get(name) {
            Some(Symbol {
                value: SymbolValue::Resolved(v),
                ..
            }) => Some(*v),
            _ => None,
        }
    }

    /// Look up a symbol entry.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Symbol> {
        self.symbols.get(name)
    }

    /// Whether the name is defined at all (resolved or deferred).
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.symbols.contains_key(name)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Whether the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Resolve deferred equates to a fixpoint.
    ///
    /// Called at the start of pass 2, when every label has its final
    /// address.  Equates may reference each other in any order, so the
    /// table is swept repeatedly until a sweep resolves nothing.  Any
    /// survivor references a genuinely undefined symbol (or participates in
    /// a definition cycle) and is reported as [`AsmError::UnresolvedSymbol`].
    pub fn resolve_deferred(&mut self) -> Vec<AsmError> {
        loop {
            let mut progressed = false;
            let deferred: Vec<String> = self
                .symbols
                .iter()
                .filter(|(_, s)| matches!(s.value, SymbolValue::Deferred(_)))
                .map(|(name, _)| name.clone())
                .collect();
            if deferred.is_empty() {
                return Vec::new();
            }

            for name in &deferred {
                let expr = match &self.symbols[name].value {
                    SymbolValue::Deferred(expr) => expr.clone(),
                    SymbolValue::Resolved(_) => continue,
                };
                let outcome = expr.eval(&|n| self.resolved(n));
                if let EvalOutcome::Value(v) = outcome {
                    if let Some(sym) = self.symbols.get_mut(name) {
                        sym.value = SymbolValue::Resolved(v);
                        progressed = true;
                    }
                }
            }

            if !progressed {
                // Report each stuck equate against the first name it misses.
                return deferred
                    .iter()
                    .filter_map(|name| {
                        let sym = &self.symbols[name];
                        let SymbolValue::Deferred(expr) = &sym.value else {
                            return None;
                        };
                        let missing = match expr.eval(&|n| self.resolved(n)) {
                            EvalOutcome::Pending(names) => names
                                .first()
                                .cloned()
                                .unwrap_or_else(|| name.clone()),
                            _ => name.clone(),
                        };
                        Some(AsmError::UnresolvedSymbol {
                            name: missing,
                            span: sym.span,
                        })
                    })
                    .collect();
            }
        }
    }
}
