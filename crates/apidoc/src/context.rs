//! Per-render linking state between structural tags and their children.
//!
//! Scopes live in an arena owned by [`DocumentContext`]. A structural record
//! keeps the [`ScopeId`] of its scope and the context keeps the ids of the
//! currently open sinks, so appends made through the context are what the
//! structural record sees when it is rendered.

use crate::grammar::TagKind;
use crate::record::{ParamRecord, ReturnsRecord};

/// Handle to a scope inside the [`DocumentContext`] that issued it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ScopeId(usize);

/// Params and return slot collected for one structural tag.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Scope {
    /// Attached `@param` records in source order.
    pub params: Vec<ParamRecord>,
    /// Return slot; present for methods only.
    pub returns: Option<ReturnsRecord>,
}

/// Linking state for one render pass.
#[derive(Debug, Default)]
pub struct DocumentContext {
    scopes: Vec<Scope>,
    open_params: Option<ScopeId>,
    open_returns: Option<ScopeId>,
}

impl DocumentContext {
    /// Create an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a fresh scope for a structural tag and make it the current sink.
    ///
    /// Methods get a return slot and become the open returns sink; events
    /// and actions leave the returns sink of an earlier method open.
    pub fn open_scope(&mut self, kind: TagKind) -> ScopeId {
        let id = ScopeId(self.scopes.len());
        let is_method = kind == TagKind::Method;
        self.scopes.push(Scope {
            params: Vec::new(),
            returns: is_method.then(ReturnsRecord::default),
        });
        self.open_params = Some(id);
        if is_method {
            self.open_returns = Some(id);
        }
        id
    }

    /// Params list of the most recently opened scope.
    pub fn open_params_sink(&mut self) -> Option<&mut Vec<ParamRecord>> {
        let id = self.open_params?;
        Some(&mut self.scopes[id.0].params)
    }

    /// Return slot of the most recently opened method.
    pub fn open_returns_sink(&mut self) -> Option<&mut ReturnsRecord> {
        let id = self.open_returns?;
        self.scopes[id.0].returns.as_mut()
    }

    /// Look up a scope.
    ///
    /// # Panics
    ///
    /// Panics if `id` was issued by a different context.
    #[must_use]
    pub fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.0]
    }
}
