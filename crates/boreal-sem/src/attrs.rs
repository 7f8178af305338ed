//! The attribute-stack record (spec's Data Model "Attributes"): every
//! reduction reads and writes one of these. A single struct of mostly-unused
//! fields is deliberate (spec 9 "Attribute records"): the 100-odd actions
//! share far more fields than they'd need a bespoke variant each.

use crate::types::{ParamSig, TypeTag};
use boreal_parse::Attribute;
use boreal_util::{DefId, Span};

/// A single identifier occurrence carried on the attribute stack: enough
/// to re-diagnose or re-declare it without re-touching the lexer.
#[derive(Clone, Debug)]
pub struct IdentRef {
    pub symbol: Option<DefId>,
    pub span: Span,
    pub text: String,
}

#[derive(Clone, Debug, Default)]
pub struct Attrs {
    pub span: Span,
    pub ty: TypeTag,
    /// The terminal spelling this attribute's token shifted as (e.g.
    /// `"identifier"`, `"integer_literal"`, `"mod"`, `"**"`), or `None`
    /// for an attribute synthesised by a reduction. Grammar alternatives
    /// that share an LHS and arity (`TypeName`'s five keywords, `RelOp`'s
    /// six operators, most of `Factor`) are told apart by matching on
    /// this rather than hardcoding a production id.
    pub term: Option<&'static str>,
    /// The resolved (or freshly defined) symbol behind an identifier
    /// token, once one exists.
    pub symbol: Option<DefId>,
    pub int_value: Option<i32>,
    /// Raw lexeme, reused for keyword/operator dispatch (e.g. telling
    /// `TypeName -> integer` from `TypeName -> boolean` apart) and for
    /// string-literal contents.
    pub text: String,
    /// Built up by `ParamList`/`Param`, consumed by a header action once
    /// the parameter list closes.
    pub params: Vec<ParamSig>,
    /// Built up by `ArgList`/`ExprList`, consumed by call-arity/`in`/
    /// `max`/`min` checking.
    pub list: Vec<TypeTag>,
    /// Declared names accumulated by `IdentList` for a `VarDecl`.
    pub idents: Vec<IdentRef>,
    /// Parallel to `list`: which argument, if any, was literally a bare
    /// identifier (vs. a computed expression) — `read`'s arguments must
    /// all be identifiers, which `list`'s types alone can't tell apart.
    pub arg_idents: Vec<Option<IdentRef>>,
    /// Set when this expression synthesises down to exactly one bare
    /// identifier reference, so `ArgListNonEmpty` can recover it for the
    /// `arg_idents` check above without a dedicated grammar rule.
    pub as_ident: Option<IdentRef>,
    /// The `return` propagation triple: `(type, site)` of the most recent
    /// `return` seen in this subtree, carried upward through compound
    /// statements (spec 4.4(8) and "Propagation conventions").
    pub ret: Option<(TypeTag, Span)>,
    /// The `exit` propagation count and the site of its first occurrence,
    /// summed across a compound statement's children (spec 4.4(8)/(10)).
    pub exit_count: u32,
    pub exit_site: Option<Span>,
}

impl Attribute for Attrs {
    fn span(&self) -> Span {
        self.span
    }

    fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }
}
