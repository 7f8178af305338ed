//! The attribute stack's element type (§9 "Attribute records"): the
//! driver only needs to read and overwrite a span, so it is generic over
//! whatever concrete record `boreal-sem` wants to carry — "a single
//! struct of optional fields keeps the action code uniform" is the
//! consuming crate's concern, not the driver's.

use boreal_util::Span;

pub trait Attribute: Clone {
    fn span(&self) -> Span;
    fn with_span(self, span: Span) -> Self;
}
