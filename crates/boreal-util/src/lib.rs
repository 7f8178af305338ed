//! Shared infrastructure used by every stage of the Boreal analysis
//! pipeline: source spans, a diagnostic sink, typed index vectors, and the
//! error types their operations can fail with.

pub mod def_id;
pub mod diagnostic;
pub mod error;
pub mod index_vec;
pub mod span;

pub use def_id::DefId;
pub use diagnostic::{Diagnostic, DiagnosticCode, ErrorRecord, Handler, Level, Origin};
pub use index_vec::{Idx, IndexVec};
pub use span::{FileId, Span};
