//! Span macros for the R/V/E call sites named after the operation they wrap.
//! Each macro opens an `info_span` under the `memoryforge.*` namespace;
//! callers enter it with `.in_scope(|| ...)` or `let _guard = span.enter();`.

pub mod spans;

pub use spans::names;
