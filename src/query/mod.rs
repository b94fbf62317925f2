//! Query translation and execution.
//!
//! The query module is organized into:
//! - `statement` - SQL statement container, typed parameters, and dialect
//!   translation (placeholder substitution)
//! - `cursor` - the synchronous job-backed cursor

pub mod cursor;
pub mod statement;

// Re-export commonly used types
pub use cursor::{Cursor, CursorState};
pub use statement::{render, Parameter, Statement, StatementKind};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_exports() {
        // Compile-time check that key types are exported.
        let _: Option<StatementKind> = None;
        let _: Option<Parameter> = None;
        let _: Option<CursorState> = None;
    }
}
