//! The collaborator contract for expression cells.
//!
//! Data cells beginning with `{` or `[` are not decoded by the engine;
//! they are handed to an [`Evaluator`] supplied when the table is built.
//! The engine keeps the evaluator at arm's length: it publishes the row's
//! earlier data column values as named bindings, asks for one evaluation
//! per cell, and caches the result by `(row, col)`.

use crate::datatype::Value;
use crate::error::Result;

/// Side-band host evaluating expression cells.
pub trait Evaluator {
    /// Exposes a named value to subsequent evaluations. Called in column
    /// order for the dependencies of an expression cell, and again for
    /// each freshly computed result.
    fn publish(&mut self, key: &str, value: &Value) -> Result<()>;

    /// Evaluates the full text of an expression cell (braces included) and
    /// returns a NUMBER or STRING value. Returning NIL, or an error, fails
    /// the retrieval with an evaluator error.
    fn evaluate(&mut self, expr: &str) -> Result<Value>;
}
