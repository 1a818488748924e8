//! Tablematch – a decision table query engine.
//!
//! A decision table is a whitespace separated grid with an `=` column
//! splitting every row: the columns to the left carry *criteria*, the
//! columns to the right carry *data*. The header row names each criterion
//! as `<key>.<op>` (match, equality or an ordering against a fixed point
//! number) and each data column with a plain key. A query is a set of
//! [`datatype::KeyValue`] pairs; the engine scores every data row by
//! summing the distance of each criterion to its query pair and returns
//! the nearest row, pruning rows as soon as they fall behind.
//!
//! ## Modules
//! * [`datatype`] – [`datatype::Number`] (fixed point decimal with ±∞
//!   sentinels), [`datatype::Value`] and [`datatype::KeyValue`].
//! * [`criteria`] – criterion parsing, binding and the distance function.
//! * [`pattern`] – the case-insensitive shell glob behind `MH` criteria.
//! * [`table`] – the grid parser (grammar in `table.pest`) and cell store.
//! * [`engine`] – `query`, `retrieve` and `verify` on a parsed table.
//! * [`evaluate`] – the [`evaluate::Evaluator`] trait for expression cells.
//! * [`error`] – the crate error type and `Result` alias.
//!
//! ## Quick Start
//! ```
//! use tablematch::datatype::KeyValue;
//! use tablematch::engine::QueryOptions;
//! use tablematch::table::Table;
//!
//! let mut table = Table::new();
//! table
//!     .parse("A.EQ B.LE = X\n1 10 = hello\n1 20 = world\n")
//!     .unwrap();
//! let mut kvs = vec![
//!     KeyValue::number("A", "1".parse().unwrap()),
//!     KeyValue::number("B", "15".parse().unwrap()),
//!     KeyValue::nil("X"),
//! ];
//! let row = table.query(&kvs, QueryOptions::default()).unwrap();
//! assert_eq!(row, 2);
//! table.retrieve(row, &mut kvs, QueryOptions::default()).unwrap();
//! assert_eq!(kvs[2].to_string(), "X:world");
//! ```
//!
//! ## Evaluation
//! Data cells beginning with `{` or `[` are expressions for a side-band
//! host implementing [`evaluate::Evaluator`]; the engine publishes the
//! row's earlier data values as named bindings and caches each result, so
//! a cell is evaluated at most once per parse.
//!
//! Tables are single-threaded: `retrieve` fills that cache behind `&self`,
//! so share a table across threads only with external synchronisation.

pub mod criteria;
pub mod datatype;
pub mod engine;
pub mod error;
pub mod evaluate;
pub mod pattern;
pub mod table;
