//! Nearest-row queries, retrieval and verification.
//!
//! A query walks every data row and sums, per criterion column, the
//! distance between the row's bound reference value and the query pair
//! chosen for that criterion. The row with the smallest sum wins; ties go
//! to the earliest row. Two admission flags relax the match between the
//! query key set and the table's columns: `subset` lets the query omit
//! criteria (those columns stop constraining), `superset` lets it carry
//! keys no column knows about. Scanning prunes a row as soon as its
//! partial sum reaches the best sum so far, and stops outright when a row
//! at distance zero is found.

use tracing::debug;

use crate::criteria::{Criteria, Distance};
use crate::datatype::{KeyValue, Number, Value};
use crate::error::{Result, TablematchError};
use crate::table::Table;

/// Admission policy for the query key set relative to the table columns.
/// The default (both flags off) demands exactly the criterion keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueryOptions {
    /// The query may omit criteria keys; unmatched criterion columns
    /// become no-constraint columns.
    pub subset: bool,
    /// The query may carry keys that match no column; they are ignored.
    pub superset: bool,
}

impl QueryOptions {
    pub const EXACTLY: QueryOptions = QueryOptions {
        subset: false,
        superset: false,
    };
    pub const SUBSET: QueryOptions = QueryOptions {
        subset: true,
        superset: false,
    };
    pub const SUPERSET: QueryOptions = QueryOptions {
        subset: false,
        superset: true,
    };
}

/// Which query pair a criterion column settled on.
#[derive(Clone, Copy)]
enum Choice {
    Unresolved,
    Kv(usize),
    NoMatch,
}

struct QueryInfo<'a> {
    criteria: Criteria<'a>,
    choice: Choice,
}

impl Table {
    /// Finds the data row minimising the summed criterion distance for
    /// `kvs`. Returns the 1-based row index, or `0` when no data row
    /// matches (including the header-only table).
    pub fn query(&self, kvs: &[KeyValue], options: QueryOptions) -> Result<usize> {
        if self.rows() <= 1 {
            return Ok(0);
        }
        let mut info: Vec<QueryInfo> = Vec::with_capacity(self.criteria());
        for j in 0..self.criteria() {
            info.push(QueryInfo {
                criteria: Criteria::new(self.cell(0, j)).map_err(|e| e.at(0, j))?,
                choice: Choice::Unresolved,
            });
        }
        let mut chosen = vec![0usize; kvs.len()];
        let mut superset = options.superset;
        let mut min_d = f64::INFINITY;
        let mut min_i = 0usize;
        let mut matched = 0usize;

        'rows: for i in 1..self.rows() {
            let mut sum_d = 0.0f64;
            for j in 0..self.criteria() {
                let QueryInfo { criteria, choice } = &mut info[j];
                if matches!(choice, Choice::NoMatch) {
                    continue;
                }
                criteria.bind(self.cell(i, j)).map_err(|e| e.at(i, j))?;
                match *choice {
                    Choice::Kv(k) => {
                        if let Distance::Metric(d) =
                            criteria.distance(&kvs[k]).map_err(|e| e.at(i, j))?
                        {
                            sum_d += d;
                        }
                        if sum_d >= min_d {
                            continue 'rows;
                        }
                    }
                    Choice::Unresolved => {
                        let mut found = false;
                        for (k, kv) in kvs.iter().enumerate() {
                            match criteria.distance(kv).map_err(|e| e.at(i, j))? {
                                Distance::Inapplicable => continue,
                                Distance::Metric(d) => {
                                    *choice = Choice::Kv(k);
                                    chosen[k] += 1;
                                    matched += 1;
                                    sum_d += d;
                                    found = true;
                                    break;
                                }
                            }
                        }
                        if !found {
                            *choice = Choice::NoMatch;
                            if !options.subset {
                                return Err(TablematchError::TooFewKeys(
                                    criteria.key().to_owned(),
                                ));
                            }
                        } else if sum_d >= min_d {
                            continue 'rows;
                        }
                    }
                    Choice::NoMatch => {}
                }
            }
            // first fully-scored row: every query pair must have been taken
            // by a criterion or name a data column
            if !superset {
                for (k, kv) in kvs.iter().enumerate() {
                    if chosen[k] == 0 && self.data_col(&kv.key).is_none() {
                        return Err(TablematchError::TooManyKeys(kv.key.clone()));
                    }
                }
                superset = true;
            }
            if matched == 0 {
                break;
            }
            if sum_d < min_d {
                min_d = sum_d;
                min_i = i;
                if min_d == 0.0 {
                    break;
                }
            }
        }
        debug!(row = min_i, "query complete");
        Ok(min_i)
    }

    /// Fills query pairs from the data columns of `row`: a pair keyed like
    /// a criterion column is left alone, a pair naming a data column
    /// header receives the decoded cell, and any other pair is rejected
    /// unless `superset` admits it.
    pub fn retrieve(&self, row: usize, kvs: &mut [KeyValue], options: QueryOptions) -> Result<()> {
        let headers = self.parsed_criteria()?;
        for kv in kvs.iter_mut() {
            if headers.iter().any(|c| c.matches_key(&kv.key)) {
                continue;
            }
            match self.data_col(&kv.key) {
                Some(j) => {
                    kv.value = self.resolve_cell(row, j, &kv.value)?;
                }
                None if options.superset => {}
                None => return Err(TablematchError::TooManyKeys(kv.key.clone())),
            }
        }
        Ok(())
    }

    /// Mirrors [`retrieve`](Self::retrieve) but compares instead of
    /// writing: NUMBER pairs must equal the decoded cell, STRING pairs
    /// must equal it verbatim. NIL (and empty STRING) pairs carry nothing
    /// to cross-check and are skipped.
    pub fn verify(&self, row: usize, kvs: &[KeyValue], options: QueryOptions) -> Result<()> {
        let headers = self.parsed_criteria()?;
        for kv in kvs {
            if headers.iter().any(|c| c.matches_key(&kv.key)) {
                continue;
            }
            match self.data_col(&kv.key) {
                Some(j) => {
                    match &kv.value {
                        Value::Nil => continue,
                        Value::Text(s) if s.is_empty() => continue,
                        _ => {}
                    }
                    let value = self.resolve_cell(row, j, &kv.value)?;
                    let agrees = match (&kv.value, &value) {
                        (Value::Number(a), Value::Number(b)) => a == b,
                        (Value::Text(a), Value::Text(b)) => a == b,
                        _ => false,
                    };
                    if !agrees {
                        return Err(TablematchError::TableData(format!(
                            "`{kv}` disagrees with cell `{}`",
                            self.cell(row, j)
                        ))
                        .at(row, j));
                    }
                }
                None if options.superset => {}
                None => return Err(TablematchError::TooManyKeys(kv.key.clone())),
            }
        }
        Ok(())
    }

    /// Decodes `cell(row, col)`. Literals decode according to the hinting
    /// value: NUMBER begets NUMBER, anything else (NIL included) begets
    /// STRING. Expression cells go to the evaluator, after the row's
    /// earlier data columns have been resolved and published as bindings
    /// (walking right to left, stopping at the first literal); results are
    /// cached so the evaluator runs at most once per cell.
    fn resolve_cell(&self, row: usize, col: usize, hint: &Value) -> Result<Value> {
        let text = self.cell(row, col);
        if !is_expression(text) {
            return decode_literal(text, hint).map_err(|e| e.at(row, col));
        }
        if let Some(value) = self.cache.borrow().get(&(row, col)) {
            return Ok(value.clone());
        }
        for k in (self.criteria()..col).rev() {
            let literal = !is_expression(self.cell(row, k));
            let value = self.resolve_cell(row, k, &Value::Nil)?;
            self.publish_binding(self.cell(0, k), &value)?;
            if literal {
                break;
            }
        }
        let value = self.evaluate_cell(text).map_err(|e| e.at(row, col))?;
        self.publish_binding(self.cell(0, col), &value)?;
        self.cache.borrow_mut().insert((row, col), value.clone());
        Ok(value)
    }

    fn evaluate_cell(&self, expr: &str) -> Result<Value> {
        let evaluator = match &self.evaluator {
            Some(evaluator) => evaluator,
            None => {
                return Err(TablematchError::Evaluator(
                    "no evaluator attached".to_owned(),
                ))
            }
        };
        let value = evaluator.borrow_mut().evaluate(expr)?;
        if value.is_nil() {
            return Err(TablematchError::Evaluator(format!("`{expr}` produced NIL")));
        }
        Ok(value)
    }

    fn publish_binding(&self, key: &str, value: &Value) -> Result<()> {
        if let Some(evaluator) = &self.evaluator {
            evaluator.borrow_mut().publish(key, value)?;
        }
        Ok(())
    }

    fn parsed_criteria(&self) -> Result<Vec<Criteria<'_>>> {
        (0..self.criteria())
            .map(|j| Criteria::new(self.cell(0, j)).map_err(|e| e.at(0, j)))
            .collect()
    }

    fn data_col(&self, key: &str) -> Option<usize> {
        (self.criteria()..self.cols()).find(|&j| self.cell(0, j) == key)
    }
}

fn is_expression(text: &str) -> bool {
    text.starts_with('{') || text.starts_with('[')
}

fn decode_literal(text: &str, hint: &Value) -> Result<Value> {
    match hint {
        Value::Number(_) => match text.parse::<Number>() {
            Ok(n) => Ok(Value::Number(n)),
            Err(e) => Err(TablematchError::TableData(format!("cell `{text}`: {e}"))),
        },
        Value::Nil | Value::Text(_) => Ok(Value::Text(text.to_owned())),
    }
}
