use std::fmt;

use crate::datatype::{KeyValue, Number, Value};
use crate::error::{Result, TablematchError};
use crate::pattern;

/// Comparison operator named by the last two characters of a criterion
/// column header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Mh,
    Eq,
    Lt,
    Le,
    Gt,
    Ge,
}

impl Op {
    const ALL: [(Op, &'static str); 6] = [
        (Op::Mh, "MH"),
        (Op::Eq, "EQ"),
        (Op::Lt, "LT"),
        (Op::Le, "LE"),
        (Op::Gt, "GT"),
        (Op::Ge, "GE"),
    ];

    pub fn code(self) -> &'static str {
        match self {
            Op::Mh => "MH",
            Op::Eq => "EQ",
            Op::Lt => "LT",
            Op::Le => "LE",
            Op::Gt => "GT",
            Op::Ge => "GE",
        }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Outcome of a distance computation. Criteria whose key does not apply to
/// the query key report `Inapplicable`; sign is never overloaded to carry
/// errors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Distance {
    Inapplicable,
    Metric(f64),
}

/// A parsed criterion: the full header key, its operator and the reference
/// value currently bound (one table row at a time during a query). Borrows
/// from the table text and never outlives the query.
#[derive(Debug, Clone)]
pub struct Criteria<'a> {
    key: &'a str,
    op: Op,
    bound: Bound<'a>,
}

#[derive(Debug, Clone)]
enum Bound<'a> {
    Pattern(&'a str),
    Limit(Number),
}

impl<'a> Criteria<'a> {
    /// Parses a header of the form `<logical-key><sep><OP>`. The header
    /// must be at least four characters and end in a known operator code;
    /// the separator may be any single character.
    pub fn new(key: &'a str) -> Result<Self> {
        if key.len() >= 4 {
            for (op, code) in Op::ALL {
                if key.ends_with(code) {
                    let bound = match op {
                        Op::Mh => Bound::Pattern(""),
                        _ => Bound::Limit(Number::ZERO),
                    };
                    return Ok(Self { key, op, bound });
                }
            }
        }
        Err(TablematchError::CriteriaFormat(key.to_owned()))
    }

    /// Parses the header and binds a reference value in one step.
    pub fn with_value(key: &'a str, value: &'a str) -> Result<Self> {
        let mut criteria = Self::new(key)?;
        criteria.bind(value)?;
        Ok(criteria)
    }

    pub fn key(&self) -> &'a str {
        self.key
    }

    pub fn op(&self) -> Op {
        self.op
    }

    /// Binds the reference value for one table row: verbatim (and
    /// non-empty) for MH, parsed as a [`Number`] for the numeric operators.
    pub fn bind(&mut self, value: &'a str) -> Result<()> {
        match self.op {
            Op::Mh => {
                if value.is_empty() {
                    return Err(self.requires("non-NIL"));
                }
                self.bound = Bound::Pattern(value);
            }
            _ => {
                let limit: Number = value.parse().map_err(|_| self.requires("NUMBER"))?;
                self.bound = Bound::Limit(limit);
            }
        }
        Ok(())
    }

    /// Binds an already parsed number; forbidden for MH.
    pub fn bind_number(&mut self, value: Number) -> Result<()> {
        if self.op == Op::Mh {
            return Err(self.requires("STRING"));
        }
        self.bound = Bound::Limit(value);
        Ok(())
    }

    /// The key match rule: the query key and the criterion key run equal
    /// for a common prefix, after which the query key is exhausted and the
    /// criterion key has exactly its separator and operator code left.
    pub fn matches_key(&self, key: &str) -> bool {
        let ck = self.key.as_bytes();
        let qk = key.as_bytes();
        let mut i = 0;
        while i < ck.len() && i < qk.len() && ck[i] == qk[i] {
            i += 1;
        }
        i == qk.len() && ck.len() - i == 3
    }

    /// Distance from the bound reference to a query pair, `Inapplicable`
    /// when the keys do not line up. The query value goes through the same
    /// coercions as [`bind`](Self::bind): numeric operators accept NUMBER
    /// or a STRING that parses as one, MH accepts a non-empty STRING;
    /// anything else is a value type error.
    pub fn distance(&self, q: &KeyValue) -> Result<Distance> {
        if !self.matches_key(&q.key) {
            return Ok(Distance::Inapplicable);
        }
        let d = match &self.bound {
            Bound::Pattern(reference) => {
                let text = match &q.value {
                    Value::Text(s) if !s.is_empty() => s,
                    Value::Text(_) | Value::Nil => return Err(self.requires("non-NIL")),
                    Value::Number(_) => return Err(self.requires("STRING")),
                };
                if pattern::matches(reference, text) {
                    0.0
                } else {
                    f64::INFINITY
                }
            }
            Bound::Limit(reference) => {
                let qn = match &q.value {
                    Value::Number(n) => *n,
                    Value::Text(s) => s.parse().map_err(|_| self.requires("NUMBER"))?,
                    Value::Nil => return Err(self.requires("NUMBER")),
                };
                // widen the raw integers so the subtraction cannot wrap
                let gap = |a: Number, b: Number| a.raw() as f64 - b.raw() as f64;
                match self.op {
                    Op::Eq if qn == *reference => 0.0,
                    Op::Lt if qn < *reference => gap(*reference, qn),
                    Op::Le if qn <= *reference => gap(*reference, qn),
                    Op::Gt if qn > *reference => gap(qn, *reference),
                    Op::Ge if qn >= *reference => gap(qn, *reference),
                    _ => f64::INFINITY,
                }
            }
        };
        Ok(Distance::Metric(d))
    }

    fn requires(&self, expected: &'static str) -> TablematchError {
        TablematchError::ValueType {
            criteria: self.key.to_owned(),
            expected,
        }
    }
}
