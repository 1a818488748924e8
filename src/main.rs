//! Command line host: loads a decision table and answers stdin queries.
//!
//! Each stdin line is one query of whitespace separated `key[:value]`
//! tokens: a bare key queries as NIL (an output slot), a value is taken as
//! a NUMBER when it parses as one and as a STRING otherwise. A line is
//! answered by `query`, then `retrieve` (filling the NIL slots from the
//! matched row) and `verify` (cross-checking the inputs). The process
//! exits 0 on success, with the first failing line number when a query
//! fails, 65534 when the table file cannot be read and 65535 on an
//! internal error.

use std::env;
use std::fs;
use std::io::{self, BufRead};

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use tablematch::datatype::{KeyValue, Number};
use tablematch::engine::QueryOptions;
use tablematch::error::Result;
use tablematch::table::Table;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();
    std::process::exit(run());
}

fn run() -> i32 {
    let mut args = env::args();
    let program = args.next().unwrap_or_else(|| "tablematch".to_owned());
    let path = match args.next() {
        Some(path) => path,
        None => {
            println!("Usage: {program} </path/to/table>");
            return 0;
        }
    };
    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) => {
            println!("Failed to open file [{path}]: {e}");
            return 65534;
        }
    };
    let mut table = Table::new();
    if let Err(e) = table.parse(content) {
        error!(%e, "table rejected");
        println!("{e}");
        return 65535;
    }
    info!(
        rows = table.rows(),
        cols = table.cols(),
        criteria = table.criteria(),
        "table loaded"
    );

    let mut first_failure: i32 = 0;
    let mut fail = |lineno: i32| {
        if first_failure == 0 {
            first_failure = lineno;
        }
    };
    for (index, line) in io::stdin().lock().lines().enumerate() {
        let lineno = index as i32 + 1;
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                println!("{e}");
                return 65535;
            }
        };
        let mut kvs: Vec<KeyValue> = line.split_whitespace().map(keyvalue).collect();
        if kvs.is_empty() {
            continue;
        }
        match answer(&table, &mut kvs) {
            Ok(0) => {
                println!("{}: no matching row", line.trim());
                fail(lineno);
            }
            Ok(row) => {
                let rendered: Vec<String> = kvs.iter().map(KeyValue::to_string).collect();
                println!("row {row}: {}", rendered.join(" "));
            }
            Err(e) => {
                println!("{}: {e}", line.trim());
                fail(lineno);
            }
        }
    }
    first_failure
}

/// `key[:value]`; the value is a NUMBER when it parses as one.
fn keyvalue(token: &str) -> KeyValue {
    match token.split_once(':') {
        None => KeyValue::nil(token),
        Some((key, value)) => match value.parse::<Number>() {
            Ok(n) => KeyValue::number(key, n),
            Err(_) => KeyValue::text(key, value),
        },
    }
}

fn answer(table: &Table, kvs: &mut [KeyValue]) -> Result<usize> {
    let row = table.query(kvs, QueryOptions::default())?;
    if row > 0 {
        table.retrieve(row, kvs, QueryOptions::default())?;
        table.verify(row, kvs, QueryOptions::default())?;
    }
    Ok(row)
}
