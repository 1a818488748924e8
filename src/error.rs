
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TablematchError {
    #[error("`{0}` not NUMBER")]
    NumberFormat(String),
    #[error("`{0}` invalid Criteria format")]
    CriteriaFormat(String),
    #[error("Criteria [{criteria}] requires {expected}")]
    ValueType {
        criteria: String,
        expected: &'static str,
    },
    #[error("Table format error: {0}")]
    TableFormat(String),
    #[error("Table data error: {0}")]
    TableData(String),
    #[error("too few keys: no query value for criterion `{0}`")]
    TooFewKeys(String),
    #[error("too many keys: `{0}` matches no criterion or data column")]
    TooManyKeys(String),
    #[error("Evaluator error: {0}")]
    Evaluator(String),
    #[error("Table row:{row}, col:{col}\n{source}")]
    At {
        row: usize,
        col: usize,
        #[source]
        source: Box<TablematchError>,
    },
}

pub type Result<T> = std::result::Result<T, TablematchError>;

impl TablematchError {
    /// Annotates an error with the table cell it originated from.
    pub(crate) fn at(self, row: usize, col: usize) -> Self {
        Self::At {
            row,
            col,
            source: Box::new(self),
        }
    }
}
