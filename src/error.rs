use std::backtrace::Backtrace;
pub type Result<T, E = Error> = core::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum SolverError {
    #[error("no categories defined")]
    NoCategories,
    #[error("no strict category defined")]
    NoStrictCategories,
    #[error("strict categories must share one size, found {0} and {1}")]
    MismatchedCategorySize(usize, usize),
    #[error("great category `{name}` holds {found} items but needs at least {needed}")]
    GreatCategoryTooSmall {
        name: String,
        found: usize,
        needed: usize,
    },
    #[error("{0} positions exceed the supported maximum of 64")]
    TooManyPositions(usize),
    #[error("duplicate category `{0}`")]
    DuplicateCategory(String),
    #[error("duplicate item `{item}` in category `{category}`")]
    DuplicateItem { category: String, item: String },
    #[error("unknown identifier `{symbol}` at [{line}, {column}]")]
    UnknownIdentifier {
        symbol: String,
        line: u32,
        column: u32,
    },
    #[error("unknown category `{name}` at [{line}, {column}]")]
    UnknownCategory {
        name: String,
        line: u32,
        column: u32,
    },
    #[error("set membership requires arithmetic members at [{line}, {column}]")]
    SetRequiresArithmetic { line: u32, column: u32 },
    #[error("positional clues take two identifiers at [{line}, {column}]")]
    InvalidPositionalOperand { line: u32, column: u32 },
    #[error("{message} at [{line}, {column}]")]
    Parse {
        message: String,
        line: u32,
        column: u32,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Inner: {inner}\n{backtrace}")]
    Inner {
        inner: Box<SolverError>,
        backtrace: Box<Backtrace>,
    },
}

impl From<SolverError> for Error {
    fn from(inner: SolverError) -> Self {
        Error::Inner {
            inner: Box::new(inner),
            backtrace: Box::new(std::backtrace::Backtrace::capture()),
        }
    }
}

impl Error {
    /// The domain failure wrapped by this error.
    pub fn inner(&self) -> &SolverError {
        match self {
            Error::Inner { inner, .. } => inner,
        }
    }
}
