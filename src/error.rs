/// Error variants returned from localisation, orbit tracing, and their adapters, in the event
/// that something went wrong.
#[derive(Debug, Clone, PartialEq)]
pub enum CrError {
    /// The north-east corner of a bounding box was not strictly greater than the south-west
    /// corner in some axis.
    InvalidBounds { sw: (f64, f64), ne: (f64, f64) },
    /// A configuration value was out of its valid range (a count below 1, an empty start point,
    /// etc.).
    InvalidConfig(String),
    /// `cell_by_id` ran off the leaf boundary before consuming the whole id. The deepest
    /// reachable ancestor is still usable; this is a non-fatal signal.
    IdTooDeep,
    /// A point lies outside the root bounds, or on a cell boundary (boundaries are exclusive).
    OutOfBounds { x: f64, y: f64 },
    /// The mapping produced a non-finite value. Treated identically to `OutOfBounds` by callers.
    NonFiniteMapping,
    /// The expression compiler (`mapping::expr`) failed to parse or validate a formula.
    ExpressionError(String),
    /// Reading, parsing, or writing the session file failed.
    SessionError(String),
}

impl std::fmt::Display for CrError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CrError::InvalidBounds { sw, ne } => {
                write!(
                    f,
                    "Invalid bounds: south-west {sw:?} must be strictly less than north-east {ne:?} in both axes."
                )
            }
            CrError::InvalidConfig(message) => write!(f, "Invalid configuration: {message}"),
            CrError::IdTooDeep => write!(
                f,
                "Cell id ran past the deepest leaf of the tree; returning the deepest ancestor."
            ),
            CrError::OutOfBounds { x, y } => {
                write!(f, "Point ({x}, {y}) is out of the region's bounds.")
            }
            CrError::NonFiniteMapping => {
                write!(f, "Mapping produced a non-finite (NaN or infinite) value.")
            }
            CrError::ExpressionError(message) => write!(f, "Could not compile expression: {message}"),
            CrError::SessionError(message) => write!(f, "Session file error: {message}"),
        }
    }
}

impl std::error::Error for CrError {}

pub type CrResult<T> = Result<T, CrError>;
