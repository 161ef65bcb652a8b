use thiserror::Error;

pub type ChartResult<T> = Result<T, ChartError>;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("no transformer or formatter registered for chart family `{family}`")]
    UnknownFamily { family: String },

    #[error("malformed data item {index} in series `{series}`: {reason}")]
    MalformedDataItem {
        series: String,
        index: usize,
        reason: String,
    },

    #[error("boundary feature set unavailable: {0}")]
    BoundaryLoad(#[from] BoundaryLoadError),

    #[error("percentage unavailable: total is zero or not finite")]
    PercentageUnavailable,

    #[error("invalid data: {0}")]
    InvalidData(String),
}

/// Failure raised while fetching a boundary feature set.
///
/// `Clone` so one in-flight fetch can hand the same failure to every waiter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoundaryLoadError {
    #[error("map `{map_id}` is not supported by the boundary loader")]
    Unsupported { map_id: String },

    #[error("boundary resource for map `{map_id}` is missing: {detail}")]
    Missing { map_id: String, detail: String },

    #[error("boundary loader timed out after {timeout_ms}ms for map `{map_id}`")]
    Timeout { map_id: String, timeout_ms: u64 },

    #[error("boundary resource for map `{map_id}` could not be decoded: {detail}")]
    Decode { map_id: String, detail: String },

    #[error("boundary loader i/o failure for map `{map_id}`: {detail}")]
    Io { map_id: String, detail: String },
}

impl BoundaryLoadError {
    #[must_use]
    pub fn map_id(&self) -> &str {
        match self {
            Self::Unsupported { map_id }
            | Self::Missing { map_id, .. }
            | Self::Timeout { map_id, .. }
            | Self::Decode { map_id, .. }
            | Self::Io { map_id, .. } => map_id,
        }
    }
}
