use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    /// The request never completed, or the endpoint answered with a non-2xx
    /// status.
    #[error("gql request failed")]
    Transport(#[from] reqwest::Error),

    /// The endpoint answered 200 but the body carried a populated `errors`
    /// array. The raw payload is kept for diagnostics.
    #[error("gql returned errors: {errors}")]
    Protocol { errors: serde_json::Value },

    /// The body carried neither `errors` nor a `data` object.
    #[error("gql response carried no data object")]
    MissingData,

    /// The `data` object didn't match the shape the operation promises.
    #[error("could not decode gql response")]
    Decode(#[from] serde_json::Error),

    #[error("unknown sort key {0:?}, expected \"chrono\" or \"popular\"")]
    UnknownSortKey(String),

    /// The server reported another page while the current page has no edge
    /// to take a cursor from. Surfaced instead of looping forever.
    #[error("server reported another page but the current page has no usable cursor")]
    MissingPageCursor,
}
