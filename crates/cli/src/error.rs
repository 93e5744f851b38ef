use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(
        "missing catalog credentials; pass --username/--password or set EPER_USERNAME/EPER_PASSWORD"
    )]
    MissingCredentials,

    #[error("failed to read part list from {}: {source}", path.display())]
    InputFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Scrape(#[from] peso::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
