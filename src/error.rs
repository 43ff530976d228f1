//! Error taxonomy. Lookup failures are fatal and abort the whole run;
//! unresolvable identifiers and unknown types are not errors (they degrade
//! inside the flattener/synthesizer instead).

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum GenError {
    #[error("could not find router {0} class declaration")]
    RouterNotFound(String),

    #[error("could not find method {method} on router {router}")]
    MethodNotFound { router: String, method: String },

    #[error("method {0} has no decorators")]
    MissingDecorators(String),

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse error in {}:\n{message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("invalid router metadata in {}: {message}", path.display())]
    Metadata { path: PathBuf, message: String },
}
