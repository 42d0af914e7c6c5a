use std::path::PathBuf;

/// Errors produced while loading inputs, building a reactor network or advancing it.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    #[error("unable to read `{path}`: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unable to parse `{path}`: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{source_name}, line {line}: {message}")]
    DataFile {
        source_name: String,
        line: usize,
        message: String,
    },

    #[error("species `{0}` not found in the mechanism")]
    UnknownSpecies(String),

    #[error("invalid composition: {0}")]
    Composition(String),

    #[error("invalid mechanism: {0}")]
    Mechanism(String),

    #[error("invalid velocity profile: {0}")]
    Profile(String),

    #[error("invalid state of `{name}`: {message}")]
    State { name: String, message: String },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("object with the same name already exists: `{0}`")]
    DuplicateName(String),

    #[error("object `{0}` does not exist")]
    UnknownObject(String),

    #[error("connection error at `{name}`: {message}")]
    Connection { name: String, message: String },
}

impl SimError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> SimError {
        SimError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> SimError {
        SimError::Json {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn state(name: &str, message: impl Into<String>) -> SimError {
        SimError::State {
            name: name.to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn connection(name: &str, message: impl Into<String>) -> SimError {
        SimError::Connection {
            name: name.to_string(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SimError>;
