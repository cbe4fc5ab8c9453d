use std::path::PathBuf;

use thiserror::Error;

/// fastakit 的统一错误类型。核心只负责抛出，由 CLI 决定如何提示与退出码。
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid FASTA format at line {line}: {message}")]
    Format { line: usize, message: String },

    #[error("invalid value: {0}")]
    Validation(String),

    #[error("sequence '{id}': residue '{residue}' at position {position} has no complement")]
    Lookup { id: String, residue: char, position: usize },

    #[error("renamed identifier '{0}' collides with an existing identifier")]
    Collision(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("cannot parse config file '{path}': {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("input path '{0}' does not exist")]
    InputNotFound(PathBuf),

    #[error("no FASTA files found in '{0}'")]
    NoInputFiles(PathBuf),

    #[error("'{first}' and '{second}' would write to the same output name '{stem}'")]
    DuplicateStem {
        stem: String,
        first: PathBuf,
        second: PathBuf,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
