use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum LaunchError {
    #[error("unknown launch argument `{name}` (declared: {declared})")]
    UnknownArgument { name: String, declared: String },
    #[error("malformed argument override `{0}`, expected `name:=value`")]
    MalformedOverride(String),
    #[error("package `{package}` not found under any prefix {searched:?}")]
    PackageNotFound {
        package: String,
        searched: Vec<PathBuf>,
    },
    #[error("executable `{executable}` of package `{package}` not found")]
    ExecutableNotFound { package: String, executable: String },
    #[error("failed to start `{node}`: {source}")]
    Spawn {
        node: String,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
