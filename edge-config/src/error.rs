/// Every variant here is `StartupFatal` (spec.md §7): the process cannot
/// proceed without a well-formed config, so these propagate straight out
/// of `main` rather than being handled locally.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("could not read config file {path}: {source}")]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse config file {path} as YAML: {source}")]
    Parse {
        path: std::path::PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("could not expand shell variables in path {path:?}: {source}")]
    ShellExpand {
        path: String,
        #[source]
        source: shellexpand::LookupError<std::env::VarError>,
    },
}
