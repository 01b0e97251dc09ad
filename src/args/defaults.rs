pub(crate) const DEFAULT_USER_AGENT: &str =
    concat!("replaybench/", env!("CARGO_PKG_VERSION"));

/// Request logs land here unless `--log-dir` says otherwise.
pub(crate) const DEFAULT_LOG_DIR: &str = "logs";
