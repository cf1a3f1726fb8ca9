//! Domain error types.

use std::path::PathBuf;

/// Top-level error type for tradesim.
#[derive(Debug, thiserror::Error)]
pub enum TradesimError {
    #[error("input file {} is empty", path.display())]
    EmptyInput { path: PathBuf },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&TradesimError> for std::process::ExitCode {
    fn from(err: &TradesimError) -> Self {
        let code: u8 = match err {
            TradesimError::Io(_) | TradesimError::EmptyInput { .. } => 1,
            TradesimError::ConfigParse { .. } | TradesimError::ConfigInvalid { .. } => 2,
        };
        std::process::ExitCode::from(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::process::ExitCode;

    #[test]
    fn empty_input_message_names_file() {
        let err = TradesimError::EmptyInput {
            path: PathBuf::from("prices.csv"),
        };
        assert_eq!(err.to_string(), "input file prices.csv is empty");
    }

    #[test]
    fn config_invalid_message() {
        let err = TradesimError::ConfigInvalid {
            section: "strategy".into(),
            key: "slow_window".into(),
            reason: "slow_window must exceed fast_window".into(),
        };
        assert_eq!(
            err.to_string(),
            "invalid config value [strategy] slow_window: slow_window must exceed fast_window"
        );
    }

    #[test]
    fn exit_codes_by_category() {
        let io = TradesimError::from(std::io::Error::other("boom"));
        let cfg = TradesimError::ConfigParse {
            file: "a.ini".into(),
            reason: "bad".into(),
        };
        assert_eq!(ExitCode::from(&io), ExitCode::from(1));
        assert_eq!(ExitCode::from(&cfg), ExitCode::from(2));
    }
}
