//! INI run configuration backed by `configparser`.
//!
//! Only numeric lookups are exposed. A key that is missing or does not parse
//! as a number yields the caller's default; range checks live in
//! `domain::config_validation`.

use crate::domain::error::TradesimError;
use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;

pub struct FileConfigAdapter {
    ini: Ini,
}

impl FileConfigAdapter {
    pub fn from_file(path: &Path) -> Result<Self, TradesimError> {
        let mut ini = Ini::new();
        ini.load(path).map_err(|reason| TradesimError::ConfigParse {
            file: path.display().to_string(),
            reason,
        })?;
        Ok(FileConfigAdapter { ini })
    }

    pub fn from_string(content: &str) -> Result<Self, TradesimError> {
        let mut ini = Ini::new();
        ini.read(content.to_string())
            .map_err(|reason| TradesimError::ConfigParse {
                file: "<inline>".to_string(),
                reason,
            })?;
        Ok(FileConfigAdapter { ini })
    }

    /// No sections at all, so every lookup takes its default.
    pub fn empty() -> Self {
        FileConfigAdapter { ini: Ini::new() }
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
        match self.ini.getint(section, key) {
            Ok(Some(value)) => value,
            _ => default,
        }
    }

    fn get_double(&self, section: &str, key: &str, default: f64) -> f64 {
        match self.ini.getfloat(section, key) {
            Ok(Some(value)) => value,
            _ => default,
        }
    }
}
