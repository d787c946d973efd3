//! Well-known directories on the system.

use std::path::PathBuf;

pub(crate) const APP_DIR: &str = "autointell";

#[derive(Debug)]
pub enum FsAccess {
    Cache,
    Config,
}

impl FsAccess {
    /// Examples: `~/.config/autointell`, `~/.cache/autointell`.
    ///
    /// Nothing is created on disk.
    pub fn app_path(&self) -> anyhow::Result<PathBuf> {
        let base_path = match self {
            FsAccess::Cache => dirs::cache_dir(),
            FsAccess::Config => dirs::config_dir(),
        };

        let path = base_path.ok_or_else(|| {
            anyhow::anyhow!("Unsupported operating system. Supported OS: Linux, MacOS, Windows.")
        })?;
        Ok(path.join(APP_DIR))
    }

    /// A file inside the application directory, e.g. `~/.config/autointell/config.json`.
    pub fn app_file(&self, name: &str) -> anyhow::Result<PathBuf> {
        Ok(self.app_path()?.join(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_files_live_under_the_app_directory() {
        if let Ok(path) = FsAccess::Config.app_file("config.json") {
            assert!(path.ends_with("autointell/config.json"));
        }
    }
}
