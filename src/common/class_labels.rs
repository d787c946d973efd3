use std::path::Path;
use crate::error::ModelError;
use crate::utils;

/// Class names indexed by the network's class id. Read-only once loaded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassLabelTable {
    names: Vec<String>,
}

impl ClassLabelTable {
    pub fn new(names: Vec<String>) -> Self {
        Self { names }
    }

    /// Loads a newline-delimited names file (one class per line, e.g. `coco.names`).
    pub fn from_file(path: &Path) -> Result<Self, ModelError> {
        if !path.is_file() {
            return Err(ModelError::MissingArtifact(path.to_path_buf()));
        }
        let lines = utils::file_to_vec(path).map_err(|err| ModelError::Malformed {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })?;

        let mut names: Vec<String> = lines.iter().map(|line| line.trim().to_string()).collect();
        while names.last().is_some_and(|name| name.is_empty()) {
            names.pop();
        }
        if names.is_empty() {
            return Err(ModelError::Malformed {
                path: path.to_path_buf(),
                reason: "no class names".to_string(),
            });
        }

        log::info!("Loaded {} class names from {}", names.len(), path.display());
        Ok(Self { names })
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn get(&self, class_id: usize) -> Option<&str> {
        self.names.get(class_id).map(String::as_str)
    }

    /// Name for `class_id`, or `# <id>` when the table has no entry.
    pub fn name(&self, class_id: usize) -> String {
        match self.get(class_id) {
            Some(name) => name.to_string(),
            None => format!("# {}", class_id),
        }
    }
}
