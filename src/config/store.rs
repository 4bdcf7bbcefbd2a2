use crate::config::env::Environment;
use crate::config::record::VenvRecord;
use crate::core::error::{Result, VshError};
use std::path::{Path, PathBuf};
use tokio::fs;

const RECORD_EXTENSION: &str = "cfg";

/// Manages the `<home>/.vsh/<name>.cfg` record files.
pub struct RecordStore {
    config_dir: PathBuf,
}

impl RecordStore {
    pub fn new(env: &Environment) -> Self {
        Self {
            config_dir: env.config_dir(),
        }
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn record_path(&self, name: &str) -> Result<PathBuf> {
        if name.is_empty() {
            return Err(VshError::VenvConfigNotFound {
                name: name.to_string(),
            });
        }
        Ok(self
            .config_dir
            .join(format!("{}.{}", name, RECORD_EXTENSION)))
    }

    /// Path of an existing record; fails when the record file is absent.
    pub fn find(&self, name: &str) -> Result<PathBuf> {
        let path = self.record_path(name)?;
        if !path.exists() {
            return Err(VshError::VenvConfigNotFound {
                name: name.to_string(),
            });
        }
        Ok(path)
    }

    pub fn exists(&self, name: &str) -> bool {
        self.record_path(name).is_ok_and(|p| p.exists())
    }

    pub async fn load(&self, name: &str, env: &Environment) -> Result<VenvRecord> {
        let path = self.find(name)?;
        let content = fs::read_to_string(&path).await?;
        let record = VenvRecord::decode(&content)?;
        Ok(record.normalized(env))
    }

    pub async fn save(&self, record: &VenvRecord) -> Result<PathBuf> {
        let path = self.record_path(&record.venv_name)?;
        fs::create_dir_all(&self.config_dir).await?;
        fs::write(&path, record.encode()?).await?;
        tracing::debug!("Wrote record {}", path.display());
        Ok(path)
    }

    /// Deletes the record for `name` if there is one; returns the record path either way.
    pub async fn remove(&self, name: &str) -> Result<PathBuf> {
        let path = self.record_path(name)?;
        if path.exists() {
            fs::remove_file(&path).await?;
            tracing::debug!("Removed record {}", path.display());
        }
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn test_env(dir: &Path) -> Environment {
        let mut vars = BTreeMap::new();
        vars.insert("HOME".to_string(), dir.display().to_string());
        Environment::from_vars(vars, dir.to_path_buf())
    }

    #[tokio::test]
    async fn save_load_remove() {
        let dir = tempfile::tempdir().unwrap();
        let env = test_env(dir.path());
        let store = RecordStore::new(&env);
        let working = dir.path().join("work");
        std::fs::create_dir_all(&working).unwrap();

        let record = VenvRecord::new("demo", &dir.path().join("demo"), Some(&working), &env);
        let path = store.save(&record).await.unwrap();
        assert_eq!(path, dir.path().join(".vsh").join("demo.cfg"));

        let loaded = store.load("demo", &env).await.unwrap();
        assert_eq!(loaded.venv_name, record.venv_name);
        assert_eq!(loaded.venv_path, record.venv_path);
        assert_eq!(loaded.working_path, record.working_path);
        assert_eq!(loaded.shell_path, record.shell_path);

        store.remove("demo").await.unwrap();
        assert!(!path.exists());
        // second removal is a no-op
        store.remove("demo").await.unwrap();
    }

    #[tokio::test]
    async fn missing_record_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let env = test_env(dir.path());
        let store = RecordStore::new(&env);

        let err = store.load("nope", &env).await.unwrap_err();
        assert!(matches!(err, VshError::VenvConfigNotFound { .. }));
        assert!(matches!(
            store.record_path(""),
            Err(VshError::VenvConfigNotFound { .. })
        ));
    }
}
