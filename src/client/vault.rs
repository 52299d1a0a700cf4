use super::Credentials;
use std::path::PathBuf;

/// Disk persistence for remembered credentials.
///
/// Holds at most one session. The refresh token inside is single-use, so
/// a stale vault simply fails its one resume attempt and gets cleared.
pub struct Vault {
    path: PathBuf,
}

impl Default for Vault {
    fn default() -> Self {
        let root = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
        Self {
            path: root.join("warble").join("credentials.json"),
        }
    }
}

impl Vault {
    /// Vault rooted at an explicit file, for tests and odd setups.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn load(&self) -> Option<Credentials> {
        let raw = std::fs::read_to_string(&self.path).ok()?;
        serde_json::from_str(&raw).ok()
    }

    pub fn save(&self, credentials: &Credentials) {
        let written = serde_json::to_string_pretty(credentials)
            .map_err(std::io::Error::other)
            .and_then(|blob| {
                self.path
                    .parent()
                    .map(std::fs::create_dir_all)
                    .unwrap_or(Ok(()))
                    .and_then(|()| std::fs::write(&self.path, blob))
            });
        if let Err(e) = written {
            log::warn!("could not persist credentials: {}", e);
        }
    }

    pub fn clear(&self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => log::debug!("cleared remembered credentials"),
            Err(_) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credentials() -> Credentials {
        Credentials {
            user: uuid::Uuid::now_v7(),
            access: String::from("access"),
            refresh: String::from("refresh"),
        }
    }

    #[test]
    fn round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let vault = Vault::at(dir.path().join("nested").join("credentials.json"));
        let remembered = credentials();
        vault.save(&remembered);
        assert_eq!(vault.load(), Some(remembered));
    }

    #[test]
    fn empty_vault_loads_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let vault = Vault::at(dir.path().join("credentials.json"));
        assert_eq!(vault.load(), None);
    }

    #[test]
    fn clear_forgets_and_tolerates_absence() {
        let dir = tempfile::tempdir().unwrap();
        let vault = Vault::at(dir.path().join("credentials.json"));
        vault.save(&credentials());
        vault.clear();
        assert_eq!(vault.load(), None);
        vault.clear();
    }

    #[test]
    fn garbage_on_disk_loads_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.json");
        std::fs::write(&path, "not json at all").unwrap();
        assert_eq!(Vault::at(path).load(), None);
    }
}
