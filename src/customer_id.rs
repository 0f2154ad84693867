use std::path::{Path, PathBuf};

/// Per-device customer id used by the recent feed and share hooks.
pub struct CustomerIdProvider;

/// Storage directory: ~/.local/share/klipy-tray (Linux) or ~/Library/Application Support/klipy-tray (macOS)
fn storage_dir() -> Option<PathBuf> {
    Some(dirs::data_dir()?.join("klipy-tray"))
}

fn load_stored(path: &Path) -> Option<String> {
    let id = std::fs::read_to_string(path).ok()?;
    let id = id.trim().to_string();
    if id.is_empty() {
        None
    } else {
        Some(id)
    }
}

fn store(path: &Path, id: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, id)
}

impl CustomerIdProvider {
    /// Resolve the customer id, trying in order:
    /// 1. An id supplied by the host app
    /// 2. A previously generated id stored on disk
    /// 3. A freshly generated id, persisted for next time
    pub fn resolve(provided: Option<&str>) -> String {
        match storage_dir() {
            Some(dir) => Self::resolve_in(&dir, provided),
            None => Self::resolve_provided(provided).unwrap_or_else(generate),
        }
    }

    pub fn resolve_in(dir: &Path, provided: Option<&str>) -> String {
        if let Some(id) = Self::resolve_provided(provided) {
            return id;
        }

        let path = dir.join("customer_id");
        if let Some(id) = load_stored(&path) {
            return id;
        }

        let id = generate();
        if let Err(e) = store(&path, &id) {
            tracing::warn!("could not persist customer id: {}", e);
        }
        id
    }

    fn resolve_provided(provided: Option<&str>) -> Option<String> {
        provided
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
    }
}

fn generate() -> String {
    uuid::Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provided_id_wins() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(
            CustomerIdProvider::resolve_in(dir.path(), Some("host-user-7")),
            "host-user-7"
        );
        assert!(!dir.path().join("customer_id").exists());
    }

    #[test]
    fn generated_id_is_reused() {
        let dir = tempfile::tempdir().unwrap();
        let first = CustomerIdProvider::resolve_in(dir.path(), None);
        let second = CustomerIdProvider::resolve_in(dir.path(), Some("  "));
        assert!(!first.is_empty());
        assert_eq!(first, second);
    }

    #[test]
    fn stored_id_is_trimmed() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("customer_id"), "abc\n").unwrap();
        assert_eq!(CustomerIdProvider::resolve_in(dir.path(), None), "abc");
    }
}
