//! CLI execution context.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context as _, Result};
use shop_api::{ApiClient, StoredCookies};
use shop_auth::UserCache;
use shop_router::{MemoryNavigator, Navigator, Router};
use shop_storage::{FileStore, KeyValueStore, MemoryStore, SharedStore};

use crate::config::CliConfig;
use crate::output::Output;

/// Persistent key remembering the page the last command ended on.
pub const LOCATION_KEY: &str = "shop.location";

/// Everything a command needs, wired together.
///
/// The persistent scope is a [`FileStore`]; the session scope only lives
/// as long as the process, like a browser tab's session storage.
pub struct Context {
    /// CLI configuration.
    pub config: CliConfig,
    /// Output handler.
    pub output: Output,
    /// Persistent storage scope.
    pub persistent: SharedStore,
    /// Cached user accessor.
    pub cache: UserCache,
    /// Where the storefront currently is.
    pub navigator: Arc<MemoryNavigator>,
    /// Guarded router.
    pub router: Router,
    /// Session-aware API client.
    pub client: ApiClient,
    /// Session cookies, persisted next to the user cache.
    pub cookies: Arc<StoredCookies>,
}

impl Context {
    /// Load config and open local state.
    pub fn load(config_path: Option<&Path>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let found = match config_path {
            Some(path) => Some(path.to_path_buf()),
            None => CliConfig::find(&cwd),
        };
        let (mut config, base_dir) = match found {
            Some(path) => {
                output.debug(&format!("Using config {}", path.display()));
                let config = CliConfig::load(&path)?;
                let base = path
                    .parent()
                    .filter(|p| !p.as_os_str().is_empty())
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| cwd.clone());
                (config, base)
            }
            None => (CliConfig::default(), cwd),
        };
        config.api = config.api.with_env_overrides();

        let storage_path = resolve(&base_dir, &config.storage.path);
        let persistent: SharedStore = Arc::new(
            FileStore::open(&storage_path)
                .with_context(|| format!("Failed to open storage {}", storage_path.display()))?,
        );
        let session = MemoryStore::new().shared();
        let cache = UserCache::new(persistent.clone(), session);

        let last = persistent
            .get(LOCATION_KEY)
            .context("Failed to read last location")?
            .unwrap_or_else(|| "/".to_string());
        let navigator = Arc::new(MemoryNavigator::at(&last));

        let router = Router::new(cache.clone(), navigator.clone());
        let cookies = Arc::new(StoredCookies::new(persistent.clone()));
        let client = ApiClient::with_reqwest(
            config.api.clone(),
            cache.clone(),
            navigator.clone(),
            Some(cookies.clone()),
        )
        .context("Failed to build HTTP client")?;

        tracing::debug!(
            base_url = %config.api.base_url,
            storage = %storage_path.display(),
            location = %last,
            "context loaded"
        );

        Ok(Self {
            config,
            output,
            persistent,
            cache,
            navigator,
            router,
            client,
            cookies,
        })
    }

    /// Save the location, then hand back the command's result.
    ///
    /// A failed command may still have moved the navigator, for example to
    /// the login page after the session ended, so the location is saved
    /// either way. The command's own error wins over a save failure.
    pub fn finish(&self, result: Result<()>) -> Result<()> {
        let saved = self.save_location();
        result.and(saved)
    }

    /// Remember the current page for the next invocation.
    pub fn save_location(&self) -> Result<()> {
        let location = self.navigator.location().full_path();
        self.persistent
            .set(LOCATION_KEY, &location)
            .context("Failed to save location")
    }
}

fn resolve(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use tempfile::TempDir;

    fn load(dir: &TempDir) -> Context {
        let config = dir.path().join("shop.toml");
        std::fs::write(&config, "[storage]\npath = \"state.json\"\n").unwrap();
        Context::load(Some(&config), Output::new(false, true)).unwrap()
    }

    #[test]
    fn test_resolve() {
        let base = Path::new("/work/shop");
        assert_eq!(
            resolve(base, Path::new(".shop/storage.json")),
            PathBuf::from("/work/shop/.shop/storage.json")
        );
        assert_eq!(
            resolve(base, Path::new("/var/shop.json")),
            PathBuf::from("/var/shop.json")
        );
    }

    #[test]
    fn test_location_restored_between_runs() {
        let dir = TempDir::new().unwrap();
        let ctx = load(&dir);
        assert_eq!(ctx.navigator.location().full_path(), "/");

        ctx.navigator.assign("/products?page=2");
        ctx.finish(Ok(())).unwrap();

        assert_eq!(load(&dir).navigator.location().full_path(), "/products?page=2");
    }

    #[test]
    fn test_failed_command_still_saves_location() {
        let dir = TempDir::new().unwrap();
        let ctx = load(&dir);

        // The session ended mid-command and the client moved to login.
        ctx.navigator.assign("/login?redirect=%2Fcart");
        let err = ctx.finish(Err(anyhow!("session expired"))).unwrap_err();
        assert_eq!(err.to_string(), "session expired");

        let next = load(&dir);
        assert_eq!(next.navigator.location().full_path(), "/login?redirect=%2Fcart");
        assert!(dir.path().join("state.json").is_file());
    }
}
