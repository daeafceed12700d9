//! Launchpad path discovery.
//!
//! Resolves the layout config file (local home or iCloud Drive) and the
//! directory holding the Launchpad database. Nothing is cached: host
//! identity is queried on every call.

use std::path::{Path, PathBuf};
use std::time::Duration;

use nix::unistd::{gethostname, Uid, User};

use crate::domain::{AppError, ResolutionMode, ResolvedPath, Result};

use super::command_runner::CommandRunner;

/// iCloud Drive root, relative to the home directory.
const ICLOUD_DRIVE_PATH: &str = "Library/Mobile Documents/com~apple~CloudDocs";

/// Layout config file name in local mode.
const LOCAL_CONFIG_NAME: &str = ".launchpad.yaml";

/// Launchpad database directory, relative to `DARWIN_USER_DIR`.
const LAUNCHPAD_DB_SUBDIR: &str = "com.apple.dock.launchpad/db";

/// Deadline for the `getconf` lookup.
const GETCONF_DEADLINE: Duration = Duration::from_secs(5);

/// Host identity queries.
pub trait HostEnvironment {
    /// Home directory of the current user.
    ///
    /// # Errors
    /// Returns `UserLookupFailed` if the user or their home is unknown.
    fn home_dir(&self) -> Result<PathBuf>;

    /// Host name as reported by the OS.
    ///
    /// # Errors
    /// Returns `HostnameUnavailable` if it cannot be read.
    fn hostname(&self) -> Result<String>;
}

/// The real host, queried through the user database and `gethostname(2)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemHost;

impl HostEnvironment for SystemHost {
    fn home_dir(&self) -> Result<PathBuf> {
        let uid = Uid::current();
        match User::from_uid(uid) {
            Ok(Some(user)) => Ok(user.dir),
            Ok(None) => Err(AppError::UserLookupFailed {
                reason: format!("no passwd entry for uid {uid}"),
            }),
            Err(e) => Err(AppError::UserLookupFailed {
                reason: e.to_string(),
            }),
        }
    }

    fn hostname(&self) -> Result<String> {
        let name = gethostname().map_err(|e| AppError::HostnameUnavailable {
            reason: e.to_string(),
        })?;

        name.into_string()
            .map_err(|raw| AppError::HostnameUnavailable {
                reason: format!("hostname is not valid UTF-8: {raw:?}"),
            })
    }
}

/// Resolves Launchpad file locations.
#[derive(Debug, Clone, Default)]
pub struct PathResolver<H = SystemHost> {
    host: H,
}

impl PathResolver<SystemHost> {
    /// Create a resolver backed by the real host.
    #[must_use]
    pub const fn new() -> Self {
        Self { host: SystemHost }
    }
}

impl<H: HostEnvironment> PathResolver<H> {
    /// Create a resolver backed by the given host.
    pub const fn with_host(host: H) -> Self {
        Self { host }
    }

    /// Resolve the layout config file.
    ///
    /// An explicit, non-empty path is returned unchanged.
    ///
    /// # Errors
    /// Returns `SyncedStorageUnavailable` or `HostnameUnavailable` in synced
    /// mode, `UserLookupFailed` in local mode.
    pub fn resolve_config(
        &self,
        explicit: Option<&Path>,
        use_synced_storage: bool,
    ) -> Result<ResolvedPath> {
        if let Some(path) = non_empty(explicit) {
            return Ok(ResolvedPath::new(path, ResolutionMode::Explicit));
        }

        if use_synced_storage {
            let root = self.synced_storage_root()?;
            let hostname = self.host.hostname()?;
            let host = short_hostname(&hostname);
            let path = root.join(format!(".launchpad.{host}.yaml"));
            tracing::debug!(path = %path.display(), "Resolved synced config path");
            return Ok(ResolvedPath::new(path, ResolutionMode::SyncedStorage));
        }

        let home = self.host.home_dir()?;
        Ok(ResolvedPath::new(
            home.join(LOCAL_CONFIG_NAME),
            ResolutionMode::LocalHome,
        ))
    }

    /// iCloud Drive root under the user's home directory.
    ///
    /// # Errors
    /// Returns `SyncedStorageUnavailable` if the home directory is unknown.
    pub fn synced_storage_root(&self) -> Result<PathBuf> {
        self.host
            .home_dir()
            .map(|home| home.join(ICLOUD_DRIVE_PATH))
            .map_err(|e| AppError::SyncedStorageUnavailable {
                reason: e.to_string(),
            })
    }

    /// Resolve the directory holding the Launchpad database.
    ///
    /// # Errors
    /// Returns the runner's error if `getconf` fails, or `Config` if it
    /// prints nothing.
    pub async fn resolve_db_root(
        &self,
        explicit: Option<&Path>,
        runner: &CommandRunner,
    ) -> Result<ResolvedPath> {
        if let Some(path) = non_empty(explicit) {
            return Ok(ResolvedPath::new(path, ResolutionMode::Explicit));
        }

        let output = runner
            .run(Some(GETCONF_DEADLINE), "getconf", &["DARWIN_USER_DIR"])
            .await?;
        db_root_from_user_dir(&output)
    }
}

/// Build the database directory from `getconf DARWIN_USER_DIR` output.
fn db_root_from_user_dir(output: &str) -> Result<ResolvedPath> {
    let user_dir = output.trim();

    if user_dir.is_empty() {
        return Err(AppError::Config {
            message: "getconf DARWIN_USER_DIR returned nothing".into(),
        });
    }

    Ok(ResolvedPath::new(
        Path::new(user_dir).join(LAUNCHPAD_DB_SUBDIR),
        ResolutionMode::UserDataDir,
    ))
}

fn non_empty(path: Option<&Path>) -> Option<&Path> {
    path.filter(|p| !p.as_os_str().is_empty())
}

/// Strip a trailing `.local` mDNS suffix.
fn short_hostname(host: &str) -> &str {
    host.strip_suffix(".local").unwrap_or(host)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakeHost {
        home: Option<&'static str>,
        hostname: Option<&'static str>,
    }

    impl HostEnvironment for FakeHost {
        fn home_dir(&self) -> Result<PathBuf> {
            self.home
                .map(PathBuf::from)
                .ok_or_else(|| AppError::UserLookupFailed {
                    reason: "no home".into(),
                })
        }

        fn hostname(&self) -> Result<String> {
            self.hostname
                .map(ToString::to_string)
                .ok_or_else(|| AppError::HostnameUnavailable {
                    reason: "gethostname failed".into(),
                })
        }
    }

    fn resolver(home: Option<&'static str>) -> PathResolver<FakeHost> {
        PathResolver::with_host(FakeHost {
            home,
            hostname: Some("alices-mbp.local"),
        })
    }

    #[test]
    fn test_explicit_path_wins() {
        let explicit = Path::new("/tmp/x.yaml");
        for synced in [false, true] {
            let resolved = resolver(None).resolve_config(Some(explicit), synced).unwrap();
            assert_eq!(resolved.path, PathBuf::from("/tmp/x.yaml"));
            assert_eq!(resolved.mode, ResolutionMode::Explicit);
        }
    }

    #[test]
    fn test_local_home() {
        let resolved = resolver(Some("/Users/alice"))
            .resolve_config(None, false)
            .unwrap();
        assert_eq!(resolved.path, PathBuf::from("/Users/alice/.launchpad.yaml"));
        assert_eq!(resolved.mode, ResolutionMode::LocalHome);
    }

    #[test]
    fn test_empty_explicit_is_ignored() {
        let resolved = resolver(Some("/Users/alice"))
            .resolve_config(Some(Path::new("")), false)
            .unwrap();
        assert_eq!(resolved.mode, ResolutionMode::LocalHome);
    }

    #[test]
    fn test_synced_storage_embeds_short_hostname() {
        let resolved = resolver(Some("/Users/alice"))
            .resolve_config(None, true)
            .unwrap();
        assert_eq!(
            resolved.path,
            PathBuf::from(
                "/Users/alice/Library/Mobile Documents/com~apple~CloudDocs/.launchpad.alices-mbp.yaml"
            )
        );
        assert_eq!(resolved.mode, ResolutionMode::SyncedStorage);
    }

    #[test]
    fn test_missing_home_errors() {
        let err = resolver(None).resolve_config(None, false).unwrap_err();
        assert!(matches!(err, AppError::UserLookupFailed { .. }));

        let err = resolver(None).resolve_config(None, true).unwrap_err();
        assert!(matches!(err, AppError::SyncedStorageUnavailable { .. }));
    }

    #[test]
    fn test_short_hostname() {
        assert_eq!(short_hostname("mac.local"), "mac");
        assert_eq!(short_hostname("cola"), "cola");
        assert_eq!(short_hostname("mac.example.com"), "mac.example.com");
    }

    #[tokio::test]
    async fn test_explicit_db_root_skips_getconf() {
        let resolved = resolver(None)
            .resolve_db_root(Some(Path::new("/tmp/lp")), &CommandRunner::new())
            .await
            .unwrap();
        assert_eq!(resolved.path, PathBuf::from("/tmp/lp"));
        assert_eq!(resolved.mode, ResolutionMode::Explicit);
    }

    #[test]
    fn test_hostname_failure_in_synced_mode() {
        let resolver = PathResolver::with_host(FakeHost {
            home: Some("/Users/alice"),
            hostname: None,
        });

        let err = resolver.resolve_config(None, true).unwrap_err();
        assert!(matches!(err, AppError::HostnameUnavailable { .. }));

        // local mode never asks for the hostname
        let resolved = resolver.resolve_config(None, false).unwrap();
        assert_eq!(resolved.mode, ResolutionMode::LocalHome);
    }

    #[test]
    fn test_db_root_from_user_dir() {
        let resolved = db_root_from_user_dir("/var/folders/ab/cd/0/\n").unwrap();
        assert_eq!(
            resolved.path,
            PathBuf::from("/var/folders/ab/cd/0/com.apple.dock.launchpad/db")
        );
        assert_eq!(resolved.mode, ResolutionMode::UserDataDir);
    }

    #[test]
    fn test_empty_getconf_output_is_config_error() {
        let err = db_root_from_user_dir("  \n").unwrap_err();
        assert!(matches!(err, AppError::Config { .. }));
    }

    #[test]
    fn test_system_host_queries() {
        let home = SystemHost.home_dir().unwrap();
        assert!(home.is_absolute());

        let hostname = SystemHost.hostname().unwrap();
        assert!(!hostname.is_empty());
    }
}
