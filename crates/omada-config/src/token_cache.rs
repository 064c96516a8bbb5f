// ── Token cache ──
//
// Persists the latest access/refresh pair per profile so a restart resumes
// the token chain instead of spending a client-credentials grant.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use omada_api::{TokenSet, TokenStore};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::ConfigError;

#[derive(Debug, Default, Deserialize, Serialize)]
struct CacheFile {
    #[serde(default)]
    profiles: HashMap<String, CachedTokens>,
}

#[derive(Debug, Deserialize, Serialize)]
struct CachedTokens {
    access_token: String,
    refresh_token: String,
    expires_at: DateTime<Utc>,
}

/// A TOML file of token pairs keyed by profile name.
#[derive(Debug, Clone)]
pub struct TokenCache {
    path: PathBuf,
    profile: String,
}

impl TokenCache {
    pub fn new(path: impl Into<PathBuf>, profile: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            profile: profile.into(),
        }
    }

    /// Cache at the platform data dir for `profile`.
    pub fn for_profile(profile: impl Into<String>) -> Self {
        Self::new(crate::token_cache_path(), profile)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The saved pair for this profile, if any.
    pub fn load(&self) -> Result<Option<TokenSet>, ConfigError> {
        let file = self.read()?;
        Ok(file.profiles.get(&self.profile).map(|cached| TokenSet {
            access_token: SecretString::from(cached.access_token.clone()),
            refresh_token: SecretString::from(cached.refresh_token.clone()),
            expires_at: cached.expires_at,
        }))
    }

    /// Write `tokens` for this profile, keeping other profiles' entries.
    pub fn save(&self, tokens: &TokenSet) -> Result<(), ConfigError> {
        let mut file = self.read()?;
        file.profiles.insert(
            self.profile.clone(),
            CachedTokens {
                access_token: tokens.access_token.expose_secret().to_owned(),
                refresh_token: tokens.refresh_token.expose_secret().to_owned(),
                expires_at: tokens.expires_at,
            },
        );
        self.write(&file)
    }

    /// Drop this profile's entry.
    pub fn clear(&self) -> Result<(), ConfigError> {
        let mut file = self.read()?;
        if file.profiles.remove(&self.profile).is_some() {
            self.write(&file)?;
        }
        Ok(())
    }

    fn read(&self) -> Result<CacheFile, ConfigError> {
        match std::fs::read_to_string(&self.path) {
            Ok(text) => toml::from_str(&text).map_err(|source| ConfigError::Parse {
                path: self.path.clone(),
                source,
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(CacheFile::default()),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, file: &CacheFile) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, toml::to_string_pretty(file)?)?;
        restrict_permissions(&self.path)?;
        Ok(())
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> std::io::Result<()> {
    Ok(())
}

impl TokenStore for TokenCache {
    fn store(&self, tokens: &TokenSet) {
        match self.save(tokens) {
            Ok(()) => debug!(profile = %self.profile, expires_at = %tokens.expires_at, "token pair cached"),
            Err(e) => warn!(profile = %self.profile, error = %e, "failed to cache token pair"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn tokens(access: &str) -> TokenSet {
        TokenSet {
            access_token: SecretString::from(access.to_owned()),
            refresh_token: SecretString::from(format!("{access}-refresh")),
            expires_at: DateTime::from_timestamp(1_800_000_000, 0).unwrap(),
        }
    }

    #[test]
    fn empty_cache_loads_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let cache = TokenCache::new(dir.path().join("tokens.toml"), "home");
        assert!(cache.load().unwrap().is_none());
    }

    #[test]
    fn profiles_do_not_clobber_each_other() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("tokens.toml");
        let home = TokenCache::new(&path, "home");
        let lab = TokenCache::new(&path, "lab");

        home.store(&tokens("home-at"));
        lab.store(&tokens("lab-at"));

        let loaded = home.load().unwrap().unwrap();
        assert_eq!(loaded.access_token.expose_secret(), "home-at");
        assert_eq!(loaded.refresh_token.expose_secret(), "home-at-refresh");
        assert_eq!(loaded.expires_at, tokens("x").expires_at);
        assert_eq!(lab.load().unwrap().unwrap().access_token.expose_secret(), "lab-at");

        home.clear().unwrap();
        assert!(home.load().unwrap().is_none());
        assert!(lab.load().unwrap().is_some());
    }

    #[test]
    fn later_store_replaces_pair() {
        let dir = tempfile::tempdir().unwrap();
        let cache = TokenCache::new(dir.path().join("tokens.toml"), "home");
        cache.store(&tokens("first"));

        let mut next = tokens("second");
        next.expires_at += Duration::hours(2);
        cache.store(&next);

        let loaded = cache.load().unwrap().unwrap();
        assert_eq!(loaded.access_token.expose_secret(), "second");
        assert_eq!(loaded.expires_at, next.expires_at);
    }

    #[test]
    fn corrupt_file_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tokens.toml");
        std::fs::write(&path, "profiles = 3").unwrap();
        let cache = TokenCache::new(&path, "home");
        assert!(matches!(cache.load(), Err(ConfigError::Parse { .. })));
    }
}
