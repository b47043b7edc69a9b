use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

const SESSION_FILE: &str = "session.json";

/// Cached login, the CLI's stand-in for the browser's stored session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub server: String,
    pub access_token: String,
    pub expires_at: DateTime<Utc>,
    pub user: Value,
}

impl Session {
    pub fn new(server: &str, access_token: String, expires_in_secs: i64, user: Value) -> Self {
        Self {
            server: server.to_string(),
            access_token,
            expires_at: Utc::now() + chrono::Duration::seconds(expires_in_secs),
            user,
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    pub fn email(&self) -> &str {
        self.user.get("email").and_then(Value::as_str).unwrap_or("unknown")
    }
}

pub fn get_config_dir() -> anyhow::Result<PathBuf> {
    let config_dir = if let Ok(custom_dir) = std::env::var("FINRECON_CLI_CONFIG_DIR") {
        PathBuf::from(custom_dir)
    } else {
        let home = std::env::var("HOME")
            .map_err(|_| anyhow::anyhow!("HOME environment variable not set"))?;
        PathBuf::from(home).join(".config").join("finrecon").join("cli")
    };

    if !config_dir.exists() {
        fs::create_dir_all(&config_dir)?;
    }

    Ok(config_dir)
}

/// Load the cached session for `server`. Expired sessions are deleted and
/// reported as absent, as are sessions saved against a different server.
pub fn load_session(server: &str) -> anyhow::Result<Option<Session>> {
    load_session_from(&get_config_dir()?, server)
}

pub fn save_session(session: &Session) -> anyhow::Result<()> {
    save_session_to(&get_config_dir()?, session)
}

/// Returns true when a session file was removed.
pub fn clear_session() -> anyhow::Result<bool> {
    clear_session_in(&get_config_dir()?)
}

pub fn load_session_from(dir: &Path, server: &str) -> anyhow::Result<Option<Session>> {
    let session_file = dir.join(SESSION_FILE);
    if !session_file.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(&session_file)?;
    let session: Session = match serde_json::from_str(&content) {
        Ok(session) => session,
        Err(e) => {
            tracing::warn!("Discarding unreadable session file: {}", e);
            fs::remove_file(&session_file)?;
            return Ok(None);
        }
    };

    if session.is_expired(Utc::now()) {
        fs::remove_file(&session_file)?;
        return Ok(None);
    }
    if session.server != server {
        return Ok(None);
    }

    Ok(Some(session))
}

/// The session holds a bearer token, so on unix the file is owner-only (0600).
pub fn save_session_to(dir: &Path, session: &Session) -> anyhow::Result<()> {
    let content = serde_json::to_string_pretty(session)?;
    let session_file = dir.join(SESSION_FILE);

    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options.open(&session_file)?;

    // `mode` only applies on create; tighten files left by older versions too.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(fs::Permissions::from_mode(0o600))?;
    }

    file.write_all(content.as_bytes())?;
    Ok(())
}

pub fn clear_session_in(dir: &Path) -> anyhow::Result<bool> {
    let session_file = dir.join(SESSION_FILE);
    if session_file.exists() {
        fs::remove_file(session_file)?;
        Ok(true)
    } else {
        Ok(false)
    }
}
