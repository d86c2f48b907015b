use std::path::{Path, PathBuf};

use eyre::WrapErr;
use reportcard_core::models::language::Language;
use reportcard_enhance::client::{DEFAULT_BASE_URL, DEFAULT_MODEL, EnhanceConfig};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Schema version written by this build. Raising it needs a new entry in
/// [`MIGRATIONS`].
const CURRENT_VERSION: u32 = 1;

const CONFIG_FILE: &str = "config.json";

/// Environment variable that overrides the configured API key.
pub const API_KEY_ENV: &str = "REPORTCARD_API_KEY";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportcardConfig {
    /// 0 (or absent) for files written before versioning.
    #[serde(default)]
    pub config_version: u32,
    pub api_base_url: String,
    pub model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Return a labelled placeholder from `enhance` when no key is set.
    #[serde(default)]
    pub placeholder_when_unconfigured: bool,
    /// Where exports are written. Defaults to the current directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,
    #[serde(default)]
    pub default_language: Language,
}

impl Default for ReportcardConfig {
    fn default() -> Self {
        Self {
            config_version: CURRENT_VERSION,
            api_base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
            placeholder_when_unconfigured: false,
            output_dir: None,
            default_language: Language::En,
        }
    }
}

impl ReportcardConfig {
    /// Client settings, with [`API_KEY_ENV`] taking precedence over the file.
    pub fn enhance_config(&self) -> EnhanceConfig {
        let env_key = std::env::var(API_KEY_ENV).ok().filter(|k| !k.trim().is_empty());
        EnhanceConfig {
            base_url: self.api_base_url.clone(),
            model: self.model.clone(),
            api_key: env_key.or_else(|| self.api_key.clone()),
            placeholder_when_unconfigured: self.placeholder_when_unconfigured,
        }
    }

    pub fn output_dir(&self) -> PathBuf {
        self.output_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }
}

/// Redacted config info safe to print.
#[derive(Debug, Clone, Serialize)]
pub struct ConfigInfo {
    pub path: String,
    pub config_version: u32,
    pub api_base_url: String,
    pub model: String,
    pub api_key_source: String,
    pub api_key_hint: Option<String>,
    pub placeholder_when_unconfigured: bool,
    pub output_dir: String,
    pub default_language: Language,
}

/// Default configuration directory (`<config dir>/reportcard`).
pub fn default_config_dir() -> eyre::Result<PathBuf> {
    dirs::config_dir()
        .map(|base| base.join("reportcard"))
        .ok_or_else(|| eyre::eyre!("platform has no config directory"))
}

/// Default directory for the session snapshot (`<data dir>/reportcard`).
pub fn default_data_dir() -> eyre::Result<PathBuf> {
    dirs::data_dir()
        .map(|base| base.join("reportcard"))
        .ok_or_else(|| eyre::eyre!("platform has no data directory"))
}

pub fn config_path(dir: &Path) -> PathBuf {
    dir.join(CONFIG_FILE)
}

/// Load the config in `dir`, or defaults when there is none yet.
pub fn load_or_default(dir: &Path) -> eyre::Result<ReportcardConfig> {
    if config_path(dir).exists() {
        load_config(dir)
    } else {
        tracing::debug!(dir = %dir.display(), "no config file, using defaults");
        Ok(ReportcardConfig::default())
    }
}

pub fn load_config(dir: &Path) -> eyre::Result<ReportcardConfig> {
    let path = config_path(dir);
    let raw = std::fs::read_to_string(&path)
        .wrap_err_with(|| format!("cannot read {}", path.display()))?;

    let mut value: Value = serde_json::from_str(&raw)
        .wrap_err_with(|| format!("{} is not valid JSON", path.display()))?;
    let found = value.get("config_version").and_then(Value::as_u64).unwrap_or(0);
    upgrade(&mut value, found)?;

    serde_json::from_value(value).wrap_err_with(|| format!("{} has an invalid shape", path.display()))
}

type Migration = fn(&mut Map<String, Value>);

/// `MIGRATIONS[n]` upgrades a version `n` document to version `n + 1`.
const MIGRATIONS: [Migration; CURRENT_VERSION as usize] = [v0_to_v1];

fn upgrade(value: &mut Value, found: u64) -> eyre::Result<()> {
    let found = usize::try_from(found).unwrap_or(usize::MAX);
    if found > MIGRATIONS.len() {
        eyre::bail!(
            "config_version {found} is newer than this build supports ({CURRENT_VERSION}); upgrade reportcard"
        );
    }

    let Some(obj) = value.as_object_mut() else {
        eyre::bail!("config root must be a JSON object");
    };
    for (version, step) in MIGRATIONS.iter().enumerate().skip(found) {
        step(obj);
        obj.insert("config_version".into(), Value::from(version as u64 + 1));
        tracing::info!(from = version, to = version + 1, "config migrated");
    }
    Ok(())
}

/// The endpoint and model became configurable and `deepseek_api_key` was
/// renamed to `api_key`.
fn v0_to_v1(obj: &mut Map<String, Value>) {
    if let Some(key) = obj.remove("deepseek_api_key") {
        obj.entry("api_key").or_insert(key);
    }
    obj.entry("api_base_url").or_insert_with(|| Value::from(DEFAULT_BASE_URL));
    obj.entry("model").or_insert_with(|| Value::from(DEFAULT_MODEL));
}

pub fn save_config(dir: &Path, config: &ReportcardConfig) -> eyre::Result<()> {
    std::fs::create_dir_all(dir).wrap_err_with(|| format!("cannot create {}", dir.display()))?;

    let current = ReportcardConfig {
        config_version: CURRENT_VERSION,
        ..config.clone()
    };
    let body = serde_json::to_vec_pretty(&current)?;

    let path = config_path(dir);
    let staging = path.with_extension("json.tmp");
    std::fs::write(&staging, &body)?;
    // Owner-only: the file can hold an API key.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&staging, std::fs::Permissions::from_mode(0o600))?;
    }
    std::fs::rename(&staging, &path)?;

    tracing::info!(path = %path.display(), version = CURRENT_VERSION, "config written");
    Ok(())
}

pub fn config_info(dir: &Path, config: &ReportcardConfig) -> ConfigInfo {
    let env_key = std::env::var(API_KEY_ENV).ok().filter(|k| !k.trim().is_empty());
    let (api_key_source, api_key_hint) = match (&env_key, &config.api_key) {
        (Some(key), _) => ("environment".to_string(), Some(redact_api_key(key))),
        (None, Some(key)) => ("config".to_string(), Some(redact_api_key(key))),
        (None, None) => ("none".to_string(), None),
    };

    ConfigInfo {
        path: config_path(dir).display().to_string(),
        config_version: config.config_version,
        api_base_url: config.api_base_url.clone(),
        model: config.model.clone(),
        api_key_source,
        api_key_hint,
        placeholder_when_unconfigured: config.placeholder_when_unconfigured,
        output_dir: config.output_dir().display().to_string(),
        default_language: config.default_language,
    }
}

/// First and last four characters of `key`; short keys are fully masked.
pub fn redact_api_key(key: &str) -> String {
    let chars: Vec<char> = key.trim().chars().collect();
    if chars.len() <= 8 {
        return "****".into();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}...{tail}")
}
