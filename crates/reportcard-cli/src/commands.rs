use std::path::{Path, PathBuf};

use eyre::{Result, WrapErr};
use jiff::civil::Date;
use reportcard_core::models::record::{Field, Logo, ReportRecord, SectionId};
use reportcard_core::session::SessionStore;
use reportcard_core::state::{Action, AppState, reduce};
use reportcard_core::text::{html_to_blocks, visible_text};
use reportcard_core::validate::validate_record;
use reportcard_enhance::client::EnhanceClient;
use reportcard_export::latex::build_latex;
use reportcard_export::pdf::{PdfOutput, paginate_raster, render_pdf};
use reportcard_export::preview::render_preview;
use reportcard_export::styles::DocumentStyles;

use crate::config::{self, ConfigInfo, ReportcardConfig};

/// Where the CLI keeps its files, plus the loaded config.
#[derive(Debug, Clone)]
pub struct Workspace {
    pub config_dir: PathBuf,
    pub config: ReportcardConfig,
    pub session: SessionStore,
    /// Exports go here when set, otherwise to the configured output dir.
    pub output_dir: Option<PathBuf>,
}

impl Workspace {
    pub fn open(config_dir: PathBuf, data_dir: PathBuf) -> Result<Self> {
        let config = config::load_or_default(&config_dir)?;
        Ok(Self {
            session: SessionStore::new(&data_dir),
            config_dir,
            config,
            output_dir: None,
        })
    }

    pub fn output_dir(&self) -> PathBuf {
        self.output_dir
            .clone()
            .unwrap_or_else(|| self.config.output_dir())
    }

    /// Current form state: the record file when given, else the saved
    /// session, else a fresh form dated `today`.
    pub fn load_state(&self, record_file: Option<&Path>, today: Date) -> Result<AppState> {
        if let Some(path) = record_file {
            let contents = std::fs::read_to_string(path)
                .wrap_err_with(|| format!("failed to read record at {}", path.display()))?;
            let record: ReportRecord = serde_json::from_str(&contents)
                .wrap_err_with(|| format!("{} is not a report record", path.display()))?;
            return Ok(AppState::from_record(record));
        }

        match self.session.load()? {
            Some(record) => Ok(reduce(
                AppState::new(record.language, today),
                Action::Restore(record),
            )),
            None => Ok(AppState::new(self.config.default_language, today)),
        }
    }

    /// Apply `action` to the saved session and persist the result.
    pub fn update(&self, action: Action, today: Date) -> Result<AppState> {
        let state = reduce(self.load_state(None, today)?, action);
        self.session.save(state.record())?;
        Ok(state)
    }
}

pub fn today() -> Date {
    jiff::Zoned::now().date()
}

// ── Export commands ──────────────────────────────────────────────────────

pub fn validate(record: &ReportRecord) -> Result<()> {
    validate_record(record)?;
    tracing::info!(student = %record.student_name, "record is complete");
    Ok(())
}

pub fn preview(record: &ReportRecord, out: Option<&Path>, today: Date) -> Result<Option<PathBuf>> {
    let html = render_preview(record, today)?;
    match out {
        Some(path) => {
            write_atomic(path, html.as_bytes())?;
            tracing::info!(path = %path.display(), "preview written");
            Ok(Some(path.to_path_buf()))
        }
        None => {
            println!("{html}");
            Ok(None)
        }
    }
}

/// Write `report.tex` (and the logo when present) into `dir`.
pub fn latex(record: &ReportRecord, dir: &Path) -> Result<PathBuf> {
    let export = build_latex(record)?;
    let path = export.write_to(dir)?;
    Ok(path)
}

/// Render the PDF into `dir`. With `raster` set, paginate that image
/// instead of laying out native text.
pub fn pdf(
    record: &ReportRecord,
    raster: Option<&Path>,
    styles: &DocumentStyles,
    dir: &Path,
) -> Result<(PathBuf, PdfOutput)> {
    let output = match raster {
        Some(image_path) => {
            let bytes = std::fs::read(image_path)
                .wrap_err_with(|| format!("failed to read image at {}", image_path.display()))?;
            paginate_raster(&bytes, record, styles)?
        }
        None => render_pdf(record, styles)?,
    };

    let path = dir.join(&output.filename);
    write_atomic(&path, &output.bytes)?;
    tracing::info!(path = %path.display(), pages = output.page_count, "PDF saved");
    Ok((path, output))
}

// ── Enhancement ──────────────────────────────────────────────────────────

/// Plain text of a section as sent for enhancement: one block per
/// paragraph or list item, separated by blank lines.
pub fn section_text(record: &ReportRecord, section: SectionId) -> String {
    html_to_blocks(record.section(section))
        .into_iter()
        .map(|block| block.text)
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Enhance one section's text. The section is left as is; the caller
/// decides whether to apply the result.
pub async fn enhance(
    client: &EnhanceClient,
    record: &ReportRecord,
    section: SectionId,
) -> Result<String> {
    let text = section_text(record, section);
    let enhanced = client
        .enhance(&text, record.language)
        .await
        .wrap_err_with(|| format!("failed to enhance {section}"))?;
    Ok(enhanced)
}

// ── Session commands ─────────────────────────────────────────────────────

/// Build the action for `session set`. Plain text given for a section is
/// wrapped into paragraphs unless `html` is set.
pub fn set_action(field: Field, value: &str, html: bool) -> Action {
    match field {
        Field::Section(id) if !html => Action::ApplyEnhancement(id, value.to_string()),
        Field::Section(_) => Action::Set(field, value.to_string()),
        _ => Action::Set(field, value.trim().to_string()),
    }
}

/// Build the logo action for `session logo`. `None` removes the logo.
pub fn logo_action(path: Option<&Path>) -> Result<Action> {
    let Some(path) = path else {
        return Ok(Action::SetLogo(None));
    };
    if !path.is_file() {
        return Err(eyre::eyre!("logo file {} does not exist", path.display()));
    }
    let absolute = std::path::absolute(path)
        .wrap_err_with(|| format!("failed to resolve {}", path.display()))?;
    Ok(Action::SetLogo(Some(Logo::File(absolute))))
}

pub fn import_action(path: &Path) -> Result<Action> {
    let contents = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("failed to read record at {}", path.display()))?;
    let record: ReportRecord = serde_json::from_str(&contents)
        .wrap_err_with(|| format!("{} is not a report record", path.display()))?;
    Ok(Action::Restore(record))
}

/// One-screen summary of the form: scalar fields then each section's
/// visible text.
pub fn summarize(record: &ReportRecord) -> String {
    let mut out = String::new();
    out.push_str(&format!("language: {}\n", record.language));
    for field in Field::SCALARS {
        out.push_str(&format!("{}: {}\n", field, record.get(field)));
    }
    let logo = match &record.logo {
        Some(Logo::File(path)) => path.display().to_string(),
        Some(Logo::DataUri(_)) => "(embedded image)".to_string(),
        None => "(none)".to_string(),
    };
    out.push_str(&format!("logo: {logo}\n"));
    for (id, markup) in record.sections() {
        let title = record.language.bundle().section_titles[id.index()];
        out.push_str(&format!("\n[{id}] {title}\n{}\n", visible_text(markup).trim()));
    }
    out
}

// ── Config commands ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    ApiBaseUrl,
    Model,
    ApiKey,
    Placeholder,
    OutputDir,
    DefaultLanguage,
}

impl std::str::FromStr for ConfigKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().replace('-', "_").as_str() {
            "api_base_url" | "base_url" => Ok(ConfigKey::ApiBaseUrl),
            "model" => Ok(ConfigKey::Model),
            "api_key" => Ok(ConfigKey::ApiKey),
            "placeholder" | "placeholder_when_unconfigured" => Ok(ConfigKey::Placeholder),
            "output_dir" => Ok(ConfigKey::OutputDir),
            "default_language" | "language" => Ok(ConfigKey::DefaultLanguage),
            _ => Err(format!(
                "unknown config key '{s}'. Valid keys: api_base_url, model, api_key, placeholder, output_dir, default_language"
            )),
        }
    }
}

/// Set one config value. An empty value clears optional keys.
pub fn config_set(config: &mut ReportcardConfig, key: ConfigKey, value: &str) -> Result<()> {
    let value = value.trim();
    match key {
        ConfigKey::ApiBaseUrl => {
            if !(value.starts_with("http://") || value.starts_with("https://")) {
                return Err(eyre::eyre!("api_base_url must be an http(s) URL"));
            }
            config.api_base_url = value.trim_end_matches('/').to_string();
        }
        ConfigKey::Model => {
            if value.is_empty() {
                return Err(eyre::eyre!("model must not be empty"));
            }
            config.model = value.to_string();
        }
        ConfigKey::ApiKey => {
            config.api_key = (!value.is_empty()).then(|| value.to_string());
        }
        ConfigKey::Placeholder => {
            config.placeholder_when_unconfigured = value
                .parse()
                .map_err(|_| eyre::eyre!("placeholder must be true or false"))?;
        }
        ConfigKey::OutputDir => {
            config.output_dir = (!value.is_empty()).then(|| PathBuf::from(value));
        }
        ConfigKey::DefaultLanguage => {
            config.default_language = value.parse().map_err(|e: String| eyre::eyre!(e))?;
        }
    }
    Ok(())
}

pub fn config_show(ws: &Workspace) -> ConfigInfo {
    config::config_info(&ws.config_dir, &ws.config)
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)
            .wrap_err_with(|| format!("failed to create {}", dir.display()))?;
    }
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    std::fs::write(&tmp, bytes).wrap_err_with(|| format!("failed to write {}", tmp.display()))?;
    std::fs::rename(&tmp, path).wrap_err_with(|| format!("failed to write {}", path.display()))?;
    Ok(())
}
