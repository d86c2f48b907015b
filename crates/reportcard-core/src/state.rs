//! Application state and the reducer that updates it.
//!
//! Every user action produces a new [`AppState`]; nothing else holds mutable
//! report state. The form-state collector is [`AppState::collect`].

use jiff::civil::Date;

use crate::models::language::Language;
use crate::models::record::{Field, Logo, ReportRecord, SectionId};
use crate::text::{paragraphs_to_html, visible_text};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppState {
    record: ReportRecord,
}

/// A discrete user action.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Set a scalar field or replace a section's markup.
    Set(Field, String),
    SetLogo(Option<Logo>),
    /// Switch language, filling any empty title or section with defaults.
    SwitchLanguage(Language),
    /// Write enhanced plain text back into a section as paragraphs.
    ApplyEnhancement(SectionId, String),
    /// Restore a previously saved snapshot.
    Restore(ReportRecord),
    /// Clear the form back to defaults dated `today`.
    Reset { today: Date },
}

impl AppState {
    /// A fresh form: today's date, the default title and default section
    /// text for `language`.
    pub fn new(language: Language, today: Date) -> Self {
        let mut record = ReportRecord {
            language,
            report_date: today.to_string(),
            ..ReportRecord::default()
        };
        fill_defaults(&mut record);
        Self { record }
    }

    pub fn from_record(record: ReportRecord) -> Self {
        Self { record }
    }

    pub fn language(&self) -> Language {
        self.record.language
    }

    pub fn record(&self) -> &ReportRecord {
        &self.record
    }

    /// Collect the current form state into a standalone record.
    pub fn collect(&self) -> ReportRecord {
        self.record.clone()
    }
}

/// Apply `action` to `state`, returning the new state.
pub fn reduce(state: AppState, action: Action) -> AppState {
    let mut record = state.record;

    match action {
        Action::Set(field, value) => {
            *record.get_mut(field) = value;
        }
        Action::SetLogo(logo) => {
            record.logo = logo;
        }
        Action::SwitchLanguage(language) => {
            record.language = language;
            fill_defaults(&mut record);
        }
        Action::ApplyEnhancement(id, text) => {
            *record.section_mut(id) = paragraphs_to_html(&text);
        }
        Action::Restore(snapshot) => {
            record = snapshot;
        }
        Action::Reset { today } => {
            return AppState::new(record.language, today);
        }
    }

    AppState { record }
}

/// Fill an empty title and empty sections with the language's defaults.
fn fill_defaults(record: &mut ReportRecord) {
    let bundle = record.language.bundle();

    if record.report_title.trim().is_empty() {
        record.report_title = bundle.default_title.to_string();
    }

    for id in SectionId::ALL {
        if visible_text(record.section(id)).trim().is_empty() {
            *record.section_mut(id) = paragraphs_to_html(bundle.default_sections[id.index()]);
        }
    }
}
