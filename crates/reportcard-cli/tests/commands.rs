use jiff::civil::date;
use reportcard_cli::commands::{self, ConfigKey, Workspace};
use reportcard_cli::config::ReportcardConfig;
use reportcard_core::error::ValidationError;
use reportcard_core::models::language::Language;
use reportcard_core::models::record::{Field, ReportRecord, SectionId};
use reportcard_core::state::Action;
use reportcard_export::error::ExportError;
use reportcard_export::styles::DocumentStyles;

fn jane_doe() -> ReportRecord {
    ReportRecord {
        student_name: "Jane Doe".into(),
        subject: "Math".into(),
        class_grade: "Grade 5".into(),
        report_title: "Spring Progress Report".into(),
        report_date: "2024-03-01".into(),
        teacher_name: "Mr. Smith".into(),
        section1: "<p>Solid work on fractions.</p>".into(),
        section2: "<p>Attentive in class.</p>".into(),
        section3: "<ul><li>Decimals</li></ul>".into(),
        section4: "<p>Keep it up.</p>".into(),
        ..ReportRecord::default()
    }
}

fn workspace(root: &std::path::Path) -> Workspace {
    Workspace::open(root.join("config"), root.join("data")).unwrap()
}

#[test]
fn fresh_session_uses_defaults_for_today() {
    let tmp = tempfile::tempdir().unwrap();
    let ws = workspace(tmp.path());

    let state = ws.load_state(None, date(2024, 3, 1)).unwrap();
    let record = state.record();
    assert_eq!(record.report_date, "2024-03-01");
    assert_eq!(record.language, Language::En);
    assert!(!record.report_title.is_empty());
    assert!(!record.section1.is_empty());
}

#[test]
fn session_edits_persist_between_invocations() {
    let tmp = tempfile::tempdir().unwrap();
    let today = date(2024, 3, 1);

    let ws = workspace(tmp.path());
    ws.update(commands::set_action(Field::StudentName, "  Jane Doe ", false), today)
        .unwrap();
    ws.update(
        commands::set_action(Field::Section(SectionId::Plan), "Practice daily.\n\nReview weekly.", false),
        today,
    )
    .unwrap();

    let reopened = workspace(tmp.path());
    let record = reopened.load_state(None, today).unwrap().collect();
    assert_eq!(record.student_name, "Jane Doe");
    assert_eq!(record.section3, "<p>Practice daily.</p><p>Review weekly.</p>");
}

#[test]
fn html_flag_stores_section_markup_verbatim() {
    let action = commands::set_action(Field::Section(SectionId::Remarks), "<ol><li>a</li></ol>", true);
    assert_eq!(
        action,
        Action::Set(Field::Section(SectionId::Remarks), "<ol><li>a</li></ol>".into())
    );
}

#[test]
fn reset_keeps_language_and_clear_removes_snapshot() {
    let tmp = tempfile::tempdir().unwrap();
    let today = date(2024, 3, 1);
    let ws = workspace(tmp.path());

    ws.update(Action::SwitchLanguage(Language::Zh), today).unwrap();
    ws.update(commands::set_action(Field::Subject, "數學", false), today)
        .unwrap();
    let state = ws.update(Action::Reset { today: date(2024, 4, 2) }, today).unwrap();

    assert_eq!(state.language(), Language::Zh);
    assert!(state.record().subject.is_empty());
    assert_eq!(state.record().report_date, "2024-04-02");

    ws.session.clear().unwrap();
    assert!(!ws.session.path().exists());
}

#[test]
fn record_file_overrides_session() {
    let tmp = tempfile::tempdir().unwrap();
    let ws = workspace(tmp.path());
    let path = tmp.path().join("record.json");
    std::fs::write(&path, serde_json::to_string(&jane_doe()).unwrap()).unwrap();

    let state = ws.load_state(Some(&path), date(2024, 3, 1)).unwrap();
    assert_eq!(state.record(), &jane_doe());

    let imported = commands::import_action(&path).unwrap();
    assert_eq!(imported, Action::Restore(jane_doe()));
}

#[test]
fn validate_reports_first_missing_field() {
    let tmp = tempfile::tempdir().unwrap();
    let ws = workspace(tmp.path());
    let state = ws.load_state(None, date(2024, 3, 1)).unwrap();

    let err = commands::validate(state.record()).unwrap_err();
    let validation = err.downcast_ref::<ValidationError>().unwrap();
    assert_eq!(validation.field(), Field::StudentName);
}

#[test]
fn latex_export_writes_source() {
    let tmp = tempfile::tempdir().unwrap();
    let path = commands::latex(&jane_doe(), tmp.path()).unwrap();

    assert_eq!(path, tmp.path().join("report.tex"));
    let source = std::fs::read_to_string(path).unwrap();
    assert!(source.contains("Jane Doe"));
}

#[test]
fn pdf_export_writes_named_file() {
    let tmp = tempfile::tempdir().unwrap();
    let (path, output) =
        commands::pdf(&jane_doe(), None, &DocumentStyles::default(), tmp.path()).unwrap();

    let name = path.file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.starts_with("Tutorial_Report_Jane_Doe_"));
    assert!(name.ends_with(".pdf"));
    assert_eq!(output.page_count, 1);

    let bytes = std::fs::read(&path).unwrap();
    assert!(bytes.starts_with(b"%PDF"));
}

#[test]
fn raster_export_requires_complete_record() {
    let tmp = tempfile::tempdir().unwrap();
    let image = tmp.path().join("report.png");
    std::fs::write(&image, b"not read before validation").unwrap();
    let record = ReportRecord {
        teacher_name: String::new(),
        ..jane_doe()
    };

    let err = commands::pdf(&record, Some(&image), &DocumentStyles::default(), tmp.path())
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ExportError>(),
        Some(ExportError::Validation(ValidationError::Empty(Field::TeacherName)))
    ));
}

#[test]
fn section_text_keeps_paragraphs_apart() {
    let record = ReportRecord {
        section1: "<p>Works hard.</p><p>Needs focus.</p><ul><li>Fractions</li></ul>".into(),
        ..jane_doe()
    };
    assert_eq!(
        commands::section_text(&record, SectionId::Assessment),
        "Works hard.\n\nNeeds focus.\n\nFractions"
    );
}

#[test]
fn missing_logo_file_is_rejected() {
    let tmp = tempfile::tempdir().unwrap();
    let err = commands::logo_action(Some(&tmp.path().join("nope.png"))).unwrap_err();
    assert!(err.to_string().contains("does not exist"));
    assert_eq!(commands::logo_action(None).unwrap(), Action::SetLogo(None));
}

#[test]
fn config_values_are_checked() {
    let mut config = ReportcardConfig::default();

    commands::config_set(&mut config, ConfigKey::ApiBaseUrl, "https://example.test/v1/").unwrap();
    assert_eq!(config.api_base_url, "https://example.test/v1");
    assert!(commands::config_set(&mut config, ConfigKey::ApiBaseUrl, "ftp://x").is_err());

    commands::config_set(&mut config, ConfigKey::DefaultLanguage, "zh-TW").unwrap();
    assert_eq!(config.default_language, Language::Zh);

    commands::config_set(&mut config, ConfigKey::ApiKey, "sk-1234567890").unwrap();
    commands::config_set(&mut config, ConfigKey::ApiKey, "").unwrap();
    assert!(config.api_key.is_none());

    assert!("placeholder".parse::<ConfigKey>().is_ok());
    assert!("colour".parse::<ConfigKey>().is_err());
}
