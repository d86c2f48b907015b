use jiff::civil::date;
use reportcard_core::models::language::Language;
use reportcard_core::models::record::{Field, Logo, SectionId};
use reportcard_core::state::{Action, AppState, reduce};
use reportcard_core::text::visible_text;

#[test]
fn new_state_has_defaults() {
    let state = AppState::new(Language::En, date(2024, 3, 1));
    let record = state.collect();
    assert_eq!(record.report_date, "2024-03-01");
    assert_eq!(record.report_title, "學生進度報告");
    assert!(visible_text(&record.section1).starts_with("The student has shown consistent effort"));
    assert!(record.student_name.is_empty());
}

#[test]
fn set_updates_only_the_named_field() {
    let state = AppState::new(Language::En, date(2024, 3, 1));
    let before = state.collect();
    let state = reduce(state, Action::Set(Field::StudentName, "Jane Doe".to_string()));
    let after = state.collect();
    assert_eq!(after.student_name, "Jane Doe");
    assert_eq!(after.subject, before.subject);
    assert_eq!(after.section1, before.section1);
}

#[test]
fn switching_language_keeps_user_text_and_fills_empty_sections() {
    let state = AppState::new(Language::En, date(2024, 3, 1));
    let state = reduce(
        state,
        Action::Set(Field::Section(SectionId::Assessment), "<p>Custom</p>".to_string()),
    );
    let state = reduce(state, Action::Set(Field::Section(SectionId::Plan), String::new()));
    let state = reduce(state, Action::SwitchLanguage(Language::Zh));

    let record = state.collect();
    assert_eq!(record.language, Language::Zh);
    assert_eq!(record.section1, "<p>Custom</p>");
    assert!(visible_text(&record.section3).starts_with("在接下來的四節課中"));
}

#[test]
fn enhancement_is_written_back_as_paragraphs() {
    let state = AppState::new(Language::En, date(2024, 3, 1));
    let state = reduce(
        state,
        Action::ApplyEnhancement(SectionId::Remarks, "First line\ncontinues.\n\nSecond & last.".to_string()),
    );
    assert_eq!(
        state.record().section4,
        "<p>First line continues.</p><p>Second &amp; last.</p>"
    );
}

#[test]
fn reset_restores_defaults_but_keeps_language() {
    let state = AppState::new(Language::Zh, date(2024, 3, 1));
    let state = reduce(state, Action::Set(Field::TeacherName, "王老師".to_string()));
    let state = reduce(state, Action::SetLogo(Some(Logo::File("logo.png".into()))));
    let state = reduce(state, Action::Reset { today: date(2024, 9, 2) });

    let record = state.collect();
    assert_eq!(record.language, Language::Zh);
    assert!(record.teacher_name.is_empty());
    assert!(record.logo.is_none());
    assert_eq!(record.report_date, "2024-09-02");
}

#[test]
fn restore_replaces_the_whole_record() {
    let mut snapshot = AppState::new(Language::En, date(2024, 1, 1)).collect();
    snapshot.student_name = "Restored".to_string();
    let state = reduce(AppState::default(), Action::Restore(snapshot.clone()));
    assert_eq!(state.collect(), snapshot);
}
