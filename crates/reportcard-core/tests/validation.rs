use reportcard_core::error::ValidationError;
use reportcard_core::models::language::Language;
use reportcard_core::models::record::{Field, ReportRecord, SectionId};
use reportcard_core::validate::validate_record;

fn complete_record() -> ReportRecord {
    ReportRecord {
        student_name: "Jane Doe".to_string(),
        subject: "Math".to_string(),
        class_grade: "Grade 5".to_string(),
        report_title: "Progress Report".to_string(),
        report_date: "2024-03-01".to_string(),
        teacher_name: "Mr. Smith".to_string(),
        logo: None,
        section1: "<p>Solid grasp of fractions.</p>".to_string(),
        section2: "<p>Attentive in class.</p>".to_string(),
        section3: "<ul><li>Decimals</li></ul>".to_string(),
        section4: "<p>Keep practicing.</p>".to_string(),
        language: Language::En,
    }
}

#[test]
fn complete_record_passes() {
    assert_eq!(validate_record(&complete_record()), Ok(()));
}

#[test]
fn each_blank_scalar_field_is_named() {
    for field in Field::SCALARS {
        for blank in ["", "   ", "\t\n"] {
            let mut record = complete_record();
            *record.get_mut(field) = blank.to_string();
            let err = validate_record(&record).unwrap_err();
            assert_eq!(err, ValidationError::Empty(field), "field {field} with {blank:?}");
            assert_eq!(err.field(), field);
        }
    }
}

#[test]
fn each_empty_section_is_named() {
    for id in SectionId::ALL {
        for blank in ["", "<p><br></p>", "<p>&nbsp; </p>", "  "] {
            let mut record = complete_record();
            *record.section_mut(id) = blank.to_string();
            let err = validate_record(&record).unwrap_err();
            assert_eq!(err, ValidationError::Empty(Field::Section(id)), "{id} with {blank:?}");
        }
    }
}

#[test]
fn malformed_date_is_rejected() {
    let mut record = complete_record();
    record.report_date = "March 1st".to_string();
    let err = validate_record(&record).unwrap_err();
    assert_eq!(err.field(), Field::ReportDate);
    assert!(matches!(err, ValidationError::InvalidDate { .. }));
}

#[test]
fn first_failure_in_form_order_wins() {
    let mut record = complete_record();
    record.teacher_name.clear();
    record.subject.clear();
    record.section2.clear();
    assert_eq!(
        validate_record(&record),
        Err(ValidationError::Empty(Field::Subject))
    );
}

#[test]
fn error_message_mentions_field_key() {
    let err = ValidationError::Empty(Field::Section(SectionId::Plan));
    assert_eq!(err.to_string(), "required field `section3` is empty");
}

#[test]
fn field_keys_parse_in_several_spellings() {
    assert_eq!("studentName".parse::<Field>(), Ok(Field::StudentName));
    assert_eq!("student_name".parse::<Field>(), Ok(Field::StudentName));
    assert_eq!("class-grade".parse::<Field>(), Ok(Field::ClassGrade));
    assert_eq!("section4".parse::<Field>(), Ok(Field::Section(SectionId::Remarks)));
    assert!("nickname".parse::<Field>().is_err());
}
