use crate::date::parse_report_date;
use crate::error::ValidationError;
use crate::models::record::{Field, ReportRecord, SectionId};
use crate::text::visible_text;

/// Check that a record may be exported.
///
/// All six scalar fields must be non-blank, the date must parse, and every
/// section must have visible text (markup such as `<p><br></p>` counts as
/// empty). Fields are checked in form order and the first failure is
/// returned.
pub fn validate_record(record: &ReportRecord) -> Result<(), ValidationError> {
    for field in Field::SCALARS {
        if record.get(field).trim().is_empty() {
            return Err(ValidationError::Empty(field));
        }
    }

    parse_report_date(&record.report_date)?;

    for id in SectionId::ALL {
        if visible_text(record.section(id)).trim().is_empty() {
            return Err(ValidationError::Empty(Field::Section(id)));
        }
    }

    Ok(())
}
