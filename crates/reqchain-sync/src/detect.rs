//! Change detection against the current stored version.

use reqchain_store::StoreRecord;

use crate::normalize::normalize_title;
use crate::record::IncomingRecord;

/// What the detector concluded about one incoming record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeAssessment {
    /// No non-retired version exists for the identifier; the caller should
    /// create a first version, not a superseding one.
    Absent,
    /// A current version exists and matches the incoming record.
    Unchanged,
    /// A current version exists and differs materially.
    Changed,
}

/// Compare an incoming record with the current non-retired version.
pub fn assess(incoming: &IncomingRecord, current: Option<&StoreRecord>) -> ChangeAssessment {
    match current {
        None => ChangeAssessment::Absent,
        Some(current) if has_changed(incoming, current) => ChangeAssessment::Changed,
        Some(_) => ChangeAssessment::Unchanged,
    }
}

/// Field-by-field comparison. Titles are compared after normalization;
/// `created`, `modified` and `status` by exact string equality.
pub fn has_changed(incoming: &IncomingRecord, current: &StoreRecord) -> bool {
    let stored_title = current.field_str("title").unwrap_or_default();
    normalize_title(stored_title) != normalize_title(&incoming.title)
        || current.field_str("created") != Some(incoming.created.as_str())
        || current.field_str("modified") != Some(incoming.modified.as_str())
        || current.field_str("status") != Some(incoming.status.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn incoming() -> IncomingRecord {
        IncomingRecord {
            identifier: "REQ-1".to_string(),
            title: "Brakes".to_string(),
            created: "2024-01-01".to_string(),
            modified: "2024-01-01".to_string(),
            status: "New".to_string(),
        }
    }

    fn stored() -> StoreRecord {
        StoreRecord::for_tests("#10:0")
            .with_field("identifier", "REQ-1")
            .with_field("title", "Brakes")
            .with_field("created", "2024-01-01")
            .with_field("modified", "2024-01-01")
            .with_field("status", "New")
    }

    #[test]
    fn missing_version_is_absent_not_unchanged() {
        assert_eq!(assess(&incoming(), None), ChangeAssessment::Absent);
    }

    #[test]
    fn identical_record_is_unchanged() {
        assert_eq!(
            assess(&incoming(), Some(&stored())),
            ChangeAssessment::Unchanged
        );
    }

    #[test]
    fn encoding_only_title_difference_is_unchanged() {
        let current = stored().with_field("title", "Brakes &amp; Wheels");
        let mut record = incoming();
        record.title = " Brakes & Wheels ".to_string();
        assert_eq!(assess(&record, Some(&current)), ChangeAssessment::Unchanged);
    }

    #[test]
    fn bumped_modified_is_changed() {
        let mut record = incoming();
        record.modified = "2024-02-01".to_string();
        assert_eq!(assess(&record, Some(&stored())), ChangeAssessment::Changed);
    }

    #[test]
    fn title_change_is_changed() {
        let mut record = incoming();
        record.title = "Handbrakes".to_string();
        assert_eq!(assess(&record, Some(&stored())), ChangeAssessment::Changed);
    }

    #[test]
    fn status_and_created_compare_exactly() {
        let mut record = incoming();
        record.status = "Active".to_string();
        assert_eq!(assess(&record, Some(&stored())), ChangeAssessment::Changed);

        let mut record = incoming();
        record.created = "2023-12-31".to_string();
        assert_eq!(assess(&record, Some(&stored())), ChangeAssessment::Changed);
    }

    #[test]
    fn record_missing_stored_fields_is_changed() {
        let current = StoreRecord::for_tests("#10:0").with_field("identifier", "REQ-1");
        assert_eq!(assess(&incoming(), Some(&current)), ChangeAssessment::Changed);
    }
}
