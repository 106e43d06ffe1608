//! Authorship-ordering heuristic for flagging suspicious submissions.
//!
//! This never looks at file contents. The submission list is walked from the
//! earliest upload forward, and the first entry written by a different student
//! (before the target itself is reached) raises the flag. Only resubmissions by
//! the same author, or being the first upload, keep a submission unflagged.

use crate::error::AnalysisError;
use crate::file_storing::FileStoringClient;
use crate::models::{SubmissionListItem, SubmissionMetadata};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimilarityVerdict {
    pub is_plagiarism_suspected: bool,
    pub similar_submission_id: Option<String>,
}

/// Scans `ordered` (earliest first) for an earlier entry by another author.
///
/// The list order is trusted as given.
pub fn scan_submission_order(
    ordered: &[SubmissionListItem],
    target_id: &str,
    author: &str,
) -> SimilarityVerdict {
    let author = author.to_lowercase();

    for item in ordered {
        if item.id == target_id {
            break;
        }
        if item.student_name.to_lowercase() != author {
            return SimilarityVerdict {
                is_plagiarism_suspected: true,
                similar_submission_id: Some(item.id.clone()),
            };
        }
    }

    SimilarityVerdict::default()
}

/// Fetches the submission's metadata and assignment listing, then scans it.
pub async fn resolve(
    client: &dyn FileStoringClient,
    submission_id: &str,
) -> Result<(SubmissionMetadata, SimilarityVerdict), AnalysisError> {
    let metadata = client.metadata(submission_id).await?;
    let ordered = client.submissions(&metadata.assignment_id).await?;

    let verdict = scan_submission_order(&ordered, submission_id, &metadata.student_name);
    Ok((metadata, verdict))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, student: &str) -> SubmissionListItem {
        SubmissionListItem {
            id: id.to_string(),
            student_name: student.to_string(),
        }
    }

    #[test]
    fn earliest_submission_is_not_flagged() {
        let list = vec![item("s1", "Alice"), item("s2", "Bob")];
        let verdict = scan_submission_order(&list, "s1", "Alice");
        assert!(!verdict.is_plagiarism_suspected);
        assert_eq!(verdict.similar_submission_id, None);
    }

    #[test]
    fn single_submission_is_not_flagged() {
        let list = vec![item("s1", "Alice")];
        assert_eq!(scan_submission_order(&list, "s1", "Alice"), SimilarityVerdict::default());
    }

    #[test]
    fn later_submission_by_other_author_is_flagged() {
        let list = vec![item("s1", "Alice"), item("s2", "Bob")];
        let verdict = scan_submission_order(&list, "s2", "Bob");
        assert!(verdict.is_plagiarism_suspected);
        assert_eq!(verdict.similar_submission_id.as_deref(), Some("s1"));
    }

    #[test]
    fn first_differing_author_is_reported() {
        let list = vec![
            item("s1", "Bob"),
            item("s2", "Carol"),
            item("s3", "Dave"),
            item("s4", "Bob"),
        ];
        let verdict = scan_submission_order(&list, "s4", "Bob");
        assert_eq!(verdict.similar_submission_id.as_deref(), Some("s2"));
    }

    #[test]
    fn same_author_resubmissions_are_skipped() {
        let list = vec![item("s1", "alice"), item("s2", "ALICE"), item("s3", "Alice")];
        let verdict = scan_submission_order(&list, "s3", "Alice");
        assert!(!verdict.is_plagiarism_suspected);
    }

    #[test]
    fn entries_after_target_are_ignored() {
        let list = vec![item("s1", "Alice"), item("s2", "Bob")];
        let verdict = scan_submission_order(&list, "s1", "Alice");
        assert!(!verdict.is_plagiarism_suspected);
    }

    #[test]
    fn target_missing_from_list_scans_everything() {
        let list = vec![item("s1", "Alice"), item("s2", "Alice")];
        assert!(!scan_submission_order(&list, "s9", "alice").is_plagiarism_suspected);

        let list = vec![item("s1", "Alice"), item("s2", "Bob")];
        let verdict = scan_submission_order(&list, "s9", "Alice");
        assert_eq!(verdict.similar_submission_id.as_deref(), Some("s2"));
    }

    // Documented legacy behavior: ordering alone trips the flag, even when the
    // two files share no content at all. Any submission that is not first (or
    // preceded only by its own author's resubmissions) is flagged.
    #[test]
    fn ordering_alone_flags_unrelated_work() {
        let list = vec![item("s1", "Alice"), item("s2", "Bob"), item("s3", "Carol")];
        for (id, author) in [("s2", "Bob"), ("s3", "Carol")] {
            let verdict = scan_submission_order(&list, id, author);
            assert!(verdict.is_plagiarism_suspected);
            assert_eq!(verdict.similar_submission_id.as_deref(), Some("s1"));
        }
    }
}
