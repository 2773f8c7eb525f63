use crate::model::{Id, post::PostMarker};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use thiserror::Error;
use time::OffsetDateTime;

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash)]
pub struct CommentMarker;

#[derive(Clone, Eq, PartialEq, Debug, Hash)]
pub struct Comment {
    pub id: Id<CommentMarker>,
    pub post: Id<PostMarker>,
    pub name: String,
    pub comment: String,
    pub approved: bool,
    pub created_at: Option<OffsetDateTime>,
}

/// Raw comment form input. Missing fields deserialize as empty strings so
/// that they are reported by validation instead of by the extractor.
#[derive(Clone, Eq, PartialEq, Debug, Default, Hash, Deserialize, Serialize)]
#[serde(default)]
pub struct CommentDraft {
    #[serde(rename = "_id")]
    pub post_id: String,
    pub name: String,
    pub email: String,
    pub comment: String,
}

#[derive(Clone, Eq, PartialEq, Debug, Hash, Deserialize, Serialize)]
pub struct CommentSubmission {
    #[serde(rename = "_id")]
    pub post: Id<PostMarker>,
    pub name: String,
    pub email: String,
    pub comment: String,
}

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CommentField {
    #[serde(rename = "_id")]
    Post,
    Name,
    Email,
    Comment,
}

impl CommentField {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            CommentField::Post => "Post",
            CommentField::Name => "Name",
            CommentField::Email => "Email",
            CommentField::Comment => "Comment",
        }
    }

    #[must_use]
    pub fn message(self) -> String {
        format!("The {} field is required", self.label())
    }
}

#[derive(Clone, Eq, PartialEq, Debug, Default, Hash, Serialize, Error)]
#[serde(transparent)]
#[error("Required comment fields were empty: {}", FieldList(.0))]
pub struct FieldErrors(Vec<CommentField>);

struct FieldList<'a>(&'a [CommentField]);

impl Display for FieldList<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (i, field) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str(field.label())?;
        }
        Ok(())
    }
}

impl FieldErrors {
    #[must_use]
    pub fn fields(&self) -> &[CommentField] {
        &self.0
    }
}

impl CommentDraft {
    pub fn validate(&self) -> Result<CommentSubmission, FieldErrors> {
        let fields = [
            (CommentField::Post, &self.post_id),
            (CommentField::Name, &self.name),
            (CommentField::Email, &self.email),
            (CommentField::Comment, &self.comment),
        ];

        let missing: Vec<_> = fields
            .iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(field, _)| *field)
            .collect();

        if !missing.is_empty() {
            return Err(FieldErrors(missing));
        }

        Ok(CommentSubmission {
            post: Id::new(self.post_id.trim()),
            name: self.name.trim().to_owned(),
            email: self.email.trim().to_owned(),
            comment: self.comment.trim().to_owned(),
        })
    }
}

#[derive(Clone, Eq, PartialEq, Debug, Default, Hash)]
pub enum SubmissionState {
    #[default]
    Idle,
    Rejected {
        draft: CommentDraft,
        errors: FieldErrors,
    },
    Submitting,
    Submitted,
    Failed { draft: CommentDraft },
}

impl SubmissionState {
    #[must_use]
    pub fn shows_form(&self) -> bool {
        !matches!(self, SubmissionState::Submitted)
    }

    #[must_use]
    pub fn draft(&self) -> Option<&CommentDraft> {
        match self {
            SubmissionState::Rejected { draft, .. } | SubmissionState::Failed { draft } => {
                Some(draft)
            }
            _ => None,
        }
    }

    #[must_use]
    pub fn errors(&self) -> Option<&FieldErrors> {
        match self {
            SubmissionState::Rejected { errors, .. } => Some(errors),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::model::comment::{CommentDraft, CommentField, SubmissionState};

    fn draft() -> CommentDraft {
        CommentDraft {
            post_id: "post-1".to_owned(),
            name: "Ada".to_owned(),
            email: "ada@example.com".to_owned(),
            comment: "Lovely post".to_owned(),
        }
    }

    #[test]
    fn complete_draft_validates() {
        let submission = draft().validate().unwrap();

        assert_eq!(submission.post.get(), "post-1");
        assert_eq!(submission.name, "Ada");
        assert_eq!(
            serde_json::to_value(&submission).unwrap(),
            serde_json::json!({
                "_id": "post-1",
                "name": "Ada",
                "email": "ada@example.com",
                "comment": "Lovely post",
            })
        );
    }

    #[test]
    fn each_empty_field_is_reported() {
        for field in [
            CommentField::Name,
            CommentField::Email,
            CommentField::Comment,
        ] {
            let mut draft = draft();
            match field {
                CommentField::Name => draft.name.clear(),
                CommentField::Email => draft.email = "   ".to_owned(),
                CommentField::Comment => draft.comment.clear(),
                CommentField::Post => unreachable!(),
            }

            let errors = draft.validate().unwrap_err();
            assert_eq!(errors.fields(), [field]);
        }
    }

    #[test]
    fn all_missing_fields_are_reported_in_order() {
        let errors = CommentDraft::default().validate().unwrap_err();

        assert_eq!(
            errors.fields(),
            [
                CommentField::Post,
                CommentField::Name,
                CommentField::Email,
                CommentField::Comment,
            ]
        );
        assert_eq!(
            errors.to_string(),
            "Required comment fields were empty: Post, Name, Email, Comment"
        );
        assert_eq!(CommentField::Name.message(), "The Name field is required");
    }

    #[test]
    fn missing_form_fields_deserialize_as_empty() {
        let draft: CommentDraft = serde_json::from_str(r#"{"name":"Ada"}"#).unwrap();
        assert_eq!(draft.name, "Ada");
        assert!(draft.comment.is_empty());
    }

    #[test]
    fn only_submitted_hides_the_form() {
        assert!(SubmissionState::Idle.shows_form());
        assert!(SubmissionState::Submitting.shows_form());
        assert!(SubmissionState::Failed { draft: draft() }.shows_form());
        assert!(!SubmissionState::Submitted.shows_form());
    }
}
