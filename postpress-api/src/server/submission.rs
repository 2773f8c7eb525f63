use postpress_common::model::{
    comment::{CommentDraft, SubmissionState},
    post::Post,
};
use postpress_content::submit::CommentSubmitter;
use tracing::{debug, warn};

#[derive(Debug)]
pub struct SubmissionFlow<'a> {
    submitter: &'a CommentSubmitter,
    post: &'a Post,
    state: SubmissionState,
}

impl<'a> SubmissionFlow<'a> {
    pub fn new(submitter: &'a CommentSubmitter, post: &'a Post) -> Self {
        Self {
            submitter,
            post,
            state: SubmissionState::Idle,
        }
    }

    pub fn state(&self) -> &SubmissionState {
        &self.state
    }

    pub async fn submit(&mut self, mut draft: CommentDraft) -> &SubmissionState {
        if matches!(
            self.state,
            SubmissionState::Submitted | SubmissionState::Submitting
        ) {
            return &self.state;
        }

        draft.post_id = self.post.id.get().to_owned();

        let submission = match draft.validate() {
            Ok(submission) => submission,
            Err(errors) => {
                debug!(slug = %self.post.slug, %errors, "Comment rejected before sending");
                self.state = SubmissionState::Rejected { draft, errors };
                return &self.state;
            }
        };

        self.state = SubmissionState::Submitting;
        self.state = match self.submitter.submit(&submission).await {
            Ok(()) => SubmissionState::Submitted,
            Err(error) => {
                warn!(slug = %self.post.slug, %error, "Comment submission failed");
                SubmissionState::Failed { draft }
            }
        };

        &self.state
    }
}
