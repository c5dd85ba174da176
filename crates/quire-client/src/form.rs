//! Create and edit forms.
//!
//! `Idle -> Submitting -> Succeeded { location }`, or back to `Idle` with
//! field errors. A transport failure also returns to `Idle`; the draft is
//! kept in every case except success.

use quire_shared::FieldErrors;
use quire_shared::dto::PostResponse;

use crate::api::{ClientError, PostDraft, PostsClient, SubmitOutcome};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormState {
    Idle,
    Submitting,
    Succeeded { location: String },
}

/// Which endpoint a form submits to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormTarget {
    Create,
    Edit(i64),
}

#[derive(Debug, Clone)]
pub struct PostForm {
    target: FormTarget,
    draft: PostDraft,
    state: FormState,
    errors: FieldErrors,
    /// Public URL of the image already attached to the edited post.
    current_image_url: Option<String>,
}

impl PostForm {
    /// An empty create form.
    pub fn create() -> Self {
        Self {
            target: FormTarget::Create,
            draft: PostDraft::default(),
            state: FormState::Idle,
            errors: FieldErrors::new(),
            current_image_url: None,
        }
    }

    /// An edit form pre-populated from the stored post. No image is picked,
    /// so submitting keeps the current one.
    pub fn edit(post: &PostResponse) -> Self {
        Self {
            target: FormTarget::Edit(post.id),
            draft: PostDraft {
                title: post.title.clone(),
                contents: post.content.clone(),
                status: post.status.to_string(),
                category: post.category.clone(),
                image: None,
            },
            state: FormState::Idle,
            errors: FieldErrors::new(),
            current_image_url: Some(post.image_url.clone()),
        }
    }

    pub fn target(&self) -> FormTarget {
        self.target
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn is_processing(&self) -> bool {
        self.state == FormState::Submitting
    }

    pub fn draft(&self) -> &PostDraft {
        &self.draft
    }

    /// Mutable access to the fields; `None` while a submission is in flight.
    pub fn draft_mut(&mut self) -> Option<&mut PostDraft> {
        (!self.is_processing()).then_some(&mut self.draft)
    }

    pub fn current_image_url(&self) -> Option<&str> {
        self.current_image_url.as_deref()
    }

    /// Server message for a field from the last rejected submission.
    pub fn error(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// Enter `Submitting` and hand out the payload to send. A form that
    /// succeeded is done; the caller navigates away instead.
    pub fn begin_submit(&mut self) -> Result<PostDraft, ClientError> {
        match self.state {
            FormState::Submitting => return Err(ClientError::AlreadySubmitting),
            FormState::Succeeded { .. } => return Err(ClientError::AlreadySubmitted),
            FormState::Idle => {}
        }
        self.state = FormState::Submitting;
        Ok(self.draft.clone())
    }

    /// Apply the server's answer to an in-flight submission.
    pub fn finish(&mut self, outcome: SubmitOutcome) {
        match outcome {
            SubmitOutcome::Redirect(location) => {
                self.errors.clear();
                self.state = FormState::Succeeded { location };
            }
            SubmitOutcome::Invalid(errors) => {
                self.errors = errors;
                self.state = FormState::Idle;
            }
        }
    }

    /// The request never got an answer.
    pub fn fail(&mut self) {
        self.state = FormState::Idle;
    }

    pub async fn submit(&mut self, client: &PostsClient) -> Result<&FormState, ClientError> {
        let draft = self.begin_submit()?;

        let result = match self.target {
            FormTarget::Create => client.create(&draft).await,
            FormTarget::Edit(id) => client.update(id, &draft).await,
        };

        match result {
            Ok(outcome) => {
                self.finish(outcome);
                Ok(&self.state)
            }
            Err(e) => {
                tracing::warn!(error = %e, target = ?self.target, "Post form submission failed");
                self.fail();
                Err(e)
            }
        }
    }
}
