//! Field validation for post submissions.
//!
//! Rules are checked in a fixed order per field and only the first failure
//! is reported, so every field maps to exactly one message.

use std::collections::BTreeMap;
use std::fmt;

use crate::domain::PostStatus;

/// Maximum length of `title` and `category`, in characters.
pub const MAX_STRING_CHARS: usize = 255;

/// Maximum accepted image size, in kilobytes.
pub const MAX_IMAGE_KILOBYTES: usize = 2048;

pub const MAX_IMAGE_BYTES: usize = MAX_IMAGE_KILOBYTES * 1024;

/// Sniffed image types accepted for upload.
const ACCEPTED_IMAGE_MIME: &[&str] = &[
    "image/jpeg",
    "image/png",
    "image/gif",
    "image/bmp",
    "image/webp",
];

/// Field name to message mapping, ordered by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(BTreeMap<String, String>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failure; the first message recorded for a field wins.
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn into_map(self) -> BTreeMap<String, String> {
        self.0
    }

    /// One-line summary: the first message plus a count of the rest.
    pub fn summary(&self) -> String {
        let mut messages = self.0.values();
        match messages.next() {
            None => "The given data was invalid.".to_string(),
            Some(first) => match self.0.len() - 1 {
                0 => first.clone(),
                1 => format!("{first} (and 1 more error)"),
                rest => format!("{first} (and {rest} more errors)"),
            },
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary())
    }
}

/// An uploaded file as received from the client.
#[derive(Debug, Clone, Default)]
pub struct UploadedFile {
    pub file_name: Option<String>,
    /// Bytes kept from the upload; may be truncated once `size` passes the limit.
    pub bytes: Vec<u8>,
    /// Total size of the upload in bytes, including anything not kept.
    pub size: usize,
}

impl UploadedFile {
    pub fn new(file_name: Option<String>, bytes: Vec<u8>) -> Self {
        let size = bytes.len();
        Self {
            file_name,
            bytes,
            size,
        }
    }

    /// A file input submitted without choosing a file.
    pub fn is_blank(&self) -> bool {
        self.size == 0 && self.file_name.as_deref().is_none_or(str::is_empty)
    }
}

/// Raw post submission, before validation.
#[derive(Debug, Clone, Default)]
pub struct PostInput {
    pub title: Option<String>,
    pub contents: Option<String>,
    pub status: Option<String>,
    pub category: Option<String>,
    pub image: Option<UploadedFile>,
}

/// Whether a submission must carry an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageRule {
    Required,
    Optional,
}

/// An image that passed content sniffing and the size limit.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub bytes: Vec<u8>,
    pub extension: &'static str,
    pub mime_type: &'static str,
}

/// A submission that satisfied every rule.
#[derive(Debug, Clone)]
pub struct ValidatedPost {
    pub title: String,
    pub content: String,
    pub status: PostStatus,
    pub category: String,
    pub image: Option<ImageUpload>,
}

/// Validate a post submission.
pub fn validate_post(input: PostInput, image_rule: ImageRule) -> Result<ValidatedPost, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let title = required_string(&mut errors, "title", input.title);
    if let Some(title) = &title {
        max_chars(&mut errors, "title", title);
    }

    let content = required_string(&mut errors, "contents", input.contents);

    let status = required_string(&mut errors, "status", input.status).and_then(|raw| {
        let parsed = PostStatus::parse(&raw);
        if parsed.is_none() {
            errors.add("status", "The selected status is invalid.");
        }
        parsed
    });

    let category = required_string(&mut errors, "category", input.category);
    if let Some(category) = &category {
        max_chars(&mut errors, "category", category);
    }

    let image = match input.image.filter(|file| !file.is_blank()) {
        Some(file) => check_image(&mut errors, file),
        None => {
            if image_rule == ImageRule::Required {
                errors.add("image", "The image field is required.");
            }
            None
        }
    };

    match (title, content, status, category) {
        (Some(title), Some(content), Some(status), Some(category)) if errors.is_empty() => {
            Ok(ValidatedPost {
                title,
                content,
                status,
                category,
                image,
            })
        }
        _ => Err(errors),
    }
}

/// Validate a submission that creates a post; the image is mandatory.
pub fn validate_new_post(input: PostInput) -> Result<(ValidatedPost, ImageUpload), ValidationErrors> {
    let mut post = validate_post(input, ImageRule::Required)?;
    match post.image.take() {
        Some(image) => Ok((post, image)),
        None => {
            let mut errors = ValidationErrors::new();
            errors.add("image", "The image field is required.");
            Err(errors)
        }
    }
}

fn required_string(errors: &mut ValidationErrors, field: &str, value: Option<String>) -> Option<String> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());
    if value.is_none() {
        errors.add(field, format!("The {field} field is required."));
    }
    value
}

fn max_chars(errors: &mut ValidationErrors, field: &str, value: &str) {
    if value.chars().count() > MAX_STRING_CHARS {
        errors.add(
            field,
            format!("The {field} field must not be greater than {MAX_STRING_CHARS} characters."),
        );
    }
}

fn check_image(errors: &mut ValidationErrors, file: UploadedFile) -> Option<ImageUpload> {
    let kind = infer::get(&file.bytes)
        .filter(|kind| ACCEPTED_IMAGE_MIME.contains(&kind.mime_type()));

    let Some(kind) = kind else {
        errors.add("image", "The image field must be an image.");
        return None;
    };

    if file.size > MAX_IMAGE_BYTES {
        errors.add(
            "image",
            format!("The image field must not be greater than {MAX_IMAGE_KILOBYTES} kilobytes."),
        );
        return None;
    }

    Some(ImageUpload {
        bytes: file.bytes,
        extension: kind.extension(),
        mime_type: kind.mime_type(),
    })
}
