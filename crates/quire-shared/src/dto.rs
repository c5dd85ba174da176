//! Data Transfer Objects - request/response types for the API.

use serde::{Deserialize, Serialize};

use crate::pagination::Paginated;

/// Category labels offered by the post forms.
pub const CATEGORY_SUGGESTIONS: &[&str] = &["Fiction", "Non-Fiction"];

/// Status codes offered by the post forms, with their labels.
pub const STATUS_OPTIONS: &[(&str, &str)] = &[("1", "Active"), ("2", "Inactive")];

/// Request to register a new user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterUserRequest {
    pub email: String,
    pub password: String,
}

/// Request to login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response containing a user's public information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
}

/// Response containing authentication tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
}

/// A post as rendered to the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostResponse {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub content: String,
    /// Status code: `1` active, anything else inactive.
    pub status: i16,
    pub category: String,
    /// Path inside the blob area.
    pub image: String,
    /// Public URL of the image, `/storage/<image>`.
    pub image_url: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Props of the `posts/index` page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostIndexProps {
    pub posts: Paginated<PostResponse>,
}

/// Props of the `posts/edit` page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostEditProps {
    #[serde(rename = "postData")]
    pub post_data: PostResponse,
}

/// A choice in the status select.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusOption {
    pub value: String,
    pub label: String,
}

/// Props of the `posts/create` page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostCreateProps {
    pub categories: Vec<String>,
    pub statuses: Vec<StatusOption>,
}

impl Default for PostCreateProps {
    fn default() -> Self {
        Self {
            categories: CATEGORY_SUGGESTIONS.iter().map(|c| c.to_string()).collect(),
            statuses: STATUS_OPTIONS
                .iter()
                .map(|(value, label)| StatusOption {
                    value: value.to_string(),
                    label: label.to_string(),
                })
                .collect(),
        }
    }
}
