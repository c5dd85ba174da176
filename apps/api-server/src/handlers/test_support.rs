//! Fixtures shared by the handler tests.

use std::sync::Arc;

use actix_web::http::header;
use uuid::Uuid;

use quire_core::ports::{PasswordService, TokenService};
use quire_infra::{
    Argon2PasswordService, InMemoryBlobStore, InMemoryCache, InMemoryPostRepository,
    InMemoryUserRepository, JwtConfig, JwtTokenService,
};

use crate::state::AppState;

pub const PNG: &[u8] = &[
    0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, b'I', b'H', b'D', b'R',
];

const BOUNDARY: &str = "quire-test-boundary";

/// An app wired to the handlers with in-memory adapters.
macro_rules! test_app {
    ($state:expr) => {
        actix_web::App::new()
            .app_data(actix_web::web::Data::new($state))
            .app_data(actix_web::web::Data::new(
                $crate::handlers::test_support::token_service(),
            ))
            .app_data(actix_web::web::Data::new(
                $crate::handlers::test_support::password_service(),
            ))
            .configure($crate::handlers::configure_routes)
    };
}

/// State over in-memory adapters; the blob store is returned for inspection.
pub fn test_state() -> (AppState, Arc<InMemoryBlobStore>) {
    let blobs = Arc::new(InMemoryBlobStore::new());
    let state = AppState::from_parts(
        Arc::new(InMemoryUserRepository::new()),
        Arc::new(InMemoryPostRepository::new()),
        blobs.clone(),
        Arc::new(InMemoryCache::new()),
    );
    (state, blobs)
}

pub fn token_service() -> Arc<dyn TokenService> {
    Arc::new(JwtTokenService::new(JwtConfig::default()))
}

pub fn password_service() -> Arc<dyn PasswordService> {
    Arc::new(Argon2PasswordService::new())
}

pub fn bearer(user_id: Uuid) -> (header::HeaderName, String) {
    let token = token_service()
        .generate_token(user_id, "author@example.com")
        .unwrap();
    (header::AUTHORIZATION, format!("Bearer {token}"))
}

/// Encode a `multipart/form-data` body; returns the content type and bytes.
pub fn multipart_body(fields: &[(&str, &str)], image: Option<(&str, &[u8])>) -> (String, Vec<u8>) {
    let mut body = Vec::new();

    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }

    if let Some((file_name, bytes)) = image {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }

    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    (format!("multipart/form-data; boundary={BOUNDARY}"), body)
}
