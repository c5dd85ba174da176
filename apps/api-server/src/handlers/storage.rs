//! Public access to stored images.

use actix_web::{HttpResponse, web};

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// GET /storage/{path}
pub async fn serve(state: web::Data<AppState>, path: web::Path<String>) -> AppResult<HttpResponse> {
    let path = path.into_inner();
    let bytes = state
        .blobs
        .read(&path)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No file at {path}")))?;

    let content_type = infer::get(&bytes)
        .map(|kind| kind.mime_type())
        .unwrap_or("application/octet-stream");

    Ok(HttpResponse::Ok().content_type(content_type).body(bytes))
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::test;

    use quire_core::ports::BlobStore;

    use crate::handlers::test_support::{PNG, test_state};

    #[actix_web::test]
    async fn test_serves_sniffed_content_type() {
        let (state, blobs) = test_state();
        let path = blobs.put("posts", "png", PNG).await.unwrap();
        let app = test::init_service(test_app!(state)).await;

        let req = test::TestRequest::get()
            .uri(&format!("/storage/{path}"))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers().get("content-type").unwrap(), "image/png");
        assert_eq!(test::read_body(resp).await.as_ref(), PNG);
    }

    #[actix_web::test]
    async fn test_missing_and_escaping_paths_are_not_found() {
        let (state, _) = test_state();
        let app = test::init_service(test_app!(state)).await;

        for uri in ["/storage/posts/missing.png", "/storage/posts/../secret.png"] {
            let req = test::TestRequest::get().uri(uri).to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{uri}");
        }
    }
}
