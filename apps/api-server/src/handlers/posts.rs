//! Post pages and mutations.
//!
//! Pages answer with a page object; mutations answer `303 See Other` back to
//! the listing and leave a flash message for the next page.

use actix_multipart::{Field, Multipart};
use actix_web::http::header;
use actix_web::{HttpRequest, HttpResponse, web};
use futures::TryStreamExt;
use serde::Deserialize;

use quire_core::domain::Post;
use quire_core::validation::{MAX_IMAGE_BYTES, PostInput, UploadedFile};
use quire_shared::dto::{PostCreateProps, PostEditProps, PostIndexProps, PostResponse};
use quire_shared::{PageView, Paginated};

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

const INDEX_PATH: &str = "/posts";

/// Text fields larger than this are rejected outright.
const MAX_TEXT_FIELD_BYTES: usize = 1024 * 1024;

#[derive(Debug, Deserialize)]
pub struct ListParams {
    search: Option<String>,
    page: Option<String>,
}

/// A parsed post form plus the optional `_method` override.
#[derive(Debug, Default)]
struct PostForm {
    input: PostInput,
    method: Option<String>,
}

/// GET /posts
pub async fn index(
    identity: Identity,
    state: web::Data<AppState>,
    req: HttpRequest,
    params: web::Query<ListParams>,
) -> AppResult<HttpResponse> {
    let params = params.into_inner();
    let page = params
        .page
        .as_deref()
        .and_then(|p| p.trim().parse::<u64>().ok())
        .unwrap_or(1);
    let search = params
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());

    let result = state.posts.list(identity.user_id, search, page).await?;

    let link_query: Vec<(&str, &str)> = search.map(|s| ("search", s)).into_iter().collect();
    let posts = Paginated::new(
        result.posts,
        result.total,
        result.page,
        result.per_page,
        INDEX_PATH,
        &link_query,
    )
    .map(post_response);

    render(
        &state,
        &identity,
        PageView::new("posts/index", PostIndexProps { posts }, req.uri().to_string()),
    )
    .await
}

/// GET /posts/create
pub async fn create(identity: Identity, state: web::Data<AppState>) -> AppResult<HttpResponse> {
    render(
        &state,
        &identity,
        PageView::new("posts/create", PostCreateProps::default(), "/posts/create"),
    )
    .await
}

/// POST /posts
pub async fn store(
    identity: Identity,
    state: web::Data<AppState>,
    payload: Multipart,
) -> AppResult<HttpResponse> {
    let form = read_form(payload).await?;
    state.posts.create(identity.user_id, form.input).await?;
    redirect_with_flash(&state, &identity, "Post created successfully.").await
}

/// GET /posts/{id}/edit
pub async fn edit(
    identity: Identity,
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let post = state.posts.find(id, identity.user_id).await?;

    render(
        &state,
        &identity,
        PageView::new(
            "posts/edit",
            PostEditProps {
                post_data: post_response(post),
            },
            format!("/posts/{id}/edit"),
        ),
    )
    .await
}

/// PUT|PATCH /posts/{id}
pub async fn update(
    identity: Identity,
    state: web::Data<AppState>,
    path: web::Path<i64>,
    payload: Multipart,
) -> AppResult<HttpResponse> {
    let form = read_form(payload).await?;
    apply_update(&state, &identity, path.into_inner(), form.input).await
}

/// DELETE /posts/{id}
pub async fn destroy(
    identity: Identity,
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    apply_delete(&state, &identity, path.into_inner()).await
}

/// POST /posts/{id} carrying `_method=put|patch|delete`.
///
/// Multipart bodies can only be sent with POST from a browser form, so the
/// real verb travels as a field.
pub async fn method_override(
    identity: Identity,
    state: web::Data<AppState>,
    path: web::Path<i64>,
    payload: Multipart,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let form = read_form(payload).await?;

    match form.method.as_deref().map(str::to_ascii_lowercase).as_deref() {
        Some("put") | Some("patch") => apply_update(&state, &identity, id, form.input).await,
        Some("delete") => apply_delete(&state, &identity, id).await,
        other => {
            tracing::debug!(post_id = id, method = ?other, "Unsupported method override");
            Err(AppError::MethodNotAllowed(
                "POST /posts/{id} requires _method=put, patch or delete".to_string(),
            ))
        }
    }
}

async fn apply_update(
    state: &AppState,
    identity: &Identity,
    id: i64,
    input: PostInput,
) -> AppResult<HttpResponse> {
    state.posts.update(id, identity.user_id, input).await?;
    redirect_with_flash(state, identity, "Post updated successfully.").await
}

async fn apply_delete(state: &AppState, identity: &Identity, id: i64) -> AppResult<HttpResponse> {
    state.posts.delete(id, identity.user_id).await?;
    redirect_with_flash(state, identity, "Post deleted successfully.").await
}

async fn render<P: serde::Serialize>(
    state: &AppState,
    identity: &Identity,
    view: PageView<P>,
) -> AppResult<HttpResponse> {
    let message = state.flash.take(identity.user_id).await;
    Ok(HttpResponse::Ok().json(view.with_flash(message)))
}

async fn redirect_with_flash(
    state: &AppState,
    identity: &Identity,
    message: &str,
) -> AppResult<HttpResponse> {
    // The mutation already happened; a lost flash only costs the toast.
    if let Err(e) = state.flash.push(identity.user_id, message).await {
        tracing::warn!(user_id = %identity.user_id, error = %e, "Failed to queue flash message");
    }

    Ok(HttpResponse::SeeOther()
        .insert_header((header::LOCATION, INDEX_PATH))
        .finish())
}

/// Public representation of a post.
pub(crate) fn post_response(post: Post) -> PostResponse {
    PostResponse {
        id: post.id,
        image_url: format!("/storage/{}", post.image),
        title: post.title,
        slug: post.slug,
        content: post.content,
        status: post.status.code(),
        category: post.category,
        image: post.image,
        created_at: post.created_at.to_rfc3339(),
        updated_at: post.updated_at.to_rfc3339(),
    }
}

async fn read_form(mut payload: Multipart) -> AppResult<PostForm> {
    let mut form = PostForm::default();

    while let Some(mut field) = payload.try_next().await? {
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };

        match name.as_str() {
            "image" => form.input.image = Some(read_file(&mut field).await?),
            "title" => form.input.title = Some(read_text(&mut field).await?),
            "contents" => form.input.contents = Some(read_text(&mut field).await?),
            "status" => form.input.status = Some(read_text(&mut field).await?),
            "category" => form.input.category = Some(read_text(&mut field).await?),
            "_method" => form.method = Some(read_text(&mut field).await?),
            _ => {
                // Unknown fields must still be drained before the next one.
                while field.try_next().await?.is_some() {}
            }
        }
    }

    Ok(form)
}

async fn read_text(field: &mut Field) -> AppResult<String> {
    let mut bytes = Vec::new();
    while let Some(chunk) = field.try_next().await? {
        if bytes.len() + chunk.len() > MAX_TEXT_FIELD_BYTES {
            return Err(AppError::BadRequest("Form field too large".to_string()));
        }
        bytes.extend_from_slice(&chunk);
    }

    String::from_utf8(bytes).map_err(|_| AppError::BadRequest("Form field is not UTF-8".to_string()))
}

/// Reads an upload, keeping at most one byte past the size limit so the
/// validator can tell an oversized file apart.
async fn read_file(field: &mut Field) -> AppResult<UploadedFile> {
    let file_name = field
        .content_disposition()
        .and_then(|cd| cd.get_filename())
        .map(str::to_owned);

    let mut bytes = Vec::new();
    let mut size = 0usize;
    while let Some(chunk) = field.try_next().await? {
        size += chunk.len();
        let room = (MAX_IMAGE_BYTES + 1).saturating_sub(bytes.len());
        bytes.extend_from_slice(&chunk[..chunk.len().min(room)]);
    }

    Ok(UploadedFile {
        file_name,
        bytes,
        size,
    })
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::test;
    use serde_json::Value;
    use uuid::Uuid;

    use crate::handlers::test_support::{PNG, bearer, multipart_body, test_state};

    fn fields<'a>(title: &'a str) -> Vec<(&'a str, &'a str)> {
        vec![
            ("title", title),
            ("contents", "Some words about it"),
            ("status", "1"),
            ("category", "Fiction"),
        ]
    }

    macro_rules! submit {
        ($app:expr, $user:expr, $uri:expr, $fields:expr, $image:expr) => {{
            let (content_type, body) = multipart_body($fields, $image);
            let req = test::TestRequest::post()
                .uri($uri)
                .insert_header(bearer($user))
                .insert_header(("content-type", content_type))
                .set_payload(body)
                .to_request();
            test::call_service(&$app, req).await
        }};
    }

    macro_rules! get_json {
        ($app:expr, $user:expr, $uri:expr) => {{
            let req = test::TestRequest::get()
                .uri($uri)
                .insert_header(bearer($user))
                .to_request();
            let resp = test::call_service(&$app, req).await;
            assert_eq!(resp.status(), StatusCode::OK);
            let body: Value = test::read_body_json(resp).await;
            body
        }};
    }

    #[actix_web::test]
    async fn test_create_redirects_and_flashes_once() {
        let (state, _) = test_state();
        let app = test::init_service(test_app!(state)).await;
        let user = Uuid::new_v4();

        let resp = submit!(app, user, "/posts", &fields("Hello World"), Some(("valid.png", PNG)));
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(resp.headers().get("location").unwrap(), "/posts");

        let page = get_json!(app, user, "/posts");
        assert_eq!(page["component"], "posts/index");
        assert_eq!(page["flash"]["message"], "Post created successfully.");
        assert_eq!(page["props"]["posts"]["total"], 1);
        let row = &page["props"]["posts"]["data"][0];
        assert_eq!(row["slug"], "hello-world");
        assert!(row["image_url"].as_str().unwrap().starts_with("/storage/posts/"));

        let again = get_json!(app, user, "/posts");
        assert!(again["flash"]["message"].is_null());
    }

    #[actix_web::test]
    async fn test_missing_title_is_unprocessable() {
        let (state, blobs) = test_state();
        let app = test::init_service(test_app!(state)).await;
        let user = Uuid::new_v4();

        let resp = submit!(
            app,
            user,
            "/posts",
            &[("contents", "x"), ("status", "1"), ("category", "Fiction")],
            Some(("valid.png", PNG))
        );
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["errors"]["title"], "The title field is required.");

        let page = get_json!(app, user, "/posts");
        assert_eq!(page["props"]["posts"]["total"], 0);
        assert!(page["flash"]["message"].is_null());
        assert!(blobs.is_empty().await);
    }

    #[actix_web::test]
    async fn test_requires_bearer_token() {
        let (state, _) = test_state();
        let app = test::init_service(test_app!(state)).await;

        let req = test::TestRequest::get().uri("/posts").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_foreign_post_is_not_found() {
        let (state, _) = test_state();
        let app = test::init_service(test_app!(state)).await;
        let owner = Uuid::new_v4();
        let stranger = Uuid::new_v4();

        submit!(app, owner, "/posts", &fields("Private"), Some(("valid.png", PNG)));
        let page = get_json!(app, owner, "/posts");
        let id = page["props"]["posts"]["data"][0]["id"].as_i64().unwrap();

        let req = test::TestRequest::get()
            .uri(&format!("/posts/{id}/edit"))
            .insert_header(bearer(stranger))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

        let resp = submit!(
            app,
            stranger,
            &format!("/posts/{id}"),
            &[("_method", "delete")],
            None
        );
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let edit = get_json!(app, owner, &format!("/posts/{id}/edit"));
        assert_eq!(edit["props"]["postData"]["title"], "Private");
    }

    #[actix_web::test]
    async fn test_update_through_override_keeps_image() {
        let (state, _) = test_state();
        let app = test::init_service(test_app!(state)).await;
        let user = Uuid::new_v4();

        submit!(app, user, "/posts", &fields("Draft"), Some(("valid.png", PNG)));
        let page = get_json!(app, user, "/posts");
        let original = page["props"]["posts"]["data"][0].clone();
        let id = original["id"].as_i64().unwrap();

        let mut update = fields("Final Cut");
        update.push(("_method", "put"));
        let resp = submit!(app, user, &format!("/posts/{id}"), &update, None);
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);

        let edit = get_json!(app, user, &format!("/posts/{id}/edit"));
        assert_eq!(edit["component"], "posts/edit");
        assert_eq!(edit["flash"]["message"], "Post updated successfully.");
        assert_eq!(edit["props"]["postData"]["slug"], "final-cut");
        assert_eq!(edit["props"]["postData"]["image"], original["image"]);
    }

    #[actix_web::test]
    async fn test_delete_removes_post_and_image() {
        let (state, _) = test_state();
        let app = test::init_service(test_app!(state)).await;
        let user = Uuid::new_v4();

        submit!(app, user, "/posts", &fields("Doomed"), Some(("valid.png", PNG)));
        let page = get_json!(app, user, "/posts");
        let row = &page["props"]["posts"]["data"][0];
        let id = row["id"].as_i64().unwrap();
        let image_url = row["image_url"].as_str().unwrap().to_string();

        let req = test::TestRequest::get().uri(&image_url).to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        let req = test::TestRequest::delete()
            .uri(&format!("/posts/{id}"))
            .insert_header(bearer(user))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);

        let page = get_json!(app, user, "/posts");
        assert_eq!(page["flash"]["message"], "Post deleted successfully.");
        assert_eq!(page["props"]["posts"]["total"], 0);

        let req = test::TestRequest::get().uri(&image_url).to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_unknown_override_is_rejected() {
        let (state, _) = test_state();
        let app = test::init_service(test_app!(state)).await;
        let user = Uuid::new_v4();

        submit!(app, user, "/posts", &fields("Stays"), Some(("valid.png", PNG)));
        let page = get_json!(app, user, "/posts");
        let id = page["props"]["posts"]["data"][0]["id"].as_i64().unwrap();

        let resp = submit!(app, user, &format!("/posts/{id}"), &fields("Nope"), None);
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[actix_web::test]
    async fn test_search_pages_keep_query() {
        let (state, _) = test_state();
        let app = test::init_service(test_app!(state)).await;
        let user = Uuid::new_v4();

        for i in 0..12 {
            let title = format!("Cat tale {i}");
            submit!(app, user, "/posts", &fields(&title), Some(("valid.png", PNG)));
        }
        submit!(app, user, "/posts", &fields("Dog days"), Some(("valid.png", PNG)));

        let page = get_json!(app, user, "/posts?search=CAT&page=2");
        let posts = &page["props"]["posts"];
        assert_eq!(posts["total"], 12);
        assert_eq!(posts["current_page"], 2);
        assert_eq!(posts["from"], 11);
        assert_eq!(posts["to"], 12);
        assert_eq!(posts["links"][0]["url"], "/posts?search=CAT&page=1");
        assert!(posts["links"][3]["url"].is_null());

        let page = get_json!(app, user, "/posts?page=abc");
        assert_eq!(page["props"]["posts"]["current_page"], 1);
        assert_eq!(page["props"]["posts"]["total"], 13);
    }

    #[actix_web::test]
    async fn test_page_beyond_u64_range_is_empty() {
        let (state, _) = test_state();
        let app = test::init_service(test_app!(state)).await;
        let user = Uuid::new_v4();

        submit!(app, user, "/posts", &fields("Only one"), Some(("valid.png", PNG)));

        let page = get_json!(app, user, "/posts?page=18446744073709551615");
        let posts = &page["props"]["posts"];
        assert_eq!(posts["total"], 1);
        assert_eq!(posts["data"].as_array().unwrap().len(), 0);
        assert!(posts["from"].is_null());
        assert!(posts["to"].is_null());
    }

    #[actix_web::test]
    async fn test_create_page_offers_statuses() {
        let (state, _) = test_state();
        let app = test::init_service(test_app!(state)).await;

        let page = get_json!(app, Uuid::new_v4(), "/posts/create");
        assert_eq!(page["component"], "posts/create");
        assert_eq!(page["props"]["categories"][0], "Fiction");
        assert_eq!(page["props"]["statuses"][0]["value"], "1");
        assert_eq!(page["props"]["statuses"][1]["label"], "Inactive");
    }
}
