//! HTTP handlers and route configuration.

#[cfg(test)]
#[macro_use]
mod test_support;

mod auth;
mod health;
mod posts;
mod storage;

use actix_web::web;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            // Public routes
            .route("/health", web::get().to(health::health_check))
            // Auth routes
            .service(
                web::scope("/auth")
                    .route("/register", web::post().to(auth::register))
                    .route("/login", web::post().to(auth::login))
                    .route("/me", web::get().to(auth::me)),
            ),
    )
    .service(
        web::scope("/posts")
            .route("", web::get().to(posts::index))
            .route("", web::post().to(posts::store))
            .route("/create", web::get().to(posts::create))
            .route("/{id}/edit", web::get().to(posts::edit))
            .route("/{id}", web::put().to(posts::update))
            .route("/{id}", web::patch().to(posts::update))
            .route("/{id}", web::post().to(posts::method_override))
            .route("/{id}", web::delete().to(posts::destroy)),
    )
    .route("/storage/{path:.*}", web::get().to(storage::serve));
}
