pub mod auth_handlers;
pub mod curb_handlers;
pub mod dashboard;
pub mod download_handlers;
pub mod event_handlers;
pub mod gallery_handlers;
pub mod grade_handlers;
pub mod helpers;
pub mod judgment_handlers;
pub mod news_handlers;
pub mod position_handlers;
pub mod program_handlers;
pub mod result_handlers;
pub mod role_handlers;
pub mod student_handlers;
pub mod team_handlers;
pub mod upload;
pub mod user_handlers;

use actix_web::{HttpResponse, web};

use crate::auth;

/// Register the standard CRUD routes of one collection.
/// `/<entity>/new` goes before `/<entity>/{id}` so it is not taken for an id.
macro_rules! crud_routes {
    ($scope:expr, $base:literal, $module:ident) => {
        $scope
            .route($base, web::get().to($module::list))
            .route(concat!($base, "/new"), web::get().to($module::new_form))
            .route($base, web::post().to($module::create))
            .route(concat!($base, "/{id}/edit"), web::get().to($module::edit_form))
            .route(concat!($base, "/{id}"), web::post().to($module::update))
            .route(concat!($base, "/{id}/delete"), web::get().to($module::confirm_delete))
            .route(concat!($base, "/{id}/delete"), web::post().to($module::delete))
    };
}

/// The console's route table. Static files and the fallback 404 are
/// registered by the caller.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        // Public routes
        .route("/login", web::get().to(auth_handlers::login_page))
        .route("/login", web::post().to(auth_handlers::login_submit))
        .route(
            "/",
            web::get().to(|| async { HttpResponse::SeeOther().insert_header(("Location", "/dashboard")).finish() }),
        );

    let protected = web::scope("")
        .wrap(actix_web::middleware::from_fn(auth::middleware::require_auth))
        .route("/dashboard", web::get().to(dashboard::index))
        .route("/logout", web::post().to(auth_handlers::logout));

    let protected = crud_routes!(protected, "/students", student_handlers);
    let protected = crud_routes!(protected, "/teams", team_handlers);
    let protected = crud_routes!(protected, "/programs", program_handlers)
        .route("/programs/{id}/result-status", web::post().to(program_handlers::change_result_status));
    let protected = crud_routes!(protected, "/curbs", curb_handlers)
        .route("/curbs/{id}/programs", web::post().to(curb_handlers::add_program))
        .route("/curbs/{id}/programs/{program_id}/remove", web::post().to(curb_handlers::remove_program));
    let protected = crud_routes!(protected, "/positions", position_handlers);
    let protected = crud_routes!(protected, "/grades", grade_handlers);
    let protected = crud_routes!(protected, "/users", user_handlers);
    let protected = crud_routes!(protected, "/roles", role_handlers);
    let protected = crud_routes!(protected, "/events", event_handlers);
    let protected = crud_routes!(protected, "/news", news_handlers);
    let protected = crud_routes!(protected, "/gallery", gallery_handlers);
    let protected = crud_routes!(protected, "/downloads", download_handlers);

    let protected = protected
        // Judging
        .route("/judgments", web::get().to(judgment_handlers::list))
        .route("/judgments/{id}", web::get().to(judgment_handlers::sheet))
        .route("/judgments/{id}/preview", web::post().to(judgment_handlers::preview))
        .route("/judgments/{id}/submit", web::post().to(judgment_handlers::submit))
        // Results
        .route("/results", web::get().to(result_handlers::list))
        .route("/results/print", web::post().to(result_handlers::print))
        .route("/results/program/{id}", web::get().to(result_handlers::program))
        .route("/results/program/{id}/export", web::get().to(result_handlers::export_csv))
        .route("/results/program/{id}/status", web::post().to(result_handlers::change_status));

    cfg.service(protected);
}
