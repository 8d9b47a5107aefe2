use actix_session::SessionExt;
use actix_web::{
    Error, HttpResponse,
    body::MessageBody,
    dev::{ServiceRequest, ServiceResponse},
    middleware::Next,
};

use crate::auth::session::get_token;

/// Gate for every console page except sign-in. A request whose session holds
/// no backend bearer token never reaches a handler (and so never calls the
/// backend); it is sent to the sign-in form instead. Whether the token is
/// still accepted is the backend's call, see `AppError`'s 401 handling.
pub async fn require_auth(
    req: ServiceRequest,
    next: Next<impl MessageBody + 'static>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    let signed_in = get_token(&req.get_session()).is_some_and(|token| !token.trim().is_empty());
    if signed_in {
        return next.call(req).await.map(|res| res.map_into_left_body());
    }

    log::debug!("No backend token for {}, sending to sign-in", req.path());
    let to_login = HttpResponse::SeeOther().insert_header(("Location", "/login")).finish();
    Ok(req.into_response(to_login).map_into_right_body())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_session::{Session, SessionMiddleware, storage::CookieSessionStore};
    use actix_web::cookie::Key;
    use actix_web::http::StatusCode;
    use actix_web::{App, test, web};

    #[actix_web::test]
    async fn pages_need_a_backend_token() {
        let app = test::init_service(
            App::new()
                .wrap(SessionMiddleware::builder(CookieSessionStore::default(), Key::generate()).cookie_secure(false).build())
                .route(
                    "/sign-in-as",
                    web::get().to(|session: Session, token: web::Query<std::collections::HashMap<String, String>>| async move {
                        session.insert("api_token", token.get("token").cloned().unwrap_or_default()).unwrap();
                        HttpResponse::Ok().finish()
                    }),
                )
                .service(
                    web::scope("/console")
                        .wrap(actix_web::middleware::from_fn(require_auth))
                        .route("", web::get().to(|| async { HttpResponse::Ok().body("dashboard") })),
                ),
        )
        .await;

        let res = test::call_service(&app, test::TestRequest::get().uri("/console").to_request()).await;
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(res.headers().get("Location").unwrap(), "/login");

        for (token, expected) in [("", StatusCode::SEE_OTHER), ("jwt-abc", StatusCode::OK)] {
            let res = test::call_service(&app, test::TestRequest::get().uri(&format!("/sign-in-as?token={token}")).to_request()).await;
            let cookie = res.response().cookies().next().unwrap().into_owned();
            let res = test::call_service(&app, test::TestRequest::get().uri("/console").cookie(cookie).to_request()).await;
            assert_eq!(res.status(), expected, "token {token:?}");
        }
    }
}
