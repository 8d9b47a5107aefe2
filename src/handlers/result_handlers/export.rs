use actix_session::Session;
use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{HttpResponse, web};
use chrono::Local;
use serde::Deserialize;

use crate::auth::csrf;
use crate::auth::session::{flash_error, require_permission};
use crate::errors::{AppError, render};
use crate::handlers::helpers::{checked_id, redirect, settle};
use crate::models::listing::ListQuery;
use crate::models::program::Program;
use crate::models::result::{BulkResultRequest, ProgramResults, ResultProgram, export_filename, print_sections};
use crate::models::team::Team;
use crate::state::AppState;
use crate::templates_structs::PrintResultsTemplate;

/// The results page filter, echoed back in hidden fields of the print form.
#[derive(Deserialize)]
pub struct PrintForm {
    #[serde(default)]
    pub q: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub stage: String,
    pub csrf_token: String,
}

impl PrintForm {
    fn query(&self) -> ListQuery {
        let keep = |v: &str| Some(v.trim().to_string()).filter(|v| !v.is_empty());
        ListQuery {
            q: keep(&self.q),
            category: keep(&self.category),
            status: keep(&self.status),
            stage: keep(&self.stage),
            ..Default::default()
        }
    }
}

/// GET /results/program/{id}/export
pub async fn export_csv(
    state: web::Data<AppState>,
    session: Session,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "results.view")?;
    let id = checked_id(path)?;
    let api = state.api_for(&session)?;

    let export_path = format!("/results/export/{id}");
    let (file, program) = futures::join!(api.download(&export_path), api.find::<Program>(&id));
    let file = match file {
        Ok(file) => file,
        Err(e) if e.is_unauthorized() => return Err(e.into()),
        Err(e) => {
            log::error!("Exporting results of program {id} failed: {e}");
            flash_error(&session, e.user_message());
            return Ok(redirect(&format!("/results/program/{id}")));
        }
    };

    let filename = export_filename(program.as_ref().ok(), &id);
    log::info!("Exported {} bytes of results as {filename}", file.bytes.len());
    Ok(HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(filename)],
        })
        .body(file.bytes))
}

/// POST /results/print
/// One bulk fetch for every program the filter keeps, rendered as a
/// standalone document.
pub async fn print(
    state: web::Data<AppState>,
    session: Session,
    form: web::Form<PrintForm>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "results.view")?;
    csrf::validate_csrf(&session, &form.csrf_token)?;
    let api = state.api_for(&session)?;

    let (programs, teams) = futures::join!(api.find_all::<Program>(), api.find_all::<Team>());
    let programs = match programs {
        Ok(programs) => programs,
        Err(e) if e.is_unauthorized() => return Err(e.into()),
        Err(e) => {
            log::error!("Loading programs for printing failed: {e}");
            flash_error(&session, e.user_message());
            return Ok(redirect("/results"));
        }
    };
    let mut failure = None;
    let teams = settle("teams", teams, &mut failure)?;

    let query = form.query();
    let program_ids: Vec<String> = query
        .apply(programs.into_iter().map(ResultProgram).collect())
        .into_iter()
        .map(|ResultProgram(p)| p.id)
        .collect();
    if program_ids.is_empty() {
        flash_error(&session, "No programs match the current filters");
        return Ok(redirect("/results"));
    }

    let request = BulkResultRequest { program_ids };
    let bundles: Vec<ProgramResults> = match api.post("/programs/bulk_result", &request).await {
        Ok(bundles) => bundles,
        Err(e) if e.is_unauthorized() => return Err(e.into()),
        Err(e) => {
            log::error!("Bulk result fetch for {} programs failed: {e}", request.program_ids.len());
            flash_error(&session, e.user_message());
            return Ok(redirect("/results"));
        }
    };

    log::info!("Printing results for {} programs", bundles.len());
    render(PrintResultsTemplate {
        app_name: state.app_name.clone(),
        generated_at: Local::now().format("%Y-%m-%d %H:%M").to_string(),
        sections: print_sections(bundles, &teams),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn print_form_drops_blank_filters() {
        let form: PrintForm =
            serde_urlencoded::from_str("q=+song+&category=&status=published&csrf_token=t").unwrap();
        let query = form.query();
        assert_eq!(query.q.as_deref(), Some("song"));
        assert!(query.category.is_none());
        assert_eq!(query.status.as_deref(), Some("published"));
    }
}
