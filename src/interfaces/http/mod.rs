use crate::application::use_cases::index_page::{
    load_manifest, render_index_error, render_index_page,
};
use crate::application::use_cases::table_renderer::{render_table_page, SortLinks};
use crate::application::TableLoader;
use crate::domain::app_config::AppConfig;
use crate::domain::csv::SortState;
use crate::domain::error::AppError;
use crate::infrastructure::fetchers::ResourceFetcher;
use crate::shared::html::{error_paragraph, PageChrome};
use actix_cors::Cors;
use actix_web::http::StatusCode;
use actix_web::{dev::Server, get, web, App, HttpResponse, HttpServer, Responder};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{error, info, warn};

pub struct HttpState {
    pub fetcher: Arc<dyn ResourceFetcher>,
    pub manifest_file: String,
    pub site_title: String,
}

impl HttpState {
    pub fn new(fetcher: Arc<dyn ResourceFetcher>, config: &AppConfig) -> Self {
        Self {
            fetcher,
            manifest_file: config.manifest_file.clone(),
            site_title: config.site_title.clone(),
        }
    }

    /// Fresh chrome per response so the footer timestamp is current
    fn chrome(&self) -> PageChrome {
        PageChrome::new(self.site_title.clone())
    }
}

/// `?sort=<column>&order=<asc|desc>` on a table page
#[derive(Debug, Default, Deserialize)]
pub struct SortQuery {
    pub sort: Option<String>,
    pub order: Option<String>,
}

/// Sort state requested by the query string. Anything unusable is logged
/// and the page falls back to its unsorted order.
pub fn sort_state_from_query(query: &SortQuery, column_count: usize) -> SortState {
    let Some(raw_column) = query.sort.as_deref() else {
        return SortState::unsorted();
    };

    let column_index = match raw_column.trim().parse::<usize>() {
        Ok(column_index) if column_index < column_count => column_index,
        _ => {
            warn!(sort = %raw_column, columns = column_count, "Ignoring invalid sort column");
            return SortState::unsorted();
        }
    };

    match query.order.as_deref().map(str::trim) {
        None | Some("asc") => SortState::ascending(column_index),
        Some("desc") => SortState::descending(column_index),
        Some(other) => {
            warn!(order = %other, "Ignoring invalid sort order");
            SortState::unsorted()
        }
    }
}

/// Status for an error that stopped a table page from loading
pub fn status_for(err: &AppError) -> StatusCode {
    match err {
        AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
        AppError::NotFound(_) => StatusCode::NOT_FOUND,
        AppError::FetchError(_) => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn html_response(status: StatusCode, body: String) -> HttpResponse {
    HttpResponse::build(status)
        .content_type("text/html; charset=utf-8")
        .body(body)
}

#[get("/health")]
async fn health() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

#[get("/")]
async fn index(data: web::Data<HttpState>) -> impl Responder {
    index_response(&data).await
}

#[get("/{page}")]
async fn page(
    data: web::Data<HttpState>,
    path: web::Path<String>,
    query: web::Query<SortQuery>,
) -> impl Responder {
    let page_name = path.into_inner();
    if page_name == "index.html" {
        return index_response(&data).await;
    }

    let Some(stem) = page_name.strip_suffix(".html") else {
        return html_response(
            StatusCode::NOT_FOUND,
            data.chrome()
                .document("Not found", &error_paragraph("No such page."), true),
        );
    };

    let file_name = file_name_for_page(&data, &page_name, stem).await;
    let chrome = data.chrome();

    match TableLoader::new(data.fetcher.clone()).load(&file_name).await {
        Ok(view) => {
            let sort = sort_state_from_query(&query, view.table.column_count());
            let view = view.with_sort(sort);
            info!(file = %file_name, sort = ?sort, "Serving table page");
            html_response(
                StatusCode::OK,
                render_table_page(&view, &SortLinks::Query, &chrome),
            )
        }
        Err(err) => {
            let message = format!("Error loading {}: {}", file_name, err);
            html_response(
                status_for(&err),
                chrome.document(stem, &error_paragraph(&message), true),
            )
        }
    }
}

async fn index_response(data: &HttpState) -> HttpResponse {
    let chrome = data.chrome();
    match load_manifest(&data.fetcher, &data.manifest_file).await {
        Ok(manifest) => html_response(StatusCode::OK, render_index_page(&manifest, &chrome)),
        Err(err) => html_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            render_index_error(&err, &data.manifest_file, &chrome),
        ),
    }
}

/// The manifest entry whose page this is, else `<stem>.csv`
async fn file_name_for_page(data: &HttpState, page_name: &str, stem: &str) -> String {
    match load_manifest(&data.fetcher, &data.manifest_file).await {
        Ok(manifest) => {
            if let Some(entry) = manifest.find_by_page(page_name) {
                return entry.file_name.clone();
            }
        }
        Err(err) => {
            warn!(error = %err, page = %page_name, "Resolving page without manifest");
        }
    }
    format!("{}.csv", stem)
}

/// Routes served by the site; `/health` is registered ahead of the page
/// pattern so it is never read as a page name
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(health).service(index).service(page);
}

pub fn start_server(state: HttpState, host: &str, port: u16) -> std::io::Result<Server> {
    let state = web::Data::new(state);

    let server = HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .app_data(state.clone())
            .configure(configure)
    })
    .bind((host, port))
    .map_err(|err| {
        error!(error = %err, host = %host, port = port, "Failed to bind server");
        err
    })?
    .run();

    info!("Serving CSV files on http://{}:{}", host, port);
    Ok(server)
}
