use std::path::PathBuf;
use std::sync::Arc;
use actix_files::Files;
use actix_session::{storage::CookieSessionStore, Session, SessionMiddleware};
use actix_web::cookie::Key;
use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::http::StatusCode;
use actix_web::{middleware, web, App, HttpResponse, HttpServer, ResponseError};
use chrono::Duration;
use tracing::{debug, error, info, warn};
use crate::export::{export_day, ExportError, ExportFormat, ExportedDocument};
use crate::form::{AddEmployeeRequest, ExportQuery, ProjectionRequest, SelectDayRequest};
use crate::schedule::{DayView, Location, ProjectionError, UnknownDay, UnknownLocation};
use crate::session::SessionRegistry;

pub const SESSION_COOKIE: &str = "scheduler-session";
const WORKSPACE_KEY: &str = "workspace";

/// Produces the downloadable document for a day view
pub trait ExportService: Send + Sync {
    fn export(&self, view: &DayView, format: ExportFormat) -> Result<ExportedDocument, ExportError>;
}

/// Bitmap snapshot wrapped in a PDF or PNG
pub struct SnapshotExport;

impl ExportService for SnapshotExport {
    fn export(&self, view: &DayView, format: ExportFormat) -> Result<ExportedDocument, ExportError> {
        export_day(view, format)
    }
}

pub struct AppState {
    pub sessions: SessionRegistry,
    pub exporter: Arc<dyn ExportService>,
}

impl AppState {
    pub fn new(session_ttl: Duration) -> Self {
        AppState {
            sessions: SessionRegistry::new(session_ttl),
            exporter: Arc::new(SnapshotExport),
        }
    }
}

/// Everything `serve` needs to start listening
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
    pub session_ttl: Duration,
    pub static_dir: PathBuf,
    pub session_key: Key,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Day(#[from] UnknownDay),

    #[error(transparent)]
    Location(#[from] UnknownLocation),

    #[error(transparent)]
    Projection(#[from] ProjectionError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error("session unavailable: {0}")]
    Session(String),

    #[error("export task failed: {0}")]
    Blocking(String),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Day(_) | ApiError::Location(_) | ApiError::Projection(_) => StatusCode::BAD_REQUEST,
            ApiError::Export(_) | ApiError::Session(_) | ApiError::Blocking(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(serde_json::json!({"error": self.to_string()}))
    }
}

// Looks up this browser's workspace id, opening a workspace on first visit
fn workspace_id(session: &Session, state: &AppState) -> Result<String, ApiError> {
    let existing = session
        .get::<String>(WORKSPACE_KEY)
        .map_err(|e| ApiError::Session(e.to_string()))?;
    if let Some(id) = existing {
        return Ok(id);
    }
    let id = state.sessions.open();
    session
        .insert(WORKSPACE_KEY, &id)
        .map_err(|e| ApiError::Session(e.to_string()))?;
    Ok(id)
}

async fn get_schedule(session: Session, state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let id = workspace_id(&session, &state)?;
    let view = state.sessions.with_workspace(&id, |ws| ws.view());
    Ok(HttpResponse::Ok().json(view))
}

async fn select_day(
    req: web::Json<SelectDayRequest>,
    session: Session,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let day = req.day()?;
    let id = workspace_id(&session, &state)?;
    let view = state.sessions.with_workspace(&id, |ws| {
        ws.select_day(day);
        ws.view()
    });
    debug!(%day, "selected day");
    Ok(HttpResponse::Ok().json(view))
}

async fn add_employee(
    req: web::Json<AddEmployeeRequest>,
    session: Session,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let location = req.location()?;
    let id = workspace_id(&session, &state)?;
    let view = state.sessions.with_workspace(&id, |ws| {
        ws.add_employee(location, &req.name);
        ws.view()
    });
    debug!(%location, day = %view.day, "add employee");
    Ok(HttpResponse::Ok().json(view))
}

async fn remove_employee(
    path: web::Path<(String, usize)>,
    session: Session,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let (location, index) = path.into_inner();
    let location: Location = location.parse()?;
    let id = workspace_id(&session, &state)?;
    let view = state.sessions.with_workspace(&id, |ws| {
        ws.remove_employee(location, index);
        ws.view()
    });
    debug!(%location, index, day = %view.day, "remove employee");
    Ok(HttpResponse::Ok().json(view))
}

async fn set_projection(
    req: web::Json<ProjectionRequest>,
    session: Session,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let location = req.location()?;
    let id = workspace_id(&session, &state)?;
    let view = state.sessions.with_workspace(&id, |ws| {
        ws.set_sales_projection(location, &req.value).map(|()| ws.view())
    });
    match view {
        Ok(view) => Ok(HttpResponse::Ok().json(view)),
        Err(e) => {
            warn!(%location, value = %req.value, "rejected sales projection: {}", e);
            Err(e.into())
        }
    }
}

async fn export_schedule(
    query: web::Query<ExportQuery>,
    session: Session,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let format = query.format.unwrap_or_default();
    let id = workspace_id(&session, &state)?;
    let view = state.sessions.with_workspace(&id, |ws| ws.view());

    let exporter = Arc::clone(&state.exporter);
    let outcome = web::block(move || exporter.export(&view, format))
        .await
        .map_err(|e| ApiError::Blocking(e.to_string()))?;

    let document = outcome.map_err(|e| {
        error!(%format, "export failed: {}", e);
        ApiError::from(e)
    })?;

    Ok(HttpResponse::Ok()
        .content_type(document.content_type)
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(document.file_name)],
        })
        .body(document.bytes))
}

async fn index() -> HttpResponse {
    let html = include_str!("../templates/index.html");
    HttpResponse::Ok().content_type("text/html; charset=utf-8").body(html)
}

/// Page and API routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(index))
        .route("/api/schedule", web::get().to(get_schedule))
        .route("/api/day", web::put().to(select_day))
        .route("/api/shifts", web::post().to(add_employee))
        .route("/api/shifts/{location}/{index}", web::delete().to(remove_employee))
        .route("/api/projection", web::put().to(set_projection))
        .route("/api/export", web::get().to(export_schedule));
}

pub fn session_middleware(key: Key) -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name(SESSION_COOKIE.to_string())
        .cookie_secure(false)
        .build()
}

pub async fn start_server(config: ServerConfig) -> std::io::Result<()> {
    let app_state = web::Data::new(AppState::new(config.session_ttl));
    let key = config.session_key;
    let static_dir = config.static_dir;

    info!(bind = %config.bind, port = config.port, "starting web server");
    info!("open http://localhost:{} in a browser", config.port);

    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(session_middleware(key.clone()))
            .wrap(middleware::Logger::default())
            .service(Files::new("/static", static_dir.clone()))
            .configure(configure)
    })
    .bind((config.bind.as_str(), config.port))?
    .run()
    .await
}
