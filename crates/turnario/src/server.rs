use axum::{
    extract::{Query, State},
    response::{Html, Redirect},
    routing::{get, post},
    Form, Json, Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tokio::sync::RwLock;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{debug, info, Level};

use crate::board::{Board, BoardView};
use crate::error::AppError;
use crate::html;
use crate::week::{self, Clock};

/// Application state shared across requests
pub struct AppState {
    pub board: RwLock<Board>,
    pub clock: Box<dyn Clock>,
}

impl AppState {
    pub fn new(board: Board, clock: Box<dyn Clock>) -> Arc<Self> {
        Arc::new(Self {
            board: RwLock::new(board),
            clock,
        })
    }

    fn today(&self) -> NaiveDate {
        self.clock.today()
    }
}

#[derive(Debug, Deserialize)]
pub struct NewPerson {
    name: String,
}

#[derive(Debug, Deserialize)]
pub struct CellRef {
    person: String,
    day: String,
}

#[derive(Debug, Deserialize)]
pub struct CellUpdate {
    person: String,
    day: String,
    #[serde(default)]
    value: String,
}

#[derive(Debug, Deserialize)]
pub struct DraftUpdate {
    #[serde(default)]
    draft: String,
}

#[derive(Debug, Deserialize)]
pub struct WeekQuery {
    offset: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct WeekResponse {
    offset: i64,
    dates: Vec<NaiveDate>,
    columns: Vec<String>,
    range_label: String,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/week/previous", post(previous_week_handler))
        .route("/week/next", post(next_week_handler))
        .route("/people", post(add_person_handler))
        .route("/cells", post(set_cell_handler))
        .route("/editor/open", post(open_editor_handler))
        .route("/editor/save", post(save_editor_handler))
        .route("/editor/cancel", post(cancel_editor_handler))
        .route("/theme", post(theme_handler))
        .route("/api/board", get(board_handler))
        .route("/api/week", get(week_handler))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}

/// Start the web server and run until Ctrl+C or SIGTERM
pub async fn serve(port: u16, state: Arc<AppState>) -> anyhow::Result<()> {
    let app = router(state);

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(address = %addr, "Server running, press Ctrl+C to stop");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped, board discarded");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if signal::ctrl_c().await.is_ok() {
            info!("Received Ctrl+C, shutting down");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// Serve the planner page
async fn index_handler(State(state): State<Arc<AppState>>) -> Result<Html<String>, AppError> {
    let board = state.board.read().await;
    let view = board.view(state.today())?;
    Ok(Html(html::render_page(&view).into_string()))
}

async fn previous_week_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Redirect, AppError> {
    let mut board = state.board.write().await;
    let today = state.today();
    let offset = board.previous_week(today)?;
    debug!(offset = offset, "Moved to previous week");
    board.stale_rows(today)?;
    Ok(Redirect::to("/"))
}

async fn next_week_handler(State(state): State<Arc<AppState>>) -> Result<Redirect, AppError> {
    let mut board = state.board.write().await;
    let today = state.today();
    let offset = board.next_week(today)?;
    debug!(offset = offset, "Moved to next week");
    board.stale_rows(today)?;
    Ok(Redirect::to("/"))
}

async fn add_person_handler(
    State(state): State<Arc<AppState>>,
    Form(form): Form<NewPerson>,
) -> Result<Redirect, AppError> {
    let mut board = state.board.write().await;
    if !board.add_person(&form.name, state.today())? {
        debug!("Ignored blank name");
    }
    Ok(Redirect::to("/"))
}

async fn set_cell_handler(
    State(state): State<Arc<AppState>>,
    Form(form): Form<CellUpdate>,
) -> Redirect {
    let mut board = state.board.write().await;
    board.set_cell(&form.person, &form.day, form.value);
    Redirect::to("/")
}

async fn open_editor_handler(
    State(state): State<Arc<AppState>>,
    Form(form): Form<CellRef>,
) -> Result<Redirect, AppError> {
    let mut board = state.board.write().await;
    board.open_editor(&form.person, &form.day)?;
    Ok(Redirect::to("/"))
}

async fn save_editor_handler(
    State(state): State<Arc<AppState>>,
    Form(form): Form<DraftUpdate>,
) -> Result<Redirect, AppError> {
    let mut board = state.board.write().await;
    board.edit_draft(form.draft)?;
    board.save_editor()?;
    Ok(Redirect::to("/"))
}

async fn cancel_editor_handler(State(state): State<Arc<AppState>>) -> Redirect {
    let mut board = state.board.write().await;
    if let Some(draft) = board.cancel_editor() {
        debug!(person = %draft.person, day = %draft.day, "Note discarded");
    }
    Redirect::to("/")
}

async fn theme_handler(State(state): State<Arc<AppState>>) -> Redirect {
    let mut board = state.board.write().await;
    let theme = board.toggle_theme();
    debug!(theme = theme.as_str(), "Theme toggled");
    Redirect::to("/")
}

/// Return the whole board as JSON
async fn board_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<BoardView>, AppError> {
    let board = state.board.read().await;
    Ok(Json(board.view(state.today())?))
}

/// Return the dates and labels of a week relative to the current one
async fn week_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<WeekQuery>,
) -> Result<Json<WeekResponse>, AppError> {
    let board = state.board.read().await;
    let offset = query.offset.unwrap_or_else(|| board.offset());
    let dates = week::compute_week(state.today(), offset)?;

    Ok(Json(WeekResponse {
        offset,
        dates: dates.to_vec(),
        columns: week::column_labels(&dates, board.config().columns),
        range_label: week::week_range_label(&dates),
    }))
}
