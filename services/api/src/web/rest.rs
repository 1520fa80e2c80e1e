//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the REST API endpoints and the master
//! definition for the OpenAPI specification. Each sidebar destination of the
//! frontend (Home, Journal, Focus Timer, Mood History) maps to one route group.

use crate::web::middleware::expired_session_cookie;
use crate::web::state::{AppState, CurrentSession};
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Json},
    Extension,
};
use chrono::{DateTime, Utc};
use mindreflect_core::{
    domain::{JournalEntry, Mood},
    history::{MoodHistory, NO_HISTORY_MESSAGE, SCALE_NOTE},
    journal::{submit_entry, JournalError, NO_ENTRIES_MESSAGE, SUBMITTED_NOTICE},
    timer::{FocusTimer, Tick, REFRESH_INTERVAL_MS},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, warn};
use utoipa::{OpenApi, ToSchema};

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        health_handler,
        home_handler,
        journal_handler,
        submit_entry_handler,
        timer_handler,
        start_timer_handler,
        pause_timer_handler,
        resume_timer_handler,
        reset_timer_handler,
        history_handler,
        end_session_handler,
    ),
    components(
        schemas(
            ErrorResponse, HomeResponse, Destination, JournalPageResponse, JournalEntryView,
            SubmitEntryRequest, SubmitEntryResponse, SentimentView, TimerSettingsRequest,
            TimerResponse, HistoryResponse, HistoryRowView, ChartPointView,
        )
    ),
    tags(
        (name = "MindReflect API", description = "Journaling, focus timer and mood history endpoints.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// API Response and Payload Structs
//=========================================================================================

/// Body of every non-2xx response.
#[derive(Serialize, Deserialize, ToSchema, Debug)]
pub struct ErrorResponse {
    pub message: String,
}

type HandlerResult<T> = Result<T, (StatusCode, Json<ErrorResponse>)>;

fn reject(status: StatusCode, message: impl Into<String>) -> (StatusCode, Json<ErrorResponse>) {
    (
        status,
        Json(ErrorResponse {
            message: message.into(),
        }),
    )
}

#[derive(Serialize, Deserialize, ToSchema, Debug)]
pub struct Destination {
    pub name: String,
    pub path: String,
}

#[derive(Serialize, Deserialize, ToSchema, Debug)]
pub struct HomeResponse {
    pub title: String,
    pub tagline: String,
    pub welcome: String,
    pub destinations: Vec<Destination>,
}

#[derive(Serialize, Deserialize, ToSchema, Debug)]
pub struct JournalEntryView {
    /// Local display time, e.g. `Mar 04, 2025 21:07:33`.
    pub timestamp: String,
    pub created_at: DateTime<Utc>,
    pub mood: String,
    pub sentiment: String,
    pub score: f64,
}

impl From<&JournalEntry> for JournalEntryView {
    fn from(entry: &JournalEntry) -> Self {
        Self {
            timestamp: entry.timestamp.clone(),
            created_at: entry.created_at,
            mood: entry.mood.to_string(),
            sentiment: entry.sentiment.to_string(),
            score: entry.score,
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema, Debug)]
pub struct JournalPageResponse {
    pub moods: Vec<String>,
    pub default_mood: String,
    /// Newest first.
    pub entries: Vec<JournalEntryView>,
    pub message: Option<String>,
}

#[derive(Serialize, Deserialize, ToSchema, Debug)]
pub struct SubmitEntryRequest {
    pub text: String,
    /// One of the moods listed on the journal page; defaults to `Okay`.
    pub mood: Option<String>,
}

#[derive(Serialize, Deserialize, ToSchema, Debug)]
pub struct SentimentView {
    pub label: String,
    pub score: f64,
    /// `LABEL (score)` as shown under the form.
    pub summary: String,
}

#[derive(Serialize, Deserialize, ToSchema, Debug)]
pub struct SubmitEntryResponse {
    pub notice: String,
    pub entry: JournalEntryView,
    pub sentiment: SentimentView,
    pub coaching_message: Option<String>,
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Default)]
pub struct TimerSettingsRequest {
    #[serde(default)]
    pub focus_minutes: Option<u32>,
}

#[derive(Serialize, Deserialize, ToSchema, Debug)]
pub struct TimerResponse {
    /// `idle`, `running`, `paused` or `expired`.
    pub status: String,
    pub remaining_seconds: u32,
    /// Remaining time as `MM:SS`.
    pub display: String,
    pub focus_minutes: u32,
    pub notice: Option<String>,
    pub refresh_interval_ms: u64,
}

impl TimerResponse {
    fn snapshot(timer: &FocusTimer, notice: Option<&str>) -> Self {
        Self {
            status: timer.status().as_str().to_string(),
            remaining_seconds: timer.remaining_seconds(),
            display: timer.display(),
            focus_minutes: timer.focus_minutes(),
            notice: notice.map(str::to_string),
            refresh_interval_ms: REFRESH_INTERVAL_MS,
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema, Debug)]
pub struct HistoryRowView {
    pub timestamp: String,
    pub created_at: DateTime<Utc>,
    pub mood: String,
    pub score: u8,
}

#[derive(Serialize, Deserialize, ToSchema, Debug)]
pub struct ChartPointView {
    pub timestamp: String,
    pub score: u8,
}

#[derive(Serialize, Deserialize, ToSchema, Debug)]
pub struct HistoryResponse {
    pub scale_note: String,
    pub message: Option<String>,
    /// Newest first.
    pub table: Vec<HistoryRowView>,
    /// In the order entries were written.
    pub chart: Vec<ChartPointView>,
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// Liveness probe.
#[utoipa::path(get, path = "/health", responses((status = 200, description = "Service is up")))]
pub async fn health_handler() -> StatusCode {
    StatusCode::OK
}

/// Landing page content and sidebar navigation.
#[utoipa::path(
    get,
    path = "/home",
    responses((status = 200, description = "Home page content", body = HomeResponse))
)]
pub async fn home_handler() -> Json<HomeResponse> {
    let destinations = [
        ("Home", "/home"),
        ("Journal", "/journal"),
        ("Focus Timer", "/timer"),
        ("Mood History", "/history"),
    ]
    .into_iter()
    .map(|(name, path)| Destination {
        name: name.to_string(),
        path: path.to_string(),
    })
    .collect();

    Json(HomeResponse {
        title: "MindReflect".to_string(),
        tagline: "Reflect. Refine. Refocus.".to_string(),
        welcome: "Welcome to your personal space to reflect, recharge, and realign your focus.\n\n\
                  Start journaling, focusing, or reflecting by using the sidebar."
            .to_string(),
        destinations,
    })
}

/// The journal page: available moods and past entries, newest first.
#[utoipa::path(
    get,
    path = "/journal",
    responses((status = 200, description = "Journal page content", body = JournalPageResponse))
)]
pub async fn journal_handler(
    Extension(session): Extension<CurrentSession>,
) -> Json<JournalPageResponse> {
    let context = session.context.lock().await;
    let entries: Vec<JournalEntryView> = context
        .entries
        .newest_first()
        .map(JournalEntryView::from)
        .collect();
    let message = entries.is_empty().then(|| NO_ENTRIES_MESSAGE.to_string());

    Json(JournalPageResponse {
        moods: Mood::ALL.iter().map(ToString::to_string).collect(),
        default_mood: Mood::default().to_string(),
        entries,
        message,
    })
}

/// Submit a journal entry.
///
/// Runs sentiment analysis and coaching generation, then stores the entry in
/// the caller's session. Blank text is rejected with a warning and nothing is stored.
#[utoipa::path(
    post,
    path = "/journal/entries",
    request_body = SubmitEntryRequest,
    responses(
        (status = 201, description = "Entry stored", body = SubmitEntryResponse),
        (status = 400, description = "Blank text or unknown mood", body = ErrorResponse),
        (status = 502, description = "Sentiment classifier failed", body = ErrorResponse)
    )
)]
pub async fn submit_entry_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(session): Extension<CurrentSession>,
    Json(req): Json<SubmitEntryRequest>,
) -> HandlerResult<impl IntoResponse> {
    let mood = match req.mood.as_deref() {
        Some(raw) => raw
            .parse::<Mood>()
            .map_err(|e| reject(StatusCode::BAD_REQUEST, e.to_string()))?,
        None => Mood::default(),
    };

    let mut context = session.context.lock().await;
    let result = submit_entry(
        &mut context.entries,
        &req.text,
        mood,
        Utc::now(),
        app_state.sentiment_adapter.as_ref(),
        app_state.coaching_adapter.as_ref(),
    )
    .await;

    match result {
        Ok((outcome, coaching_error)) => {
            if let Some(e) = coaching_error {
                error!("Coaching generation failed for session {}: {:?}", session.id, e);
            }
            info!(
                "Stored entry #{} for session {} ({} / {})",
                context.entries.len(),
                session.id,
                outcome.entry.mood,
                outcome.sentiment.label
            );

            let score = outcome.sentiment.rounded_score();
            let response = SubmitEntryResponse {
                notice: SUBMITTED_NOTICE.to_string(),
                entry: JournalEntryView::from(&outcome.entry),
                sentiment: SentimentView {
                    label: outcome.sentiment.label.to_string(),
                    score,
                    summary: format!("{} ({})", outcome.sentiment.label, score),
                },
                coaching_message: outcome.coaching_message,
            };
            Ok((StatusCode::CREATED, Json(response)))
        }
        Err(JournalError::EmptyEntry) => {
            warn!("Rejected blank journal entry for session {}", session.id);
            Err(reject(StatusCode::BAD_REQUEST, JournalError::EmptyEntry.to_string()))
        }
        Err(JournalError::Sentiment(e)) => {
            error!("Sentiment analysis failed: {:?}", e);
            Err(reject(
                StatusCode::BAD_GATEWAY,
                "Sentiment analysis is unavailable right now",
            ))
        }
    }
}

/// Current timer state. Clients poll this about once a second; each call
/// advances the countdown.
#[utoipa::path(
    get,
    path = "/timer",
    responses((status = 200, description = "Timer state", body = TimerResponse))
)]
pub async fn timer_handler(Extension(session): Extension<CurrentSession>) -> Json<TimerResponse> {
    let mut context = session.context.lock().await;
    let tick = context.timer.tick(Utc::now());
    log_completion(&session, tick);
    Json(TimerResponse::snapshot(&context.timer, tick.notice()))
}

fn log_completion(session: &CurrentSession, tick: Tick) {
    if tick.completed {
        info!("Focus timer finished for session {}", session.id);
    }
}

/// Start (or restart) the countdown, optionally changing its length.
/// The body may be omitted.
#[utoipa::path(
    post,
    path = "/timer/start",
    request_body(content = TimerSettingsRequest, description = "Optional; the body may be omitted"),
    responses(
        (status = 200, description = "Timer started", body = TimerResponse),
        (status = 400, description = "Focus minutes out of range", body = ErrorResponse)
    )
)]
pub async fn start_timer_handler(
    Extension(session): Extension<CurrentSession>,
    body: Option<Json<TimerSettingsRequest>>,
) -> HandlerResult<Json<TimerResponse>> {
    let req = body.map(|Json(req)| req).unwrap_or_default();
    let mut context = session.context.lock().await;
    if let Some(minutes) = req.focus_minutes {
        context
            .timer
            .set_focus_minutes(minutes)
            .map_err(|e| reject(StatusCode::BAD_REQUEST, e.to_string()))?;
    }
    context.timer.start(Utc::now());
    Ok(Json(TimerResponse::snapshot(&context.timer, None)))
}

/// Pause a running countdown. No effect otherwise.
#[utoipa::path(
    post,
    path = "/timer/pause",
    responses((status = 200, description = "Timer state", body = TimerResponse))
)]
pub async fn pause_timer_handler(
    Extension(session): Extension<CurrentSession>,
) -> Json<TimerResponse> {
    let mut context = session.context.lock().await;
    let now = Utc::now();
    // A countdown that ran out before the pause arrived still reports completion.
    let tick = context.timer.tick(now);
    log_completion(&session, tick);
    context.timer.pause(now);
    Json(TimerResponse::snapshot(&context.timer, tick.notice()))
}

/// Resume a paused countdown. No effect otherwise.
#[utoipa::path(
    post,
    path = "/timer/resume",
    responses((status = 200, description = "Timer state", body = TimerResponse))
)]
pub async fn resume_timer_handler(
    Extension(session): Extension<CurrentSession>,
) -> Json<TimerResponse> {
    let mut context = session.context.lock().await;
    context.timer.resume(Utc::now());
    Json(TimerResponse::snapshot(&context.timer, None))
}

/// Stop the countdown and refill it, optionally changing its length.
/// The body may be omitted.
#[utoipa::path(
    post,
    path = "/timer/reset",
    request_body(content = TimerSettingsRequest, description = "Optional; the body may be omitted"),
    responses(
        (status = 200, description = "Timer reset", body = TimerResponse),
        (status = 400, description = "Focus minutes out of range", body = ErrorResponse)
    )
)]
pub async fn reset_timer_handler(
    Extension(session): Extension<CurrentSession>,
    body: Option<Json<TimerSettingsRequest>>,
) -> HandlerResult<Json<TimerResponse>> {
    let req = body.map(|Json(req)| req).unwrap_or_default();
    let mut context = session.context.lock().await;
    if let Some(minutes) = req.focus_minutes {
        context
            .timer
            .set_focus_minutes(minutes)
            .map_err(|e| reject(StatusCode::BAD_REQUEST, e.to_string()))?;
    }
    context.timer.reset();
    Ok(Json(TimerResponse::snapshot(&context.timer, None)))
}

/// Mood scores for every entry: a table sorted newest first and a chart
/// series in submission order.
#[utoipa::path(
    get,
    path = "/history",
    responses((status = 200, description = "Mood history", body = HistoryResponse))
)]
pub async fn history_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(session): Extension<CurrentSession>,
) -> Json<HistoryResponse> {
    let context = session.context.lock().await;
    let history = MoodHistory::build(context.entries.entries(), &app_state.score_cache);

    let table = history
        .table()
        .into_iter()
        .map(|row| HistoryRowView {
            timestamp: row.timestamp,
            created_at: row.created_at,
            mood: row.mood.to_string(),
            score: row.score,
        })
        .collect();
    let chart = history
        .chart()
        .map(|row| ChartPointView {
            timestamp: row.timestamp.clone(),
            score: row.score,
        })
        .collect();

    Json(HistoryResponse {
        scale_note: SCALE_NOTE.to_string(),
        message: history.is_empty().then(|| NO_HISTORY_MESSAGE.to_string()),
        table,
        chart,
    })
}

/// End the caller's session, discarding its entries and timer.
#[utoipa::path(
    delete,
    path = "/session",
    responses((status = 204, description = "Session ended"))
)]
pub async fn end_session_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(session): Extension<CurrentSession>,
) -> impl IntoResponse {
    if app_state.sessions.remove(session.id).await {
        let age = Utc::now() - session.context.lock().await.created_at;
        info!("Ended session {} after {} minute(s)", session.id, age.num_minutes());
    }
    (
        StatusCode::NO_CONTENT,
        [(header::SET_COOKIE, expired_session_cookie())],
    )
}
