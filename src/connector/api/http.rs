use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::routing::{get, post};
use axum::Json;
use futures_util::future;
use futures_util::stream::{self, Stream, StreamExt};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::{BirthDetails, Exchange};

use super::container::Container;
use super::controller::{ChartController, ChartView, ChatController};

/// Body of the chat endpoints. `history` uses the front-end exchange shape:
/// `[[user, assistant], ...]`, either half may be null.
#[derive(Debug, Deserialize)]
pub struct ChatBody {
    pub message: String,
    #[serde(default)]
    pub history: Vec<Exchange>,
}

#[derive(Debug, Serialize)]
pub struct ChatReply {
    pub reply: String,
}

#[derive(Debug, Serialize)]
pub struct ChartStatus {
    pub loaded: bool,
    pub status: String,
}

pub fn app(container: Arc<Container>) -> axum::Router {
    axum::Router::new()
        .route("/api/chart", post(generate_chart))
        .route("/api/chart/status", get(chart_status))
        .route("/api/prompts", get(prompts))
        .route("/api/chat", post(chat))
        .route("/api/chat/stream", post(chat_stream))
        .with_state(container)
}

pub async fn serve(container: Arc<Container>, listen: SocketAddr) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .context("bind server listener failed")?;
    info!("astrocompanion listening on http://{}", listen);
    axum::serve(listener, app(container))
        .await
        .context("server terminated with error")
}

async fn generate_chart(
    State(container): State<Arc<Container>>,
    Json(details): Json<BirthDetails>,
) -> Json<ChartView> {
    Json(ChartController::new(&container).generate(&details).await)
}

async fn chart_status(State(container): State<Arc<Container>>) -> Json<ChartStatus> {
    Json(ChartStatus {
        loaded: container.charts().is_loaded().await,
        status: ChartController::new(&container).status_line().await,
    })
}

async fn prompts(State(container): State<Arc<Container>>) -> Json<Vec<String>> {
    Json(ChatController::new(&container).suggested_prompts().await)
}

async fn chat(State(container): State<Arc<Container>>, Json(body): Json<ChatBody>) -> Json<ChatReply> {
    let reply = ChatController::new(&container)
        .send(&body.message, &body.history)
        .await;
    Json(ChatReply { reply })
}

/// Each `data` event carries the whole reply so far; a final `done` event
/// marks the end.
async fn chat_stream(
    State(container): State<Arc<Container>>,
    Json(body): Json<ChatBody>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let replies = ChatController::new(&container)
        .stream(&body.message, &body.history)
        .await;

    let events = replies
        .map(|text| Ok::<_, Infallible>(Event::default().data(text)))
        .chain(stream::once(future::ready(Ok::<_, Infallible>(Event::default()
            .event("done")
            .data("")))));

    Sse::new(events).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(10))
            .text("keepalive"),
    )
}
