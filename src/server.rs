//! HTTP host for the page: `GET /`, `POST /` and `GET /health`.

use crate::{
    app::{PoemApp, SessionInput},
    config::AppConfig,
    models::ImageUpload,
    ui::{html, presenter},
};
use actix_multipart::Multipart;
use actix_web::{error, web, App, HttpResponse, HttpServer};
use futures::StreamExt;

/// Shared read-only state. Each request builds its own session from the form.
pub struct ServerState {
    pub app: PoemApp,
    pub max_upload_bytes: usize,
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(index))
        .route("/", web::post().to(submit))
        .route("/health", web::get().to(health));
}

pub async fn run(app: PoemApp, config: &AppConfig) -> std::io::Result<()> {
    let state = web::Data::new(ServerState {
        app,
        max_upload_bytes: config.server.max_upload_bytes,
    });

    HttpServer::new(move || App::new().app_data(state.clone()).configure(configure))
        .bind(config.server.bind_address())?
        .run()
        .await
}

async fn index(state: web::Data<ServerState>) -> HttpResponse {
    let page = state.app.handle(SessionInput::default()).await;
    html_response(&html::render(&page))
}

async fn submit(
    state: web::Data<ServerState>,
    payload: Multipart,
) -> Result<HttpResponse, actix_web::Error> {
    let input = read_form(payload, state.max_upload_bytes).await?;
    let page = state.app.handle(input).await;
    Ok(html_response(&html::render(&page)))
}

async fn health() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

fn html_response(body: &str) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(body.to_string())
}

/// Collects the multipart fields into a session. Unknown fields are ignored.
async fn read_form(
    mut payload: Multipart,
    max_upload_bytes: usize,
) -> Result<SessionInput, actix_web::Error> {
    let mut input = SessionInput::default();

    while let Some(item) = payload.next().await {
        let mut field = item?;
        let name = field.name().to_string();
        let filename = field
            .content_disposition()
            .get_filename()
            .map(str::to_string);

        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk?;
            if bytes.len() + chunk.len() > max_upload_bytes {
                log::warn!("Rejecting upload field {:?} larger than {} bytes", name, max_upload_bytes);
                return Err(error::ErrorPayloadTooLarge(format!(
                    "Uploads are limited to {} MB",
                    max_upload_bytes / (1024 * 1024)
                )));
            }
            bytes.extend_from_slice(&chunk);
        }

        match name.as_str() {
            presenter::FIELD_IMAGE => {
                // Browsers send an empty part when no file was chosen.
                if !bytes.is_empty() {
                    let mut upload = ImageUpload::new(bytes);
                    if let Some(filename) = filename.filter(|f| !f.is_empty()) {
                        upload = upload.with_filename(filename);
                    }
                    input.image = Some(upload);
                }
            }
            presenter::FIELD_API_KEY => input.api_key = text_field(&bytes),
            presenter::FIELD_PROMPT => input.prompt = Some(text_field(&bytes)),
            presenter::FIELD_TEMPERATURE => input.temperature = Some(text_field(&bytes)),
            presenter::FIELD_ACTION => {
                input.generate = text_field(&bytes) == presenter::ACTION_GENERATE
            }
            other => log::debug!("Ignoring unknown form field {:?}", other),
        }
    }

    Ok(input)
}

/// Invalid UTF-8 is replaced rather than rejected, so the page still renders.
fn text_field(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}
