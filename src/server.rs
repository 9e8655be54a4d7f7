use actix_web::{error::InternalError, web, App, HttpRequest, HttpResponse, HttpServer};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::{
    config::Config,
    context::{AppContext, ConfigurationState},
    error::ThumbError,
    models::{AspectRatio, GenerationRequest, ImageReference, TitlesRequest},
    pipeline::{ImageEdit, ThumbnailService},
};

const FALLBACK_NOTICE: &str = "All image providers failed";

pub struct AppState {
    service: ThumbnailService,
    configuration: ConfigurationState,
}

impl AppState {
    pub fn new(service: ThumbnailService, configuration: ConfigurationState) -> Self {
        Self {
            service,
            configuration,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ThumbnailResponse<'a> {
    image_url: &'a str,
    enhanced_prompt: &'a str,
    provider: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'static str>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct EditRequest {
    /// `data:` URL of the source image.
    image: String,
    operation: String,
    #[serde(default)]
    prompt: Option<String>,
    #[serde(default)]
    aspect_ratio: AspectRatio,
}

#[derive(Deserialize)]
struct AuditRequest {
    image: String,
    #[serde(default)]
    niche: String,
}

#[derive(Deserialize)]
struct HooksRequest {
    topic: String,
    #[serde(default)]
    trigger: String,
}

fn error_body(message: impl Into<String>) -> serde_json::Value {
    json!({ "error": message.into() })
}

fn studio_failure(request_id: &str, what: &str, e: ThumbError) -> HttpResponse {
    match e {
        ThumbError::RequestError(message) => HttpResponse::BadRequest().json(error_body(message)),
        other => {
            log::error!(request_id = request_id; "{} failed: {}", what, other);
            HttpResponse::BadGateway().json(error_body(format!("{} failed", what)))
        }
    }
}

fn studio_unavailable() -> HttpResponse {
    HttpResponse::ServiceUnavailable().json(error_body("Gemini is not configured"))
}

async fn generate_thumbnail(
    state: web::Data<AppState>,
    body: web::Json<GenerationRequest>,
) -> HttpResponse {
    let request_id = Uuid::new_v4().to_string();
    let request_id = request_id.as_str();
    log::info!(request_id = request_id; "POST /generate-thumbnail ({})", body.aspect_ratio);

    match state.service.generate(&body).await {
        Ok(result) => HttpResponse::Ok().json(ThumbnailResponse {
            image_url: &result.image_url,
            enhanced_prompt: &result.enhanced_prompt,
            provider: &result.provider,
            error: result.used_fallback.then_some(FALLBACK_NOTICE),
        }),
        Err(ThumbError::RequestError(message)) => {
            HttpResponse::BadRequest().json(error_body(message))
        }
        Err(e) => {
            log::error!(request_id = request_id; "Thumbnail generation failed: {}", e);
            HttpResponse::InternalServerError().json(error_body("Failed to generate thumbnail"))
        }
    }
}

async fn generate_titles(
    state: web::Data<AppState>,
    body: web::Json<TitlesRequest>,
) -> HttpResponse {
    let request_id = Uuid::new_v4().to_string();
    let request_id = request_id.as_str();
    log::info!(request_id = request_id; "POST /generate-titles ({})", body.language());

    match state.service.titles(&body).await {
        Ok(titles) => HttpResponse::Ok().json(titles),
        Err(ThumbError::RequestError(message)) => {
            HttpResponse::BadRequest().json(error_body(message))
        }
        Err(e) => {
            log::error!(request_id = request_id; "Title generation failed: {}", e);
            HttpResponse::InternalServerError().json(error_body("Failed to generate titles"))
        }
    }
}

async fn studio_edit(state: web::Data<AppState>, body: web::Json<EditRequest>) -> HttpResponse {
    let request_id = Uuid::new_v4().to_string();
    let request_id = request_id.as_str();
    log::info!(request_id = request_id; "POST /edit-image ({})", body.operation);

    let Some(studio) = state.service.studio() else {
        return studio_unavailable();
    };
    let edit = match ImageEdit::parse(&body.operation, body.prompt.as_deref()) {
        Ok(edit) => edit,
        Err(e) => return studio_failure(request_id, "Image edit", e),
    };

    let image = ImageReference::from_src(&body.image);
    match studio.edit(&image, &edit, body.aspect_ratio).await {
        Ok(edited) => HttpResponse::Ok().json(json!({ "imageUrl": edited.as_url() })),
        Err(e) => studio_failure(request_id, "Image edit", e),
    }
}

async fn studio_audit(state: web::Data<AppState>, body: web::Json<AuditRequest>) -> HttpResponse {
    let request_id = Uuid::new_v4().to_string();
    let request_id = request_id.as_str();
    log::info!(request_id = request_id; "POST /audit-thumbnail ({})", body.niche);

    let Some(studio) = state.service.studio() else {
        return studio_unavailable();
    };
    match studio.audit(&ImageReference::from_src(&body.image), &body.niche).await {
        Ok(audit) => HttpResponse::Ok().json(audit),
        Err(e) => studio_failure(request_id, "Thumbnail audit", e),
    }
}

async fn studio_hooks(state: web::Data<AppState>, body: web::Json<HooksRequest>) -> HttpResponse {
    let request_id = Uuid::new_v4().to_string();
    let request_id = request_id.as_str();
    log::info!(request_id = request_id; "POST /visual-hooks");

    let Some(studio) = state.service.studio() else {
        return studio_unavailable();
    };
    match studio.visual_hooks(&body.topic, &body.trigger).await {
        Ok(hooks) => HttpResponse::Ok().json(hooks),
        Err(e) => studio_failure(request_id, "Visual hooks", e),
    }
}

async fn health(state: web::Data<AppState>) -> HttpResponse {
    let body = match &state.configuration {
        ConfigurationState::Ready => json!({ "status": "ok", "missing": [] }),
        ConfigurationState::Pending { missing } => {
            json!({ "status": "configuration_pending", "missing": missing })
        }
    };
    HttpResponse::Ok().json(body)
}

async fn method_not_allowed() -> HttpResponse {
    HttpResponse::MethodNotAllowed().json(error_body("Method Not Allowed"))
}

fn json_error(err: actix_web::error::JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let message = err.to_string();
    InternalError::from_response(err, HttpResponse::BadRequest().json(error_body(message))).into()
}

/// Registers the HTTP routes on an actix `App`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error))
        .service(
            web::resource("/generate-thumbnail")
                .route(web::post().to(generate_thumbnail))
                .default_service(web::to(method_not_allowed)),
        )
        .service(
            web::resource("/generate-titles")
                .route(web::post().to(generate_titles))
                .default_service(web::to(method_not_allowed)),
        )
        .service(web::resource("/edit-image").route(web::post().to(studio_edit)))
        .service(web::resource("/audit-thumbnail").route(web::post().to(studio_audit)))
        .service(web::resource("/visual-hooks").route(web::post().to(studio_hooks)))
        .service(web::resource("/health").route(web::get().to(health)));
}

pub async fn serve(config: Config) -> std::io::Result<()> {
    let service = ThumbnailService::from_config(&config)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
    let configuration = AppContext::new(config.clone()).configuration_state();
    let state = web::Data::new(AppState::new(service, configuration));
    let port = config.port.unwrap_or(8080);

    crate::logger::log_startup_info(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"), port);

    HttpServer::new(move || App::new().app_data(state.clone()).configure(configure))
        .bind(("0.0.0.0", port))?
        .run()
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeminiConfig;
    use crate::pipeline::chain::tests::failing_chain;
    use crate::pipeline::enhancer::tests::{FakeTextProvider, Reply};
    use crate::pipeline::{ProviderChain, StudioTools, Tier, TitleGenerator, STATIC_FALLBACK_URL};
    use crate::providers::GeminiClient;
    use actix_web::{http::StatusCode, test};
    use serde_json::Value;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn state(chain: ProviderChain, titles: TitleGenerator) -> web::Data<AppState> {
        web::Data::new(AppState::new(
            ThumbnailService::new(None, chain, titles),
            ConfigurationState::Pending {
                missing: vec!["SUPABASE_URL".to_string()],
            },
        ))
    }

    #[actix_web::test]
    async fn test_thumbnail_fallback_is_200_with_error_field() {
        let app = test::init_service(
            App::new()
                .app_data(state(failing_chain(), TitleGenerator::new(Vec::new())))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/generate-thumbnail")
            .set_json(json!({ "prompt": "gato astronauta", "aspectRatio": "1:1" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["imageUrl"], STATIC_FALLBACK_URL);
        assert_eq!(body["enhancedPrompt"], "gato astronauta");
        assert_eq!(body["error"], FALLBACK_NOTICE);
    }

    #[actix_web::test]
    async fn test_thumbnail_rejects_empty_prompt_and_bad_json() {
        let app = test::init_service(
            App::new()
                .app_data(state(failing_chain(), TitleGenerator::new(Vec::new())))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/generate-thumbnail")
            .set_json(json!({ "prompt": "  " }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::post()
            .uri("/generate-thumbnail")
            .insert_header(("content-type", "application/json"))
            .set_payload("{\"prompt\": 3")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert!(body["error"].is_string());
    }

    #[actix_web::test]
    async fn test_get_is_method_not_allowed() {
        let app = test::init_service(
            App::new()
                .app_data(state(failing_chain(), TitleGenerator::new(Vec::new())))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::get().uri("/generate-titles").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[actix_web::test]
    async fn test_titles_success_and_failure() {
        let ok_titles = TitleGenerator::new(vec![Tier::new(FakeTextProvider::arc(Reply::Text(
            "```json\n[\"Um\", \"Dois\"]\n```",
        )))]);
        let app = test::init_service(
            App::new()
                .app_data(state(failing_chain(), ok_titles))
                .configure(configure),
        )
        .await;
        let req = test::TestRequest::post()
            .uri("/generate-titles")
            .set_json(json!({ "topic": "finanças", "language": "pt-BR" }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body, json!(["Um", "Dois"]));

        let failing_titles =
            TitleGenerator::new(vec![Tier::new(FakeTextProvider::arc(Reply::Fail))]);
        let app = test::init_service(
            App::new()
                .app_data(state(failing_chain(), failing_titles))
                .configure(configure),
        )
        .await;
        let req = test::TestRequest::post()
            .uri("/generate-titles")
            .set_json(json!({ "topic": "finanças" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Failed to generate titles");
    }

    #[actix_web::test]
    async fn test_health_reports_pending_configuration() {
        let app = test::init_service(
            App::new()
                .app_data(state(failing_chain(), TitleGenerator::new(Vec::new())))
                .configure(configure),
        )
        .await;
        let req = test::TestRequest::get().uri("/health").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["status"], "configuration_pending");
        assert_eq!(body["missing"], json!(["SUPABASE_URL"]));
    }

    #[actix_web::test]
    async fn test_studio_routes_need_gemini() {
        let app = test::init_service(
            App::new()
                .app_data(state(failing_chain(), TitleGenerator::new(Vec::new())))
                .configure(configure),
        )
        .await;
        let req = test::TestRequest::post()
            .uri("/visual-hooks")
            .set_json(json!({ "topic": "finanças" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[actix_web::test]
    async fn test_edit_image_route() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{ "content": { "parts": [
                    { "inlineData": { "mimeType": "image/png", "data": "Y3V0b3V0" } }
                ]}}]
            })))
            .mount(&server)
            .await;

        let gemini = GeminiClient::new(
            reqwest::Client::new(),
            &GeminiConfig::new()
                .with_api_key("k")
                .with_base_url(server.uri()),
        )
        .unwrap();
        let service = ThumbnailService::new(None, failing_chain(), TitleGenerator::new(Vec::new()))
            .with_studio(StudioTools::new(
                gemini.image_model("gemini-2.5-flash-image"),
                gemini.text_model("gemini-2.0-flash"),
            ));
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(AppState::new(service, ConfigurationState::Ready)))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/edit-image")
            .set_json(json!({
                "image": "data:image/png;base64,aGVsbG8=",
                "operation": "remove_background"
            }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["imageUrl"], "data:image/png;base64,Y3V0b3V0");

        let req = test::TestRequest::post()
            .uri("/edit-image")
            .set_json(json!({ "image": "https://img/a.png", "operation": "ab_variant" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::post()
            .uri("/edit-image")
            .set_json(json!({ "image": "data:image/png;base64,aGVsbG8=", "operation": "refine" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
