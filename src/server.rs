use crate::{config::Config, handler::ImageRequestHandler, logger};
use actix_web::{http::StatusCode, web, App, HttpRequest, HttpResponse, HttpServer};
use serde_json::json;

/// Every method on the image route reaches the handler, which answers 405
/// for anything other than POST.
pub fn configure(cfg: &mut web::ServiceConfig, route: &str) {
    cfg.route("/healthz", web::get().to(health))
        .route(route, web::route().to(generate_image));
}

async fn generate_image(
    req: HttpRequest,
    body: web::Bytes,
    handler: web::Data<ImageRequestHandler>,
) -> HttpResponse {
    let response = handler.handle(req.method().as_str(), &body).await;
    let status =
        StatusCode::from_u16(response.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    HttpResponse::build(status).json(response.body)
}

async fn health(handler: web::Data<ImageRequestHandler>) -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "provider": handler.provider_kind(),
        "ready": handler.is_ready(),
    }))
}

pub async fn run(config: Config) -> std::io::Result<()> {
    let handler = web::Data::new(ImageRequestHandler::from_config(&config));
    let route = config.route.clone();

    logger::log_startup_info(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"), &config);

    HttpServer::new(move || {
        App::new()
            .app_data(handler.clone())
            .configure(|cfg| configure(cfg, &route))
    })
    .bind(config.bind_address())?
    .run()
    .await
}
