use std::{net::TcpListener, sync::Arc};

use actix_cors::Cors;
use actix_web::{
    dev::Server,
    error::InternalError,
    http::{header, StatusCode},
    middleware::Logger,
    web::{self, Data},
    App, HttpServer,
};

use crate::{
    configuration::SearchSettings,
    routes::{default_route, enrich_route, error_response, method_not_allowed, search_route},
    services::{Enricher, SearchProvider},
};

pub fn cors() -> Cors {
    Cors::default()
        .allow_any_origin()
        .send_wildcard()
        .allowed_methods(vec!["POST", "OPTIONS"])
        .allowed_header(header::CONTENT_TYPE)
        .max_age(3600)
}

pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let response = error_response(
            StatusCode::BAD_REQUEST,
            format!("Invalid request body: {}", err),
        );
        InternalError::from_response(err, response).into()
    })
}

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(default_route::health)
        .service(
            web::resource("/search")
                .route(web::post().to(search_route::search))
                .default_service(web::to(method_not_allowed)),
        )
        .service(
            web::resource("/enrich")
                .route(web::post().to(enrich_route::enrich))
                .default_service(web::to(method_not_allowed)),
        );
}

pub fn run(
    listener: TcpListener,
    search_provider: Arc<dyn SearchProvider>,
    enricher: Arc<dyn Enricher>,
    search_settings: SearchSettings,
) -> Result<Server, std::io::Error> {
    let search_provider: Data<dyn SearchProvider> = Data::from(search_provider);
    let enricher: Data<dyn Enricher> = Data::from(enricher);
    let search_settings = Data::new(search_settings);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(cors())
            .wrap(Logger::default())
            .app_data(json_config())
            .app_data(search_provider.clone())
            .app_data(enricher.clone())
            .app_data(search_settings.clone())
            .configure(routes)
    })
    .listen(listener)?
    .run();

    Ok(server)
}
