use actix_cors::Cors;
use actix_web::middleware::Compress;
use actix_web::{http::header, web, App, HttpServer};
use actix_web_prometheus::PrometheusMetricsBuilder;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

pub mod config;
pub mod pdf;
pub mod relatorio;

pub use crate::relatorio::handlers::AppState;

#[derive(Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub timestamp: String,
}

impl ErrorResponse {
    pub fn new(error_type: &str, message: &str) -> Self {
        Self {
            error: error_type.to_string(),
            message: message.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn bad_request(message: &str) -> Self {
        Self::new("BadRequest", message)
    }

    pub fn internal_error(message: &str) -> Self {
        Self::new("InternalServerError", message)
    }
}

pub async fn run() -> std::io::Result<()> {
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info");
    }
    env_logger::init();

    #[derive(OpenApi)]
    #[openapi(
        paths(
            crate::relatorio::handlers::generate_pdf,
            crate::relatorio::handlers::test_pdf
        ),
        components(
            schemas(
                relatorio::models::GeneratePdfRequest,
                relatorio::models::TipoRelatorio,
                relatorio::models::Foto,
                relatorio::models::QuantitativoItem,
                relatorio::models::Servico,
                relatorio::models::Secao,
                relatorio::models::MutiraoRelatorio,
                relatorio::models::EvidenciasRelatorio,
                relatorio::models::RotineirosRelatorio,
                relatorio::models::MonumentosRelatorio,
                ErrorResponse,
            )
        ),
        tags(
            (name = "Relatórios", description = "Geração de relatórios de zeladoria em PDF.")
        )
    )]
    struct ApiDoc;

    dotenvy::dotenv().ok(); // Load .env file
    let config = match config::Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Configuração inválida. Verifique as variáveis de ambiente. Erro: {}", e);
            std::process::exit(1);
        }
    };

    let branding = Arc::new(pdf::branding::Branding::new(
        config.diretorio_estatico.clone(),
    ));
    let renderer = pdf::montar_renderer(config.renderer, branding);
    let fotos: Arc<dyn pdf::images::FotoFonte> =
        match pdf::images::HttpFotoFonte::new(config.timeout_fotos) {
            Ok(fonte) => Arc::new(fonte),
            Err(e) => {
                log::error!("Falha ao criar o cliente HTTP de fotos: {}", e);
                std::process::exit(1);
            }
        };
    let app_state = web::Data::new(AppState { renderer, fotos });

    let prometheus = PrometheusMetricsBuilder::new("zeladoria_server")
        .endpoint("/metrics")
        .build()
        .expect("Failed to create Prometheus metrics middleware");

    log::info!(
        "Starting server at http://{}:{} (renderer: {:?})",
        config.host,
        config.porta,
        config.renderer
    );

    let diretorio_estatico = config.diretorio_estatico.clone();

    HttpServer::new(move || {
        let app_state = app_state.clone();
        let prometheus = prometheus.clone();
        let cors = Cors::default()
            .allowed_origin("http://localhost:3000")
            .allowed_origin("http://localhost:5173")
            .allowed_origin("http://localhost:8080")
            .allowed_origin("http://127.0.0.1:8080")
            .allowed_methods(vec!["GET", "POST", "OPTIONS"])
            .allowed_headers(vec![
                header::AUTHORIZATION,
                header::ACCEPT,
                header::CONTENT_TYPE,
            ])
            .max_age(3600);

        App::new()
            .wrap(Compress::default())
            .wrap(prometheus)
            .wrap(cors)
            .app_data(app_state)
            .service(
                web::scope("/api")
                    .service(
                        web::resource("/generate-pdf")
                            .route(web::post().to(relatorio::handlers::generate_pdf)),
                    )
                    .service(
                        web::resource("/test-pdf")
                            .route(web::get().to(relatorio::handlers::test_pdf)),
                    ),
            )
            .service(actix_files::Files::new("/static", diretorio_estatico.clone()))
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
    })
    .backlog(8192)
    .keep_alive(actix_web::http::KeepAlive::Os)
    .bind((config.host.as_str(), config.porta))?
    .run()
    .await
}
