use actix_web::{middleware, web, App, HttpServer};
use log::info;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use irrigation::{
    api::{
        openapi::ApiDoc,
        routes::{configure, json_config},
    },
    config::PlannerConfig,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = PlannerConfig::from_env();
    let bind_addr = config.bind_addr.clone();
    info!("Irrigation API started at http://{bind_addr}");
    info!("   GET  /api/sprinkler-types");
    info!("   POST /api/zones/validate, /api/clip, /api/placement");
    info!("   POST /api/route, /api/statistics, /api/layout");
    info!("   Swagger UI → http://{bind_addr}/swagger-ui/");
    info!("   OpenAPI spec → http://{bind_addr}/api-docs/openapi.json");
    info!(
        "   Max zone area {} m², {} circle samples",
        config.max_zone_area_m2, config.clip_samples
    );

    let openapi = ApiDoc::openapi();
    let config = web::Data::new(config);
    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .app_data(config.clone())
            .app_data(json_config())
            .configure(configure)
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", openapi.clone()),
            )
    })
    .bind(bind_addr)?
    .run()
    .await
}
