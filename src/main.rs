use actix_cors::Cors;
use actix_web::{App, HttpResponse, HttpServer, Responder, get, middleware::Logger, web};
use anyhow::Result;

use calendario_be::database::{
    init_database,
    repositories::{AgendamentoRepository, BloqueioRepository, SetorRepository, TurnoRepository},
};
use calendario_be::handlers::{agendamentos, bloqueios, disponibilidade, setores, turnos};
use calendario_be::services::{AgendamentoService, DisponibilidadeService};
use calendario_be::Config;

#[get("/")]
async fn hello() -> impl Responder {
    HttpResponse::Ok().body("Calendario API v1.0")
}

#[get("/health")]
async fn health() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "timestamp": chrono::Utc::now()
    }))
}

#[actix_web::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize logger
    env_logger::init();

    println!("🚀 Starting Calendario API server...");

    // Load configuration
    let config = Config::from_env()?;
    println!(
        "📋 Configuration loaded (environment: {})",
        config.environment
    );

    // Initialize database
    let pool = init_database(&config.database_url).await?;
    println!("✅ Database initialized");

    // Initialize repositories and services
    let turno_repository = TurnoRepository::new(pool.clone());
    let agendamento_repository = AgendamentoRepository::new(pool.clone());
    let bloqueio_repository = BloqueioRepository::new(pool.clone());
    let setor_repository = SetorRepository::new(pool.clone());

    let agendamento_service = AgendamentoService::new(
        turno_repository.clone(),
        agendamento_repository.clone(),
        bloqueio_repository.clone(),
    );
    let disponibilidade_service = DisponibilidadeService::new(
        turno_repository.clone(),
        agendamento_repository.clone(),
        bloqueio_repository.clone(),
    );

    let turno_repo_data = web::Data::new(turno_repository);
    let agendamento_repo_data = web::Data::new(agendamento_repository);
    let bloqueio_repo_data = web::Data::new(bloqueio_repository);
    let setor_repo_data = web::Data::new(setor_repository);
    let agendamento_service_data = web::Data::new(agendamento_service);
    let disponibilidade_service_data = web::Data::new(disponibilidade_service);
    let config_data = web::Data::new(config.clone());

    let server_address = config.server_address();
    println!("🌐 Server starting on http://{}", server_address);

    // Start HTTP server
    HttpServer::new(move || {
        App::new()
            .app_data(turno_repo_data.clone())
            .app_data(agendamento_repo_data.clone())
            .app_data(bloqueio_repo_data.clone())
            .app_data(setor_repo_data.clone())
            .app_data(agendamento_service_data.clone())
            .app_data(disponibilidade_service_data.clone())
            .app_data(config_data.clone())
            .wrap(
                Cors::default()
                    .allowed_origin("http://localhost:3000")
                    .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
                    .allowed_headers(vec![
                        "Authorization",
                        "Content-Type",
                        "Accept",
                        "X-Requested-With",
                    ])
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .service(hello)
            .service(health)
            .service(
                web::scope("/api/v1")
                    .service(
                        web::scope("/turnos")
                            .route("", web::post().to(turnos::create_turno))
                            .route("", web::get().to(turnos::get_turnos))
                            .route("/{id}", web::get().to(turnos::get_turno))
                            .route("/{id}", web::put().to(turnos::update_turno))
                            .route("/{id}", web::delete().to(turnos::deactivate_turno)),
                    )
                    .service(
                        web::scope("/agendamentos")
                            .route("", web::post().to(agendamentos::create_agendamento))
                            .route("", web::get().to(agendamentos::get_agendamentos))
                            .route("/{id}", web::get().to(agendamentos::get_agendamento))
                            .route(
                                "/{id}/cancelar",
                                web::post().to(agendamentos::cancel_agendamento),
                            )
                            .route(
                                "/{id}/reagendar",
                                web::post().to(agendamentos::reschedule_agendamento),
                            ),
                    )
                    .service(
                        web::scope("/bloqueios")
                            .route("", web::post().to(bloqueios::create_bloqueio))
                            .route("", web::get().to(bloqueios::get_bloqueios))
                            .route("/{id}", web::delete().to(bloqueios::delete_bloqueio)),
                    )
                    .service(
                        web::scope("/disponibilidade")
                            .route("", web::get().to(disponibilidade::get_disponibilidade)),
                    )
                    .service(
                        web::scope("/setores")
                            .route("", web::get().to(setores::get_setores)),
                    ),
            )
    })
    .bind(&server_address)?
    .run()
    .await
    .map_err(|e| anyhow::anyhow!("Server error: {}", e))
}
