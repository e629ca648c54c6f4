use actix_web::{HttpResponse, web};
use serde::Deserialize;
use uuid::Uuid;

use crate::database::models::{AgendamentoFilters, AgendamentoInput, ReagendamentoInput};
use crate::database::repositories::AgendamentoRepository;
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;
use crate::services::{AgendamentoService, UserContext};

#[derive(Debug, Deserialize)]
pub struct CancelamentoRequest {
    pub motivo: String,
}

pub async fn create_agendamento(
    input: web::Json<AgendamentoInput>,
    service: web::Data<AgendamentoService>,
    user_context: UserContext,
) -> Result<HttpResponse, AppError> {
    let agendamento = service
        .criar(input.into_inner(), user_context.user_id)
        .await?;

    Ok(ApiResponse::created(agendamento))
}

pub async fn get_agendamentos(
    query: web::Query<AgendamentoFilters>,
    repo: web::Data<AgendamentoRepository>,
    _user_context: UserContext,
) -> Result<HttpResponse, AppError> {
    let agendamentos = repo.list(query.into_inner()).await.map_err(|e| {
        log::error!("Failed to fetch agendamentos: {}", e);
        AppError::from(e)
    })?;

    Ok(ApiResponse::success(agendamentos))
}

pub async fn get_agendamento(
    path: web::Path<Uuid>,
    repo: web::Data<AgendamentoRepository>,
    _user_context: UserContext,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let agendamento = repo
        .find_by_id(id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::NotFound("Agendamento não encontrado".to_string()))?;

    Ok(ApiResponse::success(agendamento))
}

pub async fn cancel_agendamento(
    path: web::Path<Uuid>,
    input: web::Json<CancelamentoRequest>,
    service: web::Data<AgendamentoService>,
    _user_context: UserContext,
) -> Result<HttpResponse, AppError> {
    let agendamento = service.cancelar(path.into_inner(), &input.motivo).await?;

    Ok(ApiResponse::success(agendamento))
}

pub async fn reschedule_agendamento(
    path: web::Path<Uuid>,
    input: web::Json<ReagendamentoInput>,
    service: web::Data<AgendamentoService>,
    _user_context: UserContext,
) -> Result<HttpResponse, AppError> {
    let agendamento = service
        .reagendar(path.into_inner(), input.into_inner())
        .await?;

    Ok(ApiResponse::success(agendamento))
}
