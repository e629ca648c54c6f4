use actix_web::{HttpResponse, web};
use uuid::Uuid;

use crate::config::Config;
use crate::database::models::TurnoInput;
use crate::database::repositories::{SetorRepository, TurnoRepository};
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;
use crate::scheduling::validacao::validar_turno;
use crate::services::UserContext;

pub async fn create_turno(
    input: web::Json<TurnoInput>,
    turno_repo: web::Data<TurnoRepository>,
    setor_repo: web::Data<SetorRepository>,
    config: web::Data<Config>,
    user_context: UserContext,
) -> Result<HttpResponse, AppError> {
    user_context.requires_agendador()?;

    let input = input.into_inner();
    validar_turno(&input, config.hora_abertura, config.hora_fechamento)?;
    validar_setores(&input, &setor_repo).await?;

    let turno = turno_repo
        .create_turno(input, Some(user_context.user_id))
        .await
        .map_err(|e| {
            log::error!("Failed to create turno: {}", e);
            AppError::from(e)
        })?;

    Ok(ApiResponse::created(turno))
}

pub async fn get_turnos(
    turno_repo: web::Data<TurnoRepository>,
    _user_context: UserContext,
) -> Result<HttpResponse, AppError> {
    let turnos = turno_repo.list_ativos().await.map_err(|e| {
        log::error!("Failed to fetch turnos: {}", e);
        AppError::from(e)
    })?;

    Ok(ApiResponse::success(turnos))
}

pub async fn get_turno(
    path: web::Path<Uuid>,
    turno_repo: web::Data<TurnoRepository>,
    _user_context: UserContext,
) -> Result<HttpResponse, AppError> {
    let turno_id = path.into_inner();
    let turno = turno_repo
        .find_by_id(turno_id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::NotFound("Turno não encontrado".to_string()))?;

    Ok(ApiResponse::success(turno))
}

pub async fn update_turno(
    path: web::Path<Uuid>,
    input: web::Json<TurnoInput>,
    turno_repo: web::Data<TurnoRepository>,
    setor_repo: web::Data<SetorRepository>,
    config: web::Data<Config>,
    user_context: UserContext,
) -> Result<HttpResponse, AppError> {
    user_context.requires_agendador()?;

    let input = input.into_inner();
    validar_turno(&input, config.hora_abertura, config.hora_fechamento)?;
    validar_setores(&input, &setor_repo).await?;

    let turno_id = path.into_inner();
    let turno = turno_repo
        .update_turno(turno_id, input)
        .await
        .map_err(|e| {
            log::error!("Failed to update turno {}: {}", turno_id, e);
            AppError::from(e)
        })?
        .ok_or_else(|| AppError::NotFound("Turno não encontrado".to_string()))?;

    Ok(ApiResponse::success(turno))
}

/// Soft delete: the turno stays referenceable by its booking history.
pub async fn deactivate_turno(
    path: web::Path<Uuid>,
    turno_repo: web::Data<TurnoRepository>,
    user_context: UserContext,
) -> Result<HttpResponse, AppError> {
    user_context.requires_agendador()?;

    let turno_id = path.into_inner();
    let removed = turno_repo.deactivate(turno_id).await.map_err(|e| {
        log::error!("Failed to deactivate turno {}: {}", turno_id, e);
        AppError::from(e)
    })?;

    if !removed {
        return Err(AppError::NotFound("Turno não encontrado".to_string()));
    }

    Ok(ApiResponse::<()>::success_with_message(
        None,
        "Turno desativado",
    ))
}

/// Every eligible setor must exist in the org catalogue.
async fn validar_setores(input: &TurnoInput, setor_repo: &SetorRepository) -> Result<(), AppError> {
    for vagas_setor in &input.setores {
        if setor_repo
            .find_by_slug(&vagas_setor.setor)
            .await
            .map_err(AppError::from)?
            .is_none()
        {
            return Err(AppError::BadRequest(format!(
                "Setor desconhecido: {}",
                vagas_setor.setor
            )));
        }
    }
    Ok(())
}
