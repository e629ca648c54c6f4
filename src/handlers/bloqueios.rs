use actix_web::{HttpResponse, web};
use uuid::Uuid;

use crate::database::models::BloqueioInput;
use crate::database::repositories::bloqueio::{BloqueioFilters, BloqueioRepository};
use crate::database::repositories::SetorRepository;
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;
use crate::scheduling::validacao::validar_bloqueio;
use crate::services::UserContext;

pub async fn create_bloqueio(
    input: web::Json<BloqueioInput>,
    bloqueio_repo: web::Data<BloqueioRepository>,
    setor_repo: web::Data<SetorRepository>,
    user_context: UserContext,
) -> Result<HttpResponse, AppError> {
    user_context.requires_agendador()?;

    let input = input.into_inner();
    validar_bloqueio(&input)?;
    if let Some(setor) = &input.setor {
        if setor_repo
            .find_by_slug(setor)
            .await
            .map_err(AppError::from)?
            .is_none()
        {
            return Err(AppError::BadRequest(format!("Setor desconhecido: {}", setor)));
        }
    }

    let bloqueio = bloqueio_repo
        .create_bloqueio(input, Some(user_context.user_id))
        .await
        .map_err(|e| {
            log::error!("Failed to create bloqueio: {}", e);
            AppError::from(e)
        })?;

    Ok(ApiResponse::created(bloqueio))
}

pub async fn get_bloqueios(
    query: web::Query<BloqueioFilters>,
    bloqueio_repo: web::Data<BloqueioRepository>,
    _user_context: UserContext,
) -> Result<HttpResponse, AppError> {
    let bloqueios = bloqueio_repo.list_ativos(query.into_inner()).await.map_err(|e| {
        log::error!("Failed to fetch bloqueios: {}", e);
        AppError::from(e)
    })?;

    Ok(ApiResponse::success(bloqueios))
}

/// No update-in-place for bloqueios: delete and recreate.
pub async fn delete_bloqueio(
    path: web::Path<Uuid>,
    bloqueio_repo: web::Data<BloqueioRepository>,
    user_context: UserContext,
) -> Result<HttpResponse, AppError> {
    user_context.requires_agendador()?;

    let id = path.into_inner();
    let removed = bloqueio_repo.delete_bloqueio(id).await.map_err(|e| {
        log::error!("Failed to delete bloqueio {}: {}", id, e);
        AppError::from(e)
    })?;

    if !removed {
        return Err(AppError::NotFound("Bloqueio não encontrado".to_string()));
    }

    Ok(ApiResponse::<()>::success_with_message(
        None,
        "Bloqueio removido",
    ))
}
