use actix_web::{HttpResponse, web};

use crate::database::repositories::SetorRepository;
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;
use crate::services::UserContext;

pub async fn get_setores(
    setor_repo: web::Data<SetorRepository>,
    _user_context: UserContext,
) -> Result<HttpResponse, AppError> {
    let setores = setor_repo.list_ativos().await.map_err(|e| {
        log::error!("Failed to fetch setores: {}", e);
        AppError::from(e)
    })?;

    Ok(ApiResponse::success(setores))
}
