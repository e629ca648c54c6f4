use actix_web::{HttpResponse, web};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::error::AppError;
use crate::handlers::shared::ApiResponse;
use crate::services::{DisponibilidadeService, UserContext};

#[derive(Debug, Deserialize)]
pub struct DisponibilidadeQuery {
    pub inicio: NaiveDate,
    pub fim: NaiveDate,
    pub setor: Option<String>,
}

pub async fn get_disponibilidade(
    query: web::Query<DisponibilidadeQuery>,
    service: web::Data<DisponibilidadeService>,
    _user_context: UserContext,
) -> Result<HttpResponse, AppError> {
    let dias = service
        .build(query.setor.as_deref(), query.inicio, query.fim)
        .await?;

    Ok(ApiResponse::success(dias))
}
