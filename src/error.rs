use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use thiserror::Error;

use crate::handlers::shared::ApiResponse;

/// Request-local scheduling failures. All of these are recoverable by the
/// caller (re-query availability and pick another slot); none are fatal.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AgendaError {
    #[error("Turno malformado: {0}")]
    TurnoMalformado(String),

    #[error("Horário não corresponde a um slot do turno: {0}")]
    SlotInvalido(String),

    #[error("Setor {0} não é elegível para este turno")]
    SetorNaoElegivel(String),

    #[error("O turno não está ativo na data {0}")]
    ForaDaRecorrencia(String),

    #[error("Data/horário bloqueado: {0}")]
    Bloqueado(String),

    #[error("Não há vagas disponíveis para este turno/setor")]
    SemVagas,

    #[error("Agendamento já está cancelado")]
    JaCancelado,

    #[error("Motivo de cancelamento é obrigatório")]
    MotivoObrigatorio,
}

impl AgendaError {
    fn status_code(&self) -> StatusCode {
        match self {
            AgendaError::TurnoMalformado(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AgendaError::SlotInvalido(_)
            | AgendaError::SetorNaoElegivel(_)
            | AgendaError::ForaDaRecorrencia(_)
            | AgendaError::MotivoObrigatorio => StatusCode::BAD_REQUEST,
            AgendaError::Bloqueado(_) | AgendaError::SemVagas | AgendaError::JaCancelado => {
                StatusCode::CONFLICT
            }
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    DatabaseError(sqlx::Error),

    #[error("{0}")]
    Agenda(AgendaError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized access")]
    Unauthorized,

    #[error("Internal server error{}", .0.as_ref().map_or("".to_string(), |s| format!(": {}", s)))]
    InternalServerError(Option<String>),
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Agenda(e) => e.status_code(),
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status_code = self.status_code();
        let error_message = self.to_string();

        if status_code.is_server_error() {
            log::error!(
                "Request failed with status {}: {}",
                status_code,
                error_message
            );
        } else {
            log::debug!("Request rejected ({}): {}", status_code, error_message);
        }

        let response_body = ApiResponse::<()>::error(&error_message);

        HttpResponse::build(status_code).json(response_body)
    }
}

impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> Self {
        log::error!("Database error: {}", error);
        AppError::DatabaseError(error)
    }
}

impl From<AgendaError> for AppError {
    fn from(error: AgendaError) -> Self {
        AppError::Agenda(error)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        log::error!("Anyhow error: {}", error);

        if error.is::<sqlx::Error>() {
            match error.downcast::<sqlx::Error>() {
                Ok(sqlx_err) => return AppError::DatabaseError(sqlx_err),
                Err(original_error) => {
                    return AppError::InternalServerError(Some(original_error.to_string()));
                }
            }
        }

        AppError::InternalServerError(Some(error.to_string()))
    }
}

impl AppError {
    pub fn internal_server_error_message(message: impl Into<String>) -> Self {
        AppError::InternalServerError(Some(message.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falhas_de_agenda_mapeiam_para_os_status_http_corretos() {
        let casos = [
            (AgendaError::TurnoMalformado("x".into()), 422),
            (AgendaError::SlotInvalido("09:30".into()), 400),
            (AgendaError::SetorNaoElegivel("financeiro".into()), 400),
            (AgendaError::ForaDaRecorrencia("2025-01-01".into()), 400),
            (AgendaError::MotivoObrigatorio, 400),
            (AgendaError::Bloqueado("feriado".into()), 409),
            (AgendaError::SemVagas, 409),
            (AgendaError::JaCancelado, 409),
        ];
        for (err, esperado) in casos {
            assert_eq!(
                AppError::from(err.clone()).status_code().as_u16(),
                esperado,
                "{:?}",
                err
            );
        }
    }

    #[test]
    fn corpo_de_erro_segue_o_envelope_da_api() {
        let body = ApiResponse::<()>::error("Não há vagas");
        assert!(!body.success);
        assert!(body.data.is_none());
        assert_eq!(body.message.as_deref(), Some("Não há vagas"));
    }
}
