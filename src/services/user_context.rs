use std::future::{Ready, ready};

use actix_web::{FromRequest, HttpRequest, dev::Payload, http::header, web::Data};
use jsonwebtoken::{DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::Config;
use crate::error::AppError;

/// Identity and role live outside this service; the token carries the only
/// facts the engine needs: who is asking and whether they hold the scheduler
/// capability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub papel: Papel,
    pub exp: usize,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Papel {
    /// May create/modify turno and bloqueio definitions.
    Agendador,
    /// May create and cancel their own agendamentos.
    Colaborador,
}

#[derive(Debug, Clone)]
pub struct UserContext {
    pub user_id: Uuid,
    pub papel: Papel,
}

impl UserContext {
    pub fn is_agendador(&self) -> bool {
        self.papel == Papel::Agendador
    }

    pub fn requires_agendador(&self) -> Result<(), AppError> {
        if self.is_agendador() {
            Ok(())
        } else {
            Err(AppError::Forbidden(
                "Apenas o papel agendador pode gerenciar turnos e bloqueios".to_string(),
            ))
        }
    }
}

impl FromRequest for UserContext {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(extract(req))
    }
}

fn extract(req: &HttpRequest) -> Result<UserContext, AppError> {
    let config = req
        .app_data::<Data<Config>>()
        .ok_or_else(|| AppError::internal_server_error_message("Config not available"))?;

    let header_value = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AppError::Unauthorized)?;

    let token = header_value
        .strip_prefix("Bearer ")
        .ok_or(AppError::Unauthorized)?;

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_ref()),
        &Validation::default(),
    )
    .map_err(|e| {
        log::debug!("Token rejected: {}", e);
        AppError::Unauthorized
    })?;

    Ok(UserContext {
        user_id: token_data.claims.sub,
        papel: token_data.claims.papel,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;
    use chrono::NaiveTime;
    use jsonwebtoken::{EncodingKey, Header, encode};

    const SEGREDO: &str = "segredo-de-teste";

    fn config() -> Config {
        Config {
            database_url: "postgres://@localhost:5432/calendario".to_string(),
            jwt_secret: SEGREDO.to_string(),
            host: "127.0.0.1".to_string(),
            port: 8080,
            environment: "test".to_string(),
            hora_abertura: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
            hora_fechamento: NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
        }
    }

    fn token(papel: Papel, secret: &str) -> String {
        let claims = Claims {
            sub: Uuid::new_v4(),
            papel,
            exp: (chrono::Utc::now().timestamp() + 3600) as usize,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_ref()),
        )
        .unwrap()
    }

    fn request(authorization: Option<String>) -> actix_web::HttpRequest {
        let mut req = TestRequest::default().app_data(Data::new(config()));
        if let Some(value) = authorization {
            req = req.insert_header((header::AUTHORIZATION, value));
        }
        req.to_http_request()
    }

    #[test]
    fn token_valido_produz_user_context() {
        let req = request(Some(format!("Bearer {}", token(Papel::Agendador, SEGREDO))));
        let ctx = extract(&req).unwrap();
        assert!(ctx.is_agendador());
        assert!(ctx.requires_agendador().is_ok());
    }

    #[test]
    fn colaborador_nao_gerencia_turnos() {
        let req = request(Some(format!("Bearer {}", token(Papel::Colaborador, SEGREDO))));
        let ctx = extract(&req).unwrap();
        assert!(!ctx.is_agendador());
        assert!(matches!(
            ctx.requires_agendador(),
            Err(AppError::Forbidden(_))
        ));
    }

    #[test]
    fn sem_header_ou_sem_prefixo_bearer_rejeita() {
        assert!(matches!(
            extract(&request(None)),
            Err(AppError::Unauthorized)
        ));
        assert!(matches!(
            extract(&request(Some(token(Papel::Agendador, SEGREDO)))),
            Err(AppError::Unauthorized)
        ));
    }

    #[test]
    fn segredo_errado_rejeita() {
        let req = request(Some(format!(
            "Bearer {}",
            token(Papel::Agendador, "outro-segredo")
        )));
        assert!(matches!(extract(&req), Err(AppError::Unauthorized)));
    }
}
