use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One unit of capacity committed in one setor for one 1-hour slot.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Agendamento {
    pub id: Uuid,
    pub turno_id: Uuid,
    pub data: NaiveDate,
    pub horario_inicio: NaiveTime,
    pub horario_fim: NaiveTime,
    pub setor: String,
    pub solicitante: Uuid,
    pub categoria: String,
    pub status: StatusAgendamento,
    pub cancelado_em: Option<NaiveDateTime>,
    pub cancelado_motivo: Option<String>,
    pub criado_em: NaiveDateTime,
    pub atualizado_em: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgendamentoInput {
    pub turno_id: Uuid,
    pub data: NaiveDate,
    pub horario_inicio: NaiveTime,
    pub setor: String,
    pub categoria: String,
}

/// Target of a reschedule. Turno and setor default to the booking's current
/// ones when omitted.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReagendamentoInput {
    pub turno_id: Option<Uuid>,
    pub data: NaiveDate,
    pub horario_inicio: NaiveTime,
    pub setor: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgendamentoFilters {
    pub turno_id: Option<Uuid>,
    pub data: Option<NaiveDate>,
    pub data_inicio: Option<NaiveDate>,
    pub data_fim: Option<NaiveDate>,
    pub status: Option<StatusAgendamento>,
    pub setor: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StatusAgendamento {
    Confirmado,
    Cancelado,
}

impl std::fmt::Display for StatusAgendamento {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StatusAgendamento::Confirmado => write!(f, "confirmado"),
            StatusAgendamento::Cancelado => write!(f, "cancelado"),
        }
    }
}

impl std::str::FromStr for StatusAgendamento {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "confirmado" => Ok(StatusAgendamento::Confirmado),
            "cancelado" => Ok(StatusAgendamento::Cancelado),
            _ => Err(format!("Invalid status: {}", s)),
        }
    }
}

impl sqlx::Type<sqlx::Postgres> for StatusAgendamento {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }
}

impl<'q> sqlx::Encode<'q, sqlx::Postgres> for StatusAgendamento {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<'q, sqlx::Postgres>>::encode_by_ref(&self.to_string(), buf)
    }
}

impl<'r> sqlx::Decode<'r, sqlx::Postgres> for StatusAgendamento {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        s.parse::<StatusAgendamento>().map_err(|e| e.into())
    }
}
