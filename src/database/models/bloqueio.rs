use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A suppression window: blocks bookability regardless of remaining capacity.
/// `setor = None` means the bloqueio applies to every setor.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Bloqueio {
    pub id: Uuid,
    pub data_inicio: NaiveDate,
    pub data_fim: NaiveDate,
    pub dia_inteiro: bool,
    pub hora_inicio: Option<NaiveTime>,
    pub hora_fim: Option<NaiveTime>,
    pub setor: Option<String>,
    pub motivo: MotivoBloqueio,
    pub descricao: Option<String>,
    pub ativo: bool,
    pub criado_por: Option<Uuid>,
    pub criado_em: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BloqueioInput {
    pub data_inicio: NaiveDate,
    pub data_fim: NaiveDate,
    pub dia_inteiro: bool,
    pub hora_inicio: Option<NaiveTime>,
    pub hora_fim: Option<NaiveTime>,
    pub setor: Option<String>,
    pub motivo: MotivoBloqueio,
    pub descricao: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MotivoBloqueio {
    Feriado,
    Manutencao,
    Evento,
    Outro,
}

impl std::fmt::Display for MotivoBloqueio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MotivoBloqueio::Feriado => write!(f, "feriado"),
            MotivoBloqueio::Manutencao => write!(f, "manutencao"),
            MotivoBloqueio::Evento => write!(f, "evento"),
            MotivoBloqueio::Outro => write!(f, "outro"),
        }
    }
}

impl std::str::FromStr for MotivoBloqueio {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "feriado" => Ok(MotivoBloqueio::Feriado),
            "manutencao" => Ok(MotivoBloqueio::Manutencao),
            "evento" => Ok(MotivoBloqueio::Evento),
            "outro" => Ok(MotivoBloqueio::Outro),
            _ => Err(format!("Invalid motivo: {}", s)),
        }
    }
}

impl sqlx::Type<sqlx::Postgres> for MotivoBloqueio {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }
}

impl<'q> sqlx::Encode<'q, sqlx::Postgres> for MotivoBloqueio {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<'q, sqlx::Postgres>>::encode_by_ref(&self.to_string(), buf)
    }
}

impl<'r> sqlx::Decode<'r, sqlx::Postgres> for MotivoBloqueio {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        s.parse::<MotivoBloqueio>().map_err(|e| e.into())
    }
}
