use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A recurring availability template for the calendar. The concrete
/// occurrences (turno x date) are derived on demand, never materialized.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Turno {
    pub id: Uuid,
    pub hora_inicio: NaiveTime,
    pub hora_fim: NaiveTime,
    pub tipo_recorrencia: TipoRecorrencia,
    pub data_inicio: Option<NaiveDate>,
    pub data_fim: Option<NaiveDate>,
    /// Weekday numbers, 0=domingo..6=sábado. Required for custom recurrence.
    pub dias_semana: Option<Vec<i16>>,
    pub cor: String,
    pub ativo: bool,
    /// Eligible setores with their per-setor capacity.
    pub setores: Vec<VagasSetor>,
    pub criado_por: Option<Uuid>,
    pub criado_em: NaiveDateTime,
    pub atualizado_em: NaiveDateTime,
}

impl Turno {
    /// Configured capacity for a setor, or None when the setor is not eligible.
    pub fn vagas_para(&self, setor: &str) -> Option<i32> {
        self.setores
            .iter()
            .find(|v| v.setor == setor)
            .map(|v| v.vagas)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VagasSetor {
    pub setor: String,
    pub vagas: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnoInput {
    pub hora_inicio: NaiveTime,
    pub hora_fim: NaiveTime,
    pub tipo_recorrencia: TipoRecorrencia,
    pub data_inicio: Option<NaiveDate>,
    pub data_fim: Option<NaiveDate>,
    pub dias_semana: Option<Vec<i16>>,
    pub cor: Option<String>,
    pub setores: Vec<VagasSetor>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TipoRecorrencia {
    /// Every calendar day.
    Todos,
    /// Monday through Friday.
    Uteis,
    /// Explicit weekday set inside a bounded date range (<= 30 days).
    Custom,
}

impl std::fmt::Display for TipoRecorrencia {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TipoRecorrencia::Todos => write!(f, "todos"),
            TipoRecorrencia::Uteis => write!(f, "uteis"),
            TipoRecorrencia::Custom => write!(f, "custom"),
        }
    }
}

impl std::str::FromStr for TipoRecorrencia {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "todos" => Ok(TipoRecorrencia::Todos),
            "uteis" => Ok(TipoRecorrencia::Uteis),
            "custom" => Ok(TipoRecorrencia::Custom),
            _ => Err(format!("Invalid tipo_recorrencia: {}", s)),
        }
    }
}

impl sqlx::Type<sqlx::Postgres> for TipoRecorrencia {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }
}

impl<'q> sqlx::Encode<'q, sqlx::Postgres> for TipoRecorrencia {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<'q, sqlx::Postgres>>::encode_by_ref(&self.to_string(), buf)
    }
}

impl<'r> sqlx::Decode<'r, sqlx::Postgres> for TipoRecorrencia {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        s.parse::<TipoRecorrencia>().map_err(|e| e.into())
    }
}

/// Raw turnos row; setores are loaded from turno_setores and attached
/// by the repository.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TurnoRow {
    pub id: Uuid,
    pub hora_inicio: NaiveTime,
    pub hora_fim: NaiveTime,
    pub tipo_recorrencia: TipoRecorrencia,
    pub data_inicio: Option<NaiveDate>,
    pub data_fim: Option<NaiveDate>,
    pub dias_semana: Option<Vec<i16>>,
    pub cor: String,
    pub ativo: bool,
    pub criado_por: Option<Uuid>,
    pub criado_em: NaiveDateTime,
    pub atualizado_em: NaiveDateTime,
}

impl TurnoRow {
    pub fn into_turno(self, setores: Vec<VagasSetor>) -> Turno {
        Turno {
            id: self.id,
            hora_inicio: self.hora_inicio,
            hora_fim: self.hora_fim,
            tipo_recorrencia: self.tipo_recorrencia,
            data_inicio: self.data_inicio,
            data_fim: self.data_fim,
            dias_semana: self.dias_semana,
            cor: self.cor,
            ativo: self.ativo,
            setores,
            criado_por: self.criado_por,
            criado_em: self.criado_em,
            atualizado_em: self.atualizado_em,
        }
    }
}
