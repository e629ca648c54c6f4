use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Organizational unit scoping turno eligibility and booking capacity.
/// The catalogue is owned by the org-structure side; the engine only
/// validates against it.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Setor {
    pub slug: String,
    pub nome: String,
    pub ativo: bool,
    pub criado_em: NaiveDateTime,
}
