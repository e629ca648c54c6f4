use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use chrono::Utc;
use moka::future::Cache;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::turno::TurnoRow;
use crate::database::models::{Turno, TurnoInput, VagasSetor};

const TURNO_COLUMNS: &str = "id, hora_inicio, hora_fim, tipo_recorrencia, data_inicio, data_fim, \
     dias_semana, cor, ativo, criado_por, criado_em, atualizado_em";

const COR_PADRAO: &str = "#3b82f6";

#[derive(sqlx::FromRow)]
struct TurnoSetorRow {
    turno_id: Uuid,
    setor: String,
    vagas: i32,
}

/// Turno definitions are read-mostly; the active list feeding the
/// availability view is cached for a short window. Capacity accounting
/// never reads this cache.
#[derive(Clone)]
pub struct TurnoRepository {
    pool: PgPool,
    ativos_cache: Cache<(), Arc<Vec<Turno>>>,
}

impl TurnoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            ativos_cache: Cache::builder()
                .max_capacity(1)
                .time_to_live(Duration::from_secs(30))
                .build(),
        }
    }

    pub async fn create_turno(
        &self,
        input: TurnoInput,
        criado_por: Option<Uuid>,
    ) -> Result<Turno> {
        let now = Utc::now().naive_utc();
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, TurnoRow>(&format!(
            r#"
            INSERT INTO turnos (hora_inicio, hora_fim, tipo_recorrencia, data_inicio, data_fim, dias_semana, cor, ativo, criado_por, criado_em, atualizado_em)
            VALUES ($1, $2, $3, $4, $5, $6, $7, TRUE, $8, $9, $9)
            RETURNING {TURNO_COLUMNS}
            "#
        ))
        .bind(input.hora_inicio)
        .bind(input.hora_fim)
        .bind(input.tipo_recorrencia)
        .bind(input.data_inicio)
        .bind(input.data_fim)
        .bind(input.dias_semana)
        .bind(input.cor.unwrap_or_else(|| COR_PADRAO.to_string()))
        .bind(criado_por)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        for vagas_setor in &input.setores {
            sqlx::query("INSERT INTO turno_setores (turno_id, setor, vagas) VALUES ($1, $2, $3)")
                .bind(row.id)
                .bind(&vagas_setor.setor)
                .bind(vagas_setor.vagas)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        self.ativos_cache.invalidate(&()).await;

        Ok(row.into_turno(input.setores))
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Turno>> {
        let row = sqlx::query_as::<_, TurnoRow>(&format!(
            "SELECT {TURNO_COLUMNS} FROM turnos WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => {
                let setores = self.load_setores(&[row.id]).await?;
                let vagas = setores.into_values().next().unwrap_or_default();
                Ok(Some(row.into_turno(vagas)))
            }
            None => Ok(None),
        }
    }

    pub async fn list_ativos(&self) -> Result<Vec<Turno>> {
        let rows = sqlx::query_as::<_, TurnoRow>(&format!(
            "SELECT {TURNO_COLUMNS} FROM turnos WHERE ativo ORDER BY hora_inicio"
        ))
        .fetch_all(&self.pool)
        .await?;

        let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
        let mut setores = self.load_setores(&ids).await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let vagas = setores.remove(&row.id).unwrap_or_default();
                row.into_turno(vagas)
            })
            .collect())
    }

    /// Cached variant for the availability view (30s TTL).
    pub async fn list_ativos_cached(&self) -> Result<Arc<Vec<Turno>>> {
        if let Some(turnos) = self.ativos_cache.get(&()).await {
            return Ok(turnos);
        }
        let turnos = Arc::new(self.list_ativos().await?);
        self.ativos_cache.insert((), turnos.clone()).await;
        Ok(turnos)
    }

    pub async fn update_turno(&self, id: Uuid, input: TurnoInput) -> Result<Option<Turno>> {
        let now = Utc::now().naive_utc();
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, TurnoRow>(&format!(
            r#"
            UPDATE turnos
            SET hora_inicio = $1, hora_fim = $2, tipo_recorrencia = $3, data_inicio = $4,
                data_fim = $5, dias_semana = $6, cor = COALESCE($7, cor), atualizado_em = $8
            WHERE id = $9
            RETURNING {TURNO_COLUMNS}
            "#
        ))
        .bind(input.hora_inicio)
        .bind(input.hora_fim)
        .bind(input.tipo_recorrencia)
        .bind(input.data_inicio)
        .bind(input.data_fim)
        .bind(input.dias_semana)
        .bind(input.cor)
        .bind(now)
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = row else {
            tx.rollback().await?;
            return Ok(None);
        };

        sqlx::query("DELETE FROM turno_setores WHERE turno_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        for vagas_setor in &input.setores {
            sqlx::query("INSERT INTO turno_setores (turno_id, setor, vagas) VALUES ($1, $2, $3)")
                .bind(id)
                .bind(&vagas_setor.setor)
                .bind(vagas_setor.vagas)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        self.ativos_cache.invalidate(&()).await;

        Ok(Some(row.into_turno(input.setores)))
    }

    /// Soft delete: turnos with booking history are never hard-deleted.
    pub async fn deactivate(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE turnos SET ativo = FALSE, atualizado_em = $1 WHERE id = $2 AND ativo",
        )
        .bind(Utc::now().naive_utc())
        .bind(id)
        .execute(&self.pool)
        .await?;

        self.ativos_cache.invalidate(&()).await;
        Ok(result.rows_affected() > 0)
    }

    async fn load_setores(&self, ids: &[Uuid]) -> Result<HashMap<Uuid, Vec<VagasSetor>>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let rows = sqlx::query_as::<_, TurnoSetorRow>(
            "SELECT turno_id, setor, vagas FROM turno_setores WHERE turno_id = ANY($1) ORDER BY setor",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        let mut por_turno: HashMap<Uuid, Vec<VagasSetor>> = HashMap::new();
        for row in rows {
            por_turno.entry(row.turno_id).or_default().push(VagasSetor {
                setor: row.setor,
                vagas: row.vagas,
            });
        }
        Ok(por_turno)
    }
}
