use anyhow::Result;
use chrono::{NaiveDate, NaiveTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder, Transaction};
use uuid::Uuid;

use crate::database::models::{Agendamento, AgendamentoFilters, StatusAgendamento};
use crate::scheduling::disponibilidade::VagasOcupadas;

#[derive(sqlx::FromRow)]
struct VagasOcupadasRow {
    turno_id: Uuid,
    data: NaiveDate,
    setor: String,
    ocupadas: i64,
}

#[derive(Clone)]
pub struct AgendamentoRepository {
    pool: PgPool,
}

impl AgendamentoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Agendamento>> {
        let row = sqlx::query_as::<_, Agendamento>("SELECT * FROM agendamentos WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    pub async fn list(&self, filters: AgendamentoFilters) -> Result<Vec<Agendamento>> {
        let mut query: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT * FROM agendamentos WHERE 1=1");

        if let Some(turno_id) = filters.turno_id {
            query.push(" AND turno_id = ").push_bind(turno_id);
        }
        if let Some(data) = filters.data {
            query.push(" AND data = ").push_bind(data);
        }
        if let Some(data_inicio) = filters.data_inicio {
            query.push(" AND data >= ").push_bind(data_inicio);
        }
        if let Some(data_fim) = filters.data_fim {
            query.push(" AND data <= ").push_bind(data_fim);
        }
        if let Some(status) = filters.status {
            query.push(" AND status = ").push_bind(status.to_string());
        }
        if let Some(setor) = filters.setor {
            query.push(" AND setor = ").push_bind(setor);
        }
        query.push(" ORDER BY data, horario_inicio");

        let rows = query
            .build_query_as::<Agendamento>()
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    /// Count of confirmed bookings holding capacity at this exact key.
    pub async fn count_confirmados(
        &self,
        turno_id: Uuid,
        data: NaiveDate,
        setor: &str,
    ) -> Result<i64> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM agendamentos WHERE turno_id = $1 AND data = $2 AND setor = $3 AND status = $4",
        )
        .bind(turno_id)
        .bind(data)
        .bind(setor)
        .bind(StatusAgendamento::Confirmado.to_string())
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    /// Grouped confirmed counts over a date range, feeding the availability
    /// view. Always read from committed state, never cached.
    pub async fn counts_no_periodo(
        &self,
        inicio: NaiveDate,
        fim: NaiveDate,
    ) -> Result<VagasOcupadas> {
        let rows = sqlx::query_as::<_, VagasOcupadasRow>(
            r#"
            SELECT turno_id, data, setor, COUNT(*) AS ocupadas
            FROM agendamentos
            WHERE data >= $1 AND data <= $2 AND status = $3
            GROUP BY turno_id, data, setor
            "#,
        )
        .bind(inicio)
        .bind(fim)
        .bind(StatusAgendamento::Confirmado.to_string())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| ((r.turno_id, r.data, r.setor), r.ocupadas))
            .collect())
    }

    /// Atomically reserves one capacity unit: count-and-insert runs in one
    /// transaction, serialized per (turno, data, setor) by an advisory lock.
    /// Returns None when the key is already at capacity.
    #[allow(clippy::too_many_arguments)]
    pub async fn reserve(
        &self,
        turno_id: Uuid,
        data: NaiveDate,
        horario_inicio: NaiveTime,
        horario_fim: NaiveTime,
        setor: &str,
        solicitante: Uuid,
        categoria: &str,
        vagas: i32,
    ) -> Result<Option<Agendamento>> {
        let mut tx = self.pool.begin().await?;
        lock_vaga(&mut tx, turno_id, data, setor).await?;

        let now = Utc::now().naive_utc();
        let row = sqlx::query_as::<_, Agendamento>(
            r#"
            INSERT INTO agendamentos
                (turno_id, data, horario_inicio, horario_fim, setor, solicitante, categoria, status, criado_em, atualizado_em)
            SELECT $1, $2, $3, $4, $5, $6, $7, $8, $9, $9
            WHERE (
                SELECT COUNT(*) FROM agendamentos
                WHERE turno_id = $1 AND data = $2 AND setor = $5 AND status = $8
            ) < $10
            RETURNING *
            "#,
        )
        .bind(turno_id)
        .bind(data)
        .bind(horario_inicio)
        .bind(horario_fim)
        .bind(setor)
        .bind(solicitante)
        .bind(categoria)
        .bind(StatusAgendamento::Confirmado.to_string())
        .bind(now)
        .bind(i64::from(vagas))
        .fetch_optional(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(row)
    }

    /// Marks a confirmed booking cancelled and records the motivo. The status
    /// guard makes double-cancellation a no-op at the store level; callers
    /// translate the None into AlreadyCancelled.
    pub async fn cancel(&self, id: Uuid, motivo: &str) -> Result<Option<Agendamento>> {
        let now = Utc::now().naive_utc();
        let row = sqlx::query_as::<_, Agendamento>(
            r#"
            UPDATE agendamentos
            SET status = $1, cancelado_em = $2, cancelado_motivo = $3, atualizado_em = $2
            WHERE id = $4 AND status = $5
            RETURNING *
            "#,
        )
        .bind(StatusAgendamento::Cancelado.to_string())
        .bind(now)
        .bind(motivo)
        .bind(id)
        .bind(StatusAgendamento::Confirmado.to_string())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    /// Moves a confirmed booking to a new (turno, data, slot, setor) in one
    /// statement, guarded by the target key's capacity under its advisory
    /// lock. The single UPDATE releases the old slot and claims the new one
    /// atomically, so the booking never holds zero slots and a full target
    /// leaves it untouched.
    #[allow(clippy::too_many_arguments)]
    pub async fn move_agendamento(
        &self,
        id: Uuid,
        turno_id: Uuid,
        data: NaiveDate,
        horario_inicio: NaiveTime,
        horario_fim: NaiveTime,
        setor: &str,
        vagas: i32,
    ) -> Result<Option<Agendamento>> {
        let mut tx = self.pool.begin().await?;
        lock_vaga(&mut tx, turno_id, data, setor).await?;

        let now = Utc::now().naive_utc();
        let row = sqlx::query_as::<_, Agendamento>(
            r#"
            UPDATE agendamentos
            SET turno_id = $1, data = $2, horario_inicio = $3, horario_fim = $4, setor = $5, atualizado_em = $6
            WHERE id = $7 AND status = $8
              AND (
                SELECT COUNT(*) FROM agendamentos
                WHERE turno_id = $1 AND data = $2 AND setor = $5 AND status = $8 AND id <> $7
              ) < $9
            RETURNING *
            "#,
        )
        .bind(turno_id)
        .bind(data)
        .bind(horario_inicio)
        .bind(horario_fim)
        .bind(setor)
        .bind(now)
        .bind(id)
        .bind(StatusAgendamento::Confirmado.to_string())
        .bind(i64::from(vagas))
        .fetch_optional(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(row)
    }
}

/// Transaction-scoped advisory lock on the capacity key. Reservations on
/// different keys proceed in parallel; within one key, first to commit wins.
async fn lock_vaga(
    tx: &mut Transaction<'_, Postgres>,
    turno_id: Uuid,
    data: NaiveDate,
    setor: &str,
) -> Result<()> {
    let chave = format!("agendamento:{}:{}:{}", turno_id, data, setor);
    sqlx::query("SELECT pg_advisory_xact_lock(hashtextextended($1, 0))")
        .bind(chave)
        .execute(&mut **tx)
        .await?;
    Ok(())
}
