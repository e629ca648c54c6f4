use anyhow::Result;
use chrono::{NaiveDate, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::database::models::{Bloqueio, BloqueioInput};

#[derive(Debug, Clone, Default, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BloqueioFilters {
    pub data_inicio: Option<NaiveDate>,
    pub data_fim: Option<NaiveDate>,
    pub setor: Option<String>,
}

#[derive(Clone)]
pub struct BloqueioRepository {
    pool: PgPool,
}

impl BloqueioRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create_bloqueio(
        &self,
        input: BloqueioInput,
        criado_por: Option<Uuid>,
    ) -> Result<Bloqueio> {
        let row = sqlx::query_as::<_, Bloqueio>(
            r#"
            INSERT INTO bloqueios
                (data_inicio, data_fim, dia_inteiro, hora_inicio, hora_fim, setor, motivo, descricao, ativo, criado_por, criado_em)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, TRUE, $9, $10)
            RETURNING *
            "#,
        )
        .bind(input.data_inicio)
        .bind(input.data_fim)
        .bind(input.dia_inteiro)
        .bind(input.hora_inicio)
        .bind(input.hora_fim)
        .bind(input.setor)
        .bind(input.motivo)
        .bind(input.descricao)
        .bind(criado_por)
        .bind(Utc::now().naive_utc())
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    /// Active bloqueios whose date range touches the queried period,
    /// optionally narrowed to one setor (global bloqueios always included).
    pub async fn list_ativos(&self, filters: BloqueioFilters) -> Result<Vec<Bloqueio>> {
        let mut query: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT * FROM bloqueios WHERE ativo");

        if let Some(data_inicio) = filters.data_inicio {
            query.push(" AND data_fim >= ").push_bind(data_inicio);
        }
        if let Some(data_fim) = filters.data_fim {
            query.push(" AND data_inicio <= ").push_bind(data_fim);
        }
        if let Some(setor) = filters.setor {
            query
                .push(" AND (setor IS NULL OR setor = ")
                .push_bind(setor)
                .push(")");
        }
        query.push(" ORDER BY data_inicio");

        let rows = query
            .build_query_as::<Bloqueio>()
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    pub async fn find_ativos_no_periodo(
        &self,
        inicio: NaiveDate,
        fim: NaiveDate,
    ) -> Result<Vec<Bloqueio>> {
        self.list_ativos(BloqueioFilters {
            data_inicio: Some(inicio),
            data_fim: Some(fim),
            setor: None,
        })
        .await
    }

    /// Bloqueios have no update-in-place: delete and recreate.
    pub async fn delete_bloqueio(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM bloqueios WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
