use anyhow::Result;
use sqlx::PgPool;

use crate::database::models::Setor;

/// Read-only surface over the setor catalogue maintained by the
/// org-structure side of the system.
#[derive(Clone)]
pub struct SetorRepository {
    pool: PgPool,
}

impl SetorRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_ativos(&self) -> Result<Vec<Setor>> {
        let rows = sqlx::query_as::<_, Setor>("SELECT * FROM setores WHERE ativo ORDER BY nome")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    pub async fn find_by_slug(&self, slug: &str) -> Result<Option<Setor>> {
        let row = sqlx::query_as::<_, Setor>("SELECT * FROM setores WHERE slug = $1 AND ativo")
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }
}
