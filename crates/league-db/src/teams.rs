//! Teams repository
//!
//! Table: team

use async_trait::async_trait;
use league_core::traits::{Entity, Id};
use league_core::{Page, PageRequest};
use league_models::Team;
use league_queries::schema::team;
use league_queries::{CompareOp, Predicate, Specification};
use sqlx::{FromRow, PgPool};

use crate::repository::{
    resolve_sort, Repository, RepositoryError, RepositoryResult, SpecificationExecutor,
};
use crate::sql::{bind_params, count_statement, select_statement, Projection};

const PROJECTION: Projection = Projection {
    columns: "team.id, team.name, team.city",
    fetch_joins: "",
};

/// Team row from database
#[derive(Debug, Clone, FromRow)]
pub struct TeamRecord {
    pub id: i64,
    pub name: Option<String>,
    pub city: Option<String>,
}

impl From<TeamRecord> for Team {
    fn from(record: TeamRecord) -> Self {
        Team {
            id: Some(record.id),
            name: record.name,
            city: record.city,
        }
    }
}

/// Team repository
pub struct TeamRepository {
    pool: PgPool,
}

impl TeamRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch(
        &self,
        spec: &Specification,
        page: Option<&PageRequest>,
    ) -> RepositoryResult<Vec<Team>> {
        let sort = page
            .map(|page| resolve_sort(page, team::sort_column))
            .unwrap_or_default();
        let stmt = select_statement(spec, &PROJECTION, &sort, page);

        let rows = bind_params(sqlx::query_as::<_, TeamRecord>(&stmt.sql), &stmt.params)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Team::from).collect())
    }
}

#[async_trait]
impl Repository<Team> for TeamRepository {
    async fn find_by_id(&self, id: Id) -> RepositoryResult<Option<Team>> {
        let spec =
            Specification::new(team::TABLE).and(Predicate::compare(team::ID, CompareOp::Eq, id));
        Ok(self.fetch(&spec, None).await?.into_iter().next())
    }

    async fn exists(&self, id: Id) -> RepositoryResult<bool> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM team WHERE id = $1")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count > 0)
    }

    async fn save(&self, entity: Team) -> RepositoryResult<Team> {
        let row = match entity.id {
            None => sqlx::query_as::<_, TeamRecord>(
                r#"
                INSERT INTO team (name, city)
                VALUES ($1, $2)
                RETURNING id, name, city
                "#,
            )
            .bind(&entity.name)
            .bind(&entity.city)
            .fetch_one(&self.pool)
            .await
            .map_err(RepositoryError::from_write)?,
            Some(id) => sqlx::query_as::<_, TeamRecord>(
                r#"
                UPDATE team
                SET name = $2, city = $3
                WHERE id = $1
                RETURNING id, name, city
                "#,
            )
            .bind(id)
            .bind(&entity.name)
            .bind(&entity.city)
            .fetch_optional(&self.pool)
            .await
            .map_err(RepositoryError::from_write)?
            .ok_or(RepositoryError::NotFound {
                entity: Team::ENTITY_NAME,
                id,
            })?,
        };

        Ok(row.into())
    }

    /// Fails with a constraint error while players still reference the team
    async fn delete(&self, id: Id) -> RepositoryResult<()> {
        sqlx::query("DELETE FROM team WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(RepositoryError::from_write)?;

        Ok(())
    }
}

#[async_trait]
impl SpecificationExecutor<Team> for TeamRepository {
    async fn find_all(&self, spec: &Specification) -> RepositoryResult<Vec<Team>> {
        self.fetch(spec, None).await
    }

    async fn find_page(
        &self,
        spec: &Specification,
        page: &PageRequest,
    ) -> RepositoryResult<Page<Team>> {
        let content = self.fetch(spec, Some(page)).await?;
        let total = self.count(spec).await?;
        Ok(Page::new(content, total, page))
    }

    async fn count(&self, spec: &Specification) -> RepositoryResult<i64> {
        let stmt = count_statement(spec);
        let (count,): (i64,) = bind_params(sqlx::query_as(&stmt.sql), &stmt.params)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
