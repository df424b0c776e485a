//! Players repository
//!
//! Table: player. The owning team is loaded through a second join aliased
//! `fetched_team`, independent of the `team` join used by filters.

use async_trait::async_trait;
use chrono::NaiveDate;
use league_core::traits::{Entity, Id};
use league_core::{Page, PageRequest};
use league_models::{Player, Team};
use league_queries::schema::player;
use league_queries::{CompareOp, Predicate, Specification};
use sqlx::{FromRow, PgPool};

use crate::repository::{
    resolve_sort, Repository, RepositoryError, RepositoryResult, SpecificationExecutor,
};
use crate::sql::{bind_params, count_statement, select_statement, Projection};

const PROJECTION: Projection = Projection {
    columns: "player.id, player.name, player.birth_date, player.height, player.weight, \
              player.baskets, player.assists, player.team_id, \
              fetched_team.name AS team_name, fetched_team.city AS team_city",
    fetch_joins: "LEFT JOIN team fetched_team ON player.team_id = fetched_team.id",
};

/// Player row joined with its team
#[derive(Debug, Clone, FromRow)]
pub struct PlayerRecord {
    pub id: i64,
    pub name: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub height: Option<f64>,
    pub weight: Option<f64>,
    pub baskets: Option<i32>,
    pub assists: Option<i32>,
    pub team_id: Option<i64>,
    pub team_name: Option<String>,
    pub team_city: Option<String>,
}

impl From<PlayerRecord> for Player {
    fn from(record: PlayerRecord) -> Self {
        Player {
            id: Some(record.id),
            name: record.name,
            birth_date: record.birth_date,
            height: record.height,
            weight: record.weight,
            baskets: record.baskets,
            assists: record.assists,
            team: record.team_id.map(|id| Team {
                id: Some(id),
                name: record.team_name,
                city: record.team_city,
            }),
        }
    }
}

/// Player repository
pub struct PlayerRepository {
    pool: PgPool,
}

impl PlayerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch(
        &self,
        spec: &Specification,
        page: Option<&PageRequest>,
    ) -> RepositoryResult<Vec<Player>> {
        let sort = page
            .map(|page| resolve_sort(page, player::sort_column))
            .unwrap_or_default();
        let stmt = select_statement(spec, &PROJECTION, &sort, page);

        let rows = bind_params(sqlx::query_as::<_, PlayerRecord>(&stmt.sql), &stmt.params)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Player::from).collect())
    }
}

#[async_trait]
impl Repository<Player> for PlayerRepository {
    async fn find_by_id(&self, id: Id) -> RepositoryResult<Option<Player>> {
        let spec = Specification::new(player::TABLE)
            .and(Predicate::compare(player::ID, CompareOp::Eq, id));
        Ok(self.fetch(&spec, None).await?.into_iter().next())
    }

    async fn exists(&self, id: Id) -> RepositoryResult<bool> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM player WHERE id = $1")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count > 0)
    }

    async fn save(&self, entity: Player) -> RepositoryResult<Player> {
        let team_id = entity.team_id();

        let id = match entity.id {
            None => sqlx::query_scalar::<_, i64>(
                r#"
                INSERT INTO player (name, birth_date, height, weight, baskets, assists, team_id)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                RETURNING id
                "#,
            )
            .bind(&entity.name)
            .bind(entity.birth_date)
            .bind(entity.height)
            .bind(entity.weight)
            .bind(entity.baskets)
            .bind(entity.assists)
            .bind(team_id)
            .fetch_one(&self.pool)
            .await
            .map_err(RepositoryError::from_write)?,
            Some(id) => {
                let result = sqlx::query(
                    r#"
                    UPDATE player
                    SET name = $2, birth_date = $3, height = $4, weight = $5,
                        baskets = $6, assists = $7, team_id = $8
                    WHERE id = $1
                    "#,
                )
                .bind(id)
                .bind(&entity.name)
                .bind(entity.birth_date)
                .bind(entity.height)
                .bind(entity.weight)
                .bind(entity.baskets)
                .bind(entity.assists)
                .bind(team_id)
                .execute(&self.pool)
                .await
                .map_err(RepositoryError::from_write)?;

                if result.rows_affected() == 0 {
                    return Err(RepositoryError::NotFound {
                        entity: Player::ENTITY_NAME,
                        id,
                    });
                }
                id
            }
        };

        self.find_by_id(id)
            .await?
            .ok_or(RepositoryError::NotFound {
                entity: Player::ENTITY_NAME,
                id,
            })
    }

    async fn delete(&self, id: Id) -> RepositoryResult<()> {
        sqlx::query("DELETE FROM player WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(RepositoryError::from_write)?;

        Ok(())
    }
}

#[async_trait]
impl SpecificationExecutor<Player> for PlayerRepository {
    async fn find_all(&self, spec: &Specification) -> RepositoryResult<Vec<Player>> {
        self.fetch(spec, None).await
    }

    async fn find_page(
        &self,
        spec: &Specification,
        page: &PageRequest,
    ) -> RepositoryResult<Page<Player>> {
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
