//! In-memory store
//!
//! Holds players and teams in process and executes specifications by
//! evaluating their predicate row by row. Joins behave as SQL LEFT joins: a
//! one-to-many join yields one candidate per related row, and a root row with
//! no related row yields a single candidate whose joined columns are NULL.
//! Used when no database is configured, and by tests.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use league_core::traits::{Entity, Id};
use league_core::{Page, PageRequest, SortDirection};
use league_models::{Player, Team};
use league_queries::schema::{player, team};
use league_queries::{Column, Join, Specification, Value};
use tokio::sync::RwLock;

use crate::repository::{
    resolve_sort, Repository, RepositoryError, RepositoryResult, SortKey, SpecificationExecutor,
};

/// Stored player; the team is kept as a foreign key
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerRow {
    pub id: Id,
    pub name: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub height: Option<f64>,
    pub weight: Option<f64>,
    pub baskets: Option<i32>,
    pub assists: Option<i32>,
    pub team_id: Option<Id>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TeamRow {
    pub id: Id,
    pub name: Option<String>,
    pub city: Option<String>,
}

/// Column access by name, as a query engine would see the row
trait Record {
    fn id(&self) -> Id;

    fn column(&self, name: &str) -> Value;
}

impl Record for PlayerRow {
    fn id(&self) -> Id {
        self.id
    }

    fn column(&self, name: &str) -> Value {
        match name {
            "id" => Value::Int(self.id),
            "name" => self.name.clone().into(),
            "birth_date" => self.birth_date.into(),
            "height" => self.height.into(),
            "weight" => self.weight.into(),
            "baskets" => self.baskets.into(),
            "assists" => self.assists.into(),
            "team_id" => self.team_id.into(),
            _ => Value::Null,
        }
    }
}

impl Record for TeamRow {
    fn id(&self) -> Id {
        self.id
    }

    fn column(&self, name: &str) -> Value {
        match name {
            "id" => Value::Int(self.id),
            "name" => self.name.clone().into(),
            "city" => self.city.clone().into(),
            _ => Value::Null,
        }
    }
}

#[derive(Debug, Default)]
struct Tables {
    players: BTreeMap<Id, PlayerRow>,
    teams: BTreeMap<Id, TeamRow>,
    player_seq: Id,
    team_seq: Id,
}

impl Tables {
    /// Rows of a table in id order
    fn rows(&self, table: &str) -> Vec<&dyn Record> {
        match table {
            "player" => self.players.values().map(|r| r as &dyn Record).collect(),
            "team" => self.teams.values().map(|r| r as &dyn Record).collect(),
            _ => Vec::new(),
        }
    }

    /// Every combination of joined rows for one root row
    fn expand<'a>(
        &'a self,
        root: &dyn Record,
        joins: &[Join],
    ) -> Vec<Vec<Option<&'a dyn Record>>> {
        let mut combos: Vec<Vec<Option<&'a dyn Record>>> = vec![Vec::new()];

        for join in joins {
            let key = root.column(join.source_column);
            let related: Vec<Option<&'a dyn Record>> = if key.is_null() {
                Vec::new()
            } else {
                self.rows(join.target.name)
                    .into_iter()
                    .filter(|row| {
                        row.column(join.target_column).compare(&key) == Some(Ordering::Equal)
                    })
                    .map(Some)
                    .collect()
            };
            let related = if related.is_empty() { vec![None] } else { related };

            combos = combos
                .into_iter()
                .flat_map(|combo| {
                    related.iter().map(move |row| {
                        let mut next = combo.clone();
                        next.push(*row);
                        next
                    })
                })
                .collect();
        }

        combos
    }

    /// Root rows matching `spec`, one per matching join combination unless
    /// the specification is distinct
    fn matching(&self, spec: &Specification, sort: &[SortKey]) -> Vec<Id> {
        let joins = spec.joins();
        let mut seen = HashSet::new();
        let mut matches: Vec<&dyn Record> = Vec::new();

        for root in self.rows(spec.root.name) {
            for combo in self.expand(root, &joins) {
                let lookup = |column: &Column| match column.join() {
                    None => root.column(column.name),
                    Some(join) => joins
                        .iter()
                        .position(|j| j == join)
                        .and_then(|index| combo.get(index).copied().flatten())
                        .map(|row| row.column(column.name))
                        .unwrap_or(Value::Null),
                };

                if spec.predicate.evaluate(&lookup) && (!spec.distinct || seen.insert(root.id())) {
                    matches.push(root);
                }
            }
        }

        matches.sort_by(|a, b| compare_records(*a, *b, sort));
        matches.into_iter().map(|record| record.id()).collect()
    }

    fn to_player(&self, row: &PlayerRow) -> Player {
        Player {
            id: Some(row.id),
            name: row.name.clone(),
            birth_date: row.birth_date,
            height: row.height,
            weight: row.weight,
            baskets: row.baskets,
            assists: row.assists,
            team: row.team_id.map(|id| {
                self.teams
                    .get(&id)
                    .map(to_team)
                    .unwrap_or_else(|| Team::reference(id))
            }),
        }
    }

    fn players_by_id(&self, ids: &[Id]) -> Vec<Player> {
        ids.iter()
            .filter_map(|id| self.players.get(id))
            .map(|row| self.to_player(row))
            .collect()
    }

    fn teams_by_id(&self, ids: &[Id]) -> Vec<Team> {
        ids.iter()
            .filter_map(|id| self.teams.get(id))
            .map(to_team)
            .collect()
    }
}

fn to_team(row: &TeamRow) -> Team {
    Team {
        id: Some(row.id),
        name: row.name.clone(),
        city: row.city.clone(),
    }
}

/// Sort keys first, then id; NULLs sort last ascending and first descending
fn compare_records(a: &dyn Record, b: &dyn Record, sort: &[SortKey]) -> Ordering {
    for key in sort {
        let left = a.column(key.column.name);
        let right = b.column(key.column.name);
        let ordering = match (left.is_null(), right.is_null()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => left.compare(&right).unwrap_or(Ordering::Equal),
        };
        let ordering = match key.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    a.id().cmp(&b.id())
}

fn window(ids: Vec<Id>, page: &PageRequest) -> Vec<Id> {
    ids.into_iter()
        .skip(usize::try_from(page.offset()).unwrap_or(usize::MAX))
        .take(usize::try_from(page.limit()).unwrap_or(0))
        .collect()
}

/// Process-local storage for players and teams
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Repository<Player> for MemoryStore {
    async fn find_by_id(&self, id: Id) -> RepositoryResult<Option<Player>> {
        let tables = self.tables.read().await;
        Ok(tables.players.get(&id).map(|row| tables.to_player(row)))
    }

    async fn exists(&self, id: Id) -> RepositoryResult<bool> {
        Ok(self.tables.read().await.players.contains_key(&id))
    }

    async fn save(&self, entity: Player) -> RepositoryResult<Player> {
        let mut tables = self.tables.write().await;

        let team_id = entity.team_id();
        if let Some(team_id) = team_id {
            if !tables.teams.contains_key(&team_id) {
                return Err(RepositoryError::Constraint(format!(
                    "team {} does not exist",
                    team_id
                )));
            }
        }

        let id = match entity.id {
            Some(id) if !tables.players.contains_key(&id) => {
                return Err(RepositoryError::NotFound {
                    entity: Player::ENTITY_NAME,
                    id,
                });
            }
            Some(id) => id,
            None => {
                tables.player_seq += 1;
                tables.player_seq
            }
        };

        let row = PlayerRow {
            id,
            name: entity.name,
            birth_date: entity.birth_date,
            height: entity.height,
            weight: entity.weight,
            baskets: entity.baskets,
            assists: entity.assists,
            team_id,
        };
        let player = tables.to_player(&row);
        tables.players.insert(id, row);

        Ok(player)
    }

    async fn delete(&self, id: Id) -> RepositoryResult<()> {
        self.tables.write().await.players.remove(&id);
        Ok(())
    }
}

#[async_trait]
impl Repository<Team> for MemoryStore {
    async fn find_by_id(&self, id: Id) -> RepositoryResult<Option<Team>> {
        Ok(self.tables.read().await.teams.get(&id).map(to_team))
    }

    async fn exists(&self, id: Id) -> RepositoryResult<bool> {
        Ok(self.tables.read().await.teams.contains_key(&id))
    }

    async fn save(&self, entity: Team) -> RepositoryResult<Team> {
        let mut tables = self.tables.write().await;

        let id = match entity.id {
            Some(id) if !tables.teams.contains_key(&id) => {
                return Err(RepositoryError::NotFound {
                    entity: Team::ENTITY_NAME,
                    id,
                });
            }
            Some(id) => id,
            None => {
                tables.team_seq += 1;
                tables.team_seq
            }
        };

        let row = TeamRow {
            id,
            name: entity.name,
            city: entity.city,
        };
        let team = to_team(&row);
        tables.teams.insert(id, row);

        Ok(team)
    }

    async fn delete(&self, id: Id) -> RepositoryResult<()> {
        let mut tables = self.tables.write().await;

        if tables.players.values().any(|p| p.team_id == Some(id)) {
            return Err(RepositoryError::Constraint(format!(
                "team {} is still referenced by players",
                id
            )));
        }
        tables.teams.remove(&id);
        Ok(())
    }
}

#[async_trait]
impl SpecificationExecutor<Player> for MemoryStore {
    async fn find_all(&self, spec: &Specification) -> RepositoryResult<Vec<Player>> {
        let tables = self.tables.read().await;
        let ids = tables.matching(spec, &[]);
        Ok(tables.players_by_id(&ids))
    }

    async fn find_page(
        &self,
        spec: &Specification,
        page: &PageRequest,
    ) -> RepositoryResult<Page<Player>> {
        let sort = resolve_sort(page, player::sort_column);
        let tables = self.tables.read().await;
        let ids = tables.matching(spec, &sort);
        let total = ids.len() as i64;
        let content = tables.players_by_id(&window(ids, page));
        Ok(Page::new(content, total, page))
    }

    async fn count(&self, spec: &Specification) -> RepositoryResult<i64> {
        Ok(self.tables.read().await.matching(spec, &[]).len() as i64)
    }
}

#[async_trait]
impl SpecificationExecutor<Team> for MemoryStore {
    async fn find_all(&self, spec: &Specification) -> RepositoryResult<Vec<Team>> {
        let tables = self.tables.read().await;
        let ids = tables.matching(spec, &[]);
        Ok(tables.teams_by_id(&ids))
    }

    async fn find_page(
        &self,
        spec: &Specification,
        page: &PageRequest,
    ) -> RepositoryResult<Page<Team>> {
        let sort = resolve_sort(page, team::sort_column);
        let tables = self.tables.read().await;
        let ids = tables.matching(spec, &sort);
        let total = ids.len() as i64;
        let content = tables.teams_by_id(&window(ids, page));
        Ok(Page::new(content, total, page))
    }

    async fn count(&self, spec: &Specification) -> RepositoryResult<i64> {
        Ok(self.tables.read().await.matching(spec, &[]).len() as i64)
    }
}
