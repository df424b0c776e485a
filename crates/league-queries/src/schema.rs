//! Table, column and join definitions for the filterable entities
//!
//! Filter fields map to columns through these constants; nothing is looked
//! up by name at runtime except API sort properties.

use crate::predicate::{Column, Join, Table};

pub mod player {
    use super::*;

    pub const TABLE: Table = Table {
        name: "player",
        alias: "player",
    };

    pub const ID: Column = Column::root("id");
    pub const NAME: Column = Column::root("name");
    pub const BIRTH_DATE: Column = Column::root("birth_date");
    pub const HEIGHT: Column = Column::root("height");
    pub const WEIGHT: Column = Column::root("weight");
    pub const BASKETS: Column = Column::root("baskets");
    pub const ASSISTS: Column = Column::root("assists");
    /// Foreign key to `team.id`
    pub const TEAM_ID: Column = Column::root("team_id");

    /// player → team (many-to-one)
    pub const TEAM_JOIN: Join = Join {
        relation: "team",
        target: super::team::TABLE,
        source_column: "team_id",
        target_column: "id",
    };

    /// `team.id` reached through [`TEAM_JOIN`]
    pub const JOINED_TEAM_ID: Column = Column::joined(TEAM_JOIN, "id");

    /// Map an API property name to a sortable column
    pub fn sort_column(property: &str) -> Option<Column> {
        match property {
            "id" => Some(ID),
            "name" => Some(NAME),
            "birthDate" => Some(BIRTH_DATE),
            "height" => Some(HEIGHT),
            "weight" => Some(WEIGHT),
            "baskets" => Some(BASKETS),
            "assists" => Some(ASSISTS),
            "team.id" | "teamId" => Some(TEAM_ID),
            _ => None,
        }
    }
}

pub mod team {
    use super::*;

    pub const TABLE: Table = Table {
        name: "team",
        alias: "team",
    };

    pub const ID: Column = Column::root("id");
    pub const NAME: Column = Column::root("name");
    pub const CITY: Column = Column::root("city");

    /// team → players (one-to-many); multiplies team rows
    pub const PLAYERS_JOIN: Join = Join {
        relation: "players",
        target: super::player::TABLE,
        source_column: "id",
        target_column: "team_id",
    };

    /// `player.id` reached through [`PLAYERS_JOIN`]
    pub const JOINED_PLAYER_ID: Column = Column::joined(PLAYERS_JOIN, "id");

    /// Map an API property name to a sortable column
    pub fn sort_column(property: &str) -> Option<Column> {
        match property {
            "id" => Some(ID),
            "name" => Some(NAME),
            "city" => Some(CITY),
            _ => None,
        }
    }
}
