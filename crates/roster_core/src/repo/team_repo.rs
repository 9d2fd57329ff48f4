//! Team repository contract and SQLite implementation.
//!
//! # Invariants
//! - Write paths must call `Team::validate()` before SQL mutations.
//! - Deleting a team that still has members is rejected by the storage
//!   engine's foreign-key enforcement, not by application logic.

use crate::db::migrations::latest_version;
use crate::model::team::{Team, TeamId};
use crate::repo::member_repo::{table_exists, table_has_column, RepoError, RepoResult};
use rusqlite::{params, Connection, Row};
use uuid::Uuid;

const TEAM_SELECT_SQL: &str = "SELECT id, name FROM teams";

/// Repository interface for team persistence.
pub trait TeamRepository {
    /// Inserts or fully replaces the team row keyed by `team.id`.
    fn save(&self, team: &Team) -> RepoResult<TeamId>;

    /// Loads one team by id. Missing rows are `Ok(None)`.
    fn find_by_id(&self, id: TeamId) -> RepoResult<Option<Team>>;

    /// All teams, ordered by name.
    fn find_all(&self) -> RepoResult<Vec<Team>>;

    /// Counts all team rows.
    fn count(&self) -> RepoResult<u64>;

    /// Deletes one team row. Missing rows are an error.
    fn delete_by_id(&self, id: TeamId) -> RepoResult<()>;
}

/// SQLite-backed team repository.
pub struct SqliteTeamRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTeamRepository<'conn> {
    /// Constructs a repository after checking the connection is migrated
    /// and carries the `teams` table this repository touches.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        let expected_version = latest_version();
        let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
        if actual_version != expected_version {
            return Err(RepoError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }

        if !table_exists(conn, "teams")? {
            return Err(RepoError::MissingRequiredTable("teams"));
        }
        for column in ["id", "name"] {
            if !table_has_column(conn, "teams", column)? {
                return Err(RepoError::MissingRequiredColumn {
                    table: "teams",
                    column,
                });
            }
        }
        Ok(Self { conn })
    }
}

impl TeamRepository for SqliteTeamRepository<'_> {
    fn save(&self, team: &Team) -> RepoResult<TeamId> {
        team.validate()?;

        self.conn.execute(
            "INSERT INTO teams (id, name)
             VALUES (?1, ?2)
             ON CONFLICT(id) DO UPDATE SET name = excluded.name;",
            params![team.id.to_string(), team.name.as_str()],
        )?;

        Ok(team.id)
    }

    fn find_by_id(&self, id: TeamId) -> RepoResult<Option<Team>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TEAM_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_team_row(row)?));
        }

        Ok(None)
    }

    fn find_all(&self) -> RepoResult<Vec<Team>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TEAM_SELECT_SQL} ORDER BY name ASC, id ASC;"))?;

        let mut rows = stmt.query([])?;
        let mut teams = Vec::new();
        while let Some(row) = rows.next()? {
            teams.push(parse_team_row(row)?);
        }

        Ok(teams)
    }

    fn count(&self) -> RepoResult<u64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM teams;", [], |row| {
                row.get::<_, u64>(0)
            })?;
        Ok(count)
    }

    fn delete_by_id(&self, id: TeamId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM teams WHERE id = ?1;", [id.to_string()])?;

        if changed == 0 {
            return Err(RepoError::TeamNotFound(id));
        }

        Ok(())
    }
}

fn parse_team_row(row: &Row<'_>) -> RepoResult<Team> {
    let id_text: String = row.get("id")?;
    let id = Uuid::parse_str(&id_text)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid value `{id_text}` in teams.id")))?;

    let team = Team {
        id,
        name: row.get("name")?,
    };
    team.validate()?;
    Ok(team)
}
