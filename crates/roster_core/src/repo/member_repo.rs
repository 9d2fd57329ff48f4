//! Member repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide stable CRUD and finder APIs over the `members` table.
//! - Translate query descriptors into SQL inside the persistence boundary.
//!
//! # Invariants
//! - Write paths must call `Member::validate()` before SQL mutations.
//! - Read paths must reject invalid persisted state instead of masking it.
//! - Rows produced from a descriptor are ordered deterministically: every
//!   `ORDER BY` ends with an `id ASC` tiebreak.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::member::{Member, MemberId, MemberValidationError};
use crate::model::team::{Team, TeamId, TeamValidationError};
use crate::query::{AgeFilter, MemberQuery, Page, PageRequest, Sort, SortDirection, SortKey};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const MEMBER_SELECT_SQL: &str = "SELECT id, username, age, team_id FROM members";

pub type RepoResult<T> = Result<T, RepoError>;

/// Generic repository error for roster persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    MemberValidation(MemberValidationError),
    TeamValidation(TeamValidationError),
    Db(DbError),
    MemberNotFound(MemberId),
    TeamNotFound(TeamId),
    /// A single-result finder matched more than one row.
    NonUniqueResult { username: String },
    /// A locking read was attempted on an autocommit connection.
    LockRequiresTransaction,
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Required table is missing.
    MissingRequiredTable(&'static str),
    /// Required column is missing from expected table.
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    /// Persisted data cannot be converted to a valid entity.
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MemberValidation(err) => write!(f, "{err}"),
            Self::TeamValidation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::MemberNotFound(id) => write!(f, "member not found: {id}"),
            Self::TeamNotFound(id) => write!(f, "team not found: {id}"),
            Self::NonUniqueResult { username } => {
                write!(f, "more than one member matches username `{username}`")
            }
            Self::LockRequiresTransaction => {
                write!(f, "locking read requires an enclosing transaction")
            }
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "required table `{table}` is missing")
            }
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` is missing")
            }
            Self::InvalidData(message) => write!(f, "invalid persisted row data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::MemberValidation(err) => Some(err),
            Self::TeamValidation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<MemberValidationError> for RepoError {
    fn from(value: MemberValidationError) -> Self {
        Self::MemberValidation(value)
    }
}

impl From<TeamValidationError> for RepoError {
    fn from(value: TeamValidationError) -> Self {
        Self::TeamValidation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Read-only projection of a member and its team name.
///
/// Built from an inner join, so only members that belong to a team appear.
/// Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberSummary {
    pub member_id: MemberId,
    pub username: String,
    pub team_name: String,
}

/// Member with its team loaded eagerly in the same query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberWithTeam {
    pub member: Member,
    pub team: Option<Team>,
}

/// Repository interface for member persistence and queries.
///
/// Named finders are default methods: each one only fills in a
/// [`MemberQuery`] descriptor and delegates to [`list`](Self::list), so a
/// finder's name never carries semantics the descriptor cannot express.
pub trait MemberRepository {
    /// Inserts or fully replaces the member row keyed by `member.id`.
    fn save(&self, member: &Member) -> RepoResult<MemberId>;

    /// Loads one member by id. Missing rows are `Ok(None)`.
    fn find_by_id(&self, id: MemberId) -> RepoResult<Option<Member>>;

    /// Counts all member rows.
    fn count(&self) -> RepoResult<u64>;

    /// Deletes one member row. Missing rows are an error.
    fn delete_by_id(&self, id: MemberId) -> RepoResult<()>;

    /// Runs a query descriptor and returns matching members.
    fn list(&self, query: &MemberQuery) -> RepoResult<Vec<Member>>;

    /// Joins members to their teams and emits one summary per pair.
    fn list_summaries(&self) -> RepoResult<Vec<MemberSummary>>;

    /// Returns one bounded slice of members with the given age, plus the
    /// total matching row count.
    fn page_by_age(&self, age: i64, request: &PageRequest) -> RepoResult<Page<Member>>;

    /// Increments `age` for every member at or above `min_age` in a single
    /// statement; returns the number of affected rows.
    fn bulk_age_plus(&self, min_age: i64) -> RepoResult<usize>;

    /// Loads all members with their team association in one query.
    fn list_with_team(&self) -> RepoResult<Vec<MemberWithTeam>>;

    /// Loads members with the given username, team association included.
    fn list_with_team_by_username(&self, username: &str) -> RepoResult<Vec<MemberWithTeam>>;

    /// Locking read: returns members with the given username while making
    /// the enclosing transaction a writer, so concurrent writers block
    /// until it ends. Fails with [`RepoError::LockRequiresTransaction`] on
    /// an autocommit connection.
    fn lock_by_username(&self, username: &str) -> RepoResult<Vec<Member>>;

    /// All members, ordered by username.
    fn find_all(&self) -> RepoResult<Vec<Member>> {
        self.list(&MemberQuery {
            sort: vec![Sort::asc(SortKey::Username)],
            ..MemberQuery::default()
        })
    }

    /// Members with exactly this username. Empty vec when none match.
    fn list_by_username(&self, username: &str) -> RepoResult<Vec<Member>> {
        self.list(&MemberQuery::by_username(username))
    }

    /// Members with this username and age strictly above `age`.
    fn list_by_username_and_age_over(&self, username: &str, age: i64) -> RepoResult<Vec<Member>> {
        self.list(&MemberQuery {
            age: Some(AgeFilter::Above(age)),
            ..MemberQuery::by_username(username)
        })
    }

    /// Members matching both fields exactly.
    fn list_by_username_and_age(&self, username: &str, age: i64) -> RepoResult<Vec<Member>> {
        self.list(&MemberQuery {
            age: Some(AgeFilter::Exactly(age)),
            ..MemberQuery::by_username(username)
        })
    }

    /// Members belonging to the given team.
    fn list_by_team(&self, team_id: TeamId) -> RepoResult<Vec<Member>> {
        self.list(&MemberQuery {
            team_id: Some(team_id),
            sort: vec![Sort::asc(SortKey::Username)],
            ..MemberQuery::default()
        })
    }

    /// Single-result finder: `Ok(None)` when absent, an error when the
    /// username matches more than one row.
    fn find_unique_by_username(&self, username: &str) -> RepoResult<Option<Member>> {
        let mut matches = self.list(&MemberQuery {
            limit: Some(2),
            ..MemberQuery::by_username(username)
        })?;

        match matches.len() {
            0 => Ok(None),
            1 => Ok(Some(matches.remove(0))),
            _ => Err(RepoError::NonUniqueResult {
                username: username.to_string(),
            }),
        }
    }
}

/// SQLite-backed member repository.
///
/// `rusqlite::Transaction` derefs to `Connection`, so the same type serves
/// autocommit callers and callers that own a transaction.
pub struct SqliteMemberRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteMemberRepository<'conn> {
    /// Constructs a repository after checking the connection is migrated
    /// and carries the tables/columns this repository touches.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl MemberRepository for SqliteMemberRepository<'_> {
    fn save(&self, member: &Member) -> RepoResult<MemberId> {
        member.validate()?;

        self.conn.execute(
            "INSERT INTO members (id, username, age, team_id)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(id) DO UPDATE SET
                username = excluded.username,
                age = excluded.age,
                team_id = excluded.team_id;",
            params![
                member.id.to_string(),
                member.username.as_str(),
                member.age,
                member.team_id.map(|id| id.to_string()),
            ],
        )?;

        Ok(member.id)
    }

    fn find_by_id(&self, id: MemberId) -> RepoResult<Option<Member>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{MEMBER_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_member_row(row)?));
        }

        Ok(None)
    }

    fn count(&self) -> RepoResult<u64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM members;", [], |row| {
                row.get::<_, u64>(0)
            })?;
        Ok(count)
    }

    fn delete_by_id(&self, id: MemberId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM members WHERE id = ?1;", [id.to_string()])?;

        if changed == 0 {
            return Err(RepoError::MemberNotFound(id));
        }

        Ok(())
    }

    fn list(&self, query: &MemberQuery) -> RepoResult<Vec<Member>> {
        let mut sql = format!("{MEMBER_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        push_member_predicates(query, &mut sql, &mut bind_values);
        sql.push_str(&order_by_clause(&query.sort, ""));

        if let Some(limit) = query.limit {
            sql.push_str(" LIMIT ?");
            bind_values.push(Value::Integer(i64::from(limit)));
            if query.offset > 0 {
                sql.push_str(" OFFSET ?");
                bind_values.push(Value::Integer(i64::from(query.offset)));
            }
        } else if query.offset > 0 {
            sql.push_str(" LIMIT -1 OFFSET ?");
            bind_values.push(Value::Integer(i64::from(query.offset)));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut members = Vec::new();

        while let Some(row) = rows.next()? {
            members.push(parse_member_row(row)?);
        }

        Ok(members)
    }

    fn list_summaries(&self) -> RepoResult<Vec<MemberSummary>> {
        let mut stmt = self.conn.prepare(
            "SELECT m.id AS id, m.username AS username, t.name AS team_name
             FROM members m
             INNER JOIN teams t ON t.id = m.team_id
             ORDER BY m.username ASC, m.id ASC;",
        )?;

        let mut rows = stmt.query([])?;
        let mut summaries = Vec::new();
        while let Some(row) = rows.next()? {
            let id_text: String = row.get("id")?;
            summaries.push(MemberSummary {
                member_id: parse_uuid(&id_text, "members.id")?,
                username: row.get("username")?,
                team_name: row.get("team_name")?,
            });
        }

        Ok(summaries)
    }

    fn page_by_age(&self, age: i64, request: &PageRequest) -> RepoResult<Page<Member>> {
        let mut sql = String::from(
            "SELECT m.id AS id, m.username AS username, m.age AS age, m.team_id AS team_id
             FROM members m
             LEFT JOIN teams t ON t.id = m.team_id
             WHERE m.age = ?1",
        );
        sql.push_str(&order_by_clause(request.sort(), "m."));
        sql.push_str(" LIMIT ?2 OFFSET ?3");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params![
            age,
            i64::from(request.size()),
            i64::try_from(request.offset()).unwrap_or(i64::MAX),
        ])?;

        let mut content = Vec::new();
        while let Some(row) = rows.next()? {
            content.push(parse_member_row(row)?);
        }

        // The count query skips the team join: the join changes row shape,
        // never row count.
        let total = self.conn.query_row(
            "SELECT COUNT(*) FROM members WHERE age = ?1;",
            [age],
            |row| row.get::<_, u64>(0),
        )?;

        Ok(Page::new(content, request, total))
    }

    fn bulk_age_plus(&self, min_age: i64) -> RepoResult<usize> {
        let changed = self.conn.execute(
            "UPDATE members SET age = age + 1 WHERE age >= ?1;",
            [min_age],
        )?;
        Ok(changed)
    }

    fn list_with_team(&self) -> RepoResult<Vec<MemberWithTeam>> {
        self.query_with_team(None)
    }

    fn list_with_team_by_username(&self, username: &str) -> RepoResult<Vec<MemberWithTeam>> {
        self.query_with_team(Some(username))
    }

    fn lock_by_username(&self, username: &str) -> RepoResult<Vec<Member>> {
        if self.conn.is_autocommit() {
            return Err(RepoError::LockRequiresTransaction);
        }

        // SQLite locks at database granularity. The touch update makes the
        // enclosing transaction a writer, so concurrent writers block until
        // it commits or rolls back.
        self.conn.execute(
            "UPDATE members SET id = id WHERE username = ?1;",
            [username],
        )?;

        self.list(&MemberQuery::by_username(username))
    }
}

impl SqliteMemberRepository<'_> {
    fn query_with_team(&self, username: Option<&str>) -> RepoResult<Vec<MemberWithTeam>> {
        let mut sql = String::from(
            "SELECT
                m.id AS id,
                m.username AS username,
                m.age AS age,
                m.team_id AS team_id,
                t.name AS team_name
             FROM members m
             LEFT JOIN teams t ON t.id = m.team_id
             WHERE 1 = 1",
        );
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(username) = username {
            sql.push_str(" AND m.username = ?");
            bind_values.push(Value::Text(username.to_string()));
        }
        sql.push_str(" ORDER BY m.username ASC, m.id ASC;");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut results = Vec::new();

        while let Some(row) = rows.next()? {
            let member = parse_member_row(row)?;
            let team = match member.team_id {
                Some(team_id) => {
                    let name: String = row.get("team_name")?;
                    Some(Team::with_id(team_id, name))
                }
                None => None,
            };
            results.push(MemberWithTeam { member, team });
        }

        Ok(results)
    }
}

fn push_member_predicates(query: &MemberQuery, sql: &mut String, bind_values: &mut Vec<Value>) {
    if let Some(username) = query.username.as_ref() {
        sql.push_str(" AND username = ?");
        bind_values.push(Value::Text(username.clone()));
    }

    if let Some(age) = query.age {
        let (op, value) = match age {
            AgeFilter::Exactly(value) => ("=", value),
            AgeFilter::Above(value) => (">", value),
            AgeFilter::AtLeast(value) => (">=", value),
        };
        sql.push_str(&format!(" AND age {op} ?"));
        bind_values.push(Value::Integer(value));
    }

    if let Some(team_id) = query.team_id {
        sql.push_str(" AND team_id = ?");
        bind_values.push(Value::Text(team_id.to_string()));
    }
}

fn order_by_clause(sort: &[Sort], prefix: &str) -> String {
    let mut clause = String::from(" ORDER BY ");
    for directive in sort {
        let column = match directive.key {
            SortKey::Username => "username",
            SortKey::Age => "age",
        };
        let direction = match directive.direction {
            SortDirection::Ascending => "ASC",
            SortDirection::Descending => "DESC",
        };
        clause.push_str(&format!("{prefix}{column} {direction}, "));
    }
    clause.push_str(&format!("{prefix}id ASC"));
    clause
}

fn parse_member_row(row: &Row<'_>) -> RepoResult<Member> {
    let id_text: String = row.get("id")?;
    let id = parse_uuid(&id_text, "members.id")?;

    let team_id = match row.get::<_, Option<String>>("team_id")? {
        Some(value) => Some(parse_uuid(&value, "members.team_id")?),
        None => None,
    };

    let member = Member {
        id,
        username: row.get("username")?,
        age: row.get("age")?,
        team_id,
    };
    member.validate()?;
    Ok(member)
}

fn parse_uuid(value: &str, source: &str) -> RepoResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid value `{value}` in {source}")))
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    for table in ["members", "teams"] {
        if !table_exists(conn, table)? {
            return Err(RepoError::MissingRequiredTable(table));
        }
    }

    for column in ["id", "username", "age", "team_id"] {
        if !table_has_column(conn, "members", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "members",
                column,
            });
        }
    }

    for column in ["id", "name"] {
        if !table_has_column(conn, "teams", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "teams",
                column,
            });
        }
    }

    Ok(())
}

pub(crate) fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

pub(crate) fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
