use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, Duration, NaiveDate, SecondsFormat, Utc};
use rusqlite::functions::FunctionFlags;
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Row, params, params_from_iter};

use super::Store;
use super::filter::{CASEFOLD_FN, CandidateFilter, compile};
use super::schema::SCHEMA;
use crate::error::{Error, Result};
use crate::types::*;

/// Trailing window, in days, counted as "recent" on the dashboard.
pub const RECENT_WINDOW_DAYS: i64 = 7;

/// Label for candidates whose recruiter row no longer exists.
pub const REMOVED_USER_LABEL: &str = "(removed user)";

const USER_COLUMNS: &str =
    "id, username, email, full_name, role, is_active, created_at, updated_at";

const CANDIDATE_SELECT: &str = "SELECT c.id, c.first_name, c.last_name, c.email, c.phone, \
     c.location, c.linkedin_url, c.current_role, c.current_company, c.years_of_experience, \
     c.skills, c.education, c.status, c.position_applied, c.recruiter_id, u.full_name, \
     c.source, c.salary_expectation, c.notice_period, c.resume_url, c.notes, c.created_by, \
     c.created_at, c.updated_at
     FROM candidates c
     LEFT JOIN users u ON c.recruiter_id = u.id";

const CANDIDATE_ORDER: &str = "ORDER BY c.created_at DESC, c.id DESC";

const INTERACTION_SELECT: &str = "SELECT ch.id, ch.candidate_id, ch.recruiter_id, ch.call_date, \
     ch.call_type, ch.duration, ch.outcome, ch.notes, ch.next_action, ch.next_action_date, \
     ch.created_at, u.full_name, c.first_name || ' ' || c.last_name, c.email
     FROM call_history ch
     LEFT JOIN users u ON ch.recruiter_id = u.id
     LEFT JOIN candidates c ON ch.candidate_id = c.id";

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let conn = Connection::open(db_path)?;

        conn.pragma_update(None, "foreign_keys", "ON")?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        register_functions(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// A private in-memory database, gone when the store is dropped.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        register_functions(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn register_functions(conn: &Connection) -> Result<()> {
    conn.create_scalar_function(
        CASEFOLD_FN,
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let text: Option<String> = ctx.get(0)?;
            Ok(text.map(|t| t.to_lowercase()))
        },
    )?;
    Ok(())
}

fn parse_datetime(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| {
            // Handle SQLite's default datetime format: "YYYY-MM-DD HH:MM:SS"
            chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .unwrap_or_else(|e| {
            tracing::error!("Invalid datetime in database: '{}' - {}", s, e);
            Utc::now()
        })
}

/// Fixed-width UTC timestamps so text ordering matches time ordering.
fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn format_date(date: &NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn date_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<NaiveDate>> {
    row.get::<_, Option<String>>(idx)?
        .map(|s| {
            NaiveDate::parse_from_str(&s, "%Y-%m-%d")
                .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
        })
        .transpose()
}

/// Blank optional text is stored as NULL.
fn text_or_null(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Maps UNIQUE violations to `DuplicateKey` naming the offending column.
fn map_constraint(err: rusqlite::Error) -> Error {
    if let rusqlite::Error::SqliteFailure(failure, Some(message)) = &err {
        if failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE {
            let column = message
                .rsplit_once('.')
                .map_or(message.as_str(), |(_, column)| column);
            return Error::DuplicateKey(column.to_string());
        }
    }
    Error::from(err)
}

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        email: row.get(2)?,
        full_name: row.get(3)?,
        role: row.get(4)?,
        is_active: row.get(5)?,
        created_at: parse_datetime(&row.get::<_, String>(6)?),
        updated_at: parse_datetime(&row.get::<_, String>(7)?),
    })
}

fn candidate_from_row(row: &Row<'_>) -> rusqlite::Result<Candidate> {
    Ok(Candidate {
        id: row.get(0)?,
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        email: row.get(3)?,
        phone: row.get(4)?,
        location: row.get(5)?,
        linkedin_url: row.get(6)?,
        current_role: row.get(7)?,
        current_company: row.get(8)?,
        years_of_experience: row.get(9)?,
        skills: row.get(10)?,
        education: row.get(11)?,
        status: row.get(12)?,
        position_applied: row.get(13)?,
        recruiter_id: row.get(14)?,
        recruiter_name: row.get(15)?,
        source: row.get(16)?,
        salary_expectation: row.get(17)?,
        notice_period: row.get(18)?,
        resume_url: row.get(19)?,
        notes: row.get(20)?,
        created_by: row.get(21)?,
        created_at: parse_datetime(&row.get::<_, String>(22)?),
        updated_at: parse_datetime(&row.get::<_, String>(23)?),
    })
}

fn interaction_from_row(row: &Row<'_>) -> rusqlite::Result<Interaction> {
    Ok(Interaction {
        id: row.get(0)?,
        candidate_id: row.get(1)?,
        recruiter_id: row.get(2)?,
        call_date: parse_datetime(&row.get::<_, String>(3)?),
        call_type: row.get(4)?,
        duration: row.get(5)?,
        outcome: row.get(6)?,
        notes: row.get(7)?,
        next_action: row.get(8)?,
        next_action_date: date_column(row, 9)?,
        created_at: parse_datetime(&row.get::<_, String>(10)?),
        recruiter_name: row.get(11)?,
        candidate_name: row.get(12)?,
        candidate_email: row.get(13)?,
    })
}

/// Orders group-by buckets by count descending, then label ascending.
fn ranked(counts: HashMap<String, i64>) -> Vec<LabelCount> {
    let mut buckets: Vec<LabelCount> = counts
        .into_iter()
        .map(|(label, count)| LabelCount { label, count })
        .collect();
    buckets.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));
    buckets
}

impl Store for SqliteStore {
    fn initialize(&self) -> Result<()> {
        self.conn().execute_batch(SCHEMA)?;
        Ok(())
    }

    // User operations

    fn create_user(&self, user: &NewUser) -> Result<User> {
        let id = {
            let conn = self.conn();
            conn.execute(
                "INSERT INTO users (username, email, password_hash, full_name, role, is_active, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, 1, ?6, ?6)",
                params![
                    user.username,
                    user.email,
                    user.password_hash,
                    user.full_name,
                    user.role,
                    format_datetime(&user.created_at),
                ],
            )
            .map_err(map_constraint)?;
            conn.last_insert_rowid()
        };

        self.get_user(id)?.ok_or(Error::NotFound)
    }

    fn get_user(&self, id: i64) -> Result<Option<User>> {
        let conn = self.conn();
        conn.query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
            params![id],
            user_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let conn = self.conn();
        conn.query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE username = ?1"),
            params![username],
            user_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn get_stored_user(&self, username: &str) -> Result<Option<StoredUser>> {
        let conn = self.conn();
        conn.query_row(
            &format!("SELECT {USER_COLUMNS}, password_hash FROM users WHERE username = ?1"),
            params![username],
            |row| {
                Ok(StoredUser {
                    user: user_from_row(row)?,
                    password_hash: row.get(8)?,
                })
            },
        )
        .optional()
        .map_err(Error::from)
    }

    fn get_password_hash(&self, id: i64) -> Result<Option<String>> {
        let conn = self.conn();
        conn.query_row(
            "SELECT password_hash FROM users WHERE id = ?1",
            params![id],
            |row| row.get(0),
        )
        .optional()
        .map_err(Error::from)
    }

    fn list_users(&self, include_inactive: bool) -> Result<Vec<User>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {USER_COLUMNS} FROM users
             WHERE ?1 OR is_active = 1
             ORDER BY created_at DESC, id DESC"
        ))?;

        let rows = stmt.query_map(params![include_inactive], user_from_row)?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn list_recruiters(&self) -> Result<Vec<User>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {USER_COLUMNS} FROM users
             WHERE role IN ('admin', 'recruiter') AND is_active = 1
             ORDER BY full_name, id"
        ))?;

        let rows = stmt.query_map([], user_from_row)?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn count_users(&self) -> Result<i64> {
        let conn = self.conn();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
        Ok(count)
    }

    fn update_user_profile(
        &self,
        id: i64,
        full_name: &str,
        email: &str,
        now: DateTime<Utc>,
    ) -> Result<()> {
        let rows = self
            .conn()
            .execute(
                "UPDATE users SET full_name = ?1, email = ?2, updated_at = ?3 WHERE id = ?4",
                params![full_name, email, format_datetime(&now), id],
            )
            .map_err(map_constraint)?;

        if rows == 0 {
            return Err(Error::NotFound);
        }
        Ok(())
    }

    fn update_user_role(&self, id: i64, role: Role, now: DateTime<Utc>) -> Result<()> {
        let rows = self.conn().execute(
            "UPDATE users SET role = ?1, updated_at = ?2 WHERE id = ?3",
            params![role, format_datetime(&now), id],
        )?;

        if rows == 0 {
            return Err(Error::NotFound);
        }
        Ok(())
    }

    fn toggle_user_active(&self, id: i64, now: DateTime<Utc>) -> Result<()> {
        let rows = self.conn().execute(
            "UPDATE users SET is_active = NOT is_active, updated_at = ?1 WHERE id = ?2",
            params![format_datetime(&now), id],
        )?;

        if rows == 0 {
            return Err(Error::NotFound);
        }
        Ok(())
    }

    fn update_password_hash(&self, id: i64, hash: &str, now: DateTime<Utc>) -> Result<()> {
        let rows = self.conn().execute(
            "UPDATE users SET password_hash = ?1, updated_at = ?2 WHERE id = ?3",
            params![hash, format_datetime(&now), id],
        )?;

        if rows == 0 {
            return Err(Error::NotFound);
        }
        Ok(())
    }

    fn delete_user(&self, id: i64) -> Result<bool> {
        let rows = self
            .conn()
            .execute("DELETE FROM users WHERE id = ?1", params![id])?;
        Ok(rows > 0)
    }

    // Candidate operations

    fn create_candidate(&self, candidate: &NewCandidate) -> Result<i64> {
        let c = &candidate.input;
        let conn = self.conn();
        conn.execute(
            "INSERT INTO candidates (
                first_name, last_name, email, phone, location, linkedin_url,
                current_role, current_company, years_of_experience, skills, education,
                status, position_applied, recruiter_id, source,
                salary_expectation, notice_period, resume_url, notes, created_by,
                created_at, updated_at
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15,
                       ?16, ?17, ?18, ?19, ?20, ?21, ?21)",
            params![
                c.first_name.trim(),
                c.last_name.trim(),
                c.email.trim(),
                text_or_null(&c.phone),
                text_or_null(&c.location),
                text_or_null(&c.linkedin_url),
                text_or_null(&c.current_role),
                text_or_null(&c.current_company),
                c.years_of_experience,
                text_or_null(&c.skills),
                text_or_null(&c.education),
                c.status,
                text_or_null(&c.position_applied),
                c.recruiter_id,
                text_or_null(&c.source),
                text_or_null(&c.salary_expectation),
                text_or_null(&c.notice_period),
                text_or_null(&c.resume_url),
                text_or_null(&c.notes),
                candidate.created_by,
                format_datetime(&candidate.created_at),
            ],
        )
        .map_err(map_constraint)?;
        Ok(conn.last_insert_rowid())
    }

    fn get_candidate(&self, id: i64) -> Result<Option<Candidate>> {
        let conn = self.conn();
        conn.query_row(
            &format!("{CANDIDATE_SELECT} WHERE c.id = ?1"),
            params![id],
            candidate_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn list_candidates(&self) -> Result<Vec<Candidate>> {
        self.search_candidates(&CandidateFilter::default())
    }

    fn search_candidates(&self, filter: &CandidateFilter) -> Result<Vec<Candidate>> {
        let compiled = compile(&filter.predicates());
        let sql = if compiled.clause.is_empty() {
            format!("{CANDIDATE_SELECT} {CANDIDATE_ORDER}")
        } else {
            format!("{CANDIDATE_SELECT} WHERE {} {CANDIDATE_ORDER}", compiled.clause)
        };

        let conn = self.conn();
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(compiled.params.iter()), candidate_from_row)?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn update_candidate(&self, id: i64, input: &CandidateInput, now: DateTime<Utc>) -> Result<()> {
        let c = input;
        let rows = self
            .conn()
            .execute(
                "UPDATE candidates
                 SET first_name = ?1, last_name = ?2, email = ?3, phone = ?4, location = ?5,
                     linkedin_url = ?6, current_role = ?7, current_company = ?8,
                     years_of_experience = ?9, skills = ?10, education = ?11, status = ?12,
                     position_applied = ?13, recruiter_id = ?14, source = ?15,
                     salary_expectation = ?16, notice_period = ?17, resume_url = ?18, notes = ?19,
                     updated_at = ?20
                 WHERE id = ?21",
                params![
                    c.first_name.trim(),
                    c.last_name.trim(),
                    c.email.trim(),
                    text_or_null(&c.phone),
                    text_or_null(&c.location),
                    text_or_null(&c.linkedin_url),
                    text_or_null(&c.current_role),
                    text_or_null(&c.current_company),
                    c.years_of_experience,
                    text_or_null(&c.skills),
                    text_or_null(&c.education),
                    c.status,
                    text_or_null(&c.position_applied),
                    c.recruiter_id,
                    text_or_null(&c.source),
                    text_or_null(&c.salary_expectation),
                    text_or_null(&c.notice_period),
                    text_or_null(&c.resume_url),
                    text_or_null(&c.notes),
                    format_datetime(&now),
                    id,
                ],
            )
            .map_err(map_constraint)?;

        if rows == 0 {
            return Err(Error::NotFound);
        }
        Ok(())
    }

    fn update_candidate_status(
        &self,
        id: i64,
        status: CandidateStatus,
        now: DateTime<Utc>,
    ) -> Result<()> {
        let rows = self.conn().execute(
            "UPDATE candidates SET status = ?1, updated_at = ?2 WHERE id = ?3",
            params![status, format_datetime(&now), id],
        )?;

        if rows == 0 {
            return Err(Error::NotFound);
        }
        Ok(())
    }

    fn set_candidate_recruiter(
        &self,
        id: i64,
        recruiter_id: Option<i64>,
        now: DateTime<Utc>,
    ) -> Result<()> {
        let rows = self.conn().execute(
            "UPDATE candidates SET recruiter_id = ?1, updated_at = ?2 WHERE id = ?3",
            params![recruiter_id, format_datetime(&now), id],
        )?;

        if rows == 0 {
            return Err(Error::NotFound);
        }
        Ok(())
    }

    fn delete_candidate(&self, id: i64) -> Result<bool> {
        let rows = self
            .conn()
            .execute("DELETE FROM candidates WHERE id = ?1", params![id])?;
        Ok(rows > 0)
    }

    fn candidate_statistics(&self, today: NaiveDate) -> Result<Statistics> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT c.status, c.source, c.recruiter_id, u.full_name, DATE(c.created_at)
             FROM candidates c
             LEFT JOIN users u ON c.recruiter_id = u.id",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, CandidateStatus>(0)?,
                row.get::<_, Option<String>>(1)?,
                row.get::<_, Option<i64>>(2)?,
                row.get::<_, Option<String>>(3)?,
                row.get::<_, Option<String>>(4)?,
            ))
        })?;

        let recent_since = format_date(&(today - Duration::days(RECENT_WINDOW_DAYS)));
        let mut stats = Statistics::default();
        let mut by_source: HashMap<String, i64> = HashMap::new();
        let mut by_recruiter: HashMap<String, i64> = HashMap::new();

        for row in rows {
            let (status, source, recruiter_id, recruiter_name, created_on) = row?;

            stats.total += 1;
            *stats.by_status.entry(status).or_insert(0) += 1;

            if let Some(source) = source {
                *by_source.entry(source).or_insert(0) += 1;
            }
            if recruiter_id.is_some() {
                let label = recruiter_name.unwrap_or_else(|| REMOVED_USER_LABEL.to_string());
                *by_recruiter.entry(label).or_insert(0) += 1;
            }
            if created_on.is_some_and(|d| d >= recent_since) {
                stats.recent += 1;
            }
        }

        stats.by_source = ranked(by_source);
        stats.by_recruiter = ranked(by_recruiter);
        Ok(stats)
    }

    // Interaction operations

    fn create_interaction(&self, interaction: &NewInteraction) -> Result<i64> {
        let conn = self.conn();
        conn.execute(
            "INSERT INTO call_history (
                candidate_id, recruiter_id, call_date, call_type, duration,
                outcome, notes, next_action, next_action_date, created_at
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                interaction.candidate_id,
                interaction.recruiter_id,
                format_datetime(&interaction.call_date),
                interaction.call_type,
                interaction.duration,
                text_or_null(&interaction.outcome),
                text_or_null(&interaction.notes),
                text_or_null(&interaction.next_action),
                interaction.next_action_date.as_ref().map(format_date),
                format_datetime(&interaction.created_at),
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    fn get_interaction(&self, id: i64) -> Result<Option<Interaction>> {
        let conn = self.conn();
        conn.query_row(
            &format!("{INTERACTION_SELECT} WHERE ch.id = ?1"),
            params![id],
            interaction_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn list_interactions(&self, limit: Option<i64>) -> Result<Vec<Interaction>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "{INTERACTION_SELECT} ORDER BY ch.call_date DESC, ch.id DESC LIMIT ?1"
        ))?;

        // A negative LIMIT means no limit in SQLite.
        let rows = stmt.query_map(params![limit.unwrap_or(-1)], interaction_from_row)?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn list_candidate_interactions(&self, candidate_id: i64) -> Result<Vec<Interaction>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "{INTERACTION_SELECT} WHERE ch.candidate_id = ?1 ORDER BY ch.call_date DESC, ch.id DESC"
        ))?;

        let rows = stmt.query_map(params![candidate_id], interaction_from_row)?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn upcoming_followups(&self, today: NaiveDate) -> Result<Vec<Interaction>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "{INTERACTION_SELECT}
             WHERE ch.next_action_date >= ?1
             ORDER BY ch.next_action_date ASC, ch.id ASC"
        ))?;

        let rows = stmt.query_map(params![format_date(&today)], interaction_from_row)?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn delete_interaction(&self, id: i64) -> Result<bool> {
        let rows = self
            .conn()
            .execute("DELETE FROM call_history WHERE id = ?1", params![id])?;
        Ok(rows > 0)
    }

    fn close(&self) -> Result<()> {
        Ok(())
    }
}
