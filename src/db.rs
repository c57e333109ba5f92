// 🗄️ SQLite Store - Bill text references + primary bill data
//
// Versions are stored as their print-number suffix ('' = base version).
// Timestamps are stored as ISO strings so they sort lexically.

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use tracing::debug;

use crate::entities::{BaseBillId, Bill, BillTextReference, Version};
use crate::store::{BillRepository, ReferenceStore};

const DB_DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

pub fn setup_database(conn: &Connection) -> Result<()> {
    // Enable WAL mode for crash recovery
    conn.pragma_update(None, "journal_mode", "WAL")?;

    // ==========================================================================
    // Scraped references (one row per bill, version and scrape time)
    // ==========================================================================
    conn.execute(
        "CREATE TABLE IF NOT EXISTS bill_text_reference (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            session_year INTEGER NOT NULL,
            bill_print_no TEXT NOT NULL,
            version TEXT NOT NULL,
            reference_date_time TEXT NOT NULL,
            text TEXT NOT NULL,
            memo TEXT NOT NULL,
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
            UNIQUE (session_year, bill_print_no, version, reference_date_time)
        )",
        [],
    )?;

    // ==========================================================================
    // Primary bill data
    // ==========================================================================
    conn.execute(
        "CREATE TABLE IF NOT EXISTS bill (
            session_year INTEGER NOT NULL,
            bill_print_no TEXT NOT NULL,
            active_version TEXT,
            PRIMARY KEY (session_year, bill_print_no)
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS bill_amendment (
            session_year INTEGER NOT NULL,
            bill_print_no TEXT NOT NULL,
            version TEXT NOT NULL,
            full_text TEXT NOT NULL,
            memo TEXT NOT NULL,
            PRIMARY KEY (session_year, bill_print_no, version)
        )",
        [],
    )?;

    // ==========================================================================
    // Indexes
    // ==========================================================================
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_reference_bill
         ON bill_text_reference(session_year, bill_print_no, reference_date_time)",
        [],
    )?;

    Ok(())
}

fn parse_version(suffix: &str) -> Result<Version> {
    Version::from_suffix(Some(suffix))
        .with_context(|| format!("Invalid stored version: {:?}", suffix))
}

// ============================================================================
// SQLITE STORE
// ============================================================================

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (and initialize) a database file
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;
        Self::from_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    pub fn from_connection(conn: Connection) -> Result<Self> {
        setup_database(&conn)?;
        Ok(SqliteStore { conn })
    }

    /// Write a bill and all of its amendments (replaces existing rows)
    pub fn save_bill(&self, bill: &Bill) -> Result<()> {
        let id = &bill.base_bill_id;
        let active = bill.active_version.map(|v| v.suffix());

        self.conn.execute(
            "INSERT INTO bill (session_year, bill_print_no, active_version)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(session_year, bill_print_no)
             DO UPDATE SET active_version = excluded.active_version",
            params![id.session, id.print_no(), active],
        )?;

        for (version, amendment) in &bill.amendments {
            self.conn.execute(
                "INSERT INTO bill_amendment (session_year, bill_print_no, version, full_text, memo)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT(session_year, bill_print_no, version)
                 DO UPDATE SET full_text = excluded.full_text, memo = excluded.memo",
                params![
                    id.session,
                    id.print_no(),
                    version.suffix(),
                    amendment.full_text,
                    amendment.memo,
                ],
            )?;
        }

        Ok(())
    }

    pub fn reference_count(&self) -> Result<i64> {
        let count: i64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM bill_text_reference", [], |row| row.get(0))?;

        Ok(count)
    }
}

impl ReferenceStore for SqliteStore {
    fn upsert(&self, reference: &BillTextReference) -> Result<()> {
        let base = reference.base_bill_id();
        let ref_date_time = reference
            .ref_date_time()
            .format(DB_DATE_TIME_FORMAT)
            .to_string();

        self.conn
            .execute(
                "INSERT INTO bill_text_reference (
                    session_year, bill_print_no, version, reference_date_time, text, memo
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                ON CONFLICT(session_year, bill_print_no, version, reference_date_time)
                DO UPDATE SET text = excluded.text, memo = excluded.memo",
                params![
                    base.session,
                    base.print_no(),
                    reference.active_version().suffix(),
                    ref_date_time,
                    reference.text(),
                    reference.memo(),
                ],
            )
            .with_context(|| format!("Failed to save reference for {}", reference.bill_id()))?;

        debug!("Saved reference {} @ {}", reference.bill_id(), ref_date_time);
        Ok(())
    }

    fn latest_reference(&self, bill_id: &BaseBillId) -> Result<Option<BillTextReference>> {
        let row: Option<(String, String, String, String)> = self
            .conn
            .query_row(
                "SELECT version, reference_date_time, text, memo
                 FROM bill_text_reference
                 WHERE session_year = ?1 AND bill_print_no = ?2
                 ORDER BY reference_date_time DESC
                 LIMIT 1",
                params![bill_id.session, bill_id.print_no()],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
            )
            .optional()?;

        let Some((version, ref_date_time, text, memo)) = row else {
            return Ok(None);
        };

        let version = parse_version(&version)?;
        let ref_date_time = NaiveDateTime::parse_from_str(&ref_date_time, DB_DATE_TIME_FORMAT)
            .with_context(|| format!("Invalid stored reference time: {}", ref_date_time))?;

        Ok(Some(BillTextReference::new(
            bill_id.with_version(version),
            ref_date_time,
            text,
            memo,
        )))
    }

    fn referenced_bills(&self) -> Result<Vec<BaseBillId>> {
        let mut stmt = self.conn.prepare(
            "SELECT DISTINCT session_year, bill_print_no
             FROM bill_text_reference
             ORDER BY session_year, bill_print_no",
        )?;

        let rows = stmt
            .query_map([], |row| Ok((row.get::<_, i32>(0)?, row.get::<_, String>(1)?)))?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(session, print_no)| {
                BaseBillId::from_print_no(&print_no, session)
                    .with_context(|| format!("Invalid stored print no: {}", print_no))
            })
            .collect()
    }
}

impl BillRepository for SqliteStore {
    fn get_bill(&self, bill_id: &BaseBillId) -> Result<Option<Bill>> {
        let active: Option<Option<String>> = self
            .conn
            .query_row(
                "SELECT active_version FROM bill WHERE session_year = ?1 AND bill_print_no = ?2",
                params![bill_id.session, bill_id.print_no()],
                |row| row.get(0),
            )
            .optional()?;

        let Some(active) = active else {
            return Ok(None);
        };

        let mut bill = Bill::new(bill_id.clone());
        bill.active_version = active.as_deref().map(parse_version).transpose()?;

        let mut stmt = self.conn.prepare(
            "SELECT version, full_text, memo
             FROM bill_amendment
             WHERE session_year = ?1 AND bill_print_no = ?2",
        )?;

        let amendments = stmt
            .query_map(params![bill_id.session, bill_id.print_no()], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        for (version, full_text, memo) in amendments {
            bill.add_amendment(parse_version(&version)?, &full_text, &memo);
        }

        Ok(Some(bill))
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::BillType;
    use chrono::NaiveDate;

    fn create_test_reference(day: u32, version: Version, text: &str) -> BillTextReference {
        BillTextReference::new(
            BaseBillId::new(BillType::S, 1234, 2015).with_version(version),
            NaiveDate::from_ymd_opt(2015, 3, day)
                .unwrap()
                .and_hms_opt(9, 15, 0)
                .unwrap(),
            text.to_string(),
            "memo".to_string(),
        )
    }

    #[test]
    fn test_upsert_is_idempotent() {
        let store = SqliteStore::open_in_memory().unwrap();
        let reference = create_test_reference(10, Version::Base, "text");

        store.upsert(&reference).unwrap();
        store.upsert(&reference).unwrap();
        assert_eq!(store.reference_count().unwrap(), 1);

        // same key, new text replaces the row
        let updated = create_test_reference(10, Version::Base, "new text");
        store.upsert(&updated).unwrap();
        assert_eq!(store.reference_count().unwrap(), 1);

        let latest = store
            .latest_reference(reference.base_bill_id())
            .unwrap()
            .unwrap();
        assert_eq!(latest.text(), "new text");

        println!("✅ Idempotent upsert test PASSED");
    }

    #[test]
    fn test_latest_reference_by_scrape_time() {
        let store = SqliteStore::open_in_memory().unwrap();
        store
            .upsert(&create_test_reference(10, Version::Base, "old"))
            .unwrap();
        store
            .upsert(&create_test_reference(12, Version::Amendment('A'), "newest"))
            .unwrap();
        store
            .upsert(&create_test_reference(11, Version::Base, "middle"))
            .unwrap();

        let latest = store
            .latest_reference(&BaseBillId::new(BillType::S, 1234, 2015))
            .unwrap()
            .unwrap();

        assert_eq!(latest.text(), "newest");
        assert_eq!(latest.active_version(), Version::Amendment('A'));
        assert_eq!(latest.ref_date_time().date(), NaiveDate::from_ymd_opt(2015, 3, 12).unwrap());

        let missing = store
            .latest_reference(&BaseBillId::new(BillType::A, 1, 2015))
            .unwrap();
        assert!(missing.is_none());
    }

    #[test]
    fn test_referenced_bills() {
        let store = SqliteStore::open_in_memory().unwrap();
        store
            .upsert(&create_test_reference(10, Version::Base, "a"))
            .unwrap();
        store
            .upsert(&create_test_reference(11, Version::Base, "b"))
            .unwrap();

        let bills = store.referenced_bills().unwrap();
        assert_eq!(bills, vec![BaseBillId::new(BillType::S, 1234, 2015)]);
    }

    #[test]
    fn test_save_and_get_bill() {
        let store = SqliteStore::open_in_memory().unwrap();
        let mut bill = Bill::new(BaseBillId::new(BillType::A, 77, 2017));
        bill.add_amendment(Version::Base, "base text", "base memo");
        bill.add_amendment(Version::Amendment('A'), "amended text", "amended memo");
        bill.active_version = Some(Version::Amendment('A'));

        store.save_bill(&bill).unwrap();
        let loaded = store.get_bill(&bill.base_bill_id).unwrap().unwrap();

        assert_eq!(loaded.active_version, Some(Version::Amendment('A')));
        assert_eq!(loaded.amendments.len(), 2);
        assert_eq!(
            loaded.amendment(Version::Amendment('A')).unwrap().full_text,
            "amended text"
        );

        assert!(store
            .get_bill(&BaseBillId::new(BillType::A, 78, 2017))
            .unwrap()
            .is_none());

        println!("✅ Bill repository test PASSED");
    }

    #[test]
    fn test_bill_without_active_version() {
        let store = SqliteStore::open_in_memory().unwrap();
        let mut bill = Bill::new(BaseBillId::new(BillType::S, 5, 2015));
        bill.add_amendment(Version::Base, "text", "");

        store.save_bill(&bill).unwrap();
        let loaded = store.get_bill(&bill.base_bill_id).unwrap().unwrap();

        assert_eq!(loaded.active_version, None);
        assert!(loaded.has_amendment(Version::Base));
    }
}
