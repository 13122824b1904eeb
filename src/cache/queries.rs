// Cache queries — all SQL for the verdicts table lives here.

use anyhow::Result;
use rusqlite::{params, Connection, OptionalExtension};

/// Fetch the raw stored verdict string and its timestamp.
pub fn get_verdict(conn: &Connection, key: &str) -> Result<Option<(String, String)>> {
    let mut stmt = conn.prepare("SELECT verdict, judged_at FROM verdicts WHERE content_key = ?1")?;
    let result = stmt
        .query_row(params![key], |row| Ok((row.get(0)?, row.get(1)?)))
        .optional()?;
    Ok(result)
}

/// Store a verdict string (upsert).
pub fn set_verdict(conn: &Connection, key: &str, verdict: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO verdicts (content_key, verdict, judged_at)
         VALUES (?1, ?2, strftime('%Y-%m-%dT%H:%M:%SZ', 'now'))
         ON CONFLICT(content_key) DO UPDATE SET
            verdict = ?2,
            judged_at = strftime('%Y-%m-%dT%H:%M:%SZ', 'now')",
        params![key, verdict],
    )?;
    Ok(())
}

/// Count entries per verdict string, most common first.
pub fn verdict_counts(conn: &Connection) -> Result<Vec<(String, u64)>> {
    let mut stmt = conn.prepare(
        "SELECT verdict, COUNT(*) FROM verdicts GROUP BY verdict ORDER BY COUNT(*) DESC, verdict",
    )?;
    let rows = stmt
        .query_map([], |row| {
            let count: i64 = row.get(1)?;
            Ok((row.get::<_, String>(0)?, count as u64))
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::schema::create_tables;

    fn test_db() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        create_tables(&conn).unwrap();
        conn
    }

    #[test]
    fn test_verdict_roundtrip() {
        let conn = test_db();
        assert_eq!(get_verdict(&conn, "abc123").unwrap(), None);

        set_verdict(&conn, "abc123", "PROPER_CONTENT").unwrap();
        let (verdict, judged_at) = get_verdict(&conn, "abc123").unwrap().unwrap();
        assert_eq!(verdict, "PROPER_CONTENT");
        assert!(judged_at.ends_with('Z'));

        // Upsert overwrites
        set_verdict(&conn, "abc123", "ADULT_CONTENT").unwrap();
        let (verdict, _) = get_verdict(&conn, "abc123").unwrap().unwrap();
        assert_eq!(verdict, "ADULT_CONTENT");
    }

    #[test]
    fn test_verdict_counts() {
        let conn = test_db();
        assert!(verdict_counts(&conn).unwrap().is_empty());

        set_verdict(&conn, "a", "PROPER_CONTENT").unwrap();
        set_verdict(&conn, "b", "RACY_CONTENT").unwrap();
        set_verdict(&conn, "c", "PROPER_CONTENT").unwrap();

        assert_eq!(
            verdict_counts(&conn).unwrap(),
            vec![
                ("PROPER_CONTENT".to_string(), 2),
                ("RACY_CONTENT".to_string(), 1)
            ]
        );
    }
}
