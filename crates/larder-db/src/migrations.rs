use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL);")?;

    let version: i64 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |r| r.get(0),
    )?;

    if version < 1 {
        info!("running migration v1 (initial schema)");
        apply_v1(conn)?;
    }
    if version < 2 {
        info!("running migration v2 (extended recipe fields)");
        apply_v2(conn)?;
    }

    Ok(())
}

/// Four tables: the two disposable caches (search results, categories),
/// bookmarks (full meals duplicated for offline viewing), and the
/// user's own recipes — the only durable user-owned data.
fn apply_v1(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE search_cache (
            id        TEXT PRIMARY KEY,
            name      TEXT NOT NULL,
            thumb     TEXT NOT NULL,
            category  TEXT NOT NULL
        );

        CREATE TABLE categories (
            id          TEXT PRIMARY KEY,
            name        TEXT NOT NULL,
            thumb       TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT ''
        );

        CREATE TABLE bookmarks (
            id           TEXT PRIMARY KEY,
            name         TEXT NOT NULL,
            thumb        TEXT NOT NULL,
            category     TEXT NOT NULL,
            instructions TEXT NOT NULL,
            tags         TEXT NOT NULL,
            video_url    TEXT NOT NULL,
            source_url   TEXT NOT NULL,
            ingredients  TEXT NOT NULL,
            measures     TEXT NOT NULL,
            saved_at     TEXT NOT NULL
        );

        CREATE TABLE recipes (
            id                       INTEGER PRIMARY KEY AUTOINCREMENT,
            title                    TEXT NOT NULL,
            image                    TEXT,
            camera_image             TEXT,
            instructions             TEXT NOT NULL,
            ingredients_and_measures TEXT NOT NULL,
            created_at               TEXT NOT NULL
        );

        INSERT INTO schema_version (version) VALUES (1);
        ",
    )?;
    Ok(())
}

/// The later recipe schema revision: portions, timing, source and notes
/// as separate free-text fields. Existing rows get empty strings.
fn apply_v2(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        ALTER TABLE recipes ADD COLUMN portions   TEXT NOT NULL DEFAULT '';
        ALTER TABLE recipes ADD COLUMN prep_time  TEXT NOT NULL DEFAULT '';
        ALTER TABLE recipes ADD COLUMN cook_time  TEXT NOT NULL DEFAULT '';
        ALTER TABLE recipes ADD COLUMN source_url TEXT NOT NULL DEFAULT '';
        ALTER TABLE recipes ADD COLUMN notes      TEXT NOT NULL DEFAULT '';

        INSERT INTO schema_version (version) VALUES (2);
        ",
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrating_v1_to_v2_preserves_recipe_rows() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE schema_version (version INTEGER NOT NULL);")
            .unwrap();
        apply_v1(&conn).unwrap();

        conn.execute(
            "INSERT INTO recipes (title, image, camera_image, instructions, ingredients_and_measures, created_at)
             VALUES ('Grandma pie', NULL, NULL, 'Bake it.', 'Flour - 500g', '2025-01-01T00:00:00Z')",
            [],
        )
        .unwrap();

        apply_v2(&conn).unwrap();

        let (title, portions, notes): (String, String, String) = conn
            .query_row(
                "SELECT title, portions, notes FROM recipes WHERE id = 1",
                [],
                |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
            )
            .unwrap();
        assert_eq!(title, "Grandma pie");
        assert_eq!(portions, "");
        assert_eq!(notes, "");
    }

    #[test]
    fn run_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        run(&conn).unwrap();
        run(&conn).unwrap();

        let version: i64 = conn
            .query_row("SELECT MAX(version) FROM schema_version", [], |r| r.get(0))
            .unwrap();
        assert_eq!(version, 2);
    }
}
