use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::{Connection, Result, Row};

use crate::error::AppError;
use crate::models::{Todo, TodoPayload};

pub type DbPool = Arc<Mutex<Connection>>;

pub fn init_db(path: &str) -> Result<DbPool> {
    let conn = Connection::open(path)?;

    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS todos (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            completed INTEGER DEFAULT 0,
            date_of_creation TEXT,
            date_of_completion TEXT,
            image_link TEXT
        );
        ",
    )?;

    Ok(Arc::new(Mutex::new(conn)))
}

/// Checks the shared connection out of the pool. The returned guard
/// releases it when dropped, on every return path.
pub fn acquire(pool: &DbPool) -> Result<MutexGuard<'_, Connection>, AppError> {
    pool.lock().map_err(|err| AppError::Pool(err.to_string()))
}

fn row_to_todo(row: &Row) -> rusqlite::Result<Todo> {
    Ok(Todo {
        id: row.get(0)?,
        title: row.get(1)?,
        // NULL reads as not completed
        completed: row.get::<_, Option<i64>>(2)?.unwrap_or(0) != 0,
        date_of_creation: row.get(3)?,
        date_of_completion: row.get(4)?,
        image_link: row.get(5)?,
    })
}

const TODO_COLUMNS: &str = "id, title, completed, date_of_creation, date_of_completion, image_link";

pub fn list_todos(pool: &DbPool) -> Result<Vec<Todo>, AppError> {
    let conn = acquire(pool)?;
    let mut stmt = conn.prepare(&format!(
        "SELECT {TODO_COLUMNS} FROM todos ORDER BY id DESC"
    ))?;
    let todos = stmt
        .query_map([], row_to_todo)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(todos)
}

pub fn get_todo(pool: &DbPool, id: i64) -> Result<Option<Todo>, AppError> {
    let conn = acquire(pool)?;
    let mut stmt = conn.prepare(&format!("SELECT {TODO_COLUMNS} FROM todos WHERE id = ?1"))?;
    let mut rows = stmt.query([id])?;

    match rows.next()? {
        Some(row) => Ok(Some(row_to_todo(row)?)),
        None => Ok(None),
    }
}

/// Inserts a new row and returns the generated id. `creation` is the
/// caller-supplied or freshly normalized creation timestamp; the other
/// optional fields pass through as given, NULL when absent.
pub fn insert_todo(pool: &DbPool, payload: &TodoPayload, creation: &str) -> Result<i64, AppError> {
    let conn = acquire(pool)?;
    conn.execute(
        "INSERT INTO todos (title, completed, date_of_creation, date_of_completion, image_link)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        (
            &payload.title,
            payload.completed,
            creation,
            payload.date_of_completion.as_deref(),
            payload.image_link.as_deref(),
        ),
    )?;
    Ok(conn.last_insert_rowid())
}

/// Overwrites every column of the matching row with exactly the supplied
/// values. Absent optional fields become NULL; no partial updates.
/// Returns the number of rows affected, zero when the id does not exist.
pub fn overwrite_todo(pool: &DbPool, id: i64, payload: &TodoPayload) -> Result<usize, AppError> {
    let conn = acquire(pool)?;
    let rows = conn.execute(
        "UPDATE todos
         SET title = ?1, completed = ?2, date_of_creation = ?3,
             date_of_completion = ?4, image_link = ?5
         WHERE id = ?6",
        (
            &payload.title,
            payload.completed,
            payload.date_of_creation.as_deref(),
            payload.date_of_completion.as_deref(),
            payload.image_link.as_deref(),
            id,
        ),
    )?;
    Ok(rows)
}

pub fn mark_complete(pool: &DbPool, id: i64, completion: &str) -> Result<usize, AppError> {
    let conn = acquire(pool)?;
    let rows = conn.execute(
        "UPDATE todos SET completed = 1, date_of_completion = ?1 WHERE id = ?2",
        (completion, id),
    )?;
    Ok(rows)
}

pub fn delete_todo(pool: &DbPool, id: i64) -> Result<usize, AppError> {
    let conn = acquire(pool)?;
    let rows = conn.execute("DELETE FROM todos WHERE id = ?1", [id])?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_payload(title: &str) -> TodoPayload {
        TodoPayload {
            title: title.to_string(),
            completed: None,
            date_of_creation: None,
            date_of_completion: None,
            image_link: None,
        }
    }

    #[test]
    fn init_db_creates_schema_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("todos.db");
        let pool = init_db(path.to_str().unwrap()).unwrap();

        let id = insert_todo(&pool, &test_payload("persisted"), "2024-05-01T15:30:00.000Z")
            .unwrap();
        assert_eq!(get_todo(&pool, id).unwrap().unwrap().title, "persisted");
    }

    #[test]
    fn ids_increase_monotonically() {
        let pool = Arc::new(Mutex::new(Connection::open_in_memory().unwrap()));
        pool.lock()
            .unwrap()
            .execute_batch(
                "CREATE TABLE todos (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    title TEXT NOT NULL,
                    completed INTEGER DEFAULT 0,
                    date_of_creation TEXT,
                    date_of_completion TEXT,
                    image_link TEXT
                );",
            )
            .unwrap();

        let mut last = 0;
        for title in ["a", "b", "c"] {
            let id = insert_todo(&pool, &test_payload(title), "2024-05-01T15:30:00.000Z").unwrap();
            assert!(id > last);
            last = id;
        }

        // deleting the newest row must not let ids regress
        assert_eq!(delete_todo(&pool, last).unwrap(), 1);
        let id = insert_todo(&pool, &test_payload("d"), "2024-05-01T15:30:00.000Z").unwrap();
        assert!(id > last);
    }
}
