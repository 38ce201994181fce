use anyhow::Result;

use super::schema::Database;

impl Database {
    // ========================================================================
    // App State Operations
    // ========================================================================

    /// Get a single state slice by key (`dark_mode`, `subscriptions`,
    /// `watch_history`). Values are JSON-encoded strings.
    ///
    /// # Returns
    ///
    /// The stored value if the key exists, or `None` if not set.
    pub async fn get_state(&self, key: &str) -> Result<Option<String>> {
        let row: Option<(String,)> = sqlx::query_as("SELECT value FROM app_state WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|(value,)| value))
    }

    /// Set a state slice (UPSERT).
    ///
    /// Inserts the key-value pair if it doesn't exist, or updates the value
    /// and timestamp if the key already exists.
    pub async fn set_state(&self, key: &str, value: &str) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO app_state (key, value, updated_at)
            VALUES (?, ?, datetime('now'))
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
        "#,
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::storage::Database;

    async fn test_db() -> Database {
        Database::open(":memory:").await.unwrap()
    }

    #[tokio::test]
    async fn test_get_missing_key_is_none() {
        let db = test_db().await;
        assert_eq!(db.get_state("dark_mode").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_then_get_round_trip() {
        let db = test_db().await;
        db.set_state("dark_mode", "true").await.unwrap();
        assert_eq!(
            db.get_state("dark_mode").await.unwrap(),
            Some("true".to_string())
        );
    }

    #[tokio::test]
    async fn test_set_overwrites_existing() {
        let db = test_db().await;
        db.set_state("dark_mode", "true").await.unwrap();
        db.set_state("dark_mode", "false").await.unwrap();
        assert_eq!(
            db.get_state("dark_mode").await.unwrap(),
            Some("false".to_string())
        );
    }

    #[tokio::test]
    async fn test_keys_are_independent() {
        let db = test_db().await;
        db.set_state("subscriptions", "[]").await.unwrap();
        db.set_state("watch_history", "[{}]").await.unwrap();
        assert_eq!(
            db.get_state("subscriptions").await.unwrap(),
            Some("[]".to_string())
        );
        assert_eq!(
            db.get_state("watch_history").await.unwrap(),
            Some("[{}]".to_string())
        );
    }
}
