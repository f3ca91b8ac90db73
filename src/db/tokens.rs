use crate::errors::GatewayError;
use crate::models::ApiToken;
use super::Database;

impl Database {
    pub fn create_token(&self, is_admin: bool) -> Result<ApiToken, GatewayError> {
        let token = ApiToken::generate(is_admin);
        let conn = self.lock()?;
        insert_token(&conn, &token)?;
        Ok(token)
    }

    /// Create a token only if the store is empty. The emptiness check and the
    /// insert run under one lock so two bootstrap calls cannot both succeed.
    pub fn create_bootstrap_token(&self, is_admin: bool) -> Result<Option<ApiToken>, GatewayError> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM tokens", [], |row| row.get(0))
            .map_err(|e| GatewayError::Database(format!("Query failed: {}", e)))?;
        if count > 0 {
            return Ok(None);
        }
        let token = ApiToken::generate(is_admin);
        insert_token(&conn, &token)?;
        Ok(Some(token))
    }

    pub fn get_token(&self, token: &str) -> Result<Option<ApiToken>, GatewayError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT token, is_admin, created_at FROM tokens WHERE token = ?1")
            .map_err(|e| GatewayError::Database(format!("Query failed: {}", e)))?;

        match stmt.query_row(rusqlite::params![token], row_to_token) {
            Ok(t) => Ok(Some(t)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(GatewayError::Database(format!("Query error: {}", e))),
        }
    }

    pub fn list_tokens(&self) -> Result<Vec<ApiToken>, GatewayError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT token, is_admin, created_at FROM tokens ORDER BY created_at ASC")
            .map_err(|e| GatewayError::Database(format!("Query failed: {}", e)))?;

        let rows = stmt.query_map([], row_to_token)
            .map_err(|e| GatewayError::Database(format!("Query error: {}", e)))?;

        let mut tokens = Vec::new();
        for row in rows {
            tokens.push(row.map_err(|e| GatewayError::Database(format!("Row error: {}", e)))?);
        }
        Ok(tokens)
    }

    pub fn delete_token(&self, token: &str) -> Result<bool, GatewayError> {
        let conn = self.lock()?;
        let affected = conn.execute("DELETE FROM tokens WHERE token = ?1", rusqlite::params![token])
            .map_err(|e| GatewayError::Database(format!("Delete failed: {}", e)))?;
        Ok(affected == 1)
    }

    pub fn count_tokens(&self) -> Result<i64, GatewayError> {
        let conn = self.lock()?;
        conn.query_row("SELECT COUNT(*) FROM tokens", [], |row| row.get(0))
            .map_err(|e| GatewayError::Database(format!("Query failed: {}", e)))
    }
}

fn insert_token(conn: &rusqlite::Connection, token: &ApiToken) -> Result<(), GatewayError> {
    conn.execute(
        "INSERT INTO tokens (token, is_admin, created_at) VALUES (?1, ?2, ?3)",
        rusqlite::params![token.token, token.is_admin, token.created_at],
    ).map_err(|e| GatewayError::Database(format!("Failed to create token: {}", e)))?;
    Ok(())
}

fn row_to_token(row: &rusqlite::Row) -> rusqlite::Result<ApiToken> {
    Ok(ApiToken {
        token: row.get(0)?,
        is_admin: row.get(1)?,
        created_at: row.get(2)?,
    })
}
