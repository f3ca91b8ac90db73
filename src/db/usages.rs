use chrono::Utc;
use crate::errors::GatewayError;
use crate::models::UsageRecord;
use super::Database;

impl Database {
    pub fn record_usage(&self, token: &str, endpoint: &str) -> Result<UsageRecord, GatewayError> {
        let record = UsageRecord {
            token: token.to_string(),
            endpoint: endpoint.to_string(),
            timestamp: Utc::now(),
        };
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO usages (token, endpoint, timestamp) VALUES (?1, ?2, ?3)",
            rusqlite::params![record.token, record.endpoint, record.timestamp],
        ).map_err(|e| GatewayError::Database(format!("Failed to record usage: {}", e)))?;
        Ok(record)
    }

    pub fn list_usages_by_token(&self, token: &str) -> Result<Vec<UsageRecord>, GatewayError> {
        self.query_usages("SELECT token, endpoint, timestamp FROM usages WHERE token = ?1 ORDER BY id ASC", token)
    }

    pub fn list_usages_by_endpoint(&self, endpoint: &str) -> Result<Vec<UsageRecord>, GatewayError> {
        self.query_usages("SELECT token, endpoint, timestamp FROM usages WHERE endpoint = ?1 ORDER BY id ASC", endpoint)
    }

    fn query_usages(&self, sql: &str, key: &str) -> Result<Vec<UsageRecord>, GatewayError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(sql)
            .map_err(|e| GatewayError::Database(format!("Query failed: {}", e)))?;

        let rows = stmt.query_map(rusqlite::params![key], |row: &rusqlite::Row| {
            Ok(UsageRecord {
                token: row.get(0)?,
                endpoint: row.get(1)?,
                timestamp: row.get(2)?,
            })
        }).map_err(|e| GatewayError::Database(format!("Query error: {}", e)))?;

        let mut results = Vec::new();
        for row in rows {
            results.push(row.map_err(|e| GatewayError::Database(format!("Row error: {}", e)))?);
        }
        Ok(results)
    }
}
