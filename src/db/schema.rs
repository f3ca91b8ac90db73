pub const CREATE_TABLES: &str = "
CREATE TABLE IF NOT EXISTS tokens (
    token TEXT PRIMARY KEY,
    is_admin INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS usages (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    token TEXT NOT NULL,
    endpoint TEXT NOT NULL,
    timestamp TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_usages_token ON usages(token);
CREATE INDEX IF NOT EXISTS idx_usages_endpoint ON usages(endpoint);
";
