//! Database schema migrations for Nestly.
//!
//! Migrations are applied in order at startup; each entry is one version.

/// Default avatar URL assigned to accounts created without a photo.
pub const DEFAULT_AVATAR_URL: &str =
    "https://static.nestly.app/images/avatar-placeholder.png";

/// All schema migrations, in order.
pub const MIGRATIONS: &[&str] = &[
    // v1: user accounts
    "CREATE TABLE users (
        id          INTEGER PRIMARY KEY AUTOINCREMENT,
        username    TEXT NOT NULL,
        email       TEXT NOT NULL,
        password    TEXT NOT NULL,
        avatar      TEXT NOT NULL DEFAULT 'https://static.nestly.app/images/avatar-placeholder.png',
        created_at  TEXT NOT NULL DEFAULT (datetime('now')),
        updated_at  TEXT NOT NULL DEFAULT (datetime('now'))
    );
    CREATE UNIQUE INDEX idx_users_username ON users(username);
    CREATE UNIQUE INDEX idx_users_email ON users(email);",
];
