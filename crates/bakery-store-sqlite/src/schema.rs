//! SQL schema for the bakery SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
///
/// `AUTOINCREMENT` guarantees ids are never reused. `customer_id` on orders is
/// deliberately not a foreign key: an order whose customer is missing is still
/// readable, with no customer joined.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS customers (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT NOT NULL,
    email       TEXT,
    phone       TEXT,
    address     TEXT,
    created_at  TEXT NOT NULL,   -- RFC 3339 UTC
    updated_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS orders (
    id                   INTEGER PRIMARY KEY AUTOINCREMENT,
    customer_id          INTEGER NOT NULL,
    customer_name        TEXT,
    customer_phone       TEXT,
    cake_type            TEXT NOT NULL,
    cake_size            TEXT,
    flavor               TEXT,
    filling              TEXT,
    frosting             TEXT,
    decorations          TEXT,
    special_instructions TEXT,
    quantity             INTEGER NOT NULL DEFAULT 1 CHECK (quantity >= 1),
    price                REAL CHECK (price IS NULL OR price >= 0),
    order_date           TEXT NOT NULL,   -- YYYY-MM-DD
    delivery_date        TEXT NOT NULL,   -- YYYY-MM-DD; compared lexically
    delivery_time        TEXT,            -- HH:MM:SS
    delivery_address     TEXT,
    status               TEXT NOT NULL,   -- 'in_progress' | 'completed'
    card_number          TEXT,
    card_exp_date        TEXT,
    zip_code             TEXT,
    payment_status       TEXT,            -- 'pending' | 'paid' | 'failed' | 'refunded'
    created_at           TEXT NOT NULL,
    updated_at           TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS order_images (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    order_id    INTEGER NOT NULL,
    image_url   TEXT NOT NULL,
    image_name  TEXT,
    uploaded_at TEXT NOT NULL
);

-- The audit trail is strictly append-only.
-- No UPDATE or DELETE is ever issued against this table.
CREATE TABLE IF NOT EXISTS order_logs (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    order_id    INTEGER NOT NULL,
    action      TEXT NOT NULL,
    description TEXT,
    user_name   TEXT,
    created_at  TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS orders_delivery_idx ON orders(delivery_date);
CREATE INDEX IF NOT EXISTS images_order_idx    ON order_images(order_id);
CREATE INDEX IF NOT EXISTS logs_order_idx      ON order_logs(order_id);

PRAGMA user_version = 1;
";
