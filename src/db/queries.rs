pub const CREATE_ALERT_COLLECTION: &str = r#"
CREATE TABLE IF NOT EXISTS alert (
    seq BIGSERIAL PRIMARY KEY,
    id UUID NOT NULL UNIQUE,
    doc JSONB NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
"#;

pub const CREATE_ALERT_DOC_INDEX: &str = r#"
CREATE INDEX IF NOT EXISTS alert_doc_idx ON alert USING GIN (doc jsonb_path_ops);
"#;

pub const CREATE_FEEDBACK_COLLECTION: &str = r#"
CREATE TABLE IF NOT EXISTS feedback (
    seq BIGSERIAL PRIMARY KEY,
    id UUID NOT NULL UNIQUE,
    doc JSONB NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
"#;

pub const INSERT_ALERT: &str = r#"
INSERT INTO alert (id, doc) VALUES ($1, $2);
"#;

pub const INSERT_FEEDBACK: &str = r#"
INSERT INTO feedback (id, doc) VALUES ($1, $2);
"#;

// LIMIT NULL returns every matching row.
pub const SELECT_ALERTS: &str = r#"
SELECT doc FROM alert WHERE doc @> $1 ORDER BY seq LIMIT $2;
"#;

pub const SELECT_FEEDBACK: &str = r#"
SELECT doc FROM feedback WHERE doc @> $1 ORDER BY seq LIMIT $2;
"#;

pub const SELECT_COLLECTION_NAMES: &str = r#"
SELECT table_name::text AS name
FROM information_schema.tables
WHERE table_schema = current_schema()
ORDER BY table_name
LIMIT $1;
"#;
