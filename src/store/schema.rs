pub const SCHEMA: &str = r#"
-- Users authenticate and own candidates
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT NOT NULL UNIQUE,
    email TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,       -- argon2id hash with embedded salt
    full_name TEXT NOT NULL,
    role TEXT NOT NULL CHECK (role IN ('admin', 'recruiter', 'viewer')),
    is_active INTEGER NOT NULL DEFAULT 1,
    created_at TEXT DEFAULT (datetime('now')),
    updated_at TEXT DEFAULT (datetime('now'))
);

-- Candidates in the hiring pipeline.
-- recruiter_id and created_by are plain columns: deleting a user leaves them dangling.
CREATE TABLE IF NOT EXISTS candidates (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    first_name TEXT NOT NULL,
    last_name TEXT NOT NULL,
    email TEXT NOT NULL UNIQUE,
    phone TEXT,
    location TEXT,
    linkedin_url TEXT,
    current_role TEXT,
    current_company TEXT,
    years_of_experience INTEGER CHECK (years_of_experience BETWEEN 0 AND 70),
    skills TEXT,
    education TEXT,
    status TEXT NOT NULL DEFAULT 'Applied'
        CHECK (status IN ('Applied', 'Screening', 'Interview', 'Offer', 'Hired', 'Rejected')),
    position_applied TEXT,
    recruiter_id INTEGER,
    source TEXT,
    salary_expectation TEXT,
    notice_period TEXT,
    resume_url TEXT,
    notes TEXT,
    created_by INTEGER,
    created_at TEXT DEFAULT (datetime('now')),
    updated_at TEXT DEFAULT (datetime('now'))
);

-- Logged contact events; removed together with their candidate
CREATE TABLE IF NOT EXISTS call_history (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    candidate_id INTEGER NOT NULL REFERENCES candidates(id) ON DELETE CASCADE,
    recruiter_id INTEGER NOT NULL,
    call_date TEXT DEFAULT (datetime('now')),
    call_type TEXT CHECK (call_type IN ('Phone', 'Video', 'In-Person', 'Email')),
    duration INTEGER,
    outcome TEXT,
    notes TEXT,
    next_action TEXT,
    next_action_date TEXT,             -- YYYY-MM-DD
    created_at TEXT DEFAULT (datetime('now'))
);

-- Reserved for audit logging; nothing writes here yet
CREATE TABLE IF NOT EXISTS activity_log (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL,
    action_type TEXT NOT NULL,
    entity_type TEXT,
    entity_id INTEGER,
    description TEXT,
    created_at TEXT DEFAULT (datetime('now'))
);

-- Create indexes
CREATE INDEX IF NOT EXISTS idx_candidates_status ON candidates(status);
CREATE INDEX IF NOT EXISTS idx_candidates_recruiter ON candidates(recruiter_id);
CREATE INDEX IF NOT EXISTS idx_candidates_created ON candidates(created_at);
CREATE INDEX IF NOT EXISTS idx_call_history_candidate ON call_history(candidate_id);
CREATE INDEX IF NOT EXISTS idx_call_history_recruiter ON call_history(recruiter_id);
CREATE INDEX IF NOT EXISTS idx_call_history_next_action ON call_history(next_action_date);
CREATE INDEX IF NOT EXISTS idx_activity_log_user ON activity_log(user_id);
"#;
