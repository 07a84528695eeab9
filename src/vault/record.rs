//! Relational records kept in the store.

use chrono::{DateTime, Utc};

/// A service such as "github" that owns one or more accounts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Service {
    pub id: i64,
    pub name: String,
}

/// A login at a service, pointing at exactly one password row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: i64,
    pub login: String,
    pub service_id: i64,
    pub password_id: i64,
}

/// A service together with its accounts, as shown by `list`.
#[derive(Debug, Clone)]
pub struct ServiceSummary {
    pub service: Service,
    pub accounts: Vec<Account>,
    pub created_at: DateTime<Utc>,
}
