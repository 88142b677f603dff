//! Classification of retryable database failures

use sea_orm::sqlx;
use sea_orm::{DbErr, RuntimeErr};

/// SQLSTATE class for connection exceptions
const CONNECTION_EXCEPTION_CLASS: &str = "08";

/// Whether `err` is a connection-class failure worth retrying
///
/// Covers SQLSTATE class `08`, pool acquisition timeouts and socket errors.
/// Constraint violations, syntax errors and the like propagate immediately.
pub fn is_transient(err: &DbErr) -> bool {
    match err {
        DbErr::ConnectionAcquire(_) => true,
        DbErr::Conn(runtime) | DbErr::Exec(runtime) | DbErr::Query(runtime) => {
            runtime_is_transient(runtime)
        }
        _ => false,
    }
}

fn runtime_is_transient(err: &RuntimeErr) -> bool {
    match err {
        RuntimeErr::SqlxError(err) => sqlx_is_transient(err),
        _ => false,
    }
}

fn sqlx_is_transient(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err
            .code()
            .is_some_and(|code| code.starts_with(CONNECTION_EXCEPTION_CLASS)),
        sqlx::Error::Io(_) | sqlx::Error::PoolTimedOut => true,
        _ => false,
    }
}
