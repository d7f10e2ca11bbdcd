//! Blocking helpers shared by the `PostgreSQL` adapters.
//!
//! Diesel connections are synchronous, so every database call is moved onto
//! Tokio's blocking thread pool to keep async executor threads free.

use diesel::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool, PoolError, PooledConnection};

/// `PostgreSQL` connection pool type used by all adapters.
pub type PgPool = Pool<ConnectionManager<PgConnection>>;

/// Pooled connection type for internal use.
pub(crate) type PooledConn = PooledConnection<ConnectionManager<PgConnection>>;

/// Runs a blocking task and maps join errors into the caller's error type.
pub(crate) async fn run_blocking_with<F, T, E, M>(f: F, map_err: M) -> Result<T, E>
where
    F: FnOnce() -> Result<T, E> + Send + 'static,
    T: Send + 'static,
    E: Send + 'static,
    M: FnOnce(tokio::task::JoinError) -> E,
{
    tokio::task::spawn_blocking(f).await.map_err(map_err)?
}

/// Obtains a connection from the pool with a caller-provided error mapper.
pub(crate) fn get_conn_with<E, M>(pool: &PgPool, map_err: M) -> Result<PooledConn, E>
where
    M: FnOnce(PoolError) -> E,
{
    pool.get().map_err(map_err)
}

/// Escapes `LIKE` wildcards so user text matches literally.
pub(crate) fn like_pattern(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len() + 2);
    escaped.push('%');
    for ch in text.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}

/// Returns `true` when `err` reports lock contention that aborted the
/// statement: a lock timeout, a deadlock, or a serialization failure.
///
/// Diesel surfaces serialization failures as a typed kind but reports lock
/// timeouts (SQLSTATE 55P03) and deadlocks (40P01) only through the server
/// message, so those two are recognized by their English text. Servers must
/// run with `lc_messages` set to an English locale (the default `C` or
/// `en_*`); under a translated locale they surface as persistence errors and
/// are not retried. `lc_messages` can only be changed by a superuser, so the
/// pool does not override it per session.
pub(crate) fn is_lock_contention(err: &diesel::result::Error) -> bool {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match err {
        DieselError::DatabaseError(DatabaseErrorKind::SerializationFailure, _) => true,
        DieselError::DatabaseError(_, info) => {
            let message = info.message();
            message.contains("lock timeout")
                || message.contains("deadlock detected")
                || message.contains("could not obtain lock")
        }
        _ => false,
    }
}
