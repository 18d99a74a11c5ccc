//! Per-call connection gateway.
//!
//! Each public collector operation opens one connection for the duration of
//! the call and releases it before returning. Release is guaranteed on every
//! exit path: the connection closes on drop, with a graceful `close()` on the
//! success path. Pooling and retry policy, if any, belong to the embedding
//! host, not here.

use crate::models::DataContainer;
use crate::{Result, error::SupplyError};
use sqlx::postgres::{PgConnectOptions, PgConnection};
use sqlx::{ConnectOptions, Connection};
use url::Url;

/// Builds the opaque connection descriptor for a container.
fn connect_options(container: &DataContainer) -> PgConnectOptions {
    let mut options = PgConnectOptions::new()
        .host(&container.host)
        .port(container.port_or_default())
        .application_name(concat!(
            env!("CARGO_PKG_NAME"),
            "-",
            env!("CARGO_PKG_VERSION")
        ));

    if let Some(database) = &container.database {
        options = options.database(database);
    }
    if let Some(username) = &container.username {
        options = options.username(username);
    }
    if let Some(password) = &container.password {
        options = options.password(password);
    }

    options
}

/// Opens a connection to the container.
///
/// # Errors
/// Returns a connection error naming the container (host, port, database;
/// never credentials) when the connection cannot be established.
pub(crate) async fn open(container: &DataContainer) -> Result<PgConnection> {
    container.validate()?;
    connect_options(container)
        .connect()
        .await
        .map_err(|e| SupplyError::connection_failed(format!("cannot connect to {container}"), e))
}

/// Gracefully releases a connection.
///
/// A failed close is logged, not propagated: the operation's result has
/// already been produced by the time the connection is released.
pub(crate) async fn release(conn: PgConnection) {
    if let Err(e) = conn.close().await {
        tracing::warn!("error closing connection: {e}");
    }
}

/// Tests reachability of a container.
///
/// The contract is a boolean: any failure to connect, authenticate, or run a
/// trivial query reports `false` rather than an error.
pub(crate) async fn test_connection(container: &DataContainer) -> bool {
    match open(container).await {
        Ok(mut conn) => {
            let reachable = sqlx::query_scalar::<_, i32>("SELECT 1")
                .fetch_one(&mut conn)
                .await
                .map(|v| v == 1)
                .unwrap_or(false);
            release(conn).await;
            reachable
        }
        Err(e) => {
            tracing::debug!("connection test failed for {container}: {e}");
            false
        }
    }
}

/// Parses a `postgres://` URL into a [`DataContainer`].
///
/// # Errors
/// Returns a configuration error if the URL is malformed, uses a scheme other
/// than `postgres`/`postgresql`, omits the host, or carries a database name
/// or username violating PostgreSQL identifier rules.
///
/// # Example
/// ```rust
/// use pg_supply_collector::collector::postgres::parse_container_url;
///
/// let container = parse_container_url("postgres://reader@db.internal:5433/crm").unwrap();
/// assert_eq!(container.host, "db.internal");
/// assert_eq!(container.port, Some(5433));
/// assert_eq!(container.database.as_deref(), Some("crm"));
/// assert_eq!(container.username.as_deref(), Some("reader"));
/// ```
pub fn parse_container_url(connection_url: &str) -> Result<DataContainer> {
    let url = Url::parse(connection_url).map_err(|e| {
        SupplyError::configuration(format!("invalid PostgreSQL connection URL format: {e}"))
    })?;

    if !matches!(url.scheme(), "postgres" | "postgresql") {
        return Err(SupplyError::configuration(
            "connection URL must use postgres:// or postgresql:// scheme",
        ));
    }

    let host = url
        .host_str()
        .ok_or_else(|| SupplyError::configuration("connection URL must specify a host"))?;
    let mut container = DataContainer::new(host.to_string());

    if let Some(port) = url.port() {
        if port == 0 {
            return Err(SupplyError::configuration(
                "invalid port number: must be greater than 0",
            ));
        }
        container = container.with_port(port);
    }

    let database = url.path().trim_start_matches('/');
    if !database.is_empty() {
        validate_identifier(database, "database name")?;
        container = container.with_database(database.to_string());
    }

    let username = url.username();
    if !username.is_empty() {
        validate_identifier(username, "username")?;
        container = container.with_username(username.to_string());
    }

    if let Some(password) = url.password() {
        container = container.with_password(password.to_string());
    }

    Ok(container)
}

/// Validates a name against PostgreSQL identifier rules.
fn validate_identifier(name: &str, what: &str) -> Result<()> {
    if name.len() > 63 {
        return Err(SupplyError::configuration(format!(
            "{what} too long: maximum 63 characters"
        )));
    }
    let Some(first_char) = name.chars().next() else {
        return Err(SupplyError::configuration(format!("{what} cannot be empty")));
    };
    if !first_char.is_ascii_alphabetic() && first_char != '_' {
        return Err(SupplyError::configuration(format!(
            "{what} must start with a letter or underscore"
        )));
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
    {
        return Err(SupplyError::configuration(format!(
            "{what} contains invalid characters (only letters, digits, underscores, and dollar signs allowed)"
        )));
    }
    Ok(())
}
