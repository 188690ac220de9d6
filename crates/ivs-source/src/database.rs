//! SQLite inventory database source

use std::path::PathBuf;
use std::time::Duration;

use rusqlite::types::Value;
use rusqlite::{Connection, OpenFlags};

use crate::error::{SourceError, SourceResult};
use crate::record::RawRecord;
use crate::RecordSource;

/// Aggregated inventory per part and location, zero quantities excluded,
/// ordered by location name and part number.
///
/// Column order: location_group, avg_cost, std_cost, location, part_number,
/// description, location_name, inventory_account, uom_code, qty, company.
pub const INVENTORY_QUERY: &str = "\
SELECT location_group,
       AVG(avg_cost) AS avg_cost,
       AVG(std_cost) AS std_cost,
       location,
       part_number,
       description,
       location_name,
       inventory_account,
       uom_code,
       SUM(qty) AS qty,
       company
FROM inventory
GROUP BY location_group, location, part_number, description,
         location_name, inventory_account, uom_code, company
HAVING SUM(qty) <> 0
ORDER BY location_name, part_number";

/// Where the inventory database lives and who connects to it
///
/// For SQLite `host` is the directory holding the database file and
/// `database` the file name. `user` and `password` are carried for server
/// backends and ignored here.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionDescriptor {
    pub host: String,
    pub database: String,
    pub user: Option<String>,
    pub password: Option<String>,
}

impl ConnectionDescriptor {
    /// Create a descriptor without credentials
    pub fn new<H: Into<String>, D: Into<String>>(host: H, database: D) -> Self {
        Self {
            host: host.into(),
            database: database.into(),
            user: None,
            password: None,
        }
    }

    /// Attach credentials
    pub fn with_credentials<U: Into<String>, P: Into<String>>(mut self, user: U, password: P) -> Self {
        self.user = Some(user.into());
        self.password = Some(password.into());
        self
    }

    /// Path of the SQLite database file
    pub fn database_path(&self) -> PathBuf {
        PathBuf::from(&self.host).join(&self.database)
    }
}

// Keeps the password out of logs
impl std::fmt::Debug for ConnectionDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionDescriptor")
            .field("host", &self.host)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .finish()
    }
}

/// Reads aggregated inventory rows from the SQLite database
#[derive(Debug, Clone)]
pub struct DbSource {
    descriptor: ConnectionDescriptor,
    timeout: Duration,
}

impl DbSource {
    /// Default busy timeout
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    /// Create a source with the default timeout
    pub fn new(descriptor: ConnectionDescriptor) -> Self {
        Self {
            descriptor,
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// Set how long to wait on a locked database before giving up
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn connect(&self) -> SourceResult<Connection> {
        let path = self.descriptor.database_path();
        if !path.is_file() {
            return Err(SourceError::NotFound(path));
        }

        let conn = Connection::open_with_flags(
            &path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        conn.busy_timeout(self.timeout)?;
        Ok(conn)
    }
}

impl RecordSource for DbSource {
    fn read_records(&self) -> SourceResult<Vec<RawRecord>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(INVENTORY_QUERY)?;
        let column_count = stmt.column_count();

        let rows = stmt.query_map([], |row| {
            (0..column_count)
                .map(|i| row.get::<_, Value>(i).map(value_to_text))
                .collect::<Result<Vec<_>, _>>()
        })?;

        let mut records = Vec::new();
        for (index, fields) in rows.enumerate() {
            records.push(RawRecord::new(index as u64 + 1, fields?));
        }

        tracing::debug!(
            database = %self.descriptor.database_path().display(),
            records = records.len(),
            "queried inventory"
        );
        Ok(records)
    }

    fn describe(&self) -> String {
        format!("database {}", self.descriptor.database_path().display())
    }
}

/// Render a SQLite value as text (NULL becomes an empty string)
fn value_to_text(value: Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Integer(i) => i.to_string(),
        Value::Real(f) => f.to_string(),
        Value::Text(s) => s,
        Value::Blob(b) => String::from_utf8_lossy(&b).into_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_to_text() {
        assert_eq!(value_to_text(Value::Null), "");
        assert_eq!(value_to_text(Value::Integer(12)), "12");
        assert_eq!(value_to_text(Value::Real(3.5)), "3.5");
        assert_eq!(value_to_text(Value::Text("EA".into())), "EA");
    }

    #[test]
    fn test_database_path() {
        let descriptor = ConnectionDescriptor::new("/srv/data", "inventory.db");
        assert_eq!(
            descriptor.database_path(),
            PathBuf::from("/srv/data/inventory.db")
        );
    }

    #[test]
    fn test_debug_hides_password() {
        let descriptor =
            ConnectionDescriptor::new("/srv/data", "inventory.db").with_credentials("ivs", "hunter2");
        let shown = format!("{:?}", descriptor);
        assert!(!shown.contains("hunter2"));
        assert!(shown.contains("***"));
    }

    #[test]
    fn test_missing_database() {
        let source = DbSource::new(ConnectionDescriptor::new("/definitely/not", "here.db"));
        assert!(matches!(
            source.read_records(),
            Err(SourceError::NotFound(_))
        ));
    }
}
