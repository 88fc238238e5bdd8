#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use row_mapper::prelude::*;
use tempfile::tempdir;

pub fn unique_db_path(prefix: &str) -> String {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join(format!("{prefix}.db"));
    // Leak the tempdir so the file persists for the duration of the test binary.
    std::mem::forget(dir);
    path.to_string_lossy().into_owned()
}

/// Fresh database with a `users` table.
#[cfg(feature = "sqlite")]
pub fn users_db(prefix: &str) -> Result<SqlExecutor<SqliteConnector>, SqlMapperError> {
    let db = SqlExecutor::new(unique_db_path(prefix))?;
    db.non_query(
        "CREATE TABLE users (
            Id INTEGER PRIMARY KEY,
            Name TEXT NOT NULL UNIQUE,
            Email TEXT,
            Age INTEGER
        )",
        &[],
    )?;
    Ok(db)
}

/// What the scripted driver saw, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Connect,
    Begin,
    Execute { sql: String, params: usize },
    Commit,
    Rollback,
    Disconnect,
}

#[derive(Debug, Default)]
pub struct Script {
    pub fail_connect: bool,
    pub fail_on_sql: Option<String>,
    pub panic_on_sql: Option<String>,
    pub fail_commit: bool,
    pub fail_rollback: bool,
    pub events: Vec<Event>,
}

/// Driver that records every call and fails where the script says so.
#[derive(Debug, Clone, Default)]
pub struct ScriptedConnector {
    pub script: Rc<RefCell<Script>>,
}

impl ScriptedConnector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(self, sql: &str) -> Self {
        self.script.borrow_mut().fail_on_sql = Some(sql.to_owned());
        self
    }

    pub fn panicking_on(self, sql: &str) -> Self {
        self.script.borrow_mut().panic_on_sql = Some(sql.to_owned());
        self
    }

    pub fn failing_commit(self) -> Self {
        self.script.borrow_mut().fail_commit = true;
        self
    }

    pub fn failing_rollback(self) -> Self {
        self.script.borrow_mut().fail_rollback = true;
        self
    }

    pub fn failing_connect(self) -> Self {
        self.script.borrow_mut().fail_connect = true;
        self
    }

    pub fn events(&self) -> Vec<Event> {
        self.script.borrow().events.clone()
    }
}

impl Connector for ScriptedConnector {
    type Connection = ScriptedConnection;

    fn connect(&self, _connection_string: &str) -> Result<ScriptedConnection, SqlMapperError> {
        let mut script = self.script.borrow_mut();
        if script.fail_connect {
            return Err(SqlMapperError::ConnectionError("host unreachable".into()));
        }
        script.events.push(Event::Connect);
        Ok(ScriptedConnection {
            script: Rc::clone(&self.script),
        })
    }
}

pub struct ScriptedConnection {
    script: Rc<RefCell<Script>>,
}

impl ScriptedConnection {
    fn execute(
        &mut self,
        statement: &Statement,
        params: &[Parameter],
    ) -> Result<(), SqlMapperError> {
        let mut script = self.script.borrow_mut();
        script.events.push(Event::Execute {
            sql: statement.sql.clone(),
            params: params.len(),
        });
        if script.panic_on_sql.as_deref() == Some(statement.sql.as_str()) {
            drop(script);
            panic!("driver panicked on '{}'", statement.sql);
        }
        if script.fail_on_sql.as_deref() == Some(statement.sql.as_str()) {
            return Err(SqlMapperError::ExecutionError(format!(
                "constraint violated by '{}'",
                statement.sql
            )));
        }
        Ok(())
    }
}

impl DriverConnection for ScriptedConnection {
    fn scalar(
        &mut self,
        statement: &Statement,
        params: &[Parameter],
    ) -> Result<RowValues, SqlMapperError> {
        self.execute(statement, params)?;
        Ok(RowValues::Int(1))
    }

    fn non_query(
        &mut self,
        statement: &Statement,
        params: &[Parameter],
    ) -> Result<usize, SqlMapperError> {
        self.execute(statement, params)?;
        Ok(1)
    }

    fn reader(
        &mut self,
        statement: &Statement,
        params: &[Parameter],
    ) -> Result<ResultSet, SqlMapperError> {
        self.execute(statement, params)?;
        Ok(ResultSet::with_columns(vec!["Id".into()]))
    }

    fn reader_data_set(
        &mut self,
        statement: &Statement,
        params: &[Parameter],
    ) -> Result<DataSet, SqlMapperError> {
        self.execute(statement, params)?;
        Ok(DataSet::new())
    }

    fn begin(&mut self) -> Result<(), SqlMapperError> {
        self.script.borrow_mut().events.push(Event::Begin);
        Ok(())
    }

    fn commit(&mut self) -> Result<(), SqlMapperError> {
        let mut script = self.script.borrow_mut();
        script.events.push(Event::Commit);
        if script.fail_commit {
            return Err(SqlMapperError::ExecutionError("deferred constraint failed".into()));
        }
        Ok(())
    }

    fn rollback(&mut self) -> Result<(), SqlMapperError> {
        let mut script = self.script.borrow_mut();
        script.events.push(Event::Rollback);
        if script.fail_rollback {
            return Err(SqlMapperError::ConnectionError("connection closed".into()));
        }
        Ok(())
    }
}

impl Drop for ScriptedConnection {
    fn drop(&mut self) {
        self.script.borrow_mut().events.push(Event::Disconnect);
    }
}
