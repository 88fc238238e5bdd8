#![cfg(feature = "sqlite")]

mod common;

use std::time::Duration;

use common::{unique_db_path, users_db};
use row_mapper::mappable;
use row_mapper::prelude::*;

#[derive(Debug, Default, PartialEq)]
struct User {
    id: i64,
    name: String,
    email: Option<String>,
    age: Option<i32>,
}

mappable!(User {
    id: i64 = "Id",
    name: String = "Name",
    email: Option<String> = "Email",
    age: Option<i32> = "Age",
});

fn seed(db: &SqlExecutor<SqliteConnector>) -> Result<(), SqlMapperError> {
    let insert = "INSERT INTO users (Id, Name, Email, Age) VALUES (:id, :name, :email, :age)";
    db.non_query(
        insert,
        &[
            Parameter::new("id", 1),
            Parameter::new("name", "Ada"),
            Parameter::new("email", "ada@example.com"),
            Parameter::new("age", 36),
        ],
    )?;
    db.non_query(
        insert,
        &[
            Parameter::new("id", 2),
            Parameter::new("name", "Brian"),
            Parameter::new("email", RowValues::Null),
            Parameter::new("age", RowValues::Null),
        ],
    )?;
    Ok(())
}

#[test]
fn blank_connection_string_is_rejected() {
    for blank in ["", "   ", "\t\n"] {
        let err = SqlExecutor::new(blank).unwrap_err();
        assert!(matches!(err, SqlMapperError::ConfigError(_)));
    }
}

#[test]
fn non_query_returns_affected_rows() -> Result<(), Box<dyn std::error::Error>> {
    let db = users_db("non_query")?;
    seed(&db)?;
    let updated = db.non_query("UPDATE users SET Age = 40 WHERE Id IN (1, 2)", &[])?;
    assert_eq!(updated, 2);
    Ok(())
}

#[test]
fn scalar_returns_first_value_or_null() -> Result<(), Box<dyn std::error::Error>> {
    let db = users_db("scalar")?;
    seed(&db)?;
    let count = db.scalar("SELECT COUNT(*) FROM users", &[])?;
    assert_eq!(count, RowValues::Int(2));

    let missing = db.scalar(
        "SELECT Name FROM users WHERE Id = :id",
        &[Parameter::new("id", 99)],
    )?;
    assert!(missing.is_null());
    Ok(())
}

#[test]
fn reader_result_maps_onto_struct() -> Result<(), Box<dyn std::error::Error>> {
    let db = users_db("reader")?;
    seed(&db)?;
    let rs = db.reader("SELECT Id, Name, Email, Age FROM users ORDER BY Id", &[])?;
    assert_eq!(
        rs.get_column_names().map(|c| c.as_slice().to_vec()),
        Some(vec!["Id".to_string(), "Name".into(), "Email".into(), "Age".into()])
    );
    let users: Vec<User> = map_result_set(&rs)?.expect("query has columns");
    assert_eq!(
        users,
        vec![
            User {
                id: 1,
                name: "Ada".into(),
                email: Some("ada@example.com".into()),
                age: Some(36),
            },
            User {
                id: 2,
                name: "Brian".into(),
                email: None,
                age: None,
            },
        ]
    );
    Ok(())
}

#[test]
fn empty_query_maps_to_empty_list() -> Result<(), Box<dyn std::error::Error>> {
    let mut db = users_db("empty")?;
    let users: Option<Vec<User>> = db.query_as("SELECT * FROM users")?;
    assert_eq!(users, Some(vec![]));
    Ok(())
}

#[test]
fn positional_parameters_bind_in_order() -> Result<(), Box<dyn std::error::Error>> {
    let mut db = users_db("positional")?;
    seed(&db)?;
    db.add_parameter(Parameter::positional(30))
        .add_parameter(Parameter::positional("A%"));
    let user: Option<User> =
        db.query_one_as("SELECT * FROM users WHERE Age > ?1 AND Name LIKE ?2")?;
    assert_eq!(user.map(|u| u.name), Some("Ada".to_string()));
    Ok(())
}

#[test]
fn parameter_prefixes_are_interchangeable() -> Result<(), Box<dyn std::error::Error>> {
    let db = users_db("prefixes")?;
    seed(&db)?;
    for name in ["id", ":id", "@id", "$id"] {
        let value = db.scalar(
            "SELECT Name FROM users WHERE Id = @id",
            &[Parameter::new(name, 2)],
        )?;
        assert_eq!(value, RowValues::Text("Brian".into()));
    }
    Ok(())
}

#[test]
fn unknown_parameter_name_is_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let db = users_db("unknown_param")?;
    let err = db
        .scalar(
            "SELECT Name FROM users WHERE Id = :id",
            &[Parameter::new("user_id", 1)],
        )
        .unwrap_err();
    assert!(matches!(err, SqlMapperError::ParameterError(_)));
    Ok(())
}

#[test]
fn output_parameters_are_unsupported() -> Result<(), Box<dyn std::error::Error>> {
    let db = users_db("output_param")?;
    let err = db
        .scalar(
            "SELECT :total",
            &[Parameter::new("total", RowValues::Null).with_direction(ParamDirection::Output)],
        )
        .unwrap_err();
    assert!(matches!(err, SqlMapperError::ParameterError(_)));
    Ok(())
}

#[test]
fn type_tag_coerces_parameter() -> Result<(), Box<dyn std::error::Error>> {
    let db = users_db("type_tag")?;
    db.non_query(
        "INSERT INTO users (Id, Name, Age) VALUES (:id, :name, :age)",
        &[
            Parameter::new("id", "7").with_type(DbType::Text),
            Parameter::new("name", 12345).with_type(DbType::Text),
            Parameter::new("age", true).with_type(DbType::Int),
        ],
    )?;
    let rs = db.reader("SELECT Name, Age FROM users WHERE Id = 7", &[])?;
    assert_eq!(rs.results[0].get("Name"), Some(&RowValues::Text("12345".into())));
    assert_eq!(rs.results[0].get("Age"), Some(&RowValues::Int(1)));

    let err = db
        .non_query(
            "INSERT INTO users (Id, Name) VALUES (:id, 'x')",
            &[Parameter::new("id", "eight").with_type(DbType::Int)],
        )
        .unwrap_err();
    assert!(matches!(err, SqlMapperError::ParameterError(_)));
    Ok(())
}

#[test]
fn driver_errors_pass_through_unchanged() -> Result<(), Box<dyn std::error::Error>> {
    let db = users_db("driver_error")?;
    let err = db.reader("SELECT * FROM no_such_table", &[]).unwrap_err();
    match err {
        SqlMapperError::SqliteError(inner) => {
            assert!(inner.to_string().contains("no such table"));
        }
        other => panic!("expected the sqlite error itself, got {other:?}"),
    }
    Ok(())
}

#[test]
fn unreachable_database_fails_on_connect() -> Result<(), Box<dyn std::error::Error>> {
    let db = SqlExecutor::new("/nonexistent-dir/for/row-mapper/test.db")?;
    let err = db.scalar("SELECT 1", &[]).unwrap_err();
    assert!(matches!(err, SqlMapperError::SqliteError(_)));
    Ok(())
}

#[test]
fn stored_procedures_are_not_available_on_sqlite() -> Result<(), Box<dyn std::error::Error>> {
    let mut db = users_db("stored_proc")?;
    db.add_parameter(Parameter::new("id", 1));
    let err = db
        .execute_non_query(Statement::stored_procedure("purge_users"))
        .unwrap_err();
    assert!(matches!(err, SqlMapperError::Unimplemented(_)));
    assert!(db.parameters().is_empty());
    Ok(())
}

#[test]
fn data_set_collects_one_table_per_query() -> Result<(), Box<dyn std::error::Error>> {
    let mut db = users_db("data_set")?;
    seed(&db)?;
    db.add_parameter(Parameter::new("min_age", 18));
    let ds = db.execute_reader_data_set(
        "SELECT Id, Name FROM users WHERE Age >= :min_age;
         UPDATE users SET Age = Age + 1 WHERE Age IS NOT NULL;
         SELECT COUNT(*) AS total FROM users;",
    )?;
    assert_eq!(ds.len(), 2);

    let adults: Vec<User> = map_result_set(ds.table(0).expect("first table"))?
        .expect("first table has columns");
    assert_eq!(adults.len(), 1);
    assert_eq!(adults[0].name, "Ada");
    assert_eq!(adults[0].age, None, "Age column was not selected");

    let totals = ds.table(1).expect("second table");
    assert_eq!(totals.results[0].get("total"), Some(&RowValues::Int(2)));

    let age = db.scalar("SELECT Age FROM users WHERE Id = 1", &[])?;
    assert_eq!(age, RowValues::Int(37));
    Ok(())
}

#[test]
fn non_query_counts_only_this_statement() -> Result<(), Box<dyn std::error::Error>> {
    let db = users_db("non_query_count")?;
    seed(&db)?;
    assert_eq!(db.non_query("SELECT Id FROM users", &[])?, 0);
    assert_eq!(db.non_query("CREATE TABLE audit (x INTEGER)", &[])?, 0);
    assert_eq!(db.non_query("DELETE FROM users WHERE Id = 1", &[])?, 1);
    Ok(())
}

#[test]
fn data_set_positional_parameters_flow_across_statements()
-> Result<(), Box<dyn std::error::Error>> {
    let db = users_db("data_set_positional")?;
    let ds = db.reader_data_set(
        "SELECT ? AS a; SELECT ? AS b",
        &[Parameter::positional(1), Parameter::positional(2)],
    )?;
    assert_eq!(ds.len(), 2);
    assert_eq!(ds.table(0).expect("first").results[0].get("a"), Some(&RowValues::Int(1)));
    assert_eq!(ds.table(1).expect("second").results[0].get("b"), Some(&RowValues::Int(2)));

    let err = db
        .reader_data_set(
            "SELECT ? AS a",
            &[Parameter::positional(1), Parameter::positional(2)],
        )
        .unwrap_err();
    assert!(matches!(err, SqlMapperError::ParameterError(_)));
    Ok(())
}

#[test]
fn options_configure_the_connector() -> Result<(), Box<dyn std::error::Error>> {
    let options = SqliteOptionsBuilder::new(unique_db_path("options"))
        .wal(true)
        .foreign_keys(true)
        .busy_timeout(Duration::from_millis(250))
        .finish();
    let db = SqlExecutor::sqlite(options)?;
    let mode = db.scalar("PRAGMA journal_mode", &[])?;
    assert_eq!(mode, RowValues::Text("wal".into()));
    let fk = db.scalar("PRAGMA foreign_keys", &[])?;
    assert_eq!(fk, RowValues::Int(1));
    Ok(())
}

#[test]
fn options_load_from_json() -> Result<(), Box<dyn std::error::Error>> {
    let options: SqliteOptions =
        serde_json::from_str(r#"{ "db_path": "data/app.db", "busy_timeout_ms": 5000 }"#)?;
    assert_eq!(options.busy_timeout_ms, Some(5000));
    assert!(!options.wal);
    assert!(!options.foreign_keys);
    let db = SqlExecutor::sqlite(options)?;
    assert_eq!(db.connection_string(), "data/app.db");
    Ok(())
}
