//! Execution-path tests against a scripted mock driver.
//!
//! These verify the full pipeline — render, backend prepare, driver call,
//! adapt, normalize — without a real database.

use std::collections::VecDeque;
use std::sync::Mutex;

use textorm::{
    Condition, Driver, DriverKind, Model, OrmError, OrmResult, Outcome, RawResult, Row, Scalar,
    TableConfig, Value,
};

/// Records every statement it receives and replies from a script.
struct MockDriver {
    kind: DriverKind,
    statements: Mutex<Vec<String>>,
    replies: Mutex<VecDeque<OrmResult<RawResult>>>,
}

impl MockDriver {
    fn new(kind: DriverKind) -> Self {
        Self {
            kind,
            statements: Mutex::new(Vec::new()),
            replies: Mutex::new(VecDeque::new()),
        }
    }

    fn reply(self, result: RawResult) -> Self {
        self.replies.lock().unwrap().push_back(Ok(result));
        self
    }

    fn reply_err(self, err: OrmError) -> Self {
        self.replies.lock().unwrap().push_back(Err(err));
        self
    }

    fn statements(&self) -> Vec<String> {
        self.statements.lock().unwrap().clone()
    }
}

impl Driver for MockDriver {
    fn kind(&self) -> DriverKind {
        self.kind
    }

    fn execute(
        &self,
        statement: &str,
    ) -> impl std::future::Future<Output = OrmResult<RawResult>> + Send {
        let statement = statement.to_string();
        async move {
            self.statements.lock().unwrap().push(statement);
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(RawResult::default()))
        }
    }
}

fn user_row(id: i64, name: &str) -> Row {
    Row::from_iter([
        ("id".to_string(), Value::from(id)),
        ("username".to_string(), Value::from(name)),
    ])
}

#[tokio::test]
async fn find_renders_primary_key_lookup() {
    let driver =
        MockDriver::new(DriverKind::Postgres).reply(RawResult::rows(vec![user_row(7, "alice")]));

    let mut users = Model::table("users");
    let found = users.find(&driver, 7).await.unwrap();

    assert_eq!(
        driver.statements(),
        vec!["SELECT * FROM users WHERE (id = 7)"]
    );
    let row = found.unwrap();
    assert_eq!(row.get_scalar("username"), Some(&Scalar::Text("alice".into())));
}

#[tokio::test]
async fn find_respects_configured_primary_key() {
    let driver = MockDriver::new(DriverKind::Postgres);

    let mut orders = Model::new(TableConfig::new("orders").primary_key("order_id"));
    let found = orders.find(&driver, 3).await.unwrap();

    assert_eq!(
        driver.statements(),
        vec!["SELECT * FROM orders WHERE (order_id = 3)"]
    );
    assert!(found.is_none());
}

#[tokio::test]
async fn postgres_insert_returns_generated_id_via_returning() {
    let driver = MockDriver::new(DriverKind::Postgres)
        .reply(RawResult::rows(vec![Row::from_iter([(
            "id".to_string(),
            Value::from(42),
        )])]));

    let mut users = Model::table("users");
    users.set(Row::from_iter([("username", Value::from("alice"))]));
    let outcome = users.insert(&driver).await.unwrap();

    assert_eq!(
        driver.statements(),
        vec!["INSERT INTO users (username) VALUES ('alice') RETURNING id"]
    );
    assert_eq!(outcome, Outcome::InsertedId(Scalar::Int(42)));
}

#[tokio::test]
async fn mysql_insert_returns_reported_id() {
    let driver = MockDriver::new(DriverKind::Mysql).reply(RawResult {
        affected_rows: Some(1),
        inserted_id: Some(Scalar::Int(9)),
        ..RawResult::default()
    });

    let mut users = Model::table("users");
    users.set(Row::from_iter([("username", Value::from("bob"))]));
    let outcome = users.insert(&driver).await.unwrap();

    // No RETURNING clause on this backend.
    assert_eq!(
        driver.statements(),
        vec!["INSERT INTO users (username) VALUES ('bob')"]
    );
    assert_eq!(outcome, Outcome::InsertedId(Scalar::Int(9)));
}

#[tokio::test]
async fn update_reports_affected_rows() {
    let driver = MockDriver::new(DriverKind::Mysql).reply(RawResult::affected(3));

    let mut users = Model::table("users");
    users
        .set(Row::from_iter([("status", Value::from("inactive"))]))
        .filter(Condition::lt("last_seen", 20200101));
    let outcome = users.update(&driver).await.unwrap();

    assert_eq!(outcome, Outcome::Affected(3));
}

#[tokio::test]
async fn empty_select_yields_the_sentinel() {
    let driver = MockDriver::new(DriverKind::Postgres);

    let mut users = Model::table("users");
    let outcome = users.list(&driver).await.unwrap();
    assert!(outcome.is_none());
}

#[tokio::test]
async fn count_extracts_the_count_column() {
    let driver = MockDriver::new(DriverKind::Postgres).reply(RawResult::rows(vec![
        Row::from_iter([("count".to_string(), Value::from(2))]),
    ]));

    let mut users = Model::table("users");
    users.filter(Condition::eq("status", "active"));
    let count = users.count(&driver).await.unwrap();

    assert_eq!(
        driver.statements(),
        vec!["SELECT count(*) AS count FROM users WHERE (status = 'active')"]
    );
    assert_eq!(count, 2);
}

#[tokio::test]
async fn first_one_appends_limit() {
    let driver = MockDriver::new(DriverKind::Postgres);

    let mut users = Model::table("users");
    users.first_one(&driver).await.unwrap();

    assert_eq!(driver.statements(), vec!["SELECT * FROM users LIMIT 1"]);
}

#[tokio::test]
async fn paginate_appends_limit_and_offset() {
    let driver = MockDriver::new(DriverKind::Postgres);

    let mut users = Model::table("users");
    users.paginate(&driver, 10, 2).await.unwrap();

    assert_eq!(
        driver.statements(),
        vec!["SELECT * FROM users LIMIT 10 OFFSET 10"]
    );
}

#[tokio::test]
async fn col_projects_a_single_column() {
    let driver = MockDriver::new(DriverKind::Postgres).reply(RawResult::rows(vec![
        user_row(1, "alice"),
        user_row(2, "bob"),
    ]));

    let mut users = Model::table("users");
    let names = users.col(&driver, "username").await.unwrap();
    assert_eq!(
        names,
        vec![Scalar::Text("alice".into()), Scalar::Text("bob".into())]
    );
}

#[tokio::test]
async fn chunk_slices_the_result() {
    let driver = MockDriver::new(DriverKind::Postgres).reply(RawResult::rows(vec![
        user_row(1, "a"),
        user_row(2, "b"),
        user_row(3, "c"),
    ]));

    let mut users = Model::table("users");
    let mut sizes = Vec::new();
    users
        .chunk(&driver, 2, |slice| sizes.push(slice.len()))
        .await
        .unwrap();
    assert_eq!(sizes, vec![2, 1]);
}

#[tokio::test]
async fn update_or_insert_falls_back_to_insert() {
    let driver = MockDriver::new(DriverKind::Mysql)
        .reply(RawResult::affected(0))
        .reply(RawResult {
            affected_rows: Some(1),
            inserted_id: Some(Scalar::Int(11)),
            ..RawResult::default()
        });

    let mut users = Model::table("users");
    users
        .set(Row::from_iter([("username", Value::from("carol"))]))
        .filter(Condition::eq("username", "carol"));
    let outcome = users.update_or_insert(&driver).await.unwrap();

    assert_eq!(
        driver.statements(),
        vec![
            "UPDATE users SET username = 'carol' WHERE (username = 'carol')",
            "INSERT INTO users (username) VALUES ('carol')",
        ]
    );
    assert_eq!(outcome, Outcome::InsertedId(Scalar::Int(11)));
}

#[tokio::test]
async fn update_or_insert_stops_after_successful_update() {
    let driver = MockDriver::new(DriverKind::Mysql).reply(RawResult::affected(2));

    let mut users = Model::table("users");
    users
        .set(Row::from_iter([("status", Value::from("active"))]))
        .filter(Condition::eq("id", 1));
    let outcome = users.update_or_insert(&driver).await.unwrap();

    assert_eq!(driver.statements().len(), 1);
    assert_eq!(outcome, Outcome::Affected(2));
}

#[tokio::test]
async fn spec_does_not_leak_between_operations() {
    let driver = MockDriver::new(DriverKind::Postgres);

    let mut users = Model::table("users");
    users.filter(Condition::eq("status", "active"));
    users.list(&driver).await.unwrap();

    // The consumed filter must not reappear.
    users.all(&driver).await.unwrap();
    assert_eq!(
        driver.statements(),
        vec![
            "SELECT * FROM users WHERE (status = 'active')",
            "SELECT * FROM users",
        ]
    );
}

#[tokio::test]
async fn all_refuses_leftover_clauses() {
    let driver = MockDriver::new(DriverKind::Postgres);

    let mut users = Model::table("users");
    users.filter(Condition::eq("status", "active"));
    let err = users.all(&driver).await.unwrap_err();
    assert!(err.is_conflict());
    // Nothing reached the driver.
    assert!(driver.statements().is_empty());
}

#[tokio::test]
async fn driver_errors_pass_through_unmodified() {
    let driver =
        MockDriver::new(DriverKind::Postgres).reply_err(OrmError::driver("connection reset"));

    let mut users = Model::table("users");
    let err = users.list(&driver).await.unwrap_err();
    assert!(err.is_driver());
    assert_eq!(err.to_string(), "Driver error: connection reset");
}

#[tokio::test]
async fn join_uses_the_other_models_table() {
    let driver = MockDriver::new(DriverKind::Postgres);

    let roles = Model::table("roles");
    let mut users = Model::table("users");
    let roles_builder = roles.builder().clone();
    users.inner_join(&roles_builder, "role_id", "id");
    users.list(&driver).await.unwrap();

    assert_eq!(
        driver.statements(),
        vec!["SELECT * FROM users INNER JOIN roles ON users.role_id = roles.id"]
    );
}
