#[cfg(test)]
mod tests {
    use crate::{
        args, ints, mapper_file, session, session_with,
        utils::{ACCOUNTS_MAPPER, BROKEN_MAPPER, USERS_MAPPER},
    };
    use bigdecimal::BigDecimal;
    use binding::{ParamStore, ParameterMode, Postgres};
    use engine_core::{
        Configuration, ErrorKind, MapperDocument, MapperError, MapperSession, Settings, SqlSource,
        load_configuration,
    };
    use model::core::{sql_type::SqlType, value::Value};
    use std::str::FromStr;
    use tracing_test::traced_test;

    // Scenario: A static statement is called twice with different arguments.
    // Expected Outcome: Both calls share the SQL resolved at load time; only the bound values differ.
    #[traced_test]
    #[test]
    fn tc01() {
        let session = session(&[USERS_MAPPER]);
        let statement = session.configuration().statement("users.findById").unwrap();
        assert!(matches!(statement.source, SqlSource::Static(_)));

        for id in [7, 8] {
            let mut stmt = ParamStore::new();
            let bound = session.prepare("findById", &Value::Int(id), &mut stmt).unwrap();
            assert_eq!(bound.sql(), "select u.id, u.name, u.email from users u where u.id = ?");
            assert_eq!(stmt.values(), vec![Value::Int(id)]);
        }
    }

    // Scenario: Dynamic WHERE with every combination of optional filters.
    // Expected Outcome: The leading AND is dropped, WHERE only appears when a filter rendered.
    #[traced_test]
    #[test]
    fn tc02() {
        let session = session(&[USERS_MAPPER]);

        let mut stmt = ParamStore::new();
        let bound = session.prepare("users.search", &args(vec![]), &mut stmt).unwrap();
        assert_eq!(bound.sql(), "select * from users ");
        assert!(stmt.is_empty());

        let mut stmt = ParamStore::new();
        let argument = args(vec![("name", Value::from("ann"))]);
        let bound = session.prepare("users.search", &argument, &mut stmt).unwrap();
        assert_eq!(bound.sql(), "select * from users WHERE name = ? ");
        assert_eq!(stmt.values(), vec![Value::from("ann")]);

        let mut stmt = ParamStore::new();
        let argument = args(vec![("name", Value::from("")), ("email", Value::from("a@b.c"))]);
        let bound = session.prepare("users.search", &argument, &mut stmt).unwrap();
        assert_eq!(bound.sql(), "select * from users WHERE email = ? ");
        assert_eq!(stmt.params[&1].sql_type, Some(SqlType::VarChar));

        let mut stmt = ParamStore::new();
        let argument = args(vec![("name", Value::from("bob")), ("ids", ints(&[3, 4]))]);
        let bound = session.prepare("users.search", &argument, &mut stmt).unwrap();
        assert_eq!(bound.sql(), "select * from users WHERE name = ? AND id IN (?,?)");
        assert_eq!(stmt.values(), vec![Value::from("bob"), Value::Int(3), Value::Int(4)]);
        assert!(logs_contain("Preparing"));
    }

    // Scenario: An empty IN list is guarded by an `if` on its size.
    // Expected Outcome: No dangling `IN ()` is produced.
    #[traced_test]
    #[test]
    fn tc03() {
        let session = session(&[USERS_MAPPER]);
        let mut stmt = ParamStore::new();
        let argument = args(vec![("ids", ints(&[]))]);
        let bound = session.prepare("users.search", &argument, &mut stmt).unwrap();
        assert_eq!(bound.sql(), "select * from users ");
    }

    // Scenario: `bind` builds a LIKE pattern from the argument.
    // Expected Outcome: The bound value is the concatenated pattern, not the raw name.
    #[traced_test]
    #[test]
    fn tc04() {
        let session = session(&[USERS_MAPPER]);
        let mut stmt = ParamStore::new();
        let argument = args(vec![("name", Value::from("ann"))]);
        let bound = session.prepare("users.findLike", &argument, &mut stmt).unwrap();
        assert_eq!(bound.sql(), "select * from users where name like ?");
        assert_eq!(stmt.values(), vec![Value::from("%ann%")]);
    }

    // Scenario: `choose` picks the first matching branch, falling back to `otherwise`.
    #[traced_test]
    #[test]
    fn tc05() {
        let session = session(&[USERS_MAPPER]);
        let cases = [
            (Some("email"), "select * from users order by email"),
            (Some("name"), "select * from users order by name"),
            (None, "select * from users order by id"),
        ];
        for (sort, expected) in cases {
            let argument = match sort {
                Some(sort) => args(vec![("sort", Value::from(sort))]),
                None => args(vec![]),
            };
            let bound = session.bound_template("users.ordered", &argument).unwrap();
            assert_eq!(bound.sql(), expected);
        }
    }

    // Test Settings: jdbcTypeForNull = NULL.
    // Scenario: UPDATE with a SET clause where only some columns are given and the id is null.
    // Expected Outcome: The trailing comma is dropped and the null binds as SQL NULL.
    #[traced_test]
    #[test]
    fn tc06() {
        let settings = Settings::from_json(r#"{"jdbcTypeForNull": "NULL"}"#, "settings").unwrap();
        let session = session_with(settings, &[USERS_MAPPER]);
        let mut stmt = ParamStore::new();
        let argument = args(vec![("name", Value::from("x")), ("id", Value::Null)]);

        let bound = session.prepare("users.update", &argument, &mut stmt).unwrap();
        assert_eq!(bound.sql(), "update users SET name = ?  where id = ?");
        assert_eq!(stmt.params[&2].value, Value::Null);
        assert_eq!(stmt.params[&2].sql_type, Some(SqlType::Null));
    }

    // Scenario: Batch insert from a single list argument.
    // Expected Outcome: The list is reachable as `list`; each row binds its own loop-scoped names.
    #[traced_test]
    #[test]
    fn tc07() {
        let session = session(&[USERS_MAPPER]);
        let users = Value::List(vec![
            args(vec![("name", Value::from("a")), ("email", Value::from("a@x"))]),
            args(vec![("name", Value::from("b")), ("email", Value::Null)]),
        ]);
        let argument = session.arguments(&[None], vec![users]);

        let mut stmt = ParamStore::new();
        let bound = session.prepare("users.insertAll", &argument, &mut stmt).unwrap();
        assert_eq!(bound.sql(), "insert into users (name, email) values (?, ?), (?, ?)");
        assert_eq!(
            stmt.values(),
            vec![Value::from("a"), Value::from("a@x"), Value::from("b"), Value::Null]
        );
        let properties: Vec<&str> = bound.parameters().iter().map(|p| p.property.as_str()).collect();
        assert_eq!(
            properties,
            vec!["__frch_u_0.name", "__frch_u_0.email", "__frch_u_1.name", "__frch_u_1.email"]
        );
        assert_eq!(
            bound.sql_for(&Postgres),
            "insert into users (name, email) values ($1, $2), ($3, $4)"
        );
    }

    // Test Settings: databaseId = postgres.
    // Scenario: Vendor-specific SQL picked with `_databaseId`.
    #[traced_test]
    #[test]
    fn tc08() {
        let pg = session_with(Settings::default().with_database_id("postgres"), &[USERS_MAPPER]);
        assert_eq!(pg.bound_template("users.now", &Value::Null).unwrap().sql(), "select now()");

        let other = session(&[USERS_MAPPER]);
        assert_eq!(other.bound_template("users.now", &Value::Null).unwrap().sql(), "select sysdate()");
    }

    // Scenario: Stored procedure call with an OUT parameter.
    // Expected Outcome: The output is registered instead of bound, then written back into the argument.
    #[traced_test]
    #[test]
    fn tc09() {
        let session = session(&[ACCOUNTS_MAPPER]);
        let mut argument = args(vec![("id", Value::Int(5))]);
        let mut stmt = ParamStore::new();

        let bound = session.prepare("accounts.balance", &argument, &mut stmt).unwrap();
        assert_eq!(bound.sql(), "{call account_balance(?, ?)}");
        assert_eq!(bound.parameters()[1].mode, ParameterMode::Out);
        assert_eq!(stmt.values(), vec![Value::Int(5)]);
        assert_eq!(stmt.outputs[&2].sql_type, SqlType::Numeric);
        assert_eq!(stmt.outputs[&2].numeric_scale, Some(2));

        let total = BigDecimal::from_str("12.50").unwrap();
        stmt.set_result(2, Value::Decimal(total.clone()));
        session
            .apply_outputs("accounts.balance", &bound, &stmt, &mut argument)
            .unwrap();

        let Value::Map(map) = &argument else {
            panic!("argument should still be a map");
        };
        assert_eq!(map["total"], Value::Decimal(total));
    }

    // Scenario: Multiple named arguments.
    // Expected Outcome: Declared names and generic param aliases both resolve.
    #[traced_test]
    #[test]
    fn tc10() {
        let session = session(&[ACCOUNTS_MAPPER]);
        let argument = session.arguments(&[Some("owner"), None], vec![Value::from("ann"), Value::Int(2)]);
        let Value::Map(map) = &argument else {
            panic!("expected named arguments");
        };
        assert_eq!(map["param1"], Value::from("ann"));
        assert_eq!(map["arg1"], Value::Int(2));

        let mut stmt = ParamStore::new();
        session.prepare("accounts.page", &argument, &mut stmt).unwrap();
        assert_eq!(stmt.values(), vec![Value::from("ann")]);
    }

    // Scenario: Failures are classified and carry the statement id.
    #[traced_test]
    #[test]
    fn tc11() {
        let session = session(&[BROKEN_MAPPER]);
        let mut stmt = ParamStore::new();

        let err = session
            .prepare("broken.badTest", &args(vec![("name", Value::Null)]), &mut stmt)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Evaluation);
        assert_eq!(err.statement_id(), Some("broken.badTest"));

        let err = session
            .prepare("broken.notIterable", &args(vec![("ids", Value::Int(3))]), &mut stmt)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Binding);
        assert_eq!(err.statement_id(), Some("broken.notIterable"));
        assert!(stmt.is_empty());
    }

    // Scenario: Mapper content errors surface while loading, never at call time.
    #[traced_test]
    #[test]
    fn tc12() {
        let cases = [
            r#"["select * from t where id = #{id,colour=red}"]"#,
            r#"["select 1 ", {"tag": "if", "attrs": {"test": "name =="}, "children": ["x"]}]"#,
            r#"[{"tag": "choose", "children": [{"tag": "otherwise"}, {"tag": "otherwise"}]}]"#,
            r#"[{"tag": "include", "attrs": {"refid": "nowhere"}}]"#,
            r#"[{"tag": "selectKey"}]"#,
        ];
        for body in cases {
            let json = format!(r#"{{"namespace": "bad", "statements": [{{"id": "q", "body": {body}}}]}}"#);
            let document = MapperDocument::from_json(&json, "bad.json").unwrap();
            let err = Configuration::builder(Settings::default())
                .add_mapper(&document)
                .unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Configuration, "{body}: {err}");
            assert_eq!(err.statement_id(), Some("bad.q"));
        }
    }

    // Scenario: Mappers and settings are read from disk.
    #[traced_test]
    #[test]
    fn tc13() {
        let users = mapper_file(USERS_MAPPER);
        let accounts = mapper_file(ACCOUNTS_MAPPER);
        let config = load_configuration(Settings::default(), &[users.path(), accounts.path()]).unwrap();

        assert!(config.has_statement("accounts.balance"));
        assert!(config.has_statement("findLike"));
        assert!(logs_contain("Loaded mapper 'users'"));

        let err = load_configuration(Settings::default(), &[users.path(), users.path()]).unwrap_err();
        assert!(matches!(err, MapperError::DuplicateStatement(_)));
    }

    // Scenario: One session shared by many threads rendering the same dynamic statement.
    // Expected Outcome: Every thread sees only its own argument's SQL and values.
    #[test]
    fn tc14() {
        let session = session(&[USERS_MAPPER]);

        std::thread::scope(|scope| {
            for n in 1..=8i64 {
                let session: &MapperSession = &session;
                scope.spawn(move || {
                    let ids: Vec<i64> = (0..n).collect();
                    let argument = args(vec![("ids", ints(&ids))]);
                    let mut stmt = ParamStore::new();
                    let bound = session.prepare("users.search", &argument, &mut stmt).unwrap();

                    let markers = vec!["?"; n as usize].join(",");
                    assert_eq!(bound.sql(), format!("select * from users WHERE id IN ({markers})"));
                    assert_eq!(stmt.values(), ids.into_iter().map(Value::Int).collect::<Vec<_>>());
                });
            }
        });
    }
}
