use variant_tree::{to_scon_string, vtree, SconWriterSettings, Variant, VariantTree};

#[test]
fn test_vtree_macro_null() {
    let tree = vtree!(null);
    assert_eq!(tree, VariantTree::new());
    assert!(tree.data().is_null());
}

#[test]
fn test_vtree_macro_booleans() {
    assert_eq!(vtree!(true).data(), &Variant::Bool(true));
    assert_eq!(vtree!(false).data(), &Variant::Bool(false));
}

#[test]
fn test_vtree_macro_numbers() {
    assert_eq!(vtree!(42).data(), &Variant::Int(42));
    assert_eq!(vtree!(3.5).data(), &Variant::Float(3.5));
    assert_eq!(vtree!(-123).data(), &Variant::Int(-123));
}

#[test]
fn test_vtree_macro_strings() {
    assert_eq!(vtree!("hello world").data(), &Variant::from("hello world"));
    assert_eq!(vtree!("").data(), &Variant::from(""));
}

#[test]
fn test_vtree_macro_expressions() {
    let port = 8000 + 80;
    let host = String::from("localhost");
    let tree = vtree!({ "port" => port, "host" => host, "timeout" => (Some(30)) });
    assert_eq!(tree.get::<i64>("port").unwrap(), 8080);
    assert_eq!(tree.get::<String>("host").unwrap(), "localhost");
    assert_eq!(tree.get::<i64>("timeout").unwrap(), 30);
}

#[test]
fn test_vtree_macro_nested() {
    let tree = vtree!({
        "database" => {
            "primary" => ("db1" => {
                "port" => 5432,
                "replica" => "db2",
                "replica" => "db3",
            }),
        },
        "cache" => {},
    });

    assert_eq!(tree.get_value("database.primary"), Some(&Variant::from("db1")));
    let replicas: Vec<_> = tree
        .get_child("database.primary")
        .unwrap()
        .find_all("replica")
        .map(|t| t.data().to_string())
        .collect();
    assert_eq!(replicas, vec!["db2", "db3"]);
    assert!(tree.get_child("cache").unwrap().is_empty());
}

#[test]
fn test_vtree_macro_matches_built_tree() {
    let mut built = VariantTree::new();
    built.add("a", 1);
    built.push_back("b", VariantTree::with_data("x")).add("c", false);

    let literal = vtree!({ "a" => 1, "b" => ("x" => { "c" => false }) });
    assert_eq!(literal, built);
}

#[test]
fn test_vtree_macro_writes_as_scon() {
    let tree = vtree!({ "name" => "svc", "limits" => { "cpu" => 0.5, "offset" => (-1) } });
    assert_eq!(
        to_scon_string(&tree, &SconWriterSettings::default()),
        "name = \"svc\"\nlimits {\n  cpu = 0.5\n  offset = -1\n}\n"
    );
}
