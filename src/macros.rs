/// Builds a [`VariantTree`](crate::VariantTree) from a literal description.
///
/// - `{ "key" => value, ... }` builds a node with children; keys may repeat
/// - `(data => { ... })` builds a node with both a datum and children
/// - `null` builds an empty node
/// - any other expression becomes the datum of a leaf
///
/// Negative numbers and other multi-token values must be parenthesized.
///
/// # Examples
///
/// ```rust
/// use variant_tree::{vtree, Variant};
///
/// let tree = vtree!({
///     "name" => "web",
///     "listen" => ("0.0.0.0" => {
///         "port" => 8080,
///         "port" => 8443,
///     }),
///     "offset" => (-5),
/// });
///
/// assert_eq!(tree.get_value("listen"), Some(&Variant::from("0.0.0.0")));
/// assert_eq!(tree.get_child("listen").unwrap().count("port"), 2);
/// assert_eq!(tree.get::<i64>("offset").unwrap(), -5);
/// ```
#[macro_export]
macro_rules! vtree {
    (null) => {
        $crate::VariantTree::new()
    };

    ({}) => {
        $crate::VariantTree::new()
    };

    ({ $($key:literal => $value:tt),* $(,)? }) => {{
        let mut tree = $crate::VariantTree::new();
        $(
            tree.push_back($key, $crate::vtree!($value));
        )*
        tree
    }};

    (($data:expr => { $($key:literal => $value:tt),* $(,)? })) => {{
        let mut tree = $crate::VariantTree::with_data($data);
        $(
            tree.push_back($key, $crate::vtree!($value));
        )*
        tree
    }};

    ($data:expr) => {
        $crate::VariantTree::with_data($data)
    };
}

#[cfg(test)]
mod tests {
    use crate::{Variant, VariantTree};

    #[test]
    fn test_vtree_leaves() {
        assert_eq!(vtree!(null), VariantTree::new());
        assert_eq!(vtree!(42).data(), &Variant::Int(42));
        assert_eq!(vtree!(1.5).data(), &Variant::Float(1.5));
        assert_eq!(vtree!(true).data(), &Variant::Bool(true));
        assert_eq!(vtree!("hi").data(), &Variant::from("hi"));
        assert_eq!(vtree!((-3)).data(), &Variant::Int(-3));
    }

    #[test]
    fn test_vtree_nested() {
        let tree = vtree!({
            "a" => 1,
            "b" => { "c" => "x", "d" => null },
            "a" => 2,
        });
        let keys: Vec<_> = tree.keys().collect();
        assert_eq!(keys, vec!["a", "b", "a"]);
        assert_eq!(tree.get::<String>("b.c").unwrap(), "x");
        assert!(tree.get_value("b.d").unwrap().is_null());
    }

    #[test]
    fn test_vtree_data_with_children() {
        let tree = vtree!({ "server" => ("main" => { "port" => 80 }) });
        let server = tree.find("server").unwrap();
        assert_eq!(server.data(), &Variant::from("main"));
        assert_eq!(server.get::<i64>("port").unwrap(), 80);
    }

    #[test]
    fn test_vtree_empty() {
        assert!(vtree!({}).is_empty());
    }
}
