/// Builds a [`TomlValue`](crate::TomlValue) from literal syntax.
///
/// Arrays use brackets, tables use braces with quoted keys. TOML has no
/// null, so values that cannot be represented (such as `None`) panic.
///
/// # Examples
///
/// ```
/// use tomldoc::toml;
///
/// let value = toml!({
///     "name": "demo",
///     "port": 8080,
///     "tags": ["a", "b"],
/// });
/// assert_eq!(value.as_table().unwrap().get_integer("port"), Some(8080));
/// ```
#[macro_export]
macro_rules! toml {
    // Handle true
    (true) => {
        $crate::TomlValue::Boolean(true)
    };

    // Handle false
    (false) => {
        $crate::TomlValue::Boolean(false)
    };

    // Handle empty array
    ([]) => {
        $crate::TomlValue::Array(vec![])
    };

    // Handle non-empty array
    ([ $($elem:tt),* $(,)? ]) => {
        $crate::TomlValue::Array(vec![$($crate::toml!($elem)),*])
    };

    // Handle empty table
    ({}) => {
        $crate::TomlValue::Table($crate::TomlTable::new())
    };

    // Handle non-empty table
    ({ $($key:literal : $value:tt),* $(,)? }) => {{
        let mut table = $crate::TomlTable::new();
        $(
            table.insert($key.to_string(), $crate::toml!($value));
        )*
        $crate::TomlValue::Table(table)
    }};

    // Fallback for any expression
    ($v:expr) => {
        $crate::to_value(&$v).expect("value not representable in TOML")
    };
}
