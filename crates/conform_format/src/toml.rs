//! TOML through `toml_edit`.
//!
//! TOML has no null: null entries of a mapping are left out, which reads
//! back as `None` for optional fields, and a null anywhere else cannot be
//! encoded. The document root must be a mapping. Bytes are written as
//! arrays of integers. Datetimes are read as strings.

use conform_reflect::info::Typed;
use conform_reflect::path::{FieldPath, Segment};
use conform_reflect::policy::{Coerce, CoercionPolicy};
use conform_reflect::value::{Mapping, Value};
use conform_reflect::{FromRepr, Reflect};
use toml_edit::{Array, ArrayOfTables, DocumentMut, InlineTable, Item, Table};

use crate::{Format, FormatError, Result};

// -----------------------------------------------------------------------------
// Binding

/// Settings of the TOML binding.
#[derive(Clone, Copy, Debug, Default)]
pub struct TomlOptions {
    /// Writes nested mappings as inline tables (`a = { b = 1 }`) instead
    /// of `[a]` sections.
    pub inline_tables: bool,
}

/// The TOML binding.
#[derive(Clone, Copy, Debug, Default)]
pub struct Toml;

impl Format for Toml {
    const NAME: &'static str = "toml";

    type Options = TomlOptions;

    fn encode(value: &Value, options: &TomlOptions) -> Result<String> {
        let mut path = FieldPath::root();
        let Value::Map(map) = value else {
            return Err(unrepresentable(&path, "the document root must be a mapping"));
        };
        let mut doc = DocumentMut::new();
        fill_table(doc.as_table_mut(), map, options, &mut path)?;
        Ok(doc.to_string())
    }

    fn decode(input: &str, _: &TomlOptions) -> Result<Value> {
        let doc = input
            .parse::<DocumentMut>()
            .map_err(|e| FormatError::codec(Self::NAME, e))?;
        Ok(table_to_value(doc.as_table()))
    }
}

fn unrepresentable(path: &FieldPath, reason: &'static str) -> FormatError {
    FormatError::Unrepresentable {
        format: Toml::NAME,
        path: path.clone(),
        reason,
    }
}

// -----------------------------------------------------------------------------
// Encoding

fn is_table_array(items: &[Value]) -> bool {
    !items.is_empty() && items.iter().all(|item| matches!(item, Value::Map(_)))
}

fn fill_table(
    table: &mut Table,
    map: &Mapping,
    options: &TomlOptions,
    path: &mut FieldPath,
) -> Result<()> {
    for (key, value) in map.iter() {
        if value.is_null() {
            continue;
        }
        path.push(Segment::Field(key.into()));
        let item = match value {
            Value::Map(inner) if !options.inline_tables => {
                let mut sub = Table::new();
                fill_table(&mut sub, inner, options, path)?;
                Item::Table(sub)
            }
            Value::Seq(items) if !options.inline_tables && is_table_array(items) => {
                let mut tables = ArrayOfTables::new();
                for (index, item) in items.iter().enumerate() {
                    if let Value::Map(inner) = item {
                        path.push(Segment::Index(index));
                        let mut sub = Table::new();
                        fill_table(&mut sub, inner, options, path)?;
                        tables.push(sub);
                        path.pop();
                    }
                }
                Item::ArrayOfTables(tables)
            }
            _ => Item::Value(to_toml_value(value, path)?),
        };
        path.pop();
        table.insert(key, item);
    }
    Ok(())
}

fn to_toml_value(value: &Value, path: &mut FieldPath) -> Result<toml_edit::Value> {
    Ok(match value {
        Value::Null => return Err(unrepresentable(path, "null outside of a mapping")),
        Value::Bool(b) => (*b).into(),
        Value::Int(i) => (*i).into(),
        Value::Float(f) => (*f).into(),
        Value::Str(s) => s.as_str().into(),
        Value::Bytes(bytes) => {
            let mut array = Array::new();
            for byte in bytes {
                array.push(i64::from(*byte));
            }
            array.into()
        }
        Value::Seq(items) => {
            let mut array = Array::new();
            for (index, item) in items.iter().enumerate() {
                path.push(Segment::Index(index));
                array.push(to_toml_value(item, path)?);
                path.pop();
            }
            array.into()
        }
        Value::Map(map) => {
            let mut inline = InlineTable::new();
            for (key, item) in map.iter() {
                if item.is_null() {
                    continue;
                }
                path.push(Segment::Field(key.into()));
                inline.insert(key, to_toml_value(item, path)?);
                path.pop();
            }
            inline.into()
        }
    })
}

// -----------------------------------------------------------------------------
// Decoding

fn table_to_value(table: &Table) -> Value {
    Value::Map(
        table
            .iter()
            .map(|(key, item)| (key, item_to_value(item)))
            .collect(),
    )
}

fn item_to_value(item: &Item) -> Value {
    match item {
        Item::None => Value::Null,
        Item::Value(value) => from_toml_value(value),
        Item::Table(table) => table_to_value(table),
        Item::ArrayOfTables(tables) => Value::Seq(tables.iter().map(table_to_value).collect()),
    }
}

fn from_toml_value(value: &toml_edit::Value) -> Value {
    match value {
        toml_edit::Value::String(s) => Value::Str(s.value().clone()),
        toml_edit::Value::Integer(i) => Value::Int(*i.value()),
        toml_edit::Value::Float(f) => Value::Float(*f.value()),
        toml_edit::Value::Boolean(b) => Value::Bool(*b.value()),
        toml_edit::Value::Datetime(dt) => Value::Str(dt.value().to_string()),
        toml_edit::Value::Array(array) => Value::Seq(array.iter().map(from_toml_value).collect()),
        toml_edit::Value::InlineTable(table) => Value::Map(
            table
                .iter()
                .map(|(key, value)| (key, from_toml_value(value)))
                .collect(),
        ),
    }
}

// -----------------------------------------------------------------------------
// Convenience

/// Encodes `value` as a TOML document under [`Coerce`].
///
/// # Examples
///
/// ```
/// use conform_format::{from_toml, to_toml};
/// use conform_reflect::derive::Reflect;
///
/// #[derive(Reflect, Debug, PartialEq)]
/// struct Database {
///     url: String,
///     pool: Option<u32>,
/// }
///
/// let db = Database { url: "postgres://db".into(), pool: None };
/// let text = to_toml(&db).unwrap();
/// assert!(text.starts_with("url = \"postgres://db\""));
/// assert!(!text.contains("pool"));
/// assert_eq!(from_toml::<Database>(&text).unwrap(), db);
/// ```
#[inline]
pub fn to_toml<T: Reflect>(value: &T) -> Result<String> {
    to_toml_with(value, &Coerce)
}

/// Like [`to_toml`], under `policy` and with default [`TomlOptions`].
#[inline]
pub fn to_toml_with<T: Reflect>(value: &T, policy: &dyn CoercionPolicy) -> Result<String> {
    to_toml_with_options(value, policy, &TomlOptions::default())
}

#[inline]
pub fn to_toml_with_options<T: Reflect>(
    value: &T,
    policy: &dyn CoercionPolicy,
    options: &TomlOptions,
) -> Result<String> {
    crate::to_string_with::<Toml, T>(value, policy, options)
}

#[inline]
pub fn from_toml<T: Typed + FromRepr>(input: &str) -> Result<T> {
    from_toml_with(input, &Coerce)
}

/// Like [`from_toml`], under `policy` and with default [`TomlOptions`].
#[inline]
pub fn from_toml_with<T: Typed + FromRepr>(input: &str, policy: &dyn CoercionPolicy) -> Result<T> {
    from_toml_with_options(input, policy, &TomlOptions::default())
}

#[inline]
pub fn from_toml_with_options<T: Typed + FromRepr>(
    input: &str,
    policy: &dyn CoercionPolicy,
    options: &TomlOptions,
) -> Result<T> {
    crate::from_str_with::<Toml, T>(input, policy, options)
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use conform_reflect::value::{Mapping, Value};

    use super::{Toml, TomlOptions};
    use crate::{Format, FormatError};

    fn map<const N: usize>(entries: [(&str, Value); N]) -> Value {
        Value::Map(Mapping::from_iter(entries))
    }

    #[test]
    fn sections_and_inline_tables() {
        let value = map([
            ("name", "edge".into()),
            ("limits", map([("rps", Value::Int(10))])),
        ]);

        let text = Toml::encode(&value, &TomlOptions::default()).unwrap();
        assert!(text.contains("[limits]"));
        assert_eq!(Toml::decode(&text, &TomlOptions::default()).unwrap(), value);

        let options = TomlOptions { inline_tables: true };
        let text = Toml::encode(&value, &options).unwrap();
        assert!(!text.contains("[limits]"));
        assert!(text.contains("limits = {"));
        assert_eq!(Toml::decode(&text, &options).unwrap(), value);
    }

    #[test]
    fn arrays_of_mappings_become_table_arrays() {
        let value = map([(
            "servers",
            Value::Seq(vec![map([("port", Value::Int(1))]), map([("port", Value::Int(2))])]),
        )]);
        let text = Toml::encode(&value, &TomlOptions::default()).unwrap();
        assert_eq!(text.matches("[[servers]]").count(), 2);
        assert_eq!(Toml::decode(&text, &TomlOptions::default()).unwrap(), value);
    }

    #[test]
    fn null_entries_are_left_out() {
        let value = map([
            ("a", Value::Null),
            ("b", map([("c", Value::Null), ("d", Value::Bool(true))])),
        ]);
        for inline_tables in [false, true] {
            let options = TomlOptions { inline_tables };
            let text = Toml::encode(&value, &options).unwrap();
            assert_eq!(
                Toml::decode(&text, &options).unwrap(),
                map([("b", map([("d", Value::Bool(true))]))])
            );
        }
    }

    #[test]
    fn null_in_an_array_is_unrepresentable() {
        let value = map([(
            "ports",
            Value::Seq(vec![Value::Int(1), Value::Null]),
        )]);
        let err = Toml::encode(&value, &TomlOptions::default()).unwrap_err();
        match err {
            FormatError::Unrepresentable { path, .. } => {
                assert_eq!(path.to_string(), "ports[1]");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn root_must_be_a_mapping() {
        let err = Toml::encode(&Value::Int(1), &TomlOptions::default()).unwrap_err();
        assert!(matches!(err, FormatError::Unrepresentable { .. }));
    }

    #[test]
    fn bytes_and_datetimes() {
        let value = map([("key", Value::Bytes(vec![0, 7]))]);
        let text = Toml::encode(&value, &TomlOptions::default()).unwrap();
        assert_eq!(
            Toml::decode(&text, &TomlOptions::default()).unwrap(),
            map([("key", Value::Seq(vec![Value::Int(0), Value::Int(7)]))])
        );

        let decoded = Toml::decode("at = 1979-05-27T07:32:00Z\n", &TomlOptions::default()).unwrap();
        assert_eq!(decoded, map([("at", "1979-05-27T07:32:00Z".into())]));
    }

    #[test]
    fn syntax_errors_are_codec_errors() {
        let err = Toml::decode("a = ", &TomlOptions::default()).unwrap_err();
        assert!(matches!(err, FormatError::Codec { format: "toml", .. }));
    }
}
