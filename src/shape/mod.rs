//! Compile-time record shapes and the process-wide field resolution cache.
//!
//! A record type describes itself once, through [`impl_record!`](crate::impl_record), as a
//! static table of [`FieldDescriptor`]s. Binding and scanning then resolve external names
//! (placeholder names or result column names) to [`FieldPath`]s through [`resolve_paths`],
//! which memoizes the answer per shape, naming convention and name list.

pub mod cache;
mod macros;
pub mod naming;

use std::fmt;

pub use cache::{CacheStats, ShapeDescriptor, cache_stats, resolve_paths};
pub use naming::Naming;

use crate::error::SqlBinderError;
use crate::types::RowValues;

/// Annotation value that removes a field from name resolution.
pub const EXCLUDED: &str = "-";

/// How a field takes part in name resolution.
#[derive(Clone, Copy)]
pub enum FieldKind {
    /// A leaf holding one value.
    Value,
    /// A sub-record whose fields are addressed as if they belonged to the parent.
    Embedded(fn() -> &'static Shape),
    /// A sub-record whose fields are addressed as `prefix.field`.
    Nested(fn() -> &'static Shape),
}

impl fmt::Debug for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::Value => f.write_str("Value"),
            FieldKind::Embedded(sub) => write!(f, "Embedded({})", sub().name),
            FieldKind::Nested(sub) => write!(f, "Nested({})", sub().name),
        }
    }
}

/// One field of a record, as generated by `impl_record!`.
#[derive(Debug, Clone, Copy)]
pub struct FieldDescriptor {
    /// Rust field name.
    pub name: &'static str,
    /// Explicit external name, or [`EXCLUDED`].
    pub column: Option<&'static str>,
    pub kind: FieldKind,
}

impl FieldDescriptor {
    #[must_use]
    pub fn is_excluded(&self) -> bool {
        self.column == Some(EXCLUDED)
    }

    /// The name this field answers to: its annotation if present, else the derived name.
    #[must_use]
    pub fn external_name(&self, naming: Naming) -> String {
        match self.column {
            Some(column) => column.to_string(),
            None => naming.apply(self.name),
        }
    }
}

/// Static description of a record type.
#[derive(Debug)]
pub struct Shape {
    pub name: &'static str,
    pub fields: &'static [FieldDescriptor],
}

impl Shape {
    /// Identity of this shape for cache keys. Shapes live in statics, one per record type.
    pub(crate) fn key(&'static self) -> usize {
        std::ptr::from_ref(self) as usize
    }
}

/// Field indices from the record root down to a leaf. Empty means "not found".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldPath(Vec<usize>);

impl FieldPath {
    #[must_use]
    pub fn new(indices: Vec<usize>) -> Self {
        FieldPath(indices)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn indices(&self) -> &[usize] {
        &self.0
    }
}

/// Field access by descriptor index, implemented by `impl_record!`.
///
/// The trait is object safe so binding and scanning can walk nested records through
/// `&dyn Fields` without knowing their concrete types.
pub trait Fields {
    fn shape(&self) -> &'static Shape;

    /// Value of the leaf at `index`, `None` for sub-records and excluded fields.
    fn field_value(&self, index: usize) -> Option<RowValues>;

    /// Overwrite the leaf at `index`.
    ///
    /// # Errors
    ///
    /// `ConversionError` when `value` does not fit the field type, `ShapeMismatch` when
    /// `index` is not a writable leaf.
    fn set_field_value(&mut self, index: usize, value: RowValues) -> Result<(), SqlBinderError>;

    fn sub_record(&self, index: usize) -> Option<&dyn Fields>;

    fn sub_record_mut(&mut self, index: usize) -> Option<&mut dyn Fields>;
}

/// A record type that can be constructed empty and described without an instance.
pub trait Record: Fields + Default {
    fn describe() -> &'static Shape;
}

/// Follow `path` from `record` and read the leaf.
pub(crate) fn read_path(record: &dyn Fields, path: &FieldPath) -> Option<RowValues> {
    let (leaf, parents) = path.indices().split_last()?;
    let mut current = record;
    for &idx in parents {
        current = current.sub_record(idx)?;
    }
    current.field_value(*leaf)
}

/// Follow `path` from `record` and overwrite the leaf.
pub(crate) fn write_path(
    record: &mut dyn Fields,
    path: &FieldPath,
    value: RowValues,
) -> Result<(), SqlBinderError> {
    let Some((leaf, parents)) = path.indices().split_last() else {
        return Err(SqlBinderError::ShapeMismatch(format!(
            "empty field path into {}",
            record.shape().name
        )));
    };
    let mut current = record;
    for &idx in parents {
        let shape = current.shape().name;
        current = match current.sub_record_mut(idx) {
            Some(next) => next,
            None => {
                return Err(SqlBinderError::ShapeMismatch(format!(
                    "field {idx} of {shape} is not a sub-record"
                )));
            }
        };
    }
    current.set_field_value(*leaf, value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::impl_record;

    #[derive(Debug, Default, PartialEq)]
    struct Address {
        city: String,
        zip: Option<String>,
    }

    impl_record!(Address { city, zip });

    #[derive(Debug, Default, PartialEq)]
    struct Person {
        id: i64,
        first_name: String,
        secret: Vec<String>,
        home: Address,
    }

    impl_record!(Person {
        id,
        first_name = "first",
        secret = "-",
        #[nested] home: Address,
    });

    #[test]
    fn descriptor_table_follows_declaration() {
        let shape = Person::describe();
        assert_eq!(shape.name, "Person");
        let names: Vec<_> = shape.fields.iter().map(|f| f.name).collect();
        assert_eq!(names, ["id", "first_name", "secret", "home"]);
        assert!(shape.fields[2].is_excluded());
        assert_eq!(shape.fields[1].external_name(Naming::Lowercase), "first");
        assert!(matches!(shape.fields[3].kind, FieldKind::Nested(_)));
    }

    #[test]
    fn reads_and_writes_through_paths() {
        let mut person = Person {
            id: 7,
            ..Person::default()
        };
        let city = FieldPath::new(vec![3, 0]);

        write_path(&mut person, &city, RowValues::Text("Oslo".into())).unwrap();
        assert_eq!(person.home.city, "Oslo");
        assert_eq!(
            read_path(&person, &city),
            Some(RowValues::Text("Oslo".into()))
        );
        assert_eq!(
            read_path(&person, &FieldPath::new(vec![0])),
            Some(RowValues::Int(7))
        );
    }

    #[test]
    fn excluded_field_needs_no_conversions() {
        // Vec<String> has neither ToRowValue nor FromRowValue
        let mut person = Person {
            secret: vec!["pin".into()],
            ..Person::default()
        };
        assert_eq!(person.field_value(2), None);
        assert!(matches!(
            person.set_field_value(2, RowValues::Text("leak".into())),
            Err(SqlBinderError::ShapeMismatch(_))
        ));
        assert_eq!(person.secret, ["pin"]);
        assert!(matches!(
            write_path(&mut person, &FieldPath::new(vec![2]), RowValues::Null),
            Err(SqlBinderError::ShapeMismatch(_))
        ));
    }

    #[test]
    fn excluded_and_invalid_paths() {
        let mut person = Person::default();
        assert_eq!(read_path(&person, &FieldPath::new(vec![2])), None);
        assert_eq!(read_path(&person, &FieldPath::default()), None);
        assert!(matches!(
            write_path(&mut person, &FieldPath::new(vec![0, 1]), RowValues::Null),
            Err(SqlBinderError::ShapeMismatch(_))
        ));
        assert!(matches!(
            write_path(&mut person, &FieldPath::new(vec![0]), RowValues::Text("x".into())),
            Err(SqlBinderError::ConversionError(_))
        ));
    }
}
