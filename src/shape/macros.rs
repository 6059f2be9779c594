/// Describe a plain struct as a bindable, scannable record.
///
/// Every field that takes part in binding or scanning is listed once, in any order:
///
/// - `field` uses the name derived by the active [`Naming`](crate::shape::Naming);
/// - `field = "col"` answers to `col` instead;
/// - `field = "-"` is ignored entirely (its type needs no conversions);
/// - `#[embed] field: Type` flattens `Type`'s fields into this record;
/// - `#[nested] field: Type` exposes them as `field.sub` (or `col.sub` with an annotation).
///
/// Leaf fields need [`ToRowValue`](crate::types::ToRowValue) and
/// [`FromRowValue`](crate::types::FromRowValue); embedded and nested types need their own
/// `impl_record!`. Fields left out of the list are invisible to the binder.
///
/// ```rust
/// use sql_binder::impl_record;
///
/// #[derive(Debug, Default)]
/// struct Audit {
///     created_by: String,
/// }
/// impl_record!(Audit { created_by });
///
/// #[derive(Debug, Default)]
/// struct Person {
///     id: i64,
///     first_name: String,
///     scratch: Vec<String>,
///     audit: Audit,
/// }
/// impl_record!(Person {
///     id,
///     first_name = "first",
///     scratch = "-",
///     #[embed] audit: Audit,
/// });
/// ```
#[macro_export]
macro_rules! impl_record {
    ($ty:ident { $( $(#[$kind:ident])? $field:ident $(= $col:tt)? $(: $sub:ty)? ),* $(,)? }) => {
        impl $crate::shape::Record for $ty {
            fn describe() -> &'static $crate::shape::Shape {
                static SHAPE: $crate::shape::Shape = $crate::shape::Shape {
                    name: stringify!($ty),
                    fields: &[
                        $(
                            $crate::shape::FieldDescriptor {
                                name: stringify!($field),
                                column: $crate::__record_column!($($col)?),
                                kind: $crate::__record_kind!($($kind $sub)?),
                            },
                        )*
                    ],
                };
                &SHAPE
            }
        }

        impl $crate::shape::Fields for $ty {
            fn shape(&self) -> &'static $crate::shape::Shape {
                <Self as $crate::shape::Record>::describe()
            }

            #[allow(unused_assignments, unused_mut, unused_variables)]
            fn field_value(&self, index: usize) -> Option<$crate::types::RowValues> {
                let mut at = 0usize;
                $(
                    if at == index {
                        return $crate::__record_get!(self.$field [$($kind)?] [$($col)?]);
                    }
                    at += 1;
                )*
                None
            }

            #[allow(unused_assignments, unused_mut, unused_variables)]
            fn set_field_value(
                &mut self,
                index: usize,
                value: $crate::types::RowValues,
            ) -> Result<(), $crate::error::SqlBinderError> {
                let mut at = 0usize;
                $(
                    if at == index {
                        return $crate::__record_set!(self.$field [$($kind)?] [$($col)?] value);
                    }
                    at += 1;
                )*
                Err($crate::error::SqlBinderError::ShapeMismatch(format!(
                    "{} has no field {}",
                    stringify!($ty),
                    index
                )))
            }

            #[allow(unused_assignments, unused_mut, unused_variables)]
            fn sub_record(&self, index: usize) -> Option<&dyn $crate::shape::Fields> {
                let mut at = 0usize;
                $(
                    if at == index {
                        return $crate::__record_sub!(self.$field [$($kind)?]);
                    }
                    at += 1;
                )*
                None
            }

            #[allow(unused_assignments, unused_mut, unused_variables)]
            fn sub_record_mut(&mut self, index: usize) -> Option<&mut dyn $crate::shape::Fields> {
                let mut at = 0usize;
                $(
                    if at == index {
                        return $crate::__record_sub_mut!(self.$field [$($kind)?]);
                    }
                    at += 1;
                )*
                None
            }
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __record_column {
    () => {
        None
    };
    ($col:tt) => {
        Some($col)
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __record_kind {
    () => {
        $crate::shape::FieldKind::Value
    };
    (embed $sub:ty) => {
        $crate::shape::FieldKind::Embedded(<$sub as $crate::shape::Record>::describe)
    };
    (nested $sub:ty) => {
        $crate::shape::FieldKind::Nested(<$sub as $crate::shape::Record>::describe)
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __record_get {
    ($self:ident . $field:ident [] ["-"]) => {
        None
    };
    ($self:ident . $field:ident [] [$($col:tt)?]) => {
        Some($crate::types::ToRowValue::to_row_value(&$self.$field))
    };
    ($self:ident . $field:ident [$kind:ident] [$($col:tt)?]) => {
        None
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __record_set {
    ($self:ident . $field:ident [] ["-"] $value:ident) => {
        Err($crate::error::SqlBinderError::ShapeMismatch(format!(
            "field {} is excluded",
            stringify!($field)
        )))
    };
    ($self:ident . $field:ident [] [$($col:tt)?] $value:ident) => {
        match $crate::types::FromRowValue::from_row_value($value) {
            Ok(decoded) => {
                $self.$field = decoded;
                Ok(())
            }
            Err(err) => Err(err),
        }
    };
    ($self:ident . $field:ident [$kind:ident] [$($col:tt)?] $value:ident) => {
        Err($crate::error::SqlBinderError::ShapeMismatch(format!(
            "field {} is a sub-record",
            stringify!($field)
        )))
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __record_sub {
    ($self:ident . $field:ident []) => {
        None
    };
    ($self:ident . $field:ident [$kind:ident]) => {
        Some(&$self.$field as &dyn $crate::shape::Fields)
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __record_sub_mut {
    ($self:ident . $field:ident []) => {
        None
    };
    ($self:ident . $field:ident [$kind:ident]) => {
        Some(&mut $self.$field as &mut dyn $crate::shape::Fields)
    };
}
