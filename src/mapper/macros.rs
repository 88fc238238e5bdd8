/// Implement [`Mappable`](crate::mapper::Mappable) for a `Default` struct.
///
/// Each entry names a field and its declared type. The column name defaults to
/// the field name; `= "Column"` binds the field to a differently spelled column.
/// Invoke it in the struct's own module to bind private fields.
///
/// ```rust
/// use row_mapper::mappable;
///
/// #[derive(Debug, Default)]
/// struct Employee {
///     id: i64,
///     name: String,
///     manager_id: Option<i64>,
/// }
///
/// mappable!(Employee {
///     id: i64 = "Id",
///     name: String = "Name",
///     manager_id: Option<i64>,
/// });
/// ```
#[macro_export]
macro_rules! mappable {
    (@column $field:ident) => {
        stringify!($field)
    };
    (@column $field:ident $column:literal) => {
        $column
    };
    ($ty:ty { $($field:ident : $fty:ty $(= $column:literal)?),* $(,)? }) => {
        impl $crate::mapper::Mappable for $ty {
            fn fields() -> ::std::vec::Vec<$crate::mapper::FieldDescriptor<Self>> {
                ::std::vec![
                    $(
                        $crate::mapper::FieldDescriptor::new(
                            $crate::mappable!(@column $field $($column)?),
                            ::std::any::type_name::<$fty>(),
                            |target: &mut Self, value: &$crate::types::RowValues| {
                                target.$field =
                                    <$fty as $crate::mapper::FromRowValue>::from_row_value(value)?;
                                Ok(())
                            },
                        )
                    ),*
                ]
            }
        }
    };
}
