//! Generic utilities for working with diesel.

pub use crate::{eq, query};

/// Helper macro for making queries.
///
/// eq!(table, column_1, column_2)
/// =
/// (table::column_1.eq(column_1), table::column_2.eq(column_2))
///
/// eq!(table_1::column_1, table_2::column_2)
/// =
/// (table_1::column_1.eq(column_1), table_2::column_2.eq(column_2))
#[macro_export]
macro_rules! eq {
    ($t:ident, $c: ident $(,)?) => {
        $t::$c.eq($c)
    };
    ($t:ident, $($c: ident),* $(,)?) => {
        ( $($t::$c.eq($c)),* )
    };
    ($t:ident :: $c: ident) => {
        $t::$c.eq($c)
    };
    ($($t:ident :: $c: ident),* $(,)?) => {
        ( $($t::$c.eq($c)),* )
    };
}

/// Helper macro for implementing Queryable and Selectable and ensures the implementations match.
///
/// ```
/// # use mise_server::query;
/// # use serde::Serialize;
/// query! {
///     #[derive(Debug, Serialize)]
///     pub struct UserSmall {
///         pub id: i32 = users::id,
///         pub username: String = users::username,
///     }
/// }
/// ```
#[macro_export]
macro_rules! query {
    (
        $(#[ $attr:meta ])*
        $v:vis $kw:ident $name:ident {
            $(
                $fv:vis $field:ident: $t:ty = $table:ident :: $column:ident
            ),* $(,)?
        }
    ) => {
        $(#[ $attr ])*
        #[derive(::diesel::Queryable)]
        #[diesel(check_for_backend(::diesel::pg::Pg))]
        $v $kw $name {
            $($fv $field: $t),*
        }

        impl<DB: ::diesel::backend::Backend> ::diesel::Selectable<DB> for $name {
            type SelectExpression = ($( $crate::schema::$table::$column, )*);

            fn construct_selection() -> Self::SelectExpression {
                ($( $crate::schema::$table::$column, )*)
            }
        }
    };
}
