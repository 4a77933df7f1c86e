//! Models addressable by a UUID column.

/// Default name of the UUID column.
pub const DEFAULT_UUID_COLUMN: &str = "uuid";

/// A model type whose rows carry a UUID column.
pub trait UuidModel: Sized {
    /// Returns the table backing the model.
    fn table() -> &'static str;

    /// Returns the UUID column name.
    fn uuid_column() -> &'static str {
        DEFAULT_UUID_COLUMN
    }

    /// Returns the column qualified by table, e.g. `users.uuid`.
    fn qualified_uuid_column() -> String {
        format!("{}.{}", Self::table(), Self::uuid_column())
    }

    /// Returns the model name used in diagnostics.
    fn model_name() -> String {
        let full = std::any::type_name::<Self>();
        full.rsplit("::").next().unwrap_or(full).to_string()
    }

    /// Returns a fresh, unsaved instance.
    fn new_instance() -> Self;
}
