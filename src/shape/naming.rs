use convert_case::{Case, Casing};

/// How a field name turns into a column / placeholder name when it carries no annotation.
#[derive(Debug, Clone, Copy, Default)]
pub enum Naming {
    /// Fold to lowercase. Rust field names are already snake case, so this is the identity for
    /// idiomatic structs while still matching `firstName`-style fields against `firstname`.
    #[default]
    Lowercase,
    /// `firstName` / `FirstName` → `first_name`.
    SnakeCase,
    /// `first_name` → `firstName`.
    CamelCase,
    /// Use the field name as written.
    Verbatim,
    /// Caller-supplied derivation.
    Custom(fn(&str) -> String),
}

impl Naming {
    #[must_use]
    pub fn apply(self, field: &str) -> String {
        match self {
            Naming::Lowercase => field.to_lowercase(),
            Naming::SnakeCase => field.to_case(Case::Snake),
            Naming::CamelCase => field.to_case(Case::Camel),
            Naming::Verbatim => field.to_string(),
            Naming::Custom(derive) => derive(field),
        }
    }

    /// Identity used in cache keys; custom conventions are told apart by function address.
    pub(crate) fn cache_key(self) -> (u8, usize) {
        match self {
            Naming::Lowercase => (0, 0),
            Naming::SnakeCase => (1, 0),
            Naming::CamelCase => (2, 0),
            Naming::Verbatim => (3, 0),
            Naming::Custom(derive) => (4, derive as usize),
        }
    }
}
