//! DDL and catalog statements issued during bootstrap.
//!
//! Names go through bind parameters where the server allows it and through
//! `Identifier::quoted` where it does not.

use super::identifier::Identifier;

/// Parameterized existence check against the system catalog
pub const DATABASE_EXISTS_QUERY: &str = "SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)";

#[must_use]
pub fn create_database(name: &Identifier) -> String {
    format!("CREATE DATABASE {}", name.quoted())
}

#[must_use]
pub fn create_extension(name: &Identifier) -> String {
    format!("CREATE EXTENSION IF NOT EXISTS {}", name.quoted())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_extension_statement() {
        let name = Identifier::new("uuid-ossp").unwrap();
        assert_eq!(
            create_extension(&name),
            r#"CREATE EXTENSION IF NOT EXISTS "uuid-ossp""#
        );
    }

    #[test]
    fn test_existence_check_binds_name() {
        assert!(DATABASE_EXISTS_QUERY.contains("$1"));
    }
}
