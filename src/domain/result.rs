//! Result type alias for unl2csv

use super::errors::MigrationError;

/// Result type alias for unl2csv operations
///
/// # Examples
///
/// ```
/// use unl2csv::domain::result::Result;
/// use unl2csv::domain::errors::MigrationError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(MigrationError::ManifestFormat("no database".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, MigrationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_with_question_mark() -> Result<()> {
        fn inner() -> Result<i32> {
            Ok(42)
        }

        let value = inner()?;
        assert_eq!(value, 42);
        Ok(())
    }

    #[test]
    fn test_result_err() {
        let result: Result<i32> = Err(MigrationError::Io("disk full".to_string()));
        assert!(result.is_err());
    }
}
