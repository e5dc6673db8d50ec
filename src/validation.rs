#[derive(Debug, Clone, PartialEq)]
pub struct ValidationFailure {
    pub field: &'static str,
    pub message: &'static str,
}

impl ValidationFailure {
    pub fn new(field: &'static str, message: &'static str) -> Self {
        ValidationFailure { field, message }
    }
}

pub fn list_errors(failures: &[ValidationFailure]) -> Vec<String> {
    failures
        .iter()
        .map(|failure| format!("Property: {}, Error: {}", failure.field, failure.message))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_field_and_message_pairs() {
        let failures = vec![
            ValidationFailure::new("title", "The movie title is required."),
            ValidationFailure::new("duration", "The duration must be between 70 and 600 minutes."),
        ];

        let errors = list_errors(&failures);
        assert_eq!(
            errors,
            vec![
                "Property: title, Error: The movie title is required.",
                "Property: duration, Error: The duration must be between 70 and 600 minutes.",
            ]
        );
    }

    #[test]
    fn no_failures_means_no_errors() {
        assert!(list_errors(&[]).is_empty());
    }
}
