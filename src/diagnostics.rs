// ABOUTME: Diagnostics accumulator for non-fatal warnings during install.
// ABOUTME: Collects tolerated conflicts that shouldn't fail a run but should be shown.

/// Collects non-fatal warnings during an install run.
#[derive(Debug, Default)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
}

impl Diagnostics {
    /// Record a warning, auto-logging it via tracing.
    pub fn warn(&mut self, warning: Warning) {
        tracing::warn!(kind = ?warning.kind, "{}", warning.message);
        self.warnings.push(warning);
    }

    /// Get all collected warnings.
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Check if any warnings were collected.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// A non-fatal warning collected during an install run.
#[derive(Debug, Clone)]
pub struct Warning {
    pub kind: WarningKind,
    pub message: String,
}

impl Warning {
    /// A resource expected to be absent already existed and was reused.
    pub fn already_exists(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::AlreadyExists,
            message: message.into(),
        }
    }

    /// An invoke permission statement was already present on a function.
    pub fn permission_exists(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::PermissionExists,
            message: message.into(),
        }
    }

    /// A broken function was already gone when we tried to delete it.
    pub fn already_deleted(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::AlreadyDeleted,
            message: message.into(),
        }
    }
}

/// Categories of warnings that can occur during install.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    /// Create call reported the resource already exists.
    AlreadyExists,
    /// Lambda permission statement id already in use.
    PermissionExists,
    /// Delete call reported the resource was not found.
    AlreadyDeleted,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagnostics_starts_empty() {
        let diag = Diagnostics::default();
        assert!(!diag.has_warnings());
        assert!(diag.warnings().is_empty());
    }

    #[test]
    fn diagnostics_collects_warnings() {
        let mut diag = Diagnostics::default();

        diag.warn(Warning::already_exists("role venafi-snowflake-lambda-role"));
        diag.warn(Warning::permission_exists("statement abc-invoke"));

        assert!(diag.has_warnings());
        assert_eq!(diag.warnings().len(), 2);
    }

    #[test]
    fn warning_constructors_set_correct_kind() {
        assert_eq!(Warning::already_exists("x").kind, WarningKind::AlreadyExists);
        assert_eq!(
            Warning::permission_exists("x").kind,
            WarningKind::PermissionExists
        );
        assert_eq!(Warning::already_deleted("x").kind, WarningKind::AlreadyDeleted);
    }
}
