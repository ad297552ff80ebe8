use fixchain_core::errors::{ExError, FixchainError};
use fixchain_core::SnapshotLabel;
use fixchain_store::errors::io_error;
use fixchain_store::Result;
use serde::Deserialize;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

/// One snapshot of a chain
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlanStep {
    pub label: SnapshotLabel,
    /// Defaults to the previous step; must be absent on the first step
    #[serde(default)]
    pub parent: Option<SnapshotLabel>,
    /// Script files, relative to the plan file
    #[serde(default)]
    pub scripts: Vec<PathBuf>,
    /// Inline statements, applied after the scripts
    #[serde(default)]
    pub statements: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChainPlan {
    #[serde(rename = "step", default)]
    pub steps: Vec<PlanStep>,
    /// Directory scripts are resolved against
    #[serde(skip)]
    pub base_dir: PathBuf,
}

impl ChainPlan {
    /// Parse and validate a plan document
    ///
    /// # Errors
    ///
    /// - `Serialization` if the TOML does not parse
    /// - `InvalidPlan` if the steps do not form a sequential chain
    pub fn from_toml_str(s: &str, base_dir: impl Into<PathBuf>) -> Result<Self> {
        let mut plan: ChainPlan = toml::from_str(s).map_err(|e| {
            ExError::from(FixchainError::Serialization {
                message: e.to_string(),
            })
            .with_op("parse_chain_plan")
        })?;
        plan.base_dir = base_dir.into();
        plan.validate()?;
        Ok(plan)
    }

    /// Read a plan file; scripts resolve against its directory
    ///
    /// # Errors
    ///
    /// - `Io` if the file cannot be read, plus everything
    ///   [`from_toml_str`](Self::from_toml_str) reports
    pub fn load(path: &Path) -> Result<Self> {
        let text =
            fs::read_to_string(path).map_err(|e| io_error("load_chain_plan", e).with_path(path))?;
        let base = path.parent().map(Path::to_path_buf).unwrap_or_default();
        Self::from_toml_str(&text, base).map_err(|e| e.with_path(path))
    }

    /// # Errors
    ///
    /// `InvalidPlan` unless the plan is non-empty, labels are unique, the
    /// first step has no parent and every later parent is the previous step
    pub fn validate(&self) -> Result<()> {
        let first = self.steps.first().ok_or_else(|| invalid("plan has no steps"))?;
        if let Some(parent) = &first.parent {
            return Err(invalid(format!(
                "first step '{}' cannot have a parent (got '{}')",
                first.label, parent
            )));
        }

        let mut seen = BTreeSet::new();
        for step in &self.steps {
            if !seen.insert(&step.label) {
                return Err(invalid(format!("label '{}' appears twice", step.label)));
            }
        }

        for pair in self.steps.windows(2) {
            let (prev, step) = (&pair[0], &pair[1]);
            match &step.parent {
                Some(parent) if parent != &prev.label => {
                    return Err(invalid(format!(
                        "step '{}' forks from '{}' but the previous step is '{}'",
                        step.label, parent, prev.label
                    )));
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Effective parent of the step at `index`
    pub fn parent_of(&self, index: usize) -> Option<&SnapshotLabel> {
        index
            .checked_sub(1)
            .and_then(|prev| self.steps.get(prev))
            .map(|s| &s.label)
    }

    /// Script path resolved against the plan directory
    pub fn script_path(&self, script: &Path) -> PathBuf {
        self.base_dir.join(script)
    }
}

fn invalid(reason: impl Into<String>) -> ExError {
    ExError::from(FixchainError::InvalidPlan {
        reason: reason.into(),
    })
    .with_op("validate_chain_plan")
}

#[cfg(test)]
mod tests {
    use super::*;
    use fixchain_core::ExErrorKind;

    #[test]
    fn test_parent_defaults_to_previous_step() {
        let plan = ChainPlan::from_toml_str(
            r#"
            [[step]]
            label = "01"
            scripts = ["schema.sql"]

            [[step]]
            label = "02"
            statements = ["UPDATE actors SET full_name = 'X' WHERE id = '34'"]

            [[step]]
            label = "03"
            parent = "02"
            "#,
            "plans",
        )
        .unwrap();

        assert_eq!(plan.steps.len(), 3);
        assert_eq!(plan.parent_of(0), None);
        assert_eq!(plan.parent_of(1).map(|l| l.as_str()), Some("01"));
        assert_eq!(plan.parent_of(2).map(|l| l.as_str()), Some("02"));
        assert_eq!(
            plan.script_path(&plan.steps[0].scripts[0]),
            PathBuf::from("plans").join("schema.sql")
        );
    }

    #[test]
    fn test_rejects_empty_plan() {
        let err = ChainPlan::from_toml_str("", ".").unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::InvalidPlan);
    }

    #[test]
    fn test_rejects_parent_on_first_step() {
        let err = ChainPlan::from_toml_str(
            r#"
            [[step]]
            label = "02"
            parent = "01"
            "#,
            ".",
        )
        .unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::InvalidPlan);
    }

    #[test]
    fn test_rejects_branching() {
        let err = ChainPlan::from_toml_str(
            r#"
            [[step]]
            label = "01"
            [[step]]
            label = "02"
            [[step]]
            label = "03"
            parent = "01"
            "#,
            ".",
        )
        .unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::InvalidPlan);
        assert!(err.message().contains("'03'"));
    }

    #[test]
    fn test_rejects_duplicate_labels() {
        let err = ChainPlan::from_toml_str(
            r#"
            [[step]]
            label = "01"
            [[step]]
            label = "01"
            "#,
            ".",
        )
        .unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::InvalidPlan);
    }

    #[test]
    fn test_bad_label_fails_to_parse() {
        let err = ChainPlan::from_toml_str(
            r#"
            [[step]]
            label = "../escape"
            "#,
            ".",
        )
        .unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::Serialization);
    }
}
