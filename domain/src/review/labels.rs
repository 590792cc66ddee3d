//! Anonymous label assignment for peer review.

/// Deterministic `A1`, `A2`, … labels over the candidates of one run.
///
/// Labels are assigned by the order of successful answers and are stable for
/// the lifetime of the run: the peer-review prompts and the chairman
/// synthesis prompt share the same assignment. When anonymization is
/// disabled the label is the role name itself.
#[derive(Debug, Clone)]
pub struct LabelAssignment {
    labels: Vec<(String, String)>,
    anonymized: bool,
}

impl LabelAssignment {
    /// Assign labels to `candidates` (role names in candidate order).
    pub fn assign(candidates: &[String], anonymize: bool) -> Self {
        let labels = candidates
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let label = if anonymize {
                    format!("A{}", i + 1)
                } else {
                    name.clone()
                };
                (name.clone(), label)
            })
            .collect();
        Self {
            labels,
            anonymized: anonymize,
        }
    }

    /// The label shown to judges for a candidate role.
    pub fn label_for(&self, role: &str) -> Option<&str> {
        self.labels
            .iter()
            .find(|(name, _)| name == role)
            .map(|(_, label)| label.as_str())
    }

    pub fn is_anonymized(&self) -> bool {
        self.anonymized
    }

    /// Iterate over `(role name, label)` pairs in candidate order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.labels
            .iter()
            .map(|(name, label)| (name.as_str(), label.as_str()))
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}
