use serde_json::Value;

use crate::domain::consultations::status::ConsultationStatus;

/// Section field names in wizard-step order.
pub const SECTION_FIELDS: [&str; 4] = [
    "contact_info",
    "business_context",
    "pain_points",
    "goals_objectives",
];

/// The four independently-editable JSON sections of an intake record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SectionSet {
    pub contact_info: Option<Value>,
    pub business_context: Option<Value>,
    pub pain_points: Option<Value>,
    pub goals_objectives: Option<Value>,
}

impl SectionSet {
    pub fn new(
        contact_info: Option<Value>,
        business_context: Option<Value>,
        pain_points: Option<Value>,
        goals_objectives: Option<Value>,
    ) -> Self {
        Self {
            contact_info,
            business_context,
            pain_points,
            goals_objectives,
        }
    }

    /// (name, value) pairs in `SECTION_FIELDS` order.
    pub fn fields(&self) -> [(&'static str, Option<&Value>); 4] {
        [
            (SECTION_FIELDS[0], self.contact_info.as_ref()),
            (SECTION_FIELDS[1], self.business_context.as_ref()),
            (SECTION_FIELDS[2], self.pain_points.as_ref()),
            (SECTION_FIELDS[3], self.goals_objectives.as_ref()),
        ]
    }

    pub fn filled_count(&self) -> usize {
        self.fields()
            .iter()
            .filter(|(_, v)| !section_is_empty(*v))
            .count()
    }

    /// Non-empty sections scaled to 0-100 in steps of 25.
    pub fn completion_percentage(&self) -> i32 {
        (self.filled_count() as i32) * 25
    }
}

/// A section counts as empty when absent, JSON null, `{}`, `[]`, or a blank string.
pub fn section_is_empty(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::Object(m)) => m.is_empty(),
        Some(Value::Array(a)) => a.is_empty(),
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(_) => false,
    }
}

/// Field names whose value differs between the two states. Comparison is plain
/// string inequality over the serialized section values plus the status; there is
/// no structural diff.
pub fn changed_fields(
    old: &SectionSet,
    old_status: ConsultationStatus,
    new: &SectionSet,
    new_status: ConsultationStatus,
) -> Vec<String> {
    let mut changed = Vec::new();
    for ((name, before), (_, after)) in old.fields().iter().zip(new.fields().iter()) {
        if serialize(*before) != serialize(*after) {
            changed.push((*name).to_string());
        }
    }
    if old_status != new_status {
        changed.push("status".to_string());
    }
    changed
}

fn serialize(value: Option<&Value>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => "null".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn filled(n: usize) -> SectionSet {
        let values: Vec<Option<Value>> = (0..4)
            .map(|i| {
                if i < n {
                    Some(json!({"k": i}))
                } else {
                    None
                }
            })
            .collect();
        SectionSet::new(
            values[0].clone(),
            values[1].clone(),
            values[2].clone(),
            values[3].clone(),
        )
    }

    #[test]
    fn completion_steps_by_25() {
        for n in 0..=4 {
            assert_eq!(filled(n).completion_percentage(), (n as i32) * 25);
        }
    }

    #[test]
    fn blank_values_do_not_count() {
        let sections = SectionSet::new(
            Some(json!({})),
            Some(json!([])),
            Some(json!("   ")),
            Some(Value::Null),
        );
        assert_eq!(sections.completion_percentage(), 0);
    }

    #[test]
    fn scalar_and_filled_object_count() {
        assert!(!section_is_empty(Some(&json!({"name": "Acme"}))));
        assert!(!section_is_empty(Some(&json!(42))));
        assert!(!section_is_empty(Some(&json!(false))));
    }

    #[test]
    fn diff_names_changed_sections() {
        let old = SectionSet::new(Some(json!({"name": "Acme"})), None, None, None);
        let new = SectionSet::new(
            Some(json!({"name": "Acme Corp"})),
            Some(json!({"industry": "retail"})),
            None,
            None,
        );
        let changed = changed_fields(
            &old,
            ConsultationStatus::Draft,
            &new,
            ConsultationStatus::Draft,
        );
        assert_eq!(changed, vec!["contact_info", "business_context"]);
    }

    #[test]
    fn diff_includes_status() {
        let sections = filled(2);
        let changed = changed_fields(
            &sections,
            ConsultationStatus::Draft,
            &sections,
            ConsultationStatus::Completed,
        );
        assert_eq!(changed, vec!["status"]);
    }

    #[test]
    fn key_order_is_not_a_change() {
        // serde_json preserves insertion order, so reordered keys serialize
        // differently and *do* count as a change; identical order does not.
        let a = SectionSet::new(Some(json!({"a": 1, "b": 2})), None, None, None);
        let b = SectionSet::new(Some(json!({"a": 1, "b": 2})), None, None, None);
        let changed = changed_fields(
            &a,
            ConsultationStatus::Draft,
            &b,
            ConsultationStatus::Draft,
        );
        assert!(changed.is_empty());
    }
}
