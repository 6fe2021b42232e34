use crate::modules::formatter::MessageSummary;
use std::collections::BTreeMap;

#[derive(serde::Serialize, Debug, Clone, PartialEq, Eq)]
pub struct DiffItem {
    pub field: String,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffKind {
    Added,
    Removed,
    Changed,
}

impl DiffItem {
    pub fn kind(&self) -> DiffKind {
        match (&self.old_value, &self.new_value) {
            (None, Some(_)) => DiffKind::Added,
            (Some(_), None) => DiffKind::Removed,
            _ => DiffKind::Changed,
        }
    }
}

pub fn diff_fields(original: &MessageSummary, simulated: &MessageSummary) -> Vec<DiffItem> {
    diff_formatted(&original.formatted_fields, &simulated.formatted_fields)
}

fn diff_formatted(old: &BTreeMap<String, String>, new: &BTreeMap<String, String>) -> Vec<DiffItem> {
    let mut keys: Vec<&String> = old.keys().chain(new.keys()).collect();
    keys.sort_unstable();
    keys.dedup();

    keys.into_iter()
        .filter_map(|field| {
            let o = old.get(field);
            let n = new.get(field);
            if o == n {
                return None;
            }
            Some(DiffItem {
                field: field.clone(),
                old_value: o.cloned(),
                new_value: n.cloned(),
            })
        })
        .collect()
}
