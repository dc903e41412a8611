use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SlotValue {
    pub value: String,
}

/// One dialog with the user, as handed to a skill by the host.
///
/// Slots are kept as lists, since the user can name the same slot more than
/// once ("turn on the kitchen and the loft").
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DialogSession {
    pub session_id: String,
    #[serde(default)]
    pub slots: BTreeMap<String, Vec<SlotValue>>,
}

impl DialogSession {
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            slots: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_slot(mut self, name: &str, value: &str) -> Self {
        self.slots.entry(name.to_string()).or_default().push(SlotValue {
            value: value.to_string(),
        });
        self
    }

    #[must_use]
    pub fn slots_as_objects(&self, name: &str) -> &[SlotValue] {
        self.slots.get(name).map_or(&[], Vec::as_slice)
    }

    pub fn slot_values<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a str> + use<'a> {
        self.slots_as_objects(name)
            .iter()
            .map(|slot| slot.value.as_str())
    }

    /// First value of slot `name`, if any
    #[must_use]
    pub fn slot_value(&self, name: &str) -> Option<&str> {
        self.slot_values(name).next()
    }

    #[must_use]
    pub fn has_slot(&self, name: &str) -> bool {
        !self.slots_as_objects(name).is_empty()
    }

    /// Carry over slots from an earlier turn of the same dialog. Slots given
    /// in this turn take precedence.
    pub fn merge_previous(&mut self, previous: &Self) {
        for (name, values) in &previous.slots {
            if !self.has_slot(name) {
                self.slots.insert(name.clone(), values.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::dialog::DialogSession;

    #[test]
    fn slot_accessors() {
        let session = DialogSession::new("s1")
            .with_slot("Location", "Kitchen")
            .with_slot("Location", "Loft");

        assert!(session.has_slot("Location"));
        assert!(!session.has_slot("Scene"));
        assert_eq!(session.slot_value("Location"), Some("Kitchen"));
        assert_eq!(
            session.slot_values("Location").collect::<Vec<_>>(),
            ["Kitchen", "Loft"]
        );
        assert_eq!(session.slot_value("Scene"), None);
    }

    #[test]
    fn merge_keeps_newer_slots() {
        let previous = DialogSession::new("s1")
            .with_slot("Location", "kitchen")
            .with_slot("Percent", "10");
        let mut answer = DialogSession::new("s1").with_slot("Percent", "40");

        answer.merge_previous(&previous);

        assert_eq!(answer.slot_value("Location"), Some("kitchen"));
        assert_eq!(answer.slot_value("Percent"), Some("40"));
    }
}
