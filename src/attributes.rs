use crate::dicom::{format_tag, parse_tag};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const PATIENT_NAME: &str = "00100010";
pub const PATIENT_ID: &str = "00100020";
pub const STUDY_INSTANCE_UID: &str = "0020000D";
pub const STUDY_DESCRIPTION: &str = "00081030";
pub const SCHEDULED_STEP_ID: &str = "00400009";
pub const SCHEDULED_STATION_AET: &str = "00400001";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AttributeError {
    #[error("Attribute already exists!")]
    AlreadyExists(String),
    #[error("invalid tag '{0}'")]
    InvalidTag(String),
}

/// Data set keyed by normalised tag (eight upper-case hex digits).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Attributes(BTreeMap<String, String>);

fn normalise(tag: &str) -> Result<String, AttributeError> {
    parse_tag(tag)
        .map(format_tag)
        .ok_or_else(|| AttributeError::InvalidTag(tag.to_string()))
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a new attribute, refusing to overwrite an existing one.
    pub fn insert_new(&mut self, tag: &str, value: impl Into<String>) -> Result<(), AttributeError> {
        let key = normalise(tag)?;
        if self.0.contains_key(&key) {
            return Err(AttributeError::AlreadyExists(key));
        }
        self.0.insert(key, value.into());
        Ok(())
    }

    pub fn set(&mut self, tag: &str, value: impl Into<String>) -> Result<(), AttributeError> {
        let key = normalise(tag)?;
        self.0.insert(key, value.into());
        Ok(())
    }

    /// Set one of the tag constants above. They are already normalised,
    /// so unlike [`Attributes::set`] this cannot fail.
    pub fn set_known(&mut self, tag: &'static str, value: impl Into<String>) {
        debug_assert_eq!(normalise(tag).as_deref(), Ok(tag));
        self.0.insert(tag.to_string(), value.into());
    }

    pub fn get(&self, tag: &str) -> Option<&str> {
        let key = normalise(tag).ok()?;
        self.0.get(&key).map(String::as_str)
    }

    pub fn remove(&mut self, tag: &str) -> Option<String> {
        let key = normalise(tag).ok()?;
        self.0.remove(&key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&String, &mut String)> {
        self.0.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Value of `tag` if present and not blank.
    fn non_empty(&self, tag: &str) -> Option<&str> {
        self.get(tag).map(str::trim).filter(|v| !v.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientRecord {
    pub attrs: Attributes,
}

impl PatientRecord {
    pub fn new(id: &str, name: &str) -> Self {
        let mut attrs = Attributes::new();
        attrs.set_known(PATIENT_ID, id);
        attrs.set_known(PATIENT_NAME, name);
        Self { attrs }
    }

    pub fn patient_id(&self) -> Option<&str> {
        self.attrs.non_empty(PATIENT_ID)
    }

    pub fn patient_name(&self) -> Option<&str> {
        self.attrs.non_empty(PATIENT_NAME)
    }
}

/// Modality worklist entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MwlItem {
    pub attrs: Attributes,
}

impl MwlItem {
    pub fn scheduled_step_id(&self) -> Option<&str> {
        self.attrs.non_empty(SCHEDULED_STEP_ID)
    }

    pub fn station_aet(&self) -> Option<&str> {
        self.attrs.non_empty(SCHEDULED_STATION_AET)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudyRecord {
    pub attrs: Attributes,
}

impl StudyRecord {
    pub fn study_instance_uid(&self) -> Option<&str> {
        self.attrs.non_empty(STUDY_INSTANCE_UID)
    }

    pub fn description(&self) -> Option<&str> {
        self.attrs.non_empty(STUDY_DESCRIPTION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_new_rejects_duplicates_in_any_notation() {
        let mut attrs = Attributes::new();
        attrs.insert_new("00100010", "Doe^John").unwrap();
        let err = attrs.insert_new("(0010,0010)", "Other").unwrap_err();
        assert_eq!(err, AttributeError::AlreadyExists("00100010".into()));
        assert_eq!(err.to_string(), "Attribute already exists!");
        assert_eq!(attrs.get("0010,0010"), Some("Doe^John"));
    }

    #[test]
    fn invalid_tag_is_reported() {
        let mut attrs = Attributes::new();
        assert!(matches!(
            attrs.insert_new("patient", "x"),
            Err(AttributeError::InvalidTag(_))
        ));
    }

    #[test]
    fn known_tags_are_normalised() {
        for tag in [
            PATIENT_NAME,
            PATIENT_ID,
            STUDY_INSTANCE_UID,
            STUDY_DESCRIPTION,
            SCHEDULED_STEP_ID,
            SCHEDULED_STATION_AET,
        ] {
            assert_eq!(normalise(tag).unwrap(), tag);
        }
        let mut attrs = Attributes::new();
        attrs.set_known(STUDY_INSTANCE_UID, "1.2.3");
        assert_eq!(attrs.get("(0020,000d)"), Some("1.2.3"));
    }

    #[test]
    fn blank_key_fields_read_as_missing() {
        let patient = PatientRecord::new("  ", "Doe^Jane");
        assert_eq!(patient.patient_id(), None);
        assert_eq!(patient.patient_name(), Some("Doe^Jane"));
    }
}
