use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Lookup of descriptive names for DICOM data element tags.
pub trait ElementNames {
    /// Return the element name for a hexadecimal tag string, or `None` when
    /// the tag is unknown or unparsable.
    fn for_tag(&self, tag: &str) -> Option<&str>;
}

/// Parse `"00100010"`, `"0010,0010"` or `"(0010,0010)"` into a tag value.
pub fn parse_tag(tag: &str) -> Option<u32> {
    let hex: String = tag
        .trim()
        .trim_start_matches('(')
        .trim_end_matches(')')
        .chars()
        .filter(|c| *c != ',')
        .collect();
    if hex.len() != 8 {
        return None;
    }
    u32::from_str_radix(&hex, 16).ok()
}

/// Canonical upper-case eight digit form of a tag.
pub fn format_tag(tag: u32) -> String {
    format!("{tag:08X}")
}

static STANDARD: Lazy<HashMap<u32, &'static str>> = Lazy::new(|| {
    HashMap::from([
        (0x0000_0000, "Command Group Length"),
        (0x0000_0002, "Affected SOP Class UID"),
        (0x0000_0100, "Command Field"),
        (0x0000_0110, "Message ID"),
        (0x0008_0016, "SOP Class UID"),
        (0x0008_0018, "SOP Instance UID"),
        (0x0008_0020, "Study Date"),
        (0x0008_0030, "Study Time"),
        (0x0008_0050, "Accession Number"),
        (0x0008_0060, "Modality"),
        (0x0008_0090, "Referring Physician's Name"),
        (0x0008_1030, "Study Description"),
        (0x0008_103E, "Series Description"),
        (0x0010_0010, "Patient's Name"),
        (0x0010_0020, "Patient ID"),
        (0x0010_0021, "Issuer of Patient ID"),
        (0x0010_0030, "Patient's Birth Date"),
        (0x0010_0040, "Patient's Sex"),
        (0x0010_1010, "Patient's Age"),
        (0x0010_4000, "Patient Comments"),
        (0x0020_000D, "Study Instance UID"),
        (0x0020_000E, "Series Instance UID"),
        (0x0020_0010, "Study ID"),
        (0x0020_0011, "Series Number"),
        (0x0020_0013, "Instance Number"),
        (0x0032_1060, "Requested Procedure Description"),
        (0x0040_0001, "Scheduled Station AE Title"),
        (0x0040_0002, "Scheduled Procedure Step Start Date"),
        (0x0040_0003, "Scheduled Procedure Step Start Time"),
        (0x0040_0006, "Scheduled Performing Physician's Name"),
        (0x0040_0007, "Scheduled Procedure Step Description"),
        (0x0040_0009, "Scheduled Procedure Step ID"),
        (0x0040_0020, "Scheduled Procedure Step Status"),
        (0x0040_0100, "Scheduled Procedure Step Sequence"),
        (0x0040_1001, "Requested Procedure ID"),
    ])
});

/// Built-in dictionary covering the command, patient, study, series and
/// worklist attributes edited in the console.
#[derive(Debug, Default, Clone, Copy)]
pub struct StandardElements;

impl ElementNames for StandardElements {
    fn for_tag(&self, tag: &str) -> Option<&str> {
        parse_tag(tag).and_then(|t| STANDARD.get(&t).copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_common_notations() {
        assert_eq!(parse_tag("00100010"), Some(0x0010_0010));
        assert_eq!(parse_tag("0010,0010"), Some(0x0010_0010));
        assert_eq!(parse_tag("(0020,000d)"), Some(0x0020_000D));
        assert_eq!(parse_tag("0010"), None);
        assert_eq!(parse_tag("zzzzzzzz"), None);
    }
}
