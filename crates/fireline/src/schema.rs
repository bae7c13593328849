//! Per-nature form schemas and payload normalization.
//!
//! Each incident nature declares its mandatory group selector, the complete
//! list of checkbox (flag) fields, and the sub-sections that must exist even
//! when empty. Normalization is driven entirely by the schema, so every
//! declared flag ends up a strict boolean: present in the submitted entries
//! means `true`, absent means `false`, never undefined.

use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::record::Nature;
use crate::tree::{self, ConflictPolicy};

/// Declarative schema for one nature's follow-up form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NatureSchema {
    /// The nature this schema describes.
    pub nature: Nature,
    /// Dotted path of the mandatory radio-style group selector.
    pub group_field: &'static str,
    /// Dotted paths of every checkbox field, coerced to boolean.
    pub flags: &'static [&'static str],
    /// Dotted paths of sub-objects that must exist, even if empty.
    pub sections: &'static [&'static str],
}

/// Schema for fire response forms.
pub const FIRE: NatureSchema = NatureSchema {
    nature: Nature::Fire,
    group_field: "category",
    flags: &[
        "actions.extinguish",
        "actions.rescue",
        "actions.ventilation",
        "actions.salvage",
    ],
    sections: &["actions", "resources"],
};

/// Schema for prevention inspection forms.
pub const PREVENTION: NatureSchema = NatureSchema {
    nature: Nature::Prevention,
    group_field: "inspection_type",
    flags: &[
        "checks.hydrants",
        "checks.extinguishers",
        "checks.alarms",
        "checks.exits",
    ],
    sections: &["checks"],
};

/// Schema for community outreach forms.
pub const COMMUNITY: NatureSchema = NatureSchema {
    nature: Nature::Community,
    group_field: "activity",
    flags: &[
        "outreach.school_visit",
        "outreach.training",
        "outreach.open_house",
        "outreach.station_tour",
    ],
    sections: &["outreach"],
};

/// Schema for management activity forms.
pub const MANAGEMENT: NatureSchema = NatureSchema {
    nature: Nature::Management,
    group_field: "area",
    flags: &[
        "admin.staffing",
        "admin.logistics",
        "admin.maintenance",
        "admin.drills",
    ],
    sections: &["admin"],
};

/// Get the schema for a nature.
#[must_use]
pub fn schema_for(nature: Nature) -> &'static NatureSchema {
    match nature {
        Nature::Fire => &FIRE,
        Nature::Prevention => &PREVENTION,
        Nature::Community => &COMMUNITY,
        Nature::Management => &MANAGEMENT,
    }
}

/// Normalize a built payload tree against a nature schema.
///
/// Requires the group selector to be present and non-empty, coerces every
/// declared flag to a strict boolean, and materializes declared sections as
/// objects.
///
/// # Errors
///
/// Returns [`Error::MissingSelector`] if the group selector was not chosen,
/// or a conflict error if a declared section path is occupied by a leaf under
/// [`ConflictPolicy::Reject`].
pub fn normalize(
    payload: &mut Map<String, Value>,
    schema: &NatureSchema,
    policy: ConflictPolicy,
) -> Result<()> {
    match tree::get_path(payload, schema.group_field) {
        Some(Value::String(choice)) if !choice.trim().is_empty() => {}
        _ => {
            return Err(Error::MissingSelector {
                field: schema.group_field.to_string(),
            })
        }
    }

    for flag in schema.flags {
        // An already-strict boolean is kept as-is, so re-normalizing a
        // payload cannot flip an absent flag back to true.
        let present = match tree::get_path(payload, flag) {
            None => false,
            Some(Value::Bool(checked)) => *checked,
            Some(_) => true,
        };
        // Overwrite whatever the raw form produced with a strict boolean.
        tree::insert_path(
            payload,
            flag,
            Value::Bool(present),
            ConflictPolicy::LastWriteWins,
        )?;
    }

    for section in schema.sections {
        match tree::get_path(payload, section) {
            Some(Value::Object(_)) => {}
            None => {
                tree::insert_path(payload, section, Value::Object(Map::new()), policy)?;
            }
            Some(_) => match policy {
                ConflictPolicy::Reject => return Err(Error::path_conflict(*section)),
                ConflictPolicy::LastWriteWins => {
                    tree::insert_path(
                        payload,
                        section,
                        Value::Object(Map::new()),
                        ConflictPolicy::LastWriteWins,
                    )?;
                }
            },
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{build_tree, get_path};

    fn entries(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_schema_for_covers_all_natures() {
        for nature in Nature::ALL {
            let schema = schema_for(nature);
            assert_eq!(schema.nature, nature);
            assert!(!schema.group_field.is_empty());
            assert!(!schema.flags.is_empty());
        }
    }

    #[test]
    fn test_normalize_requires_group_selector() {
        let mut payload = build_tree(
            &entries(&[("actions.rescue", "on")]),
            ConflictPolicy::Reject,
        )
        .unwrap();

        let err = normalize(&mut payload, &FIRE, ConflictPolicy::Reject).unwrap_err();
        assert!(matches!(err, Error::MissingSelector { ref field } if field == "category"));
    }

    #[test]
    fn test_normalize_rejects_blank_selector() {
        let mut payload = build_tree(&entries(&[("category", "  ")]), ConflictPolicy::Reject)
            .unwrap();

        let err = normalize(&mut payload, &FIRE, ConflictPolicy::Reject).unwrap_err();
        assert!(matches!(err, Error::MissingSelector { .. }));
    }

    #[test]
    fn test_normalize_flags_present_true_absent_false() {
        let mut payload = build_tree(
            &entries(&[("category", "structure"), ("actions.rescue", "on")]),
            ConflictPolicy::Reject,
        )
        .unwrap();

        normalize(&mut payload, &FIRE, ConflictPolicy::Reject).unwrap();

        assert_eq!(get_path(&payload, "actions.rescue"), Some(&Value::Bool(true)));
        assert_eq!(
            get_path(&payload, "actions.extinguish"),
            Some(&Value::Bool(false))
        );
        assert_eq!(
            get_path(&payload, "actions.ventilation"),
            Some(&Value::Bool(false))
        );
        assert_eq!(
            get_path(&payload, "actions.salvage"),
            Some(&Value::Bool(false))
        );
    }

    #[test]
    fn test_normalize_never_leaves_flag_undefined() {
        for nature in Nature::ALL {
            let schema = schema_for(nature);
            let mut payload = build_tree(
                &entries(&[(schema.group_field, "chosen")]),
                ConflictPolicy::Reject,
            )
            .unwrap();

            normalize(&mut payload, schema, ConflictPolicy::Reject).unwrap();

            for flag in schema.flags {
                assert_eq!(
                    get_path(&payload, flag),
                    Some(&Value::Bool(false)),
                    "flag {flag} left undefined for {nature}"
                );
            }
        }
    }

    #[test]
    fn test_normalize_materializes_sections() {
        let mut payload = build_tree(&entries(&[("category", "vehicle")]), ConflictPolicy::Reject)
            .unwrap();

        normalize(&mut payload, &FIRE, ConflictPolicy::Reject).unwrap();

        assert!(matches!(
            get_path(&payload, "resources"),
            Some(Value::Object(_))
        ));
    }

    #[test]
    fn test_normalize_keeps_free_form_leaves() {
        let mut payload = build_tree(
            &entries(&[("category", "vegetation"), ("resources.crew", "5")]),
            ConflictPolicy::Reject,
        )
        .unwrap();

        normalize(&mut payload, &FIRE, ConflictPolicy::Reject).unwrap();

        // not in the flag list, left as the raw form produced it
        assert_eq!(
            get_path(&payload, "resources.crew"),
            Some(&Value::String("5".to_string()))
        );
    }

    #[test]
    fn test_normalize_idempotent() {
        let mut payload = build_tree(
            &entries(&[("category", "structure"), ("actions.rescue", "on")]),
            ConflictPolicy::Reject,
        )
        .unwrap();

        normalize(&mut payload, &FIRE, ConflictPolicy::Reject).unwrap();
        let first = payload.clone();
        normalize(&mut payload, &FIRE, ConflictPolicy::Reject).unwrap();
        assert_eq!(first, payload);
    }

    #[test]
    fn test_normalize_absent_flags_stay_false_on_reapplication() {
        // The Bool(false) written by one pass must not count as "checked" on
        // the next.
        let mut payload = build_tree(
            &entries(&[("category", "structure")]),
            ConflictPolicy::Reject,
        )
        .unwrap();

        normalize(&mut payload, &FIRE, ConflictPolicy::Reject).unwrap();
        assert_eq!(
            get_path(&payload, "actions.rescue"),
            Some(&Value::Bool(false))
        );

        normalize(&mut payload, &FIRE, ConflictPolicy::Reject).unwrap();
        for flag in FIRE.flags {
            assert_eq!(get_path(&payload, flag), Some(&Value::Bool(false)));
        }
    }

    #[test]
    fn test_normalize_repairs_section_occupied_by_leaf() {
        // "checks" arrives as a leaf, but the flag pass rebuilds it into an
        // object when it forces "checks.*" flags to booleans.
        let mut payload = build_tree(
            &entries(&[("inspection_type", "annual"), ("checks", "yes")]),
            ConflictPolicy::Reject,
        )
        .unwrap();

        normalize(&mut payload, &PREVENTION, ConflictPolicy::Reject).unwrap();

        assert!(matches!(
            get_path(&payload, "checks"),
            Some(Value::Object(_))
        ));
        assert_eq!(
            get_path(&payload, "checks.hydrants"),
            Some(&Value::Bool(false))
        );
    }

    #[test]
    fn test_normalize_flag_checked_by_bare_presence() {
        // A checked box may arrive with any raw value, not just "on".
        let mut payload = build_tree(
            &entries(&[("activity", "training"), ("outreach.training", "true")]),
            ConflictPolicy::Reject,
        )
        .unwrap();

        normalize(&mut payload, &COMMUNITY, ConflictPolicy::Reject).unwrap();

        assert_eq!(
            get_path(&payload, "outreach.training"),
            Some(&Value::Bool(true))
        );
    }
}
