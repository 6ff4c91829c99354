//! Body types and hit locations.
//!
//! Locations may carry a sub-table (a humanoid's face, or the eye inside it).
//! Only top-level locations count as "all" for DR purposes.

use crate::fxp::Fxp;

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(default))]
pub struct HitLocation {
    pub id: String,
    pub choice_name: String,
    pub table_name: String,
    /// Number of 3d6 results that land here.
    pub slots: i64,
    pub hit_penalty: i64,
    /// Natural DR of the location.
    pub dr_bonus: Fxp,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "String::is_empty"))]
    pub description: String,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub sub_table: Option<BodyType>,
}

impl HitLocation {
    pub fn new(id: &str, name: &str, slots: i64, hit_penalty: i64) -> Self {
        Self {
            id: id.to_string(),
            choice_name: name.to_string(),
            table_name: name.to_string(),
            slots,
            hit_penalty,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_dr(mut self, dr: i64) -> Self {
        self.dr_bonus = Fxp::from_int(dr);
        self
    }

    #[must_use]
    pub fn with_sub_table(mut self, table: BodyType) -> Self {
        self.sub_table = Some(table);
        self
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(default))]
pub struct BodyType {
    pub name: String,
    pub roll: String,
    pub locations: Vec<HitLocation>,
}

impl BodyType {
    pub fn humanoid() -> Self {
        let face = Self {
            name: "Face".into(),
            roll: "1d".into(),
            locations: vec![
                HitLocation::new("jaw", "Jaw", 1, -6),
                HitLocation::new("nose", "Nose", 1, -7),
                HitLocation::new("ear", "Ear", 1, -7),
                HitLocation::new("cheek", "Cheek", 3, -6),
            ],
        };
        Self {
            name: "Humanoid".into(),
            roll: "3d".into(),
            locations: vec![
                HitLocation::new("eye", "Eye", 0, -9),
                HitLocation::new("skull", "Skull", 2, -7).with_dr(2),
                HitLocation::new("face", "Face", 1, -5).with_sub_table(face),
                HitLocation::new("leg", "Leg", 2, -2),
                HitLocation::new("arm", "Arm", 2, -2),
                HitLocation::new("torso", "Torso", 2, 0),
                HitLocation::new("groin", "Groin", 1, -3),
                HitLocation::new("hand", "Hand", 1, -4),
                HitLocation::new("foot", "Foot", 1, -4),
                HitLocation::new("neck", "Neck", 2, -5),
                HitLocation::new("vitals", "Vitals", 0, -3),
            ],
        }
    }

    /// Finds `id` anywhere in the table. Returns the chain of locations from
    /// the top level down to the match.
    pub fn lookup(&self, id: &str) -> Option<Vec<&HitLocation>> {
        for location in &self.locations {
            if location.id.eq_ignore_ascii_case(id) {
                return Some(vec![location]);
            }
            if let Some(mut chain) = location.sub_table.as_ref().and_then(|t| t.lookup(id)) {
                chain.insert(0, location);
                return Some(chain);
            }
        }
        None
    }

    /// Every location id, top level first, sub-tables after their owner.
    pub fn location_ids(&self) -> Vec<&str> {
        let mut out = Vec::new();
        for location in &self.locations {
            out.push(location.id.as_str());
            if let Some(table) = &location.sub_table {
                out.extend(table.location_ids());
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_returns_owning_chain() {
        let body = BodyType::humanoid();
        let chain = body.lookup("nose").unwrap();
        let ids: Vec<&str> = chain.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["face", "nose"]);
        assert_eq!(body.lookup("Skull").map(|c| c.len()), Some(1));
        assert!(body.lookup("tail").is_none());
    }

    #[test]
    fn location_ids_include_sub_tables() {
        let body = BodyType::humanoid();
        let ids = body.location_ids();
        let face = ids.iter().position(|id| *id == "face").unwrap();
        assert_eq!(ids[face + 1], "jaw");
        assert!(ids.contains(&"vitals"));
    }
}
