//! Plain-text rendering of a computed sheet.

use std::fmt::Write;

use character_core::tree::{Visit, traverse};
use character_core::{Encumbrance, Entity};

/// Renders the summary printed by `sheet show`.
pub fn summary(entity: &Entity, ancestry: Option<&str>) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail.
    let _ = write_summary(&mut out, entity, ancestry);
    out
}

fn write_summary(out: &mut String, entity: &Entity, ancestry: Option<&str>) -> std::fmt::Result {
    let name = if entity.profile.name.is_empty() { "(unnamed)" } else { entity.profile.name.as_str() };
    writeln!(out, "{name}")?;
    if let Some(ancestry) = ancestry {
        writeln!(out, "Ancestry: {ancestry}")?;
    }
    writeln!(
        out,
        "Points: {} total, {} spent, {} unspent",
        entity.total_points,
        entity.spent_points(),
        entity.unspent_points()
    )?;

    writeln!(out, "\nAttributes")?;
    for def in entity.settings.attributes.iter() {
        let current = entity.attribute_current(&def.id);
        if def.is_pool() {
            writeln!(out, "  {:<12} {}/{}", def.name, current, entity.attribute_maximum(&def.id))?;
        } else {
            writeln!(out, "  {:<12} {}", def.name, current)?;
        }
    }

    let unit = entity.settings.default_weight_unit;
    let encumbrance = entity.encumbrance_level(false);
    writeln!(out, "\nDerived")?;
    writeln!(out, "  Basic Lift   {}", entity.basic_lift().format(unit))?;
    writeln!(out, "  Damage       thr {} / sw {}", entity.thrust(), entity.swing())?;
    writeln!(out, "  Carried      {} ({})", entity.weight_carried(false).format(unit), encumbrance)?;
    writeln!(out, "  Move         {}", entity.move_for(encumbrance))?;
    writeln!(out, "  Dodge        {}", entity.dodge(encumbrance))?;
    if encumbrance != Encumbrance::None {
        writeln!(out, "  Unencumbered move {} / dodge {}", entity.basic_move(), entity.dodge(Encumbrance::None))?;
    }

    let mut skills = Vec::new();
    traverse(Visit::EXCLUDE_CONTAINERS, &entity.skills, |node| {
        let s = &node.data;
        let relative = if node.data.technique_default.is_some() {
            s.level.relative_level.string_with_sign()
        } else {
            format!(
                "{}{}",
                entity.attribute_name(&s.difficulty.attribute),
                s.level.relative_level.string_with_sign()
            )
        };
        skills.push((s.display_name(), s.level.clone(), relative));
        false
    });
    if !skills.is_empty() {
        writeln!(out, "\nSkills")?;
        for (name, level, relative) in skills {
            if level.is_known() {
                writeln!(out, "  {name:<24} {:>3}  {relative}", level.level)?;
            } else {
                writeln!(out, "  {name:<24}   -")?;
            }
        }
    }

    let mut spells = Vec::new();
    traverse(Visit::EXCLUDE_CONTAINERS, &entity.spells, |node| {
        spells.push((node.data.name.clone(), node.data.level.clone()));
        false
    });
    if !spells.is_empty() {
        writeln!(out, "\nSpells")?;
        for (name, level) in spells {
            if level.is_known() {
                writeln!(out, "  {name:<24} {:>3}", level.level)?;
            } else {
                writeln!(out, "  {name:<24}   -")?;
            }
        }
    }

    let reactions = entity.reactions();
    if !reactions.is_empty() {
        writeln!(out, "\nReactions")?;
        for reaction in reactions {
            writeln!(out, "  {:>3} {}", reaction.total().string_with_sign(), reaction.from)?;
        }
    }
    let conditional = entity.conditional_modifiers();
    if !conditional.is_empty() {
        writeln!(out, "\nConditional Modifiers")?;
        for modifier in conditional {
            writeln!(out, "  {:>3} {}", modifier.total().string_with_sign(), modifier.from)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use character_core::skill::AttributeDifficulty;
    use character_core::{Difficulty, Fxp, Node, Skill, TidKind};

    #[test]
    fn summary_lists_attributes_and_skills() {
        let mut entity = Entity::default();
        entity.profile.name = "Ada".into();
        entity.skills.push(Node::new(
            TidKind::Skill,
            Skill::new("Climbing", AttributeDifficulty::new("dx", Difficulty::Average), Fxp::TWO),
        ));
        entity.recalculate();

        let text = summary(&entity, Some("Human"));
        assert!(text.starts_with("Ada\nAncestry: Human\n"));
        assert!(text.contains("Points: 150 total, 2 spent, 148 unspent"));
        assert!(text.contains("thr 1d-2 / sw 1d"));
        assert!(text.contains("Climbing"));
        assert!(text.contains("DX+0"));
        assert!(!text.contains("Reactions"));
    }
}
