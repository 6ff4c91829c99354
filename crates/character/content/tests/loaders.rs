use std::fs;

use character_content::{AncestryLoader, ContentFactory, EntityLoader, SettingsLoader, TemplateLoader};
use character_core::skill::AttributeDifficulty;
use character_core::{
    CURRENT_VERSION, DamageProgression, Difficulty, Entity, Fxp, Node, Skill, Template, TidKind, Trait, WeightUnit,
};
use tempfile::TempDir;

fn climber() -> Entity {
    let mut entity = Entity::default();
    entity.profile.name = "Ada".into();
    entity.traits.push(Node::new(TidKind::Trait, Trait::new("Fit", Fxp::FIVE)));
    entity.skills.push(Node::new(
        TidKind::Skill,
        Skill::new("Climbing", AttributeDifficulty::new("dx", Difficulty::Average), Fxp::TWO),
    ));
    entity
}

#[test]
fn saved_sheet_loads_recalculated() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("ada.json");
    let entity = climber();
    EntityLoader::save(&path, &entity).unwrap();

    let loaded = EntityLoader::load(&path).unwrap();
    assert_eq!(loaded.id, entity.id);
    assert_eq!(loaded.profile.name, "Ada");
    assert_eq!(loaded.version, CURRENT_VERSION);
    assert_eq!(loaded.skills[0].data.level.level, Fxp::TEN);
    assert_eq!(loaded.traits[0].parent_id(), None);
    assert_eq!(loaded.points_record.len(), 1);
}

#[test]
fn unsupported_versions_are_rejected() {
    let json = EntityLoader::to_json(&climber()).unwrap();
    let mut value: serde_json::Value = serde_json::from_str(&json).unwrap();

    value["version"] = 1.into();
    let err = EntityLoader::from_json(&value.to_string()).unwrap_err();
    assert!(err.to_string().contains("too old"), "{err}");

    value["version"] = (CURRENT_VERSION + 1).into();
    let err = EntityLoader::from_json(&value.to_string()).unwrap_err();
    assert!(err.to_string().contains("newer"), "{err}");

    value.as_object_mut().unwrap().remove("version");
    assert!(EntityLoader::from_json(&value.to_string()).is_err());
}

#[test]
fn missing_file_names_the_path() {
    let dir = TempDir::new().unwrap();
    let err = EntityLoader::load(&dir.path().join("nobody.json")).unwrap_err();
    assert!(err.to_string().contains("nobody.json"));
}

#[test]
fn settings_fill_in_defaults() {
    let settings = SettingsLoader::from_toml(
        r#"
        [general]
        initial_points = 250

        [sheet]
        damage_progression = "knowing_your_own_strength"
        default_weight_unit = "kg"
        use_half_stat_defaults = true
        "#,
    )
    .unwrap();
    assert_eq!(settings.general.initial_points, Fxp::from_int(250));
    assert_eq!(settings.general.default_ancestry, "Human");
    assert_eq!(settings.sheet.damage_progression, DamageProgression::KnowingYourOwnStrength);
    assert_eq!(settings.sheet.default_weight_unit, WeightUnit::Kilogram);
    assert!(settings.sheet.use_half_stat_defaults);
    assert!(settings.sheet.attributes.get("st").is_some());

    assert!(SettingsLoader::from_toml("[sheet]\ndamage_progression = \"bogus\"").is_err());
}

#[test]
fn ancestry_files_merge_in_name_order() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("a_standard.ron"),
        r#"[(name: "Human"), (name: "Elf", common_options: (hair: [(weight: 1, value: "Black")]))]"#,
    )
    .unwrap();
    fs::write(
        dir.path().join("b_override.ron"),
        r#"[(name: "Elf", common_options: (hair: [(weight: 3, value: "Silver")]))]"#,
    )
    .unwrap();
    fs::write(dir.path().join("notes.txt"), "not an ancestry").unwrap();

    let library = AncestryLoader::load_dir(dir.path()).unwrap();
    assert_eq!(library.0.len(), 2);
    let elf = library.lookup("elf", "Human").unwrap();
    assert_eq!(elf.common_options.hair[0].value, "Silver");
    assert_eq!(library.lookup("Dwarf", "Human").unwrap().name, "Human");
}

#[test]
fn factory_builds_characters_and_applies_templates() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("settings.toml"), "[general]\ninitial_points = 100\n").unwrap();
    fs::create_dir(dir.path().join("templates")).unwrap();

    let mut template = Template::new();
    template.skills.push(Node::new(
        TidKind::Skill,
        Skill::new("Stealth", AttributeDifficulty::new("dx", Difficulty::Average), Fxp::FOUR),
    ));
    fs::write(
        dir.path().join("templates").join("scout.json"),
        serde_json::to_string(&template).unwrap(),
    )
    .unwrap();

    let factory = ContentFactory::new(dir.path());
    assert!(factory.load_ancestries().unwrap().0.is_empty());

    let mut entity = factory.new_entity().unwrap();
    assert_eq!(entity.total_points, Fxp::from_int(100));

    let scout = factory.load_template("scout").unwrap();
    let outcome = scout.apply_to(&mut entity);
    assert!(outcome.converged);
    // DX 10, Average with 4 points is DX+1.
    assert_eq!(entity.skills[0].data.level.level, Fxp::from_int(11));
    assert_eq!(entity.skill_points(), Fxp::FOUR);

    assert!(TemplateLoader::load(&dir.path().join("templates").join("missing.json")).is_err());
}
