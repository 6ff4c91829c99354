//! Whole-engine behaviour that must hold for any character.

use character_core::feature::{
    AttributeBonus, ContainedWeightReduction, NumericCriteria, SkillBonus, StrengthLimitation, StringCriteria,
};
use character_core::prereq::AttributePrereq;
use character_core::skill::AttributeDifficulty;
use character_core::traits::PointPolicy;
use character_core::traits::points::trait_points;
use character_core::tree::collect_ids;
use character_core::{
    BonusCore, DamageProgression, Difficulty, Entity, Equipment, Feature, Fxp, MAX_RECALC_ITERATIONS, Node,
    Prereq, Skill, SkillDefault, TidKind, Trait, TraitContainerType, Visit, Weight, WeightUnit,
};
use character_core::equipment::extended_weight;
use strum::IntoEnumIterator;

fn skill(name: &str, attribute: &str, difficulty: Difficulty, points: i64) -> Node<Skill> {
    Node::new(
        TidKind::Skill,
        Skill::new(name, AttributeDifficulty::new(attribute, difficulty), Fxp::from_int(points)),
    )
}

fn levels(entity: &Entity) -> Vec<Fxp> {
    entity.skills.iter().map(|n| n.data.level.level).collect()
}

#[test]
fn attribute_bonus_applies_and_reverts() {
    let mut entity = Entity::default();
    entity.traits.push(Node::new(
        TidKind::Trait,
        Trait::new("Strong", Fxp::from_int(20)).with_features(vec![Feature::AttributeBonus(
            AttributeBonus::new("st", BonusCore::new(Fxp::TWO)),
        )]),
    ));
    entity.recalculate();
    assert_eq!(entity.attribute_current("st"), Fxp::from_int(12));
    // HP follows ST.
    assert_eq!(entity.attribute_maximum("hp"), Fxp::from_int(12));

    entity.traits.clear();
    entity.recalculate();
    assert_eq!(entity.attribute_current("st"), Fxp::TEN);
}

#[test]
fn per_level_bonus_scales_with_trait_levels() {
    let mut entity = Entity::default();
    entity.traits.push(Node::new(
        TidKind::Trait,
        Trait::leveled("Lifting Power", Fxp::THREE, Fxp::THREE).with_features(vec![Feature::AttributeBonus(
            AttributeBonus::new("st", BonusCore::per_level(Fxp::ONE)),
        )]),
    ));
    entity.recalculate();
    assert_eq!(entity.attribute_current("st"), Fxp::from_int(13));
}

#[test]
fn limited_strength_bonus_leaves_the_attribute_alone() {
    let mut entity = Entity::default();
    entity.traits.push(Node::new(
        TidKind::Trait,
        Trait::leveled("Striking ST", Fxp::FIVE, Fxp::THREE).with_features(vec![Feature::AttributeBonus(
            AttributeBonus::new("st", BonusCore::per_level(Fxp::ONE))
                .with_limitation(StrengthLimitation::StrikingOnly),
        )]),
    ));
    entity.recalculate();
    assert_eq!(entity.attribute_current("st"), Fxp::TEN);
    assert_eq!(entity.striking_strength(), Fxp::from_int(13));
    assert_eq!(entity.lifting_strength(), Fxp::TEN);
}

#[test]
fn basic_lift_never_decreases_with_strength() {
    for progression in DamageProgression::iter() {
        let mut previous = Weight::ZERO;
        for st in 1..=100 {
            let lift = progression.basic_lift(Fxp::from_int(st));
            assert!(lift >= previous, "{progression} at ST {st}: {lift:?} < {previous:?}");
            previous = lift;
        }
    }
}

#[test]
fn recalculating_twice_changes_nothing() {
    let mut entity = Entity::default();
    entity.skills = vec![
        skill("Acrobatics", "dx", Difficulty::Hard, 1),
        skill("Climbing", "dx", Difficulty::Average, 2),
        skill("Physics", "iq", Difficulty::VeryHard, 8),
        skill("Running", "ht", Difficulty::Average, 24),
        skill("Brawling", "dx", Difficulty::Easy, 0),
    ];
    let first = entity.recalculate();
    let after_first = levels(&entity);
    let second = entity.recalculate();
    assert!(first.converged && second.converged);
    assert_eq!(levels(&entity), after_first);
    assert_eq!(entity.skills[1].data.level.level, Fxp::TEN);
}

#[test]
fn mutually_defaulting_skills_settle() {
    let mut entity = Entity::default();
    let mut a = skill("Broadsword", "dx", Difficulty::Average, 1);
    a.data = a.data.with_defaults(vec![SkillDefault::skill("Shortsword", "", Fxp::from_int(-2))]);
    let mut b = skill("Shortsword", "dx", Difficulty::Average, 0);
    b.data = b.data.with_defaults(vec![SkillDefault::skill("Broadsword", "", Fxp::from_int(-2))]);
    entity.skills = vec![a, b];

    let outcome = entity.recalculate();
    assert!(outcome.converged);
    assert!(outcome.iterations <= MAX_RECALC_ITERATIONS);
    // DX 10, Average with 1 point.
    assert_eq!(entity.skills[0].data.level.level, Fxp::from_int(9));
    // Broadsword 9, less 2.
    assert_eq!(entity.skills[1].data.level.level, Fxp::from_int(7));
}

#[test]
fn skill_defaulting_to_itself_ignores_that_default() {
    let mut entity = Entity::default();
    let mut judo = skill("Judo", "dx", Difficulty::Hard, 2);
    judo.data = judo.data.with_defaults(vec![SkillDefault::skill("Judo", "", Fxp::ZERO)]);
    entity.skills = vec![judo];

    let outcome = entity.recalculate();
    assert!(outcome.converged);
    // Hard with 2 points is DX-1.
    assert_eq!(entity.skills[0].data.level.level, Fxp::from_int(9));
    assert!(entity.skills[0].data.defaulted_from.is_none());
}

#[test]
fn self_feeding_bonus_stops_at_the_iteration_limit() {
    let mut entity = Entity::default();
    // Every DX gained raises the skill, which raises DX again.
    let mut feedback = skill("Feedback", "dx", Difficulty::Average, 1);
    feedback.data.features = vec![Feature::AttributeBonus(AttributeBonus::new(
        "dx",
        BonusCore::per_level(Fxp::ONE),
    ))];
    entity.skills = vec![feedback];

    let outcome = entity.recalculate();
    assert!(!outcome.converged);
    assert_eq!(outcome.iterations, MAX_RECALC_ITERATIONS);
}

#[test]
fn prerequisites_see_attribute_bonuses_from_the_same_pass() {
    let mut entity = Entity::default();
    entity.skills = vec![skill("Observation", "per", Difficulty::Average, 0)];
    entity.traits.push(Node::new(
        TidKind::Trait,
        Trait::new("Smart", Fxp::from_int(40)).with_features(vec![Feature::AttributeBonus(AttributeBonus::new(
            "iq",
            BonusCore::new(Fxp::TWO),
        ))]),
    ));
    let mut keen = Trait::new("Keen", Fxp::FIVE);
    keen.prereq = Some(Prereq::Attribute(AttributePrereq {
        which: "per".to_string(),
        qualifier: NumericCriteria::at_least(Fxp::from_int(12)),
        ..AttributePrereq::default()
    }));
    entity.traits.push(Node::new(TidKind::Trait, keen));

    let outcome = entity.recalculate();
    assert!(outcome.converged);
    // Per is based on IQ.
    assert_eq!(entity.attribute_current("per"), Fxp::from_int(12));
    assert_eq!(entity.traits[1].data.unsatisfied_reason, "");
}

#[test]
fn default_penalty_removal_uses_the_defaulting_skills_tags() {
    let mut entity = Entity::default();
    let mut bonus = SkillBonus::for_skill("Broadsword", "", BonusCore::new(Fxp::THREE));
    bonus.tags = StringCriteria::is("Melee");
    entity.traits.push(Node::new(
        TidKind::Trait,
        Trait::new("Sword Training", Fxp::FIVE).with_features(vec![Feature::SkillBonus(bonus)]),
    ));
    let mut broadsword = skill("Broadsword", "dx", Difficulty::Average, 1);
    broadsword.data.tags = vec!["Melee".to_string()];
    let mut shortsword = skill("Shortsword", "dx", Difficulty::Average, 0);
    shortsword.data = shortsword
        .data
        .with_defaults(vec![SkillDefault::skill("Broadsword", "", Fxp::from_int(-2))]);
    entity.skills = vec![broadsword, shortsword];

    let outcome = entity.recalculate();
    assert!(outcome.converged);
    // 9 plus the tagged bonus.
    assert_eq!(entity.skills[0].data.level.level, Fxp::from_int(12));
    // The untagged Shortsword never had the bonus, so nothing is taken back.
    assert_eq!(entity.skills[1].data.level.level, Fxp::TEN);
}

#[test]
fn alternative_abilities_charge_a_fifth_for_the_rest() {
    let container = |round_down: bool| {
        let mut data = Trait::container("Powers", TraitContainerType::AlternativeAbilities);
        data.round_cost_down = round_down;
        Node::new(TidKind::TraitContainer, data).with_children(vec![
            Node::new(TidKind::Trait, Trait::new("Blast", Fxp::TEN)),
            Node::new(TidKind::Trait, Trait::new("Beam", Fxp::SIX)),
            Node::new(TidKind::Trait, Trait::new("Bolt", Fxp::FOUR)),
        ])
    };
    // 10 + ceil(1.2) + ceil(0.8)
    assert_eq!(trait_points(&container(false), &[], PointPolicy::Additive), Fxp::from_int(13));
    // 10 + floor(1.2) + floor(0.8)
    assert_eq!(trait_points(&container(true), &[], PointPolicy::Additive), Fxp::from_int(11));
}

#[cfg(feature = "serde")]
#[test]
fn hash_ignores_timestamps_and_derived_state() {
    use character_core::SourceHash;

    let mut entity = Entity::default();
    entity.skills.push(skill("Climbing", "dx", Difficulty::Average, 2));
    let before = entity.source_hash();

    entity.touch();
    entity.recalculate();
    assert_eq!(entity.source_hash(), before);

    entity.skills[0].data.points = Fxp::FOUR;
    assert_ne!(entity.source_hash(), before);
}

#[test]
fn half_weight_container_halves_its_contents() {
    let mut sack = Equipment::new("Bag of Holding", Fxp::ZERO, Weight::pounds(10));
    sack.features = vec![Feature::ContainedWeightReduction(ContainedWeightReduction::new("50%"))];
    let node = Node::new(TidKind::EquipmentContainer, sack).with_children(vec![Node::new(
        TidKind::Equipment,
        Equipment::new("Rocks", Fxp::ZERO, Weight::pounds(20)),
    )]);
    assert_eq!(extended_weight(&node, false, WeightUnit::Pound), Weight::pounds(20));
}

#[test]
fn traversal_filters_disabled_subtrees_and_containers() {
    let mut hidden = Trait::container("Hidden", TraitContainerType::Group);
    hidden.disabled = true;
    let mut forest = vec![
        Node::new(TidKind::TraitContainer, Trait::container("Outer", TraitContainerType::Group)).with_children(vec![
            Node::new(TidKind::Trait, Trait::new("A", Fxp::ONE)),
            Node::new(TidKind::TraitContainer, hidden)
                .with_children(vec![Node::new(TidKind::Trait, Trait::new("B", Fxp::ONE))]),
        ]),
        Node::new(TidKind::Trait, Trait::new("C", Fxp::ONE)),
    ];
    character_core::tree::relink(&mut forest);

    let names = |flags: Visit| -> Vec<String> {
        let ids = collect_ids(flags, &forest);
        ids.iter()
            .filter_map(|id| character_core::tree::find(&forest, id))
            .map(|n| n.data.name.clone())
            .collect()
    };
    assert_eq!(names(Visit::empty()), ["Outer", "A", "Hidden", "B", "C"]);
    assert_eq!(names(Visit::ONLY_ENABLED), ["Outer", "A", "C"]);
    assert_eq!(names(Visit::EXCLUDE_CONTAINERS), ["A", "B", "C"]);
    assert_eq!(names(Visit::ENABLED_LEAVES), ["A", "C"]);
}
