use serde::Serialize;

use crate::catalog::{Candidate, RegionCatalog};
use crate::compose::choice::{DISABLED_TOKEN, RANDOM_TOKEN};

pub const GENDERS: &[&str] = &["unisex", "male", "female", "transexual"];
pub const AGES: &[&str] = &[
    "random",
    "infant",
    "young child",
    "older child",
    "teen",
    "young adult",
    "adult",
    "middle aged",
    "elderly",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Choice,
    String,
    Integer,
}

#[derive(Debug, Clone, Serialize)]
pub struct InputField {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: FieldKind,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    pub default: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct OutputField {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: FieldKind,
}

/// Declarative schema one region exposes to the host: the dropdown options
/// and defaults for every input, and the output shape.
#[derive(Debug, Clone, Serialize)]
pub struct NodeSchema {
    pub region: String,
    pub display_name: String,
    pub inputs: Vec<InputField>,
    pub outputs: Vec<OutputField>,
}

fn string_field(name: &str) -> InputField {
    InputField {
        name: name.to_string(),
        kind: FieldKind::String,
        options: Vec::new(),
        default: String::new(),
    }
}

fn fixed_choice_field(name: &str, options: &[&str], default: &str) -> InputField {
    InputField {
        name: name.to_string(),
        kind: FieldKind::Choice,
        options: options.iter().map(|option| option.to_string()).collect(),
        default: default.to_string(),
    }
}

fn catalog_choice_field(
    name: &str,
    category: &str,
    catalog: &RegionCatalog,
    add_disabled: bool,
) -> InputField {
    let mut options = vec![RANDOM_TOKEN.to_string()];
    if add_disabled {
        options.push(DISABLED_TOKEN.to_string());
    }
    options.extend(
        catalog
            .candidates(category)
            .iter()
            .map(|candidate| candidate.name().to_string()),
    );

    InputField {
        name: name.to_string(),
        kind: FieldKind::Choice,
        options,
        default: RANDOM_TOKEN.to_string(),
    }
}

/// Builds the registration schema for one region from its catalog. One
/// parameterized builder serves every region; regions are data, not types.
pub fn region_schema(catalog: &RegionCatalog) -> NodeSchema {
    let country = catalog.country();
    let display_name = if country.flag.is_empty() {
        format!("{} Outfit", country.name)
    } else {
        format!("{} {} Outfit", country.flag, country.name)
    };

    let inputs = vec![
        fixed_choice_field("gender", GENDERS, "unisex"),
        fixed_choice_field("age", AGES, RANDOM_TOKEN),
        catalog_choice_field("hair_style", "hair_styles", catalog, true),
        catalog_choice_field("head_gear", "head_gear", catalog, true),
        // The torso dropdown deliberately has no "disabled" entry; an
        // outfit keeps at least the torso slot selectable.
        catalog_choice_field("torso_clothing", "torso_clothing", catalog, false),
        catalog_choice_field("arm_clothing", "arm_clothing", catalog, true),
        catalog_choice_field("hand_accessories", "hand_accessories", catalog, true),
        catalog_choice_field("jewelry", "jewelry", catalog, true),
        catalog_choice_field("fabric_colors", "fabric_colors", catalog, true),
        catalog_choice_field("leg_clothing", "leg_clothing", catalog, true),
        catalog_choice_field("footwear", "footwear", catalog, true),
        catalog_choice_field("pose", "poses", catalog, true),
        fixed_choice_field("detailed_description", &["enabled", "disabled"], "enabled"),
        string_field("trigger_word"),
        string_field("custom_text"),
        InputField {
            name: "seed".to_string(),
            kind: FieldKind::Integer,
            options: Vec::new(),
            default: "0".to_string(),
        },
    ];

    let outputs = vec![
        OutputField {
            name: "description".to_string(),
            kind: FieldKind::String,
        },
        OutputField {
            name: "seed".to_string(),
            kind: FieldKind::Integer,
        },
    ];

    NodeSchema {
        region: catalog.region().to_string(),
        display_name,
        inputs,
        outputs,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use crate::catalog::CountryInfo;

    use super::*;

    fn catalog() -> RegionCatalog {
        let mut categories: HashMap<String, Vec<Candidate>> = HashMap::new();
        categories.insert(
            "torso_clothing".to_string(),
            vec![Candidate::from("kimono"), Candidate::from("yukata")],
        );
        categories.insert("head_gear".to_string(), vec![Candidate::from("kasa hat")]);
        RegionCatalog::new(
            "jp",
            categories,
            CountryInfo {
                name: "Japanese".to_string(),
                flag: "🇯🇵".to_string(),
            },
        )
    }

    fn field<'a>(schema: &'a NodeSchema, name: &str) -> &'a InputField {
        schema
            .inputs
            .iter()
            .find(|input| input.name == name)
            .unwrap_or_else(|| panic!("missing field {name}"))
    }

    #[test]
    fn display_name_combines_flag_and_country() {
        let schema = region_schema(&catalog());
        assert_eq!(schema.display_name, "🇯🇵 Japanese Outfit");
        assert_eq!(schema.region, "jp");
    }

    #[test]
    fn category_fields_default_to_random() {
        let schema = region_schema(&catalog());
        let head_gear = field(&schema, "head_gear");
        assert_eq!(head_gear.default, "random");
        assert_eq!(head_gear.options, vec!["random", "disabled", "kasa hat"]);
    }

    #[test]
    fn torso_dropdown_has_no_disabled_entry() {
        let schema = region_schema(&catalog());
        let torso = field(&schema, "torso_clothing");
        assert_eq!(torso.options, vec!["random", "kimono", "yukata"]);
    }

    #[test]
    fn empty_categories_still_offer_the_sentinels() {
        let schema = region_schema(&catalog());
        let jewelry = field(&schema, "jewelry");
        assert_eq!(jewelry.options, vec!["random", "disabled"]);
    }

    #[test]
    fn seed_is_an_integer_with_zero_default() {
        let schema = region_schema(&catalog());
        let seed = field(&schema, "seed");
        assert_eq!(seed.kind, FieldKind::Integer);
        assert_eq!(seed.default, "0");
    }

    #[test]
    fn output_shape_is_description_and_seed() {
        let schema = region_schema(&catalog());
        let names: Vec<&str> = schema
            .outputs
            .iter()
            .map(|output| output.name.as_str())
            .collect();
        assert_eq!(names, vec!["description", "seed"]);
    }
}
