use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::catalog::RegionCatalog;
use crate::compose::choice::{resolve_choice, RANDOM_TOKEN};
use crate::compose::normalize::clean_description;

/// Field values for one composition call, as selected by the host. Every
/// category defaults to "random"; the legacy chest field and the free-text
/// fields default to empty.
#[derive(Debug, Clone)]
pub struct DescriptionRequest {
    pub gender: String,
    pub age: String,
    pub hair_style: String,
    pub head_gear: String,
    pub chest_clothing: String,
    pub torso_clothing: String,
    pub arm_clothing: String,
    pub hand_accessories: String,
    pub jewelry: String,
    pub fabric_colors: String,
    pub leg_clothing: String,
    pub footwear: String,
    pub pose: String,
    pub detailed_description: bool,
    pub trigger_word: String,
    pub custom_text: String,
    pub seed: Option<u64>,
}

impl Default for DescriptionRequest {
    fn default() -> Self {
        DescriptionRequest {
            gender: "unisex".to_string(),
            age: RANDOM_TOKEN.to_string(),
            hair_style: RANDOM_TOKEN.to_string(),
            head_gear: RANDOM_TOKEN.to_string(),
            chest_clothing: String::new(),
            torso_clothing: RANDOM_TOKEN.to_string(),
            arm_clothing: RANDOM_TOKEN.to_string(),
            hand_accessories: RANDOM_TOKEN.to_string(),
            jewelry: RANDOM_TOKEN.to_string(),
            fabric_colors: RANDOM_TOKEN.to_string(),
            leg_clothing: RANDOM_TOKEN.to_string(),
            footwear: RANDOM_TOKEN.to_string(),
            pose: RANDOM_TOKEN.to_string(),
            detailed_description: true,
            trigger_word: String::new(),
            custom_text: String::new(),
            seed: None,
        }
    }
}

impl DescriptionRequest {
    /// Builds a request from the host's string field map. Absent keys take
    /// their defaults; a malformed seed value means unseeded, never an
    /// error.
    pub fn from_fields(fields: &HashMap<String, String>) -> Self {
        let defaults = DescriptionRequest::default();
        let get = |key: &str, fallback: &str| {
            fields
                .get(key)
                .cloned()
                .unwrap_or_else(|| fallback.to_string())
        };

        DescriptionRequest {
            gender: get("gender", &defaults.gender),
            age: get("age", &defaults.age),
            hair_style: get("hair_style", &defaults.hair_style),
            head_gear: get("head_gear", &defaults.head_gear),
            chest_clothing: get("chest_clothing", &defaults.chest_clothing),
            torso_clothing: get("torso_clothing", &defaults.torso_clothing),
            arm_clothing: get("arm_clothing", &defaults.arm_clothing),
            hand_accessories: get("hand_accessories", &defaults.hand_accessories),
            jewelry: get("jewelry", &defaults.jewelry),
            fabric_colors: get("fabric_colors", &defaults.fabric_colors),
            leg_clothing: get("leg_clothing", &defaults.leg_clothing),
            footwear: get("footwear", &defaults.footwear),
            pose: get("pose", &defaults.pose),
            detailed_description: !get("detailed_description", "enabled")
                .eq_ignore_ascii_case("disabled"),
            trigger_word: get("trigger_word", ""),
            custom_text: get("custom_text", ""),
            seed: fields
                .get("seed")
                .and_then(|value| value.trim().parse::<u64>().ok()),
        }
    }
}

/// The assembled description plus the seed that produced it. `seed` echoes
/// the requested value; `None` means the unseeded path was taken.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompositionResult {
    pub description: String,
    pub seed: Option<u64>,
}

/// Composes outfit descriptions for one region. Holds the immutable
/// catalog; each call owns a private generator, so concurrent calls on a
/// shared composer do not interfere.
#[derive(Debug, Clone)]
pub struct OutfitComposer {
    catalog: RegionCatalog,
}

impl OutfitComposer {
    pub fn new(catalog: RegionCatalog) -> Self {
        OutfitComposer { catalog }
    }

    pub fn generate_from_fields(&self, fields: &HashMap<String, String>) -> CompositionResult {
        self.generate(&DescriptionRequest::from_fields(fields))
    }

    pub fn generate(&self, request: &DescriptionRequest) -> CompositionResult {
        let mut rng = match request.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        // Successive categories consume successive draws from one stream,
        // so the resolution order is part of the determinism contract.
        let head_gear = self.resolve(&request.head_gear, "head_gear", &mut rng);
        let chest_clothing = self.resolve(&request.chest_clothing, "chest_clothing", &mut rng);
        let torso_clothing = self.resolve(&request.torso_clothing, "torso_clothing", &mut rng);
        let leg_clothing = self.resolve(&request.leg_clothing, "leg_clothing", &mut rng);
        let arm_clothing = self.resolve(&request.arm_clothing, "arm_clothing", &mut rng);
        let fabric_colors = self.resolve(&request.fabric_colors, "fabric_colors", &mut rng);
        let jewelry = self.resolve(&request.jewelry, "jewelry", &mut rng);
        let hand_accessories =
            self.resolve(&request.hand_accessories, "hand_accessories", &mut rng);
        let hair_style = self.resolve(&request.hair_style, "hair_styles", &mut rng);
        let footwear = self.resolve(&request.footwear, "footwear", &mut rng);
        let pose = self.resolve(&request.pose, "poses", &mut rng);

        let mut description = String::new();
        if !request.trigger_word.is_empty() {
            description.push_str(&request.trigger_word);
            description.push_str(", ");
        }
        if !request.age.is_empty() && !request.age.eq_ignore_ascii_case(RANDOM_TOKEN) {
            description.push_str(&request.age);
            description.push(' ');
        }
        if !request.gender.is_empty() && !request.gender.eq_ignore_ascii_case("unisex") {
            description.push_str(&request.gender);
            description.push(' ');
        }

        let wearing_torso = !chest_clothing.is_empty() || !torso_clothing.is_empty();
        if request.detailed_description && wearing_torso {
            description.push_str("dressed in ");
        }
        if !chest_clothing.is_empty() {
            description.push_str(&chest_clothing);
        }
        if !torso_clothing.is_empty() {
            if !chest_clothing.is_empty() {
                description.push_str(" and ");
            }
            description.push_str(&torso_clothing);
        }
        if !leg_clothing.is_empty() {
            if wearing_torso {
                description.push_str(" with ");
            }
            description.push_str(&leg_clothing);
        }
        if !arm_clothing.is_empty() {
            description.push_str(", sleeves: ");
            description.push_str(&arm_clothing);
        }
        if !fabric_colors.is_empty() {
            description.push_str(" in ");
            description.push_str(&fabric_colors);
        }
        if !head_gear.is_empty() {
            description.push_str(", wearing ");
            description.push_str(&head_gear);
        }
        if !jewelry.is_empty() {
            description.push_str(", adorned with ");
            description.push_str(&jewelry);
        }
        if !hand_accessories.is_empty() {
            description.push_str(", featuring ");
            description.push_str(&hand_accessories);
        }
        if !hair_style.is_empty() {
            description.push_str(", hairstyle: ");
            description.push_str(&hair_style);
        }
        if !footwear.is_empty() {
            description.push_str(", finished with ");
            description.push_str(&footwear);
        }
        if !pose.is_empty() {
            if request.detailed_description {
                description.push_str(", ");
                description.push_str(&pose);
            } else {
                // Terse mode: the pose replaces everything accumulated so
                // far and becomes the whole description.
                description = pose;
            }
        }

        let mut description = clean_description(&description);
        if !request.custom_text.is_empty() {
            description.push_str(", ");
            description.push_str(&request.custom_text);
        }

        CompositionResult {
            description,
            seed: request.seed,
        }
    }

    fn resolve(&self, requested: &str, category: &str, rng: &mut StdRng) -> String {
        resolve_choice(requested, self.catalog.candidates(category), Some(rng))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Candidate, CountryInfo, RegionCatalog};

    fn test_catalog() -> RegionCatalog {
        let mut categories: HashMap<String, Vec<Candidate>> = HashMap::new();
        categories.insert(
            "torso_clothing".to_string(),
            vec![
                Candidate::from("linen haori"),
                Candidate::from("quilted hanten"),
            ],
        );
        categories.insert(
            "poses".to_string(),
            vec![
                Candidate::from("standing by a lantern"),
                Candidate::from("kneeling in seiza"),
                Candidate::from("walking under maple trees"),
            ],
        );
        categories.insert(
            "footwear".to_string(),
            vec![Candidate::from("lacquered geta")],
        );
        RegionCatalog::new(
            "jp",
            categories,
            CountryInfo {
                name: "Japanese".to_string(),
                flag: "🇯🇵".to_string(),
            },
        )
    }

    fn explicit_request() -> DescriptionRequest {
        DescriptionRequest {
            gender: "female".to_string(),
            age: "adult".to_string(),
            hair_style: "long braid".to_string(),
            head_gear: "straw hat".to_string(),
            chest_clothing: "red robe".to_string(),
            torso_clothing: "blue vest".to_string(),
            arm_clothing: "long sleeves".to_string(),
            hand_accessories: "paper fan".to_string(),
            jewelry: "jade earrings".to_string(),
            fabric_colors: "crimson".to_string(),
            leg_clothing: "black hakama".to_string(),
            footwear: "geta sandals".to_string(),
            pose: "standing".to_string(),
            detailed_description: true,
            trigger_word: String::new(),
            custom_text: String::new(),
            seed: Some(7),
        }
    }

    #[test]
    fn assembles_every_clause_in_order() {
        let composer = OutfitComposer::new(test_catalog());
        let result = composer.generate(&explicit_request());
        assert_eq!(
            result.description,
            "adult female dressed in red robe and blue vest with black hakama, \
             sleeves: long sleeves in crimson, wearing straw hat, \
             adorned with jade earrings, featuring paper fan, \
             hairstyle: long braid, finished with geta sandals, standing"
        );
        assert_eq!(result.seed, Some(7));
    }

    #[test]
    fn same_seed_and_fields_yield_identical_output() {
        let composer = OutfitComposer::new(test_catalog());
        let mut request = DescriptionRequest::default();
        request.seed = Some(1234);

        let first = composer.generate(&request);
        let second = composer.generate(&request);
        assert_eq!(first, second);
    }

    #[test]
    fn disabled_fields_contribute_no_text() {
        let composer = OutfitComposer::new(test_catalog());
        let request = DescriptionRequest {
            gender: "unisex".to_string(),
            age: "random".to_string(),
            hair_style: "disabled".to_string(),
            head_gear: "disabled".to_string(),
            torso_clothing: "disabled".to_string(),
            arm_clothing: "disabled".to_string(),
            hand_accessories: "disabled".to_string(),
            jewelry: "disabled".to_string(),
            fabric_colors: "disabled".to_string(),
            leg_clothing: "disabled".to_string(),
            footwear: "disabled".to_string(),
            pose: "disabled".to_string(),
            trigger_word: "portrait".to_string(),
            seed: Some(5),
            ..DescriptionRequest::default()
        };

        let result = composer.generate(&request);
        assert_eq!(result.description, "portrait");
    }

    #[test]
    fn pose_replaces_everything_when_detail_is_off() {
        let composer = OutfitComposer::new(test_catalog());
        let mut request = explicit_request();
        request.detailed_description = false;
        request.pose = "sitting".to_string();

        let result = composer.generate(&request);
        assert_eq!(result.description, "sitting");
    }

    #[test]
    fn explicit_chest_with_disabled_torso_reads_naturally() {
        let composer = OutfitComposer::new(test_catalog());
        let request = DescriptionRequest {
            gender: "female".to_string(),
            age: "adult".to_string(),
            hair_style: "disabled".to_string(),
            head_gear: "disabled".to_string(),
            chest_clothing: "red silk robe".to_string(),
            torso_clothing: "disabled".to_string(),
            arm_clothing: "disabled".to_string(),
            hand_accessories: "disabled".to_string(),
            jewelry: "disabled".to_string(),
            fabric_colors: "disabled".to_string(),
            leg_clothing: "disabled".to_string(),
            footwear: "disabled".to_string(),
            pose: "random".to_string(),
            seed: Some(42),
            ..DescriptionRequest::default()
        };

        let result = composer.generate(&request);
        assert!(
            result
                .description
                .starts_with("adult female dressed in red silk robe"),
            "unexpected description: {}",
            result.description
        );
        assert!(!result.description.ends_with(','));
        let pose_clause = result.description.rsplit(", ").next().unwrap();
        assert!(!pose_clause.contains(','));
        assert_eq!(result.seed, Some(42));
    }

    #[test]
    fn zero_is_a_real_seed_and_absence_echoes_none() {
        let composer = OutfitComposer::new(test_catalog());
        let mut request = DescriptionRequest::default();

        request.seed = Some(0);
        assert_eq!(composer.generate(&request).seed, Some(0));

        request.seed = None;
        assert_eq!(composer.generate(&request).seed, None);
    }

    #[test]
    fn custom_text_is_appended_after_normalization() {
        let composer = OutfitComposer::new(test_catalog());
        let mut request = explicit_request();
        request.custom_text = "soft morning light".to_string();

        let result = composer.generate(&request);
        assert!(result.description.ends_with(", standing, soft morning light"));
    }

    #[test]
    fn missing_categories_are_skipped_without_error() {
        // Catalog with no candidates at all: every random resolves empty.
        let composer = OutfitComposer::new(RegionCatalog::new(
            "xx",
            HashMap::new(),
            CountryInfo {
                name: "XX".to_string(),
                flag: String::new(),
            },
        ));
        let mut request = DescriptionRequest::default();
        request.seed = Some(3);

        let result = composer.generate(&request);
        assert_eq!(result.description, "");
    }

    #[test]
    fn field_map_request_composes_end_to_end() {
        let composer = OutfitComposer::new(test_catalog());
        let mut fields = HashMap::new();
        fields.insert("gender".to_string(), "female".to_string());
        fields.insert("age".to_string(), "adult".to_string());
        fields.insert("torso_clothing".to_string(), "disabled".to_string());
        fields.insert("chest_clothing".to_string(), "red silk robe".to_string());
        fields.insert("pose".to_string(), "random".to_string());
        fields.insert("detailed_description".to_string(), "enabled".to_string());
        fields.insert("seed".to_string(), "42".to_string());

        let result = composer.generate_from_fields(&fields);
        assert!(
            result
                .description
                .starts_with("adult female dressed in red silk robe"),
            "unexpected description: {}",
            result.description
        );
        assert_eq!(result.seed, Some(42));
    }

    #[test]
    fn from_fields_applies_defaults_and_lenient_seed_parsing() {
        let mut fields = HashMap::new();
        fields.insert("seed".to_string(), "42".to_string());
        fields.insert("gender".to_string(), "female".to_string());
        let request = DescriptionRequest::from_fields(&fields);
        assert_eq!(request.seed, Some(42));
        assert_eq!(request.gender, "female");
        assert_eq!(request.torso_clothing, "random");
        assert!(request.detailed_description);

        let mut fields = HashMap::new();
        fields.insert("seed".to_string(), "not-a-number".to_string());
        fields.insert("detailed_description".to_string(), "disabled".to_string());
        let request = DescriptionRequest::from_fields(&fields);
        assert_eq!(request.seed, None);
        assert!(!request.detailed_description);
    }
}
