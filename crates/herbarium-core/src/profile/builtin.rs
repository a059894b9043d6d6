use crate::error::HerbariumError;
use crate::profile::parse_profile_str;
use crate::profile::schema::CategoryProfile;

const FLOWERING_SHRUBS_JSON: &str = include_str!("../../../../profiles/flowering-shrubs.json");
const DRACEANA_JSON: &str = include_str!("../../../../profiles/draceana.json");
const PHILODENDRON_JSON: &str = include_str!("../../../../profiles/philodendron.json");
const WATER_LILIES_JSON: &str = include_str!("../../../../profiles/water-lilies.json");
const AQUATIC_JSON: &str = include_str!("../../../../profiles/aquatic.json");
const PINEAPPLE_JSON: &str = include_str!("../../../../profiles/pineapple.json");
const HERBAL_JSON: &str = include_str!("../../../../profiles/herbal.json");
const BANANA_JSON: &str = include_str!("../../../../profiles/banana.json");

/// Available predefined category profiles, in catalogue page order.
pub const PRESETS: &[&str] = &[
    "flowering-shrubs",
    "draceana",
    "philodendron",
    "water-lilies",
    "aquatic",
    "pineapple",
    "herbal",
    "banana",
];

/// Load a predefined profile by name.
pub fn load_preset(name: &str) -> Result<CategoryProfile, HerbariumError> {
    let json = match name {
        "flowering-shrubs" => FLOWERING_SHRUBS_JSON,
        "draceana" => DRACEANA_JSON,
        "philodendron" => PHILODENDRON_JSON,
        "water-lilies" => WATER_LILIES_JSON,
        "aquatic" => AQUATIC_JSON,
        "pineapple" => PINEAPPLE_JSON,
        "herbal" => HERBAL_JSON,
        "banana" => BANANA_JSON,
        _ => {
            return Err(HerbariumError::UnknownProfile {
                name: name.to_string(),
                available: PRESETS.join(", "),
            })
        }
    };
    parse_profile_str(json)
}
