use std::collections::HashMap;
use std::fs;
use std::path::Path;

use tracing::{debug, info, warn};

use crate::catalog::types::{Candidate, CountryInfo, RegionCatalog};

/// Categories read from a region's own data directory. Hair styles come
/// from the shared styles directory instead.
const REGION_CATEGORIES: &[&str] = &[
    "head_gear",
    "chest_clothing",
    "torso_clothing",
    "leg_clothing",
    "arm_clothing",
    "fabric_colors",
    "jewelry",
    "hand_accessories",
    "footwear",
    "poses",
];

fn load_candidate_file(path: &Path) -> Vec<Candidate> {
    if !path.exists() {
        debug!("Candidate file '{}' not found; using empty list", path.display());
        return Vec::new();
    }

    let raw = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) => {
            warn!("Failed to read candidate file '{}': {}", path.display(), err);
            return Vec::new();
        }
    };

    match serde_json::from_str::<Vec<Candidate>>(&raw) {
        Ok(list) => list,
        Err(err) => {
            warn!("Failed to parse candidate file '{}': {}", path.display(), err);
            Vec::new()
        }
    }
}

fn merge_poses(region_poses: Vec<Candidate>, shared_poses: Vec<Candidate>) -> Vec<Candidate> {
    let mut merged = region_poses;
    for pose in shared_poses {
        if !merged.iter().any(|existing| existing.name() == pose.name()) {
            merged.push(pose);
        }
    }
    merged
}

fn load_country_info(data_dir: &Path, region: &str) -> CountryInfo {
    let fallback = CountryInfo {
        name: region.to_uppercase(),
        flag: String::new(),
    };

    let path = data_dir.join("common").join("country_codes.json");
    let raw = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(err) => {
            debug!("Country codes file '{}' unavailable: {}", path.display(), err);
            return fallback;
        }
    };

    match serde_json::from_str::<HashMap<String, CountryInfo>>(&raw) {
        Ok(mut map) => map.remove(region).unwrap_or(fallback),
        Err(err) => {
            warn!("Failed to parse country codes file '{}': {}", path.display(), err);
            fallback
        }
    }
}

/// Loads every candidate list for one region. Any missing or unreadable
/// file degrades to an empty list so a partial data tree still composes.
pub fn load_region_catalog(data_dir: &Path, region: &str) -> RegionCatalog {
    let region_dir = data_dir.join(region);
    if !region_dir.exists() {
        warn!(
            "Region data directory '{}' not found; all categories will be empty",
            region_dir.display()
        );
    }
    let styles_dir = data_dir.join("styles");

    let mut categories = HashMap::new();
    for category in REGION_CATEGORIES {
        let mut list = load_candidate_file(&region_dir.join(format!("{category}.json")));
        if *category == "poses" {
            list = merge_poses(list, load_candidate_file(&styles_dir.join("poses.json")));
        }
        categories.insert((*category).to_string(), list);
    }
    categories.insert(
        "hair_styles".to_string(),
        load_candidate_file(&styles_dir.join("hair_styles.json")),
    );

    let country = load_country_info(data_dir, region);
    let loaded = categories.values().filter(|list| !list.is_empty()).count();
    info!(
        "Loaded catalog for region '{}': {} of {} categories populated",
        region,
        loaded,
        categories.len()
    );

    RegionCatalog::new(region, categories, country)
}

/// Region codes available under the data directory. The shared directories
/// (common, styles, prompts) are not regions.
pub fn available_regions(data_dir: &Path) -> Vec<String> {
    let mut regions = Vec::new();
    let entries = match fs::read_dir(data_dir) {
        Ok(entries) => entries,
        Err(err) => {
            warn!("Failed to read data directory '{}': {}", data_dir.display(), err);
            return regions;
        }
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
            continue;
        };
        if matches!(name, "common" | "styles" | "prompts") {
            continue;
        }
        regions.push(name.to_string());
    }

    regions.sort();
    regions
}
