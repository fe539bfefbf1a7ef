use std::fs;
use std::path::Path;

use rand::prelude::SliceRandom;
use rand::rngs::StdRng;
use serde::Deserialize;
use tracing::warn;

use crate::compose::choice::{is_sentinel, DISABLED_TOKEN, RANDOM_TOKEN};

/// One optional `label: value` annotation appended to the keyword prompt.
#[derive(Debug, Clone)]
pub struct Descriptor {
    pub label: String,
    pub value: String,
}

impl Descriptor {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Descriptor {
            label: label.into(),
            value: value.into(),
        }
    }

    fn is_active(&self) -> bool {
        let value = self.value.trim();
        !value.is_empty() && !is_sentinel(value)
    }
}

/// Joins the keywords with every active descriptor. Descriptors whose
/// value is empty or a sentinel token contribute nothing.
pub fn compose_keyword_prompt(keywords: &str, descriptors: &[Descriptor]) -> String {
    let extras: Vec<String> = descriptors
        .iter()
        .filter(|descriptor| descriptor.is_active())
        .map(|descriptor| format!("{}: {}", descriptor.label, descriptor.value.trim()))
        .collect();

    if extras.is_empty() {
        keywords.to_string()
    } else {
        format!("{}, {}", keywords, extras.join(", "))
    }
}

/// Target model family for the instruction text sent to the enhancer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptStyle {
    Sdxl,
    Flux,
}

impl PromptStyle {
    pub const ALL: [PromptStyle; 2] = [PromptStyle::Sdxl, PromptStyle::Flux];

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "sdxl" => Some(PromptStyle::Sdxl),
            "flux" => Some(PromptStyle::Flux),
            _ => None,
        }
    }

    fn file_stem(&self) -> &'static str {
        match self {
            PromptStyle::Sdxl => "sdxl",
            PromptStyle::Flux => "flux",
        }
    }
}

/// Resolves the requested style name: "disabled" selects none, "random"
/// draws one, anything else parses as a concrete style.
pub fn select_style(requested: &str, rng: Option<&mut StdRng>) -> Option<PromptStyle> {
    if requested.eq_ignore_ascii_case(DISABLED_TOKEN) {
        return None;
    }
    if requested.eq_ignore_ascii_case(RANDOM_TOKEN) {
        let picked = match rng {
            Some(rng) => PromptStyle::ALL.choose(rng),
            None => PromptStyle::ALL.choose(&mut rand::thread_rng()),
        };
        return picked.copied();
    }
    PromptStyle::parse(requested)
}

const FALLBACK_INSTRUCTIONS: &str = "Rewrite the comma-separated keywords into one vivid, \
    well-structured image generation prompt. Reply with the prompt text only.";

#[derive(Debug, Deserialize)]
struct InstructionsFile {
    instructions: String,
}

/// Loads the system instructions for a style from the prompts directory.
/// A missing or malformed file degrades to a generic instruction.
pub fn load_style_instructions(data_dir: &Path, style: PromptStyle) -> String {
    let path = data_dir
        .join("prompts")
        .join(format!("{}.json", style.file_stem()));

    let raw = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(err) => {
            warn!(
                "Failed to read prompt instructions '{}': {}",
                path.display(),
                err
            );
            return FALLBACK_INSTRUCTIONS.to_string();
        }
    };

    match serde_json::from_str::<InstructionsFile>(&raw) {
        Ok(file) => file.instructions,
        Err(err) => {
            warn!(
                "Failed to parse prompt instructions '{}': {}",
                path.display(),
                err
            );
            FALLBACK_INSTRUCTIONS.to_string()
        }
    }
}

/// Picks the system instructions for a request: a non-empty custom
/// override wins, then the selected style's file, otherwise empty.
pub fn resolve_instructions(
    data_dir: &Path,
    requested_style: &str,
    custom_instructions: Option<&str>,
    rng: Option<&mut StdRng>,
) -> String {
    if let Some(custom) = custom_instructions {
        let trimmed = custom.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    match select_style(requested_style, rng) {
        Some(style) => load_style_instructions(data_dir, style),
        None => String::new(),
    }
}
