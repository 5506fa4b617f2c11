//! Panel roster files
//!
//! A panel file is a TOML document describing the expert roster:
//!
//! ```toml
//! [[experts]]
//! id = "strategist"
//! name = "Maya"
//! role = "Business Strategist"
//! personality = "Direct, numbers-first, allergic to vague plans"
//! expertise = ["go-to-market", "pricing"]
//! system_prompt = "You are Maya, a business strategist who..."
//! color = "#e91e63"
//! model = "anthropic/claude-sonnet-4.5"   # optional override
//! ```

use anyhow::{Context, Result};
use colloquy_domain::{Expert, ModelId};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct PanelFile {
    experts: Vec<FileExpert>,
}

#[derive(Debug, Deserialize)]
struct FileExpert {
    id: String,
    name: String,
    role: String,
    #[serde(default)]
    personality: String,
    #[serde(default)]
    expertise: Vec<String>,
    system_prompt: String,
    #[serde(default = "default_color")]
    color: String,
    #[serde(default)]
    model: Option<String>,
}

fn default_color() -> String {
    "#888888".to_string()
}

/// Load an expert roster from a panel file
pub fn load_panel(path: &Path) -> Result<Vec<Expert>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("could not read panel file {}", path.display()))?;
    let panel: PanelFile = toml::from_str(&raw)
        .with_context(|| format!("could not parse panel file {}", path.display()))?;

    anyhow::ensure!(!panel.experts.is_empty(), "panel file defines no experts");

    Ok(panel.experts.into_iter().map(to_expert).collect())
}

fn to_expert(raw: FileExpert) -> Expert {
    let mut expert = Expert::new(raw.id, raw.name, raw.role)
        .with_personality(raw.personality)
        .with_expertise(raw.expertise)
        .with_system_prompt(raw.system_prompt)
        .with_color(raw.color);
    if let Some(model) = raw.model {
        expert = expert.with_model(ModelId::new(model));
    }
    expert
}

/// Built-in three-expert panel used when no panel file is given
pub fn default_panel() -> Vec<Expert> {
    vec![
        Expert::new("strategist", "Maya", "Business Strategist")
            .with_personality("Direct, numbers-first, allergic to vague plans")
            .with_expertise(vec!["go-to-market".to_string(), "pricing".to_string()])
            .with_system_prompt(
                "You are Maya, a business strategist. You judge every idea by its \
                 commercial viability and are quick to ask who pays and why.",
            )
            .with_color("#e91e63"),
        Expert::new("engineer", "Tomás", "Engineering Lead")
            .with_personality("Pragmatic builder, skeptical of hype")
            .with_expertise(vec!["architecture".to_string(), "delivery".to_string()])
            .with_system_prompt(
                "You are Tomás, an engineering lead. You care about what can actually \
                 be built and maintained, and you name technical risks early.",
            )
            .with_color("#2196f3"),
        Expert::new("editor", "Priya", "Content Editor")
            .with_personality("Audience-obsessed, precise with language")
            .with_expertise(vec!["messaging".to_string(), "storytelling".to_string()])
            .with_system_prompt(
                "You are Priya, a content editor. You push for clarity of message and \
                 always ask how an idea will land with its audience.",
            )
            .with_color("#4caf50"),
    ]
}
