//! Console rendering of the discussion event stream

use colloquy_domain::{DiscussionEvent, DiscussionSummary};
use colored::{Color, Colorize};
use std::io::Write;

/// Renders events to stdout as they arrive
pub struct ConsoleRenderer {
    quiet: bool,
}

impl ConsoleRenderer {
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }

    pub fn render(&self, event: &DiscussionEvent) {
        match event {
            DiscussionEvent::ExpertStart {
                expert_name,
                expert_color,
                round,
                debate_style,
                ..
            } => {
                let name = expert_name.color(parse_color(expert_color));
                println!();
                println!(
                    "{} {} {}",
                    name.bold(),
                    format!("(round {})", round).dimmed(),
                    format!("[{}]", debate_style).dimmed()
                );
            }
            DiscussionEvent::Token { content } => {
                print!("{}", content);
                let _ = std::io::stdout().flush();
            }
            DiscussionEvent::ExpertComplete { .. } => {
                println!();
            }
            DiscussionEvent::RoundComplete {
                round,
                consensus_score,
            } => {
                if !self.quiet {
                    let score = consensus_score
                        .map(|s| format!("{:.2}", s))
                        .unwrap_or_else(|| "-".to_string());
                    println!();
                    println!(
                        "{}",
                        format!("── round {} complete · consensus {} ──", round, score).dimmed()
                    );
                }
            }
            DiscussionEvent::ModeratorPrompt { message } => {
                if !self.quiet {
                    println!("{}", format!("[moderator] {}", message).italic().dimmed());
                }
            }
            DiscussionEvent::DiscussionSummary { summary } => {
                self.render_summary(summary);
            }
            DiscussionEvent::DiscussionComplete { .. } => {
                if !self.quiet {
                    println!();
                    println!("{}", "Discussion complete.".bold());
                }
            }
            DiscussionEvent::Error { message } => {
                eprintln!("{}", format!("error: {}", message).red());
            }
        }
    }

    fn render_summary(&self, summary: &DiscussionSummary) {
        println!();
        println!("{}", "Summary".bold().underline());

        println!("{}", "Key takeaways:".bold());
        for takeaway in &summary.key_takeaways {
            println!("  - {}", takeaway);
        }

        println!("{}", "Action items:".bold());
        for item in &summary.action_items {
            println!("  - {}", item);
        }

        println!(
            "{} {} — {}",
            "Sentiment:".bold(),
            summary.sentiment,
            summary.sentiment_explanation
        );
        println!(
            "{} {:.2} — {}",
            "Consensus:".bold(),
            summary.consensus_level,
            summary.consensus_explanation
        );
        println!("{} {}", "Next steps:".bold(), summary.next_steps);
    }
}

/// Parse a `#rrggbb` hex color, falling back to white
fn parse_color(hex: &str) -> Color {
    let hex = hex.trim_start_matches('#');
    if hex.len() == 6 {
        if let (Ok(r), Ok(g), Ok(b)) = (
            u8::from_str_radix(&hex[0..2], 16),
            u8::from_str_radix(&hex[2..4], 16),
            u8::from_str_radix(&hex[4..6], 16),
        ) {
            return Color::TrueColor { r, g, b };
        }
    }
    Color::White
}
