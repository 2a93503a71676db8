//! Terminal rendering of verdicts, the zone activation map, and the
//! history view. Display only — nothing here feeds back into
//! classification. Functions return lines rather than printing so the
//! binary decides where output goes.

use colored::*;

use crate::history::HistoryEntry;
use crate::lexicon::Zone;
use crate::ToneVerdict;

/// Parse `#rgb` or `#rrggbb` into channel values. Lexicon colors come from
/// config, so unparseable input falls back to white rather than failing.
fn hex_to_rgb(hex: &str) -> (u8, u8, u8) {
    let h = hex.trim_start_matches('#');
    if !h.is_ascii() {
        return (0xff, 0xff, 0xff);
    }
    let expand = |c: u8| c << 4 | c;
    match h.len() {
        3 => {
            let chan = |i| u8::from_str_radix(&h[i..i + 1], 16).unwrap_or(0xf);
            (expand(chan(0)), expand(chan(1)), expand(chan(2)))
        }
        6 => {
            let chan = |i| u8::from_str_radix(&h[i..i + 2], 16).unwrap_or(0xff);
            (chan(0), chan(2), chan(4))
        }
        _ => (0xff, 0xff, 0xff),
    }
}

/// Tone line plus neurotransmitter tags, colored with the tone's display
/// color.
pub fn render_verdict(verdict: &ToneVerdict) -> Vec<String> {
    let (r, g, b) = hex_to_rgb(&verdict.color);
    vec![
        format!("Tone: {}", verdict.tone.truecolor(r, g, b).bold()),
        format!("Tags: {}", verdict.neurotransmitters.join(", ")),
    ]
}

/// One line per zone, active zones filled and painted with the tone color,
/// inactive zones dimmed.
pub fn render_zone_map(verdict: &ToneVerdict) -> Vec<String> {
    let (r, g, b) = hex_to_rgb(&verdict.color);
    Zone::ALL
        .iter()
        .map(|zone| {
            if verdict.zones.contains(zone) {
                format!("  {} {}", "●".truecolor(r, g, b), zone.to_string().truecolor(r, g, b))
            } else {
                format!("  {} {}", "○".dimmed(), zone.to_string().dimmed())
            }
        })
        .collect()
}

/// History view, one line per entry in the order given (callers pass
/// `recent_first` output).
pub fn render_history(entries: &[HistoryEntry]) -> Vec<String> {
    if entries.is_empty() {
        return vec!["(history is empty)".dimmed().to_string()];
    }
    entries
        .iter()
        .map(|e| {
            let (r, g, b) = hex_to_rgb(&e.color);
            format!(
                "{}  [{}] {}",
                e.timestamp.to_string().dimmed(),
                e.tone.truecolor(r, g, b),
                e.text
            )
        })
        .collect()
}
