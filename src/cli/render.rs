//! ASCII chart rendering for `timeline layout` and `timeline watch`

use crate::layout::{ItemGeometry, TimelineLayout};
use crate::storage::RenderConfig;

const TRACK: char = '.';
const BAR: char = '#';

/// Maps a percentage onto a column in `0..=last`
fn column(pct: f64, last: usize) -> usize {
    ((pct / 100.0) * last as f64).round().max(0.0) as usize
}

/// Pads or truncates text to exactly `width` characters
fn fit(text: &str, width: usize) -> String {
    let count = text.chars().count();
    if count <= width {
        format!("{:<width$}", text, width = width)
    } else if width == 0 {
        String::new()
    } else {
        let mut cut: String = text.chars().take(width - 1).collect();
        cut.push('…');
        cut
    }
}

fn axis_lines(layout: &TimelineLayout, config: &RenderConfig) -> (String, String) {
    let width = config.track_width;
    let mut labels: Vec<char> = Vec::new();
    let mut ruler: Vec<char> = vec!['-'; width];
    let mut next_free = 0;

    for tick in &layout.ticks {
        let col = column(tick.offset_pct, width.saturating_sub(1));
        if let Some(mark) = ruler.get_mut(col) {
            *mark = '|';
        }

        // Skip labels that would collide with the previous one
        if col < next_free {
            continue;
        }
        labels.resize(col, ' ');
        labels.extend(tick.label.chars());
        next_free = labels.len() + 1;
    }

    let indent = " ".repeat(config.label_width + 1);
    (
        format!("{}{}", indent, labels.into_iter().collect::<String>()).trim_end().to_string(),
        format!("{}{}", indent, ruler.into_iter().collect::<String>()),
    )
}

/// Draws the bar for one item across the track
pub fn bar(item: &ItemGeometry, config: &RenderConfig) -> String {
    let width = config.track_width;
    let start = column(item.offset_pct, width).min(width.saturating_sub(1));
    let len = column(item.width_pct, width)
        .max(config.min_bar_chars)
        .min(width.saturating_sub(start));

    (0..width)
        .map(|col| if col >= start && col < start + len { BAR } else { TRACK })
        .collect()
}

/// Renders a whole layout as text
pub fn render_chart(layout: &TimelineLayout, config: &RenderConfig) -> String {
    let (labels, ruler) = axis_lines(layout, config);
    let mut lines = vec![labels, ruler];

    for lane in &layout.lanes {
        lines.push(fit(&lane.label, config.label_width).trim_end().to_string());

        if lane.items.is_empty() {
            lines.push("  (no items)".to_string());
            continue;
        }

        for item in &lane.items {
            lines.push(format!(
                "  {} {}  {} [{}]",
                fit(&item.label, config.label_width.saturating_sub(2).max(1)),
                bar(item, config),
                item.range_label(&layout.mode),
                item.status_class,
            ));
        }
    }

    lines.join("\n")
}
