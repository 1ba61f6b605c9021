use crate::text_metrics::FontMetrics;

/// Greedy word wrap: words accumulate into a line while the measured line
/// stays within `max_width`. A single word wider than `max_width` gets its
/// own line and is never split. Empty and whitespace-only input produce no
/// lines at all.
pub fn wrap(text: &str, max_width: f32, font_size: f32, metrics: &dyn FontMetrics) -> Vec<String> {
    if text.trim().is_empty() {
        return Vec::new();
    }
    if metrics.string_width(text, font_size) <= max_width {
        return vec![text.to_string()];
    }

    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };
        if metrics.string_width(&candidate, font_size) > max_width {
            if !current.is_empty() {
                lines.push(current.clone());
                current.clear();
            }
            current.push_str(word);
        } else {
            current = candidate;
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
