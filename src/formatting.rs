use crate::record::ItemType;
use crate::search::Span;
use yansi::Paint;

/// Color palette for consistent theming
pub struct ColorPalette {
    pub muted: (u8, u8, u8),     // orders, placeholders
    pub header: (u8, u8, u8),    // table headers
    pub highlight: (u8, u8, u8), // search matches
    pub failure: (u8, u8, u8),   // render failures
}

impl ColorPalette {
    pub const CATPPUCCIN: Self = Self {
        muted: (108, 112, 134),
        header: (148, 226, 213),
        highlight: (243, 139, 168),
        failure: (255, 169, 167),
    };
}

/// Per-type accent, so mixed lists scan quickly.
fn color_for_type(kind: ItemType) -> (u8, u8, u8) {
    match kind {
        ItemType::Video => (137, 180, 250),
        ItemType::User => (166, 227, 161),
        ItemType::Custom => (249, 226, 175),
    }
}

/// Formatting context passed through rendering pipeline
pub struct FormatContext {
    pub use_color: bool,
    pub palette: ColorPalette,
}

impl FormatContext {
    pub fn new(use_color: bool) -> Self {
        Self { use_color, palette: ColorPalette::CATPPUCCIN }
    }

    fn rgb(&self, text: &str, (r, g, b): (u8, u8, u8)) -> String {
        if self.use_color {
            Paint::rgb(text, r, g, b).to_string()
        } else {
            text.to_string()
        }
    }

    pub fn format_order(&self, order: u32) -> String {
        self.rgb(&order.to_string(), self.palette.muted)
    }

    pub fn format_header(&self, text: &str) -> String {
        if self.use_color {
            let (r, g, b) = self.palette.header;
            Paint::rgb(text, r, g, b).bold().to_string()
        } else {
            text.to_string()
        }
    }

    pub fn format_type(&self, kind: ItemType) -> String {
        self.rgb(kind.label(), color_for_type(kind))
    }

    pub fn format_muted(&self, text: &str) -> String {
        self.rgb(text, self.palette.muted)
    }

    pub fn format_failure(&self, text: &str) -> String {
        if self.use_color {
            let (r, g, b) = self.palette.failure;
            Paint::rgb(text, r, g, b).bold().to_string()
        } else {
            text.to_string()
        }
    }

    /// Join spans, painting matched runs.
    pub fn format_spans(&self, spans: &[Span]) -> String {
        let mut out = String::new();
        for span in spans {
            match span {
                Span::Plain(text) => out.push_str(text),
                Span::Match(text) if self.use_color => {
                    let (r, g, b) = self.palette.highlight;
                    out.push_str(&Paint::rgb(text, r, g, b).bold().to_string());
                }
                // Brackets keep matches visible without color.
                Span::Match(text) => {
                    out.push('[');
                    out.push_str(text);
                    out.push(']');
                }
            }
        }
        out
    }

    /// Stand-in drawn over a masked code, same footprint as the symbol.
    pub fn mask_overlay(&self, symbol: &str) -> String {
        let width = symbol
            .lines()
            .map(|l| l.chars().count())
            .max()
            .unwrap_or(0)
            .max(12);
        let height = symbol.lines().count().max(3);
        let label = "masked";
        let mut lines = Vec::with_capacity(height);
        for row in 0..height {
            if row == height / 2 {
                let pad = width.saturating_sub(label.len());
                let left = pad / 2;
                lines.push(format!(
                    "{}{}{}",
                    "░".repeat(left),
                    label,
                    "░".repeat(pad - left)
                ));
            } else {
                lines.push("░".repeat(width));
            }
        }
        self.format_muted(&lines.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_context_no_color() {
        let ctx = FormatContext::new(false);
        assert_eq!(ctx.format_order(3), "3");
        assert_eq!(ctx.format_header("Note"), "Note");
        assert_eq!(ctx.format_type(ItemType::User), "user");
    }

    #[test]
    fn test_format_context_with_color() {
        let ctx = FormatContext::new(true);
        let kind = ctx.format_type(ItemType::Video);
        assert!(kind.contains("video"));
        assert!(kind.len() > "video".len()); // Has ANSI codes
    }

    #[test]
    fn test_spans_without_color_bracket_matches() {
        let ctx = FormatContext::new(false);
        let spans = vec![
            Span::Plain("a ".to_string()),
            Span::Match("Foo".to_string()),
            Span::Plain(" b".to_string()),
        ];
        assert_eq!(ctx.format_spans(&spans), "a [Foo] b");
    }

    #[test]
    fn test_mask_overlay_matches_symbol_footprint() {
        let ctx = FormatContext::new(false);
        let symbol = "█".repeat(20) + "\n" + &"█".repeat(20) + "\n" + &"█".repeat(20);
        let overlay = ctx.mask_overlay(&symbol);
        assert_eq!(overlay.lines().count(), 3);
        assert!(overlay.lines().all(|l| l.chars().count() == 20));
        assert!(overlay.contains("masked"));
    }
}
