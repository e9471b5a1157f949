//! Terminal rendering for the markdown produced by `pathwise-core`.
//!
//! Rich mode styles headers, emphasis and links with termimad; plain mode
//! prints the markdown untouched, which keeps output stable for scripts and
//! tests.

use anyhow::Result;
use termimad::{crossterm::style::Color, MadSkin};

/// Prints markdown either styled or verbatim.
pub struct TerminalRenderer {
    rich_enabled: bool,
    skin: MadSkin,
}

impl TerminalRenderer {
    pub fn new(rich_enabled: bool) -> Self {
        let mut skin = MadSkin::default();
        skin.set_headers_fg(Color::Cyan);
        skin.bold.set_fg(Color::Yellow);
        skin.italic.set_fg(Color::Magenta);
        skin.inline_code.set_bg(Color::AnsiValue(238));
        skin.quote_mark.set_fg(Color::Green);

        Self { rich_enabled, skin }
    }

    /// Writes `markdown` to stdout.
    pub fn render(&self, markdown: &str) -> Result<()> {
        if !self.rich_enabled {
            print!("{markdown}");
            return Ok(());
        }

        for line in markdown.lines() {
            // Keep the hashes so heading depth stays visible.
            if line.starts_with('#') {
                println!("\x1b[36m{line}\x1b[0m");
            } else {
                self.skin.print_inline(line);
                println!();
            }
        }
        Ok(())
    }
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_renderer_modes() {
        assert!(!TerminalRenderer::new(false).rich_enabled);
        assert!(TerminalRenderer::new(true).rich_enabled);
        assert!(TerminalRenderer::default().rich_enabled);
    }

    #[test]
    fn test_plain_render_succeeds() {
        let renderer = TerminalRenderer::new(false);
        assert!(renderer.render("# Week 1 of 20\n\n- Task\n").is_ok());
    }
}
