//! Terminal output configuration and interactive prompts.

use colored::{Color, Colorize};
use std::io::{self, Write};

/// Color configuration threaded explicitly into display code.
///
/// Built once from the `--no-color` flag and the environment, then passed
/// by value wherever user-facing text is formatted.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    enabled: bool,
}

impl Palette {
    /// Create a palette with colors forced on or off.
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// Decide color support from the flag and the environment:
    /// `NO_COLOR` disables, `FORCE_COLOR` enables, `TERM=dumb` disables.
    pub fn from_env(no_color_flag: bool) -> Self {
        if no_color_flag || std::env::var_os("NO_COLOR").is_some() {
            return Self::new(false);
        }
        if std::env::var_os("FORCE_COLOR").is_some() {
            return Self::new(true);
        }
        let term = std::env::var("TERM").unwrap_or_default().to_lowercase();
        Self::new(term != "dumb" && term != "unknown")
    }

    /// Whether colors are enabled.
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Paint a string with a color, or return it unchanged when colors
    /// are disabled.
    pub fn paint(&self, text: &str, color: Color) -> String {
        if self.enabled {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    pub fn green(&self, text: &str) -> String {
        self.paint(text, Color::Green)
    }

    pub fn red(&self, text: &str) -> String {
        self.paint(text, Color::Red)
    }

    pub fn yellow(&self, text: &str) -> String {
        self.paint(text, Color::Yellow)
    }

    pub fn cyan(&self, text: &str) -> String {
        self.paint(text, Color::Cyan)
    }

    pub fn blue(&self, text: &str) -> String {
        self.paint(text, Color::Blue)
    }

    pub fn bold_blue(&self, text: &str) -> String {
        if self.enabled {
            text.blue().bold().to_string()
        } else {
            text.to_string()
        }
    }

    pub fn dim(&self, text: &str) -> String {
        if self.enabled {
            text.dimmed().to_string()
        } else {
            text.to_string()
        }
    }
}

/// Highlight character-level changes between two strings for rename
/// previews: removed text in red on the original, added text in green
/// on the modified version.
pub fn highlight_changes(original: &str, modified: &str, palette: Palette) -> (String, String) {
    use difference::{Changeset, Difference};

    if original == modified {
        return (original.to_string(), modified.to_string());
    }

    let changeset = Changeset::new(original, modified, "");
    let mut highlighted_original = String::new();
    let mut highlighted_modified = String::new();
    for diff in changeset.diffs {
        match diff {
            Difference::Same(text) => {
                highlighted_original.push_str(&text);
                highlighted_modified.push_str(&text);
            }
            Difference::Rem(text) => highlighted_original.push_str(&palette.red(&text)),
            Difference::Add(text) => highlighted_modified.push_str(&palette.green(&text)),
        }
    }
    (highlighted_original, highlighted_modified)
}

/// Print a prompt and read one trimmed line from stdin.
pub fn prompt(message: &str) -> io::Result<String> {
    print!("{}", message);
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

/// Ask a yes/no question, accepting `y`/`yes`/`n`/`no` case-insensitively.
/// An empty answer picks `default` when one is given; anything else
/// reprompts.
pub fn confirm(message: &str, default: Option<bool>) -> io::Result<bool> {
    loop {
        let answer = prompt(message)?.to_lowercase();
        match answer.as_str() {
            "y" | "yes" => return Ok(true),
            "n" | "no" => return Ok(false),
            "" => {
                if let Some(default) = default {
                    return Ok(default);
                }
                println!("Please enter valid selection.");
            }
            _ => println!("Please enter valid selection."),
        }
    }
}
