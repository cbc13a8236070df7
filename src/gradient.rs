use colored::*;

pub struct GradientText;

impl GradientText {
    /// Workflow banner lines, printed black on green like a status bar.
    pub fn banner(text: &str) -> String {
        text.black().on_bright_green().to_string()
    }

    pub fn question(text: &str) -> String {
        text.bright_yellow().bold().to_string()
    }

    pub fn section(text: &str) -> String {
        text.yellow().to_string()
    }

    pub fn progress(text: &str) -> String {
        text.bright_magenta().to_string()
    }

    pub fn error(text: &str) -> String {
        text.bright_red().bold().to_string()
    }

    pub fn hint(text: &str) -> String {
        text.bright_blue().to_string()
    }

    pub fn command(text: &str) -> String {
        text.bright_green().to_string()
    }

    pub fn cyber(text: &str) -> String {
        let colors = [
            "38;2;0;255;255",
            "38;2;255;0;255", // Magenta
            "38;2;0;255;127", // Spring Green
        ];
        Self::gradient_text(text, &colors)
    }

    fn gradient_text(text: &str, colors: &[&str]) -> String {
        let mut colored_text = String::new();
        for (i, c) in text.chars().enumerate() {
            let color_index = i % colors.len();
            colored_text.push_str(&format!("\x1b[{}m{}", colors[color_index], c));
        }
        colored_text.push_str("\x1b[0m");
        colored_text
    }
}
