//! Dialoguer theme and banner for the interactive editor.

use console::{style, Style};
use dialoguer::theme::ColorfulTheme;

/// Returns a `ColorfulTheme` for editor prompts.
///
/// - Prompt prefix: cyan `?`
/// - Success prefix: green `✓`
/// - Error prefix: red `✗`
pub fn tagsmith_theme() -> ColorfulTheme {
    ColorfulTheme {
        prompt_prefix: style("?".to_string()).for_stderr().cyan(),
        prompt_style: Style::new().for_stderr().bold(),
        prompt_suffix: style("›".to_string()).for_stderr().bright().black(),
        success_prefix: style("✓".to_string()).for_stderr().green(),
        success_suffix: style("·".to_string()).for_stderr().bright().black(),
        error_prefix: style("✗".to_string()).for_stderr().red(),
        error_style: Style::new().for_stderr().red(),
        values_style: Style::new().for_stderr().green(),
        ..ColorfulTheme::default()
    }
}

/// Prints the banner to stderr so stdout stays clean.
pub fn print_banner(directory: &str, records: usize) {
    let version_line = format!("Tagsmith v{}", tagsmith_core::VERSION);
    let detail = format!("{records} records in {directory}");

    let inner_width = version_line.chars().count().max(detail.chars().count()) + 4;

    let top = format!("  ╔{:═<width$}╗", "", width = inner_width);
    let mid1 = format!("  ║{:^width$}║", version_line, width = inner_width);
    let mid2 = format!("  ║{:^width$}║", detail, width = inner_width);
    let bot = format!("  ╚{:═<width$}╝", "", width = inner_width);

    let cyan = Style::new().for_stderr().cyan();

    eprintln!();
    eprintln!("{}", cyan.apply_to(&top));
    eprintln!("{}", cyan.apply_to(&mid1));
    eprintln!("{}", cyan.apply_to(&mid2));
    eprintln!("{}", cyan.apply_to(&bot));
    eprintln!("  {}", Style::new().for_stderr().dim().apply_to("Type 'help' for commands."));
    eprintln!();
}
