use crate::core::error::PxError;
use crate::utils::text::{display_width, wrap_text};
use console::style;
use termimad::MadSkin;

fn box_width(max: usize, min: usize) -> usize {
    let term = console::Term::stdout();
    let terminal_width = term.size().1 as usize;
    std::cmp::min(terminal_width.saturating_sub(4), max).max(min)
}

/// Echo a command before it runs
pub fn display_execution_banner(command: &str) {
    let width = box_width(100, 50);
    let label = "⚡ EXECUTING:";
    let inner = width.saturating_sub(display_width(label) + 5);

    let top_border = "┌".to_string() + &"─".repeat(width - 2) + "┐";
    let bottom_border = "└".to_string() + &"─".repeat(width - 2) + "┘";

    println!("\n{}", style(&top_border).dim().cyan());
    let blank = " ".repeat(display_width(label));
    let lines: Vec<String> = command.lines().flat_map(|l| wrap_text(l, inner)).collect();
    for (i, line) in lines.iter().enumerate() {
        let head = if i == 0 { label } else { blank.as_str() };
        let padding = width.saturating_sub(display_width(label) + display_width(line) + 4);
        println!(
            "│ {} {}{}│",
            style(head).bold().green(),
            style(line).bold().yellow(),
            " ".repeat(padding),
        );
    }
    println!("{}", style(&bottom_border).dim().cyan());
}

/// Chat answer in a box, wrapped to the terminal
pub fn display_response(response: &str) {
    let max_width = box_width(120, 60);
    let mut wrapped_lines = Vec::new();
    for line in response.lines() {
        if line.is_empty() {
            wrapped_lines.push(String::new());
        } else {
            wrapped_lines.extend(wrap_text(line, max_width.saturating_sub(4)));
        }
    }

    let content_max_len = wrapped_lines
        .iter()
        .map(|line| display_width(line))
        .max()
        .unwrap_or(0);
    let box_width = std::cmp::min(max_width, content_max_len + 4);

    let top_border = "┌".to_string() + &"─".repeat(box_width - 2) + "┐";
    let bottom_border = "└".to_string() + &"─".repeat(box_width - 2) + "┘";

    println!("{}", style(&top_border).dim().blue());
    for line in wrapped_lines {
        let padding = box_width.saturating_sub(display_width(&line) + 3);
        println!("│ {}{}│", style(&line).white(), " ".repeat(padding));
    }
    println!("{}", style(&bottom_border).dim().blue());
}

pub fn display_markdown(text: &str) {
    let skin = MadSkin::default();
    skin.print_text(text);
}

pub fn looks_like_markdown(text: &str) -> bool {
    text.contains('`') || text.contains("**") || text.lines().any(|l| {
        let l = l.trim_start();
        l.starts_with('#') || l.starts_with("- ") || l.starts_with("* ")
    })
}

/// Markdown answers go through termimad, plain ones into a box
pub fn display_answer(answer: &str) {
    if looks_like_markdown(answer) {
        display_markdown(answer);
    } else {
        display_response(answer);
    }
}

pub fn display_error(err: &PxError) {
    eprintln!("{} {}", style("✗ Error:").bold().red(), err);
}

pub fn display_success(message: &str) {
    println!("{} {}", style("✓").bold().green(), message);
}

pub fn display_chat_welcome(model: &str) {
    println!(
        "{} {}",
        style("Chatting with").bold().cyan(),
        style(model).bold().yellow()
    );
    println!(
        "{}",
        style("Type /help for commands, q or quit to exit.").dim()
    );
}
