use colored::Colorize;
use std::fmt;

use crate::submission::Receipt;

/// Message categories used by the CLI output helpers.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Success,
    Warning,
    Error,
    Section,
}

fn apply_style(kind: MessageKind, message: impl fmt::Display) -> String {
    let text = message.to_string();
    match kind {
        MessageKind::Info => text,
        MessageKind::Success => text.bright_green().to_string(),
        MessageKind::Warning => format!("warning: {text}").bright_yellow().to_string(),
        MessageKind::Error => format!("error: {text}").bright_red().to_string(),
        MessageKind::Section => format!("=== {} ===", text.trim()).bold().to_string(),
    }
}

pub fn print(kind: MessageKind, message: impl fmt::Display) {
    println!("{}", apply_style(kind, message));
}

pub fn info(message: impl fmt::Display) {
    print(MessageKind::Info, message);
}

pub fn success(message: impl fmt::Display) {
    print(MessageKind::Success, message);
}

pub fn warning(message: impl fmt::Display) {
    print(MessageKind::Warning, message);
}

pub fn error(message: impl fmt::Display) {
    print(MessageKind::Error, message);
}

pub fn section(title: impl fmt::Display) {
    print(MessageKind::Section, title);
}

/// Prints a receipt green when accepted and yellow when rejected.
pub fn receipt(receipt: &Receipt) {
    if receipt.is_ok() {
        success(receipt);
    } else {
        print(MessageKind::Info, receipt.to_string().bright_yellow());
    }
}

/// Disables ANSI styling, used for script mode.
pub fn disable_colors() {
    colored::control::set_override(false);
}
