//! Terminal output formatting.

use colored::Colorize;
use herald_core::Notification;
use unicode_width::UnicodeWidthStr;

const ID_WIDTH: usize = 20;
const TITLE_WIDTH: usize = 30;
const BODY_WIDTH: usize = 40;

/// Print a single notification.
pub fn print_notification(notification: &Notification) {
    println!(
        "{} {}",
        notification.title.cyan().bold(),
        format!("({})", notification.id).dimmed()
    );
    println!("{}: {}", "Created".bold(), notification.created_at.to_rfc3339());
    if !notification.body.is_empty() {
        println!();
        println!("{}", notification.body);
    }
}

/// Print notifications as a table.
pub fn print_notifications_table(notifications: &[Notification]) {
    if notifications.is_empty() {
        println!("{}", "No notifications found.".dimmed());
        return;
    }

    println!(
        "{} {} {} {}",
        pad_right("ID", ID_WIDTH),
        pad_right("Title", TITLE_WIDTH),
        pad_right("Body", BODY_WIDTH),
        "Created"
    );
    println!("{}", "-".repeat(ID_WIDTH + TITLE_WIDTH + BODY_WIDTH + 23));

    for notification in notifications {
        println!(
            "{} {} {} {}",
            pad_right(&notification.id, ID_WIDTH).dimmed(),
            pad_right(&truncate_visual(&notification.title, TITLE_WIDTH), TITLE_WIDTH),
            pad_right(&truncate_visual(&notification.body, BODY_WIDTH), BODY_WIDTH),
            notification.created_at.format("%Y-%m-%d %H:%M:%S")
        );
    }
}

/// Pad a plain string to a given visual width (right-padded).
fn pad_right(s: &str, width: usize) -> String {
    let visual = UnicodeWidthStr::width(s);
    if visual >= width {
        s.to_string()
    } else {
        format!("{}{}", s, " ".repeat(width - visual))
    }
}

/// Truncate a string respecting visual width, flattening newlines.
fn truncate_visual(s: &str, max_width: usize) -> String {
    let flat = s.replace('\n', " ");
    if UnicodeWidthStr::width(flat.as_str()) <= max_width {
        return flat;
    }
    if max_width <= 3 {
        return ".".repeat(max_width);
    }
    let mut result = String::new();
    let mut current_width = 0;
    for ch in flat.chars() {
        let ch_width = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
        if current_width + ch_width > max_width - 2 {
            break;
        }
        result.push(ch);
        current_width += ch_width;
    }
    result.push_str("..");
    result
}
