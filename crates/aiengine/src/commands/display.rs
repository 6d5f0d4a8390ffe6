//! Terminal rendering shared by the session commands.

use aiengine_client::{Confirmation, Message, TaskSelection};
use console::{Style, style};

/// Print a session message in human-readable form.
pub fn print_message(message: &Message) {
    let dim = Style::new().dim();
    match message {
        Message::EngineInfo(info) => {
            println!("{} {}", dim.apply_to("[info]"), dim.apply_to(&info.text));
        }
        Message::AgentUtterance(utterance) => {
            println!("{} {}", style("Agent:").cyan().bold(), utterance.text);
        }
        Message::DataRequest(request) => {
            println!(
                "{} {} {}",
                style("Agent:").cyan().bold(),
                request.text,
                dim.apply_to(format!("({:?})", request.subtype).to_lowercase())
            );
        }
        Message::TaskSelection(selection) => print_selection(selection),
        Message::Confirmation(confirmation) => print_confirmation(confirmation),
        Message::Stop(_) => {
            println!("{}", dim.apply_to("Conversation ended."));
        }
    }
}

fn print_selection(selection: &TaskSelection) {
    println!("{} {}", style("Agent:").cyan().bold(), selection.text);
    for option in selection.options.values() {
        println!("  {}  {}", style(&option.key).yellow(), option.title);
    }
}

fn print_confirmation(confirmation: &Confirmation) {
    let dim = Style::new().dim();
    println!("{} {}", style("Confirm:").magenta().bold(), confirmation.text);
    println!("  {} {}", dim.apply_to("model:"), confirmation.model);
    for (name, value) in &confirmation.payload {
        println!("  {} {}", dim.apply_to(format!("{}:", name)), value);
    }
}

pub fn print_dim(msg: &str) {
    let dim = Style::new().dim();
    println!("{}", dim.apply_to(msg));
}

pub fn print_success(msg: &str) {
    let green = Style::new().green();
    println!("{} {}", green.apply_to("✓"), msg);
}

pub fn print_error(msg: &str) {
    let red = Style::new().red();
    eprintln!("{} {}", red.apply_to("Error:"), msg);
}
