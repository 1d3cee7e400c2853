use console::style;

use crate::types::{Verdict, VerdictRecord};

pub struct Output;

impl Output {
    pub fn new() -> Self {
        Self
    }

    pub fn success(&self, message: &str) {
        println!("{} {}", style("✓").green(), message);
    }

    pub fn error(&self, message: &str) {
        eprintln!("{} {}", style("✗").red(), message);
    }

    pub fn warning(&self, message: &str) {
        eprintln!("{} {}", style("⚠").yellow(), message);
    }

    pub fn info(&self, message: &str) {
        println!("{} {}", style("ℹ").blue(), message);
    }

    pub fn header(&self, message: &str) {
        println!("\n{}", style(message).bold().underlined());
    }

    pub fn section(&self, message: &str) {
        println!("\n{}", style(message).bold());
        println!("{}", "─".repeat(40));
    }

    /// Workflow progress line
    pub fn status(&self, message: &str) {
        println!("{} {}", style("›").cyan(), style(message).dim());
    }

    /// Full verdict card
    pub fn verdict(&self, record: &VerdictRecord) {
        let label = record.verdict.label();
        let badge = match record.verdict {
            Verdict::ShipIt => style(label).green().bold(),
            Verdict::AlmostThere => style(label).yellow().bold(),
            Verdict::SkipIt => style(label).red().bold(),
        };
        println!("\n{} {}", style("Verdict:").bold(), badge);

        self.bullets("The Roast", &record.roast);
        self.bullets("Good Things", &record.good_things);
        self.bullets("Suggestions", &record.suggestions);
    }

    fn bullets(&self, title: &str, items: &[String]) {
        if items.is_empty() {
            return;
        }
        self.section(title);
        for item in items {
            println!("  • {}", item);
        }
    }
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}
