use clap::ValueEnum;
use std::io::{self, BufRead, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportChoice {
    Csv,
    Markdown,
    Both,
    #[value(name = "none")]
    Skip,
}

impl ExportChoice {
    fn from_menu(input: &str) -> Option<Self> {
        match input.trim() {
            "1" => Some(ExportChoice::Csv),
            "2" => Some(ExportChoice::Markdown),
            "3" => Some(ExportChoice::Both),
            "4" => Some(ExportChoice::Skip),
            _ => None,
        }
    }

    pub fn includes_csv(self) -> bool {
        matches!(self, ExportChoice::Csv | ExportChoice::Both)
    }

    pub fn includes_markdown(self) -> bool {
        matches!(self, ExportChoice::Markdown | ExportChoice::Both)
    }
}

/// Shows the export menu until a valid choice is entered. End of input means no export.
pub fn ask_export_choice(mut input: impl BufRead, out: &mut impl Write) -> io::Result<ExportChoice> {
    writeln!(out, "\n{}", "=".repeat(80))?;
    writeln!(out, "EXPORT OPTIONS")?;
    writeln!(out, "{}", "=".repeat(80))?;

    loop {
        writeln!(out, "\nWould you like to export the commits?")?;
        writeln!(out, "1. Export to CSV")?;
        writeln!(out, "2. Export to Markdown")?;
        writeln!(out, "3. Export to both CSV and Markdown")?;
        writeln!(out, "4. No export, exit")?;
        write!(out, "\nEnter your choice (1-4): ")?;
        out.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            writeln!(out)?;
            return Ok(ExportChoice::Skip);
        }

        match ExportChoice::from_menu(&line) {
            Some(choice) => return Ok(choice),
            None => writeln!(out, "Invalid choice. Please enter 1, 2, 3, or 4.")?,
        }
    }
}
