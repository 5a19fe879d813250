use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::fmt::Write;
use std::time::Duration;

use crate::images::ImageSection;
use crate::provider::ModelInfo;
use crate::view::{LessonView, Page, SectionBody, NO_IMAGES_MESSAGE};

pub fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.magenta} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

pub fn render_page(page: &Page) -> String {
    match page {
        Page::Welcome => format!(
            "\n{}\n{}\n",
            "Welcome to the AI Lesson Planner".bold(),
            "Enter your class details to generate a structured lesson plan instantly.".dimmed()
        ),
        Page::InvalidInput(msg) => format!("{}\n", msg.red().bold()),
        Page::Failed(msg) => format!("{} {}\n", "Error:".red().bold(), msg.red()),
        Page::Lesson(view) => render_lesson(view),
    }
}

fn render_lesson(view: &LessonView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\n{}", view.title.bold().underline());
    let _ = writeln!(out, "{}", view.caption.dimmed());

    for s in &view.sections {
        let _ = writeln!(out, "\n{} {}", s.icon, s.heading.cyan().bold());
        match &s.body {
            SectionBody::Bullets(items) => {
                let bullet = if s.heading == "Blackboard Summary" { "•" } else { "-" };
                for item in items {
                    let _ = writeln!(out, "  {} {}", bullet, item);
                }
            }
            SectionBody::Text(t) => {
                let _ = writeln!(out, "{}", indent(t, 2));
            }
            SectionBody::Activities(acts) => {
                for a in acts {
                    let _ = writeln!(out, "  {} ({})", a.title.yellow().bold(), a.time);
                    let _ = writeln!(out, "{}", indent(&a.description, 4));
                }
            }
        }
    }

    if let Some(images) = &view.images {
        let _ = writeln!(out, "\n🖼️ {}", "Topic Images".cyan().bold());
        match images {
            ImageSection::Unavailable => {
                let _ = writeln!(out, "  {}", NO_IMAGES_MESSAGE.yellow());
            }
            ImageSection::Slots(slots) => {
                for (i, slot) in slots.iter().enumerate() {
                    if slot.available {
                        let _ = writeln!(out, "  [{}] {}  {}", i + 1, slot.caption.bold(), slot.url);
                    } else {
                        let _ = writeln!(out, "  [{}] {}", i + 1, NO_IMAGES_MESSAGE.yellow());
                    }
                }
            }
        }
    }
    out
}

pub fn render_models(models: &[ModelInfo]) -> String {
    if models.is_empty() {
        return "(no models support generateContent)\n".to_string();
    }
    let mut out = format!("{}\n", "Available Models:".bold());
    for m in models {
        match &m.display_name {
            Some(d) => {
                let _ = writeln!(out, "{}  {}", m.name, d.dimmed());
            }
            None => {
                let _ = writeln!(out, "{}", m.name);
            }
        }
    }
    out
}

fn indent(s: &str, n: usize) -> String {
    let pad = " ".repeat(n);
    s.lines()
        .map(|l| format!("{}{}", pad, l))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::images::ImageSlot;
    use crate::view::Section;
    use crate::wire::Activity;

    #[test]
    fn failure_carries_raw_message() {
        let out = render_page(&Page::Failed("API error (429): quota".into()));
        assert!(out.contains("Error:"));
        assert!(out.contains("API error (429): quota"));
    }

    #[test]
    fn lesson_lists_items_in_order() {
        let view = LessonView {
            title: "Lesson Plan: Magnets".into(),
            caption: "Class 4 | Science | 45 mins".into(),
            sections: vec![
                Section { icon: "🧠", heading: "Introduction", body: SectionBody::Text("Why do fridge\nmagnets stick?".into()) },
                Section { icon: "🖤", heading: "Blackboard Summary", body: SectionBody::Bullets(vec!["Poles".into(), "Fields".into()]) },
                Section {
                    icon: "🎲",
                    heading: "Activities",
                    body: SectionBody::Activities(vec![Activity { title: "Paperclips".into(), time: "5 mins".into(), description: "Pick up clips".into() }]),
                },
            ],
            images: Some(ImageSection::Slots(vec![
                ImageSlot { keyword: "magnet".into(), url: "https://img/magnet".into(), caption: "Magnet".into(), available: true },
                ImageSlot { keyword: "iron".into(), url: "https://img/iron".into(), caption: "Iron".into(), available: false },
            ])),
        };
        let out = render_page(&Page::Lesson(Box::new(view)));
        assert!(out.contains("  Why do fridge\n  magnets stick?"));
        assert!(out.find("• Poles").unwrap() < out.find("• Fields").unwrap());
        assert!(out.contains("(5 mins)"));
        assert!(out.contains("https://img/magnet"));
        assert!(!out.contains("https://img/iron"));
        assert_eq!(out.matches(NO_IMAGES_MESSAGE).count(), 1);
    }

    #[test]
    fn models_listing() {
        let out = render_models(&[
            ModelInfo { name: "models/gemini-2.0-flash-lite".into(), display_name: None },
            ModelInfo { name: "models/gemini-1.5-pro".into(), display_name: Some("Gemini 1.5 Pro".into()) },
        ]);
        assert!(out.contains("models/gemini-2.0-flash-lite\n"));
        assert!(out.find("flash-lite").unwrap() < out.find("1.5-pro").unwrap());
        assert!(out.contains("Gemini 1.5 Pro"));
        assert!(render_models(&[]).contains("no models"));
    }
}
