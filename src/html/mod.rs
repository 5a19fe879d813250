use anyhow::Result;
use handlebars::Handlebars;
use serde_json::{json, Value};

use crate::cli::{Duration, Grade};
use crate::images::ImageSection;
use crate::view::{FormInput, LessonView, Page, SectionBody, NO_IMAGES_MESSAGE};

const PAGE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Lesson Plan Generator</title>
<style>
body { margin: 0; font-family: system-ui, sans-serif; display: flex; min-height: 100vh; }
aside { width: 18rem; padding: 1.5rem; background: #f0f2f6; }
aside label { display: block; margin-top: 0.8rem; font-weight: 600; }
aside input, aside select { width: 100%; padding: 0.4rem; border-radius: 8px; border: 1px solid #ccc; }
aside button { width: 100%; margin-top: 1.2rem; height: 3em; background: #F63366; color: white; border: none; border-radius: 8px; font-weight: bold; }
main { flex: 1; padding: 2rem; }
.columns { display: flex; gap: 2rem; }
.primary { flex: 2; } .secondary { flex: 1; }
.error { background: #ffe0e0; color: #a00; padding: 1rem; border-radius: 8px; }
.info { background: #e6f0ff; padding: 1rem; border-radius: 8px; }
.warning { background: #fff4d6; padding: 0.6rem; border-radius: 8px; }
.blackboard { background: #262730; color: white; padding: 15px; border-radius: 10px; border: 1px solid #444; }
.caption { color: #888; }
.images { display: flex; gap: 0.5rem; } .images figure { flex: 1; margin: 0; } .images img { width: 100%; }
</style>
</head>
<body>
<aside>
<h1>📚 Lesson Planner</h1>
<p>Generate comprehensive lesson plans in seconds.</p>
<h2>Class Details</h2>
<form method="post" action="/generate">
<label for="grade">Class/Grade</label>
<select id="grade" name="grade">{{#each grades}}<option{{#if selected}} selected{{/if}}>{{label}}</option>{{/each}}</select>
<label for="subject">Subject</label>
<input id="subject" name="subject" placeholder="e.g. Science, Math, History" value="{{subject}}">
<label for="topic">Chapter/Topic</label>
<input id="topic" name="topic" placeholder="e.g. Photosynthesis, WWII" value="{{topic}}">
<label for="duration">Duration</label>
<select id="duration" name="duration">{{#each durations}}<option{{#if selected}} selected{{/if}}>{{label}}</option>{{/each}}</select>
{{#if ask_key}}<label for="api_key">Gemini API Key</label>
<input id="api_key" name="api_key" type="password" autocomplete="off">{{/if}}
<button type="submit">Generate Lesson Plan</button>
</form>
</aside>
<main>
{{#if welcome}}<div style="text-align: center; padding: 50px;">
<h1>Welcome to the AI Lesson Planner</h1>
<p style="font-size: 1.2em; color: #888;">Enter your class details in the sidebar to generate a structured lesson plan instantly.</p>
</div>{{/if}}
{{#if invalid}}<div class="error">{{invalid}}</div>{{/if}}
{{#if failed}}<div class="error">Error: {{failed}}</div>{{/if}}
{{#with lesson}}
<h1>{{title}}</h1>
<p class="caption">{{caption}}</p>
<div class="columns">
<div class="primary">{{#each primary}}{{> section}}{{/each}}</div>
<div class="secondary">{{#each secondary}}{{> section}}{{/each}}
{{#if images}}<hr>
<h3>🖼️ Topic Images</h3>
{{#if images.unavailable}}<div class="info">{{@root.no_images}}</div>{{else}}<div class="images">{{#each images.slots}}<figure>{{#if available}}<img src="{{url}}" alt="{{keyword}}"><figcaption>{{caption}}</figcaption>{{else}}<div class="warning">{{@root.no_images}}</div>{{/if}}</figure>{{/each}}</div>{{/if}}{{/if}}
</div>
</div>
{{/with}}
</main>
</body>
</html>
"#;

const SECTION_PARTIAL: &str = r#"<section>
<h3>{{icon}} {{heading}}</h3>
{{#if text}}<div class="info">{{text}}</div>{{/if}}
{{#if is_list}}<ul{{#if blackboard}} class="blackboard"{{/if}}>{{#each items}}<li>{{this}}</li>{{/each}}</ul>{{/if}}
{{#each activities}}<details open><summary>{{title}} ({{time}})</summary><p>{{description}}</p></details>{{/each}}
</section>
"#;

/// Headings shown in the narrow right-hand column.
const SECONDARY: [&str; 3] = ["Blackboard Summary", "Homework", "Assessment"];

pub struct HtmlRenderer {
    hb: Handlebars<'static>,
}

impl HtmlRenderer {
    pub fn new() -> Result<Self> {
        let mut hb = Handlebars::new();
        hb.register_template_string("page", PAGE_TEMPLATE)?;
        hb.register_partial("section", SECTION_PARTIAL)?;
        Ok(Self { hb })
    }

    /// Render the full page. `ask_key` controls the password field.
    pub fn render(&self, page: &Page, form: &FormInput, ask_key: bool) -> Result<String> {
        let mut ctx = json!({
            "grades": Grade::ALL.iter().map(|g| option(g.label(), &form.grade)).collect::<Vec<_>>(),
            "durations": Duration::ALL.iter().map(|d| option(d.label(), &form.duration)).collect::<Vec<_>>(),
            "subject": form.subject,
            "topic": form.topic,
            "ask_key": ask_key,
            "no_images": NO_IMAGES_MESSAGE,
        });
        match page {
            Page::Welcome => ctx["welcome"] = json!(true),
            Page::InvalidInput(msg) => ctx["invalid"] = json!(msg),
            Page::Failed(msg) => ctx["failed"] = json!(msg),
            Page::Lesson(view) => ctx["lesson"] = lesson_context(view),
        }
        Ok(self.hb.render("page", &ctx)?)
    }
}

fn option(label: &str, current: &str) -> Value {
    json!({ "label": label, "selected": label == current })
}

fn lesson_context(view: &LessonView) -> Value {
    let (secondary, primary): (Vec<_>, Vec<_>) = view
        .sections
        .iter()
        .partition(|s| SECONDARY.contains(&s.heading));
    let section = |s: &&crate::view::Section| {
        let mut v = json!({ "icon": s.icon, "heading": s.heading });
        match &s.body {
            SectionBody::Bullets(items) => {
                v["is_list"] = json!(true);
                v["items"] = json!(items);
                v["blackboard"] = json!(s.heading == "Blackboard Summary");
            }
            SectionBody::Text(t) => v["text"] = json!(t),
            SectionBody::Activities(a) => v["activities"] = json!(a),
        }
        v
    };
    let images = view.images.as_ref().map(|section| match section {
        ImageSection::Unavailable => json!({ "unavailable": true }),
        ImageSection::Slots(slots) => json!({
            "slots": slots
                .iter()
                .map(|s| json!({ "url": s.url, "keyword": s.keyword, "caption": s.caption, "available": s.available }))
                .collect::<Vec<_>>(),
        }),
    });
    json!({
        "title": view.title,
        "caption": view.caption,
        "primary": primary.iter().map(section).collect::<Vec<_>>(),
        "secondary": secondary.iter().map(section).collect::<Vec<_>>(),
        "images": images,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::images::ImageSlot;
    use crate::view::Section;
    use crate::wire::Activity;

    fn render(page: &Page) -> String {
        HtmlRenderer::new().unwrap().render(page, &FormInput::default(), true).unwrap()
    }

    fn view(sections: Vec<Section>, images: Option<ImageSection>) -> Page {
        Page::Lesson(Box::new(LessonView {
            title: "Lesson Plan: Fractions".into(),
            caption: "Class 3 | Math | 30 mins".into(),
            sections,
            images,
        }))
    }

    #[test]
    fn welcome_page_lists_form_choices() {
        let html = render(&Page::Welcome);
        assert!(html.contains("Welcome to the AI Lesson Planner"));
        assert!(html.contains("<option>Class 12</option>"));
        assert!(html.contains("<option>90 mins</option>"));
        assert!(html.contains("type=\"password\""));
    }

    #[test]
    fn key_field_hidden_when_configured() {
        let html = HtmlRenderer::new().unwrap().render(&Page::Welcome, &FormInput::default(), false).unwrap();
        assert!(!html.contains("type=\"password\""));
    }

    #[test]
    fn submitted_values_are_kept() {
        let form = FormInput { grade: "Class 7".into(), duration: "45 mins".into(), subject: "History".into(), ..FormInput::default() };
        let html = HtmlRenderer::new().unwrap().render(&Page::Welcome, &form, true).unwrap();
        assert!(html.contains("<option selected>Class 7</option>"));
        assert!(html.contains("<option selected>45 mins</option>"));
        assert!(html.contains("value=\"History\""));
    }

    #[test]
    fn failure_is_prefixed_and_escaped() {
        let html = render(&Page::Failed("<script>x</script>".into()));
        assert!(html.contains("Error: &lt;script&gt;x&lt;/script&gt;"));
        assert!(!html.contains("<script>x"));
    }

    #[test]
    fn lesson_sections_and_images_render() {
        let sections = vec![
            Section { icon: "📘", heading: "Learning Objectives", body: SectionBody::Bullets(vec!["Halves".into(), "Quarters".into()]) },
            Section {
                icon: "🎲",
                heading: "Activities",
                body: SectionBody::Activities(vec![Activity { title: "Pizza".into(), time: "10 mins".into(), description: "Cut it".into() }]),
            },
            Section { icon: "🏠", heading: "Homework", body: SectionBody::Bullets(vec!["Worksheet".into()]) },
        ];
        let images = ImageSection::Slots(vec![
            ImageSlot { keyword: "pizza".into(), url: "https://img/prompt/pizza".into(), caption: "Pizza".into(), available: true },
            ImageSlot { keyword: "pie".into(), url: "https://img/prompt/pie".into(), caption: "Pie".into(), available: false },
        ]);
        let html = render(&view(sections, Some(images)));
        assert!(html.contains("<h1>Lesson Plan: Fractions</h1>"));
        let halves = html.find("<li>Halves</li>").unwrap();
        let quarters = html.find("<li>Quarters</li>").unwrap();
        assert!(halves < quarters);
        assert!(html.contains("<summary>Pizza (10 mins)</summary>"));
        assert!(html.contains("src=\"https://img/prompt/pizza\""));
        assert_eq!(html.matches(NO_IMAGES_MESSAGE).count(), 1);
        assert!(!html.contains("Introduction"));
    }

    #[test]
    fn no_keywords_shows_single_notice() {
        let html = render(&view(vec![], Some(ImageSection::Unavailable)));
        assert_eq!(html.matches(NO_IMAGES_MESSAGE).count(), 1);
        assert!(!html.contains("<img"));
    }
}
