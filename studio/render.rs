/// Template renderer for the leafscan screen.
///
/// The page lives in `studio/assets/screen.html` with `{{TOKEN}}`
/// placeholders. It is compiled into the binary; `render_screen` fills the
/// tokens from the current screen state and blanks any left over.

use crate::state::{FlashMessage, ScreenState};

const TEMPLATE: &str = include_str!("assets/screen.html");

/// Static facts about the loaded model shown in the page footer.
pub struct ModelSummary {
    pub labels: Vec<String>,
    pub width: u32,
    pub height: u32,
}

/// Renders the full screen. `flash` is passed separately because it is
/// consumed by the caller before rendering.
pub fn render_screen(screen: &ScreenState, flash: Option<&FlashMessage>, model: &ModelSummary) -> String {
    let image_section = match &screen.image {
        Some(img) => format!(
            r#"<img id="photo" src="/image?v={}" alt="Photo from {}">"#,
            screen.revision,
            img.source.describe()
        ),
        None => r#"<div id="photo-empty">No photo yet</div>"#.to_owned(),
    };

    let flash_html = flash
        .map(|f| format!(r#"<div class="flash">{}</div>"#, html_escape(&f.text)))
        .unwrap_or_default();

    let confidence = screen.prediction.as_ref()
        .and_then(|p| p.confidence_pct())
        .map(|pct| format!("Confidence: {:.1}%", pct))
        .unwrap_or_default();

    let model_info = format!(
        "{} classes ({}) · input {}x{}",
        model.labels.len(),
        html_escape(&model.labels.join(", ")),
        model.width,
        model.height
    );

    let html = TEMPLATE
        .replace("{{FLASH}}", &flash_html)
        .replace("{{IMAGE_SECTION}}", &image_section)
        .replace("{{RESULT_TEXT}}", &html_escape(&screen.result_text()))
        .replace("{{CONFIDENCE}}", &confidence)
        .replace("{{MODEL_INFO}}", &model_info);

    blank_remaining(html)
}

/// Replaces any `{{TOKEN}}` that wasn't already substituted with an empty string.
fn blank_remaining(mut html: String) -> String {
    while let Some(start) = html.find("{{") {
        if let Some(end) = html[start..].find("}}") {
            let abs_end = start + end + 2;
            html.replace_range(start..abs_end, "");
        } else {
            break;
        }
    }
    html
}

pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{DisplayedImage, ImageSource};
    use leafscan::top_label;

    fn summary() -> ModelSummary {
        ModelSummary { labels: vec!["a".into(), "<b>".into()], width: 224, height: 224 }
    }

    #[test]
    fn empty_screen_has_placeholder_and_no_tokens() {
        let html = render_screen(&ScreenState::new(), None, &summary());
        assert!(html.contains("No photo yet"));
        assert!(!html.contains("{{"));
        assert!(html.contains("&lt;b&gt;"));
    }

    #[test]
    fn classified_screen_shows_text_and_image() {
        let mut screen = ScreenState::new();
        let labels = vec!["a".to_string(), "<b>".to_string()];
        screen.show(
            DisplayedImage { bytes: vec![0; 7], mime: "image/png", source: ImageSource::Pick },
            top_label(&[0.25, 0.75], &labels),
        );
        let html = render_screen(&screen, None, &summary());
        assert!(html.contains("Result: &lt;b&gt;"));
        assert!(html.contains("/image?v=1"));
        assert!(html.contains("Confidence: 75.0%"));
    }

    #[test]
    fn flash_is_escaped() {
        let flash = FlashMessage::error("bad <thing>");
        let html = render_screen(&ScreenState::new(), Some(&flash), &summary());
        assert!(html.contains(r#"<div class="flash">bad &lt;thing&gt;</div>"#));
    }

    #[test]
    fn leftover_tokens_are_blanked() {
        assert_eq!(blank_remaining("a{{X}}b{{Y}}c".into()), "abc");
        assert_eq!(blank_remaining("open {{ only".into()), "open {{ only");
    }
}
