//! Renders a [`Page`] as a standalone HTML document.
//!
//! Every string coming from the user or the service is escaped. The only raw
//! markup is the fixed chrome produced here.

use super::{Block, Page, Span};
use std::fmt::Write;

const STYLE: &str = r#"
body { font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, sans-serif; margin: 0; color: #262730; }
main { max-width: 46rem; margin: 0 auto; padding: 3rem 1rem; }
label { display: block; margin: 1rem 0 0.25rem; font-size: 0.9rem; }
input[type=text], input[type=password] { width: 100%; padding: 0.5rem; box-sizing: border-box; }
input[type=range] { width: 85%; }
button { margin-top: 1rem; padding: 0.5rem 1rem; cursor: pointer; }
.notice { margin: 1rem 0; padding: 0.75rem 1rem; border-radius: 0.5rem; }
.warning { background: #fffce7; color: #926c05; }
.error { background: #ffecec; color: #7d353b; }
.busy { color: #555; }
.columns { display: flex; gap: 1.5rem; margin-top: 1.5rem; }
.column { flex: 1 1 0; min-width: 0; }
figure { margin: 0; }
figure img { width: 100%; height: auto; }
figcaption { text-align: center; color: #777; font-size: 0.85rem; }
"#;

pub fn render(page: &Page) -> String {
    let mut out = String::new();
    let _ = write!(
        out,
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{}</title>\n<style>{}</style>\n</head>\n<body>\n<main>\n\
         <form method=\"post\" action=\"/\" enctype=\"multipart/form-data\">\n",
        escape(&page.title),
        STYLE
    );
    for block in &page.blocks {
        render_block(&mut out, block);
    }
    out.push_str("</form>\n</main>\n</body>\n</html>\n");
    out
}

fn render_block(out: &mut String, block: &Block) {
    // Writing into a String cannot fail.
    let _ = match block {
        Block::Title { text } => writeln!(out, "<h1>{}</h1>", escape(text)),
        Block::Text { spans } => {
            out.push_str("<p>");
            for span in spans {
                match span {
                    Span::Plain { text } => out.push_str(&escape(text)),
                    Span::Link { text, href } => {
                        let _ = write!(
                            out,
                            "<a href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\">{}</a>",
                            escape(href),
                            escape(text)
                        );
                    }
                }
            }
            writeln!(out, "</p>")
        }
        Block::PasswordInput { name, label, value } => writeln!(
            out,
            "<label for=\"{n}\">{}</label>\n<input type=\"password\" id=\"{n}\" name=\"{n}\" value=\"{}\" autocomplete=\"off\">",
            escape(label),
            escape(value),
            n = escape(name)
        ),
        Block::FileUpload {
            name,
            label,
            accept,
        } => {
            let accept = accept
                .iter()
                .map(|ext| format!(".{}", ext))
                .collect::<Vec<_>>()
                .join(",");
            writeln!(
                out,
                "<label for=\"{n}\">{}</label>\n<input type=\"file\" id=\"{n}\" name=\"{n}\" accept=\"{}\">",
                escape(label),
                escape(&accept),
                n = escape(name)
            )
        }
        Block::TextInput { name, label, value } => writeln!(
            out,
            "<label for=\"{n}\">{}</label>\n<input type=\"text\" id=\"{n}\" name=\"{n}\" value=\"{}\">",
            escape(label),
            escape(value),
            n = escape(name)
        ),
        Block::Slider {
            name,
            label,
            min,
            max,
            step,
            value,
        } => writeln!(
            out,
            "<label for=\"{n}\">{}</label>\n<input type=\"range\" id=\"{n}\" name=\"{n}\" min=\"{:.1}\" max=\"{:.1}\" step=\"{:.1}\" value=\"{:.1}\" \
             oninput=\"this.nextElementSibling.value=Number(this.value).toFixed(1)\"> <output>{:.1}</output>",
            escape(label),
            min,
            max,
            step,
            value,
            value,
            n = escape(name)
        ),
        Block::Button {
            name,
            value,
            label,
            busy_label,
        } => match busy_label {
            Some(busy) => writeln!(
                out,
                "<div><button type=\"submit\" name=\"{}\" value=\"{}\" \
                 onclick=\"this.parentNode.querySelector('.busy').hidden=false\">{}</button>\n\
                 <p class=\"busy\" hidden>{}</p></div>",
                escape(name),
                escape(value),
                escape(label),
                escape(busy)
            ),
            None => writeln!(
                out,
                "<div><button type=\"submit\" name=\"{}\" value=\"{}\">{}</button></div>",
                escape(name),
                escape(value),
                escape(label)
            ),
        },
        Block::Warning { message } => writeln!(
            out,
            "<div class=\"notice warning\" role=\"alert\">{}</div>",
            escape(message)
        ),
        Block::Error { message } => writeln!(
            out,
            "<div class=\"notice error\" role=\"alert\">{}</div>",
            escape(message)
        ),
        Block::Columns { columns } => {
            out.push_str("<div class=\"columns\">\n");
            for column in columns {
                out.push_str("<div class=\"column\">\n");
                for inner in &column.blocks {
                    render_block(out, inner);
                }
                out.push_str("</div>\n");
            }
            writeln!(out, "</div>")
        }
        Block::Image {
            src,
            caption,
            width,
            height,
            fit_column,
        } => {
            let style = if *fit_column {
                " style=\"width:100%;height:auto\""
            } else {
                ""
            };
            writeln!(
                out,
                "<figure><img src=\"{}\" alt=\"{c}\" width=\"{}\" height=\"{}\"{}><figcaption>{c}</figcaption></figure>",
                escape(src),
                width,
                height,
                style,
                c = escape(caption)
            )
        }
        Block::Subheader { text } => writeln!(out, "<h3>{}</h3>", escape(text)),
        Block::StyledText {
            text,
            font_family,
            font_size_px,
            line_height,
        } => writeln!(
            out,
            "<div style=\"font-family: {}; font-size: {}px; line-height: {}; white-space: pre-wrap;\">{}</div>",
            escape(font_family),
            font_size_px,
            line_height,
            escape(text)
        ),
    };
}

pub fn escape(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{image::fixtures, DecodedImage, GenerationResult, ImageUpload, Temperature};
    use crate::ui::presenter;

    #[test]
    fn test_escape() {
        assert_eq!(
            escape(r#"<b>"Tom" & 'Jerry'</b>"#),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;"
        );
        assert_eq!(escape("plain"), "plain");
    }

    #[test]
    fn test_full_page_controls() {
        let mut page = presenter::header("sk-123");
        for block in presenter::controls("Write a poem", Temperature::default()) {
            page.push(block);
        }
        let html = render(&page);

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Poem Generator from Photos</title>"));
        assert!(html.contains("enctype=\"multipart/form-data\""));
        assert!(html.contains("type=\"password\" id=\"api_key\" name=\"api_key\" value=\"sk-123\""));
        assert!(html.contains("accept=\".jpg,.jpeg,.png,.webp\""));
        assert!(html.contains("min=\"0.0\" max=\"1.0\" step=\"0.1\" value=\"0.7\""));
        assert!(html.contains(">Generate Poem</button>"));
        assert!(html.contains("<p class=\"busy\" hidden>Generating poem...</p>"));
        assert!(html.contains("href=\"https://makersuite.google.com/\""));
    }

    #[test]
    fn test_poem_is_escaped_and_serif() {
        let image = DecodedImage::decode(&ImageUpload::new(fixtures::png(3, 3))).unwrap();
        let result = GenerationResult::new("<script>alert(1)</script>\nsecond line");
        let mut page = presenter::header("");
        page.push(presenter::present(&image, &result));
        let html = render(&page);

        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;\nsecond line"));
        assert!(html.contains("font-family: serif; font-size: 16px; line-height: 1.5;"));
        assert!(html.contains("<figcaption>Uploaded Image</figcaption>"));
        assert!(html.contains("<h3>Generated Poem</h3>"));
        assert!(html.contains("src=\"data:image/png;base64,"));
    }

    #[test]
    fn test_render_is_deterministic() {
        let page = presenter::header("");
        assert_eq!(render(&page), render(&page));
    }
}
