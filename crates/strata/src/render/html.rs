//! `index.html` report.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

/// Characters left alone in a file-name link component.
const COMPONENT_SAFE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Report section for one diagram: an optional heading and a PNG preview
/// linking to the SVG.
#[must_use]
pub fn section(title: Option<&str>, filename_base: &str) -> String {
    let encoded = utf8_percent_encode(filename_base, COMPONENT_SAFE);
    let header = title.map_or_else(String::new, |title| {
        format!("<h3><i>{}</i>:</h3>\n", escape(title))
    });
    format!(
        "{header}<p><a href=\"{encoded}.svg\"><img src=\"{encoded}.png\" style=\"max-width: 100vw; max-height: 100vh\"/></a></p>"
    )
}

/// Join sections into the report body.
#[must_use]
pub fn document(sections: &[String]) -> String {
    sections.join("\n\n")
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn section_encodes_file_names() {
        let html = section(Some("@scope/a"), "package__[at]_scope__a");
        assert_eq!(
            html,
            "<h3><i>@scope/a</i>:</h3>\n<p><a href=\"package__%5Bat%5D_scope__a.svg\"><img src=\"package__%5Bat%5D_scope__a.png\" style=\"max-width: 100vw; max-height: 100vh\"/></a></p>"
        );
    }

    #[test]
    fn legend_section_has_no_heading() {
        let html = section(None, "legend");
        assert!(html.starts_with("<p><a href=\"legend.svg\">"));
    }

    #[test]
    fn titles_are_escaped() {
        assert!(section(Some("a<b>"), "x").contains("a&lt;b&gt;"));
    }
}
