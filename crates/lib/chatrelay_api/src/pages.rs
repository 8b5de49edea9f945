//! HTML documents served by the relay.

/// Served on `GET /`.
pub const LANDING_PAGE: &str = r#"<!DOCTYPE html>
<html>
  <head>
    <meta charset="UTF-8">
    <title>AI Backend</title>
  </head>
  <body>
    <h1>AI is online!</h1>
    <p>POST to <code>/</code> with <code>{ "prompt": "..." }</code></p>
  </body>
</html>
"#;

/// Wraps a processed reply fragment in a full document.
///
/// `fragment` is embedded verbatim; it must already be safe HTML.
pub fn reply_page(fragment: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
  <head>
    <meta charset="UTF-8">
  </head>
  <body>
    <div class="reply">{fragment}</div>
  </body>
</html>
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reply_page_embeds_fragment() {
        let page = reply_page("<math>x</math> &amp; more");
        assert!(page.contains(r#"<div class="reply"><math>x</math> &amp; more</div>"#));
        assert!(page.contains(r#"<meta charset="UTF-8">"#));
    }
}
