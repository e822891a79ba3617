/// Escapes text for interpolation into HTML element content or attribute values.
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());

    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }

    out
}

/// Minimal standalone page. `body` must already be escaped.
pub fn simple_page(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
  <head><meta charset="utf-8"><title>{title}</title></head>
  <body style="font-family: system-ui; max-width: 560px; margin: 2rem auto; padding: 2rem;">
    {body}
    <p><a href="/">← Back to site</a></p>
  </body>
</html>
"#,
        title = escape_html(title),
        body = body
    )
}
